mod cli;
mod fleet;
mod infra;
mod routes;
mod server;

use ship_registry::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
