use crate::fleet::{run_fleet_query, run_rating, FleetQueryArgs, RatingArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ship_registry::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ship Registry",
    about = "Serve and query the ship registry from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Offline tooling over fleet CSV exports
    Ships {
        #[command(subcommand)]
        command: ShipsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ShipsCommand {
    /// Filter, order, and page a fleet CSV the same way the listing endpoint does
    Query(FleetQueryArgs),
    /// Compute the rating for a speed, usage flag, and production year
    Rate(RatingArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the registry from a fleet CSV (overrides APP_FLEET_CSV)
    #[arg(long)]
    pub(crate) fleet_csv: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ships {
            command: ShipsCommand::Query(args),
        } => run_fleet_query(args),
        Command::Ships {
            command: ShipsCommand::Rate(args),
        } => run_rating(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["ship-registry"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_query_filters() {
        let cli = Cli::try_parse_from([
            "ship-registry",
            "ships",
            "query",
            "--csv",
            "fleet.csv",
            "--planet",
            "Earth",
            "--order",
            "SPEED",
            "--page-size",
            "5",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Ships {
                command: ShipsCommand::Query(args),
            }) => {
                assert_eq!(args.planet.as_deref(), Some("Earth"));
                assert_eq!(args.order.as_deref(), Some("SPEED"));
                assert_eq!(args.page_size, Some(5));
            }
            other => panic!("expected ships query, got {other:?}"),
        }
    }

    #[test]
    fn rate_rejects_years_outside_window() {
        let result = Cli::try_parse_from([
            "ship-registry",
            "ships",
            "rate",
            "--speed",
            "0.5",
            "--year",
            "3020",
        ]);
        assert!(result.is_err());
    }
}
