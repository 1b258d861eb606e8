use super::domain::{Ship, ShipDetails, ShipId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ShipRepository: Send + Sync {
    /// Persist a validated ship, assigning its identity.
    fn insert(&self, details: ShipDetails) -> Result<Ship, RepositoryError>;
    /// Replace an existing ship in a single write.
    fn update(&self, ship: Ship) -> Result<Ship, RepositoryError>;
    fn fetch(&self, id: ShipId) -> Result<Option<Ship>, RepositoryError>;
    /// Returns `false` when no ship with `id` existed.
    fn delete(&self, id: ShipId) -> Result<bool, RepositoryError>;
    /// Snapshot of every stored ship, in no particular order.
    fn all(&self) -> Result<Vec<Ship>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
