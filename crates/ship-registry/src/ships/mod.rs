//! Ship registry: record validation, rating derivation, and the listing query engine.
//!
//! `validation`, `rating`, and `query` are pure functions over explicit inputs. The
//! service composes them with a [`ShipRepository`] and the router exposes the service
//! over HTTP.

pub mod domain;
pub mod import;
pub mod query;
pub mod rating;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Ship, ShipDetails, ShipDraft, ShipId, ShipPatch, ShipType};
pub use import::{FleetImportError, FleetImporter};
pub use query::{OrderKey, PageRequest, ShipFilter, ShipQuery};
pub use rating::compute_rating;
pub use repository::{RepositoryError, ShipRepository};
pub use router::{ship_router, ShipListParams};
pub use service::{ShipRegistryService, ShipServiceError};
pub use validation::{apply_patch, merge_for_update, prepare_for_create, ValidationError};
