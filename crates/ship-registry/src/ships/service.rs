use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{Ship, ShipDraft, ShipId, ShipPatch};
use super::query::{self, ShipFilter, ShipQuery};
use super::repository::{RepositoryError, ShipRepository};
use super::validation::{self, ValidationError};

/// Service composing validation, rating, and queries with a storage backend.
pub struct ShipRegistryService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ShipRegistryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> ShipRegistryService<R>
where
    R: ShipRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate a candidate and persist it with a freshly computed rating.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship, ShipServiceError> {
        let details = validation::prepare_for_create(draft).inspect_err(|err| {
            warn!(error = %err, "rejected ship candidate");
        })?;

        let stored = self.repository.insert(details)?;
        info!(id = %stored.id, rating = stored.rating, "registered ship");
        Ok(stored)
    }

    pub fn get(&self, id: ShipId) -> Result<Ship, ShipServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ShipServiceError::NotFound(id))
    }

    /// Merge a partial update into an existing ship and write the result once.
    ///
    /// A `None` or empty patch returns the stored ship unchanged without a write.
    pub fn update(&self, id: ShipId, patch: Option<ShipPatch>) -> Result<Ship, ShipServiceError> {
        let existing = self.get(id)?;
        let has_changes = patch.as_ref().is_some_and(|patch| !patch.is_empty());

        let merged = validation::apply_patch(existing, patch.as_ref()).inspect_err(|err| {
            warn!(%id, error = %err, "rejected ship patch");
        })?;

        if !has_changes {
            debug!(%id, "empty ship patch; returning stored record");
            return Ok(merged);
        }

        let stored = self.repository.update(merged)?;
        info!(%id, rating = stored.rating, "updated ship");
        Ok(stored)
    }

    pub fn delete(&self, id: ShipId) -> Result<(), ShipServiceError> {
        if self.repository.delete(id)? {
            info!(%id, "deleted ship");
            Ok(())
        } else {
            Err(ShipServiceError::NotFound(id))
        }
    }

    pub fn list(&self, request: &ShipQuery) -> Result<Vec<Ship>, ShipServiceError> {
        let ships = self.repository.all()?;
        let page = query::list(&ships, &request.filter, request.order, request.page);
        debug!(
            order = request.order.field_name(),
            page_number = request.page.number,
            page_size = request.page.size,
            returned = page.len(),
            "listed ships"
        );
        Ok(page)
    }

    pub fn count(&self, filter: &ShipFilter) -> Result<usize, ShipServiceError> {
        let ships = self.repository.all()?;
        Ok(query::count(&ships, filter))
    }
}

/// Error raised by the ship registry service.
#[derive(Debug, thiserror::Error)]
pub enum ShipServiceError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("ship {0} not found")]
    NotFound(ShipId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
