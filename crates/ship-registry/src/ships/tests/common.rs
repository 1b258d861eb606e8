use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::ships::domain::{Ship, ShipDetails, ShipDraft, ShipId, ShipType};
use crate::ships::rating::compute_rating;
use crate::ships::repository::{RepositoryError, ShipRepository};
use crate::ships::{ship_router, ShipRegistryService};

pub(super) fn produced_in(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 4, 12, 0, 0, 0).unwrap()
}

pub(super) fn draft() -> ShipDraft {
    ShipDraft {
        name: Some("Orion III".to_string()),
        planet: Some("Mars".to_string()),
        ship_type: Some(ShipType::Merchant),
        prod_date: Some(produced_in(3010)),
        is_used: Some(false),
        speed: Some(0.82),
        crew_size: Some(617),
    }
}

/// Stored ship with a rating consistent with its attributes.
pub(super) fn ship(id: u64, speed: f64, year: i32) -> Ship {
    let prod_date = produced_in(year);
    Ship {
        id: ShipId(id),
        name: format!("Ship {id}"),
        planet: "Earth".to_string(),
        ship_type: ShipType::Transport,
        prod_date,
        is_used: false,
        speed,
        crew_size: 100,
        rating: compute_rating(speed, false, prod_date),
    }
}

pub(super) fn fleet() -> Vec<Ship> {
    vec![
        Ship {
            name: "Daedalus".to_string(),
            planet: "Jupiter".to_string(),
            ship_type: ShipType::Military,
            crew_size: 4500,
            ..ship(1, 0.3, 2995)
        },
        Ship {
            name: "Eagle Transit".to_string(),
            planet: "Earth".to_string(),
            is_used: true,
            rating: compute_rating(0.5, true, produced_in(3012)),
            ..ship(2, 0.5, 3012)
        },
        Ship {
            name: "Golden Eagle".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Merchant,
            crew_size: 12,
            ..ship(3, 0.7, 3019)
        },
        Ship {
            name: "Nomad".to_string(),
            planet: "Earth Orbit".to_string(),
            ship_type: ShipType::Merchant,
            crew_size: 40,
            ..ship(4, 0.9, 2850)
        },
        Ship {
            name: "Serenity".to_string(),
            planet: "Neptune".to_string(),
            crew_size: 9,
            ..ship(5, 0.95, 3001)
        },
    ]
}

pub(super) fn build_service() -> (ShipRegistryService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ShipRegistryService::new(repository.clone());
    (service, repository)
}

pub(super) fn seeded_service(
    ships: Vec<Ship>,
) -> (ShipRegistryService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::with_ships(ships));
    let service = ShipRegistryService::new(repository.clone());
    (service, repository)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    ships: BTreeMap<ShipId, Ship>,
    writes: usize,
}

impl MemoryRepository {
    pub(super) fn with_ships(ships: Vec<Ship>) -> Self {
        let next_id = ships.iter().map(|ship| ship.id.0).max().unwrap_or(0);
        let ships = ships.into_iter().map(|ship| (ship.id, ship)).collect();
        Self {
            state: Mutex::new(MemoryState {
                next_id,
                ships,
                writes: 0,
            }),
        }
    }

    pub(super) fn writes(&self) -> usize {
        self.state.lock().expect("repository mutex poisoned").writes
    }

    pub(super) fn stored(&self, id: u64) -> Option<Ship> {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .ships
            .get(&ShipId(id))
            .cloned()
    }
}

impl ShipRepository for MemoryRepository {
    fn insert(&self, details: ShipDetails) -> Result<Ship, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.next_id += 1;
        let ship = Ship::from_details(ShipId(guard.next_id), details);
        guard.ships.insert(ship.id, ship.clone());
        guard.writes += 1;
        Ok(ship)
    }

    fn update(&self, ship: Ship) -> Result<Ship, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if !guard.ships.contains_key(&ship.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.ships.insert(ship.id, ship.clone());
        guard.writes += 1;
        Ok(ship)
    }

    fn fetch(&self, id: ShipId) -> Result<Option<Ship>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.ships.get(&id).cloned())
    }

    fn delete(&self, id: ShipId) -> Result<bool, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let removed = guard.ships.remove(&id).is_some();
        if removed {
            guard.writes += 1;
        }
        Ok(removed)
    }

    fn all(&self) -> Result<Vec<Ship>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.ships.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl ShipRepository for UnavailableRepository {
    fn insert(&self, _details: ShipDetails) -> Result<Ship, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _ship: Ship) -> Result<Ship, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: ShipId) -> Result<Option<Ship>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: ShipId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Ship>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_fleet() -> (axum::Router, Arc<MemoryRepository>) {
    let (service, repository) = seeded_service(fleet());
    (ship_router(Arc::new(service)), repository)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn ids(ships: &[Ship]) -> Vec<u64> {
    ships.iter().map(|ship| ship.id.0).collect()
}
