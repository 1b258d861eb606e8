use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use ship_registry::ships::{RepositoryError, Ship, ShipDetails, ShipId, ShipRepository};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct ShipTable {
    last_id: u64,
    rows: BTreeMap<ShipId, Ship>,
}

/// Process-local registry storage. Identifiers are never reused after delete.
#[derive(Default, Clone)]
pub(crate) struct InMemoryShipRepository {
    table: Arc<Mutex<ShipTable>>,
}

impl InMemoryShipRepository {
    fn with_table<T>(
        &self,
        action: impl FnOnce(&mut ShipTable) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self
            .table
            .lock()
            .map_err(|_| RepositoryError::Unavailable("ship table lock poisoned".to_string()))?;
        action(&mut guard)
    }
}

impl ShipRepository for InMemoryShipRepository {
    fn insert(&self, details: ShipDetails) -> Result<Ship, RepositoryError> {
        self.with_table(|table| {
            table.last_id += 1;
            let ship = Ship::from_details(ShipId(table.last_id), details);
            table.rows.insert(ship.id, ship.clone());
            Ok(ship)
        })
    }

    fn update(&self, ship: Ship) -> Result<Ship, RepositoryError> {
        self.with_table(|table| match table.rows.get_mut(&ship.id) {
            Some(row) => {
                *row = ship.clone();
                Ok(ship)
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn fetch(&self, id: ShipId) -> Result<Option<Ship>, RepositoryError> {
        self.with_table(|table| Ok(table.rows.get(&id).cloned()))
    }

    fn delete(&self, id: ShipId) -> Result<bool, RepositoryError> {
        self.with_table(|table| Ok(table.rows.remove(&id).is_some()))
    }

    fn all(&self) -> Result<Vec<Ship>, RepositoryError> {
        self.with_table(|table| Ok(table.rows.values().cloned().collect()))
    }
}

/// Inserts an imported fleet in file order, so ids follow CSV row order.
pub(crate) fn seed_repository<R: ShipRepository>(
    repository: &R,
    fleet: Vec<ShipDetails>,
) -> Result<usize, RepositoryError> {
    let mut seeded = 0;
    for details in fleet {
        repository.insert(details)?;
        seeded += 1;
    }
    Ok(seeded)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ship_registry::ships::FleetImporter;
    use std::io::Cursor;

    const FLEET: &str = "\
name,planet,shipType,prodDate,isUsed,speed,crewSize
Daedalus,Jupiter,MILITARY,2995-04-12,false,0.3,4500
Serenity,Neptune,TRANSPORT,3001-04-12,true,0.95,9
";

    #[test]
    fn seeding_assigns_ids_in_row_order() {
        let repository = InMemoryShipRepository::default();
        let fleet = FleetImporter::from_reader(Cursor::new(FLEET)).expect("fleet parses");

        assert_eq!(seed_repository(&repository, fleet).expect("seeded"), 2);

        let ships = repository.all().expect("listing");
        let names: Vec<(u64, &str)> = ships
            .iter()
            .map(|ship| (ship.id.0, ship.name.as_str()))
            .collect();
        assert_eq!(names, vec![(1, "Daedalus"), (2, "Serenity")]);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let repository = InMemoryShipRepository::default();
        let fleet = FleetImporter::from_reader(Cursor::new(FLEET)).expect("fleet parses");
        let mut fleet = fleet.into_iter();

        let first = repository
            .insert(fleet.next().expect("first row"))
            .expect("insert");
        assert!(repository.delete(first.id).expect("delete"));
        assert!(!repository.delete(first.id).expect("second delete"));

        let second = repository
            .insert(fleet.next().expect("second row"))
            .expect("insert");
        assert_eq!(second.id, ShipId(2));
        assert_eq!(repository.fetch(first.id).expect("fetch"), None);
    }

    #[test]
    fn update_requires_existing_row() {
        let repository = InMemoryShipRepository::default();
        let fleet = FleetImporter::from_reader(Cursor::new(FLEET)).expect("fleet parses");
        let details = fleet.into_iter().next().expect("row");

        let ghost = Ship::from_details(ShipId(9), details);
        assert!(matches!(
            repository.update(ghost),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 3001-04-12 "),
            Ok(NaiveDate::from_ymd_opt(3001, 4, 12).expect("valid date"))
        );
        assert!(parse_date("12/04/3001").is_err());
    }
}
