use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{Ship, ShipType};

pub const DEFAULT_PAGE_NUMBER: usize = 0;
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Boxed filter predicate borrowing from its [`ShipFilter`].
pub type Predicate<'a> = Box<dyn Fn(&Ship) -> bool + Send + Sync + 'a>;

/// Optional constraints applied as a conjunction. Bounds are inclusive; `after`/`before`
/// are epoch milliseconds compared against the production date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipFilter {
    pub name: Option<String>,
    pub planet: Option<String>,
    pub ship_type: Option<ShipType>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub is_used: Option<bool>,
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_crew_size: Option<u32>,
    pub max_crew_size: Option<u32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// One predicate per supplied filter; absent filters contribute nothing.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates: Vec<Predicate<'_>> = Vec::new();

        if let Some(name) = self.name.as_deref() {
            predicates.push(Box::new(move |ship: &Ship| ship.name.contains(name)));
        }
        if let Some(planet) = self.planet.as_deref() {
            predicates.push(Box::new(move |ship: &Ship| ship.planet.contains(planet)));
        }
        if let Some(ship_type) = self.ship_type {
            predicates.push(Box::new(move |ship: &Ship| ship.ship_type == ship_type));
        }
        if let Some(after) = self.after {
            predicates.push(Box::new(move |ship: &Ship| {
                ship.prod_date.timestamp_millis() >= after
            }));
        }
        if let Some(before) = self.before {
            predicates.push(Box::new(move |ship: &Ship| {
                ship.prod_date.timestamp_millis() <= before
            }));
        }
        if let Some(is_used) = self.is_used {
            predicates.push(Box::new(move |ship: &Ship| ship.is_used == is_used));
        }
        if let Some(min_speed) = self.min_speed {
            predicates.push(Box::new(move |ship: &Ship| ship.speed >= min_speed));
        }
        if let Some(max_speed) = self.max_speed {
            predicates.push(Box::new(move |ship: &Ship| ship.speed <= max_speed));
        }
        if let Some(min_crew) = self.min_crew_size {
            predicates.push(Box::new(move |ship: &Ship| ship.crew_size >= min_crew));
        }
        if let Some(max_crew) = self.max_crew_size {
            predicates.push(Box::new(move |ship: &Ship| ship.crew_size <= max_crew));
        }
        if let Some(min_rating) = self.min_rating {
            predicates.push(Box::new(move |ship: &Ship| ship.rating >= min_rating));
        }
        if let Some(max_rating) = self.max_rating {
            predicates.push(Box::new(move |ship: &Ship| ship.rating <= max_rating));
        }

        predicates
    }

    /// Single pass over `ships`, keeping the original relative order.
    pub fn apply<'s>(&self, ships: &'s [Ship]) -> Vec<&'s Ship> {
        let predicates = self.predicates();
        ships
            .iter()
            .filter(|ship| predicates.iter().all(|predicate| predicate(*ship)))
            .collect()
    }
}

/// Field used to order listing results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKey {
    #[default]
    Id,
    Speed,
    #[serde(rename = "DATE")]
    ProdDate,
    Rating,
}

impl OrderKey {
    /// Resolve a wire or field name; absent and unrecognized keys order by id.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("SPEED") | Some("speed") => Self::Speed,
            Some("DATE") | Some("prodDate") => Self::ProdDate,
            Some("RATING") | Some("rating") => Self::Rating,
            _ => Self::Id,
        }
    }

    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Speed => "speed",
            Self::ProdDate => "prodDate",
            Self::Rating => "rating",
        }
    }

    pub fn compare(self, left: &Ship, right: &Ship) -> Ordering {
        match self {
            Self::Id => left.id.cmp(&right.id),
            Self::Speed => left.speed.total_cmp(&right.speed),
            Self::ProdDate => left.prod_date.cmp(&right.prod_date),
            Self::Rating => left.rating.total_cmp(&right.rating),
        }
    }
}

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: Option<usize>, size: Option<usize>) -> Self {
        Self {
            number: number.unwrap_or(DEFAULT_PAGE_NUMBER),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Index range of this page clipped to `len`. Pages past the end are empty.
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self
            .number
            .checked_mul(self.size)
            .map_or(len, |start| start.min(len));
        let end = start.saturating_add(self.size).min(len);
        start..end
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Full listing request: filters, ordering, and page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipQuery {
    pub filter: ShipFilter,
    pub order: OrderKey,
    pub page: PageRequest,
}

/// Filter, stably sort, then slice out the requested page.
pub fn list(ships: &[Ship], filter: &ShipFilter, order: OrderKey, page: PageRequest) -> Vec<Ship> {
    let mut working_set = filter.apply(ships);
    working_set.sort_by(|left, right| order.compare(left, right));

    let window = page.window(working_set.len());
    working_set[window].iter().map(|ship| Ship::clone(ship)).collect()
}

/// Number of ships satisfying `filter`; same working set as [`list`] before paging.
pub fn count(ships: &[Ship], filter: &ShipFilter) -> usize {
    filter.apply(ships).len()
}
