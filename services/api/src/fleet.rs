use crate::infra::{parse_date, seed_repository, InMemoryShipRepository};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::Args;
use ship_registry::error::AppError;
use ship_registry::ships::rating::{round_to_hundredths, PROD_YEAR_MAX, PROD_YEAR_MIN};
use ship_registry::ships::{
    compute_rating, FleetImporter, OrderKey, PageRequest, Ship, ShipFilter, ShipQuery,
    ShipRegistryService, ShipType,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct FleetQueryArgs {
    /// Fleet CSV export (name,planet,shipType,prodDate,isUsed,speed,crewSize)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Substring the ship name must contain
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Substring the planet must contain
    #[arg(long)]
    pub(crate) planet: Option<String>,
    /// TRANSPORT, MILITARY, or MERCHANT
    #[arg(long, value_parser = parse_ship_type)]
    pub(crate) ship_type: Option<ShipType>,
    /// Earliest production date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) after: Option<NaiveDate>,
    /// Latest production date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) before: Option<NaiveDate>,
    /// Only used (true) or unused (false) ships
    #[arg(long)]
    pub(crate) is_used: Option<bool>,
    #[arg(long)]
    pub(crate) min_speed: Option<f64>,
    #[arg(long)]
    pub(crate) max_speed: Option<f64>,
    #[arg(long)]
    pub(crate) min_crew_size: Option<u32>,
    #[arg(long)]
    pub(crate) max_crew_size: Option<u32>,
    #[arg(long)]
    pub(crate) min_rating: Option<f64>,
    #[arg(long)]
    pub(crate) max_rating: Option<f64>,
    /// ID, SPEED, DATE, or RATING (defaults to ID)
    #[arg(long)]
    pub(crate) order: Option<String>,
    /// Zero-based page number
    #[arg(long)]
    pub(crate) page_number: Option<usize>,
    /// Ships per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) page_size: Option<u32>,
}

impl FleetQueryArgs {
    fn to_query(&self) -> ShipQuery {
        let filter = ShipFilter {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after.map(start_of_day_millis),
            before: self.before.map(start_of_day_millis),
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        };

        ShipQuery {
            filter,
            order: OrderKey::parse(self.order.as_deref()),
            page: PageRequest::new(self.page_number, self.page_size.map(|size| size as usize)),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RatingArgs {
    /// Maximum speed; rounded half-up to two decimals
    #[arg(long)]
    pub(crate) speed: f64,
    /// Production year
    #[arg(long, value_parser = clap::value_parser!(i32).range(PROD_YEAR_MIN as i64..=PROD_YEAR_MAX as i64))]
    pub(crate) year: i32,
    /// The ship has had previous owners
    #[arg(long)]
    pub(crate) used: bool,
}

pub(crate) fn run_fleet_query(args: FleetQueryArgs) -> Result<(), AppError> {
    let fleet = FleetImporter::from_path(&args.csv)?;
    let repository = Arc::new(InMemoryShipRepository::default());
    seed_repository(repository.as_ref(), fleet)?;
    let service = ShipRegistryService::new(repository);

    let query = args.to_query();
    let total = service.count(&query.filter)?;
    let page = service.list(&query)?;

    render_fleet_page(&query, total, &page);
    Ok(())
}

pub(crate) fn run_rating(args: RatingArgs) -> Result<(), AppError> {
    let speed = round_to_hundredths(args.speed);
    let prod_date = Utc
        .with_ymd_and_hms(args.year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| std::io::Error::other(format!("invalid production year {}", args.year)))?;

    let rating = compute_rating(speed, args.used, prod_date);
    println!(
        "speed {speed:.2}, {} ship from {}: rating {rating:.2}",
        if args.used { "used" } else { "new" },
        args.year
    );
    Ok(())
}

fn render_fleet_page(query: &ShipQuery, total: usize, page: &[Ship]) {
    println!(
        "{total} matching ships; page {} (size {}) ordered by {}",
        query.page.number,
        query.page.size,
        query.order.field_name()
    );

    if page.is_empty() {
        println!("(no ships on this page)");
        return;
    }

    for ship in page {
        println!(
            "- #{} {} | {} | {} | built {} | speed {:.2} | crew {} | {} | rating {:.2}",
            ship.id,
            ship.name,
            ship.planet,
            ship.ship_type.label(),
            ship.prod_date.format("%Y-%m-%d"),
            ship.speed,
            ship.crew_size,
            if ship.is_used { "used" } else { "new" },
            ship.rating
        );
    }
}

fn parse_ship_type(raw: &str) -> Result<ShipType, String> {
    ShipType::parse(raw).ok_or_else(|| {
        format!("unknown ship type '{raw}' (expected TRANSPORT, MILITARY, or MERCHANT)")
    })
}

fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight).timestamp_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_args() -> FleetQueryArgs {
        FleetQueryArgs {
            csv: PathBuf::from("fleet.csv"),
            name: None,
            planet: None,
            ship_type: None,
            after: None,
            before: None,
            is_used: None,
            min_speed: None,
            max_speed: None,
            min_crew_size: None,
            max_crew_size: None,
            min_rating: None,
            max_rating: None,
            order: None,
            page_number: None,
            page_size: None,
        }
    }

    #[test]
    fn query_args_use_listing_defaults() {
        let query = query_args().to_query();
        assert_eq!(query.order, OrderKey::Id);
        assert_eq!(query.page, PageRequest::default());
        assert_eq!(query.filter, ShipFilter::default());
    }

    #[test]
    fn date_bounds_become_epoch_millis() {
        let args = FleetQueryArgs {
            after: NaiveDate::from_ymd_opt(3000, 1, 1),
            order: Some("DATE".to_string()),
            page_size: Some(10),
            ..query_args()
        };

        let query = args.to_query();
        assert_eq!(query.filter.after, Some(32_503_680_000_000));
        assert_eq!(query.order, OrderKey::ProdDate);
        assert_eq!(query.page.size, 10);
    }

    #[test]
    fn fleet_query_runs_against_csv_export() {
        let path = std::env::temp_dir().join(format!("fleet-query-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "name,planet,shipType,prodDate,isUsed,speed,crewSize\n\
             Daedalus,Jupiter,MILITARY,2995-04-12,false,0.3,4500\n\
             Serenity,Neptune,TRANSPORT,3001-04-12,true,0.95,9\n",
        )
        .expect("fixture written");

        let args = FleetQueryArgs {
            csv: path.clone(),
            order: Some("RATING".to_string()),
            ..query_args()
        };
        let result = run_fleet_query(args);
        std::fs::remove_file(&path).ok();

        assert!(result.is_ok(), "query failed: {result:?}");
    }

    #[test]
    fn fleet_query_reports_missing_export() {
        let args = FleetQueryArgs {
            csv: PathBuf::from("/nonexistent/fleet.csv"),
            ..query_args()
        };

        assert!(matches!(run_fleet_query(args), Err(AppError::Import(_))));
    }

    #[test]
    fn ship_types_parse_from_cli_values() {
        assert_eq!(parse_ship_type("military"), Ok(ShipType::Military));
        assert!(parse_ship_type("yacht").is_err());
    }
}
