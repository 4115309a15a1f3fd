// src/bin/seed.rs
// Loads restroom records from a JSON file into the database.
// Usage: cargo run --bin seed -- [path/to/restrooms.json]
// Run the server once first so the tables exist.

use anyhow::{Context, Result};
use dotenv::dotenv;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::env;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_DATA_FILE: &str = "data/restrooms.json";

#[derive(Debug, Deserialize)]
struct SeedRestroom {
    building_name: String,
    floor: i32,
    #[serde(default)]
    is_men: bool,
    #[serde(default)]
    is_women: bool,
    #[serde(default)]
    is_accessible: bool,
    #[serde(default)]
    is_bum_gun: bool,
    #[serde(default)]
    is_toilet_paper: bool,
    #[serde(default = "default_true")]
    is_free: bool,
    latitude: String,
    longitude: String,
    faculty_name: Option<String>,
    opening_hours_monday: Option<String>,
    opening_hours_tuesday: Option<String>,
    opening_hours_wednesday: Option<String>,
    opening_hours_thursday: Option<String>,
    opening_hours_friday: Option<String>,
    opening_hours_saturday: Option<String>,
    opening_hours_sunday: Option<String>,
}

fn default_true() -> bool {
    true
}

fn parse_seed(raw: &str) -> Result<Vec<SeedRestroom>> {
    serde_json::from_str(raw).context("seed file is not a JSON array of restrooms")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info,sqlx=warn");
    }
    env_logger::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("{}🚻 Seeding restrooms from {}{}", CYAN, path, RESET);

    let raw = std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path))?;
    let restrooms = parse_seed(&raw)?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("cannot connect to database")?;

    let mut inserted = 0u64;
    let mut skipped = 0u64;

    for r in &restrooms {
        let result = sqlx::query(
            r#"
            INSERT INTO restrooms (
                building_name, floor, is_men, is_women, is_accessible, is_bum_gun,
                is_toilet_paper, is_free, latitude, longitude, faculty_name,
                opening_hours_monday, opening_hours_tuesday, opening_hours_wednesday,
                opening_hours_thursday, opening_hours_friday, opening_hours_saturday,
                opening_hours_sunday
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
            WHERE NOT EXISTS (
                SELECT 1 FROM restrooms WHERE building_name = $1 AND floor = $2
            )
            "#,
        )
        .bind(&r.building_name)
        .bind(r.floor)
        .bind(r.is_men)
        .bind(r.is_women)
        .bind(r.is_accessible)
        .bind(r.is_bum_gun)
        .bind(r.is_toilet_paper)
        .bind(r.is_free)
        .bind(&r.latitude)
        .bind(&r.longitude)
        .bind(&r.faculty_name)
        .bind(&r.opening_hours_monday)
        .bind(&r.opening_hours_tuesday)
        .bind(&r.opening_hours_wednesday)
        .bind(&r.opening_hours_thursday)
        .bind(&r.opening_hours_friday)
        .bind(&r.opening_hours_saturday)
        .bind(&r.opening_hours_sunday)
        .execute(&pool)
        .await
        .with_context(|| format!("insert failed for {} floor {}", r.building_name, r.floor))?;

        if result.rows_affected() > 0 {
            inserted += 1;
            log::info!("Added {} (floor {})", r.building_name, r.floor);
        } else {
            skipped += 1;
            log::debug!("Already present: {} (floor {})", r.building_name, r.floor);
        }
    }

    pool.close().await;

    println!("\n{}📋 Summary{}", BOLD, RESET);
    println!("  • Inserted: {}{}{}", GREEN, inserted, RESET);
    println!("  • Already present: {}{}{}", YELLOW, skipped, RESET);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_defaults() {
        let raw = r#"[{
            "building_name": "Engineering 1",
            "floor": 2,
            "is_women": true,
            "latitude": "13.7367",
            "longitude": "100.5331"
        }]"#;

        let parsed = parse_seed(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].is_free);
        assert!(parsed[0].is_women);
        assert!(!parsed[0].is_men);
        assert!(parsed[0].faculty_name.is_none());
    }

    #[test]
    fn test_parse_seed_rejects_object() {
        assert!(parse_seed(r#"{"building_name": "x"}"#).is_err());
    }

    #[test]
    fn test_bundled_data_file_parses() {
        let raw = include_str!("../../data/restrooms.json");
        let parsed = parse_seed(raw).unwrap();
        assert!(!parsed.is_empty());
    }
}
