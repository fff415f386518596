//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - animals(id, age_upon_outcome, animal_id, animal_type, breed, color,
//!   date_of_birth, datetime, monthyear, name, outcome_subtype,
//!   outcome_type, sex_upon_outcome, location_lat, location_long,
//!   age_upon_outcome_in_weeks)

pub mod animals;
pub mod schema;

pub use animals::AnimalStore;
