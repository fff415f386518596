//! One-time bulk load of the AAC shelter outcomes CSV
//!
//! Provisions the schema, clears the table, and inserts up to `limit` rows
//! in a single transaction. Columns are picked out of the CSV by header
//! name, so extra columns and a different column order in the source file
//! are fine; a missing header is an error.

use std::path::Path;

use indicatif::ProgressBar;
use rusqlite::types::ToSql;
use tracing::info;

use crate::record::Value;
use crate::store::{schema, AnimalStore};
use crate::{Error, Result};

/// Default ingestion cap, matching the dataset slice the dashboard expects
pub const DEFAULT_ROW_LIMIT: usize = 10_000;

/// Columns parsed as REAL; everything else loads as TEXT
const NUMERIC_COLUMNS: [&str; 3] = ["location_lat", "location_long", "age_upon_outcome_in_weeks"];

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_inserted: usize,
}

/// Load `csv_path` into the store's animals table, replacing its contents
pub fn load_csv(store: &AnimalStore, csv_path: &Path, limit: usize) -> Result<LoadSummary> {
    store.ensure_schema()?;

    let mut reader = csv::Reader::from_path(csv_path)?;

    // Map each schema column to its position in this file's header
    let headers = reader.headers()?.clone();
    let mut positions = Vec::with_capacity(schema::BUSINESS_COLUMNS.len());
    for col in schema::BUSINESS_COLUMNS {
        let pos = headers
            .iter()
            .position(|h| h == col)
            .ok_or_else(|| Error::MissingColumn(col.to_string()))?;
        positions.push(pos);
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in reader.records() {
        if rows.len() >= limit {
            break;
        }
        let record = result?;
        let row = positions
            .iter()
            .zip(schema::BUSINESS_COLUMNS)
            .map(|(&pos, col)| parse_field(record.get(pos).unwrap_or(""), col))
            .collect();
        rows.push(row);
    }
    let rows_read = rows.len();
    info!(rows = rows_read, "parsed CSV");

    // Replace the table contents in one transaction so the data stays in a
    // known state even if the insert fails partway
    let conn = rusqlite::Connection::open(store.database_path())?;
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM animals", [])?;

    let placeholders: Vec<String> = (1..=schema::BUSINESS_COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect();
    let sql = format!(
        "INSERT INTO animals ({}) VALUES ({})",
        schema::BUSINESS_COLUMNS.join(", "),
        placeholders.join(", ")
    );

    let pb = if console::Term::stdout().is_term() {
        ProgressBar::new(rows_read as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut rows_inserted = 0;
    {
        let mut stmt = tx.prepare(&sql)?;
        for row in &rows {
            let params: Vec<&dyn ToSql> = row.iter().map(|v| v as &dyn ToSql).collect();
            stmt.execute(params.as_slice())?;
            rows_inserted += 1;
            pb.inc(1);
        }
    }
    tx.commit()?;
    pb.finish_and_clear();

    info!(rows = rows_inserted, "bulk insert committed");
    Ok(LoadSummary {
        rows_read,
        rows_inserted,
    })
}

/// Interpret one CSV field for the given column
///
/// Empty fields become NULL. Numeric columns that fail to parse also become
/// NULL rather than poisoning the whole load.
fn parse_field(raw: &str, column: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if NUMERIC_COLUMNS.contains(&column) {
        return raw.parse::<f64>().map(Value::Real).unwrap_or(Value::Null);
    }
    Value::Text(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldMap;

    const HEADER: &str = "age_upon_outcome,animal_id,animal_type,breed,color,date_of_birth,datetime,monthyear,name,outcome_subtype,outcome_type,sex_upon_outcome,location_lat,location_long,age_upon_outcome_in_weeks";

    fn sample_row(id: &str, animal_type: &str) -> String {
        format!(
            "2 years,{id},{animal_type},Beagle,Tricolor,2015-05-01,2017-05-02 12:00:00,May 2017,Copper,,Adoption,Neutered Male,30.2672,-97.7431,104.5"
        )
    }

    fn write_csv(dir: &Path, lines: &[String]) -> std::path::PathBuf {
        let path = dir.join("outcomes.csv");
        let mut contents = String::from(HEADER);
        for line in lines {
            contents.push('\n');
            contents.push_str(line);
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn test_store() -> (tempfile::TempDir, AnimalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AnimalStore::open(dir.path().join("animals.db"));
        (dir, store)
    }

    #[test]
    fn test_load_happy_path() {
        let (dir, store) = test_store();
        let csv = write_csv(
            dir.path(),
            &[sample_row("A1", "Dog"), sample_row("A2", "Cat")],
        );

        let summary = load_csv(&store, &csv, DEFAULT_ROW_LIMIT).unwrap();
        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.rows_inserted, 2);
        assert_eq!(store.count().unwrap(), 2);

        let records = store
            .read(Some(&FieldMap::new().with("animal_id", "A1")))
            .unwrap();
        assert_eq!(records[0].get("breed").unwrap().as_text(), Some("Beagle"));
        assert_eq!(
            records[0].get("location_lat").unwrap().as_real(),
            Some(30.2672)
        );
        // empty outcome_subtype loads as NULL
        assert!(records[0].get("outcome_subtype").unwrap().is_null());
    }

    #[test]
    fn test_load_respects_row_limit() {
        let (dir, store) = test_store();
        let rows: Vec<String> = (0..5).map(|i| sample_row(&format!("A{i}"), "Dog")).collect();
        let csv = write_csv(dir.path(), &rows);

        let summary = load_csv(&store, &csv, 3).unwrap();
        assert_eq!(summary.rows_inserted, 3);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_reload_replaces_existing_rows() {
        let (dir, store) = test_store();
        let csv = write_csv(dir.path(), &[sample_row("A1", "Dog")]);

        load_csv(&store, &csv, DEFAULT_ROW_LIMIT).unwrap();
        load_csv(&store, &csv, DEFAULT_ROW_LIMIT).unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let (dir, store) = test_store();
        let path = dir.path().join("outcomes.csv");
        std::fs::write(&path, "animal_id,animal_type\nA1,Dog\n").unwrap();

        match load_csv(&store, &path, DEFAULT_ROW_LIMIT) {
            Err(Error::MissingColumn(col)) => assert_eq!(col, "age_upon_outcome"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_coordinates_load_as_null() {
        let (dir, store) = test_store();
        let row = sample_row("A1", "Dog").replace("30.2672", "not-a-number");
        let csv = write_csv(dir.path(), &[row]);

        load_csv(&store, &csv, DEFAULT_ROW_LIMIT).unwrap();
        let records = store.read(None).unwrap();
        assert!(records[0].get("location_lat").unwrap().is_null());
        assert_eq!(
            records[0].get("location_long").unwrap().as_real(),
            Some(-97.7431)
        );
    }
}
