//! CRUD store for the animals table
//!
//! Statements are assembled by iterating a [`FieldMap`]'s keys into
//! column/placeholder lists; values are always bound as parameters, never
//! interpolated into the SQL text. Column names are taken from the caller
//! verbatim and not validated against the schema.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::types::ToSql;
use tracing::debug;

use super::schema;
use crate::record::{FieldMap, Record};
use crate::Result;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Data-access facade over the `animals` table
///
/// Holds no open connection: every operation opens its own and drops it
/// before returning, on success and failure paths alike. An empty filter or
/// update set makes a mutation a no-op before any I/O happens; actual
/// connection and statement failures surface as `Err`, so callers can tell
/// "succeeded with zero effect" apart from "failed".
#[derive(Debug, Clone)]
pub struct AnimalStore {
    path: PathBuf,
}

impl AnimalStore {
    /// Create a store for the database at `path`
    ///
    /// No connection is opened here; a missing or unreachable file shows up
    /// as an error on the first operation instead.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn database_path(&self) -> &Path {
        &self.path
    }

    /// Open the per-operation connection
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Create the animals table and indexes if they do not exist
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Insert a new record
    ///
    /// The column list is exactly the mapping's keys. Returns `Ok(false)`
    /// without contacting the database when `fields` is empty.
    pub fn create(&self, fields: &FieldMap) -> Result<bool> {
        if fields.is_empty() {
            return Ok(false);
        }

        let conn = self.connect()?;

        let mut columns = Vec::with_capacity(fields.len());
        let mut placeholders = Vec::with_capacity(fields.len());
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(fields.len());
        for (column, value) in fields.entries() {
            columns.push(column);
            placeholders.push(format!("?{}", params.len() + 1));
            params.push(value as &dyn ToSql);
        }

        let sql = format!(
            "INSERT INTO animals ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        debug!(%sql, "create");

        conn.execute(&sql, params.as_slice())?;
        Ok(true)
    }

    /// Fetch records matching simple equality filters
    ///
    /// Each of the declared columns is selected explicitly so the record
    /// shape stays stable. Filter entries with a null value are skipped, not
    /// turned into IS-NULL predicates; a filter with no usable entries reads
    /// the whole table. Row order is whatever the engine yields.
    pub fn read(&self, filter: Option<&FieldMap>) -> Result<Vec<Record>> {
        let conn = self.connect()?;

        let mut sql = format!("SELECT {} FROM animals", schema::COLUMNS.join(", "));
        let mut predicates = Vec::new();
        let mut params: Vec<&dyn ToSql> = Vec::new();

        if let Some(filter) = filter {
            for (column, value) in filter.entries() {
                if value.is_null() {
                    continue;
                }
                predicates.push(format!("{} = ?{}", column, params.len() + 1));
                params.push(value as &dyn ToSql);
            }
        }

        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
        debug!(%sql, "read");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), |row| {
            Record::from_row(row, &schema::COLUMNS)
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Update rows matching `filter` with `new_values`
    ///
    /// Returns the engine-reported modified-row count. `Ok(0)` without
    /// contacting the database when either mapping is empty, or when every
    /// filter entry is null - a filter that degenerates to nothing must not
    /// become a full-table update.
    pub fn update(&self, filter: &FieldMap, new_values: &FieldMap) -> Result<usize> {
        if filter.is_empty() || new_values.is_empty() {
            return Ok(0);
        }

        let mut assignments = Vec::with_capacity(new_values.len());
        let mut predicates = Vec::new();
        let mut params: Vec<&dyn ToSql> = Vec::new();

        for (column, value) in new_values.entries() {
            assignments.push(format!("{} = ?{}", column, params.len() + 1));
            params.push(value as &dyn ToSql);
        }

        for (column, value) in filter.entries() {
            if value.is_null() {
                continue;
            }
            predicates.push(format!("{} = ?{}", column, params.len() + 1));
            params.push(value as &dyn ToSql);
        }

        if predicates.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE animals SET {} WHERE {}",
            assignments.join(", "),
            predicates.join(" AND ")
        );
        debug!(%sql, "update");

        let conn = self.connect()?;
        let modified = conn.execute(&sql, params.as_slice())?;
        Ok(modified)
    }

    /// Delete rows matching `filter`
    ///
    /// Returns the rows-deleted count, `Ok(0)` for an empty filter. Unlike
    /// read and update, null entries are not skipped here: they bind as SQL
    /// NULL, and `col = NULL` matches no rows.
    pub fn delete(&self, filter: &FieldMap) -> Result<usize> {
        if filter.is_empty() {
            return Ok(0);
        }

        let mut predicates = Vec::with_capacity(filter.len());
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(filter.len());
        for (column, value) in filter.entries() {
            predicates.push(format!("{} = ?{}", column, params.len() + 1));
            params.push(value as &dyn ToSql);
        }

        let sql = format!("DELETE FROM animals WHERE {}", predicates.join(" AND "));
        debug!(%sql, "delete");

        let conn = self.connect()?;
        let deleted = conn.execute(&sql, params.as_slice())?;
        Ok(deleted)
    }

    /// Count all rows
    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM animals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct animal types, sorted
    pub fn animal_types(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT animal_type FROM animals WHERE animal_type IS NOT NULL ORDER BY animal_type",
        )?;
        let types = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(types)
    }
}
