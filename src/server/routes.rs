use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::record::{FieldMap, Record};
use crate::server::AppState;

/// Row cap for the dashboard table and marker layer
const TABLE_ROW_LIMIT: usize = 10;

#[derive(Deserialize)]
pub struct AnimalParams {
    pub animal_type: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct BreedCount {
    pub breed: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct Marker {
    pub lat: f64,
    pub long: f64,
    pub breed: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

fn internal_error(err: crate::Error) -> RouteError {
    tracing::error!("store error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Build the equality filter the dashboard queries with
fn type_filter(params: &AnimalParams) -> Option<FieldMap> {
    params
        .animal_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| FieldMap::new().with("animal_type", t))
}

fn read_filtered(state: &AppState, params: &AnimalParams) -> crate::Result<Vec<Record>> {
    let filter = type_filter(params);
    state.store.read(filter.as_ref())
}

/// Aggregate records into a breed -> count distribution, largest first
pub(crate) fn breed_counts(records: &[Record]) -> Vec<BreedCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        let breed = record
            .get("breed")
            .and_then(|v| v.as_text())
            .unwrap_or("Unknown");
        *counts.entry(breed).or_default() += 1;
    }

    let mut distribution: Vec<BreedCount> = counts
        .into_iter()
        .map(|(breed, count)| BreedCount {
            breed: breed.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count));
    distribution
}

/// Project records onto geo markers, dropping rows without coordinates
pub(crate) fn markers_from(records: &[Record]) -> Vec<Marker> {
    records
        .iter()
        .filter_map(|record| {
            let lat = record.get("location_lat")?.as_real()?;
            let long = record.get("location_long")?.as_real()?;
            let breed = record
                .get("breed")
                .and_then(|v| v.as_text())
                .unwrap_or("Unknown")
                .to_string();
            Some(Marker { lat, long, breed })
        })
        .collect()
}

pub async fn handle_animals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnimalParams>,
) -> Result<Json<Vec<Record>>, RouteError> {
    let mut records = read_filtered(&state, &params).map_err(internal_error)?;
    records.truncate(params.limit.unwrap_or(TABLE_ROW_LIMIT));
    Ok(Json(records))
}

pub async fn handle_breeds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnimalParams>,
) -> Result<Json<Vec<BreedCount>>, RouteError> {
    let records = read_filtered(&state, &params).map_err(internal_error)?;
    Ok(Json(breed_counts(&records)))
}

pub async fn handle_markers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnimalParams>,
) -> Result<Json<Vec<Marker>>, RouteError> {
    let mut records = read_filtered(&state, &params).map_err(internal_error)?;
    records.truncate(params.limit.unwrap_or(TABLE_ROW_LIMIT));
    Ok(Json(markers_from(&records)))
}

pub async fn handle_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, RouteError> {
    let types = state.store.animal_types().map_err(internal_error)?;
    Ok(Json(types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AnimalStore;

    fn seeded_store() -> (tempfile::TempDir, AnimalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AnimalStore::open(dir.path().join("animals.db"));
        store.ensure_schema().unwrap();
        for (breed, lat) in [("Beagle", Some(30.1)), ("Beagle", Some(30.2)), ("Poodle", None)] {
            store
                .create(
                    &FieldMap::new()
                        .with("animal_type", "Dog")
                        .with("breed", breed)
                        .with("location_lat", crate::record::Value::from(lat))
                        .with("location_long", -97.7),
                )
                .unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_type_filter_ignores_blank() {
        let params = AnimalParams {
            animal_type: Some(String::new()),
            limit: None,
        };
        assert!(type_filter(&params).is_none());

        let params = AnimalParams {
            animal_type: Some("Cat".to_string()),
            limit: None,
        };
        let filter = type_filter(&params).unwrap();
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_breed_counts_sorted_desc() {
        let (_dir, store) = seeded_store();
        let records = store.read(None).unwrap();

        let counts = breed_counts(&records);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].breed, "Beagle");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_markers_skip_missing_coordinates() {
        let (_dir, store) = seeded_store();
        let records = store.read(None).unwrap();

        let markers = markers_from(&records);
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m.breed == "Beagle"));
    }
}
