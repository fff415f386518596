//! Database schema definitions

/// The full `animals` column set, in declared order
///
/// Every read selects exactly these columns so record shape stays stable
/// regardless of how the table was created or altered.
pub const COLUMNS: [&str; 16] = [
    "id",
    "age_upon_outcome",
    "animal_id",
    "animal_type",
    "breed",
    "color",
    "date_of_birth",
    "datetime",
    "monthyear",
    "name",
    "outcome_subtype",
    "outcome_type",
    "sex_upon_outcome",
    "location_lat",
    "location_long",
    "age_upon_outcome_in_weeks",
];

/// Business columns, i.e. everything except the surrogate `id`
pub const BUSINESS_COLUMNS: [&str; 15] = [
    "age_upon_outcome",
    "animal_id",
    "animal_type",
    "breed",
    "color",
    "date_of_birth",
    "datetime",
    "monthyear",
    "name",
    "outcome_subtype",
    "outcome_type",
    "sex_upon_outcome",
    "location_lat",
    "location_long",
    "age_upon_outcome_in_weeks",
];

/// SQL to create the animals table
pub const CREATE_ANIMALS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS animals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    age_upon_outcome TEXT,
    animal_id TEXT,
    animal_type TEXT,
    breed TEXT,
    color TEXT,
    date_of_birth TEXT,
    datetime TEXT,
    monthyear TEXT,
    name TEXT,
    outcome_subtype TEXT,
    outcome_type TEXT,
    sex_upon_outcome TEXT,
    location_lat REAL,
    location_long REAL,
    age_upon_outcome_in_weeks REAL
)
"#;

/// SQL to create indexes
///
/// `animal_type` is the dashboard's filter field and `breed` feeds the
/// distribution chart.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_animals_type ON animals(animal_type)",
    "CREATE INDEX IF NOT EXISTS idx_animals_breed ON animals(breed)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_ANIMALS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_sets_agree() {
        assert_eq!(COLUMNS[0], "id");
        assert_eq!(&COLUMNS[1..], &BUSINESS_COLUMNS[..]);
        for col in BUSINESS_COLUMNS {
            assert!(CREATE_ANIMALS_TABLE.contains(col));
        }
    }
}
