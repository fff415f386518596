use tabled::builder::Builder;
use tabled::settings::Style;

use crate::record::Record;

/// Render records as a terminal table, one column per record field
///
/// Column headers come from the first record; all records share the same
/// shape because the store selects a fixed column list.
pub fn records_table(records: &[Record]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    let mut builder = Builder::default();
    builder.push_record(first.columns());
    for record in records {
        builder.push_record(record.values().map(|v| v.to_string()));
    }

    builder.build().with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldMap;
    use crate::store::AnimalStore;

    #[test]
    fn test_empty_records_render_nothing() {
        assert_eq!(records_table(&[]), "");
    }

    #[test]
    fn test_table_has_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnimalStore::open(dir.path().join("animals.db"));
        store.ensure_schema().unwrap();
        store
            .create(&FieldMap::new().with("animal_type", "Dog").with("breed", "Beagle"))
            .unwrap();

        let rendered = records_table(&store.read(None).unwrap());
        assert!(rendered.contains("animal_type"));
        assert!(rendered.contains("Beagle"));
    }
}
