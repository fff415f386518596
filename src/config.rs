use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment override for the database location
pub const DB_ENV_VAR: &str = "SHELTERDASH_DB";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub row_limit: Option<usize>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("shelterdash.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("shelterdash.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DashConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DashConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Resolve the database path: CLI flag, then environment, then config file,
/// then the default next to the working directory
pub fn resolve_database(cli: Option<PathBuf>, config: Option<&DashConfig>) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    if let Ok(path) = std::env::var(DB_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Some(path) = config.and_then(|c| c.database.as_deref()) {
        return PathBuf::from(path);
    }
    default_database_path()
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("shelterdash.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelterdash.toml");
        std::fs::write(&path, "database = \"data/animals.db\"\nport = 9000\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("data/animals.db"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.row_limit, None);
    }

    #[test]
    fn test_resolve_database_precedence() {
        let config = DashConfig {
            database: Some("from_config.db".to_string()),
            ..Default::default()
        };

        let cli = Some(PathBuf::from("from_cli.db"));
        assert_eq!(
            resolve_database(cli, Some(&config)),
            PathBuf::from("from_cli.db")
        );
        assert_eq!(
            resolve_database(None, Some(&config)),
            PathBuf::from("from_config.db")
        );
        assert_eq!(resolve_database(None, None), default_database_path());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("animals.db");

        ensure_db_dir(&db_path).unwrap();
        assert!(db_path.parent().unwrap().exists());
    }
}
