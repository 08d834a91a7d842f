use crate::error::{OrgTreeError, Result};
use crate::types::SortOrder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "orgtree.yaml";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Backend {
    type Err = OrgTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            _ => Err(OrgTreeError::UnknownVariant {
                kind: "backend",
                value: s.to_string(),
            }),
        }
    }
}

/// Connection parameters for the edge store. `path` applies to SQLite, the
/// remaining fields to Postgres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("orgtree.db")
}

fn default_database() -> String {
    "EmployeeStructure".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_password() -> String {
    "postgres".to_string()
}

fn default_host() -> String {
    "db".to_string()
}

fn default_port() -> u16 {
    5432
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_db_path(),
            database: default_database(),
            user: default_user(),
            password: default_password(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl StoreConfig {
    /// Short description for log lines; never includes the password.
    pub fn describe(&self) -> String {
        match self.backend {
            Backend::Sqlite => format!("sqlite:{}", self.path.display()),
            Backend::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl OutputConfig {
    pub fn html_path(&self) -> PathBuf {
        self.dir.join("tree.html")
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join("tree.json")
    }
}

// ---------------------------------------------------------------------------
// RenderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub order: SortOrder,
    /// Delay between console lines in milliseconds.
    #[serde(default)]
    pub pace_ms: u64,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_depth() -> u32 {
    64
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            order: SortOrder::default(),
            pace_ms: 0,
            max_depth: default_max_depth(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            store: StoreConfig::default(),
            output: OutputConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OrgTreeError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(OrgTreeError::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.output.dir.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "output.dir is empty".to_string(),
            });
        }

        if self.render.max_depth == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "render.max_depth=0 rejects every subordinate".to_string(),
            });
        }

        if self.render.pace_ms > 10_000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "render.pace_ms={} (>10s per line is unusual)",
                    self.render.pace_ms
                ),
            });
        }

        match self.store.backend {
            Backend::Sqlite => {
                if self.store.path.as_os_str().is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: "store.path is empty for the sqlite backend".to_string(),
                    });
                }
            }
            Backend::Postgres => {
                if self.store.host.trim().is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: "store.host is empty for the postgres backend".to_string(),
                    });
                }
                if self.store.database.trim().is_empty() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: "store.database is empty for the postgres backend".to_string(),
                    });
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/orgtree.yaml")).unwrap();
        assert_eq!(cfg.version, 1);
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.store.backend, Backend::Sqlite);
        assert_eq!(parsed.store.port, 5432);
        assert_eq!(parsed.output.dir, PathBuf::from("data"));
        assert_eq!(parsed.render.order, SortOrder::Numeric);
        assert_eq!(parsed.render.max_depth, 64);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let err = Config::load(Path::new("/nonexistent/orgtree.yaml")).unwrap_err();
        assert!(matches!(err, OrgTreeError::ConfigNotFound(_)));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = r#"
store:
  backend: postgres
  host: localhost
render:
  order: lexicographic
  pace_ms: 1000
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.store.backend, Backend::Postgres);
        assert_eq!(cfg.store.host, "localhost");
        assert_eq!(cfg.store.database, "EmployeeStructure");
        assert_eq!(cfg.render.order, SortOrder::Lexicographic);
        assert_eq!(cfg.render.pace_ms, 1000);
        assert_eq!(cfg.render.max_depth, 64);
        assert_eq!(cfg.output.json_path(), PathBuf::from("data/tree.json"));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/orgtree.yaml");
        let mut cfg = Config::default();
        cfg.output.dir = PathBuf::from("out");
        cfg.render.pace_ms = 250;
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.output.dir, PathBuf::from("out"));
        assert_eq!(loaded.render.pace_ms, 250);
    }

    #[test]
    fn describe_hides_password() {
        let store = StoreConfig {
            backend: Backend::Postgres,
            password: "hunter2".into(),
            ..StoreConfig::default()
        };
        let d = store.describe();
        assert_eq!(d, "postgres://postgres@db:5432/EmployeeStructure");
        assert!(!d.contains("hunter2"));
    }

    #[test]
    fn validate_default_is_clean() {
        let cfg = Config::load_or_default(Path::new("/nonexistent")).unwrap();
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_zero_depth_is_error() {
        let mut cfg = Config::default();
        cfg.render.max_depth = 0;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("max_depth")));
    }

    #[test]
    fn validate_slow_pacing_warning() {
        let mut cfg = Config::default();
        cfg.render.pace_ms = 60_000;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Warning && w.message.contains("pace_ms=60000")));
    }

    #[test]
    fn validate_postgres_without_host() {
        let mut cfg = Config::default();
        cfg.store.backend = Backend::Postgres;
        cfg.store.host = " ".into();
        assert!(cfg
            .validate()
            .iter()
            .any(|w| w.message.contains("store.host")));
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("postgresql".parse::<Backend>().unwrap(), Backend::Postgres);
        assert!("mysql".parse::<Backend>().is_err());
    }
}
