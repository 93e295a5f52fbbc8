use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::SearchOptions;
use crate::storage::schema::MAX_STORED_RATING;
use crate::Result;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_RATING_SCALE: f64 = 5.0;
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "MORAMA_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// chrono strftime pattern used when printing dates
    pub date_format: String,
    pub rating_scale: f64,
    pub show_emojis: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            rating_scale: DEFAULT_RATING_SCALE,
            show_emojis: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub fuzzy_match: bool,
    pub case_sensitive: bool,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_match: true,
            case_sensitive: false,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(search: &SearchConfig) -> Self {
        Self {
            fuzzy: search.fuzzy_match,
            case_sensitive: search.case_sensitive,
            max_results: search.max_results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub search: SearchConfig,
    pub debug_mode: bool,
    /// Adjustments made while loading, reported once logging is up
    #[serde(skip)]
    pub notices: Vec<String>,
}

impl Config {
    /// Load the config at `path`, writing the defaults first if it is missing
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&contents)?
        };
        Ok(config.merge_with_defaults())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Replace zero or unusable values with their defaults
    fn merge_with_defaults(mut self) -> Self {
        if self.display.date_format.is_empty() {
            self.display.date_format = DEFAULT_DATE_FORMAT.to_string();
        } else if !is_valid_date_format(&self.display.date_format) {
            self.notices.push(format!(
                "invalid display.date_format {:?}, using {:?}",
                self.display.date_format, DEFAULT_DATE_FORMAT
            ));
            self.display.date_format = DEFAULT_DATE_FORMAT.to_string();
        }

        if self.display.rating_scale <= 0.0 || !self.display.rating_scale.is_finite() {
            self.display.rating_scale = DEFAULT_RATING_SCALE;
        } else if self.display.rating_scale > MAX_STORED_RATING {
            self.notices.push(format!(
                "display.rating_scale {} exceeds {}, capping",
                self.display.rating_scale, MAX_STORED_RATING
            ));
            self.display.rating_scale = MAX_STORED_RATING;
        }

        if self.search.max_results == 0 {
            self.search.max_results = DEFAULT_MAX_RESULTS;
        }

        self
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::from(&self.search)
    }
}

/// A pattern is usable only if it renders a zone-less timestamp.
///
/// Timezone specifiers such as `%z` parse fine but fail on `NaiveDateTime`.
fn is_valid_date_format(format: &str) -> bool {
    use std::fmt::Write;
    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDateTime::default().format(format)).is_ok()
}

/// `~/.morama`, or `$MORAMA_HOME` when set
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(".morama"))
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "could not determine home directory")
                .into()
        })
}

pub fn config_path_in(base: &Path) -> PathBuf {
    base.join("config.yaml")
}

pub fn database_path_in(base: &Path) -> PathBuf {
    base.join("morama.db")
}

pub fn log_dir_in(base: &Path) -> PathBuf {
    base.join("logs")
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
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
    fn test_missing_file_written_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(&dir.path().join("fresh"));

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("rating_scale: 5.0"));
        assert!(written.contains("max_results: 50"));
        assert!(!written.contains("notices"));
    }

    #[test]
    fn test_missing_keys_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(dir.path());
        std::fs::write(&path, "display:\n  show_emojis: false\ndebug_mode: true\n").unwrap();

        let config = Config::load_or_init(&path).unwrap();
        assert!(!config.display.show_emojis);
        assert!(config.debug_mode);
        assert_eq!(config.display.rating_scale, 5.0);
        assert_eq!(config.display.date_format, "%Y-%m-%d");
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_zero_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(dir.path());
        std::fs::write(
            &path,
            "display:\n  date_format: ''\n  rating_scale: 0\nsearch:\n  max_results: 0\n",
        )
        .unwrap();

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.display.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.display.rating_scale, DEFAULT_RATING_SCALE);
        assert_eq!(config.search.max_results, DEFAULT_MAX_RESULTS);
        assert!(config.notices.is_empty());
    }

    #[test]
    fn test_unusable_values_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(dir.path());
        std::fs::write(
            &path,
            "display:\n  date_format: '%Q'\n  rating_scale: 10\n",
        )
        .unwrap();

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.display.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.display.rating_scale, 5.0);
        assert_eq!(config.notices.len(), 2);
    }

    #[test]
    fn test_timezone_date_format_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(dir.path());
        std::fs::write(&path, "display:\n  date_format: '%Y %z'\n").unwrap();

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.display.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.notices.len(), 1);
        assert!(config.notices[0].contains("%Y %z"));
    }

    #[test]
    fn test_date_format_validation() {
        assert!(is_valid_date_format("%Y-%m-%d"));
        assert!(is_valid_date_format("%b %d, %Y %H:%M"));
        assert!(!is_valid_date_format("%Q"));
        assert!(!is_valid_date_format("%Z"));
        assert!(!is_valid_date_format("%:z"));
    }

    #[test]
    fn test_custom_values_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(dir.path());
        let mut config = Config::default();
        config.display.date_format = "%b %d, %Y".to_string();
        config.display.rating_scale = 4.0;
        config.search.case_sensitive = true;
        config.save(&path).unwrap();

        let loaded = Config::load_or_init(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.search_options().case_sensitive);
    }

    #[test]
    fn test_malformed_yaml_is_system_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path_in(dir.path());
        std::fs::write(&path, "display: [not, a, map").unwrap();

        let err = Config::load_or_init(&path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::System);
    }
}
