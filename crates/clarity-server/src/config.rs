use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use clarity_engine::ranker::DEFAULT_MAX_AGE_HOURS;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub default_max_age_hours: f64,
    pub seed_demo: bool,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys take their defaults;
    /// set but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("CLARITY_HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = match lookup("CLARITY_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CLARITY_PORT is not a port: {raw:?}"))?,
            None => 3000,
        };

        let db_path = PathBuf::from(lookup("CLARITY_DB_PATH").unwrap_or_else(|| "clarity.db".into()));

        let default_max_age_hours = match lookup("CLARITY_MAX_AGE_HOURS") {
            Some(raw) => {
                let hours: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("CLARITY_MAX_AGE_HOURS is not a number: {raw:?}"))?;
                if !hours.is_finite() {
                    bail!("CLARITY_MAX_AGE_HOURS must be finite, got {raw:?}");
                }
                hours
            }
            None => DEFAULT_MAX_AGE_HOURS,
        };

        let seed_demo = match lookup("CLARITY_SEED_DEMO") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("CLARITY_SEED_DEMO is not a boolean: {raw:?}"))?,
            None => true,
        };

        let static_dir = lookup("CLARITY_STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            db_path,
            default_max_age_hours,
            seed_demo,
            static_dir,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.db_path, PathBuf::from("clarity.db"));
        assert_eq!(config.default_max_age_hours, 72.0);
        assert!(config.seed_demo);
        assert_eq!(config.static_dir, None);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("CLARITY_HOST", "127.0.0.1"),
            ("CLARITY_PORT", "8080"),
            ("CLARITY_DB_PATH", ":memory:"),
            ("CLARITY_MAX_AGE_HOURS", "24.5"),
            ("CLARITY_SEED_DEMO", "off"),
            ("CLARITY_STATIC_DIR", "public"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from(":memory:"));
        assert_eq!(config.default_max_age_hours, 24.5);
        assert!(!config.seed_demo);
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(config_from(&[("CLARITY_PORT", "eighty")]).is_err());
        assert!(config_from(&[("CLARITY_PORT", "70000")]).is_err());
    }

    #[test]
    fn invalid_window_is_an_error() {
        assert!(config_from(&[("CLARITY_MAX_AGE_HOURS", "soon")]).is_err());
        assert!(config_from(&[("CLARITY_MAX_AGE_HOURS", "NaN")]).is_err());
    }

    #[test]
    fn non_positive_window_is_accepted() {
        let config = config_from(&[("CLARITY_MAX_AGE_HOURS", "0")]).unwrap();
        assert_eq!(config.default_max_age_hours, 0.0);
    }

    #[test]
    fn invalid_seed_flag_is_an_error() {
        assert!(config_from(&[("CLARITY_SEED_DEMO", "maybe")]).is_err());
        assert!(!config_from(&[("CLARITY_SEED_DEMO", "FALSE")]).unwrap().seed_demo);
    }

    #[test]
    fn blank_static_dir_is_unset() {
        let config = config_from(&[("CLARITY_STATIC_DIR", "  ")]).unwrap();
        assert_eq!(config.static_dir, None);
    }
}
