//! Process configuration read from `TRAVELBLOG_*` environment variables.

use axum::http::HeaderValue;
use std::{fmt::Display, path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::{debug, warn};

use travelblog_core::record::RecordId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Fs,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fs" => Ok(Self::Fs),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend `{other}`, expected `fs` or `memory`")),
        }
    }
}

/// What deleting an absent record answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Deleting an absent id succeeds without changing anything.
    #[default]
    Idempotent,
    /// Deleting an absent id is a 404.
    Strict,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idempotent" => Ok(Self::Idempotent),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown delete policy `{other}`, expected `idempotent` or `strict`"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    pub data_dir: PathBuf,
    pub users_file: String,
    pub posts_file: String,
    pub create_missing: bool,
    pub delete_policy: DeletePolicy,
    /// Identity used when a request names no user. `None` disables the fallback.
    pub demo_user_id: Option<RecordId>,
    /// Single allowed CORS origin. `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value set for a key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let demo_user_id: String = try_load(&lookup, "TRAVELBLOG_DEMO_USER_ID", "1")?;

        let cors_origin = lookup("TRAVELBLOG_CORS_ORIGIN")
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|e| ConfigError::Invalid {
                    key: "TRAVELBLOG_CORS_ORIGIN".into(),
                    value: origin.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            host: try_load(&lookup, "TRAVELBLOG_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "TRAVELBLOG_PORT", "5000")?,
            backend: try_load(&lookup, "TRAVELBLOG_BACKEND", "fs")?,
            data_dir: try_load(&lookup, "TRAVELBLOG_DATA_DIR", "data")?,
            users_file: try_load(&lookup, "TRAVELBLOG_USERS_FILE", "users.json")?,
            posts_file: try_load(&lookup, "TRAVELBLOG_POSTS_FILE", "posts.json")?,
            create_missing: try_load(&lookup, "TRAVELBLOG_CREATE_MISSING", "true")?,
            delete_policy: try_load(&lookup, "TRAVELBLOG_DELETE_POLICY", "idempotent")?,
            demo_user_id: (!demo_user_id.is_empty()).then(|| RecordId::new(demo_user_id)),
            cors_origin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_string()
    });

    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");

            Err(ConfigError::Invalid {
                key: key.to_string(),
                value,
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.backend, BackendKind::Fs);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.users_file, "users.json");
        assert_eq!(config.posts_file, "posts.json");
        assert!(config.create_missing);
        assert_eq!(config.delete_policy, DeletePolicy::Idempotent);
        assert_eq!(config.demo_user_id, Some(RecordId::from("1")));
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("TRAVELBLOG_PORT", "8080"),
            ("TRAVELBLOG_BACKEND", "memory"),
            ("TRAVELBLOG_POSTS_FILE", "data.json"),
            ("TRAVELBLOG_CREATE_MISSING", "false"),
            ("TRAVELBLOG_DELETE_POLICY", "strict"),
            ("TRAVELBLOG_DEMO_USER_ID", ""),
            ("TRAVELBLOG_CORS_ORIGIN", "https://blog.example"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.posts_file, "data.json");
        assert!(!config.create_missing);
        assert_eq!(config.delete_policy, DeletePolicy::Strict);
        assert_eq!(config.demo_user_id, None);
        assert_eq!(
            config.cors_origin,
            Some(HeaderValue::from_static("https://blog.example"))
        );
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_from(&[("TRAVELBLOG_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("TRAVELBLOG_PORT"));

        let err = config_from(&[("TRAVELBLOG_DELETE_POLICY", "sometimes")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == "TRAVELBLOG_DELETE_POLICY"));
    }
}
