use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORAGE_ROOT: &str = "/tmp/videoserver";
pub const DEFAULT_API_BASE_PATH: &str = "/v1";
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 2] = ["video/mp4", "video/mpeg"];
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 512 * 1024 * 1024;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup and handed to the components
/// that need it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub storage_root: PathBuf,
    pub reset_storage_on_startup: bool,
    pub api_base_path: String,
    pub allowed_mime_types: Vec<String>,
    pub max_upload_size: usize,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. `from_env` passes
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;
        let max_upload_size = parse_or(
            "MAX_UPLOAD_SIZE",
            lookup("MAX_UPLOAD_SIZE"),
            DEFAULT_MAX_UPLOAD_SIZE,
        )?;
        let reset_storage_on_startup = parse_bool(
            "STORAGE_RESET_ON_STARTUP",
            lookup("STORAGE_RESET_ON_STARTUP"),
            true,
        )?;

        let storage_root = lookup("STORAGE_ROOT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT));

        let api_base_path = normalize_base_path(
            &lookup("API_BASE_PATH").unwrap_or_else(|| DEFAULT_API_BASE_PATH.to_string()),
        );

        let allowed_mime_types = match lookup("ALLOWED_MIME_TYPES") {
            Some(raw) => {
                let types = split_list(&raw)
                    .into_iter()
                    .map(|t| t.to_ascii_lowercase())
                    .collect::<Vec<_>>();
                if types.is_empty() {
                    return Err(ConfigError::Invalid {
                        name: "ALLOWED_MIME_TYPES",
                        value: raw,
                    });
                }
                types
            }
            None => DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| split_list(&raw))
            .filter(|origins| !origins.is_empty());

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            storage_root,
            reset_storage_on_startup,
            api_base_path,
            allowed_mime_types,
            max_upload_size,
            cors_allowed_origins,
        })
    }

    /// Configuration with every optional value at its default, used by tests
    /// and tooling that do not go through the environment.
    pub fn with_storage_root(database_url: impl Into<String>, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: database_url.into(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            storage_root: storage_root.into(),
            reset_storage_on_startup: true,
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            cors_allowed_origins: None,
        }
    }

    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|t| *t == essence)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_bool(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// "" and "/" mount at the root; anything else gets a single leading slash
/// and no trailing one.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/videos")]))
                .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_root, PathBuf::from("/tmp/videoserver"));
        assert!(config.reset_storage_on_startup);
        assert_eq!(config.api_base_path, "/v1");
        assert_eq!(config.allowed_mime_types, vec!["video/mp4", "video/mpeg"]);
        assert_eq!(config.max_upload_size, DEFAULT_MAX_UPLOAD_SIZE);
        assert!(config.cors_allowed_origins.is_none());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/videos"),
            ("PORT", "9000"),
            ("STORAGE_ROOT", "/srv/videos"),
            ("STORAGE_RESET_ON_STARTUP", "false"),
            ("API_BASE_PATH", "api/"),
            ("ALLOWED_MIME_TYPES", "video/mp4, Video/WebM"),
            ("MAX_UPLOAD_SIZE", "1024"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_root, PathBuf::from("/srv/videos"));
        assert!(!config.reset_storage_on_startup);
        assert_eq!(config.api_base_path, "/api");
        assert_eq!(config.allowed_mime_types, vec!["video/mp4", "video/webm"]);
        assert_eq!(config.max_upload_size, 1024);
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn invalid_port_names_the_variable() {
        let err = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/videos"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn root_base_path_mounts_at_root() {
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/v1/"), "/v1");
    }

    #[test]
    fn mime_check_ignores_parameters_and_case() {
        let config = ServerConfig::with_storage_root("postgres://db/videos", "/tmp/x");
        assert!(config.is_mime_type_allowed("video/mp4"));
        assert!(config.is_mime_type_allowed("Video/MP4; codecs=avc1"));
        assert!(!config.is_mime_type_allowed("image/png"));
        assert!(!config.is_mime_type_allowed(""));
    }
}
