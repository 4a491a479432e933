//! Runtime configuration read from the environment (and `.env`, when present).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_EXPORT_DIR: &str = "./exports";
const DEFAULT_PRINT_OPENER: &str = "xdg-open";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{present} is set but {missing} is not; set both or neither")]
    PartialSupabase {
        present: &'static str,
        missing: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub export_dir: PathBuf,
    pub print_opener: String,
    pub supabase: Option<SupabaseConfig>,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            print_opener: DEFAULT_PRINT_OPENER.to_string(),
            supabase: None,
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::PartialSupabase {
                    present: "SUPABASE_URL",
                    missing: "SUPABASE_ANON_KEY",
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::PartialSupabase {
                    present: "SUPABASE_ANON_KEY",
                    missing: "SUPABASE_URL",
                })
            }
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            export_dir: get("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            print_opener: get("PRINT_OPENER").unwrap_or_else(|| DEFAULT_PRINT_OPENER.to_string()),
            supabase,
            cors_origins,
        })
    }
}
