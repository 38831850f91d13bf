use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::info;

/// Environment-driven configuration, loaded once at startup after
/// `dotenvy::dotenv()`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,

    pub mail_server: String,
    pub mail_port: u16,
    pub mail_username: Option<String>,
    pub mail_password: Option<String>,
    pub mail_from_name: String,
    pub mail_use_ssl: bool,
    pub mail_use_tls: bool,

    pub cors_origins: Vec<String>,

    pub upload_folder: PathBuf,
    pub max_upload_size_mb: u64,
    pub static_folder: PathBuf,

    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: require("DATABASE_URL"),
            secret_key: require("SECRET_KEY"),
            mail_server: try_load("MAIL_SERVER", "localhost"),
            mail_port: try_load("MAIL_PORT", "465"),
            mail_username: env::var("MAIL_USERNAME").ok(),
            mail_password: env::var("MAIL_PASSWORD").ok(),
            mail_from_name: try_load("MAIL_FROM_NAME", "LifeTag Support"),
            mail_use_ssl: try_load("MAIL_USE_SSL", "true"),
            mail_use_tls: try_load("MAIL_USE_TLS", "false"),
            cors_origins: split_list(&try_load::<String>(
                "CORS_ORIGINS",
                "http://localhost:5173,http://127.0.0.1:5173",
            )),
            upload_folder: PathBuf::from(try_load::<String>("UPLOAD_FOLDER", "uploads")),
            max_upload_size_mb: try_load("MAX_UPLOAD_SIZE_MB", "16"),
            static_folder: PathBuf::from(try_load::<String>("STATIC_FOLDER", "static")),
            port: try_load("PORT", "8000"),
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

fn require(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .unwrap_or_else(|e| panic!("Invalid {key} value: {e}"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_list_splits_and_trims() {
        assert_eq!(
            split_list("http://a , http://b,,http://c"),
            vec!["http://a", "http://b", "http://c"]
        );
        assert!(split_list("").is_empty());
    }
}
