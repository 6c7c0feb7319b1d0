use axum_extra::extract::cookie::Key;
use figment::{Figment, providers::Env};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::ShowroomError;

/// Environment keys read by [`Config::load`]. Matched case-insensitively.
const ENV_KEYS: &[&str] = &[
    "database_url",
    "supabase_url",
    "supabase_key",
    "listen_addr",
    "loglevel",
    "session_secret",
    "admin_username",
    "admin_password",
    "insecure_cookie",
    "storage_bucket",
    "max_upload_bytes",
];

/// Minimum master secret length accepted by cookie key derivation.
const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub supabase_url: Url,
    pub supabase_key: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    #[serde(default)]
    pub session_secret: Option<String>,
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// Drop the `Secure` attribute from the session cookie (plain http dev setups).
    #[serde(default)]
    pub insecure_cookie: bool,
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_storage_bucket() -> String {
    "product-images".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    /// `DATABASE_URL`, `SUPABASE_URL` and `SUPABASE_KEY` are required; anything
    /// missing is a hard error.
    pub fn load() -> Result<Self, ShowroomError> {
        dotenvy::dotenv().ok();
        Self::from_figment(Figment::from(Env::raw().only(ENV_KEYS)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ShowroomError> {
        let cfg: Config = figment.extract()?;
        if cfg.database_url.trim().is_empty() {
            return Err(ShowroomError::InvalidConfig(
                "DATABASE_URL is empty".to_string(),
            ));
        }
        if cfg.supabase_key.trim().is_empty() {
            return Err(ShowroomError::InvalidConfig(
                "SUPABASE_KEY is empty".to_string(),
            ));
        }
        Ok(cfg)
    }

    /// Key used to encrypt the session cookie.
    ///
    /// Derived from `SESSION_SECRET` when set. Otherwise a random key is
    /// generated, so sessions are invalidated on restart.
    pub fn cookie_key(&self) -> Result<Key, ShowroomError> {
        match self.session_secret.as_deref() {
            Some(secret) if secret.len() >= MIN_SESSION_SECRET_LEN => {
                Ok(Key::derive_from(secret.as_bytes()))
            }
            Some(_) => Err(ShowroomError::InvalidConfig(format!(
                "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes"
            ))),
            None => {
                warn!("SESSION_SECRET not set; generating an ephemeral session key");
                Ok(Key::generate())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Serialized;
    use serde_json::json;

    fn figment_with(value: serde_json::Value) -> Figment {
        Figment::from(Serialized::defaults(value))
    }

    #[test]
    fn missing_required_keys_fail() {
        let err = Config::from_figment(figment_with(json!({
            "database_url": "sqlite:showroom.db",
            "supabase_url": "https://project.supabase.co",
        })))
        .unwrap_err();
        assert!(matches!(err, ShowroomError::Config(_)));
    }

    #[test]
    fn optional_keys_take_defaults() {
        let cfg = Config::from_figment(figment_with(json!({
            "database_url": "sqlite:showroom.db",
            "supabase_url": "https://project.supabase.co",
            "supabase_key": "anon",
        })))
        .unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
        assert_eq!(cfg.admin_username, "admin");
        assert_eq!(cfg.storage_bucket, "product-images");
        assert!(!cfg.insecure_cookie);
        assert!(cfg.session_secret.is_none());
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let cfg = Config::from_figment(figment_with(json!({
            "database_url": "sqlite:showroom.db",
            "supabase_url": "https://project.supabase.co",
            "supabase_key": "anon",
            "session_secret": "too-short",
        })))
        .unwrap();
        assert!(matches!(
            cfg.cookie_key(),
            Err(ShowroomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn dotenv_file_supplies_missing_keys() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                ".env",
                "DATABASE_URL=sqlite:dotenv.db\nSUPABASE_URL=https://dotenv.supabase.co\nSUPABASE_KEY=dotenv-key\n",
            )?;
            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.database_url, "sqlite:dotenv.db");
            assert_eq!(cfg.supabase_key, "dotenv-key");
            Ok(())
        });
    }

    #[test]
    fn env_keys_are_read_case_insensitively() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite:from-env.db");
            jail.set_env("SUPABASE_URL", "https://env.supabase.co");
            jail.set_env("SUPABASE_KEY", "service-key");
            jail.set_env("INSECURE_COOKIE", "true");
            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.database_url, "sqlite:from-env.db");
            assert_eq!(cfg.supabase_key, "service-key");
            assert_eq!(cfg.supabase_url.host_str(), Some("env.supabase.co"));
            assert!(cfg.insecure_cookie);
            Ok(())
        });
    }
}
