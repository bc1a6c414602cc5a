//! Configuration module for aurora-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables. Also handles admin password hashing.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{
    AdminAccount, MediaConfig, PaymentConfig, ServerConfig, SessionConfig, SharedConfig,
};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Minimum length of the session signing secret in bytes.
const MIN_SESSION_SECRET_LEN: usize = 32;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(#[from] aurora_core::password::PasswordError),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Secrets taken from the environment. They win over the file and are never
/// written back to it.
#[derive(Debug, Clone, Default)]
pub struct SecretOverrides {
    pub stripe_secret_key: Option<String>,
    pub session_secret: Option<String>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
}

impl SecretOverrides {
    fn apply(&self, config: &mut FileConfig) {
        if let Some(key) = non_empty(&self.stripe_secret_key) {
            config.payment.secret_key = key;
        }
        if let Some(secret) = non_empty(&self.session_secret) {
            config.session.secret = secret;
        }

        let cloud_name = non_empty(&self.cloudinary_cloud_name);
        let api_key = non_empty(&self.cloudinary_api_key);
        let api_secret = non_empty(&self.cloudinary_api_secret);
        if cloud_name.is_none() && api_key.is_none() && api_secret.is_none() {
            return;
        }
        let media = config.media.get_or_insert_with(Default::default);
        if let Some(cloud_name) = cloud_name {
            media.cloud_name = cloud_name;
        }
        if let Some(api_key) = api_key {
            media.api_key = api_key;
        }
        if let Some(api_secret) = api_secret {
            media.api_secret = api_secret;
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub payment: PaymentConfig,
    pub media: Option<MediaConfig>,
    pub admin: Option<AdminAccount>,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.session, self.payment, self.media)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
    secrets: SecretOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        listen_override: Option<SocketAddr>,
        secrets: SecretOverrides,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            secrets,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Hash the admin password if it's plaintext (and rewrite the file)
    /// 3. Apply CLI and environment overrides
    /// 4. Validate the configuration
    /// 5. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        // Rewrite before overrides so environment secrets never reach the file
        if !file_config.is_admin_password_hashed() {
            if let Some(admin) = file_config.admin.as_mut() {
                admin.password = aurora_core::password::hash_password(&admin.password)?;
            }
            self.rewrite_config(&file_config)?;
            tracing::info!("Admin password hashed and config file updated");
        }

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        self.secrets.apply(&mut file_config);

        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    ///
    /// Returns a LoadedConfig that can be used to update individual parts
    /// of a SharedConfig.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.session.secret.len() < MIN_SESSION_SECRET_LEN {
        return Err(ConfigError::ValidationError(format!(
            "session secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
        )));
    }
    if config.session.max_age_secs <= 0 {
        return Err(ConfigError::ValidationError(
            "session max_age_secs must be positive".to_string(),
        ));
    }
    if config.payment.secret_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "payment secret_key is not set".to_string(),
        ));
    }
    let currency = &config.payment.currency;
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::ValidationError(format!(
            "currency {currency:?} is not a three-letter code"
        )));
    }
    if config.payment.shipping_cost_minor < 0 {
        return Err(ConfigError::ValidationError(
            "shipping_cost_minor must not be negative".to_string(),
        ));
    }
    let incomplete_media = config.media.as_ref().is_some_and(|media| {
        media.cloud_name.is_empty() || media.api_key.is_empty() || media.api_secret.is_empty()
    });
    if incomplete_media {
        return Err(ConfigError::ValidationError(
            "media section needs cloud_name, api_key and api_secret".to_string(),
        ));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
            allowed_origins: file_config
                .server
                .allowed_origins
                .into_iter()
                .map(|origin| origin.trim_end_matches('/').to_string())
                .collect(),
            frontend_url: file_config
                .server
                .frontend_url
                .trim_end_matches('/')
                .to_string(),
        },
        session: SessionConfig::new(
            file_config.session.secret.into_bytes().into_boxed_slice(),
            file_config.session.max_age_secs,
            file_config.session.secure_cookie,
        ),
        payment: PaymentConfig {
            secret_key: file_config.payment.secret_key,
            currency: file_config.payment.currency.to_ascii_lowercase(),
            shipping_cost_minor: file_config.payment.shipping_cost_minor,
            api_base: file_config.payment.api_base,
        },
        media: file_config.media.map(|m| MediaConfig {
            cloud_name: m.cloud_name,
            api_key: m.api_key,
            api_secret: m.api_secret,
            api_base: m.api_base,
        }),
        admin: file_config.admin.map(|a| AdminAccount {
            email: a.email.trim().to_lowercase(),
            password_hash: a.password,
        }),
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "aurora-config-{}-{name}.toml",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_hashes_admin_password_and_rewrites_file() {
        let path = write_config(
            "admin",
            &format!(
                r#"
[session]
secret = "{SECRET}"

[payment]
secret_key = "sk_test_123"

[admin]
email = "Admin@Example.com"
password = "changeme"
"#
            ),
        );
        let loader = ConfigLoader::new(&path, None, SecretOverrides::default());
        let loaded = loader.load().unwrap();
        let admin = loaded.admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert!(aurora_core::password::verify_password(
            "changeme",
            &admin.password_hash
        ));

        let rewritten: FileConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(rewritten.is_admin_password_hashed());

        // A second load keeps the stored hash
        let reloaded = loader.reload().unwrap();
        assert_eq!(reloaded.admin.unwrap().password_hash, admin.password_hash);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_environment_overrides_are_not_persisted() {
        let path = write_config(
            "env",
            r#"
[server]
frontend_url = "https://shop.example.com/"

[payment]
currency = "USD"

[admin]
email = "admin@example.com"
password = "changeme"
"#,
        );
        let secrets = SecretOverrides {
            stripe_secret_key: Some("sk_live_env".to_string()),
            session_secret: Some(SECRET.to_string()),
            cloudinary_cloud_name: Some("aurora".to_string()),
            cloudinary_api_key: Some("key".to_string()),
            cloudinary_api_secret: Some("secret".to_string()),
        };
        let listen: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let loaded = ConfigLoader::new(&path, Some(listen), secrets)
            .load()
            .unwrap();
        assert_eq!(loaded.server.listen, listen);
        assert_eq!(loaded.server.frontend_url, "https://shop.example.com");
        assert_eq!(loaded.payment.secret_key, "sk_live_env");
        assert_eq!(loaded.payment.currency, "usd");
        assert_eq!(loaded.session.secret(), SECRET.as_bytes());
        let media = loaded.media.unwrap();
        assert_eq!(media.cloud_name, "aurora");
        assert_eq!(media.api_base.as_str(), "https://api.cloudinary.com/");

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(!on_disk.contains("sk_live_env"));
        assert!(!on_disk.contains(SECRET));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_cloudinary_environment_creates_media_section() {
        let mut config: FileConfig = toml::from_str("").unwrap();
        SecretOverrides {
            cloudinary_cloud_name: Some("aurora".to_string()),
            ..Default::default()
        }
        .apply(&mut config);
        let media = config.media.unwrap();
        assert_eq!(media.cloud_name, "aurora");
        assert!(media.api_key.is_empty());
        assert_eq!(media.api_base.as_str(), "https://api.cloudinary.com/");

        let mut untouched: FileConfig = toml::from_str("").unwrap();
        SecretOverrides {
            cloudinary_api_key: Some("   ".to_string()),
            ..Default::default()
        }
        .apply(&mut untouched);
        assert!(untouched.media.is_none());
    }

    #[test]
    fn test_validation_failures() {
        let mut config: FileConfig = toml::from_str(&format!(
            r#"
[session]
secret = "{SECRET}"

[payment]
secret_key = "sk_test_123"
"#
        ))
        .unwrap();
        assert!(validate(&config).is_ok());

        config.payment.currency = "dirham".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError(_))
        ));

        config.payment.currency = "aed".to_string();
        config.session.secret = "short".to_string();
        assert!(validate(&config).is_err());

        config.session.secret = SECRET.to_string();
        config.payment.secret_key = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_file() {
        let loader = ConfigLoader::new(
            "/nonexistent/aurora-config.toml",
            None,
            SecretOverrides::default(),
        );
        assert!(matches!(loader.load(), Err(ConfigError::IoError(_))));
    }
}
