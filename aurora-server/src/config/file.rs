//! TOML file configuration structures.
//!
//! These structs directly map to the `aurora-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:5000").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// List of allowed origins for CORS (frontend URLs).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            allowed_origins: Vec::new(),
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

/// Session token section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// HMAC secret. May be left empty and supplied through `SESSION_SECRET`.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_max_age")]
    pub max_age_secs: i64,
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            max_age_secs: default_max_age(),
            secure_cookie: false,
        }
    }
}

fn default_max_age() -> i64 {
    aurora_sdk::session::DEFAULT_SESSION_MAX_AGE
}

/// Hosted checkout section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret key. May be supplied through `STRIPE_SECRET_KEY`.
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Flat shipping cost per order in minor units.
    #[serde(default)]
    pub shipping_cost_minor: i64,
    #[serde(default = "default_stripe_api")]
    pub api_base: Url,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            currency: default_currency(),
            shipping_cost_minor: 0,
            api_base: default_stripe_api(),
        }
    }
}

fn default_currency() -> String {
    "aed".to_string()
}

fn default_stripe_api() -> Url {
    Url::parse("https://api.stripe.com").expect("valid default url")
}

/// Media host section. Without it, image deletion is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_cloudinary_api")]
    pub api_base: Url,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base: default_cloudinary_api(),
        }
    }
}

fn default_cloudinary_api() -> Url {
    Url::parse("https://api.cloudinary.com").expect("valid default url")
}

/// Bootstrap administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    /// The admin password. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub password: String,
}

impl FileConfig {
    /// Check if the admin password is already hashed (argon2 format).
    pub fn is_admin_password_hashed(&self) -> bool {
        self.admin
            .as_ref()
            .is_none_or(|admin| aurora_core::password::is_password_hash(&admin.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"
allowed_origins = ["https://shop.example.com"]
frontend_url = "https://shop.example.com"

[session]
secret = "0123456789abcdef0123456789abcdef"

[payment]
secret_key = "sk_test_123"
shipping_cost_minor = 2000

[admin]
email = "admin@example.com"
password = "changeme"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.server.allowed_origins.len(), 1);
        assert_eq!(config.session.max_age_secs, 86_400);
        assert!(!config.session.secure_cookie);
        assert_eq!(config.payment.currency, "aed");
        assert_eq!(config.payment.shipping_cost_minor, 2000);
        assert_eq!(config.payment.api_base.as_str(), "https://api.stripe.com/");
        assert!(config.media.is_none());
        assert!(!config.is_admin_password_hashed());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen.port(), 5000);
        assert!(config.session.secret.is_empty());
        assert!(config.admin.is_none());
        assert!(config.is_admin_password_hashed());
    }

    #[test]
    fn test_media_section_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
[media]
cloud_name = "aurora"
api_key = "123"
api_secret = "abc"
"#,
        )
        .unwrap();
        let media = config.media.unwrap();
        assert_eq!(media.cloud_name, "aurora");
        assert_eq!(media.api_base.as_str(), "https://api.cloudinary.com/");
    }

    #[test]
    fn test_hashed_password_detection() {
        let config = FileConfig {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            payment: PaymentConfig::default(),
            media: None,
            admin: Some(AdminConfig {
                email: "admin@example.com".to_string(),
                password: "$argon2id$v=19$m=19456,t=2,p=1$abc123".to_string(),
            }),
        };
        assert!(config.is_admin_password_hashed());
    }
}
