/// Configuration management
///
/// Everything is read from environment variables (after `.env` is loaded in
/// `main`). Database pool tuning lives in `db_pool::DbConfig::from_env`.
use crypto_core::token::MIN_SECRET_LENGTH;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("SECRET_KEY must be at least {min} bytes")]
    WeakSecret { min: usize },
}

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub secret_key: String,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
    #[serde(default = "default_reset_token_ttl_secs")]
    pub reset_token_ttl_secs: i64,
    /// Base used in emailed links; derived from the request when unset
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_mail_server")]
    pub mail_server: String,
    #[serde(default = "default_mail_port")]
    pub mail_port: u16,
    #[serde(default = "default_mail_use_tls")]
    pub mail_use_tls: bool,
    #[serde(default)]
    pub mail_username: Option<String>,
    #[serde(default)]
    pub mail_password: Option<String>,
    #[serde(default)]
    pub mail_sender: Option<String>,
}

/// SMTP settings handed to the email service
#[derive(Clone)]
pub struct MailSettings {
    /// Empty host switches the mailer to no-op mode
    pub server: String,
    pub port: u16,
    pub use_starttls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret_key", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("reset_token_ttl_secs", &self.reset_token_ttl_secs)
            .field("public_base_url", &self.public_base_url)
            .field("secure_cookies", &self.secure_cookies)
            .field("mail_server", &self.mail_server)
            .field("mail_port", &self.mail_port)
            .field("mail_use_tls", &self.mail_use_tls)
            .field("mail_username", &self.mail_username)
            .field("mail_password", &self.mail_password.as_ref().map(|_| "[REDACTED]"))
            .field("mail_sender", &self.mail_sender)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Config = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::WeakSecret {
                min: MIN_SECRET_LENGTH,
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn mail_settings(&self) -> MailSettings {
        let sender = self
            .mail_sender
            .clone()
            .or_else(|| self.mail_username.clone())
            .unwrap_or_else(|| "noreply@postboard.local".to_string());

        MailSettings {
            server: self.mail_server.trim().to_string(),
            port: self.mail_port,
            use_starttls: self.mail_use_tls,
            username: self.mail_username.clone(),
            password: self.mail_password.clone(),
            sender,
        }
    }

    /// Whether emailed links will be built from the Host header of the
    /// request that asked for them
    pub fn links_follow_request_host(&self) -> bool {
        let has_base = self
            .public_base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        !self.mail_server.trim().is_empty() && !has_base
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_session_ttl_secs() -> i64 {
    7 * 24 * 60 * 60
}

fn default_reset_token_ttl_secs() -> i64 {
    1800
}

fn default_mail_server() -> String {
    "smtp.googlemail.com".to_string()
}

fn default_mail_port() -> u16 {
    587
}

fn default_mail_use_tls() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let config: Config = envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = from_pairs(&[("SECRET_KEY", "0123456789abcdef0123")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.session_ttl_secs, 604800);
        assert_eq!(config.reset_token_ttl_secs, 1800);
        assert_eq!(config.mail_server, "smtp.googlemail.com");
        assert_eq!(config.mail_port, 587);
        assert!(config.mail_use_tls);
        assert!(!config.secure_cookies);
        assert!(config.public_base_url.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(matches!(from_pairs(&[]), Err(ConfigError::Env(_))));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            from_pairs(&[("SECRET_KEY", "short")]),
            Err(ConfigError::WeakSecret { .. })
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = from_pairs(&[
            ("SECRET_KEY", "0123456789abcdef0123"),
            ("PORT", "8080"),
            ("MAIL_SERVER", ""),
            ("MAIL_USE_TLS", "false"),
            ("MAIL_USERNAME", "bot@example.com"),
            ("PUBLIC_BASE_URL", "https://posts.example.com"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(!config.mail_use_tls);

        let mail = config.mail_settings();
        assert!(mail.server.is_empty());
        assert_eq!(mail.sender, "bot@example.com");
        assert_eq!(
            config.public_base_url.as_deref(),
            Some("https://posts.example.com")
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let config = from_pairs(&[
            ("SECRET_KEY", "super-secret-signing-key"),
            ("MAIL_PASSWORD", "hunter2-mail"),
        ])
        .unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-signing-key"));
        assert!(!rendered.contains("hunter2-mail"));
    }

    #[test]
    fn links_follow_host_only_when_mail_goes_out_without_base_url() {
        let secret = ("SECRET_KEY", "0123456789abcdef0123");

        let config = from_pairs(&[secret]).unwrap();
        assert!(config.links_follow_request_host());

        let config =
            from_pairs(&[secret, ("PUBLIC_BASE_URL", "https://posts.example.com")]).unwrap();
        assert!(!config.links_follow_request_host());

        let config = from_pairs(&[secret, ("MAIL_SERVER", "")]).unwrap();
        assert!(!config.links_follow_request_host());
    }
}
