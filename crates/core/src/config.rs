use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub mailbox: MailboxConfig,
}

/// Where the signup form lives and how to drive it.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RegistrationConfig {
    pub url: String,
    pub headless: bool,
    /// Element whose shadow root hosts the signup form
    pub shadow_host_selector: String,
    pub form_selector: String,
    pub first_name_selector: String,
    pub last_name_selector: String,
    pub email_selector: String,
    pub terms_selector: String,
    pub submit_selector: String,
    /// Fire input/change events after assigning values
    pub dispatch_input_events: bool,
    pub page_load_timeout_seconds: u64,
    pub confirmation_wait_seconds: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            url: "https://open.gsa.gov/api/regulationsgov/".to_string(),
            headless: true,
            shadow_host_selector: "div.api-umbrella-signup-embed-content-container".to_string(),
            form_selector: "form".to_string(),
            first_name_selector: "#user_first_name".to_string(),
            last_name_selector: "#user_last_name".to_string(),
            email_selector: "#user_email".to_string(),
            terms_selector: "#user_terms_and_conditions".to_string(),
            submit_selector: "button[type=submit]".to_string(),
            dispatch_input_events: true,
            page_load_timeout_seconds: 15,
            confirmation_wait_seconds: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MailboxConfig {
    pub base_url: String,
    pub password: String,
    pub poll_attempts: u32,
    pub poll_interval_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mail.tm".to_string(),
            password: "securepassword".to_string(),
            poll_attempts: 30,
            poll_interval_seconds: 2,
            request_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `KEYREG_*` environment overrides on top of the file values.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("KEYREG_REGISTRATION_URL") {
            self.registration.url = v;
        }
        if let Some(v) = lookup("KEYREG_HEADLESS") {
            self.registration.headless = v != "0" && v.to_lowercase() != "false";
        }
        if let Some(v) = lookup("KEYREG_MAIL_BASE_URL") {
            self.mailbox.base_url = v;
        }
        if let Some(v) = lookup("KEYREG_POLL_ATTEMPTS") {
            match v.parse::<u32>() {
                Ok(n) => self.mailbox.poll_attempts = n,
                Err(_) => warn!(value = %v, "ignoring unparsable KEYREG_POLL_ATTEMPTS"),
            }
        }
        if let Some(v) = lookup("KEYREG_POLL_INTERVAL_SECONDS") {
            match v.parse::<u64>() {
                Ok(n) => self.mailbox.poll_interval_seconds = n,
                Err(_) => warn!(value = %v, "ignoring unparsable KEYREG_POLL_INTERVAL_SECONDS"),
            }
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.registration.url).map_err(|source| ConfigError::InvalidUrl {
            field: "registration.url",
            source,
        })?;
        Url::parse(&self.mailbox.base_url).map_err(|source| ConfigError::InvalidUrl {
            field: "mailbox.base_url",
            source,
        })?;

        if self.mailbox.poll_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "mailbox.poll_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.registration.shadow_host_selector.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "registration.shadow_host_selector",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.mailbox.base_url, "https://api.mail.tm");
        assert_eq!(config.mailbox.poll_attempts, 30);
        assert_eq!(config.mailbox.poll_interval_seconds, 2);
        assert_eq!(config.registration.form_selector, "form");
        assert!(config.registration.headless);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [mailbox]
            poll_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.mailbox.poll_attempts, 5);
        assert_eq!(config.mailbox.password, "securepassword");
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = AppConfig::from_toml(
            r#"
            [mailbox]
            base_url = "not a url"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "mailbox.base_url", .. }));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let err = AppConfig::from_toml("[mailbox]\npoll_attempts = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("KEYREG_HEADLESS", "false"),
            ("KEYREG_MAIL_BASE_URL", "http://127.0.0.1:8080"),
            ("KEYREG_POLL_ATTEMPTS", "3"),
            ("KEYREG_POLL_INTERVAL_SECONDS", "nope"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert!(!config.registration.headless);
        assert_eq!(config.mailbox.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.mailbox.poll_attempts, 3);
        assert_eq!(config.mailbox.poll_interval_seconds, 2);
    }
}
