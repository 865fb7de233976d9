pub mod config;
pub mod error;

pub use config::{AppConfig, MailboxConfig, RegistrationConfig};
pub use error::ConfigError;
