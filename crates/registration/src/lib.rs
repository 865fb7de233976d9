pub mod browser;
pub mod form_submitter;
pub mod identity;
pub mod shadow;

pub use browser::HeadlessBrowser;
pub use form_submitter::FormSubmitter;
pub use identity::Identity;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistrationError {
    #[error("form not found inside shadow DOM")]
    FormNotFound,

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("unexpected script result: {0}")]
    UnexpectedScriptResult(String),

    #[error("browser error: {0}")]
    BrowserError(String),
}
