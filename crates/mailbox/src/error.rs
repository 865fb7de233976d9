use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailboxError {
    #[error("no domains available from provider")]
    NoDomains,

    #[error("no authentication token")]
    NotAuthenticated,

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
