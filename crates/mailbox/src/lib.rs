//! Disposable mailbox client: provisions a throwaway account on a
//! hydra-style mail relay API, polls its inbox, and pulls the issued API key
//! out of the confirmation message.

pub mod client;
pub mod error;
pub mod extract;
pub mod types;

pub use client::MailboxClient;
pub use error::MailboxError;
pub use extract::extract_key;
pub use types::*;
