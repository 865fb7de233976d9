use std::time::Duration;

use keyreg_core::MailboxConfig;
use rand::Rng;
use reqwest::{Response, StatusCode};
use tracing::{debug, info, warn};

use crate::error::MailboxError;
use crate::extract;
use crate::types::*;

pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

const LOCAL_PART_LEN: usize = 10;
const LOCAL_PART_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random `[a-z0-9]{10}` local part for a throwaway address.
pub fn generate_local_part() -> String {
    let mut rng = rand::thread_rng();
    (0..LOCAL_PART_LEN)
        .map(|_| LOCAL_PART_CHARSET[rng.gen_range(0..LOCAL_PART_CHARSET.len())] as char)
        .collect()
}

/// Client for a hydra-style disposable mail API (mail.tm and clones).
///
/// All inbox operations are best effort: failures are logged and surface as
/// `None`, never as errors, so a caller can run the whole flow without
/// handling provider hiccups.
pub struct MailboxClient {
    http: reqwest::Client,
    base_url: String,
    account: MailAccount,
}

impl MailboxClient {
    pub fn new(config: &MailboxConfig) -> Result<Self, MailboxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account: MailAccount::new(config.password.clone()),
        })
    }

    pub fn account(&self) -> &MailAccount {
        &self.account
    }

    pub fn address(&self) -> Option<&str> {
        self.account.address.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Create a fresh mailbox: pick the first domain, register a random
    /// address on it and authenticate. Each step only runs if the previous
    /// one succeeded; nothing is retried.
    pub async fn provision(&mut self) -> &MailAccount {
        let domain = match self.first_domain().await {
            Ok(domain) => domain,
            Err(e) => {
                warn!(error = %e, "no valid domain available, mailbox not provisioned");
                return &self.account;
            }
        };

        let address = format!("{}@{}", generate_local_part(), domain);
        self.account.address = Some(address.clone());

        match self.create_account(&address).await {
            Ok(id) => {
                info!(%address, account_id = %id, "mail account created");
                self.account.account_id = Some(id);
            }
            Err(e) => {
                warn!(%address, error = %e, "failed to create mail account");
                return &self.account;
            }
        }

        match self.request_token(&address).await {
            Ok(token) => {
                info!("mailbox authentication successful");
                self.account.token = Some(token);
            }
            Err(e) => warn!(%address, error = %e, "failed to get authentication token"),
        }

        &self.account
    }

    /// Authenticate against an already existing mailbox.
    pub async fn login(&mut self, address: &str, password: &str) -> &MailAccount {
        self.account = MailAccount::new(password);
        self.account.address = Some(address.to_string());

        match self.request_token(address).await {
            Ok(token) => {
                info!(%address, "mailbox authentication successful");
                self.account.token = Some(token);
            }
            Err(e) => warn!(%address, error = %e, "failed to get authentication token"),
        }

        &self.account
    }

    async fn first_domain(&self) -> Result<String, MailboxError> {
        let response = self.http.get(self.url("domains")).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let domains: HydraCollection<Domain> = response.json().await?;

        domains
            .members
            .into_iter()
            .next()
            .map(|d| d.domain)
            .ok_or(MailboxError::NoDomains)
    }

    async fn create_account(&self, address: &str) -> Result<String, MailboxError> {
        let response = self
            .http
            .post(self.url("accounts"))
            .json(&Credentials {
                address,
                password: &self.account.password,
            })
            .send()
            .await?;
        let response = expect_status(response, StatusCode::CREATED).await?;
        let created: CreatedAccount = response.json().await?;
        Ok(created.id)
    }

    async fn request_token(&self, address: &str) -> Result<String, MailboxError> {
        let response = self
            .http
            .post(self.url("token"))
            .json(&Credentials {
                address,
                password: &self.account.password,
            })
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.token)
    }

    fn token(&self) -> Result<&str, MailboxError> {
        self.account
            .token
            .as_deref()
            .ok_or(MailboxError::NotAuthenticated)
    }

    async fn try_list_messages(&self) -> Result<Vec<MessageSummary>, MailboxError> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url("messages"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let list: HydraCollection<MessageSummary> = response.json().await?;
        Ok(list.members)
    }

    async fn try_fetch_message(&self, id: &str) -> Result<Message, MailboxError> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url(&format!("messages/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(response.json().await?)
    }

    /// Inbox listing, or `None` if unauthenticated or the call failed.
    pub async fn list_messages(&self) -> Option<Vec<MessageSummary>> {
        match self.try_list_messages().await {
            Ok(messages) => Some(messages),
            Err(e) => {
                warn!(error = %e, "failed to retrieve messages");
                None
            }
        }
    }

    pub async fn fetch_message(&self, id: &str) -> Option<Message> {
        match self.try_fetch_message(id).await {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(message_id = %id, error = %e, "failed to retrieve full message");
                None
            }
        }
    }

    /// Key addressed to this mailbox, if `text` carries one.
    pub fn extract_key(&self, text: &str) -> Option<String> {
        let address = self.address()?;
        extract::extract_key(address, text)
    }

    /// Poll the inbox until something arrives, then look for the key in
    /// every message of that first non-empty listing.
    ///
    /// Polling ends at the first non-empty listing even when none of its
    /// messages carries a key. Empty or failed listings are retried every
    /// `interval`, up to `max_attempts` listings in total.
    pub async fn poll_for_key(&self, max_attempts: u32, interval: Duration) -> Option<String> {
        info!(max_attempts, interval_secs = interval.as_secs_f64(), "checking for messages");

        for attempt in 1..=max_attempts {
            let messages = self.list_messages().await.unwrap_or_default();

            if !messages.is_empty() {
                info!(count = messages.len(), "message(s) received");

                for summary in &messages {
                    let Some(message) = self.fetch_message(&summary.id).await else {
                        continue;
                    };

                    debug!(
                        message_id = %message.id,
                        subject = message.subject.as_deref().unwrap_or(""),
                        from = message.from.as_ref().map(|a| a.address.as_str()).unwrap_or(""),
                        "inspecting message"
                    );

                    match self.extract_key(message.text.as_deref().unwrap_or("")) {
                        Some(key) => {
                            info!(message_id = %message.id, "extracted API key");
                            return Some(key);
                        }
                        None => warn!(message_id = %message.id, "API key not found in message"),
                    }
                }

                warn!("messages received but none contained an API key");
                return None;
            }

            debug!(attempt, max_attempts, "inbox empty");
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        warn!(max_attempts, "no messages received");
        None
    }
}

async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, MailboxError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(MailboxError::UnexpectedStatus { status, body })
}
