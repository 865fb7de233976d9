use std::time::Duration;

use anyhow::{bail, Result};
use keyreg_core::AppConfig;
use keyreg_mailbox::MailboxClient;
use keyreg_registration::FormSubmitter;
use tracing::info;

/// Full pipeline: mailbox first, then the form, then the inbox.
pub async fn run_pipeline(config: AppConfig) -> Result<()> {
    let mut mailbox = MailboxClient::new(&config.mailbox)?;
    let Some(address) = mailbox.provision().await.address.clone() else {
        bail!("could not provision a mailbox");
    };
    if !mailbox.account().is_authenticated() {
        bail!("mailbox {} is not authenticated", address);
    }

    FormSubmitter::new(config.registration.clone())
        .submit(&address)
        .await;

    await_key(&mailbox, &config).await
}

pub async fn run_submit(config: AppConfig, email: &str) -> Result<()> {
    FormSubmitter::new(config.registration).submit(email).await;
    Ok(())
}

pub async fn run_mailbox(config: AppConfig) -> Result<()> {
    let mut mailbox = MailboxClient::new(&config.mailbox)?;
    let account = mailbox.provision().await;

    match (&account.address, account.is_authenticated()) {
        (Some(address), true) => {
            println!("Mailbox: {}", address);
            println!("Password: {}", account.password);
        }
        _ => bail!("could not provision a mailbox"),
    }

    await_key(&mailbox, &config).await
}

pub async fn run_poll(config: AppConfig, address: &str, password: Option<String>) -> Result<()> {
    let password = password.unwrap_or_else(|| config.mailbox.password.clone());

    let mut mailbox = MailboxClient::new(&config.mailbox)?;
    if !mailbox.login(address, &password).await.is_authenticated() {
        bail!("could not log in to {}", address);
    }

    await_key(&mailbox, &config).await
}

async fn await_key(mailbox: &MailboxClient, config: &AppConfig) -> Result<()> {
    let key = mailbox
        .poll_for_key(
            config.mailbox.poll_attempts,
            Duration::from_secs(config.mailbox.poll_interval_seconds),
        )
        .await;

    match key {
        Some(key) => {
            info!("API key retrieved");
            println!("{}", key);
            Ok(())
        }
        None => bail!("API key retrieval failed"),
    }
}
