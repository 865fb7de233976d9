use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use serde_json::Value;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::RegistrationError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chrome process owned for the length of one signup. Dropping it kills the
/// process, so every exit path releases the browser.
pub struct HeadlessBrowser {
    browser: Browser,
}

impl HeadlessBrowser {
    pub fn launch(headless: bool) -> Result<Self, RegistrationError> {
        // Required for running in Docker containers
        let extra_args: Vec<OsString> = vec![
            OsString::from("--no-sandbox"),
            OsString::from("--disable-dev-shm-usage"),
            OsString::from("--disable-gpu"),
        ];

        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(headless)
            .window_size(Some((1920, 1080)))
            .args(extra_args.iter().map(|a| a.as_ref()).collect());

        // Use CHROME_PATH env var if set (for Docker/custom installs)
        if let Ok(chrome_path) = std::env::var("CHROME_PATH") {
            builder.path(Some(std::path::PathBuf::from(chrome_path)));
        }

        let launch_options = builder
            .build()
            .map_err(|e| RegistrationError::BrowserError(e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| RegistrationError::BrowserError(e.to_string()))?;

        info!(headless, "browser launched");
        Ok(Self { browser })
    }

    pub fn open(&self, url: &str) -> Result<Arc<Tab>, RegistrationError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| RegistrationError::BrowserError(e.to_string()))?;

        info!("navigating to {}", url);

        tab.navigate_to(url)
            .map_err(|e| RegistrationError::BrowserError(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| RegistrationError::BrowserError(e.to_string()))?;

        Ok(tab)
    }

    /// Evaluate `script` and return its primitive result.
    pub fn evaluate(&self, tab: &Tab, script: &str) -> Result<Option<Value>, RegistrationError> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| RegistrationError::BrowserError(e.to_string()))?;
        Ok(result.value)
    }

    /// Run a script that evaluates to `true` on success or to a message
    /// naming the element it could not find.
    pub fn run_action(&self, tab: &Tab, script: &str) -> Result<(), RegistrationError> {
        match self.evaluate(tab, script)? {
            Some(Value::Bool(true)) => Ok(()),
            Some(Value::String(missing)) => Err(RegistrationError::ElementNotFound(missing)),
            other => Err(RegistrationError::UnexpectedScriptResult(format!("{:?}", other))),
        }
    }

    /// Re-evaluate `script` until it yields `true` or `timeout` elapses.
    pub async fn wait_for(&self, tab: &Tab, script: &str, timeout: Duration) -> bool {
        let wait_start = Instant::now();

        loop {
            match self.evaluate(tab, script) {
                Ok(Some(Value::Bool(true))) => return true,
                Ok(other) => debug!(result = ?other, "condition not met yet"),
                Err(e) => debug!(error = %e, "condition check failed"),
            }

            if wait_start.elapsed() >= timeout {
                warn!(timeout_secs = timeout.as_secs(), "timeout waiting for page condition");
                return false;
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub fn count_shadow_roots(&self, tab: &Tab) -> usize {
        self.evaluate(tab, crate::shadow::count_shadow_roots())
            .ok()
            .flatten()
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize
    }
}
