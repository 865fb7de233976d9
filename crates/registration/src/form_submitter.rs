use std::time::Duration;

use keyreg_core::RegistrationConfig;
use tracing::{info, warn};

use crate::browser::HeadlessBrowser;
use crate::identity::Identity;
use crate::shadow;
use crate::RegistrationError;

/// Fills and submits the signup form embedded in the registration page's
/// shadow DOM.
pub struct FormSubmitter {
    config: RegistrationConfig,
}

impl FormSubmitter {
    pub fn new(config: RegistrationConfig) -> Self {
        Self { config }
    }

    /// Register `email` on the signup page. Best effort: any failure is
    /// logged and swallowed, and the browser is torn down on every path.
    pub async fn submit(&self, email: &str) {
        let browser = match HeadlessBrowser::launch(self.config.headless) {
            Ok(browser) => browser,
            Err(e) => {
                warn!(error = %e, "failed to launch browser");
                return;
            }
        };

        match self.fill_and_submit(&browser, email).await {
            Ok(identity) => info!(name = %identity.full_name(), %email, "form submitted"),
            Err(RegistrationError::FormNotFound) => {
                warn!("could not find form inside shadow DOM, giving up")
            }
            Err(e) => warn!(error = %e, "form submission failed"),
        }

        drop(browser);
        info!("browser closed");
    }

    pub(crate) async fn fill_and_submit(
        &self,
        browser: &HeadlessBrowser,
        email: &str,
    ) -> Result<Identity, RegistrationError> {
        let cfg = &self.config;
        let host = cfg.shadow_host_selector.as_str();
        let form = cfg.form_selector.as_str();

        info!("opening registration page");
        let tab = browser.open(&cfg.url)?;

        let ready = browser
            .wait_for(
                &tab,
                &shadow::form_exists(host, form),
                Duration::from_secs(cfg.page_load_timeout_seconds),
            )
            .await;

        info!(count = browser.count_shadow_roots(&tab), "shadow roots on page");

        if !ready {
            return Err(RegistrationError::FormNotFound);
        }
        info!("found the form inside shadow DOM");

        let identity = Identity::generate();
        info!(first_name = %identity.first_name, last_name = %identity.last_name, "using name");
        info!(%email, "using email");

        let fields = [
            (cfg.first_name_selector.as_str(), identity.first_name.as_str()),
            (cfg.last_name_selector.as_str(), identity.last_name.as_str()),
            (cfg.email_selector.as_str(), email),
        ];
        for (selector, value) in fields {
            browser.run_action(
                &tab,
                &shadow::set_field_value(host, form, selector, value, cfg.dispatch_input_events),
            )?;
        }

        browser.run_action(&tab, &shadow::click(host, form, &cfg.terms_selector))?;
        browser.run_action(&tab, &shadow::click(host, form, &cfg.submit_selector))?;

        // Let the confirmation render before the browser goes away
        tokio::time::sleep(Duration::from_secs(cfg.confirmation_wait_seconds)).await;

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pages are served as data URLs; the shadow tree is attached by script.
    const SIGNUP_PAGE: &str = "data:text/html,<div class='signup'></div><script>\
        const root = document.querySelector('.signup').attachShadow({mode: 'open'});\
        root.innerHTML = \"<form onsubmit='event.preventDefault()'>\
        <input id='user_first_name'><input id='user_last_name'><input id='user_email'>\
        <input type='checkbox' id='user_terms_and_conditions'>\
        <button type='submit'>Go</button></form>\";\
        </script>";

    fn config(url: &str) -> RegistrationConfig {
        RegistrationConfig {
            url: url.to_string(),
            shadow_host_selector: "div.signup".to_string(),
            page_load_timeout_seconds: 2,
            confirmation_wait_seconds: 0,
            ..RegistrationConfig::default()
        }
    }

    #[tokio::test]
    #[ignore = "needs a local Chrome"]
    async fn test_missing_shadow_host_reports_form_not_found() {
        let submitter = FormSubmitter::new(config("data:text/html,<p>nothing here</p>"));
        let browser = HeadlessBrowser::launch(true).unwrap();

        let result = submitter.fill_and_submit(&browser, "abc@example.com").await;
        assert!(matches!(result, Err(RegistrationError::FormNotFound)));
    }

    #[tokio::test]
    #[ignore = "needs a local Chrome"]
    async fn test_submit_without_form_returns_quietly() {
        let submitter = FormSubmitter::new(config("data:text/html,<p>nothing here</p>"));
        submitter.submit("abc@example.com").await;
    }

    #[tokio::test]
    #[ignore = "needs a local Chrome"]
    async fn test_fills_form_behind_shadow_root() {
        let submitter = FormSubmitter::new(config(SIGNUP_PAGE));
        let browser = HeadlessBrowser::launch(true).unwrap();

        let identity = submitter
            .fill_and_submit(&browser, "abc@example.com")
            .await
            .unwrap();
        assert!(!identity.first_name.is_empty());
    }
}
