//! Script builders for elements living behind a shadow root.
//!
//! `document.querySelector` cannot see into shadow trees, so every lookup
//! goes through `host.shadowRoot.querySelector(...)`. Action scripts
//! evaluate to `true` on success or to a string describing what was
//! missing. Selectors and values are embedded as JSON string literals.

use serde_json::Value;

/// JS string literal for `s`.
fn literal(s: &str) -> String {
    Value::from(s).to_string()
}

/// Prelude that binds `form` to the form inside `host`'s shadow root or
/// bails out with a message.
fn locate_form(host: &str, form: &str) -> String {
    format!(
        r#"const host = document.querySelector({host});
        if (!host) return 'shadow host not found: ' + {host};
        if (!host.shadowRoot) return 'element has no open shadow root: ' + {host};
        const form = host.shadowRoot.querySelector({form});
        if (!form) return 'form not found in shadow root: ' + {form};"#,
        host = literal(host),
        form = literal(form),
    )
}

pub fn count_shadow_roots() -> &'static str {
    "[...document.querySelectorAll('*')].filter(el => el.shadowRoot).length"
}

pub fn form_exists(host: &str, form: &str) -> String {
    format!(
        r#"(() => {{
        {locate}
        return true;
    }})()"#,
        locate = locate_form(host, form),
    )
}

pub fn set_field_value(host: &str, form: &str, field: &str, value: &str, dispatch_events: bool) -> String {
    let events = if dispatch_events {
        r#"el.dispatchEvent(new Event('input', { bubbles: true, composed: true }));
        el.dispatchEvent(new Event('change', { bubbles: true, composed: true }));"#
    } else {
        ""
    };

    format!(
        r#"(() => {{
        {locate}
        const el = form.querySelector({field});
        if (!el) return 'field not found: ' + {field};
        el.value = {value};
        {events}
        return true;
    }})()"#,
        locate = locate_form(host, form),
        field = literal(field),
        value = literal(value),
        events = events,
    )
}

pub fn click(host: &str, form: &str, target: &str) -> String {
    format!(
        r#"(() => {{
        {locate}
        const el = form.querySelector({target});
        if (!el) return 'element not found: ' + {target};
        el.click();
        return true;
    }})()"#,
        locate = locate_form(host, form),
        target = literal(target),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_escaped() {
        let script = set_field_value("div.host", "form", "#user_last_name", "O'Brien \"Jr\"", true);
        assert!(script.contains(r#"el.value = "O'Brien \"Jr\"";"#));
        assert!(script.contains("host.shadowRoot.querySelector(\"form\")"));
        assert!(script.contains("dispatchEvent(new Event('input'"));
    }

    #[test]
    fn test_events_can_be_skipped() {
        let script = set_field_value("div.host", "form", "#user_email", "a@b.c", false);
        assert!(!script.contains("dispatchEvent"));
    }

    #[test]
    fn test_click_targets_inside_form() {
        let script = click("div.host", "form", "button[type=submit]");
        assert!(script.contains(r#"form.querySelector("button[type=submit]")"#));
        assert!(script.contains("el.click();"));
    }

    #[test]
    fn test_form_exists_pierces_shadow_root() {
        let script = form_exists("div.api-umbrella-signup-embed-content-container", "form");
        assert!(script.contains(r#"document.querySelector("div.api-umbrella-signup-embed-content-container")"#));
        assert!(script.contains("host.shadowRoot"));
    }
}
