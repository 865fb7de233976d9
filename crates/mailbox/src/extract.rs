use regex::Regex;

/// Pull the API key out of a confirmation body of the form
/// `Your API key for <email> is: <token>`. The key must be addressed to
/// `email`; a key issued for another address is ignored.
pub fn extract_key(email: &str, text: &str) -> Option<String> {
    let pattern = format!(r"Your API key for {} is:\s*([\w\d]+)", regex::escape(email));
    let re = Regex::new(&pattern).ok()?;

    re.captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_key() {
        let text = "Welcome!\n\nYour API key for foo@bar.com is: ABC123\n\nThanks";
        assert_eq!(extract_key("foo@bar.com", text), Some("ABC123".to_string()));
    }

    #[test]
    fn test_extract_key_other_email() {
        let text = "Your API key for foo@bar.com is: ABC123";
        assert_eq!(extract_key("baz@bar.com", text), None);
    }

    #[test]
    fn test_email_is_matched_literally() {
        // '.' in the address must not match an arbitrary character
        let text = "Your API key for foo@barXcom is: ABC123";
        assert_eq!(extract_key("foo@bar.com", text), None);
    }

    #[test]
    fn test_key_stops_at_punctuation() {
        let text = "Your API key for a1@x.io is:\n   k3yVal_9.  Keep it safe.";
        assert_eq!(extract_key("a1@x.io", text), Some("k3yVal_9".to_string()));
    }

    #[test]
    fn test_no_key_in_text() {
        assert_eq!(extract_key("foo@bar.com", "Please confirm your address"), None);
    }
}
