use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `hydra:member` collection envelope used by every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HydraCollection<T> {
    #[serde(rename = "hydra:member", default = "Vec::new")]
    pub members: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Domain {
    pub domain: String,
    #[serde(rename = "isActive", default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub address: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAccount {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Vec<Address>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Local view of the provider account. Usable for inbox calls once `token`
/// is set; `address` stays `None` when no domain could be fetched.
#[derive(Debug, Clone)]
pub struct MailAccount {
    pub address: Option<String>,
    pub password: String,
    pub account_id: Option<String>,
    pub token: Option<String>,
}

impl MailAccount {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            address: None,
            password: password.into(),
            account_id: None,
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_list() {
        let body = r#"{
            "hydra:member": [
                {"id": "m1", "from": {"address": "noreply@api.data.gov", "name": ""}, "subject": "Your API key"},
                {"id": "m2"}
            ],
            "hydra:totalItems": 2
        }"#;
        let list: HydraCollection<MessageSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(list.members.len(), 2);
        assert_eq!(list.members[0].from.as_ref().unwrap().address, "noreply@api.data.gov");
        assert!(list.members[1].subject.is_none());
    }

    #[test]
    fn test_missing_members_is_empty() {
        let list: HydraCollection<Domain> = serde_json::from_str("{}").unwrap();
        assert!(list.members.is_empty());
    }

    #[test]
    fn test_parse_full_message() {
        let body = r#"{
            "id": "m1",
            "to": [{"address": "abc@example.com"}],
            "text": "hello",
            "createdAt": "2025-03-01T10:00:00+00:00"
        }"#;
        let msg: Message = serde_json::from_str(body).unwrap();
        assert_eq!(msg.text.as_deref(), Some("hello"));
        assert_eq!(msg.to[0].address, "abc@example.com");
        assert!(msg.created_at.is_some());
    }
}
