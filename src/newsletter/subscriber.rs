//! Subscriber model and email validation

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A syntactically plausible, normalized email address.
///
/// Normalization lower-cases and trims; validation only requires an `@`
/// and a `.`, matching the subscription form's check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberEmail(String);

#[derive(Debug, Error)]
#[error("please provide a valid email address")]
pub struct EmailParseError;

impl SubscriberEmail {
    pub fn parse(raw: &str) -> Result<Self, EmailParseError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || !normalized.contains('@') || !normalized.contains('.') {
            return Err(EmailParseError);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored subscriber record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscriber {
    pub email: String,

    #[serde(rename = "subscribedAt")]
    pub subscribed_at: DateTime<Utc>,

    #[serde(rename = "isActive")]
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let email = SubscriberEmail::parse(" USER@Example.com ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_rejects_implausible() {
        assert!(SubscriberEmail::parse("").is_err());
        assert!(SubscriberEmail::parse("   ").is_err());
        assert!(SubscriberEmail::parse("no-at-sign.com").is_err());
        assert!(SubscriberEmail::parse("no-dot@example").is_err());
    }

    #[test]
    fn test_accepts_plausible() {
        assert!(SubscriberEmail::parse("a@b.c").is_ok());
    }
}
