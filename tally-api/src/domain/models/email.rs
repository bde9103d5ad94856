use std::fmt;
use std::ops::Deref;

use serde::Serialize;
use thiserror::Error;

/// A validated, lowercased email address used to address notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

#[derive(Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("'{0}' is not a valid email: must contain exactly one '@'")]
    InvalidFormat(String),
    #[error("'{0}' is not a valid email: missing local part")]
    MissingLocalPart(String),
    #[error("'{0}' is not a valid email: invalid domain part")]
    InvalidDomainPart(String),
    #[error("'{0}' is not a valid email: contains whitespace")]
    ContainsWhitespace(String),
}

impl TryFrom<&str> for Email {
    type Error = EmailError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace(value.to_string()));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(EmailError::InvalidFormat(value.to_string()));
        };
        if domain.contains('@') {
            return Err(EmailError::InvalidFormat(value.to_string()));
        }
        if local.is_empty() {
            return Err(EmailError::MissingLocalPart(value.to_string()));
        }
        if domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(EmailError::InvalidDomainPart(value.to_string()));
        }

        Ok(Self(value.to_lowercase()))
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl Deref for Email {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_trimmed_and_lowercased() {
        let email = Email::try_from("  Asha@Example.COM ").unwrap();
        assert_eq!(&*email, "asha@example.com");
    }

    #[test]
    fn missing_at_symbol_is_rejected() {
        assert_eq!(
            Email::try_from("asha.example.com").unwrap_err(),
            EmailError::InvalidFormat("asha.example.com".to_string())
        );
    }

    #[test]
    fn multiple_at_symbols_are_rejected() {
        assert_eq!(
            Email::try_from("a@b@example.com").unwrap_err(),
            EmailError::InvalidFormat("a@b@example.com".to_string())
        );
    }

    #[test]
    fn local_and_domain_parts_are_required() {
        assert_eq!(
            Email::try_from("@example.com").unwrap_err(),
            EmailError::MissingLocalPart("@example.com".to_string())
        );
        assert_eq!(
            Email::try_from("asha@localhost").unwrap_err(),
            EmailError::InvalidDomainPart("asha@localhost".to_string())
        );
    }

    #[test]
    fn inner_whitespace_is_rejected() {
        assert!(matches!(
            Email::try_from("as ha@example.com"),
            Err(EmailError::ContainsWhitespace(_))
        ));
    }
}
