//! Delivery method selector.

use crate::error::NotifyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which push service receives the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushMethod {
    PushPlus,
    Telegram,
    ServerChan,
    Webhook,
}

impl PushMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushMethod::PushPlus => "pushplus",
            PushMethod::Telegram => "telegram",
            PushMethod::ServerChan => "serverchan",
            PushMethod::Webhook => "webhook",
        }
    }

    /// Parse an optional selector where blank means "no push".
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, NotifyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            trimmed.parse().map(Some)
        }
    }
}

impl fmt::Display for PushMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PushMethod {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pushplus" => Ok(PushMethod::PushPlus),
            "telegram" => Ok(PushMethod::Telegram),
            "serverchan" => Ok(PushMethod::ServerChan),
            "webhook" => Ok(PushMethod::Webhook),
            other => Err(NotifyError::UnknownMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("PushPlus".parse::<PushMethod>().unwrap(), PushMethod::PushPlus);
        assert_eq!(" telegram ".parse::<PushMethod>().unwrap(), PushMethod::Telegram);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "carrier-pigeon".parse::<PushMethod>(),
            Err(NotifyError::UnknownMethod(name)) if name == "carrier-pigeon"
        ));
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert_eq!(PushMethod::parse_optional("").unwrap(), None);
        assert_eq!(PushMethod::parse_optional("  ").unwrap(), None);
        assert_eq!(
            PushMethod::parse_optional("serverchan").unwrap(),
            Some(PushMethod::ServerChan)
        );
    }

    #[test]
    fn test_display_roundtrips_through_serde_names() {
        for method in [
            PushMethod::PushPlus,
            PushMethod::Telegram,
            PushMethod::ServerChan,
            PushMethod::Webhook,
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method));
        }
    }
}
