//! Chat model identifiers and resolution.
//!
//! The set of recognized models is closed: resolution happens once, at
//! configuration time, so a typo'd identifier fails before any network call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};

/// A canonical chat model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatModel {
    /// The standard tier. Default when no model is requested.
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    /// The advanced tier.
    #[serde(rename = "gpt-4")]
    Gpt4,
}

impl ChatModel {
    /// Every recognized model, in tier order.
    pub const ALL: [ChatModel; 2] = [ChatModel::Gpt35Turbo, ChatModel::Gpt4];

    /// Canonical identifier strings, parallel to [`ChatModel::ALL`].
    const NAMES: [&'static str; 2] = ["gpt-3.5-turbo", "gpt-4"];

    /// The canonical identifier sent to the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
            ChatModel::Gpt4 => "gpt-4",
        }
    }

    /// Resolve a user-supplied identifier to a canonical model.
    ///
    /// `None` resolves to the standard tier. A supplied identifier passes
    /// through only if it matches a recognized canonical value; anything
    /// else is [`LlmError::UnsupportedModel`].
    pub fn resolve(requested: Option<&str>) -> Result<Self> {
        match requested {
            None => Ok(ChatModel::default()),
            Some(name) => name.parse(),
        }
    }
}

impl Default for ChatModel {
    fn default() -> Self {
        ChatModel::Gpt35Turbo
    }
}

impl FromStr for ChatModel {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        ChatModel::ALL
            .iter()
            .find(|model| model.as_str() == s)
            .copied()
            .ok_or_else(|| LlmError::unsupported_model(s, &ChatModel::NAMES))
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_none_is_standard_tier() {
        let model = ChatModel::resolve(None).unwrap();
        assert_eq!(model, ChatModel::Gpt35Turbo);
        assert_eq!(model, ChatModel::resolve(Some("gpt-3.5-turbo")).unwrap());
    }

    #[test]
    fn test_resolve_passes_recognized_values_through() {
        assert_eq!(
            ChatModel::resolve(Some("gpt-4")).unwrap(),
            ChatModel::Gpt4
        );
        assert_eq!(
            ChatModel::resolve(Some("gpt-3.5-turbo")).unwrap(),
            ChatModel::Gpt35Turbo
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_identifier() {
        let err = ChatModel::resolve(Some("not-a-real-model")).unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedModel { .. }));
    }

    #[test]
    fn test_display_matches_canonical_string() {
        assert_eq!(ChatModel::Gpt4.to_string(), "gpt-4");
        assert_eq!(ChatModel::Gpt35Turbo.as_str(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_serde_round_trips_canonical_names() {
        let json = serde_json::to_string(&ChatModel::Gpt4).unwrap();
        assert_eq!(json, "\"gpt-4\"");
        let model: ChatModel = serde_json::from_str("\"gpt-3.5-turbo\"").unwrap();
        assert_eq!(model, ChatModel::Gpt35Turbo);
    }
}
