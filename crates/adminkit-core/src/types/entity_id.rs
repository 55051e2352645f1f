//! Entity identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored entity.
///
/// The API uses numeric ids for some resources and string ids (UUIDs) for
/// others; both are accepted and rendered verbatim into request paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(u64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| EntityId::Text(s.to_string()))
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(s.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_text_ids() {
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::Number(42));
        assert_eq!(
            EntityId::from("9b2f-11"),
            EntityId::Text("9b2f-11".to_string())
        );
    }

    #[test]
    fn deserializes_either_json_form() {
        let n: EntityId = serde_json::from_str("7").unwrap();
        let s: EntityId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n.to_string(), "7");
        assert_eq!(s.to_string(), "abc");
    }
}
