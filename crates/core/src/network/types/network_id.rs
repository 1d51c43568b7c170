use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Network identifier a profile expects the node's `net_version` to report.
///
/// `*` matches whatever the node reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkId {
    #[default]
    Any,
    Id(u64),
}

impl NetworkId {
    pub fn matches(&self, reported: u64) -> bool {
        match self {
            NetworkId::Any => true,
            NetworkId::Id(id) => *id == reported,
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkId::Any => write!(f, "*"),
            NetworkId::Id(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for NetworkId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NetworkId::Any => serializer.serialize_str("*"),
            NetworkId::Id(id) => serializer.serialize_str(&id.to_string()),
        }
    }
}

struct NetworkIdVisitor;

impl<'de> Visitor<'de> for NetworkIdVisitor {
    type Value = NetworkId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("either '*' for any network or a numeric network id")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(NetworkId::Id(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map(NetworkId::Id)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let value = value.trim();
        if value == "*" {
            return Ok(NetworkId::Any);
        }

        value
            .parse::<u64>()
            .map(NetworkId::Id)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NetworkIdVisitor)
    }
}
