use std::fmt;

use alloy::primitives::utils::{format_units, parse_units};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Legacy gas price in wei.
///
/// Config accepts a plain integer (wei) or a string with a unit such as
/// `"10 gwei"` or `"0.01 gwei"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GasPrice(u128);

impl GasPrice {
    pub fn new(wei: u128) -> Self {
        GasPrice(wei)
    }

    pub fn into_u128(self) -> u128 {
        self.0
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        let (amount, unit) = match value.split_once(char::is_whitespace) {
            Some((amount, unit)) => (amount.trim(), unit.trim()),
            None => (value, "wei"),
        };

        let parsed = parse_units(amount, unit)
            .map_err(|e| format!("invalid gas price '{}': {}", value, e))?;
        let wei: u128 = parsed
            .get_absolute()
            .try_into()
            .map_err(|_| format!("gas price '{}' does not fit in 128 bits", value))?;

        Ok(GasPrice(wei))
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1_000_000 {
            if let Ok(gwei) = format_units(self.0, "gwei") {
                let gwei = gwei.trim_end_matches('0').trim_end_matches('.');
                return write!(f, "{} gwei", gwei);
            }
        }
        write!(f, "{} wei", self.0)
    }
}

impl Serialize for GasPrice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

struct GasPriceVisitor;

impl<'de> Visitor<'de> for GasPriceVisitor {
    type Value = GasPrice;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a gas price in wei or a string like '10 gwei'")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(GasPrice(value as u128))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u128::try_from(value)
            .map(GasPrice)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        GasPrice::parse(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for GasPrice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(GasPriceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_units() {
        assert_eq!(GasPrice::parse("10 gwei").unwrap().into_u128(), 10_000_000_000);
        assert_eq!(GasPrice::parse("0.01 gwei").unwrap().into_u128(), 10_000_000);
        assert_eq!(GasPrice::parse("1").unwrap().into_u128(), 1);
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        assert!(GasPrice::parse("10 bananas").is_err());
        assert!(GasPrice::parse("ten").is_err());
    }

    #[test]
    fn test_deserialize_integer_and_string() {
        let price: GasPrice = serde_yaml::from_str("25000000000").unwrap();
        assert_eq!(price.into_u128(), 25_000_000_000);

        let price: GasPrice = serde_yaml::from_str("'25 gwei'").unwrap();
        assert_eq!(price.into_u128(), 25_000_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(GasPrice::new(1).to_string(), "1 wei");
        assert_eq!(GasPrice::new(10_000_000_000).to_string(), "10 gwei");
        assert_eq!(GasPrice::new(10_000_000).to_string(), "0.01 gwei");
    }
}
