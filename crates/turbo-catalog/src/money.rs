//! Money type for SKU prices.
//!
//! Prices are kept as integer minor units (two decimal places). Admin input is
//! parsed from decimal text directly so `19.99` never passes through a float.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places carried by [`Money`].
pub const MINOR_UNIT_PLACES: u32 = 2;

const MINOR_PER_MAJOR: i64 = 10_i64.pow(MINOR_UNIT_PLACES);

/// A price in minor units (e.g. cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    pub amount_minor: i64,
}

/// Error returned when price text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price: {0:?}")]
pub struct ParseMoneyError(pub String);

impl Money {
    pub fn from_minor(amount_minor: i64) -> Self {
        Self { amount_minor }
    }

    /// Whole major units (`Money::from_major(100)` is `100.00`).
    pub fn from_major(amount: i64) -> Self {
        Self {
            amount_minor: amount.saturating_mul(MINOR_PER_MAJOR),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Render for the wire: whole amounts without decimals (`100`), otherwise
    /// always two places (`19.50`).
    pub fn to_wire(&self) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let major = abs / MINOR_PER_MAJOR as u64;
        let minor = abs % MINOR_PER_MAJOR as u64;
        if minor == 0 {
            format!("{}{}", sign, major)
        } else {
            format!(
                "{}{}.{:0width$}",
                sign,
                major,
                minor,
                width = MINOR_UNIT_PLACES as usize
            )
        }
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoneyError(s.to_string());
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };
        if (major.is_empty() && minor.is_empty())
            || minor.len() > MINOR_UNIT_PLACES as usize
            || !major.chars().all(|c| c.is_ascii_digit())
            || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return Err(err());
        }

        let major: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| err())?
        };
        let mut minor_value: i64 = if minor.is_empty() {
            0
        } else {
            minor.parse().map_err(|_| err())?
        };
        for _ in minor.len()..MINOR_UNIT_PLACES as usize {
            minor_value *= 10;
        }

        let amount = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor_value))
            .ok_or_else(err)?;
        Ok(Self::from_minor(if negative { -amount } else { amount }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Backends send prices both as JSON numbers and as strings.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("19.99".parse::<Money>().unwrap().amount_minor, 1999);
        assert_eq!("19.5".parse::<Money>().unwrap().amount_minor, 1950);
        assert_eq!("100".parse::<Money>().unwrap().amount_minor, 10000);
        assert_eq!(" .5 ".parse::<Money>().unwrap().amount_minor, 50);
        assert_eq!("-3.25".parse::<Money>().unwrap().amount_minor, -325);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.999".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
    }

    #[test]
    fn test_wire_rendering() {
        assert_eq!(Money::from_major(100).to_wire(), "100");
        assert_eq!(Money::from_minor(1999).to_wire(), "19.99");
        assert_eq!(Money::from_minor(1950).to_wire(), "19.50");
        assert_eq!(Money::from_minor(-5).to_wire(), "-0.05");
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let a: Money = serde_json::from_str("12.5").unwrap();
        let b: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.amount_minor, 1250);
    }
}
