//! Fixed-point decimal fields.
//!
//! Prices carry exactly two fractional digits, ratings exactly one.
//! Both serialize as decimal strings ("99.99", "4.5") and accept JSON
//! numbers or strings on input, rejecting excess precision.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ModelError;

/// Non-negative price in hundredths, at most 9999.99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

/// Non-negative rating in tenths, at most 9.9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(i64);

impl Price {
    pub fn from_minor(minor: i64) -> Result<Self, ModelError> {
        if !(0..=999_999).contains(&minor) {
            return Err(ModelError::Validation("price out of range".into()));
        }
        Ok(Self(minor))
    }

    /// Value in hundredths.
    pub fn minor(self) -> i64 {
        self.0
    }
}

impl Rating {
    pub fn from_minor(minor: i64) -> Result<Self, ModelError> {
        if !(0..=99).contains(&minor) {
            return Err(ModelError::Validation("rating out of range".into()));
        }
        Ok(Self(minor))
    }

    /// Value in tenths.
    pub fn minor(self) -> i64 {
        self.0
    }
}

/// Parse a non-negative decimal literal with at most `scale` fractional
/// digits into minor units.
fn parse_fixed(s: &str, scale: u32, what: &str) -> Result<i64, ModelError> {
    let s = s.trim();
    let invalid = || ModelError::Validation(format!("invalid {what}: {s:?}"));
    if s.is_empty() || s.starts_with('+') || s.starts_with('-') {
        return Err(invalid());
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac_part.len() > scale as usize {
        return Err(ModelError::Validation(format!(
            "{what} allows at most {scale} fractional digit(s): {s:?}"
        )));
    }

    let unit = 10_i64.pow(scale);
    let whole: i64 = int_part.parse().map_err(|_| invalid())?;
    let mut frac: i64 = if frac_part.is_empty() { 0 } else { frac_part.parse().map_err(|_| invalid())? };
    frac *= 10_i64.pow(scale - frac_part.len() as u32);

    whole
        .checked_mul(unit)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(invalid)
}

impl FromStr for Price {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Price::from_minor(parse_fixed(s, 2, "price")?)
    }
}

impl FromStr for Rating {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rating::from_minor(parse_fixed(s, 1, "rating")?)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct FixedVisitor {
    scale: u32,
    what: &'static str,
}

impl<'de> Visitor<'de> for FixedVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a decimal number or string for a {}", self.what)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        parse_fixed(v, self.scale, self.what).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        // The shortest display form round-trips JSON number literals
        // like 1.5 and 99.99 exactly.
        parse_fixed(&v.to_string(), self.scale, self.what).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        parse_fixed(&v.to_string(), self.scale, self.what).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        parse_fixed(&v.to_string(), self.scale, self.what).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let minor = deserializer.deserialize_any(FixedVisitor { scale: 2, what: "price" })?;
        Price::from_minor(minor).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let minor = deserializer.deserialize_any(FixedVisitor { scale: 1, what: "rating" })?;
        Rating::from_minor(minor).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_parses_and_formats() {
        let p: Price = "99.99".parse().unwrap();
        assert_eq!(p.minor(), 9999);
        assert_eq!(p.to_string(), "99.99");

        let p: Price = "1.5".parse().unwrap();
        assert_eq!(p.minor(), 150);
        assert_eq!(p.to_string(), "1.50");

        let p: Price = "3".parse().unwrap();
        assert_eq!(p.to_string(), "3.00");
    }

    #[test]
    fn price_rejects_bad_input() {
        assert!("abc".parse::<Price>().is_err());
        assert!("-1.00".parse::<Price>().is_err());
        assert!("1.234".parse::<Price>().is_err());
        assert!("10000.00".parse::<Price>().is_err());
        assert!("".parse::<Price>().is_err());
    }

    #[test]
    fn rating_single_fractional_digit() {
        let r: Rating = "4.5".parse().unwrap();
        assert_eq!(r.minor(), 45);
        assert_eq!(r.to_string(), "4.5");
        assert!("4.55".parse::<Rating>().is_err());
        assert!("12.0".parse::<Rating>().is_err());
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let p: Price = serde_json::from_str("1.5").unwrap();
        assert_eq!(p.minor(), 150);
        let p: Price = serde_json::from_str("\"99.99\"").unwrap();
        assert_eq!(p.minor(), 9999);
        let r: Rating = serde_json::from_str("4.5").unwrap();
        assert_eq!(r.minor(), 45);
        let r: Rating = serde_json::from_str("4").unwrap();
        assert_eq!(r.to_string(), "4.0");
        assert!(serde_json::from_str::<Rating>("4.55").is_err());
    }

    #[test]
    fn serializes_as_strings() {
        let p: Price = "19.99".parse().unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"19.99\"");
        let r: Rating = "4.5".parse().unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"4.5\"");
    }
}
