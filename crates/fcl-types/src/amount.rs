use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Base units per whole coin.
pub const UNITS_PER_COIN: u128 = 1_000_000_000_000_000_000;

const COIN_DECIMALS: usize = 18;

/// Native currency held in escrow, in indivisible base units.
///
/// Serialized as a decimal coin string (`"0.5"`) so the value survives
/// formats without 128-bit integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    pub const fn units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a decimal coin amount such as `"1"`, `"0.5"` or `".25"`.
    pub fn parse_coins(input: &str) -> Result<Self, TypeError> {
        let input = input.trim();
        let invalid = || TypeError::InvalidAmount(input.to_string());

        let (whole, frac) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac.len() > COIN_DECIMALS {
            return Err(invalid());
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .map_err(|_| TypeError::AmountOverflow)?
                .checked_mul(UNITS_PER_COIN)
                .ok_or(TypeError::AmountOverflow)?
        };
        let frac_units = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = COIN_DECIMALS);
            padded.parse::<u128>().map_err(|_| invalid())?
        };

        whole_units
            .checked_add(frac_units)
            .map(Self)
            .ok_or(TypeError::AmountOverflow)
    }

    /// Render as a decimal coin string without trailing zeros.
    pub fn to_coin_string(&self) -> String {
        let whole = self.0 / UNITS_PER_COIN;
        let frac = self.0 % UNITS_PER_COIN;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:0>width$}", width = COIN_DECIMALS);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_coins(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coin_string())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_coin_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_coins(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(Amount::parse_coins("1").unwrap().units(), UNITS_PER_COIN);
        assert_eq!(Amount::parse_coins("0.5").unwrap().units(), UNITS_PER_COIN / 2);
        assert_eq!(Amount::parse_coins(".25").unwrap().units(), UNITS_PER_COIN / 4);
        assert_eq!(Amount::parse_coins("0").unwrap(), Amount::ZERO);
    }

    #[test]
    fn parse_smallest_unit() {
        let one_unit = Amount::parse_coins("0.000000000000000001").unwrap();
        assert_eq!(one_unit.units(), 1);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Amount::parse_coins("").is_err());
        assert!(Amount::parse_coins(".").is_err());
        assert!(Amount::parse_coins("-1").is_err());
        assert!(Amount::parse_coins("1.2.3").is_err());
        assert!(Amount::parse_coins("abc").is_err());
        assert!(Amount::parse_coins("0.0000000000000000001").is_err());
    }

    #[test]
    fn parse_reports_overflow() {
        let huge = "9".repeat(40);
        assert_eq!(Amount::parse_coins(&huge), Err(TypeError::AmountOverflow));
    }

    #[test]
    fn coin_string_trims_trailing_zeros() {
        assert_eq!(Amount::parse_coins("1.50").unwrap().to_coin_string(), "1.5");
        assert_eq!(Amount::parse_coins("0.2").unwrap().to_string(), "0.2");
        assert_eq!(Amount::ZERO.to_string(), "0");
    }

    #[test]
    fn checked_arithmetic() {
        let half = Amount::parse_coins("0.5").unwrap();
        let one = half.checked_add(half).unwrap();
        assert_eq!(one.units(), UNITS_PER_COIN);
        assert_eq!(half.checked_sub(one), None);
        assert_eq!(Amount::from_units(u128::MAX).checked_add(Amount::from_units(1)), None);
    }

    #[test]
    fn serde_uses_coin_strings() {
        let amount = Amount::parse_coins("0.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"0.5\"");
        let parsed: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, amount);
        assert!(serde_json::from_str::<Amount>("\"x\"").is_err());
    }

    proptest::proptest! {
        #[test]
        fn coin_string_is_lossless(units in proptest::num::u128::ANY) {
            let amount = Amount::from_units(units);
            let parsed = Amount::parse_coins(&amount.to_coin_string()).unwrap();
            proptest::prop_assert_eq!(parsed, amount);
        }
    }
}
