//! Unit conversion and plain-decimal formatting for offer amounts.
//!
//! Every amount that flows through reconciliation is a [`BigDecimal`]. Native
//! amounts are entered in HDD and reconciled in bytes (10^12 per HDD); CAT amounts
//! are entered in CAT units and reconciled in CAT bytes (10^3 per CAT).

use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Zero};

use crate::OfferError;

/// Bytes per HDD, as a power of ten.
pub const HDD_DECIMALS: i64 = 12;

/// CAT bytes per CAT, as a power of ten.
pub const CAT_DECIMALS: i64 = 3;

fn pow10(exponent: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(1), -exponent)
}

/// Parse a user-entered decimal amount.
///
/// Exponent notation and negative values are rejected.
pub fn parse_amount(amount: &str) -> Result<BigDecimal, OfferError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(OfferError::invalid_amount(amount, "amount is empty"));
    }
    if trimmed.contains(['e', 'E', '+']) {
        return Err(OfferError::invalid_amount(
            amount,
            "exponent notation is not supported",
        ));
    }

    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| OfferError::invalid_amount(amount, e.to_string()))?;
    if value < BigDecimal::zero() {
        return Err(OfferError::invalid_amount(amount, "amount must not be negative"));
    }

    Ok(value)
}

/// Convert an HDD amount string into bytes.
pub fn hddcoin_to_byte(amount: &str) -> Result<BigDecimal, OfferError> {
    Ok(parse_amount(amount)? * pow10(HDD_DECIMALS))
}

/// Convert a CAT amount string into CAT bytes.
pub fn cat_to_byte(amount: &str) -> Result<BigDecimal, OfferError> {
    Ok(parse_amount(amount)? * pow10(CAT_DECIMALS))
}

#[must_use]
pub fn byte_to_hddcoin(bytes: &BigDecimal) -> BigDecimal {
    bytes * &pow10(-HDD_DECIMALS)
}

#[must_use]
pub fn byte_to_cat(bytes: &BigDecimal) -> BigDecimal {
    bytes * &pow10(-CAT_DECIMALS)
}

/// Render `value` as a plain decimal string with no exponent and no trailing zeros.
#[must_use]
pub fn format_amount(value: &BigDecimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalized().to_plain_string()
}

/// Serde adapter: amounts are written as plain decimal strings and read from
/// JSON numbers or strings.
pub mod serde_amount {
    use std::collections::BTreeMap;
    use std::fmt;
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use bigdecimal::num_bigint::BigInt;
    use serde::de::{self, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::format_amount;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_amount(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = BigDecimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal amount as a number or string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(BigDecimal::from(BigInt::from(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            BigDecimal::from_str(&v.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            BigDecimal::from_str(v.trim()).map_err(E::custom)
        }
    }

    struct AmountValue(BigDecimal);

    impl<'de> Deserialize<'de> for AmountValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(AmountVisitor).map(Self)
        }
    }

    /// Same adapter for `assetId -> amount` maps.
    pub mod map {
        use super::{AmountValue, BTreeMap, BigDecimal, Deserialize, Deserializer, SerializeMap};
        use super::{Serializer, format_amount};

        pub fn serialize<S: Serializer>(
            value: &BTreeMap<String, BigDecimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(value.len()))?;
            for (key, amount) in value {
                map.serialize_entry(key, &format_amount(amount))?;
            }
            map.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<BTreeMap<String, BigDecimal>, D::Error> {
            let raw = BTreeMap::<String, AmountValue>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(|(key, value)| (key, value.0)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).expect("decimal literal")
    }

    #[test]
    fn hddcoin_amounts_convert_to_bytes_exactly() {
        assert_eq!(
            hddcoin_to_byte("1.5").expect("valid"),
            dec("1500000000000")
        );
        assert_eq!(
            hddcoin_to_byte("0.000000000001").expect("valid"),
            dec("1")
        );
    }

    #[test]
    fn cat_amounts_convert_to_cat_bytes() {
        assert_eq!(cat_to_byte("2.345").expect("valid"), dec("2345"));
        assert_eq!(byte_to_cat(&dec("2345")), dec("2.345"));
    }

    #[test]
    fn parse_rejects_blank_negative_and_exponent() {
        assert!(matches!(
            parse_amount("  "),
            Err(OfferError::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_amount("-1"),
            Err(OfferError::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_amount("1e3"),
            Err(OfferError::InvalidAmount { .. })
        ));
        assert!(matches!(
            parse_amount("abc"),
            Err(OfferError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn format_is_plain_and_trimmed() {
        assert_eq!(format_amount(&dec("1500000000000")), "1500000000000");
        assert_eq!(format_amount(&dec("1.500")), "1.5");
        assert_eq!(format_amount(&dec("0.0001")), "0.0001");
        assert_eq!(format_amount(&dec("0")), "0");
        assert_eq!(format_amount(&dec("-12.5")), "-12.5");
        assert_eq!(format_amount(&byte_to_hddcoin(&dec("1"))), "0.000000000001");
        assert_eq!(format_amount(&dec("0.000")), "0");
        assert_eq!(format_amount(&dec("-0.00002500")), "-0.000025");
    }

    #[test]
    fn serde_reads_numbers_and_strings() {
        #[derive(serde::Deserialize, serde::Serialize)]
        struct Holder {
            #[serde(with = "serde_amount")]
            amount: BigDecimal,
        }

        let from_number: Holder =
            serde_json::from_value(serde_json::json!({ "amount": 1_000_000 })).expect("number");
        assert_eq!(from_number.amount, dec("1000000"));

        let from_text: Holder =
            serde_json::from_value(serde_json::json!({ "amount": "0.25" })).expect("string");
        assert_eq!(from_text.amount, dec("0.25"));

        let json = serde_json::to_value(&from_text).expect("serialize");
        assert_eq!(json, serde_json::json!({ "amount": "0.25" }));
    }
}
