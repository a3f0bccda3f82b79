// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! An arbitrary-precision fixed-point decimal number.
//!
//! A [`FixedPoint`] denotes `amount × 10^-decimals` with a big-integer amount.
//! Two instances are value-equal iff they denote the same number after
//! rescaling to a common decimal count. All operations return new instances;
//! string conversion assembles digits manually and never touches floating point.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    config::{Config, NumberInputMode},
    errors::NumericError,
    parsing::{expand_scientific_notation, significant_digits},
    rounding::{RoundingMode, round_div},
};

/// Returns `10^exp` as a big integer.
#[must_use]
pub fn pow10(exp: u32) -> BigInt {
    BigInt::from(10).pow(exp)
}

/// An immutable arbitrary-precision decimal: `amount × 10^-decimals`.
#[derive(Clone)]
pub struct FixedPoint {
    /// The scaled integer amount.
    pub amount: BigInt,
    /// The number of decimal places the amount is scaled by.
    pub decimals: u32,
}

impl FixedPoint {
    /// Creates a new [`FixedPoint`] instance.
    #[must_use]
    pub fn new(amount: impl Into<BigInt>, decimals: u32) -> Self {
        Self {
            amount: amount.into(),
            decimals,
        }
    }

    /// Creates a zero value at the given decimal count.
    #[must_use]
    pub fn zero(decimals: u32) -> Self {
        Self::new(0, decimals)
    }

    /// Creates a value from an integer, at zero decimals.
    #[must_use]
    pub fn from_int(value: impl Into<BigInt>) -> Self {
        Self::new(value, 0)
    }

    /// Creates a value from an `f64` literal, subject to the active
    /// [`Config`] input-validation policy.
    ///
    /// The float is rendered to its shortest round-trip decimal form and parsed
    /// as text; the value itself never flows through float arithmetic again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `value` is not finite.
    /// - The configured [`NumberInputMode`] rejects the literal
    ///   ([`NumericError::PrecisionLoss`]).
    pub fn try_from_f64(value: f64) -> Result<Self, NumericError> {
        let config = Config::get();
        let rendered = value.to_string();

        if matches!(config.number_input_mode, NumberInputMode::Never) {
            return Err(NumericError::PrecisionLoss {
                input: rendered.clone(),
                digits: significant_digits(&rendered),
            });
        }
        if !value.is_finite() {
            return Err(NumericError::InvalidInput {
                reason: format!("'{rendered}' is not a finite number"),
            });
        }

        let plain = expand_scientific_notation(&rendered)?;
        let digits = significant_digits(&plain);
        if digits > config.precision_warning_threshold {
            let escalate = config.strict_precision
                || matches!(config.number_input_mode, NumberInputMode::Error);
            if escalate {
                return Err(NumericError::PrecisionLoss {
                    input: plain,
                    digits,
                });
            }
            if matches!(config.number_input_mode, NumberInputMode::Warn) {
                log::warn!(
                    "float literal {plain} carries {digits} significant digits and may not be the value you intended; prefer a string literal"
                );
            }
        }

        plain.parse()
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns `true` if the value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs(), self.decimals)
    }

    /// Rescales to `decimals` places: scaling up is exact, scaling down
    /// truncates toward zero.
    #[must_use]
    pub fn rescale(&self, decimals: u32) -> Self {
        match decimals.cmp(&self.decimals) {
            Ordering::Equal => self.clone(),
            Ordering::Greater => Self::new(
                &self.amount * pow10(decimals - self.decimals),
                decimals,
            ),
            Ordering::Less => Self::new(
                &self.amount / pow10(self.decimals - decimals),
                decimals,
            ),
        }
    }

    /// Rescales to `decimals` places, rounding a downscale with `mode`.
    #[must_use]
    pub fn rescale_round(&self, decimals: u32, mode: RoundingMode) -> Self {
        if decimals >= self.decimals {
            return self.rescale(decimals);
        }
        let divisor = pow10(self.decimals - decimals);
        // The divisor is a positive power of ten, so this cannot fail
        let amount = round_div(&self.amount, &divisor, mode).expect("positive divisor");
        Self::new(amount, decimals)
    }

    /// Returns both amounts rescaled to the larger decimal count.
    #[must_use]
    pub fn with_common_scale(&self, other: &Self) -> (BigInt, BigInt, u32) {
        let decimals = self.decimals.max(other.decimals);
        (
            self.rescale(decimals).amount,
            other.rescale(decimals).amount,
            decimals,
        )
    }

    /// Adds two values exactly, at the larger decimal count.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let (lhs, rhs, decimals) = self.with_common_scale(other);
        Self::new(lhs + rhs, decimals)
    }

    /// Subtracts `other` exactly, at the larger decimal count.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let (lhs, rhs, decimals) = self.with_common_scale(other);
        Self::new(lhs - rhs, decimals)
    }

    /// Multiplies two values at their common decimal count, truncating any
    /// precision beyond that scale.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let (lhs, rhs, decimals) = self.with_common_scale(other);
        Self::new((lhs * rhs) / pow10(decimals), decimals)
    }

    /// Multiplies two values exactly, at the sum of their decimal counts.
    ///
    /// Unlike [`FixedPoint::mul`] no precision is discarded; the resulting
    /// scale grows with every call.
    #[must_use]
    pub fn mul_exact(&self, other: &Self) -> Self {
        Self::new(&self.amount * &other.amount, self.decimals + other.decimals)
    }

    /// Returns the value with trailing fractional zeros removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if self.decimals == 0 {
            return self.clone();
        }
        if self.amount.is_zero() {
            return Self::zero(0);
        }
        let ten = BigInt::from(10);
        let mut amount = self.amount.clone();
        let mut decimals = self.decimals;
        while decimals > 0 && (&amount % &ten).is_zero() {
            amount /= &ten;
            decimals -= 1;
        }
        Self::new(amount, decimals)
    }

    /// Returns `true` if any non-zero digit exists below `decimals` places.
    #[must_use]
    pub fn has_precision_below(&self, decimals: u32) -> bool {
        if self.decimals <= decimals {
            return false;
        }
        !(&self.amount % pow10(self.decimals - decimals)).is_zero()
    }

    /// Converts to a 96-bit [`Decimal`] for interop with decimal-typed stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exceeds `Decimal` range or scale.
    pub fn to_decimal(&self) -> anyhow::Result<Decimal> {
        if self.decimals > 28 {
            anyhow::bail!(
                "`decimals` exceeded maximum Decimal scale (28), was {}",
                self.decimals
            )
        }
        let mantissa = self.amount.to_i128().ok_or_else(|| {
            anyhow::anyhow!("amount {} cannot be represented in 128 bits", self.amount)
        })?;
        Decimal::try_from_i128_with_scale(mantissa, self.decimals)
            .map_err(|e| anyhow::anyhow!("Decimal conversion failed: {e}"))
    }
}

impl Display for FixedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.amount.is_negative() { "-" } else { "" };
        let magnitude = self.amount.magnitude();
        if self.decimals == 0 {
            return write!(f, "{sign}{magnitude}");
        }
        let scale = pow10(self.decimals).into_parts().1;
        let int_part = magnitude / &scale;
        let frac_part = (magnitude % &scale).to_string();
        write!(
            f,
            "{sign}{int_part}.{frac_part:0>width$}",
            width = self.decimals as usize
        )
    }
}

impl Debug for FixedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(FixedPoint))
    }
}

impl FromStr for FixedPoint {
    type Err = NumericError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| NumericError::InvalidInput {
            reason: format!("cannot parse '{value}' as a fixed-point number: {reason}"),
        };

        let (sign, unsigned) = match value.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, value.strip_prefix('+').unwrap_or(value)),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int, frac)) => {
                if frac.contains('.') {
                    return Err(invalid("multiple decimal points"));
                }
                (int, frac)
            }
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("unexpected character"));
        }

        let digits = format!("{int_part}{frac_part}");
        let amount: BigInt = digits.parse().map_err(|_| invalid("unparseable digits"))?;
        Ok(Self::new(amount * sign, frac_part.len() as u32))
    }
}

impl PartialEq for FixedPoint {
    fn eq(&self, other: &Self) -> bool {
        let (lhs, rhs, _) = self.with_common_scale(other);
        lhs == rhs
    }
}

impl Eq for FixedPoint {}

impl Hash for FixedPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        normalized.amount.hash(state);
        normalized.decimals.hash(state);
    }
}

impl PartialOrd for FixedPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.with_common_scale(other);
        lhs.cmp(&rhs)
    }
}

impl Neg for &FixedPoint {
    type Output = FixedPoint;

    fn neg(self) -> Self::Output {
        FixedPoint::new(-&self.amount, self.decimals)
    }
}

impl Add for &FixedPoint {
    type Output = FixedPoint;

    fn add(self, rhs: Self) -> Self::Output {
        FixedPoint::add(self, rhs)
    }
}

impl Sub for &FixedPoint {
    type Output = FixedPoint;

    fn sub(self, rhs: Self) -> Self::Output {
        FixedPoint::sub(self, rhs)
    }
}

impl Mul for &FixedPoint {
    type Output = FixedPoint;

    fn mul(self, rhs: Self) -> Self::Output {
        FixedPoint::mul(self, rhs)
    }
}

#[derive(Serialize, Deserialize)]
struct FixedPointJson {
    amount: String,
    decimals: String,
}

impl Serialize for FixedPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Big integers travel as decimal strings to survive interchange intact
        FixedPointJson {
            amount: self.amount.to_string(),
            decimals: self.decimals.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FixedPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = FixedPointJson::deserialize(deserializer)?;
        let amount: BigInt = json
            .amount
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount '{}'", json.amount)))?;
        let decimals: u32 = json.decimals.parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid decimals '{}'", json.decimals))
        })?;
        Ok(Self::new(amount, decimals))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::config;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("0", "0")]
    #[case("1.50", "1.50")]
    #[case("-0.05", "-0.05")]
    #[case("123456789012345678901234567890.123456789", "123456789012345678901234567890.123456789")]
    #[case("+1.5", "1.5")]
    #[case(".5", "0.5")]
    fn test_parse_display_round_trip(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(fp(input).to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("1.2.3")]
    #[case("1,2")]
    #[case("12a")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(input.parse::<FixedPoint>().is_err());
    }

    #[rstest]
    fn test_add_rescales_to_max_decimals() {
        let result = fp("1.5").add(&fp("0.25"));
        assert_eq!(result.decimals, 2);
        assert_eq!(result.to_string(), "1.75");
    }

    #[rstest]
    fn test_sub_is_exact() {
        let result = fp("1").sub(&fp("0.999"));
        assert_eq!(result.to_string(), "0.001");
    }

    #[rstest]
    fn test_mul_truncates_beyond_common_scale() {
        // 1.25 * 0.35 = 0.4375; common scale is 2, so the result truncates
        let result = fp("1.25").mul(&fp("0.35"));
        assert_eq!(result.to_string(), "0.43");
    }

    #[rstest]
    fn test_mul_exact_keeps_full_precision() {
        let result = fp("1.25").mul_exact(&fp("0.35"));
        assert_eq!(result.decimals, 4);
        assert_eq!(result.to_string(), "0.4375");
    }

    #[rstest]
    fn test_mul_carries_enough_scale_for_percentages() {
        let result = fp("1234.56").mul(&fp("0.0825"));
        assert_eq!(result.to_string(), "101.8512");
    }

    #[rstest]
    #[case("1.5", 3, "1.500")]
    #[case("1.567", 1, "1.5")]
    #[case("-1.567", 1, "-1.5")]
    fn test_rescale(#[case] input: &str, #[case] decimals: u32, #[case] expected: &str) {
        assert_eq!(fp(input).rescale(decimals).to_string(), expected);
    }

    #[rstest]
    #[case("2.5", 0, RoundingMode::HalfEven, "2")]
    #[case("3.5", 0, RoundingMode::HalfEven, "4")]
    #[case("2.5", 0, RoundingMode::HalfExpand, "3")]
    #[case("1.567", 2, RoundingMode::Ceil, "1.57")]
    #[case("-1.561", 2, RoundingMode::Ceil, "-1.56")]
    fn test_rescale_round(
        #[case] input: &str,
        #[case] decimals: u32,
        #[case] mode: RoundingMode,
        #[case] expected: &str,
    ) {
        assert_eq!(fp(input).rescale_round(decimals, mode).to_string(), expected);
    }

    #[rstest]
    fn test_value_equality_across_scales() {
        assert_eq!(fp("1.5"), fp("1.500"));
        assert_ne!(fp("1.5"), fp("1.501"));
        assert!(fp("1.5") < fp("1.51"));
        assert!(fp("-2") < fp("-1.99"));
    }

    #[rstest]
    fn test_normalized_strips_trailing_zeros() {
        let normalized = fp("1.500").normalized();
        assert_eq!(normalized.decimals, 1);
        assert_eq!(normalized.to_string(), "1.5");
        assert_eq!(fp("0.000").normalized().decimals, 0);
    }

    #[rstest]
    fn test_has_precision_below() {
        assert!(fp("1.005").has_precision_below(2));
        assert!(!fp("1.050").has_precision_below(2));
        assert!(!fp("1.05").has_precision_below(2));
    }

    #[rstest]
    fn test_serde_amounts_travel_as_strings() {
        let value = fp("-12.345");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"amount":"-12345","decimals":"3"}"#);
        let back: FixedPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert_eq!(back.decimals, value.decimals);
    }

    #[rstest]
    fn test_to_decimal() {
        use rust_decimal_macros::dec;
        assert_eq!(fp("1.50").to_decimal().unwrap(), dec!(1.50));
        assert!(FixedPoint::new(1, 40).to_decimal().is_err());
    }

    #[rstest]
    fn test_try_from_f64_warn_mode_proceeds() {
        let _lock = config::test_guard();
        Config::reset();
        let value = FixedPoint::try_from_f64(0.5).unwrap();
        assert_eq!(value, fp("0.5"));
    }

    #[rstest]
    fn test_try_from_f64_error_mode_rejects_imprecise() {
        let _lock = config::test_guard();
        Config::reset();
        let _guard = Config::scoped(|c| c.number_input_mode = NumberInputMode::Error);
        let result = FixedPoint::try_from_f64(0.1 + 0.2);
        assert!(matches!(result, Err(NumericError::PrecisionLoss { .. })));
    }

    #[rstest]
    fn test_try_from_f64_never_mode_rejects_all() {
        let _lock = config::test_guard();
        Config::reset();
        let _guard = Config::scoped(|c| c.number_input_mode = NumberInputMode::Never);
        let result = FixedPoint::try_from_f64(1.0);
        assert!(matches!(result, Err(NumericError::PrecisionLoss { .. })));
    }

    #[rstest]
    fn test_try_from_f64_rejects_non_finite() {
        let _lock = config::test_guard();
        Config::reset();
        assert!(FixedPoint::try_from_f64(f64::NAN).is_err());
        assert!(FixedPoint::try_from_f64(f64::INFINITY).is_err());
    }

    proptest! {
        #[test]
        fn prop_string_round_trip(amount in any::<i128>(), decimals in 0u32..30) {
            let value = FixedPoint::new(amount, decimals);
            let parsed: FixedPoint = value.to_string().parse().unwrap();
            prop_assert_eq!(&parsed, &value);
            prop_assert_eq!(parsed.decimals, value.decimals);
        }

        #[test]
        fn prop_add_sub_round_trip(a in any::<i64>(), b in any::<i64>(), da in 0u32..12, db in 0u32..12) {
            let lhs = FixedPoint::new(a, da);
            let rhs = FixedPoint::new(b, db);
            let back = lhs.add(&rhs).sub(&rhs);
            prop_assert_eq!(back, lhs);
        }
    }
}
