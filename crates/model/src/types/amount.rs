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

//! The closed union of the two amount representations a monetary value can hold.
//!
//! Money operations dispatch on this tag exhaustively, promoting to
//! [`Rational`] only where fixed-point arithmetic would lose precision and
//! demoting back to [`FixedPoint`] only on request.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use exacta_core::{FixedPoint, FixedPointBound, Rational, RoundingMode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Decimal-expansion length at which mixed-representation equality is decided.
pub const EQ_EXPANSION_DIGITS: u32 = 50;

/// Either an exact fixed-point decimal or an exact rational amount.
#[derive(Clone)]
pub enum MoneyAmount {
    /// A decimal amount `amount × 10^-decimals`.
    Fixed(FixedPoint),
    /// An exact fraction, used where division is not exact in base 10.
    Rational(Rational),
}

impl MoneyAmount {
    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Fixed(fixed) => fixed.is_zero(),
            Self::Rational(rational) => rational.is_zero(),
        }
    }

    /// Returns `true` if the value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Fixed(fixed) => fixed.is_negative(),
            Self::Rational(rational) => rational.is_negative(),
        }
    }

    /// Negates the value.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Fixed(fixed) => Self::Fixed(-fixed),
            Self::Rational(rational) => Self::Rational(rational.neg()),
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_negative() { self.neg() } else { self.clone() }
    }

    /// Promotes to the exact rational representation.
    #[must_use]
    pub fn to_rational(&self) -> Rational {
        match self {
            Self::Fixed(fixed) => Rational::from_fixed_point(fixed),
            Self::Rational(rational) => rational.clone(),
        }
    }

    /// Demotes to a fixed-point value at `decimals` places, rounding with `mode`.
    #[must_use]
    pub fn demote(&self, decimals: u32, mode: RoundingMode) -> FixedPoint {
        match self {
            Self::Fixed(fixed) => fixed.rescale_round(decimals, mode),
            Self::Rational(rational) => rational
                .to_fixed_point(FixedPointBound::MaxPrecision(decimals), mode)
                .expect("denominator is non-zero by construction"),
        }
    }

    /// Adds two amounts: the fixed-point fast path is exact, and mixed
    /// representations promote to rationals.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Fixed(lhs), Self::Fixed(rhs)) => Self::Fixed(lhs.add(rhs)),
            _ => Self::Rational(self.to_rational().add(&other.to_rational())),
        }
    }

    /// Subtracts `other`, with the same promotion rules as [`MoneyAmount::add`].
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Fixed(lhs), Self::Fixed(rhs)) => Self::Fixed(lhs.sub(rhs)),
            _ => Self::Rational(self.to_rational().sub(&other.to_rational())),
        }
    }

    /// Compares two amounts by exact value.
    #[must_use]
    pub fn cmp_values(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Fixed(lhs), Self::Fixed(rhs)) => lhs.cmp(rhs),
            _ => {
                let diff = self.to_rational().sub(&other.to_rational());
                if diff.is_zero() {
                    Ordering::Equal
                } else if diff.is_negative() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        }
    }

    /// Renders the truncated decimal expansion to `precision` fractional digits.
    #[must_use]
    pub fn expansion(&self, precision: u32) -> String {
        self.to_rational().to_decimal_string(precision)
    }
}

impl From<FixedPoint> for MoneyAmount {
    fn from(value: FixedPoint) -> Self {
        Self::Fixed(value)
    }
}

impl From<Rational> for MoneyAmount {
    fn from(value: Rational) -> Self {
        Self::Rational(value)
    }
}

impl Display for MoneyAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(fixed) => write!(f, "{fixed}"),
            Self::Rational(rational) => write!(f, "{}", rational.to_decimal_string(EQ_EXPANSION_DIGITS)),
        }
    }
}

impl Debug for MoneyAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(fixed) => write!(f, "{fixed:?}"),
            Self::Rational(rational) => write!(f, "{rational:?}"),
        }
    }
}

impl PartialEq for MoneyAmount {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(lhs), Self::Fixed(rhs)) => lhs == rhs,
            (Self::Rational(lhs), Self::Rational(rhs)) => lhs == rhs,
            // Mixed representations are equal iff their expansions agree
            _ => self.expansion(EQ_EXPANSION_DIGITS) == other.expansion(EQ_EXPANSION_DIGITS),
        }
    }
}

impl Eq for MoneyAmount {}

impl Hash for MoneyAmount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expansion(EQ_EXPANSION_DIGITS).hash(state);
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MoneyAmountJson {
    Plain(String),
    Fixed { amount: String, decimals: String },
    Rational { p: String, q: String },
}

impl Serialize for MoneyAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Fixed(fixed) => fixed.serialize(serializer),
            Self::Rational(rational) => rational.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MoneyAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match MoneyAmountJson::deserialize(deserializer)? {
            MoneyAmountJson::Plain(text) => {
                let fixed: FixedPoint = text.parse().map_err(serde::de::Error::custom)?;
                Ok(Self::Fixed(fixed))
            }
            MoneyAmountJson::Fixed { amount, decimals } => {
                let amount: num_bigint::BigInt = amount
                    .parse()
                    .map_err(|_| serde::de::Error::custom(format!("invalid amount '{amount}'")))?;
                let decimals: u32 = decimals.parse().map_err(|_| {
                    serde::de::Error::custom(format!("invalid decimals '{decimals}'"))
                })?;
                Ok(Self::Fixed(FixedPoint::new(amount, decimals)))
            }
            MoneyAmountJson::Rational { p, q } => {
                let p: num_bigint::BigInt = p
                    .parse()
                    .map_err(|_| serde::de::Error::custom(format!("invalid numerator '{p}'")))?;
                let q: num_bigint::BigInt = q
                    .parse()
                    .map_err(|_| serde::de::Error::custom(format!("invalid denominator '{q}'")))?;
                Rational::new_checked(p, q)
                    .map(Self::Rational)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn fixed(s: &str) -> MoneyAmount {
        MoneyAmount::Fixed(s.parse().unwrap())
    }

    #[rstest]
    fn test_fixed_fast_path_stays_fixed() {
        let sum = fixed("1.50").add(&fixed("0.25"));
        assert!(matches!(sum, MoneyAmount::Fixed(_)));
        assert_eq!(sum, fixed("1.75"));
    }

    #[rstest]
    fn test_mixed_add_promotes_to_rational() {
        let sum = fixed("0.5").add(&MoneyAmount::Rational(Rational::new(1, 3)));
        assert!(matches!(sum, MoneyAmount::Rational(_)));
        assert_eq!(sum, MoneyAmount::Rational(Rational::new(5, 6)));
    }

    #[rstest]
    fn test_mixed_equality_uses_expansion() {
        let as_fixed = fixed("0.125");
        let as_rational = MoneyAmount::Rational(Rational::new(1, 8));
        assert_eq!(as_fixed, as_rational);
        assert_ne!(as_fixed, MoneyAmount::Rational(Rational::new(1, 3)));
    }

    #[rstest]
    fn test_demote_rounds_rationals() {
        let third = MoneyAmount::Rational(Rational::new(1, 3));
        assert_eq!(
            third.demote(2, RoundingMode::HalfExpand).to_string(),
            "0.33"
        );
    }

    #[rstest]
    fn test_cmp_values_across_representations() {
        let third = MoneyAmount::Rational(Rational::new(1, 3));
        assert_eq!(fixed("0.33").cmp_values(&third), Ordering::Less);
        assert_eq!(fixed("0.34").cmp_values(&third), Ordering::Greater);
    }

    #[rstest]
    fn test_serde_fixed_and_rational_forms() {
        let fixed_amount = fixed("10.50");
        let json = serde_json::to_string(&fixed_amount).unwrap();
        assert_eq!(json, r#"{"amount":"1050","decimals":"2"}"#);
        let back: MoneyAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fixed_amount);

        let rational_amount = MoneyAmount::Rational(Rational::new(1, 3));
        let json = serde_json::to_string(&rational_amount).unwrap();
        assert_eq!(json, r#"{"p":"1","q":"3"}"#);
        let back: MoneyAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rational_amount);
    }

    #[rstest]
    fn test_deserialize_plain_decimal_string() {
        let back: MoneyAmount = serde_json::from_str("\"123.45\"").unwrap();
        assert_eq!(back, fixed("123.45"));
    }
}
