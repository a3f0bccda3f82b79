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

//! An exact rational number `p/q` over arbitrary-precision integers.
//!
//! Used wherever division is not exact in base 10. Values are not simplified
//! on every operation — callers invoke [`Rational::simplify`] explicitly —
//! except where equality and zero checks require canonical form.

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    correctness::FAILED,
    errors::NumericError,
    fixed_point::{FixedPoint, pow10},
    rounding::{RoundingMode, round_div},
};

/// Bound on a rational-to-fixed-point narrowing: either a fractional decimal
/// digit count or a bit budget for the resulting amount.
///
/// Exactly one bound applies per conversion; the closed enum makes supplying
/// both or neither unrepresentable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FixedPointBound {
    /// Bound the result to at most this many fractional decimal digits.
    MaxPrecision(u32),
    /// Bound the result's amount to at most this many bits.
    MaxBits(u64),
}

/// Splits powers of 2 and 5 out of `n`, returning `(twos, fives, rest)` such
/// that `|n| = 2^twos × 5^fives × rest`.
#[must_use]
pub fn factor_out_two_five(n: &BigInt) -> (u32, u32, BigInt) {
    let mut rest = n.abs();
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut twos = 0;
    let mut fives = 0;
    if rest.is_zero() {
        return (0, 0, rest);
    }
    while (&rest % &two).is_zero() {
        rest /= &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() {
        rest /= &five;
        fives += 1;
    }
    (twos, fives, rest)
}

/// An immutable exact fraction of two arbitrary-precision integers.
#[derive(Clone)]
pub struct Rational {
    /// The numerator, carrying the sign in canonical form.
    pub p: BigInt,
    /// The denominator, positive in canonical form.
    pub q: BigInt,
}

impl Rational {
    /// Creates a new [`Rational`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if `q` is zero.
    pub fn new_checked(p: impl Into<BigInt>, q: impl Into<BigInt>) -> Result<Self, NumericError> {
        let q = q.into();
        if q.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self { p: p.into(), q })
    }

    /// Creates a new [`Rational`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `q` is zero. See [`Rational::new_checked`] for more details.
    pub fn new(p: impl Into<BigInt>, q: impl Into<BigInt>) -> Self {
        Self::new_checked(p, q).expect(FAILED)
    }

    /// Creates a rational from an integer value.
    #[must_use]
    pub fn from_int(value: impl Into<BigInt>) -> Self {
        Self {
            p: value.into(),
            q: BigInt::one(),
        }
    }

    /// Creates the exact rational equal to the given fixed-point value.
    #[must_use]
    pub fn from_fixed_point(value: &FixedPoint) -> Self {
        Self {
            p: value.amount.clone(),
            q: pow10(value.decimals),
        }
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.p.is_zero()
    }

    /// Returns `true` if the value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        !self.p.is_zero() && (self.p.is_negative() != self.q.is_negative())
    }

    /// Adds two rationals by cross-multiplication to a common denominator.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            p: &self.p * &other.q + &other.p * &self.q,
            q: &self.q * &other.q,
        }
    }

    /// Subtracts `other` by cross-multiplication to a common denominator.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            p: &self.p * &other.q - &other.p * &self.q,
            q: &self.q * &other.q,
        }
    }

    /// Multiplies two rationals.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            p: &self.p * &other.p,
            q: &self.q * &other.q,
        }
    }

    /// Divides by `other` via reciprocal multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if `other`'s numerator is zero.
    pub fn div(&self, other: &Self) -> Result<Self, NumericError> {
        if other.p.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self {
            p: &self.p * &other.q,
            q: &self.q * &other.p,
        })
    }

    /// Returns the reciprocal `q/p`.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if the numerator is zero.
    pub fn reciprocal(&self) -> Result<Self, NumericError> {
        if self.p.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self {
            p: self.q.clone(),
            q: self.p.clone(),
        })
    }

    /// Negates the value.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            p: -&self.p,
            q: self.q.clone(),
        }
    }

    /// Reduces to canonical form: `gcd(|p|, |q|) = 1`, the sign carried by `p`,
    /// and `q` positive.
    #[must_use]
    pub fn simplify(&self) -> Self {
        if self.p.is_zero() {
            return Self {
                p: BigInt::zero(),
                q: BigInt::one(),
            };
        }
        let gcd = self.p.gcd(&self.q);
        let mut p = &self.p / &gcd;
        let mut q = &self.q / &gcd;
        if q.is_negative() {
            p = -p;
            q = -q;
        }
        Self { p, q }
    }

    /// Returns `bitlength(p) + bitlength(q)` for budget accounting.
    #[must_use]
    pub fn bit_size(&self) -> u64 {
        self.p.bits() + self.q.bits()
    }

    /// Returns the fractional digit count at which the decimal expansion
    /// terminates, or `None` if it repeats forever.
    #[must_use]
    pub fn terminating_decimals(&self) -> Option<u32> {
        let simplified = self.simplify();
        let (twos, fives, rest) = factor_out_two_five(&simplified.q);
        rest.is_one().then(|| twos.max(fives))
    }

    /// Renders the decimal expansion by long division, emitting up to
    /// `precision` fractional digits and stopping early once the remainder
    /// reaches zero (an exact terminating decimal).
    #[must_use]
    pub fn to_decimal_string(&self, precision: u32) -> String {
        let negative = self.is_negative();
        let n = self.p.magnitude().clone();
        let d = self.q.magnitude();

        let (int_part, mut remainder) = n.div_rem(d);
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&int_part.to_string());

        if precision > 0 && !remainder.is_zero() {
            out.push('.');
            for _ in 0..precision {
                if remainder.is_zero() {
                    break;
                }
                remainder *= 10u32;
                let (digit, rem) = remainder.div_rem(d);
                out.push_str(&digit.to_string());
                remainder = rem;
            }
        }
        out
    }

    /// Narrows to a [`FixedPoint`] under the given bound, rounding the final
    /// digit with `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::InvalidInput`] if a zero bit budget is supplied.
    pub fn to_fixed_point(
        &self,
        bound: FixedPointBound,
        mode: RoundingMode,
    ) -> Result<FixedPoint, NumericError> {
        match bound {
            FixedPointBound::MaxPrecision(decimals) => {
                let amount = round_div(&(&self.p * pow10(decimals)), &self.q, mode)?;
                Ok(FixedPoint::new(amount, decimals))
            }
            FixedPointBound::MaxBits(bits) => {
                if bits == 0 {
                    return Err(NumericError::InvalidInput {
                        reason: "`maxBits` must be a positive bit budget".to_string(),
                    });
                }
                let simplified = self.simplify();

                // Exact expansions that fit the budget short-circuit the estimate
                if let Some(decimals) = simplified.terminating_decimals() {
                    let amount =
                        round_div(&(&simplified.p * pow10(decimals)), &simplified.q, mode)?;
                    if amount.bits() <= bits {
                        return Ok(FixedPoint::new(amount, decimals));
                    }
                }

                // log10(2) ~ 301/1000 converts the bit budget into decimal digits
                let headroom =
                    bits as i128 + simplified.q.bits() as i128 - simplified.p.bits() as i128;
                let mut decimals = u32::try_from((headroom.max(0) * 301) / 1000).unwrap_or(u32::MAX);
                loop {
                    let amount =
                        round_div(&(&simplified.p * pow10(decimals)), &simplified.q, mode)?;
                    let used = amount.bits();
                    if used <= bits || decimals == 0 {
                        return Ok(FixedPoint::new(amount, decimals));
                    }
                    let excess = (used - bits) as u32;
                    decimals = decimals.saturating_sub(excess * 301 / 1000 + 1);
                }
            }
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.p, self.q)
    }
}

impl Debug for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Rational))
    }
}

impl FromStr for Rational {
    type Err = NumericError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || NumericError::InvalidInput {
            reason: format!("cannot parse '{value}' as a rational: expected 'p/q'"),
        };
        let (p, q) = value.split_once('/').ok_or_else(invalid)?;
        let p: BigInt = p.trim().parse().map_err(|_| invalid())?;
        let q: BigInt = q.trim().parse().map_err(|_| invalid())?;
        Self::new_checked(p, q)
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        &self.p * &other.q == &other.p * &self.q
    }
}

impl Eq for Rational {}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let simplified = self.simplify();
        simplified.p.hash(state);
        simplified.q.hash(state);
    }
}

#[derive(Serialize, Deserialize)]
struct RationalJson {
    p: String,
    q: String,
}

impl Serialize for Rational {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RationalJson {
            p: self.p.to_string(),
            q: self.q.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = RationalJson::deserialize(deserializer)?;
        let p: BigInt = json
            .p
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numerator '{}'", json.p)))?;
        let q: BigInt = json
            .q
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid denominator '{}'", json.q)))?;
        Self::new_checked(p, q).map_err(serde::de::Error::custom)
    }
}
