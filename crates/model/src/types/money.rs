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

//! Represents an amount of money in a specified currency denomination.
//!
//! All operations are pure: every one returns a new value. Binary operations
//! require currency equality — a mismatch is always a hard error, never a
//! silent coercion.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use exacta_core::{
    FixedPoint, FixedPointBound, NumericError, Rational, RoundingMode,
    correctness::{FAILED, check_parts_count, check_ratio_list},
    fixed_point::pow10,
    rational::factor_out_two_five,
};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    errors::MoneyError,
    parse,
    types::{Currency, MoneyAmount},
};

/// A multiplication or division operand: an integer, a fixed-point value, or
/// text holding a decimal (`"1.5"`) or percentage (`"8.25%"`) literal.
#[derive(Clone, Debug)]
pub enum Factor {
    /// An integer factor.
    Int(BigInt),
    /// A fixed-point factor.
    Fixed(FixedPoint),
    /// A decimal or percentage string.
    Text(String),
}

impl Factor {
    /// Resolves the factor to a fixed-point value; percentage text divides by 100.
    ///
    /// # Errors
    ///
    /// Returns an error if text cannot be parsed as a decimal or percentage.
    pub fn resolve(&self) -> Result<FixedPoint, MoneyError> {
        match self {
            Self::Int(value) => Ok(FixedPoint::new(value.clone(), 0)),
            Self::Fixed(value) => Ok(value.clone()),
            Self::Text(text) => {
                let trimmed = text.trim();
                if let Some(percent) = trimmed.strip_suffix('%') {
                    let fixed: FixedPoint =
                        percent.trim().parse().map_err(|e: NumericError| {
                            MoneyError::Parse {
                                input: text.clone(),
                                reason: e.to_string(),
                            }
                        })?;
                    // pct / 100 is a pure decimal shift
                    Ok(FixedPoint::new(fixed.amount, fixed.decimals + 2))
                } else {
                    trimmed.parse().map_err(|e: NumericError| MoneyError::Parse {
                        input: text.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        }
    }
}

impl From<i32> for Factor {
    fn from(value: i32) -> Self {
        Self::Int(BigInt::from(value))
    }
}

impl From<i64> for Factor {
    fn from(value: i64) -> Self {
        Self::Int(BigInt::from(value))
    }
}

impl From<u64> for Factor {
    fn from(value: u64) -> Self {
        Self::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Factor {
    fn from(value: BigInt) -> Self {
        Self::Int(value)
    }
}

impl From<FixedPoint> for Factor {
    fn from(value: FixedPoint) -> Self {
        Self::Fixed(value)
    }
}

impl From<&str> for Factor {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Factor {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A clamp/bound operand: another monetary value, or a factor interpreted in
/// the receiver's currency.
#[derive(Clone, Debug)]
pub enum Bound {
    /// A monetary bound; its currency must match the receiver's.
    Money(Money),
    /// A numeric or textual bound, interpreted in the receiver's currency.
    Value(Factor),
}

impl From<Money> for Bound {
    fn from(value: Money) -> Self {
        Self::Money(value)
    }
}

impl From<&Money> for Bound {
    fn from(value: &Money) -> Self {
        Self::Money(value.clone())
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Self::Value(Factor::from(value))
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Self::Value(Factor::from(value))
    }
}

impl From<FixedPoint> for Bound {
    fn from(value: FixedPoint) -> Self {
        Self::Value(Factor::from(value))
    }
}

/// Options controlling proportional allocation.
#[derive(Clone, Copy, Debug)]
pub struct AllocateOptions {
    /// When `false`, precision finer than the currency's canonical decimals is
    /// split off via [`Money::concretize`] and appended as a trailing element
    /// instead of being distributed across the shares.
    pub distribute_fractional_units: bool,
}

impl Default for AllocateOptions {
    fn default() -> Self {
        Self {
            distribute_fractional_units: true,
        }
    }
}

/// Represents an amount of money in a specified currency denomination.
#[derive(Clone, Eq)]
pub struct Money {
    /// The amount, as either a fixed-point or rational value.
    pub amount: MoneyAmount,
    /// The currency denomination associated with the monetary amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] instance from any amount representation.
    #[must_use]
    pub fn new(amount: impl Into<MoneyAmount>, currency: Currency) -> Self {
        Self {
            amount: amount.into(),
            currency,
        }
    }

    /// Creates a new [`Money`] instance with a value of zero at the currency's
    /// canonical precision.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::new(FixedPoint::zero(currency.decimals), currency)
    }

    /// Parses free-form monetary text (see the [`parse`](crate::parse) module),
    /// with `fallback` supplying the currency when the text names none.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is unparseable or names an unknown currency.
    pub fn parse(text: &str, fallback: Option<Currency>) -> Result<Self, MoneyError> {
        let (currency, amount) = parse::parse_money_str(text, fallback)?;
        Ok(Self::new(amount, currency))
    }

    /// Returns `true` if the value of this instance is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns `true` if the value of this instance is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs(), self.currency)
    }

    fn check_currency(&self, other: &Self, operation: &str) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                operation: operation.to_string(),
                lhs: self.currency.code.to_string(),
                rhs: other.currency.code.to_string(),
            })
        }
    }

    /// Adds another monetary value of the same currency. Exact.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ.
    pub fn add_checked(&self, other: &Self) -> Result<Self, MoneyError> {
        self.check_currency(other, "add")?;
        Ok(Self::new(self.amount.add(&other.amount), self.currency))
    }

    /// Subtracts another monetary value of the same currency. Exact.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ.
    pub fn sub_checked(&self, other: &Self) -> Result<Self, MoneyError> {
        self.check_currency(other, "subtract")?;
        Ok(Self::new(self.amount.sub(&other.amount), self.currency))
    }

    /// Increases the value by a percentage: `self × (1 + pct/100)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pct` is not a valid percentage or decimal literal.
    pub fn add_percent_checked(
        &self,
        pct: &str,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let factor = percent_factor(pct, true)?;
        self.mul_checked(Factor::Fixed(factor), round)
    }

    /// Decreases the value by a percentage: `self × (1 - pct/100)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pct` is not a valid percentage or decimal literal.
    pub fn sub_percent_checked(
        &self,
        pct: &str,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let factor = percent_factor(pct, false)?;
        self.mul_checked(Factor::Fixed(factor), round)
    }

    /// Multiplies by `factor`. When `round` is given the result is additionally
    /// rounded to the currency's canonical decimal count.
    ///
    /// Multiplication never requires a rounding mode.
    ///
    /// # Errors
    ///
    /// Returns an error if a textual factor cannot be parsed.
    pub fn mul_checked(
        &self,
        factor: impl Into<Factor>,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let factor = factor.into().resolve()?;
        let amount = match &self.amount {
            MoneyAmount::Fixed(fixed) => MoneyAmount::Fixed(fixed.mul(&factor)),
            MoneyAmount::Rational(rational) => {
                MoneyAmount::Rational(rational.mul(&Rational::from_fixed_point(&factor)))
            }
        };
        Ok(self.finish(amount, round))
    }

    /// Divides by `divisor`.
    ///
    /// The divisor's mantissa is factorized into powers of 2 and 5 first: when
    /// any other prime factor remains the division is not exact in base 10 and
    /// a rounding mode is mandatory. Exact divisions run on pure fixed-point
    /// scaling; rounded ones go through rational arithmetic and round to the
    /// currency's canonical decimal count.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The divisor is zero ([`NumericError::DivisionByZero`]).
    /// - The division is inexact and no mode was supplied
    ///   ([`NumericError::DivisionRequiresRounding`]).
    pub fn div_checked(
        &self,
        divisor: impl Into<Factor>,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let divisor = divisor.into().resolve()?;
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero.into());
        }

        let amount = match &self.amount {
            MoneyAmount::Fixed(fixed) => {
                let (twos, fives, rest) = factor_out_two_five(&divisor.amount);
                if rest.is_one() {
                    // 1/(2^a 5^b) = 2^b 5^a / 10^(a+b): exact in base 10
                    let mut numer = &fixed.amount
                        * BigInt::from(2).pow(fives)
                        * BigInt::from(5).pow(twos);
                    if divisor.amount.is_negative() {
                        numer = -numer;
                    }
                    let decimals =
                        i64::from(fixed.decimals) + i64::from(twos) + i64::from(fives)
                            - i64::from(divisor.decimals);
                    let fixed = if decimals >= 0 {
                        FixedPoint::new(numer, decimals as u32)
                    } else {
                        FixedPoint::new(numer * pow10(decimals.unsigned_abs() as u32), 0)
                    };
                    MoneyAmount::Fixed(fixed)
                } else {
                    let Some(mode) = round else {
                        return Err(NumericError::DivisionRequiresRounding {
                            divisor: divisor.to_string(),
                        }
                        .into());
                    };
                    let quotient = Rational::from_fixed_point(fixed)
                        .div(&Rational::from_fixed_point(&divisor))?;
                    let narrowed = quotient.to_fixed_point(
                        FixedPointBound::MaxPrecision(self.currency.decimals),
                        mode,
                    )?;
                    return Ok(Self::new(narrowed, self.currency));
                }
            }
            MoneyAmount::Rational(rational) => {
                let quotient = rational.div(&Rational::from_fixed_point(&divisor))?;
                match (round, quotient.terminating_decimals()) {
                    (None, Some(decimals)) => MoneyAmount::Fixed(
                        quotient
                            .to_fixed_point(FixedPointBound::MaxPrecision(decimals), RoundingMode::Trunc)?,
                    ),
                    (None, None) => {
                        return Err(NumericError::DivisionRequiresRounding {
                            divisor: divisor.to_string(),
                        }
                        .into());
                    }
                    (Some(_), _) => MoneyAmount::Rational(quotient),
                }
            }
        };
        Ok(self.finish(amount, round))
    }

    fn finish(&self, amount: MoneyAmount, round: Option<RoundingMode>) -> Self {
        let amount = match round {
            Some(mode) => MoneyAmount::Fixed(amount.demote(self.currency.decimals, mode)),
            None => amount,
        };
        Self::new(amount, self.currency)
    }

    /// Rounds to the currency's canonical decimal count with commercial rounding.
    #[must_use]
    pub fn round(&self) -> Self {
        self.round_to(self.currency.decimals, None)
    }

    /// Rounds to `decimals` places; `mode` defaults to commercial rounding.
    #[must_use]
    pub fn round_to(&self, decimals: u32, mode: Option<RoundingMode>) -> Self {
        let mode = mode.unwrap_or_default();
        Self::new(self.amount.demote(decimals, mode), self.currency)
    }

    /// Extracts the percentage portion of a tax-inclusive total: for
    /// `total = base × (1 + pct/100)`, returns `total - base`.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Money::div_checked`].
    pub fn extract_percent_checked(
        &self,
        pct: &str,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let base = self.remove_percent_checked(pct, round)?;
        self.sub_checked(&base)
    }

    /// Removes a percentage markup from a total: for
    /// `total = base × (1 + pct/100)`, returns `base = total / (1 + pct/100)`.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Money::div_checked`].
    pub fn remove_percent_checked(
        &self,
        pct: &str,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let divisor = percent_factor(pct, true)?;
        self.div_checked(Factor::Fixed(divisor), round)
    }

    /// Splits the value proportionally by integer `ratios`, conserving the
    /// total exactly via the largest-remainder method: every share receives its
    /// floor first, then the leftover minor units go one at a time to the
    /// shares with the largest fractional remainders.
    ///
    /// # Errors
    ///
    /// Returns an error if `ratios` is empty, contains a negative entry, or
    /// sums to zero.
    pub fn allocate_checked(
        &self,
        ratios: &[i64],
        opts: AllocateOptions,
    ) -> Result<Vec<Self>, MoneyError> {
        let big_ratios: Vec<BigInt> = ratios.iter().copied().map(BigInt::from).collect();
        check_ratio_list(&big_ratios, "ratios").map_err(|e| {
            MoneyError::Numeric(NumericError::InvalidInput {
                reason: e.to_string(),
            })
        })?;

        if !opts.distribute_fractional_units {
            let (concrete, change) = self.concretize();
            let mut shares = concrete.allocate_checked(ratios, AllocateOptions::default())?;
            shares.push(change);
            return Ok(shares);
        }

        let fixed = self.allocation_basis();
        let ratios = big_ratios;
        let total_ratio: BigInt = ratios.iter().sum();
        let units = &fixed.amount;

        let mut shares = Vec::with_capacity(ratios.len());
        let mut remainders = Vec::with_capacity(ratios.len());
        for ratio in &ratios {
            let scaled = units * ratio;
            let share = scaled.div_floor(&total_ratio);
            remainders.push(&scaled - &share * &total_ratio);
            shares.push(share);
        }

        let distributed: BigInt = shares.iter().sum();
        let leftover = units - &distributed;
        debug_assert!(!leftover.is_negative());

        // Largest remainders first; ties keep list order (sort is stable)
        let mut order: Vec<usize> = (0..shares.len()).collect();
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
        let leftover = usize::try_from(leftover).expect(FAILED);
        for &index in order.iter().take(leftover) {
            shares[index] += 1;
        }

        Ok(shares
            .into_iter()
            .map(|share| Self::new(FixedPoint::new(share, fixed.decimals), self.currency))
            .collect())
    }

    /// Splits the value into `parts` equal shares (largest-remainder method).
    ///
    /// # Errors
    ///
    /// Returns an error if `parts` is zero.
    pub fn distribute_checked(
        &self,
        parts: usize,
        opts: AllocateOptions,
    ) -> Result<Vec<Self>, MoneyError> {
        check_parts_count(parts, "parts").map_err(|e| {
            MoneyError::Numeric(NumericError::InvalidInput {
                reason: e.to_string(),
            })
        })?;
        self.allocate_checked(&vec![1; parts], opts)
    }

    // Allocation operates on minor units, so rational amounts are narrowed
    // first: exactly when the expansion terminates, at canonical precision
    // otherwise.
    fn allocation_basis(&self) -> FixedPoint {
        match &self.amount {
            MoneyAmount::Fixed(fixed) => fixed.clone(),
            MoneyAmount::Rational(rational) => {
                let decimals = rational
                    .terminating_decimals()
                    .unwrap_or(self.currency.decimals);
                self.amount.demote(decimals, RoundingMode::HalfExpand)
            }
        }
    }

    /// Splits the value into its canonical-precision part and the remainder
    /// below that precision: `(truncated, original - truncated)`.
    #[must_use]
    pub fn concretize(&self) -> (Self, Self) {
        let truncated = self.round_to(self.currency.decimals, Some(RoundingMode::Trunc));
        let remainder = Self::new(
            self.amount.sub(&truncated.amount),
            self.currency,
        );
        (truncated, remainder)
    }

    /// Returns `true` if any non-zero digit exists below the decimal point.
    #[must_use]
    pub fn has_change(&self) -> bool {
        match &self.amount {
            MoneyAmount::Fixed(fixed) => fixed.has_precision_below(0),
            MoneyAmount::Rational(rational) => !rational.simplify().q.is_one(),
        }
    }

    /// Returns `true` if any non-zero digit exists below the currency's
    /// canonical precision.
    #[must_use]
    pub fn has_sub_units(&self) -> bool {
        match &self.amount {
            MoneyAmount::Fixed(fixed) => fixed.has_precision_below(self.currency.decimals),
            MoneyAmount::Rational(rational) => {
                let scaled = Rational::new_checked(
                    &rational.p * pow10(self.currency.decimals),
                    rational.q.clone(),
                )
                .expect(FAILED);
                !scaled.simplify().q.is_one()
            }
        }
    }

    fn resolve_bound(&self, bound: impl Into<Bound>, operation: &str) -> Result<Self, MoneyError> {
        match bound.into() {
            Bound::Money(money) => {
                self.check_currency(&money, operation)?;
                Ok(money)
            }
            Bound::Value(factor) => Ok(Self::new(factor.resolve()?, self.currency)),
        }
    }

    /// Compares two monetary values of the same currency by exact value.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ.
    pub fn compare_checked(&self, other: &Self) -> Result<Ordering, MoneyError> {
        self.check_currency(other, "compare")?;
        Ok(self.amount.cmp_values(&other.amount))
    }

    /// Clamps the value into `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is invalid, mismatched in currency, or if
    /// `min > max`.
    pub fn clamp_checked(
        &self,
        min: impl Into<Bound>,
        max: impl Into<Bound>,
    ) -> Result<Self, MoneyError> {
        let min = self.resolve_bound(min, "clamp")?;
        let max = self.resolve_bound(max, "clamp")?;
        if min.amount.cmp_values(&max.amount) == Ordering::Greater {
            return Err(NumericError::InvalidInput {
                reason: format!("clamp bounds are inverted: min {min} > max {max}"),
            }
            .into());
        }
        Ok(self.at_least_checked(min)?.at_most_checked(max)?)
    }

    /// Returns the larger of `self` and `bound` (a floor).
    ///
    /// # Errors
    ///
    /// Returns an error if the bound is invalid or mismatched in currency.
    pub fn at_least_checked(&self, bound: impl Into<Bound>) -> Result<Self, MoneyError> {
        let bound = self.resolve_bound(bound, "atLeast")?;
        Ok(match self.amount.cmp_values(&bound.amount) {
            Ordering::Less => bound,
            _ => self.clone(),
        })
    }

    /// Returns the smaller of `self` and `bound` (a ceiling).
    ///
    /// # Errors
    ///
    /// Returns an error if the bound is invalid or mismatched in currency.
    pub fn at_most_checked(&self, bound: impl Into<Bound>) -> Result<Self, MoneyError> {
        let bound = self.resolve_bound(bound, "atMost")?;
        Ok(match self.amount.cmp_values(&bound.amount) {
            Ordering::Greater => bound,
            _ => self.clone(),
        })
    }

    /// Returns the larger of two monetary values.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ.
    pub fn max_checked(&self, other: &Self) -> Result<Self, MoneyError> {
        Ok(match self.compare_checked(other)? {
            Ordering::Less => other.clone(),
            _ => self.clone(),
        })
    }

    /// Returns the smaller of two monetary values.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ.
    pub fn min_checked(&self, other: &Self) -> Result<Self, MoneyError> {
        Ok(match self.compare_checked(other)? {
            Ordering::Greater => other.clone(),
            _ => self.clone(),
        })
    }

    /// Converts to a 96-bit [`Decimal`] at the currency's canonical precision,
    /// for interop with decimal-typed stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exceeds `Decimal` range.
    pub fn as_decimal(&self) -> anyhow::Result<Decimal> {
        self.amount
            .demote(self.currency.decimals, RoundingMode::default())
            .to_decimal()
    }

    /// Serializes to the JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, MoneyError> {
        serde_json::to_string(self).map_err(|e| MoneyError::Validation {
            reason: e.to_string(),
        })
    }

    /// Deserializes from the JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns an error if the document violates the wire format.
    pub fn from_json(json: &str) -> Result<Self, MoneyError> {
        serde_json::from_str(json).map_err(|e| MoneyError::Validation {
            reason: e.to_string(),
        })
    }
}

fn percent_factor(pct: &str, add: bool) -> Result<FixedPoint, MoneyError> {
    let trimmed = pct.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let fixed: FixedPoint = digits.parse().map_err(|e: NumericError| MoneyError::Parse {
        input: pct.to_string(),
        reason: e.to_string(),
    })?;
    let hundredths = FixedPoint::new(fixed.amount, fixed.decimals + 2);
    let one = FixedPoint::new(1, 0);
    Ok(if add {
        one.add(&hundredths)
    } else {
        one.sub(&hundredths)
    })
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}, {})",
            stringify!(Money),
            self.amount,
            self.currency
        )
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value, None)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.amount == other.amount
    }
}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.currency.hash(state);
        self.amount.hash(state);
    }
}

impl PartialOrd for Money {
    /// Returns `None` when the currencies differ.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_checked(other).ok()
    }
}

impl Neg for &Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money::new(self.amount.neg(), self.currency)
    }
}

impl Add for &Money {
    type Output = Money;

    /// # Panics
    ///
    /// Panics on a currency mismatch; prefer [`Money::add_checked`].
    fn add(self, rhs: Self) -> Self::Output {
        self.add_checked(rhs).expect(FAILED)
    }
}

impl Sub for &Money {
    type Output = Money;

    /// # Panics
    ///
    /// Panics on a currency mismatch; prefer [`Money::sub_checked`].
    fn sub(self, rhs: Self) -> Self::Output {
        self.sub_checked(rhs).expect(FAILED)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CurrencyJson {
    Code(String),
    Record {
        code: String,
        name: String,
        decimals: u32,
        symbol: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iso4217: Option<u16>,
    },
}

#[derive(Serialize, Deserialize)]
struct MoneyJson {
    currency: CurrencyJson,
    amount: MoneyAmount,
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MoneyJson {
            currency: CurrencyJson::Code(self.currency.code.to_string()),
            amount: self.amount.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = MoneyJson::deserialize(deserializer)?;
        let currency = match json.currency {
            CurrencyJson::Code(code) => {
                Currency::from_str(&code).map_err(serde::de::Error::custom)?
            }
            CurrencyJson::Record {
                code,
                name,
                decimals,
                symbol,
                iso4217,
            } => Currency::new_checked(code, name, decimals, symbol, iso4217)
                .map_err(serde::de::Error::custom)?,
        };
        Ok(Self::new(json.amount, currency))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn usd(amount: &str) -> Money {
        Money::new(amount.parse::<FixedPoint>().unwrap(), Currency::USD())
    }

    fn eur(amount: &str) -> Money {
        Money::new(amount.parse::<FixedPoint>().unwrap(), Currency::EUR())
    }

    #[rstest]
    fn test_add_same_currency_is_exact() {
        let sum = usd("1.50").add_checked(&usd("0.75")).unwrap();
        assert_eq!(sum, usd("2.25"));
    }

    #[rstest]
    fn test_add_currency_mismatch_names_operation_and_codes() {
        let err = usd("10.00").add_checked(&eur("10.00")).unwrap_err();
        let MoneyError::CurrencyMismatch { operation, lhs, rhs } = err else {
            panic!("expected CurrencyMismatch, got {err:?}");
        };
        assert_eq!(operation, "add");
        assert_eq!(lhs, "USD");
        assert_eq!(rhs, "EUR");
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_operator_add_panics_on_mismatch() {
        let _ = &usd("10.00") + &eur("10.00");
    }

    #[rstest]
    fn test_mul_percentage_with_rounding() {
        let total = usd("1234.56")
            .mul_checked("8.25%", Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(total, usd("101.85"));
    }

    #[rstest]
    fn test_mul_never_requires_a_mode() {
        let product = usd("10.01").mul_checked(3, None).unwrap();
        assert_eq!(product, usd("30.03"));
    }

    #[rstest]
    fn test_add_percent() {
        let total = usd("100.00")
            .add_percent_checked("8.25%", Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(total, usd("108.25"));
    }

    #[rstest]
    fn test_sub_percent() {
        let discounted = usd("200.00")
            .sub_percent_checked("25%", Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(discounted, usd("150.00"));
    }

    #[rstest]
    #[case(2, "50.00")]
    #[case(4, "25.00")]
    #[case(5, "20.00")]
    #[case(8, "12.50")]
    #[case(10, "10.00")]
    fn test_div_exact_for_two_five_smooth_divisors(#[case] divisor: i64, #[case] expected: &str) {
        let result = usd("100.00").div_checked(divisor, None).unwrap();
        assert_eq!(result, usd(expected));
    }

    #[rstest]
    #[case(3)]
    #[case(7)]
    #[case(6)]
    fn test_div_other_primes_require_mode(#[case] divisor: i64) {
        let err = usd("100.00").div_checked(divisor, None).unwrap_err();
        assert_eq!(err.code(), "DIVISION_REQUIRES_ROUNDING");
        assert!(err.to_string().contains("factors other than 2 and 5"));
    }

    #[rstest]
    fn test_div_with_mode_rounds_to_canonical_decimals() {
        let result = usd("100.00")
            .div_checked(3, Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(result, usd("33.33"));
    }

    #[rstest]
    fn test_div_by_zero() {
        let err = usd("100.00").div_checked(0, None).unwrap_err();
        assert_eq!(err.code(), "DIVISION_BY_ZERO");
    }

    #[rstest]
    fn test_div_by_fractional_power_of_ten() {
        // Dividing by 0.5 is exact: factors are 5 and 10
        let result = usd("10.00").div_checked("0.5", None).unwrap();
        assert_eq!(result, usd("20.00"));
    }

    #[rstest]
    fn test_round_default_is_half_expand() {
        let money = usd("2.345");
        assert_eq!(money.round(), usd("2.35"));
        assert_eq!(
            money.round_to(2, Some(RoundingMode::Trunc)),
            usd("2.34")
        );
    }

    #[rstest]
    fn test_remove_and_extract_percent() {
        // 108.25 = base * 1.0825 -> base 100.00, tax 8.25
        let total = usd("108.25");
        let base = total
            .remove_percent_checked("8.25%", Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(base, usd("100.00"));
        let tax = total
            .extract_percent_checked("8.25%", Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(tax, usd("8.25"));
    }

    #[rstest]
    fn test_allocate_conserves_total() {
        let shares = usd("100.00")
            .allocate_checked(&[1, 2, 1], AllocateOptions::default())
            .unwrap();
        assert_eq!(shares, vec![usd("25.00"), usd("50.00"), usd("25.00")]);
    }

    #[rstest]
    fn test_allocate_largest_remainder() {
        let shares = usd("0.05")
            .allocate_checked(&[3, 7], AllocateOptions::default())
            .unwrap();
        // 0.05 * 3/10 = 0.015 -> floor 0.01 rem 0.005; 0.05 * 7/10 = 0.035 -> floor 0.03 rem 0.005
        // one leftover cent goes to the first of the tied shares
        assert_eq!(shares, vec![usd("0.02"), usd("0.03")]);
        let sum = shares[0].add_checked(&shares[1]).unwrap();
        assert_eq!(sum, usd("0.05"));
    }

    #[rstest]
    fn test_allocate_rejects_bad_ratios() {
        assert!(usd("1.00").allocate_checked(&[], AllocateOptions::default()).is_err());
        assert!(usd("1.00").allocate_checked(&[1, -1], AllocateOptions::default()).is_err());
        assert!(usd("1.00").allocate_checked(&[0, 0], AllocateOptions::default()).is_err());
    }

    #[rstest]
    fn test_allocate_without_distributing_fractional_units() {
        let money = usd("10.005");
        let shares = money
            .allocate_checked(&[1, 1], AllocateOptions {
                distribute_fractional_units: false,
            })
            .unwrap();
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0], usd("5.00"));
        assert_eq!(shares[1], usd("5.00"));
        assert_eq!(shares[2], usd("0.005"));
        let sum = shares
            .iter()
            .skip(1)
            .fold(shares[0].clone(), |acc, s| acc.add_checked(s).unwrap());
        assert_eq!(sum, money);
    }

    #[rstest]
    fn test_distribute_is_equal_ratios() {
        let shares = usd("1.00")
            .distribute_checked(3, AllocateOptions::default())
            .unwrap();
        assert_eq!(shares, vec![usd("0.34"), usd("0.33"), usd("0.33")]);
    }

    #[rstest]
    fn test_concretize_splits_change() {
        let (concrete, change) = usd("10.567").concretize();
        assert_eq!(concrete, usd("10.56"));
        assert_eq!(change, usd("0.007"));
    }

    #[rstest]
    fn test_has_change_and_sub_units() {
        assert!(usd("10.50").has_change());
        assert!(!usd("10.00").has_change());
        assert!(usd("10.005").has_sub_units());
        assert!(!usd("10.05").has_sub_units());
    }

    #[rstest]
    fn test_clamp_and_bounds() {
        let money = usd("50.00");
        assert_eq!(money.clamp_checked("10", "40").unwrap(), usd("40"));
        assert_eq!(money.clamp_checked("60", "80").unwrap(), usd("60"));
        assert_eq!(money.clamp_checked(&usd("10.00"), &usd("90.00")).unwrap(), money);
        assert_eq!(money.at_least_checked("75.50").unwrap(), usd("75.50"));
        assert_eq!(money.at_most_checked(20).unwrap(), usd("20"));
    }

    #[rstest]
    fn test_clamp_inverted_bounds_is_invalid() {
        let err = usd("50.00").clamp_checked("80", "20").unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[rstest]
    fn test_clamp_currency_mismatch() {
        let err = usd("50.00").clamp_checked(&eur("1.00"), &usd("80.00")).unwrap_err();
        assert_eq!(err.code(), "CURRENCY_MISMATCH");
    }

    #[rstest]
    fn test_min_max() {
        let low = usd("10.00");
        let high = usd("20.00");
        assert_eq!(low.max_checked(&high).unwrap(), high);
        assert_eq!(low.min_checked(&high).unwrap(), low);
        assert!(low.max_checked(&eur("1.00")).is_err());
    }

    #[rstest]
    fn test_mixed_representation_equality() {
        let fixed = usd("0.125");
        let rational = Money::new(Rational::new(1, 8), Currency::USD());
        assert_eq!(fixed, rational);
    }

    #[rstest]
    fn test_as_decimal() {
        use rust_decimal_macros::dec;
        assert_eq!(usd("1234.56").as_decimal().unwrap(), dec!(1234.56));
        let third = Money::new(Rational::new(1, 3), Currency::USD());
        assert_eq!(third.as_decimal().unwrap(), dec!(0.33));
    }

    #[rstest]
    fn test_json_round_trip_fixed() {
        let money = usd("1234.56");
        let json = money.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"currency":"USD","amount":{"amount":"123456","decimals":"2"}}"#
        );
        let back = Money::from_json(&json).unwrap();
        assert_eq!(back, money);
    }

    #[rstest]
    fn test_json_round_trip_rational() {
        let money = Money::new(Rational::new(1, 3), Currency::EUR());
        let back = Money::from_json(&money.to_json().unwrap()).unwrap();
        assert_eq!(back, money);
    }

    #[rstest]
    fn test_json_accepts_plain_string_amount_and_record_currency() {
        let money = Money::from_json(r#"{"currency":"USD","amount":"10.50"}"#).unwrap();
        assert_eq!(money, usd("10.50"));

        let custom = Money::from_json(
            r#"{"currency":{"code":"WOW","name":"Wow coin","decimals":4,"symbol":"w"},"amount":"1.2345"}"#,
        )
        .unwrap();
        assert_eq!(custom.currency.code.as_str(), "WOW");
        assert_eq!(custom.currency.decimals, 4);
    }

    #[rstest]
    fn test_json_unknown_currency_fails() {
        assert!(Money::from_json(r#"{"currency":"ZZZZ","amount":"1"}"#).is_err());
    }
}
