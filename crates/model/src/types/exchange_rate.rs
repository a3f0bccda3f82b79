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

//! A directional exchange rate between two currencies.
//!
//! `rate` is quote units per one base unit. Averaging runs on exact rational
//! arithmetic regardless of the rate count: narrowing a mean to fixed-point
//! only ever happens after the exact division, so counts whose prime factors
//! are not 2s and 5s (3-way or 7-way averages) work like any other.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use exacta_core::{
    FixedPoint, FixedPointBound, NumericError, Rational, RoundingMode, correctness::FAILED,
};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::{errors::MoneyError, types::Currency, types::money::Factor};

/// Bit budget applied when narrowing a reciprocal or non-terminating mean.
pub const RATE_BIT_BUDGET: u64 = 256;

/// A directional exchange rate: `rate` quote units buy one base unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The base currency (the unit being priced).
    pub base: Currency,
    /// The quote currency (the unit the price is expressed in).
    pub quote: Currency,
    /// Quote units per one base unit.
    pub rate: FixedPoint,
    /// When the rate was observed.
    pub timestamp: DateTime<Utc>,
    /// Where the rate came from (exchange, aggregator), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Ustr>,
}

impl ExchangeRate {
    /// Creates a new [`ExchangeRate`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `base` and `quote` are the same currency.
    /// - `rate` is negative.
    pub fn new_checked(
        base: Currency,
        quote: Currency,
        rate: FixedPoint,
        timestamp: DateTime<Utc>,
        source: Option<Ustr>,
    ) -> Result<Self, MoneyError> {
        if base == quote {
            return Err(NumericError::InvalidInput {
                reason: format!("`base` and `quote` must differ, both were {}", base.code),
            }
            .into());
        }
        if rate.is_negative() {
            return Err(NumericError::InvalidInput {
                reason: format!("`rate` must not be negative, was {rate}"),
            }
            .into());
        }
        Ok(Self {
            base,
            quote,
            rate,
            timestamp,
            source,
        })
    }

    /// Creates a new [`ExchangeRate`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`ExchangeRate::new_checked`]
    /// for more details.
    pub fn new(
        base: Currency,
        quote: Currency,
        rate: FixedPoint,
        timestamp: DateTime<Utc>,
        source: Option<Ustr>,
    ) -> Self {
        Self::new_checked(base, quote, rate, timestamp, source).expect(FAILED)
    }

    /// Returns the currency pair as `"EUR/USD"`.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base.code, self.quote.code)
    }

    /// Returns the exact rational value of the rate.
    #[must_use]
    pub fn as_ratio(&self) -> Rational {
        Rational::from_fixed_point(&self.rate)
    }

    /// Inverts the direction: the reciprocal rate quoted as base units per one
    /// quote unit, narrowed at the [`RATE_BIT_BUDGET`].
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if the rate is zero.
    pub fn invert(&self) -> Result<Self, MoneyError> {
        let reciprocal = self.as_ratio().reciprocal()?;
        let rate = narrow_rate(&reciprocal)?;
        Self::new_checked(self.quote, self.base, rate, self.timestamp, self.source)
    }

    /// Composes a cross rate through a shared currency: `A/B × B/C = A/C` or
    /// `A/B × C/A = C/B`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] naming both pairs if the rates
    /// share no currency in a composable position.
    pub fn mul(&self, other: &Self) -> Result<Self, MoneyError> {
        let (base, quote) = if self.quote == other.base {
            (self.base, other.quote)
        } else if self.base == other.quote {
            (other.base, self.quote)
        } else {
            return Err(MoneyError::CurrencyMismatch {
                operation: "multiply".to_string(),
                lhs: self.pair(),
                rhs: other.pair(),
            });
        };
        Self::new_checked(
            base,
            quote,
            self.rate.mul_exact(&other.rate),
            self.timestamp.max(other.timestamp),
            None,
        )
    }

    /// Averages rates over the same currency pair, inverting opposite-direction
    /// entries as needed.
    ///
    /// The mean is computed with exact rational division, so any rate count
    /// works; the result narrows to fixed-point only afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `rates` is empty ([`NumericError::InvalidInput`]).
    /// - A rate references a different currency pair
    ///   ([`MoneyError::CurrencyMismatch`]).
    /// - An opposite-direction rate is zero ([`NumericError::DivisionByZero`]).
    pub fn average(rates: &[Self]) -> Result<Self, MoneyError> {
        let Some(first) = rates.first() else {
            return Err(NumericError::InvalidInput {
                reason: "`rates` must contain at least one rate".to_string(),
            }
            .into());
        };

        let mut sum = Rational::new(0, 1);
        let mut timestamp = first.timestamp;
        for rate in rates {
            let oriented = if rate.base == first.base && rate.quote == first.quote {
                rate.as_ratio()
            } else if rate.base == first.quote && rate.quote == first.base {
                rate.as_ratio().reciprocal()?
            } else {
                return Err(MoneyError::CurrencyMismatch {
                    operation: "average".to_string(),
                    lhs: first.pair(),
                    rhs: rate.pair(),
                });
            };
            sum = sum.add(&oriented).simplify();
            timestamp = timestamp.max(rate.timestamp);
        }

        let mean = sum.div(&Rational::from_int(rates.len() as i64))?;
        let rate = narrow_rate(&mean)?;
        Self::new_checked(first.base, first.quote, rate, timestamp, None)
    }

    /// Returns symmetric `(bid, ask)` rates `rate ∓ rate × spread/2`.
    ///
    /// The spread accepts a percentage (`"0.5%"`) or a decimal fraction
    /// (`"0.005"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the spread cannot be parsed, or is wide enough to
    /// push the bid negative.
    pub fn spread(&self, spread: impl Into<Factor>) -> Result<(Self, Self), MoneyError> {
        let spread = spread.into().resolve()?;
        let total = self.rate.mul_exact(&spread);
        // Halving is exact: ×5 then one more decimal place
        let half = FixedPoint::new(&total.amount * 5, total.decimals + 1);
        let bid = Self::new_checked(
            self.base,
            self.quote,
            self.rate.sub(&half),
            self.timestamp,
            self.source,
        )?;
        let ask = Self::new_checked(
            self.base,
            self.quote,
            self.rate.add(&half),
            self.timestamp,
            self.source,
        )?;
        Ok((bid, ask))
    }
}

/// Narrows a rational rate: exactly when its expansion terminates, at the
/// [`RATE_BIT_BUDGET`] otherwise.
fn narrow_rate(ratio: &Rational) -> Result<FixedPoint, MoneyError> {
    let simplified = ratio.simplify();
    let bound = match simplified.terminating_decimals() {
        Some(decimals) => FixedPointBound::MaxPrecision(decimals),
        None => FixedPointBound::MaxBits(RATE_BIT_BUDGET),
    };
    Ok(simplified.to_fixed_point(bound, RoundingMode::HalfExpand)?)
}

impl Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.pair(), self.rate)
    }
}
