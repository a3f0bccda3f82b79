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

//! A closed interval of monetary values in a single currency.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    str::FromStr,
};

use exacta_core::{NumericError, correctness::FAILED};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    errors::MoneyError,
    types::{Currency, Money, money::AllocateOptions},
};

/// A closed interval `[min, max]` of monetary values in one currency.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PriceRange {
    /// The lower bound.
    pub min: Money,
    /// The upper bound.
    pub max: Money,
}

impl PriceRange {
    /// Creates a new [`PriceRange`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bounds are in different currencies ([`MoneyError::CurrencyMismatch`]).
    /// - `min` exceeds `max` ([`NumericError::InvalidInput`]).
    pub fn new_checked(min: Money, max: Money) -> Result<Self, MoneyError> {
        if min.currency != max.currency {
            return Err(MoneyError::CurrencyMismatch {
                operation: "priceRange".to_string(),
                lhs: min.currency.code.to_string(),
                rhs: max.currency.code.to_string(),
            });
        }
        if min.amount.cmp_values(&max.amount) == Ordering::Greater {
            return Err(NumericError::InvalidInput {
                reason: format!("range bounds are inverted: min {min} > max {max}"),
            }
            .into());
        }
        Ok(Self { min, max })
    }

    /// Creates a new [`PriceRange`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`PriceRange::new_checked`]
    /// for more details.
    pub fn new(min: Money, max: Money) -> Self {
        Self::new_checked(min, max).expect(FAILED)
    }

    /// Returns the range's currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.min.currency
    }

    /// Returns the interval's width `max - min`.
    #[must_use]
    pub fn span(&self) -> Money {
        self.max
            .sub_checked(&self.min)
            .expect("bounds share a currency by construction")
    }

    /// Returns `true` if `money` lies within the closed interval.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if `money` is in a different currency.
    pub fn contains(&self, money: &Money) -> Result<bool, MoneyError> {
        self.check_currency(money, "contains")?;
        Ok(self.min.amount.cmp_values(&money.amount) != Ordering::Greater
            && self.max.amount.cmp_values(&money.amount) != Ordering::Less)
    }

    /// Returns `true` if the whole interval lies above `money`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if `money` is in a different currency.
    pub fn is_above(&self, money: &Money) -> Result<bool, MoneyError> {
        self.check_currency(money, "isAbove")?;
        Ok(self.min.amount.cmp_values(&money.amount) == Ordering::Greater)
    }

    /// Returns `true` if the whole interval lies below `money`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if `money` is in a different currency.
    pub fn is_below(&self, money: &Money) -> Result<bool, MoneyError> {
        self.check_currency(money, "isBelow")?;
        Ok(self.max.amount.cmp_values(&money.amount) == Ordering::Less)
    }

    /// Returns `true` if the two intervals share any value.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the ranges are in different currencies.
    pub fn overlaps(&self, other: &Self) -> Result<bool, MoneyError> {
        self.check_currency(&other.min, "overlaps")?;
        Ok(
            self.min.amount.cmp_values(&other.max.amount) != Ordering::Greater
                && other.min.amount.cmp_values(&self.max.amount) != Ordering::Greater,
        )
    }

    /// Returns the overlapping sub-interval, or `None` if the ranges are disjoint.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the ranges are in different currencies.
    pub fn intersect(&self, other: &Self) -> Result<Option<Self>, MoneyError> {
        if !self.overlaps(other)? {
            return Ok(None);
        }
        let min = self.min.max_checked(&other.min)?;
        let max = self.max.min_checked(&other.max)?;
        Ok(Some(Self::new_checked(min, max)?))
    }

    /// Returns the smallest interval covering both ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the ranges are in different currencies.
    pub fn union(&self, other: &Self) -> Result<Self, MoneyError> {
        let min = self.min.min_checked(&other.min)?;
        let max = self.max.max_checked(&other.max)?;
        Self::new_checked(min, max)
    }

    /// Splits into `parts` consecutive sub-ranges whose spans sum exactly to
    /// the original span (largest-remainder distribution).
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::InvalidInput`] if `parts` is zero.
    pub fn split(&self, parts: usize) -> Result<Vec<Self>, MoneyError> {
        let spans = self
            .span()
            .distribute_checked(parts, AllocateOptions::default())?;
        let mut ranges = Vec::with_capacity(spans.len());
        let mut start = self.min.clone();
        for span in spans {
            let end = start.add_checked(&span)?;
            ranges.push(Self {
                min: start,
                max: end.clone(),
            });
            start = end;
        }
        Ok(ranges)
    }

    fn check_currency(&self, money: &Money, operation: &str) -> Result<(), MoneyError> {
        if self.currency() == money.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                operation: operation.to_string(),
                lhs: self.currency().code.to_string(),
                rhs: money.currency.code.to_string(),
            })
        }
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

impl Debug for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({} - {})", stringify!(PriceRange), self.min, self.max)
    }
}

impl FromStr for PriceRange {
    type Err = MoneyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((low, high)) = value.split_once(" - ") else {
            return Err(MoneyError::Parse {
                input: value.to_string(),
                reason: "expected two amounts separated by ' - '".to_string(),
            });
        };
        let min = Money::parse(low.trim(), None)?;
        // The lower bound's currency carries over to a bare upper bound
        let max = Money::parse(high.trim(), Some(min.currency))?;
        Self::new_checked(min, max)
    }
}

impl<'de> Deserialize<'de> for PriceRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct PriceRangeJson {
            min: Money,
            max: Money,
        }
        let json = PriceRangeJson::deserialize(deserializer)?;
        Self::new_checked(json.min, json.max).map_err(serde::de::Error::custom)
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
        Money::parse(&format!("{amount} USD"), None).unwrap()
    }

    fn range(min: &str, max: &str) -> PriceRange {
        PriceRange::new(usd(min), usd(max))
    }

    #[rstest]
    fn test_inverted_bounds_are_rejected() {
        let result = PriceRange::new_checked(usd("100.00"), usd("50.00"));
        assert!(result.is_err());
    }

    #[rstest]
    fn test_currency_mismatch_is_rejected() {
        let eur = Money::parse("50 EUR", None).unwrap();
        let err = PriceRange::new_checked(eur, usd("100.00")).unwrap_err();
        assert_eq!(err.code(), "CURRENCY_MISMATCH");
    }

    #[rstest]
    fn test_from_str() {
        let parsed: PriceRange = "$50 - $100".parse().unwrap();
        assert_eq!(parsed.min, usd("50"));
        assert_eq!(parsed.max, usd("100"));
        assert_eq!(parsed.currency().code.as_str(), "USD");

        // A bare upper bound inherits the lower bound's currency
        let parsed: PriceRange = "€10 - 20".parse().unwrap();
        assert_eq!(parsed.currency().code.as_str(), "EUR");

        assert!("$50".parse::<PriceRange>().is_err());
    }

    #[rstest]
    #[case("49.99", false)]
    #[case("50.00", true)]
    #[case("75.00", true)]
    #[case("100.00", true)]
    #[case("100.01", false)]
    fn test_contains(#[case] amount: &str, #[case] expected: bool) {
        assert_eq!(
            range("50.00", "100.00").contains(&usd(amount)).unwrap(),
            expected
        );
    }

    #[rstest]
    fn test_is_above_and_below() {
        let mid = range("50.00", "100.00");
        assert!(mid.is_above(&usd("49.99")).unwrap());
        assert!(!mid.is_above(&usd("50.00")).unwrap());
        assert!(mid.is_below(&usd("100.01")).unwrap());
        assert!(!mid.is_below(&usd("100.00")).unwrap());
    }

    #[rstest]
    fn test_overlap_intersect_union() {
        let low = range("10.00", "50.00");
        let high = range("40.00", "90.00");
        let far = range("70.00", "80.00");

        assert!(low.overlaps(&high).unwrap());
        assert!(!low.overlaps(&far).unwrap());

        let overlap = low.intersect(&high).unwrap().unwrap();
        assert_eq!(overlap.min, usd("40.00"));
        assert_eq!(overlap.max, usd("50.00"));
        assert!(low.intersect(&far).unwrap().is_none());

        let hull = low.union(&far).unwrap();
        assert_eq!(hull.min, usd("10.00"));
        assert_eq!(hull.max, usd("80.00"));
    }

    #[rstest]
    fn test_split_conserves_span() {
        let parsed: PriceRange = "$50 - $100".parse().unwrap();
        let thirds = parsed.split(3).unwrap();
        assert_eq!(thirds.len(), 3);

        // Consecutive, covering, and conserving the span exactly
        assert_eq!(thirds[0].min, usd("50"));
        assert_eq!(thirds[2].max, usd("100"));
        for pair in thirds.windows(2) {
            assert_eq!(pair[0].max, pair[1].min);
        }
        let total = thirds
            .iter()
            .map(PriceRange::span)
            .try_fold(usd("0"), |acc, span| acc.add_checked(&span))
            .unwrap();
        assert_eq!(total, usd("50.00"));
    }

    #[rstest]
    fn test_split_zero_parts_is_invalid() {
        let err = range("0.00", "1.00").split(0).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[rstest]
    fn test_serde_round_trip_revalidates() {
        let original = range("50.00", "100.00");
        let json = serde_json::to_string(&original).unwrap();
        let back: PriceRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);

        let inverted = r#"{"min":{"currency":"USD","amount":"9"},"max":{"currency":"USD","amount":"1"}}"#;
        assert!(serde_json::from_str::<PriceRange>(inverted).is_err());
    }
}
