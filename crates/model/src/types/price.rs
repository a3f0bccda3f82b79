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

//! A ratio between two asset quantities.
//!
//! Unlike [`ExchangeRate`](crate::types::ExchangeRate), a price supports
//! non-currency assets: either leg may name any asset. Scalar operations touch
//! only the first leg; price-by-price multiplication requires a shared asset
//! between the two ratios.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use exacta_core::{
    FixedPoint, FixedPointBound, NumericError, Rational, RoundingMode, correctness::FAILED,
};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::{errors::MoneyError, types::money::Factor};

/// A quantity of a named asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    /// The asset identifier: a currency code or any other asset name.
    pub asset: Ustr,
    /// The quantity of the asset.
    pub amount: FixedPoint,
}

impl AssetAmount {
    /// Creates a new [`AssetAmount`] instance.
    #[must_use]
    pub fn new<T: AsRef<str>>(asset: T, amount: FixedPoint) -> Self {
        Self {
            asset: Ustr::from(asset.as_ref()),
            amount,
        }
    }
}

impl Display for AssetAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.asset)
    }
}

/// An unordered ratio between two asset quantities at a point in time.
///
/// The ratio's value is `amounts[0] / amounts[1]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// The two legs of the ratio.
    pub amounts: [AssetAmount; 2],
    /// When the price was observed.
    pub time: DateTime<Utc>,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if the second leg's quantity is zero.
    pub fn new_checked(
        numerator: AssetAmount,
        denominator: AssetAmount,
        time: DateTime<Utc>,
    ) -> Result<Self, MoneyError> {
        if denominator.amount.is_zero() {
            return Err(NumericError::DivisionByZero.into());
        }
        Ok(Self {
            amounts: [numerator, denominator],
            time,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if the second leg's quantity is zero. See [`Price::new_checked`]
    /// for more details.
    pub fn new(numerator: AssetAmount, denominator: AssetAmount, time: DateTime<Utc>) -> Self {
        Self::new_checked(numerator, denominator, time).expect(FAILED)
    }

    /// Returns the asset pair as `"BTC/USD"`.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}/{}", self.amounts[0].asset, self.amounts[1].asset)
    }

    /// Returns the exact ratio `amounts[0] / amounts[1]`.
    #[must_use]
    pub fn as_ratio(&self) -> Rational {
        Rational::from_fixed_point(&self.amounts[0].amount)
            .div(&Rational::from_fixed_point(&self.amounts[1].amount))
            .expect("denominator is non-zero by construction")
    }

    /// Multiplies the first leg by a scalar, leaving the second leg untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a textual factor cannot be parsed.
    pub fn mul_scalar(&self, factor: impl Into<Factor>) -> Result<Self, MoneyError> {
        let factor = factor.into().resolve()?;
        let scaled = AssetAmount {
            asset: self.amounts[0].asset,
            amount: self.amounts[0].amount.mul_exact(&factor),
        };
        Ok(Self {
            amounts: [scaled, self.amounts[1].clone()],
            time: self.time,
        })
    }

    /// Divides the first leg by a scalar, leaving the second leg untouched.
    ///
    /// Like money division, the result stays exact when the divisor's prime
    /// factors are only 2s and 5s; otherwise a rounding mode is mandatory and
    /// the leg is rounded at its own decimal count.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The divisor is zero ([`NumericError::DivisionByZero`]).
    /// - The division is inexact and no mode was supplied
    ///   ([`NumericError::DivisionRequiresRounding`]).
    pub fn div_scalar(
        &self,
        divisor: impl Into<Factor>,
        round: Option<RoundingMode>,
    ) -> Result<Self, MoneyError> {
        let divisor = divisor.into().resolve()?;
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero.into());
        }
        let quotient = Rational::from_fixed_point(&self.amounts[0].amount)
            .div(&Rational::from_fixed_point(&divisor))?;
        let amount = match (quotient.terminating_decimals(), round) {
            (Some(decimals), None) => quotient
                .to_fixed_point(FixedPointBound::MaxPrecision(decimals), RoundingMode::Trunc)?,
            (None, None) => {
                return Err(NumericError::DivisionRequiresRounding {
                    divisor: divisor.to_string(),
                }
                .into());
            }
            (_, Some(mode)) => quotient.to_fixed_point(
                FixedPointBound::MaxPrecision(self.amounts[0].amount.decimals),
                mode,
            )?,
        };
        Ok(Self {
            amounts: [
                AssetAmount {
                    asset: self.amounts[0].asset,
                    amount,
                },
                self.amounts[1].clone(),
            ],
            time: self.time,
        })
    }

    /// Composes two prices sharing an asset: `A/B × B/C = A/C` or
    /// `A/B × C/A = C/B`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] naming both asset pairs if the
    /// ratios share no asset in a composable position.
    pub fn mul(&self, other: &Self) -> Result<Self, MoneyError> {
        let [a0, a1] = &self.amounts;
        let [b0, b1] = &other.amounts;

        // Both compositions multiply the numerators and denominators; only the
        // surviving asset labels differ.
        let (numer_asset, denom_asset) = if a1.asset == b0.asset {
            (a0.asset, b1.asset)
        } else if a0.asset == b1.asset {
            (b0.asset, a1.asset)
        } else {
            return Err(MoneyError::CurrencyMismatch {
                operation: "multiply".to_string(),
                lhs: self.pair(),
                rhs: other.pair(),
            });
        };

        Self::new_checked(
            AssetAmount {
                asset: numer_asset,
                amount: a0.amount.mul_exact(&b0.amount),
            },
            AssetAmount {
                asset: denom_asset,
                amount: a1.amount.mul_exact(&b1.amount),
            },
            self.time.max(other.time),
        )
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.amounts[0], self.amounts[1])
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(asset: &str, amount: &str) -> AssetAmount {
        AssetAmount::new(asset, amount.parse().unwrap())
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    fn test_as_ratio() {
        let price = Price::new(at("BTC", "1"), at("USD", "65000"), when());
        assert_eq!(price.as_ratio().simplify(), Rational::new(1, 65000));
        assert_eq!(price.pair(), "BTC/USD");
    }

    #[rstest]
    fn test_zero_denominator_is_rejected() {
        let result = Price::new_checked(at("BTC", "1"), at("USD", "0"), when());
        assert!(matches!(
            result,
            Err(MoneyError::Numeric(NumericError::DivisionByZero))
        ));
    }

    #[rstest]
    fn test_mul_scalar_touches_first_leg_only() {
        let price = Price::new(at("OIL", "2.5"), at("USD", "100"), when());
        let doubled = price.mul_scalar(2).unwrap();
        assert_eq!(doubled.amounts[0].amount, "5.0".parse().unwrap());
        assert_eq!(doubled.amounts[1].amount, "100".parse().unwrap());
    }

    #[rstest]
    fn test_div_scalar_exactness_gate() {
        let price = Price::new(at("OIL", "10"), at("USD", "100"), when());

        let halved = price.div_scalar(2, None).unwrap();
        assert_eq!(halved.amounts[0].amount, "5".parse().unwrap());

        let err = price.div_scalar(3, None).unwrap_err();
        assert_eq!(err.code(), "DIVISION_REQUIRES_ROUNDING");

        let rounded = price
            .div_scalar(3, Some(RoundingMode::HalfExpand))
            .unwrap();
        assert_eq!(rounded.amounts[0].amount, "3".parse().unwrap());
    }

    #[rstest]
    fn test_chained_composition() {
        // A/B × B/C = A/C
        let btc_eth = Price::new(at("BTC", "1"), at("ETH", "20"), when());
        let eth_usd = Price::new(at("ETH", "1"), at("USD", "3250"), when());
        let btc_usd = btc_eth.mul(&eth_usd).unwrap();
        assert_eq!(btc_usd.pair(), "BTC/USD");
        assert_eq!(btc_usd.as_ratio().simplify(), Rational::new(1, 65000));
    }

    #[rstest]
    fn test_inverse_composition() {
        // A/B × C/A = C/B
        let btc_eth = Price::new(at("BTC", "1"), at("ETH", "20"), when());
        let usd_btc = Price::new(at("USD", "65000"), at("BTC", "1"), when());
        let usd_eth = btc_eth.mul(&usd_btc).unwrap();
        assert_eq!(usd_eth.pair(), "USD/ETH");
        assert_eq!(usd_eth.as_ratio().simplify(), Rational::new(3250, 1));
    }

    #[rstest]
    fn test_no_shared_asset_names_both_pairs() {
        let btc_usd = Price::new(at("BTC", "1"), at("USD", "65000"), when());
        let oil_eur = Price::new(at("OIL", "1"), at("EUR", "80"), when());
        let err = btc_usd.mul(&oil_eur).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("BTC/USD"));
        assert!(msg.contains("OIL/EUR"));
    }

    #[rstest]
    fn test_serde_round_trip() {
        let price = Price::new(at("BTC", "0.50000000"), at("USD", "32500.00"), when());
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
