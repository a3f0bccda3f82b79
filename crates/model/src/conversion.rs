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

//! Currency conversion over exchange rates and prices.
//!
//! Conversion lives here as free functions rather than methods so that
//! [`Money`] and the ratio types depend only downward on the numeric engine,
//! never on each other. The receiver's currency is located among the two legs
//! of the ratio, and the amount is multiplied by `other leg / matching leg`
//! using exact rational arithmetic — no precision is lost regardless of
//! divisibility; results narrow back to fixed-point only when the decimal
//! expansion terminates.

use std::str::FromStr;

use exacta_core::{
    FixedPointBound, NumericError, Rational, RoundingMode, correctness::FAILED,
};

use crate::{
    errors::MoneyError,
    types::{Currency, ExchangeRate, Money, MoneyAmount, Price},
};

/// Narrows to fixed-point when the expansion terminates, else stays rational.
fn exact_amount(value: Rational) -> MoneyAmount {
    let simplified = value.simplify();
    match simplified.terminating_decimals() {
        Some(decimals) => MoneyAmount::Fixed(
            simplified
                .to_fixed_point(FixedPointBound::MaxPrecision(decimals), RoundingMode::Trunc)
                .expect(FAILED),
        ),
        None => MoneyAmount::Rational(simplified),
    }
}

/// Converts `money` across `rate`, in whichever direction matches its currency.
///
/// # Errors
///
/// Returns an error if:
/// - `money`'s currency is neither leg of the rate ([`MoneyError::CurrencyMismatch`]).
/// - The rate is zero and the conversion runs against its direction
///   ([`NumericError::DivisionByZero`]).
pub fn convert(money: &Money, rate: &ExchangeRate) -> Result<Money, MoneyError> {
    let (ratio, target) = if money.currency == rate.base {
        (rate.as_ratio(), rate.quote)
    } else if money.currency == rate.quote {
        (rate.as_ratio().reciprocal()?, rate.base)
    } else {
        return Err(MoneyError::CurrencyMismatch {
            operation: "convert".to_string(),
            lhs: money.currency.code.to_string(),
            rhs: rate.pair(),
        });
    };
    let product = money.amount.to_rational().mul(&ratio);
    Ok(Money::new(exact_amount(product), target))
}

/// Converts `money` across `price`, in whichever direction matches its currency.
///
/// The other leg's asset must itself be a registered currency for the result
/// to be monetary.
///
/// # Errors
///
/// Returns an error if:
/// - `money`'s currency is neither leg of the price ([`MoneyError::CurrencyMismatch`]).
/// - The matching leg's quantity is zero ([`NumericError::DivisionByZero`]).
/// - The other leg's asset is not a registered currency
///   ([`MoneyError::UnknownCurrency`]).
pub fn convert_with_price(money: &Money, price: &Price) -> Result<Money, MoneyError> {
    let [first, second] = &price.amounts;
    let (matching, other) = if first.asset == money.currency.code {
        (first, second)
    } else if second.asset == money.currency.code {
        (second, first)
    } else {
        return Err(MoneyError::CurrencyMismatch {
            operation: "convert".to_string(),
            lhs: money.currency.code.to_string(),
            rhs: price.pair(),
        });
    };
    if matching.amount.is_zero() {
        return Err(NumericError::DivisionByZero.into());
    }
    let target = Currency::from_str(other.asset.as_str())?;
    let ratio = Rational::from_fixed_point(&other.amount)
        .div(&Rational::from_fixed_point(&matching.amount))?;
    let product = money.amount.to_rational().mul(&ratio);
    Ok(Money::new(exact_amount(product), target))
}
