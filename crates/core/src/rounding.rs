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

//! The shared quotient/remainder rounding algorithm.
//!
//! Every division and rescale in the engine funnels through [`round_quotient`]:
//! decimal rescaling, explicit money division, and rational-to-fixed-point
//! narrowing all produce a truncated quotient plus remainder, then delegate the
//! final step decision here so that all call sites round identically.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr};

use crate::errors::NumericError;

/// The policy deciding which way a truncated quotient steps on a non-zero remainder.
///
/// `HalfExpand` is commercial rounding and the implicit default wherever a mode
/// is required but unspecified.
#[repr(C)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    FromRepr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum RoundingMode {
    /// Step toward positive infinity on any non-zero remainder.
    Ceil = 0,
    /// Step toward negative infinity on any non-zero remainder.
    Floor = 1,
    /// Keep the truncated quotient.
    Trunc = 2,
    /// Step away from zero on any non-zero remainder.
    Expand = 3,
    /// Round to nearest; ties step toward positive infinity.
    HalfCeil = 4,
    /// Round to nearest; ties step toward negative infinity.
    HalfFloor = 5,
    /// Round to nearest; ties step away from zero (commercial rounding).
    #[default]
    HalfExpand = 6,
    /// Round to nearest; ties keep the truncated quotient.
    HalfTrunc = 7,
    /// Round to nearest; ties pick the even candidate (banker's rounding).
    HalfEven = 8,
}

/// Applies `mode` to a truncated division result.
///
/// `quotient` is the quotient truncated toward zero, `remainder` the integer
/// remainder of that truncation, `abs_divisor` the absolute value of the
/// divisor, and `negative` the sign of the true (untruncated) result.
///
/// A zero remainder never steps, for any mode. Division by zero must be
/// rejected before calling — it is never delegated to this function.
#[must_use]
pub fn round_quotient(
    quotient: &BigInt,
    remainder: &BigInt,
    abs_divisor: &BigInt,
    negative: bool,
    mode: RoundingMode,
) -> BigInt {
    if remainder.is_zero() {
        return quotient.clone();
    }

    // Stepping away from zero equals one step toward the sign of the true result
    let away = || {
        if negative {
            quotient - 1
        } else {
            quotient + 1
        }
    };

    let double_remainder = remainder.abs() * 2;
    let more_than_half = &double_remainder > abs_divisor;
    let tie = &double_remainder == abs_divisor;

    match mode {
        RoundingMode::Trunc => quotient.clone(),
        RoundingMode::Expand => away(),
        RoundingMode::Floor => {
            if negative {
                away()
            } else {
                quotient.clone()
            }
        }
        RoundingMode::Ceil => {
            if negative {
                quotient.clone()
            } else {
                away()
            }
        }
        RoundingMode::HalfTrunc => {
            if more_than_half {
                away()
            } else {
                quotient.clone()
            }
        }
        RoundingMode::HalfExpand => {
            if more_than_half || tie {
                away()
            } else {
                quotient.clone()
            }
        }
        RoundingMode::HalfCeil => {
            if more_than_half || (tie && !negative) {
                away()
            } else {
                quotient.clone()
            }
        }
        RoundingMode::HalfFloor => {
            if more_than_half || (tie && negative) {
                away()
            } else {
                quotient.clone()
            }
        }
        RoundingMode::HalfEven => {
            if more_than_half {
                away()
            } else if tie {
                if (quotient % BigInt::from(2)).is_zero() {
                    quotient.clone()
                } else {
                    away()
                }
            } else {
                quotient.clone()
            }
        }
    }
}

/// Divides `numer` by `denom` as big integers and rounds the quotient with `mode`.
///
/// # Errors
///
/// Returns [`NumericError::DivisionByZero`] if `denom` is zero.
pub fn round_div(numer: &BigInt, denom: &BigInt, mode: RoundingMode) -> Result<BigInt, NumericError> {
    if denom.is_zero() {
        return Err(NumericError::DivisionByZero);
    }
    let quotient = numer / denom;
    let remainder = numer % denom;
    let negative = numer.is_negative() != denom.is_negative() && !numer.is_zero();
    Ok(round_quotient(
        &quotient,
        &remainder,
        &denom.abs(),
        negative,
        mode,
    ))
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn div(numer: i64, denom: i64, mode: RoundingMode) -> i64 {
        let result = round_div(&BigInt::from(numer), &BigInt::from(denom), mode).unwrap();
        i64::try_from(result).unwrap()
    }

    #[rstest]
    #[case(RoundingMode::Ceil, 3)]
    #[case(RoundingMode::Floor, 2)]
    #[case(RoundingMode::Trunc, 2)]
    #[case(RoundingMode::Expand, 3)]
    #[case(RoundingMode::HalfCeil, 3)]
    #[case(RoundingMode::HalfFloor, 2)]
    #[case(RoundingMode::HalfExpand, 3)]
    #[case(RoundingMode::HalfTrunc, 2)]
    #[case(RoundingMode::HalfEven, 2)]
    fn test_two_point_five_to_integer(#[case] mode: RoundingMode, #[case] expected: i64) {
        // 2.5 rounded to 0 decimals is 25 / 10
        assert_eq!(div(25, 10, mode), expected);
    }

    #[rstest]
    #[case(RoundingMode::HalfEven, 4)]
    #[case(RoundingMode::HalfExpand, 4)]
    #[case(RoundingMode::HalfTrunc, 3)]
    fn test_three_point_five_to_integer(#[case] mode: RoundingMode, #[case] expected: i64) {
        assert_eq!(div(35, 10, mode), expected);
    }

    #[rstest]
    #[case(RoundingMode::Ceil, -2)]
    #[case(RoundingMode::Floor, -3)]
    #[case(RoundingMode::Trunc, -2)]
    #[case(RoundingMode::Expand, -3)]
    #[case(RoundingMode::HalfCeil, -2)]
    #[case(RoundingMode::HalfFloor, -3)]
    #[case(RoundingMode::HalfExpand, -3)]
    #[case(RoundingMode::HalfTrunc, -2)]
    #[case(RoundingMode::HalfEven, -2)]
    fn test_negative_two_point_five_to_integer(#[case] mode: RoundingMode, #[case] expected: i64) {
        assert_eq!(div(-25, 10, mode), expected);
    }

    #[rstest]
    #[case(RoundingMode::Ceil)]
    #[case(RoundingMode::Floor)]
    #[case(RoundingMode::Trunc)]
    #[case(RoundingMode::Expand)]
    #[case(RoundingMode::HalfCeil)]
    #[case(RoundingMode::HalfFloor)]
    #[case(RoundingMode::HalfExpand)]
    #[case(RoundingMode::HalfTrunc)]
    #[case(RoundingMode::HalfEven)]
    fn test_zero_remainder_never_steps(#[case] mode: RoundingMode) {
        assert_eq!(div(40, 10, mode), 4);
        assert_eq!(div(-40, 10, mode), -4);
    }

    #[rstest]
    #[case(26, 10, 3)]
    #[case(24, 10, 2)]
    #[case(-26, 10, -3)]
    #[case(-24, 10, -2)]
    fn test_half_even_away_from_tie(#[case] numer: i64, #[case] denom: i64, #[case] expected: i64) {
        assert_eq!(div(numer, denom, RoundingMode::HalfEven), expected);
    }

    #[rstest]
    fn test_division_by_zero_is_an_error() {
        let result = round_div(&BigInt::from(1), &BigInt::from(0), RoundingMode::Trunc);
        assert_eq!(result, Err(NumericError::DivisionByZero));
    }

    #[rstest]
    fn test_negative_divisor_matches_positive() {
        // 25 / -10 = -2.5: expand steps away from zero
        assert_eq!(div(25, -10, RoundingMode::Expand), -3);
        assert_eq!(div(25, -10, RoundingMode::Floor), -3);
        assert_eq!(div(25, -10, RoundingMode::Ceil), -2);
    }

    #[rstest]
    fn test_mode_default_is_half_expand() {
        assert_eq!(RoundingMode::default(), RoundingMode::HalfExpand);
    }

    #[rstest]
    #[case("halfExpand", RoundingMode::HalfExpand)]
    #[case("HALFEVEN", RoundingMode::HalfEven)]
    #[case("ceil", RoundingMode::Ceil)]
    fn test_mode_from_str(#[case] input: &str, #[case] expected: RoundingMode) {
        assert_eq!(RoundingMode::from_str(input).unwrap(), expected);
    }

    #[rstest]
    fn test_large_operands() {
        let numer = BigInt::from_str("123456789012345678901234567890123456789").unwrap();
        let denom = BigInt::from_str("100000000000000000000000000000000000000").unwrap();
        let result = round_div(&numer, &denom, RoundingMode::HalfExpand).unwrap();
        assert_eq!(result, BigInt::from(1));
    }
}
