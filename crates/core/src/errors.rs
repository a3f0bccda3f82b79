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

//! The numeric error taxonomy.
//!
//! Every error is a value carrying a machine-readable [`code`](NumericError::code)
//! alongside a human-readable [`remediation`](NumericError::remediation) suggestion.

use thiserror::Error;

/// Errors raised by the arbitrary-precision numeric engine.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum NumericError {
    /// A division where the divisor evaluates to zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A division that is not exact in base 10 was attempted without a rounding mode.
    #[error(
        "dividing by {divisor} requires a rounding mode: the divisor contains factors other than 2 and 5"
    )]
    DivisionRequiresRounding {
        /// String rendering of the offending divisor.
        divisor: String,
    },

    /// Structurally invalid input (empty ratio lists, non-positive part counts, bad budgets).
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// A numeric literal input would lose precision under the active configuration.
    #[error("input {input} carries {digits} significant digits and would lose precision")]
    PrecisionLoss {
        /// String rendering of the offending literal.
        input: String,
        /// Number of significant digits detected.
        digits: u32,
    },
}

impl NumericError {
    /// Returns the stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::DivisionRequiresRounding { .. } => "DIVISION_REQUIRES_ROUNDING",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::PrecisionLoss { .. } => "PRECISION_LOSS",
        }
    }

    /// Returns a remediation suggestion, with a worked example where one applies.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "check the divisor for zero before dividing",
            Self::DivisionRequiresRounding { .. } => {
                "pass an explicit rounding mode, e.g. `money.div_checked(3.into(), Some(RoundingMode::HalfExpand))`"
            }
            Self::InvalidInput { .. } => {
                "see the reason for the specific constraint that was violated"
            }
            Self::PrecisionLoss { .. } => {
                "pass the value as a decimal string instead, e.g. `FixedPoint::from_str(\"0.1\")`, or relax `NumberInputMode`"
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

    #[rstest]
    fn test_codes_are_stable() {
        assert_eq!(NumericError::DivisionByZero.code(), "DIVISION_BY_ZERO");
        assert_eq!(
            NumericError::DivisionRequiresRounding {
                divisor: "3".to_string()
            }
            .code(),
            "DIVISION_REQUIRES_ROUNDING"
        );
    }

    #[rstest]
    fn test_display_names_the_divisor() {
        let err = NumericError::DivisionRequiresRounding {
            divisor: "7".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains("factors other than 2 and 5"));
    }

    #[rstest]
    fn test_remediation_carries_worked_example() {
        let err = NumericError::PrecisionLoss {
            input: "0.30000000000000004".to_string(),
            digits: 17,
        };
        assert!(err.remediation().contains("from_str"));
    }
}
