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

//! The monetary error taxonomy.
//!
//! Like [`NumericError`], every error carries a machine-readable
//! [`code`](MoneyError::code) and a [`remediation`](MoneyError::remediation)
//! suggestion. Semantic errors (mismatched currencies, inexact division without
//! a mode) always surface to the caller — nothing is silently recovered.

use exacta_core::NumericError;
use thiserror::Error;

/// Errors raised by the monetary domain layer.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MoneyError {
    /// Unparseable or malformed monetary text.
    #[error("cannot parse '{input}': {reason}")]
    Parse {
        /// The offending input text.
        input: String,
        /// What made the text unparseable.
        reason: String,
    },

    /// A currency code, symbol, or sub-unit name that is not registered.
    #[error("unknown currency: {token}")]
    UnknownCurrency {
        /// The unrecognized code, symbol, or sub-unit name.
        token: String,
    },

    /// An operation between two incompatible currencies.
    #[error("currency mismatch in `{operation}`: {lhs} vs {rhs}")]
    CurrencyMismatch {
        /// The operation that was attempted.
        operation: String,
        /// The left-hand currency code.
        lhs: String,
        /// The right-hand currency code.
        rhs: String,
    },

    /// A structural violation of the JSON wire format.
    #[error("validation error: {reason}")]
    Validation {
        /// What was wrong with the document.
        reason: String,
    },

    /// An error propagated from the numeric engine.
    #[error(transparent)]
    Numeric(#[from] NumericError),
}

impl MoneyError {
    /// Returns the stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "PARSE_ERROR",
            Self::UnknownCurrency { .. } => "UNKNOWN_CURRENCY",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Numeric(inner) => inner.code(),
        }
    }

    /// Returns a remediation suggestion, with a worked example where one applies.
    #[must_use]
    pub const fn remediation(&self) -> &'static str {
        match self {
            Self::Parse { .. } => {
                "supply an amount like '1,234.56 USD', '$10', or '100 sat'"
            }
            Self::UnknownCurrency { .. } => {
                "register the currency first via `Currency::register`, or use a known ISO code"
            }
            Self::CurrencyMismatch { .. } => {
                "convert one operand first, e.g. `convert(&money, &rate)?`, before combining amounts"
            }
            Self::Validation { .. } => {
                "see the reason for the field that failed validation"
            }
            Self::Numeric(inner) => inner.remediation(),
        }
    }
}
