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

//! Arbitrary-precision numeric foundations for the Exacta monetary engine.
//!
//! The `exacta-core` crate supplies the numeric building blocks that every
//! monetary type in the Exacta ecosystem is built on, using only big-integer
//! arithmetic — floating point never participates in a computed value:
//!
//! - The shared quotient/remainder rounding algorithm and its nine tie-breaking policies.
//! - Arbitrary-precision fixed-point decimals.
//! - Exact rational numbers with bounded narrowing back to fixed-point.
//! - The numeric error taxonomy.
//! - The numeric-input validation configuration with scoped overrides.
//! - Correctness validation functions.
//!
//! All value types are immutable: every operation returns a new instance, and
//! instances are freely shareable across threads without synchronization.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod correctness;
pub mod errors;
pub mod fixed_point;
pub mod parsing;
pub mod rational;
pub mod rounding;

// Re-exports
pub use crate::{
    config::{Config, ConfigGuard, NumberInputMode},
    errors::NumericError,
    fixed_point::FixedPoint,
    rational::{FixedPointBound, Rational},
    rounding::RoundingMode,
};
