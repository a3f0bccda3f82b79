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

//! Currency-aware monetary value types for the Exacta monetary engine.
//!
//! The `exacta-model` crate defines the monetary domain built on the
//! [`exacta_core`] numeric engine:
//!
//! - `Currency` records with canonical decimal precisions, plus a process-wide registry.
//! - The `Money` value type: exact arithmetic, percentage operations, allocation
//!   and distribution, bounds, and a JSON wire format with string-encoded integers.
//! - A free-form money-string parser covering symbols, codes, sub-units,
//!   scientific notation, and US/EU digit grouping.
//! - Locale-aware display formatting including compact notation and sub-unit rendering.
//! - `Price`, `ExchangeRate`, and `PriceRange` composites with
//!   precision-preserving conversion.
//!
//! All types are immutable value objects: operations never mutate shared state,
//! and instances are freely shareable across threads.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod conversion;
pub mod currencies;
pub mod errors;
pub mod format;
pub mod parse;
pub mod types;

// Re-exports
pub use crate::{
    conversion::{convert, convert_with_price},
    errors::MoneyError,
    format::FormatOptions,
    types::{
        AllocateOptions, AssetAmount, Bound, Currency, ExchangeRate, Factor, Money, MoneyAmount,
        Price, PriceRange,
    },
};
