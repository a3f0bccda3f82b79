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

//! Correctness validation functions used by constructors across the workspace.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Standard expect message for correctness checks that are not allowed to fail.
pub const FAILED: &str = "Condition failed";

/// Checks that `value` is a non-empty string.
///
/// # Errors
///
/// Returns an error if `value` is empty.
pub fn check_nonempty_string(value: &str, param: &str) -> anyhow::Result<()> {
    if value.is_empty() {
        anyhow::bail!("`{param}` must not be empty")
    }
    Ok(())
}

/// Checks that `code` is a plausible currency code: 3-4 ASCII alphanumeric characters.
///
/// # Errors
///
/// Returns an error if `code` is empty, too long, or contains other characters.
pub fn check_valid_currency_code(code: &str, param: &str) -> anyhow::Result<()> {
    if !(3..=4).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!("`{param}` must be a 3-4 character alphanumeric code, was '{code}'")
    }
    Ok(())
}

/// Checks that a ratio list is usable for allocation: non-empty, no negative
/// entries, and a non-zero total.
///
/// # Errors
///
/// Returns an error if any constraint is violated.
pub fn check_ratio_list(ratios: &[BigInt], param: &str) -> anyhow::Result<()> {
    if ratios.is_empty() {
        anyhow::bail!("`{param}` must not be empty")
    }
    if let Some(negative) = ratios.iter().find(|r| r.is_negative()) {
        anyhow::bail!("`{param}` must not contain negative ratios, found {negative}")
    }
    if ratios.iter().sum::<BigInt>().is_zero() {
        anyhow::bail!("`{param}` must sum to a non-zero total")
    }
    Ok(())
}

/// Checks that a distribution part count is positive.
///
/// # Errors
///
/// Returns an error if `parts` is zero.
pub fn check_parts_count(parts: usize, param: &str) -> anyhow::Result<()> {
    if parts == 0 {
        anyhow::bail!("`{param}` must be a positive part count")
    }
    Ok(())
}
