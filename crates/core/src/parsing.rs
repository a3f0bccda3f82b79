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

//! Core numeric-text parsing functions.
//!
//! Scientific notation is normalized by pure string surgery: exponents can
//! demand more fractional digits than any float format can carry, so the digits
//! are shifted in text form and never routed through floating point.

use crate::errors::NumericError;

/// Expands scientific notation (`mantissa[eE][+-]?digits`) into a plain decimal
/// string, preserving the exact digit count.
///
/// Plain decimal input is passed through after validation.
///
/// # Errors
///
/// Returns [`NumericError::InvalidInput`] if the mantissa or exponent is malformed.
pub fn expand_scientific_notation(s: &str) -> Result<String, NumericError> {
    let invalid = |reason: &str| NumericError::InvalidInput {
        reason: format!("cannot parse '{s}' as a decimal number: {reason}"),
    };

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => {
            let exp_str = &s[pos + 1..];
            let exp: i64 = exp_str
                .strip_prefix('+')
                .unwrap_or(exp_str)
                .parse()
                .map_err(|_| invalid("malformed exponent"))?;
            (&s[..pos], exp)
        }
        None => (s, 0),
    };

    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int, frac)) => {
            if frac.contains('.') {
                return Err(invalid("multiple decimal points"));
            }
            (int, frac)
        }
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid("no digits"));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("unexpected character"));
    }

    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exponent;

    let expanded = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if (point as usize) >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        format!("{}.{}", &digits[..point as usize], &digits[point as usize..])
    };

    Ok(format!("{sign}{expanded}"))
}

/// Returns the count of significant digits in a plain decimal string: the span
/// from the first to the last non-zero digit, ignoring the decimal point.
#[must_use]
pub fn significant_digits(s: &str) -> u32 {
    let digits: Vec<char> = s.chars().filter(char::is_ascii_digit).collect();
    let first = digits.iter().position(|&c| c != '0');
    let last = digits.iter().rposition(|&c| c != '0');
    match (first, last) {
        (Some(first), Some(last)) => (last - first + 1) as u32,
        _ => 0,
    }
}

/// Returns the decimal precision (fractional digit count) inferred from a plain
/// decimal string.
#[must_use]
pub fn precision_from_str(s: &str) -> u32 {
    match s.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}
