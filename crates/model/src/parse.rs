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

//! The free-form money-string parser.
//!
//! Turns text such as `"$1,234.56"`, `"1.234,56 EUR"`, `"-£9.99"`, `"100 sat"`,
//! or `"1.23E+5"` into a `(Currency, FixedPoint)` pair. The pipeline runs in
//! order: sign markers (including symbol-adjacent signs), currency
//! identification by symbol, code, or sub-unit name, scientific-notation
//! expansion by string surgery, then US/EU separator inference with strict
//! grouping validation. Unparseable text and unrecognized currency tokens are
//! distinct error conditions; nothing is ever coerced to zero.

use std::str::FromStr;

use exacta_core::{
    FixedPoint, NumericError, config::Config, parsing::expand_scientific_notation,
};

use crate::{
    currencies::{SYMBOL_PRIORITY, sub_unit_from_str},
    errors::MoneyError,
    types::Currency,
};

/// A currency identified in monetary text, with the decimal offset of the
/// sub-unit it was named by (zero for base units).
#[derive(Clone, Copy, Debug)]
struct CurrencyToken {
    currency: Currency,
    offset: u32,
}

fn is_token_char(c: char) -> bool {
    !c.is_ascii_digit() && !c.is_whitespace() && !matches!(c, '.' | ',' | '+' | '-')
}

fn strip_sign<'a>(s: &'a str, negative: &mut bool) -> &'a str {
    if let Some(rest) = s.strip_prefix('-') {
        *negative = true;
        rest.trim_start()
    } else if let Some(rest) = s.strip_prefix('+') {
        rest.trim_start()
    } else {
        s
    }
}

fn split_prefix_token(s: &str) -> (&str, &str) {
    let mut split = 0;
    for (i, c) in s.char_indices() {
        if is_token_char(c) {
            split = i + c.len_utf8();
        } else {
            break;
        }
    }
    (&s[..split], s[split..].trim_start())
}

fn split_suffix_token(s: &str) -> (&str, &str) {
    let mut split = s.len();
    for (i, c) in s.char_indices().rev() {
        if is_token_char(c) {
            split = i;
        } else {
            break;
        }
    }
    (s[..split].trim_end(), &s[split..])
}

/// Resolves a currency token: registered 3-4 letter codes win, then sub-unit
/// names (with plural forms), then the symbol priority table.
fn resolve_token(token: &str) -> Result<CurrencyToken, MoneyError> {
    if (3..=4).contains(&token.len()) && token.chars().all(|c| c.is_ascii_alphabetic()) {
        if let Some(currency) = Currency::try_from_str(token) {
            return Ok(CurrencyToken { currency, offset: 0 });
        }
    }
    if let Some(unit) = sub_unit_from_str(token) {
        let currency = Currency::from_str(unit.currency)?;
        return Ok(CurrencyToken {
            currency,
            offset: unit.offset,
        });
    }
    if let Some(code) = SYMBOL_PRIORITY.get(token) {
        let currency = Currency::from_str(code)?;
        return Ok(CurrencyToken { currency, offset: 0 });
    }
    Err(MoneyError::UnknownCurrency {
        token: token.to_string(),
    })
}

/// Parses free-form monetary text into its currency and exact amount.
///
/// `fallback` supplies the currency when the text names none; failing that, the
/// configured default currency applies.
///
/// # Errors
///
/// Returns an error if:
/// - The text is empty, has malformed digit grouping, multiple decimal points,
///   or no digits ([`MoneyError::Parse`]).
/// - A currency symbol, code, or sub-unit name is not recognized
///   ([`MoneyError::UnknownCurrency`]).
pub fn parse_money_str(
    text: &str,
    fallback: Option<Currency>,
) -> Result<(Currency, FixedPoint), MoneyError> {
    let parse_err = |reason: String| MoneyError::Parse {
        input: text.to_string(),
        reason,
    };

    let mut s = text.trim();
    if s.is_empty() {
        return Err(parse_err("empty input".to_string()));
    }

    let mut negative = false;
    s = strip_sign(s, &mut negative);
    if let Some(rest) = s.strip_suffix('-') {
        negative = true;
        s = rest.trim_end();
    } else if let Some(rest) = s.strip_suffix('+') {
        s = rest.trim_end();
    }

    let mut token: Option<CurrencyToken> = None;

    let (prefix, rest) = split_prefix_token(s);
    if !prefix.is_empty() {
        token = Some(resolve_token(prefix)?);
        s = strip_sign(rest, &mut negative);
    }

    let (rest, suffix) = split_suffix_token(s);
    if !suffix.is_empty() {
        let resolved = resolve_token(suffix)?;
        match token {
            None => token = Some(resolved),
            // A second token must restate the first, e.g. "$10 USD"
            Some(existing)
                if existing.currency != resolved.currency
                    || existing.offset != resolved.offset =>
            {
                return Err(parse_err(format!(
                    "conflicting currency tokens '{prefix}' and '{suffix}'"
                )));
            }
            Some(_) => {}
        }
        s = rest;
    }

    let amount = parse_numeral(s, text)?;
    let amount = if negative {
        FixedPoint::new(-amount.amount, amount.decimals)
    } else {
        amount
    };

    let (currency, offset) = match token {
        Some(token) => (token.currency, token.offset),
        None => {
            let currency = match fallback {
                Some(currency) => currency,
                None => Currency::from_str(Config::get().default_currency_code.as_str())?,
            };
            (currency, 0)
        }
    };

    // A sub-unit amount is the base-unit amount shifted by the unit's offset
    let amount = FixedPoint::new(amount.amount, amount.decimals + offset);
    Ok((currency, amount))
}

/// Parses the numeral portion: scientific notation first, then US/EU separator
/// inference and grouping validation.
fn parse_numeral(numeral: &str, original: &str) -> Result<FixedPoint, MoneyError> {
    let parse_err = |reason: String| MoneyError::Parse {
        input: original.to_string(),
        reason,
    };
    let numeric_err = |e: NumericError| MoneyError::Parse {
        input: original.to_string(),
        reason: e.to_string(),
    };

    if numeral.is_empty() {
        return Err(parse_err("no digits".to_string()));
    }

    if numeral.contains(['e', 'E']) {
        if numeral.contains(',') {
            return Err(parse_err(
                "digit grouping cannot be combined with an exponent".to_string(),
            ));
        }
        let plain = expand_scientific_notation(numeral).map_err(numeric_err)?;
        return plain.parse().map_err(numeric_err);
    }

    let dots = numeral.matches('.').count();
    let commas = numeral.matches(',').count();

    // (grouping, decimal) separators. With both present the decimal is the one
    // appearing exactly once nearest the end; a lone separator is decimal
    // unless it reads as a thousands group.
    let (group_sep, dec_sep) = match (dots, commas) {
        (0, 0) => (None, None),
        (1, 0) => (None, Some('.')),
        (_, 0) => (Some('.'), None),
        (0, 1) => {
            let after = numeral.rsplit(',').next().expect("split is non-empty");
            if after.len() == 3 && after.chars().all(|c| c.is_ascii_digit()) {
                (Some(','), None)
            } else {
                (None, Some(','))
            }
        }
        (0, _) => (Some(','), None),
        (_, _) => {
            let last_dot = numeral.rfind('.').expect("dot counted above");
            let last_comma = numeral.rfind(',').expect("comma counted above");
            if last_dot > last_comma {
                if dots != 1 {
                    return Err(parse_err("multiple decimal points".to_string()));
                }
                (Some(','), Some('.'))
            } else {
                if commas != 1 {
                    return Err(parse_err("multiple decimal points".to_string()));
                }
                (Some('.'), Some(','))
            }
        }
    };

    let (int_raw, frac_raw) = match dec_sep {
        Some(sep) => numeral.split_once(sep).expect("separator counted above"),
        None => (numeral, ""),
    };
    if let Some(sep) = group_sep {
        if frac_raw.contains(sep) {
            return Err(parse_err("grouping separator after the decimal point".to_string()));
        }
    }
    if !frac_raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(parse_err("unexpected character in fraction".to_string()));
    }

    let int_digits = match group_sep {
        Some(sep) => {
            let groups: Vec<&str> = int_raw.split(sep).collect();
            let well_formed = !groups[0].is_empty()
                && groups[0].len() <= 3
                && groups[1..].iter().all(|g| g.len() == 3)
                && groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit()));
            if !well_formed {
                return Err(parse_err("malformed digit grouping".to_string()));
            }
            groups.concat()
        }
        None => int_raw.to_string(),
    };

    format!("{int_digits}.{frac_raw}")
        .trim_end_matches('.')
        .parse()
        .map_err(numeric_err)
}
