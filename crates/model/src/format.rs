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

//! Locale-aware display rendering for monetary values.
//!
//! All digit emission goes through the fixed-point integer renderer; locale
//! handling only rearranges separators and currency markers around those
//! digits. Currencies carrying an ISO 4217 code render through the standard
//! symbol placement for the locale; others use code placement with optional
//! sub-unit conversion (e.g. rendering BTC amounts in sats).

use exacta_core::{FixedPoint, Rational, RoundingMode, config::Config, fixed_point::pow10};
use ustr::Ustr;

use crate::{
    currencies::{SubUnit, pluralize_sub_unit, sub_unit_from_str},
    types::{Money, MoneyAmount},
};

/// Options controlling locale-aware rendering of a monetary value.
#[derive(Clone, Debug, Default)]
pub struct FormatOptions {
    /// BCP 47 locale tag (e.g. `"de-DE"`); the configured default when `None`.
    pub locale: Option<Ustr>,
    /// Render large magnitudes with K/M/B/T suffixes.
    pub compact: bool,
    /// Cap on rendered fractional digits; the currency's canonical count when `None`.
    pub max_decimals: Option<u32>,
    /// Floor on rendered fractional digits, padded with zeros.
    pub min_decimals: Option<u32>,
    /// Render in a named sub-unit (`"sat"`) or force base units (`"btc"`).
    pub preferred_unit: Option<Ustr>,
    /// Prefer the currency symbol over the code for non-ISO currencies.
    pub prefer_symbol: bool,
    /// Rounding applied when the value carries more precision than rendered.
    pub rounding_mode: Option<RoundingMode>,
    /// Render the bare amount without any currency marker.
    pub exclude_currency: bool,
}

struct LocaleSpec {
    decimal_sep: char,
    group_sep: &'static str,
    // Group widths right-to-left from the decimal point; the last width repeats
    group_widths: &'static [usize],
    symbol_prefix: bool,
}

static EN_US: LocaleSpec = LocaleSpec {
    decimal_sep: '.',
    group_sep: ",",
    group_widths: &[3],
    symbol_prefix: true,
};

static EN_IN: LocaleSpec = LocaleSpec {
    decimal_sep: '.',
    group_sep: ",",
    group_widths: &[3, 2],
    symbol_prefix: true,
};

static DE_DE: LocaleSpec = LocaleSpec {
    decimal_sep: ',',
    group_sep: ".",
    group_widths: &[3],
    symbol_prefix: false,
};

static FR_FR: LocaleSpec = LocaleSpec {
    decimal_sep: ',',
    group_sep: "\u{a0}",
    group_widths: &[3],
    symbol_prefix: false,
};

fn locale_spec(tag: &str) -> &'static LocaleSpec {
    match tag {
        "en-US" | "en-GB" | "ja-JP" => &EN_US,
        "en-IN" => &EN_IN,
        "de-DE" => &DE_DE,
        "fr-FR" => &FR_FR,
        other => {
            log::warn!("unknown locale '{other}', falling back to en-US");
            &EN_US
        }
    }
}

/// Shifts an amount up by `offset` decimal places (base units to sub-units).
fn to_sub_units(amount: &MoneyAmount, offset: u32) -> MoneyAmount {
    match amount {
        MoneyAmount::Fixed(fixed) => {
            if fixed.decimals >= offset {
                MoneyAmount::Fixed(FixedPoint::new(fixed.amount.clone(), fixed.decimals - offset))
            } else {
                MoneyAmount::Fixed(FixedPoint::new(
                    &fixed.amount * pow10(offset - fixed.decimals),
                    0,
                ))
            }
        }
        MoneyAmount::Rational(rational) => {
            MoneyAmount::Rational(rational.mul(&Rational::new(pow10(offset), 1)))
        }
    }
}

fn group_digits(digits: &str, spec: &LocaleSpec) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    let mut index = 0;
    while end > 0 {
        let width = spec
            .group_widths
            .get(index)
            .or(spec.group_widths.last())
            .copied()
            .unwrap_or(3);
        let start = end.saturating_sub(width);
        groups.push(&digits[start..end]);
        end = start;
        index += 1;
    }
    groups.reverse();
    groups.join(spec.group_sep)
}

fn render_number(fixed: &FixedPoint, spec: &LocaleSpec) -> (bool, String) {
    let plain = fixed.to_string();
    let (negative, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let mut out = group_digits(int_part, spec);
    if let Some(frac) = frac_part {
        out.push(spec.decimal_sep);
        out.push_str(frac);
    }
    (negative, out)
}

impl Money {
    /// Renders the value per `options`.
    ///
    /// The plain [`Display`](std::fmt::Display) impl renders `"10.50 USD"`
    /// style; this method adds locale separators, symbol/code placement,
    /// compact notation, and sub-unit conversion.
    #[must_use]
    pub fn format(&self, options: &FormatOptions) -> String {
        let config = Config::get();
        let tag = options.locale.unwrap_or(config.default_locale);
        let spec = locale_spec(tag.as_str());
        let mode = options.rounding_mode.unwrap_or(config.default_rounding_mode);

        // Sub-unit conversion applies only to units of this money's currency
        let mut sub_unit: Option<SubUnit> = None;
        if let Some(unit) = options.preferred_unit {
            if !unit.as_str().eq_ignore_ascii_case(self.currency.code.as_str()) {
                match sub_unit_from_str(unit.as_str()) {
                    Some(found) if found.currency == self.currency.code.as_str() => {
                        sub_unit = Some(found);
                    }
                    _ => log::warn!(
                        "preferred unit '{unit}' does not denominate {}, rendering base units",
                        self.currency.code
                    ),
                }
            }
        }

        let (amount, default_decimals) = match sub_unit {
            Some(unit) => (
                to_sub_units(&self.amount, unit.offset),
                self.currency.decimals.saturating_sub(unit.offset),
            ),
            None => (self.amount.clone(), self.currency.decimals),
        };

        let decimals = options.max_decimals.unwrap_or(default_decimals);
        let mut fixed = amount.demote(decimals, mode);

        let mut compact_suffix = "";
        if options.compact {
            let magnitude = fixed.abs();
            for (exp, suffix) in [(12u32, "T"), (9, "B"), (6, "M"), (3, "K")] {
                if magnitude >= FixedPoint::new(pow10(exp), 0) {
                    let shifted = FixedPoint::new(fixed.amount.clone(), fixed.decimals + exp);
                    fixed = shifted
                        .rescale_round(options.max_decimals.unwrap_or(1), mode)
                        .normalized();
                    compact_suffix = suffix;
                    break;
                }
            }
        } else if let Some(min) = options.min_decimals {
            if fixed.decimals < min {
                fixed = fixed.rescale(min);
            }
        }

        let (negative, number) = render_number(&fixed, spec);
        let number = format!("{number}{compact_suffix}");
        let sign = if negative { "-" } else { "" };

        if options.exclude_currency {
            return format!("{sign}{number}");
        }

        if let Some(unit) = sub_unit {
            let one = FixedPoint::new(1, 0);
            let label = pluralize_sub_unit(unit.name, fixed.abs() != one);
            return format!("{sign}{number} {label}");
        }

        let use_symbol = self.currency.is_iso4217() || options.prefer_symbol;
        if use_symbol && !self.currency.symbol.is_empty() {
            let symbol = self.currency.symbol;
            if spec.symbol_prefix {
                format!("{sign}{symbol}{number}")
            } else {
                format!("{sign}{number}\u{a0}{symbol}")
            }
        } else {
            format!("{sign}{number} {}", self.currency.code)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;
    use ustr::Ustr;

    use super::*;
    use crate::types::Currency;

    fn money(text: &str) -> Money {
        Money::parse(text, None).unwrap()
    }

    fn options() -> FormatOptions {
        FormatOptions::default()
    }

    #[rstest]
    fn test_default_locale_symbol_placement() {
        assert_eq!(money("1234.56 USD").format(&options()), "$1,234.56");
    }

    #[rstest]
    fn test_zero_decimal_currency() {
        assert_eq!(money("5000 JPY").format(&options()), "¥5,000");
    }

    #[rstest]
    fn test_german_locale() {
        let opts = FormatOptions {
            locale: Some(Ustr::from("de-DE")),
            ..options()
        };
        assert_eq!(money("1234.56 EUR").format(&opts), "1.234,56\u{a0}€");
    }

    #[rstest]
    fn test_french_locale() {
        let opts = FormatOptions {
            locale: Some(Ustr::from("fr-FR")),
            ..options()
        };
        assert_eq!(money("1234.56 EUR").format(&opts), "1\u{a0}234,56\u{a0}€");
    }

    #[rstest]
    fn test_indian_grouping() {
        let opts = FormatOptions {
            locale: Some(Ustr::from("en-IN")),
            ..options()
        };
        assert_eq!(money("12345678.90 INR").format(&opts), "₹1,23,45,678.90");
    }

    #[rstest]
    fn test_unknown_locale_falls_back() {
        let opts = FormatOptions {
            locale: Some(Ustr::from("xx-XX")),
            ..options()
        };
        assert_eq!(money("10.00 USD").format(&opts), "$10.00");
    }

    #[rstest]
    fn test_negative_sign_precedes_symbol() {
        assert_eq!(money("-10.50 USD").format(&options()), "-$10.50");
    }

    #[rstest]
    fn test_non_iso_renders_code_by_default() {
        assert_eq!(money("0.5 BTC").format(&options()), "0.50000000 BTC");
    }

    #[rstest]
    fn test_non_iso_prefers_symbol_on_request() {
        let opts = FormatOptions {
            prefer_symbol: true,
            ..options()
        };
        assert_eq!(money("0.5 BTC").format(&opts), "₿0.50000000");
    }

    #[rstest]
    fn test_sats_render_base_units_when_preferring_btc() {
        let opts = FormatOptions {
            preferred_unit: Some(Ustr::from("btc")),
            ..options()
        };
        assert_eq!(money("100 sat").format(&opts), "0.00000100 BTC");
    }

    #[rstest]
    fn test_btc_renders_in_sats() {
        let opts = FormatOptions {
            preferred_unit: Some(Ustr::from("sat")),
            ..options()
        };
        assert_eq!(money("0.00000100 BTC").format(&opts), "100 sats");
        assert_eq!(money("0.00000001 BTC").format(&opts), "1 sat");
    }

    #[rstest]
    fn test_sub_unit_of_other_currency_is_ignored() {
        let opts = FormatOptions {
            preferred_unit: Some(Ustr::from("wei")),
            ..options()
        };
        assert_eq!(money("10.00 USD").format(&opts), "$10.00");
    }

    #[rstest]
    fn test_compact_notation() {
        let compact = FormatOptions {
            compact: true,
            ..options()
        };
        assert_eq!(money("1234567 USD").format(&compact), "$1.2M");
        assert_eq!(money("5400 USD").format(&compact), "$5.4K");
        assert_eq!(money("2500000000 USD").format(&compact), "$2.5B");
        assert_eq!(money("950.00 USD").format(&compact), "$950.00");
    }

    #[rstest]
    fn test_min_and_max_decimals() {
        let padded = FormatOptions {
            min_decimals: Some(4),
            ..options()
        };
        assert_eq!(money("5 USD").format(&padded), "$5.0000");

        let truncated = FormatOptions {
            max_decimals: Some(0),
            rounding_mode: Some(RoundingMode::Trunc),
            ..options()
        };
        assert_eq!(money("1234.56 USD").format(&truncated), "$1,234");
    }

    #[rstest]
    fn test_exclude_currency() {
        let opts = FormatOptions {
            exclude_currency: true,
            ..options()
        };
        assert_eq!(money("1234.56 USD").format(&opts), "1,234.56");
    }

    #[rstest]
    fn test_rounding_mode_applies_to_excess_precision() {
        let money = Money::new(
            "2.345".parse::<FixedPoint>().unwrap(),
            Currency::USD(),
        );
        assert_eq!(money.format(&options()), "$2.35");
        let floor = FormatOptions {
            rounding_mode: Some(RoundingMode::Floor),
            ..options()
        };
        assert_eq!(money.format(&floor), "$2.34");
    }
}
