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

//! Represents a medium of exchange in a specified denomination with a canonical
//! decimal precision.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use exacta_core::correctness::{FAILED, check_nonempty_string, check_valid_currency_code};
use serde::{Deserialize, Serialize, Serializer};
use ustr::Ustr;

use crate::{currencies::CURRENCY_MAP, errors::MoneyError};

/// Represents a medium of exchange in a specified denomination with a canonical
/// decimal precision.
///
/// Equality and hashing consider only the `code`.
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Currency {
    /// The currency code as a 3-4 character string (e.g., "USD", "USDT").
    pub code: Ustr,
    /// The full name of the currency.
    pub name: Ustr,
    /// The canonical decimal-place count (e.g. 2 for USD, 8 for BTC).
    pub decimals: u32,
    /// The display symbol (e.g., "$", "₿").
    pub symbol: Ustr,
    /// The ISO 4217 numeric code, when the currency has one.
    ///
    /// Currencies carrying a code render through standard currency formatting;
    /// others use custom symbol/code placement.
    pub iso4217: Option<u16>,
}

impl Currency {
    /// Creates a new [`Currency`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `code` is not a 3-4 character alphanumeric code.
    /// - `name` is the empty string.
    pub fn new_checked<T: AsRef<str>>(
        code: T,
        name: T,
        decimals: u32,
        symbol: T,
        iso4217: Option<u16>,
    ) -> anyhow::Result<Self> {
        let code = code.as_ref();
        let name = name.as_ref();
        check_valid_currency_code(code, "code")?;
        check_nonempty_string(name, "name")?;
        Ok(Self {
            code: Ustr::from(code),
            name: Ustr::from(name),
            decimals,
            symbol: Ustr::from(symbol.as_ref()),
            iso4217,
        })
    }

    /// Creates a new [`Currency`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails. See [`Currency::new_checked`] for more details.
    pub fn new<T: AsRef<str>>(
        code: T,
        name: T,
        decimals: u32,
        symbol: T,
        iso4217: Option<u16>,
    ) -> Self {
        Self::new_checked(code, name, decimals, symbol, iso4217).expect(FAILED)
    }

    /// Registers `currency` in the process-wide currency map.
    ///
    /// - If `overwrite` is `true`, any existing currency will be replaced.
    /// - If `overwrite` is `false` and the currency already exists, the operation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if there is a failure acquiring the lock on the currency map.
    pub fn register(currency: Self, overwrite: bool) -> anyhow::Result<()> {
        let mut map = CURRENCY_MAP
            .lock()
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        if !overwrite && map.contains_key(currency.code.as_str()) {
            return Ok(());
        }

        map.insert(currency.code.to_string(), currency);
        Ok(())
    }

    /// Attempts to look up a [`Currency`] by code, returning `None` if not registered.
    pub fn try_from_str(s: &str) -> Option<Self> {
        let map_guard = CURRENCY_MAP.lock().ok()?;
        map_guard.get(&s.to_ascii_uppercase()).copied()
    }

    /// Returns `true` if this currency carries ISO 4217 formatter support.
    #[must_use]
    pub fn is_iso4217(&self) -> bool {
        self.iso4217.is_some()
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(code='{}', name='{}', decimals={}, symbol='{}', iso4217={:?})",
            stringify!(Currency),
            self.code,
            self.name,
            self.decimals,
            self.symbol,
            self.iso4217,
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_str(s).ok_or_else(|| MoneyError::UnknownCurrency {
            token: s.to_string(),
        })
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let currency_str: String = Deserialize::deserialize(deserializer)?;
        Self::from_str(&currency_str).map_err(serde::de::Error::custom)
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
    fn test_display_and_debug() {
        let currency = Currency::USD();
        assert_eq!(format!("{currency}"), "USD");
        assert!(format!("{currency:?}").contains("code='USD'"));
    }

    #[rstest]
    #[should_panic(expected = "code")]
    fn test_invalid_currency_code() {
        let _ = Currency::new("", "United States dollar", 2, "$", Some(840));
    }

    #[rstest]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Currency::try_from_str("usd").unwrap(), Currency::USD());
    }

    #[rstest]
    fn test_unknown_code_is_distinct_error() {
        let err = Currency::from_str("XXXX").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_CURRENCY");
    }

    #[rstest]
    fn test_register_no_overwrite() {
        let currency1 = Currency::new("TST1", "Test One", 2, "?", None);
        Currency::register(currency1, false).unwrap();

        let currency2 = Currency::new("TST1", "Test One Updated", 2, "?", None);
        Currency::register(currency2, false).unwrap();

        let found = Currency::try_from_str("TST1").unwrap();
        assert_eq!(found.name.as_str(), "Test One");
    }

    #[rstest]
    fn test_register_with_overwrite() {
        let currency1 = Currency::new("TST2", "Test Two", 2, "?", None);
        Currency::register(currency1, false).unwrap();

        let currency2 = Currency::new("TST2", "Test Two Overwritten", 2, "?", None);
        Currency::register(currency2, true).unwrap();

        let found = Currency::try_from_str("TST2").unwrap();
        assert_eq!(found.name.as_str(), "Test Two Overwritten");
    }

    #[rstest]
    fn test_equality_only_checks_code() {
        let c1 = Currency::new("ABCD", "Currency ABCD", 2, "?", None);
        let c2 = Currency::new("ABCD", "Completely Different", 8, "!", Some(1));
        assert_eq!(c1, c2);
    }

    #[rstest]
    fn test_serialization_deserialization() {
        let currency = Currency::USD();
        let serialized = serde_json::to_string(&currency).unwrap();
        assert_eq!(serialized, "\"USD\"");
        let deserialized: Currency = serde_json::from_str(&serialized).unwrap();
        assert_eq!(currency, deserialized);
    }
}
