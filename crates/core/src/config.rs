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

//! Numeric-input validation configuration.
//!
//! The configuration gates only the *validation* of numeric literal inputs
//! (float constructors); it never changes an arithmetic result. It is the one
//! piece of process-wide state in the engine, and can be overridden within a
//! bounded dynamic scope via [`ConfigGuard`], which restores the prior value on
//! normal return and on unwind alike.

use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr};
use ustr::Ustr;

use crate::rounding::RoundingMode;

/// How float-literal inputs that may lose precision are treated.
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
    FromRepr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum NumberInputMode {
    /// Log a warning for imprecise literals and proceed.
    #[default]
    Warn = 0,
    /// Reject imprecise literals with a `PrecisionLoss` error.
    Error = 1,
    /// Accept all float literals without diagnostics.
    Silent = 2,
    /// Reject every float literal; only strings and integers are accepted.
    Never = 3,
}

/// Process-wide validation settings for numeric literal inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How imprecise float literals are treated.
    pub number_input_mode: NumberInputMode,
    /// Significant-digit count above which a float literal counts as imprecise.
    pub precision_warning_threshold: u32,
    /// Rounding mode applied when an operation requires one and none is given.
    pub default_rounding_mode: RoundingMode,
    /// Currency code assumed when parsing bare numeric text.
    pub default_currency_code: Ustr,
    /// Locale used for display formatting when none is requested.
    pub default_locale: Ustr,
    /// When `true`, precision warnings escalate to errors regardless of mode.
    pub strict_precision: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_input_mode: NumberInputMode::Warn,
            precision_warning_threshold: 15,
            default_rounding_mode: RoundingMode::HalfExpand,
            default_currency_code: Ustr::from("USD"),
            default_locale: Ustr::from("en-US"),
            strict_precision: false,
        }
    }
}

static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(Config::default()));

impl Config {
    /// Returns a snapshot of the active configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration lock is poisoned.
    #[must_use]
    pub fn get() -> Self {
        CONFIG.read().expect("config lock poisoned").clone()
    }

    /// Replaces the active configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration lock is poisoned.
    pub fn set(config: Self) {
        *CONFIG.write().expect("config lock poisoned") = config;
    }

    /// Restores the built-in defaults.
    pub fn reset() {
        Self::set(Self::default());
    }

    /// Applies `adjust` to a copy of the active configuration for the lifetime
    /// of the returned guard. Dropping the guard — on normal return or during
    /// unwind — restores the prior configuration.
    #[must_use]
    pub fn scoped(adjust: impl FnOnce(&mut Self)) -> ConfigGuard {
        let prev = Self::get();
        let mut next = prev.clone();
        adjust(&mut next);
        Self::set(next);
        ConfigGuard { prev: Some(prev) }
    }
}

/// Guard restoring the previous [`Config`] when dropped.
#[derive(Debug)]
pub struct ConfigGuard {
    prev: Option<Config>,
}

// Serializes tests that mutate the process-wide configuration
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            // Avoid a double panic if the lock poisoned during unwind
            if let Ok(mut config) = CONFIG.write() {
                *config = prev;
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
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.number_input_mode, NumberInputMode::Warn);
        assert_eq!(config.precision_warning_threshold, 15);
        assert_eq!(config.default_rounding_mode, RoundingMode::HalfExpand);
        assert_eq!(config.default_currency_code.as_str(), "USD");
        assert_eq!(config.default_locale.as_str(), "en-US");
        assert!(!config.strict_precision);
    }

    #[rstest]
    fn test_scoped_override_restores_on_drop_and_unwind() {
        let _lock = super::test_guard();
        Config::reset();
        {
            let _guard = Config::scoped(|c| c.number_input_mode = NumberInputMode::Silent);
            assert_eq!(Config::get().number_input_mode, NumberInputMode::Silent);
        }
        assert_eq!(Config::get().number_input_mode, NumberInputMode::Warn);

        let result = std::panic::catch_unwind(|| {
            let _guard = Config::scoped(|c| c.precision_warning_threshold = 3);
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(Config::get().precision_warning_threshold, 15);
    }

    #[rstest]
    fn test_serde_round_trip() {
        let config = Config {
            number_input_mode: NumberInputMode::Never,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"never\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
