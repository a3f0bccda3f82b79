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

//! Common `Currency` constants plus the symbol and sub-unit lookup tables.

use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex, OnceLock},
};

use indexmap::IndexMap;
use ustr::Ustr;

use crate::types::Currency;

///////////////////////////////////////////////////////////////////////////////
// Fiat currencies
///////////////////////////////////////////////////////////////////////////////
static AUD_LOCK: OnceLock<Currency> = OnceLock::new();
static BRL_LOCK: OnceLock<Currency> = OnceLock::new();
static CAD_LOCK: OnceLock<Currency> = OnceLock::new();
static CHF_LOCK: OnceLock<Currency> = OnceLock::new();
static CNY_LOCK: OnceLock<Currency> = OnceLock::new();
static DKK_LOCK: OnceLock<Currency> = OnceLock::new();
static EUR_LOCK: OnceLock<Currency> = OnceLock::new();
static GBP_LOCK: OnceLock<Currency> = OnceLock::new();
static HKD_LOCK: OnceLock<Currency> = OnceLock::new();
static INR_LOCK: OnceLock<Currency> = OnceLock::new();
static JPY_LOCK: OnceLock<Currency> = OnceLock::new();
static KRW_LOCK: OnceLock<Currency> = OnceLock::new();
static KWD_LOCK: OnceLock<Currency> = OnceLock::new();
static MXN_LOCK: OnceLock<Currency> = OnceLock::new();
static NOK_LOCK: OnceLock<Currency> = OnceLock::new();
static NZD_LOCK: OnceLock<Currency> = OnceLock::new();
static SEK_LOCK: OnceLock<Currency> = OnceLock::new();
static SGD_LOCK: OnceLock<Currency> = OnceLock::new();
static USD_LOCK: OnceLock<Currency> = OnceLock::new();
static ZAR_LOCK: OnceLock<Currency> = OnceLock::new();

///////////////////////////////////////////////////////////////////////////////
// Crypto currencies
///////////////////////////////////////////////////////////////////////////////
static BTC_LOCK: OnceLock<Currency> = OnceLock::new();
static ETH_LOCK: OnceLock<Currency> = OnceLock::new();
static SOL_LOCK: OnceLock<Currency> = OnceLock::new();
static USDT_LOCK: OnceLock<Currency> = OnceLock::new();
static USDC_LOCK: OnceLock<Currency> = OnceLock::new();

impl Currency {
    /// Returns the Australian dollar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn AUD() -> Self {
        *AUD_LOCK.get_or_init(|| Self {
            code: Ustr::from("AUD"),
            name: Ustr::from("Australian dollar"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(36),
        })
    }

    /// Returns the Brazilian real.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn BRL() -> Self {
        *BRL_LOCK.get_or_init(|| Self {
            code: Ustr::from("BRL"),
            name: Ustr::from("Brazilian real"),
            decimals: 2,
            symbol: Ustr::from("R$"),
            iso4217: Some(986),
        })
    }

    /// Returns the Canadian dollar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn CAD() -> Self {
        *CAD_LOCK.get_or_init(|| Self {
            code: Ustr::from("CAD"),
            name: Ustr::from("Canadian dollar"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(124),
        })
    }

    /// Returns the Swiss franc.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn CHF() -> Self {
        *CHF_LOCK.get_or_init(|| Self {
            code: Ustr::from("CHF"),
            name: Ustr::from("Swiss franc"),
            decimals: 2,
            symbol: Ustr::from("Fr"),
            iso4217: Some(756),
        })
    }

    /// Returns the Chinese yuan.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn CNY() -> Self {
        *CNY_LOCK.get_or_init(|| Self {
            code: Ustr::from("CNY"),
            name: Ustr::from("Chinese yuan"),
            decimals: 2,
            symbol: Ustr::from("¥"),
            iso4217: Some(156),
        })
    }

    /// Returns the Danish krone.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn DKK() -> Self {
        *DKK_LOCK.get_or_init(|| Self {
            code: Ustr::from("DKK"),
            name: Ustr::from("Danish krone"),
            decimals: 2,
            symbol: Ustr::from("kr"),
            iso4217: Some(208),
        })
    }

    /// Returns the euro.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn EUR() -> Self {
        *EUR_LOCK.get_or_init(|| Self {
            code: Ustr::from("EUR"),
            name: Ustr::from("Euro"),
            decimals: 2,
            symbol: Ustr::from("€"),
            iso4217: Some(978),
        })
    }

    /// Returns the pound sterling.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn GBP() -> Self {
        *GBP_LOCK.get_or_init(|| Self {
            code: Ustr::from("GBP"),
            name: Ustr::from("Pound sterling"),
            decimals: 2,
            symbol: Ustr::from("£"),
            iso4217: Some(826),
        })
    }

    /// Returns the Hong Kong dollar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn HKD() -> Self {
        *HKD_LOCK.get_or_init(|| Self {
            code: Ustr::from("HKD"),
            name: Ustr::from("Hong Kong dollar"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(344),
        })
    }

    /// Returns the Indian rupee.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn INR() -> Self {
        *INR_LOCK.get_or_init(|| Self {
            code: Ustr::from("INR"),
            name: Ustr::from("Indian rupee"),
            decimals: 2,
            symbol: Ustr::from("₹"),
            iso4217: Some(356),
        })
    }

    /// Returns the Japanese yen.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn JPY() -> Self {
        *JPY_LOCK.get_or_init(|| Self {
            code: Ustr::from("JPY"),
            name: Ustr::from("Japanese yen"),
            decimals: 0,
            symbol: Ustr::from("¥"),
            iso4217: Some(392),
        })
    }

    /// Returns the South Korean won.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn KRW() -> Self {
        *KRW_LOCK.get_or_init(|| Self {
            code: Ustr::from("KRW"),
            name: Ustr::from("South Korean won"),
            decimals: 0,
            symbol: Ustr::from("₩"),
            iso4217: Some(410),
        })
    }

    /// Returns the Kuwaiti dinar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn KWD() -> Self {
        *KWD_LOCK.get_or_init(|| Self {
            code: Ustr::from("KWD"),
            name: Ustr::from("Kuwaiti dinar"),
            decimals: 3,
            symbol: Ustr::from("KD"),
            iso4217: Some(414),
        })
    }

    /// Returns the Mexican peso.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn MXN() -> Self {
        *MXN_LOCK.get_or_init(|| Self {
            code: Ustr::from("MXN"),
            name: Ustr::from("Mexican peso"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(484),
        })
    }

    /// Returns the Norwegian krone.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn NOK() -> Self {
        *NOK_LOCK.get_or_init(|| Self {
            code: Ustr::from("NOK"),
            name: Ustr::from("Norwegian krone"),
            decimals: 2,
            symbol: Ustr::from("kr"),
            iso4217: Some(578),
        })
    }

    /// Returns the New Zealand dollar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn NZD() -> Self {
        *NZD_LOCK.get_or_init(|| Self {
            code: Ustr::from("NZD"),
            name: Ustr::from("New Zealand dollar"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(554),
        })
    }

    /// Returns the Swedish krona.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn SEK() -> Self {
        *SEK_LOCK.get_or_init(|| Self {
            code: Ustr::from("SEK"),
            name: Ustr::from("Swedish krona"),
            decimals: 2,
            symbol: Ustr::from("kr"),
            iso4217: Some(752),
        })
    }

    /// Returns the Singapore dollar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn SGD() -> Self {
        *SGD_LOCK.get_or_init(|| Self {
            code: Ustr::from("SGD"),
            name: Ustr::from("Singapore dollar"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(702),
        })
    }

    /// Returns the United States dollar.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn USD() -> Self {
        *USD_LOCK.get_or_init(|| Self {
            code: Ustr::from("USD"),
            name: Ustr::from("United States dollar"),
            decimals: 2,
            symbol: Ustr::from("$"),
            iso4217: Some(840),
        })
    }

    /// Returns the South African rand.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn ZAR() -> Self {
        *ZAR_LOCK.get_or_init(|| Self {
            code: Ustr::from("ZAR"),
            name: Ustr::from("South African rand"),
            decimals: 2,
            symbol: Ustr::from("R"),
            iso4217: Some(710),
        })
    }

    /// Returns Bitcoin.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn BTC() -> Self {
        *BTC_LOCK.get_or_init(|| Self {
            code: Ustr::from("BTC"),
            name: Ustr::from("Bitcoin"),
            decimals: 8,
            symbol: Ustr::from("₿"),
            iso4217: None,
        })
    }

    /// Returns Ether.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn ETH() -> Self {
        *ETH_LOCK.get_or_init(|| Self {
            code: Ustr::from("ETH"),
            name: Ustr::from("Ether"),
            decimals: 18,
            symbol: Ustr::from("Ξ"),
            iso4217: None,
        })
    }

    /// Returns Solana.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn SOL() -> Self {
        *SOL_LOCK.get_or_init(|| Self {
            code: Ustr::from("SOL"),
            name: Ustr::from("Solana"),
            decimals: 9,
            symbol: Ustr::from("◎"),
            iso4217: None,
        })
    }

    /// Returns Tether.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDT() -> Self {
        *USDT_LOCK.get_or_init(|| Self {
            code: Ustr::from("USDT"),
            name: Ustr::from("Tether"),
            decimals: 6,
            symbol: Ustr::from("₮"),
            iso4217: None,
        })
    }

    /// Returns USD Coin.
    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDC() -> Self {
        *USDC_LOCK.get_or_init(|| Self {
            code: Ustr::from("USDC"),
            name: Ustr::from("USD Coin"),
            decimals: 6,
            symbol: Ustr::from("$"),
            iso4217: None,
        })
    }
}

/// The process-wide currency map, keyed by uppercase code.
pub static CURRENCY_MAP: LazyLock<Mutex<HashMap<String, Currency>>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    ///////////////////////////////////////////////////////////////////////////
    // Fiat currencies
    ///////////////////////////////////////////////////////////////////////////
    map.insert(Currency::AUD().code.to_string(), Currency::AUD());
    map.insert(Currency::BRL().code.to_string(), Currency::BRL());
    map.insert(Currency::CAD().code.to_string(), Currency::CAD());
    map.insert(Currency::CHF().code.to_string(), Currency::CHF());
    map.insert(Currency::CNY().code.to_string(), Currency::CNY());
    map.insert(Currency::DKK().code.to_string(), Currency::DKK());
    map.insert(Currency::EUR().code.to_string(), Currency::EUR());
    map.insert(Currency::GBP().code.to_string(), Currency::GBP());
    map.insert(Currency::HKD().code.to_string(), Currency::HKD());
    map.insert(Currency::INR().code.to_string(), Currency::INR());
    map.insert(Currency::JPY().code.to_string(), Currency::JPY());
    map.insert(Currency::KRW().code.to_string(), Currency::KRW());
    map.insert(Currency::KWD().code.to_string(), Currency::KWD());
    map.insert(Currency::MXN().code.to_string(), Currency::MXN());
    map.insert(Currency::NOK().code.to_string(), Currency::NOK());
    map.insert(Currency::NZD().code.to_string(), Currency::NZD());
    map.insert(Currency::SEK().code.to_string(), Currency::SEK());
    map.insert(Currency::SGD().code.to_string(), Currency::SGD());
    map.insert(Currency::USD().code.to_string(), Currency::USD());
    map.insert(Currency::ZAR().code.to_string(), Currency::ZAR());
    ///////////////////////////////////////////////////////////////////////////
    // Crypto currencies
    ///////////////////////////////////////////////////////////////////////////
    map.insert(Currency::BTC().code.to_string(), Currency::BTC());
    map.insert(Currency::ETH().code.to_string(), Currency::ETH());
    map.insert(Currency::SOL().code.to_string(), Currency::SOL());
    map.insert(Currency::USDT().code.to_string(), Currency::USDT());
    map.insert(Currency::USDC().code.to_string(), Currency::USDC());
    Mutex::new(map)
});

/// Symbols shared by several currencies resolve to the highest-volume one;
/// the table also pins unique symbols so lookup never scans the full map.
pub static SYMBOL_PRIORITY: LazyLock<IndexMap<&'static str, &'static str>> = LazyLock::new(|| {
    IndexMap::from([
        ("$", "USD"),
        ("¥", "JPY"),
        ("£", "GBP"),
        ("€", "EUR"),
        ("₹", "INR"),
        ("₩", "KRW"),
        ("kr", "SEK"),
        ("₿", "BTC"),
        ("Ξ", "ETH"),
        ("◎", "SOL"),
        ("₮", "USDT"),
    ])
});

/// A named fractional denomination of a base currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubUnit {
    /// The singular sub-unit name (e.g. "satoshi").
    pub name: &'static str,
    /// The base currency code.
    pub currency: &'static str,
    /// Decimal offset from the base unit (e.g. 8 for satoshi).
    pub offset: u32,
}

/// Recognized sub-unit names, keyed by singular lowercase name.
///
/// Aliases ("sat") and irregular plurals ("pence") get their own entries;
/// regular plurals are handled by stripping a trailing `s` at lookup.
pub static SUB_UNITS: LazyLock<IndexMap<&'static str, SubUnit>> = LazyLock::new(|| {
    let entries = [
        SubUnit { name: "satoshi", currency: "BTC", offset: 8 },
        SubUnit { name: "sat", currency: "BTC", offset: 8 },
        SubUnit { name: "wei", currency: "ETH", offset: 18 },
        SubUnit { name: "gwei", currency: "ETH", offset: 9 },
        SubUnit { name: "lamport", currency: "SOL", offset: 9 },
        SubUnit { name: "cent", currency: "USD", offset: 2 },
        SubUnit { name: "¢", currency: "USD", offset: 2 },
        SubUnit { name: "penny", currency: "GBP", offset: 2 },
        SubUnit { name: "pence", currency: "GBP", offset: 2 },
    ];
    entries.into_iter().map(|unit| (unit.name, unit)).collect()
});

/// Looks up a sub-unit by name, applying simple English pluralization rules.
#[must_use]
pub fn sub_unit_from_str(name: &str) -> Option<SubUnit> {
    let lowered = name.to_ascii_lowercase();
    if let Some(unit) = SUB_UNITS.get(lowered.as_str()) {
        return Some(*unit);
    }
    let singular = lowered.strip_suffix('s')?;
    SUB_UNITS.get(singular).copied()
}

/// Pluralizes a sub-unit name for the given count of units.
#[must_use]
pub fn pluralize_sub_unit(name: &str, plural: bool) -> String {
    if !plural || name.ends_with('s') || name == "pence" || name == "wei" || name == "gwei" {
        return name.to_string();
    }
    if name == "penny" {
        return "pence".to_string();
    }
    format!("{name}s")
}
