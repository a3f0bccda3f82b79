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

//! Value types for the monetary domain model.

pub mod amount;
pub mod currency;
pub mod exchange_rate;
pub mod money;
pub mod price;
pub mod price_range;

// Re-exports
pub use amount::MoneyAmount;
pub use currency::Currency;
pub use exchange_rate::ExchangeRate;
pub use money::{AllocateOptions, Bound, Factor, Money};
pub use price::{AssetAmount, Price};
pub use price_range::PriceRange;
