/*!
# `feedcore`

Cache-conscious cores for consuming market-data feeds.

There are two independent cores in this crate and they do not interact:

- [`table::LruTable`]: a bounded, open-addressed table from short byte-string
  keys to `u32` counts, with the recency order of its entries kept as a
  doubly-linked list threaded through the slot array.
- [`de::TradeScanner`]: a decoder for Binance aggregate-trade feeds that
  locates every `"` in the input with 32-byte vectorized scans and then walks
  the quote offsets with a fixed stride pattern instead of parsing JSON
  structure.

## ⚠️ CAREFUL

The vectorized scan is performance sensitive and contains unsafe code. Any
changes need to be carefully considered and should be:

- tested against the benchmarks to make sure we don't regress (at least not accidentally).
- fuzz tested to ensure there aren't soundness holes introduced.

Unchecked operations on the input are done using macros that use the checked
variant in test/debug builds (or when the `checked` cfg is enabled) to make
sure we don't ever cause UB when working through feeds.

The decoder trusts its input: it assumes a compact JSON array of objects with
the exact aggregate-trade schema. Anything else decodes into empty or nonsense
records, but never into a panic or UB. [`de::parse_trades_reference`] accepts
the same feeds byte-at-a-time and is the semantic oracle for tests.
*/

#![cfg_attr(checked, deny(warnings))]
#![allow(clippy::missing_safety_doc)] // false positives

#[macro_use]
mod macros;

pub mod de;
pub mod table;

#[cfg(feature = "demo")]
pub mod transport;

pub use de::{parse_trades_reference, AggTrade, TradeScanner};
pub use table::LruTable;
