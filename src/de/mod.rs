/*!
Decoding for Binance aggregate-trade feeds.

The feed is a JSON array of objects whose member names, order, and types
never change:

```text
[{"a":26129,"p":"0.01633102","q":"4.70443515","f":27781,"l":27781,"T":1498793709153,"m":true},...]
```

Because the schema is fixed, the decoder never runs a JSON state machine.
It locates every `"` in the input, then walks the quote offsets with a fixed
stride pattern: each object contributes exactly 18 quotes, and the distance
from one key's opening quote to the next is 2, or 4 when the value is itself
a quoted string (`p` and `q`).

There are two implementations of the quote scan:

- an AVX2 vectorized implementation,
- and a byte-by-byte fallback implementation.

The vectorized implementation defers the input tail to the fallback, and for
every input the two must locate the same offsets. A third, structure-driven
parser ([`parse_trades_reference`]) accepts the same feeds byte-at-a-time,
tolerates whitespace, and is the semantic oracle for the other two: for
well-formed compact feeds all three produce the same records, while for
malformed feeds their results may diverge (but never panic).
*/

mod fallback;
mod reference;
#[cfg(target_arch = "x86_64")]
mod simd;
mod walk;

pub use reference::parse_trades_reference;

/**
One decoded aggregate trade.

Field names follow what the values mean; the single-letter JSON keys are
noted on each field. `price` and `qty` stay textual, the way the feed ships
them, so no decimal precision is lost.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggTrade {
    /// Aggregate trade id (`a`).
    pub agg_id: i64,
    /// Price (`p`).
    pub price: String,
    /// Quantity (`q`).
    pub qty: String,
    /// First constituent trade id (`f`).
    pub first_id: i64,
    /// Last constituent trade id (`l`).
    pub last_id: i64,
    /// Trade time in epoch milliseconds (`T`).
    pub time: i64,
    /// Whether the buyer was the maker (`m`).
    pub is_buyer_maker: bool,
}

/**
A reusable decoder for aggregate-trade feeds.

The scanner owns the quote-offset buffer so repeated calls re-use one
allocation; the constructor hint pre-sizes it for the expected number of
trades per feed.
*/
pub struct TradeScanner {
    quotes: Vec<u32>,
}

impl TradeScanner {
    /**
    Create a scanner expecting feeds of around `expected_trades` objects.
    */
    pub fn new(expected_trades: usize) -> Self {
        TradeScanner {
            quotes: Vec::with_capacity(expected_trades * walk::QUOTES_PER_TRADE),
        }
    }

    /**
    Decode a compact aggregate-trade feed.

    The input is trusted: a compact JSON array of schema-exact objects
    decodes fully, anything else decodes into however many complete trades
    the quote pattern yields (possibly none). No panic either way.
    */
    pub fn scan_trades(&mut self, input: &[u8]) -> Vec<AggTrade> {
        self.quotes.clear();

        // quote offsets are stored as u32
        if input.len() > u32::MAX as usize {
            return Vec::new();
        }

        scan_quotes(input, &mut self.quotes);
        walk::walk_trades(input, &self.quotes)
    }

    // used by tests and benches
    #[doc(hidden)]
    pub fn scan_trades_fallback(&mut self, input: &[u8]) -> Vec<AggTrade> {
        self.quotes.clear();

        if input.len() > u32::MAX as usize {
            return Vec::new();
        }

        fallback::scan(input, 0, &mut self.quotes);
        walk::walk_trades(input, &self.quotes)
    }
}

/**
Append the offset of every `"` in `input` to `quotes`, in ascending order.
*/
pub(crate) fn scan_quotes(input: &[u8], quotes: &mut Vec<u32>) {
    // when avx2 is available, we can vectorize
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            // SAFETY: avx2 is available
            unsafe { simd::scan(input, quotes) };
            return;
        }
    }

    fallback::scan(input, 0, quotes);
}

// Shared by the stride walk and the reference parser so both render values
// identically, even on inputs that slice through multi-byte characters.
fn owned_str(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// An optional `-` followed by decimal digits; parsing stops at the first
// non-digit and wraps rather than panics on overflow, so malformed input
// yields a number instead of a crash.
fn parse_i64(bytes: &[u8]) -> i64 {
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };

    let mut value = 0i64;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add((byte - b'0') as i64);
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_quotes_finds_every_quote() {
        let input = br#"[{"a":1,"p":"0.5"}]"#;

        let mut quotes = Vec::new();
        scan_quotes(input, &mut quotes);

        let expected: Vec<u32> = input
            .iter()
            .enumerate()
            .filter(|(_, &byte)| byte == b'"')
            .map(|(offset, _)| offset as u32)
            .collect();

        assert_eq!(expected, quotes);
    }

    #[test]
    fn parse_i64_handles_signs_and_garbage() {
        assert_eq!(0, parse_i64(b""));
        assert_eq!(0, parse_i64(b"-"));
        assert_eq!(42, parse_i64(b"42"));
        assert_eq!(-42, parse_i64(b"-42"));
        assert_eq!(1700000000000, parse_i64(b"1700000000000"));
        assert_eq!(12, parse_i64(b"12x34"));
        assert_eq!(0, parse_i64(b"x12"));
    }
}
