use super::{owned_str, parse_i64, AggTrade};

/**
Quotes contributed by one trade object.

The keys `a, p, q, f, l, T, m` contribute `2, 4, 4, 2, 2, 2, 2` quotes:
every key name is quoted, and the `p` and `q` values are quoted strings,
adding a pair each.
*/
pub(super) const QUOTES_PER_TRADE: usize = 18;

// stride over the quote index from one key's opening quote to the next
const KEY_STRIDES: [usize; 7] = [2, 4, 4, 2, 2, 2, 2];

/**
Walk the quote offsets and extract one trade per 18-quote group.

The walk never looks at JSON structure. From a key's opening quote `open`,
the byte at `open + 4` is the first byte past `"k":`; an unquoted value runs
from there to just before the next key's opening quote, a quoted value is
bounded by its own quote pair, and `m` needs only its first byte (`t` or
`f`).

A trailing group of fewer than 18 quotes can't hold a complete trade and is
ignored. Offsets that don't line up with the schema (malformed input) yield
empty slices, which decode to zero, `""`, or `false`.
*/
pub(super) fn walk_trades(input: &[u8], quotes: &[u32]) -> Vec<AggTrade> {
    let mut trades = Vec::with_capacity(quotes.len() / QUOTES_PER_TRADE);

    for group in quotes.chunks_exact(QUOTES_PER_TRADE) {
        let mut trade = AggTrade::default();
        let mut at = 0;

        for (key, &stride) in KEY_STRIDES.iter().enumerate() {
            let open = group[at] as usize;

            match key {
                0 => trade.agg_id = parse_i64(unquoted(input, group, at, stride)),
                1 => trade.price = owned_str(quoted(input, group, at)),
                2 => trade.qty = owned_str(quoted(input, group, at)),
                3 => trade.first_id = parse_i64(unquoted(input, group, at, stride)),
                4 => trade.last_id = parse_i64(unquoted(input, group, at, stride)),
                5 => trade.time = parse_i64(unquoted(input, group, at, stride)),
                _ => trade.is_buyer_maker = matches!(input.get(open + 4), Some(&b't')),
            }

            at += stride;
        }

        test_assert_eq!(QUOTES_PER_TRADE, at);

        trades.push(trade);
    }

    trades
}

// An unquoted value: from past `"k":` up to the byte before the next key's
// opening quote (the delimiter that terminates the value).
#[inline]
fn unquoted<'input>(input: &'input [u8], group: &[u32], at: usize, stride: usize) -> &'input [u8] {
    let start = group[at] as usize + 4;
    let end = (group[at + stride] as usize).saturating_sub(1);

    input.get(start..end).unwrap_or_default()
}

// A quoted value: the contents of the value's own quote pair, which sits
// right after the key pair in the quote index.
#[inline]
fn quoted<'input>(input: &'input [u8], group: &[u32], at: usize) -> &'input [u8] {
    let start = group[at + 2] as usize + 1;
    let end = group[at + 3] as usize;

    input.get(start..end).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes_of(input: &[u8]) -> Vec<u32> {
        input
            .iter()
            .enumerate()
            .filter(|(_, &byte)| byte == b'"')
            .map(|(offset, _)| offset as u32)
            .collect()
    }

    #[test]
    fn extracts_a_single_trade() {
        let input =
            br#"[{"a":1,"p":"0.5","q":"2","f":10,"l":11,"T":1700000000000,"m":true}]"# as &[u8];
        let quotes = quotes_of(input);
        assert_eq!(QUOTES_PER_TRADE, quotes.len());

        let trades = walk_trades(input, &quotes);

        assert_eq!(
            vec![AggTrade {
                agg_id: 1,
                price: "0.5".to_owned(),
                qty: "2".to_owned(),
                first_id: 10,
                last_id: 11,
                time: 1700000000000,
                is_buyer_maker: true,
            }],
            trades
        );
    }

    #[test]
    fn a_ragged_tail_is_dropped() {
        let input = br#"[{"a":1,"p":"0.5","q":"2","f":10,"l":11,"T":1700000000000,"m":true},{"a":2,"p":"0.6""# as &[u8];
        let quotes = quotes_of(input);
        assert_ne!(0, quotes.len() % QUOTES_PER_TRADE);

        let trades = walk_trades(input, &quotes);

        assert_eq!(1, trades.len());
        assert_eq!(1, trades[0].agg_id);
    }

    #[test]
    fn nonsense_offsets_do_not_panic() {
        // 18 quotes crammed together give the walk nothing sensible to
        // slice; it must come back with a defaulted trade, not a panic
        let input = vec![b'"'; QUOTES_PER_TRADE];
        let quotes = quotes_of(&input);

        let trades = walk_trades(&input, &quotes);

        assert_eq!(1, trades.len());
        assert_eq!(AggTrade::default(), trades[0]);
    }

    #[test]
    fn no_quotes_no_trades() {
        assert!(walk_trades(b"[]", &[]).is_empty());
    }
}
