use super::*;

use crate::{de, parse_trades_reference, AggTrade, TradeScanner};

use proptest::prelude::*;

const QUOTES_PER_TRADE: usize = 18;

/// Decode trades through `serde_json`, the ground truth for well-formed feeds.
fn oracle(input: &[u8]) -> Vec<AggTrade> {
    let feed: serde_json::Value = serde_json::from_slice(input).expect("oracle input must parse");

    feed.as_array()
        .expect("oracle input must be an array")
        .iter()
        .map(|trade| AggTrade {
            agg_id: trade["a"].as_i64().unwrap(),
            price: trade["p"].as_str().unwrap().to_owned(),
            qty: trade["q"].as_str().unwrap().to_owned(),
            first_id: trade["f"].as_i64().unwrap(),
            last_id: trade["l"].as_i64().unwrap(),
            time: trade["T"].as_i64().unwrap(),
            is_buyer_maker: trade["m"].as_bool().unwrap(),
        })
        .collect()
}

/// Build a compact feed of `count` schema-exact trades with varied values.
fn generate_feed(count: usize) -> Vec<u8> {
    let mut feed = String::from("[");

    for i in 0..count {
        if i > 0 {
            feed.push(',');
        }

        feed.push_str(&format!(
            r#"{{"a":{},"p":"{}.{:02}","q":"0.{:03}","f":{},"l":{},"T":{},"m":{}}}"#,
            2086518081u64 + i as u64,
            64230 + (i as i64 % 7) - 3,
            i % 100,
            i % 1000,
            5180845001u64 + 2 * i as u64,
            5180845002u64 + 2 * i as u64,
            1717430400012u64 + 37 * i as u64,
            i % 3 == 0,
        ));
    }

    feed.push(']');
    feed.into_bytes()
}

#[test]
fn read_one_trade() {
    let input = br#"[{"a":1,"p":"0.5","q":"2","f":10,"l":11,"T":1700000000000,"m":true}]"# as &[u8];

    let expected = AggTrade {
        agg_id: 1,
        price: "0.5".to_owned(),
        qty: "2".to_owned(),
        first_id: 10,
        last_id: 11,
        time: 1700000000000,
        is_buyer_maker: true,
    };

    let mut quotes = Vec::new();
    de::scan_quotes(input, &mut quotes);
    assert_eq!(QUOTES_PER_TRADE, quotes.len());

    let mut scanner = TradeScanner::new(1);
    assert_eq!(vec![expected.clone()], scanner.scan_trades(input));
    assert_eq!(vec![expected.clone()], scanner.scan_trades_fallback(input));
    assert_eq!(vec![expected], parse_trades_reference(input));
}

#[test]
fn read_10_trades_case() {
    let input = include_bytes!("../../cases/aggtrades_10.json") as &[u8];
    let expected = oracle(input);
    assert_eq!(10, expected.len());

    let mut scanner = TradeScanner::new(10);
    assert_eq!(expected, scanner.scan_trades(input));
    assert_eq!(expected, scanner.scan_trades_fallback(input));
    assert_eq!(expected, parse_trades_reference(input));
}

#[test]
fn read_10_trades_case_align_start() {
    let input = include_bytes!("../../cases/aggtrades_10.json") as &[u8];
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    let expected = oracle(input);

    let mut scanner = TradeScanner::new(10);

    with_alignments(input, |input| {
        assert_eq!(expected, scanner.scan_trades(input));
    });
}

#[test]
fn quote_count_tracks_trade_count() {
    for count in [0, 1, 2, 9, 33, 100] {
        let input = generate_feed(count);

        let mut quotes = Vec::new();
        de::scan_quotes(&input, &mut quotes);
        assert_eq!(count * QUOTES_PER_TRADE, quotes.len());

        let mut scanner = TradeScanner::new(count);
        assert_eq!(count, scanner.scan_trades(&input).len());
    }
}

#[test]
fn read_generated_feed_all_decoders_agree() {
    let input = generate_feed(500);
    let expected = oracle(&input);

    let mut scanner = TradeScanner::new(500);
    assert_eq!(expected, scanner.scan_trades(&input));
    assert_eq!(expected, scanner.scan_trades_fallback(&input));
    assert_eq!(expected, parse_trades_reference(&input));
}

#[test]
fn scanner_reuse_does_not_leak_state() {
    let mut scanner = TradeScanner::new(10);

    let big = generate_feed(50);
    let small = generate_feed(2);

    let first = scanner.scan_trades(&big);
    assert_eq!(50, first.len());

    // a smaller feed after a bigger one must not see stale offsets
    assert_eq!(oracle(&small), scanner.scan_trades(&small));
    assert_eq!(oracle(&big), scanner.scan_trades(&big));
}

#[test]
fn read_empty_feeds() {
    let mut scanner = TradeScanner::new(0);

    assert!(scanner.scan_trades(b"").is_empty());
    assert!(scanner.scan_trades(b"[]").is_empty());
    assert!(parse_trades_reference(b"").is_empty());
    assert!(parse_trades_reference(b"[]").is_empty());
}

#[test]
fn reference_tolerates_whitespace_the_scanner_does_not_need() {
    // the same trades, pretty-printed; only the reference parser accepts this
    let compact = generate_feed(3);
    let pretty = serde_json::to_vec_pretty(
        &serde_json::from_slice::<serde_json::Value>(&compact).unwrap(),
    )
    .unwrap();

    assert_eq!(oracle(&compact), parse_trades_reference(&pretty));
}

#[test]
fn truncated_feed_yields_complete_trades_only() {
    let input = generate_feed(3);

    // cut mid-way through the third object
    let cut = input.len() - 60;
    let truncated = &input[..cut];

    let mut scanner = TradeScanner::new(3);
    let trades = scanner.scan_trades(truncated);

    assert!(trades.len() < 3);
    assert_eq!(oracle(&input)[..trades.len()], trades[..]);
}

proptest! {
    // every quote in the input is indexed, in ascending order, no matter
    // what the bytes around it look like
    #[test]
    fn quote_scan_is_complete(input in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut quotes = Vec::new();
        de::scan_quotes(&input, &mut quotes);

        let expected: Vec<u32> = input
            .iter()
            .enumerate()
            .filter(|(_, &byte)| byte == b'"')
            .map(|(offset, _)| offset as u32)
            .collect();

        prop_assert_eq!(expected, quotes);
    }

    // arbitrary bytes must never panic any decoder, and the vectorized and
    // fallback scans must stay in lockstep
    #[test]
    fn arbitrary_bytes_never_panic(input in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut scanner = TradeScanner::new(4);

        let vectorized = scanner.scan_trades(&input);
        let fallback = scanner.scan_trades_fallback(&input);
        prop_assert_eq!(vectorized, fallback);

        let _ = parse_trades_reference(&input);
    }
}
