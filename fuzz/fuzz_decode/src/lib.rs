pub fn de(input: &[u8]) {
    // Make sure we don't panic when decoding feeds
    let mut scanner = feedcore::TradeScanner::new(4);

    // The vectorized and fallback scans must locate the same quotes on every
    // input, well-formed or not, so the decoded trades must match exactly
    let vectorized = scanner.scan_trades(input);
    let fallback = scanner.scan_trades_fallback(input);
    assert_eq!(vectorized, fallback);

    // The reference parser tolerates whitespace, so its records can
    // legitimately differ on arbitrary bytes; it just must not panic
    let _ = feedcore::parse_trades_reference(input);
}
