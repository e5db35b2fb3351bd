#![cfg(unstable)]
#![feature(test)]
extern crate test;

use feedcore::{parse_trades_reference, TradeScanner};

fn feed_10() -> &'static [u8] {
    include_bytes!("../cases/aggtrades_10.json")
}

fn feed_1000() -> Vec<u8> {
    let one = feed_10();
    let body = &one[1..one.len() - 2];

    let mut feed = Vec::with_capacity(body.len() * 100 + 128);
    feed.push(b'[');
    for i in 0..100 {
        if i > 0 {
            feed.push(b',');
        }
        feed.extend_from_slice(body);
    }
    feed.push(b']');
    feed
}

#[bench]
fn read_10_trades_simd(b: &mut test::Bencher) {
    let input = feed_10();
    let mut scanner = TradeScanner::new(10);

    b.bytes = input.len() as u64;
    b.iter(|| scanner.scan_trades(input))
}

#[bench]
fn read_10_trades_fallback(b: &mut test::Bencher) {
    let input = feed_10();
    let mut scanner = TradeScanner::new(10);

    b.bytes = input.len() as u64;
    b.iter(|| scanner.scan_trades_fallback(input))
}

#[bench]
fn read_10_trades_reference(b: &mut test::Bencher) {
    let input = feed_10();

    b.bytes = input.len() as u64;
    b.iter(|| parse_trades_reference(input))
}

#[bench]
fn read_10_trades_value_serde_json(b: &mut test::Bencher) {
    let input = feed_10();

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();
        v
    })
}

#[bench]
fn read_1000_trades_simd(b: &mut test::Bencher) {
    let input = feed_1000();
    let mut scanner = TradeScanner::new(1000);

    b.bytes = input.len() as u64;
    b.iter(|| scanner.scan_trades(&input))
}

#[bench]
fn read_1000_trades_fallback(b: &mut test::Bencher) {
    let input = feed_1000();
    let mut scanner = TradeScanner::new(1000);

    b.bytes = input.len() as u64;
    b.iter(|| scanner.scan_trades_fallback(&input))
}

#[bench]
fn read_1000_trades_reference(b: &mut test::Bencher) {
    let input = feed_1000();

    b.bytes = input.len() as u64;
    b.iter(|| parse_trades_reference(&input))
}
