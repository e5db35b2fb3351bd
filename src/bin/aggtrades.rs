/*!
Download a batch of Binance aggregate trades and time both decoders on it.

Parses the same feed many times with the structure-driven reference parser
and with the quote-pattern scanner, prints the first decoded trade from each
so the outputs can be eyeballed against each other, and reports per-record
timings and the speedup.
*/

use std::time::Instant;

use feedcore::{parse_trades_reference, transport, AggTrade, TradeScanner};

const SYMBOL: &str = "BTCUSDT";

const LIMIT: usize = 10;

const ITERATIONS: u32 = 100_000;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let url = format!(
        "https://fapi.binance.com/fapi/v1/aggTrades?symbol={}&limit={}",
        SYMBOL, LIMIT
    );

    println!("downloading trade data");
    let body = transport::fetch(&url);

    println!("\n========== REFERENCE PARSER ==========\n");

    let start = Instant::now();
    let mut trades = Vec::new();
    for _ in 0..ITERATIONS {
        trades = parse_trades_reference(&body);
    }
    let reference_ns_per_record = report(start.elapsed().as_nanos(), trades.len());

    print_first(&trades);

    println!("\n========== SIMD SCANNER ==========\n");

    let mut scanner = TradeScanner::new(LIMIT);

    let start = Instant::now();
    let mut scanned = Vec::new();
    for _ in 0..ITERATIONS {
        scanned = scanner.scan_trades(&body);
    }
    let simd_ns_per_record = report(start.elapsed().as_nanos(), scanned.len());

    print_first(&scanned);

    if trades != scanned {
        eprintln!("decoder outputs diverge; the feed is probably malformed");
    }

    if simd_ns_per_record > 0.0 {
        println!("\n========== COMPARISON ==========\n");
        println!("reference: {:.1} ns/record", reference_ns_per_record);
        println!("simd:      {:.1} ns/record", simd_ns_per_record);
        println!(
            "speedup:   {:.2}x",
            reference_ns_per_record / simd_ns_per_record
        );
    }
}

fn print_first(trades: &[AggTrade]) {
    let trade = match trades.first() {
        Some(trade) => trade,
        None => {
            println!("no trades decoded");
            return;
        }
    };

    println!("trade id:       {}", trade.agg_id);
    println!("  price:          {}", trade.price);
    println!("  quantity:       {}", trade.qty);
    println!("  first trade id: {}", trade.first_id);
    println!("  last trade id:  {}", trade.last_id);
    println!("  timestamp:      {}", trade.time);
    println!("  buyer is maker: {}", trade.is_buyer_maker);
}

fn report(elapsed_ns: u128, records_per_iteration: usize) -> f64 {
    let total_records = records_per_iteration as u128 * ITERATIONS as u128;
    if total_records == 0 {
        println!("no records parsed");
        return 0.0;
    }

    let ns_per_record = elapsed_ns as f64 / total_records as f64;

    println!("total records parsed: {}", total_records);
    println!("total time: {} ns", elapsed_ns);
    println!("average time per record: {:.1} ns", ns_per_record);

    ns_per_record
}
