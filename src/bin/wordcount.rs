/*!
Count the words of a Project Gutenberg book in a bounded LRU table.

Downloads A Tale of Two Cities, splits it on ASCII whitespace, and keeps a
per-token count in a fixed-capacity [`LruTable`]. Inserts that fail because
the table is full are logged and dropped; the run still completes.
*/

use feedcore::{transport, LruTable};

use tracing::error;

const BOOK_URL: &str = "https://www.gutenberg.org/files/98/98-0.txt";

const TABLE_CAPACITY: usize = 20_000;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("downloading book");
    let body = transport::fetch(BOOK_URL);

    let text = String::from_utf8_lossy(&body);
    let words: Vec<&str> = text.split_ascii_whitespace().collect();

    for word in words.iter().take(10) {
        println!("{}", word);
    }
    println!("\ntotal words: {}", words.len());

    let mut counts = LruTable::new(TABLE_CAPACITY);

    for word in &words {
        let count = counts.get(word.as_bytes()).unwrap_or(0);
        if !counts.insert(word.as_bytes(), count + 1) {
            error!(%word, "table full, dropping count");
        }
    }

    let samples = [
        "the",
        "a",
        "12",
        "Gutenberg",
        "to",
        "unprecedented",
        "of",
        "and",
        "city",
        "1231231",
        "Bob",
        "City",
    ];

    for sample in samples {
        match counts.get(sample.as_bytes()) {
            Some(count) => println!("word: '{}' count: {}", sample, count),
            None => println!("word: '{}' not found in table", sample),
        }
    }
}
