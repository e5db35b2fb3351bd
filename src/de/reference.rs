use super::{owned_str, parse_i64, AggTrade};

/**
Parse an aggregate-trade feed byte-at-a-time.

Unlike [`TradeScanner`](super::TradeScanner), this parser follows JSON
structure: it recognizes `[`, `]`, `{`, `}`, `,`, `:`, quoted strings
(without escape handling), decimal integers with an optional `-`, and the
`true`/`false` literals, and it tolerates whitespace between tokens. It is
the semantic oracle for the quote-pattern decoder and the baseline in the
benchmarks.

Field names and order are still fixed: each object must carry exactly
`a, p, q, f, l, T, m` in that order. On malformed input the parser keeps
whatever trades were fully assembled and stops.
*/
pub fn parse_trades_reference(input: &[u8]) -> Vec<AggTrade> {
    Cursor { input, at: 0 }.parse_trades()
}

// the order values are parsed in, by JSON key
const FIELD_ORDER: [u8; 7] = *b"apqflTm";

struct Cursor<'input> {
    input: &'input [u8],
    at: usize,
}

impl<'input> Cursor<'input> {
    fn parse_trades(mut self) -> Vec<AggTrade> {
        let mut trades = Vec::new();

        if !self.expect(b'[') {
            return trades;
        }

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.at += 1;
            return trades;
        }

        loop {
            trades.push(self.parse_trade());

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.at += 1,
                Some(b']') => {
                    self.at += 1;
                    break;
                }
                // truncated input: keep what we have
                _ => break,
            }
        }

        trades
    }

    fn parse_trade(&mut self) -> AggTrade {
        let mut trade = AggTrade::default();

        if !self.expect(b'{') {
            return trade;
        }

        for key in FIELD_ORDER {
            if !self.parse_field(key, &mut trade) {
                break;
            }
        }

        if self.peek() == Some(b'}') {
            self.at += 1;
        }

        trade
    }

    // Parse one `"k":value` member, holding it to the expected key. Returns
    // whether a comma followed, i.e. whether more members are coming; the
    // final member of every object therefore reports `false` after its
    // value has already been recorded.
    fn parse_field(&mut self, expected: u8, trade: &mut AggTrade) -> bool {
        self.skip_whitespace();

        let name = self.parse_string();
        if !self.expect(b':') {
            return false;
        }

        if name.len() != 1 || name[0] != expected {
            return false;
        }

        match expected {
            b'a' => trade.agg_id = self.parse_int(),
            b'p' => trade.price = owned_str(self.parse_string()),
            b'q' => trade.qty = owned_str(self.parse_string()),
            b'f' => trade.first_id = self.parse_int(),
            b'l' => trade.last_id = self.parse_int(),
            b'T' => trade.time = self.parse_int(),
            _ => trade.is_buyer_maker = self.parse_bool(),
        }

        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.at += 1;
            true
        } else {
            false
        }
    }

    // a string without escape handling: everything up to the next `"`; a
    // missing closing quote yields what was there
    fn parse_string(&mut self) -> &'input [u8] {
        self.skip_whitespace();

        if self.peek() != Some(b'"') {
            return &[];
        }
        self.at += 1;

        let start = self.at;
        while let Some(byte) = self.peek() {
            if byte == b'"' {
                break;
            }
            self.at += 1;
        }

        let contents = &self.input[start..self.at];

        // step over the closing quote if it's there
        if self.peek() == Some(b'"') {
            self.at += 1;
        }

        contents
    }

    fn parse_int(&mut self) -> i64 {
        self.skip_whitespace();

        let start = self.at;
        if self.peek() == Some(b'-') {
            self.at += 1;
        }
        while matches!(self.peek(), Some(byte) if byte.is_ascii_digit()) {
            self.at += 1;
        }

        parse_i64(&self.input[start..self.at])
    }

    // dispatch on the first byte; the literals are consumed by their fixed
    // lengths, which is enough for this schema
    fn parse_bool(&mut self) -> bool {
        self.skip_whitespace();

        match self.peek() {
            Some(b't') => {
                self.at += "true".len();
                true
            }
            Some(b'f') => {
                self.at += "false".len();
                false
            }
            _ => false,
        }
    }

    fn expect(&mut self, token: u8) -> bool {
        self.skip_whitespace();

        if self.peek() != Some(token) {
            return false;
        }

        self.at += 1;
        true
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(byte) if byte.is_ascii_whitespace()) {
            self.at += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.at).copied()
    }
}
