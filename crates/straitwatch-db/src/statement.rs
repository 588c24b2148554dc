//! Statement boundary detection for passthrough SQL.
//!
//! A prepared statement only covers the first statement of its text, so a
//! string holding several would run partially. [`trailing_statement`] finds
//! where a second statement starts, honouring quoted text, comments, and the
//! `BEGIN ... END` body of `CREATE TRIGGER`.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Semicolon,
    Other,
}

/// Byte offset of the first statement after the leading one, if any.
///
/// Whitespace, comments, and stray semicolons after the first statement do
/// not count as a statement.
pub fn trailing_statement(sql: &str) -> Option<usize> {
    let mut tokens = Tokens::new(sql);
    let mut first_words: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut ended = false;

    while let Some((offset, token)) = tokens.next_token() {
        if ended {
            if token != Token::Semicolon {
                return Some(offset);
            }
            continue;
        }
        match token {
            Token::Word(word) => {
                if first_words.len() < 3 {
                    first_words.push(word.to_ascii_uppercase());
                }
                if is_trigger(&first_words) {
                    if word.eq_ignore_ascii_case("BEGIN") || word.eq_ignore_ascii_case("CASE") {
                        depth += 1;
                    } else if word.eq_ignore_ascii_case("END") {
                        depth = depth.saturating_sub(1);
                    }
                }
            }
            Token::Semicolon if depth == 0 => ended = !first_words.is_empty(),
            Token::Semicolon | Token::Other => {}
        }
    }
    None
}

fn is_trigger(words: &[String]) -> bool {
    match words {
        [create, kind, ..] if create == "CREATE" && kind == "TRIGGER" => true,
        [create, temp, kind] if create == "CREATE" && (temp == "TEMP" || temp == "TEMPORARY") => {
            kind == "TRIGGER"
        }
        _ => false,
    }
}

struct Tokens<'a> {
    sql: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(sql: &'a str) -> Self {
        Self { sql, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.sql[self.pos..]
    }

    /// Advance past the closing `close`, or to the end of input.
    fn skip_past(&mut self, close: &str) {
        match self.rest().find(close) {
            Some(i) => self.pos += i + close.len(),
            None => self.pos = self.sql.len(),
        }
    }

    /// Skip a quoted span; a doubled quote is an escaped quote.
    fn skip_quoted(&mut self, quote: char) {
        loop {
            self.skip_past(quote.encode_utf8(&mut [0; 4]));
            if !self.rest().starts_with(quote) || self.pos >= self.sql.len() {
                return;
            }
            self.pos += quote.len_utf8();
        }
    }

    fn next_token(&mut self) -> Option<(usize, Token<'a>)> {
        loop {
            let rest = self.rest();
            let c = rest.chars().next()?;
            let start = self.pos;

            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if rest.starts_with("--") {
                self.skip_past("\n");
            } else if rest.starts_with("/*") {
                self.pos += 2;
                self.skip_past("*/");
            } else if c == ';' {
                self.pos += 1;
                return Some((start, Token::Semicolon));
            } else if c == '\'' || c == '"' || c == '`' {
                self.pos += 1;
                self.skip_quoted(c);
                return Some((start, Token::Other));
            } else if c == '[' {
                self.pos += 1;
                self.skip_past("]");
                return Some((start, Token::Other));
            } else if c.is_alphanumeric() || c == '_' {
                let len = rest
                    .find(|ch: char| !(ch.is_alphanumeric() || ch == '_' || ch == '$'))
                    .unwrap_or(rest.len());
                self.pos += len;
                return Some((start, Token::Word(&rest[..len])));
            } else {
                self.pos += c.len_utf8();
                return Some((start, Token::Other));
            }
        }
    }
}
