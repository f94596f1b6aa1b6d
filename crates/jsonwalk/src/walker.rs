//! Single-pass JSON tokenizer with path-tagged callbacks.
//!
//! [`walk`] consumes a contiguous JSON text and invokes a callback once per
//! token, carrying the token itself, the current dotted/bracketed path
//! (`.user.id`, `.tags[2]`), and the key of the containing object member.
//! No value tree is built; every token borrows from the input.
//!
//! The grammar is lenient JSON: object keys may be unquoted identifiers,
//! and whitespace is skipped before every token consumer.
//!
//! # Examples
//!
//! ```
//! use jsonwalk::{walk, TokenKind};
//!
//! let mut ids = Vec::new();
//! walk(r#"{"user":{"id":7}}"#, |ev| {
//!     if ev.token.kind == TokenKind::Num {
//!         ids.push((ev.path.to_string(), ev.token.text.unwrap()));
//!     }
//! })
//! .unwrap();
//! assert_eq!(ids, vec![(".user.id".to_string(), "7")]);
//! ```

use crate::chars::{escape_len, is_alpha, is_digit, is_space, utf8_len};
use crate::error::JsonError;
use crate::token::{Event, Token, TokenKind};

/// Default capacity of the walk path buffer, in bytes.
pub const DEFAULT_PATH_CAPACITY: usize = 256;

/// Bounded path buffer.
///
/// Appends beyond the capacity are dropped at a UTF-8 character boundary;
/// the walk itself never fails for this reason, it just reports truncated
/// paths. Keys containing `.` or `[` are inserted verbatim and produce
/// paths that no lookup can resolve, a documented limitation of the
/// path vocabulary.
struct WalkPath {
    buf: String,
    capacity: usize,
}

impl WalkPath {
    fn new(capacity: usize) -> Self {
        Self {
            buf: String::new(),
            capacity,
        }
    }

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn as_str(&self) -> &str {
        &self.buf
    }

    fn push(&mut self, segment: &str) {
        let left = self.capacity.saturating_sub(self.buf.len());
        if segment.len() <= left {
            self.buf.push_str(segment);
        } else {
            let mut n = left;
            while n > 0 && !segment.is_char_boundary(n) {
                n -= 1;
            }
            self.buf.push_str(&segment[..n]);
        }
    }

    fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    fn ends_with_dot(&self) -> bool {
        self.buf.as_bytes().last() == Some(&b'.')
    }
}

struct Walker<'s, F> {
    doc: &'s str,
    src: &'s [u8],
    cur: usize,
    name: Option<&'s str>,
    path: WalkPath,
    cb: F,
}

impl<'s, F> Walker<'s, F>
where
    F: FnMut(Event<'s, '_>),
{
    fn skip_ws(&mut self) {
        while self.cur < self.src.len() && is_space(self.src[self.cur]) {
            self.cur += 1;
        }
    }

    /// Next significant byte, after skipping whitespace.
    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.cur).copied()
    }

    fn expect_byte(&mut self, want: u8) -> Result<(), JsonError> {
        match self.peek() {
            Some(b) if b == want => {
                self.cur += 1;
                Ok(())
            }
            Some(_) => Err(JsonError::Invalid),
            None => Err(JsonError::Incomplete),
        }
    }

    /// Delivers one token to the callback.
    ///
    /// Suppressed while the path ends in the separator pushed on object
    /// entry: this keeps container start/end paths free of the trailing
    /// `.`, and swallows the string emission a key parse would otherwise
    /// produce.
    fn emit(&mut self, kind: TokenKind, span: Option<(usize, usize)>) {
        if self.path.ends_with_dot() {
            return;
        }
        let token = Token {
            kind,
            text: span.map(|(a, b)| &self.doc[a..b]),
        };
        (self.cb)(Event {
            name: self.name.take(),
            path: self.path.as_str(),
            token,
        });
    }

    /// string = '"' { char | escape } '"'
    fn parse_string(&mut self) -> Result<(), JsonError> {
        self.expect_byte(b'"')?;
        let start = self.cur;
        loop {
            let Some(&b) = self.src.get(self.cur) else {
                return Err(JsonError::Incomplete);
            };
            if b < 0x20 {
                return Err(JsonError::Invalid);
            }
            let mut len = utf8_len(b);
            if len > self.src.len() - self.cur {
                return Err(JsonError::Incomplete);
            }
            if b == b'\\' {
                len += escape_len(&self.src[self.cur + 1..])?;
            } else if b == b'"' {
                self.emit(TokenKind::Str, Some((start, self.cur)));
                self.cur += 1;
                return Ok(());
            }
            self.cur += len;
        }
    }

    /// number = '-'? digit+ ('.' digit+)? ([eE] [+-]? digit+)?
    fn parse_number(&mut self) -> Result<(), JsonError> {
        self.skip_ws();
        let start = self.cur;
        if self.src.get(self.cur) == Some(&b'-') {
            self.cur += 1;
        }
        self.digit_run()?;
        if self.src.get(self.cur) == Some(&b'.') {
            self.cur += 1;
            self.digit_run()?;
        }
        if matches!(self.src.get(self.cur), Some(b'e' | b'E')) {
            self.cur += 1;
            if matches!(self.src.get(self.cur), Some(b'+' | b'-')) {
                self.cur += 1;
            }
            self.digit_run()?;
        }
        self.emit(TokenKind::Num, Some((start, self.cur)));
        Ok(())
    }

    fn digit_run(&mut self) -> Result<(), JsonError> {
        match self.src.get(self.cur) {
            None => return Err(JsonError::Incomplete),
            Some(&b) if !is_digit(b) => return Err(JsonError::Invalid),
            Some(_) => {}
        }
        while self.src.get(self.cur).is_some_and(|&b| is_digit(b)) {
            self.cur += 1;
        }
        Ok(())
    }

    /// identifier = alpha { alpha | digit | '_' }
    fn parse_identifier(&mut self) -> Result<(), JsonError> {
        if !self.peek().is_some_and(is_alpha) {
            return Err(JsonError::Invalid);
        }
        let start = self.cur;
        while self
            .src
            .get(self.cur)
            .is_some_and(|&b| b == b'_' || is_alpha(b) || is_digit(b))
        {
            self.cur += 1;
        }
        self.emit(TokenKind::Str, Some((start, self.cur)));
        Ok(())
    }

    fn expect_literal(&mut self, lit: &'static [u8], kind: TokenKind) -> Result<(), JsonError> {
        self.skip_ws();
        let start = self.cur;
        for (i, &b) in lit.iter().enumerate() {
            match self.src.get(start + i) {
                None => return Err(JsonError::Incomplete),
                Some(&c) if c != b => return Err(JsonError::Invalid),
                Some(_) => {}
            }
        }
        self.cur += lit.len();
        self.emit(kind, Some((start, self.cur)));
        Ok(())
    }

    /// array = '[' [ value { ',' value } ] ']'
    fn parse_array(&mut self) -> Result<(), JsonError> {
        self.emit(TokenKind::ArrayStart, None);
        self.expect_byte(b'[')?;
        let start = self.cur - 1;
        let mark = self.path.len();
        let mut idx = 0usize;
        while self.peek() != Some(b']') {
            self.path.push(&format!("[{idx}]"));
            idx += 1;
            self.parse_value()?;
            self.path.truncate(mark);
            if self.peek() == Some(b',') {
                self.cur += 1;
            }
        }
        self.expect_byte(b']')?;
        self.emit(TokenKind::ArrayEnd, Some((start, self.cur)));
        Ok(())
    }

    /// object = '{' [ pair { ',' pair } ] '}'
    fn parse_object(&mut self) -> Result<(), JsonError> {
        self.emit(TokenKind::ObjectStart, None);
        self.expect_byte(b'{')?;
        let start = self.cur - 1;
        let mark = self.path.len();
        self.path.push(".");
        while self.peek() != Some(b'}') {
            self.parse_pair()?;
            if self.peek() == Some(b',') {
                self.cur += 1;
            }
        }
        self.expect_byte(b'}')?;
        self.path.truncate(mark);
        self.emit(TokenKind::ObjectEnd, Some((start, self.cur)));
        Ok(())
    }

    /// pair = key ':' value
    fn parse_pair(&mut self) -> Result<(), JsonError> {
        self.skip_ws();
        let tok = self.cur;
        self.parse_key()?;
        let name = if self.src[tok] == b'"' {
            &self.doc[tok + 1..self.cur - 1]
        } else {
            &self.doc[tok..self.cur]
        };
        self.name = Some(name);
        let mark = self.path.len();
        self.path.push(name);
        self.expect_byte(b':')?;
        self.parse_value()?;
        self.path.truncate(mark);
        Ok(())
    }

    /// key = identifier | string
    fn parse_key(&mut self) -> Result<(), JsonError> {
        match self.peek() {
            Some(b) if is_alpha(b) => self.parse_identifier(),
            Some(b'"') => self.parse_string(),
            Some(_) => Err(JsonError::Invalid),
            None => Err(JsonError::Incomplete),
        }
    }

    /// value = 'null' | 'true' | 'false' | number | string | array | object
    fn parse_value(&mut self) -> Result<(), JsonError> {
        match self.peek() {
            Some(b'"') => self.parse_string(),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'n') => self.expect_literal(b"null", TokenKind::Null),
            Some(b't') => self.expect_literal(b"true", TokenKind::True),
            Some(b'f') => self.expect_literal(b"false", TokenKind::False),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(JsonError::Invalid),
            None => Err(JsonError::Incomplete),
        }
    }
}

/// Walks `input` as a single JSON value, invoking `cb` once per token.
///
/// Returns the number of bytes consumed on success. Structural errors
/// report [`JsonError::Invalid`]; a document that ends where more input
/// could complete it reports [`JsonError::Incomplete`]. The callback is
/// never invoked for a token that fails to parse, and it cannot abort the
/// walk; set a flag and check it afterwards.
pub fn walk<'s, F>(input: &'s str, cb: F) -> Result<usize, JsonError>
where
    F: FnMut(Event<'s, '_>),
{
    walk_with_capacity(input, DEFAULT_PATH_CAPACITY, cb)
}

/// [`walk`] with an explicit path-buffer capacity.
///
/// Paths longer than `path_capacity` bytes are silently truncated at a
/// character boundary; the parse itself is unaffected.
pub fn walk_with_capacity<'s, F>(
    input: &'s str,
    path_capacity: usize,
    cb: F,
) -> Result<usize, JsonError>
where
    F: FnMut(Event<'s, '_>),
{
    if input.is_empty() {
        return Err(JsonError::Incomplete);
    }
    let mut w = Walker {
        doc: input,
        src: input.as_bytes(),
        cur: 0,
        name: None,
        path: WalkPath::new(path_capacity),
        cb,
    };
    w.parse_value()?;
    Ok(w.cur)
}
