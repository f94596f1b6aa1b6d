//! Walker-driven pretty-printer.

use std::path::Path;

use crate::error::{FileError, JsonError};
use crate::fread::fread;
use crate::sink::JsonOut;
use crate::token::{Event, TokenKind};
use crate::walker::walk;

struct Prettifier<'o> {
    out: &'o mut dyn JsonOut,
    level: usize,
    last: Option<TokenKind>,
}

impl Prettifier<'_> {
    fn indent(&mut self) {
        for _ in 0..self.level {
            self.out.put(b"  ");
        }
    }

    /// Separator, newline, indentation, and `"key": ` prefix for the next
    /// entry.
    fn entry_prefix(&mut self, ev: &Event<'_, '_>) {
        if !matches!(
            self.last,
            None | Some(TokenKind::ArrayStart) | Some(TokenKind::ObjectStart)
        ) {
            self.out.put(b",");
        }
        if !ev.path.is_empty() {
            self.out.put(b"\n");
        }
        self.indent();
        if let Some(name) = ev.name {
            self.out.put(b"\"");
            self.out.put(name.as_bytes());
            self.out.put(b"\": ");
        }
    }

    fn visit(&mut self, ev: &Event<'_, '_>) {
        match ev.token.kind {
            TokenKind::ObjectStart | TokenKind::ArrayStart => {
                self.entry_prefix(ev);
                self.out
                    .put(if ev.token.kind == TokenKind::ArrayStart {
                        b"["
                    } else {
                        b"{"
                    });
                self.level += 1;
            }
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => {
                self.level -= 1;
                if !matches!(
                    self.last,
                    None | Some(TokenKind::ArrayStart) | Some(TokenKind::ObjectStart)
                ) {
                    self.out.put(b"\n");
                    self.indent();
                }
                self.out.put(if ev.token.kind == TokenKind::ArrayEnd {
                    b"]"
                } else {
                    b"}"
                });
            }
            _ => {
                self.entry_prefix(ev);
                let quote = ev.token.kind == TokenKind::Str;
                if quote {
                    self.out.put(b"\"");
                }
                if let Some(text) = ev.token.text {
                    self.out.put(text.as_bytes());
                }
                if quote {
                    self.out.put(b"\"");
                }
            }
        }
        self.last = Some(ev.token.kind);
    }
}

/// Re-emits `input` with two-space indentation, one container level per
/// line, and `"key": value` members. Returns the walker's byte count.
pub fn prettify(input: &str, out: &mut dyn JsonOut) -> Result<usize, JsonError> {
    let mut p = Prettifier {
        out,
        level: 0,
        last: None,
    };
    walk(input, |ev| p.visit(&ev))
}

/// Prettifies the file at `path` in place, appending a trailing newline.
///
/// The content is rendered in memory first, so the original bytes survive
/// any read or parse error untouched.
pub fn prettify_file(path: impl AsRef<Path>) -> Result<usize, FileError> {
    let text = fread(&path)?;
    let mut buf = Vec::with_capacity(text.len() * 2);
    let n = prettify(&text, &mut buf)?;
    buf.push(b'\n');
    std::fs::write(&path, &buf)?;
    Ok(n)
}
