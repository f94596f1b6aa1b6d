//! Typed extraction from a JSON document, driven by a scanf-style format
//! dialect.
//!
//! The format string is consumed left to right while a path cursor tracks
//! the position inside the document: `{` descends into an object, `}`
//! ascends, an identifier names a sibling key, and every `%` placeholder
//! drives one full walk of the document looking for an exact path match.
//!
//! # Examples
//!
//! ```
//! use jsonwalk::{scanf, ScanArg};
//!
//! let doc = r#"{"user": {"id": 7, "name": "ada"}, "ok": true}"#;
//! let (mut id, mut name, mut ok) = (0i64, None, false);
//! let n = scanf(
//!     doc,
//!     "{user: {id: %d, name: %Q}, ok: %B}",
//!     &mut [
//!         ScanArg::I64(&mut id),
//!         ScanArg::Str(&mut name),
//!         ScanArg::Bool(&mut ok),
//!     ],
//! );
//! assert_eq!((n, id, name.as_deref(), ok), (3, 7, Some("ada"), true));
//! ```

use crate::base64;
use crate::chars::{is_alpha, utf8_len};
use crate::escape::unescape;
use crate::token::{Token, TokenKind};
use crate::walker::walk;

/// One extraction target.
///
/// The placeholder character selects the conversion; the target variant
/// receives the result. Allocating converters (`Str`, `Hex`, `B64`) hand
/// ownership to the caller.
pub enum ScanArg<'t, 's> {
    /// `%B`: set to `true` iff the token is the `true` literal.
    Bool(&'t mut bool),
    /// `%d`, `%ld`, and friends: token text parsed as a signed integer.
    I64(&'t mut i64),
    /// `%u`, `%x`, and friends: token text parsed as an unsigned integer.
    U64(&'t mut u64),
    /// `%f`, `%lf`, `%g`, and friends: token text parsed as a float.
    F64(&'t mut f64),
    /// `%Q` (unescaped copy; JSON `null` leaves `None`) and `%s` (raw).
    Str(&'t mut Option<String>),
    /// `%T`: the token descriptor, verbatim.
    Tok(&'t mut Option<Token<'s>>),
    /// `%H`: hex-decoded bytes of a string value.
    Hex(&'t mut Option<Vec<u8>>),
    /// `%V`: base64-decoded bytes of a string value.
    B64(&'t mut Option<Vec<u8>>),
    /// `%M`: a custom sub-parser invoked with the raw token.
    Raw(&'t mut dyn FnMut(Token<'s>)),
}

/// Extracts values from `input` according to `fmt`, consuming one entry of
/// `args` per placeholder. Returns the number of successful conversions.
pub fn scanf<'s>(input: &'s str, fmt: &str, args: &mut [ScanArg<'_, 's>]) -> usize {
    let bytes = fmt.as_bytes();
    let mut path = String::new();
    let mut conversions = 0;
    let mut arg_iter = args.iter_mut();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                path.push('.');
                i += 1;
            }
            b'}' => {
                if let Some(p) = path.rfind('.') {
                    path.truncate(p);
                }
                i += 1;
            }
            b'%' => match bytes.get(i + 1).copied() {
                Some(c @ (b'B' | b'Q' | b'T' | b'M' | b'H' | b'V')) => {
                    i += 2;
                    if let Some(arg) = arg_iter.next() {
                        conversions += scan_simple(input, &path, c, arg);
                    }
                }
                Some(_) => {
                    const DELIMS: &[u8] = b", \t\r\n]}";
                    let mut end = i + 1;
                    while end < bytes.len() && !DELIMS.contains(&bytes[end]) {
                        end += 1;
                    }
                    let spec = &fmt[i..end];
                    i = end;
                    while i < bytes.len() && DELIMS.contains(&bytes[i]) {
                        i += 1;
                    }
                    if let Some(arg) = arg_iter.next() {
                        conversions += scan_host(input, &path, spec, arg);
                    }
                }
                None => i += 1,
            },
            b if is_alpha(b) || utf8_len(b) > 1 => {
                const DELIMS: &[u8] = b": \r\n\t";
                let start = i;
                while i < bytes.len() && !DELIMS.contains(&bytes[i]) {
                    i += 1;
                }
                let key = &fmt[start..i];
                // sibling semantics: replace everything after the last dot
                if let Some(p) = path.rfind('.') {
                    path.truncate(p + 1);
                }
                path.push_str(key);
                while i < bytes.len() && DELIMS.contains(&bytes[i]) {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    conversions
}

fn scan_simple<'s>(input: &'s str, path: &str, conv: u8, arg: &mut ScanArg<'_, 's>) -> usize {
    let mut hits = 0;
    let _ = walk(input, |ev| {
        if ev.path != path {
            return;
        }
        let Some(text) = ev.token.text else {
            return;
        };
        match (conv, &mut *arg) {
            (b'B', ScanArg::Bool(dst)) => {
                **dst = ev.token.kind == TokenKind::True;
                hits += 1;
            }
            (b'Q', ScanArg::Str(dst)) => {
                if ev.token.kind == TokenKind::Null {
                    **dst = None;
                } else if let Ok(s) = unescape(text) {
                    **dst = Some(s);
                    hits += 1;
                }
            }
            (b'T', ScanArg::Tok(dst)) => {
                **dst = Some(ev.token);
                hits += 1;
            }
            (b'M', ScanArg::Raw(f)) => {
                f(ev.token);
                hits += 1;
            }
            (b'H', ScanArg::Hex(dst)) => {
                if let Ok(bytes) = hex::decode(text) {
                    **dst = Some(bytes);
                    hits += 1;
                }
            }
            (b'V', ScanArg::B64(dst)) => {
                if let Some(bytes) = base64::decode(text) {
                    **dst = Some(bytes);
                    hits += 1;
                }
            }
            _ => {}
        }
    });
    hits
}

fn scan_host<'s>(input: &'s str, path: &str, spec: &str, arg: &mut ScanArg<'_, 's>) -> usize {
    let conv = spec.as_bytes().last().copied().unwrap_or(0);
    let mut hits = 0;
    let _ = walk(input, |ev| {
        if ev.path != path {
            return;
        }
        let Some(text) = ev.token.text else {
            return;
        };
        match &mut *arg {
            ScanArg::I64(dst) => {
                if let Ok(v) = text.parse::<i64>() {
                    **dst = v;
                    hits += 1;
                }
            }
            ScanArg::U64(dst) => {
                let parsed = if matches!(conv, b'x' | b'X') {
                    u64::from_str_radix(text, 16).ok()
                } else {
                    text.parse::<u64>().ok()
                };
                if let Some(v) = parsed {
                    **dst = v;
                    hits += 1;
                }
            }
            ScanArg::F64(dst) => {
                if let Ok(v) = text.parse::<f64>() {
                    **dst = v;
                    hits += 1;
                }
            }
            ScanArg::Str(dst) => {
                **dst = Some(text.to_string());
                hits += 1;
            }
            _ => {}
        }
    });
    hits
}

/// Returns the token at `path[idx]`, or `None` when no such element
/// exists. Containers are reported as their end token, spanning the full
/// text.
pub fn scanf_array_elem<'s>(input: &'s str, path: &str, idx: usize) -> Option<Token<'s>> {
    let want = format!("{path}[{idx}]");
    let mut found = None;
    let _ = walk(input, |ev| {
        if ev.path == want {
            found = Some(ev.token);
        }
    });
    found
}
