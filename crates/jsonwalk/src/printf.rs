//! JSON emitter driven by a printf-style format dialect.
//!
//! Three lexeme classes interleave in a format string: JSON punctuation
//! (`: , [ ] { } "` and whitespace) is copied verbatim, a bare identifier
//! is emitted surrounded by double quotes (shorthand for object keys),
//! and `%` placeholders consume arguments from the supplied slice.
//!
//! # Examples
//!
//! ```
//! use jsonwalk::{args, printf};
//!
//! let mut out = Vec::new();
//! printf(&mut out, "{tags: [%Q, %Q], n: %d}", &args!["a", "b", 2]);
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     r#"{"tags": ["a", "b"], "n": 2}"#
//! );
//! ```

use std::cell::Cell;
use std::fs::File;
use std::path::Path;

use crate::base64;
use crate::chars::{is_alpha, is_digit};
use crate::error::FileError;
use crate::escape::escape;
use crate::sink::{FileOut, JsonOut};

/// One emitter argument.
///
/// The placeholder character in the format string selects the semantics;
/// the argument carries the data. `From` conversions cover the common
/// types, so a call site can build the slice with the [`args!`] macro.
pub enum FmtArg<'a> {
    /// `%B`: unquoted `true`/`false`.
    Bool(bool),
    /// Signed integer conversions (`%d`, `%ld`, ...).
    I64(i64),
    /// Unsigned, hex, and octal conversions (`%u`, `%x`, `%o`).
    U64(u64),
    /// Floating conversions (`%f`, `%g`, `%e`).
    F64(f64),
    /// `%c`.
    Char(char),
    /// `%s` (raw) and `%Q`/`%.*Q` (quoted, JSON-escaped).
    Str(&'a str),
    /// `%Q` rendering the JSON `null` literal.
    Null,
    /// `%H` (quoted lowercase hex) and `%V` (quoted base64).
    Bytes(&'a [u8]),
    /// `%M`: a custom emitter, free to pull further arguments from the
    /// cursor it is handed.
    Emit(&'a dyn for<'b> Fn(&mut dyn JsonOut, &mut Args<'a, 'b>) -> usize),
    /// `%n`: receives the running output length.
    Len(&'a Cell<usize>),
}

impl From<bool> for FmtArg<'_> {
    fn from(v: bool) -> Self {
        FmtArg::Bool(v)
    }
}

impl From<i32> for FmtArg<'_> {
    fn from(v: i32) -> Self {
        FmtArg::I64(v.into())
    }
}

impl From<i64> for FmtArg<'_> {
    fn from(v: i64) -> Self {
        FmtArg::I64(v)
    }
}

impl From<u32> for FmtArg<'_> {
    fn from(v: u32) -> Self {
        FmtArg::U64(v.into())
    }
}

impl From<u64> for FmtArg<'_> {
    fn from(v: u64) -> Self {
        FmtArg::U64(v)
    }
}

impl From<f64> for FmtArg<'_> {
    fn from(v: f64) -> Self {
        FmtArg::F64(v)
    }
}

impl From<char> for FmtArg<'_> {
    fn from(v: char) -> Self {
        FmtArg::Char(v)
    }
}

impl<'a> From<&'a str> for FmtArg<'a> {
    fn from(v: &'a str) -> Self {
        FmtArg::Str(v)
    }
}

impl<'a> From<Option<&'a str>> for FmtArg<'a> {
    fn from(v: Option<&'a str>) -> Self {
        match v {
            Some(s) => FmtArg::Str(s),
            None => FmtArg::Null,
        }
    }
}

impl<'a> From<&'a [u8]> for FmtArg<'a> {
    fn from(v: &'a [u8]) -> Self {
        FmtArg::Bytes(v)
    }
}

/// Builds a `[FmtArg; N]` from mixed argument expressions.
///
/// ```
/// use jsonwalk::{args, printf};
/// let mut out = Vec::new();
/// printf(&mut out, "[%d, %Q, %B]", &args![1, "two", true]);
/// assert_eq!(out, b"[1, \"two\", true]");
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::FmtArg::from($arg)),*]
    };
}

/// Cursor over an argument slice.
///
/// `%M` emitters receive the cursor so they can consume arguments beyond
/// their own, the way a variadic formatter would share its argument list
/// with a callback.
pub struct Args<'a, 'b> {
    args: &'b [FmtArg<'a>],
    pos: usize,
}

impl<'a, 'b> Args<'a, 'b> {
    fn new(args: &'b [FmtArg<'a>]) -> Self {
        Self { args, pos: 0 }
    }

    /// Takes the next argument, if any.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'b FmtArg<'a>> {
        let slice: &'b [FmtArg<'a>] = self.args;
        let arg = slice.get(self.pos)?;
        self.pos += 1;
        Some(arg)
    }
}

/// Renders `fmt` with `args` into `out`.
///
/// Returns the number of bytes the rendering would occupy; a bounded sink
/// may store fewer.
pub fn printf(out: &mut dyn JsonOut, fmt: &str, args: &[FmtArg<'_>]) -> usize {
    let mut cursor = Args::new(args);
    vprintf(out, fmt, &mut cursor)
}

/// [`printf`] against an already-positioned argument cursor.
pub fn vprintf(out: &mut dyn JsonOut, fmt: &str, args: &mut Args<'_, '_>) -> usize {
    let bytes = fmt.as_bytes();
    let mut len = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if matches!(
            b,
            b':' | b',' | b' ' | b'\r' | b'\n' | b'\t' | b'[' | b']' | b'{' | b'}' | b'"'
        ) {
            len += out.put(&bytes[i..=i]);
            i += 1;
        } else if b == b'%' {
            i = placeholder(out, bytes, i, args, &mut len);
        } else if b == b'_' || is_alpha(b) {
            len += out.put(b"\"");
            while i < bytes.len() && (bytes[i] == b'_' || is_alpha(bytes[i]) || is_digit(bytes[i]))
            {
                len += out.put(&bytes[i..=i]);
                i += 1;
            }
            len += out.put(b"\"");
        } else {
            len += out.put(&bytes[i..=i]);
            i += 1;
        }
    }
    len
}

/// Dispatches one `%` placeholder starting at `fmt[at]`; returns the index
/// just past it.
fn placeholder(
    out: &mut dyn JsonOut,
    fmt: &[u8],
    at: usize,
    args: &mut Args<'_, '_>,
    len: &mut usize,
) -> usize {
    match fmt.get(at + 1).copied() {
        Some(b'%') => {
            *len += out.put(b"%");
            at + 2
        }
        Some(b'M') => {
            if let Some(FmtArg::Emit(f)) = args.next() {
                *len += f(out, args);
            }
            at + 2
        }
        Some(b'B') => {
            let text: &[u8] = match args.next() {
                Some(FmtArg::Bool(true)) => b"true",
                Some(FmtArg::I64(v)) if *v != 0 => b"true",
                Some(FmtArg::U64(v)) if *v != 0 => b"true",
                _ => b"false",
            };
            *len += out.put(text);
            at + 2
        }
        Some(b'H') => {
            if let Some(FmtArg::Bytes(p)) = args.next() {
                *len += out.put(b"\"");
                *len += out.put(hex::encode(p).as_bytes());
                *len += out.put(b"\"");
            }
            at + 2
        }
        Some(b'V') => {
            if let Some(FmtArg::Bytes(p)) = args.next() {
                *len += out.put(b"\"");
                *len += base64::encode(out, p);
                *len += out.put(b"\"");
            }
            at + 2
        }
        Some(b'Q') => {
            *len += quoted(out, args);
            at + 2
        }
        Some(b'.') if fmt.get(at + 2) == Some(&b'*') && fmt.get(at + 3) == Some(&b'Q') => {
            *len += quoted(out, args);
            at + 4
        }
        Some(_) => host_format(out, fmt, at, args, len),
        None => {
            *len += out.put(b"%");
            at + 1
        }
    }
}

fn quoted(out: &mut dyn JsonOut, args: &mut Args<'_, '_>) -> usize {
    match args.next() {
        Some(FmtArg::Str(s)) => {
            let mut len = out.put(b"\"");
            len += escape(out, s);
            len + out.put(b"\"")
        }
        _ => out.put(b"null"),
    }
}

/// Parses a full printf-style conversion specification (flags, width,
/// precision, length modifiers, conversion character) and renders it with
/// the host formatting machinery.
fn host_format(
    out: &mut dyn JsonOut,
    fmt: &[u8],
    at: usize,
    args: &mut Args<'_, '_>,
    len: &mut usize,
) -> usize {
    let mut i = at + 1;
    let mut minus = false;
    let mut zero = false;
    loop {
        match fmt.get(i).copied() {
            Some(b'-') => {
                minus = true;
                i += 1;
            }
            Some(b'0') => {
                zero = true;
                i += 1;
            }
            _ => break,
        }
    }
    let mut width: Option<usize> = None;
    if fmt.get(i) == Some(&b'*') {
        width = Some(star(args));
        i += 1;
    } else {
        while let Some(d) = fmt.get(i).copied().filter(u8::is_ascii_digit) {
            width = Some(width.unwrap_or(0) * 10 + usize::from(d - b'0'));
            i += 1;
        }
    }
    let mut precision: Option<usize> = None;
    if fmt.get(i) == Some(&b'.') {
        i += 1;
        if fmt.get(i) == Some(&b'*') {
            precision = Some(star(args));
            i += 1;
        } else {
            precision = Some(0);
            while let Some(d) = fmt.get(i).copied().filter(u8::is_ascii_digit) {
                precision = Some(precision.unwrap_or(0) * 10 + usize::from(d - b'0'));
                i += 1;
            }
        }
    }
    loop {
        match fmt.get(i).copied() {
            Some(b'h' | b'l' | b'z' | b't' | b'q' | b'L') => i += 1,
            Some(b'I') => {
                i += 1;
                while fmt.get(i).copied().is_some_and(|b| b.is_ascii_digit()) {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    let Some(conv) = fmt.get(i).copied() else {
        return i;
    };
    i += 1;

    let text = match conv {
        b'd' | b'i' => int_arg(args.next()).map(|v| v.to_string()),
        b'u' => uint_arg(args.next()).map(|v| v.to_string()),
        b'x' => uint_arg(args.next()).map(|v| format!("{v:x}")),
        b'X' => uint_arg(args.next()).map(|v| format!("{v:X}")),
        b'o' => uint_arg(args.next()).map(|v| format!("{v:o}")),
        b'f' | b'F' => {
            float_arg(args.next()).map(|v| format!("{:.*}", precision.unwrap_or(6), v))
        }
        b'e' => float_arg(args.next()).map(|v| match precision {
            Some(p) => format!("{:.1$e}", v, p),
            None => format!("{v:e}"),
        }),
        b'E' => float_arg(args.next()).map(|v| match precision {
            Some(p) => format!("{:.1$E}", v, p),
            None => format!("{v:E}"),
        }),
        b'g' | b'G' => float_arg(args.next()).map(|v| v.to_string()),
        b's' => match args.next() {
            Some(FmtArg::Str(s)) => {
                let mut s = *s;
                if let Some(p) = precision {
                    let mut n = p.min(s.len());
                    while n > 0 && !s.is_char_boundary(n) {
                        n -= 1;
                    }
                    s = &s[..n];
                }
                Some(s.to_string())
            }
            _ => None,
        },
        b'c' => match args.next() {
            Some(FmtArg::Char(c)) => Some(c.to_string()),
            Some(FmtArg::I64(v)) => {
                char::from_u32(u32::try_from(*v).unwrap_or(0)).map(|c| c.to_string())
            }
            _ => None,
        },
        b'n' => {
            if let Some(FmtArg::Len(cell)) = args.next() {
                cell.set(*len);
            }
            None
        }
        _ => None,
    };
    if let Some(t) = text {
        let padded = pad(t, width, minus, zero);
        *len += out.put(padded.as_bytes());
    }
    i
}

fn star(args: &mut Args<'_, '_>) -> usize {
    match args.next() {
        Some(FmtArg::I64(v)) => usize::try_from(*v).unwrap_or(0),
        Some(FmtArg::U64(v)) => usize::try_from(*v).unwrap_or(0),
        _ => 0,
    }
}

fn int_arg(a: Option<&FmtArg<'_>>) -> Option<i64> {
    match a? {
        FmtArg::I64(v) => Some(*v),
        #[allow(clippy::cast_possible_wrap)]
        FmtArg::U64(v) => Some(*v as i64),
        FmtArg::Bool(b) => Some(i64::from(*b)),
        #[allow(clippy::cast_possible_truncation)]
        FmtArg::F64(v) => Some(*v as i64),
        FmtArg::Char(c) => Some(i64::from(u32::from(*c))),
        _ => None,
    }
}

fn uint_arg(a: Option<&FmtArg<'_>>) -> Option<u64> {
    match a? {
        #[allow(clippy::cast_sign_loss)]
        FmtArg::I64(v) => Some(*v as u64),
        FmtArg::U64(v) => Some(*v),
        FmtArg::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

fn float_arg(a: Option<&FmtArg<'_>>) -> Option<f64> {
    match a? {
        FmtArg::F64(v) => Some(*v),
        #[allow(clippy::cast_precision_loss)]
        FmtArg::I64(v) => Some(*v as f64),
        #[allow(clippy::cast_precision_loss)]
        FmtArg::U64(v) => Some(*v as f64),
        _ => None,
    }
}

fn pad(s: String, width: Option<usize>, minus: bool, zero: bool) -> String {
    let Some(w) = width else { return s };
    if s.len() >= w {
        return s;
    }
    let fill = w - s.len();
    if minus {
        let mut s = s;
        s.push_str(&" ".repeat(fill));
        s
    } else if zero {
        // keep a leading sign ahead of the zeros
        let (sign, digits) = match s.strip_prefix('-') {
            Some(d) => ("-", d),
            None => ("", s.as_str()),
        };
        format!("{sign}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{s}", " ".repeat(fill))
    }
}

/// Emits a JSON array, rendering each element of `elems` with `elem_fmt`.
pub fn printf_array(out: &mut dyn JsonOut, elems: &[FmtArg<'_>], elem_fmt: &str) -> usize {
    let mut len = out.put(b"[");
    for (i, elem) in elems.iter().enumerate() {
        if i > 0 {
            len += out.put(b", ");
        }
        len += printf(out, elem_fmt, std::slice::from_ref(elem));
    }
    len + out.put(b"]")
}

/// Renders `fmt` into a freshly created file, appending a trailing
/// newline.
pub fn fprintf(path: impl AsRef<Path>, fmt: &str, args: &[FmtArg<'_>]) -> Result<usize, FileError> {
    let file = File::create(path)?;
    let mut out = FileOut::new(file);
    let n = printf(&mut out, fmt, args);
    out.put(b"\n");
    if out.failed() {
        return Err(FileError::Io(std::io::Error::other("write failed")));
    }
    Ok(n)
}
