//! A small JSON toolkit built around a single streaming tokenizer.
//!
//! Four operations over in-memory JSON text share one path vocabulary:
//!
//! - [`walk`] tokenizes a document in a single pass and hands every token
//!   to a callback together with its dotted/bracketed path (`.user.id`,
//!   `.tags[2]`) and the key of the containing member.
//! - [`scanf`] extracts typed values by path, driven by a scanf-style
//!   format string (`{user: {id: %d}}`).
//! - [`printf`] renders JSON from a printf-style format string in which
//!   bare identifiers become quoted keys (`{id: %d, name: %Q}`).
//! - [`setf`] rewrites a document: the value at one path is inserted,
//!   replaced, or deleted, and missing containers along the path are
//!   synthesized.
//!
//! The dialect is lenient JSON: unquoted identifier object keys are
//! accepted. Tokens borrow from the caller's input and no value tree is
//! ever built. Keys containing `.` or `[` produce paths that lookups
//! cannot resolve; the walker inserts them verbatim and leaves the
//! ambiguity to the caller.
//!
//! # Examples
//!
//! ```
//! use jsonwalk::{args, printf, scanf, setf, ScanArg};
//!
//! let mut out = Vec::new();
//! printf(&mut out, "{a: %d, b: %Q}", &args![17, "hi"]);
//! let doc = String::from_utf8(out).unwrap();
//! assert_eq!(doc, r#"{"a": 17, "b": "hi"}"#);
//!
//! let (mut a, mut b) = (0i64, None);
//! let n = scanf(&doc, "{a: %d, b: %Q}", &mut [
//!     ScanArg::I64(&mut a),
//!     ScanArg::Str(&mut b),
//! ]);
//! assert_eq!((n, a, b.as_deref()), (2, 17, Some("hi")));
//!
//! let mut patched = Vec::new();
//! setf(&doc, &mut patched, ".a", Some(("%d", &args![18]))).unwrap();
//! assert_eq!(String::from_utf8(patched).unwrap(), r#"{"a": 18, "b": "hi"}"#);
//! ```

mod base64;
mod chars;
mod error;
mod escape;
mod fread;
mod next;
mod pretty;
mod printf;
mod scanf;
mod setf;
mod sink;
mod token;
mod walker;

pub use error::{FileError, JsonError};
pub use escape::{escape, unescape};
pub use fread::fread;
pub use next::{next_elem, next_key, NextEntry};
pub use pretty::{prettify, prettify_file};
pub use printf::{fprintf, printf, printf_array, vprintf, Args, FmtArg};
pub use scanf::{scanf, scanf_array_elem, ScanArg};
pub use setf::setf;
pub use sink::{FileOut, FixedBuf, JsonOut};
pub use token::{Event, Token, TokenKind};
pub use walker::{walk, walk_with_capacity, DEFAULT_PATH_CAPACITY};
