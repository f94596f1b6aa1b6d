//! Path-indexed document rewriting: insert, replace, or delete one value.
//!
//! One walk over the input computes the replacement window and the splice
//! point; a second pass re-emits the document with the window replaced by
//! freshly rendered JSON, synthesizing any missing containers along the
//! target path.
//!
//! # Examples
//!
//! ```
//! use jsonwalk::{args, setf};
//!
//! let mut out = Vec::new();
//! setf(r#"{"a":1}"#, &mut out, ".b[0]", Some(("%d", &args![2]))).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), r#"{"a":1,"b":[2]}"#);
//! ```

use crate::chars::is_space;
use crate::error::JsonError;
use crate::escape::escape;
use crate::printf::{printf, FmtArg};
use crate::sink::JsonOut;
use crate::token::Event;
use crate::walker::walk;

#[derive(Default)]
struct SetfState {
    /// Longest prefix of the target path seen on any visited token,
    /// clamped to whole segment boundaries.
    matched: usize,
    /// The replacement window, once located (exact match or splice pin).
    span: Option<(usize, usize)>,
    /// Where synthesis of missing path segments starts, as a byte offset
    /// into the target path.
    synth_from: usize,
    /// End offset of the most recent token before the window was fixed;
    /// afterwards, refined to just inside the tightest container opening
    /// before the window.
    prev: usize,
}

/// Length of the longest common prefix of `path` and `target` that ends on
/// a segment boundary of `target`.
fn matched_prefix(path: &str, target: &str) -> usize {
    let a = path.as_bytes();
    let b = target.as_bytes();
    let mut m = 0;
    while m < a.len() && m < b.len() && a[m] == b[m] {
        m += 1;
    }
    while m > 0 && m < b.len() && !matches!(b[m], b'.' | b'[') {
        m -= 1;
    }
    m
}

/// Is `container` a path ancestor of `target`?
fn is_ancestor(container: &str, target: &str) -> bool {
    container.len() < target.len()
        && target.starts_with(container)
        && matches!(target.as_bytes()[container.len()], b'.' | b'[')
}

fn setf_cb(st: &mut SetfState, doc: &str, json_path: &str, ev: &Event<'_, '_>) {
    let Some(text) = ev.token.text else {
        // container start tokens carry no position
        return;
    };
    let Some(off) = ev.token.offset_in(doc) else {
        return;
    };
    let tlen = text.len();

    let plen = matched_prefix(ev.path, json_path);
    if plen > st.matched {
        st.matched = plen;
    }

    // No exact match inside this container: pin the splice to its tail.
    // Ancestor ends fire deepest-first, so the first pin wins.
    if st.span.is_none()
        && ev.token.kind.is_container_end()
        && is_ancestor(ev.path, json_path)
    {
        if st.prev > off {
            st.span = Some((st.prev, st.prev));
        } else {
            // empty container: splice just inside the opening bracket
            st.span = Some((off + 1, off + 1));
            st.prev = off + 1;
        }
        st.synth_from = ev.path.len();
    }

    // Exact path match: the window is this token's span.
    if ev.path == json_path {
        st.span = Some((off, off + tlen));
        st.synth_from = json_path.len();
    }

    if st.span.is_none() {
        st.prev = off + tlen;
    } else if matches!(doc.as_bytes()[off], b'{' | b'[') {
        // a container that opens between the previous token and the window
        // start is the true splice neighbor (needed to delete the first
        // member of a container; `<=` so the head element of an array,
        // which starts right after the bracket, still qualifies)
        let inside = off + 1;
        let (pos, _) = st.span.unwrap_or((0, 0));
        if inside <= pos && inside > st.prev {
            st.prev = inside;
        }
    }
}

/// Emits the missing tail of the target path: `"key":` steps for object
/// segments, container openers for every nested step, and the rendered
/// value, followed by the matching closers.
fn emit_missing(
    out: &mut dyn JsonOut,
    src: &[u8],
    prev: usize,
    remainder: &str,
    render: impl FnOnce(&mut dyn JsonOut),
) {
    let b = remainder.as_bytes();
    let mut segs: Vec<Option<&str>> = Vec::new();
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'.' => {
                let start = i + 1;
                let mut end = start;
                while end < b.len() && !matches!(b[end], b'.' | b'[') {
                    end += 1;
                }
                segs.push(Some(&remainder[start..end]));
                i = end;
            }
            b'[' => {
                let mut end = i + 1;
                while end < b.len() && b[end] != b']' {
                    end += 1;
                }
                segs.push(None);
                i = (end + 1).min(b.len());
            }
            _ => break, // malformed path tail; emit what we have
        }
    }

    if !segs.is_empty() && prev > 0 && !matches!(src[prev - 1], b'{' | b'[') {
        out.put(b",");
    }
    let mut closers = Vec::new();
    for (n, seg) in segs.iter().enumerate() {
        match seg {
            Some(key) => {
                if n > 0 {
                    out.put(b"{");
                    closers.push(b'}');
                }
                out.put(b"\"");
                escape(out, key);
                out.put(b"\":");
            }
            None => {
                // array indices are never synthesized as text: the value
                // lands as the sole element, or is appended when the
                // array already exists
                if n > 0 {
                    out.put(b"[");
                    closers.push(b']');
                }
            }
        }
    }
    render(out);
    for c in closers.iter().rev() {
        out.put(&[*c]);
    }
}

/// Rewrites `input` into `out` with the value at `json_path` replaced by
/// the rendering of `value`, or deleted when `value` is `None`.
///
/// `json_path` uses the walker's path syntax (`.foo.bar`, `.a[0].b`).
/// Missing containers along the path are synthesized; a deletion of an
/// absent path re-emits the input unchanged.
///
/// Returns `true` iff a pre-existing span was replaced or deleted; an
/// insertion that only adds text returns `false` even though the document
/// changed.
pub fn setf(
    input: &str,
    out: &mut dyn JsonOut,
    json_path: &str,
    value: Option<(&str, &[FmtArg<'_>])>,
) -> Result<bool, JsonError> {
    let mut st = SetfState::default();
    walk(input, |ev| setf_cb(&mut st, input, json_path, &ev))?;
    let src = input.as_bytes();
    let changed = st.span.is_some_and(|(pos, end)| end > pos);

    match value {
        None => {
            let mut end = st.span.map_or(input.len(), |(_, end)| end);
            out.put(&src[..st.prev]);
            if st.prev > 0 && matches!(src[st.prev - 1], b'{' | b'[') {
                // the window began at the head of a container: consume one
                // trailing comma so the document stays well-formed
                let mut i = end;
                while i < src.len() && is_space(src[i]) {
                    i += 1;
                }
                if src.get(i) == Some(&b',') {
                    end = i + 1;
                }
            }
            out.put(&src[end..]);
        }
        Some((fmt, args)) => {
            let (pos, end) = st.span.unwrap_or((0, input.len()));
            let synth_from = if st.span.is_some() {
                st.synth_from
            } else {
                st.matched
            };
            out.put(&src[..pos]);
            let remainder = &json_path[synth_from.min(json_path.len())..];
            emit_missing(out, src, st.prev, remainder, |o| {
                printf(o, fmt, args);
            });
            out.put(&src[end..]);
        }
    }
    Ok(changed)
}
