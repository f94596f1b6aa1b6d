//! Stepwise iteration over the direct children of a container.
//!
//! Each call re-walks the full document and returns the first direct
//! child whose token starts after the supplied cursor. That is O(N) per
//! step by design; the interface's value is simplicity, not speed.

use crate::token::Token;
use crate::walker::walk;

/// One direct child produced by [`next_key`] or [`next_elem`].
#[derive(Debug, Clone, Copy)]
pub struct NextEntry<'s> {
    /// Resume cursor: pass to the next call to advance the iteration.
    pub handle: usize,
    /// Member key, for children of an object.
    pub key: Option<&'s str>,
    /// Element index, for children of an array.
    pub idx: Option<usize>,
    /// The child's value token; containers are reported as their end
    /// token, spanning the full text.
    pub token: Token<'s>,
}

fn next_child<'s>(input: &'s str, handle: Option<usize>, path: &str) -> Option<NextEntry<'s>> {
    let mut pending_key: Option<&'s str> = None;
    let mut pending_idx: Option<usize> = None;
    let mut found: Option<NextEntry<'s>> = None;
    let _ = walk(input, |ev| {
        if found.is_some() {
            return;
        }
        if ev.path.len() <= path.len() || !ev.path.starts_with(path) {
            return;
        }
        let rest = &ev.path[path.len()..];
        if rest.as_bytes()[1..]
            .iter()
            .any(|&b| b == b'.' || b == b'[')
        {
            return; // grandchild or deeper
        }
        let idx = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .and_then(|d| d.parse().ok());
        if ev.token.kind.is_container_start() {
            // the key is only visible here; the end token arrives after
            // the container body has cleared it
            pending_key = ev.name;
            pending_idx = idx;
            return;
        }
        let Some(off) = ev.token.offset_in(input) else {
            return;
        };
        if handle.map_or(true, |h| h < off) {
            let (key, idx) = if ev.token.kind.is_container_end() {
                (pending_key, pending_idx)
            } else {
                (ev.name, idx)
            };
            found = Some(NextEntry {
                handle: off,
                key,
                idx,
                token: ev.token,
            });
        }
    });
    found
}

/// Returns the first member of the object at `path` whose value token
/// starts after `handle` (`None` starts the iteration), or `None` when
/// the container is exhausted.
pub fn next_key<'s>(input: &'s str, handle: Option<usize>, path: &str) -> Option<NextEntry<'s>> {
    next_child(input, handle, path)
}

/// Array counterpart of [`next_key`]: iterates the elements of the array
/// at `path`, reporting their indices.
pub fn next_elem<'s>(input: &'s str, handle: Option<usize>, path: &str) -> Option<NextEntry<'s>> {
    next_child(input, handle, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn iterates_object_members() {
        let doc = r#"{"a":1,"sub":{"x":true},"b":[2,3]}"#;
        let mut handle = None;
        let mut seen = Vec::new();
        while let Some(entry) = next_key(doc, handle, "") {
            seen.push((
                entry.key.unwrap().to_string(),
                entry.token.kind,
                entry.token.text.unwrap().to_string(),
            ));
            handle = Some(entry.handle);
        }
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), TokenKind::Num, "1".to_string()),
                (
                    "sub".to_string(),
                    TokenKind::ObjectEnd,
                    r#"{"x":true}"#.to_string()
                ),
                ("b".to_string(), TokenKind::ArrayEnd, "[2,3]".to_string()),
            ]
        );
    }

    #[test]
    fn iterates_array_elements_with_indices() {
        let doc = r#"{"list":[10,{"k":1},30]}"#;
        let mut handle = None;
        let mut seen = Vec::new();
        while let Some(entry) = next_elem(doc, handle, ".list") {
            seen.push((entry.idx.unwrap(), entry.token.kind));
            handle = Some(entry.handle);
        }
        assert_eq!(
            seen,
            vec![
                (0, TokenKind::Num),
                (1, TokenKind::ObjectEnd),
                (2, TokenKind::Num),
            ]
        );
    }

    #[test]
    fn exhausted_container_returns_none() {
        assert!(next_key("{}", None, "").is_none());
        assert!(next_elem(r#"{"a":[]}"#, None, ".a").is_none());
    }

    #[test]
    fn skips_grandchildren() {
        let doc = r#"{"sub":{"deep":{"deeper":1}}}"#;
        let first = next_key(doc, None, "").unwrap();
        assert_eq!(first.key, Some("sub"));
        assert!(next_key(doc, Some(first.handle), "").is_none());
    }
}
