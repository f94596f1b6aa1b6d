//! Token and event types delivered to [`walk`](crate::walk) callbacks.

/// Kind tag of a token produced by the walker.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A string value (or, suppressed in key position, an object key).
    Str,
    /// A number, including sign and exponent.
    Num,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// The literal `null`.
    Null,
    /// Start of an object; the token carries no text.
    ObjectStart,
    /// End of an object; the token spans the full `{...}` text.
    ObjectEnd,
    /// Start of an array; the token carries no text.
    ArrayStart,
    /// End of an array; the token spans the full `[...]` text.
    ArrayEnd,
}

impl TokenKind {
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Str | Self::Num | Self::True | Self::False | Self::Null
        )
    }

    #[must_use]
    pub fn is_container_start(self) -> bool {
        matches!(self, Self::ObjectStart | Self::ArrayStart)
    }

    #[must_use]
    pub fn is_container_end(self) -> bool {
        matches!(self, Self::ObjectEnd | Self::ArrayEnd)
    }
}

/// One element of the walker's output stream: a kind tag plus the span of
/// source text it covers.
///
/// The span borrows from the walked input and is never copied. String
/// tokens span the content between the quotes (escapes still encoded);
/// container end tokens span the whole container including delimiters;
/// container start tokens have no span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: Option<&'s str>,
}

impl<'s> Token<'s> {
    /// Byte offset of this token's span inside `doc`, the string that was
    /// walked. `None` for container start tokens or a foreign `doc`.
    #[must_use]
    pub fn offset_in(&self, doc: &str) -> Option<usize> {
        let text = self.text?;
        let base = doc.as_ptr() as usize;
        let p = text.as_ptr() as usize;
        if p < base || p > base + doc.len() {
            return None;
        }
        Some(p - base)
    }

    /// Boolean value, for `true`/`false` tokens.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            TokenKind::True => Some(true),
            TokenKind::False => Some(false),
            _ => None,
        }
    }
}

/// Callback payload: one token, the path it was found at, and the key of
/// the immediately containing object member.
///
/// `name` holds the raw key bytes (without quotes) when the token is the
/// value of an object member, including the start token of a container
/// value. It is `None` for array elements and for the root, and refers
/// only to the immediate key, never an ancestor's.
#[derive(Debug, Clone, Copy)]
pub struct Event<'s, 'p> {
    pub name: Option<&'s str>,
    pub path: &'p str,
    pub token: Token<'s>,
}
