//! Polymorphic byte sinks used by the emitters.

use std::io::Write;

/// A write-only output abstraction.
///
/// `put` reports the length of `bytes` (not the number of bytes actually
/// stored), so a caller can run a probing pass against a too-small buffer
/// and learn the required size.
pub trait JsonOut {
    fn put(&mut self, bytes: &[u8]) -> usize;
}

/// Bounded in-memory sink with a NUL-terminated tail.
///
/// After every `put`, `buf[min(len, capacity - 1)] == 0`; input beyond the
/// capacity is dropped.
pub struct FixedBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> FixedBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        let mut out = Self { buf, len: 0 };
        out.terminate();
        out
    }

    /// Number of bytes stored.
    #[must_use]
    pub fn written(&self) -> usize {
        self.len
    }

    /// Stored content, viewed the way C string consumers would see it
    /// (capped one short of capacity by the NUL tail).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let n = self.len.min(self.buf.len().saturating_sub(1));
        &self.buf[..n]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    fn terminate(&mut self) {
        if !self.buf.is_empty() {
            let idx = self.len.min(self.buf.len() - 1);
            self.buf[idx] = 0;
        }
    }
}

impl JsonOut for FixedBuf<'_> {
    fn put(&mut self, bytes: &[u8]) -> usize {
        let avail = self.buf.len() - self.len;
        let n = bytes.len().min(avail);
        self.buf[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        self.terminate();
        bytes.len()
    }
}

/// Stream sink wrapping any [`io::Write`](std::io::Write).
///
/// An I/O failure latches: subsequent `put` calls report zero and the
/// file helpers surface the error.
pub struct FileOut<W: Write> {
    inner: W,
    failed: bool,
}

impl<W: Write> FileOut<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            failed: false,
        }
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> JsonOut for FileOut<W> {
    fn put(&mut self, bytes: &[u8]) -> usize {
        if self.failed {
            return 0;
        }
        match self.inner.write_all(bytes) {
            Ok(()) => bytes.len(),
            Err(_) => {
                self.failed = true;
                0
            }
        }
    }
}

/// The natural unbounded in-memory sink.
impl JsonOut for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) -> usize {
        self.extend_from_slice(bytes);
        bytes.len()
    }
}
