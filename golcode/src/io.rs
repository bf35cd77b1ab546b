//! Byte sinks and sources the codecs read from and write to.
//!
//! Every serializer owns a [`ByteSink`] and every deserializer owns a
//! [`ByteSource`]. Both ports move a single byte at a time, which is the
//! granularity the bit-packed codec needs; the defaulted slice methods exist
//! so bulk-capable codecs can move contiguous ranges without a per-byte loop.
use {
    crate::error::{unexpected_end_of_stream, ReadResult, WriteResult},
    std::io::{Read, Write},
};

/// Destination for encoded bytes.
pub trait ByteSink {
    /// Accept one byte.
    fn put(&mut self, byte: u8) -> WriteResult<()>;

    /// Accept a contiguous run of bytes.
    fn put_slice(&mut self, bytes: &[u8]) -> WriteResult<()> {
        for &byte in bytes {
            self.put(byte)?;
        }
        Ok(())
    }
}

/// Origin of encoded bytes.
pub trait ByteSource {
    /// Yield the next byte, or `None` once the stream is exhausted.
    fn pull(&mut self) -> ReadResult<Option<u8>>;

    /// Fill `buf` completely, erroring if the stream ends early.
    fn pull_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        for slot in buf {
            *slot = self.pull()?.ok_or_else(unexpected_end_of_stream)?;
        }
        Ok(())
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    #[inline]
    fn put(&mut self, byte: u8) -> WriteResult<()> {
        (**self).put(byte)
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> WriteResult<()> {
        (**self).put_slice(bytes)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    #[inline]
    fn pull(&mut self) -> ReadResult<Option<u8>> {
        (**self).pull()
    }

    #[inline]
    fn pull_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        (**self).pull_exact(buf)
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn put(&mut self, byte: u8) -> WriteResult<()> {
        self.push(byte);
        Ok(())
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> WriteResult<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Reading from a slice consumes it from the front.
impl ByteSource for &[u8] {
    #[inline]
    fn pull(&mut self) -> ReadResult<Option<u8>> {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    #[inline]
    fn pull_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        let Some((head, rest)) = self.split_at_checked(buf.len()) else {
            return Err(unexpected_end_of_stream());
        };
        buf.copy_from_slice(head);
        *self = rest;
        Ok(())
    }
}

/// A repositionable [`ByteSource`] over a borrowed buffer.
///
/// Unlike the plain `&[u8]` source, a `Cursor` can be rewound, which is what
/// callers need to re-attempt a decode after a failure left the position
/// undefined.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute offset.
    pub const fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }
}

impl ByteSource for Cursor<'_> {
    #[inline]
    fn pull(&mut self) -> ReadResult<Option<u8>> {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    #[inline]
    fn pull_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        let end = self
            .pos
            .checked_add(buf.len())
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(unexpected_end_of_stream)?;
        buf.copy_from_slice(&self.bytes[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// Adapter exposing any [`std::io::Write`] as a [`ByteSink`].
pub struct IoWriter<W: Write> {
    inner: W,
}

impl<W: Write> IoWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for IoWriter<W> {
    #[inline]
    fn put(&mut self, byte: u8) -> WriteResult<()> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> WriteResult<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }
}

/// Adapter exposing any [`std::io::Read`] as a [`ByteSource`].
pub struct IoReader<R: Read> {
    inner: R,
}

impl<R: Read> IoReader<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoReader<R> {
    #[inline]
    fn pull(&mut self) -> ReadResult<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    #[inline]
    fn pull_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(unexpected_end_of_stream())
            }
            Err(e) => Err(e.into()),
        }
    }
}
