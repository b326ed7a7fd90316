//! Little-endian field readers and writers over a record's bytes.

use alloc::vec::Vec;

use thiserror::Error;

/// The record ended part way through a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unexpectedly reached the end of the record.")]
pub struct EndOfRecord;

/// A read position over a borrowed byte slice.
///
/// Every read advances the position by the width of the value read. A read
/// that would run past the end of the slice fails without advancing.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    r: &'a [u8],
    i: usize,
}

macro_rules! read_le {
    ($name:ident, $t:ty) => {
        #[doc = concat!("Read a little-endian `", stringify!($t), "`.")]
        pub fn $name(&mut self) -> Result<$t, EndOfRecord> {
            Ok(<$t>::from_le_bytes(self.take()?))
        }
    };
}

impl<'a> Cursor<'a> {
    pub fn new(r: &'a [u8]) -> Self {
        Self { r, i: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.i
    }

    pub fn remaining(&self) -> usize {
        self.r.len().saturating_sub(self.i)
    }

    /// Advance past `n` bytes without reading them.
    pub fn skip(&mut self, n: usize) -> Result<(), EndOfRecord> {
        if self.remaining() < n {
            Err(EndOfRecord)?;
        }

        self.i += n;
        Ok(())
    }

    /// Take an exact number of bytes, advancing the position.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N], EndOfRecord> {
        let bytes = self
            .r
            .get(self.i..self.i + N)
            .and_then(|s| <[u8; N]>::try_from(s).ok())
            .ok_or(EndOfRecord)?;

        self.i += N;
        Ok(bytes)
    }

    read_le!(u8, u8);
    read_le!(i8, i8);
    read_le!(u16, u16);
    read_le!(i16, i16);
    read_le!(u32, u32);
    read_le!(i32, i32);
}

/// An append-only little-endian writer, the inverse of [`Cursor`].
#[derive(Debug, Default)]
pub struct Writer {
    w: Vec<u8>,
}

macro_rules! write_le {
    ($name:ident, $t:ty) => {
        #[doc = concat!("Write a little-endian `", stringify!($t), "`.")]
        pub fn $name(&mut self, value: $t) {
            self.w.extend_from_slice(&value.to_le_bytes());
        }
    };
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            w: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.w
    }

    pub fn put(&mut self, bytes: &[u8]) {
        self.w.extend_from_slice(bytes);
    }

    write_le!(u8, u8);
    write_le!(i8, i8);
    write_le!(u16, u16);
    write_le!(i16, i16);
    write_le!(u32, u32);
    write_le!(i32, i32);

    /// Overwrite bytes already written at an offset.
    ///
    /// Panics if the range was not yet written.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self.w[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.w
    }
}
