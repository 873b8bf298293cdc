#![forbid(unsafe_code)]

//! Sequential reads of fixed-width values out of a byte buffer.
//!
//! There's no cursor *object*. Each function is a pure function of
//! `(bytes, offset)` and gives back the value along with the offset just past
//! it, so you thread the offset through your own code:
//!
//! ```
//! # use xng::cursor::*;
//! let bytes = [0, 0, 0, 4, b'T', b'E', b'S', b'T'];
//! let (len, next) = read_u32(&bytes, 0).unwrap();
//! let (tag, next) = read_tag(&bytes, next).unwrap();
//! assert_eq!((len, tag.to_string().as_str(), next), (4, "TEST", 8));
//! ```
//!
//! Multi-byte integers are read as big-endian, which is the byte order of the
//! chunk format, no matter what the host order is. Reading past the end of the
//! buffer is a [`XngError::TruncatedChunk`] and leaves nothing changed.

use bytemuck::{pod_read_unaligned, Pod};

use crate::{ChunkTypeTag, XngError, XngResult, I16BE, I32BE, U16BE, U32BE};

/// Gets `N` bytes at `offset`, or an error if the buffer is too short.
#[inline]
pub fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> XngResult<([u8; N], usize)> {
  let (head, next) = read_slice(bytes, offset, N)?;
  let mut a = [0_u8; N];
  a.copy_from_slice(head);
  Ok((a, next))
}

/// Borrows `len` bytes at `offset`, or an error if the buffer is too short.
#[inline]
pub fn read_slice(bytes: &[u8], offset: usize, len: usize) -> XngResult<(&[u8], usize)> {
  let available = bytes.len().saturating_sub(offset);
  if available < len {
    return Err(XngError::TruncatedChunk { offset, needed: len, available });
  }
  // `offset + len <= bytes.len()` here, so this can't overflow.
  let next = offset + len;
  Ok((&bytes[offset..next], next))
}

#[inline]
fn read_pod<T: Pod>(bytes: &[u8], offset: usize) -> XngResult<(T, usize)> {
  let (head, next) = read_slice(bytes, offset, core::mem::size_of::<T>())?;
  Ok((pod_read_unaligned(head), next))
}

/// Reads one byte.
#[inline]
pub fn read_u8(bytes: &[u8], offset: usize) -> XngResult<(u8, usize)> {
  read_pod::<u8>(bytes, offset)
}

/// Reads one byte as a signed value.
#[inline]
pub fn read_i8(bytes: &[u8], offset: usize) -> XngResult<(i8, usize)> {
  read_pod::<i8>(bytes, offset)
}

/// Reads a big-endian `u16`.
#[inline]
pub fn read_u16(bytes: &[u8], offset: usize) -> XngResult<(u16, usize)> {
  read_pod::<U16BE>(bytes, offset).map(|(v, next)| (v.to_u16(), next))
}

/// Reads a big-endian `i16`.
#[inline]
pub fn read_i16(bytes: &[u8], offset: usize) -> XngResult<(i16, usize)> {
  read_pod::<I16BE>(bytes, offset).map(|(v, next)| (v.to_i16(), next))
}

/// Reads a big-endian `u32`.
#[inline]
pub fn read_u32(bytes: &[u8], offset: usize) -> XngResult<(u32, usize)> {
  read_pod::<U32BE>(bytes, offset).map(|(v, next)| (v.to_u32(), next))
}

/// Reads a big-endian `i32`.
#[inline]
pub fn read_i32(bytes: &[u8], offset: usize) -> XngResult<(i32, usize)> {
  read_pod::<I32BE>(bytes, offset).map(|(v, next)| (v.to_i32(), next))
}

/// Reads a chunk type tag.
///
/// Tags are raw bytes, so no byte order conversion happens here.
#[inline]
pub fn read_tag(bytes: &[u8], offset: usize) -> XngResult<(ChunkTypeTag, usize)> {
  read_pod::<ChunkTypeTag>(bytes, offset)
}
