//! Reading chunks out of a byte buffer.
//!
//! A chunk on disk is:
//!
//! | offset  | size | field |
//! |:-------:|:----:|:------|
//! | 0       | 4    | payload length `L`, big-endian |
//! | 4       | 4    | type tag |
//! | 8       | `L`  | payload |
//! | 8 + `L` | 4    | CRC of tag and payload, big-endian |
//!
//! A container is just chunks back to back, with no outer length. The chunk
//! stream ends when the buffer runs out, or when a chunk with an all-zero tag
//! shows up. Anything after an all-zero tag is ignored, since some encoders
//! leave padding at the end of the file.
//!
//! All the readers here expect the bytes *after* the 8-byte file signature.
//! See [`strip_signature`](crate::strip_signature).

use super::*;
use crate::cursor::{read_slice, read_tag, read_u32};

/// Reads the length and tag of the chunk at `offset`.
#[inline]
fn read_header(bytes: &[u8], offset: usize) -> XngResult<(u32, ChunkTypeTag, usize)> {
  let available = bytes.len().saturating_sub(offset);
  if available < CHUNK_HEADER_SIZE {
    return Err(XngError::TruncatedChunk { offset, needed: CHUNK_HEADER_SIZE, available });
  }
  let (length, next) = read_u32(bytes, offset)?;
  let (tag, next) = read_tag(bytes, next)?;
  Ok((length, tag, next))
}

/// Reads the payload and CRC that follow a header.
#[inline]
fn read_body(
  bytes: &[u8], tag: ChunkTypeTag, length: u32, offset: usize,
) -> XngResult<(ChunkView<'_>, usize)> {
  let (data, next) = read_slice(bytes, offset, length as usize)?;
  let (declared_crc, next) = read_u32(bytes, next)?;
  Ok((ChunkView { tag, data, declared_crc }, next))
}

/// The size of the length and tag fields.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// The size of a chunk with an empty payload.
pub const CHUNK_MIN_SIZE: usize = CHUNK_HEADER_SIZE + 4;

/// Reads one chunk at `offset` without copying the payload.
///
/// Gives the chunk and the offset just past its CRC. Zero-tag chunks are
/// returned like any other chunk, the caller decides what they mean.
///
/// ## Failure
/// * [`XngError::TruncatedChunk`] if the header, the declared payload, or the
///   CRC run past the end of `bytes`.
#[inline]
pub fn read_chunk_view(bytes: &[u8], offset: usize) -> XngResult<(ChunkView<'_>, usize)> {
  let (length, tag, next) = read_header(bytes, offset)?;
  read_body(bytes, tag, length, next)
}

/// Reads one chunk at `offset`, copying the payload out.
///
/// ## Failure
/// * [`XngError::TruncatedChunk`] if the header, the declared payload, or the
///   CRC run past the end of `bytes`.
#[cfg(feature = "alloc")]
#[inline]
pub fn read_chunk(bytes: &[u8], offset: usize) -> XngResult<(Chunk, usize)> {
  read_chunk_view(bytes, offset).map(|(view, next)| (view.to_chunk(), next))
}

/// An iterator over the borrowed chunks of a buffer.
///
/// * Produces `Ok` for each chunk, in file order.
/// * Stops when the buffer is used up or at a chunk with an all-zero tag.
/// * If a chunk is truncated it produces that one `Err` and then stops.
#[derive(Debug, Clone)]
pub struct ChunkViewIter<'b> {
  bytes: &'b [u8],
  offset: usize,
  done: bool,
}
impl<'b> ChunkViewIter<'b> {
  /// Iterates `bytes`, which should already have had the signature removed.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, offset: 0, done: false }
  }
  /// Where the next chunk will be read from.
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }
}
impl<'b> Iterator for ChunkViewIter<'b> {
  type Item = XngResult<ChunkView<'b>>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.done || self.offset >= self.bytes.len() {
      return None;
    }
    let offset = self.offset;
    let step = read_header(self.bytes, offset).and_then(|(length, tag, next)| {
      if tag.is_zero() {
        Ok(None)
      } else {
        read_body(self.bytes, tag, length, next).map(Some)
      }
    });
    match step {
      Ok(Some((view, next))) => {
        log::trace!("chunk {} at offset {offset}: {} bytes", view.tag, view.len());
        self.offset = next;
        Some(Ok(view))
      }
      Ok(None) => {
        log::debug!(
          "zero tag at offset {offset}, ignoring {} trailing bytes",
          self.bytes.len() - offset
        );
        self.done = true;
        None
      }
      Err(e) => {
        log::debug!("stopped reading chunks: {e}");
        self.done = true;
        Some(Err(e))
      }
    }
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    if self.done {
      (0, Some(0))
    } else {
      // the next header might carry the zero tag, so no chunk is promised
      let remaining = self.bytes.len().saturating_sub(self.offset);
      (0, Some(remaining / CHUNK_MIN_SIZE + 1))
    }
  }
}
impl core::iter::FusedIterator for ChunkViewIter<'_> {}

/// Walks every chunk of `bytes` without copying, calling `f` on each.
///
/// Gives the number of chunks visited.
///
/// ## Failure
/// * [`XngError::TruncatedChunk`] if the data runs out mid-chunk. `f` will
///   have seen every chunk before that point.
/// * [`XngError::HandlerFailure`] as soon as `f` fails, no later chunks are
///   visited.
pub fn iterate_chunks<'b, F>(bytes: &'b [u8], mut f: F) -> XngResult<usize>
where
  F: FnMut(&ChunkView<'b>) -> HandlerResult,
{
  let mut count = 0;
  for view in ChunkViewIter::new(bytes) {
    let view = view?;
    count += 1;
    f(&view).map_err(|e| XngError::HandlerFailure { tag: view.tag, code: e.code() })?;
  }
  Ok(count)
}

/// Reads chunks from `bytes`, appending them onto `chunks`.
///
/// Gives the number of chunks appended. On an error, every chunk read before
/// the problem is still in `chunks`.
///
/// ## Failure
/// * [`XngError::TruncatedChunk`] if the data runs out mid-chunk.
#[cfg(feature = "alloc")]
pub fn read_chunks_into(bytes: &[u8], chunks: &mut Vec<Chunk>) -> XngResult<usize> {
  let start = chunks.len();
  chunks.reserve(bytes.len() / CHUNK_MIN_SIZE);
  for view in ChunkViewIter::new(bytes) {
    chunks.push(view?.to_chunk());
  }
  Ok(chunks.len() - start)
}

/// Reads all the chunks of `bytes` into a new sequence.
///
/// ## Failure
/// * [`XngError::TruncatedChunk`] if the data runs out mid-chunk. Use
///   [`read_chunks_into`] if you want the chunks before that point.
#[cfg(feature = "alloc")]
pub fn read_all_chunks(bytes: &[u8]) -> XngResult<ChunkSequence> {
  let mut chunks = Vec::new();
  read_chunks_into(bytes, &mut chunks)?;
  Ok(chunks)
}

#[test]
fn test_size_hint_lower_bound_holds_for_zero_tags() {
  let terminator = [0_u8; 12];
  let it = ChunkViewIter::new(&terminator);
  assert!(it.size_hint().0 <= it.count());
  assert_eq!(ChunkViewIter::new(&terminator).count(), 0);

  // one IEND, then a zero tag record as padding
  let mut bytes = [0_u8; 24];
  bytes[4..8].copy_from_slice(b"IEND");
  bytes[8..12].copy_from_slice(&0xAE42_6082_u32.to_be_bytes());
  let mut it = ChunkViewIter::new(&bytes);
  let (lower, upper) = it.size_hint();
  assert!(lower <= 1 && upper >= Some(1));
  assert_eq!(it.next().map(|r| r.map(|v| v.tag())), Some(Ok(ChunkTypeTag::IEND)));
  let (lower, _) = it.size_hint();
  assert!(lower <= it.count());
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
  use super::*;
  use alloc::vec::Vec;

  fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&chunk_crc(ChunkTypeTag(*tag), data).to_be_bytes());
  }

  #[test]
  fn test_read_chunk_view_walks_the_concatenation() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"IHDR", &[7; 13]);
    push_chunk(&mut bytes, b"IDAT", &[]);
    push_chunk(&mut bytes, b"IEND", &[]);
    let (a, next) = read_chunk_view(&bytes, 0).unwrap();
    assert_eq!((a.tag(), a.len(), next), (ChunkTypeTag::IHDR, 13, 25));
    let (b, next) = read_chunk_view(&bytes, next).unwrap();
    assert_eq!((b.tag(), b.len(), next), (ChunkTypeTag::IDAT, 0, 37));
    let (c, next) = read_chunk_view(&bytes, next).unwrap();
    assert_eq!((c.tag(), next), (ChunkTypeTag::IEND, bytes.len()));
    assert!(check_view(&a) && check_view(&b) && check_view(&c));
  }

  #[test]
  fn test_oversized_length_is_truncation() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"IDAT", &[1, 2, 3]);
    bytes[3] = 200;
    assert_eq!(
      read_chunk_view(&bytes, 0),
      Err(XngError::TruncatedChunk { offset: 8, needed: 200, available: 7 })
    );
    // the same read again gives the same answer
    assert_eq!(read_chunk_view(&bytes, 0), read_chunk_view(&bytes, 0));
    // missing crc
    bytes[3] = 3;
    bytes.truncate(bytes.len() - 1);
    assert!(matches!(
      read_chunk_view(&bytes, 0),
      Err(XngError::TruncatedChunk { offset: 11, needed: 4, available: 3 })
    ));
  }

  #[test]
  fn test_iter_stops_at_zero_tag_and_ignores_padding() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"IEND", &[]);
    bytes.extend_from_slice(&[0; 8]);
    bytes.extend_from_slice(b"junk");
    let tags: Vec<_> = ChunkViewIter::new(&bytes).map(|r| r.unwrap().tag()).collect();
    assert_eq!(tags, [ChunkTypeTag::IEND]);
  }

  #[test]
  fn test_iter_fuses_after_error() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"IHDR", &[0; 13]);
    bytes.extend_from_slice(&[0, 0, 0]);
    let mut it = ChunkViewIter::new(&bytes);
    assert!(it.next().unwrap().is_ok());
    assert_eq!(
      it.next(),
      Some(Err(XngError::TruncatedChunk { offset: 25, needed: 8, available: 3 }))
    );
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
  }

  #[test]
  fn test_iterate_chunks_counts_and_aborts() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"IHDR", &[0; 13]);
    push_chunk(&mut bytes, b"IDAT", &[1, 2]);
    push_chunk(&mut bytes, b"IEND", &[]);
    let mut seen = Vec::new();
    assert_eq!(iterate_chunks(&bytes, |v| Ok(seen.push(v.tag()))), Ok(3));
    assert_eq!(seen, [ChunkTypeTag::IHDR, ChunkTypeTag::IDAT, ChunkTypeTag::IEND]);

    let mut calls = 0;
    let out = iterate_chunks(&bytes, |v| {
      calls += 1;
      if v.tag() == ChunkTypeTag::IDAT {
        Err(HandlerFailure::new(9))
      } else {
        Ok(())
      }
    });
    assert_eq!(out, Err(XngError::HandlerFailure { tag: ChunkTypeTag::IDAT, code: 9 }));
    assert_eq!(calls, 2);
  }

  #[test]
  fn test_read_chunks_into_keeps_the_prefix() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"IHDR", &[0; 13]);
    push_chunk(&mut bytes, b"IDAT", &[5; 40]);
    bytes.truncate(bytes.len() - 10);
    let mut chunks = Vec::new();
    let err = read_chunks_into(&bytes, &mut chunks).unwrap_err();
    assert!(matches!(err, XngError::TruncatedChunk { .. }));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].tag(), ChunkTypeTag::IHDR);
    assert!(read_all_chunks(&bytes).is_err());
  }

  #[test]
  fn test_owned_chunks_outlive_the_buffer() {
    let mut bytes = Vec::new();
    push_chunk(&mut bytes, b"tEXt", b"Title\0xng");
    let (chunk, _) = read_chunk(&bytes, 0).unwrap();
    bytes.fill(0);
    drop(bytes);
    assert_eq!(chunk.data(), b"Title\0xng");
    assert!(check_chunk(&chunk));
  }
}
