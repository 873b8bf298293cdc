use thiserror::Error;

use crate::ChunkTypeTag;

/// Shorthand for results from this crate.
pub type XngResult<T> = Result<T, XngError>;

/// An error from the `xng` crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XngError {
  /// A chunk header or payload runs past the end of the buffer.
  ///
  /// `offset` is where the failed read started, `needed` is how many bytes
  /// that read wanted, and `available` is how many were actually left.
  #[error("truncated chunk at offset {offset}: needed {needed} bytes, {available} available")]
  TruncatedChunk {
    /// Offset of the read that failed.
    offset: usize,
    /// Bytes the read required.
    needed: usize,
    /// Bytes remaining from `offset`.
    available: usize,
  },

  /// The CRC stored in a chunk doesn't match the CRC of its tag and payload.
  ///
  /// This is never produced by parsing. You only get it from
  /// [`verify_all`](crate::verify_all), when you asked for a mismatch to be
  /// an error.
  #[error("crc mismatch in chunk {index} ({tag}): declared {declared:#010x}, computed {computed:#010x}")]
  CrcMismatch {
    /// Position of the chunk within its sequence.
    index: usize,
    /// Tag of the chunk.
    tag: ChunkTypeTag,
    /// CRC stored in the file.
    declared: u32,
    /// CRC computed over the tag and payload.
    computed: u32,
  },

  /// No handler matched the tag, and the registry was set to reject those.
  #[error("unrecognized chunk type {0}")]
  UnrecognizedChunkType(ChunkTypeTag),

  /// A handler reported a non-zero status.
  #[error("handler for {tag} failed with status {code}")]
  HandlerFailure {
    /// Tag of the chunk being handled.
    tag: ChunkTypeTag,
    /// The status the handler returned.
    code: i32,
  },

  /// The leading bytes aren't a PNG, MNG, or JNG signature.
  #[error("data does not start with a PNG, MNG, or JNG signature")]
  BadSignature,
}
impl XngError {
  /// Integer status for this error, for callers that speak status codes.
  ///
  /// Handler failures give back the handler's own code, everything else gets a
  /// fixed negative value. Zero is never returned.
  #[inline]
  #[must_use]
  pub const fn status(&self) -> i32 {
    match self {
      Self::HandlerFailure { code, .. } => *code,
      Self::TruncatedChunk { .. } => -1,
      Self::CrcMismatch { .. } => -2,
      Self::UnrecognizedChunkType(_) => -3,
      Self::BadSignature => -4,
    }
  }
}

/// The failure half of a [`HandlerResult`](crate::HandlerResult).
///
/// Holds the non-zero status code of a failed handler. A code of zero means
/// success in the status-code world, so [`HandlerFailure::new`] maps it to
/// `-1` rather than letting a "failure" look like a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerFailure(i32);
impl HandlerFailure {
  /// Makes a failure with the given status code.
  #[inline]
  #[must_use]
  pub const fn new(code: i32) -> Self {
    Self(if code == 0 { -1 } else { code })
  }
  /// The status code.
  #[inline]
  #[must_use]
  pub const fn code(self) -> i32 {
    self.0
  }
}
impl From<i32> for HandlerFailure {
  #[inline]
  fn from(code: i32) -> Self {
    Self::new(code)
  }
}

#[test]
fn test_status_never_zero() {
  let tag = ChunkTypeTag(*b"IDAT");
  assert_eq!(XngError::HandlerFailure { tag, code: 5 }.status(), 5);
  assert_ne!(XngError::UnrecognizedChunkType(tag).status(), 0);
  assert_ne!(XngError::BadSignature.status(), 0);
  assert_eq!(HandlerFailure::new(0).code(), -1);
  assert_eq!(HandlerFailure::from(7).code(), 7);
}
