use super::*;

/// A chunk borrowed out of a byte buffer.
///
/// This is the zero-copy form of a chunk: the payload is a slice of the buffer
/// that was parsed, so the view can't outlive that buffer. Use
/// [`to_chunk`](Self::to_chunk) when you need to keep the data around.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkView<'b> {
  pub(crate) tag: ChunkTypeTag,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl<'b> ChunkView<'b> {
  /// Assembles a view from its parts.
  ///
  /// The length of the view is always `data.len()`.
  ///
  /// ## Panics
  /// * If `data` is longer than `u32::MAX` bytes, since a chunk header can't
  ///   declare that length.
  #[inline]
  #[must_use]
  pub const fn new(tag: ChunkTypeTag, data: &'b [u8], declared_crc: u32) -> Self {
    assert!(data.len() <= u32::MAX as usize, "chunk payload longer than u32::MAX");
    Self { tag, data, declared_crc }
  }
  /// The chunk's type tag.
  #[inline]
  #[must_use]
  pub const fn tag(&self) -> ChunkTypeTag {
    self.tag
  }
  /// The payload length, as declared in the chunk header.
  #[inline]
  #[must_use]
  pub const fn len(&self) -> u32 {
    // parsed payloads come from a `u32` length and `new` checks the rest.
    self.data.len() as u32
  }
  /// If the payload is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
  /// The payload bytes.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  /// The CRC stored after the payload.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// Copies the payload into an owned [`Chunk`].
  #[cfg(feature = "alloc")]
  #[inline]
  #[must_use]
  pub fn to_chunk(&self) -> Chunk {
    Chunk { tag: self.tag, data: self.data.to_vec(), declared_crc: self.declared_crc }
  }
}
impl core::fmt::Debug for ChunkView<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ChunkView")
      .field("tag", &self.tag)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// A chunk that owns its payload.
///
/// Once read, a `Chunk` has no connection to the buffer it came from.
#[cfg(feature = "alloc")]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
  pub(crate) tag: ChunkTypeTag,
  pub(crate) data: Vec<u8>,
  pub(crate) declared_crc: u32,
}
#[cfg(feature = "alloc")]
impl Chunk {
  /// Assembles a chunk from its parts.
  ///
  /// To make a chunk whose CRC is correct, pass in
  /// [`chunk_crc`](crate::chunk_crc)`(tag, &data)`.
  ///
  /// ## Panics
  /// * If `data` is longer than `u32::MAX` bytes.
  #[inline]
  #[must_use]
  pub fn new(tag: ChunkTypeTag, data: Vec<u8>, declared_crc: u32) -> Self {
    assert!(u32::try_from(data.len()).is_ok(), "chunk payload longer than u32::MAX");
    Self { tag, data, declared_crc }
  }
  /// The chunk's type tag.
  #[inline]
  #[must_use]
  pub const fn tag(&self) -> ChunkTypeTag {
    self.tag
  }
  /// The payload length.
  #[inline]
  #[must_use]
  pub fn len(&self) -> u32 {
    // the payload never changes after `new` checked it
    self.data.len() as u32
  }
  /// If the payload is empty.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
  /// The payload bytes.
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }
  /// The CRC that was stored in the file.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// Borrows this chunk as a [`ChunkView`].
  #[inline]
  #[must_use]
  pub fn view(&self) -> ChunkView<'_> {
    ChunkView { tag: self.tag, data: &self.data, declared_crc: self.declared_crc }
  }
}
#[cfg(feature = "alloc")]
impl core::fmt::Debug for Chunk {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Chunk")
      .field("tag", &self.tag)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
#[cfg(feature = "alloc")]
impl From<ChunkView<'_>> for Chunk {
  #[inline]
  fn from(view: ChunkView<'_>) -> Self {
    view.to_chunk()
  }
}

/// Chunks in the order they appeared in the file.
///
/// Tags can repeat (several `IDAT` or `tEXt` chunks is normal).
#[cfg(feature = "alloc")]
pub type ChunkSequence = Vec<Chunk>;

#[test]
fn test_len_matches_the_payload() {
  let payload = [3_u8; 5];
  let view = ChunkView::new(ChunkTypeTag::tEXt, &payload, 0);
  assert_eq!(view.len(), 5);
  assert!(!view.is_empty());
  assert!(ChunkView::new(ChunkTypeTag::IEND, &[], 0).is_empty());
  #[cfg(feature = "alloc")]
  {
    let chunk = Chunk::new(ChunkTypeTag::tEXt, payload.to_vec(), 0);
    assert_eq!(chunk.len(), view.len());
    assert_eq!(Chunk::from(view), chunk);
  }
}
