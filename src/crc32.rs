//! The CRC-32 used by chunk containers, and the checks built on it.
//!
//! This is the common "IEEE" CRC-32: reflected polynomial `0xEDB8_8320`, the
//! register starts as all ones, and the result is XOR'd with all ones. A
//! chunk's CRC covers its 4 tag bytes followed by its payload. The length
//! field is *not* covered.

use super::*;

const CRC_TABLE: [u32; 256] = make_crc_table();

/// Each entry is the byte run through 8 shift-and-maybe-XOR steps.
const fn make_crc_table() -> [u32; 256] {
  let mut table = [0_u32; 256];
  let mut byte = 0;
  while byte < table.len() {
    let mut reg = byte as u32;
    let mut bit = 0;
    while bit < 8 {
      // all ones when the low bit is set, else all zeros
      let mask = (reg & 1).wrapping_neg();
      reg = (reg >> 1) ^ (0xEDB8_8320 & mask);
      bit += 1;
    }
    table[byte] = reg;
    byte += 1;
  }
  table
}

/// Running CRC-32 state, for when the bytes aren't all in one slice.
///
/// ```
/// # use xng::*;
/// let mut crc = Crc32::new();
/// crc.update(b"IE");
/// crc.update(b"ND");
/// assert_eq!(crc.finish(), crc32(b"IEND"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc32 {
  register: u32,
}
impl Crc32 {
  /// A fresh state.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { register: u32::MAX }
  }
  /// Feeds more bytes in.
  #[inline]
  pub fn update(&mut self, bytes: &[u8]) {
    let mut r = self.register;
    for byte in bytes.iter().copied() {
      r = CRC_TABLE[((r ^ u32::from(byte)) & 0xFF) as usize] ^ (r >> 8);
    }
    self.register = r;
  }
  /// The CRC of all the bytes fed in so far.
  ///
  /// This doesn't consume the state, you can keep updating after.
  #[inline]
  #[must_use]
  pub const fn finish(&self) -> u32 {
    self.register ^ u32::MAX
  }
}
impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

/// CRC-32 of the bytes given.
#[inline]
#[must_use]
pub fn crc32(bytes: &[u8]) -> u32 {
  let mut crc = Crc32::new();
  crc.update(bytes);
  crc.finish()
}

/// CRC-32 of a tag followed by a payload, which is what a chunk should store.
#[inline]
#[must_use]
pub fn chunk_crc(tag: ChunkTypeTag, data: &[u8]) -> u32 {
  let mut crc = Crc32::new();
  crc.update(tag.as_bytes());
  crc.update(data);
  crc.finish()
}

/// Checks a borrowed chunk's stored CRC against its tag and payload.
#[inline]
#[must_use]
pub fn check_view(view: &ChunkView<'_>) -> bool {
  chunk_crc(view.tag, view.data) == view.declared_crc
}

/// Checks a chunk's stored CRC against its tag and payload.
#[cfg(feature = "alloc")]
#[inline]
#[must_use]
pub fn check_chunk(chunk: &Chunk) -> bool {
  check_view(&chunk.view())
}

/// The CRC outcome for one chunk of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrcStatus {
  /// Position within the sequence.
  pub index: usize,
  /// The chunk's tag.
  pub tag: ChunkTypeTag,
  /// CRC stored in the file.
  pub declared: u32,
  /// CRC computed from the tag and payload.
  pub computed: u32,
}
impl CrcStatus {
  /// If the stored and computed CRC agree.
  #[inline]
  #[must_use]
  pub const fn is_valid(&self) -> bool {
    self.declared == self.computed
  }
}

/// Checks every chunk, giving one [`CrcStatus`] per chunk in order.
#[cfg(feature = "alloc")]
pub fn crc_report(chunks: &[Chunk]) -> impl Iterator<Item = CrcStatus> + '_ {
  chunks.iter().enumerate().map(|(index, chunk)| CrcStatus {
    index,
    tag: chunk.tag,
    declared: chunk.declared_crc,
    computed: chunk_crc(chunk.tag, &chunk.data),
  })
}

/// The first chunk whose CRC is wrong, if any.
#[cfg(feature = "alloc")]
#[inline]
#[must_use]
pub fn first_crc_mismatch(chunks: &[Chunk]) -> Option<CrcStatus> {
  crc_report(chunks).find(|status| !status.is_valid())
}

/// If every chunk has a correct CRC.
///
/// Stops at the first bad chunk. Use [`crc_report`] or
/// [`first_crc_mismatch`] to find out *which* chunk was bad.
#[cfg(feature = "alloc")]
#[inline]
#[must_use]
pub fn check_all(chunks: &[Chunk]) -> bool {
  chunks.iter().all(check_chunk)
}

/// Like [`check_all`], but a bad chunk is an error that says where it was.
///
/// ## Failure
/// * [`XngError::CrcMismatch`] for the first chunk that fails.
#[cfg(feature = "alloc")]
#[inline]
pub fn verify_all(chunks: &[Chunk]) -> XngResult<()> {
  match first_crc_mismatch(chunks) {
    None => Ok(()),
    Some(CrcStatus { index, tag, declared, computed }) => {
      Err(XngError::CrcMismatch { index, tag, declared, computed })
    }
  }
}
