use core::fmt::Write;

use bytemuck::{Pod, Zeroable};

/// The 4-byte type tag of a chunk.
///
/// Tags are meant to be ascii letters (`IHDR`, `tEXt`, etc) but nothing is
/// enforced. The `Debug` and `Display` impls just `as` cast each byte into a
/// character, which is right for ascii and still safe for anything else.
///
/// Equality is plain byte equality. [`to_u32`](Self::to_u32) reinterprets the
/// bytes as one integer, which is what handler lookup compares.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct ChunkTypeTag(pub [u8; 4]);

#[allow(nonstandard_style)]
impl ChunkTypeTag {
  /// PNG image header
  pub const IHDR: Self = Self(*b"IHDR");
  /// PNG palette
  pub const PLTE: Self = Self(*b"PLTE");
  /// PNG image data
  pub const IDAT: Self = Self(*b"IDAT");
  /// PNG image end
  pub const IEND: Self = Self(*b"IEND");
  /// PNG transparency
  pub const tRNS: Self = Self(*b"tRNS");
  /// PNG text
  pub const tEXt: Self = Self(*b"tEXt");
  /// APNG animation control
  pub const acTL: Self = Self(*b"acTL");
  /// APNG frame control
  pub const fcTL: Self = Self(*b"fcTL");
  /// APNG frame data
  pub const fdAT: Self = Self(*b"fdAT");
  /// MNG header
  pub const MHDR: Self = Self(*b"MHDR");
  /// MNG end
  pub const MEND: Self = Self(*b"MEND");
  /// JNG header
  pub const JHDR: Self = Self(*b"JHDR");
  /// JNG image data
  pub const JDAT: Self = Self(*b"JDAT");
  /// Four zero bytes. Marks the end of the chunk stream when read.
  pub const ZERO: Self = Self([0; 4]);

  /// Makes a tag from its bytes.
  #[inline]
  #[must_use]
  pub const fn new(bytes: [u8; 4]) -> Self {
    Self(bytes)
  }

  /// The tag bytes.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8; 4] {
    &self.0
  }

  /// The tag bytes as a single native-endian integer.
  ///
  /// Only useful for comparisons, the actual number depends on the host.
  #[inline]
  #[must_use]
  pub fn to_u32(self) -> u32 {
    bytemuck::cast(self.0)
  }

  /// If all four bytes are zero.
  #[inline]
  #[must_use]
  pub const fn is_zero(self) -> bool {
    matches!(self.0, [0, 0, 0, 0])
  }

  /// Bit 5 of the first byte: the chunk isn't needed to display the image.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    (self.0[0] & 32) != 0
  }
  /// Bit 5 of the second byte: the chunk isn't in a public registry.
  #[inline]
  #[must_use]
  pub const fn is_private(self) -> bool {
    (self.0[1] & 32) != 0
  }
  /// Bit 5 of the third byte, which should be clear in all current formats.
  #[inline]
  #[must_use]
  pub const fn is_reserved_bit_set(self) -> bool {
    (self.0[2] & 32) != 0
  }
  /// Bit 5 of the fourth byte: editors may copy the chunk even if they changed
  /// critical data without understanding this chunk.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & 32) != 0
  }
}
impl core::fmt::Debug for ChunkTypeTag {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('\"')?;
    core::fmt::Display::fmt(self, f)?;
    f.write_char('\"')?;
    Ok(())
  }
}
impl core::fmt::Display for ChunkTypeTag {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}
impl From<[u8; 4]> for ChunkTypeTag {
  #[inline]
  fn from(bytes: [u8; 4]) -> Self {
    Self(bytes)
  }
}
impl From<&[u8; 4]> for ChunkTypeTag {
  #[inline]
  fn from(bytes: &[u8; 4]) -> Self {
    Self(*bytes)
  }
}

#[test]
fn test_chunk_type_property_bits() {
  let idat = ChunkTypeTag::IDAT;
  assert!(!idat.is_ancillary() && !idat.is_private() && !idat.is_safe_to_copy());
  let text = ChunkTypeTag::tEXt;
  assert!(text.is_ancillary() && !text.is_private() && !text.is_reserved_bit_set());
  assert!(text.is_safe_to_copy());
  let private = ChunkTypeTag(*b"prVt");
  assert!(private.is_private());
  assert!(ChunkTypeTag::ZERO.is_zero());
  assert!(!ChunkTypeTag(*b"\0\0\0A").is_zero());
}

#[test]
fn test_chunk_type_u32_matches_byte_equality() {
  let a = ChunkTypeTag::from(b"fcTL");
  assert_eq!(a.to_u32(), ChunkTypeTag::fcTL.to_u32());
  assert_ne!(a.to_u32(), ChunkTypeTag::fdAT.to_u32());
  assert_eq!(ChunkTypeTag::ZERO.to_u32(), 0);
}
