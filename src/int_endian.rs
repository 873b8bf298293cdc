//! Big-endian integers stored as plain byte arrays.
//!
//! Every multi-byte integer in a chunk container is big-endian. These types
//! have an alignment of 1, so they can be read straight out of any position in
//! a byte slice with [`bytemuck::pod_read_unaligned`].

use bytemuck::{Pod, Zeroable};

macro_rules! be_int {
  ($(#[$meta:meta])* $name:ident, $int:ty, $n:literal, $to:ident, $from:ident) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
    #[repr(transparent)]
    pub struct $name([u8; $n]);
    impl $name {
      #[doc = concat!("Convert this value to a native `", stringify!($int), "`")]
      #[inline]
      #[must_use]
      pub const fn $to(self) -> $int {
        <$int>::from_be_bytes(self.0)
      }
      #[doc = concat!("Make a value from a native `", stringify!($int), "`")]
      #[inline]
      #[must_use]
      pub const fn $from(i: $int) -> Self {
        Self(i.to_be_bytes())
      }
    }
    impl core::fmt::Debug for $name {
      #[inline]
      fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple(stringify!($name)).field(&self.$to()).finish()
      }
    }
    impl From<$int> for $name {
      #[inline]
      fn from(value: $int) -> Self {
        Self::$from(value)
      }
    }
    impl From<$name> for $int {
      #[inline]
      fn from(value: $name) -> Self {
        value.$to()
      }
    }
  };
}

be_int!(
  /// A `u16` stored as big-endian bytes.
  U16BE, u16, 2, to_u16, from_u16
);
be_int!(
  /// An `i16` stored as big-endian bytes.
  I16BE, i16, 2, to_i16, from_i16
);
be_int!(
  /// A `u32` stored as big-endian bytes.
  ///
  /// Chunk lengths and CRCs are stored this way.
  U32BE, u32, 4, to_u32, from_u32
);
be_int!(
  /// An `i32` stored as big-endian bytes.
  I32BE, i32, 4, to_i32, from_i32
);

#[test]
fn test_be_ints_read_high_byte_first() {
  let bytes = [0x12_u8, 0x34, 0x56, 0x78];
  let u: U32BE = bytemuck::pod_read_unaligned(&bytes);
  assert_eq!(u.to_u32(), 0x1234_5678);
  let s: I16BE = bytemuck::pod_read_unaligned(&[0xFF, 0xFE]);
  assert_eq!(s.to_i16(), -2);
  assert_eq!(bytemuck::bytes_of(&U16BE::from_u16(0xABCD)), &[0xAB, 0xCD]);
  assert_eq!(i32::from(I32BE::from(-7)), -7);
  assert_eq!(U32BE::from(0x0102_0304).0, [1, 2, 3, 4]);
}
