use super::*;

/// The first eight bytes of a PNG datastream.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
/// The first eight bytes of a MNG datastream.
pub const MNG_SIGNATURE: [u8; 8] = [138, 77, 78, 71, 13, 10, 26, 10];
/// The first eight bytes of a JNG datastream.
pub const JNG_SIGNATURE: [u8; 8] = [139, 74, 78, 71, 13, 10, 26, 10];

/// Which kind of chunk container a signature says we have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerKind {
  /// Portable Network Graphics (including APNG)
  Png,
  /// Multiple-image Network Graphics
  Mng,
  /// JPEG Network Graphics
  Jng,
}
impl ContainerKind {
  /// The signature bytes for this kind of container.
  #[inline]
  #[must_use]
  pub const fn signature(self) -> [u8; 8] {
    match self {
      Self::Png => PNG_SIGNATURE,
      Self::Mng => MNG_SIGNATURE,
      Self::Jng => JNG_SIGNATURE,
    }
  }
}

/// Checks the first 8 bytes for a known signature.
#[inline]
#[must_use]
pub fn detect_signature(bytes: &[u8]) -> Option<ContainerKind> {
  match bytes.get(..8)? {
    s if *s == PNG_SIGNATURE => Some(ContainerKind::Png),
    s if *s == MNG_SIGNATURE => Some(ContainerKind::Mng),
    s if *s == JNG_SIGNATURE => Some(ContainerKind::Jng),
    _ => None,
  }
}

/// Splits the signature off the front of a file's bytes.
///
/// The chunk readers want what comes back as the second value.
///
/// ## Failure
/// * [`XngError::BadSignature`] if the data is shorter than 8 bytes or starts
///   with anything else.
#[inline]
pub fn strip_signature(bytes: &[u8]) -> XngResult<(ContainerKind, &[u8])> {
  let kind = detect_signature(bytes).ok_or(XngError::BadSignature)?;
  Ok((kind, &bytes[8..]))
}

#[test]
fn test_strip_signature() {
  let mut png = [0_u8; 12];
  png[..8].copy_from_slice(&PNG_SIGNATURE);
  png[8..].copy_from_slice(b"rest");
  assert_eq!(strip_signature(&png), Ok((ContainerKind::Png, &b"rest"[..])));
  assert_eq!(detect_signature(&MNG_SIGNATURE), Some(ContainerKind::Mng));
  assert_eq!(detect_signature(&ContainerKind::Jng.signature()), Some(ContainerKind::Jng));
  assert_eq!(strip_signature(&PNG_SIGNATURE[..7]), Err(XngError::BadSignature));
  assert_eq!(strip_signature(b"GIF89a\0\0"), Err(XngError::BadSignature));
}
