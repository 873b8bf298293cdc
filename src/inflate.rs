use miniz_oxide::inflate::decompress_to_vec_zlib_with_limit;

use super::*;

/// Zlib-decompresses the combined payloads of every chunk tagged `tag`.
///
/// PNG splits its compressed image data over any number of `IDAT` chunks, and
/// the zlib stream only makes sense once they're joined back up in order.
/// Other chunks in between are skipped. The output is still *filtered* image
/// data, and unfiltering is up to you.
///
/// `limit` caps how many bytes the decompressed output may grow to, which
/// guards against a tiny file that claims a gigantic image.
///
/// ## Failure
/// * `None` if there's no such chunk, the stream is bad, or the output would go
///   over `limit`.
#[must_use]
pub fn inflate_payloads(chunks: &[Chunk], tag: ChunkTypeTag, limit: usize) -> Option<Vec<u8>> {
  let mut zlib = Vec::new();
  let mut found = false;
  for chunk in chunks.iter().filter(|c| c.tag == tag) {
    zlib.extend_from_slice(&chunk.data);
    found = true;
  }
  if !found {
    return None;
  }
  match decompress_to_vec_zlib_with_limit(&zlib, limit) {
    Ok(out) => Some(out),
    Err(e) => {
      log::debug!("inflating {tag} payloads failed: {e:?}");
      None
    }
  }
}
