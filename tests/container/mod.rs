use xng::*;
use walkdir::WalkDir;

use super::{push_chunk, rand_bytes};

#[test]
fn test_single_TEST_chunk_then_terminator() {
  let mut bytes = Vec::new();
  bytes.extend_from_slice(&4_u32.to_be_bytes());
  bytes.extend_from_slice(b"TEST");
  bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
  bytes.extend_from_slice(&crc32(b"TEST\xDE\xAD\xBE\xEF").to_be_bytes());

  let chunks = read_all_chunks(&bytes).unwrap();
  assert_eq!(chunks.len(), 1);
  assert_eq!(chunks[0].len(), 4);
  assert_eq!(chunks[0].tag(), ChunkTypeTag(*b"TEST"));
  assert_eq!(chunks[0].tag().to_string(), "TEST");
  assert_eq!(chunks[0].data(), &[0xDE, 0xAD, 0xBE, 0xEF]);
  assert!(check_chunk(&chunks[0]));

  // a zero tag record afterward ends the stream without adding an entry
  push_chunk(&mut bytes, &[0; 4], &[]);
  bytes.extend_from_slice(&[0xFF; 5]);
  assert_eq!(read_all_chunks(&bytes).unwrap(), chunks);
}

#[test]
fn test_parse_the_concatenation() {
  let tags: [&[u8; 4]; 5] = [b"IHDR", b"tEXt", b"IDAT", b"IDAT", b"IEND"];
  let payloads: Vec<Vec<u8>> =
    tags.iter().enumerate().map(|(i, _)| rand_bytes(i * 37 % 100)).collect();
  let mut bytes = Vec::new();
  for (tag, data) in tags.iter().zip(&payloads) {
    push_chunk(&mut bytes, tag, data);
  }

  let mut offset = 0;
  let mut stepped = Vec::new();
  while offset < bytes.len() {
    let (chunk, next) = read_chunk(&bytes, offset).unwrap();
    assert!(next > offset);
    stepped.push(chunk);
    offset = next;
  }
  assert_eq!(offset, bytes.len());
  assert_eq!(stepped.len(), tags.len());
  for ((chunk, tag), data) in stepped.iter().zip(tags).zip(&payloads) {
    assert_eq!(chunk.tag(), ChunkTypeTag(*tag));
    assert_eq!(chunk.data(), data.as_slice());
    assert_eq!(chunk.len() as usize, data.len());
  }
  assert_eq!(read_all_chunks(&bytes).unwrap(), stepped);
  assert!(check_all(&stepped));

  let views: Vec<ChunkView<'_>> = ChunkViewIter::new(&bytes).map(Result::unwrap).collect();
  assert_eq!(views.len(), stepped.len());
  for (view, chunk) in views.iter().zip(&stepped) {
    assert_eq!(*view, chunk.view());
    assert_eq!(view.to_chunk(), *chunk);
  }
}

#[test]
fn test_random_bit_flips_fail_the_crc() {
  let payload = rand_bytes(64);
  let tag = ChunkTypeTag(*b"IDAT");
  let good = Chunk::new(tag, payload.clone(), chunk_crc(tag, &payload));
  assert!(check_chunk(&good));
  for pick in rand_bytes(16) {
    let bit = usize::from(pick) % ((4 + payload.len()) * 8);
    let (byte, mask) = (bit / 8, 1_u8 << (bit % 8));
    let flipped = if byte < 4 {
      let mut t = tag;
      t.0[byte] ^= mask;
      Chunk::new(t, payload.clone(), good.declared_crc())
    } else {
      let mut p = payload.clone();
      p[byte - 4] ^= mask;
      Chunk::new(tag, p, good.declared_crc())
    };
    assert!(!check_chunk(&flipped), "bit {bit}");
  }
}

#[test]
fn test_whole_png_file() {
  let mut file = PNG_SIGNATURE.to_vec();
  let mut ihdr = Vec::new();
  ihdr.extend_from_slice(&1_u32.to_be_bytes());
  ihdr.extend_from_slice(&1_u32.to_be_bytes());
  ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
  push_chunk(&mut file, b"IHDR", &ihdr);
  push_chunk(&mut file, b"tEXt", b"Software\0xng");
  push_chunk(&mut file, b"IDAT", &[0x78, 0x01, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01]);
  push_chunk(&mut file, b"IEND", &[]);

  let (kind, body) = strip_signature(&file).unwrap();
  assert_eq!(kind, ContainerKind::Png);
  let chunks = read_all_chunks(body).unwrap();
  assert_eq!(chunks.len(), 4);
  assert_eq!(verify_all(&chunks), Ok(()));

  #[derive(Default)]
  struct Seen {
    width: u32,
    text: usize,
    ended: bool,
  }
  let registry = HandlerRegistry::new()
    .register(ChunkTypeTag::IHDR, |c, s: &mut Seen| {
      let (width, _) = cursor::read_u32(c.data(), 0).map_err(|e| HandlerFailure::new(e.status()))?;
      s.width = width;
      Ok(())
    })
    .register(ChunkTypeTag::tEXt, |_, s| {
      s.text += 1;
      Ok(())
    })
    .register(ChunkTypeTag::IEND, |_, s| {
      s.ended = true;
      Ok(())
    });
  let mut seen = Seen::default();
  registry.dispatch_all(&chunks, &mut seen).unwrap();
  assert_eq!((seen.width, seen.text, seen.ended), (1, 1, true));
  assert_eq!(iterate_chunks(body, |_| Ok(())), Ok(4));

  // damage the text chunk: the report says where, parsing doesn't care
  let mut damaged = chunks.clone();
  damaged[1] = Chunk::new(ChunkTypeTag::tEXt, b"Software\0xnG".to_vec(), chunks[1].declared_crc());
  let bad = first_crc_mismatch(&damaged).unwrap();
  assert_eq!((bad.index, bad.tag), (1, ChunkTypeTag::tEXt));
  assert!(matches!(verify_all(&damaged), Err(XngError::CrcMismatch { index: 1, .. })));
}

#[test]
fn test_dispatch_is_fail_fast() {
  let mut body = Vec::new();
  push_chunk(&mut body, b"HONE", &[1]);
  push_chunk(&mut body, b"HTWO", &[2]);
  push_chunk(&mut body, b"HONE", &[3]);
  let chunks = read_all_chunks(&body).unwrap();

  let registry = HandlerRegistry::new()
    .register(ChunkTypeTag(*b"HONE"), |c, seen: &mut Vec<u8>| {
      seen.push(c.data()[0]);
      Ok(())
    })
    .register(ChunkTypeTag(*b"HTWO"), |_, _| Err(HandlerFailure::new(5)));

  let mut seen = Vec::new();
  let err = registry.dispatch_all(&chunks, &mut seen).unwrap_err();
  assert_eq!(err.status(), 5);
  assert_eq!(seen, [1]);

  seen.clear();
  assert_eq!(registry.dispatch_bytes(&body, &mut seen).map_err(|e| e.status()), Err(5));
  assert_eq!(seen, [1]);
}

#[test]
fn test_unknown_chunk_is_not_an_error() {
  let mut body = Vec::new();
  push_chunk(&mut body, b"ZZZZ", b"who knows");
  let chunks = read_all_chunks(&body).unwrap();
  let registry: HandlerRegistry<'_, ()> = HandlerRegistry::new();
  assert!(registry.find_handler(ChunkTypeTag(*b"ZZZZ")).is_default());
  assert_eq!(registry.dispatch_all(&chunks, &mut ()), Ok(()));
}

#[test]
fn test_truncation_keeps_earlier_chunks() {
  let mut body = Vec::new();
  push_chunk(&mut body, b"IHDR", &[0; 13]);
  push_chunk(&mut body, b"IDAT", &[9; 20]);
  body.truncate(body.len() - 6);
  let mut chunks = Vec::new();
  let err = read_chunks_into(&body, &mut chunks).unwrap_err();
  assert!(matches!(err, XngError::TruncatedChunk { .. }));
  assert_eq!(chunks.len(), 1);
  assert!(check_all(&chunks));

  // only a partial header left over is also truncation
  let mut body = Vec::new();
  push_chunk(&mut body, b"IEND", &[]);
  body.extend_from_slice(&[0, 0, 0]);
  assert_eq!(
    read_all_chunks(&body),
    Err(XngError::TruncatedChunk { offset: 12, needed: 8, available: 3 })
  );
}

#[test]
fn test_chunk_readers_no_panics() {
  // iter ALL files in the test folder, even non-chunk files shouldn't panic.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let body = strip_signature(&v).map(|(_, body)| body).unwrap_or(&v);
    for _ in ChunkViewIter::new(body) {
      //
    }
    let _ = read_all_chunks(body);
  }
  // even totally random data should never panic the readers!
  for _ in 0..10 {
    let v = rand_bytes(1024);
    for _ in ChunkViewIter::new(&v) {
      //
    }
    let _ = read_all_chunks(&v);
    let _ = iterate_chunks(&v, |_| Ok(()));
  }
}
