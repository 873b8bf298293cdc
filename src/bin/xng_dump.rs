use xng::*;

/// Chunk counts gathered by the handlers.
#[derive(Debug, Default)]
struct Tally {
  headers: usize,
  image_data: usize,
  image_data_bytes: usize,
  animation_controls: usize,
  frames: usize,
  frame_data: usize,
  ended: bool,
}

fn main() {
  let args: Vec<String> = std::env::args().collect();
  if args.len() < 2 {
    println!("usage: {} FILE...", args.first().map(String::as_str).unwrap_or("xng_dump"));
    std::process::exit(2);
  }
  let mut failed = false;
  for file_arg in args[1..].iter() {
    let path = std::path::Path::new(file_arg);
    print!("Reading `{}`... ", path.display());
    let bytes = match std::fs::read(path) {
      Ok(bytes) => {
        println!("got {} bytes.", bytes.len());
        bytes
      }
      Err(e) => {
        println!("{e}");
        failed = true;
        continue;
      }
    };
    if let Err(e) = dump(&bytes) {
      println!("error: {e}");
      failed = true;
    }
  }
  if failed {
    std::process::exit(1);
  }
}

fn dump(bytes: &[u8]) -> XngResult<()> {
  let (kind, body) = strip_signature(bytes)?;
  println!("{kind:?} signature");

  let mut chunks = Vec::new();
  let read_result = read_chunks_into(body, &mut chunks);
  println!("read {} chunks", chunks.len());
  for status in crc_report(&chunks) {
    let chunk = &chunks[status.index];
    println!(
      "\t'{}': length: {}, crc: {:#x} {}",
      chunk.tag(),
      chunk.len(),
      chunk.declared_crc(),
      if status.is_valid() { "valid" } else { "invalid" }
    );
  }
  read_result?;
  println!("chunks are CRC {}", if check_all(&chunks) { "correct" } else { "incorrect" });

  let registry = HandlerRegistry::new()
    .register(ChunkTypeTag::IHDR, |_, t: &mut Tally| {
      t.headers += 1;
      Ok(())
    })
    .register(ChunkTypeTag::IDAT, |c, t| {
      t.image_data += 1;
      t.image_data_bytes += c.data().len();
      Ok(())
    })
    .register(ChunkTypeTag::IEND, |_, t| {
      t.ended = true;
      Ok(())
    })
    .register(ChunkTypeTag::acTL, |_, t| {
      t.animation_controls += 1;
      Ok(())
    })
    .register(ChunkTypeTag::fcTL, |_, t| {
      t.frames += 1;
      Ok(())
    })
    .register(ChunkTypeTag::fdAT, |_, t| {
      t.frame_data += 1;
      Ok(())
    });
  let mut tally = Tally::default();
  registry.dispatch_all(&chunks, &mut tally)?;
  println!(
    "IHDR: {}, IDAT: {} ({} bytes), acTL: {}, fcTL: {}, fdAT: {}, IEND seen: {}",
    tally.headers,
    tally.image_data,
    tally.image_data_bytes,
    tally.animation_controls,
    tally.frames,
    tally.frame_data,
    tally.ended
  );

  // same data again, through the borrowing path
  let count = iterate_chunks(body, |_| Ok(()))?;
  println!("iterated over {count} chunks");
  Ok(())
}
