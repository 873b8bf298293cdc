#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for reading PNG-style chunk containers.
//!
//! PNG, MNG, and JNG files (and APNG, which is just PNG with extra chunks) all
//! share one outer layout: an 8-byte signature followed by a series of
//! "chunks". Each chunk has a length, a 4-byte type tag, a payload, and a CRC.
//! This crate deals with that outer layer only:
//!
//! * Splitting the bytes into chunks, either borrowed ([`ChunkViewIter`],
//!   [`iterate_chunks`]) or copied out into owned values ([`read_all_chunks`]).
//! * Checking each chunk's CRC ([`check_chunk`], [`crc_report`]).
//! * Sending each chunk to a handler picked by its tag ([`HandlerRegistry`]).
//!
//! What the chunks *mean* is up to your handlers. This crate doesn't decode
//! image data, and it doesn't enforce any chunk ordering rules.
//!
//! ```
//! # use xng::*;
//! # fn main() -> XngResult<()> {
//! # let file: Vec<u8> = PNG_SIGNATURE.into_iter().chain(*b"\0\0\0\0IEND\xAE\x42\x60\x82").collect();
//! let (_kind, body) = strip_signature(&file)?;
//! let chunks = read_all_chunks(body)?;
//! if let Some(bad) = first_crc_mismatch(&chunks) {
//!   println!("chunk {} ({}) is damaged", bad.index, bad.tag);
//! }
//! let registry = HandlerRegistry::new().register(ChunkTypeTag::IEND, |_, done: &mut bool| {
//!   *done = true;
//!   Ok(())
//! });
//! let mut done = false;
//! registry.dispatch_all(&chunks, &mut done)?;
//! assert!(done);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Features
//! * `alloc` (default): owned chunks, chunk sequences, and the handler
//!   registry. Without it you still get the cursor, the CRC, and the borrowed
//!   chunk iterator.
//! * `miniz_oxide` (default): [`inflate_payloads`] for joining and
//!   decompressing data spread over several chunks.
//!
//! ## Logging
//! The crate logs through the [`log`] facade: `trace` for each chunk read,
//! `debug` when reading stops early, and `warn` when a chunk has no handler.
//! Nothing is printed unless your program installs a logger.

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod int_endian;
pub use int_endian::*;

pub mod cursor;

mod chunk_type;
pub use chunk_type::*;

mod chunk;
pub use chunk::*;

mod crc32;
pub use crc32::*;

mod codec;
pub use codec::*;

mod signature;
pub use signature::*;

mod dispatch;
pub use dispatch::*;

#[cfg(feature = "miniz_oxide")]
mod inflate;
#[cfg(feature = "miniz_oxide")]
pub use inflate::*;
