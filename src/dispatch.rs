//! Routing chunks to handlers by their type tag.
//!
//! You build a [`HandlerRegistry`] out of `(tag, handler)` pairs, then hand it
//! chunks. Each chunk goes to the *first* handler registered for its tag, so a
//! handler registered earlier shadows any later one with the same tag.
//!
//! ```
//! # use xng::*;
//! #[derive(Default)]
//! struct Counts {
//!   idat: usize,
//!   idat_bytes: usize,
//! }
//! let registry = HandlerRegistry::new().register(ChunkTypeTag::IDAT, |c, n: &mut Counts| {
//!   n.idat += 1;
//!   n.idat_bytes += c.data().len();
//!   Ok(())
//! });
//! let idat = ChunkView::new(ChunkTypeTag::IDAT, &[1, 2, 3], 0);
//! let mut counts = Counts::default();
//! registry.dispatch_views([idat, idat], &mut counts).unwrap();
//! assert_eq!((counts.idat, counts.idat_bytes), (2, 6));
//! ```
//!
//! Chunks with no matching handler are skipped with a warning by default,
//! since unknown ancillary chunks are always safe to skip. Use
//! [`UnknownChunkPolicy::Reject`] to make them an error instead.
//!
//! Dispatch is fail-fast: the first error stops everything, and no later chunk
//! reaches its handler. The registry itself never changes during dispatch, any
//! state lives in the context value that's passed to every handler.

use super::*;

/// What a handler gives back. `Err` stops dispatch.
pub type HandlerResult = Result<(), HandlerFailure>;

/// Something that can process a chunk, given some context.
///
/// Any `Fn(&ChunkView<'_>, &mut C) -> HandlerResult` is a handler.
pub trait ChunkHandler<C: ?Sized> {
  /// Handles one chunk.
  fn handle(&self, chunk: &ChunkView<'_>, context: &mut C) -> HandlerResult;
}
impl<C: ?Sized, F> ChunkHandler<C> for F
where
  F: Fn(&ChunkView<'_>, &mut C) -> HandlerResult,
{
  #[inline]
  fn handle(&self, chunk: &ChunkView<'_>, context: &mut C) -> HandlerResult {
    self(chunk, context)
  }
}

/// What to do with a chunk that no registered handler wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnknownChunkPolicy {
  /// Log a warning and carry on.
  #[default]
  Skip,
  /// Stop with [`XngError::UnrecognizedChunkType`].
  Reject,
}

/// The handler picked for a tag by [`HandlerRegistry::find_handler`].
pub enum FoundHandler<'r, C: ?Sized> {
  /// A handler the caller registered.
  Registered(&'r dyn ChunkHandler<C>),
  /// Nothing matched, so the registry's unknown chunk policy applies.
  Default(UnknownChunkPolicy),
}
impl<C: ?Sized> FoundHandler<'_, C> {
  /// Runs the handler on a chunk.
  ///
  /// ## Failure
  /// * [`XngError::HandlerFailure`] if a registered handler fails.
  /// * [`XngError::UnrecognizedChunkType`] for the default handler under
  ///   [`UnknownChunkPolicy::Reject`].
  #[inline]
  pub fn call(&self, chunk: &ChunkView<'_>, context: &mut C) -> XngResult<()> {
    match self {
      Self::Registered(handler) => handler
        .handle(chunk, context)
        .map_err(|e| XngError::HandlerFailure { tag: chunk.tag(), code: e.code() }),
      Self::Default(UnknownChunkPolicy::Skip) => {
        log::warn!("unhandled chunk {}", chunk.tag());
        Ok(())
      }
      Self::Default(UnknownChunkPolicy::Reject) => {
        Err(XngError::UnrecognizedChunkType(chunk.tag()))
      }
    }
  }
  /// If no registered handler matched.
  #[inline]
  #[must_use]
  pub const fn is_default(&self) -> bool {
    matches!(self, Self::Default(_))
  }
}
impl<C: ?Sized> core::fmt::Debug for FoundHandler<'_, C> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Registered(_) => f.write_str("Registered(..)"),
      Self::Default(policy) => f.debug_tuple("Default").field(policy).finish(),
    }
  }
}

/// A tag and the handler that gets chunks with that tag.
#[cfg(feature = "alloc")]
pub struct HandlerEntry<'h, C: ?Sized> {
  tag: ChunkTypeTag,
  handler: Box<dyn ChunkHandler<C> + 'h>,
}
#[cfg(feature = "alloc")]
impl<'h, C: ?Sized> HandlerEntry<'h, C> {
  /// Pairs a tag with a handler.
  #[inline]
  #[must_use]
  pub fn new<H: ChunkHandler<C> + 'h>(tag: ChunkTypeTag, handler: H) -> Self {
    Self { tag, handler: Box::new(handler) }
  }
  /// Pairs a tag with a closure.
  #[inline]
  #[must_use]
  pub fn from_fn<F>(tag: ChunkTypeTag, f: F) -> Self
  where
    F: Fn(&ChunkView<'_>, &mut C) -> HandlerResult + 'h,
  {
    Self::new(tag, f)
  }
  /// The tag this entry matches.
  #[inline]
  #[must_use]
  pub const fn tag(&self) -> ChunkTypeTag {
    self.tag
  }
}
#[cfg(feature = "alloc")]
impl<C: ?Sized> core::fmt::Debug for HandlerEntry<'_, C> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("HandlerEntry").field("tag", &self.tag).finish_non_exhaustive()
  }
}

/// An ordered list of handlers, looked up by chunk tag.
///
/// * `'h` is how long the handlers can borrow things for.
/// * `C` is the context type every handler is given.
#[cfg(feature = "alloc")]
pub struct HandlerRegistry<'h, C: ?Sized> {
  entries: Vec<HandlerEntry<'h, C>>,
  policy: UnknownChunkPolicy,
}
#[cfg(feature = "alloc")]
impl<'h, C: ?Sized> HandlerRegistry<'h, C> {
  /// An empty registry that skips unknown chunks.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { entries: Vec::new(), policy: UnknownChunkPolicy::Skip }
  }

  /// Sets what happens to chunks no handler matches.
  #[inline]
  #[must_use]
  pub fn with_policy(mut self, policy: UnknownChunkPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// The current unknown chunk policy.
  #[inline]
  #[must_use]
  pub const fn policy(&self) -> UnknownChunkPolicy {
    self.policy
  }

  /// Adds a closure as the handler for `tag`, builder style.
  #[inline]
  #[must_use]
  pub fn register<F>(mut self, tag: ChunkTypeTag, f: F) -> Self
  where
    F: Fn(&ChunkView<'_>, &mut C) -> HandlerResult + 'h,
  {
    self.push(HandlerEntry::from_fn(tag, f));
    self
  }

  /// Adds an entry after all current entries.
  #[inline]
  pub fn push(&mut self, entry: HandlerEntry<'h, C>) {
    self.entries.push(entry);
  }

  /// Number of registered entries.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// If nothing is registered.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The handler for `tag`: the first registered match, or else the default.
  #[inline]
  #[must_use]
  pub fn find_handler(&self, tag: ChunkTypeTag) -> FoundHandler<'_, C> {
    let key = tag.to_u32();
    match self.entries.iter().find(|e| e.tag.to_u32() == key) {
      Some(entry) => FoundHandler::Registered(&*entry.handler),
      None => FoundHandler::Default(self.policy),
    }
  }

  /// Sends one chunk to its handler.
  ///
  /// ## Failure
  /// * Whatever [`FoundHandler::call`] fails with.
  #[inline]
  pub fn dispatch_one(&self, chunk: &ChunkView<'_>, context: &mut C) -> XngResult<()> {
    self.find_handler(chunk.tag()).call(chunk, context)
  }

  /// Sends each chunk to its handler in order, stopping at the first error.
  pub fn dispatch_all(&self, chunks: &[Chunk], context: &mut C) -> XngResult<()> {
    chunks.iter().try_for_each(|chunk| self.dispatch_one(&chunk.view(), context))
  }

  /// Like [`dispatch_all`](Self::dispatch_all), for borrowed chunks.
  pub fn dispatch_views<'b, I>(&self, views: I, context: &mut C) -> XngResult<()>
  where
    I: IntoIterator<Item = ChunkView<'b>>,
  {
    views.into_iter().try_for_each(|view| self.dispatch_one(&view, context))
  }

  /// Reads chunks out of `bytes` and dispatches each as it's read, without
  /// copying any payload.
  ///
  /// Gives the number of chunks dispatched.
  ///
  /// ## Failure
  /// * [`XngError::TruncatedChunk`] if the data runs out mid-chunk. Every chunk
  ///   before that point has already been dispatched.
  /// * Any dispatch error, which stops reading.
  pub fn dispatch_bytes(&self, bytes: &[u8], context: &mut C) -> XngResult<usize> {
    let mut count = 0;
    for view in ChunkViewIter::new(bytes) {
      self.dispatch_one(&view?, context)?;
      count += 1;
    }
    Ok(count)
  }
}
#[cfg(feature = "alloc")]
impl<C: ?Sized> Default for HandlerRegistry<'_, C> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
#[cfg(feature = "alloc")]
impl<C: ?Sized> core::fmt::Debug for HandlerRegistry<'_, C> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("HandlerRegistry")
      .field("entries", &self.entries)
      .field("policy", &self.policy)
      .finish()
  }
}
#[cfg(feature = "alloc")]
impl<'h, C: ?Sized> FromIterator<HandlerEntry<'h, C>> for HandlerRegistry<'h, C> {
  fn from_iter<I: IntoIterator<Item = HandlerEntry<'h, C>>>(iter: I) -> Self {
    Self { entries: iter.into_iter().collect(), policy: UnknownChunkPolicy::Skip }
  }
}
