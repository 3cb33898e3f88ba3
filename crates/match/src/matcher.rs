//! Streaming block matcher.
//!
//! The matcher appends bytes of the new version to a [`WindowBuffer`] and,
//! once a full block is buffered, probes the [`ChecksumTable`] with the
//! trailing block-sized window after every byte. The weak checksum is
//! recomputed when the window first becomes full and rolled by one byte
//! afterwards.
//!
//! On a hit any unmatched bytes before the window are emitted as a
//! [`DataBlock`], followed by an [`Offsets`] copy for the window, and the
//! buffer restarts empty. When the buffer fills without a hit, everything but
//! the last `block_length - 1` bytes is emitted as literal data and those
//! bytes are kept as the start of the next window.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::sync::Arc;

use checksums::strong::{Md4, StrongDigest};
use checksums::{RollingChecksum, WeakChecksum};
use signature::FileSignature;

use crate::config::MatchConfig;
use crate::error::ConfigError;
use crate::event::{DataBlock, DeltaEvent, Offsets};
use crate::listener::{DeltaListener, ListenerError, ListenerFailure, ListenerId, Listeners};
use crate::table::ChecksumTable;
use crate::window_buffer::WindowBuffer;

/// Streaming matcher session.
///
/// `W` is the weak rolling checksum and `S` the strong digest used to confirm
/// weak hits. Both must agree with how the table's signature was generated.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use matching::{BlockMatcher, ChecksumTable, DeltaEvent, MatchConfig};
///
/// let config = MatchConfig::builder(4).build().unwrap();
/// let table = Arc::new(ChecksumTable::for_config(&config));
/// let mut matcher: BlockMatcher = BlockMatcher::new(config, table).unwrap();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// matcher.add_listener(move |event: &DeltaEvent<'_>| -> Result<(), matching::BoxError> {
///     sink.lock().unwrap().push(event.clone().into_owned());
///     Ok(())
/// });
///
/// matcher.update(b"hi").unwrap();
/// matcher.finish().unwrap();
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub struct BlockMatcher<W = RollingChecksum, S = Md4> {
    config: MatchConfig,
    table: Arc<ChecksumTable>,
    window: WindowBuffer,
    count: u64,
    weak: W,
    listeners: Listeners,
    strong: PhantomData<fn() -> S>,
}

impl<W, S> BlockMatcher<W, S>
where
    W: WeakChecksum + Default,
    S: StrongDigest,
{
    /// Creates a session over `table`.
    ///
    /// Fails when the strong length exceeds the digest width of `S` or the
    /// table was built with different lengths.
    pub fn new(config: MatchConfig, table: Arc<ChecksumTable>) -> Result<Self, ConfigError> {
        let requested = config.strong_sum_length().get();
        if usize::from(requested) > S::DIGEST_LEN {
            return Err(ConfigError::StrongLengthTooLong {
                algorithm: S::NAME,
                requested,
                available: S::DIGEST_LEN,
            });
        }
        table.check_compatible(&config)?;

        let window = WindowBuffer::with_capacity(config.chunk_size().get());
        Ok(Self {
            config,
            table,
            window,
            count: 0,
            weak: W::default(),
            listeners: Listeners::default(),
            strong: PhantomData,
        })
    }

    /// Replaces the table with one built from `signature` and resets the session.
    pub fn set_checksums(&mut self, signature: &FileSignature) -> Result<(), ConfigError> {
        let table = ChecksumTable::from_signature(signature)?;
        self.set_table(Arc::new(table))
    }

    /// Replaces the table and resets the session.
    pub fn set_table(&mut self, table: Arc<ChecksumTable>) -> Result<(), ConfigError> {
        table.check_compatible(&self.config)?;
        self.table = table;
        self.reset();
        Ok(())
    }

    /// Registers a listener. Listeners receive events in registration order.
    pub fn add_listener<L>(&mut self, listener: L) -> ListenerId
    where
        L: DeltaListener + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Unregisters a listener, returning it if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn DeltaListener>> {
        self.listeners.remove(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Feeds a single byte of the new version.
    pub fn update_byte(&mut self, byte: u8) -> Result<(), ListenerError> {
        let mut failures = Vec::new();
        self.step(byte, &mut failures);
        ListenerError::check(failures)
    }

    /// Feeds a slice of the new version.
    ///
    /// Produces exactly the events of calling [`update_byte`](Self::update_byte)
    /// for every byte. Listener failures are reported once the whole slice
    /// has been consumed.
    pub fn update(&mut self, data: &[u8]) -> Result<(), ListenerError> {
        let mut failures = Vec::new();
        for &byte in data {
            self.step(byte, &mut failures);
        }
        ListenerError::check(failures)
    }

    /// Flushes the buffered tail and resets the session.
    ///
    /// The trailing window of up to `block_length` bytes is probed once more,
    /// which lets a short final block of the old version match.
    pub fn finish(&mut self) -> Result<(), ListenerError> {
        let mut failures = Vec::new();
        let block = self.block_length();
        let ndx = self.window.len();

        if ndx > 0 {
            let tail = ndx.min(block);
            self.weak.check(self.window.window(tail));
            let hit = self.table.probe::<S>(
                self.weak.value(),
                self.window.window(tail),
                self.config.checksum_seed(),
            );
            let start = self.count - ndx as u64;

            match hit {
                Some(old_offset) => {
                    if ndx > tail {
                        let literal = DataBlock {
                            offset: start,
                            data: Cow::Borrowed(self.window.prefix(ndx - tail)),
                        };
                        self.listeners
                            .deliver(&DeltaEvent::DataBlock(literal), &mut failures);
                    }
                    let new_offset = self.count - tail as u64;
                    logging::trace_match!(new_offset, old_offset, length = tail, "tail matched");
                    let copy = Offsets {
                        old_offset,
                        new_offset,
                        length: tail as u32,
                    };
                    self.listeners
                        .deliver(&DeltaEvent::Offsets(copy), &mut failures);
                }
                None => {
                    let literal = DataBlock {
                        offset: start,
                        data: Cow::Borrowed(self.window.as_slice()),
                    };
                    self.listeners
                        .deliver(&DeltaEvent::DataBlock(literal), &mut failures);
                }
            }
        }

        logging::trace_match!(
            bytes = self.count,
            failures = failures.len(),
            "stream finished"
        );
        self.reset();
        ListenerError::check(failures)
    }

    /// Discards buffered bytes and restarts stream offsets at zero.
    pub fn reset(&mut self) {
        self.window.clear();
        self.count = 0;
        self.weak = W::default();
    }

    /// Total bytes fed since the session started or was last reset.
    #[inline]
    #[must_use]
    pub const fn bytes_consumed(&self) -> u64 {
        self.count
    }

    /// Bytes held in the working buffer and not yet covered by an event.
    #[inline]
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        self.window.as_slice()
    }

    /// Session configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Table probed by this session.
    #[inline]
    #[must_use]
    pub const fn table(&self) -> &Arc<ChecksumTable> {
        &self.table
    }

    #[inline]
    fn block_length(&self) -> usize {
        self.config.block_length().get() as usize
    }

    fn step(&mut self, byte: u8, failures: &mut Vec<ListenerFailure>) {
        self.window.push(byte);
        self.count += 1;

        let block = self.block_length();
        let ndx = self.window.len();
        if ndx < block {
            return;
        }
        if ndx == block {
            self.weak.check(self.window.window(block));
        } else {
            let outgoing = self.window.as_slice()[ndx - block - 1];
            self.weak.roll(outgoing, byte);
        }

        let hit = self.table.probe::<S>(
            self.weak.value(),
            self.window.window(block),
            self.config.checksum_seed(),
        );

        if let Some(old_offset) = hit {
            if ndx > block {
                let literal = DataBlock {
                    offset: self.count - ndx as u64,
                    data: Cow::Borrowed(self.window.prefix(ndx - block)),
                };
                self.listeners
                    .deliver(&DeltaEvent::DataBlock(literal), failures);
            }
            let new_offset = self.count - block as u64;
            logging::trace_match!(new_offset, old_offset, "block matched");
            let copy = Offsets {
                old_offset,
                new_offset,
                length: block as u32,
            };
            self.listeners.deliver(&DeltaEvent::Offsets(copy), failures);
            self.window.clear();
        } else if self.window.is_full() {
            let keep = block - 1;
            let literal = DataBlock {
                offset: self.count - ndx as u64,
                data: Cow::Borrowed(self.window.prefix(ndx - keep)),
            };
            logging::trace_match!(
                offset = literal.offset,
                length = ndx - keep,
                "buffer full, flushing literal"
            );
            self.listeners
                .deliver(&DeltaEvent::DataBlock(literal), failures);
            self.window.compact(keep);
        }
    }
}

/// Feeds written bytes through [`BlockMatcher::update`].
///
/// A listener failure is returned as an [`io::Error`] wrapping the
/// [`ListenerError`]; the bytes of that write have been consumed regardless.
/// `flush` does not flush the window, call [`BlockMatcher::finish`] for that.
impl<W, S> io::Write for BlockMatcher<W, S>
where
    W: WeakChecksum + Default,
    S: StrongDigest,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W, S> fmt::Debug for BlockMatcher<W, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockMatcher")
            .field("config", &self.config)
            .field("count", &self.count)
            .field("buffered", &self.window.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
