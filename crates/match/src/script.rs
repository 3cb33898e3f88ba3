//! Owned delta scripts: collecting events and replaying them.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::instrument;

use checksums::WeakChecksum;
use checksums::strong::StrongDigest;

use crate::config::MatchConfig;
use crate::error::{ApplyError, DeltaError};
use crate::event::DeltaEvent;
use crate::listener::{BoxError, DeltaListener};
use crate::matcher::BlockMatcher;
use crate::table::ChecksumTable;

/// Ordered list of owned delta events.
///
/// Implements [`DeltaListener`], so it can be registered on a matcher to
/// record everything the matcher emits.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeltaScript {
    events: Vec<DeltaEvent<'static>>,
}

impl DeltaScript {
    /// Creates an empty script.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event.
    pub fn push(&mut self, event: DeltaEvent<'_>) {
        self.events.push(event.into_owned());
    }

    /// Events in emission order.
    #[must_use]
    pub fn events(&self) -> &[DeltaEvent<'static>] {
        &self.events
    }

    /// Consumes the script and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<DeltaEvent<'static>> {
        self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Reports whether the script holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Bytes carried literally.
    #[must_use]
    pub fn literal_bytes(&self) -> u64 {
        self.events
            .iter()
            .filter(|event| event.is_literal())
            .map(DeltaEvent::len)
            .sum()
    }

    /// Bytes reproduced from the old version.
    #[must_use]
    pub fn copy_bytes(&self) -> u64 {
        self.events
            .iter()
            .filter(|event| !event.is_literal())
            .map(DeltaEvent::len)
            .sum()
    }

    /// Length of the new stream the script describes.
    #[must_use]
    pub fn total_len(&self) -> u64 {
        self.events.iter().map(DeltaEvent::len).sum()
    }
}

impl DeltaListener for DeltaScript {
    fn update(&mut self, event: &DeltaEvent<'_>) -> Result<(), BoxError> {
        self.events.push(event.clone().into_owned());
        Ok(())
    }
}

impl FromIterator<DeltaEvent<'static>> for DeltaScript {
    fn from_iter<I: IntoIterator<Item = DeltaEvent<'static>>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DeltaScript {
    type Item = &'a DeltaEvent<'static>;
    type IntoIter = std::slice::Iter<'a, DeltaEvent<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Script shared between the matcher's listener list and the caller.
struct SharedScript(Arc<Mutex<DeltaScript>>);

impl DeltaListener for SharedScript {
    fn update(&mut self, event: &DeltaEvent<'_>) -> Result<(), BoxError> {
        let mut script = self
            .0
            .lock()
            .map_err(|_| BoxError::from("delta script lock poisoned"))?;
        DeltaListener::update(&mut *script, event)
    }
}

/// Reads the new version from `reader` and matches it against `table`.
///
/// # Errors
///
/// Fails with [`DeltaError::Config`] when `config` does not fit `table` or
/// `S`, and with [`DeltaError::Io`] when reading fails.
#[instrument(skip(reader, config, table), fields(algorithm = S::NAME, block_length = config.block_length().get()), name = "generate_delta")]
pub fn generate_delta<W, S, R>(
    mut reader: R,
    config: MatchConfig,
    table: Arc<ChecksumTable>,
) -> Result<DeltaScript, DeltaError>
where
    W: WeakChecksum + Default,
    S: StrongDigest,
    R: Read,
{
    let read_size = config.chunk_size().get().min(64 * 1024);
    let mut matcher = BlockMatcher::<W, S>::new(config, table)?;
    let shared = Arc::new(Mutex::new(DeltaScript::new()));
    matcher.add_listener(SharedScript(Arc::clone(&shared)));

    let mut buffer = vec![0u8; read_size];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        matcher.update(&buffer[..n])?;
    }
    matcher.finish()?;

    let script = std::mem::take(&mut *shared.lock().unwrap_or_else(PoisonError::into_inner));
    logging::trace_match!(
        events = script.len(),
        literal = script.literal_bytes(),
        copied = script.copy_bytes(),
        "delta generated"
    );
    Ok(script)
}

/// Rebuilds the new version from `basis` (the old version) and `script`.
///
/// Returns the number of bytes written to `output`.
///
/// # Errors
///
/// Fails with [`ApplyError::OutOfOrder`] when an event does not start where
/// the previous one ended, [`ApplyError::ShortBasis`] when a copy reaches
/// past the end of `basis`, and [`ApplyError::Io`] on I/O failure.
pub fn apply_delta<B, O>(mut basis: B, script: &DeltaScript, mut output: O) -> Result<u64, ApplyError>
where
    B: Read + Seek,
    O: Write,
{
    let mut position = 0u64;
    let mut scratch = Vec::new();

    for event in script {
        let found = event.new_offset();
        if found != position {
            return Err(ApplyError::OutOfOrder {
                expected: position,
                found,
            });
        }

        match event {
            DeltaEvent::DataBlock(block) => output.write_all(&block.data)?,
            DeltaEvent::Offsets(copy) => {
                basis.seek(SeekFrom::Start(copy.old_offset))?;
                scratch.clear();
                let available = (&mut basis)
                    .take(u64::from(copy.length))
                    .read_to_end(&mut scratch)?;
                if available < copy.length as usize {
                    return Err(ApplyError::ShortBasis {
                        old_offset: copy.old_offset,
                        length: copy.length,
                        available: available as u64,
                    });
                }
                output.write_all(&scratch)?;
            }
        }
        position += event.len();
    }

    output.flush()?;
    Ok(position)
}
