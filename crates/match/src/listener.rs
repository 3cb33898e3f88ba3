//! Listener registration and failure aggregation.
//!
//! Every event is delivered synchronously to each registered listener in
//! registration order. A failing listener does not stop delivery to the
//! others or the emission of later events. Failures of one top-level matcher
//! call are returned together as a [`ListenerError`] once that call has
//! delivered everything.

use std::error::Error;
use std::fmt;

use thiserror::Error;

use crate::event::DeltaEvent;

/// Boxed error returned by a listener.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Consumer of delta events.
///
/// Closures of the shape `FnMut(&DeltaEvent<'_>) -> Result<(), BoxError>`
/// implement this trait.
pub trait DeltaListener: Send {
    /// Receives one event. The event's literal data is only borrowed for the
    /// duration of the call.
    fn update(&mut self, event: &DeltaEvent<'_>) -> Result<(), BoxError>;
}

impl<F> DeltaListener for F
where
    F: FnMut(&DeltaEvent<'_>) -> Result<(), BoxError> + Send,
{
    fn update(&mut self, event: &DeltaEvent<'_>) -> Result<(), BoxError> {
        self(event)
    }
}

/// Handle returned by [`BlockMatcher::add_listener`](crate::BlockMatcher::add_listener).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Numeric value of the handle.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single rejected delivery.
#[derive(Debug, Error)]
#[error("listener {listener} failed on event at offset {new_offset}: {source}")]
pub struct ListenerFailure {
    listener: ListenerId,
    new_offset: u64,
    #[source]
    source: BoxError,
}

impl ListenerFailure {
    /// Listener that failed.
    #[must_use]
    pub const fn listener(&self) -> ListenerId {
        self.listener
    }

    /// New-stream offset of the event being delivered.
    #[must_use]
    pub const fn new_offset(&self) -> u64 {
        self.new_offset
    }

    /// Error returned by the listener.
    #[must_use]
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Consumes the failure and returns the listener's error.
    #[must_use]
    pub fn into_cause(self) -> BoxError {
        self.source
    }
}

/// Every delivery failure of one matcher call, in delivery order.
///
/// Never empty. [`Error::source`] is the first failure.
#[derive(Debug)]
pub struct ListenerError {
    failures: Vec<ListenerFailure>,
}

impl ListenerError {
    /// Wraps collected failures, returning `Ok` when there are none.
    pub(crate) fn check(failures: Vec<ListenerFailure>) -> Result<(), Self> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Self { failures })
        }
    }

    /// Failures in the order they occurred.
    #[must_use]
    pub fn failures(&self) -> &[ListenerFailure] {
        &self.failures
    }

    /// Consumes the error and returns the failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<ListenerFailure> {
        self.failures
    }
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.as_slice() {
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more)", rest.len()),
            [] => f.write_str("listener delivery failed"),
        }
    }
}

impl Error for ListenerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.failures.first().map(|failure| failure as &(dyn Error + 'static))
    }
}

/// Ordered set of registered listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(ListenerId, Box<dyn DeltaListener>)>,
    next_id: u64,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Box<dyn DeltaListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> Option<Box<dyn DeltaListener>> {
        let position = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(position).1)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Delivers `event` to every listener, appending rejections to `failures`.
    pub(crate) fn deliver(&mut self, event: &DeltaEvent<'_>, failures: &mut Vec<ListenerFailure>) {
        for (id, listener) in &mut self.entries {
            if let Err(source) = listener.update(event) {
                logging::trace_listener!(
                    listener = id.get(),
                    new_offset = event.new_offset(),
                    error = %source,
                    "listener rejected event"
                );
                failures.push(ListenerFailure {
                    listener: *id,
                    new_offset: event.new_offset(),
                    source,
                });
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}
