//! Body streams and the shared body handle carried by every message.
//!
//! [`Stream`] is the capability the emitter reads a body through. The crate
//! ships a few implementations:
//!
//! - [`MemoryStream`]: seekable, backed by [`Bytes`]
//! - [`ReaderStream`]: forward-only over any `io::Read`
//! - [`SeekableStream`]: seekable over any `io::Read + io::Seek`, e.g. a file
//! - [`LimitStream`]: a bounded window onto another seekable stream
//!
//! Messages hold their stream through a [`Body`] handle. Copies of a message
//! share the same underlying stream; whoever emits the message locks the
//! handle for the duration of the write.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use bytes::Bytes;
use triomphe::Arc;

mod stream;
pub use stream::Stream;

mod memory;
pub use memory::MemoryStream;

mod reader;
pub use reader::ReaderStream;
pub use reader::SeekableStream;

mod limit;
pub use limit::LimitStream;

/// Boxed stream stored inside a [`Body`].
pub type BoxStream = Box<dyn Stream + Send>;

/// Shared handle to a message body stream.
#[derive(Clone)]
pub struct Body {
    stream: Arc<Mutex<BoxStream>>,
}

impl Body {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream + Send + 'static,
    {
        Self { stream: Arc::new(Mutex::new(Box::new(stream))) }
    }

    /// A body with no content.
    pub fn empty() -> Self {
        Self::new(MemoryStream::empty())
    }

    /// Locks the stream for exclusive use.
    ///
    /// A panic while the stream was held doesn't invalidate the stream
    /// itself, so a poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, BoxStream> {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn size(&self) -> Option<u64> {
        self.lock().size()
    }

    /// Returns true if both handles point at the same stream.
    pub fn ptr_eq(&self, other: &Body) -> bool {
        Arc::ptr_eq(&self.stream, &other.stream)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Body");
        match self.stream.try_lock() {
            Ok(stream) => debug.field("size", &stream.size()),
            Err(TryLockError::Poisoned(poisoned)) => debug.field("size", &poisoned.into_inner().size()),
            Err(TryLockError::WouldBlock) => debug.field("size", &format_args!("<locked>")),
        };
        debug.finish_non_exhaustive()
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Self::new(MemoryStream::from(value))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::new(MemoryStream::from(value))
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::new(MemoryStream::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Self::new(MemoryStream::from(value))
    }
}
