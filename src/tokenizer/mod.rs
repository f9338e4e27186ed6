//! Byte-at-a-time tokenizer over a fixed-size region
//!
//! The tokenizer never grows its buffer. It:
//! - Accumulates accepted bytes into the data area of its region
//! - Splits on a configurable delimiter, or on newlines with CRLF handling
//! - Forces a token boundary when the data area is full
//!
//! A region is either caller-supplied (`&mut [u8]`, `[u8; N]`, ...) or
//! acquired on the heap with [`Tokenizer::acquire`]. Both are sized as
//! `usable + overhead()` bytes.

pub mod feed;
pub mod region;

pub use feed::FeedResult;
pub use region::overhead;

use thiserror::Error;

use crate::config::{ShiftMode, TokenizerConfig};

/// Streaming tokenizer bound to its backing region
pub struct Tokenizer<S> {
    /// Backing storage: `[data area..., reserved overhead...]`
    region: S,
    /// Cursor, length, quote flag and configuration
    state: State,
}

/// Bookkeeping that a region reserves room for.
#[derive(Clone, Copy, Debug, Default)]
struct State {
    /// Next write position in the data area
    cursor: usize,
    /// Length of the last completed (or accumulating) token
    len: usize,
    /// Usable bytes in the data area, 0 until `init` succeeds
    capacity: usize,
    /// Inside a quoted span
    in_quotes: bool,
    config: TokenizerConfig,
}

/// Tokenizer lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizerError {
    #[error("requested a zero-sized tokenizer buffer")]
    ZeroSize,
    #[error("failed to allocate {requested} bytes for tokenizer region")]
    AllocationFailed { requested: usize },
    #[error("region of {total} bytes is too small, need at least {required}")]
    Undersized { total: usize, required: usize },
    #[error("invalid shift mode code {0}")]
    InvalidShift(u8),
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> Tokenizer<S> {
    /// Total size of the backing region, overhead included
    pub fn total(&self) -> usize {
        self.region.as_ref().len()
    }

    /// Usable size of the data area (0 before a successful `init`)
    pub fn capacity(&self) -> usize {
        self.state.capacity
    }

    /// Current write position
    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    /// Whether the tokenizer is inside a quoted span
    pub fn in_quotes(&self) -> bool {
        self.state.in_quotes
    }

    /// The whole data area. The current token starts at index 0 and is
    /// followed by a NUL byte.
    pub fn data(&self) -> &[u8] {
        self.region
            .as_ref()
            .get(..self.state.capacity)
            .unwrap_or(&[])
    }

    fn data_mut(&mut self) -> &mut [u8] {
        let capacity = self.state.capacity;
        self.region.as_mut().get_mut(..capacity).unwrap_or(&mut [])
    }

    /// Bytes of the completed (or currently accumulating) token
    pub fn token(&self) -> &[u8] {
        let data = self.data();
        &data[..self.state.len.min(data.len())]
    }

    /// The completed (or currently accumulating) token as text, if it is valid UTF-8
    pub fn token_str(&self) -> Option<&str> {
        std::str::from_utf8(self.token()).ok()
    }

    /// Current configuration
    pub fn config(&self) -> TokenizerConfig {
        self.state.config
    }

    /// Replace the whole configuration; effective from the next byte
    pub fn configure(&mut self, config: TokenizerConfig) {
        self.state.config = config;
    }

    /// Set the byte that ends a token in [`Tokenizer::feed`]
    pub fn set_delimiter(&mut self, delimiter: u8) {
        self.state.config.delimiter = delimiter;
    }

    /// Set the byte dropped outside quotes. `None` disables filtering.
    pub fn set_ignore(&mut self, ignore: impl Into<Option<u8>>) {
        self.state.config.ignore = ignore.into();
    }

    /// Set the case conversion applied to stored bytes
    pub fn set_shift(&mut self, shift: ShiftMode) {
        self.state.config.shift = shift;
    }
}
