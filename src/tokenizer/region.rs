//! Region lifecycle: acquire, init, reset and release
//!
//! A region is `usable + overhead()` bytes. Heap regions come from a single
//! fallible allocation; caller-supplied regions are borrowed or owned
//! arrays that the caller hands back out with [`Tokenizer::into_region`].

use log::debug;

use super::{State, Tokenizer, TokenizerError};
use crate::config::TokenizerConfig;

/// Bytes of tokenizer bookkeeping a region must reserve.
///
/// Platform dependent; add it to the wanted token length when sizing a
/// caller-supplied region.
pub const fn overhead() -> usize {
    std::mem::size_of::<State>()
}

impl Tokenizer<Box<[u8]>> {
    /// Acquire a heap region with `usable` bytes of data area and
    /// initialize it.
    ///
    /// Fails on a zero size or when the allocator refuses the request.
    pub fn acquire(usable: usize) -> Result<Self, TokenizerError> {
        if usable == 0 {
            return Err(TokenizerError::ZeroSize);
        }

        let total = usable
            .checked_add(overhead())
            .ok_or(TokenizerError::AllocationFailed {
                requested: usable.saturating_add(overhead()),
            })?;

        let mut storage = Vec::new();
        storage.try_reserve_exact(total).map_err(|_| {
            debug!("tokenizer region allocation of {} bytes failed", total);
            TokenizerError::AllocationFailed { requested: total }
        })?;
        storage.resize(total, 0);

        let mut tokenizer = Self::from_region(storage.into_boxed_slice());
        let capacity = tokenizer.init();
        debug!(
            "acquired tokenizer region: total={} usable={}",
            total, capacity
        );

        Ok(tokenizer)
    }

    /// Release an acquired region. Data area and bookkeeping go together.
    pub fn release(mut self) {
        debug!("releasing tokenizer region of {} bytes", self.total());
        self.state.capacity = 0;
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> Tokenizer<S> {
    /// Wrap a caller-supplied region without initializing it.
    ///
    /// Until [`Tokenizer::init`] succeeds the capacity is 0 and every fed
    /// byte is discarded.
    pub fn from_region(region: S) -> Self {
        Self {
            region,
            state: State::default(),
        }
    }

    /// Wrap and initialize a caller-supplied region
    pub fn new(region: S) -> Result<Self, TokenizerError> {
        let mut tokenizer = Self::from_region(region);
        if tokenizer.init() == 0 {
            return Err(TokenizerError::Undersized {
                total: tokenizer.total(),
                required: overhead() + 1,
            });
        }
        Ok(tokenizer)
    }

    /// Zero the region and restore the default configuration.
    ///
    /// Returns the usable capacity, or 0 when the region cannot hold the
    /// overhead plus one byte. An undersized region keeps its configuration.
    pub fn init(&mut self) -> usize {
        let total = self.total();
        self.region.as_mut().fill(0);

        if total < overhead() + 1 {
            debug!(
                "tokenizer region of {} bytes is below the minimum of {}",
                total,
                overhead() + 1
            );
            self.state = State {
                config: self.state.config,
                ..State::default()
            };
            return 0;
        }

        self.state = State {
            capacity: total - overhead(),
            config: TokenizerConfig::default(),
            ..State::default()
        };

        self.state.capacity
    }

    /// Drop any pending token. Configuration is kept.
    pub fn reset(&mut self) {
        self.state.cursor = 0;
        self.state.len = 0;
        self.state.in_quotes = false;
        if let Some(first) = self.data_mut().first_mut() {
            *first = 0;
        }
    }

    /// Give the region back to the caller
    pub fn into_region(self) -> S {
        self.region
    }
}
