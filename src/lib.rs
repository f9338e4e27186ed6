//! Serial Text Tokenizer
//!
//! Extracts line- and delimiter-separated text from input that arrives one
//! byte at a time, e.g. from a UART receive interrupt. Memory usage is
//! FIXED: the tokenizer works inside a region sized up front, either
//! supplied by the caller or acquired once on the heap.
//!
//! ```
//! use serial_parse_text::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::acquire(64).unwrap();
//! tokenizer.set_delimiter(b' ');
//!
//! let mut name = String::new();
//! for &byte in b"reg_w 0x01" {
//!     if tokenizer.feed(byte).is_complete() {
//!         name = tokenizer.token_str().unwrap().to_string();
//!     }
//! }
//! assert_eq!(name, "reg_w");
//! assert_eq!(tokenizer.finish(), 4);
//! assert_eq!(tokenizer.token(), b"0x01");
//! ```

pub mod command;
pub mod config;
pub mod tokenizer;

pub use command::{Command, CommandParser};
pub use config::{ConfigError, ShiftMode, TokenizerConfig, QUOTE};
pub use tokenizer::{overhead, FeedResult, Tokenizer, TokenizerError};
