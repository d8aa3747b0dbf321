//! `bmitrack-passgen` - Random password generation with clipboard support.
//!
//! Builds a character pool from class toggles and an exclusion set, samples a
//! password uniformly with replacement, and publishes it to a clipboard sink.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod clipboard;
pub mod error;
pub mod generator;
pub mod pool;

pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use error::{PasswordError, Result};
pub use generator::{
    generate, generate_with, parse_length, PasswordRequest, DEFAULT_LENGTH, MAX_LENGTH,
};
pub use pool::CharacterPool;
