//! HTTP Handlers

mod health;
mod tts;
mod voice;

pub use health::*;
pub use tts::*;
pub use voice::*;
