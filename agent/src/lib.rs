//! AI auto-player: asks an LLM for moves on the current board and feeds them through the same
//! action interface a person uses.

pub use advisor::*;
pub use autoplay::*;
pub use error::*;
pub use gemini::*;

mod advisor;
mod autoplay;
mod error;
mod gemini;
