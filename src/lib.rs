//! Phone wallpaper generator - turns a text prompt into AI-generated wallpapers
//!
//! A prompt goes to one of two interchangeable backends (the free Pollinations
//! endpoint or the paid Gemini API) and comes back as a list of base64-encoded
//! images ready for display. Previously generated images can be remixed with a
//! new instruction.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
