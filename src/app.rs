//! UI-facing application state.
//!
//! [`App`] wraps the player core with everything the terminal needs on
//! top: the playlist cursor, the search input, notices, download progress
//! and the theme. Key handling in the runtime calls into these methods;
//! background results arrive through [`App::apply_event`].

mod model;

pub use model::{App, InputMode, Notice, NoticeLevel};

#[cfg(test)]
mod tests;
