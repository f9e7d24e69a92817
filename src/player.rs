//! The player core: one controller owning the playlist, the playback
//! engine and the transport state.
//!
//! Everything here runs on the foreground loop. Background work (artwork
//! fetches, downloads) only ever reaches the controller as [`WorkerEvent`]
//! values applied through explicit methods, each guarded against results
//! that went stale while in flight.
//!
//! [`WorkerEvent`]: crate::acquire::WorkerEvent

mod controller;
mod state;

pub use controller::PlayerController;
pub use state::{Artwork, PlayerError, PlayerState};

#[cfg(test)]
mod tests;
