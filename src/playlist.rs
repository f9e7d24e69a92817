//! Playlist storage: the ordered collection of downloaded tracks.
//!
//! Tracks enter the store either by being appended after a successful
//! download or wholesale through a directory rescan.

mod model;
mod scan;
mod store;

pub use model::Track;
pub use store::PlaylistStore;
