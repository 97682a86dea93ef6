//! # Playlist Builder
//!
//! Turns artist names into tracks merged into a playlist.
//!
//! Every artist goes through the same pipeline:
//!
//! ```text
//! pending → resolving → (not_found | selecting) → (no_tracks | merging) → done
//! ```
//!
//! - [`resolver`] - picks one catalog artist for a free-text name
//! - [`selector`] - gathers top tracks, recent releases and one album
//! - [`merger`] - finds or creates the playlist and appends missing tracks
//! - [`batch`] - runs the pipeline for many artists on a bounded pool
//! - [`tracklist`] - resolves "Artist - Title" entries to single tracks
//!
//! All components take the catalog as an explicit [`CatalogClient`] so they
//! can run against the Spotify client or an in-memory double.
//!
//! [`CatalogClient`]: crate::spotify::CatalogClient

pub mod batch;
pub mod merger;
pub mod resolver;
pub mod selector;
pub mod tracklist;

pub use batch::{BatchOrchestrator, BatchSummary};
pub use merger::{PlaylistMerger, PlaylistTarget};
pub use resolver::{ArtistResolver, Resolution};
pub use selector::TrackSelector;
