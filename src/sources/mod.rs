//! # Input Sources
//!
//! Where artist names and tracks come from before they reach the builder.
//!
//! - [`lineup`] - artist names extracted from free-form festival lineup text
//!   by a language model
//! - [`fetch`] - downloading tracklist pages, directly or through a rendering
//!   proxy
//! - [`tracklist`] - parsing "Artist - Title" entries out of tracklist HTML
//!   and cleaning titles for search
//! - [`export`] - saved tracklist pages on disk to CSV

pub mod export;
pub mod fetch;
pub mod lineup;
pub mod tracklist;

pub use export::{ExportRow, HtmlSource};
pub use fetch::{HttpFetcher, PageFetcher};
pub use lineup::{OpenAiExtractor, TextExtractor};
pub use tracklist::parse_tracklist;
