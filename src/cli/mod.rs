//! # CLI Module
//!
//! User-facing commands. Each command loads what it needs, drives the
//! builder and prints progress and results with the crate's output macros.
//!
//! ## Commands
//!
//! - [`artists`] - playlist from a comma-separated artist list
//! - [`lineup`] - playlist from festival lineup text (file or stdin)
//! - [`tracklist`] - playlist from a DJ set tracklist page
//! - [`search`] - preview which artist a name resolves to
//! - [`export`] - saved tracklist pages to CSV, no Spotify access needed
//! - [`show_config`] - effective settings, secrets masked
//!
//! ## Failure Handling
//!
//! Setup failures (token, current user, playlist lookup, unreadable input)
//! print an error and exit with status 1. Failures of single artists or
//! tracks are reported in the summary and never abort a run.
//!
//! ## Usage
//!
//! ```bash
//! lineupcli artists "Bicep, Floating Points, Peaches"
//! lineupcli lineup --file lineup.txt --playlist "Festival 2025"
//! lineupcli tracklist https://www.1001tracklists.com/tracklist/...
//! lineupcli search "Four Tet"
//! lineupcli export ./saved-sets --output tracks.csv
//! ```

mod artists;
mod common;
mod config;
mod export;
mod lineup;
mod search;
mod tracklist;

pub use artists::artists;
pub use config::show_config;
pub use export::export;
pub use lineup::lineup;
pub use search::search;
pub use tracklist::tracklist;
