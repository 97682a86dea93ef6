//! Festival lineup playlist builder library
//!
//! Turns artist lists, festival lineup text and DJ set tracklists into
//! Spotify playlists. For every artist a representative set of tracks is
//! selected (top tracks, recent releases and one album) and merged into a
//! playlist without duplicates.
//!
//! # Modules
//!
//! - `builder` - artist resolution, track selection, playlist merging and the
//!   concurrent batch runner
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types of the catalog, configuration and input sources
//! - `management` - Access token lifecycle
//! - `retry` - Bounded retry with linear backoff
//! - `sources` - Lineup extraction, page fetching and tracklist parsing
//! - `spotify` - Catalog trait and Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Name normalization and deduplication helpers
//!
//! # Example
//!
//! ```ignore
//! use lineupcli::{builder::BatchOrchestrator, config::Settings};
//!
//! let settings = Settings::from_env()?;
//! let orchestrator = BatchOrchestrator::new(
//!     client,
//!     settings.selection.clone(),
//!     settings.artist_search_limit,
//!     settings.pool_size,
//! );
//! let summary = orchestrator.run(&["Bicep", "Peaches"], &playlist, &progress).await;
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod retry;
pub mod sources;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for CLI glue that may fail for mixed reasons.
///
/// Library code returns the typed errors from [`error`]; this boxed alias is
/// for the edges where any error is simply reported to the user.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Extracting artist names...");
/// info!("Found {} artists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Created new playlist: {}", name);
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load token");
/// error!("Cannot fetch current user. Err: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("No artists found in the lineup.");
/// warning!("Not found: {}", entry);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
