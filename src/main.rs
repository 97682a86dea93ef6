use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use lineupcli::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a playlist from a comma-separated list of artists
    Artists(ArtistsOptions),

    /// Build a playlist from festival lineup text
    Lineup(LineupOptions),

    /// Import a DJ set tracklist page into a playlist
    Tracklist(TracklistOptions),

    /// Show which artist a name resolves to
    Search(SearchOptions),

    /// Export tracks from saved tracklist pages to CSV
    Export(ExportOptions),

    /// Show the effective configuration
    Config,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Artist names separated by commas
    pub names: String,

    /// Target playlist name
    #[clap(long)]
    pub playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct LineupOptions {
    /// Read the lineup from this file instead of stdin
    #[clap(long)]
    pub file: Option<PathBuf>,

    /// Target playlist name
    #[clap(long)]
    pub playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracklistOptions {
    /// Tracklist page URL
    pub url: String,

    /// Target playlist name
    #[clap(long)]
    pub playlist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Artist name to look up
    pub name: String,

    /// Number of candidates to fetch
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// An .html file or a directory of .html files
    pub input: PathBuf,

    /// CSV file to write
    #[clap(long, default_value = "tracks_output.csv")]
    pub output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let settings = match config::Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::Artists(opt) => cli::artists(&settings, &opt.names, opt.playlist).await,
        Command::Lineup(opt) => cli::lineup(&settings, opt.file, opt.playlist).await,
        Command::Tracklist(opt) => cli::tracklist(&settings, &opt.url, opt.playlist).await,
        Command::Search(opt) => cli::search(&settings, &opt.name, opt.limit).await,
        Command::Export(opt) => cli::export(&opt.input, opt.output).await,
        Command::Config => cli::show_config(&settings),
        Command::Completions(_) => {}
    }
}
