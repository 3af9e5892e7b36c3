use anyhow::Result;
use clap::Parser;
use nocturne_fetch::Config;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "nocturne", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the cached catalog (default: ~/.cache/nocturne/catalog.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Pick a composition at random
    ///
    /// Only compositions with at least one recording are candidates. The
    /// draw is uniform over compositions, then uniform over the chosen
    /// composition's recordings.
    Pick {
        /// Restrict the draw to these genres (repeatable; unknown names mean "Others")
        #[arg(long = "genre", short = 'g')]
        genres: Vec<String>,

        /// Show every recording of the picked composition
        #[arg(long)]
        all: bool,
    },
    /// Print the URL of a random recording
    Url {
        #[arg(long = "genre", short = 'g')]
        genres: Vec<String>,
    },
    /// List compositions by genre
    ///
    /// With no --genre, lists every known genre followed by Others. A
    /// composition whose title names several genres is listed under each.
    List {
        #[arg(long = "genre", short = 'g')]
        genres: Vec<String>,
    },
    /// Show known genres and how many compositions each holds
    Genres,
    /// Fetch the catalog from remote sources and write the cache
    Fetch {
        /// Source URLs (default: `sources` from the config file)
        urls: Vec<String>,
    },
    /// Download a recording of a random composition
    Download {
        #[arg(long = "genre", short = 'g')]
        genres: Vec<String>,

        /// Destination file (default: <download_dir>/<generated name>)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Delete a previously downloaded recording
    Remove {
        /// Remote id of the recording
        remote_id: String,
    },
    /// Show catalog and download status
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.catalog {
        Some(path) => Config::load_with_catalog_path(path)?,
        None => Config::load()?,
    };

    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Pick { genres, all } => commands::run_pick(&config, &genres, all).await?,
        Commands::Url { genres } => commands::run_url(&config, &genres).await?,
        Commands::List { genres } => commands::run_list(&config, &genres).await?,
        Commands::Genres => commands::show_genres(&config).await?,
        Commands::Fetch { urls } => commands::run_fetch(&config, urls).await?,
        Commands::Download {
            genres,
            output,
            force,
        } => commands::run_download(&config, &genres, output, force).await?,
        Commands::Remove { remote_id } => commands::run_remove(&config, &remote_id)?,
        Commands::Status => commands::show_status(&config).await?,
        Commands::Config { command } => match command {
            ConfigCommand::Show => commands::config::show_config(&config)?,
            ConfigCommand::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommand::Path => commands::config::show_path()?,
            ConfigCommand::Example => commands::config::show_example()?,
            ConfigCommand::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
