use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{Args as ClapArgs, CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    fetch_file, list_catalog, load_bundles, show_config, FetchFileArgs, ListCatalogArgs,
    LoadBundlesArgs, ShowConfigArgs, SourceArgs,
};
use launcher_assets::PlatformId;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to launcher-dist.toml (defaults to the file next to the executable)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug)]
struct Source {
    /// Directory holding every platform's client files
    #[arg(long)]
    content_root: Option<String>,

    /// Number of loader threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Abort if loading takes longer than this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Serve a file only when the requested checksum matches
    #[arg(long)]
    verify_checksums: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load client bundles and print per-platform statistics
    Load {
        #[command(flatten)]
        source: Source,

        /// Only load these platforms (name or wire number)
        #[arg(short, long, value_delimiter = ',')]
        platform: Vec<PlatformId>,
    },
    /// Print or save the launcher configuration of a platform
    Config {
        #[command(flatten)]
        source: Source,

        #[arg(short, long)]
        platform: PlatformId,

        /// Write the config blob to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Fetch one client file as it would be served
    Fetch {
        #[command(flatten)]
        source: Source,

        #[arg(short, long)]
        platform: PlatformId,

        /// File name within the platform bundle
        #[arg(short, long)]
        file: String,

        /// Checksum the launcher reports for its local copy
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        crc: i64,

        /// Write the decoded raw bytes instead of the stored payload
        #[arg(long)]
        decode: bool,

        #[arg(short, long)]
        output: String,
    },
    /// Show the platform catalog
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Source {
    fn into_source_args(self, config_path: Option<String>) -> SourceArgs {
        SourceArgs {
            config_path,
            content_root: self.content_root,
            workers: self.workers,
            timeout_secs: self.timeout_secs,
            verify_checksums: self.verify_checksums,
        }
    }
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "launcher_dist=info,launcher_assets=info".into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let args = parse_args();
    let config_path = args.config;

    match args.command {
        Commands::Load { source, platform } => load_bundles(LoadBundlesArgs {
            source: source.into_source_args(config_path),
            platforms: platform,
        }),
        Commands::Config {
            source,
            platform,
            output,
        } => show_config(ShowConfigArgs {
            source: source.into_source_args(config_path),
            platform,
            output,
        }),
        Commands::Fetch {
            source,
            platform,
            file,
            crc,
            decode,
            output,
        } => fetch_file(FetchFileArgs {
            source: source.into_source_args(config_path),
            platform,
            file_name: file,
            crc,
            decode,
            output,
        }),
        Commands::Catalog { json } => list_catalog(ListCatalogArgs { json }),
    }
}
