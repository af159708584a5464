mod cli;
mod errors;

use std::path::PathBuf;

use clap::Parser;
use errors::SourCliResult;
use serde::Serialize;
use sourtimes::{RESPONSE_DUMP_FILE, SearchOptions, SourClient, SourConfig};
use tracing::{Level, event, level_filters::LevelFilter};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static APP_NAME: &str = "sour";
const CONFIG_FILE_NAME: &str = "config.toml";

fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir()
        .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

fn load_config(cli: &cli::Cli) -> SourCliResult<SourConfig> {
    let mut config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => {
            event!(Level::INFO, path = %path.display(), "loading config");
            SourConfig::load(path)?
        }
        None => SourConfig::default(),
    };
    if cli.dump {
        config.dump_response = Some(PathBuf::from(RESPONSE_DUMP_FILE));
    }
    if cli.timeout.is_some() {
        config.timeout_secs = cli.timeout;
    }
    Ok(config)
}

fn print_json(value: &impl Serialize) -> SourCliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: cli::Cli) -> SourCliResult<()> {
    let client = SourClient::with_config(load_config(&cli)?)?;
    match cli.command {
        cli::Commands::Autocomplete { q } => print_json(&client.autocomplete(&q)?),
        cli::Commands::News(args) => print_json(&client.news(args.page)?),
        cli::Commands::Query(args) => {
            print_json(&client.query(&args.q, args.page.page, args.nice)?)
        }
        cli::Commands::Search(args) => {
            let mut options = SearchOptions::new(args.keywords)
                .page(args.page.page)
                .nice_only(args.nice_only)
                .sort(args.sort);
            options.author = args.author;
            options.from_date = args.from;
            options.to_date = args.to;
            print_json(&client.search(&options)?)
        }
        cli::Commands::TopRated => print_json(&client.top_rated()?),
        cli::Commands::Channels => print_json(&client.list_channels()?),
        cli::Commands::Orphans(args) => print_json(&client.orphans(args.page)?),
        cli::Commands::Channel(args) => {
            print_json(&client.get_channel(&args.channel, args.page.page)?)
        }
        cli::Commands::Throwback(args) => {
            print_json(&client.throwback(args.year, args.page.page)?)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_timer(fmt::time::LocalTime::rfc_3339())
                .with_writer(std::io::stderr)
                .event_format(fmt::format().pretty())
                .with_filter(level),
        )
        .init();

    if let Err(err) = run(cli) {
        event!(Level::ERROR, "{err}");
        std::process::exit(1);
    }
}
