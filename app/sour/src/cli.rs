use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sourtimes::SortOrder;
use time::{Date, macros::format_description};

#[derive(Parser)]
#[command(name = "sour", about = "Fetch titles, entries and channels from eksisozluk")]
pub struct Cli {
    /// Config file, defaults to `<config dir>/sour/config.toml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Write every raw response to `response.html`
    #[arg(long, global = true)]
    pub dump: bool,
    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Titles and nicks matching a partial query
    Autocomplete { q: String },
    /// Current agenda
    News(PageArgs),
    /// Entries of a title
    Query(QueryArgs),
    Search(SearchArgs),
    /// Yesterday's most liked entries
    TopRated,
    Channels,
    /// Titles without followers
    Orphans(PageArgs),
    /// Titles of a channel
    Channel(ChannelArgs),
    /// Titles from this day in a past year
    Throwback(ThrowbackArgs),
}

#[derive(Args)]
pub struct PageArgs {
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args)]
pub struct QueryArgs {
    pub q: String,
    #[command(flatten)]
    pub page: PageArgs,
    /// Sort entries by favorite count
    #[arg(short, long)]
    pub nice: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    pub keywords: String,
    #[arg(short, long)]
    pub author: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub from: Option<Date>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub to: Option<Date>,
    #[arg(long)]
    pub nice_only: bool,
    /// Topic, Date or Count
    #[arg(short, long, default_value_t = SortOrder::Topic)]
    pub sort: SortOrder,
}

#[derive(Args)]
pub struct ChannelArgs {
    pub channel: String,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args)]
pub struct ThrowbackArgs {
    pub year: i32,
    #[command(flatten)]
    pub page: PageArgs,
}

fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
}
