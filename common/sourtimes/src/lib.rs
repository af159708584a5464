//! Client for eksisozluk.com: fetches listing, entry and search pages and
//! extracts titles, entries and channels from them.
//!
//! ```no_run
//! use sourtimes::SourClient;
//!
//! let client = SourClient::new()?;
//! for title in client.news(1)? {
//!     println!("{} ({:?}) {}", title.title, title.count, title.url);
//! }
//! # Ok::<(), sourtimes::SourError>(())
//! ```

mod client;
mod config;
mod errors;
mod model;
mod parse;
mod search;

pub use self::{
    client::{SourClient, save_page},
    config::{DEFAULT_ORIGIN, RESPONSE_DUMP_FILE, SourConfig},
    errors::{SourError, SourResult},
    model::{
        AutocompleteResult, ChannelInfo, Entry, QueryResult, TitleSummary, normalize_avatar,
    },
    search::{SearchOptions, SortOrder},
};
