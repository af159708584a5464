use serde::Serialize;

/// Titles and nicks suggested for a partial query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutocompleteResult {
    pub query: String,
    pub titles: Vec<String>,
    pub nicks: Vec<String>,
}

/// A topic as it appears in a title listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleSummary {
    pub url: String,
    pub title: String,
    /// Entry count badge. Absent when the listing renders no badge.
    pub count: Option<String>,
}

impl TitleSummary {
    pub fn new(origin: &str, href: &str, title: String, count: Option<String>) -> Self {
        Self {
            url: format!("{origin}{href}"),
            title,
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    pub name: String,
    pub title: String,
    pub url: String,
}

impl ChannelInfo {
    /// `name` is the link text as rendered, e.g. `#spor`.
    pub fn new(origin: &str, name: &str, title: String, href: &str) -> Self {
        let name = name.trim();
        Self {
            name: name.strip_prefix('#').unwrap_or(name).to_string(),
            title,
            url: format!("{origin}{href}"),
        }
    }
}

/// A single post within a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub entry_id: u64,
    pub author_id: u64,
    pub author: String,
    pub author_avatar: String,
    pub fav_count: u32,
    pub url: String,
    pub date: String,
    pub content: String,
}

impl Entry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: &str,
        entry_id: u64,
        author_id: u64,
        author: String,
        avatar: &str,
        fav_count: u32,
        date: String,
        content: String,
    ) -> Self {
        Self {
            entry_id,
            author_id,
            author,
            author_avatar: normalize_avatar(avatar),
            fav_count,
            url: format!("{origin}/entry/{entry_id}"),
            date,
            content,
        }
    }
}

/// Entries of a topic page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub query: String,
    pub entries: Vec<Entry>,
}

impl QueryResult {
    /// Plain content of every entry, in page order.
    pub fn contents(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.content.as_str()).collect()
    }
}

/// Avatars are usually served scheme-relative (`//img.host/a.jpg`).
pub fn normalize_avatar(src: &str) -> String {
    if src.starts_with("http") {
        src.to_string()
    } else {
        format!("https:{src}")
    }
}
