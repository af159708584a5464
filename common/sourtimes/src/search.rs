use std::{fmt::Display, str::FromStr};

use time::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Topic,
    Date,
    Count,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Topic => "Topic",
            SortOrder::Date => "Date",
            SortOrder::Count => "Count",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "topic" => Ok(SortOrder::Topic),
            "date" => Ok(SortOrder::Date),
            "count" => Ok(SortOrder::Count),
            _ => Err(format!("unknown sort order `{s}`, expected Topic, Date or Count")),
        }
    }
}

/// Filters for the title search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub keywords: String,
    pub author: Option<String>,
    pub page: u32,
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
    pub nice_only: bool,
    pub sort: SortOrder,
}

impl SearchOptions {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            author: None,
            page: 1,
            from_date: None,
            to_date: None,
            nice_only: false,
            sort: SortOrder::default(),
        }
    }
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
    pub fn from_date(mut self, date: Date) -> Self {
        self.from_date = Some(date);
        self
    }
    pub fn to_date(mut self, date: Date) -> Self {
        self.to_date = Some(date);
        self
    }
    pub fn nice_only(mut self, nice_only: bool) -> Self {
        self.nice_only = nice_only;
        self
    }
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Form fields in the order the site sends them. Unset filters are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("SearchForm.Keywords", self.keywords.clone())];
        if let Some(author) = &self.author {
            params.push(("SearchForm.Author", author.clone()));
        }
        if let Some(date) = self.from_date {
            params.push(("SearchForm.When.From", format_date(date)));
        }
        if let Some(date) = self.to_date {
            params.push(("SearchForm.When.To", format_date(date)));
        }
        // sent lowercase, `true`/`false`
        params.push(("SearchForm.NiceOnly", self.nice_only.to_string()));
        params.push(("SearchForm.SortOrder", self.sort.to_string()));
        params.push(("page", self.page.to_string()));
        params
    }
}

fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
