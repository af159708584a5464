use std::{
    path::Path,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use reqwest::{
    blocking::{Client, Response},
    header::{HeaderMap, HeaderName, HeaderValue},
};
use tracing::{Level, event};
use url::{ParseError, Url};

use crate::{
    config::SourConfig,
    errors::{SourError, SourResult},
    model::{AutocompleteResult, ChannelInfo, QueryResult, TitleSummary},
    parse::{parse_autocomplete, parse_channels, parse_entries, parse_titles, parse_top_rated},
    search::SearchOptions,
};

/// Blocking client for the site.
///
/// Every operation is a single GET followed by one extraction pass. Nothing is
/// retried or cached, and a non-success status always fails the call.
#[derive(Debug, Clone)]
pub struct SourClient {
    config: SourConfig,
    http: Client,
}

impl SourClient {
    pub fn new() -> SourResult<Self> {
        Self::with_config(SourConfig::default())
    }

    pub fn with_config(config: SourConfig) -> SourResult<Self> {
        Url::parse(config.origin())?;
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }
        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(proxy) = config.http_proxy.as_deref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &SourConfig {
        &self.config
    }

    /// Titles and nicks matching a partial query.
    pub fn autocomplete(&self, q: &str) -> SourResult<AutocompleteResult> {
        let params = vec![("q", q.to_string()), cache_buster()];
        let body = self.get_text(self.endpoint("/autocomplete/query")?, &params)?;
        parse_autocomplete(&body)
    }

    /// Current agenda titles.
    pub fn news(&self, page: u32) -> SourResult<Vec<TitleSummary>> {
        let params = vec![("p", page.to_string()), cache_buster()];
        let body = self.get_text(self.endpoint("/basliklar/gundem")?, &params)?;
        Ok(parse_titles(&body, self.config.origin()))
    }

    /// Entries of the topic matching `q`. With `nice`, entries come sorted by
    /// favorite count.
    pub fn query(&self, q: &str, page: u32, nice: bool) -> SourResult<QueryResult> {
        let mut params = vec![("q", q.to_string()), cache_buster(), ("p", page.to_string())];
        if nice {
            params.push(("a", "nice".to_string()));
        }
        let body = self.get_text(self.endpoint("/")?, &params)?;
        parse_entries(&body, self.config.origin(), q)
    }

    pub fn search(&self, options: &SearchOptions) -> SourResult<Vec<TitleSummary>> {
        let mut params = options.to_params();
        params.push(cache_buster());
        let body = self.get_text(self.endpoint("/basliklar/ara")?, &params)?;
        Ok(parse_titles(&body, self.config.origin()))
    }

    /// Most liked entries of yesterday. The listing carries no counts, and a page
    /// without any titled entry is a [`SourError::MalformedResponse`].
    pub fn top_rated(&self) -> SourResult<Vec<TitleSummary>> {
        let body = self.get_text(self.endpoint("/debe")?, &[cache_buster()])?;
        parse_top_rated(&body, self.config.origin())
    }

    pub fn list_channels(&self) -> SourResult<Vec<ChannelInfo>> {
        let body = self.get_text(self.endpoint("/kanallar")?, &[cache_buster()])?;
        parse_channels(&body, self.config.origin())
    }

    /// Titles nobody follows. This endpoint is fetched without a cache-buster.
    pub fn orphans(&self, page: u32) -> SourResult<Vec<TitleSummary>> {
        let params = vec![("p", page.to_string())];
        let body = self.get_text(self.endpoint("/basliklar/basiboslar")?, &params)?;
        Ok(parse_titles(&body, self.config.origin()))
    }

    /// Titles of a channel. Fails with [`SourError::ChannelNotFound`] on any
    /// non-success status.
    pub fn get_channel(&self, channel: &str, page: u32) -> SourResult<Vec<TitleSummary>> {
        let mut url = self.endpoint("/basliklar/kanal")?;
        url.path_segments_mut()
            .map_err(|_| SourError::Url(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(channel);
        let params = vec![("p", page.to_string()), cache_buster()];
        let response = self.send(url, &params)?;
        if !response.status().is_success() {
            return Err(SourError::ChannelNotFound(channel.to_string()));
        }
        let body = self.read_body(response)?;
        Ok(parse_titles(&body, self.config.origin()))
    }

    /// Titles from this day of the given year.
    pub fn throwback(&self, year: i32, page: u32) -> SourResult<Vec<TitleSummary>> {
        let params = vec![
            ("p", page.to_string()),
            cache_buster(),
            ("year", year.to_string()),
        ];
        let body = self.get_text(self.endpoint("/basliklar/tarihte-bugun")?, &params)?;
        Ok(parse_titles(&body, self.config.origin()))
    }

    fn endpoint(&self, path: &str) -> SourResult<Url> {
        let url = Url::parse(&format!("{}{path}", self.config.origin()))?;
        Ok(url)
    }

    fn send(&self, url: Url, params: &[(&'static str, String)]) -> SourResult<Response> {
        event!(Level::DEBUG, %url, ?params, "GET");
        let response = self.http.get(url).query(params).send()?;
        event!(
            Level::DEBUG,
            url = %response.url(),
            status = response.status().as_u16(),
            "response received"
        );
        Ok(response)
    }

    fn get_text(&self, url: Url, params: &[(&'static str, String)]) -> SourResult<String> {
        let response = self.send(url, params)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourError::Request {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        self.read_body(response)
    }

    fn read_body(&self, response: Response) -> SourResult<String> {
        let body = response.text()?;
        if let Some(path) = &self.config.dump_response {
            save_page(path, body.as_bytes())?;
        }
        Ok(body)
    }
}

/// Writes a raw response body to `path`, overwriting it.
pub fn save_page(path: impl AsRef<Path>, content: &[u8]) -> SourResult<()> {
    let path = path.as_ref();
    std::fs::write(path, content)?;
    event!(Level::DEBUG, path = %path.display(), "response saved");
    Ok(())
}

fn cache_buster() -> (&'static str, String) {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    ("_", millis.to_string())
}
