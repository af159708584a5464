use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::SourResult;

pub const DEFAULT_ORIGIN: &str = "https://eksisozluk.com";

/// Conventional file name for the response dump hook.
pub const RESPONSE_DUMP_FILE: &str = "response.html";

const USER_AGENT: &str = "Mozilla/5.0 (X11 Linux x86_64 rv: 102.0) Gecko/20100101 Firefox/102.0";

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

/// Browser-like headers sent with every request.
///
/// `Host`, `Accept-Encoding` and `Connection` are set by reqwest itself; an
/// explicit `Accept-Encoding` would stop it from decompressing bodies.
fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("User-Agent".into(), USER_AGENT.into());
    headers.insert(
        "Accept".into(),
        "application/json, text/javascript, */*".into(),
    );
    headers.insert("Accept-Language".into(), "en-US, en".into());
    headers.insert("X-Requested-With".into(), "XMLHttpRequest".into());
    headers
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourConfig {
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
    #[serde(rename = "httpProxy")]
    pub http_proxy: Option<String>,
    /// Raw response bodies are written here before parsing.
    #[serde(rename = "dumpResponse")]
    pub dump_response: Option<PathBuf>,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for SourConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            timeout_secs: Default::default(),
            http_proxy: Default::default(),
            dump_response: Default::default(),
            headers: default_headers(),
        }
    }
}

impl SourConfig {
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
    pub fn from_toml_str(s: &str) -> SourResult<Self> {
        let config: Self = toml::from_str(s)?;
        Ok(config)
    }
    pub fn load(path: impl AsRef<Path>) -> SourResult<Self> {
        let file = std::fs::read_to_string(path)?;
        Self::from_toml_str(&file)
    }
    /// Origin without trailing `/`, ready to be prefixed to site-relative hrefs.
    pub fn origin(&self) -> &str {
        self.origin.strip_suffix('/').unwrap_or(&self.origin)
    }
}
