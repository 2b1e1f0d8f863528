pub mod catalog;
pub mod error;
pub mod group;
pub mod parser;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};
use url::Url;

pub use catalog::{
    find_channel, find_group, group_summaries, search_channels, search_groups, total_channels,
    GroupSummary, SearchResults, DEFAULT_SEARCH_LIMIT,
};
pub use error::FetchError;
pub use group::{group_channels, locale_cmp, CountryGroup};
pub use parser::{parse_channels, Channel, UNCATEGORIZED};

/// Country-indexed channel list published by iptv-org.
pub const DEFAULT_PLAYLIST_URL: &str = "https://iptv-org.github.io/iptv/index.country.m3u";

const DEFAULT_USERAGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36";

/// Parses playlist text into groups sorted by name, each holding its
/// channels sorted by name. Malformed entries are skipped.
pub fn parse(content: &str) -> Vec<CountryGroup> {
    let channels = parse_channels(content);
    let channel_count = channels.len();
    let groups = group_channels(channels);
    debug!(channels = channel_count, groups = groups.len(), "playlist parsed");
    groups
}

/// Fetches playlists from a URL or a local path and parses them.
#[derive(Debug, Clone)]
pub struct M3uParser {
    timeout: Duration,
    useragent: String,
}

impl Default for M3uParser {
    fn default() -> Self {
        M3uParser::new(None)
    }
}

impl M3uParser {
    pub fn new(timeout: Option<Duration>) -> M3uParser {
        let timeout = timeout.unwrap_or_else(|| Duration::from_secs(5));
        M3uParser {
            timeout,
            useragent: String::from(DEFAULT_USERAGENT),
        }
    }

    pub fn with_useragent(mut self, useragent: impl Into<String>) -> M3uParser {
        self.useragent = useragent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn useragent(&self) -> &str {
        &self.useragent
    }

    fn is_valid_url(&self, path: &str) -> bool {
        match Url::parse(path) {
            Ok(url) => matches!(url.scheme(), "http" | "https"),
            Err(_) => false,
        }
    }

    async fn read_url(&self, url: &str) -> Result<String, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.useragent.as_str())
            .build()?;
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// Returns the raw playlist text behind `path`, an http(s) URL or a file.
    pub async fn read_source(&self, path: &str) -> Result<String, FetchError> {
        if self.is_valid_url(path) {
            self.read_url(path).await
        } else {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| FetchError::Io {
                    path: path.to_string(),
                    source,
                })
        }
    }

    /// Reads and parses `path`. Any retrieval failure is logged and yields
    /// no groups.
    pub async fn parse_m3u(&self, path: &str) -> Vec<CountryGroup> {
        match self.read_source(path).await {
            Ok(content) => parse(&content),
            Err(e) => {
                error!(source = path, error = %e, "error fetching playlist");
                vec![]
            }
        }
    }
}
