use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Marker that opens a channel metadata line.
pub const EXTINF: &str = "#EXTINF:";
/// Group used for channels without a `group-title`.
pub const UNCATEGORIZED: &str = "Uncategorized";

static TVG_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"tvg-id="(.*?)""#).unwrap());
static TVG_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"tvg-name="(.*?)""#).unwrap());
static LOGO_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"tvg-logo="(.*?)""#).unwrap());
static CATEGORY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"group-title="(.*?)""#).unwrap());

/// One playable stream entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub url: String,
    pub category: String,
    /// Mirrors `category`; the playlist has no separate country attribute.
    pub country: String,
}

/// Attributes of an `#EXTINF` line that has not been paired with an address yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extinf {
    pub id: String,
    pub tvg_name: String,
    pub name: String,
    pub logo: String,
    pub category: String,
    pub country: String,
}

impl Extinf {
    /// Parses the text following the `#EXTINF:` marker.
    pub fn parse(info: &str) -> Extinf {
        let name = split_outside_quotes(info)
            .last()
            .map(|segment| strip_quotes(segment.trim()).to_string())
            .unwrap_or_default();

        let tvg_id = capture(&TVG_ID_REGEX, info);
        let group_title = capture(&CATEGORY_REGEX, info);
        let category = if group_title.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            group_title
        };

        Extinf {
            id: if tvg_id.is_empty() { name.clone() } else { tvg_id },
            tvg_name: capture(&TVG_NAME_REGEX, info),
            logo: capture(&LOGO_REGEX, info),
            country: category.clone(),
            category,
            name,
        }
    }

    fn into_channel(self, url: &str) -> Channel {
        Channel {
            id: self.id,
            name: self.name,
            logo: self.logo,
            url: url.to_string(),
            category: self.category,
            country: self.country,
        }
    }
}

/// Line scanner state: either nothing is pending, or a metadata line waits
/// for its stream address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    AwaitingMetadata,
    AwaitingAddress(Extinf),
}

impl ScanState {
    /// Feeds one trimmed line. Returns a channel when the line completes a
    /// pending entry.
    pub fn feed(&mut self, line: &str) -> Option<Channel> {
        if let Some(info) = line.strip_prefix(EXTINF) {
            if let ScanState::AwaitingAddress(dropped) = self {
                trace!(name = %dropped.name, "metadata line without address dropped");
            }
            *self = ScanState::AwaitingAddress(Extinf::parse(info));
            return None;
        }

        if !line.starts_with("http") {
            return None;
        }

        match std::mem::take(self) {
            ScanState::AwaitingAddress(pending) if !pending.name.is_empty() => {
                Some(pending.into_channel(line))
            }
            state => {
                trace!(url = line, "address line without named metadata ignored");
                *self = state;
                None
            }
        }
    }
}

/// Scans a playlist and returns its channels in the order they appear.
pub fn parse_channels(content: &str) -> Vec<Channel> {
    let mut state = ScanState::default();
    content
        .lines()
        .filter_map(|line| state.feed(trim_line(line)))
        .collect()
}

/// Trims whitespace and byte order marks, which `str::trim` keeps.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Splits on commas followed by an even number of double quotes, so commas
/// inside a quoted span stay in their segment.
pub fn split_outside_quotes(info: &str) -> Vec<&str> {
    let mut quotes_after = info.matches('"').count();
    let mut segments = vec![];
    let mut start = 0;

    for (idx, ch) in info.char_indices() {
        match ch {
            '"' => quotes_after -= 1,
            ',' if quotes_after % 2 == 0 => {
                segments.push(&info[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    segments.push(&info[start..]);
    segments
}

fn strip_quotes(segment: &str) -> &str {
    segment
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(segment)
}

fn capture(regex: &Regex, info: &str) -> String {
    regex
        .captures(info)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
