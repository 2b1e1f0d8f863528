use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use m3u_grouper::{
    find_group, group_summaries, search_channels, search_groups, M3uParser, DEFAULT_PLAYLIST_URL,
    DEFAULT_SEARCH_LIMIT,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Fetch an M3U playlist and print its channels grouped by category as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Playlist URL or local file path
    #[arg(default_value = DEFAULT_PLAYLIST_URL)]
    source: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// User agent sent with the request
    #[arg(long)]
    user_agent: Option<String>,

    /// Only print the group with this exact name
    #[arg(long)]
    group: Option<String>,

    /// Filter groups by name, or channels when --group is given
    #[arg(long)]
    search: Option<String>,

    /// Maximum number of search matches to print
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: usize,

    /// Print group names and channel counts only
    #[arg(long)]
    summary: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "m3u_grouper=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut m3u_parser = M3uParser::new(Some(Duration::from_secs(args.timeout)));
    if let Some(useragent) = args.user_agent {
        m3u_parser = m3u_parser.with_useragent(useragent);
    }
    let groups = m3u_parser.parse_m3u(&args.source).await;

    if let Some(name) = &args.group {
        let Some(group) = find_group(&groups, name) else {
            bail!("no group named {:?}", name);
        };
        return match &args.search {
            Some(query) => print_json(&search_channels(group, query, args.limit), args.pretty),
            None => print_json(group, args.pretty),
        };
    }

    if let Some(query) = &args.search {
        return print_json(&search_groups(&groups, query, args.limit), args.pretty);
    }

    if args.summary {
        print_json(&group_summaries(&groups), args.pretty)
    } else {
        print_json(&groups, args.pretty)
    }
}
