//! Lookups over parsed groups, for consumers that pick a group and then a
//! channel out of it.

use serde::Serialize;

use crate::group::CountryGroup;
use crate::parser::Channel;

/// How many matches a search lists before collapsing the rest into a count.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub code: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults<'a, T> {
    pub matches: Vec<&'a T>,
    /// Matches left out because of the limit.
    pub remaining: usize,
}

pub fn find_group<'a>(groups: &'a [CountryGroup], name: &str) -> Option<&'a CountryGroup> {
    groups.iter().find(|group| group.name == name)
}

pub fn find_channel<'a>(group: &'a CountryGroup, url: &str) -> Option<&'a Channel> {
    group.channels.iter().find(|channel| channel.url == url)
}

pub fn total_channels(groups: &[CountryGroup]) -> usize {
    groups.iter().map(|group| group.channels.len()).sum()
}

pub fn group_summaries(groups: &[CountryGroup]) -> Vec<GroupSummary> {
    groups
        .iter()
        .map(|group| GroupSummary {
            name: group.name.clone(),
            code: group.code.clone(),
            count: group.channels.len(),
        })
        .collect()
}

/// Case-insensitive substring search over group names. An empty query
/// matches everything.
pub fn search_groups<'a>(
    groups: &'a [CountryGroup],
    query: &str,
    limit: usize,
) -> SearchResults<'a, CountryGroup> {
    search(groups, query, limit, |group| group.name.as_str())
}

/// Same as [`search_groups`], over the channel names of one group.
pub fn search_channels<'a>(
    group: &'a CountryGroup,
    query: &str,
    limit: usize,
) -> SearchResults<'a, Channel> {
    search(&group.channels, query, limit, |channel| channel.name.as_str())
}

fn search<'a, T, F>(items: &'a [T], query: &str, limit: usize, label: F) -> SearchResults<'a, T>
where
    F: Fn(&T) -> &str,
{
    let needle = query.to_lowercase();
    let mut matches: Vec<&T> = items
        .iter()
        .filter(|item| label(*item).to_lowercase().contains(&needle))
        .collect();

    let remaining = matches.len().saturating_sub(limit);
    matches.truncate(limit);
    SearchResults { matches, remaining }
}
