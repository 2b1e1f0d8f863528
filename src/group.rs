use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::parser::Channel;

/// Channels sharing one `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryGroup {
    pub name: String,
    /// Same as `name` until playlists carry a real country code.
    pub code: String,
    pub channels: Vec<Channel>,
}

/// Buckets channels by category in first-seen order. Nothing is sorted here.
pub fn bucket_by_category(channels: Vec<Channel>) -> IndexMap<String, Vec<Channel>> {
    let mut buckets: IndexMap<String, Vec<Channel>> = IndexMap::new();

    for channel in channels {
        buckets
            .entry(channel.country.clone())
            .or_default()
            .push(channel);
    }
    buckets
}

/// Groups channels by category, sorts the members of each group by name and
/// then the groups themselves by name.
pub fn group_channels(channels: Vec<Channel>) -> Vec<CountryGroup> {
    let mut groups: Vec<CountryGroup> = bucket_by_category(channels)
        .into_iter()
        .map(|(name, mut channels)| {
            channels.sort_by(|a, b| locale_cmp(&a.name, &b.name));
            CountryGroup {
                code: name.clone(),
                name,
                channels,
            }
        })
        .collect();

    groups.sort_by(|a, b| locale_cmp(&a.name, &b.name));
    groups
}

thread_local! {
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new())
            .map_err(|e| warn!(error = ?e, "root collation unavailable, sorting by code point"))
            .ok();
}

/// Unicode collation with the root locale: punctuation before digits, digits
/// before letters, Latin before other scripts, then accents, then lower case
/// before upper case.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(name: &str, category: &str) -> Channel {
        Channel {
            id: name.to_string(),
            name: name.to_string(),
            logo: String::new(),
            url: format!("http://a.test/{}", name),
            category: category.to_string(),
            country: category.to_string(),
        }
    }

    #[test]
    fn test_bucket_keeps_first_seen_order() {
        let buckets = bucket_by_category(vec![
            channel("x", "B"),
            channel("y", "A"),
            channel("z", "B"),
        ]);
        let keys: Vec<&str> = buckets.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(buckets["B"].len(), 2);
        assert_eq!(buckets["B"][1].name, "z");
    }

    #[test]
    fn test_group_channels_sorted() {
        let groups = group_channels(vec![
            channel("Zeta", "Sports"),
            channel("alpha", "News"),
            channel("Beta", "Sports"),
            channel("Gamma", "News"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "News");
        assert_eq!(groups[0].code, "News");
        let names: Vec<&str> = groups[0].channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Gamma"]);
        let names: Vec<&str> = groups[1].channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Zeta"]);
    }

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zulu", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_locale_cmp_accents() {
        assert_eq!(locale_cmp("Écosse", "Espagne"), Ordering::Less);
        assert_eq!(locale_cmp("Ecosse", "Écosse"), Ordering::Less);
        assert_eq!(locale_cmp("Écosse", "Frankreich"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_lower_before_upper() {
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("A", "a"), Ordering::Greater);
        assert_eq!(locale_cmp("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn test_locale_cmp_symbols_before_digits_before_letters() {
        assert_eq!(locale_cmp("~Retro", "Alpha"), Ordering::Less);
        assert_eq!(locale_cmp("Fox [HD]", "Fox 1"), Ordering::Less);
        assert_eq!(locale_cmp("_Test", "1 Test"), Ordering::Less);
        assert_eq!(locale_cmp("24 News", "Alpha"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_latin_before_other_scripts() {
        assert_eq!(locale_cmp("Zambia", "Россия"), Ordering::Less);
        assert_eq!(locale_cmp("Zulu", "العربية"), Ordering::Less);
        assert_eq!(locale_cmp("Zulu", "中国"), Ordering::Less);
    }

    #[test]
    fn test_group_order_mixed_scripts() {
        let groups = group_channels(vec![
            channel("Первый", "Россия"),
            channel("ZNBC", "Zambia"),
            channel("Fox 1", "[Intl]"),
        ]);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["[Intl]", "Zambia", "Россия"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_channels(vec![]).is_empty());
    }
}
