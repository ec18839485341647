use super::call::func;
use crate::{Error, ErrorContext};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Listing tabs offered by the marketplace front page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Popular,
    /// Alias of `Popular`.
    Best,
    Hot,
    Random,
    New,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Popular, Tab::Best, Tab::Hot, Tab::Random, Tab::New];

    /// Remote operation backing this tab. Hot has no dedicated trending call
    /// yet and is served from the newest entries.
    pub fn func(self) -> &'static str {
        match self {
            Tab::Popular | Tab::Best => func::LIST_POPULAR_ENTRIES,
            Tab::Hot | Tab::New => func::LIST_NEW_ENTRIES,
            Tab::Random => func::LIST_RANDOM_ENTRIES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Popular => "popular",
            Tab::Best => "best",
            Tab::Hot => "hot",
            Tab::Random => "random",
            Tab::New => "new",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Popular | Tab::Best => "Popular",
            Tab::Hot => "Hot right now",
            Tab::Random => "Random picks",
            Tab::New => "New",
        }
    }

    /// Lenient parse used for query-string style input: anything unknown is `Popular`.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popular" => Ok(Tab::Popular),
            "best" => Ok(Tab::Best),
            "hot" => Ok(Tab::Hot),
            "random" => Ok(Tab::Random),
            "new" => Ok(Tab::New),
            other => Err(Error::validation_with_context(
                "unknown tab",
                ErrorContext::new()
                    .with_field_path("tab")
                    .with_details(format!("got '{}', expected popular|best|hot|random|new", other)),
            )),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a search query is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    #[default]
    Name,
    User,
    Tag,
}

impl SearchMode {
    pub fn func(self) -> &'static str {
        match self {
            SearchMode::User => func::LIST_ENTRIES_BY_CREATOR,
            SearchMode::Name | SearchMode::Tag => func::SEARCH_ENTRIES,
        }
    }

    /// Arguments sent for `query` in this mode. Key order is significant for
    /// cache keys, so it is fixed here.
    pub fn args(self, query: &str) -> Value {
        match self {
            SearchMode::Name => json!({ "query": query }),
            SearchMode::Tag => json!({ "query": query, "tag": query }),
            SearchMode::User => json!({ "creatorId": query }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Name => "name",
            SearchMode::User => "user",
            SearchMode::Tag => "tag",
        }
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SearchMode::Name),
            "user" => Ok(SearchMode::User),
            "tag" => Ok(SearchMode::Tag),
            other => Err(Error::validation_with_context(
                "unknown search mode",
                ErrorContext::new()
                    .with_field_path("search.mode")
                    .with_details(format!("got '{}', expected name|user|tag", other)),
            )),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_funcs() {
        assert_eq!(Tab::Popular.func(), "listPopularEntries");
        assert_eq!(Tab::Best.func(), "listPopularEntries");
        assert_eq!(Tab::Hot.func(), "listNewEntries");
        assert_eq!(Tab::New.func(), "listNewEntries");
        assert_eq!(Tab::Random.func(), "listRandomEntries");
    }

    #[test]
    fn test_tab_parse() {
        for tab in Tab::ALL {
            assert_eq!(tab.as_str().parse::<Tab>().unwrap(), tab);
        }
        assert_eq!(" HOT ".parse::<Tab>().unwrap(), Tab::Hot);
        assert!("trending".parse::<Tab>().is_err());
        assert_eq!(Tab::parse_or_default("trending"), Tab::Popular);
    }

    #[test]
    fn test_search_mode_args() {
        assert_eq!(
            serde_json::to_string(&SearchMode::Name.args("sort")).unwrap(),
            r#"{"query":"sort"}"#
        );
        assert_eq!(
            serde_json::to_string(&SearchMode::Tag.args("audio")).unwrap(),
            r#"{"query":"audio","tag":"audio"}"#
        );
        assert_eq!(
            serde_json::to_string(&SearchMode::User.args("u-42")).unwrap(),
            r#"{"creatorId":"u-42"}"#
        );
        assert_eq!(SearchMode::User.func(), "listEntriesByCreator");
        assert_eq!(SearchMode::Tag.func(), "searchEntries");
    }

    #[test]
    fn test_unknown_mode_is_validation_error() {
        let err = "owner".parse::<SearchMode>().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("search.mode")
        );
    }
}
