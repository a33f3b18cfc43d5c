use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

/// Which of the sorted, deduplicated candidates to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    All,
    First,
    Last,
    /// Any other name. Selecting with it yields a single empty placeholder.
    Unrecognized(String),
}

impl SelectionPolicy {
    /// Case-insensitive parse; never fails.
    pub fn parse(which: &str) -> Self {
        match which.to_lowercase().as_str() {
            "all" => Self::All,
            "first" => Self::First,
            "last" => Self::Last,
            _ => Self::Unrecognized(which.to_owned()),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Unrecognized(name) => write!(f, "{name:?} (unrecognized)"),
        }
    }
}

/// Deduplicates and sorts `matches`, then picks from them according to
/// `policy`. Empty input always gives empty output.
pub fn select(matches: Vec<String>, policy: &SelectionPolicy) -> Vec<String> {
    debug!("Which to pick: {policy}");

    let mut sorted: Vec<String> = matches.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if sorted.is_empty() {
        return sorted;
    }

    let picked = match policy {
        SelectionPolicy::All => sorted,
        SelectionPolicy::First => {
            sorted.truncate(1);
            sorted
        }
        SelectionPolicy::Last => sorted.pop().into_iter().collect(),
        SelectionPolicy::Unrecognized(name) => {
            warn!("unrecognized selection {name:?}; expected all, first or last");
            vec![String::new()]
        }
    };

    debug!("Picked string(s): {picked:?}");
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidates() -> Vec<String> {
        strings(&["First", "Second", "Third", "Last"])
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(SelectionPolicy::parse("ALL"), SelectionPolicy::All);
        assert_eq!(SelectionPolicy::parse("First"), SelectionPolicy::First);
        assert_eq!("lAsT".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::Last);
        assert_eq!(
            SelectionPolicy::parse("latest"),
            SelectionPolicy::Unrecognized("latest".into())
        );
    }

    #[test]
    fn all_is_sorted_and_distinct() {
        let picked = select(strings(&["b", "a", "c", "a", "b"]), &SelectionPolicy::All);
        assert_eq!(picked, strings(&["a", "b", "c"]));
    }

    #[test]
    fn all_is_idempotent() {
        let once = select(candidates(), &SelectionPolicy::All);
        let twice = select(once.clone(), &SelectionPolicy::All);
        assert_eq!(once, twice);
    }

    #[test]
    fn first_and_last_follow_byte_order() {
        assert_eq!(select(candidates(), &SelectionPolicy::First), vec!["First"]);
        assert_eq!(select(candidates(), &SelectionPolicy::Last), vec!["Third"]);
        // uppercase sorts before lowercase
        assert_eq!(select(strings(&["apple", "Zebra"]), &SelectionPolicy::First), vec!["Zebra"]);
    }

    #[test]
    fn policy_names_ignore_case() {
        for (upper, lower) in [("ALL", "all"), ("FIRST", "first"), ("LAST", "last")] {
            assert_eq!(
                select(candidates(), &SelectionPolicy::parse(upper)),
                select(candidates(), &SelectionPolicy::parse(lower))
            );
        }
    }

    #[test]
    fn unrecognized_policy_yields_placeholder() {
        assert_eq!(select(candidates(), &SelectionPolicy::parse("some")), vec![""]);
        assert_eq!(select(candidates(), &SelectionPolicy::parse("")), vec![""]);
    }

    #[test]
    fn empty_input_is_empty_for_every_policy() {
        for which in ["all", "first", "last", "some", ""] {
            assert!(select(Vec::new(), &SelectionPolicy::parse(which)).is_empty());
        }
    }

    #[test]
    fn dedups_repeated_listing_entries() {
        let matches = strings(&["updates.20161031", "updates.20161031"]);
        assert_eq!(select(matches, &SelectionPolicy::All), vec!["updates.20161031"]);
    }
}
