//! Search-as-you-type filtering for the selectors.
//!
//! Matching is a case-insensitive substring test against each option's
//! searchable fields. Order is preserved and an empty query matches all.

use crate::models::{Action, CountryOption, Situation};

/// An option that can be found by free-text search.
pub trait Searchable {
    /// Fields the query is matched against.
    fn search_terms(&self) -> Vec<&str>;

    /// `needle` must already be lowercased.
    fn matches_lowercase(
        &self,
        needle: &str,
    ) -> bool {
        self.search_terms()
            .iter()
            .any(|term| term.to_lowercase().contains(needle))
    }
}

impl Searchable for CountryOption {
    fn search_terms(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.code.as_str(),
            self.continent.as_str(),
        ]
    }
}

impl Searchable for Action {
    fn search_terms(&self) -> Vec<&str> {
        vec![self.label(), self.code()]
    }
}

impl Searchable for Situation {
    fn search_terms(&self) -> Vec<&str> {
        vec![self.label(), self.code()]
    }
}

/// Options matching `query`, in their original order.
pub fn filter_options<'a, T: Searchable>(
    options: &'a [T],
    query: &str,
) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return options.iter().collect();
    }
    options
        .iter()
        .filter(|option| option.matches_lowercase(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn country(
        id: i64,
        name: &str,
        code: &str,
        continent: &str,
    ) -> CountryOption {
        CountryOption {
            id,
            name: name.to_string(),
            code: code.to_string(),
            emoji: String::new(),
            continent: continent.to_string(),
        }
    }

    fn countries() -> Vec<CountryOption> {
        vec![
            country(1, "New Zealand", "nz", "Oceania"),
            country(2, "Netherlands", "nl", "Europe"),
            country(3, "France", "fr", "Europe"),
            country(4, "Australia", "au", "Oceania"),
        ]
    }

    fn names(found: &[&CountryOption]) -> Vec<String> {
        found.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let countries = countries();

        let found = filter_options(&countries, "   ");

        assert_eq!(found.len(), 4);
        assert_eq!(found[0].name, "New Zealand");
    }

    #[test]
    fn matches_substring_case_insensitively() {
        let countries = countries();

        let found = filter_options(&countries, "NE");

        assert_eq!(names(&found), vec!["New Zealand", "Netherlands"]);
    }

    #[test]
    fn matches_code_and_continent() {
        let countries = countries();

        assert_eq!(names(&filter_options(&countries, "fr")), vec!["France"]);
        assert_eq!(
            names(&filter_options(&countries, "oceania")),
            vec!["New Zealand", "Australia"]
        );
    }

    #[test]
    fn no_match_returns_empty() {
        let countries = countries();

        assert!(filter_options(&countries, "atlantis").is_empty());
    }

    #[test]
    fn filters_actions_by_label() {
        let found = filter_options(Action::all(), "company");

        assert_eq!(found, vec![&Action::CreateCompany]);
    }

    #[test]
    fn filters_situations_by_code() {
        let found = filter_options(Situation::all(), "business_");

        assert_eq!(found, vec![&Situation::BusinessFounder]);
    }
}
