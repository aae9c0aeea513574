//! Free-text search over the catalog.
//!
//! - [`global`] runs the site-wide search against the data store
//! - [`session`] debounces keystrokes in front of it and publishes outcomes
//! - [`local`] narrows an already-loaded unit gallery by text

pub mod global;
pub mod local;
pub mod session;

use serde::Serialize;

use crate::types::{Project, Unit};

pub use global::{evaluate, search_catalog};
pub use session::SearchSession;

/// Shown before anything has been typed.
pub const PROMPT_MESSAGE: &str = "ابدأ الكتابة للبحث...";

/// A search term with surrounding whitespace removed. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// `None` for empty or whitespace-only input.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A unit matched by the global search, with its owning project's name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnitHit {
    #[serde(flatten)]
    pub unit: Unit,
    /// Empty when the project could not be found
    pub project_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResults {
    pub projects: Vec<Project>,
    pub units: Vec<UnitHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.units.is_empty()
    }
}

/// What the search panel shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Nothing typed yet
    #[default]
    Prompt,
    Loading,
    /// The search ran and matched nothing
    NoResults { term: String },
    Results(SearchResults),
}

impl SearchOutcome {
    pub fn results(&self) -> Option<&SearchResults> {
        match self {
            SearchOutcome::Results(results) => Some(results),
            _ => None,
        }
    }

    /// Text for the non-result states.
    pub fn message(&self) -> Option<String> {
        match self {
            SearchOutcome::Prompt => Some(PROMPT_MESSAGE.to_string()),
            SearchOutcome::Loading => None,
            SearchOutcome::NoResults { term } => Some(format!("لا توجد نتائج مطابقة لـ «{term}»")),
            SearchOutcome::Results(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_trims() {
        assert_eq!(SearchTerm::parse("  فيلا ").unwrap().as_str(), "فيلا");
        assert!(SearchTerm::parse("").is_none());
        assert!(SearchTerm::parse(" \t\n").is_none());
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(SearchOutcome::Prompt.message().unwrap(), PROMPT_MESSAGE);
        assert!(SearchOutcome::Loading.message().is_none());

        let none = SearchOutcome::NoResults {
            term: "نزهه".to_string(),
        };
        assert_eq!(none.message().unwrap(), "لا توجد نتائج مطابقة لـ «نزهه»");
        assert!(none.results().is_none());
    }
}
