//! Client-side filtering of loaded lists.
//!
//! Filters here are pure and synchronous: they take the loaded collection
//! and return the visible subsequence in source order. Several facets
//! compose with AND through [`ListFilter`].

use std::fmt;
use std::str::FromStr;

use crate::fetcher::catalog::UnitCard;
use crate::search::local::card_matches;
use crate::types::{Project, ProjectStatus};

/// Label of the "everything" option in facet pickers.
pub const ALL_LABEL: &str = "الكل";

/// A facet selection: everything, or only items whose field equals a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Facet::All => None,
            Facet::Only(v) => Some(v),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => write!(f, "all"),
            Facet::Only(v) => write!(f, "{v}"),
        }
    }
}

/// `all` (or the Arabic label) parses to [`Facet::All`]; anything else is
/// parsed as the value.
impl<T: FromStr> FromStr for Facet<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed == ALL_LABEL {
            Ok(Facet::All)
        } else {
            trimmed.parse().map(Facet::Only)
        }
    }
}

/// Items whose `key` equals the facet value, or every item for `All`.
pub fn filter_by_facet<'a, I, T, F>(items: &'a [I], facet: &Facet<T>, key: F) -> Vec<&'a I>
where
    T: PartialEq,
    F: Fn(&I) -> T,
{
    items.iter().filter(|item| facet.matches(&key(item))).collect()
}

type Predicate<I> = Box<dyn Fn(&I) -> bool + Send + Sync>;

/// A conjunction of predicates over list items.
pub struct ListFilter<I> {
    predicates: Vec<Predicate<I>>,
}

impl<I> Default for ListFilter<I> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<I: 'static> ListFilter<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: impl Fn(&I) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Add a facet on the field extracted by `key`. `All` adds nothing.
    pub fn with_facet<T, F>(self, facet: Facet<T>, key: F) -> Self
    where
        T: PartialEq + Send + Sync + 'static,
        F: Fn(&I) -> T + Send + Sync + 'static,
    {
        match facet {
            Facet::All => self,
            Facet::Only(wanted) => self.with(move |item| key(item) == wanted),
        }
    }

    pub fn matches(&self, item: &I) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    pub fn apply<'a>(&self, items: &'a [I]) -> Vec<&'a I> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

// ============================================================================
// Projects list
// ============================================================================

/// Status options offered by the public projects list, with their labels.
pub const PROJECT_STATUS_OPTIONS: [(Facet<ProjectStatus>, &str); 3] = [
    (Facet::All, ALL_LABEL),
    (Facet::Only(ProjectStatus::Ongoing), "قيد الإنشاء"),
    (Facet::Only(ProjectStatus::Completed), "مكتمل"),
];

pub fn filter_projects<'a>(projects: &'a [Project], status: &Facet<ProjectStatus>) -> Vec<&'a Project> {
    filter_by_facet(projects, status, |p| p.status)
}

// ============================================================================
// Unit gallery
// ============================================================================

pub const INITIAL_VISIBLE: usize = 8;
pub const LOAD_MORE_STEP: usize = 4;

/// Text, project facet and "load more" window over the unit gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitGalleryFilter {
    pub text: String,
    pub project: Facet<String>,
    visible: usize,
}

impl Default for UnitGalleryFilter {
    fn default() -> Self {
        Self {
            text: String::new(),
            project: Facet::All,
            visible: INITIAL_VISIBLE,
        }
    }
}

impl UnitGalleryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Select a project by its picker label; the "all" label clears the facet.
    pub fn select_project(&mut self, label: &str) {
        self.project = if label == ALL_LABEL {
            Facet::All
        } else {
            Facet::Only(label.to_string())
        };
    }

    /// Picker labels: "all" first, then distinct project names in first-seen order.
    pub fn project_options(cards: &[UnitCard]) -> Vec<String> {
        let mut options = vec![ALL_LABEL.to_string()];
        for card in cards {
            if !card.project_name.is_empty() && !options[1..].contains(&card.project_name) {
                options.push(card.project_name.clone());
            }
        }
        options
    }

    /// Every matching card, ignoring the load-more window.
    pub fn apply<'a>(&self, cards: &'a [UnitCard]) -> Vec<&'a UnitCard> {
        let text = self.text.clone();
        ListFilter::new()
            .with_facet(self.project.clone(), |card: &UnitCard| card.project_name.clone())
            .with(move |card| card_matches(card, &text))
            .apply(cards)
    }

    /// Matching cards inside the load-more window.
    pub fn visible<'a>(&self, cards: &'a [UnitCard]) -> Vec<&'a UnitCard> {
        let mut matching = self.apply(cards);
        matching.truncate(self.visible);
        matching
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn has_more(&self, cards: &[UnitCard]) -> bool {
        self.apply(cards).len() > self.visible
    }

    pub fn load_more(&mut self) {
        self.visible += LOAD_MORE_STEP;
    }

    /// Clear text and project facet.
    pub fn reset(&mut self) {
        self.text.clear();
        self.project = Facet::All;
    }
}
