use serde::{Deserialize, Serialize};

use crate::enum_display_fromstr;
use crate::error::SafwaError;
use crate::filter::Facet;
use crate::types::Unit;

/// Tabs of the project detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTab {
    #[default]
    Overview,
    Sections,
    Units,
    Gallery,
    Files,
}

enum_display_fromstr!(ProjectTab, SafwaError::InvalidTab, {
    Overview => "overview",
    Sections => "sections",
    Units => "units",
    Gallery => "gallery",
    Files => "files",
});

impl ProjectTab {
    pub const ALL: [ProjectTab; 5] = [
        ProjectTab::Overview,
        ProjectTab::Sections,
        ProjectTab::Units,
        ProjectTab::Gallery,
        ProjectTab::Files,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectTab::Overview => "نظرة عامة",
            ProjectTab::Sections => "أقسام المشروع",
            ProjectTab::Units => "نماذج الوحدات",
            ProjectTab::Gallery => "معرض الصور",
            ProjectTab::Files => "البروشور والملفات",
        }
    }
}

/// Tab selection and section facet of one project page.
///
/// The section facet belongs to the page, not to a tab: switching tabs
/// never resets it. The Sections tab remembers which section it last sent
/// to the Units tab independently of the facet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDetailState {
    active_tab: ProjectTab,
    section: Facet<String>,
    last_viewed_section: Option<String>,
}

impl ProjectDetailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> ProjectTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: ProjectTab) {
        self.active_tab = tab;
    }

    pub fn section_facet(&self) -> &Facet<String> {
        &self.section
    }

    pub fn last_viewed_section(&self) -> Option<&str> {
        self.last_viewed_section.as_deref()
    }

    /// "View units in this section" from the Sections tab.
    pub fn view_units_in_section(&mut self, section_id: &str) {
        self.section = Facet::Only(section_id.to_string());
        self.last_viewed_section = Some(section_id.to_string());
        self.active_tab = ProjectTab::Units;
    }

    /// Section picker of the Units tab. Does not change the active tab.
    pub fn set_section_facet(&mut self, facet: Facet<String>) {
        self.section = facet;
    }

    /// Units in the selected section, or all units.
    pub fn visible_units<'a>(&self, units: &'a [Unit]) -> Vec<&'a Unit> {
        match self.section.value() {
            None => units.iter().collect(),
            Some(section) => units
                .iter()
                .filter(|u| u.section_id.as_deref() == Some(section.as_str()))
                .collect(),
        }
    }
}
