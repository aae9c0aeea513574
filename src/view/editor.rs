use serde::{Deserialize, Serialize};

use crate::enum_display_fromstr;
use crate::error::SafwaError;

/// Tabs of the admin project editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Info,
    Images,
    Sections,
    Units,
    Files,
}

enum_display_fromstr!(EditorTab, SafwaError::InvalidTab, {
    Info => "info",
    Images => "images",
    Sections => "sections",
    Units => "units",
    Files => "files",
});

impl EditorTab {
    pub fn label(self) -> &'static str {
        match self {
            EditorTab::Info => "بيانات المشروع",
            EditorTab::Images => "الصور والميديا",
            EditorTab::Sections => "الأقسام",
            EditorTab::Units => "الوحدات",
            EditorTab::Files => "الملفات",
        }
    }
}

/// Editor tab state. Every tab except `info` needs a saved project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    project_id: Option<String>,
    active: EditorTab,
}

impl EditorState {
    /// Editor for a new, unsaved project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor for an existing project.
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            active: EditorTab::Info,
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn active(&self) -> EditorTab {
        self.active
    }

    pub fn is_enabled(&self, tab: EditorTab) -> bool {
        tab == EditorTab::Info || self.project_id.is_some()
    }

    /// Switch tabs. Returns `false` and stays put for a disabled tab.
    pub fn select(&mut self, tab: EditorTab) -> bool {
        if !self.is_enabled(tab) {
            return false;
        }
        self.active = tab;
        true
    }

    /// Record a successful save. The first save of a new project moves on
    /// to the images tab.
    pub fn saved(&mut self, project_id: &str) {
        if self.project_id.is_none() {
            self.project_id = Some(project_id.to_string());
            self.active = EditorTab::Images;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_only_info_enabled() {
        let mut editor = EditorState::new();
        assert_eq!(editor.active(), EditorTab::Info);
        assert!(!editor.select(EditorTab::Units));
        assert_eq!(editor.active(), EditorTab::Info);
    }

    #[test]
    fn test_first_save_moves_to_images() {
        let mut editor = EditorState::new();
        editor.saved("p9");
        assert_eq!(editor.active(), EditorTab::Images);
        assert_eq!(editor.project_id(), Some("p9"));
        assert!(editor.select(EditorTab::Files));
    }

    #[test]
    fn test_later_saves_stay_put() {
        let mut editor = EditorState::for_project("p1");
        editor.saved("p1");
        assert_eq!(editor.active(), EditorTab::Info);
    }
}
