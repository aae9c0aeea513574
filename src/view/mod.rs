//! View state for the project page and the admin dashboard.
//!
//! These types hold which named view is active and the facet selections
//! shared between views. Transitions happen only on explicit selection.

pub mod dashboard;
pub mod editor;
pub mod gallery;
pub mod project;

pub use dashboard::{DashboardState, DashboardView};
pub use editor::{EditorState, EditorTab};
pub use gallery::{GalleryImage, Lightbox, LightboxView, gallery_images, open_lightbox};
pub use project::{ProjectDetailState, ProjectTab};
