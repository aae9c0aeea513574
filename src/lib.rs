pub mod admin;
pub mod cli;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod links;
pub mod macros;
pub mod search;
pub mod store;
pub mod types;
pub mod utils;
pub mod view;

#[cfg(test)]
mod test_guards;

pub use config::Config;
pub use error::{Result, SafwaError};
pub use store::{DataStore, MemoryStore, ObjectStorage, StoreClient};
pub use types::{
    ImageKind, Project, ProjectFile, ProjectImage, ProjectSection, ProjectStatus, Unit, UnitStatus,
};
