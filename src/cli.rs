use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use crate::commands::{ProjectArgs, SectionArgs, UnitArgs};
use crate::filter::Facet;
use crate::types::{ImageKind, ProjectStatus, UnitStatus};
use crate::view::ProjectTab;

const VALID_PROJECT_STATUSES: &[&str] = &["upcoming", "ongoing", "completed"];
const VALID_UNIT_STATUSES: &[&str] = &["available", "reserved", "sold"];
const VALID_IMAGE_KINDS: &[&str] = &["interior", "exterior", "plan"];
const VALID_TABS: &[&str] = &["overview", "sections", "units", "gallery", "files"];

#[derive(Parser)]
#[command(name = "safwa")]
#[command(about = "Real-estate listings catalog and admin console")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output settings shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> crate::error::Result<()> {
        let output = OutputOptions { json: self.json };
        self.command.run(output).await
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects, newest first
    #[command(visible_alias = "ls")]
    Projects {
        /// Status filter: all, upcoming, ongoing, completed
        #[arg(long, default_value = "all", value_parser = parse_status_facet)]
        status: Facet<ProjectStatus>,
    },

    /// Show a project's detail page
    #[command(visible_alias = "p")]
    Project {
        /// Project ID
        id: String,

        /// Tab: overview, sections, units, gallery, files
        #[arg(long, value_parser = parse_tab)]
        tab: Option<ProjectTab>,

        /// Show the units of one section (opens the units tab)
        #[arg(long)]
        section: Option<String>,

        /// Open one gallery image by its number (opens the gallery tab)
        #[arg(long)]
        image: Option<usize>,
    },

    /// Browse unit models across all projects
    #[command(visible_alias = "u")]
    Units {
        /// Project name filter ("all" for every project)
        #[arg(long, default_value = "all")]
        project: Facet<String>,

        /// Text filter over unit type, details and project
        #[arg(long)]
        search: Option<String>,

        /// Number of units to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search projects and units (reads queries from stdin without text)
    #[command(visible_alias = "s")]
    Search {
        /// Search text
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Resolve a pasted map link into embed and open links
    MapLink {
        /// Map link or "lat,lng"
        #[arg(long)]
        link: Option<String>,

        /// Location text used when the link is missing or unrecognized
        #[arg(long)]
        location: Option<String>,
    },

    /// Print the WhatsApp contact link
    Whatsapp {
        /// Prefilled message (default: configured contact message)
        #[arg(long)]
        message: Option<String>,
    },

    /// Manage catalog content
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Create, update or delete projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Manage a project's sections
    Section {
        #[command(subcommand)]
        action: SectionAction,
    },
    /// Manage a project's units
    Unit {
        #[command(subcommand)]
        action: UnitAction,
    },
    /// Manage a project's gallery images
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// Manage a project's downloadable files
    File {
        #[command(subcommand)]
        action: FileAction,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Create {
        #[command(flatten)]
        args: ProjectArgs,
    },
    /// Update a project
    Update {
        /// Project ID
        id: String,

        #[command(flatten)]
        args: ProjectArgs,
    },
    /// Delete a project
    Delete {
        /// Project ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Add a section, or update one with --id
    Add {
        /// Project ID
        project_id: String,

        #[command(flatten)]
        args: SectionArgs,
    },
    /// Delete a section
    Rm {
        /// Section ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UnitAction {
    /// Add a unit, or update one with --id
    Add {
        /// Project ID
        project_id: String,

        #[command(flatten)]
        args: UnitArgs,
    },
    /// Delete a unit
    Rm {
        /// Unit ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ImageAction {
    /// Upload gallery images
    Add {
        /// Project ID
        project_id: String,

        /// Image files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Change an image's type
    SetType {
        /// Image ID
        id: String,

        /// Type: interior, exterior, plan
        #[arg(value_parser = parse_image_kind)]
        kind: ImageKind,
    },
    /// Delete a gallery image
    Rm {
        /// Image ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum FileAction {
    /// Upload downloadable files
    Add {
        /// Project ID
        project_id: String,

        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a file
    Rm {
        /// File ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (backend.url, backend.key, contact.whatsapp_phone, ...)
        key: String,
        /// Value to set
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (backend.url, backend.key, contact.whatsapp_phone, ...)
        key: String,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self, output: OutputOptions) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_config_get, cmd_config_set, cmd_config_show, cmd_file_add, cmd_file_rm,
            cmd_image_add, cmd_image_rm, cmd_image_set_type, cmd_map_link, cmd_project,
            cmd_project_create, cmd_project_delete, cmd_project_update, cmd_projects,
            cmd_search, cmd_section_add, cmd_section_rm, cmd_unit_add, cmd_unit_rm, cmd_units,
            cmd_whatsapp,
        };

        match self {
            Commands::Projects { status } => cmd_projects(status, output).await,
            Commands::Project {
                id,
                tab,
                section,
                image,
            } => cmd_project(&id, tab, section, image, output).await,
            Commands::Units {
                project,
                search,
                limit,
            } => cmd_units(project, search, limit, output).await,
            Commands::Search { text } => cmd_search(&text.join(" "), output).await,

            Commands::MapLink { link, location } => {
                cmd_map_link(link.as_deref(), location.as_deref(), output)
            }
            Commands::Whatsapp { message } => cmd_whatsapp(message.as_deref(), output),

            Commands::Admin { action } => match action {
                AdminAction::Project { action } => match action {
                    ProjectAction::Create { args } => cmd_project_create(args, output).await,
                    ProjectAction::Update { id, args } => {
                        cmd_project_update(&id, args, output).await
                    }
                    ProjectAction::Delete { id } => cmd_project_delete(&id, output).await,
                },
                AdminAction::Section { action } => match action {
                    SectionAction::Add { project_id, args } => {
                        cmd_section_add(&project_id, args, output).await
                    }
                    SectionAction::Rm { id } => cmd_section_rm(&id, output).await,
                },
                AdminAction::Unit { action } => match action {
                    UnitAction::Add { project_id, args } => {
                        cmd_unit_add(&project_id, args, output).await
                    }
                    UnitAction::Rm { id } => cmd_unit_rm(&id, output).await,
                },
                AdminAction::Image { action } => match action {
                    ImageAction::Add { project_id, paths } => {
                        cmd_image_add(&project_id, &paths, output).await
                    }
                    ImageAction::SetType { id, kind } => cmd_image_set_type(&id, kind, output).await,
                    ImageAction::Rm { id } => cmd_image_rm(&id, output).await,
                },
                AdminAction::File { action } => match action {
                    FileAction::Add { project_id, paths } => {
                        cmd_file_add(&project_id, &paths, output).await
                    }
                    FileAction::Rm { id } => cmd_file_rm(&id, output).await,
                },
            },

            Commands::Config { action } => match action {
                ConfigAction::Show => cmd_config_show(output),
                ConfigAction::Set { key, value } => cmd_config_set(&key, &value, output),
                ConfigAction::Get { key } => cmd_config_get(&key, output),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

pub(crate) fn parse_project_status(s: &str) -> Result<ProjectStatus, String> {
    parse_with_validation(
        s,
        |v| ProjectStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_PROJECT_STATUSES,
    )
}

pub(crate) fn parse_unit_status(s: &str) -> Result<UnitStatus, String> {
    parse_with_validation(
        s,
        |v| UnitStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_UNIT_STATUSES,
    )
}

fn parse_status_facet(s: &str) -> Result<Facet<ProjectStatus>, String> {
    let mut valid_values = vec!["all"];
    valid_values.extend(VALID_PROJECT_STATUSES);
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        &valid_values,
    )
}

fn parse_tab(s: &str) -> Result<ProjectTab, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "tab",
        VALID_TABS,
    )
}

fn parse_image_kind(s: &str) -> Result<ImageKind, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "image type",
        VALID_IMAGE_KINDS,
    )
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "safwa", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_project_status_case_insensitive() {
        assert_eq!(parse_project_status("ONGOING").unwrap(), ProjectStatus::Ongoing);
        assert!(parse_project_status("done").is_err());
    }

    #[test]
    fn test_parse_status_facet_accepts_all() {
        assert_eq!(parse_status_facet("all").unwrap(), Facet::All);
        assert_eq!(parse_status_facet("الكل").unwrap(), Facet::All);
        assert_eq!(
            parse_status_facet("completed").unwrap(),
            Facet::Only(ProjectStatus::Completed)
        );
    }

    #[test]
    fn test_parse_status_error_message_lists_valid_values() {
        let err = parse_status_facet("typo").unwrap_err();
        assert!(
            err.contains("all") && err.contains("upcoming") && err.contains("completed"),
            "Error should list valid status values, got: {err}"
        );
    }

    #[test]
    fn test_parse_tab_and_image_kind() {
        assert_eq!(parse_tab("gallery").unwrap(), ProjectTab::Gallery);
        assert!(parse_tab("map").is_err());
        assert_eq!(parse_image_kind("Exterior").unwrap(), ImageKind::Exterior);
        assert!(parse_image_kind("video").unwrap_err().contains("interior"));
    }

    #[test]
    fn test_parse_unit_status() {
        assert_eq!(parse_unit_status("sold").unwrap(), UnitStatus::Sold);
        assert!(parse_unit_status("gone").is_err());
    }

    #[test]
    fn test_search_text_is_collected() {
        let cli = Cli::try_parse_from(["safwa", "search", "villa", "garden"]).unwrap();
        match cli.command {
            Commands::Search { text } => assert_eq!(text.join(" "), "villa garden"),
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_project_image_flag() {
        let cli = Cli::try_parse_from(["safwa", "project", "p1", "--image", "2"]).unwrap();
        match cli.command {
            Commands::Project { id, image, tab, .. } => {
                assert_eq!(id, "p1");
                assert_eq!(image, Some(2));
                assert_eq!(tab, None);
            }
            _ => panic!("expected project"),
        }
    }

    #[test]
    fn test_global_json_flag() {
        let cli = Cli::try_parse_from(["safwa", "projects", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_admin_unit_add_parses_fields() {
        let cli = Cli::try_parse_from([
            "safwa", "admin", "unit", "add", "p1", "--number", "A-1", "--type", "Villa",
            "--status", "reserved",
        ])
        .unwrap();
        match cli.command {
            Commands::Admin {
                action:
                    AdminAction::Unit {
                        action: UnitAction::Add { project_id, args },
                    },
            } => {
                assert_eq!(project_id, "p1");
                assert_eq!(args.number.as_deref(), Some("A-1"));
                assert_eq!(args.unit_type.as_deref(), Some("Villa"));
                assert_eq!(args.status, Some(UnitStatus::Reserved));
            }
            _ => panic!("expected admin unit add"),
        }
    }
}
