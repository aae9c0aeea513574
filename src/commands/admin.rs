//! Admin commands: create, update and delete catalog records and their media.

use std::path::{Path, PathBuf};

use clap::Args;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store};
use crate::admin::media::{
    FILE_UPLOAD_FAILED, IMAGE_UPLOAD_FAILED, UploadTarget, add_gallery_images, add_project_files,
    delete_file, delete_image, set_image_kind, upload_file,
};
use crate::admin::projects::{ProjectDraft, save_project};
use crate::admin::sections::{SectionDraft, delete_section, save_section};
use crate::admin::units::{UnitDraft, delete_unit, save_unit};
use crate::admin::AdminMessage;
use crate::cli::OutputOptions;
use crate::display::{format_admin_message, format_unit_status};
use crate::error::{Result, SafwaError};
use crate::fetcher::catalog::{fetch_sections, fetch_units};
use crate::fetcher::fetch_one;
use crate::store::{ObjectStorage, Query, Table, Upload};
use crate::types::{ImageKind, Project, ProjectStatus, UnitStatus};
use crate::view::{DashboardState, EditorState};

/// Project form fields. Unset fields keep their current value on update.
#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// URL slug (default: derived from the name for new projects)
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Map link (any map URL or "lat,lng")
    #[arg(long)]
    pub link: Option<String>,

    /// Year construction starts (default: current year for new projects)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Status: upcoming, ongoing, completed
    #[arg(long, value_parser = crate::cli::parse_project_status)]
    pub status: Option<ProjectStatus>,

    /// Main image file to upload
    #[arg(long)]
    pub main_image: Option<PathBuf>,

    /// Brochure file to upload
    #[arg(long)]
    pub brochure: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct SectionArgs {
    /// Update this section instead of adding one
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Plan image file to upload
    #[arg(long)]
    pub plan_image: Option<PathBuf>,

    /// Brochure file to upload
    #[arg(long)]
    pub brochure: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct UnitArgs {
    /// Update this unit instead of adding one
    #[arg(long)]
    pub id: Option<String>,

    /// Unit number (required)
    #[arg(long)]
    pub number: Option<String>,

    /// Unit type (default: Apartment)
    #[arg(long = "type")]
    pub unit_type: Option<String>,

    /// Area in square meters
    #[arg(long)]
    pub size: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// Status: available, reserved, sold
    #[arg(long, value_parser = crate::cli::parse_unit_status)]
    pub status: Option<UnitStatus>,

    /// Section id ("" clears it)
    #[arg(long)]
    pub section: Option<String>,

    /// Model description
    #[arg(long)]
    pub details: Option<String>,

    /// Number of units of this model
    #[arg(long)]
    pub count: Option<String>,

    /// Unit image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

async fn upload_path<S: ObjectStorage>(storage: &S, target: UploadTarget, path: &Path) -> Result<String> {
    let upload = Upload::from_path(path).await?;
    upload_file(storage, target, &upload).await
}

/// Upload a local file for a form field. A failure is reported as a
/// message and leaves the field unset.
async fn upload_field<S: ObjectStorage>(
    storage: &S,
    target: UploadTarget,
    path: &Path,
    failure: &str,
    messages: &mut Vec<AdminMessage>,
) -> Option<String> {
    match upload_path(storage, target, path).await {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!("upload of {} failed: {e}", path.display());
            messages.push(AdminMessage::error(failure));
            None
        }
    }
}

async fn read_uploads(paths: &[PathBuf]) -> Result<Vec<Upload>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        uploads.push(Upload::from_path(path).await?);
    }
    Ok(uploads)
}

fn print_messages(
    json: serde_json::Value,
    messages: &[AdminMessage],
    extra: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let mut text: Vec<String> = messages.iter().map(format_admin_message).collect();
    text.extend(extra);
    CommandOutput::new(json).with_text(text.join("\n")).print(output)
}

async fn apply_project_args<S: ObjectStorage>(
    storage: &S,
    draft: &mut ProjectDraft,
    args: ProjectArgs,
    is_new: bool,
    messages: &mut Vec<AdminMessage>,
) {
    if let Some(name) = args.name {
        draft.set_name(&name, is_new);
    }
    if let Some(slug) = args.slug {
        draft.slug = slug;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(location) = args.location {
        draft.location = location;
    }
    if let Some(link) = args.link {
        draft.link = link;
    }
    if let Some(year) = args.start_year {
        draft.start_year = Some(year);
    }
    if let Some(status) = args.status {
        draft.status = status;
    }
    if let Some(path) = args.main_image
        && let Some(url) =
            upload_field(storage, UploadTarget::MainImage, &path, IMAGE_UPLOAD_FAILED, messages).await
    {
        draft.main_image = url;
    }
    if let Some(path) = args.brochure
        && let Some(url) =
            upload_field(storage, UploadTarget::Brochure, &path, FILE_UPLOAD_FAILED, messages).await
    {
        draft.brochure = url;
    }
}

pub async fn cmd_project_create(args: ProjectArgs, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let mut dashboard = DashboardState::new();
    dashboard.new_project();
    let mut editor = EditorState::new();

    if args.name.as_deref().is_none_or(|name| name.trim().is_empty()) {
        return Err(SafwaError::Validation("اسم المشروع مطلوب".to_string()));
    }
    let mut messages = Vec::new();
    let mut draft = ProjectDraft::default();
    apply_project_args(&store, &mut draft, args, true, &mut messages).await;

    let saved = save_project(&store, None, &draft).await?;
    editor.saved(&saved.project_id);
    messages.push(saved.message.clone());
    dashboard.close_form(&store).await;

    let next = format!(
        "{} {} ({})",
        "next:".dimmed(),
        editor.active().label(),
        editor.active()
    );
    print_messages(
        json!({
            "action": "project_create",
            "id": saved.project_id,
            "messages": messages,
            "next_tab": editor.active().to_string(),
        }),
        &messages,
        Some(format!("{} {}\n{next}", "id:".cyan(), saved.project_id)),
        output,
    )
}

pub async fn cmd_project_update(id: &str, args: ProjectArgs, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let project: Project = fetch_one(&store, Query::from(Table::Projects).eq("id", id))
        .await
        .ok_or_else(|| SafwaError::ProjectNotFound(id.to_string()))?;

    let mut dashboard = DashboardState::new();
    dashboard.edit_project(project.clone());

    let mut messages = Vec::new();
    let mut draft = ProjectDraft::from_project(&project);
    apply_project_args(&store, &mut draft, args, false, &mut messages).await;

    let saved = save_project(&store, Some(id), &draft).await?;
    messages.push(saved.message);
    dashboard.close_form(&store).await;

    print_messages(
        json!({ "action": "project_update", "id": id, "messages": messages }),
        &messages,
        None,
        output,
    )
}

pub async fn cmd_project_delete(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let mut dashboard = DashboardState::new();
    dashboard.refresh(&store).await;

    if !dashboard.projects().iter().any(|p| p.id == id) {
        return Err(SafwaError::ProjectNotFound(id.to_string()));
    }
    dashboard.delete_project(&store, id).await?;

    let remaining = dashboard.projects().len();
    CommandOutput::new(json!({
        "action": "project_delete",
        "id": id,
        "remaining": remaining,
    }))
    .with_text(format!("Deleted project {} ({remaining} remaining)", id.cyan()))
    .print(output)
}

pub async fn cmd_section_add(project_id: &str, args: SectionArgs, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;

    let mut draft = match &args.id {
        Some(id) => fetch_sections(&store, project_id)
            .await?
            .iter()
            .find(|s| &s.id == id)
            .map(SectionDraft::from_section)
            .ok_or_else(|| SafwaError::Validation(format!("section '{id}' not found in project")))?,
        None => SectionDraft::default(),
    };

    let mut messages = Vec::new();
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(path) = args.plan_image
        && let Some(url) =
            upload_field(&store, UploadTarget::Section, &path, FILE_UPLOAD_FAILED, &mut messages).await
    {
        draft.plan_image = url;
    }
    if let Some(path) = args.brochure
        && let Some(url) =
            upload_field(&store, UploadTarget::Section, &path, FILE_UPLOAD_FAILED, &mut messages).await
    {
        draft.brochure = url;
    }

    let id = save_section(&store, project_id, args.id.as_deref(), &draft).await?;
    print_messages(
        json!({ "action": "section_save", "id": id, "messages": messages }),
        &messages,
        Some(format!("Saved section {}", id.cyan())),
        output,
    )
}

pub async fn cmd_section_rm(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    delete_section(&store, id).await?;
    CommandOutput::new(json!({ "action": "section_delete", "id": id }))
        .with_text(format!("Deleted section {}", id.cyan()))
        .print(output)
}

pub async fn cmd_unit_add(project_id: &str, args: UnitArgs, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;

    let mut draft = match &args.id {
        Some(id) => fetch_units(&store, project_id)
            .await?
            .iter()
            .find(|u| &u.id == id)
            .map(UnitDraft::from_unit)
            .ok_or_else(|| SafwaError::Validation(format!("unit '{id}' not found in project")))?,
        None => UnitDraft::default(),
    };

    let mut messages = Vec::new();
    let fields = [
        (args.number, &mut draft.unit_number),
        (args.unit_type, &mut draft.unit_type),
        (args.size, &mut draft.size),
        (args.price, &mut draft.price),
        (args.section, &mut draft.section_id),
        (args.details, &mut draft.model_details),
        (args.count, &mut draft.model_count),
    ];
    for (value, field) in fields {
        if let Some(value) = value {
            *field = value;
        }
    }
    if let Some(status) = args.status {
        draft.status = status;
    }
    if let Some(path) = args.image
        && let Some(url) =
            upload_field(&store, UploadTarget::UnitImage, &path, FILE_UPLOAD_FAILED, &mut messages).await
    {
        draft.main_image = url;
    }

    let id = save_unit(&store, project_id, args.id.as_deref(), &draft).await?;
    print_messages(
        json!({ "action": "unit_save", "id": id, "messages": messages }),
        &messages,
        Some(format!("Saved unit {} {}", id.cyan(), format_unit_status(draft.status))),
        output,
    )
}

pub async fn cmd_unit_rm(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    delete_unit(&store, id).await?;
    CommandOutput::new(json!({ "action": "unit_delete", "id": id }))
        .with_text(format!("Deleted unit {}", id.cyan()))
        .print(output)
}

pub async fn cmd_image_add(project_id: &str, paths: &[PathBuf], output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let uploads = read_uploads(paths).await?;
    let added = add_gallery_images(&store, project_id, &uploads).await?;

    let text = added
        .iter()
        .map(|image| format!("{} {} {}", image.id.cyan(), image.kind.label(), image.image_url))
        .collect::<Vec<_>>()
        .join("\n");
    CommandOutput::new(json!({ "action": "image_add", "images": added }))
        .with_text(format!("{text}\nAdded {} image(s)", added.len()))
        .print(output)
}

pub async fn cmd_image_set_type(id: &str, kind: ImageKind, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    set_image_kind(&store, id, kind).await?;
    CommandOutput::new(json!({ "action": "image_set_type", "id": id, "type": kind }))
        .with_text(format!("Set image {} to {}", id.cyan(), kind.label()))
        .print(output)
}

pub async fn cmd_image_rm(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    delete_image(&store, id).await?;
    let message = AdminMessage::success("تم حذف الصورة بنجاح");
    print_messages(
        json!({ "action": "image_delete", "id": id, "messages": [&message] }),
        std::slice::from_ref(&message),
        None,
        output,
    )
}

pub async fn cmd_file_add(project_id: &str, paths: &[PathBuf], output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let uploads = read_uploads(paths).await?;
    let batch = add_project_files(&store, project_id, &uploads).await;

    let mut text: Vec<String> = batch
        .added
        .iter()
        .map(|file| format!("{} {} [{}]", file.id.cyan(), file.name, file.file_type))
        .collect();
    text.extend(
        batch
            .failed
            .iter()
            .map(|name| format_admin_message(&AdminMessage::error(format!("{FILE_UPLOAD_FAILED}: {name}")))),
    );

    CommandOutput::new(json!({
        "action": "file_add",
        "files": batch.added,
        "failed": batch.failed,
    }))
    .with_text(text.join("\n"))
    .print(output)
}

pub async fn cmd_file_rm(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    delete_file(&store, id).await?;
    CommandOutput::new(json!({ "action": "file_delete", "id": id }))
        .with_text(format!("Deleted file {}", id.cyan()))
        .print(output)
}
