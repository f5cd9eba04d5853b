//! Export Module
//!
//! Provides CSV and JSON export for dashboard data.
//!
//! - 'e' key (or :export) triggers export based on the active tab
//! - Reports / Members / Portfolio → CSV
//! - An open course session → JSON
//! - Files saved under the platform data dir in exports/

mod csv_export;
mod json_export;

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use directories::ProjectDirs;

use crate::app::App;
use crate::core::{Action, NotifyLevel};
use crate::domain::nav::Tab;
use crate::modules::reports;

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = ProjectDirs::from("io", "traderoom", "traderoom")
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from(".traderoom").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the data behind the active tab
pub fn export_current_view(app: &App) -> Action {
    match app.active_tab() {
        Tab::Courses if app.session.is_some() => export_session(app),
        Tab::Reports | Tab::Overview | Tab::Courses => export_report(app),
        Tab::Members => export_members(app),
        Tab::Portfolio => export_portfolio(app),
        _ => Action::Notify(
            "Nothing to export in this view".to_string(),
            NotifyLevel::Warn,
        ),
    }
}

fn export_report(app: &App) -> Action {
    let Some(catalog) = app.catalog.as_ref() else {
        return Action::Notify("No catalog loaded yet".to_string(), NotifyLevel::Warn);
    };
    let rows = reports::completion_report(catalog, &app.completed_by_course);
    if rows.is_empty() {
        return Action::Notify("No courses to report on".to_string(), NotifyLevel::Warn);
    }

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let filename = generate_filename("progress", "csv");
    let path = export_dir.join(&filename);

    match csv_export::write_report(&path, &rows) {
        Ok(count) => Action::Notify(
            format!("Exported {} courses to exports/{}", count, filename),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

fn export_members(app: &App) -> Action {
    if app.members.is_empty() {
        return Action::Notify("No members to export".to_string(), NotifyLevel::Warn);
    }

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let filename = generate_filename("members", "csv");
    let path = export_dir.join(&filename);

    match csv_export::write_members(&path, &app.members) {
        Ok(count) => Action::Notify(
            format!("Exported {} members to exports/{}", count, filename),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

fn export_portfolio(app: &App) -> Action {
    if app.tracked.is_empty() {
        return Action::Notify("No tracked symbols to export".to_string(), NotifyLevel::Warn);
    }

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let filename = generate_filename("portfolio", "csv");
    let path = export_dir.join(&filename);

    match csv_export::write_portfolio(&path, &app.tracked, &app.notes) {
        Ok(count) => Action::Notify(
            format!("Exported {} symbols to exports/{}", count, filename),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}

fn export_session(app: &App) -> Action {
    let Some(session) = app.session.as_ref() else {
        return Action::Notify("No open course session".to_string(), NotifyLevel::Warn);
    };

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let filename = generate_filename(&format!("session-{}", session.course_id), "json");
    let path = export_dir.join(&filename);

    match json_export::write_session(&path, session) {
        Ok(count) => Action::Notify(
            format!("Exported {} chapters to exports/{}", count, filename),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}
