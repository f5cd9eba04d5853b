//! JSON Export
//!
//! Writes a snapshot of the active course session, suitable for the
//! reward/XP collaborator that wants completion state.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::app::CourseSession;

#[derive(Debug, Serialize)]
struct SessionSnapshot {
    course_id: String,
    title: String,
    active_chapter: Option<String>,
    completion_percent: u8,
    all_complete: bool,
    chapters: Vec<ChapterSnapshot>,
}

#[derive(Debug, Serialize)]
struct ChapterSnapshot {
    id: String,
    title: String,
    duration: String,
    completed: bool,
}

/// Write the session snapshot to a JSON file
pub fn write_session(
    path: &Path,
    session: &CourseSession,
) -> Result<usize, Box<dyn std::error::Error>> {
    let snapshot = SessionSnapshot {
        course_id: session.course_id.clone(),
        title: session.title.clone(),
        active_chapter: session.progress.active_chapter_id().map(String::from),
        completion_percent: session.progress.completion_percent(),
        all_complete: session.progress.all_complete(),
        chapters: session
            .progress
            .chapters()
            .iter()
            .map(|chapter| ChapterSnapshot {
                id: chapter.id.clone(),
                title: chapter.title.clone(),
                duration: chapter.duration_label.clone(),
                completed: session.progress.is_complete(&chapter.id),
            })
            .collect(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &snapshot)?;
    Ok(snapshot.chapters.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::progress::{Chapter, CourseProgress};

    #[test]
    fn snapshot_reflects_session_state() {
        let chapters = vec![
            Chapter::new("c1", "One", "5 min"),
            Chapter::new("c2", "Two", "6 min"),
        ];
        let mut progress = CourseProgress::new(chapters).unwrap();
        progress.advance();
        let session = CourseSession {
            course_id: "basics".into(),
            title: "Basics".into(),
            progress,
        };

        let path = std::env::temp_dir().join(format!(
            "traderoom-session-{}.json",
            std::process::id()
        ));
        let count = write_session(&path, &session).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["active_chapter"], "c2");
        assert_eq!(value["completion_percent"], 50);
        assert_eq!(value["chapters"][0]["completed"], true);
        std::fs::remove_file(&path).ok();
    }
}
