//! Completion reporting
//!
//! Joins the course catalog with persisted completions into the rows
//! shown on the Reports tab and written by the CSV exporter.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::catalog::{Course, CourseCatalog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub course_id: String,
    pub title: String,
    pub total_chapters: usize,
    pub completed_chapters: usize,
    pub percent: u8,
}

/// Rounded completion percentage for one course. Stale chapter ids in
/// the persisted set (content was edited since) are not counted.
pub fn course_percent(course: &Course, completed: Option<&BTreeSet<String>>) -> u8 {
    if course.chapters.is_empty() {
        return 0;
    }
    let done = completed_in_course(course, completed);
    let ratio = done as f64 / course.chapters.len() as f64;
    (ratio * 100.0).round() as u8
}

pub fn completion_report(
    catalog: &CourseCatalog,
    completed_by_course: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<ReportRow> {
    catalog
        .courses()
        .iter()
        .map(|course| {
            let completed = completed_by_course.get(&course.id);
            ReportRow {
                course_id: course.id.clone(),
                title: course.title.clone(),
                total_chapters: course.chapters.len(),
                completed_chapters: completed_in_course(course, completed),
                percent: course_percent(course, completed),
            }
        })
        .collect()
}

fn completed_in_course(course: &Course, completed: Option<&BTreeSet<String>>) -> usize {
    let Some(completed) = completed else {
        return 0;
    };
    course
        .chapters
        .iter()
        .filter(|chapter| completed.contains(&chapter.id))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::progress::Chapter;

    fn course(id: &str, chapter_ids: &[&str]) -> Course {
        Course {
            id: id.to_string(),
            title: id.to_string(),
            summary: String::new(),
            level: "beginner".to_string(),
            chapters: chapter_ids
                .iter()
                .map(|cid| Chapter::new(*cid, *cid, "5 min"))
                .collect(),
        }
    }

    #[test]
    fn percent_rounds_and_ignores_stale_ids() {
        let course = course("basics", &["a", "b", "c"]);
        let mut completed = BTreeSet::new();
        completed.insert("a".to_string());
        completed.insert("ghost".to_string());
        assert_eq!(course_percent(&course, Some(&completed)), 33);
        assert_eq!(course_percent(&course, None), 0);
    }

    #[test]
    fn empty_course_is_zero_percent() {
        let course = course("empty", &[]);
        assert_eq!(course_percent(&course, None), 0);
    }

    #[test]
    fn report_covers_every_course() {
        let mut catalog = CourseCatalog::new();
        catalog.push(course("a", &["x", "y"])).unwrap();
        catalog.push(course("b", &["z"])).unwrap();

        let mut completed = BTreeMap::new();
        completed.insert("b".to_string(), BTreeSet::from(["z".to_string()]));

        let rows = completion_report(&catalog, &completed);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].percent, 0);
        assert_eq!(rows[1].percent, 100);
        assert_eq!(rows[1].completed_chapters, 1);
    }
}
