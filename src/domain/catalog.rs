//! Course catalog domain model
//!
//! The catalog is assembled by the filesystem scanner in
//! `infrastructure::catalog`; this module owns the validated shape and
//! the scan bookkeeping.

use thiserror::Error;

use crate::domain::progress::Chapter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub level: String,
    pub chapters: Vec<Chapter>,
}

impl Course {
    /// Chapter ids must be unique within a course.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::BTreeSet::new();
        for chapter in &self.chapters {
            if !seen.insert(chapter.id.as_str()) {
                return Err(CatalogError::DuplicateChapter {
                    course: self.id.clone(),
                    chapter: chapter.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate course id `{0}`")]
    DuplicateCourse(String),

    #[error("course `{course}` has duplicate chapter id `{chapter}`")]
    DuplicateChapter { course: String, chapter: String },
}

/// All known courses plus scan statistics.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    pub scanned_files: usize,
    pub errors: Vec<String>,
    pub scan_ms: u128,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validated course. Rejects duplicates of an already-known id.
    pub fn push(&mut self, course: Course) -> Result<(), CatalogError> {
        course.validate()?;
        if self.get(&course.id).is_some() {
            return Err(CatalogError::DuplicateCourse(course.id));
        }
        self.courses.push(course);
        Ok(())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn sort_by_id(&mut self) {
        self.courses.sort_by(|a, b| a.id.cmp(&b.id));
    }

    pub fn total_chapters(&self) -> usize {
        self.courses.iter().map(|course| course.chapters.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, chapter_ids: &[&str]) -> Course {
        Course {
            id: id.to_string(),
            title: id.to_uppercase(),
            summary: String::new(),
            level: "beginner".to_string(),
            chapters: chapter_ids
                .iter()
                .map(|cid| Chapter::new(*cid, *cid, "5 min"))
                .collect(),
        }
    }

    #[test]
    fn push_rejects_duplicate_course_id() {
        let mut catalog = CourseCatalog::new();
        catalog.push(course("basics", &["a", "b"])).unwrap();
        assert_eq!(
            catalog.push(course("basics", &["c"])),
            Err(CatalogError::DuplicateCourse("basics".into()))
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn push_rejects_duplicate_chapter_id() {
        let mut catalog = CourseCatalog::new();
        let err = catalog.push(course("basics", &["a", "a"])).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateChapter {
                course: "basics".into(),
                chapter: "a".into()
            }
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn lookup_and_totals() {
        let mut catalog = CourseCatalog::new();
        catalog.push(course("b", &["x"])).unwrap();
        catalog.push(course("a", &["y", "z"])).unwrap();
        catalog.sort_by_id();
        assert_eq!(catalog.courses()[0].id, "a");
        assert_eq!(catalog.total_chapters(), 3);
        assert!(catalog.get("b").is_some());
        assert!(catalog.get("c").is_none());
    }
}
