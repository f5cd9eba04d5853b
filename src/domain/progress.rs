//! Course progress tracking
//!
//! One [`CourseProgress`] per open course session: an ordered chapter
//! list, the set of completed chapter ids, and the active chapter. All
//! operations are synchronous local mutations; persistence belongs to
//! whoever owns the session.

use std::collections::BTreeSet;

use thiserror::Error;

/// One ordered unit of course content. `title` and `duration_label` are
/// opaque to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub duration_label: String,
}

impl Chapter {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        duration_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_label: duration_label.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    /// Chapter ids must be unique within a course; a duplicate is a
    /// caller bug and is surfaced instead of silently absorbed.
    #[error("duplicate chapter id `{0}`")]
    DuplicateChapter(String),
}

/// Progress state machine for a single course session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseProgress {
    chapters: Vec<Chapter>,
    completed: BTreeSet<String>,
    active: Option<String>,
}

impl CourseProgress {
    /// Start a fresh session: first chapter active, nothing completed.
    /// An empty chapter list is accepted as a degenerate session.
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, ProgressError> {
        let mut seen = BTreeSet::new();
        for chapter in &chapters {
            if !seen.insert(chapter.id.as_str()) {
                return Err(ProgressError::DuplicateChapter(chapter.id.clone()));
            }
        }
        let active = chapters.first().map(|chapter| chapter.id.clone());
        Ok(Self {
            chapters,
            completed: BTreeSet::new(),
            active,
        })
    }

    /// Re-apply previously persisted completions. Ids that do not belong
    /// to this course are dropped, keeping the completed-set invariant.
    pub fn restore(&mut self, completed: impl IntoIterator<Item = String>) {
        for id in completed {
            if self.index_of(&id).is_some() {
                self.completed.insert(id);
            }
        }
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn active_chapter_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_chapter(&self) -> Option<&Chapter> {
        self.active_index().map(|idx| &self.chapters[idx])
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_deref().and_then(|id| self.index_of(id))
    }

    /// Direct jump. Unknown ids are ignored: the valid id set is caller
    /// controlled, so a miss is a caller bug, not a user-facing error.
    /// Never touches the completed set.
    pub fn select_chapter(&mut self, id: &str) {
        if self.index_of(id).is_some() {
            self.active = Some(id.to_string());
        }
    }

    /// Idempotent: marking an already-complete chapter changes nothing.
    /// Ids outside this course are ignored.
    pub fn mark_complete(&mut self, id: &str) {
        if self.index_of(id).is_some() {
            self.completed.insert(id.to_string());
        }
    }

    /// Complete the current chapter, then move to the next one. Leaving a
    /// chapter forward implies having finished it; this is the only
    /// operation that couples completion with movement. No-op at the last
    /// chapter; there is no wraparound.
    pub fn advance(&mut self) {
        let Some(idx) = self.active_index() else {
            return;
        };
        if idx + 1 >= self.chapters.len() {
            return;
        }
        let current = self.chapters[idx].id.clone();
        self.completed.insert(current);
        self.active = Some(self.chapters[idx + 1].id.clone());
    }

    /// Move to the previous chapter. Reviewing a finished chapter is
    /// side-effect free: the completed set is never altered. No-op at the
    /// first chapter.
    pub fn retreat(&mut self) {
        let Some(idx) = self.active_index() else {
            return;
        };
        if idx == 0 {
            return;
        }
        self.active = Some(self.chapters[idx - 1].id.clone());
    }

    /// Rounded completion percentage in `[0, 100]`. An empty course is 0.
    pub fn completion_percent(&self) -> u8 {
        if self.chapters.is_empty() {
            return 0;
        }
        let ratio = self.completed.len() as f64 / self.chapters.len() as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn completed_ids(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn all_complete(&self) -> bool {
        !self.chapters.is_empty() && self.completed.len() == self.chapters.len()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.chapters.iter().position(|chapter| chapter.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_chapters() -> Vec<Chapter> {
        vec![
            Chapter::new("c1", "Reading the tape", "10 min"),
            Chapter::new("c2", "Support and resistance", "14 min"),
            Chapter::new("c3", "Risk sizing", "9 min"),
        ]
    }

    #[test]
    fn fresh_session_starts_at_first_chapter() {
        let progress = CourseProgress::new(three_chapters()).unwrap();
        assert_eq!(progress.active_chapter_id(), Some("c1"));
        assert_eq!(progress.completed_count(), 0);
        assert_eq!(progress.completion_percent(), 0);
    }

    #[test]
    fn duplicate_chapter_ids_are_rejected() {
        let chapters = vec![
            Chapter::new("c1", "One", "5 min"),
            Chapter::new("c1", "One again", "5 min"),
        ];
        assert_eq!(
            CourseProgress::new(chapters),
            Err(ProgressError::DuplicateChapter("c1".into()))
        );
    }

    #[test]
    fn advance_completes_current_then_moves() {
        let mut progress = CourseProgress::new(three_chapters()).unwrap();
        progress.advance();
        assert_eq!(progress.active_chapter_id(), Some("c2"));
        assert!(progress.is_complete("c1"));
        assert!(!progress.is_complete("c2"));
    }

    #[test]
    fn advance_never_passes_the_last_chapter() {
        let mut progress = CourseProgress::new(three_chapters()).unwrap();
        progress.advance();
        progress.advance();
        assert_eq!(progress.active_chapter_id(), Some("c3"));

        // At the boundary: position and completions both stay put.
        progress.advance();
        assert_eq!(progress.active_chapter_id(), Some("c3"));
        assert!(!progress.is_complete("c3"));
        assert_eq!(progress.completion_percent(), 67);
    }

    #[test]
    fn retreat_is_movement_only() {
        let mut progress = CourseProgress::new(three_chapters()).unwrap();
        progress.retreat();
        assert_eq!(progress.active_chapter_id(), Some("c1"));

        progress.select_chapter("c3");
        progress.retreat();
        assert_eq!(progress.active_chapter_id(), Some("c2"));
        assert_eq!(progress.completed_count(), 0);
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut progress = CourseProgress::new(three_chapters()).unwrap();
        progress.mark_complete("c2");
        progress.mark_complete("c2");
        assert_eq!(progress.completed_count(), 1);
        assert_eq!(progress.completion_percent(), 33);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut progress = CourseProgress::new(three_chapters()).unwrap();
        progress.select_chapter("c9");
        assert_eq!(progress.active_chapter_id(), Some("c1"));
        progress.mark_complete("c9");
        assert_eq!(progress.completed_count(), 0);
    }

    #[test]
    fn empty_course_is_a_zero_percent_noop() {
        let mut progress = CourseProgress::new(Vec::new()).unwrap();
        assert_eq!(progress.completion_percent(), 0);
        assert!(!progress.all_complete());
        progress.advance();
        progress.retreat();
        assert_eq!(progress.active_chapter_id(), None);
    }

    #[test]
    fn restore_drops_foreign_ids() {
        let mut progress = CourseProgress::new(three_chapters()).unwrap();
        progress.restore(vec!["c2".to_string(), "ghost".to_string()]);
        assert!(progress.is_complete("c2"));
        assert_eq!(progress.completed_count(), 1);
    }
}
