//! Test the course progress state machine end to end

use traderoom::domain::progress::{Chapter, CourseProgress, ProgressError};

fn course() -> CourseProgress {
    CourseProgress::new(vec![
        Chapter::new("c1", "Reading the tape", "10 min"),
        Chapter::new("c2", "Support and resistance", "14 min"),
        Chapter::new("c3", "Risk sizing", "9 min"),
    ])
    .unwrap()
}

#[test]
fn fresh_session_state() {
    let progress = course();
    assert_eq!(progress.active_chapter_id(), Some("c1"));
    assert_eq!(progress.completed_count(), 0);
    assert_eq!(progress.completion_percent(), 0);
    assert!(!progress.all_complete());
}

#[test]
fn advancing_through_the_course() {
    let mut progress = course();

    // First advance: c1 done, c2 active.
    progress.advance();
    assert_eq!(progress.active_chapter_id(), Some("c2"));
    assert!(progress.is_complete("c1"));
    assert!(!progress.is_complete("c2"));

    // Second advance: c2 done, c3 active.
    progress.advance();
    assert_eq!(progress.active_chapter_id(), Some("c3"));
    assert!(progress.is_complete("c2"));
    assert_eq!(progress.completion_percent(), 67);

    // Third advance: at the last chapter, nothing moves and nothing is
    // auto-completed. The last chapter needs an explicit mark.
    progress.advance();
    assert_eq!(progress.active_chapter_id(), Some("c3"));
    assert!(!progress.is_complete("c3"));
    assert_eq!(progress.completed_count(), 2);

    progress.mark_complete("c3");
    assert!(progress.all_complete());
    assert_eq!(progress.completion_percent(), 100);

    // Still no movement past the end afterwards.
    progress.advance();
    assert_eq!(progress.active_chapter_id(), Some("c3"));
}

#[test]
fn retreat_never_touches_completions() {
    let mut progress = course();

    // At the first chapter retreat is a no-op.
    progress.retreat();
    assert_eq!(progress.active_chapter_id(), Some("c1"));

    progress.advance();
    progress.advance();
    let completed_before = progress.completed_ids().clone();

    progress.retreat();
    assert_eq!(progress.active_chapter_id(), Some("c2"));
    assert_eq!(progress.completed_ids(), &completed_before);

    progress.retreat();
    progress.retreat();
    assert_eq!(progress.active_chapter_id(), Some("c1"));
    assert_eq!(progress.completed_ids(), &completed_before);
}

#[test]
fn direct_jumps_never_complete_anything() {
    let mut progress = course();

    progress.select_chapter("c3");
    assert_eq!(progress.active_chapter_id(), Some("c3"));
    assert_eq!(progress.completed_count(), 0);

    progress.select_chapter("c1");
    assert_eq!(progress.active_chapter_id(), Some("c1"));
    assert_eq!(progress.completed_count(), 0);
}

#[test]
fn mark_complete_twice_keeps_one_occurrence() {
    let mut progress = course();
    progress.mark_complete("c2");
    progress.mark_complete("c2");
    assert_eq!(progress.completed_count(), 1);
    assert!(progress.is_complete("c2"));
}

#[test]
fn empty_course_has_zero_percent_not_a_fault() {
    let progress = CourseProgress::new(Vec::new()).unwrap();
    assert_eq!(progress.completion_percent(), 0);
    assert_eq!(progress.active_chapter_id(), None);
}

#[test]
fn duplicate_chapter_ids_are_a_loud_caller_error() {
    let result = CourseProgress::new(vec![
        Chapter::new("c1", "One", "5 min"),
        Chapter::new("c2", "Two", "5 min"),
        Chapter::new("c1", "One again", "5 min"),
    ]);
    assert_eq!(result, Err(ProgressError::DuplicateChapter("c1".into())));
}

#[test]
fn unknown_chapter_ids_are_silently_ignored() {
    let mut progress = course();
    progress.select_chapter("c99");
    assert_eq!(progress.active_chapter_id(), Some("c1"));
    progress.mark_complete("c99");
    assert_eq!(progress.completed_count(), 0);
}

#[test]
fn percent_rounds_to_nearest_integer() {
    let mut progress = course();
    progress.mark_complete("c1");
    // 1/3 rounds to 33, 2/3 to 67.
    assert_eq!(progress.completion_percent(), 33);
    progress.mark_complete("c2");
    assert_eq!(progress.completion_percent(), 67);
}
