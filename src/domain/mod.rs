//! Domain models and state machines
//!
//! Pure logic with no UI, storage, or runtime dependencies: role gating,
//! tab navigation, course progress, and the course catalog shape.

pub mod access;
pub mod catalog;
pub mod nav;
pub mod progress;
