//! Actions that handlers can return to communicate with the app

use crate::domain::nav::Tab;

/// Actions returned by key and command handlers to describe state changes
#[derive(Debug, Clone)]
pub enum Action {
    /// No action needed
    None,

    /// Navigate to a specific place
    Navigate(NavigateTarget),

    /// Copy text to the system clipboard
    Copy(String),

    /// Show notification in the status line
    Notify(String, NotifyLevel),

    /// Open the command line with an optional prefix
    OpenCommand(Option<String>),

    /// Close current overlay/popup
    CloseOverlay,

    /// Request quit
    Quit,
}

/// Navigation targets
#[derive(Debug, Clone)]
pub enum NavigateTarget {
    /// Select a dashboard tab
    Tab(Tab),
    /// Open a course session
    Course(String),
    /// Leave the current course session
    Back,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
