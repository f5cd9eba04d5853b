use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use crate::core::{Action, Command, NavigateTarget, NotifyLevel};
use crate::domain::access::{Identity, Role};
use crate::domain::catalog::CourseCatalog;
use crate::domain::nav::{visible_tabs, NavigationState, Tab};
use crate::domain::progress::CourseProgress;
use crate::modules::reports;
use crate::store::{
    MemberRecord, PatternCard, PaymentRecord, PortfolioStore, ProgressStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: NotifyLevel,
    pub since: Instant,
}

/// One open course: the tracker plus enough metadata to render and
/// persist it. Created when a course is opened, discarded on close.
#[derive(Debug, Clone)]
pub struct CourseSession {
    pub course_id: String,
    pub title: String,
    pub progress: CourseProgress,
}

/// Work queued for the background worker; drained by the event loop.
#[derive(Debug, Clone)]
pub enum PendingOp {
    FetchProfile,
    ReloadCatalog,
    RefreshRoster,
    Invite { name: String },
    Promote { name: String, role: Role },
    Charge { member: String, amount_cents: i64 },
}

#[derive(Debug)]
pub struct App {
    /// The signed-in member; role is unresolved until the profile
    /// collaborator answers.
    pub identity: Identity,
    pub nav: NavigationState,

    pub catalog: Option<CourseCatalog>,
    pub selected_course: usize,
    pub session: Option<CourseSession>,
    pub chapter_cursor: usize,
    /// Persisted completions per course, kept in sync with the session.
    pub completed_by_course: BTreeMap<String, BTreeSet<String>>,
    pub last_course: Option<String>,

    pub members: Vec<MemberRecord>,
    pub payments: Vec<PaymentRecord>,
    pub selected_member: usize,
    pub selected_payment: usize,

    pub tracked: BTreeSet<String>,
    pub notes: BTreeMap<String, String>,
    pub patterns: Vec<PatternCard>,
    pub selected_symbol: usize,
    pub selected_pattern: usize,

    pub progress_store: Option<ProgressStore>,
    pub portfolio_store: Option<PortfolioStore>,

    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub profile_open: bool,
    pub should_quit: bool,

    pending_ops: Vec<PendingOp>,
}

impl App {
    pub fn new(identity: Identity, nav: NavigationState) -> Self {
        Self {
            identity,
            nav,
            catalog: None,
            selected_course: 0,
            session: None,
            chapter_cursor: 0,
            completed_by_course: BTreeMap::new(),
            last_course: None,
            members: Vec::new(),
            payments: Vec::new(),
            selected_member: 0,
            selected_payment: 0,
            tracked: BTreeSet::new(),
            notes: BTreeMap::new(),
            patterns: Vec::new(),
            selected_symbol: 0,
            selected_pattern: 0,
            progress_store: None,
            portfolio_store: None,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            help_open: false,
            profile_open: false,
            should_quit: false,
            pending_ops: Vec::new(),
        }
    }

    // === Navigation ===

    /// Resolved on every read so a role that arrives later is picked up
    /// without any explicit re-sync.
    pub fn active_tab(&self) -> Tab {
        self.nav.resolve(&self.identity)
    }

    pub fn visible_tabs(&self) -> Vec<Tab> {
        visible_tabs(&self.identity)
    }

    pub fn select_tab(&mut self, id: &str) {
        if let Err(err) = self.nav.select_tab(id) {
            self.set_status(
                format!("Session store unavailable: {err:#}"),
                NotifyLevel::Warn,
            );
        }
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        let tabs = self.visible_tabs();
        if tabs.is_empty() {
            return;
        }
        let active = self.active_tab();
        let pos = tabs.iter().position(|tab| *tab == active).unwrap_or(0);
        let next = if forward {
            (pos + 1) % tabs.len()
        } else {
            (pos + tabs.len() - 1) % tabs.len()
        };
        self.select_tab(tabs[next].id());
    }

    pub fn share_link(&self) -> String {
        format!("traderoom://dashboard?tab={}", self.active_tab().id())
    }

    // === Status line ===

    pub fn set_status(&mut self, text: impl Into<String>, level: NotifyLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, NotifyLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
        self.clamp_selections();
    }

    // === Background event ingestion ===

    pub fn apply_profile(&mut self, identity: Identity) {
        let was_loading = self.identity.role.is_none();
        self.identity = identity;
        if was_loading {
            self.set_status(
                format!(
                    "Signed in as {} ({})",
                    self.identity.display_name,
                    self.identity.role_title()
                ),
                NotifyLevel::Info,
            );
        }
    }

    pub fn apply_catalog(&mut self, catalog: CourseCatalog) {
        if catalog.errors.is_empty() {
            self.set_status(
                format!("{} courses loaded", catalog.len()),
                NotifyLevel::Info,
            );
        } else {
            self.set_status(
                format!(
                    "{} courses loaded, {} file(s) skipped",
                    catalog.len(),
                    catalog.errors.len()
                ),
                NotifyLevel::Warn,
            );
        }
        self.catalog = Some(catalog);
        self.clamp_selections();
    }

    pub fn apply_roster(&mut self, members: Vec<MemberRecord>, payments: Vec<PaymentRecord>) {
        self.members = members;
        self.payments = payments;
        self.clamp_selections();
    }

    pub fn apply_runtime_error(&mut self, message: String) {
        self.set_status(message, NotifyLevel::Error);
    }

    // === Course sessions ===

    pub fn open_course(&mut self, id: &str) {
        let Some(course) = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.get(id))
            .cloned()
        else {
            self.set_status(format!("Unknown course: {id}"), NotifyLevel::Warn);
            return;
        };

        let mut progress = match CourseProgress::new(course.chapters.clone()) {
            Ok(progress) => progress,
            Err(err) => {
                // Content bug, not a user error: surface it loudly.
                self.set_status(format!("Course rejected: {err}"), NotifyLevel::Error);
                return;
            }
        };

        let mut store_warning = None;
        if let Some(store) = self.progress_store.as_ref() {
            match store.load_completed(&course.id) {
                Ok(completed) => progress.restore(completed),
                Err(err) => store_warning = Some(format!("Progress load failed: {err:#}")),
            }
            if let Err(err) = store.set_last_course(&course.id) {
                store_warning = Some(format!("Progress save failed: {err:#}"));
            }
        }
        if let Some(warning) = store_warning {
            self.set_status(warning, NotifyLevel::Warn);
        }

        self.completed_by_course
            .insert(course.id.clone(), progress.completed_ids().clone());
        self.chapter_cursor = progress.active_index().unwrap_or(0);
        self.last_course = Some(course.id.clone());
        self.session = Some(CourseSession {
            course_id: course.id,
            title: course.title,
            progress,
        });
    }

    pub fn open_selected_course(&mut self) {
        let Some(id) = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.courses().get(self.selected_course))
            .map(|course| course.id.clone())
        else {
            return;
        };
        self.open_course(&id);
    }

    /// Reopen the most recently opened course, if any.
    pub fn continue_last_course(&mut self) {
        let Some(id) = self.last_course.clone() else {
            self.set_status("No course in progress yet", NotifyLevel::Info);
            return;
        };
        self.select_tab(Tab::Courses.id());
        self.open_course(&id);
    }

    pub fn close_session(&mut self) {
        self.session = None;
        self.chapter_cursor = 0;
    }

    pub fn session_select_cursor_chapter(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(chapter) = session.progress.chapters().get(self.chapter_cursor) else {
            return;
        };
        let id = chapter.id.clone();
        session.progress.select_chapter(&id);
    }

    pub fn session_select_chapter(&mut self, id: &str) {
        if let Some(session) = self.session.as_mut() {
            session.progress.select_chapter(id);
            self.align_cursor_to_active();
        }
    }

    pub fn session_advance(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.progress.advance();
        }
        self.align_cursor_to_active();
        self.persist_session_progress();
    }

    pub fn session_retreat(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.progress.retreat();
        }
        self.align_cursor_to_active();
    }

    pub fn session_mark_active_complete(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(id) = session.progress.active_chapter_id().map(String::from) else {
            return;
        };
        session.progress.mark_complete(&id);
        let done = session.progress.all_complete();
        self.persist_session_progress();
        if done {
            self.set_status("Course complete, nice work", NotifyLevel::Info);
        }
    }

    fn align_cursor_to_active(&mut self) {
        if let Some(session) = self.session.as_ref() {
            if let Some(idx) = session.progress.active_index() {
                self.chapter_cursor = idx;
            }
        }
    }

    fn persist_session_progress(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.completed_by_course.insert(
            session.course_id.clone(),
            session.progress.completed_ids().clone(),
        );
        if let Some(store) = self.progress_store.as_ref() {
            let completed: Vec<&str> = session
                .progress
                .completed_ids()
                .iter()
                .map(|id| id.as_str())
                .collect();
            if let Err(err) = store.record_completed(&session.course_id, completed) {
                self.set_status(format!("Progress save failed: {err:#}"), NotifyLevel::Warn);
            }
        }
    }

    // === Portfolio ===

    pub fn track_symbol(&mut self, symbol: &str) {
        self.tracked.insert(symbol.to_string());
        if let Some(store) = self.portfolio_store.as_ref() {
            if let Err(err) = store.add_tracked(symbol) {
                self.set_status(format!("Portfolio save failed: {err:#}"), NotifyLevel::Warn);
                return;
            }
        }
        self.set_status(format!("Tracking {symbol}"), NotifyLevel::Info);
    }

    pub fn untrack_symbol(&mut self, symbol: &str) {
        if !self.tracked.remove(symbol) {
            self.set_status(format!("{symbol} is not tracked"), NotifyLevel::Warn);
            return;
        }
        self.clamp_selections();
        if let Some(store) = self.portfolio_store.as_ref() {
            if let Err(err) = store.remove_tracked(symbol) {
                self.set_status(format!("Portfolio save failed: {err:#}"), NotifyLevel::Warn);
                return;
            }
        }
        self.set_status(format!("Stopped tracking {symbol}"), NotifyLevel::Info);
    }

    /// Empty text clears the note. Returns false if the store write
    /// failed (a warning is already on the status line).
    pub fn set_symbol_note(&mut self, symbol: &str, text: &str) -> bool {
        if let Some(store) = self.portfolio_store.as_ref() {
            let result = if text.is_empty() {
                store.remove_note(symbol)
            } else {
                store.set_note(symbol, text)
            };
            if let Err(err) = result {
                self.set_status(format!("Note save failed: {err:#}"), NotifyLevel::Warn);
                return false;
            }
        }
        if text.is_empty() {
            self.notes.remove(symbol);
        } else {
            self.notes.insert(symbol.to_string(), text.to_string());
        }
        true
    }

    pub fn save_pattern(&mut self, name: &str, note: &str) {
        let symbol = self.selected_symbol().unwrap_or("-").to_string();
        if let Some(store) = self.portfolio_store.as_ref() {
            if let Err(err) = store.save_pattern(name, &symbol, note) {
                self.set_status(format!("Pattern save failed: {err:#}"), NotifyLevel::Warn);
                return;
            }
            match store.load_patterns() {
                Ok(patterns) => self.patterns = patterns,
                Err(err) => {
                    self.set_status(format!("Pattern load failed: {err:#}"), NotifyLevel::Warn)
                }
            }
        }
        self.set_status(format!("Saved pattern {name} ({symbol})"), NotifyLevel::Info);
    }

    pub fn remove_selected_pattern(&mut self) {
        let Some(name) = self
            .patterns
            .get(self.selected_pattern)
            .map(|card| card.name.clone())
        else {
            return;
        };
        if let Some(store) = self.portfolio_store.as_ref() {
            if let Err(err) = store.remove_pattern(&name) {
                self.set_status(format!("Pattern delete failed: {err:#}"), NotifyLevel::Warn);
                return;
            }
        }
        self.patterns.retain(|card| card.name != name);
        self.set_status(format!("Deleted pattern {name}"), NotifyLevel::Info);
        self.clamp_selections();
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.tracked
            .iter()
            .nth(self.selected_symbol)
            .map(|symbol| symbol.as_str())
    }

    // === List cursors ===

    pub fn cursor_down(&mut self) {
        self.move_cursor(1);
    }

    pub fn cursor_up(&mut self) {
        self.move_cursor(-1);
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.active_tab() {
            Tab::Courses if self.session.is_some() => (
                &mut self.chapter_cursor,
                self.session
                    .as_ref()
                    .map(|session| session.progress.len())
                    .unwrap_or(0),
            ),
            Tab::Courses => (
                &mut self.selected_course,
                self.catalog
                    .as_ref()
                    .map(|catalog| catalog.len())
                    .unwrap_or(0),
            ),
            Tab::Portfolio => (&mut self.selected_symbol, self.tracked.len()),
            Tab::Patterns => (&mut self.selected_pattern, self.patterns.len()),
            Tab::Members => (&mut self.selected_member, self.members.len()),
            Tab::Payments => (&mut self.selected_payment, self.payments.len()),
            _ => return,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        let next = cursor.saturating_add_signed(delta);
        *cursor = next.min(len - 1);
    }

    fn clamp_selections(&mut self) {
        let catalog_len = self
            .catalog
            .as_ref()
            .map(|catalog| catalog.len())
            .unwrap_or(0);
        Self::clamp(&mut self.selected_course, catalog_len);
        let session_len = self
            .session
            .as_ref()
            .map(|session| session.progress.len())
            .unwrap_or(0);
        Self::clamp(&mut self.chapter_cursor, session_len);
        Self::clamp(&mut self.selected_symbol, self.tracked.len());
        Self::clamp(&mut self.selected_pattern, self.patterns.len());
        Self::clamp(&mut self.selected_member, self.members.len());
        Self::clamp(&mut self.selected_payment, self.payments.len());
    }

    fn clamp(cursor: &mut usize, len: usize) {
        if len == 0 {
            *cursor = 0;
        } else if *cursor >= len {
            *cursor = len - 1;
        }
    }

    // === Worker queue ===

    pub fn queue_op(&mut self, op: PendingOp) {
        self.pending_ops.push(op);
    }

    pub fn take_pending_ops(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.pending_ops)
    }

    // === Derived views ===

    pub fn percent_for_course(&self, course_id: &str) -> u8 {
        let Some(course) = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.get(course_id))
        else {
            return 0;
        };
        reports::course_percent(course, self.completed_by_course.get(course_id))
    }

    // === Command execution ===

    pub fn execute_command(&mut self, cmd: Command) -> Action {
        match cmd {
            Command::Overview => Action::Navigate(NavigateTarget::Tab(Tab::Overview)),
            Command::Courses => Action::Navigate(NavigateTarget::Tab(Tab::Courses)),
            Command::Portfolio => Action::Navigate(NavigateTarget::Tab(Tab::Portfolio)),
            Command::Patterns => Action::Navigate(NavigateTarget::Tab(Tab::Patterns)),
            Command::Reports => Action::Navigate(NavigateTarget::Tab(Tab::Reports)),
            Command::Members => Action::Navigate(NavigateTarget::Tab(Tab::Members)),
            Command::Payments => Action::Navigate(NavigateTarget::Tab(Tab::Payments)),

            Command::Course(id) => Action::Navigate(NavigateTarget::Course(id)),
            Command::Chapter(id) => {
                self.session_select_chapter(&id);
                Action::None
            }
            Command::Next => {
                self.session_advance();
                Action::None
            }
            Command::Prev => {
                self.session_retreat();
                Action::None
            }
            Command::Done => {
                self.session_mark_active_complete();
                Action::None
            }

            Command::Track(symbol) => {
                self.track_symbol(&symbol);
                Action::None
            }
            Command::Untrack(symbol) => {
                self.untrack_symbol(&symbol);
                Action::None
            }
            Command::Note { symbol, text } => {
                if self.set_symbol_note(&symbol, &text) {
                    Action::Notify(format!("Noted {symbol}"), NotifyLevel::Info)
                } else {
                    Action::None
                }
            }
            Command::Pattern { name, note } => {
                self.save_pattern(&name, &note);
                Action::None
            }

            Command::Invite(name) => self.admin_op(
                PendingOp::Invite { name: name.clone() },
                format!("Inviting {name}…"),
            ),
            Command::Promote { name, role } => self.admin_op(
                PendingOp::Promote {
                    name: name.clone(),
                    role,
                },
                format!("Promoting {name} to {}…", role.title()),
            ),
            Command::Charge {
                member,
                amount_cents,
            } => self.admin_op(
                PendingOp::Charge {
                    member: member.clone(),
                    amount_cents,
                },
                format!("Recording payment for {member}…"),
            ),

            Command::Share => Action::Copy(self.share_link()),
            Command::Reload => {
                self.queue_op(PendingOp::FetchProfile);
                self.queue_op(PendingOp::ReloadCatalog);
                self.queue_op(PendingOp::RefreshRoster);
                Action::Notify("Reloading…".to_string(), NotifyLevel::Info)
            }

            // Export needs the module layer; routed by the caller.
            Command::Export => Action::None,

            Command::Unknown(input) => {
                Action::Notify(format!("Unknown command: {input}"), NotifyLevel::Warn)
            }
        }
    }

    /// Convenience gate for member-management commands. UX only: the
    /// member store itself would accept the write, and a real deployment
    /// must check authorization server-side.
    fn admin_op(&mut self, op: PendingOp, message: String) -> Action {
        if !self.identity.satisfies(Some(Role::Admin)) {
            return Action::Notify("Requires admin role".to_string(), NotifyLevel::Warn);
        }
        self.queue_op(op);
        Action::Notify(message, NotifyLevel::Info)
    }
}
