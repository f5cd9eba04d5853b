//! Test app-level flows: commands, gated navigation, session lifecycle

use traderoom::app::{App, PendingOp};
use traderoom::core::{parse_command, Action, Command, NavigateTarget, NotifyLevel};
use traderoom::domain::access::{Identity, MembershipTier, Role};
use traderoom::domain::nav::{NavigationState, Tab};
use traderoom::infrastructure::catalog::starter_catalog;
use traderoom::store::{PortfolioStore, ProgressStore};

fn app_with_stores(identity: Identity) -> App {
    let mut app = App::new(identity, NavigationState::in_memory());
    app.progress_store = Some(ProgressStore::open_in_memory().unwrap());
    app.portfolio_store = Some(PortfolioStore::open_in_memory().unwrap());
    app.apply_catalog(starter_catalog());
    app
}

fn apply(app: &mut App, action: Action) {
    match action {
        Action::Navigate(NavigateTarget::Tab(tab)) => app.select_tab(tab.id()),
        Action::Navigate(NavigateTarget::Course(id)) => {
            app.select_tab(Tab::Courses.id());
            app.open_course(&id);
        }
        Action::Navigate(NavigateTarget::Back) => app.close_session(),
        Action::Notify(text, level) => app.set_status(text, level),
        _ => {}
    }
}

#[test]
fn tab_commands_respect_gating_through_resolution() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);

    let action = app.execute_command(parse_command("members"));
    assert!(matches!(
        action,
        Action::Navigate(NavigateTarget::Tab(Tab::Members))
    ));
    apply(&mut app, action);

    // The request is stored, but resolution falls back for a plain user.
    assert_eq!(app.nav.requested().as_deref(), Some("members"));
    assert_eq!(app.active_tab(), Tab::Overview);

    // The same stored request lights up once an admin profile arrives.
    app.apply_profile(Identity::new("kim", Role::Admin, MembershipTier::Free));
    assert_eq!(app.active_tab(), Tab::Members);
}

#[test]
fn course_session_survives_reopen_via_the_progress_store() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);

    let action = app.execute_command(parse_command("course candlesticks-101"));
    apply(&mut app, action);
    let session = app.session.as_ref().expect("session open");
    assert_eq!(session.course_id, "candlesticks-101");
    assert_eq!(session.progress.active_chapter_id(), Some("anatomy"));

    app.session_advance();
    app.session_advance();
    let session = app.session.as_ref().unwrap();
    assert_eq!(session.progress.active_chapter_id(), Some("engulfing"));
    assert_eq!(session.progress.completion_percent(), 50);

    app.close_session();
    assert!(app.session.is_none());

    // A fresh session hydrates the persisted completions but starts at
    // the first chapter again.
    app.open_course("candlesticks-101");
    let session = app.session.as_ref().unwrap();
    assert_eq!(session.progress.active_chapter_id(), Some("anatomy"));
    assert!(session.progress.is_complete("anatomy"));
    assert!(session.progress.is_complete("wicks"));
    assert_eq!(session.progress.completion_percent(), 50);
    assert_eq!(app.last_course.as_deref(), Some("candlesticks-101"));
}

#[test]
fn unknown_course_is_a_status_warning_not_a_session() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);

    app.open_course("no-such-course");
    assert!(app.session.is_none());
    let (text, level) = app.status_text().expect("status set");
    assert!(text.contains("Unknown course"));
    assert_eq!(level, NotifyLevel::Warn);
}

#[test]
fn admin_commands_are_gated_client_side() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);

    let action = app.execute_command(parse_command("invite casey"));
    assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
    assert!(app.take_pending_ops().is_empty());

    app.apply_profile(Identity::new("kim", Role::Admin, MembershipTier::Free));
    let action = app.execute_command(parse_command("invite casey"));
    assert!(matches!(action, Action::Notify(_, NotifyLevel::Info)));
    let ops = app.take_pending_ops();
    assert_eq!(ops.len(), 1);
    assert!(matches!(&ops[0], PendingOp::Invite { name } if name == "casey"));
}

#[test]
fn moderator_rank_is_enough_for_reports_but_not_members() {
    let moderator = Identity::new("sam", Role::Moderator, MembershipTier::Premium);
    let mut app = app_with_stores(moderator);

    app.select_tab(Tab::Reports.id());
    assert_eq!(app.active_tab(), Tab::Reports);

    app.select_tab(Tab::Members.id());
    assert_eq!(app.active_tab(), Tab::Overview);
}

#[test]
fn portfolio_commands_round_trip_through_the_store() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);

    let action = app.execute_command(parse_command("track aapl"));
    apply(&mut app, action);
    let action = app.execute_command(Command::Note {
        symbol: "AAPL".into(),
        text: "gap fill pending".into(),
    });
    apply(&mut app, action);

    assert!(app.tracked.contains("AAPL"));
    assert_eq!(app.notes["AAPL"], "gap fill pending");

    let store = app.portfolio_store.as_ref().unwrap();
    assert!(store.load_tracked().unwrap().contains("AAPL"));
    assert_eq!(store.load_notes().unwrap()["AAPL"], "gap fill pending");

    let action = app.execute_command(parse_command("untrack AAPL"));
    apply(&mut app, action);
    assert!(app.tracked.is_empty());
}

#[test]
fn share_link_follows_the_active_tab() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);

    assert_eq!(app.share_link(), "traderoom://dashboard?tab=overview");
    app.select_tab(Tab::Courses.id());
    assert_eq!(app.share_link(), "traderoom://dashboard?tab=courses");
}

#[test]
fn session_chapter_commands_flow_through_execute() {
    let user = Identity::new("kim", Role::User, MembershipTier::Free);
    let mut app = app_with_stores(user);
    app.open_course("support-resistance");

    // Direct jump never completes anything.
    let action = app.execute_command(parse_command("chapter flips"));
    apply(&mut app, action);
    let session = app.session.as_ref().unwrap();
    assert_eq!(session.progress.active_chapter_id(), Some("flips"));
    assert_eq!(session.progress.completed_count(), 0);

    // :done marks the active chapter; :prev moves without completing.
    let action = app.execute_command(parse_command("done"));
    apply(&mut app, action);
    let action = app.execute_command(parse_command("prev"));
    apply(&mut app, action);
    let session = app.session.as_ref().unwrap();
    assert_eq!(session.progress.active_chapter_id(), Some("zones"));
    assert!(session.progress.is_complete("flips"));
    assert_eq!(app.completed_by_course["support-resistance"].len(), 1);
}
