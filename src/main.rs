use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use traderoom::app::{App, InputMode, PendingOp};
use traderoom::config;
use traderoom::core::{parse_command, Action, Command, NavigateTarget, NotifyLevel};
use traderoom::domain::access::Identity;
use traderoom::domain::nav::{NavigationState, Tab};
use traderoom::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent, WorkerOptions};
use traderoom::modules;
use traderoom::store::{PortfolioStore, ProgressStore, SessionStore};
use traderoom::ui;

#[derive(Debug, Parser)]
#[command(
    name = "traderoom",
    version,
    about = "Traderoom: a trading-course platform dashboard TUI"
)]
struct Args {
    /// Dashboard tab to open (deep link, e.g. courses)
    #[arg(long)]
    tab: Option<String>,

    /// Directory of course .toml files
    #[arg(long)]
    courses: Option<PathBuf>,

    /// Sign in as this member name
    #[arg(long)]
    login: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load();
    let login = args
        .login
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| config.profile.login());
    let catalog_root = resolve_courses_dir(&args, &config);

    // Navigation state over the persisted tab parameter. A failed store
    // open degrades to in-memory navigation for this run.
    let mut nav = match config::session_db_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match SessionStore::open(&path) {
                Ok(store) => NavigationState::new(Box::new(store)),
                Err(_) => NavigationState::in_memory(),
            }
        }
        None => NavigationState::in_memory(),
    };
    // The --tab deep link seeds the store before the first resolve.
    if let Some(tab) = args.tab.as_deref() {
        let _ = nav.select_tab(tab.trim());
    }

    // Role stays unresolved until the worker's profile lookup answers.
    let mut app = App::new(Identity::loading(login.clone()), nav);

    if let Some(path) = config::progress_db_path() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match ProgressStore::open(&path) {
            Ok(store) => {
                app.last_course = store.last_course().unwrap_or(None);
                app.completed_by_course = store.load_all().unwrap_or_default();
                app.progress_store = Some(store);
            }
            Err(err) => {
                app.set_status(format!("Progress DB disabled: {err:#}"), NotifyLevel::Warn)
            }
        }
    }

    if let Some(path) = config::portfolio_db_path() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match PortfolioStore::open(&path) {
            Ok(store) => {
                app.tracked = store.load_tracked().unwrap_or_default();
                app.notes = store.load_notes().unwrap_or_default();
                app.patterns = store.load_patterns().unwrap_or_default();
                for symbol in &config.watchlist {
                    let symbol = symbol.trim().to_uppercase();
                    if !symbol.is_empty() && app.tracked.insert(symbol.clone()) {
                        let _ = store.add_tracked(&symbol);
                    }
                }
                app.portfolio_store = Some(store);
            }
            Err(err) => {
                app.set_status(format!("Portfolio DB disabled: {err:#}"), NotifyLevel::Warn)
            }
        }
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runtime = RuntimeBridge::new(WorkerOptions {
        login,
        fallback_role: config.profile.fallback_role(),
        fallback_tier: config.profile.fallback_tier(),
        members_db: config::members_db_path(),
        catalog_root,
    })?;

    app.set_status("Loading profile…", NotifyLevel::Info);

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &mut app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::ProfileLoaded { identity } => app.apply_profile(identity),
            RuntimeEvent::CatalogReady { catalog } => app.apply_catalog(catalog),
            RuntimeEvent::RosterReady { members, payments } => {
                app.apply_roster(members, payments)
            }
            RuntimeEvent::Error { message } => app.apply_runtime_error(message),
        }
    }

    for op in app.take_pending_ops() {
        let cmd = match op {
            PendingOp::FetchProfile => RuntimeCommand::FetchProfile,
            PendingOp::ReloadCatalog => RuntimeCommand::ReloadCatalog,
            PendingOp::RefreshRoster => RuntimeCommand::RefreshRoster,
            PendingOp::Invite { name } => RuntimeCommand::Invite { name },
            PendingOp::Promote { name, role } => RuntimeCommand::Promote { name, role },
            PendingOp::Charge {
                member,
                amount_cents,
            } => RuntimeCommand::Charge {
                member,
                amount_cents,
            },
        };
        let _ = runtime.send(cmd);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.input_mode {
        InputMode::Command => handle_command_key(app, key),
        InputMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_command_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command.input.clear();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command.input);
            app.input_mode = InputMode::Normal;
            let cmd = parse_command(&input);
            let action = run_command(app, cmd);
            apply_action(app, action);
        }
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(c) => {
            app.command.input.push(c);
        }
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    // Popups swallow input until closed
    if app.help_open || app.profile_open {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Char('s') => {
                apply_action(app, Action::CloseOverlay);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char(':') => {
            apply_action(app, Action::OpenCommand(None));
        }
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char('s') => app.profile_open = true,
        KeyCode::Char('q') => apply_action(app, Action::Quit),

        KeyCode::Tab => app.cycle_tab(true),
        KeyCode::BackTab => app.cycle_tab(false),
        KeyCode::Char(c @ '1'..='7') => {
            if let Some(tab) = Tab::ALL.iter().find(|tab| tab.shortcut() == c) {
                // Resolution handles authorization: a gated id simply
                // falls back to Overview for an unqualified identity.
                app.select_tab(tab.id());
            }
        }

        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),

        KeyCode::Enter => match app.active_tab() {
            Tab::Courses if app.session.is_some() => app.session_select_cursor_chapter(),
            Tab::Courses => app.open_selected_course(),
            Tab::Overview => app.continue_last_course(),
            _ => {}
        },
        KeyCode::Esc => {
            if app.active_tab() == Tab::Courses && app.session.is_some() {
                apply_action(app, Action::Navigate(NavigateTarget::Back));
            }
        }

        KeyCode::Char('n') => {
            if app.session.is_some() {
                app.session_advance();
            }
        }
        KeyCode::Char('b') => {
            if app.session.is_some() {
                app.session_retreat();
            }
        }
        KeyCode::Char('m') => {
            if app.session.is_some() {
                app.session_mark_active_complete();
            }
        }
        KeyCode::Char('c') => {
            if app.active_tab() == Tab::Overview {
                app.continue_last_course();
            }
        }

        KeyCode::Char('t') => {
            if app.active_tab() == Tab::Portfolio {
                apply_action(app, Action::OpenCommand(Some("track ".to_string())));
            }
        }

        KeyCode::Char('x') => match app.active_tab() {
            Tab::Portfolio => {
                if let Some(symbol) = app.selected_symbol().map(String::from) {
                    app.untrack_symbol(&symbol);
                }
            }
            Tab::Patterns => app.remove_selected_pattern(),
            _ => {}
        },

        KeyCode::Char('e') => {
            let action = modules::export::export_current_view(app);
            apply_action(app, action);
        }
        KeyCode::Char('y') => {
            let action = Action::Copy(app.share_link());
            apply_action(app, action);
        }
        KeyCode::Char('r') => {
            let action = app.execute_command(Command::Reload);
            apply_action(app, action);
        }
        _ => {}
    }
}

fn run_command(app: &mut App, cmd: Command) -> Action {
    match cmd {
        // Export needs the module layer, so it is routed here instead of
        // inside App::execute_command.
        Command::Export => modules::export::export_current_view(app),
        other => app.execute_command(other),
    }
}

fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::None => {}
        Action::Navigate(NavigateTarget::Tab(tab)) => app.select_tab(tab.id()),
        Action::Navigate(NavigateTarget::Course(id)) => {
            app.select_tab(Tab::Courses.id());
            app.open_course(&id);
        }
        Action::Navigate(NavigateTarget::Back) => app.close_session(),
        Action::Copy(text) => copy_to_clipboard(app, text),
        Action::Notify(text, level) => app.set_status(text, level),
        Action::OpenCommand(prefix) => {
            app.input_mode = InputMode::Command;
            app.command.input = prefix.unwrap_or_default();
        }
        Action::CloseOverlay => {
            app.help_open = false;
            app.profile_open = false;
        }
        Action::Quit => app.should_quit = true,
    }
}

fn copy_to_clipboard(app: &mut App, text: String) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.clone())) {
        Ok(()) => app.set_status(format!("Copied {text}"), NotifyLevel::Info),
        Err(err) => app.set_status(format!("Clipboard unavailable: {err}"), NotifyLevel::Warn),
    }
}

fn resolve_courses_dir(args: &Args, config: &config::Config) -> PathBuf {
    if let Some(path) = args.courses.clone() {
        return path;
    }
    if let Some(raw) = config.courses_dir.as_deref() {
        if let Some(path) = expand_path(raw) {
            return path;
        }
    }
    config::default_courses_dir().unwrap_or_else(|| PathBuf::from("courses"))
}

fn expand_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        return std::env::var_os("HOME").map(|home| PathBuf::from(home).join(rest));
    }
    Some(PathBuf::from(trimmed))
}
