use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod widgets;

use crate::app::{App, InputMode};
use crate::config;
use crate::core::NotifyLevel;
use crate::domain::nav::Tab;

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.size();
    let areas = layout::areas(size);

    draw_header(f, areas.header, app);
    tabs::draw_tab_bar(f, areas.tab_bar, app);

    match app.active_tab() {
        Tab::Overview => tabs::draw_overview_tab(f, areas.main, app),
        Tab::Courses => tabs::draw_courses_tab(f, areas.main, app),
        Tab::Portfolio => tabs::draw_portfolio_tab(f, areas.main, app),
        Tab::Patterns => tabs::draw_patterns_tab(f, areas.main, app),
        Tab::Reports => tabs::draw_reports_tab(f, areas.main, app),
        Tab::Members => tabs::draw_members_tab(f, areas.main, app),
        Tab::Payments => tabs::draw_payments_tab(f, areas.main, app),
    }

    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
    if app.profile_open {
        draw_profile_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let role_style = match app.identity.role {
        Some(_) => Style::default().fg(Color::LightCyan),
        None => Style::default().fg(Color::DarkGray),
    };
    let title = Line::from(vec![
        Span::styled(
            "Traderoom",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Member", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", app.identity.display_name)),
        Span::styled("Role", Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(app.identity.role_title(), role_style),
        Span::raw("  "),
        Span::styled("Tier", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.identity.tier.title())),
    ]);

    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let courses = app
        .catalog
        .as_ref()
        .map(|catalog| catalog.len().to_string())
        .unwrap_or_else(|| "--".to_string());
    let right_line = Line::from(vec![
        Span::styled("Courses ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", courses)),
        Span::styled("Tracked ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.tracked.len())),
        Span::styled("Patterns ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.patterns.len().to_string()),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let session = app
        .session
        .as_ref()
        .map(|session| {
            format!(
                "{} ({}%)",
                session.title,
                session.progress.completion_percent()
            )
        })
        .unwrap_or_else(|| "--".to_string());

    let spans = vec![
        Span::styled("Tab ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.active_tab().title())),
        Span::styled("Session ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", session)),
        Span::styled("Link ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.share_link()),
    ];

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("overview", "Go to Overview"),
        ("courses", "Go to Courses"),
        ("portfolio", "Go to Portfolio"),
        ("patterns", "Go to Patterns"),
        ("reports", "Go to Reports (moderator)"),
        ("members", "Go to Members (admin)"),
        ("payments", "Go to Payments (admin)"),
        ("course", "Open a course by id"),
        ("chapter", "Jump to a chapter"),
        ("next", "Complete chapter and advance"),
        ("prev", "Go back one chapter"),
        ("done", "Mark current chapter complete"),
        ("track", "Track a symbol"),
        ("untrack", "Stop tracking a symbol"),
        ("note", "Note on a symbol"),
        ("pattern", "Save a pattern card"),
        ("invite", "Invite a member (admin)"),
        ("promote", "Change a member role (admin)"),
        ("charge", "Record a payment (admin)"),
        ("export", "Export current view"),
        ("share", "Copy dashboard link"),
        ("reload", "Reload profile/catalog/roster"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(&input) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input);
            let hint_text = hint.unwrap_or("type a command, Enter=run Esc=cancel");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(&app.command.input),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    NotifyLevel::Info => Color::LightGreen,
                    NotifyLevel::Warn => Color::LightYellow,
                    NotifyLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::styled("Tab", Style::default().fg(Color::LightCyan)),
        Span::raw(" Next tab  "),
        Span::styled("1-7", Style::default().fg(Color::LightCyan)),
        Span::raw(" Jump  "),
        Span::styled(":", Style::default().fg(Color::LightCyan)),
        Span::raw(" Command  "),
    ];

    match app.active_tab() {
        Tab::Courses if app.session.is_some() => {
            spans.extend([
                Span::styled("Enter", Style::default().fg(Color::LightCyan)),
                Span::raw(" Select  "),
                Span::styled("n", Style::default().fg(Color::LightCyan)),
                Span::raw(" Next  "),
                Span::styled("b", Style::default().fg(Color::LightCyan)),
                Span::raw(" Back  "),
                Span::styled("m", Style::default().fg(Color::LightCyan)),
                Span::raw(" Done  "),
                Span::styled("Esc", Style::default().fg(Color::LightCyan)),
                Span::raw(" Close  "),
            ]);
        }
        Tab::Courses => {
            spans.extend([
                Span::styled("Enter", Style::default().fg(Color::LightCyan)),
                Span::raw(" Open  "),
            ]);
        }
        Tab::Portfolio | Tab::Patterns => {
            spans.extend([
                Span::styled("x", Style::default().fg(Color::LightCyan)),
                Span::raw(" Remove  "),
            ]);
        }
        _ => {}
    }

    spans.extend([
        Span::styled("e", Style::default().fg(Color::LightCyan)),
        Span::raw(" Export  "),
        Span::styled("y", Style::default().fg(Color::LightCyan)),
        Span::raw(" Share  "),
        Span::styled("s", Style::default().fg(Color::LightCyan)),
        Span::raw(" Profile  "),
        Span::styled("?", Style::default().fg(Color::LightCyan)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::LightCyan)),
        Span::raw(" Quit"),
    ]);

    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(72, 64, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  Tab / Shift-Tab  Cycle visible tabs"),
        Line::from("  1-7        Jump to tab"),
        Line::from("  j / k      Move selection"),
        Line::from("  Enter      Open / select"),
        Line::from("  Esc        Back / close"),
        Line::from(""),
        Line::from("Course session"),
        Line::from("  Enter      Jump to highlighted chapter"),
        Line::from("  n          Complete chapter and advance"),
        Line::from("  b          Back one chapter (keeps progress)"),
        Line::from("  m          Mark current chapter complete"),
        Line::from("  c          Continue last course (Overview)"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  e          Export current view"),
        Line::from("  y          Copy dashboard link"),
        Line::from("  x          Remove symbol / pattern"),
        Line::from("  s          Profile & paths"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Command examples:"),
        Line::from("  :course risk-management"),
        Line::from("  :track AAPL"),
        Line::from("  :note AAPL gap fill pending"),
        Line::from("  :pattern bull-flag clean flag on the daily"),
        Line::from("  :promote kim moderator"),
        Line::from(""),
        Line::from(format!("Active tab: {}", app.active_tab().title())),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn draw_profile_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(76, 60, area);
    f.render_widget(Clear, popup_area);

    let config_path = config::config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(unknown)".to_string());
    let data_dir = config::data_dir()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(unknown)".to_string());
    let catalog_summary = app
        .catalog
        .as_ref()
        .map(|catalog| {
            format!(
                "{} courses ({} files, {} errs, {}ms)",
                catalog.len(),
                catalog.scanned_files,
                catalog.errors.len(),
                catalog.scan_ms
            )
        })
        .unwrap_or_else(|| "(not loaded)".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            "Profile",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Member:   {}", app.identity.display_name)),
        Line::from(format!("Role:     {}", app.identity.role_title())),
        Line::from(format!("Tier:     {}", app.identity.tier.title())),
        Line::from(""),
        Line::from(format!("Config:   {}", config_path)),
        Line::from(format!("Data:     {}", data_dir)),
        Line::from(format!("Catalog:  {}", catalog_summary)),
        Line::from(""),
        Line::from("Keys: Esc close"),
    ];

    if let Some(catalog) = app.catalog.as_ref() {
        if !catalog.errors.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Catalog errors",
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            )));
            for error in catalog.errors.iter().take(4) {
                lines.push(Line::from(format!("- {}", truncate_str(error, 70))));
            }
            if catalog.errors.len() > 4 {
                lines.push(Line::from(format!("… ({} errors)", catalog.errors.len())));
            }
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Profile").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect::<String>() + "…"
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
