//! Tab bar and per-tab content rendering

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs as RataTabs, Wrap};
use ratatui::Frame;

use crate::app::{App, CourseSession};
use crate::modules::reports;
use crate::ui::widgets::meter::{meter_text, CompletionMeter};

/// Draw the tab bar. Only tabs visible to the current identity appear;
/// gated tabs show up when the role allows them.
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible_tabs();
    let titles: Vec<Line> = visible
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled(
                    format!("{}:", tab.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(tab.title()),
            ])
        })
        .collect();

    let active = app.active_tab();
    let selected = visible.iter().position(|tab| *tab == active).unwrap_or(0);

    let tabs = RataTabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

/// Draw the Overview tab content
pub fn draw_overview_tab(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_quick_access(f, chunks[0], app);
    draw_learning_summary(f, chunks[1], app);
}

fn draw_quick_access(f: &mut Frame, area: Rect, _app: &App) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Navigation",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  1-7", Style::default().fg(Color::Yellow)),
            Span::raw("  Jump to tab"),
        ]),
        Line::from(vec![
            Span::styled("  Tab", Style::default().fg(Color::Yellow)),
            Span::raw("  Next tab"),
        ]),
        Line::from(vec![
            Span::styled("  c", Style::default().fg(Color::Yellow)),
            Span::raw("    Continue last course"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Commands",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  :course", Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(":track", Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("  :note", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled(":pattern", Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("  :share", Style::default().fg(Color::Green)),
            Span::raw("   "),
            Span::styled(":export", Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Press "),
            Span::styled(":", Style::default().fg(Color::Yellow)),
            Span::raw(" for command mode"),
        ]),
        Line::from(vec![
            Span::raw(" Press "),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw(" for help"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("QUICK ACCESS");

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}

fn draw_learning_summary(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    if let Some(last) = app.last_course.as_deref() {
        let title = app
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.get(last))
            .map(|course| course.title.clone())
            .unwrap_or_else(|| last.to_string());
        lines.push(Line::from(vec![
            Span::styled(" Continue: ", Style::default().fg(Color::Cyan)),
            Span::styled(title, Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(
                meter_text(app.percent_for_course(last), 16),
                Style::default().fg(Color::LightGreen),
            ),
        ]));
        lines.push(Line::from(""));
    }

    match app.catalog.as_ref() {
        Some(catalog) if !catalog.is_empty() => {
            lines.push(Line::from(Span::styled(
                format!(" Courses ({})", catalog.len()),
                Style::default().fg(Color::Cyan),
            )));
            for course in catalog.courses().iter().take(6) {
                let percent = app.percent_for_course(&course.id);
                lines.push(Line::from(vec![
                    Span::raw(" ├─ "),
                    Span::styled(
                        format!("{:<28}", truncate(&course.title, 28)),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        meter_text(percent, 16),
                        Style::default().fg(Color::LightGreen),
                    ),
                ]));
            }
            if catalog.len() > 6 {
                lines.push(Line::from(Span::styled(
                    format!(" … ({} courses)", catalog.len()),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        _ => {
            lines.push(Line::from(Span::styled(
                " Loading catalog…",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if !app.patterns.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" Patterns ({})", app.patterns.len()),
            Style::default().fg(Color::Cyan),
        )));
        for card in app.patterns.iter().take(3) {
            lines.push(Line::from(vec![
                Span::styled(" ● ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{} ({})", card.name, card.symbol)),
            ]));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("LEARNING");

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}

/// Draw the Courses tab content
pub fn draw_courses_tab(f: &mut Frame, area: Rect, app: &App) {
    if let Some(session) = app.session.as_ref() {
        draw_course_session(f, area, app, session);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_course_list(f, chunks[0], app);
    draw_course_inspector(f, chunks[1], app);
}

fn draw_course_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = match app.catalog.as_ref() {
        Some(catalog) => catalog
            .courses()
            .iter()
            .map(|course| {
                let percent = app.percent_for_course(&course.id);
                let line = Line::from(vec![
                    Span::styled(
                        format!("{:<26}", truncate(&course.title, 26)),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!("{:<13}", course.level),
                        Style::default().fg(Color::LightCyan),
                    ),
                    Span::styled(
                        format!("{:>2} ch  ", course.chapters.len()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{percent:>3}%"),
                        Style::default().fg(Color::LightGreen),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect(),
        None => Vec::new(),
    };

    let is_empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Courses")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(app.selected_course));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_course_inspector(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    if let Some(course) = app
        .catalog
        .as_ref()
        .and_then(|catalog| catalog.courses().get(app.selected_course))
    {
        let percent = app.percent_for_course(&course.id);
        lines.push(Line::from(vec![
            Span::styled("Course ", Style::default().fg(Color::LightCyan)),
            Span::raw(course.title.clone()),
        ]));
        lines.push(Line::from(format!("Level: {}", course.level)));
        lines.push(Line::from(format!("Chapters: {}", course.chapters.len())));
        lines.push(Line::from(vec![
            Span::raw("Progress: "),
            Span::styled(
                meter_text(percent, 20),
                Style::default().fg(Color::LightGreen),
            ),
        ]));
        lines.push(Line::from(""));
        if !course.summary.is_empty() {
            lines.push(Line::from(course.summary.clone()));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Enter: open course",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from("No course selected"));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Course Inspector")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn draw_course_session(f: &mut Frame, area: Rect, app: &App, session: &CourseSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    // Session header: title, position, completion meter
    let position = match session.progress.active_index() {
        Some(idx) => format!("{}/{}", idx + 1, session.progress.len()),
        None => "-".to_string(),
    };
    let active_title = session
        .progress
        .active_chapter()
        .map(|chapter| chapter.title.clone())
        .unwrap_or_else(|| "(no chapters)".to_string());
    let header_lines = vec![
        Line::from(vec![
            Span::styled(
                session.title.clone(),
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Chapter ", Style::default().fg(Color::DarkGray)),
            Span::raw(position),
            Span::raw("  "),
            Span::styled(active_title, Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];
    let header = Paragraph::new(header_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("SESSION"),
    );
    f.render_widget(header, chunks[0]);

    // Completion meter overlaid on the header's second line
    let meter_area = Rect {
        x: chunks[0].x + 2,
        y: chunks[0].y + 2,
        width: chunks[0].width.saturating_sub(4),
        height: 1,
    };
    f.render_widget(
        CompletionMeter::new(session.progress.completion_percent()),
        meter_area,
    );

    // Chapter list
    let active_id = session.progress.active_chapter_id();
    let items: Vec<ListItem> = session
        .progress
        .chapters()
        .iter()
        .enumerate()
        .map(|(idx, chapter)| {
            let done = session.progress.is_complete(&chapter.id);
            let mark = if done {
                Span::styled("✓ ", Style::default().fg(Color::LightGreen))
            } else {
                Span::raw("  ")
            };
            let pointer = if Some(chapter.id.as_str()) == active_id {
                Span::styled("▸ ", Style::default().fg(Color::Cyan))
            } else {
                Span::raw("  ")
            };
            let title_style = if done {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let line = Line::from(vec![
                pointer,
                mark,
                Span::styled(format!("{:>2}. ", idx + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<40}", truncate(&chapter.title, 40)), title_style),
                Span::styled(
                    chapter.duration_label.clone(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let is_empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Chapters")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(app.chapter_cursor));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);
}

/// Draw the Portfolio tab content
pub fn draw_portfolio_tab(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = app
        .tracked
        .iter()
        .map(|symbol| {
            let note = app
                .notes
                .get(symbol)
                .map(|note| note.as_str())
                .unwrap_or("(no note)");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<8}", symbol), Style::default().fg(Color::White)),
                Span::styled(
                    truncate(note, 24),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let is_empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Watchlist")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(app.selected_symbol));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let mut lines = Vec::new();
    if let Some(symbol) = app.selected_symbol() {
        lines.push(Line::from(vec![
            Span::styled("Symbol ", Style::default().fg(Color::LightCyan)),
            Span::raw(symbol.to_string()),
        ]));
        match app.notes.get(symbol) {
            Some(note) => {
                lines.push(Line::from(""));
                lines.push(Line::from(note.clone()));
            }
            None => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("No note. :note {symbol} <text> to add one."),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "t: track another   x: untrack   :pattern <name> <note> saves a card",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from("No tracked symbols"));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press t or use :track <symbol> to add one",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Symbol")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[1]);
}

/// Draw the Patterns tab content
pub fn draw_patterns_tab(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = app
        .patterns
        .iter()
        .map(|card| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<16}", truncate(&card.name, 16)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<8}", card.symbol),
                    Style::default().fg(Color::LightCyan),
                ),
                Span::styled(
                    card.saved_at.clone(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let is_empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Pattern Gallery")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(app.selected_pattern));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let mut lines = Vec::new();
    if let Some(card) = app.patterns.get(app.selected_pattern) {
        lines.push(Line::from(vec![
            Span::styled("Pattern ", Style::default().fg(Color::LightCyan)),
            Span::raw(card.name.clone()),
        ]));
        lines.push(Line::from(format!("Symbol: {}", card.symbol)));
        lines.push(Line::from(format!("Saved:  {}", card.saved_at)));
        lines.push(Line::from(""));
        lines.push(Line::from(card.note.clone()));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "x: delete pattern",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from("No saved patterns"));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Use :pattern <name> <note> from the Portfolio tab",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Card")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[1]);
}

/// Draw the Reports tab content (Moderator and up)
pub fn draw_reports_tab(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    match app.catalog.as_ref() {
        Some(catalog) if !catalog.is_empty() => {
            let rows = reports::completion_report(catalog, &app.completed_by_course);
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:<28}", "COURSE"),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:>10}  ", "DONE"),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("PROGRESS", Style::default().fg(Color::Cyan)),
            ]));
            for row in &rows {
                lines.push(Line::from(vec![
                    Span::raw(format!(" {:<28}", truncate(&row.title, 28))),
                    Span::styled(
                        format!(
                            "{:>6}/{:<3}  ",
                            row.completed_chapters, row.total_chapters
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        meter_text(row.percent, 24),
                        Style::default().fg(Color::LightGreen),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " e: export this report as CSV",
                Style::default().fg(Color::DarkGray),
            )));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                " Loading catalog…",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("COMPLETION REPORT");

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}

/// Draw the Members tab content (Admin only)
pub fn draw_members_tab(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .members
        .iter()
        .map(|member| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", truncate(&member.name, 18)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<11}", member.role.title()),
                    Style::default().fg(Color::LightCyan),
                ),
                Span::styled(
                    format!("{:<9}", member.tier.title()),
                    Style::default().fg(Color::LightGreen),
                ),
                Span::styled(
                    format!("joined {}", member.joined_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let is_empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Members ({})", app.members.len()))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(app.selected_member));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Draw the Payments tab content (Admin only)
pub fn draw_payments_tab(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .payments
        .iter()
        .map(|payment| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}  ", payment.paid_at),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<18}", truncate(&payment.member, 18)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>12}  ", payment.amount_label()),
                    Style::default().fg(Color::LightGreen),
                ),
                Span::styled(
                    payment.state.clone(),
                    Style::default().fg(Color::LightCyan),
                ),
            ]))
        })
        .collect();

    let is_empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Payments ({})", app.payments.len()))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(app.selected_payment));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
}
