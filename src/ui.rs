use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::progress::ProgressBar;
use crate::state::faq_overview::OverviewItem;
use crate::state::pipeline::{Highlight, StepCard, StepId, StepStatus};
use crate::types::{AppState, InputMode, StatusKind};

const BASE_FG: Color = Color::Rgb(216, 222, 233);
const BASE_BG: Color = Color::Rgb(46, 52, 64);
const ACCENT_COLOR: Color = Color::Rgb(136, 192, 208);
const SUCCESS_COLOR: Color = Color::Rgb(163, 190, 140);
const WARNING_COLOR: Color = Color::Rgb(235, 203, 139);
const ERROR_COLOR: Color = Color::Rgb(191, 97, 106);
const HIGHLIGHT_BG: Color = Color::Rgb(59, 66, 82);
const BORDER_COLOR: Color = Color::Rgb(76, 86, 106);
const INPUT_TEXT: Color = Color::Rgb(235, 203, 139);

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(100);

    loop {
        app.pump_events();
        terminal.draw(|f| ui(f, &mut app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            if let Err(e) =
                                handle_normal_input(&mut app, key.code, key.modifiers).await
                            {
                                app.state = AppState::Error(e.to_string());
                            }
                        }
                        InputMode::Editing => {
                            handle_edit_input(&mut app, key.code).await?;
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit || (matches!(app.state, AppState::Error(_)) && !app.show_help) {
            break;
        }
    }

    Ok(())
}

pub async fn handle_normal_input(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    if app.state == AppState::ConfirmDelete {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return Ok(());
    }

    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            if app.error.is_some() {
                app.error = None;
            } else if app.show_help {
                app.toggle_help();
            } else if app.manual_input_active {
                app.cancel_manual_input();
            } else {
                match app.state {
                    AppState::UpdateWizard | AppState::FaqOverview => {
                        app.state = AppState::SelectingOperation;
                        app.operation_mode = None;
                    }
                    _ => {}
                }
            }
        }
        KeyCode::Char('h') => app.toggle_help(),
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        KeyCode::Enter => app.select_current_item().await?,
        KeyCode::Char('m') => {
            if app.state == AppState::FaqOverview {
                app.start_manual_input("category");
            }
        }
        KeyCode::Char('r') => {
            if app.state == AppState::FaqOverview {
                app.refresh_selected_section();
            }
        }
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('s') if app.state == AppState::FaqOverview => {
            app.toggle_selected_status(StatusKind::Sticky)
        }
        KeyCode::Char('a') if app.state == AppState::FaqOverview => {
            app.toggle_selected_status(StatusKind::Active)
        }
        KeyCode::Char('S') if app.state == AppState::FaqOverview => {
            app.toggle_all_in_selected_section(StatusKind::Sticky)
        }
        KeyCode::Char('A') if app.state == AppState::FaqOverview => {
            app.toggle_all_in_selected_section(StatusKind::Active)
        }
        KeyCode::Char('d') | KeyCode::Delete if app.state == AppState::FaqOverview => {
            app.request_delete_selected()
        }
        _ => {}
    }
    Ok(())
}

pub async fn handle_edit_input(app: &mut App, key: KeyCode) -> Result<()> {
    match key {
        KeyCode::Enter => {
            if app.manual_input_active {
                app.finish_manual_input().await?;
            }
        }
        KeyCode::Esc => app.cancel_manual_input(),
        KeyCode::Char(c) => {
            if app.manual_input_active {
                app.manual_input_buffer.push(c);
            }
        }
        KeyCode::Backspace => {
            if app.manual_input_active {
                app.manual_input_buffer.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, main_chunks[0], app);
    render_content(f, main_chunks[1], app);
    render_footer(f, main_chunks[2], app);

    if app.show_help {
        render_help_popup(f, app);
    }
    if app.manual_input_active {
        render_manual_input_popup(f, app);
    }
    if app.state == AppState::ConfirmDelete {
        render_delete_warning_popup(f, app);
    }
    if app.error.is_some() {
        render_error_popup(f, app);
    }
}

fn render_error_popup(f: &mut Frame, app: &mut App) {
    if let Some(error_msg) = &app.error {
        let popup_area = centered_rect(60, 25, f.area());
        f.render_widget(Clear, popup_area);

        let error_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "ERROR",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(error_msg.as_str()),
        ];

        let block = Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .style(Style::default().fg(Color::Red));

        let paragraph = Paragraph::new(error_text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, popup_area);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.dry_run_mode {
        " phpMyFAQ Upgrade - DRY RUN MODE "
    } else {
        " phpMyFAQ Upgrade "
    };

    let subtitle = match app.state {
        AppState::SelectingOperation => "Welcome - Choose an operation to start".to_string(),
        AppState::UpdateWizard => format!(
            "Update wizard | {} | release environment: {}",
            app.settings.base_url, app.pipeline.release_environment
        ),
        AppState::FaqOverview => "FAQ overview".to_string(),
        AppState::ConfirmDelete => "Confirm deletion".to_string(),
        AppState::Error(_) => "Error Occurred".to_string(),
    };

    let header_block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(if app.dry_run_mode {
            Style::default().fg(WARNING_COLOR).bg(BASE_BG)
        } else {
            Style::default().fg(BASE_FG).bg(BASE_BG)
        });

    let header_content = Paragraph::new(subtitle)
        .style(Style::default().fg(ACCENT_COLOR))
        .alignment(Alignment::Center)
        .block(header_block);

    f.render_widget(header_content, area);
}

fn render_content(f: &mut Frame, area: Rect, app: &mut App) {
    match &app.state {
        AppState::SelectingOperation => render_operation_selection(f, area, app),
        AppState::UpdateWizard => render_update_wizard(f, area, app),
        AppState::FaqOverview | AppState::ConfirmDelete => render_faq_overview(f, area, app),
        AppState::Error(msg) => render_error(f, area, msg),
    }
}

fn render_operation_selection(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .title("Choose an Operation")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(ACCENT_COLOR));

    let items = vec![
        ListItem::new("Update phpMyFAQ"),
        ListItem::new("FAQ overview"),
    ];

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = ListState::default();
    state.select(Some(app.selected_operation_index));

    f.render_stateful_widget(list, area, &mut state);
}

fn status_marker(card: &StepCard) -> (&'static str, Color) {
    if !card.revealed {
        return ("·", BORDER_COLOR);
    }
    match card.status {
        StepStatus::Pending => ("○", BASE_FG),
        StepStatus::Running => ("…", ACCENT_COLOR),
        StepStatus::Success => ("✓", SUCCESS_COLOR),
        StepStatus::Warning => ("!", WARNING_COLOR),
        StepStatus::Error => ("✗", ERROR_COLOR),
    }
}

fn render_update_wizard(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let items: Vec<ListItem> = app
        .pipeline
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let (marker, color) = status_marker(card);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(color)),
                Span::styled(
                    format!("{}. {}", i + 1, card.id.title()),
                    Style::default().fg(if card.revealed { BASE_FG } else { BORDER_COLOR }),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Steps")
                .style(Style::default().fg(ACCENT_COLOR)),
        )
        .highlight_style(
            Style::default()
                .bg(HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = ListState::default();
    state.select(Some(app.selected_step_index));
    f.render_stateful_widget(list, chunks[0], &mut state);

    render_step_details(f, chunks[1], app);
}

fn render_step_details(f: &mut Frame, area: Rect, app: &App) {
    let step = app.selected_step();
    let card = app.pipeline.card(step);
    let (_, color) = status_marker(card);

    let mut lines = vec![Line::from("")];
    if !card.revealed {
        lines.push(Line::from(Span::styled(
            "Complete the previous step to unlock this one.",
            Style::default().fg(BORDER_COLOR),
        )));
    } else if card.status == StepStatus::Running {
        lines.push(Line::from(Span::styled(
            "→ Working...",
            Style::default().fg(ACCENT_COLOR),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("→ Press Enter to {}", step.action().to_lowercase()),
            Style::default().fg(ACCENT_COLOR),
        )));
    }
    lines.push(Line::from(""));

    match step {
        StepId::CheckVersions => {
            if let Some(version) = &app.pipeline.version_last_checked {
                lines.push(Line::from(format!("Latest version: {version}")));
            }
            if let Some(date) = &app.pipeline.date_last_checked {
                lines.push(Line::from(format!("Last checked: {date}")));
            }
        }
        StepId::Download => match app.pipeline.download_target() {
            Some(target) => lines.push(Line::from(format!("Package: {target}"))),
            None => lines.push(Line::from(Span::styled(
                "Check for updates first to choose a version.",
                Style::default().fg(BORDER_COLOR),
            ))),
        },
        _ => {}
    }

    if card.highlights.contains(&Highlight::Warning) && card.highlights.contains(&Highlight::Success) {
        lines.push(Line::from(Span::styled(
            "Finished with warnings",
            Style::default().fg(WARNING_COLOR),
        )));
    }
    if let Some(result) = &card.result {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(result.as_str(), Style::default().fg(color))));
    }

    let block = Block::default()
        .title(step.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(color));

    if step != StepId::Install || (app.pipeline.backup.is_none() && app.pipeline.install.is_none()) {
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        chunks[0],
    );
    if let Some(bar) = &app.pipeline.backup {
        render_progress_gauge(f, chunks[1], "Temporary backup", bar);
    }
    if let Some(bar) = &app.pipeline.install {
        render_progress_gauge(f, chunks[2], "Installation", bar);
    }
}

fn render_progress_gauge(f: &mut Frame, area: Rect, title: &str, bar: &ProgressBar) {
    let color = if bar.is_animated() {
        ACCENT_COLOR
    } else if bar.percent() >= 100.0 {
        SUCCESS_COLOR
    } else {
        WARNING_COLOR
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(color).bg(BASE_BG))
        .ratio(bar.ratio())
        .label(bar.label().to_string());

    f.render_widget(gauge, area);
}

fn flag(value: bool) -> &'static str {
    if value {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_faq_overview(f: &mut Frame, area: Rect, app: &mut App) {
    let overview = &app.overview;
    let items: Vec<ListItem> = overview
        .items()
        .into_iter()
        .map(|item| match item {
            OverviewItem::Section(s) => {
                let section = &overview.sections[s];
                let arrow = if section.expanded { "▾" } else { "▸" };
                let detail = if section.loading {
                    " loading...".to_string()
                } else if section.expanded {
                    format!(
                        " ({} FAQs)  all sticky {}  all active {}",
                        section.rows.len(),
                        flag(section.all_sticky),
                        flag(section.all_active)
                    )
                } else {
                    String::new()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{arrow} Category {}", section.category_id),
                        Style::default().fg(ACCENT_COLOR).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(detail, Style::default().fg(BORDER_COLOR)),
                ]))
            }
            OverviewItem::Row(s, r) => {
                let row = &overview.sections[s].rows[r];
                ListItem::new(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("S{} A{} ", flag(row.sticky), flag(row.active)),
                        Style::default().fg(WARNING_COLOR),
                    ),
                    Span::styled(
                        format!("#{:<5} {:<3} ", row.id, row.language),
                        Style::default().fg(BORDER_COLOR),
                    ),
                    Span::styled(row.question.as_str(), Style::default().fg(BASE_FG)),
                    Span::styled(format!("  {}", row.created_at), Style::default().fg(BORDER_COLOR)),
                ]))
            }
        })
        .collect();

    let title = if app.loading() { "FAQs (loading...)" } else { "FAQs" };

    if items.is_empty() {
        f.render_widget(
            Paragraph::new("No categories yet. Press [m] to add a category id.")
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .style(Style::default().fg(ACCENT_COLOR)),
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(title)
                .style(Style::default().fg(ACCENT_COLOR)),
        )
        .highlight_style(
            Style::default()
                .bg(HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = ListState::default();
    state.select(Some(overview.selected_index));

    f.render_stateful_widget(list, area, &mut state);
}

fn render_error(f: &mut Frame, area: Rect, error_msg: &str) {
    let error_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "An error occurred",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error_msg),
    ];

    f.render_widget(
        Paragraph::new(error_text)
            .block(
                Block::default()
                    .title("Error")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.manual_input_active {
        " [Enter] Confirm | [Esc] Cancel "
    } else {
        match app.state {
            AppState::SelectingOperation => " [↑/↓] Navigate | [Enter] Select | [h] Help | [q] Quit ",
            AppState::UpdateWizard => {
                " [↑/↓] Navigate | [Enter] Run step | [Esc] Back | [n] New | [h] Help | [q] Quit "
            }
            AppState::FaqOverview => {
                " [Enter] Expand | [s/a] Sticky/Active | [S/A] All | [d] Delete | [m] Add category | [r] Refresh | [Esc] Back "
            }
            AppState::ConfirmDelete => " [y] Delete | [n] Keep ",
            AppState::Error(_) => " [q] Quit ",
        }
    };

    f.render_widget(
        Paragraph::new(help_text)
            .block(
                Block::default()
                    .title("Controls")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(BORDER_COLOR)),
            )
            .alignment(Alignment::Center)
            .style(Style::default().fg(BASE_FG)),
        area,
    );
}

fn render_delete_warning_popup(f: &mut Frame, app: &App) {
    let Some(key) = &app.overview.pending_delete else {
        return;
    };
    let question = app
        .overview
        .find_row(key)
        .map(|row| row.question.as_str())
        .unwrap_or("");

    let popup_area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Do you really want to delete this FAQ?",
            Style::default().fg(WARNING_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("#{} ({})", key.id, key.language)),
        Line::from(Span::styled(question, Style::default().fg(BASE_FG))),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Delete | [n] Keep",
            Style::default().fg(ACCENT_COLOR),
        )),
    ];

    f.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .title("Delete FAQ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .style(Style::default().fg(WARNING_COLOR).bg(BASE_BG)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn render_help_popup(f: &mut Frame, _app: &App) {
    let popup_area = centered_rect(80, 70, f.area());
    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "HELP - phpMyFAQ Upgrade",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("General:"),
        Line::from("  --dry-run                 Simulate the backend, nothing is changed"),
        Line::from("  --config FILE             Read settings from a TOML file"),
        Line::from(""),
        section("Navigation:"),
        Line::from("  ↑/↓       Navigate through lists"),
        Line::from("  Enter     Run the selected step or expand a category"),
        Line::from("  Esc       Go back to the operation menu"),
        Line::from(""),
        section("FAQ overview:"),
        Line::from("  s / a     Toggle sticky / active for the selected FAQ"),
        Line::from("  S / A     Toggle sticky / active for the whole category"),
        Line::from("  d         Delete the selected FAQ"),
        Line::from("  m         Add a category by id"),
        Line::from("  r         Reload the selected category"),
        Line::from(""),
        section("Commands:"),
        Line::from("  N         Start over"),
        Line::from("  H         Toggle this help screen"),
        Line::from("  Q         Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press H or Esc to close this help",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));

    f.render_widget(help, popup_area);
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

fn render_manual_input_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let min_width = 50;
    let max_width = 80;
    let width = if area.width < min_width + 10 {
        area.width.saturating_sub(4)
    } else {
        (area.width * 60 / 100).min(max_width).max(min_width)
    };

    let height = 9;

    let popup_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let title = match app.manual_input_type.as_str() {
        "category" => "Enter Category ID",
        _ => "Enter Input",
    };

    f.render_widget(Clear, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(popup_area);

    let input = Paragraph::new(app.manual_input_buffer.as_str())
        .style(Style::default().fg(INPUT_TEXT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(title)
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT_COLOR).bg(BASE_BG)),
        );
    f.render_widget(input, chunks[0]);

    f.set_cursor_position((
        chunks[0].x + app.manual_input_buffer.width() as u16 + 1,
        chunks[0].y + 1,
    ));

    let mut content = vec![Line::from("")];
    if !app.remembered_categories.is_empty() {
        let known = app
            .remembered_categories
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        content.push(Line::from(Span::styled(
            "Known categories:",
            Style::default().fg(BORDER_COLOR),
        )));
        content.push(Line::from(Span::styled(known, Style::default().fg(ACCENT_COLOR))));
        content.push(Line::from(""));
    }
    content.push(Line::from(Span::styled(
        "[Enter] Confirm | [Esc] Cancel",
        Style::default().fg(WARNING_COLOR),
    )));

    f.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );
}
