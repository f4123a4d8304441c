mod export;
mod help;
mod state;

use crate::cli::Cli;
use crate::findings::format_age;
use crate::model::{AppConfig, DashboardEvent, InfoEvent, ScanResult};
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use export::{copy_to_clipboard, export_findings_json_here};
use help::draw_help;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{
    push_wrapped_status_kv, Busy, ScanField, UiState, TAB_COUNT, TAB_DASHBOARD, TAB_HELP,
    TAB_RUNS, TAB_SCAN,
};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const NO_RUNS_HINT: &str = "Run a scan from the Scan tab (press s), or enter a target then press Enter.";

pub async fn run(args: Cli, cfg: AppConfig) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<DashboardEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let initial = match args.target.as_ref() {
        Some(t) if args.scan_on_launch => Some((t.clone(), cfg.scan.clone())),
        _ => None,
    };

    // Terminal I/O stays off the runtime.
    let ui_cfg = cfg.clone();
    let prefill = args.target.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_cfg, prefill, event_rx, cmd_tx));

    let res = orchestrator::run_controller(cfg.pipeline.clone(), initial, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

enum KeyOutcome {
    Continue,
    Quit,
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    cfg: AppConfig,
    prefill: Option<String>,
    mut event_rx: UnboundedReceiver<DashboardEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(cfg);
    state.target_input = prefill.unwrap_or_default();
    reload(&mut state);
    if state.runs.is_empty() && state.info.is_empty() {
        state.info = NO_RUNS_HINT.into();
    }

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }
        if state.quitting && state.busy.is_none() {
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if let KeyOutcome::Quit = handle_key(&mut state, k, &cmd_tx) {
                    break Ok(());
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

/// Re-read the run store (with retention) and report what changed.
fn reload(state: &mut UiState) {
    let old_count = state.runs.len();
    let loaded = orchestrator::load_runs(&state.config);
    let pruned = loaded.pruned.clone();
    state.apply_loaded(loaded);

    let new_count = state.runs.len();
    state.info = if new_count > old_count {
        format!("Loaded: {} new run(s)", new_count - old_count)
    } else if new_count < old_count {
        format!("Loaded: {} run(s) removed", old_count - new_count)
    } else {
        String::new()
    };
    if !pruned.is_empty() {
        let msg = InfoEvent::Pruned {
            removed: pruned.removed.len(),
            failed: pruned.failed.len(),
        }
        .to_message();
        state.info = if state.info.is_empty() {
            msg
        } else {
            format!("{}; {}", state.info, msg)
        };
    }
}

fn request_scan(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>) {
    if state.busy.is_some() {
        state.info = InfoEvent::ScanBusy.to_message();
        return;
    }
    let _ = cmd_tx.send(UiCommand::Scan {
        target: state.target_input.clone(),
        config: state.config.scan.clone(),
    });
    state.info = "Scan requested…".into();
}

fn handle_key(state: &mut UiState, k: KeyEvent, cmd_tx: &UnboundedSender<UiCommand>) -> KeyOutcome {
    if (k.modifiers, k.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
        return quit(state, cmd_tx);
    }

    if state.filter_editing {
        match k.code {
            KeyCode::Char(c) => state.filter.push(c),
            KeyCode::Backspace => {
                state.filter.pop();
            }
            KeyCode::Enter => {
                state.filter_editing = false;
                let f = state.filter.trim().to_string();
                state.config.filter = (!f.is_empty()).then_some(f);
                state.runs_selected = 0;
                state.runs_scroll_offset = 0;
                reload(state);
                state.info = format!("Filter: {}", state.config.filter.as_deref().unwrap_or("(none)"));
            }
            KeyCode::Esc => {
                state.filter_editing = false;
                state.filter = state.config.filter.clone().unwrap_or_default();
            }
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    if state.target_editing {
        match k.code {
            KeyCode::Char(c) => state.target_input.push(c),
            KeyCode::Backspace => {
                state.target_input.pop();
            }
            KeyCode::Enter => {
                state.target_editing = false;
                request_scan(state, cmd_tx);
            }
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => {
                state.target_editing = false;
                if k.code == KeyCode::Down {
                    state.scan_field = 1;
                }
            }
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match k.code {
        KeyCode::Char('q') => return quit(state, cmd_tx),
        KeyCode::Tab => {
            state.tab = (state.tab + 1) % TAB_COUNT;
        }
        KeyCode::Char('?') => state.tab = TAB_HELP,
        KeyCode::Char('o') => {
            if state.last_output.is_some() {
                state.tab = TAB_DASHBOARD;
                state.show_output = !state.show_output;
                state.show_raw = false;
                state.dashboard_scroll = 0;
            } else {
                state.info = "No pipeline output yet.".into();
            }
        }
        KeyCode::Char('s') => {
            state.tab = TAB_SCAN;
            state.scan_field = 0;
            state.target_editing = true;
        }
        KeyCode::Char('r') => {
            reload(state);
            if state.info.is_empty() {
                state.info = "Reloaded".into();
            }
        }
        _ => match state.tab {
            TAB_DASHBOARD => handle_dashboard_key(state, k),
            TAB_RUNS => handle_runs_key(state, k),
            TAB_SCAN => handle_scan_key(state, k, cmd_tx),
            _ => {}
        },
    }
    KeyOutcome::Continue
}

fn quit(state: &mut UiState, cmd_tx: &UnboundedSender<UiCommand>) -> KeyOutcome {
    let _ = cmd_tx.send(UiCommand::Quit);
    if let Some(busy) = state.busy.as_ref() {
        // The pipeline cannot be cancelled; stay up until it exits.
        state.quitting = true;
        state.info = format!(
            "Quitting after the scan of {} finishes…",
            busy.target
        );
        KeyOutcome::Continue
    } else {
        KeyOutcome::Quit
    }
}

fn handle_dashboard_key(state: &mut UiState, k: KeyEvent) {
    match k.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.dashboard_scroll = state.dashboard_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.dashboard_scroll = state.dashboard_scroll.saturating_add(1);
        }
        KeyCode::Char('v') => {
            state.show_raw = !state.show_raw;
            state.show_output = false;
            state.dashboard_scroll = 0;
        }
        KeyCode::Char('y') => {
            if let Some(view) = state.view.as_ref() {
                let path = view.path.display().to_string();
                state.info = match copy_to_clipboard(&path) {
                    Ok(_) => format!("✓ Copied to clipboard: {}", path),
                    Err(e) => format!("Clipboard copy failed: {e:#}"),
                };
            }
        }
        _ => {}
    }
}

fn handle_runs_key(state: &mut UiState, k: KeyEvent) {
    match k.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if state.runs_selected > 0 {
                state.select(state.runs_selected - 1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select(state.runs_selected + 1);
        }
        KeyCode::Enter => {
            if state.view.is_some() {
                state.tab = TAB_DASHBOARD;
            }
        }
        KeyCode::Char('/') => {
            state.filter_editing = true;
        }
        KeyCode::Char('e') => {
            if let Some(view) = state.view.as_ref() {
                match export_findings_json_here(view) {
                    Ok(p) => {
                        state.last_exported_path = Some(p.to_string_lossy().to_string());
                        state.info =
                            format!("Exported JSON: {} (press 'y' to copy path)", p.display());
                    }
                    Err(e) => {
                        state.info = format!("JSON export failed: {e:#}");
                    }
                }
            }
        }
        KeyCode::Char('y') => {
            if let Some(ref path) = state.last_exported_path {
                state.info = match copy_to_clipboard(path) {
                    Ok(_) => format!("✓ Copied to clipboard: {}", path),
                    Err(e) => format!("Clipboard copy failed: {e:#}"),
                };
            } else {
                state.info = "No exported file path to copy. Export a file first (e)".into();
            }
        }
        KeyCode::Char('d') => {
            if state.busy.is_some() {
                state.info = InfoEvent::ScanBusy.to_message();
                return;
            }
            if let Some(run) = state.runs.get(state.runs_selected).cloned() {
                match crate::storage::delete_run(&run) {
                    Ok(()) => {
                        state.runs.remove(state.runs_selected);
                        state.labels.remove(state.runs_selected);
                        if state.runs_selected >= state.runs.len() && !state.runs.is_empty() {
                            state.runs_selected = state.runs.len() - 1;
                        } else if state.runs.is_empty() {
                            state.runs_selected = 0;
                            state.runs_scroll_offset = 0;
                        }
                        state.load_selected();
                        state.info = "Deleted".into();
                    }
                    Err(e) => state.info = format!("Delete failed: {e:#}"),
                }
            }
        }
        _ => {}
    }
}

fn handle_scan_key(state: &mut UiState, k: KeyEvent, cmd_tx: &UnboundedSender<UiCommand>) {
    let field = state.current_field();
    match k.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.scan_field = state.scan_field.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scan_field = (state.scan_field + 1).min(ScanField::ALL.len() - 1);
        }
        KeyCode::Char(' ') => {
            if field == ScanField::Target {
                state.target_editing = true;
            } else {
                state.toggle_field(field, true);
            }
        }
        KeyCode::Left | KeyCode::Char('h') if field == ScanField::Keep => {
            state.toggle_field(field, false);
        }
        KeyCode::Right | KeyCode::Char('l') if field == ScanField::Keep => {
            state.toggle_field(field, true);
        }
        KeyCode::Enter => request_scan(state, cmd_tx),
        _ => {}
    }
}

fn apply_event(state: &mut UiState, ev: DashboardEvent) {
    match ev {
        DashboardEvent::ScanStarted { target } => {
            state.info = format!("Running pipeline for {target}…");
            state.last_output = None;
            state.busy = Some(Busy {
                target,
                started: Instant::now(),
            });
        }
        DashboardEvent::ScanFinished { target, result } => {
            let started = state.busy.take().is_some();
            if !started {
                // Rejected before spawning (empty target, missing script).
                if let ScanResult::Failed(msg) = result {
                    state.info = msg;
                }
                return;
            }
            handle_scan_finished(state, &target, &result);
        }
        DashboardEvent::Info(info) => state.info = info.to_message(),
    }
}

fn handle_scan_finished(state: &mut UiState, target: &str, result: &ScanResult) {
    let processed = orchestrator::process_scan_completion(&state.config, target, result);
    let pruned = processed.loaded.pruned.clone();

    state.apply_loaded(processed.loaded);
    state.info = processed.message;
    if !pruned.is_empty() {
        state.info = format!(
            "{}; {}",
            state.info,
            InfoEvent::Pruned {
                removed: pruned.removed.len(),
                failed: pruned.failed.len(),
            }
            .to_message()
        );
    }
    state.last_output = processed.output;

    if let Some(i) = processed.select {
        state.select(i);
        if !state.quitting {
            state.tab = TAB_DASHBOARD;
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(6),
            ]
            .as_ref(),
        )
        .split(area);

    let title = match state.busy.as_ref() {
        Some(b) => format!(
            "osint-dash (scanning {} … {}s)",
            b.target,
            b.started.elapsed().as_secs()
        ),
        None => "osint-dash".to_string(),
    };
    let tabs = Tabs::new(vec![
        Line::from("Dashboard"),
        Line::from("Runs"),
        Line::from("Scan"),
        Line::from("Help"),
    ])
    .select(state.tab)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_DASHBOARD => draw_dashboard(chunks[1], f, state),
        TAB_RUNS => draw_runs(chunks[1], f, state),
        TAB_SCAN => draw_scan(chunks[1], f, state),
        _ => draw_help(chunks[1], f),
    }

    draw_status(chunks[2], f, state);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let storage_mode = if state.config.scan.single_folder {
        "single folder".to_string()
    } else {
        format!("keep latest {}", state.config.keep)
    };
    let mut lines = vec![Line::from(vec![
        Span::styled("Storage: ", Style::default().fg(Color::Gray)),
        Span::raw(storage_mode),
        Span::raw("   "),
        Span::styled("Scan: ", Style::default().fg(Color::Gray)),
        match state.busy.as_ref() {
            Some(_) => Span::styled("RUNNING", Style::default().fg(Color::Yellow)),
            None => Span::styled("idle", Style::default().fg(Color::Green)),
        },
    ])];

    push_wrapped_status_kv(&mut lines, "Info", &state.info, area.width);
    if let Some(out) = state.last_output.as_deref() {
        // The first line carries the exit code and usually the cause.
        let mut it = out.lines().filter(|l| !l.trim().is_empty());
        let first = it.next().unwrap_or_default();
        let more = it.count();
        let text = if more > 0 {
            format!("{first} (+{more} more, o: full output)")
        } else {
            first.to_string()
        };
        push_wrapped_status_kv(&mut lines, "Output", &text, area.width);
    }

    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_output(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let text = state.last_output.clone().unwrap_or_default();
    let p = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Pipeline output (o to close)"),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.dashboard_scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(p, area);
}

fn draw_dashboard(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    if state.show_output && state.last_output.is_some() {
        draw_output(area, f, state);
        return;
    }
    let Some(view) = state.view.as_ref() else {
        let p = Paragraph::new(vec![
            Line::from("No runs found."),
            Line::from(""),
            Line::from(NO_RUNS_HINT),
        ])
        .block(Block::default().borders(Borders::ALL).title("Dashboard"))
        .wrap(Wrap { trim: true });
        f.render_widget(p, area);
        return;
    };

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Run folder / summary / timestamp
                Constraint::Length(4), // KPI cards
                Constraint::Min(0),    // Findings lists
            ]
            .as_ref(),
        )
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(50),
                Constraint::Percentage(20),
                Constraint::Percentage(30),
            ]
            .as_ref(),
        )
        .split(main[0]);
    let cells = [
        ("Run folder", view.path.display().to_string()),
        ("Summary JSON", "summary.json".to_string()),
        (
            "Timestamp",
            view.timestamp.clone().unwrap_or_else(|| "—".to_string()),
        ),
    ];
    for (i, (title, value)) in cells.into_iter().enumerate() {
        f.render_widget(
            Paragraph::new(value).block(Block::default().borders(Borders::ALL).title(title)),
            header[i],
        );
    }

    let kpi_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4].as_ref())
        .split(main[1]);
    let colors = [Color::Cyan, Color::Green, Color::Magenta, Color::Yellow];
    for (i, (label, count)) in view.findings.kpis().into_iter().enumerate() {
        let card = Paragraph::new(vec![Line::from(Span::styled(
            count.to_string(),
            Style::default()
                .fg(colors[i])
                .add_modifier(Modifier::BOLD),
        ))])
        .block(Block::default().borders(Borders::ALL).title(label));
        f.render_widget(card, kpi_row[i]);
    }

    let scroll = (state.dashboard_scroll.min(u16::MAX as usize) as u16, 0);
    if state.show_raw {
        let raw = Paragraph::new(view.raw_json())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Raw summary.json (v to close)"),
            )
            .scroll(scroll);
        f.render_widget(raw, main[2]);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    if view.findings.is_empty() {
        lines.push(Line::from(Span::styled(
            "No findings in this run.",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    let sections: [(&str, &[String], &str); 4] = [
        ("Links", view.findings.mainstream.as_slice(), "No links found."),
        ("Emails", view.findings.emails.as_slice(), "No emails found."),
        ("Phones", view.findings.phones.as_slice(), "No phones found."),
        ("Avatars", view.findings.avatars.as_slice(), "No avatars found."),
    ];
    for (title, items, empty) in sections {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if items.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {empty}"),
                Style::default().fg(Color::Gray),
            )));
        } else {
            for item in items {
                lines.push(Line::from(vec![
                    Span::raw("  - "),
                    Span::styled(item.clone(), Style::default().fg(Color::Blue)),
                ]));
            }
        }
        lines.push(Line::from(""));
    }

    let findings = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Findings — {}", view.label)),
        )
        .scroll(scroll);
    f.render_widget(findings, main[2]);
}

fn draw_runs(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines: Vec<Line> = Vec::new();

    // Header and filter lines take 3 rows, borders 2.
    let max_items = (area.height as usize).saturating_sub(5).max(1);

    let total_count = state.runs.len();
    let current_pos = if total_count > 0 {
        state.runs_selected + 1
    } else {
        0
    };

    lines.push(Line::from(vec![
        Span::raw(format!("Runs ({}/{}) - ", current_pos, total_count)),
        Span::styled("↑/↓/j/k", Style::default().fg(Color::Magenta)),
        Span::raw(": navigate, "),
        Span::styled("enter", Style::default().fg(Color::Magenta)),
        Span::raw(": open, "),
        Span::styled("/", Style::default().fg(Color::Magenta)),
        Span::raw(": filter, "),
        Span::styled("d", Style::default().fg(Color::Magenta)),
        Span::raw(": delete, "),
        Span::styled("e", Style::default().fg(Color::Magenta)),
        Span::raw(": export JSON"),
    ]));

    let filter_style = if state.filter_editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::styled("Filter: ", Style::default().fg(Color::Gray)),
        Span::styled(
            if state.filter_editing {
                format!("{}_", state.filter)
            } else if state.filter.is_empty() {
                "(none)".to_string()
            } else {
                state.filter.clone()
            },
            filter_style,
        ),
    ]));
    lines.push(Line::from(""));

    if state.runs.is_empty() {
        lines.push(Line::from(Span::styled(
            "No runs found.",
            Style::default().fg(Color::Gray),
        )));
    }

    // Keep the selected item visible.
    let scroll_offset = {
        let mut offset = state
            .runs_scroll_offset
            .min(state.runs.len().saturating_sub(1));
        if state.runs_selected < offset {
            offset = state.runs_selected;
        } else if state.runs_selected >= offset + max_items {
            offset = state.runs_selected.saturating_sub(max_items - 1);
        }
        offset
    };

    for (display_idx, (run, label)) in state
        .runs
        .iter()
        .zip(&state.labels)
        .skip(scroll_offset)
        .take(max_items)
        .enumerate()
    {
        let idx = scroll_offset + display_idx;
        let is_selected = idx == state.runs_selected;
        let style = if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>3}. ", idx + 1),
                if is_selected {
                    style
                } else {
                    Style::default().fg(Color::Gray)
                },
            ),
            Span::styled(if is_selected { "> " } else { "  " }, style),
            Span::styled(label.clone(), style),
            Span::styled(
                format!("   {}", format_age(run.modified)),
                if is_selected {
                    style
                } else {
                    Style::default().fg(Color::Gray)
                },
            ),
        ]));
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Pick a run"));
    f.render_widget(p, area);
}

fn draw_scan(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines = vec![
        Line::from("Run a new scan"),
        Line::from(""),
    ];

    for (i, field) in ScanField::ALL.iter().enumerate() {
        let selected = i == state.scan_field;
        let marker = if selected { "> " } else { "  " };
        let mut value = state.field_value(*field);
        if *field == ScanField::Target && state.target_editing {
            value.push('_');
        }
        let value_style = if selected && state.target_editing && *field == ScanField::Target {
            Style::default().fg(Color::Yellow)
        } else if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<28}", field.label()), Style::default().fg(Color::Gray)),
            Span::styled(value, value_style),
        ]));
        if *field == ScanField::Target {
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Results base: ", Style::default().fg(Color::Gray)),
        Span::raw(state.config.scan.results_base.display().to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Pipeline: ", Style::default().fg(Color::Gray)),
        Span::raw(state.config.pipeline.display().to_string()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("enter", Style::default().fg(Color::Magenta)),
        Span::raw(if state.busy.is_some() {
            ": scan running, please wait"
        } else {
            ": ▶ Run scan"
        }),
    ]));

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Scan"));
    f.render_widget(p, area);
}
