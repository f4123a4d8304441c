use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key(k: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(k, Style::default().fg(Color::Magenta)),
        Span::raw(format!("{:width$}{}", "", what, width = pad)),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit (waits for a running scan)"),
        ]),
        key("s", 11, "Start a scan (opens the Scan tab)"),
        key("r", 11, "Reload runs from disk"),
        key("o", 11, "Show or hide the last pipeline output"),
        key("tab", 9, "Switch tabs"),
        key("?", 11, "Show this help"),
        Line::from(""),
        Line::from("Dashboard tab:"),
        key("↑/↓", 9, "Scroll findings"),
        key("v", 11, "Toggle raw summary.json"),
        key("y", 11, "Copy run folder to clipboard"),
        Line::from(""),
        Line::from("Runs tab:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("↑/↓", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("j/k", Style::default().fg(Color::Magenta)),
            Span::raw("  Navigate"),
        ]),
        key("enter", 7, "Open selected run on the Dashboard"),
        key("/", 11, "Filter by target name"),
        key("e", 11, "Export selected findings as JSON"),
        key("y", 11, "Copy exported path to clipboard"),
        key("d", 11, "Delete selected run"),
        Line::from(""),
        Line::from("Scan tab:"),
        key("↑/↓", 9, "Move between fields"),
        key("space", 7, "Toggle option / edit target"),
        key("←/→", 9, "Change retention count"),
        key("enter", 7, "Run scan"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
