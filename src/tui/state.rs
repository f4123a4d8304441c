use crate::findings::RunView;
use crate::model::{AppConfig, Run};
use crate::orchestrator::LoadedRuns;
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};
use std::time::Instant;

pub const TAB_DASHBOARD: usize = 0;
pub const TAB_RUNS: usize = 1;
pub const TAB_SCAN: usize = 2;
pub const TAB_HELP: usize = 3;
pub const TAB_COUNT: usize = 4;

/// Toggles on the Scan tab, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanField {
    Target,
    Deep,
    IncludeX,
    Compact,
    SingleFolder,
    Keep,
}

impl ScanField {
    pub const ALL: [ScanField; 6] = [
        ScanField::Target,
        ScanField::Deep,
        ScanField::IncludeX,
        ScanField::Compact,
        ScanField::SingleFolder,
        ScanField::Keep,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScanField::Target => "Target username or name",
            ScanField::Deep => "Deep scan",
            ScanField::IncludeX => "Include X/Twitter",
            ScanField::Compact => "Compact mode",
            ScanField::SingleFolder => "Single folder (overwrite)",
            ScanField::Keep => "Keep latest N runs",
        }
    }
}

/// Scan currently in flight.
pub struct Busy {
    pub target: String,
    pub started: Instant,
}

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub config: AppConfig,

    pub runs: Vec<Run>,
    pub labels: Vec<String>,
    pub runs_selected: usize, // Index of selected run (0 = most recent)
    pub runs_scroll_offset: usize,
    // Run filtering
    pub filter: String,       // Current filter text
    pub filter_editing: bool, // Whether user is typing in filter input

    /// Run shown on the Dashboard tab.
    pub view: Option<RunView>,
    pub dashboard_scroll: usize,
    pub show_raw: bool,
    /// Full pipeline output in place of the findings.
    pub show_output: bool,

    // Scan form
    pub target_input: String,
    pub target_editing: bool,
    pub scan_field: usize,

    pub busy: Option<Busy>,
    pub quitting: bool,
    /// Pipeline stdout after success, failure detail otherwise.
    pub last_output: Option<String>,
    pub last_exported_path: Option<String>,
}

impl UiState {
    pub fn new(config: AppConfig) -> Self {
        let filter = config.filter.clone().unwrap_or_default();
        Self {
            tab: TAB_DASHBOARD,
            info: String::new(),
            config,
            runs: Vec::new(),
            labels: Vec::new(),
            runs_selected: 0,
            runs_scroll_offset: 0,
            filter,
            filter_editing: false,
            view: None,
            dashboard_scroll: 0,
            show_raw: false,
            show_output: false,
            target_input: String::new(),
            target_editing: false,
            scan_field: 0,
            busy: None,
            quitting: false,
            last_output: None,
            last_exported_path: None,
        }
    }

    /// Replace the run list and keep the selection in range.
    pub fn apply_loaded(&mut self, loaded: LoadedRuns) {
        self.runs = loaded.runs;
        self.labels = loaded.labels;
        if self.runs.is_empty() {
            self.runs_selected = 0;
            self.runs_scroll_offset = 0;
        } else if self.runs_selected >= self.runs.len() {
            self.runs_selected = self.runs.len() - 1;
        }
        if self.runs_scroll_offset > self.runs_selected {
            self.runs_scroll_offset = self.runs_selected;
        }
        self.load_selected();
    }

    /// Reload the Dashboard view from the selected run; `None` when there are no runs.
    pub fn load_selected(&mut self) {
        self.view = self.runs.get(self.runs_selected).map(RunView::load);
        self.dashboard_scroll = 0;
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.runs.len() {
            self.runs_selected = idx;
            if self.runs_selected < self.runs_scroll_offset {
                self.runs_scroll_offset = self.runs_selected;
            }
            self.load_selected();
        }
    }

    pub fn current_field(&self) -> ScanField {
        ScanField::ALL[self.scan_field % ScanField::ALL.len()]
    }

    /// Flip a boolean toggle or step the retention count.
    pub fn toggle_field(&mut self, field: ScanField, forward: bool) {
        let scan = &mut self.config.scan;
        match field {
            ScanField::Target => {}
            ScanField::Deep => scan.deep = !scan.deep,
            ScanField::IncludeX => scan.include_x = !scan.include_x,
            ScanField::Compact => scan.compact = !scan.compact,
            ScanField::SingleFolder => scan.single_folder = !scan.single_folder,
            ScanField::Keep => {
                self.config.keep = if forward {
                    (self.config.keep + 1).min(100)
                } else {
                    self.config.keep.saturating_sub(1).max(1)
                };
            }
        }
    }

    pub fn field_value(&self, field: ScanField) -> String {
        let on_off = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();
        let scan = &self.config.scan;
        match field {
            ScanField::Target => self.target_input.clone(),
            ScanField::Deep => on_off(scan.deep),
            ScanField::IncludeX => on_off(scan.include_x),
            ScanField::Compact => on_off(scan.compact),
            ScanField::SingleFolder => on_off(scan.single_folder),
            ScanField::Keep => self.config.keep.to_string(),
        }
    }
}

pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    // Account for borders (2 chars on each side)
    let usable_width = status_area_width.saturating_sub(4).max(1);
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count() as u16;

    let value_chars: Vec<char> = value.chars().collect();
    let mut remaining = value_chars.as_slice();
    let mut first = true;

    while !remaining.is_empty() {
        let line_width = if first {
            usable_width.saturating_sub(label_width + 1).max(1)
        } else {
            usable_width.saturating_sub(2).max(1)
        };

        let chars_to_take = (remaining.len() as u16).min(line_width) as usize;
        let (line_chars, rest) = remaining.split_at(chars_to_take);
        let line_text: String = line_chars.iter().collect();

        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(line_text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(line_text)]));
        }

        remaining = rest;
    }
}
