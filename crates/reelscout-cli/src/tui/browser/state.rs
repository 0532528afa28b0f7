//! Browser TUI state management.
//!
//! Holds what the search session does not: the query being typed,
//! the list cursor and the status line.

use ratatui::widgets::TableState;
use reelscout_api::session::ActionOutcome;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Query text input mode.
    Query,
}

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Informational.
    Info,
    /// A request failed.
    Error,
}

/// Text shown in the footer until the next outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Severity.
    pub kind: StatusKind,
    /// Message.
    pub text: String,
}

impl StatusLine {
    fn info(text: String) -> Self {
        Self {
            kind: StatusKind::Info,
            text,
        }
    }

    fn error(text: String) -> Self {
        Self {
            kind: StatusKind::Error,
            text,
        }
    }
}

/// State for the browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Query text as typed.
    pub query_input: String,
    /// Table state for the result list (handles selection and scroll).
    pub table_state: TableState,
    /// Footer status, if any.
    pub status: Option<StatusLine>,
    /// Vertical scroll offset of the details view.
    pub detail_scroll: u16,
}

impl BrowserState {
    /// Creates a new state. Starts in query mode when no query is given.
    #[must_use]
    pub fn new(initial_query: Option<&str>) -> Self {
        let (input_mode, query_input) = match initial_query {
            Some(q) => (InputMode::Normal, String::from(q)),
            None => (InputMode::Query, String::new()),
        };
        Self {
            input_mode,
            query_input,
            table_state: TableState::default(),
            status: None,
            detail_scroll: 0,
        }
    }

    /// Returns the list cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Moves cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
    }

    /// Moves cursor down within `len` rows.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self, len: usize) {
        let current = self.cursor();
        if current + 1 < len {
            self.table_state.select(Some(current + 1));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_sub(page_size)));
    }

    /// Scrolls down by a page within `len` rows.
    pub fn page_down(&mut self, page_size: usize, len: usize) {
        let max = len.saturating_sub(1);
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_add(page_size).min(max)));
    }

    /// Scrolls the details view up one line.
    pub const fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    /// Scrolls the details view down one line.
    pub const fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    /// Switches to query input.
    pub const fn start_query_input(&mut self) {
        self.input_mode = InputMode::Query;
    }

    /// Leaves query input, keeping the typed text.
    pub const fn finish_query_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Appends a character to the query.
    pub fn query_push(&mut self, ch: char) {
        self.query_input.push(ch);
    }

    /// Removes the last character from the query.
    pub fn query_pop(&mut self) {
        self.query_input.pop();
    }

    /// Resets the details scroll when a title is opened or closed.
    pub const fn reset_detail_scroll(&mut self) {
        self.detail_scroll = 0;
    }

    /// Updates cursor and status line after a completion was applied.
    ///
    /// `new_search` is true when the completion answered a fresh submission,
    /// which moves the cursor back to the top. `len` is the result count
    /// after the completion.
    pub fn on_outcome(&mut self, outcome: &ActionOutcome, new_search: bool, len: usize) {
        match outcome {
            ActionOutcome::Ignored => {}
            ActionOutcome::Listed { added, total } => {
                if new_search || self.table_state.selected().is_none() {
                    self.table_state.select(Some(0));
                }
                self.status = Some(StatusLine::info(format!(
                    "Loaded {added} titles ({len} of {total})"
                )));
            }
            ActionOutcome::NoResults { reason } => {
                self.table_state.select(None);
                self.status = Some(StatusLine::info(format!("No results found. ({reason})")));
            }
            ActionOutcome::NoMorePages { reason } => {
                self.status = Some(StatusLine::info(format!("No more results. ({reason})")));
            }
            ActionOutcome::Selected => {
                self.detail_scroll = 0;
                self.status = None;
            }
            ActionOutcome::DetailNotFound { reason } => {
                self.status = Some(StatusLine::error(format!("Details not found: {reason}")));
            }
            ActionOutcome::Failed { reason } => {
                self.status = Some(StatusLine::error(format!("Request failed: {reason}")));
            }
        }
    }
}
