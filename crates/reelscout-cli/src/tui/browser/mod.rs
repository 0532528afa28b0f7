//! Movie browser TUI main loop.
//!
//! Requests run on spawned tasks and report back over a channel, so the
//! screen keeps redrawing while OMDB answers.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use reelscout_api::omdb::{OmdbApi, imdb_title_url};
use reelscout_api::session::{Completion, PendingRequest, SearchController, View};
use tokio::sync::mpsc;

use self::state::{BrowserState, InputMode};

/// Sleep between input polls when no key is pending.
const IDLE_TICK: Duration = Duration::from_millis(50);

/// What a key press asks the event loop to do.
enum KeyAction {
    /// Keep going.
    None,
    /// Leave the browser.
    Quit,
    /// Send a request in the background.
    Send(PendingRequest),
}

/// Runs the browser TUI.
///
/// When `initial_query` is given, its search starts before the first frame.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser<A>(
    mut controller: SearchController<A>,
    initial_query: Option<&str>,
) -> Result<()>
where
    A: OmdbApi + Sync + 'static,
{
    let mut state = BrowserState::new(initial_query);
    let (tx, mut rx) = mpsc::unbounded_channel();

    if let Some(query) = initial_query
        && let Some(request) = controller.begin_search(query)
    {
        spawn_request(&controller, request, &tx);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &mut controller, &tx, &mut rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    controller: &mut SearchController<A>,
    tx: &mpsc::UnboundedSender<Completion>,
    rx: &mut mpsc::UnboundedReceiver<Completion>,
) -> Result<()>
where
    A: OmdbApi + Sync + 'static,
{
    let mut main_area_height: u16 = 0;

    loop {
        while let Ok(completion) = rx.try_recv() {
            let new_search = matches!(completion, Completion::Search { .. });
            let outcome = controller.apply(completion);
            state.on_outcome(&outcome, new_search, controller.session().results().len());
        }

        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, state, controller.session());
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        if !event::poll(Duration::ZERO).context("failed to poll events")? {
            tokio::time::sleep(IDLE_TICK).await;
            continue;
        }

        if let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = match state.input_mode {
                InputMode::Query => handle_query_input(state, controller, key.code),
                InputMode::Normal => {
                    handle_normal_input(state, controller, key.code, key.modifiers, page_size)
                }
            };
            match action {
                KeyAction::None => {}
                KeyAction::Quit => return Ok(()),
                KeyAction::Send(request) => spawn_request(controller, request, tx),
            }
        }

        // Let spawned requests progress on the current-thread runtime.
        tokio::task::yield_now().await;
    }
}

/// Sends `request` on a background task; its completion arrives on `tx`.
fn spawn_request<A>(
    controller: &SearchController<A>,
    request: PendingRequest,
    tx: &mpsc::UnboundedSender<Completion>,
) where
    A: OmdbApi + Sync + 'static,
{
    let future = controller.dispatch(request);
    let tx = tx.clone();
    tokio::spawn(async move {
        // The receiver is gone once the browser has exited.
        let _ = tx.send(future.await);
    });
}

/// Handles key input in query mode.
fn handle_query_input<A>(
    state: &mut BrowserState,
    controller: &mut SearchController<A>,
    key: KeyCode,
) -> KeyAction {
    match key {
        KeyCode::Esc => state.finish_query_input(),
        KeyCode::Enter => {
            state.finish_query_input();
            if let Some(request) = controller.begin_search(&state.query_input) {
                return KeyAction::Send(request);
            }
        }
        KeyCode::Backspace => state.query_pop(),
        KeyCode::Char(c) => state.query_push(c),
        _ => {}
    }
    KeyAction::None
}

/// Handles key input in normal mode.
fn handle_normal_input<A>(
    state: &mut BrowserState,
    controller: &mut SearchController<A>,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> KeyAction {
    match key {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        _ => {}
    }

    if controller.session().view() == View::Details {
        handle_details_input(state, controller, key);
        return KeyAction::None;
    }

    let len = controller.session().results().len();
    match key {
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(len),
        KeyCode::PageUp => state.page_up(page_size),
        KeyCode::PageDown => state.page_down(page_size, len),
        KeyCode::Char('/' | 'i') => state.start_query_input(),
        KeyCode::Char('m') => {
            if let Some(request) = controller.begin_load_more() {
                return KeyAction::Send(request);
            }
        }
        KeyCode::Enter => {
            let imdb_id = current_imdb_id(state, controller);
            if let Some(request) = imdb_id.and_then(|id| controller.begin_select(&id)) {
                return KeyAction::Send(request);
            }
        }
        KeyCode::Char('o') => {
            if let Some(imdb_id) = current_imdb_id(state, controller) {
                open_imdb_page(&imdb_id);
            }
        }
        _ => {}
    }
    KeyAction::None
}

/// Handles key input while the details view is shown.
fn handle_details_input<A>(
    state: &mut BrowserState,
    controller: &mut SearchController<A>,
    key: KeyCode,
) {
    match key {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
            controller.clear_selection();
            state.reset_detail_scroll();
        }
        KeyCode::Char('/' | 'i') => {
            controller.clear_selection();
            state.reset_detail_scroll();
            state.start_query_input();
        }
        KeyCode::Up | KeyCode::Char('k') => state.scroll_detail_up(),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_detail_down(),
        KeyCode::Char('o') => {
            if let Some(detail) = controller.session().selected_detail() {
                open_imdb_page(&detail.imdb_id);
            }
        }
        _ => {}
    }
}

/// Returns the IMDb ID under the list cursor.
fn current_imdb_id<A>(state: &BrowserState, controller: &SearchController<A>) -> Option<String> {
    controller
        .session()
        .results()
        .get(state.cursor())
        .map(|item| item.imdb_id.clone())
}

/// Opens the IMDb page of a title in the default browser.
fn open_imdb_page(imdb_id: &str) {
    let url = imdb_title_url(imdb_id);
    if let Err(err) = open::that(&url) {
        tracing::warn!(url = %url, "failed to open browser: {err}");
    }
}
