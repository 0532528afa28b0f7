//! TUI rendering logic for the browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};
use reelscout_api::omdb::{MovieDetail, TitleKind};
use reelscout_api::session::{SearchFilters, SearchSession, View};

use super::state::{BrowserState, InputMode, StatusKind};

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[allow(clippy::arithmetic_side_effects)]
fn fmt_num(n: u32) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Draws the browser UI. Returns the main content area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState, session: &SearchSession) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // query + counts
            Constraint::Min(5),    // main content
            Constraint::Length(4), // status + key hints
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state, session);

    let main_area = chunks[1];
    match session.view() {
        View::Idle => draw_message(frame, main_area, "Press / to search OMDB by title."),
        View::NoResults => draw_message(frame, main_area, "No results found."),
        View::Listing => draw_result_list(frame, main_area, state, session),
        View::Details => {
            if let Some(detail) = session.selected_detail() {
                draw_details(frame, main_area, detail, state.detail_scroll);
            }
        }
    }

    draw_footer(frame, chunks[2], state, session);

    main_area.height
}

/// Draws the query input and result counters.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState, session: &SearchSession) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let query_style = if state.input_mode == InputMode::Query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let query = Paragraph::new(state.query_input.as_str())
        .style(query_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(query, header_chunks[0]);

    if state.input_mode == InputMode::Query {
        let typed = u16::try_from(state.query_input.chars().count()).unwrap_or(u16::MAX);
        let max_x = header_chunks[0]
            .right()
            .saturating_sub(2)
            .max(header_chunks[0].x);
        let x = header_chunks[0]
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(max_x);
        frame.set_cursor_position((x, header_chunks[0].y.saturating_add(1)));
    }

    let pagination = session.pagination();
    let mut counts = if session.has_searched() {
        format!(
            "{} / {} titles  page {}",
            session.results().len(),
            fmt_num(pagination.total),
            pagination.page,
        )
    } else {
        String::new()
    };
    if session.is_loading() {
        counts.push_str("  loading...");
    }
    let title = filter_label(session.filters())
        .map_or_else(|| String::from(" reelscout "), |f| format!(" reelscout [{f}] "));
    let counts =
        Paragraph::new(counts).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(counts, header_chunks[1]);
}

/// Describes the session filters, e.g. `movie, 2005`. `None` when unfiltered.
fn filter_label(filters: SearchFilters) -> Option<String> {
    let parts: Vec<String> = filters
        .kind
        .map(|k| String::from(k.label()))
        .into_iter()
        .chain(filters.year.map(|y| y.to_string()))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Draws a single message in place of the result list.
fn draw_message(frame: &mut Frame, area: Rect, text: &str) {
    let message = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Results "));
    frame.render_widget(message, area);
}

/// Draws the accumulated result list.
fn draw_result_list(
    frame: &mut Frame,
    area: Rect,
    state: &mut BrowserState,
    session: &SearchSession,
) {
    let header = Row::new(vec!["IMDb ID", "Title", "Year", "Type", "Poster"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = session
        .results()
        .iter()
        .map(|item| {
            let style = if item.kind == TitleKind::Movie {
                Style::default()
            } else {
                Style::default().fg(Color::Green)
            };
            let poster = if item.poster.url().is_some() {
                "yes"
            } else {
                "--"
            };
            Row::new(vec![
                item.imdb_id.clone(),
                item.title.clone(),
                item.year.clone(),
                String::from(item.kind.label()),
                String::from(poster),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(6),
    ];

    let title = if session.has_more() {
        format!(
            " Results: {} (m: load more) ",
            session.active_query().map_or("", |q| q.as_str())
        )
    } else {
        format!(
            " Results: {} ",
            session.active_query().map_or("", |q| q.as_str())
        )
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Renders `value` or a dash for fields OMDB left empty.
fn or_dash(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| String::from("-"))
}

/// Builds a `label: value` line for the details view.
fn field_line(label: &'static str, value: Option<&String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<10}"),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(or_dash(value)),
    ])
}

/// Builds the lines of the details view.
fn detail_lines(detail: &MovieDetail) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                detail.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" ({})  {}", detail.year, detail.kind.label())),
        ]),
        Line::from(""),
        field_line("Rated", detail.rated.as_ref()),
        field_line("Released", detail.released.as_ref()),
        field_line("Runtime", detail.runtime.as_ref()),
        field_line("Genre", detail.genre.as_ref()),
        field_line("Director", detail.director.as_ref()),
        field_line("Actors", detail.actors.as_ref()),
        field_line("Language", detail.language.as_ref()),
        field_line("Country", detail.country.as_ref()),
        field_line("IMDb", detail.imdb_rating.as_ref()),
    ];

    for rating in &detail.ratings {
        lines.push(Line::from(format!("  {}: {}", rating.source, rating.value)));
    }

    let poster = detail
        .poster
        .url()
        .map_or_else(|| String::from("(no image)"), String::from);
    lines.push(field_line("Poster", Some(&poster)));
    lines.push(Line::from(""));
    lines.push(Line::from(or_dash(detail.plot.as_ref())));
    lines
}

/// Draws the details view of the selected title.
fn draw_details(frame: &mut Frame, area: Rect, detail: &MovieDetail, scroll: u16) {
    let paragraph = Paragraph::new(detail_lines(detail))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", detail.imdb_id))
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, area);
}

/// Draws the status line and key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState, session: &SearchSession) {
    let status = state.status.as_ref().map_or_else(
        || Line::from(""),
        |s| {
            let color = match s.kind {
                StatusKind::Info => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Line::from(Span::styled(s.text.clone(), Style::default().fg(color)))
        },
    );

    let help_text = match (state.input_mode, session.view()) {
        (InputMode::Query, _) => Line::from("Type a title | Enter: search | Esc: cancel"),
        (InputMode::Normal, View::Details) => Line::from(
            "\u{2191}\u{2193}/j/k: scroll  o: open IMDb  Esc/b: back  q: quit",
        ),
        (InputMode::Normal, View::Listing) => Line::from(
            "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  Enter: details  m: more  /: search  o: open IMDb  q: quit",
        ),
        (InputMode::Normal, View::Idle | View::NoResults) => {
            Line::from("/: search  q: quit")
        }
    };

    let footer = Paragraph::new(vec![status, help_text])
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
