//! leaf entrypoint: wires the document/render engine to the terminal
//! driver in one synchronous loop: compose and present a frame, block on
//! the next key, dispatch, repeat.

use anyhow::{Context, Result};
use clap::Parser;
use core_model::{Document, SearchMove, SearchSession};
use core_render::compose_frame;
use core_state::{EditorState, Viewport};
use core_terminal::{read_key, window_size, Key, TerminalGuard};
use std::io::stdout;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Rows reserved below the text area: status bar and message bar.
const CHROME_ROWS: usize = 2;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "leaf", version, about = "leaf editor")]
struct Args {
    /// Optional path to open at startup. A missing file opens an empty
    /// buffer under that name.
    pub path: Option<PathBuf>,
    /// Append logs to this file (the screen belongs to the editor).
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// File-appender logging; disabled without `--log-file`. `LEAF_LOG`
/// selects the filter. The guard must outlive the process body.
fn init_logging(path: Option<&Path>) -> Option<WorkerGuard> {
    let path = path?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("leaf.log"));
    let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LEAF_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.as_deref());
    info!(path = ?args.path, "starting leaf");

    let (doc, open_error) = match &args.path {
        Some(path) if path.exists() => match Document::open(path) {
            Ok(doc) => (doc, None),
            Err(err) => {
                error!(%err, "open failed");
                (Document::new(), Some(err.to_string()))
            }
        },
        Some(path) => {
            let mut doc = Document::new();
            doc.set_filename(path.clone());
            (doc, None)
        }
        None => (Document::new(), None),
    };

    // Raw-mode or window-size failure is fatal; the guard restores the
    // terminal before the error propagates out of main.
    let mut guard = TerminalGuard::enter().context("failed to enable raw mode")?;
    let (rows, cols) = window_size().context("failed to query window size")?;

    let mut state = EditorState::new(doc, Viewport::new(rows.saturating_sub(CHROME_ROWS), cols));
    match open_error {
        Some(err) => state.set_status_message(err),
        None => state.set_status_message("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find"),
    }

    let result = run(&mut state);
    guard.leave()?;
    info!("leaf exiting");
    result
}

fn run(state: &mut EditorState) -> Result<()> {
    loop {
        refresh(state)?;
        let key = read_key()?;
        if !process_key(state, key)? {
            return Ok(());
        }
    }
}

/// Re-query the window, re-clamp the viewport, compose, and hand the
/// finished frame to the terminal in one write.
fn refresh(state: &mut EditorState) -> Result<()> {
    let (rows, cols) = window_size()?;
    state.viewport.screen_rows = rows.saturating_sub(CHROME_ROWS);
    state.viewport.screen_cols = cols;
    state.viewport.scroll(&state.doc);
    let frame = compose_frame(state)?;
    frame.present(&mut stdout())
}

/// Dispatch one key. Returns `false` when the loop should exit.
fn process_key(state: &mut EditorState, key: Key) -> Result<bool> {
    match key {
        Key::Ctrl('q') => {
            if state.request_quit() {
                return Ok(false);
            }
            // guard message set; skip the reset below
            return Ok(true);
        }
        Key::Ctrl('s') => save(state)?,
        Key::Ctrl('f') => find(state)?,
        Key::Enter => state.doc.insert_newline(),
        Key::Backspace | Key::Ctrl('h') => state.doc.delete_char(),
        Key::Delete => {
            move_cursor(state, Key::Right);
            state.doc.delete_char();
        }
        Key::Up | Key::Down | Key::Left | Key::Right => move_cursor(state, key),
        Key::Home => state.doc.cx = 0,
        Key::End => {
            state.doc.cx = state.doc.row(state.doc.cy).map_or(0, |r| r.len());
        }
        Key::PageUp | Key::PageDown => page_move(state, key),
        Key::Escape | Key::Ctrl('l') => {}
        Key::Ctrl(_) => {}
        Key::Char(c) => state.doc.insert_char(c),
    }
    state.reset_quit_guard();
    Ok(true)
}

/// Arrow-key movement: horizontal moves wrap across
/// row boundaries, vertical moves clamp the column to the new row.
fn move_cursor(state: &mut EditorState, key: Key) {
    let doc = &mut state.doc;
    match key {
        Key::Left => {
            if doc.cx > 0 {
                doc.cx -= 1;
            } else if doc.cy > 0 {
                doc.cy -= 1;
                doc.cx = doc.row(doc.cy).map_or(0, |r| r.len());
            }
        }
        Key::Right => {
            if let Some(row) = doc.row(doc.cy) {
                if doc.cx < row.len() {
                    doc.cx += 1;
                } else {
                    doc.cy += 1;
                    doc.cx = 0;
                }
            }
        }
        Key::Up => doc.cy = doc.cy.saturating_sub(1),
        Key::Down => {
            if doc.cy < doc.row_count() {
                doc.cy += 1;
            }
        }
        _ => {}
    }
    let len = doc.row(doc.cy).map_or(0, |r| r.len());
    if doc.cx > len {
        doc.cx = len;
    }
}

/// Page keys move the cursor to the window edge, then a full screen.
fn page_move(state: &mut EditorState, key: Key) {
    let rows = state.viewport.screen_rows;
    state.doc.cy = match key {
        Key::PageUp => state.viewport.row_offset,
        _ => (state.viewport.row_offset + rows.saturating_sub(1)).min(state.doc.row_count()),
    };
    let arrow = if key == Key::PageUp { Key::Up } else { Key::Down };
    for _ in 0..rows {
        move_cursor(state, arrow);
    }
}

fn save(state: &mut EditorState) -> Result<()> {
    if state.doc.filename().is_none() {
        match prompt(state, "Save as (ESC to cancel): ", None)? {
            Some(name) => state.doc.set_filename(name),
            None => {
                state.set_status_message("Save aborted");
                return Ok(());
            }
        }
    }
    match state.doc.save() {
        Ok(bytes) => state.set_status_message(format!("{bytes} bytes written to disk")),
        Err(err) => {
            error!(%err, "save failed");
            state.set_status_message(format!("Can't save! {err}"));
        }
    }
    Ok(())
}

/// Incremental find: every prompt keystroke steps the search session;
/// arrows pick the direction, anything else restarts from the top with
/// the edited query. Cancelling restores cursor and scroll position.
fn find(state: &mut EditorState) -> Result<()> {
    let saved_cursor = (state.doc.cx, state.doc.cy);
    let saved_scroll = (state.viewport.col_offset, state.viewport.row_offset);
    let mut session = SearchSession::new();
    info!("search started");

    let mut on_key = |state: &mut EditorState, query: &str, key: Key| {
        let mv = match key {
            Key::Enter | Key::Escape => {
                session.finish(&mut state.doc);
                return;
            }
            Key::Right | Key::Down => SearchMove::Next,
            Key::Left | Key::Up => SearchMove::Prev,
            _ => SearchMove::Reset,
        };
        if session.step(&mut state.doc, query, mv).is_some() {
            let rows = state.doc.row_count();
            state.viewport.force_reclamp(rows);
        }
    };

    let outcome = prompt(state, "Search (Use ESC/Arrows/Enter): ", Some(&mut on_key))?;
    if outcome.is_none() {
        (state.doc.cx, state.doc.cy) = saved_cursor;
        (state.viewport.col_offset, state.viewport.row_offset) = saved_scroll;
    }
    info!(confirmed = outcome.is_some(), "search ended");
    Ok(())
}

/// Mini-prompt on the message bar. Collects printable bytes, Backspace
/// edits, Esc cancels, Enter confirms non-empty input. The observer (a
/// capability, invoked synchronously after every keystroke with the
/// current input) drives incremental search.
fn prompt(
    state: &mut EditorState,
    label: &str,
    mut observer: Option<&mut dyn FnMut(&mut EditorState, &str, Key)>,
) -> Result<Option<String>> {
    let mut input = String::new();
    loop {
        state.set_status_message(format!("{label}{input}"));
        refresh(state)?;
        let key = read_key()?;
        match key {
            Key::Escape => {
                state.clear_status_message();
                if let Some(f) = observer.as_mut() {
                    f(state, &input, key);
                }
                return Ok(None);
            }
            Key::Enter => {
                if !input.is_empty() {
                    state.clear_status_message();
                    if let Some(f) = observer.as_mut() {
                        f(state, &input, key);
                    }
                    return Ok(Some(input));
                }
            }
            Key::Backspace | Key::Ctrl('h') => {
                input.pop();
            }
            Key::Char(c) if !c.is_control() => input.push(c),
            _ => {}
        }
        if let Some(f) = observer.as_mut() {
            f(state, &input, key);
        }
    }
}
