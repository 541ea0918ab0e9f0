mod app;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppError, AppEvent, AppModel};
use crate::infra::{TodoStore, init_file_logger, resolve_data_dir};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};

fn main() {
    if let Err(error) = run_main() {
        log::error!("{error}");
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), AppError> {
    let data_dir = resolve_data_dir()?;
    if let Some(log_path) = init_file_logger(&data_dir) {
        log::info!("gdn starting, logging to {}", log_path.display());
    }

    let store = TodoStore::open_in(&data_dir)?;
    log::info!("opened todo DB at {}", store.db_path().display());

    let mut model = AppModel::new();
    handle_command(&store, &mut model, AppCommand::Refresh);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &store, &mut model);
    let restored = restore_terminal(&mut terminal);
    let closed = store.close();

    result?;
    restored?;
    closed?;
    log::info!("gdn exiting");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, AppError> {
    enable_raw_mode()?;
    enter_screen().map_err(|error| {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        error
    })
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>, AppError> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let _ = stdout.execute(EnableBracketedPaste);
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), AppError> {
    disable_raw_mode()?;
    let _ = execute!(terminal.backend_mut(), DisableBracketedPaste);
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    store: &TodoStore,
    model: &mut AppModel,
) -> Result<(), AppError> {
    loop {
        terminal.draw(|frame| ui::render(frame, model))?;

        // Blocking read: every handler runs to completion before the next event.
        let app_event = match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                AppEvent::Key(key)
            }
            Event::Paste(text) => AppEvent::Paste(text),
            _ => continue,
        };

        if handle_event(store, model, app_event) {
            return Ok(());
        }
    }
}

/// Applies one event and runs the resulting command. Returns `true` on quit.
fn handle_event(store: &TodoStore, model: &mut AppModel, app_event: AppEvent) -> bool {
    let (next, command) = app::update(std::mem::take(model), app_event);
    *model = next;
    if command == AppCommand::Quit {
        return true;
    }
    handle_command(store, model, command);
    false
}

fn handle_command(store: &TodoStore, model: &mut AppModel, command: AppCommand) {
    let Some(follow_up) = execute_command(store, command) else {
        return;
    };
    let (next, _command) = app::update(std::mem::take(model), follow_up);
    *model = next;
}

/// Runs a storage command and reports the refreshed list (or the failure) as an event.
fn execute_command(store: &TodoStore, command: AppCommand) -> Option<AppEvent> {
    match command {
        AppCommand::None | AppCommand::Quit => None,
        AppCommand::Refresh => Some(refresh_event(store)),
        AppCommand::CreateTodo { title } => match store.create(&title) {
            Ok(id) => {
                log::info!("created todo {id}");
                Some(refresh_event(store))
            }
            Err(error) => {
                log::warn!("failed to create todo: {error}");
                Some(AppEvent::LoadFailed(error.to_string()))
            }
        },
        AppCommand::DeleteTodo { id } => match store.delete(id) {
            Ok(removed) => {
                if removed {
                    log::info!("deleted todo {id}");
                } else {
                    log::debug!("todo {id} was already gone");
                }
                Some(refresh_event(store))
            }
            Err(error) => {
                log::warn!("failed to delete todo {id}: {error}");
                Some(AppEvent::LoadFailed(error.to_string()))
            }
        },
    }
}

fn refresh_event(store: &TodoStore) -> AppEvent {
    match store.list() {
        Ok(todos) => AppEvent::Loaded(todos),
        Err(error) => {
            log::warn!("failed to refresh todos: {error}");
            AppEvent::LoadFailed(error.to_string())
        }
    }
}
