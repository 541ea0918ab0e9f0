mod line_editor;

use crate::domain::{Todo, TodoId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

pub use line_editor::LineEditor;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ResolveDataDir(#[from] crate::infra::ResolveDataDirError),

    #[error(transparent)]
    Store(#[from] crate::infra::TodoStoreError),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddItemOverlay {
    pub editor: LineEditor,
}

/// `overlay == None` is the list view; `Some` is the add-item modal over it.
#[derive(Clone, Debug, Default)]
pub struct AppModel {
    pub todos: Vec<Todo>,
    pub selected: usize,
    pub overlay: Option<AddItemOverlay>,
    pub notice: Option<String>,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.todos.get(self.selected)
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Loaded(Vec<Todo>),
    LoadFailed(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    Refresh,
    CreateTodo { title: String },
    DeleteTodo { id: TodoId },
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key),
        AppEvent::Paste(text) => update_on_paste(model, text),
        AppEvent::Loaded(todos) => (apply_loaded(model, todos), AppCommand::None),
        AppEvent::LoadFailed(message) => (
            model.with_notice(Some(format!("Storage error: {message}"))),
            AppCommand::None,
        ),
    }
}

fn update_on_key(mut model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    model.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return (model, AppCommand::Quit);
    }

    match model.overlay.take() {
        Some(overlay) => update_add_item(model, overlay, key),
        None => update_list(model, key),
    }
}

fn update_list(mut model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return (model, AppCommand::None);
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            let last = model.todos.len().saturating_sub(1);
            model.selected = (model.selected + 1).min(last);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            model.selected = model.selected.saturating_sub(1);
        }
        KeyCode::Char('o') => {
            model.overlay = Some(AddItemOverlay::default());
        }
        KeyCode::Char('d') => {
            let Some(id) = model.selected_todo().map(|todo| todo.id) else {
                return (model, AppCommand::None);
            };
            return (model, AppCommand::DeleteTodo { id });
        }
        _ => {}
    }

    (model, AppCommand::None)
}

fn update_add_item(
    mut model: AppModel,
    mut overlay: AddItemOverlay,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    let editor = &mut overlay.editor;
    match key.code {
        KeyCode::Esc => return (model, AppCommand::Refresh),
        KeyCode::Enter => {
            let title = std::mem::take(&mut editor.text);
            return (model, AppCommand::CreateTodo { title });
        }
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        KeyCode::Char(character) => {
            if is_text_input_char(character) {
                editor.insert_char(character);
            }
        }
        _ => {}
    }

    model.overlay = Some(overlay);
    (model, AppCommand::None)
}

fn update_on_paste(mut model: AppModel, text: String) -> (AppModel, AppCommand) {
    if let Some(overlay) = model.overlay.as_mut() {
        overlay.editor.insert_str(&text);
    }
    (model, AppCommand::None)
}

fn apply_loaded(mut model: AppModel, todos: Vec<Todo>) -> AppModel {
    model.todos = todos;
    if model.selected >= model.todos.len() {
        model.selected = model.selected.saturating_sub(1);
    }
    model
}

fn is_text_input_char(character: char) -> bool {
    !character.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn todos(titles: &[&str]) -> Vec<Todo> {
        titles
            .iter()
            .enumerate()
            .map(|(index, title)| Todo::new(TodoId::new(index as i64 + 1), *title))
            .collect()
    }

    fn loaded_model(titles: &[&str]) -> AppModel {
        let (model, _cmd) = update(AppModel::new(), AppEvent::Loaded(todos(titles)));
        model
    }

    fn press_all(mut model: AppModel, codes: &[KeyCode]) -> AppModel {
        for code in codes {
            let (next, _cmd) = update(model, key(*code));
            model = next;
        }
        model
    }

    #[test]
    fn down_stops_at_last_item() {
        let model = loaded_model(&["a", "b", "c"]);
        let model = press_all(
            model,
            &[KeyCode::Down, KeyCode::Char('j'), KeyCode::Down, KeyCode::Down],
        );
        assert_eq!(model.selected, 2);
        assert_eq!(model.selected_todo().map(|todo| todo.title.as_str()), Some("c"));
    }

    #[test]
    fn up_stops_at_zero() {
        let model = loaded_model(&["a", "b"]);
        let model = press_all(
            model,
            &[KeyCode::Down, KeyCode::Up, KeyCode::Char('k'), KeyCode::Up],
        );
        assert_eq!(model.selected, 0);
    }

    #[test]
    fn cursor_stays_in_bounds_for_any_navigation() {
        let codes = [KeyCode::Down, KeyCode::Up, KeyCode::Char('j'), KeyCode::Char('k')];
        for len in 0..4usize {
            let titles: Vec<&str> = (0..len).map(|_| "x").collect();
            let mut model = loaded_model(&titles);
            for step in 0..40usize {
                let code = codes[(step * 7 + len) % codes.len()];
                let (next, _cmd) = update(model, key(code));
                model = next;
                assert!(model.selected <= len.saturating_sub(1));
            }
        }
    }

    #[test]
    fn navigation_on_empty_list_keeps_cursor_at_zero() {
        let model = press_all(AppModel::new(), &[KeyCode::Down, KeyCode::Down, KeyCode::Up]);
        assert_eq!(model.selected, 0);
    }

    #[test]
    fn delete_emits_selected_id() {
        let model = loaded_model(&["Buy milk", "Walk dog"]);
        let model = press_all(model, &[KeyCode::Down]);
        let (_model, cmd) = update(model, key(KeyCode::Char('d')));
        assert_eq!(cmd, AppCommand::DeleteTodo { id: TodoId::new(2) });
    }

    #[test]
    fn delete_on_empty_list_does_nothing() {
        let (_model, cmd) = update(AppModel::new(), key(KeyCode::Char('d')));
        assert_eq!(cmd, AppCommand::None);
    }

    #[test]
    fn cursor_reclamps_after_deleting_last_row() {
        let model = loaded_model(&["Buy milk", "Walk dog"]);
        let model = press_all(model, &[KeyCode::Down]);
        assert_eq!(model.selected, 1);

        let (model, _cmd) = update(
            model,
            AppEvent::Loaded(vec![Todo::new(TodoId::new(1), "Buy milk")]),
        );
        assert_eq!(model.selected, 0);
    }

    #[test]
    fn cursor_is_kept_when_still_in_range() {
        let model = loaded_model(&["a", "b", "c"]);
        let model = press_all(model, &[KeyCode::Down]);

        let (model, _cmd) = update(
            model,
            AppEvent::Loaded(vec![
                Todo::new(TodoId::new(1), "a"),
                Todo::new(TodoId::new(3), "c"),
            ]),
        );
        assert_eq!(model.selected, 1);
    }

    #[test]
    fn open_add_item_starts_with_empty_editor() {
        let model = loaded_model(&["a"]);
        let (model, cmd) = update(model, key(KeyCode::Char('o')));
        assert_eq!(cmd, AppCommand::None);
        assert_eq!(model.overlay, Some(AddItemOverlay::default()));

        let model = press_all(model, &[KeyCode::Char('x'), KeyCode::Esc]);
        assert!(model.overlay.is_none());

        let (model, _cmd) = update(model, key(KeyCode::Char('o')));
        let overlay = model.overlay.expect("overlay");
        assert!(overlay.editor.text.is_empty());
    }

    #[test]
    fn typed_keys_go_to_editor_not_list() {
        let model = loaded_model(&["a", "b"]);
        let (model, _cmd) = update(model, key(KeyCode::Char('o')));
        let model = press_all(
            model,
            &[KeyCode::Char('d'), KeyCode::Char('j'), KeyCode::Char('o')],
        );
        assert_eq!(model.selected, 0);
        let overlay = model.overlay.as_ref().expect("overlay");
        assert_eq!(overlay.editor.text, "djo");
    }

    #[test]
    fn enter_creates_item_with_text_verbatim() {
        let (model, _cmd) = update(AppModel::new(), key(KeyCode::Char('o')));
        let (model, _cmd) = update(model, AppEvent::Paste("  Walk  dog ".to_string()));
        let (model, cmd) = update(model, key(KeyCode::Enter));
        assert!(model.overlay.is_none());
        assert_eq!(
            cmd,
            AppCommand::CreateTodo {
                title: "  Walk  dog ".to_string()
            }
        );
    }

    #[test]
    fn enter_with_empty_input_still_creates() {
        let (model, _cmd) = update(AppModel::new(), key(KeyCode::Char('o')));
        let (_model, cmd) = update(model, key(KeyCode::Enter));
        assert_eq!(
            cmd,
            AppCommand::CreateTodo {
                title: String::new()
            }
        );
    }

    #[test]
    fn escape_dismisses_without_creating_and_refreshes() {
        let (model, _cmd) = update(AppModel::new(), key(KeyCode::Char('o')));
        let model = press_all(model, &[KeyCode::Char('h'), KeyCode::Char('i')]);
        let (model, cmd) = update(model, key(KeyCode::Esc));
        assert_eq!(cmd, AppCommand::Refresh);
        assert!(model.overlay.is_none());
    }

    #[test]
    fn paste_outside_overlay_is_ignored() {
        let model = loaded_model(&["a"]);
        let (model, cmd) = update(model, AppEvent::Paste("text".to_string()));
        assert_eq!(cmd, AppCommand::None);
        assert!(model.overlay.is_none());
    }

    #[test]
    fn ctrl_c_quits_from_list_and_overlay() {
        let quit = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let (_model, cmd) = update(AppModel::new(), quit.clone());
        assert_eq!(cmd, AppCommand::Quit);

        let (model, _cmd) = update(AppModel::new(), key(KeyCode::Char('o')));
        let (_model, cmd) = update(model, quit);
        assert_eq!(cmd, AppCommand::Quit);
    }

    #[test]
    fn load_failure_keeps_previous_items_and_sets_notice() {
        let model = loaded_model(&["a", "b"]);
        let (model, cmd) = update(model, AppEvent::LoadFailed("disk I/O error".to_string()));
        assert_eq!(cmd, AppCommand::None);
        assert_eq!(model.todos.len(), 2);
        assert_eq!(
            model.notice.as_deref(),
            Some("Storage error: disk I/O error")
        );

        let (model, _cmd) = update(model, key(KeyCode::Down));
        assert!(model.notice.is_none());
    }
}
