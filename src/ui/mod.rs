mod theme;

use crate::app::{AddItemOverlay, AppModel};
use crate::domain::Todo;
use ratatui::prelude::*;
use ratatui::widgets::*;
use unicode_width::UnicodeWidthStr;

pub const EMPTY_LIST_TEXT: &str = "Nothing to do!";

const LIST_KEYS: &str = "Keys: j/↓=down  k/↑=up  o=add  d=delete  Ctrl+C/Ctrl+Q=quit";
const ADD_ITEM_KEYS: &str = "Enter=add  Esc=cancel";

pub fn render(frame: &mut Frame, model: &AppModel) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_todos(frame, chunks[0], model);
    frame.render_widget(footer_line(model.notice.as_deref()), chunks[1]);

    if let Some(overlay) = &model.overlay {
        render_add_item_overlay(frame, area, overlay);
    }
}

fn render_todos(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title(" gdn ");

    if model.todos.is_empty() {
        let empty = Paragraph::new(EMPTY_LIST_TEXT)
            .style(Style::default().fg(theme::MUTED))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // borders + padding + highlight symbol
    let max_width = (area.width as usize).saturating_sub(6);
    let items: Vec<ListItem> = model
        .todos
        .iter()
        .map(|todo| todo_list_item(todo, max_width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(model.selected.min(model.todos.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn todo_list_item(todo: &Todo, max_width: usize) -> ListItem<'static> {
    ListItem::new(Line::from(truncate_end(
        &single_line(&todo.title),
        max_width,
    )))
}

fn footer_line(notice: Option<&str>) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(
        LIST_KEYS.to_string(),
        Style::default().fg(theme::DIM),
    )];
    if let Some(message) = notice.filter(|message| !message.trim().is_empty()) {
        spans.push(Span::styled("  ·  ".to_string(), Style::default().fg(theme::DIM)));
        spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(theme::ERROR),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn render_add_item_overlay(frame: &mut Frame, area: Rect, overlay: &AddItemOverlay) {
    let popup = centered_rect(60, 5, area);
    if popup.width < 3 || popup.height < 3 {
        return;
    }
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .padding(Padding::horizontal(1))
        .title(" Add item ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let editor = &overlay.editor;
    let before_cursor = UnicodeWidthStr::width(editor.text_before_cursor());
    let (scroll, cursor_offset) = input_scroll(before_cursor, inner.width);

    let input = Paragraph::new(editor.text.as_str()).scroll((0, scroll));
    frame.render_widget(
        input,
        Rect {
            height: 1,
            ..inner
        },
    );
    frame.set_cursor_position((
        inner.x + cursor_offset,
        inner.y,
    ));

    if inner.height >= 3 {
        let hint = Paragraph::new(ADD_ITEM_KEYS)
            .style(Style::default().fg(theme::DIM))
            .alignment(Alignment::Center);
        frame.render_widget(
            hint,
            Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            },
        );
    }
}

/// Horizontal scroll and cursor column that keep the cursor cell inside a
/// box `visible_width` cells wide.
fn input_scroll(before_cursor: usize, visible_width: u16) -> (u16, u16) {
    let visible_width = usize::from(visible_width.max(1));
    let wanted = (before_cursor + 1).saturating_sub(visible_width);
    let scroll = u16::try_from(wanted).unwrap_or(u16::MAX);
    let offset = before_cursor
        .saturating_sub(usize::from(scroll))
        .min(visible_width - 1);
    (scroll, u16::try_from(offset).unwrap_or(0))
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

fn truncate_end(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let ellipsis = "…";
    let available = max_width.saturating_sub(UnicodeWidthStr::width(ellipsis));
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + width > available {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push_str(ellipsis);
    out
}

/// Horizontally centered by percentage, vertically centered with a fixed height.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppEvent, update};
    use crate::domain::TodoId;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn draw(model: &AppModel, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| render(frame, model))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let screen = draw(&AppModel::new(), 40, 8);
        assert!(screen.contains(EMPTY_LIST_TEXT));
        assert!(screen.contains("o=add"));
    }

    #[test]
    fn lists_titles_and_marks_selection() {
        let model = AppModel {
            todos: vec![
                Todo::new(TodoId::new(1), "Buy milk"),
                Todo::new(TodoId::new(2), "Walk dog"),
            ],
            selected: 1,
            ..AppModel::default()
        };
        let screen = draw(&model, 40, 8);
        assert!(screen.contains("Buy milk"));
        assert!(screen.contains("▸ Walk dog"));
        assert!(!screen.contains(EMPTY_LIST_TEXT));
    }

    #[test]
    fn overlay_shows_typed_text() {
        let (model, _cmd) = update(
            AppModel::new(),
            AppEvent::Key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE)),
        );
        let (model, _cmd) = update(model, AppEvent::Paste("Walk dog".to_string()));
        let screen = draw(&model, 60, 16);
        assert!(screen.contains("Add item"));
        assert!(screen.contains("Walk dog"));
        assert!(screen.contains(ADD_ITEM_KEYS));
    }

    #[test]
    fn notice_is_rendered_in_footer() {
        let model = AppModel::new().with_notice(Some("Storage error: locked".to_string()));
        let screen = draw(&model, 100, 6);
        assert!(screen.contains("Storage error: locked"));
    }

    #[test]
    fn input_scroll_keeps_cursor_in_view() {
        assert_eq!(input_scroll(0, 10), (0, 0));
        assert_eq!(input_scroll(9, 10), (0, 9));
        assert_eq!(input_scroll(10, 10), (1, 9));
        assert_eq!(input_scroll(25, 10), (16, 9));
    }

    #[test]
    fn input_scroll_saturates_for_huge_inputs() {
        let (scroll, offset) = input_scroll(100_000, 32);
        assert_eq!(scroll, u16::MAX);
        assert_eq!(offset, 31);
    }

    #[test]
    fn truncates_long_titles_by_display_width() {
        assert_eq!(truncate_end("abcdef", 4), "abc…");
        assert_eq!(truncate_end("ab", 4), "ab");
        assert_eq!(truncate_end("日本語", 4), "日…");
        assert_eq!(single_line("a\nb"), "a b");
    }
}
