use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

const PAGE_LINES: u16 = 10;

pub fn handle_event(app: &mut App, event: AppEvent, events: &UnboundedSender<AppEvent>) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, events),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse, events),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Settled(result) => app.controller.settle(result),
        AppEvent::Health(status) => app.server_status = status,
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &UnboundedSender<AppEvent>) {
    // Global keys that work with either pane focused
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::PageUp => app.scroll().up(PAGE_LINES),
        KeyCode::PageDown => app.scroll().down(PAGE_LINES),
        KeyCode::Up => app.scroll().up(1),
        KeyCode::Down => app.scroll().down(1),
        _ => match app.focus {
            FocusPane::Input => handle_input_key(app, key, events),
            FocusPane::Send => handle_send_key(app, key, events),
        },
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent, events: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Enter => app.submit(events),
        KeyCode::Backspace => app.input().backspace(),
        KeyCode::Delete => app.input().delete(),
        KeyCode::Left => app.input().left(),
        KeyCode::Right => app.input().right(),
        KeyCode::Home => app.input().home(),
        KeyCode::End => app.input().end(),
        KeyCode::Char(c) => app.input().insert(c),
        _ => {}
    }
}

fn handle_send_key(app: &mut App, key: KeyEvent, events: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.submit(events),
        // Typing while the button is focused goes back to the input
        KeyCode::Char(c) => {
            app.focus = FocusPane::Input;
            app.input().insert(c);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, events: &UnboundedSender<AppEvent>) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(app.send_area, mouse.column, mouse.row) {
                app.focus = FocusPane::Send;
                app.submit(events);
            } else if hit(app.input_area, mouse.column, mouse.row) {
                app.focus = FocusPane::Input;
            }
        }
        MouseEventKind::ScrollUp if hit(app.chat_area, mouse.column, mouse.row) => {
            app.scroll().up(3);
        }
        MouseEventKind::ScrollDown if hit(app.chat_area, mouse.column, mouse.row) => {
            app.scroll().down(3);
        }
        _ => {}
    }
}

fn hit(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|a| {
        column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
    })
}
