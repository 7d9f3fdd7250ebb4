use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use assistant_core::{ChatMessage, ChatRole, MessageList};

use crate::app::{App, FocusPane, ServerStatus};

const SEND_BUTTON_WIDTH: u16 = 10;

fn role_style(role: ChatRole) -> Style {
    let color = match role {
        ChatRole::User => Color::Cyan,
        ChatRole::Assistant => Color::Yellow,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Build the chat lines: role label, content, blank separator.
/// Content lines are kept as-is; the paragraph does the wrapping.
fn transcript_lines(messages: &[ChatMessage], typing: bool, frame_idx: u8) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in messages {
        lines.push(Line::from(Span::styled(format!("{}:", msg.role.label()), role_style(msg.role))));
        // Content is plain text; no markup is interpreted
        for raw in msg.content.lines() {
            lines.push(Line::from(raw.to_string()));
        }
        lines.push(Line::default());
    }

    if typing {
        lines.push(Line::from(Span::styled(
            format!("{}:", ChatRole::Assistant.label()),
            role_style(ChatRole::Assistant),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((frame_idx as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input row, footer
    let [header_area, chat_area, input_row, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let [input_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(SEND_BUTTON_WIDTH),
    ])
    .areas(input_row);

    // Store areas for mouse hit-testing
    app.chat_area = Some(chat_area);
    app.input_area = Some(input_area);
    app.send_area = Some(send_area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_send_button(app, frame, send_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status_color = match app.server_status {
        ServerStatus::Unknown => Color::Gray,
        ServerStatus::Healthy => Color::Green,
        ServerStatus::Unreachable => Color::Red,
    };

    let title = Line::from(vec![
        Span::styled(" Virtual Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.server_url.clone(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(format!("[{}]", app.server_status.label()), Style::default().fg(status_color)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    let list = &app.controller.handles().list;
    let lines = transcript_lines(list.messages(), list.is_typing(), app.animation_frame);

    let text = if lines.is_empty() {
        Text::from(Span::styled("Ask anything...", Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(lines)
    };

    // No trimming: replies keep their spacing and long tokens break across rows
    let chat = Paragraph::new(text).wrap(Wrap { trim: false });
    let total_lines = u16::try_from(chat.line_count(inner_width)).unwrap_or(u16::MAX);
    let offset = app.scroll().resolve(total_lines, inner_height);

    let chat = chat.block(block).scroll((offset, 0));
    frame.render_widget(chat, area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Input;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message ");

    let inner_width = area.width.saturating_sub(2);
    let input = &app.controller.handles().input;
    let cursor = u16::try_from(input.cursor()).unwrap_or(u16::MAX);
    // Keep the cursor inside the box for long input
    let h_scroll = cursor.saturating_sub(inner_width.saturating_sub(1));

    let paragraph = if input.text().is_empty() {
        Paragraph::new(Span::styled("Type your message…", Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(input.text().to_string()).scroll((0, h_scroll))
    };

    frame.render_widget(paragraph.block(block), area);

    if focused {
        frame.set_cursor_position((area.x + 1 + (cursor - h_scroll), area.y + 1));
    }
}

fn render_send_button(app: &App, frame: &mut Frame, area: Rect) {
    let enabled = app.can_send();
    let focused = app.focus == FocusPane::Send;

    let style = match (enabled, focused) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default().bg(Color::Cyan).fg(Color::Black).bold(),
        (true, false) => Style::default().fg(Color::Cyan).bold(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { Style::default().fg(Color::Cyan) } else { Style::default().fg(Color::DarkGray) });

    let button = Paragraph::new(Line::from(Span::styled(" Send ", style)).centered()).block(block);
    frame.render_widget(button, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode = if app.controller.is_pending() {
        Span::styled(" WAITING ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        Span::styled(" READY ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    let hints = Span::styled(
        " Enter: send | Tab: focus Send | PgUp/PgDn: scroll | Esc: quit",
        Style::default().fg(Color::DarkGray),
    );

    frame.render_widget(Paragraph::new(Line::from(vec![mode, hints])), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{ChatTransport, ExchangeError, InputField};
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, layout::Position, Terminal};
    use std::sync::Arc;

    struct SilentTransport;

    #[async_trait]
    impl ChatTransport for SilentTransport {
        async fn send_message(&self, _message: &str) -> Result<String, ExchangeError> {
            Ok(String::new())
        }
    }

    fn terminal(app: &mut App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
    }

    fn draw(app: &mut App) -> String {
        screen_text(&terminal(app))
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    /// Rows of the chat pane, without the border columns
    fn chat_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let cells = &terminal.backend().buffer().content;
        // Chat pane spans rows 1..16 of the 60x20 screen
        (2..15)
            .map(|y| (1..59).map(|x| cells[y * 60 + x].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_typing_line_only_while_pending() {
        let messages = vec![ChatMessage::user("hi")];
        assert_eq!(transcript_lines(&messages, false, 0).len(), 3);

        let lines = transcript_lines(&messages, true, 2);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4].to_string(), "typing...");
    }

    #[test]
    fn test_render_shows_transcript_and_indicator() {
        let mut app = App::new(Arc::new(SilentTransport), "http://localhost:5000");
        app.controller.greet(["Hello there"]);
        app.controller.handles_mut().input.insert('h');
        app.controller.handles_mut().input.insert('i');

        let screen = draw(&mut app);
        assert!(screen.contains("Hello there"));
        assert!(screen.contains("Send"));
        assert!(!screen.contains("typing"));

        app.controller.begin_submit();
        let screen = draw(&mut app);
        assert!(screen.contains("You:"));
        assert!(screen.contains("typing."));
        assert!(screen.contains("WAITING"));
        assert!(app.controller.handles().input.value().is_empty());
    }

    #[test]
    fn test_render_records_hit_areas() {
        let mut app = App::new(Arc::new(SilentTransport), "http://localhost:5000");
        draw(&mut app);

        let send = app.send_area.unwrap();
        assert_eq!(send.width, SEND_BUTTON_WIDTH);
        assert_eq!(send.y, 20 - 1 - 3);
        assert!(app.chat_area.is_some());
    }

    #[test]
    fn test_reply_keeps_spacing_and_long_tokens() {
        let mut app = App::new(Arc::new(SilentTransport), "http://localhost:5000");
        let url = format!("https://example.com/{}END", "a".repeat(55));
        app.controller.greet([url.as_str(), "col1    col2", "  indented"]);

        let terminal = terminal(&mut app);
        let rows = chat_rows(&terminal);

        // The 78-char token wraps onto a second row instead of being clipped
        let first = rows.iter().position(|row| row.starts_with("https://example.com/")).unwrap();
        assert_eq!(format!("{}{}", rows[first], rows[first + 1].trim_end()), url);
        assert!(rows.iter().any(|row| row.trim_end() == "col1    col2"));
        assert!(rows.iter().any(|row| row.trim_end() == "  indented"));
    }

    #[test]
    fn test_wrapped_reply_scrolls_to_last_row() {
        let mut app = App::new(Arc::new(SilentTransport), "http://localhost:5000");
        let long = "word ".repeat(200);
        app.controller.greet([long.trim_end(), "LAST LINE"]);

        let screen = draw(&mut app);
        assert!(screen.contains("LAST LINE"));
    }

    #[test]
    fn test_cursor_stays_in_input_box_for_long_input() {
        let mut app = App::new(Arc::new(SilentTransport), "http://localhost:5000");
        for _ in 0..70 {
            app.controller.handles_mut().input.insert('x');
        }

        let mut terminal = terminal(&mut app);
        let input = app.input_area.unwrap();
        // Inner width is 48, so the cursor sits on the last inner column
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            Position::new(input.x + 48, input.y + 1)
        );
    }
}
