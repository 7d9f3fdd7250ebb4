use std::sync::Arc;

use assistant_core::{ChatController, ChatTransport, SendControl, UiHandles};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::tui::AppEvent;
use crate::widgets::{ChatScroll, InputBox, SendButton, TranscriptPane};

pub type TuiController = ChatController<InputBox, SendButton, TranscriptPane, ChatScroll>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Send,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Healthy,
    Unreachable,
}

impl ServerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ServerStatus::Unknown => "checking",
            ServerStatus::Healthy => "online",
            ServerStatus::Unreachable => "offline",
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub focus: FocusPane,
    pub controller: TuiController,
    pub server_url: String,
    pub server_status: ServerStatus,

    // Typing indicator animation frame (0..3)
    pub animation_frame: u8,

    // Areas from the last render, for mouse hit-testing
    pub chat_area: Option<Rect>,
    pub send_area: Option<Rect>,
    pub input_area: Option<Rect>,
}

impl App {
    pub fn new(transport: Arc<dyn ChatTransport>, server_url: impl Into<String>) -> Self {
        let handles = UiHandles {
            input: InputBox::default(),
            send: SendButton::default(),
            list: TranscriptPane::default(),
            scroll: ChatScroll::default(),
        };

        Self {
            should_quit: false,
            focus: FocusPane::Input,
            controller: ChatController::new(handles, transport),
            server_url: server_url.into(),
            server_status: ServerStatus::Unknown,
            animation_frame: 0,
            chat_area: None,
            send_area: None,
            input_area: None,
        }
    }

    pub fn input(&mut self) -> &mut InputBox {
        &mut self.controller.handles_mut().input
    }

    pub fn scroll(&mut self) -> &mut ChatScroll {
        &mut self.controller.handles_mut().scroll
    }

    pub fn can_send(&self) -> bool {
        self.controller.handles().send.is_enabled()
    }

    /// Start an exchange and run the request in the background.
    /// The result comes back to the event loop as `AppEvent::Settled`.
    pub fn submit(&mut self, events: &UnboundedSender<AppEvent>) {
        let Some(message) = self.controller.begin_submit() else {
            return;
        };

        self.animation_frame = 0;
        let transport = self.controller.transport();
        let events = events.clone();
        tokio::spawn(async move {
            let result = transport.send_message(&message).await;
            if events.send(AppEvent::Settled(result)).is_err() {
                tracing::debug!("event loop closed before the reply settled");
            }
        });
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.controller.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Input => FocusPane::Send,
            FocusPane::Send => FocusPane::Input,
        };
    }
}
