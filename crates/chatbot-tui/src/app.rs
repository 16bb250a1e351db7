use chatbot_core::{ChatClient, ChatError, ChatMessage, ChatSession, EntryId};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::tui::AppEvent;
use crate::ui;

pub struct App {
    // Core state
    pub should_quit: bool,

    // Chat state
    pub session: ChatSession,
    pub input_cursor: usize, // cursor position in session.input, in chars

    // Transcript view state
    pub chat_scroll: u16,
    pub follow_tail: bool,   // keep the view pinned to the last entry
    pub chat_height: u16,    // Height of transcript area for scroll calculations
    pub chat_width: u16,     // Width of transcript area for wrap calculations
    pub chat_area: Option<Rect>,

    pub client: ChatClient,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(client: ChatClient, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,

            session: ChatSession::new(),
            input_cursor: 0,

            chat_scroll: 0,
            follow_tail: true,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,

            client,
            events,
        }
    }

    /// Send the input line, if it has any text.
    ///
    /// The request runs on its own task and comes back as
    /// [`AppEvent::Reply`]; further messages can be sent meanwhile.
    pub fn submit(&mut self) {
        let Some(pending) = self.session.submit() else {
            return;
        };

        self.input_cursor = 0;
        self.scroll_to_bottom();

        info!(entry = pending.entry.index(), endpoint = %self.client.endpoint(), "sending message");

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = client.send(&pending.message).await;
            // The loop is gone if the user quit while waiting.
            let _ = events.send(AppEvent::Reply {
                entry: pending.entry,
                outcome,
            });
        });
    }

    pub fn receive_reply(&mut self, entry: EntryId, outcome: Result<String, ChatError>) {
        debug!(entry = entry.index(), ok = outcome.is_ok(), "reply received");
        self.session.resolve(entry, outcome);
        if self.follow_tail {
            self.scroll_to_bottom();
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.transcript().messages()
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_tail = self.chat_scroll >= self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max_scroll = self.max_scroll();
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll);
        self.follow_tail = self.chat_scroll >= max_scroll;
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_up(self.page_size());
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_down(self.page_size());
    }

    /// Scroll the transcript so its last entry is visible
    pub fn scroll_to_bottom(&mut self) {
        self.follow_tail = true;
        self.chat_scroll = self.max_scroll();
    }

    pub fn max_scroll(&self) -> u16 {
        self.transcript_line_count()
            .saturating_sub(self.visible_height())
    }

    /// Number of rows the transcript occupies once wrapped to `chat_width`.
    pub fn transcript_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };

        ui::transcript_rows(self.messages(), wrap_width).min(u16::MAX as usize) as u16
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    fn page_size(&self) -> u16 {
        (self.visible_height() / 2).max(1)
    }
}
