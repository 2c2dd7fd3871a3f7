use anyhow::anyhow;
use mathboard_core::{Session, TutorClient, ViewMode};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub type ReplyTask = JoinHandle<anyhow::Result<String>>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: ViewMode,
    pub input_mode: InputMode,

    // One session per screen; both live for the whole run
    pub tutor: Session,
    pub chat: Session,
    pub tutor_task: Option<ReplyTask>,
    pub chat_task: Option<ReplyTask>,

    // Tutor screen
    pub show_latex: bool,
    pub whiteboard_scroll: u16,
    pub explanation_scroll: u16,
    pub whiteboard_max_scroll: u16,  // set during render
    pub explanation_max_scroll: u16, // set during render

    // Chat screen
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the transcript, set during render
    pub chat_lines: u16,  // wrapped transcript length, set during render

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub client: TutorClient,
}

impl App {
    pub fn new(client: TutorClient, screen: ViewMode) -> Self {
        Self {
            should_quit: false,
            screen,
            input_mode: InputMode::Editing,

            tutor: Session::new(ViewMode::Tutor),
            chat: Session::new(ViewMode::Chat),
            tutor_task: None,
            chat_task: None,

            show_latex: false,
            whiteboard_scroll: 0,
            explanation_scroll: 0,
            whiteboard_max_scroll: 0,
            explanation_max_scroll: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_lines: 0,

            animation_frame: 0,

            client,
        }
    }

    pub fn session(&self) -> &Session {
        match self.screen {
            ViewMode::Tutor => &self.tutor,
            ViewMode::Chat => &self.chat,
        }
    }

    pub fn session_mut(&mut self) -> &mut Session {
        match self.screen {
            ViewMode::Tutor => &mut self.tutor,
            ViewMode::Chat => &mut self.chat,
        }
    }

    fn session_for(&mut self, mode: ViewMode) -> &mut Session {
        match mode {
            ViewMode::Tutor => &mut self.tutor,
            ViewMode::Chat => &mut self.chat,
        }
    }

    fn task_slot(&mut self, mode: ViewMode) -> &mut Option<ReplyTask> {
        match mode {
            ViewMode::Tutor => &mut self.tutor_task,
            ViewMode::Chat => &mut self.chat_task,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.session().is_sending()
    }

    pub fn switch_screen(&mut self) {
        self.screen = self.screen.next();
    }

    /// Submit the current screen's input and start the request in the
    /// background. Does nothing if the session rejects the input.
    pub fn send_current(&mut self) {
        let mode = self.screen;
        let Some(message) = self.session_mut().submit() else {
            return;
        };

        tracing::info!(mode = mode.as_str(), "question submitted");
        let client = self.client.clone();
        *self.task_slot(mode) = Some(tokio::spawn(async move {
            client.send(mode, &message).await
        }));

        match mode {
            ViewMode::Tutor => {
                self.whiteboard_scroll = 0;
                self.explanation_scroll = 0;
            }
            ViewMode::Chat => self.scroll_chat_to_bottom(),
        }
    }

    /// Hand finished requests to their sessions.
    pub async fn poll_tasks(&mut self) {
        for mode in ViewMode::all() {
            let finished = self
                .task_slot(mode)
                .as_ref()
                .is_some_and(|task| task.is_finished());
            if !finished {
                continue;
            }
            let Some(task) = self.task_slot(mode).take() else {
                continue;
            };

            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!("request task failed: {}", e)),
            };
            if let Err(e) = &outcome {
                tracing::warn!(mode = mode.as_str(), error = %e, "request failed");
            }
            self.session_for(mode).complete(outcome);

            if mode == ViewMode::Chat {
                self.scroll_chat_to_bottom();
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.tutor_task.is_some() || self.chat_task.is_some()
    }

    pub fn tick_animation(&mut self) {
        if self.tutor.is_sending() || self.chat.is_sending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Scrolling

    pub fn scroll_down(&mut self, lines: u16) {
        match self.screen {
            ViewMode::Tutor => {
                self.explanation_scroll = self
                    .explanation_scroll
                    .saturating_add(lines)
                    .min(self.explanation_max_scroll);
            }
            ViewMode::Chat => {
                let max = self.chat_lines.saturating_sub(self.chat_height);
                self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.screen {
            ViewMode::Tutor => {
                self.explanation_scroll = self.explanation_scroll.saturating_sub(lines);
            }
            ViewMode::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(lines),
        }
    }

    pub fn scroll_whiteboard_down(&mut self, lines: u16) {
        self.whiteboard_scroll = self
            .whiteboard_scroll
            .saturating_add(lines)
            .min(self.whiteboard_max_scroll);
    }

    pub fn scroll_whiteboard_up(&mut self, lines: u16) {
        self.whiteboard_scroll = self.whiteboard_scroll.saturating_sub(lines);
    }

    pub fn scroll_top(&mut self) {
        match self.screen {
            ViewMode::Tutor => {
                self.whiteboard_scroll = 0;
                self.explanation_scroll = 0;
            }
            ViewMode::Chat => self.chat_scroll = 0,
        }
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        // Render clamps this once the real transcript height is known.
        self.chat_scroll = u16::MAX;
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}
