/// The two screens of the client, each talking to its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Step-by-step answers drawn on the whiteboard
    #[default]
    Tutor,
    /// Plain conversation
    Chat,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Tutor => "tutor",
            ViewMode::Chat => "chat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tutor" | "structured" => Some(ViewMode::Tutor),
            "chat" | "basic" => Some(ViewMode::Chat),
            _ => None,
        }
    }

    pub fn all() -> Vec<ViewMode> {
        vec![ViewMode::Tutor, ViewMode::Chat]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ViewMode::Tutor => "Tutor",
            ViewMode::Chat => "Chat",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ViewMode::Tutor => "Ask me a math question...",
            ViewMode::Chat => "Ask me anything...",
        }
    }

    pub fn next(&self) -> ViewMode {
        match self {
            ViewMode::Tutor => ViewMode::Chat,
            ViewMode::Chat => ViewMode::Tutor,
        }
    }
}
