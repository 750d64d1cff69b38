//! Single-slot error notice shown to the user.
//!
//! There is no queue: showing a message replaces whatever was visible.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissVia {
    Close,
    Backdrop,
    Escape,
}

impl DismissVia {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Some(DismissVia::Close),
            "backdrop" => Some(DismissVia::Backdrop),
            "escape" | "esc" => Some(DismissVia::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    message: Option<String>,
}

impl Notice {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Hides the notice. Returns whether something was visible.
    pub fn dismiss(&mut self, via: DismissVia) -> bool {
        let was_visible = self.message.take().is_some();
        if was_visible {
            tracing::debug!(?via, "notice dismissed");
        }
        was_visible
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }
}
