use std::fmt;

/// Collection view failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// An async dependency (collection source or item renderer) failed to
    /// resolve during initialization.
    Load { message: String },
    /// The remote fetch failed; the view has been torn down.
    Fetch { message: String },
    /// The renderer failed while drawing an item or region.
    Render { message: String },
}

impl ViewError {
    #[must_use]
    pub fn load(message: impl Into<String>) -> Self {
        ViewError::Load {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        ViewError::Fetch {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        ViewError::Render {
            message: message.into(),
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Load { message } => write!(f, "view dependency failed to load: {message}"),
            ViewError::Fetch { message } => write!(f, "collection fetch failed: {message}"),
            ViewError::Render { message } => write!(f, "render failed: {message}"),
        }
    }
}

impl std::error::Error for ViewError {}
