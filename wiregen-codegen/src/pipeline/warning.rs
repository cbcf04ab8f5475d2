//! Advisory messages that accompany a successful run.
//!
//! Anything fatal travels as an [`Error`](crate::error::Error) and aborts
//! the run. A [`Warning`] never does; stages append them as they notice
//! suspicious input and the caller decides how to surface them.

/// One advisory message, optionally pinned to a schema file.
#[derive(Debug, Clone)]
pub struct Warning {
    pub message: String,
    /// Source-root-relative path of the file that triggered the warning.
    pub location: Option<String>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Pin this warning to a schema file.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warning: {}", self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {})", location)?;
        }
        Ok(())
    }
}
