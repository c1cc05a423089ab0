//! Layout engine errors
//!
//! Only two kinds of failure ever leave the engine: host surface errors that
//! are not part of normal creation, and component callback failures. Geometry
//! problems (zero-sized terminal, squeezed panels) are regular states and never
//! show up here.

use thiserror::Error;

/// Errors reported by a [`SurfaceHost`](super::SurfaceHost)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface has not been created yet; callers treat this as "create it"
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// The host toolkit refused the operation
    #[error("surface host error: {0}")]
    Host(String),
}

/// Errors returned by a layout pass or a focus/overlay operation
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("rendering panel {panel:?} failed")]
    Render {
        panel: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("focus callback for panel {panel:?} failed")]
    Focus {
        panel: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("key handler on panel {panel:?} failed")]
    KeyHandler {
        panel: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unknown panel: {0}")]
    UnknownPanel(String),

    #[error("panel {0:?} is not visible or cannot take focus")]
    NotFocusable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_keeps_source_chain() {
        let err = LayoutError::Render {
            panel: "messages".to_string(),
            source: anyhow::anyhow!("buffer poisoned"),
        };
        assert_eq!(err.to_string(), "rendering panel \"messages\" failed");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("buffer poisoned"));
    }

    #[test]
    fn surface_error_converts() {
        let err: LayoutError = SurfaceError::Host("gone".into()).into();
        assert_eq!(err.to_string(), "surface host error: gone");
    }
}
