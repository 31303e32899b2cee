use std::path::PathBuf;

use crate::types::{MessageKind, RoutingId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// A renderer broke the paint protocol. Always fatal to the connection;
/// the process host decides what to do with the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("{kind}: view size is empty")]
    EmptyViewSize { kind: MessageKind },

    #[error("{kind}: bitmap rect is empty")]
    EmptyBitmapRect { kind: MessageKind },

    #[error("{kind}: resize ack received while no resize was pending")]
    UnexpectedResizeAck { kind: MessageKind },
}

impl ProtocolError {
    /// The message kind that carried the violation.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::EmptyViewSize { kind }
            | Self::EmptyBitmapRect { kind }
            | Self::UnexpectedResizeAck { kind } => *kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("a host factory is already registered")]
    FactoryAlreadyRegistered,

    #[error("routing id {0} already has a live host")]
    RouteInUse(RoutingId),
}

#[derive(Debug, thiserror::Error)]
pub enum OffpaintError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("demo.frames = 0 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: demo.frames = 0 is out of range"
        );
    }

    #[test]
    fn protocol_error_display_names_kind() {
        let err = ProtocolError::EmptyViewSize {
            kind: MessageKind::ScrollRect,
        };
        assert_eq!(err.to_string(), "scroll_rect: view size is empty");

        let err = ProtocolError::UnexpectedResizeAck {
            kind: MessageKind::PaintRect,
        };
        assert_eq!(
            err.to_string(),
            "paint_rect: resize ack received while no resize was pending"
        );
    }

    #[test]
    fn protocol_error_kind() {
        let err = ProtocolError::EmptyBitmapRect {
            kind: MessageKind::PaintRect,
        };
        assert_eq!(err.kind(), MessageKind::PaintRect);
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::RouteInUse(RoutingId(7));
        assert_eq!(err.to_string(), "routing id 7 already has a live host");
        assert_eq!(
            RegistryError::FactoryAlreadyRegistered.to_string(),
            "a host factory is already registered"
        );
    }

    #[test]
    fn offpaint_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: OffpaintError = config_err.into();
        assert!(matches!(err, OffpaintError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn offpaint_error_from_protocol() {
        let err: OffpaintError = ProtocolError::UnexpectedResizeAck {
            kind: MessageKind::PaintRect,
        }
        .into();
        assert!(matches!(err, OffpaintError::Protocol(_)));
    }

    #[test]
    fn offpaint_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: OffpaintError = io_err.into();
        assert!(matches!(err, OffpaintError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn offpaint_error_other() {
        let err = OffpaintError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
