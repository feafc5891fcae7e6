//! Stream identifiers as presented by connecting clients
//!
//! Format: `<mode>/<name>[/<password>]`, e.g. `publish/mystream/secret` or
//! `play/mystream`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Whether a client wants to push or pull a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamMode {
    Publish,
    Play,
}

impl StreamMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Publish => "publish",
            StreamMode::Play => "play",
        }
    }
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stream id parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamIdError {
    #[error("empty stream id")]
    Empty,
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("missing stream name")]
    MissingName,
}

/// Parsed stream identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamId {
    mode: StreamMode,
    name: String,
    password: String,
}

impl StreamId {
    pub fn new(mode: StreamMode, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode,
            name: name.into(),
            password: password.into(),
        }
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Empty when the client sent none
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl FromStr for StreamId {
    type Err = StreamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(StreamIdError::Empty);
        }

        // Password may itself contain '/'
        let mut parts = s.splitn(3, '/');

        let mode = match parts.next() {
            Some("publish") => StreamMode::Publish,
            Some("play") => StreamMode::Play,
            Some(other) => return Err(StreamIdError::InvalidMode(other.to_string())),
            None => return Err(StreamIdError::Empty),
        };

        let name = match parts.next() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(StreamIdError::MissingName),
        };

        let password = parts.next().unwrap_or_default();

        Ok(Self::new(mode, name, password))
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mode, self.name)?;
        if !self.password.is_empty() {
            write!(f, "/{}", self.password)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publish_with_password() {
        let id: StreamId = "publish/mystream/secret".parse().unwrap();

        assert_eq!(id.mode(), StreamMode::Publish);
        assert_eq!(id.name(), "mystream");
        assert_eq!(id.password(), "secret");
    }

    #[test]
    fn test_parse_play_without_password() {
        let id: StreamId = "play/mystream".parse().unwrap();

        assert_eq!(id.mode(), StreamMode::Play);
        assert_eq!(id.name(), "mystream");
        assert_eq!(id.password(), "");
    }

    #[test]
    fn test_parse_password_with_slash() {
        let id: StreamId = "publish/s/a/b".parse().unwrap();
        assert_eq!(id.password(), "a/b");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<StreamId>(), Err(StreamIdError::Empty));
        assert_eq!(
            "record/x".parse::<StreamId>(),
            Err(StreamIdError::InvalidMode("record".into()))
        );
        assert_eq!("play".parse::<StreamId>(), Err(StreamIdError::MissingName));
        assert_eq!("play/".parse::<StreamId>(), Err(StreamIdError::MissingName));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StreamId::new(StreamMode::Publish, "s", "pw").to_string(),
            "publish/s/pw"
        );
        assert_eq!(StreamId::new(StreamMode::Play, "s", "").to_string(), "play/s");
    }
}
