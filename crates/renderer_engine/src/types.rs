use std::fmt;

/// Pipeline stages, in the order a run passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadConfig,
    LoadCredential,
    ReadArticle,
    Generate,
    Clean,
    Write,
    Done,
}

/// Secret token for the completion service. Never printed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Placeholder used when no credential could be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

/// Normalized article text: a single line, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article(String);

impl Article {
    /// Returns `None` when `text` is empty after trimming.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionError {
    pub kind: FailureKind,
    pub message: String,
}

impl CompletionError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CompletionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    Authentication(u16),
    RateLimited,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    NoChoices,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::Authentication(code) => write!(f, "authentication failed (http {code})"),
            FailureKind::RateLimited => write!(f, "rate limited"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::NoChoices => write!(f, "response contained no choices"),
        }
    }
}
