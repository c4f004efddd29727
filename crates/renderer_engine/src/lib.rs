//! Renderer engine: turns one plain-text article into an HTML fragment via a
//! chat-completion service.
mod article;
mod complete;
mod credential;
mod decode;
mod extract;
mod fence;
mod generate;
mod persist;
mod pipeline;
mod prompt;
mod settings;
mod types;

pub use article::{read_article, ArticleError};
pub use complete::{Completer, CompletionRequest, CompletionSettings, OpenAiCompleter};
pub use credential::{load_credential, CredentialError};
pub use decode::{decode_text, DecodeError};
pub use extract::unwrap_document;
pub use fence::strip_code_fences;
pub use generate::{GenerateError, HtmlGenerator};
pub use persist::{write_output, PersistError};
pub use pipeline::{Pipeline, RunFailure, RunReport};
pub use prompt::{PromptError, PromptTemplate, ARTICLE_PLACEHOLDER};
pub use settings::{
    load_settings, ConfigError, Settings, SettingsOverrides, DEFAULT_API_BASE_URL,
    DEFAULT_SETTINGS_FILE,
};
pub use types::{ApiKey, Article, CompletionError, FailureKind, Stage};
