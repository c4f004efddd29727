use std::sync::Arc;

use thiserror::Error;

use crate::complete::{Completer, CompletionRequest};
use crate::prompt::PromptTemplate;
use crate::{ApiKey, Article, CompletionError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no credential available; completion service not called")]
    MissingCredential,
    #[error("completion service failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("completion service returned no content")]
    EmptyResponse,
}

/// Turns an article into HTML markup through a [`Completer`].
pub struct HtmlGenerator {
    completer: Arc<dyn Completer>,
    template: PromptTemplate,
}

impl HtmlGenerator {
    pub fn new(completer: Arc<dyn Completer>, template: PromptTemplate) -> Self {
        Self {
            completer,
            template,
        }
    }

    pub async fn generate(
        &self,
        article: &Article,
        api_key: &ApiKey,
        model: &str,
    ) -> Result<String, GenerateError> {
        if api_key.is_empty() {
            return Err(GenerateError::MissingCredential);
        }

        let request = CompletionRequest {
            model: model.to_string(),
            prompt: self.template.render(article),
        };
        let content = self.completer.complete(api_key, &request).await?;
        if content.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(content)
    }
}
