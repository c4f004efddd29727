use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Article;

pub const ARTICLE_PLACEHOLDER: &str = "{article}";

const DEFAULT_TEMPLATE: &str = "\
Convert the article below into HTML and follow these rules:
- Structure the content with appropriate HTML tags: headings (<h1>, <h2>, <h3>), paragraphs (<p>), lists and emphasis where they fit the text.
- Mark the places where an image would support the text with <img src=\"image_placeholder.jpg\" alt=\"...\">. The alt attribute must hold a detailed prompt that could be used to generate that image.
- Put a caption under every image and wrap the image and its caption in <figure> with the caption inside <figcaption>.
- Return only the content that belongs between <body> and </body>. Do not include <html>, <head> or <body> tags.
- Do not add CSS or JavaScript.
- Return HTML only, without any explanation.

Article:
{article}";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read prompt template {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("prompt template {0:?} has no {{article}} placeholder")]
    MissingPlaceholder(PathBuf),
}

/// Instruction text sent to the completion service, with an `{article}`
/// placeholder for the article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn from_file(path: &Path) -> Result<Self, PromptError> {
        let text = fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !text.contains(ARTICLE_PLACEHOLDER) {
            return Err(PromptError::MissingPlaceholder(path.to_path_buf()));
        }
        Ok(Self { text })
    }

    pub fn render(&self, article: &Article) -> String {
        self.text.replacen(ARTICLE_PLACEHOLDER, article.as_str(), 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
