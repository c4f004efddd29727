use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::RunLog;
use thiserror::Error;

use crate::article::{read_article, ArticleError};
use crate::complete::{Completer, CompletionSettings, OpenAiCompleter};
use crate::credential::load_credential;
use crate::extract::unwrap_document;
use crate::fence::strip_code_fences;
use crate::generate::{GenerateError, HtmlGenerator};
use crate::persist::{write_output, PersistError};
use crate::prompt::{PromptError, PromptTemplate};
use crate::settings::{load_settings, ConfigError, Settings, SettingsOverrides};
use crate::{ApiKey, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub bytes_written: u64,
    pub model: String,
}

/// Terminal failure of a run. Nothing is written when a run fails.
#[derive(Debug, Error)]
pub enum RunFailure {
    #[error("configuration unavailable: {0}")]
    Config(#[from] ConfigError),
    #[error("prompt template unavailable: {0}")]
    Prompt(#[from] PromptError),
    #[error("no article to render: {0}")]
    Article(#[from] ArticleError),
    #[error("html generation failed: {0}")]
    Generation(#[from] GenerateError),
    #[error("generated markup is empty after cleanup")]
    EmptyAfterCleanup,
    #[error("failed to write output: {0}")]
    Write(#[from] PersistError),
    #[error("failed to start async runtime: {0}")]
    Runtime(String),
}

impl RunFailure {
    /// Stage the run was in when it stopped.
    pub fn stage(&self) -> Stage {
        match self {
            RunFailure::Config(_) | RunFailure::Prompt(_) | RunFailure::Runtime(_) => {
                Stage::LoadConfig
            }
            RunFailure::Article(_) => Stage::ReadArticle,
            RunFailure::Generation(_) => Stage::Generate,
            RunFailure::EmptyAfterCleanup => Stage::Clean,
            RunFailure::Write(_) => Stage::Write,
        }
    }
}

/// Sequences one article through config, credential, article, generation,
/// cleanup and write.
pub struct Pipeline {
    log: RunLog,
    overrides: SettingsOverrides,
    completer: Option<Arc<dyn Completer>>,
}

impl Pipeline {
    pub fn new(log: RunLog) -> Self {
        Self {
            log,
            overrides: SettingsOverrides::default(),
            completer: None,
        }
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Use `completer` instead of an [`OpenAiCompleter`] built from settings.
    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Runs the pipeline on a fresh tokio runtime and blocks until it ends.
    pub fn run_blocking(&self, settings_path: &Path) -> Result<RunReport, RunFailure> {
        match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime.block_on(self.run(settings_path)),
            Err(err) => {
                let result = Err(RunFailure::Runtime(err.to_string()));
                self.report(&result);
                result
            }
        }
    }

    pub async fn run(&self, settings_path: &Path) -> Result<RunReport, RunFailure> {
        let result = self.execute(settings_path).await;
        self.report(&result);
        result
    }

    fn report(&self, result: &Result<RunReport, RunFailure>) {
        match result {
            Ok(report) => self.log.info(format_args!(
                "Wrote {} bytes of HTML to {:?} using model {}",
                report.bytes_written, report.output_path, report.model
            )),
            Err(failure) => self
                .log
                .error(format_args!("Run stopped at {:?}: {}", failure.stage(), failure)),
        }
        self.log.debug(format_args!(
            "Run finished with {} warning(s) and {} error(s)",
            self.log.warning_count(),
            self.log.error_count()
        ));
    }

    async fn execute(&self, settings_path: &Path) -> Result<RunReport, RunFailure> {
        self.enter(Stage::LoadConfig);
        let settings = self.load_settings(settings_path)?;
        let template = match &settings.prompt_file {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::default(),
        };

        self.enter(Stage::LoadCredential);
        let api_key = match load_credential(&settings.api_key_file) {
            Ok(key) => {
                self.log
                    .debug(format_args!("Loaded credential from {:?}", settings.api_key_file));
                key
            }
            Err(err) => {
                self.log.warn(format_args!("{err}"));
                ApiKey::empty()
            }
        };

        self.enter(Stage::ReadArticle);
        let article = read_article(&settings.input_file, settings.input_encoding.as_deref())?;
        self.log.info(format_args!(
            "Read article from {:?} ({} characters)",
            settings.input_file,
            article.as_str().chars().count()
        ));

        self.enter(Stage::Generate);
        let completer: Arc<dyn Completer> = match &self.completer {
            Some(completer) => completer.clone(),
            None => Arc::new(OpenAiCompleter::new(CompletionSettings::from(&settings))),
        };
        let generator = HtmlGenerator::new(completer, template);
        let markup = generator
            .generate(&article, &api_key, &settings.model)
            .await?;
        self.log
            .debug(format_args!("Received {} bytes of markup", markup.len()));

        self.enter(Stage::Clean);
        let cleaned = self.clean(&markup, settings.unwrap_document);
        if cleaned.is_empty() {
            return Err(RunFailure::EmptyAfterCleanup);
        }

        self.enter(Stage::Write);
        let output_path = write_output(&settings.output_file, &cleaned)?;

        self.enter(Stage::Done);
        Ok(RunReport {
            output_path,
            bytes_written: cleaned.len() as u64,
            model: settings.model,
        })
    }

    fn load_settings(&self, path: &Path) -> Result<Settings, RunFailure> {
        let settings = load_settings(path)?;
        self.log.debug(format_args!("Loaded settings from {path:?}"));
        if !self.overrides.is_empty() {
            self.log
                .debug(format_args!("Applying command line overrides {:?}", self.overrides));
        }
        Ok(self.overrides.apply(settings))
    }

    fn clean(&self, markup: &str, unwrap: bool) -> String {
        let stripped = strip_code_fences(markup);
        if !unwrap {
            return stripped;
        }
        let fragment = unwrap_document(&stripped);
        if fragment != stripped {
            self.log
                .warn("Reply was a full HTML document; kept only the body content");
        }
        fragment
    }

    fn enter(&self, stage: Stage) {
        self.log.debug(format_args!("Stage {stage:?}"));
    }
}
