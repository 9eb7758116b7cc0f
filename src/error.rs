use crate::language::Language;
use thiserror::Error;

/// Errors that stop the compilation of a single (workflow, language) pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("No class template is registered for language '{language}'")]
    MissingClassTemplate { language: Language },

    #[error("Workflow '{workflow}' contains no nodes")]
    EmptyWorkflow { workflow: String },
}

/// Errors that can occur while reading a workflow graph into the canonical model.
#[derive(Error, Debug, Clone)]
pub enum WorkflowError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid workflow data: {0}")]
    ValidationError(String),
}

/// Errors raised while populating a template catalogue.
#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    #[error("Could not read template '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Unknown target language '{0}'")]
    UnknownLanguage(String),
}
