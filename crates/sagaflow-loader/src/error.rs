use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a workflow document.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read workflow file: {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid JSON workflow document: {0}")]
  Json(#[from] serde_json::Error),

  #[error("invalid YAML workflow document: {0}")]
  Yaml(#[from] serde_yaml_ng::Error),

  #[error("task at index {index} has a blank name")]
  BlankTaskName { index: usize },

  #[error("duplicate task name: {name}")]
  DuplicateTask { name: String },

  #[error("step at index {index} of task '{task}' has a blank name")]
  BlankStepName { task: String, index: usize },

  #[error("step '{step}' of task '{task}' has a blank command")]
  BlankCommand { task: String, step: String },

  #[error("duplicate step name '{step}' in task '{task}'")]
  DuplicateStep { task: String, step: String },
}
