use std::collections::HashSet;
use std::path::Path;

use sagaflow_model::TaskDefinition;
use tracing::info;

use crate::document::WorkflowDoc;
use crate::error::LoadError;

/// Load a workflow file, dispatching on extension: `.json` is parsed as
/// JSON, everything else as YAML.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<TaskDefinition>, LoadError> {
  let path = path.as_ref();
  let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
    path: path.to_path_buf(),
    source,
  })?;

  let tasks = match path.extension().and_then(|e| e.to_str()) {
    Some("json") => parse_json(&contents)?,
    _ => parse_yaml(&contents)?,
  };

  info!(path = %path.display(), tasks = tasks.len(), "loaded workflow file");
  Ok(tasks)
}

/// Parse a YAML workflow document.
pub fn parse_yaml(contents: &str) -> Result<Vec<TaskDefinition>, LoadError> {
  let doc: WorkflowDoc = serde_yaml_ng::from_str(contents)?;
  validate(doc)
}

/// Parse a JSON workflow document.
pub fn parse_json(contents: &str) -> Result<Vec<TaskDefinition>, LoadError> {
  let doc: WorkflowDoc = serde_json::from_str(contents)?;
  validate(doc)
}

fn validate(doc: WorkflowDoc) -> Result<Vec<TaskDefinition>, LoadError> {
  let mut task_names = HashSet::new();

  for (index, task) in doc.tasks.iter().enumerate() {
    let task_name = task.name.trim();
    if task_name.is_empty() {
      return Err(LoadError::BlankTaskName { index });
    }
    if !task_names.insert(task_name.to_string()) {
      return Err(LoadError::DuplicateTask {
        name: task_name.to_string(),
      });
    }

    let mut step_names = HashSet::new();
    for (step_index, step) in task.steps.iter().enumerate() {
      let step_name = step.name.trim();
      if step_name.is_empty() {
        return Err(LoadError::BlankStepName {
          task: task_name.to_string(),
          index: step_index,
        });
      }
      if step.command.trim().is_empty() {
        return Err(LoadError::BlankCommand {
          task: task_name.to_string(),
          step: step_name.to_string(),
        });
      }
      if !step_names.insert(step_name.to_string()) {
        return Err(LoadError::DuplicateStep {
          task: task_name.to_string(),
          step: step_name.to_string(),
        });
      }
    }
  }

  Ok(doc.tasks.into_iter().map(TaskDefinition::from).collect())
}
