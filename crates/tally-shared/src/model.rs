use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};
use tracing::warn;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
  Pending,
  Completed
}

impl TaskStatus {
  pub const ALL: [TaskStatus; 2] = [
    TaskStatus::Pending,
    TaskStatus::Completed
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | TaskStatus::Pending => "pending",
      | TaskStatus::Completed => {
        "completed"
      }
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | TaskStatus::Pending => {
        TaskStatus::Completed
      }
      | TaskStatus::Completed => {
        TaskStatus::Pending
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  Low,
  Medium,
  High
}

impl TaskPriority {
  pub const ALL: [TaskPriority; 3] = [
    TaskPriority::Low,
    TaskPriority::Medium,
    TaskPriority::High
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | TaskPriority::Low => "low",
      | TaskPriority::Medium => "medium",
      | TaskPriority::High => "high"
    }
  }

  /// Display rank; lower sorts first.
  pub fn rank(self) -> u8 {
    match self {
      | TaskPriority::High => 1,
      | TaskPriority::Medium => 2,
      | TaskPriority::Low => 3
    }
  }
}

impl fmt::Display for TaskStatus {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl fmt::Display for TaskPriority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for TaskStatus {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    TaskStatus::ALL
      .into_iter()
      .find(|status| {
        status.as_key()
          == s.trim().to_ascii_lowercase()
      })
      .ok_or_else(|| {
        format!(
          "unknown status '{s}', \
           expected pending or completed"
        )
      })
  }
}

impl FromStr for TaskPriority {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    TaskPriority::ALL
      .into_iter()
      .find(|priority| {
        priority.as_key()
          == s.trim().to_ascii_lowercase()
      })
      .ok_or_else(|| {
        format!(
          "unknown priority '{s}', \
           expected low, medium or high"
        )
      })
  }
}

/// A task as the remote service returns it.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskDto {
  #[serde(rename = "_id", alias = "id")]
  pub id:       String,
  #[serde(default)]
  pub text:     String,
  pub status:   TaskStatus,
  pub priority: TaskPriority
}

/// Filter selector where `All` matches every value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
)]
pub enum Selector<T> {
  #[default]
  All,
  Only(T)
}

impl<T: PartialEq> Selector<T> {
  pub fn matches(
    &self,
    value: &T
  ) -> bool {
    match self {
      | Selector::All => true,
      | Selector::Only(expected) => {
        expected == value
      }
    }
  }
}

impl<T: FromStr> Selector<T> {
  /// Parses a select-box value; `all` is the wildcard.
  pub fn parse_key(
    key: &str
  ) -> Result<Self, T::Err> {
    if key.trim().eq_ignore_ascii_case("all")
    {
      return Ok(Selector::All);
    }
    key.parse().map(Selector::Only)
  }
}

pub type StatusFilter =
  Selector<TaskStatus>;
pub type PriorityFilter =
  Selector<TaskPriority>;

impl StatusFilter {
  pub fn as_key(&self) -> &'static str {
    match self {
      | Selector::All => "all",
      | Selector::Only(status) => {
        status.as_key()
      }
    }
  }
}

impl PriorityFilter {
  pub fn as_key(&self) -> &'static str {
    match self {
      | Selector::All => "all",
      | Selector::Only(priority) => {
        priority.as_key()
      }
    }
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct Credentials {
  pub username: String,
  pub password: String
}

/// Reply to `/login` and `/register`.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
)]
pub struct AuthReply {
  #[serde(default)]
  pub token:   Option<String>,
  #[serde(default)]
  pub message: Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskCreate {
  pub text:     String,
  pub status:   TaskStatus,
  pub priority: TaskPriority
}

impl TaskCreate {
  /// New tasks always start pending at medium priority.
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text:     text.into(),
      status:   TaskStatus::Pending,
      priority: TaskPriority::Medium
    }
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TextPatch {
  pub text: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct StatusPatch {
  pub status: TaskStatus
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct PriorityPatch {
  pub priority: TaskPriority
}

/// `GET /tasks` answers either a bare array or `{ "tasks": [...] }`.
///
/// Rows are kept as raw JSON until `into_tasks`, so one malformed row does
/// not reject the whole list.
#[derive(Debug, Clone, Deserialize)]
#[serde(
  untagged,
  expecting = "a task array or an object with a `tasks` array"
)]
pub enum TaskListReply {
  Bare(Vec<serde_json::Value>),
  Wrapped {
    #[serde(default)]
    tasks: Option<Vec<serde_json::Value>>
  }
}

impl TaskListReply {
  /// Decoded rows; a missing or null `tasks` field is an empty list and
  /// rows that are not tasks are skipped.
  pub fn into_tasks(self) -> Vec<TaskDto> {
    let rows = match self {
      | TaskListReply::Bare(rows) => rows,
      | TaskListReply::Wrapped {
        tasks
      } => tasks.unwrap_or_default()
    };
    rows
      .into_iter()
      .filter_map(|row| {
        serde_json::from_value(row)
          .map_err(|error| {
            warn!(%error, "skipping malformed task row");
          })
          .ok()
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn task_reads_underscore_id_and_ignores_extras()
  {
    let task: TaskDto =
      serde_json::from_value(json!({
        "_id": "64f0",
        "text": "Buy milk",
        "status": "completed",
        "priority": "high",
        "user": "alice",
        "__v": 0
      }))
      .unwrap();

    assert_eq!(task.id, "64f0");
    assert_eq!(
      task.status,
      TaskStatus::Completed
    );
    assert_eq!(
      task.priority,
      TaskPriority::High
    );

    let encoded =
      serde_json::to_value(&task)
        .unwrap();
    assert_eq!(encoded["_id"], "64f0");
  }

  #[test]
  fn list_reply_accepts_both_shapes() {
    let row = json!({
      "_id": "1",
      "text": "a",
      "status": "pending",
      "priority": "low"
    });

    let bare: TaskListReply =
      serde_json::from_value(json!([
        row.clone()
      ]))
      .unwrap();
    assert_eq!(
      bare.into_tasks().len(),
      1
    );

    let wrapped: TaskListReply =
      serde_json::from_value(
        json!({ "tasks": [row] })
      )
      .unwrap();
    assert_eq!(
      wrapped.into_tasks()[0].id,
      "1"
    );

    let missing: TaskListReply =
      serde_json::from_value(
        json!({ "count": 0 })
      )
      .unwrap();
    assert!(
      missing.into_tasks().is_empty()
    );

    let null: TaskListReply =
      serde_json::from_value(
        json!({ "tasks": null })
      )
      .unwrap();
    assert!(null.into_tasks().is_empty());
  }

  #[test]
  fn list_reply_skips_rows_that_are_not_tasks()
  {
    let reply: TaskListReply =
      serde_json::from_value(json!([
        {
          "_id": "1",
          "text": "a",
          "status": "pending",
          "priority": "urgent"
        },
        {
          "_id": "2",
          "text": "b",
          "status": "completed",
          "priority": "high"
        }
      ]))
      .unwrap();
    let tasks = reply.into_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "2");

    let error = serde_json::from_value::<
      TaskListReply
    >(json!("nope"))
    .unwrap_err();
    assert!(
      error
        .to_string()
        .contains("`tasks` array")
    );
  }

  #[test]
  fn create_body_is_pending_medium() {
    let body = serde_json::to_value(
      TaskCreate::new("Buy milk")
    )
    .unwrap();
    assert_eq!(
      body,
      json!({
        "text": "Buy milk",
        "status": "pending",
        "priority": "medium"
      })
    );
  }

  #[test]
  fn selector_keys_parse_with_wildcard()
  {
    assert_eq!(
      StatusFilter::parse_key("all"),
      Ok(Selector::All)
    );
    assert_eq!(
      PriorityFilter::parse_key("High"),
      Ok(Selector::Only(
        TaskPriority::High
      ))
    );
    assert!(
      StatusFilter::parse_key("waiting")
        .is_err()
    );
    assert_eq!(
      Selector::Only(
        TaskStatus::Completed
      )
      .as_key(),
      "completed"
    );
  }

  #[test]
  fn status_toggle_flips_both_ways() {
    assert_eq!(
      TaskStatus::Pending.toggled(),
      TaskStatus::Completed
    );
    assert_eq!(
      TaskStatus::Completed.toggled(),
      TaskStatus::Pending
    );
  }
}
