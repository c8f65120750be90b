use std::collections::BTreeSet;

use tracing::{
  debug,
  trace
};

use crate::error::ApiResult;
use crate::model::{
  PriorityFilter,
  StatusFilter,
  TaskDto,
  TaskStatus
};

/// Filters `tasks` by both selectors, then stable-sorts by priority rank.
pub fn visible_tasks<'a>(
  tasks: &'a [TaskDto],
  status: StatusFilter,
  priority: PriorityFilter
) -> Vec<&'a TaskDto> {
  let mut visible: Vec<&TaskDto> = tasks
    .iter()
    .filter(|task| {
      status.matches(&task.status)
        && priority
          .matches(&task.priority)
    })
    .collect();
  visible.sort_by_key(|task| {
    task.priority.rank()
  });
  visible
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
  Loaded(Vec<TaskDto>),
  Created(TaskDto),
  Updated(TaskDto),
  Removed(String),
  SetStatusFilter(StatusFilter),
  SetPriorityFilter(PriorityFilter),
  ToggleEditing(String),
  StopEditing(String),
  Reset
}

/// A task call that came back successfully, with what it returned.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
  Listed(Vec<TaskDto>),
  Created(TaskDto),
  Removed(String),
  /// Status or priority change.
  Updated(TaskDto),
  /// Text change; also ends edit mode for the task.
  TextEdited(TaskDto)
}

impl TaskOutcome {
  pub fn into_actions(
    self
  ) -> Vec<BoardAction> {
    match self {
      | TaskOutcome::Listed(tasks) => {
        vec![BoardAction::Loaded(tasks)]
      }
      | TaskOutcome::Created(task) => {
        vec![BoardAction::Created(task)]
      }
      | TaskOutcome::Removed(id) => {
        vec![BoardAction::Removed(id)]
      }
      | TaskOutcome::Updated(task) => {
        vec![BoardAction::Updated(task)]
      }
      | TaskOutcome::TextEdited(task) => {
        let id = task.id.clone();
        vec![
          BoardAction::Updated(task),
          BoardAction::StopEditing(id),
        ]
      }
    }
  }
}

/// Board actions for a finished task call. A failed call yields the error
/// and no actions, so the board keeps its state.
pub fn actions_for(
  result: ApiResult<TaskOutcome>
) -> ApiResult<Vec<BoardAction>> {
  result.map(TaskOutcome::into_actions)
}

/// Cached tasks plus the ephemeral view selectors.
///
/// Edit mode lives in `editing`, keyed by task id, and never touches the
/// cached `TaskDto`s.
#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct TaskBoard {
  tasks:           Vec<TaskDto>,
  status_filter:   StatusFilter,
  priority_filter: PriorityFilter,
  editing:         BTreeSet<String>
}

impl TaskBoard {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn tasks(&self) -> &[TaskDto] {
    &self.tasks
  }

  pub fn status_filter(
    &self
  ) -> StatusFilter {
    self.status_filter
  }

  pub fn priority_filter(
    &self
  ) -> PriorityFilter {
    self.priority_filter
  }

  pub fn find(
    &self,
    id: &str
  ) -> Option<&TaskDto> {
    self
      .tasks
      .iter()
      .find(|task| task.id == id)
  }

  pub fn visible(&self) -> Vec<&TaskDto> {
    visible_tasks(
      &self.tasks,
      self.status_filter,
      self.priority_filter
    )
  }

  pub fn is_editing(
    &self,
    id: &str
  ) -> bool {
    self.editing.contains(id)
  }

  /// Target of a status toggle, computed from the cached copy.
  pub fn next_status(
    &self,
    id: &str
  ) -> Option<TaskStatus> {
    self
      .find(id)
      .map(|task| task.status.toggled())
  }

  /// The trimmed draft, when it is non-empty and differs from the cached
  /// text. `None` means no request should be sent.
  pub fn text_edit(
    &self,
    id: &str,
    draft: &str
  ) -> Option<String> {
    let task = self.find(id)?;
    let draft = draft.trim();
    if draft.is_empty() || draft == task.text
    {
      return None;
    }
    Some(draft.to_string())
  }

  /// Applies the outcome of a task call, or hands back its error with the
  /// board untouched.
  pub fn settle(
    &mut self,
    result: ApiResult<TaskOutcome>
  ) -> ApiResult<()> {
    for action in actions_for(result)? {
      self.apply(action);
    }
    Ok(())
  }

  pub fn apply(
    &mut self,
    action: BoardAction
  ) {
    trace!(?action, "applying board action");
    match action {
      | BoardAction::Loaded(tasks) => {
        debug!(
          count = tasks.len(),
          "board loaded"
        );
        self
          .editing
          .retain(|id| {
            tasks
              .iter()
              .any(|task| &task.id == id)
          });
        self.tasks = tasks;
      }
      | BoardAction::Created(task) => {
        self.tasks.push(task);
      }
      | BoardAction::Updated(task) => {
        match self
          .tasks
          .iter_mut()
          .find(|cached| cached.id == task.id)
        {
          | Some(cached) => *cached = task,
          | None => {
            debug!(
              task = %task.id,
              "ignoring update for uncached task"
            );
          }
        }
      }
      | BoardAction::Removed(id) => {
        self
          .tasks
          .retain(|task| task.id != id);
        self.editing.remove(&id);
      }
      | BoardAction::SetStatusFilter(
        filter
      ) => {
        self.status_filter = filter;
      }
      | BoardAction::SetPriorityFilter(
        filter
      ) => {
        self.priority_filter = filter;
      }
      | BoardAction::ToggleEditing(id) => {
        if !self.editing.remove(&id) {
          self.editing.insert(id);
        }
      }
      | BoardAction::StopEditing(id) => {
        self.editing.remove(&id);
      }
      | BoardAction::Reset => {
        *self = TaskBoard::default();
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ApiError;
  use crate::model::{
    Selector,
    TaskPriority
  };

  fn task(
    id: &str,
    status: TaskStatus,
    priority: TaskPriority
  ) -> TaskDto {
    TaskDto {
      id: id.to_string(),
      text: format!("task {id}"),
      status,
      priority
    }
  }

  fn sample() -> Vec<TaskDto> {
    use TaskPriority::*;
    use TaskStatus::*;
    vec![
      task("a", Pending, Low),
      task("b", Completed, High),
      task("c", Pending, Medium),
      task("d", Pending, High),
      task("e", Completed, Low),
      task("f", Completed, Medium),
    ]
  }

  fn ids(tasks: &[&TaskDto]) -> Vec<String> {
    tasks
      .iter()
      .map(|task| task.id.clone())
      .collect()
  }

  #[test]
  fn wildcards_sort_by_rank_keeping_ties_stable()
  {
    let tasks = sample();
    let visible = visible_tasks(
      &tasks,
      Selector::All,
      Selector::All
    );
    assert_eq!(
      ids(&visible),
      vec!["b", "d", "c", "f", "a", "e"]
    );
  }

  #[test]
  fn every_filter_combination_matches_exactly()
  {
    let tasks = sample();
    let statuses = std::iter::once(
      Selector::All
    )
    .chain(
      TaskStatus::ALL
        .into_iter()
        .map(Selector::Only)
    );

    for status in statuses {
      let priorities = std::iter::once(
        Selector::All
      )
      .chain(
        TaskPriority::ALL
          .into_iter()
          .map(Selector::Only)
      );
      for priority in priorities {
        let visible = visible_tasks(
          &tasks, status, priority
        );
        let expected = tasks
          .iter()
          .filter(|task| {
            status.matches(&task.status)
              && priority
                .matches(&task.priority)
          })
          .count();
        assert_eq!(visible.len(), expected);
        assert!(visible.iter().all(|task| {
          status.matches(&task.status)
            && priority
              .matches(&task.priority)
        }));
        assert!(visible.windows(2).all(
          |pair| {
            pair[0].priority.rank()
              <= pair[1].priority.rank()
          }
        ));
      }
    }
  }

  #[test]
  fn combined_filters_narrow_the_view() {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));
    board.apply(
      BoardAction::SetStatusFilter(
        Selector::Only(TaskStatus::Pending)
      )
    );
    assert_eq!(
      ids(&board.visible()),
      vec!["d", "c", "a"]
    );

    board.apply(
      BoardAction::SetPriorityFilter(
        Selector::Only(TaskPriority::Low)
      )
    );
    assert_eq!(
      ids(&board.visible()),
      vec!["a"]
    );
  }

  #[test]
  fn updates_replace_by_id_and_last_one_wins()
  {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));

    let mut first = task(
      "a",
      TaskStatus::Completed,
      TaskPriority::Low
    );
    first.text = "first".to_string();
    let mut second = first.clone();
    second.text = "second".to_string();

    board.apply(BoardAction::Updated(first));
    board.apply(BoardAction::Updated(second));
    assert_eq!(board.tasks().len(), 6);
    assert_eq!(
      board.find("a").map(|t| t.text.as_str()),
      Some("second")
    );

    board.apply(BoardAction::Updated(task(
      "zzz",
      TaskStatus::Pending,
      TaskPriority::Low
    )));
    assert!(board.find("zzz").is_none());
  }

  #[test]
  fn create_appends_and_remove_drops() {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Created(task(
      "n",
      TaskStatus::Pending,
      TaskPriority::Medium
    )));
    board
      .apply(BoardAction::ToggleEditing(
        "n".to_string()
      ));
    assert!(board.is_editing("n"));

    board.apply(BoardAction::Removed(
      "n".to_string()
    ));
    assert!(board.tasks().is_empty());
    assert!(!board.is_editing("n"));
  }

  #[test]
  fn status_toggle_reads_cached_copy() {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));

    assert_eq!(
      board.next_status("a"),
      Some(TaskStatus::Completed)
    );
    board.apply(BoardAction::Updated(task(
      "a",
      TaskStatus::Completed,
      TaskPriority::Low
    )));
    assert_eq!(
      board.next_status("a"),
      Some(TaskStatus::Pending)
    );
    assert_eq!(board.next_status("nope"), None);
  }

  #[test]
  fn text_edit_skips_empty_and_unchanged()
  {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));

    assert_eq!(board.text_edit("a", "   "), None);
    assert_eq!(
      board.text_edit("a", " task a "),
      None
    );
    assert_eq!(
      board.text_edit("a", " Buy milk "),
      Some("Buy milk".to_string())
    );
  }

  #[test]
  fn editing_is_separate_from_task_data() {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));
    let before = board.tasks().to_vec();

    board
      .apply(BoardAction::ToggleEditing(
        "c".to_string()
      ));
    assert!(board.is_editing("c"));
    assert_eq!(board.tasks(), &before[..]);

    board
      .apply(BoardAction::ToggleEditing(
        "c".to_string()
      ));
    assert!(!board.is_editing("c"));

    board
      .apply(BoardAction::ToggleEditing(
        "c".to_string()
      ));
    board.apply(BoardAction::StopEditing(
      "c".to_string()
    ));
    assert!(!board.is_editing("c"));
  }

  #[test]
  fn reset_clears_everything() {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));
    board.apply(
      BoardAction::SetStatusFilter(
        Selector::Only(
          TaskStatus::Completed
        )
      )
    );
    board.apply(BoardAction::Reset);
    assert_eq!(board, TaskBoard::default());
  }

  #[test]
  fn failed_calls_leave_the_board_alone() {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));
    board
      .apply(BoardAction::ToggleEditing(
        "a".to_string()
      ));
    let before = board.clone();

    let error = ApiError::Status {
      status:  500,
      message: "boom".to_string()
    };
    assert_eq!(
      board.settle(Err(error.clone())),
      Err(error)
    );
    assert_eq!(board, before);
    assert!(board.is_editing("a"));

    assert_eq!(
      board.settle(Err(ApiError::Transport(
        "offline".to_string()
      ))),
      Err(ApiError::Transport(
        "offline".to_string()
      ))
    );
    assert_eq!(board.tasks(), before.tasks());
  }

  #[test]
  fn successful_text_edit_replaces_and_stops_editing()
  {
    let mut board = TaskBoard::new();
    board.apply(BoardAction::Loaded(sample()));
    board
      .apply(BoardAction::ToggleEditing(
        "a".to_string()
      ));
    board
      .apply(BoardAction::ToggleEditing(
        "c".to_string()
      ));

    let mut edited = task(
      "a",
      TaskStatus::Pending,
      TaskPriority::Low
    );
    edited.text = "Walk dog".to_string();
    board
      .settle(Ok(TaskOutcome::TextEdited(
        edited
      )))
      .unwrap();

    assert_eq!(
      board.find("a").map(|t| t.text.as_str()),
      Some("Walk dog")
    );
    assert!(!board.is_editing("a"));
    assert!(board.is_editing("c"));
  }

  #[test]
  fn outcomes_map_to_board_actions() {
    let created = task(
      "n",
      TaskStatus::Pending,
      TaskPriority::Medium
    );
    assert_eq!(
      actions_for(Ok(TaskOutcome::Created(
        created.clone()
      ))),
      Ok(vec![BoardAction::Created(created)])
    );
    assert_eq!(
      actions_for(Ok(TaskOutcome::Removed(
        "n".to_string()
      ))),
      Ok(vec![BoardAction::Removed(
        "n".to_string()
      )])
    );
    assert_eq!(
      actions_for(Err(ApiError::MissingToken)),
      Err(ApiError::MissingToken)
    );

    let mut board = TaskBoard::new();
    board
      .settle(Ok(TaskOutcome::Listed(sample())))
      .unwrap();
    board
      .settle(Ok(TaskOutcome::Updated(task(
        "a",
        TaskStatus::Completed,
        TaskPriority::Low
      ))))
      .unwrap();
    assert_eq!(
      board.next_status("a"),
      Some(TaskStatus::Pending)
    );
  }
}
