use tally_shared::{
  TaskDto,
  TaskPriority,
  TaskStatus
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_node_ref
};

use super::task_filters::priority_label;

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub task:           TaskDto,
  pub editing:        bool,
  pub on_toggle_edit: Callback<String>,
  /// Fired on blur with `(id, draft)`.
  pub on_commit_text:
    Callback<(String, String)>,
  pub on_toggle_status: Callback<String>,
  pub on_priority:
    Callback<(String, TaskPriority)>,
  pub on_delete:      Callback<String>
}

pub fn status_action_label(
  status: TaskStatus
) -> &'static str {
  match status {
    | TaskStatus::Pending => {
      "Mark Complete"
    }
    | TaskStatus::Completed => {
      "Mark Pending"
    }
  }
}

#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let task = &props.task;
  let id = task.id.clone();
  let edit_ref = use_node_ref();

  // Blur commits the draft, so a freshly opened input must hold focus.
  {
    let edit_ref = edit_ref.clone();
    use_effect_with(
      props.editing,
      move |editing| {
        if *editing
          && let Some(input) = edit_ref
            .cast::<web_sys::HtmlInputElement>()
          && let Err(error) = input.focus()
        {
          tracing::warn!(?error, "could not focus task editor");
        }
        || ()
      }
    );
  }

  let on_toggle_edit = {
    let id = id.clone();
    let on_toggle_edit =
      props.on_toggle_edit.clone();
    Callback::from(
      move |_: web_sys::MouseEvent| {
        on_toggle_edit.emit(id.clone())
      }
    )
  };

  let on_blur = {
    let id = id.clone();
    let on_commit_text =
      props.on_commit_text.clone();
    Callback::from(
      move |e: web_sys::FocusEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        on_commit_text
          .emit((id.clone(), input.value()));
      }
    )
  };

  let on_toggle_status = {
    let id = id.clone();
    let on_toggle_status =
      props.on_toggle_status.clone();
    Callback::from(
      move |_: web_sys::MouseEvent| {
        on_toggle_status.emit(id.clone())
      }
    )
  };

  let on_priority_change = {
    let id = id.clone();
    let on_priority =
      props.on_priority.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let Some(select) = e
          .target_dyn_into::<
            web_sys::HtmlSelectElement
          >()
        else {
          return;
        };
        match select
          .value()
          .parse::<TaskPriority>()
        {
          | Ok(priority) => {
            on_priority
              .emit((id.clone(), priority))
          }
          | Err(error) => {
            tracing::warn!(%error, "ignored priority change")
          }
        }
      }
    )
  };

  let on_delete = {
    let id = id.clone();
    let on_delete = props.on_delete.clone();
    Callback::from(
      move |_: web_sys::MouseEvent| {
        on_delete.emit(id.clone())
      }
    )
  };

  let status_class = match task.status {
    | TaskStatus::Pending => {
      "btn status pending"
    }
    | TaskStatus::Completed => {
      "btn status done"
    }
  };

  html! {
      <li class="task-row">
          <div class="task-main">
              {
                  if props.editing {
                      html! {
                          <input
                              type="text"
                              class="task-edit"
                              value={task.text.clone()}
                              onblur={on_blur}
                              ref={edit_ref}
                          />
                      }
                  } else {
                      html! { <span class="task-text">{ task.text.clone() }</span> }
                  }
              }
              <span class="task-meta">
                  { format!("({}, {})", task.status, task.priority) }
              </span>
          </div>
          <div class="task-actions">
              <button class="btn" onclick={on_toggle_edit}>
                  { if props.editing { "Cancel" } else { "Edit" } }
              </button>
              <button class={status_class} onclick={on_toggle_status}>
                  { status_action_label(task.status) }
              </button>
              <select onchange={on_priority_change}>
                  {
                      for TaskPriority::ALL.into_iter().map(|priority| html! {
                          <option value={priority.as_key()} selected={task.priority == priority}>
                              { priority_label(priority) }
                          </option>
                      })
                  }
              </select>
              <button class="btn danger" onclick={on_delete}>{ "Delete" }</button>
          </div>
      </li>
  }
}
