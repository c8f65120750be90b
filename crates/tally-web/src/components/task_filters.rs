use tally_shared::{
  PriorityFilter,
  StatusFilter,
  TaskPriority,
  TaskStatus
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskFiltersProps {
  pub status:      StatusFilter,
  pub priority:    PriorityFilter,
  pub on_status:   Callback<StatusFilter>,
  pub on_priority: Callback<PriorityFilter>
}

fn select_value(
  e: &web_sys::Event
) -> Option<String> {
  e.target_dyn_into::<
    web_sys::HtmlSelectElement
  >()
  .map(|select| select.value())
}

#[function_component(TaskFilters)]
pub fn task_filters(
  props: &TaskFiltersProps
) -> Html {
  let on_status_change = {
    let on_status =
      props.on_status.clone();
    Callback::from(
      move |e: web_sys::Event| {
        match select_value(&e)
          .map(|key| {
            StatusFilter::parse_key(&key)
          })
        {
          | Some(Ok(filter)) => {
            on_status.emit(filter)
          }
          | other => {
            tracing::warn!(
              ?other,
              "ignored status filter \
               change"
            )
          }
        }
      }
    )
  };

  let on_priority_change = {
    let on_priority =
      props.on_priority.clone();
    Callback::from(
      move |e: web_sys::Event| {
        match select_value(&e)
          .map(|key| {
            PriorityFilter::parse_key(&key)
          })
        {
          | Some(Ok(filter)) => {
            on_priority.emit(filter)
          }
          | other => {
            tracing::warn!(
              ?other,
              "ignored priority filter \
               change"
            )
          }
        }
      }
    )
  };

  let status_key = props.status.as_key();
  let priority_key =
    props.priority.as_key();

  html! {
      <div class="filters">
          <select onchange={on_status_change}>
              <option value="all" selected={status_key == "all"}>{ "All Status" }</option>
              {
                  for TaskStatus::ALL.into_iter().map(|status| html! {
                      <option value={status.as_key()} selected={status_key == status.as_key()}>
                          { status_label(status) }
                      </option>
                  })
              }
          </select>
          <select onchange={on_priority_change}>
              <option value="all" selected={priority_key == "all"}>{ "All Priorities" }</option>
              {
                  for TaskPriority::ALL.into_iter().map(|priority| html! {
                      <option value={priority.as_key()} selected={priority_key == priority.as_key()}>
                          { priority_label(priority) }
                      </option>
                  })
              }
          </select>
      </div>
  }
}

pub fn status_label(
  status: TaskStatus
) -> &'static str {
  match status {
    | TaskStatus::Pending => "Pending",
    | TaskStatus::Completed => {
      "Completed"
    }
  }
}

pub fn priority_label(
  priority: TaskPriority
) -> &'static str {
  match priority {
    | TaskPriority::Low => "Low",
    | TaskPriority::Medium => "Medium",
    | TaskPriority::High => "High"
  }
}
