use std::future::Future;

use tally_shared::{
  ApiResult,
  BoardAction,
  PriorityFilter,
  SessionStore,
  StatusFilter,
  TaskClient,
  TaskOutcome,
  TaskPriority,
  actions_for,
  sign_out
};
use yew::{
  Callback,
  Html,
  UseReducerHandle,
  UseStateHandle,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_reducer,
  use_state
};
use yew_router::prelude::use_navigator;

use super::{
  NewTaskForm,
  TaskFilters,
  TaskRow
};
use crate::api::{
  FetchTransport,
  task_client
};
use crate::app::{
  BoardState,
  Route
};
use crate::session::Session;

type Board = UseReducerHandle<BoardState>;

/// Runs one task call and dispatches the board actions for its outcome.
///
/// Failures land in `error`.
fn run_task_call<F, Fut>(
  session: &Session,
  board: &Board,
  error: &UseStateHandle<Option<String>>,
  call: F
) where
  F: FnOnce(TaskClient<FetchTransport>) -> Fut
    + 'static,
  Fut: Future<
      Output = ApiResult<TaskOutcome>
    > + 'static
{
  let client =
    match task_client(session.get()) {
      | Ok(client) => client,
      | Err(err) => {
        error.set(Some(err.to_string()));
        return;
      }
    };
  let board = board.clone();
  let error = error.clone();

  wasm_bindgen_futures::spawn_local(
    async move {
      match actions_for(call(client).await) {
        | Ok(actions) => {
          error.set(None);
          for action in actions {
            board.dispatch(action);
          }
        }
        | Err(err) => {
          tracing::error!(error = %err, "task call failed");
          error.set(Some(err.to_string()));
        }
      }
    }
  );
}

#[function_component(MainView)]
pub fn main_view() -> Html {
  let session = use_context::<Session>();
  let navigator = use_navigator();
  let board = use_reducer(BoardState::default);
  let error = use_state(|| None::<String>);

  {
    let session = session.clone();
    let board = board.clone();
    let error = error.clone();
    let token = session
      .as_ref()
      .and_then(|session| session.get());
    use_effect_with(
      token,
      move |token| {
        if let Some(session) = &session
          && token.is_some()
        {
          tracing::info!("loading tasks");
          run_task_call(
            session,
            &board,
            &error,
            |client| async move {
              client
                .list()
                .await
                .map(TaskOutcome::Listed)
            }
          );
        }
        || ()
      }
    );
  }

  let Some(session) = session else {
    tracing::error!(
      "session context missing"
    );
    return html! {};
  };

  let on_add = {
    let session = session.clone();
    let board = board.clone();
    let error = error.clone();
    Callback::from(move |text: String| {
      run_task_call(
        &session,
        &board,
        &error,
        move |client| async move {
          client
            .create(&text)
            .await
            .map(TaskOutcome::Created)
        }
      );
    })
  };

  let on_delete = {
    let session = session.clone();
    let board = board.clone();
    let error = error.clone();
    Callback::from(move |id: String| {
      run_task_call(
        &session,
        &board,
        &error,
        move |client| async move {
          let removed =
            client.remove(&id).await;
          removed
            .map(|()| TaskOutcome::Removed(id))
        }
      );
    })
  };

  let on_toggle_status = {
    let session = session.clone();
    let board = board.clone();
    let error = error.clone();
    Callback::from(move |id: String| {
      let Some(status) =
        board.0.next_status(&id)
      else {
        tracing::warn!(task = %id, "toggle for uncached task");
        return;
      };
      tracing::debug!(task = %id, %status, "toggling status");
      run_task_call(
        &session,
        &board,
        &error,
        move |client| async move {
          client
            .set_status(&id, status)
            .await
            .map(TaskOutcome::Updated)
        }
      );
    })
  };

  let on_priority = {
    let session = session.clone();
    let board = board.clone();
    let error = error.clone();
    Callback::from(
      move |(id, priority): (
        String,
        TaskPriority
      )| {
        run_task_call(
          &session,
          &board,
          &error,
          move |client| async move {
            client
              .set_priority(&id, priority)
              .await
              .map(TaskOutcome::Updated)
          }
        );
      }
    )
  };

  let on_toggle_edit = {
    let board = board.clone();
    Callback::from(move |id: String| {
      board.dispatch(
        BoardAction::ToggleEditing(id)
      );
    })
  };

  let on_commit_text = {
    let session = session.clone();
    let board = board.clone();
    let error = error.clone();
    Callback::from(
      move |(id, draft): (String, String)| {
        let Some(text) =
          board.0.text_edit(&id, &draft)
        else {
          board.dispatch(
            BoardAction::StopEditing(id)
          );
          return;
        };
        run_task_call(
          &session,
          &board,
          &error,
          move |client| async move {
            client
              .set_text(&id, &text)
              .await
              .map(TaskOutcome::TextEdited)
          }
        );
      }
    )
  };

  let on_status_filter = {
    let board = board.clone();
    Callback::from(
      move |filter: StatusFilter| {
        board.dispatch(
          BoardAction::SetStatusFilter(
            filter
          )
        );
      }
    )
  };

  let on_priority_filter = {
    let board = board.clone();
    Callback::from(
      move |filter: PriorityFilter| {
        board.dispatch(
          BoardAction::SetPriorityFilter(
            filter
          )
        );
      }
    )
  };

  let on_logout = {
    let session = session.clone();
    let board = board.clone();
    Callback::from(
      move |_: web_sys::MouseEvent| {
        if let Err(err) = sign_out(&session)
        {
          tracing::error!(error = %err, "logout failed to clear storage");
        }
        board.dispatch(BoardAction::Reset);
        if let Some(navigator) = &navigator
        {
          navigator.push(&Route::Login);
        }
      }
    )
  };

  let visible = board.0.visible();

  html! {
      <div class="app-shell">
          <nav class="topbar">
              <span class="brand">{ "Tally" }</span>
              <button class="btn danger" onclick={on_logout}>{ "Logout" }</button>
          </nav>
          <main class="board">
              <NewTaskForm on_add={on_add} />
              <TaskFilters
                  status={board.0.status_filter()}
                  priority={board.0.priority_filter()}
                  on_status={on_status_filter}
                  on_priority={on_priority_filter}
              />
              {
                  if let Some(message) = &*error {
                      html! { <div class="board-error">{ message.clone() }</div> }
                  } else {
                      html! {}
                  }
              }
              <ul class="task-list">
                  {
                      for visible.into_iter().map(|task| html! {
                          <TaskRow
                              key={task.id.clone()}
                              task={task.clone()}
                              editing={board.0.is_editing(&task.id)}
                              on_toggle_edit={on_toggle_edit.clone()}
                              on_commit_text={on_commit_text.clone()}
                              on_toggle_status={on_toggle_status.clone()}
                              on_priority={on_priority.clone()}
                              on_delete={on_delete.clone()}
                          />
                      })
                  }
              </ul>
          </main>
      </div>
  }
}
