use std::rc::Rc;

use tally_shared::{
  BoardAction,
  Screen,
  TaskBoard,
  resolve_screen
};
use yew::{
  ContextProvider,
  Html,
  Reducible,
  function_component,
  html,
  use_context,
  use_state
};
use yew_router::prelude::{
  BrowserRouter,
  Redirect,
  Routable,
  Switch
};

use crate::components::{
  LoginView,
  MainView,
  SignupView
};
use crate::session::Session;

#[derive(
  Debug, Clone, Copy, PartialEq, Routable,
)]
pub enum Route {
  #[at("/")]
  Home,
  #[at("/login")]
  Login,
  #[at("/signup")]
  Signup,
  #[not_found]
  #[at("/404")]
  NotFound
}

impl Route {
  pub fn screen(self) -> Option<Screen> {
    match self {
      | Route::Home => Some(Screen::Main),
      | Route::Login => Some(Screen::Login),
      | Route::Signup => {
        Some(Screen::Signup)
      }
      | Route::NotFound => None
    }
  }
}

impl From<Screen> for Route {
  fn from(screen: Screen) -> Self {
    match screen {
      | Screen::Main => Route::Home,
      | Screen::Login => Route::Login,
      | Screen::Signup => Route::Signup
    }
  }
}

/// Reducer wrapper so views dispatch `BoardAction`s against the latest board.
#[derive(Debug, Default, PartialEq)]
pub struct BoardState(pub TaskBoard);

impl Reducible for BoardState {
  type Action = BoardAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut board = self.0.clone();
    board.apply(action);
    Rc::new(BoardState(board))
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let token = use_state(Session::load);
  let session = Session::new(token);

  html! {
      <ContextProvider<Session> context={session}>
          <BrowserRouter>
              <Switch<Route> render={switch} />
          </BrowserRouter>
      </ContextProvider<Session>>
  }
}

fn switch(route: Route) -> Html {
  tracing::debug!(?route, "routing");
  match route.screen() {
    | Some(Screen::Main) => {
      html! { <MainGate /> }
    }
    | Some(Screen::Login) => {
      html! { <LoginView /> }
    }
    | Some(Screen::Signup) => {
      html! { <SignupView /> }
    }
    | None => {
      html! { <Redirect<Route> to={Route::Home} /> }
    }
  }
}

#[function_component(MainGate)]
fn main_gate() -> Html {
  let Some(session) =
    use_context::<Session>()
  else {
    tracing::error!(
      "session context missing"
    );
    return html! {};
  };

  match resolve_screen(
    Screen::Main,
    &session
  ) {
    | Screen::Main => {
      html! { <MainView /> }
    }
    | _ => {
      html! { <Redirect<Route> to={Route::Login} /> }
    }
  }
}

#[cfg(test)]
mod tests {
  use tally_shared::{
    TaskDto,
    TaskPriority,
    TaskStatus
  };

  use super::*;

  #[test]
  fn routes_map_to_screens() {
    assert_eq!(
      Route::Home.screen(),
      Some(Screen::Main)
    );
    assert_eq!(
      Route::Login.screen(),
      Some(Screen::Login)
    );
    assert_eq!(
      Route::Signup.screen(),
      Some(Screen::Signup)
    );
    assert_eq!(Route::NotFound.screen(), None);
    assert_eq!(
      Route::recognize("/signup"),
      Some(Route::Signup)
    );
    for screen in [
      Screen::Main,
      Screen::Login,
      Screen::Signup
    ] {
      assert_eq!(
        Route::from(screen).screen(),
        Some(screen)
      );
    }
  }

  #[test]
  fn reducer_applies_actions_in_order() {
    let task = TaskDto {
      id:       "1".to_string(),
      text:     "Buy milk".to_string(),
      status:   TaskStatus::Pending,
      priority: TaskPriority::Medium
    };
    let state = Rc::new(
      BoardState::default()
    )
    .reduce(BoardAction::Created(
      task.clone()
    ))
    .reduce(BoardAction::Updated(
      TaskDto {
        status: TaskStatus::Completed,
        ..task
      }
    ));

    assert_eq!(
      state.0.next_status("1"),
      Some(TaskStatus::Pending)
    );
  }
}
