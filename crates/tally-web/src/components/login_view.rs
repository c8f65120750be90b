use tally_shared::{
  Screen,
  after_success,
  sign_in
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_context,
  use_state
};
use yew_router::prelude::{
  Link,
  use_navigator
};

use super::CredentialsForm;
use crate::api::auth_client;
use crate::app::Route;
use crate::session::Session;

#[function_component(LoginView)]
pub fn login_view() -> Html {
  let session = use_context::<Session>();
  let navigator = use_navigator();
  let busy = use_state(|| false);
  let error = use_state(|| None::<String>);

  let on_submit = {
    let busy = busy.clone();
    let error = error.clone();
    Callback::from(
      move |(username, password): (
        String,
        String
      )| {
        let Some(session) = session.clone()
        else {
          tracing::error!(
            "session context missing"
          );
          return;
        };
        let navigator = navigator.clone();
        let busy = busy.clone();
        let error = error.clone();
        busy.set(true);
        error.set(None);

        wasm_bindgen_futures::spawn_local(
          async move {
            let auth = auth_client();
            let result = sign_in(
              &auth,
              &session,
              &username,
              &password
            )
            .await;
            busy.set(false);
            match result {
              | Ok(_) => {
                tracing::info!(%username, "signed in");
                let (next, _) =
                  after_success(Screen::Login);
                if let Some(navigator) =
                  navigator
                {
                  navigator
                    .push(&Route::from(next));
                }
              }
              | Err(err) => {
                tracing::warn!(error = %err, "login failed");
                error.set(Some(err.to_string()));
              }
            }
          }
        );
      }
    )
  };

  html! {
      <CredentialsForm
          title="Login"
          submit_label="Login"
          busy_label="Logging in..."
          busy={*busy}
          error={(*error).clone()}
          on_submit={on_submit}
      >
          <span>{ "Don't have an account? " }</span>
          <Link<Route> to={Route::Signup}>{ "Signup" }</Link<Route>>
      </CredentialsForm>
  }
}
