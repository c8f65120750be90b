use gloo::timers::future::TimeoutFuture;
use tally_shared::{
  Screen,
  after_success
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_state
};
use yew_router::prelude::{
  Link,
  use_navigator
};

use super::CredentialsForm;
use crate::api::auth_client;
use crate::app::Route;

const SIGNUP_SUCCESS_NOTICE: &str =
  "Registration successful! \
   Redirecting to login...";

#[function_component(SignupView)]
pub fn signup_view() -> Html {
  let navigator = use_navigator();
  let busy = use_state(|| false);
  let error = use_state(|| None::<String>);
  let success = use_state(|| false);

  let on_submit = {
    let busy = busy.clone();
    let error = error.clone();
    let success = success.clone();
    Callback::from(
      move |(username, password): (
        String,
        String
      )| {
        let navigator = navigator.clone();
        let busy = busy.clone();
        let error = error.clone();
        let success = success.clone();
        busy.set(true);
        error.set(None);
        success.set(false);

        wasm_bindgen_futures::spawn_local(
          async move {
            let result = auth_client()
              .signup(&username, &password)
              .await;
            busy.set(false);
            match result {
              | Ok(()) => {
                tracing::info!(%username, "registered");
                success.set(true);
                let (next, delay_ms) =
                  after_success(Screen::Signup);
                TimeoutFuture::new(delay_ms)
                  .await;
                if let Some(navigator) =
                  navigator
                {
                  navigator
                    .push(&Route::from(next));
                }
              }
              | Err(err) => {
                tracing::warn!(error = %err, "signup failed");
                error.set(Some(err.to_string()));
              }
            }
          }
        );
      }
    )
  };

  let notice = (*success).then(|| {
    SIGNUP_SUCCESS_NOTICE.to_string()
  });

  html! {
      <CredentialsForm
          title="Sign Up"
          submit_label="Sign Up"
          busy_label="Signing up..."
          busy={*busy}
          error={(*error).clone()}
          notice={notice}
          on_submit={on_submit}
      >
          <span>{ "Already have an account? " }</span>
          <Link<Route> to={Route::Login}>{ "Login" }</Link<Route>>
      </CredentialsForm>
  }
}
