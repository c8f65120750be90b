use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct CredentialsFormProps {
  pub title:        &'static str,
  pub submit_label: &'static str,
  pub busy_label:   &'static str,
  pub busy:         bool,
  #[prop_or_default]
  pub error:        Option<String>,
  #[prop_or_default]
  pub notice:       Option<String>,
  pub on_submit:
    Callback<(String, String)>,
  #[prop_or_default]
  pub children:     Html
}

/// Username/password card shared by the login and signup views.
#[function_component(CredentialsForm)]
pub fn credentials_form(
  props: &CredentialsFormProps
) -> Html {
  let username = use_state(String::new);
  let password = use_state(String::new);

  let on_username = {
    let username = username.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        username.set(input.value());
      }
    )
  };

  let on_password = {
    let password = password.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        password.set(input.value());
      }
    )
  };

  let on_submit = {
    let username = username.clone();
    let password = password.clone();
    let busy = props.busy;
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        if busy {
          return;
        }
        on_submit.emit((
          (*username).clone(),
          (*password).clone()
        ));
      }
    )
  };

  html! {
      <div class="auth-page">
          <div class="auth-card">
              <h2>{ props.title }</h2>
              {
                  if let Some(error) = &props.error {
                      html! { <div class="auth-error">{ error.clone() }</div> }
                  } else {
                      html! {}
                  }
              }
              {
                  if let Some(notice) = &props.notice {
                      html! { <div class="auth-notice">{ notice.clone() }</div> }
                  } else {
                      html! {}
                  }
              }
              <form onsubmit={on_submit}>
                  <input
                      type="text"
                      placeholder="Username"
                      value={(*username).clone()}
                      oninput={on_username}
                  />
                  <input
                      type="password"
                      placeholder="Password"
                      value={(*password).clone()}
                      oninput={on_password}
                  />
                  <button type="submit" class="btn" disabled={props.busy}>
                      { if props.busy { props.busy_label } else { props.submit_label } }
                  </button>
              </form>
              <div class="auth-footer">{ props.children.clone() }</div>
          </div>
      </div>
  }
}
