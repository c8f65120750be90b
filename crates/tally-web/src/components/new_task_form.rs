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
pub struct NewTaskFormProps {
  pub on_add: Callback<String>
}

#[function_component(NewTaskForm)]
pub fn new_task_form(
  props: &NewTaskFormProps
) -> Html {
  let draft = use_state(String::new);

  let on_input = {
    let draft = draft.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        draft.set(input.value());
      }
    )
  };

  let on_submit = {
    let draft = draft.clone();
    let on_add = props.on_add.clone();
    Callback::from(
      move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        let text = draft.trim().to_string();
        if text.is_empty() {
          return;
        }
        on_add.emit(text);
        draft.set(String::new());
      }
    )
  };

  html! {
      <form class="new-task" onsubmit={on_submit}>
          <input
              type="text"
              placeholder="Add a task"
              value={(*draft).clone()}
              oninput={on_input}
          />
          <button type="submit" class="btn">{ "Add" }</button>
      </form>
  }
}
