use crate::session::SessionStore;

/// Delay between a successful signup and the redirect to login.
pub const SIGNUP_REDIRECT_DELAY_MS: u32 =
  1_500;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Screen {
  Login,
  Signup,
  Main
}

/// The screen actually shown for `requested`; main needs a session.
pub fn resolve_screen<S>(
  requested: Screen,
  session: &S
) -> Screen
where
  S: SessionStore + ?Sized
{
  match requested {
    | Screen::Main
      if !session.is_signed_in() =>
    {
      Screen::Login
    }
    | other => other
  }
}

/// Where a successful submit on `screen` leads, and the delay in
/// milliseconds before going there.
pub fn after_success(
  screen: Screen
) -> (Screen, u32) {
  match screen {
    | Screen::Login => (Screen::Main, 0),
    | Screen::Signup => {
      (
        Screen::Login,
        SIGNUP_REDIRECT_DELAY_MS
      )
    }
    | Screen::Main => (Screen::Main, 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::session::MemorySessionStore;

  #[test]
  fn main_redirects_to_login_without_token()
  {
    let store = MemorySessionStore::new();
    assert_eq!(
      resolve_screen(Screen::Main, &store),
      Screen::Login
    );
    assert_eq!(
      resolve_screen(Screen::Signup, &store),
      Screen::Signup
    );

    store.set("abc").unwrap();
    assert_eq!(
      resolve_screen(Screen::Main, &store),
      Screen::Main
    );
    assert_eq!(
      resolve_screen(Screen::Login, &store),
      Screen::Login
    );
  }

  #[test]
  fn signup_waits_before_going_to_login() {
    assert_eq!(
      after_success(Screen::Signup),
      (Screen::Login, 1_500)
    );
    assert_eq!(
      after_success(Screen::Login),
      (Screen::Main, 0)
    );
  }
}
