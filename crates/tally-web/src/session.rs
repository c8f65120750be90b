use tally_shared::{
  ApiError,
  ApiResult,
  SessionStore
};
use yew::UseStateHandle;

pub const TOKEN_STORAGE_KEY: &str =
  "token";

fn local_storage()
-> Option<web_sys::Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

/// Token persisted in `localStorage` under `token`, as a raw string.
#[derive(
  Debug, Clone, Copy, Default, PartialEq,
)]
pub struct BrowserSessionStore;

impl SessionStore for BrowserSessionStore {
  fn get(&self) -> Option<String> {
    local_storage()
      .and_then(|storage| {
        storage
          .get_item(TOKEN_STORAGE_KEY)
          .ok()
          .flatten()
      })
      .filter(|token| !token.is_empty())
  }

  fn set(
    &self,
    token: &str
  ) -> ApiResult<()> {
    let storage =
      local_storage().ok_or_else(|| {
        ApiError::Storage(
          "local storage unavailable"
            .to_string()
        )
      })?;
    storage
      .set_item(TOKEN_STORAGE_KEY, token)
      .map_err(|error| {
        ApiError::Storage(format!(
          "failed writing token: \
           {error:?}"
        ))
      })
  }

  fn clear(&self) -> ApiResult<()> {
    if let Some(storage) = local_storage()
    {
      storage
        .remove_item(TOKEN_STORAGE_KEY)
        .map_err(|error| {
          ApiError::Storage(format!(
            "failed removing token: \
             {error:?}"
          ))
        })?;
    }
    Ok(())
  }
}

/// Session shared through context: the durable store plus a state handle
/// so views re-render when the token changes.
#[derive(Clone, PartialEq)]
pub struct Session {
  token: UseStateHandle<Option<String>>,
  store: BrowserSessionStore
}

impl Session {
  pub fn new(
    token: UseStateHandle<Option<String>>
  ) -> Self {
    Self {
      token,
      store: BrowserSessionStore
    }
  }

  pub fn load() -> Option<String> {
    BrowserSessionStore.get()
  }
}

impl SessionStore for Session {
  fn get(&self) -> Option<String> {
    (*self.token)
      .clone()
      .filter(|token| !token.is_empty())
  }

  fn set(
    &self,
    token: &str
  ) -> ApiResult<()> {
    self.store.set(token)?;
    self.token.set(Some(token.to_string()));
    Ok(())
  }

  fn clear(&self) -> ApiResult<()> {
    let cleared = self.store.clear();
    self.token.set(None);
    cleared
  }
}
