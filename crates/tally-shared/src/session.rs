use std::cell::RefCell;

use tracing::info;

use crate::auth::AuthClient;
use crate::error::ApiResult;
use crate::transport::Transport;

/// Durable holder of the bearer token.
///
/// Nothing here validates the token; an expired one is only noticed when a
/// task call is refused.
pub trait SessionStore {
  /// The stored token. An empty stored value counts as absent.
  fn get(&self) -> Option<String>;

  fn set(
    &self,
    token: &str
  ) -> ApiResult<()>;

  fn clear(&self) -> ApiResult<()>;

  fn is_signed_in(&self) -> bool {
    self.get().is_some()
  }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
  token: RefCell<Option<String>>
}

impl MemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_token(token: &str) -> Self {
    Self {
      token: RefCell::new(Some(
        token.to_string()
      ))
    }
  }
}

impl SessionStore for MemorySessionStore {
  fn get(&self) -> Option<String> {
    self
      .token
      .borrow()
      .clone()
      .filter(|token| !token.is_empty())
  }

  fn set(
    &self,
    token: &str
  ) -> ApiResult<()> {
    *self.token.borrow_mut() =
      Some(token.to_string());
    Ok(())
  }

  fn clear(&self) -> ApiResult<()> {
    *self.token.borrow_mut() = None;
    Ok(())
  }
}

/// Logs in and persists the token on success. A rejected login leaves the
/// store untouched.
pub async fn sign_in<T, S>(
  auth: &AuthClient<T>,
  store: &S,
  username: &str,
  password: &str
) -> ApiResult<String>
where
  T: Transport,
  S: SessionStore + ?Sized
{
  let token =
    auth.login(username, password).await?;
  store.set(&token)?;
  info!("session token stored");
  Ok(token)
}

/// Drops the stored token.
pub fn sign_out<S>(
  store: &S
) -> ApiResult<()>
where
  S: SessionStore + ?Sized
{
  store.clear()?;
  info!("session cleared");
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::testing::ScriptedTransport;

  #[tokio::test]
  async fn successful_login_stores_token()
  {
    let transport =
      ScriptedTransport::new();
    transport.reply_json(
      200,
      json!({ "token": "abc" })
    );
    let auth = AuthClient::new(&transport);
    let store = MemorySessionStore::new();

    sign_in(&auth, &store, "alice", "pw")
      .await
      .unwrap();
    assert_eq!(
      store.get().as_deref(),
      Some("abc")
    );
  }

  #[tokio::test]
  async fn rejected_login_leaves_store_empty()
  {
    let transport =
      ScriptedTransport::new();
    transport.reply_json(
      401,
      json!({ "message": "Invalid" })
    );
    let auth = AuthClient::new(&transport);
    let store = MemorySessionStore::new();

    let error = sign_in(
      &auth, &store, "alice", "bad"
    )
    .await
    .unwrap_err();
    assert_eq!(error.to_string(), "Invalid");
    assert!(!store.is_signed_in());
  }

  #[test]
  fn empty_token_reads_as_signed_out() {
    let store =
      MemorySessionStore::with_token("");
    assert_eq!(store.get(), None);

    store.set("xyz").unwrap();
    assert!(store.is_signed_in());
    sign_out(&store).unwrap();
    assert_eq!(store.get(), None);
  }
}
