use tracing::{
  debug,
  info,
  warn
};

use crate::error::{
  ApiError,
  ApiResult
};
use crate::model::{
  AuthReply,
  Credentials
};
use crate::transport::{
  ApiMethod,
  ApiRequest,
  Transport
};

/// Acknowledgment `/register` sends on success.
pub const SIGNUP_ACK: &str =
  "User registered";
pub const LOGIN_FALLBACK_MESSAGE: &str =
  "Login failed";
pub const SIGNUP_FALLBACK_MESSAGE: &str =
  "Signup failed";

#[derive(Debug, Clone)]
pub struct AuthClient<T> {
  transport: T
}

impl<T: Transport> AuthClient<T> {
  pub fn new(transport: T) -> Self {
    Self {
      transport
    }
  }

  /// Exchanges credentials for a bearer token.
  #[tracing::instrument(skip(
    self, password
  ))]
  pub async fn login(
    &self,
    username: &str,
    password: &str
  ) -> ApiResult<String> {
    let request = ApiRequest::new(
      ApiMethod::Post,
      "/login"
    )
    .json(&Credentials {
      username: username.to_string(),
      password: password.to_string()
    })?;

    let response =
      self.transport.send(request).await?;
    debug!(
      status = response.status,
      "login replied"
    );
    let reply = response
      .decode::<AuthReply>()
      .unwrap_or_default();

    match reply.token {
      | Some(token)
        if !token.is_empty() =>
      {
        info!(
          username,
          "login succeeded"
        );
        Ok(token)
      }
      | _ => {
        let message = reply
          .message
          .filter(|message| {
            !message.is_empty()
          })
          .unwrap_or_else(|| {
            LOGIN_FALLBACK_MESSAGE
              .to_string()
          });
        warn!(
          username,
          %message,
          "login rejected"
        );
        Err(ApiError::Rejected(message))
      }
    }
  }

  /// Registers a new account. Only the exact acknowledgment counts as success.
  #[tracing::instrument(skip(
    self, password
  ))]
  pub async fn signup(
    &self,
    username: &str,
    password: &str
  ) -> ApiResult<()> {
    let request = ApiRequest::new(
      ApiMethod::Post,
      "/register"
    )
    .json(&Credentials {
      username: username.to_string(),
      password: password.to_string()
    })?;

    let response =
      self.transport.send(request).await?;
    debug!(
      status = response.status,
      "register replied"
    );
    let reply = response
      .decode::<AuthReply>()
      .unwrap_or_default();

    match reply.message {
      | Some(message)
        if message == SIGNUP_ACK =>
      {
        info!(
          username,
          "registration accepted"
        );
        Ok(())
      }
      | other => {
        let message = other
          .filter(|message| {
            !message.is_empty()
          })
          .unwrap_or_else(|| {
            SIGNUP_FALLBACK_MESSAGE
              .to_string()
          });
        warn!(
          username,
          %message,
          "registration rejected"
        );
        Err(ApiError::Rejected(message))
      }
    }
  }
}
