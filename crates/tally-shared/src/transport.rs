use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{
  ApiError,
  ApiResult
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ApiMethod {
  Get,
  Post,
  Patch,
  Delete
}

impl ApiMethod {
  pub fn as_str(self) -> &'static str {
    match self {
      | ApiMethod::Get => "GET",
      | ApiMethod::Post => "POST",
      | ApiMethod::Patch => "PATCH",
      | ApiMethod::Delete => "DELETE"
    }
  }
}

/// A transport-neutral description of one call against the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: ApiMethod,
  pub path:   String,
  pub bearer: Option<String>,
  pub body:   Option<serde_json::Value>
}

impl ApiRequest {
  pub fn new(
    method: ApiMethod,
    path: impl Into<String>
  ) -> Self {
    Self {
      method,
      path: path.into(),
      bearer: None,
      body: None
    }
  }

  pub fn bearer(
    mut self,
    token: &str
  ) -> Self {
    self.bearer = Some(token.to_string());
    self
  }

  pub fn json<B: Serialize>(
    mut self,
    body: &B
  ) -> ApiResult<Self> {
    let value = serde_json::to_value(body)
      .map_err(|error| {
        ApiError::Decode(format!(
          "failed to encode request \
           body: {error}"
        ))
      })?;
    self.body = Some(value);
    Ok(self)
  }

  /// Value for the `Authorization` header, when a token is attached.
  pub fn authorization(
    &self
  ) -> Option<String> {
    self
      .bearer
      .as_deref()
      .map(|token| format!("Bearer {token}"))
  }

  pub fn url(
    &self,
    base: &str
  ) -> String {
    format!(
      "{}{}",
      base.trim_end_matches('/'),
      self.path
    )
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub status: u16,
  pub body:   String
}

impl ApiResponse {
  pub fn new(
    status: u16,
    body: impl Into<String>
  ) -> Self {
    Self {
      status,
      body: body.into()
    }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  pub fn decode<T: DeserializeOwned>(
    &self
  ) -> ApiResult<T> {
    serde_json::from_str(&self.body)
      .map_err(|error| {
        ApiError::Decode(error.to_string())
      })
  }

  /// The `message` field of a JSON body, if any.
  pub fn message(
    &self
  ) -> Option<String> {
    serde_json::from_str::<
      serde_json::Value
    >(&self.body)
    .ok()
    .and_then(|value| {
      value
        .get("message")
        .and_then(|message| {
          message.as_str()
        })
        .map(str::to_string)
    })
  }

  /// Converts a non-2xx reply into `ApiError::Status`.
  pub fn error_for_status(
    self
  ) -> ApiResult<Self> {
    if self.is_success() {
      return Ok(self);
    }
    let message =
      self.message().unwrap_or_else(|| {
        self.body.trim().to_string()
      });
    Err(ApiError::Status {
      status: self.status,
      message
    })
  }
}

/// Sends one request and returns the raw reply.
///
/// The browser shell implements this over `fetch`, the CLI over `reqwest`.
pub trait Transport {
  fn send(
    &self,
    request: ApiRequest
  ) -> impl Future<
    Output = ApiResult<ApiResponse>
  >;
}

impl<T: Transport> Transport for &T {
  fn send(
    &self,
    request: ApiRequest
  ) -> impl Future<
    Output = ApiResult<ApiResponse>
  > {
    (**self).send(request)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn authorization_header_uses_bearer_scheme()
  {
    let request = ApiRequest::new(
      ApiMethod::Get,
      "/tasks"
    )
    .bearer("abc");
    assert_eq!(
      request.authorization().as_deref(),
      Some("Bearer abc")
    );
    assert_eq!(
      request
        .url("https://api.example/"),
      "https://api.example/tasks"
    );
  }

  #[test]
  fn error_for_status_prefers_json_message()
  {
    let error = ApiResponse::new(
      404,
      json!({ "message": "Task not found" })
        .to_string()
    )
    .error_for_status()
    .unwrap_err();
    assert_eq!(
      error,
      ApiError::Status {
        status:  404,
        message: "Task not found"
          .to_string()
      }
    );

    let error = ApiResponse::new(
      502,
      "Bad Gateway\n"
    )
    .error_for_status()
    .unwrap_err();
    assert_eq!(
      error.to_string(),
      "request failed with status 502: \
       Bad Gateway"
    );

    let error = ApiResponse::new(500, "  ")
      .error_for_status()
      .unwrap_err();
    assert_eq!(
      error.to_string(),
      "request failed with status 500"
    );
  }
}
