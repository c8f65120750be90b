use std::time::Duration;

use anyhow::Context;
use reqwest::header::{
  AUTHORIZATION,
  CONTENT_TYPE
};
use tally_shared::{
  ApiError,
  ApiMethod,
  ApiRequest,
  ApiResponse,
  ApiResult,
  Transport
};
use tracing::trace;

/// `Transport` over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client:   reqwest::Client,
  api_base: String
}

impl HttpTransport {
  pub fn new(
    api_base: &str,
    timeout: Duration
  ) -> anyhow::Result<Self> {
    let client =
      reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(
          "tally/",
          env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context(
          "failed building HTTP client"
        )?;

    Ok(Self {
      client,
      api_base: api_base.to_string()
    })
  }
}

impl Transport for HttpTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> ApiResult<ApiResponse> {
    let method = match request.method {
      | ApiMethod::Get => {
        reqwest::Method::GET
      }
      | ApiMethod::Post => {
        reqwest::Method::POST
      }
      | ApiMethod::Patch => {
        reqwest::Method::PATCH
      }
      | ApiMethod::Delete => {
        reqwest::Method::DELETE
      }
    };
    let url = request.url(&self.api_base);
    trace!(%url, method = %method, "http request");

    let mut builder =
      self.client.request(method, &url);
    if let Some(authorization) =
      request.authorization()
    {
      builder = builder
        .header(AUTHORIZATION, authorization);
    }
    if let Some(body) = &request.body {
      builder = builder
        .header(
          CONTENT_TYPE,
          "application/json"
        )
        .body(body.to_string());
    }

    let response =
      builder.send().await.map_err(
        |error| {
          ApiError::Transport(
            error.to_string()
          )
        }
      )?;
    let status = response.status().as_u16();
    let body =
      response.text().await.map_err(
        |error| {
          ApiError::Transport(
            error.to_string()
          )
        }
      )?;
    trace!(%url, status, "http response");

    Ok(ApiResponse::new(status, body))
  }
}
