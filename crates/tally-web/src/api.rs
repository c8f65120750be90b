use gloo::net::http::{
  Request,
  RequestBuilder
};
use tally_shared::{
  ApiError,
  ApiMethod,
  ApiRequest,
  ApiResponse,
  ApiResult,
  AuthClient,
  DEFAULT_API_BASE,
  TaskClient,
  Transport
};

/// Service base URL, fixed at build time through `TALLY_API_BASE`.
pub fn api_base() -> &'static str {
  option_env!("TALLY_API_BASE")
    .filter(|base| !base.is_empty())
    .unwrap_or(DEFAULT_API_BASE)
}

/// `Transport` over the browser's `fetch`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTransport {
  api_base: String
}

impl Default for FetchTransport {
  fn default() -> Self {
    Self {
      api_base: api_base().to_string()
    }
  }
}

impl Transport for FetchTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> ApiResult<ApiResponse> {
    let url = request.url(&self.api_base);
    let mut builder = match request.method
    {
      | ApiMethod::Get => Request::get(&url),
      | ApiMethod::Post => {
        Request::post(&url)
      }
      | ApiMethod::Patch => {
        Request::patch(&url)
      }
      | ApiMethod::Delete => {
        Request::delete(&url)
      }
    };
    if let Some(authorization) =
      request.authorization()
    {
      builder = builder.header(
        "Authorization",
        &authorization
      );
    }

    let response =
      send_with_body(builder, request.body)
        .await
        .map_err(|error| {
          ApiError::Transport(
            error.to_string()
          )
        })?;
    let status = response.status();
    let body =
      response.text().await.map_err(
        |error| {
          ApiError::Transport(
            error.to_string()
          )
        }
      )?;
    tracing::trace!(%url, status, "fetch completed");

    Ok(ApiResponse::new(status, body))
  }
}

async fn send_with_body(
  builder: RequestBuilder,
  body: Option<serde_json::Value>
) -> Result<
  gloo::net::http::Response,
  gloo::net::Error
> {
  match body {
    | Some(body) => {
      builder
        .header(
          "Content-Type",
          "application/json"
        )
        .body(body.to_string())?
        .send()
        .await
    }
    | None => builder.send().await
  }
}

pub fn auth_client()
-> AuthClient<FetchTransport> {
  AuthClient::new(
    FetchTransport::default()
  )
}

pub fn task_client(
  token: Option<String>
) -> ApiResult<TaskClient<FetchTransport>>
{
  TaskClient::new(
    FetchTransport::default(),
    token
  )
}
