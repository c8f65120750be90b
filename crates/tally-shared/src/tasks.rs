use tracing::{
  debug,
  warn
};

use crate::error::{
  ApiError,
  ApiResult
};
use crate::model::{
  PriorityPatch,
  StatusPatch,
  TaskCreate,
  TaskDto,
  TaskListReply,
  TaskPriority,
  TaskStatus,
  TextPatch
};
use crate::transport::{
  ApiMethod,
  ApiRequest,
  ApiResponse,
  Transport
};

/// CRUD calls against `/tasks`, scoped by one bearer token.
#[derive(Debug, Clone)]
pub struct TaskClient<T> {
  transport: T,
  token:     String
}

impl<T: Transport> TaskClient<T> {
  /// Fails with `MissingToken` when the session holds no token.
  pub fn new(
    transport: T,
    token: Option<String>
  ) -> ApiResult<Self> {
    let token = token
      .filter(|token| !token.is_empty())
      .ok_or(ApiError::MissingToken)?;
    Ok(Self {
      transport,
      token
    })
  }

  async fn call(
    &self,
    request: ApiRequest
  ) -> ApiResult<ApiResponse> {
    let request =
      request.bearer(&self.token);
    let method = request.method;
    let path = request.path.clone();
    debug!(
      method = method.as_str(),
      %path,
      "sending task request"
    );

    let response = self
      .transport
      .send(request)
      .await
      .and_then(|response| {
        response.error_for_status()
      });
    if let Err(error) = &response {
      warn!(
        method = method.as_str(),
        %path,
        %error,
        "task request failed"
      );
    }
    response
  }

  #[tracing::instrument(skip(self))]
  pub async fn list(
    &self
  ) -> ApiResult<Vec<TaskDto>> {
    let response = self
      .call(ApiRequest::new(
        ApiMethod::Get,
        "/tasks"
      ))
      .await?;
    let tasks = response
      .decode::<TaskListReply>()?
      .into_tasks();
    debug!(
      count = tasks.len(),
      "loaded tasks"
    );
    Ok(tasks)
  }

  /// Creates a task; status and priority are fixed to pending/medium.
  #[tracing::instrument(skip(self))]
  pub async fn create(
    &self,
    text: &str
  ) -> ApiResult<TaskDto> {
    let request = ApiRequest::new(
      ApiMethod::Post,
      "/tasks"
    )
    .json(&TaskCreate::new(text))?;
    self.call(request).await?.decode()
  }

  #[tracing::instrument(skip(self))]
  pub async fn remove(
    &self,
    id: &str
  ) -> ApiResult<()> {
    self
      .call(ApiRequest::new(
        ApiMethod::Delete,
        format!("/tasks/{id}")
      ))
      .await
      .map(|_| ())
  }

  #[tracing::instrument(skip(self))]
  pub async fn set_status(
    &self,
    id: &str,
    status: TaskStatus
  ) -> ApiResult<TaskDto> {
    let request = ApiRequest::new(
      ApiMethod::Patch,
      format!("/tasks/{id}/status")
    )
    .json(&StatusPatch {
      status
    })?;
    self.call(request).await?.decode()
  }

  #[tracing::instrument(skip(self))]
  pub async fn set_priority(
    &self,
    id: &str,
    priority: TaskPriority
  ) -> ApiResult<TaskDto> {
    let request = ApiRequest::new(
      ApiMethod::Patch,
      format!("/tasks/{id}/priority")
    )
    .json(&PriorityPatch {
      priority
    })?;
    self.call(request).await?.decode()
  }

  #[tracing::instrument(skip(
    self, text
  ))]
  pub async fn set_text(
    &self,
    id: &str,
    text: &str
  ) -> ApiResult<TaskDto> {
    let request = ApiRequest::new(
      ApiMethod::Patch,
      format!("/tasks/{id}")
    )
    .json(&TextPatch {
      text: text.to_string()
    })?;
    self.call(request).await?.decode()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::testing::ScriptedTransport;

  fn row(
    id: &str,
    status: &str,
    priority: &str
  ) -> serde_json::Value {
    json!({
      "_id": id,
      "text": format!("task {id}"),
      "status": status,
      "priority": priority
    })
  }

  #[test]
  fn missing_or_empty_token_is_refused()
  {
    let transport =
      ScriptedTransport::new();
    assert_eq!(
      TaskClient::new(&transport, None)
        .unwrap_err(),
      ApiError::MissingToken
    );
    assert_eq!(
      TaskClient::new(
        &transport,
        Some(String::new())
      )
      .unwrap_err(),
      ApiError::MissingToken
    );
  }

  #[tokio::test]
  async fn list_sends_bearer_and_unwraps_envelope()
  {
    let transport =
      ScriptedTransport::new();
    transport.reply_json(
      200,
      json!({ "tasks": [row("1", "pending", "low")] })
    );
    let client = TaskClient::new(
      &transport,
      Some("abc".to_string())
    )
    .unwrap();

    let tasks =
      client.list().await.unwrap();
    assert_eq!(tasks.len(), 1);

    let sent = transport.requests();
    assert_eq!(sent[0].method, ApiMethod::Get);
    assert_eq!(sent[0].path, "/tasks");
    assert_eq!(
      sent[0].authorization().as_deref(),
      Some("Bearer abc")
    );
  }

  #[tokio::test]
  async fn create_always_sends_pending_medium()
  {
    let transport =
      ScriptedTransport::new();
    transport.reply_json(
      201,
      row("9", "pending", "medium")
    );
    let client = TaskClient::new(
      &transport,
      Some("abc".to_string())
    )
    .unwrap();

    let task = client
      .create("Buy milk")
      .await
      .unwrap();
    assert_eq!(task.id, "9");
    assert_eq!(
      transport.requests()[0].body,
      Some(json!({
        "text": "Buy milk",
        "status": "pending",
        "priority": "medium"
      }))
    );
  }

  #[tokio::test]
  async fn patch_routes_match_the_service()
  {
    let transport =
      ScriptedTransport::new();
    transport.reply_json(
      200,
      row("7", "completed", "low")
    );
    transport.reply_json(
      200,
      row("7", "completed", "high")
    );
    transport.reply_json(
      200,
      row("7", "completed", "high")
    );
    transport.reply(200, "");
    let client = TaskClient::new(
      &transport,
      Some("abc".to_string())
    )
    .unwrap();

    client
      .set_status(
        "7",
        TaskStatus::Completed
      )
      .await
      .unwrap();
    client
      .set_priority(
        "7",
        TaskPriority::High
      )
      .await
      .unwrap();
    client
      .set_text("7", "renamed")
      .await
      .unwrap();
    client.remove("7").await.unwrap();

    let sent = transport.requests();
    let routes: Vec<_> = sent
      .iter()
      .map(|request| {
        (
          request.method,
          request.path.as_str()
        )
      })
      .collect();
    assert_eq!(
      routes,
      vec![
        (
          ApiMethod::Patch,
          "/tasks/7/status"
        ),
        (
          ApiMethod::Patch,
          "/tasks/7/priority"
        ),
        (ApiMethod::Patch, "/tasks/7"),
        (ApiMethod::Delete, "/tasks/7"),
      ]
    );
    assert_eq!(
      sent[0].body,
      Some(json!({ "status": "completed" }))
    );
    assert_eq!(
      sent[1].body,
      Some(json!({ "priority": "high" }))
    );
    assert_eq!(
      sent[2].body,
      Some(json!({ "text": "renamed" }))
    );
    assert_eq!(sent[3].body, None);
  }

  #[tokio::test]
  async fn failures_are_explicit_errors()
  {
    let transport =
      ScriptedTransport::new();
    transport.reply_json(
      401,
      json!({ "message": "Invalid token" })
    );
    transport
      .reply_json(200, json!({ "ok": 1 }));
    transport.fail("connection reset");
    let client = TaskClient::new(
      &transport,
      Some("stale".to_string())
    )
    .unwrap();

    let error =
      client.list().await.unwrap_err();
    assert!(error.is_unauthorized());

    let error = client
      .set_priority(
        "1",
        TaskPriority::Low
      )
      .await
      .unwrap_err();
    assert!(matches!(
      error,
      ApiError::Decode(_)
    ));

    let error = client
      .remove("1")
      .await
      .unwrap_err();
    assert_eq!(
      error,
      ApiError::Transport(
        "connection reset".to_string()
      )
    );
  }
}
