//! A scripted in-memory `Transport` for tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;

use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Replays queued replies in order and records every request it receives.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<ApiResult<ApiResponse>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn reply_json(&self, status: u16, body: serde_json::Value) {
        self.reply(status, &body.to_string());
    }

    pub fn fail(&self, reason: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(ApiError::Transport(reason.to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = ApiResult<ApiResponse>> {
        self.requests.borrow_mut().push(request.clone());
        let reply = self.replies.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(ApiError::Transport(format!(
                "no scripted reply for {} {}",
                request.method.as_str(),
                request.path
            )))
        });
        std::future::ready(reply)
    }
}
