//! In-memory [`Transport`] that replays queued replies and records every call.

use crate::error::ClientError;
use crate::transport::Transport;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MockReply {
    Body(String),
    Status(u16, String),
    Unreachable(String),
}

#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reply_json(self, value: &serde_json::Value) -> Self {
        self.push(MockReply::Body(value.to_string()))
    }

    #[must_use]
    pub fn reply_raw(self, body: impl Into<String>) -> Self {
        self.push(MockReply::Body(body.into()))
    }

    #[must_use]
    pub fn reply_status(self, status: u16, body: impl Into<String>) -> Self {
        self.push(MockReply::Status(status, body.into()))
    }

    #[must_use]
    pub fn reply_unreachable(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Unreachable(message.into()))
    }

    fn push(self, reply: MockReply) -> Self {
        locked(&self.replies).push_back(reply);
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        locked(&self.calls).clone()
    }

    fn exchange(
        &self,
        method: &'static str,
        url: &str,
        body: Option<String>,
    ) -> Result<Vec<u8>, ClientError> {
        locked(&self.calls).push(RecordedCall { method, url: url.to_string(), body });

        let reply = locked(&self.replies).pop_front();
        match reply {
            Some(MockReply::Body(body)) => Ok(body.into_bytes()),
            Some(MockReply::Status(status, body)) => {
                Err(ClientError::Status { status, url: url.to_string(), body })
            }
            Some(MockReply::Unreachable(message)) => {
                Err(ClientError::Request { url: url.to_string(), message })
            }
            None => Err(ClientError::Request {
                url: url.to_string(),
                message: "no reply queued".to_string(),
            }),
        }
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        self.exchange("GET", url, None)
    }

    async fn post_json(&self, url: &str, body: String) -> Result<Vec<u8>, ClientError> {
        self.exchange("POST", url, Some(body))
    }
}
