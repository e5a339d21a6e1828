use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::transport::{ReportTransport, TransportResponse};

type Reply = Result<TransportResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Transport replaying queued replies; gated replies wait for the test to release them.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<(String, Option<Value>)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, reply: Reply) {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Scripted::Ready(reply));
    }

    pub(crate) fn gate(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<(String, Option<Value>)> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    async fn next(&self, path: &str, payload: Option<Value>) -> Reply {
        self.requests
            .lock()
            .expect("requests lock")
            .push((path.to_string(), payload));
        let scripted = self.replies.lock().expect("replies lock").pop_front();
        match scripted {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Request("gate dropped".to_string()))),
            None => Err(TransportError::Request(format!("no scripted reply for {path}"))),
        }
    }
}

#[async_trait]
impl ReportTransport for ScriptedTransport {
    async fn post_json(&self, path: &str, payload: &Value) -> Reply {
        self.next(path, Some(payload.clone())).await
    }

    async fn get(&self, path_and_query: &str) -> Reply {
        self.next(path_and_query, None).await
    }
}

pub(crate) fn report_ok(report: &str, file_path: &str) -> Reply {
    Ok(TransportResponse::new(
        200,
        json!({ "report": report, "file_path": file_path }).to_string(),
    ))
}

pub(crate) fn service_error(status: u16, body: Value) -> Reply {
    Ok(TransportResponse::new(status, body.to_string()))
}
