//! 单元测试用的假传输层

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::requests::BackendRequest;
use super::transport::Transport;
use crate::errors::Result;

type Handler = Box<dyn Fn(&BackendRequest) -> Result<serde_json::Value> + Send + Sync>;

/// 由闭包决定每个请求的结果，并按顺序记录收到的请求
pub struct FakeTransport {
    handler: Handler,
    seen: Mutex<Vec<BackendRequest>>,
}

impl FakeTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&BackendRequest) -> Result<serde_json::Value> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<BackendRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.seen().iter().map(BackendRequest::operation).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &BackendRequest) -> Result<serde_json::Value> {
        self.seen.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}
