use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ai::client::{ChatRequest, LlmGateway};
use crate::error::QuizError;

/// Scripted gateway for tests: replays canned responses in order and keeps
/// every request it saw.
#[derive(Debug, Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<Result<String, QuizError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockGateway {
    pub fn new(responses: Vec<Result<String, QuizError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl LlmGateway for MockGateway {
    async fn complete(&self, request: ChatRequest) -> Result<String, QuizError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(QuizError::EmptyResponse))
    }
}
