//! In-process completion client for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionClient, CompletionParams, LlmError};

type Responder = dyn Fn(&str, CompletionParams) -> Result<Option<String>, LlmError> + Send + Sync;

/// Answers every prompt through a closure and records what it was asked.
pub struct FakeCompletionClient {
    responder: Box<Responder>,
    calls: Mutex<Vec<(String, CompletionParams)>>,
}

impl FakeCompletionClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, CompletionParams) -> Result<Option<String>, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the same text to every prompt.
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(Some(text.clone())))
    }

    /// Fails every call as if the endpoint returned a 500.
    pub fn failing() -> Self {
        Self::new(|_, _| {
            Err(LlmError::Api {
                status: 500,
                message: "upstream unavailable".to_string(),
            })
        })
    }

    pub fn calls(&self) -> Vec<(String, CompletionParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Option<String>, LlmError> {
        self.calls.lock().unwrap().push((prompt.to_string(), params));
        (self.responder)(prompt, params)
    }
}
