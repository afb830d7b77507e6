//! Canned-response transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde::de::DeserializeOwned;

use crate::{GitlabError, GraphqlRequest, GraphqlTransport, decode_response};

/// Replays queued responses in order and records every request.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<String, u16>>>,
    requests: RefCell<Vec<GraphqlRequest>>,
}

impl FakeTransport {
    pub fn respond(self, body: serde_json::Value) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(serde_json::json!({ "data": body }).to_string()));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.responses.borrow_mut().push_back(Err(status));
        self
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl GraphqlTransport for FakeTransport {
    async fn execute<T: DeserializeOwned>(&self, request: &GraphqlRequest) -> Result<T, GitlabError> {
        self.requests.borrow_mut().push(request.clone());
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected request");
        match next {
            Ok(body) => decode_response(&body),
            Err(status) => Err(GitlabError::Status { status }),
        }
    }
}
