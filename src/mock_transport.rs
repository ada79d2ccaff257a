// Test transport: canned responses keyed by method and path, plus a log of
// every request and the headers it carried. Compiled into test builds only.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::api::{ApiRequest, Method, RawResponse, RequestHeaders, Transport};
use crate::error::LinkError;

type Scripted = Result<RawResponse, String>;

/// A scripted in-memory [`Transport`] for exercising [`crate::api::LinkClient`]
/// without a network.
///
/// Responses are keyed by method and path. Requests for anything not
/// scripted fail with a transport error. Every request is recorded.
///
/// ```ignore
/// let mock = MockTransport::new();
/// mock.set_response(Method::Get, "/user", RawResponse::new(200, "{}"));
///
/// let client = LinkClient::new(mock, "token");
/// assert!(client.check_authorization());
/// assert_eq!(client.transport().call_count(Method::Get, "/user"), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<(Method, String), Scripted>>>,
    calls: Arc<Mutex<Vec<ApiRequest>>>,
    headers_seen: Arc<Mutex<Vec<RequestHeaders>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response returned for `method` + `path`.
    pub fn set_response(&self, method: Method, path: &str, response: RawResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(response));
    }

    /// Makes `method` + `path` fail as if the network call itself failed.
    pub fn set_error(&self, method: Method, path: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Err(message.to_string()));
    }

    /// Returns all requests made, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the path of every request made, in order.
    pub fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }

    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Returns the headers sent with each request, in order.
    pub fn headers_seen(&self) -> Vec<RequestHeaders> {
        self.headers_seen.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        headers: &RequestHeaders,
        request: &ApiRequest,
    ) -> Result<RawResponse, LinkError> {
        self.calls.lock().unwrap().push(request.clone());
        self.headers_seen.lock().unwrap().push(headers.clone());

        let key = (request.method, request.path.clone());
        match self.responses.lock().unwrap().get(&key) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(LinkError::Transport(message.clone())),
            None => Err(LinkError::Transport(format!(
                "no scripted response for {} {}",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LinkClient;

    #[test]
    fn test_unscripted_request_fails() {
        let mock = MockTransport::new();
        let headers = crate::api::prepare_headers("t");
        let err = mock.send(&headers, &ApiRequest::get("/nowhere")).unwrap_err();
        assert!(matches!(err, LinkError::Transport(_)));
        assert_eq!(mock.paths(), vec!["/nowhere"]);
    }

    #[test]
    fn test_client_sends_bearer_headers_on_every_call() {
        let mock = MockTransport::new();
        mock.set_response(Method::Get, "/user", RawResponse::new(200, "{}"));
        let client = LinkClient::new(mock, "abc123");

        assert!(client.check_authorization());
        let seen = client.transport().headers_seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].authorization, "Bearer abc123");
        assert_eq!(seen[0].content_type, "application/json");
    }
}
