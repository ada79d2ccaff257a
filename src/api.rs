// API client module: a small blocking client for the bitly v4 API. The
// request chain is strictly sequential and every call is attempted once.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::LinkError;

/// Raw metadata record returned by the bitlink lookup.
pub type BitlinkInfo = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One outbound call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        ApiRequest {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        ApiRequest {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Status and undecoded body of a completed call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two headers sent with every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    pub authorization: String,
    pub content_type: String,
}

/// Build the bearer-token headers for `token`. Pure and total.
pub fn prepare_headers(token: &str) -> RequestHeaders {
    RequestHeaders {
        authorization: format!("Bearer {}", token),
        content_type: "application/json".to_string(),
    }
}

/// Strip surrounding `/` and a leading `http://` so the bitlink can be used
/// as a path segment.
pub fn normalize_bitlink(input: &str) -> &str {
    let trimmed = input.trim_matches('/');
    trimmed.strip_prefix("http://").unwrap_or(trimmed)
}

/// Seam between the request logic and the wire.
pub trait Transport {
    fn send(
        &self,
        headers: &RequestHeaders,
        request: &ApiRequest,
    ) -> Result<RawResponse, LinkError>;
}

/// reqwest-backed transport. No timeouts and no retries are configured.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LinkError> {
        let client = Client::builder().timeout(None).build()?;
        Ok(HttpTransport {
            client,
            base_url: base_url.into(),
        })
    }

    fn header_map(headers: &RequestHeaders) -> Result<HeaderMap, LinkError> {
        let mut map = HeaderMap::new();
        let auth = HeaderValue::from_str(&headers.authorization)
            .map_err(|e| LinkError::Transport(format!("invalid authorization header: {}", e)))?;
        let content_type = HeaderValue::from_str(&headers.content_type)
            .map_err(|e| LinkError::Transport(format!("invalid content-type header: {}", e)))?;
        map.insert(AUTHORIZATION, auth);
        map.insert(CONTENT_TYPE, content_type);
        Ok(map)
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        headers: &RequestHeaders,
        request: &ApiRequest,
    ) -> Result<RawResponse, LinkError> {
        let url = format!("{}{}", &self.base_url, &request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder.headers(Self::header_map(headers)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| LinkError::Transport(format!("cannot encode request body: {}", e)))?;
            builder = builder.body(bytes);
        }

        let res = builder.send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(RawResponse { status, body })
    }
}

/// How a failed bitlink lookup is interpreted by [`LinkClient::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// Any lookup failure means the input is a long URL.
    #[default]
    AnyFailure,
    /// Only a not-found rejection means the input is a long URL; every
    /// other failure is returned to the caller.
    NotFoundOnly,
}

impl LookupPolicy {
    fn routes_to_shorten(&self, err: &LinkError) -> bool {
        match self {
            LookupPolicy::AnyFailure => true,
            LookupPolicy::NotFoundOnly => err.is_not_found(),
        }
    }
}

#[derive(Deserialize)]
struct ShortenResponse {
    link: String,
}

#[derive(Deserialize)]
struct ClickSummaryResponse {
    total_clicks: u64,
}

/// Client for the four bitly operations plus the shorten-or-summarize
/// decision. Headers are prepared once from the token at construction.
pub struct LinkClient<T: Transport> {
    transport: T,
    headers: RequestHeaders,
    policy: LookupPolicy,
}

impl<T: Transport> LinkClient<T> {
    pub fn new(transport: T, token: &str) -> Self {
        LinkClient {
            transport,
            headers: prepare_headers(token),
            policy: LookupPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: ApiRequest) -> Result<RawResponse, LinkError> {
        tracing::debug!(method = request.method.as_str(), path = %request.path, "calling bitly");
        let response = self.transport.send(&self.headers, &request)?;
        tracing::debug!(status = response.status, path = %request.path, "bitly responded");
        Ok(response)
    }

    /// GET /user. Any non-2xx status or network failure yields `false`.
    pub fn check_authorization(&self) -> bool {
        match self.send(ApiRequest::get("/user")) {
            Ok(response) => response.is_success(),
            Err(err) => {
                tracing::debug!(error = %err, "authorization check failed");
                false
            }
        }
    }

    /// POST /shorten and format the generated link.
    pub fn shorten_link(&self, long_url: &str) -> Result<String, LinkError> {
        let request = ApiRequest::post("/shorten", json!({ "long_url": long_url }));
        let parsed: ShortenResponse = decode(self.send(request)?)?;
        Ok(format!("Link has been generated: {}", parsed.link))
    }

    /// GET /bitlinks/{id}. Returns the whole metadata record.
    pub fn bitlink_info(&self, bitlink: &str) -> Result<BitlinkInfo, LinkError> {
        let path = format!("/bitlinks/{}", normalize_bitlink(bitlink));
        read_json(self.send(ApiRequest::get(path))?)
    }

    /// GET /bitlinks/{id}/clicks/summary over all recorded days.
    pub fn click_summary(&self, bitlink: &str) -> Result<String, LinkError> {
        let path = format!("/bitlinks/{}/clicks/summary", normalize_bitlink(bitlink));
        let request = ApiRequest::get(path)
            .with_query("units", -1)
            .with_query("unit", "day");
        let parsed: ClickSummaryResponse = decode(self.send(request)?)?;
        Ok(format!(
            "Bitly link clicks total summary : {}",
            parsed.total_clicks
        ))
    }

    /// Shorten `input` or summarize its clicks, depending on whether bitly
    /// knows it as a bitlink. Fails fast on bad credentials.
    pub fn dispatch(&self, input: &str) -> Result<String, LinkError> {
        if !self.check_authorization() {
            return Err(LinkError::AuthorizationFailed);
        }

        match self.bitlink_info(input) {
            Ok(_) => {
                let bitlink = normalize_bitlink(input);
                tracing::info!(bitlink, "existing bitlink, fetching clicks");
                self.click_summary(input)
            }
            Err(err) if self.policy.routes_to_shorten(&err) => {
                tracing::info!(reason = %err, "not a known bitlink, shortening");
                self.shorten_link(input)
            }
            Err(err) => Err(err),
        }
    }
}

/// Parse the body as JSON, then turn a non-2xx status into a `RemoteApi`
/// error built from the body's `message` and `description`.
fn read_json(response: RawResponse) -> Result<Value, LinkError> {
    let value: Value = serde_json::from_str(&response.body)?;
    if !response.is_success() {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        return Err(LinkError::RemoteApi {
            status: response.status,
            message: field("message"),
            description: field("description"),
        });
    }
    Ok(value)
}

/// A 2xx body that lacks the field we need is reported separately from a
/// body that is not JSON at all.
fn decode<D: DeserializeOwned>(response: RawResponse) -> Result<D, LinkError> {
    let value = read_json(response)?;
    serde_json::from_value(value).map_err(|e| LinkError::UnexpectedBody(e.to_string()))
}
