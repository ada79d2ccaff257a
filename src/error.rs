// Error taxonomy shared by the config loader, the API client and the CLI.
// Every variant is terminal for the invocation except a rejected bitlink
// lookup, which the dispatcher reads as "this is a long URL".

use thiserror::Error;

/// Placeholder rendered for an error field the remote did not send.
const MISSING_FIELD: &str = "None";

const MISSING_CREDENTIALS: &str = "
    Bitly auth token is not found.
    Please check auth_bitly_token environmental variable is exists.
";

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("{}", MISSING_CREDENTIALS)]
    MissingCredentials,

    #[error("Wrong credentials")]
    AuthorizationFailed,

    #[error("Request to bitly failed: {0}")]
    Transport(String),

    #[error("Cannot parse response from bitly: {0}")]
    ResponseParse(String),

    #[error("Unexpected success response from bitly: {0}")]
    UnexpectedBody(String),

    #[error(
        "Error message: {}, error description: {}",
        .message.as_deref().unwrap_or(MISSING_FIELD),
        .description.as_deref().unwrap_or(MISSING_FIELD)
    )]
    RemoteApi {
        status: u16,
        message: Option<String>,
        description: Option<String>,
    },
}

impl LinkError {
    /// True when a bitlink lookup was rejected because the input is not one
    /// of the account's links: 404, or 403 for inputs on a foreign domain.
    /// Auth, rate-limit and validation errors do not count.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LinkError::RemoteApi { status: 403 | 404, .. })
    }
}

impl From<reqwest::Error> for LinkError {
    fn from(err: reqwest::Error) -> Self {
        LinkError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::ResponseParse(err.to_string())
    }
}
