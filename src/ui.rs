// UI layer: the command-line surface. Parses the single positional
// argument, loads configuration, and runs the request chain behind a
// spinner on stderr so stdout only ever carries the result.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::{HttpTransport, LinkClient, LookupPolicy};
use crate::config::Config;
use crate::error::LinkError;

#[derive(Parser, Debug)]
#[command(
    name = "bitlink",
    version,
    about = "Shorten a URL with bitly, or show the total clicks of an existing bitlink"
)]
pub struct Cli {
    /// Url to shorten or shortened url to get summary.
    pub url: String,

    /// Override the bitly API base URL (also read from BITLY_API_URL).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Only shorten when bitly rejects the input as unknown; surface
    /// network and parse failures of the lookup instead.
    #[arg(long)]
    pub strict_lookup: bool,

    /// Log every request to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        if self.strict_lookup {
            LookupPolicy::NotFoundOnly
        } else {
            LookupPolicy::AnyFailure
        }
    }
}

/// Load configuration and run the shorten-or-summarize chain for `cli.url`.
/// Credentials are checked before any network call is made.
pub fn run(cli: &Cli) -> Result<String, LinkError> {
    let mut config = Config::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_base_url(api_url);
    }
    tracing::debug!(api = %config.api_base_url, "configuration loaded");

    let transport = HttpTransport::new(config.api_base_url.clone())?;
    let client = LinkClient::new(transport, &config.token).with_policy(cli.lookup_policy());

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Talking to bitly...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.dispatch(&cli.url);
    spinner.finish_and_clear();
    result
}
