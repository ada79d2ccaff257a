// Library root
// -----------
// This crate exposes the pieces of the `bitlink` command as a library so the
// request logic can be tested without the binary or the network.
//
// Module responsibilities:
// - `config`: bearer token and API base URL, read once at startup.
// - `error`: the error taxonomy and its user-facing messages.
// - `api`: the bitly client (auth check, shorten, lookup, click summary)
//   and the shorten-or-summarize decision, over a pluggable transport.
// - `mock_transport`: scripted transport for unit tests (test builds only).
// - `ui`: argument parsing and the command flow.
// - `telemetry`: stderr logging.
pub mod api;
pub mod config;
pub mod error;
#[cfg(test)]
mod mock_transport;
pub mod telemetry;
pub mod ui;
