//! Where loan and portfolio documents come from: a file, `-` for stdin, or
//! JSON piped in without any flag.

pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Parse a JSON document, naming its source in the error.
pub(crate) fn parse_json<T: DeserializeOwned>(
    text: &str,
    source: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(text).map_err(|e| format!("Invalid JSON in {source}: {e}"))?)
}
