use serde::de::DeserializeOwned;
use std::io::{self, Read};
use tracing::debug;

/// Deserialize a document piped on stdin. `None` when stdin is a terminal or
/// nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        debug!("stdin is empty");
        return Ok(None);
    }
    debug!(bytes = trimmed.len(), "reading document from stdin");
    super::parse_json(trimmed, "stdin").map(Some)
}
