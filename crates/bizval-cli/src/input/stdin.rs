use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a piped JSON document from stdin.
///
/// `None` when stdin is a terminal or the pipe carried only whitespace, so
/// callers can fall through to command-line flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    let document = serde_json::from_str(buffer.trim())
        .map_err(|e| format!("Failed to parse piped input: {}", e))?;
    Ok(Some(document))
}
