use crate::MockResponse;
use bytesize::ByteSize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Bodies longer than this are cut short in failure messages.
const MAX_TEXT_PRINT_LEN: usize = 10_000;

/// Displays a response body for failure messages,
/// picking a format from the response content type.
#[derive(Debug)]
pub struct DebugResponseBody<'a>(pub &'a MockResponse);

impl Display for DebugResponseBody<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let response = self.0;
        let maybe_content_type = response.maybe_content_type();
        let essence = maybe_content_type
            .as_deref()
            .and_then(|content_type| content_type.split(';').next())
            .map(str::trim);

        match essence {
            Some("application/json" | "text/json") => write_json(f, response),
            Some(s) if s.starts_with("text/") => write_text(f, &response.text()),
            Some(other) => {
                let len = response.as_bytes().len() as u64;
                write!(f, "<{} of {other}>", ByteSize(len))
            }
            None => write_text(f, &response.text()),
        }
    }
}

fn write_text(f: &mut Formatter<'_>, text: &str) -> FmtResult {
    if text.chars().count() <= MAX_TEXT_PRINT_LEN {
        return write!(f, "'{text}'");
    }

    let cut_text: String = text.chars().take(MAX_TEXT_PRINT_LEN).collect();
    write!(f, "'{cut_text}...'")
}

fn write_json(f: &mut Formatter<'_>, response: &MockResponse) -> FmtResult {
    match serde_json::from_slice::<serde_json::Value>(response.as_bytes()) {
        Ok(body) => write!(f, "{body:#}"),
        Err(_) => write!(f, "malformed JSON '{}'", response.text()),
    }
}
