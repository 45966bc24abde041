use ::http::Uri;
use ::regex::Regex;
use ::std::sync::LazyLock;

use crate::Error;
use crate::Result;

const DEFAULT_PATH: &str = "/";

/// Accepts `/`, `/name`, and absolute `http://` or `https://` urls.
static REQUEST_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://.*|/.*)$").expect("Request path regex should always compile")
});

/// Validates the path given for a mock request, and parses it into a `Uri`.
///
/// An empty path is treated as `/`.
pub fn parse_request_path(path: &str) -> Result<Uri> {
    let path = if path.is_empty() { DEFAULT_PATH } else { path };

    if !REQUEST_PATH_REGEX.is_match(path) {
        return Err(Error::InvalidPath {
            path: path.to_string(),
        });
    }

    path.parse::<Uri>().map_err(|_| Error::InvalidPath {
        path: path.to_string(),
    })
}
