use ::std::io::Error as IoError;
use ::thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

/// The failures that building a request, or reading a response, can produce.
///
/// Assertion mismatches are not errors. They panic through `assert_*`,
/// or are returned as an [`AssertionError`](crate::AssertionError) by `check_*`.
#[derive(Debug, Error)]
pub enum Error {
    /// The path given to a [`MockRequest`](crate::MockRequest) is neither
    /// an absolute `http(s)://` url nor a path starting with `/`.
    #[error("illegal path case, path '{path}'")]
    InvalidPath { path: String },

    /// A request body could not be encoded.
    #[error("failed to encode {what}, {message}")]
    Encoding { what: &'static str, message: String },

    /// The [`MultipartForm`](crate::multipart::MultipartForm) has already been exported.
    #[error("multipart form has already been exported")]
    AlreadyFinalized,

    /// The response body is not valid JSON for the type requested.
    #[error("failed to decode response body as JSON, for request {request}")]
    Decode {
        request: String,
        #[source]
        source: ::serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] IoError),
}

impl Error {
    pub(crate) fn encoding<E>(what: &'static str, err: E) -> Self
    where
        E: ::std::fmt::Display,
    {
        Self::Encoding {
            what,
            message: err.to_string(),
        }
    }
}
