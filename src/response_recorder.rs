use ::axum::body::Body as AxumBody;
use ::axum::response::Response as AxumResponse;
use ::bytes::BytesMut;
use ::http::HeaderMap;
use ::http::HeaderName;
use ::http::HeaderValue;
use ::http::StatusCode;
use ::std::io;
use ::std::io::Write;

use crate::MockResponse;

///
/// The sink a [`Handler`](crate::Handler) writes its response into.
///
/// It records the status code, headers, and body bytes.
/// The status code is taken from the first call to [`ResponseRecorder::write_head()`],
/// or is `200 OK` if the body is written first (or nothing is written at all).
///
#[derive(Debug, Clone)]
pub struct ResponseRecorder {
    status_code: StatusCode,
    headers: HeaderMap<HeaderValue>,
    body: BytesMut,
    is_head_written: bool,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self {
            status_code: StatusCode::OK,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            is_head_written: false,
        }
    }

    /// Sets the status code.
    ///
    /// Only the first call takes effect, and only if no body has been written yet.
    pub fn write_head(&mut self, status_code: StatusCode) {
        if self.is_head_written {
            return;
        }

        self.status_code = status_code;
        self.is_head_written = true;
    }

    /// Appends to the response body.
    pub fn write_body<B>(&mut self, bytes: B)
    where
        B: AsRef<[u8]>,
    {
        self.is_head_written = true;
        self.body.extend_from_slice(bytes.as_ref());
    }

    /// Adds a header, keeping any existing headers of the same name.
    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// Sets a header, replacing any existing headers of the same name.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
        &mut self.headers
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Builds a [`MockResponse`] from what has been recorded so far.
    pub fn to_response(&self, request_description: String) -> MockResponse {
        MockResponse::new(
            request_description,
            self.status_code,
            self.headers.clone(),
            self.body.clone().freeze(),
        )
    }

    pub(crate) fn into_axum_response(self) -> AxumResponse {
        let mut response = AxumResponse::new(AxumBody::from(self.body.freeze()));
        *response.status_mut() = self.status_code;
        *response.headers_mut() = self.headers;

        response
    }

    /// Replaces everything recorded with the parts of a finished response.
    pub(crate) fn record(
        &mut self,
        status_code: StatusCode,
        headers: HeaderMap<HeaderValue>,
        body: &[u8],
    ) {
        self.status_code = status_code;
        self.headers = headers;
        self.body = BytesMut::from(body);
        self.is_head_written = true;
    }
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
