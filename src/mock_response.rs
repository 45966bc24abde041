use ::bytes::Bytes;
use ::cookie::Cookie;
use ::http::HeaderMap;
use ::http::HeaderValue;
use ::http::StatusCode;
use ::http::header::AsHeaderName;
use ::http::header::CONTENT_TYPE;
use ::http::header::SET_COOKIE;
use ::serde::Serialize;
use ::serde::de::DeserializeOwned;
use ::serde_json::Value;

#[cfg(feature = "pretty-assertions")]
use ::pretty_assertions::assert_eq;

use crate::AssertionError;
use crate::Error;
use crate::Result;
use crate::StatusWithReason;
use crate::internals::DebugResponseBody;

///
/// A response, either recorded from a [`MockRequest`](crate::MockRequest),
/// or received over the network by a [`MockServer`](crate::MockServer).
///
/// Both kinds are read fully into memory when the response is created,
/// so the body can be read as many times as needed.
///
/// ```rust
/// use ::bytes::Bytes;
/// use ::http::Method;
/// use ::http::Request;
/// use ::http_easy_test::MockRequest;
/// use ::http_easy_test::ResponseRecorder;
///
/// fn route_hello(_request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
///     recorder.write_body("hello!");
/// }
///
/// let mut mock = MockRequest::new("/hello", Method::GET, "").unwrap();
/// mock.invoke(&route_hello);
///
/// let response = mock.response();
/// response.assert_status_ok();
/// response.assert_text("hello!");
/// ```
///
/// # Assertions
///
/// Every `assert_*` function panics on a mismatch.
/// Each has a `check_*` counterpart returning an [`AssertionError`] instead,
/// for tests which want to carry on after a failure
/// (see [`Checks`](crate::Checks)).
///
#[derive(Clone, Debug)]
pub struct MockResponse {
    request_description: String,
    status_code: StatusCode,
    headers: HeaderMap<HeaderValue>,
    response_body: Bytes,
}

impl MockResponse {
    pub fn new(
        request_description: String,
        status_code: StatusCode,
        headers: HeaderMap<HeaderValue>,
        response_body: Bytes,
    ) -> Self {
        Self {
            request_description,
            status_code,
            headers,
            response_body,
        }
    }

    /// Returns the underlying response, extracted as a UTF-8 string.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).to_string()
    }

    /// Deserializes the response, as JSON, into the type given.
    ///
    /// Returns [`Error::Decode`] if the body is not valid JSON for that type.
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice::<T>(self.as_bytes()).map_err(|source| Error::Decode {
            request: self.request_description.clone(),
            source,
        })
    }

    /// Returns the raw underlying response as `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> &Bytes {
        &self.response_body
    }

    /// Returns a copy of the whole body.
    ///
    /// This is cheap, and can be called any number of times.
    #[must_use]
    pub fn body(&self) -> Bytes {
        self.response_body.clone()
    }

    /// Consumes this returning the underlying `Bytes`
    /// in the response.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.response_body
    }

    /// The status_code of the response.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// The method and path used to produce this response, i.e. `GET /users`.
    #[must_use]
    pub fn request_description(&self) -> &str {
        &self.request_description
    }

    /// Returns the headers returned from the response.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        &self.headers
    }

    /// Finds a header with the given name.
    /// If there are multiple headers with the same name,
    /// then only the first [`http::HeaderValue`] will be returned.
    ///
    /// `None` is returned when no header was found.
    #[must_use]
    pub fn maybe_header<N>(&self, header_name: N) -> Option<HeaderValue>
    where
        N: AsHeaderName,
    {
        self.headers.get(header_name).map(|h| h.to_owned())
    }

    /// Returns the content type of the response, if present and valid text.
    #[must_use]
    pub fn maybe_content_type(&self) -> Option<String> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|header| header.to_str().ok())
            .map(ToString::to_string)
    }

    /// Returns every cookie set by the response, through `Set-Cookie` headers.
    ///
    /// Headers which cannot be parsed as a cookie are skipped.
    #[must_use]
    pub fn set_cookies(&self) -> Vec<Cookie<'static>> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| {
                let parsed = header
                    .to_str()
                    .ok()
                    .and_then(|raw| Cookie::parse(raw.to_string()).ok());

                if parsed.is_none() {
                    ::tracing::warn!(
                        request = %self.request_description,
                        ?header,
                        "Skipping unreadable 'Set-Cookie' header"
                    );
                }

                parsed
            })
            .collect()
    }

    /// Finds a [`Cookie`] set by the response with the given name.
    /// If there are multiple matching cookies,
    /// then only the first will be returned.
    ///
    /// `None` is returned if no Cookie is found.
    #[must_use]
    pub fn find_cookie(&self, cookie_name: &str) -> Option<Cookie<'static>> {
        self.set_cookies()
            .into_iter()
            .find(|cookie| cookie.name() == cookie_name)
    }

    /// Finds a [`Cookie`] set by the response with the given name.
    ///
    /// If no `Cookie` is found, then this will panic.
    #[must_use]
    #[track_caller]
    pub fn cookie(&self, cookie_name: &str) -> Cookie<'static> {
        match self.find_cookie(cookie_name) {
            Some(cookie) => cookie,
            None => panic!(
                "Cannot find cookie {cookie_name}, for request {}",
                self.request_description
            ),
        }
    }

    /// Checks the response status code matches the one given.
    pub fn check_status(&self, status_code: StatusCode) -> ::std::result::Result<(), AssertionError> {
        if self.status_code == status_code {
            return Ok(());
        }

        Err(AssertionError::Status {
            request: self.request_description.clone(),
            expected: StatusWithReason(status_code),
            received: StatusWithReason(self.status_code),
        })
    }

    /// Checks the response status code is 200.
    pub fn check_status_ok(&self) -> ::std::result::Result<(), AssertionError> {
        self.check_status(StatusCode::OK)
    }

    /// Checks the status code is **within** the 2xx range.
    pub fn check_status_success(&self) -> ::std::result::Result<(), AssertionError> {
        if self.status_code.is_success() {
            return Ok(());
        }

        Err(AssertionError::StatusRange {
            request: self.request_description.clone(),
            expectation: "within 2xx range",
            received: StatusWithReason(self.status_code),
        })
    }

    /// Checks the status code is **outside** the 2xx range.
    pub fn check_status_failure(&self) -> ::std::result::Result<(), AssertionError> {
        if !self.status_code.is_success() {
            return Ok(());
        }

        Err(AssertionError::StatusRange {
            request: self.request_description.clone(),
            expectation: "outside 2xx range",
            received: StatusWithReason(self.status_code),
        })
    }

    /// Checks the whole body of the response is the text given.
    pub fn check_text<C>(&self, expected: C) -> ::std::result::Result<(), AssertionError>
    where
        C: AsRef<str>,
    {
        let expected = expected.as_ref();
        if self.as_bytes().as_ref() == expected.as_bytes() {
            return Ok(());
        }

        Err(AssertionError::Body {
            request: self.request_description.clone(),
            expected: expected.to_string(),
            received: DebugResponseBody(self).to_string(),
        })
    }

    /// Checks the body, read as JSON, equals the value given once serialized.
    ///
    /// The comparison is between JSON values, so key order and whitespace
    /// in the response do not matter.
    pub fn check_json<T>(&self, expected: &T) -> ::std::result::Result<(), AssertionError>
    where
        T: Serialize + ?Sized,
    {
        let expected_json = serde_json::to_value(expected)
            .map_err(|err| self.json_mismatch(format!("<unserializable: {err}>")))?;

        match serde_json::from_slice::<Value>(self.as_bytes()) {
            Ok(received_json) if received_json == expected_json => Ok(()),
            _ => Err(self.json_mismatch(expected_json.to_string())),
        }
    }

    fn json_mismatch(&self, expected: String) -> AssertionError {
        AssertionError::Json {
            request: self.request_description.clone(),
            expected,
            received: DebugResponseBody(self).to_string(),
        }
    }

    /// Assert the response status code is 200.
    #[track_caller]
    pub fn assert_status_ok(&self) {
        self.assert_status(StatusCode::OK)
    }

    /// Assert the response status code matches the one given.
    #[track_caller]
    pub fn assert_status(&self, status_code: StatusCode) {
        assert_eq!(
            self.status_code(),
            status_code,
            "Expected status code {}, received {}, for request {}",
            StatusWithReason(status_code),
            StatusWithReason(self.status_code),
            self.request_description
        );
    }

    /// This will panic if the status code is **outside** the 2xx range.
    #[track_caller]
    pub fn assert_status_success(&self) {
        if let Err(failure) = self.check_status_success() {
            panic!("{failure}");
        }
    }

    /// This will panic if the status code is **within** the 2xx range.
    #[track_caller]
    pub fn assert_status_failure(&self) {
        if let Err(failure) = self.check_status_failure() {
            panic!("{failure}");
        }
    }

    /// This performs an assertion comparing the whole body of the response,
    /// against the text provided.
    #[track_caller]
    pub fn assert_text<C>(&self, expected: C)
    where
        C: AsRef<str>,
    {
        assert_eq!(
            self.text(),
            expected.as_ref(),
            "Response body differs, for request {}",
            self.request_description
        );
    }

    /// Asserts the body, read as JSON, equals the value given once serialized.
    ///
    /// This panics if the body is not JSON.
    #[track_caller]
    pub fn assert_json<T>(&self, expected: &T)
    where
        T: Serialize + ?Sized,
    {
        let received_json = match serde_json::from_slice::<Value>(self.as_bytes()) {
            Ok(received_json) => received_json,
            Err(_) => panic!(
                "Expected JSON body, received {}, for request {}",
                DebugResponseBody(self),
                self.request_description
            ),
        };
        let expected_json = match serde_json::to_value(expected) {
            Ok(expected_json) => expected_json,
            Err(err) => panic!("Cannot serialize expected value to JSON, {err}"),
        };

        assert_eq!(
            received_json, expected_json,
            "Response JSON differs, for request {}",
            self.request_description
        );
    }
}

impl From<MockResponse> for Bytes {
    fn from(response: MockResponse) -> Self {
        response.into_bytes()
    }
}

#[cfg(test)]
mod test_helpers {
    use super::*;

    pub fn new_response(status_code: StatusCode, body: &'static str) -> MockResponse {
        MockResponse::new(
            "GET /test".to_string(),
            status_code,
            HeaderMap::new(),
            Bytes::from_static(body.as_bytes()),
        )
    }

    pub fn new_response_with_headers(
        headers: &[(&'static str, &'static str)],
        body: &'static str,
    ) -> MockResponse {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            header_map.append(*name, HeaderValue::from_static(*value));
        }

        MockResponse::new(
            "GET /test".to_string(),
            StatusCode::OK,
            header_map,
            Bytes::from_static(body.as_bytes()),
        )
    }
}

#[cfg(test)]
mod test_assert_status {
    use super::test_helpers::*;
    use ::http::StatusCode;

    #[test]
    fn it_should_pass_when_200() {
        new_response(StatusCode::OK, "").assert_status_ok();
    }

    #[test]
    fn it_should_pass_when_status_matches() {
        new_response(StatusCode::MOVED_PERMANENTLY, "").assert_status(StatusCode::MOVED_PERMANENTLY);
    }

    #[test]
    #[should_panic]
    fn it_should_panic_when_not_200() {
        new_response(StatusCode::SERVICE_UNAVAILABLE, "").assert_status_ok();
    }

    #[test]
    fn it_should_pass_success_for_2xx() {
        new_response(StatusCode::CREATED, "").assert_status_success();
    }

    #[test]
    #[should_panic(expected = "within 2xx range")]
    fn it_should_panic_success_for_5xx() {
        new_response(StatusCode::SERVICE_UNAVAILABLE, "").assert_status_success();
    }

    #[test]
    fn it_should_pass_failure_for_4xx() {
        new_response(StatusCode::NOT_FOUND, "").assert_status_failure();
    }
}
