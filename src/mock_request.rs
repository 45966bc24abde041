use ::axum::Router;
use ::axum::body::Body as AxumBody;
use ::axum::extract::ConnectInfo;
use ::bytes::Bytes;
use ::cookie::Cookie;
use ::http::HeaderName;
use ::http::HeaderValue;
use ::http::Method;
use ::http::Request;
use ::http::StatusCode;
use ::http::header;
use ::http_body_util::BodyExt;
use ::serde::Serialize;
use ::std::io::Read;
use ::std::net::IpAddr;
use ::std::net::Ipv4Addr;
use ::std::net::SocketAddr;
use ::tower::ServiceExt;

use crate::AssertionError;
use crate::Error;
use crate::Handler;
use crate::MockResponse;
use crate::ResponseRecorder;
use crate::Result;
use crate::internals::build_cookie_header;
use crate::internals::sendable_cookies;
use crate::internals::parse_request_path;
use crate::multipart::MultipartForm;

/// `192.0.2.1:1234`, from the "TEST-NET-1" block reserved for documentation in RFC 5737.
pub const DEFAULT_REMOTE_ADDRESS: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 1234);

/// The `host` used when the path given is not an absolute url.
const DEFAULT_HOST: &str = "example.com";

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

///
/// A synthetic request, paired with a [`ResponseRecorder`] to capture
/// what a handler writes back.
///
/// Handlers are called directly, on the current thread,
/// without going through any network stack.
///
/// ```rust
/// # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
/// #
/// use ::bytes::Bytes;
/// use ::http::Method;
/// use ::http::Request;
/// use ::http::StatusCode;
/// use ::http_easy_test::MockRequest;
/// use ::http_easy_test::ResponseRecorder;
/// use ::serde_json::json;
///
/// fn route_create_user(request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
///     recorder.write_head(StatusCode::CREATED);
///     recorder.write_body(request.body());
/// }
///
/// let mut mock = MockRequest::json("/users", Method::POST, &json!({
///     "username": "Terrance Pencilworth",
/// }))?;
/// mock.invoke(&route_create_user);
///
/// mock.assert_status(StatusCode::CREATED);
/// mock.assert_json(&json!({
///     "username": "Terrance Pencilworth",
/// }));
/// #
/// # Ok(())
/// # }
/// ```
///
/// The path can be a path starting with `/` (optionally with a query),
/// or an absolute `http://` or `https://` url. An empty path is treated as `/`.
/// Anything else is rejected with [`Error::InvalidPath`].
///
#[derive(Debug, Clone)]
pub struct MockRequest {
    request: Request<Bytes>,
    remote_address: SocketAddr,
    cookies: Vec<Cookie<'static>>,
    recorder: ResponseRecorder,
}

impl MockRequest {
    /// Creates a request with the raw body given.
    pub fn new<B>(path: &str, method: Method, body: B) -> Result<Self>
    where
        B: Into<Bytes>,
    {
        let uri = parse_request_path(path)?;
        let host = uri
            .authority()
            .map(|authority| authority.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let mut request = Request::new(body.into());
        *request.method_mut() = method;
        *request.uri_mut() = uri;
        request.headers_mut().insert(
            header::HOST,
            HeaderValue::from_str(&host).map_err(|_| Error::InvalidPath {
                path: path.to_string(),
            })?,
        );

        let mut this = Self {
            request,
            remote_address: DEFAULT_REMOTE_ADDRESS,
            cookies: Vec::new(),
            recorder: ResponseRecorder::new(),
        };
        this.set_remote_address(DEFAULT_REMOTE_ADDRESS);

        Ok(this)
    }

    /// Creates a `GET` request with an empty body.
    pub fn get(path: &str) -> Result<Self> {
        Self::new(path, Method::GET, Bytes::new())
    }

    /// Creates a request, with the body read fully out of the reader given.
    pub fn from_reader<R>(path: &str, method: Method, mut reader: R) -> Result<Self>
    where
        R: Read,
    {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;

        Self::new(path, method, body)
    }

    /// Creates a request with the value given serialized as the JSON body.
    ///
    /// The `content-type` header is set to `application/json`.
    pub fn json<J>(path: &str, method: Method, body: &J) -> Result<Self>
    where
        J: ?Sized + Serialize,
    {
        let body_bytes =
            serde_json::to_vec(body).map_err(|err| Error::encoding("JSON body", err))?;

        let mut this = Self::new(path, method, body_bytes)?;
        this.insert_header(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        Ok(this)
    }

    /// Creates a request with the value given as an url encoded form body.
    ///
    /// Keys can be repeated by passing a sequence of pairs,
    /// such as `&[("animal", "fox"), ("animal", "cat")]`.
    /// The `content-type` header is set to `application/x-www-form-urlencoded`.
    pub fn url_encoded<F>(path: &str, method: Method, body: &F) -> Result<Self>
    where
        F: ?Sized + Serialize,
    {
        let body_text = serde_urlencoded::to_string(body)
            .map_err(|err| Error::encoding("url encoded form body", err))?;

        let mut this = Self::new(path, method, body_text)?;
        this.insert_header(header::CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        Ok(this)
    }

    /// Creates a request with the form given exported as a `multipart/form-data` body.
    pub fn form_data(path: &str, method: Method, mut form: MultipartForm) -> Result<Self> {
        let content_type = form.content_type();
        let body = form.export()?;
        let header_value = HeaderValue::from_str(&content_type)
            .map_err(|err| Error::encoding("multipart content type", err))?;

        let mut this = Self::new(path, method, body)?;
        this.insert_header(header::CONTENT_TYPE, header_value);

        Ok(this)
    }

    /// Replaces the address the request appears to come from.
    ///
    /// It defaults to [`DEFAULT_REMOTE_ADDRESS`], and is available to handlers
    /// as the [`ConnectInfo<SocketAddr>`](axum::extract::ConnectInfo) request extension.
    pub fn set_remote_address(&mut self, remote_address: SocketAddr) {
        self.remote_address = remote_address;
        self.request
            .extensions_mut()
            .insert(ConnectInfo(remote_address));
    }

    pub fn remote_address(&self) -> SocketAddr {
        self.remote_address
    }

    /// Attaches cookies to the request.
    ///
    /// Only the name and value of each cookie are sent.
    /// Attributes such as `Secure` and `HttpOnly` only mean anything on responses.
    ///
    /// Cookies from earlier calls are kept,
    /// and the `cookie` header is rewritten to hold all of them.
    /// A cookie which cannot be written into a header is skipped.
    pub fn set_cookies(&mut self, cookies: &[Cookie<'_>]) {
        self.cookies.extend(sendable_cookies(cookies));

        if let Some(header_value) = build_cookie_header(&self.cookies) {
            self.request
                .headers_mut()
                .insert(header::COOKIE, header_value);
        }
    }

    /// Sets a header on the request, replacing any of the same name.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.request.headers_mut().insert(name, value);
    }

    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Bytes> {
        &mut self.request
    }

    pub fn recorder(&self) -> &ResponseRecorder {
        &self.recorder
    }

    /// Calls the handler with this request, recording what it writes.
    ///
    /// This blocks on the handler. There is no timeout.
    pub fn invoke<H>(&mut self, handler: &H)
    where
        H: Handler + ?Sized,
    {
        ::tracing::debug!(request = %self.request_description(), "Invoking mock handler");
        handler.handle(&self.request, &mut self.recorder);
    }

    /// Runs this request once through an Axum [`Router`],
    /// and records the response it returns.
    ///
    /// This allows handlers written for Axum, using its extractors,
    /// to be tested in the same way as a plain [`Handler`].
    /// The router is driven on a single threaded runtime created for the call,
    /// so this must not be called from within an async context.
    pub fn invoke_router(&mut self, router: Router) {
        ::tracing::debug!(request = %self.request_description(), "Invoking router");

        let request = self.request.clone().map(AxumBody::from);
        let outcome = ::tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| err.to_string())
            .and_then(|runtime| runtime.block_on(run_router(router, request)));

        match outcome {
            Ok((parts, body_bytes)) => {
                self.recorder.record(parts.status, parts.headers, &body_bytes);
            }
            Err(message) => {
                ::tracing::warn!(request = %self.request_description(), %message, "Router failed");
                self.recorder
                    .record(StatusCode::INTERNAL_SERVER_ERROR, Default::default(), message.as_bytes());
            }
        }
    }

    /// Returns what the handler has recorded, as a [`MockResponse`].
    #[must_use]
    pub fn response(&self) -> MockResponse {
        self.recorder.to_response(self.request_description())
    }

    /// Assert the recorded status code is 200.
    #[track_caller]
    pub fn assert_status_ok(&self) {
        self.response().assert_status_ok()
    }

    /// Assert the recorded status code matches the one given.
    #[track_caller]
    pub fn assert_status(&self, status_code: StatusCode) {
        self.response().assert_status(status_code)
    }

    /// Assert the recorded body is the text given.
    #[track_caller]
    pub fn assert_text<C>(&self, expected: C)
    where
        C: AsRef<str>,
    {
        self.response().assert_text(expected)
    }

    /// Assert the recorded body, read as JSON, equals the value given.
    #[track_caller]
    pub fn assert_json<T>(&self, expected: &T)
    where
        T: Serialize + ?Sized,
    {
        self.response().assert_json(expected)
    }

    pub fn check_status_ok(&self) -> ::std::result::Result<(), AssertionError> {
        self.response().check_status_ok()
    }

    pub fn check_status(&self, status_code: StatusCode) -> ::std::result::Result<(), AssertionError> {
        self.response().check_status(status_code)
    }

    /// Checks the recorded body, read as JSON, equals the value given.
    pub fn check_json<T>(&self, expected: &T) -> ::std::result::Result<(), AssertionError>
    where
        T: Serialize + ?Sized,
    {
        self.response().check_json(expected)
    }

    pub fn check_text<C>(&self, expected: C) -> ::std::result::Result<(), AssertionError>
    where
        C: AsRef<str>,
    {
        self.response().check_text(expected)
    }

    /// Deserializes the recorded body as JSON.
    pub fn response_json<T>(&self) -> Result<T>
    where
        T: ::serde::de::DeserializeOwned,
    {
        self.response().json()
    }

    /// The cookies the handler set, through `Set-Cookie` headers.
    #[must_use]
    pub fn set_cookies_received(&self) -> Vec<Cookie<'static>> {
        self.response().set_cookies()
    }

    /// Finds a cookie the handler set, by name.
    #[must_use]
    pub fn find_cookie(&self, cookie_name: &str) -> Option<Cookie<'static>> {
        self.response().find_cookie(cookie_name)
    }

    fn request_description(&self) -> String {
        format!("{} {}", self.request.method(), self.request.uri())
    }
}

async fn run_router(
    router: Router,
    request: Request<AxumBody>,
) -> ::std::result::Result<(::http::response::Parts, Bytes), String> {
    let response = router.oneshot(request).await.map_err(|err| err.to_string())?;
    let (parts, body) = response.into_parts();
    let body_bytes = body
        .collect()
        .await
        .map_err(|err| err.to_string())?
        .to_bytes();

    Ok((parts, body_bytes))
}

#[cfg(test)]
mod test_new {
    use super::*;

    #[test]
    fn it_should_normalise_empty_path_to_root() {
        let mock = MockRequest::new("", Method::GET, "aaa").unwrap();

        assert_eq!(mock.request().uri().path(), "/");
    }

    #[test]
    fn it_should_keep_body_given() {
        let mock = MockRequest::new("/", Method::GET, "hogehoge").unwrap();

        assert_eq!(mock.request().body(), "hogehoge");
    }

    #[test]
    fn it_should_accept_all_path_cases() {
        for path in [
            "/",
            "/aaaaa",
            "/aaaaa?hoge=huga",
            "https://cateiru.com/",
            "http://cateiru.com/",
            "https://cateiru.com/aaaaa",
            "https://cateiru.com/aaaaa?hoge=huga",
        ] {
            let result = MockRequest::new(path, Method::GET, "aaa");

            assert!(result.is_ok(), "{path}");
        }
    }

    #[test]
    fn it_should_reject_illegal_path() {
        let result = MockRequest::new("aaaaa", Method::GET, "");

        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn it_should_set_host_from_absolute_url() {
        let mock = MockRequest::new("https://cateiru.com/aaaaa", Method::GET, "").unwrap();

        assert_eq!(mock.request().headers()[header::HOST], "cateiru.com");
        assert_eq!(mock.request().uri().path(), "/aaaaa");
    }

    #[test]
    fn it_should_default_host_for_paths() {
        let mock = MockRequest::get("/aaaaa").unwrap();

        assert_eq!(mock.request().headers()[header::HOST], DEFAULT_HOST);
    }

    #[test]
    fn it_should_default_remote_address_to_test_net() {
        let mock = MockRequest::get("/").unwrap();

        assert_eq!(mock.remote_address().to_string(), "192.0.2.1:1234");
    }
}

#[cfg(test)]
mod test_from_reader {
    use super::*;

    #[test]
    fn it_should_read_body_out_of_reader() {
        let mock = MockRequest::from_reader("/", Method::POST, "hogehoge".as_bytes()).unwrap();

        assert_eq!(mock.request().body(), "hogehoge");
    }

    #[test]
    fn it_should_reject_illegal_path() {
        let result = MockRequest::from_reader("aaaaa", Method::POST, "".as_bytes());

        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }
}

#[cfg(test)]
mod test_json {
    use super::*;
    use ::serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct JsonData {
        nya: String,
    }

    #[test]
    fn it_should_serialize_body_and_set_content_type() {
        let data = JsonData {
            nya: "hoge".to_string(),
        };

        let mock = MockRequest::json("/", Method::POST, &data).unwrap();

        assert_eq!(mock.request().headers()[header::CONTENT_TYPE], "application/json");
        let body: JsonData = serde_json::from_slice(mock.request().body()).unwrap();
        assert_eq!(body, data);
    }

    #[test]
    fn it_should_encode_empty_string_as_json_string() {
        let mock = MockRequest::json("/", Method::POST, "").unwrap();

        assert_eq!(mock.request().body(), r#""""#);
    }

    #[test]
    fn it_should_return_encoding_error_for_unserializable_values() {
        let mut map = ::std::collections::HashMap::new();
        map.insert(vec![1_u8], "value");

        let result = MockRequest::json("/", Method::POST, &map);

        assert!(matches!(result, Err(Error::Encoding { .. })));
    }
}

#[cfg(test)]
mod test_url_encoded {
    use super::*;

    #[test]
    fn it_should_encode_pairs_in_order() {
        let mock =
            MockRequest::url_encoded("/", Method::POST, &[("hoge", "huga"), ("aaa", "bbb")])
                .unwrap();

        assert_eq!(
            mock.request().headers()[header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(mock.request().body(), "hoge=huga&aaa=bbb");
    }

    #[test]
    fn it_should_keep_repeated_keys() {
        let mock =
            MockRequest::url_encoded("/", Method::POST, &[("animal", "fox"), ("animal", "cat")])
                .unwrap();

        assert_eq!(mock.request().body(), "animal=fox&animal=cat");
    }

    #[test]
    fn it_should_percent_encode_values() {
        let mock =
            MockRequest::url_encoded("/", Method::POST, &[("mail", "test@example.com")]).unwrap();

        assert_eq!(mock.request().body(), "mail=test%40example.com");
    }
}

#[cfg(test)]
mod test_form_data {
    use super::*;

    #[test]
    fn it_should_set_content_type_of_form() {
        let mut form = MultipartForm::new();
        form.insert_field("key", "value").unwrap();
        let content_type = form.content_type();

        let mock = MockRequest::form_data("/", Method::POST, form).unwrap();

        assert_eq!(mock.request().headers()[header::CONTENT_TYPE], content_type.as_str());
        assert!(String::from_utf8_lossy(mock.request().body()).contains("value"));
    }

    #[test]
    fn it_should_error_when_form_was_already_exported() {
        let mut form = MultipartForm::new();
        form.export().unwrap();

        let result = MockRequest::form_data("/", Method::POST, form);

        assert!(matches!(result, Err(Error::AlreadyFinalized)));
    }
}
