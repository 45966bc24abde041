use ::anyhow::Context;
use ::anyhow::Result;
use ::axum::Router;
use ::bytes::Bytes;
use ::cookie::Cookie;
use ::http::HeaderMap;
use ::http::HeaderName;
use ::http::HeaderValue;
use ::http::Method;
use ::http::header;
use ::reqwest::Certificate;
use ::reqwest::blocking::Client;
use ::serde::Serialize;
use ::std::net::SocketAddr;
use ::tokio::net::TcpListener as TokioTcpListener;

use crate::MockResponse;
use crate::MockServerConfig;
use crate::internals::TlsSetup;
use crate::internals::build_cookie_header;
use crate::internals::sendable_cookies;
use crate::internals::serve_tls;
use crate::multipart::MultipartForm;
use crate::util::ServeHandle;
use crate::util::new_tcp_listener;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

///
/// A real server, listening on a local port, running an [`axum::Router`].
///
/// Requests are made over the network through a blocking client,
/// so each one goes through the full http stack (and TLS, when turned on).
/// The server stops when it is dropped, or when [`MockServer::close()`] is called.
///
/// ```rust
/// # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
/// #
/// use ::bytes::Bytes;
/// use ::http::Request;
/// use ::http_easy_test::MockServer;
/// use ::http_easy_test::ResponseRecorder;
/// use ::http_easy_test::handler_router;
///
/// fn route_echo(request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
///     recorder.write_body(request.body());
/// }
///
/// let server = MockServer::new(handler_router(route_echo))?;
///
/// let response = server.post_string("/", "text/plain", "hello");
/// response.assert_status_ok();
/// response.assert_text("hello");
/// #
/// # Ok(())
/// # }
/// ```
///
/// Headers and cookies added to the server are sent with every request after.
/// A 4xx or 5xx response is returned like any other,
/// however failing to send a request at all will panic.
/// Use [`MockServer::try_do_request()`] to get those errors back instead.
///
#[derive(Debug)]
pub struct MockServer {
    server_url: String,
    socket_addr: SocketAddr,
    client: Client,
    headers: HeaderMap<HeaderValue>,
    cookies: Vec<Cookie<'static>>,
    certificate_pem: Option<String>,
    serve_handle: ServeHandle,
}

impl MockServer {
    /// Runs the `Router` over plain http, on a random local port.
    pub fn new(app: Router) -> Result<Self> {
        Self::new_with_config(app, MockServerConfig::default())
    }

    /// Runs the `Router` over https, on a random local port.
    ///
    /// A self-signed certificate is generated for the server,
    /// and the server's client is set up to trust it.
    pub fn new_tls(app: Router) -> Result<Self> {
        Self::new_with_config(app, MockServerConfig::builder().tls().build())
    }

    /// This very similar to [`MockServer::new()`],
    /// however you can choose the ip, port, and whether to use TLS.
    ///
    /// See the [`MockServerConfig`] for more information on each setting.
    pub fn new_with_config(app: Router, config: MockServerConfig) -> Result<Self> {
        let (std_listener, socket_addr) = new_tcp_listener(config.ip, config.port)
            .context("Cannot create socket address for use")?;

        let runtime = ::tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("mock-server")
            .enable_all()
            .build()
            .context("Failed to build runtime for MockServer")?;

        let tls_setup = if config.tls {
            let tls_setup = TlsSetup::new_self_signed(socket_addr.ip())
                .context("Failed to set up TLS for MockServer")?;
            Some(tls_setup)
        } else {
            None
        };

        let server_handle = {
            let _runtime_guard = runtime.enter();
            let listener = TokioTcpListener::from_std(std_listener)
                .context("Failed to create TcpListener for MockServer")?;

            match &tls_setup {
                Some(tls_setup) => {
                    runtime.spawn(serve_tls(listener, tls_setup.acceptor.clone(), app))
                }
                None => runtime.spawn(async move {
                    let service = app.into_make_service_with_connect_info::<SocketAddr>();
                    if let Err(err) = ::axum::serve(listener, service).await {
                        ::tracing::warn!(error = %err, "mock server stopped with error");
                    }
                }),
            }
        };
        let serve_handle = ServeHandle::new(runtime, server_handle);

        let mut client_builder = Client::builder();
        if let Some(tls_setup) = &tls_setup {
            let certificate = Certificate::from_pem(tls_setup.certificate_pem.as_bytes())
                .context("Failed to read certificate generated for MockServer")?;
            client_builder = client_builder.add_root_certificate(certificate);
        }
        let client = client_builder
            .build()
            .context("Failed to build client for MockServer")?;

        let server_url = format!("{}://{socket_addr}", config.scheme());
        ::tracing::debug!(%server_url, "mock server started");

        Ok(Self {
            server_url,
            socket_addr,
            client,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            certificate_pem: tls_setup.map(|tls_setup| tls_setup.certificate_pem),
            serve_handle,
        })
    }

    /// Returns the base url of the server,
    /// such as `http://127.0.0.1:53412`, without a trailing slash.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn socket_address(&self) -> SocketAddr {
        self.socket_addr
    }

    /// Appends the path to the server url, as is.
    ///
    /// ```rust
    /// # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
    /// #
    /// use ::axum::Router;
    /// use ::http_easy_test::MockServer;
    ///
    /// let server = MockServer::new(Router::new())?;
    /// let url = server.url_for("/users?page=2");
    ///
    /// assert_eq!(url, format!("{}/users?page=2", server.server_url()));
    /// #
    /// # Ok(())
    /// # }
    /// ```
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    /// The client used for all requests.
    ///
    /// When running with TLS, it trusts the server's certificate.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The PEM encoded certificate the server uses, when running with TLS.
    pub fn certificate_pem(&self) -> Option<&str> {
        self.certificate_pem.as_deref()
    }

    /// Adds cookies to be sent with all requests after.
    ///
    /// Only the name and value of each cookie are sent.
    /// Cookies from earlier calls are kept.
    /// A cookie which cannot be written into a header is skipped.
    pub fn add_cookies(&mut self, cookies: &[Cookie<'_>]) {
        self.cookies.extend(sendable_cookies(cookies));

        if let Some(header_value) = build_cookie_header(&self.cookies) {
            self.headers.insert(header::COOKIE, header_value);
        }
    }

    /// Adds a header to be sent with all requests after.
    pub fn add_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// Removes all headers and cookies added to the server.
    pub fn clear_headers(&mut self) {
        self.headers.clear();
        self.cookies.clear();
    }

    #[track_caller]
    pub fn get(&self, path: &str) -> MockResponse {
        self.do_request(Method::GET, path, None, |_| {})
    }

    /// Makes a `GET` request, and asserts it returned `200 OK`.
    #[track_caller]
    pub fn get_and_assert_ok(&self, path: &str) -> MockResponse {
        let response = self.get(path);
        response.assert_status_ok();
        response
    }

    #[track_caller]
    pub fn post<B>(&self, path: &str, content_type: &str, body: B) -> MockResponse
    where
        B: Into<Bytes>,
    {
        self.request_with_content_type(Method::POST, path, content_type, body.into())
    }

    /// Posts the value serialized as `application/x-www-form-urlencoded`.
    #[track_caller]
    pub fn post_form<F>(&self, path: &str, form: &F) -> MockResponse
    where
        F: ?Sized + Serialize,
    {
        let body = match ::serde_urlencoded::to_string(form) {
            Ok(body) => body,
            Err(err) => panic!("Failed to serialize form for POST {path}, {err}"),
        };

        self.post(path, FORM_CONTENT_TYPE, body)
    }

    /// Posts the value serialized as `application/json`.
    #[track_caller]
    pub fn post_json<J>(&self, path: &str, body: &J) -> MockResponse
    where
        J: ?Sized + Serialize,
    {
        let body = match ::serde_json::to_vec(body) {
            Ok(body) => body,
            Err(err) => panic!("Failed to serialize json for POST {path}, {err}"),
        };

        self.post(path, JSON_CONTENT_TYPE, body)
    }

    #[track_caller]
    pub fn post_string(&self, path: &str, content_type: &str, body: &str) -> MockResponse {
        self.post(path, content_type, body.to_string())
    }

    #[track_caller]
    pub fn post_form_data(&self, path: &str, form: MultipartForm) -> MockResponse {
        self.form_data(path, Method::POST, form)
    }

    /// Sends the multipart form, with the method given.
    #[track_caller]
    pub fn form_data(&self, path: &str, method: Method, mut form: MultipartForm) -> MockResponse {
        let content_type = form.content_type();
        let body = match form.export() {
            Ok(body) => body,
            Err(err) => panic!("Failed to build multipart form for {method} {path}, {err}"),
        };

        self.request_with_content_type(method, path, &content_type, body)
    }

    #[track_caller]
    pub fn put<B>(&self, path: &str, content_type: &str, body: B) -> MockResponse
    where
        B: Into<Bytes>,
    {
        self.request_with_content_type(Method::PUT, path, content_type, body.into())
    }

    #[track_caller]
    pub fn delete(&self, path: &str) -> MockResponse {
        self.do_request(Method::DELETE, path, None, |_| {})
    }

    /// Sends a request, with the headers of the server.
    ///
    /// The `header_mutator` can change the headers for just this request.
    ///
    /// # Panics
    ///
    /// If the request cannot be sent, or the response cannot be read.
    #[track_caller]
    pub fn do_request<F>(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        header_mutator: F,
    ) -> MockResponse
    where
        F: FnOnce(&mut HeaderMap<HeaderValue>),
    {
        match self.try_do_request(method, path, body, header_mutator) {
            Ok(response) => response,
            Err(err) => panic!("{err:?}"),
        }
    }

    /// The same as [`MockServer::do_request()`],
    /// returning an error when the request cannot be made.
    pub fn try_do_request<F>(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        header_mutator: F,
    ) -> Result<MockResponse>
    where
        F: FnOnce(&mut HeaderMap<HeaderValue>),
    {
        let url = self.url_for(path);
        let request_description = format!("{method} {url}");

        let mut headers = self.headers.clone();
        header_mutator(&mut headers);

        let mut request_builder = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            request_builder = request_builder.body(body);
        }

        ::tracing::debug!(request = %request_description, "sending mock server request");
        let response = request_builder
            .send()
            .with_context(|| format!("Failed to send request, for {request_description}"))?;

        let status_code = response.status();
        let headers = response.headers().clone();
        let response_body = response
            .bytes()
            .with_context(|| format!("Failed to read response body, for {request_description}"))?;

        Ok(MockResponse::new(
            request_description,
            status_code,
            headers,
            response_body,
        ))
    }

    /// Stops the server, closing its port.
    pub fn close(mut self) {
        self.serve_handle.shutdown();
        ::tracing::debug!(server_url = %self.server_url, "mock server closed");
    }

    /// Returns false once the server has stopped accepting requests.
    pub fn is_running(&self) -> bool {
        self.serve_handle.is_running()
    }

    #[track_caller]
    fn request_with_content_type(
        &self,
        method: Method,
        path: &str,
        content_type: &str,
        body: Bytes,
    ) -> MockResponse {
        let content_type = match HeaderValue::from_str(content_type) {
            Ok(content_type) => content_type,
            Err(err) => panic!("Invalid content type '{content_type}' for {method} {path}, {err}"),
        };

        self.do_request(method, path, Some(body), move |headers| {
            headers.insert(header::CONTENT_TYPE, content_type);
        })
    }
}
