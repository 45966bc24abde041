use ::std::net::IpAddr;

use crate::MockServerConfig;

/// This is for easing the building of [`MockServerConfig`](crate::MockServerConfig).
///
/// For full documentation see there.
///
/// ```rust
/// # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
/// #
/// use ::bytes::Bytes;
/// use ::http_easy_test::MockServer;
/// use ::http_easy_test::MockServerConfig;
/// use ::http_easy_test::ResponseRecorder;
/// use ::http_easy_test::handler_router;
/// use ::http_easy_test::http::Request;
///
/// let app = handler_router(|_: &Request<Bytes>, recorder: &mut ResponseRecorder| {
///     recorder.write_body("hello");
/// });
/// let config = MockServerConfig::builder()
///     .tls()
///     .build();
///
/// let server = MockServer::new_with_config(app, config)?;
/// assert!(server.server_url().starts_with("https://"));
/// #
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockServerConfigBuilder {
    config: MockServerConfig,
}

impl MockServerConfigBuilder {
    pub fn tls(mut self) -> Self {
        self.config.tls = true;
        self
    }

    pub fn http(mut self) -> Self {
        self.config.tls = false;
        self
    }

    pub fn ip(mut self, ip: IpAddr) -> Self {
        self.config.ip = Some(ip);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    pub fn build(self) -> MockServerConfig {
        self.config
    }
}
