use ::std::net::IpAddr;

use crate::MockServerConfigBuilder;

/// The setup for a [`MockServer`](crate::MockServer).
///
/// The default is a plain http server, on 127.0.0.1, using a random port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockServerConfig {
    /// Serve over https, using a self-signed certificate.
    /// The server's client is set up to trust that certificate.
    ///
    /// **Defaults** to false.
    pub tls: bool,

    /// The IP to bind the server to.
    ///
    /// **Defaults** to 127.0.0.1.
    pub ip: Option<IpAddr>,

    /// The port to bind the server to.
    ///
    /// **Defaults** to a _random_ free port.
    pub port: Option<u16>,
}

impl MockServerConfig {
    /// Creates a default `MockServerConfig`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a builder for making it simpler to build configs.
    ///
    /// ```rust
    /// use ::http_easy_test::MockServerConfig;
    ///
    /// let config = MockServerConfig::builder()
    ///     .tls()
    ///     .build();
    /// ```
    pub fn builder() -> MockServerConfigBuilder {
        MockServerConfigBuilder::default()
    }

    pub(crate) fn scheme(&self) -> &'static str {
        if self.tls { "https" } else { "http" }
    }
}
