use ::anyhow::Context;
use ::anyhow::Result;
use ::rcgen::CertifiedKey;
use ::rcgen::generate_simple_self_signed;
use ::rustls::ServerConfig;
use ::rustls::pki_types::PrivateKeyDer;
use ::rustls::pki_types::PrivatePkcs8KeyDer;
use ::std::net::IpAddr;
use ::std::sync::Arc;
use ::tokio_rustls::TlsAcceptor;

const HTTP_1_1_ALPN: &[u8] = b"http/1.1";

/// A freshly generated self-signed certificate,
/// and the server side TLS setup that uses it.
///
/// Clients must trust `certificate_pem` to talk to the server.
pub struct TlsSetup {
    pub acceptor: TlsAcceptor,
    pub certificate_pem: String,
}

impl TlsSetup {
    /// The certificate is valid for `localhost`, and for the IP given.
    pub fn new_self_signed(ip: IpAddr) -> Result<Self> {
        let subject_alt_names = vec!["localhost".to_string(), ip.to_string()];
        let CertifiedKey { cert, key_pair } = generate_simple_self_signed(subject_alt_names)
            .context("Failed to generate self-signed certificate")?;

        let private_key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
        let provider = Arc::new(::rustls::crypto::ring::default_provider());

        let mut server_config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .context("Failed to pick TLS protocol versions")?
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], private_key)
            .context("Failed to build TLS server config")?;
        server_config.alpn_protocols = vec![HTTP_1_1_ALPN.to_vec()];

        Ok(Self {
            acceptor: TlsAcceptor::from(Arc::new(server_config)),
            certificate_pem: cert.pem(),
        })
    }
}
