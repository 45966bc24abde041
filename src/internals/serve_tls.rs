use ::axum::Router;
use ::axum::extract::ConnectInfo;
use ::hyper::Request;
use ::hyper::body::Incoming;
use ::hyper::server::conn::http1;
use ::hyper::service::service_fn;
use ::hyper_util::rt::TokioIo;
use ::tokio::net::TcpListener;
use ::tokio_rustls::TlsAcceptor;
use ::tower::ServiceExt;

/// Serves the `Router` over TLS, one task per connection.
///
/// Each request carries the peer address as a `ConnectInfo` extension,
/// the same as `axum::serve` does for plain http.
pub async fn serve_tls(listener: TcpListener, acceptor: TlsAcceptor, app: Router) {
    loop {
        let (tcp_stream, remote_address) = match listener.accept().await {
            Ok(connection) => connection,
            Err(err) => {
                ::tracing::warn!(error = %err, "failed to accept tls connection");
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let app = app.clone();

        ::tokio::spawn(async move {
            let tls_stream = match acceptor.accept(tcp_stream).await {
                Ok(tls_stream) => tls_stream,
                Err(err) => {
                    ::tracing::debug!(%remote_address, error = %err, "tls handshake failed");
                    return;
                }
            };

            let service = service_fn(move |mut request: Request<Incoming>| {
                request
                    .extensions_mut()
                    .insert(ConnectInfo(remote_address));

                app.clone().oneshot(request)
            });

            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(tls_stream), service)
                .await
            {
                ::tracing::debug!(%remote_address, error = %err, "tls connection closed with error");
            }
        });
    }
}
