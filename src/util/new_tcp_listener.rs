use ::anyhow::Context;
use ::anyhow::Result;
use ::reserve_port::ReservedPort;
use ::std::net::IpAddr;
use ::std::net::Ipv4Addr;
use ::std::net::SocketAddr;
use ::std::net::TcpListener;

pub(crate) const DEFAULT_IP_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Binds a non-blocking `TcpListener`, ready to be handed to tokio.
///
/// Without a port, a random port is reserved on the IP given
/// (or 127.0.0.1 when no IP is given).
pub(crate) fn new_tcp_listener(
    ip: Option<IpAddr>,
    port: Option<u16>,
) -> Result<(TcpListener, SocketAddr)> {
    let ip = ip.unwrap_or(DEFAULT_IP_ADDRESS);

    let (tcp_listener, socket_addr) = match port {
        Some(port) => {
            let socket_addr = SocketAddr::new(ip, port);
            let tcp_listener = TcpListener::bind(socket_addr)
                .with_context(|| format!("Failed to bind to {socket_addr}"))?;

            (tcp_listener, socket_addr)
        }
        None => ReservedPort::random_permanently_reserved_tcp(ip)
            .with_context(|| format!("Failed to reserve a random port on {ip}"))?,
    };

    tcp_listener
        .set_nonblocking(true)
        .context("Failed to set listener as non-blocking")?;

    Ok((tcp_listener, socket_addr))
}
