mod new_tcp_listener;
pub(crate) use self::new_tcp_listener::*;

mod serve_handle;
pub(crate) use self::serve_handle::*;
