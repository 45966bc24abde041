mod cookie_header;
pub use self::cookie_header::*;

mod debug_response_body;
pub use self::debug_response_body::*;

mod request_path;
pub use self::request_path::*;

mod tls_setup;
pub use self::tls_setup::*;

mod serve_tls;
pub use self::serve_tls::*;
