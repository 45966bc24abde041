//!
//! HTTP Easy Test is a library for testing http handlers, without the boilerplate:
//!
//!  * Build a [`MockRequest`] and call a handler (or a whole [`Router`](::axum::Router)) directly,
//!  * or run the handler in a [`MockServer`], over real http or https,
//!  * then assert on the [`MockResponse`] you get back.
//!
//! It includes building `multipart/form-data` bodies, JSON and form bodies,
//! cookies, and the assertions you would expect on status codes and bodies.
//!
//! All of it is synchronous. Handlers are called on the test's own thread,
//! and the `MockServer` runs on a runtime it owns.
//!
//! ## Calling a handler directly
//!
//! Handlers are functions taking the request, and a [`ResponseRecorder`] to write the response into:
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
//! #
//! use ::bytes::Bytes;
//! use ::http_easy_test::MockRequest;
//! use ::http_easy_test::ResponseRecorder;
//! use ::http_easy_test::http::Method;
//! use ::http_easy_test::http::Request;
//! use ::serde_json::json;
//!
//! fn route_echo(request: &Request<Bytes>, recorder: &mut ResponseRecorder) {
//!     recorder.write_body(request.body());
//! }
//!
//! let mut mock = MockRequest::json("/", Method::POST, &json!({ "nya": "hoge" }))?;
//! mock.invoke(&route_echo);
//!
//! mock.assert_status_ok();
//! mock.assert_json(&json!({ "nya": "hoge" }));
//! #
//! # Ok(())
//! # }
//! ```
//!
//! ## Running a server
//!
//! The same handler can be served with [`handler_router`],
//! or any Axum `Router` can be given directly:
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
//! #
//! use ::axum::Router;
//! use ::axum::routing::get;
//! use ::http_easy_test::MockServer;
//!
//! let app = Router::new()
//!     .route("/ping", get(|| async { "pong!" }));
//!
//! let server = MockServer::new_tls(app)?;
//!
//! server.get_and_assert_ok("/ping").assert_text("pong!");
//! #
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! ### Pretty Assertions
//!
//! **On by default**, uses the [Pretty Assertions](https://crates.io/crates/pretty_assertions)
//! crate for the output of the `assert_*` functions.
//!

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub(crate) mod internals;

pub mod multipart;

mod util;

mod error;
pub use self::error::*;

mod assertion_error;
pub use self::assertion_error::*;

mod handler;
pub use self::handler::*;

mod response_recorder;
pub use self::response_recorder::*;

mod mock_request;
pub use self::mock_request::*;

mod mock_response;
pub use self::mock_response::*;

mod mock_server_config_builder;
pub use self::mock_server_config_builder::*;

mod mock_server_config;
pub use self::mock_server_config::*;

mod mock_server;
pub use self::mock_server::*;

pub use ::cookie;
pub use ::http;
