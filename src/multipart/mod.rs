//!
//! This supplies the building blocks for sending `multipart/form-data` bodies,
//! using [`MockRequest::form_data()`](crate::MockRequest::form_data()) or
//! [`MockServer::post_form_data()`](crate::MockServer::post_form_data()).
//!
//! The request body is built using [`MultipartForm`] and [`Part`].
//!
//! # Simple example
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
//! #
//! use ::http::Method;
//! use ::http_easy_test::MockRequest;
//! use ::http_easy_test::multipart::MultipartForm;
//!
//! let mut form = MultipartForm::new();
//! form.insert_field("name", "Joe")?;
//! form.insert_field("animals", "foxes")?;
//!
//! let request = MockRequest::form_data("/my-form", Method::POST, form)?;
//! #
//! # Ok(()) }
//! ```
//!
//! # Sending files
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn ::std::error::Error>> {
//! #
//! use ::http_easy_test::multipart::MultipartForm;
//! use ::http_easy_test::multipart::Part;
//!
//! let mut form = MultipartForm::new();
//!
//! // Sent as `application/octet-stream`, with the file name `README.md`.
//! form.insert_file("file", "README.md")?;
//!
//! // Or with a type of your choosing.
//! let readme_part = Part::bytes(include_bytes!("../../Cargo.toml").as_slice())
//!     .file_name("Cargo.toml")
//!     .mime_type(::mime::TEXT_PLAIN);
//! form.insert_part("manifest", readme_part)?;
//!
//! let body = form.export()?;
//! #
//! # Ok(()) }
//! ```
//!

mod multipart_form;
pub use self::multipart_form::*;

mod part;
pub use self::part::*;
