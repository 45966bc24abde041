use ::bytes::Bytes;
use ::http::HeaderName;
use ::http::HeaderValue;
use ::mime::Mime;
use ::std::fmt::Display;

///
/// For creating a section of a [`MultipartForm`](crate::multipart::MultipartForm).
///
/// Use [`Part::text()`](crate::multipart::Part::text()) and [`Part::bytes()`](crate::multipart::Part::bytes()) for creating new instances.
/// Then attach them to a `MultipartForm` using [`MultipartForm::insert_part()`](crate::multipart::MultipartForm::insert_part()).
///
#[derive(Debug, Clone)]
pub struct Part {
    pub(crate) bytes: Bytes,
    pub(crate) file_name: Option<String>,
    pub(crate) mime_type: Mime,
    pub(crate) headers: Vec<(HeaderName, HeaderValue)>,
}

impl Part {
    /// Creates a new part of a multipart form, that will send text.
    ///
    /// The default mime type for this part will be `text/plain`,
    pub fn text<T>(text: T) -> Self
    where
        T: Display,
    {
        let bytes = text.to_string().into_bytes().into();

        Self::new(bytes, mime::TEXT_PLAIN)
    }

    /// Creates a new part of a multipart form, that will upload bytes.
    ///
    /// The default mime type for this part will be `application/octet-stream`.
    /// This is also the type used for every file inserted with
    /// [`MultipartForm::insert_file()`](crate::multipart::MultipartForm::insert_file()).
    pub fn bytes<B>(bytes: B) -> Self
    where
        B: Into<Bytes>,
    {
        Self::new(bytes.into(), mime::APPLICATION_OCTET_STREAM)
    }

    fn new(bytes: Bytes, mime_type: Mime) -> Self {
        Self {
            bytes,
            file_name: None,
            mime_type,
            headers: Vec::new(),
        }
    }

    /// Sets the file name for this part of a multipart form.
    ///
    /// By default there is no filename. This will set one.
    pub fn file_name<T>(mut self, file_name: T) -> Self
    where
        T: Display,
    {
        self.file_name = Some(file_name.to_string());
        self
    }

    /// Replaces the mime type for this part of a multipart form.
    pub fn mime_type(mut self, mime_type: Mime) -> Self {
        self.mime_type = mime_type;
        self
    }

    /// Adds a header to this part, sent after its `Content-Disposition` and `Content-Type`.
    ///
    /// ```rust
    /// use ::http::HeaderName;
    /// use ::http::HeaderValue;
    /// use ::http_easy_test::multipart::Part;
    ///
    /// let readme_part = Part::bytes(b"# Readme".as_slice())
    ///     .file_name("README.md")
    ///     .add_header(
    ///         HeaderName::from_static("x-text-category"),
    ///         HeaderValue::from_static("readme"),
    ///     );
    /// ```
    pub fn add_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }
}

#[cfg(test)]
mod test_text {
    use super::*;

    #[test]
    fn it_should_contain_text_given() {
        let part = Part::text("日本語");

        let output = String::from_utf8_lossy(&part.bytes);
        assert_eq!(output, "日本語");
    }

    #[test]
    fn it_should_use_mime_type_text() {
        let part = Part::text("some_text");
        assert_eq!(part.mime_type, mime::TEXT_PLAIN);
    }
}


#[cfg(test)]
mod test_file_name {
    use super::*;

    #[test]
    fn it_should_have_no_file_name_by_default() {
        let part = Part::bytes("some_text".as_bytes());

        assert_eq!(part.file_name, None);
    }

    #[test]
    fn it_should_use_file_name_given() {
        let part = Part::text("some_text").file_name("my-text.txt");

        assert_eq!(part.file_name, Some("my-text.txt".to_string()));
    }
}

#[cfg(test)]
mod test_mime_type {
    use super::*;

    #[test]
    fn it_should_replace_mime_type() {
        let part = Part::bytes("{}".as_bytes()).mime_type(mime::APPLICATION_JSON);

        assert_eq!(part.mime_type, mime::APPLICATION_JSON);
    }
}

#[cfg(test)]
mod test_add_header {
    use super::*;

    #[test]
    fn it_should_have_no_headers_by_default() {
        let part = Part::text("some_text");

        assert!(part.headers.is_empty());
    }

    #[test]
    fn it_should_keep_headers_in_order_added() {
        let part = Part::text("some_text")
            .add_header(
                HeaderName::from_static("x-first"),
                HeaderValue::from_static("1"),
            )
            .add_header(
                HeaderName::from_static("x-second"),
                HeaderValue::from_static("2"),
            );

        let names: Vec<_> = part.headers.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["x-first", "x-second"]);
    }
}
