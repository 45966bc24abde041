use ::bytes::Bytes;
use ::futures::TryStreamExt;
use ::futures::executor::block_on;
use ::futures::future::ready;
use ::rust_multipart_rfc7578_2::client::multipart::Body as MultipartBody;
use ::rust_multipart_rfc7578_2::client::multipart::Form;
use ::std::fmt::Display;
use ::std::io::Cursor;
use ::std::io::Read;
use ::std::path::Path;

use crate::Error;
use crate::Result;
use crate::multipart::Part;

/// An in memory `multipart/form-data` body.
///
/// The boundary is picked when the form is created,
/// so [`MultipartForm::content_type()`] is valid straight away.
/// Once [`MultipartForm::export()`] has been called the form is finalized,
/// and any further inserts or exports return [`Error::AlreadyFinalized`].
pub struct MultipartForm {
    inner: Option<Form<'static>>,
    content_type: String,
}

impl MultipartForm {
    pub fn new() -> Self {
        let inner = Form::default();
        let content_type = inner.content_type();

        Self {
            inner: Some(inner),
            content_type,
        }
    }

    /// Adds a text field.
    ///
    /// Field names do not need to be unique.
    /// Repeated names are sent as separate parts, in the order they were inserted.
    pub fn insert_field<N, T>(&mut self, name: N, text: T) -> Result<()>
    where
        N: Display,
        T: ToString,
    {
        self.form_mut()?.add_text(name, text.to_string());
        Ok(())
    }

    /// Adds the file at the path given.
    ///
    /// The file name sent is the base name of the path,
    /// and the content type is always `application/octet-stream`.
    /// Use [`MultipartForm::insert_part()`] to send another type.
    pub fn insert_file<N, P>(&mut self, name: N, path: P) -> Result<()>
    where
        N: Display,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let bytes = ::std::fs::read(path)?;

        let mut part = Part::bytes(bytes);
        if let Some(file_name) = path.file_name() {
            part = part.file_name(file_name.to_string_lossy());
        }

        self.insert_part(name, part)
    }

    /// Adds a file part, with the contents read out of the reader given.
    pub fn insert_reader<N, F, R>(&mut self, name: N, file_name: F, mut reader: R) -> Result<()>
    where
        N: Display,
        F: Display,
        R: Read,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        self.insert_part(name, Part::bytes(bytes).file_name(file_name))
    }

    /// Adds a new section to this multipart form.
    ///
    /// See [`Part`](crate::multipart::Part).
    pub fn insert_part<N>(&mut self, name: N, part: Part) -> Result<()>
    where
        N: Display,
    {
        let reader = Cursor::new(part.bytes);
        self.form_mut()?
            .add_reader_2(
                name,
                reader,
                part.file_name,
                Some(part.mime_type),
                part.headers,
            );

        Ok(())
    }

    /// Writes the closing boundary, and returns the whole body.
    pub fn export(&mut self) -> Result<Bytes> {
        let form = self.inner.take().ok_or(Error::AlreadyFinalized)?;
        let body: MultipartBody<'static> = form.into();

        let buffer = block_on(body.try_fold(Vec::new(), |mut buffer, chunk| {
            buffer.extend_from_slice(&chunk);
            ready(Ok(buffer))
        }))
        .map_err(|err| Error::encoding("multipart form", err))?;

        Ok(buffer.into())
    }

    /// Returns `multipart/form-data; boundary=<boundary>`,
    /// the content type to send alongside the exported body.
    pub fn content_type(&self) -> String {
        self.content_type.clone()
    }

    pub fn is_exported(&self) -> bool {
        self.inner.is_none()
    }

    fn form_mut(&mut self) -> Result<&mut Form<'static>> {
        self.inner.as_mut().ok_or(Error::AlreadyFinalized)
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ::std::fmt::Debug for MultipartForm {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.debug_struct("MultipartForm")
            .field("content_type", &self.content_type)
            .field("is_exported", &self.is_exported())
            .finish()
    }
}


#[cfg(test)]
mod test_insert_file {
    use super::*;

    #[test]
    fn it_should_send_base_name_of_file() {
        let mut form = MultipartForm::new();
        form.insert_file("file", concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"))
            .unwrap();

        let body = form.export().unwrap();
        let text = String::from_utf8_lossy(&body);

        assert!(text.contains(r#"name="file"; filename="Cargo.toml""#));
        assert!(text.contains("application/octet-stream"));
    }

    #[test]
    fn it_should_error_for_missing_file() {
        let mut form = MultipartForm::new();

        let result = form.insert_file("file", "/this/file/does/not/exist.txt");

        assert!(matches!(result, Err(Error::Io(_))));
    }
}

#[cfg(test)]
mod test_insert_reader {
    use super::*;

    #[test]
    fn it_should_send_contents_of_reader() {
        let mut form = MultipartForm::new();
        form.insert_reader("upload", "notes.txt", "some notes".as_bytes())
            .unwrap();

        let body = form.export().unwrap();
        let text = String::from_utf8_lossy(&body);

        assert!(text.contains(r#"filename="notes.txt""#));
        assert!(text.contains("some notes"));
    }
}

#[cfg(test)]
mod test_insert_part {
    use super::*;
    use ::http::HeaderName;
    use ::http::HeaderValue;

    #[test]
    fn it_should_send_mime_type_and_headers_of_part() {
        let part = Part::bytes(b"<svg/>".as_slice())
            .file_name("image.svg")
            .mime_type(mime::IMAGE_SVG)
            .add_header(
                HeaderName::from_static("x-image-category"),
                HeaderValue::from_static("icon"),
            );
        let mut form = MultipartForm::new();
        form.insert_part("image", part).unwrap();

        let body = form.export().unwrap();
        let text = String::from_utf8_lossy(&body).to_lowercase();

        assert!(text.contains("content-type: image/svg+xml"));
        assert!(text.contains("x-image-category: icon"));
        assert!(text.contains("<svg/>"));
    }
}
