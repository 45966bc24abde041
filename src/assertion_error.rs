use ::http::StatusCode;
use ::std::fmt;
use ::std::fmt::Write;
use ::std::mem;
use ::std::thread;
use ::thiserror::Error;

/// A status code, displayed with its reason phrase where one is known.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatusWithReason(pub StatusCode);

impl fmt::Display for StatusWithReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.0.as_u16();

        match self.0.canonical_reason() {
            Some(reason) => write!(f, "{code} ({reason})"),
            None => write!(f, "{code}"),
        }
    }
}

/// A mismatch found by one of the `check_*` functions on
/// [`MockResponse`](crate::MockResponse) or [`MockRequest`](crate::MockRequest).
///
/// The `assert_*` counterparts panic with the same message instead.
#[derive(Debug, Clone, Error)]
pub enum AssertionError {
    #[error("Expected status code {expected}, received {received}, for request {request}")]
    Status {
        request: String,
        expected: StatusWithReason,
        received: StatusWithReason,
    },

    #[error("Expected status code {expectation}, received {received}, for request {request}")]
    StatusRange {
        request: String,
        expectation: &'static str,
        received: StatusWithReason,
    },

    #[error("Expected body '{expected}', received {received}, for request {request}")]
    Body {
        request: String,
        expected: String,
        received: String,
    },

    #[error("Expected JSON {expected}, received {received}, for request {request}")]
    Json {
        request: String,
        expected: String,
        received: String,
    },
}

///
/// Collects the results of many `check_*` calls,
/// so a test can report every mismatch at once rather than stopping at the first.
///
/// Failures are reported by [`Checks::finish()`].
/// Dropping a `Checks` which still holds failures panics in the same way.
///
/// ```rust
/// use ::http::Method;
/// use ::http::StatusCode;
/// use ::http_easy_test::Checks;
/// use ::http_easy_test::MockRequest;
///
/// let mock = MockRequest::new("/", Method::GET, "").unwrap();
/// let response = mock.response();
///
/// let mut checks = Checks::new();
/// checks.add(response.check_status(StatusCode::OK));
/// checks.add(response.check_text(""));
/// checks.finish();
/// ```
///
#[derive(Debug, Default)]
#[must_use = "call `finish` to report the failures collected"]
pub struct Checks {
    failures: Vec<AssertionError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: Result<(), AssertionError>) {
        if let Err(failure) = result {
            self.failures.push(failure);
        }
    }

    pub fn failures(&self) -> &[AssertionError] {
        &self.failures
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Hands back the failures collected, without panicking.
    pub fn into_failures(mut self) -> Vec<AssertionError> {
        mem::take(&mut self.failures)
    }

    /// Panics listing every failure collected, if there were any.
    #[track_caller]
    pub fn finish(mut self) {
        let failures = mem::take(&mut self.failures);
        if let Some(message) = failures_message(&failures) {
            panic!("{message}");
        }
    }
}

/// A `Checks` with failures that is never finished still fails the test.
impl Drop for Checks {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        if let Some(message) = failures_message(&self.failures) {
            panic!("{message}");
        }
    }
}

fn failures_message(failures: &[AssertionError]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }

    let mut message = format!("{} check(s) failed:", failures.len());
    for failure in failures {
        let _ = write!(message, "\n  - {failure}");
    }

    Some(message)
}
