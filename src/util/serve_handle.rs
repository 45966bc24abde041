use ::std::time::Duration;
use ::tokio::runtime::Runtime;
use ::tokio::task::JoinHandle;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Owns the runtime a mock server runs on.
///
/// Dropping it stops the server, and closes every connection it holds.
#[derive(Debug)]
pub(crate) struct ServeHandle {
    server_handle: Option<JoinHandle<()>>,
    runtime: Option<Runtime>,
}

impl ServeHandle {
    pub(crate) fn new(runtime: Runtime, server_handle: JoinHandle<()>) -> Self {
        Self {
            server_handle: Some(server_handle),
            runtime: Some(runtime),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.server_handle
            .as_ref()
            .is_some_and(|server_handle| !server_handle.is_finished())
    }

    pub(crate) fn shutdown(&mut self) {
        if let Some(server_handle) = self.server_handle.take() {
            server_handle.abort();
        }

        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
        }
    }
}

impl Drop for ServeHandle {
    fn drop(&mut self) {
        self.shutdown()
    }
}
