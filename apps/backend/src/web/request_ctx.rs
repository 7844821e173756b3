//! Task-local request context.
//!
//! Provides a minimal API for accessing the current request's trace id and
//! path from anywhere in the request processing pipeline, most importantly
//! from the error boundary, which has no access to the originating request
//! when it renders the error envelope. Uses Tokio's task-local storage,
//! scoped around the downstream service future by `RequestTrace`.

use std::cell::RefCell;

use tokio::task_local;

#[derive(Debug, Clone)]
struct RequestCtx {
    trace_id: String,
    path: String,
}

task_local! {
    static REQUEST_CTX: RefCell<Option<RequestCtx>>;
}

/// Get the trace id for the current task.
/// Returns "unknown" outside of a request context.
pub fn trace_id() -> String {
    REQUEST_CTX
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .map(|ctx| ctx.trace_id.clone())
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Get the request path for the current task.
/// Returns "unknown" outside of a request context.
pub fn path() -> String {
    REQUEST_CTX
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .map(|ctx| ctx.path.clone())
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run a future within a request context.
/// Used by the `RequestTrace` middleware to establish the task-local scope.
pub async fn with_request_ctx<F, R>(trace_id: String, path: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    REQUEST_CTX
        .scope(RefCell::new(Some(RequestCtx { trace_id, path })), future)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ctx_outside_context() {
        assert_eq!(trace_id(), "unknown");
        assert_eq!(path(), "unknown");
    }

    #[tokio::test]
    async fn test_ctx_within_context() {
        let result = with_request_ctx("trace-123".to_string(), "/students".to_string(), async {
            assert_eq!(trace_id(), "trace-123");
            assert_eq!(path(), "/students");
            "done"
        })
        .await;

        assert_eq!(result, "done");
        assert_eq!(trace_id(), "unknown");
        assert_eq!(path(), "unknown");
    }
}
