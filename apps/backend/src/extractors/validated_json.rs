use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::debug;

use crate::error::AppError;
use crate::web::request_ctx;

/// JSON body extractor whose failures speak the API's error envelope.
///
/// Unlike `web::Json`, parse failures become a 400 with a sanitized
/// message in the `errors` array instead of actix's default plain-text
/// body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let path = req.path().to_string();
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    debug!(trace_id = %request_ctx::trace_id(), error = %e, "failed to read request body");
                    AppError::invalid("failed to read request body").with_path(path.clone())
                })?;
                body.extend_from_slice(&chunk);
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                let detail = classify_json_error(&e);
                debug!(
                    trace_id = %request_ctx::trace_id(),
                    body_size = body.len(),
                    "JSON parsing failed"
                );
                AppError::invalid(detail).with_path(path.clone())
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Turn a serde_json error into a client-safe message. Raw serde output
/// can echo body contents, so only the category and position survive.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "invalid JSON: missing or mistyped fields".to_string()
        }
        serde_json::error::Category::Io => "invalid JSON: failed to read body".to_string(),
    }
}
