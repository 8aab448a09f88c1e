use crate::exception::{
    CaughtException, ExceptionFilter, HttpException, HttpExceptionKind, RequestContext, Throwable,
};
use crate::tenancy::CurrentTenant;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

const MAX_MESSAGE_BYTES: usize = 16 * 1024;

/// Tower Layer that renders raised errors through an [`ExceptionFilter`].
///
/// Handlers raise by returning a [`Throwable`] as their error. For clients
/// expecting JSON, error statuses axum produces itself (unmatched routes,
/// disallowed methods, extractor rejections) are raised as the matching
/// [`HttpException`]. Other responses pass through untouched.
#[derive(Clone)]
pub struct ExceptionLayer {
    filter: Arc<dyn ExceptionFilter>,
}

impl ExceptionLayer {
    pub fn new(filter: Arc<dyn ExceptionFilter>) -> Self {
        Self { filter }
    }
}

impl<S> Layer<S> for ExceptionLayer {
    type Service = ExceptionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            filter: self.filter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionMiddleware<S> {
    inner: S,
    filter: Arc<dyn ExceptionFilter>,
}

impl<S> Service<Request<Body>> for ExceptionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let mut context = RequestContext::from_request(&request);
        let filter = self.filter.clone();
        // Call the instance poll_ready was driven on, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(request).await?;

            // Tenancy middleware inside this layer hands the tenant back on the response.
            if context.tenant_id.is_none() {
                context.tenant_id = response
                    .extensions()
                    .get::<CurrentTenant>()
                    .map(|tenant| tenant.id().to_string());
            }

            let exception = match response.extensions().get::<CaughtException>() {
                Some(CaughtException(exception)) => exception.clone(),
                None if context.expects_json && is_unrendered_error(&response) => {
                    Arc::new(raise_from_response(response).await)
                }
                None => return Ok(response),
            };
            Ok(filter.catch(&exception, &context))
        })
    }
}

/// An error status produced outside a handler: unmatched route, wrong method or
/// an extractor rejection. JSON bodies are assumed to be rendered already.
fn is_unrendered_error(response: &Response) -> bool {
    let json_body = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"));
    !json_body && HttpExceptionKind::from_status(response.status()).is_some()
}

/// Rebuild the error behind a plain framework response, keeping its body text
/// as the message.
async fn raise_from_response(response: Response) -> Throwable {
    let status = response.status();
    let kind = HttpExceptionKind::from_status(status).unwrap_or(HttpExceptionKind::BadRequest);
    let message = axum::body::to_bytes(response.into_body(), MAX_MESSAGE_BYTES)
        .await
        .ok()
        .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
    Throwable::new(HttpException::new(kind, message))
}
