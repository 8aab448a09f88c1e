use axum::http::{Method, Request, Uri};
use axum::response::Response;

pub mod classifier;
pub mod handler;
pub mod layer;
pub mod negotiation;
mod throwable;
mod title;
mod types;

pub use classifier::{Category, Classifier, classify};
pub use handler::Handler;
pub use layer::{ExceptionLayer, ExceptionMiddleware};
pub use negotiation::expects_json;
pub use throwable::{CaughtException, Throwable, class_basename};
pub use title::title_from_class;
pub use types::{
    AuthenticationException, AuthorizationException, HttpException, HttpExceptionKind,
    ModelNotFoundException, QueryException, ThrottleRequestsException, ValidationException,
};

/// What the exception handler knows about the failed request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub expects_json: bool,
    pub method: Method,
    pub uri: Uri,
    pub tenant_id: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            expects_json: expects_json(request.headers()),
            method: request.method().clone(),
            uri: request.uri().clone(),
            tenant_id: request
                .extensions()
                .get::<crate::tenancy::CurrentTenant>()
                .map(|tenant| tenant.id().to_string()),
        }
    }

    /// A JSON-expecting context, for rendering outside a request.
    pub fn json() -> Self {
        Self {
            expects_json: true,
            ..Self::default()
        }
    }
}

/// The ExceptionFilter trait
///
/// Filters turn errors raised during request processing into a response.
/// They are terminal: every error maps to exactly one response.
pub trait ExceptionFilter: Send + Sync + 'static {
    fn catch(&self, exception: &Throwable, request: &RequestContext) -> Response;
}
