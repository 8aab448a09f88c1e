use crate::common::Responder;
use crate::config::AppConfig;
use crate::di::Container;
use crate::error::Result;
use crate::exception::{
    AuthenticationException, AuthorizationException, Category, Classifier, ExceptionFilter,
    HttpException, ModelNotFoundException, RequestContext, ThrottleRequestsException, Throwable,
    ValidationException, classify,
};
use crate::lang::{MessageCatalog, Translator};
use crate::log::{ExceptionLogger, LogContext};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;

/// Application exception handler.
///
/// Reports every error to the logger, then renders the problem envelope for
/// JSON clients and a plain-text page for everyone else.
pub struct Handler {
    classifier: Classifier,
    logger: Option<Arc<dyn ExceptionLogger>>,
}

impl Handler {
    pub fn new(classifier: Classifier, logger: Option<Arc<dyn ExceptionLogger>>) -> Self {
        Self { classifier, logger }
    }

    /// Builds a handler from container bindings.
    ///
    /// The logger binding is optional; config and catalog are not.
    pub fn from_container(container: &Container) -> Result<Self> {
        let config = container.make::<AppConfig>()?;
        let catalog = container.make::<MessageCatalog>()?;
        let logger = container.make::<dyn ExceptionLogger>().ok();

        let translator = Translator::new(catalog, config.locale.clone())?;
        let production = config.environment.is_production();
        let classifier = Classifier::new(Responder::new(translator), production);
        Ok(Self::new(classifier, logger))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn render(&self, exception: &Throwable, request: &RequestContext) -> Response {
        let category = classify(exception);
        self.report(exception, &category, request);

        if request.expects_json {
            self.classifier.problem(exception).into_response()
        } else {
            render_fallback(exception)
        }
    }

    fn report(&self, exception: &Throwable, category: &Category<'_>, request: &RequestContext) {
        let Some(logger) = &self.logger else {
            return;
        };

        let mut context = LogContext::new();
        context.insert("exception".into(), Value::from(exception.class_name()));
        context.insert("category".into(), Value::from(category.name()));
        context.insert("method".into(), Value::from(request.method.as_str()));
        context.insert("uri".into(), Value::from(request.uri.to_string()));
        if let Some(tenant_id) = &request.tenant_id {
            context.insert("tenant_id".into(), Value::from(tenant_id.as_str()));
        }

        // A broken sink must not replace the response for the original error.
        let _ = logger.error(&exception.message(), exception, &context);
    }
}

impl ExceptionFilter for Handler {
    fn catch(&self, exception: &Throwable, request: &RequestContext) -> Response {
        self.render(exception, request)
    }
}

/// Plain-text page for clients that did not ask for JSON.
pub fn render_fallback(exception: &Throwable) -> Response {
    let status = fallback_status(exception);
    let reason = status.canonical_reason().unwrap_or("Error");
    (status, reason).into_response()
}

pub fn fallback_status(exception: &Throwable) -> HttpStatusCode {
    if exception.is::<ThrottleRequestsException>() {
        HttpStatusCode::TOO_MANY_REQUESTS
    } else if exception.is::<ValidationException>() {
        HttpStatusCode::UNPROCESSABLE_ENTITY
    } else if exception.is::<ModelNotFoundException>() {
        HttpStatusCode::NOT_FOUND
    } else if exception.is::<AuthorizationException>() {
        HttpStatusCode::FORBIDDEN
    } else if exception.is::<AuthenticationException>() {
        HttpStatusCode::UNAUTHORIZED
    } else if let Some(http) = exception.downcast_ref::<HttpException>() {
        http.kind().status()
    } else {
        HttpStatusCode::INTERNAL_SERVER_ERROR
    }
}
