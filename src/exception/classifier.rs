use crate::common::{ProblemDocument, Responder, StatusCode};
use crate::exception::{
    AuthenticationException, AuthorizationException, HttpException, HttpExceptionKind,
    ModelNotFoundException, QueryException, ThrottleRequestsException, Throwable,
    ValidationException, class_basename, title_from_class,
};
use crate::lang::MessageKey;
use serde_json::Value;

/// What kind of failure a raised error represents.
#[derive(Debug)]
pub enum Category<'a> {
    TooManyRequests(&'a ThrottleRequestsException),
    Validation(&'a ValidationException),
    ModelNotFound(&'a ModelNotFoundException),
    Query(&'a QueryException),
    Authorization(&'a AuthorizationException),
    Authentication(&'a AuthenticationException),
    NotFound(&'a HttpException),
    UnprocessableEntity(&'a HttpException),
    BadRequest(&'a HttpException),
    NotAcceptable(&'a HttpException),
    Conflict(&'a HttpException),
    Unclassified,
}

impl Category<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Category::TooManyRequests(_) => "too_many_requests",
            Category::Validation(_) => "validation",
            Category::ModelNotFound(_) => "model_not_found",
            Category::Query(_) => "query",
            Category::Authorization(_) => "authorization",
            Category::Authentication(_) => "authentication",
            Category::NotFound(_) => "not_found",
            Category::UnprocessableEntity(_) => "unprocessable_entity",
            Category::BadRequest(_) => "bad_request",
            Category::NotAcceptable(_) => "not_acceptable",
            Category::Conflict(_) => "conflict",
            Category::Unclassified => "unclassified",
        }
    }
}

/// Sorts an error into its category. First match wins.
pub fn classify(exception: &Throwable) -> Category<'_> {
    if let Some(e) = exception.downcast_ref::<ThrottleRequestsException>() {
        return Category::TooManyRequests(e);
    }
    if let Some(e) = exception.downcast_ref::<ValidationException>() {
        return Category::Validation(e);
    }
    if let Some(e) = exception.downcast_ref::<ModelNotFoundException>() {
        return Category::ModelNotFound(e);
    }
    if let Some(e) = exception.downcast_ref::<QueryException>() {
        return Category::Query(e);
    }
    if let Some(e) = exception.downcast_ref::<AuthorizationException>() {
        return Category::Authorization(e);
    }
    if let Some(e) = exception.downcast_ref::<AuthenticationException>() {
        return Category::Authentication(e);
    }
    match exception.downcast_ref::<HttpException>() {
        Some(e) => match e.kind() {
            HttpExceptionKind::NotFound => Category::NotFound(e),
            HttpExceptionKind::UnprocessableEntity => Category::UnprocessableEntity(e),
            HttpExceptionKind::BadRequest => Category::BadRequest(e),
            HttpExceptionKind::NotAcceptable => Category::NotAcceptable(e),
            HttpExceptionKind::Conflict => Category::Conflict(e),
            _ => Category::Unclassified,
        },
        None => Category::Unclassified,
    }
}

/// Turns a raised error into the problem envelope.
///
/// In production, raw messages of query failures and unclassified errors are
/// withheld.
#[derive(Debug, Clone)]
pub struct Classifier {
    responder: Responder,
    production: bool,
}

impl Classifier {
    pub fn new(responder: Responder, production: bool) -> Self {
        Self {
            responder,
            production,
        }
    }

    pub fn is_production(&self) -> bool {
        self.production
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn problem(&self, exception: &Throwable) -> ProblemDocument {
        let responder = &self.responder;
        let translator = responder.translator();
        let message = || Some(Value::String(exception.message()));
        let derived_title = || Some(title_from_class(exception.class_name()));

        match classify(exception) {
            Category::TooManyRequests(_) => responder.custom_error(
                translator.trans(MessageKey::TooManyRequests),
                Some(translator.trans(MessageKey::TryAgainLater).into()),
                StatusCode::TooManyRequests,
            ),
            Category::Validation(e) => responder.validation_error(e),
            Category::ModelNotFound(e) => {
                let id = match e.ids() {
                    [] => "unknown".to_string(),
                    ids => ids.join(", "),
                };
                let detail = translator.trans_with(
                    MessageKey::ModelNotFound,
                    &[("model", class_basename(e.model())), ("id", id.as_str())],
                );
                responder.not_found(Some(detail.into()), None)
            }
            Category::Query(_) if self.production => responder.server_error(None, None),
            Category::Query(_) => responder.not_found(message(), derived_title()),
            Category::Authorization(_) => responder.unauthorized(None, None),
            Category::Authentication(e) => responder.unauthenticated(Some(e.to_string()), None),
            Category::NotFound(_) => responder.not_found(message(), None),
            Category::UnprocessableEntity(_) => responder.unprocessable(message(), derived_title()),
            Category::BadRequest(_) => responder.bad_request(message(), derived_title()),
            Category::NotAcceptable(_) => responder.custom_error(
                translator.trans(MessageKey::NotAcceptable),
                message(),
                StatusCode::NotAcceptable,
            ),
            Category::Conflict(_) => responder.conflict(None, None),
            Category::Unclassified => {
                let detail = if self.production { None } else { message() };
                responder.server_error(detail, derived_title())
            }
        }
    }
}
