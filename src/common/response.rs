use crate::common::StatusCode;
use crate::exception::ValidationException;
use crate::lang::{MessageKey, Translator};
use axum::{
    Json,
    http::{HeaderValue, StatusCode as HttpStatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Media type of every error response.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Success envelope: `{ status, message, data }`.
///
/// # Example
/// ```
/// use tenantry::common::{ApiResponse, StatusCode};
///
/// let message = Some("Request successful.".to_string());
/// let response = ApiResponse::new(StatusCode::Ok, message, Some(vec![1, 2]));
/// assert_eq!(response.status, StatusCode::Ok);
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: Option<String>, data: Option<T>) -> Self {
        Self {
            status,
            message,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (HttpStatusCode::from(self.status), Json(self)).into_response()
    }
}

/// One entry of the error envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemDetail {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProblemSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemSource {
    pub pointer: String,
}

impl ProblemSource {
    /// Pointer for a dotted field path: `items.0.name` becomes `/items/0/name`.
    pub fn for_field(field: &str) -> Self {
        Self {
            pointer: format!("/{}", field.replace('.', "/")),
        }
    }
}

/// Error envelope: `{ errors: [...] }`, served as `application/problem+json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemDocument {
    #[serde(skip)]
    pub status: StatusCode,
    pub errors: Vec<ProblemDetail>,
}

impl ProblemDocument {
    pub fn single(status: StatusCode, title: impl Into<String>, detail: Option<Value>) -> Self {
        Self {
            status,
            errors: vec![ProblemDetail {
                status,
                title: title.into(),
                detail,
                source: None,
            }],
        }
    }
}

impl IntoResponse for ProblemDocument {
    fn into_response(self) -> Response {
        let mut response = (HttpStatusCode::from(self.status), Json(self)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

/// Builds success and error envelopes with localized default messages.
///
/// Explicit titles and messages win over the catalog defaults.
#[derive(Debug, Clone)]
pub struct Responder {
    translator: Translator,
}

impl Responder {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    // ---- success ----

    pub fn success<T: Serialize>(
        &self,
        message: Option<String>,
        data: Option<T>,
    ) -> ApiResponse<T> {
        let message = message.unwrap_or_else(|| self.trans(MessageKey::Success));
        self.envelope(StatusCode::Ok, message, data)
    }

    pub fn created<T: Serialize>(
        &self,
        message: Option<String>,
        data: Option<T>,
    ) -> ApiResponse<T> {
        let message = message.unwrap_or_else(|| self.trans(MessageKey::Created));
        self.envelope(StatusCode::Created, message, data)
    }

    /// 204 with an empty body.
    pub fn deleted(&self) -> Response {
        HttpStatusCode::NO_CONTENT.into_response()
    }

    // ---- errors ----

    pub fn bad_request(&self, detail: Option<Value>, title: Option<String>) -> ProblemDocument {
        self.problem(StatusCode::BadRequest, title, MessageKey::BadRequest, detail)
    }

    pub fn unprocessable(&self, detail: Option<Value>, title: Option<String>) -> ProblemDocument {
        self.problem(StatusCode::UnprocessableEntity, title, MessageKey::Unprocessable, detail)
    }

    pub fn not_found(&self, detail: Option<Value>, title: Option<String>) -> ProblemDocument {
        self.problem(StatusCode::NotFound, title, MessageKey::NotFound, detail)
    }

    pub fn unauthorized(&self, detail: Option<String>, title: Option<String>) -> ProblemDocument {
        let detail = detail.unwrap_or_else(|| self.trans(MessageKey::UnauthorizedAction));
        self.problem(StatusCode::Forbidden, title, MessageKey::Unauthorized, Some(detail.into()))
    }

    pub fn unauthenticated(
        &self,
        detail: Option<String>,
        title: Option<String>,
    ) -> ProblemDocument {
        let detail = detail.unwrap_or_else(|| self.trans(MessageKey::UnauthenticatedAction));
        let detail = Some(detail.into());
        self.problem(StatusCode::Unauthorized, title, MessageKey::Unauthenticated, detail)
    }

    pub fn conflict(&self, detail: Option<String>, title: Option<String>) -> ProblemDocument {
        let detail = detail.unwrap_or_else(|| self.trans(MessageKey::ConflictDetail));
        self.problem(StatusCode::Conflict, title, MessageKey::Conflict, Some(detail.into()))
    }

    pub fn server_error(&self, detail: Option<Value>, title: Option<String>) -> ProblemDocument {
        self.problem(StatusCode::InternalServerError, title, MessageKey::ServerError, detail)
    }

    /// Error with an explicit title. An empty title is replaced by `generic_error`.
    pub fn custom_error(
        &self,
        title: impl Into<String>,
        detail: Option<Value>,
        status: StatusCode,
    ) -> ProblemDocument {
        let title = Some(title.into()).filter(|title| !title.is_empty());
        self.problem(status, title, MessageKey::GenericError, detail)
    }

    /// One 422 entry per invalid field, carrying the field's first message.
    pub fn validation_error(&self, exception: &ValidationException) -> ProblemDocument {
        let title = self.trans(MessageKey::ValidationError);
        let errors = exception
            .errors()
            .filter_map(|(field, messages)| {
                messages.first().map(|first| ProblemDetail {
                    status: StatusCode::UnprocessableEntity,
                    title: title.clone(),
                    detail: Some(Value::String(first.clone())),
                    source: Some(ProblemSource::for_field(field)),
                })
            })
            .collect();

        ProblemDocument {
            status: StatusCode::UnprocessableEntity,
            errors,
        }
    }

    fn trans(&self, key: MessageKey) -> String {
        self.translator.trans(key)
    }

    fn envelope<T: Serialize>(
        &self,
        status: StatusCode,
        message: String,
        data: Option<T>,
    ) -> ApiResponse<T> {
        ApiResponse::new(status, Some(message), data)
    }

    fn problem(
        &self,
        status: StatusCode,
        title: Option<String>,
        default_title: MessageKey,
        detail: Option<Value>,
    ) -> ProblemDocument {
        let title = title.unwrap_or_else(|| self.trans(default_title));
        ProblemDocument::single(status, title, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::MessageCatalog;
    use serde_json::json;
    use std::sync::Arc;

    fn responder() -> Responder {
        let catalog = Arc::new(MessageCatalog::builtin().unwrap());
        Responder::new(Translator::new(catalog, "en").unwrap())
    }

    #[test]
    fn success_envelope_uses_default_message() {
        let body = serde_json::to_value(responder().success(None, Some(json!({"id": 1})))).unwrap();
        assert_eq!(
            body,
            json!({"status": 200, "message": "Request successful.", "data": {"id": 1}})
        );
    }

    #[test]
    fn created_keeps_explicit_message_and_null_data() {
        let response = responder().created::<()>(Some("Tenant added.".into()), None);
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body, json!({"status": 201, "message": "Tenant added.", "data": null}));
    }

    #[test]
    fn success_response_is_plain_json() {
        let response = responder().success::<()>(None, None).into_response();
        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn deleted_is_empty_no_content() {
        let response = responder().deleted();
        assert_eq!(response.status(), HttpStatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn error_response_sets_problem_json() {
        let response = responder().not_found(None, None).into_response();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], PROBLEM_JSON);
    }

    #[test]
    fn error_entry_serializes_null_detail_without_source() {
        let body = serde_json::to_value(responder().server_error(None, None)).unwrap();
        assert_eq!(
            body,
            json!({"errors": [{
                "status": 500,
                "title": "Internal server error. Please try again later.",
                "detail": null
            }]})
        );
    }

    #[test]
    fn defaults_fill_missing_detail() {
        let responder = responder();
        let forbidden = responder.unauthorized(None, None);
        assert_eq!(forbidden.status, StatusCode::Forbidden);
        assert_eq!(forbidden.errors[0].title, "Unauthorized.");
        assert_eq!(
            forbidden.errors[0].detail,
            Some(json!("You are not authorized to perform this action."))
        );

        let unauthenticated = responder.unauthenticated(None, None);
        assert_eq!(unauthenticated.status, StatusCode::Unauthorized);
        assert_eq!(
            unauthenticated.errors[0].detail,
            Some(json!("Authentication is required to perform this action."))
        );

        let conflict = responder.conflict(None, None);
        assert_eq!(
            conflict.errors[0].detail,
            Some(json!("The request could not be completed due to a conflict."))
        );
    }

    #[test]
    fn custom_error_falls_back_to_generic_title() {
        let problem = responder().custom_error("", None, StatusCode::NotAcceptable);
        assert_eq!(problem.errors[0].title, "Oops! Something went wrong.");
        assert_eq!(problem.errors[0].status, StatusCode::NotAcceptable);
    }

    #[test]
    fn validation_entries_point_at_fields() {
        let exception = ValidationException::new()
            .with_error("email", "The email field is required.")
            .with_error("email", "The email must be valid.")
            .with_error("address.city", "The city is required.");

        let problem = responder().validation_error(&exception);
        let body = serde_json::to_value(&problem).unwrap();
        assert_eq!(
            body,
            json!({"errors": [
                {
                    "status": 422,
                    "title": "Validation Error.",
                    "detail": "The email field is required.",
                    "source": {"pointer": "/email"}
                },
                {
                    "status": 422,
                    "title": "Validation Error.",
                    "detail": "The city is required.",
                    "source": {"pointer": "/address/city"}
                }
            ]})
        );
    }
}
