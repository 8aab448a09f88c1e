use serde::{Serialize, Serializer};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Status codes this crate writes on JSON responses.
///
/// `Display` yields the variant name, which makes a readable code for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    NotAcceptable,
    Conflict,
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
}

impl StatusCode {
    pub const fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::NotAcceptable => 406,
            StatusCode::Conflict => 409,
            StatusCode::UnprocessableEntity => 422,
            StatusCode::TooManyRequests => 429,
            StatusCode::InternalServerError => 500,
        }
    }

    pub const fn is_error(self) -> bool {
        self.as_u16() >= 400
    }
}

impl From<StatusCode> for axum::http::StatusCode {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::Ok => axum::http::StatusCode::OK,
            StatusCode::Created => axum::http::StatusCode::CREATED,
            StatusCode::NoContent => axum::http::StatusCode::NO_CONTENT,
            StatusCode::BadRequest => axum::http::StatusCode::BAD_REQUEST,
            StatusCode::Unauthorized => axum::http::StatusCode::UNAUTHORIZED,
            StatusCode::Forbidden => axum::http::StatusCode::FORBIDDEN,
            StatusCode::NotFound => axum::http::StatusCode::NOT_FOUND,
            StatusCode::NotAcceptable => axum::http::StatusCode::NOT_ACCEPTABLE,
            StatusCode::Conflict => axum::http::StatusCode::CONFLICT,
            StatusCode::UnprocessableEntity => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::TooManyRequests => axum::http::StatusCode::TOO_MANY_REQUESTS,
            StatusCode::InternalServerError => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}
