use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Symbolic keys every locale must define.
///
/// The string form (`snake_case`) is the key used in `lang/<locale>.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKey {
    Success,
    Created,
    BadRequest,
    Unprocessable,
    NotFound,
    Unauthorized,
    UnauthorizedAction,
    Unauthenticated,
    UnauthenticatedAction,
    Conflict,
    ConflictDetail,
    ServerError,
    ValidationError,
    GenericError,
    NotAcceptable,
    TooManyRequests,
    TryAgainLater,
    /// Placeholders: `:model`, `:id`.
    ModelNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn keys_use_snake_case() {
        assert_eq!(MessageKey::ModelNotFound.as_ref(), "model_not_found");
        assert_eq!(MessageKey::TryAgainLater.to_string(), "try_again_later");
        assert_eq!(
            MessageKey::from_str("unauthorized_action").unwrap(),
            MessageKey::UnauthorizedAction
        );
    }
}
