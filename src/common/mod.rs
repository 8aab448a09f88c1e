pub mod response;
pub mod status_code;

pub use response::{
    ApiResponse, PROBLEM_JSON, ProblemDetail, ProblemDocument, ProblemSource, Responder,
};
pub use status_code::StatusCode;
