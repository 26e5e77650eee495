use flock_models::Error;
use rocket::{
    http::Status,
    response::{self, Responder},
    Request,
};
use rocket_contrib::json::Json;

/// Route-level error: wraps a model error and renders it as a JSON notice
/// with the matching HTTP status.
#[derive(Debug)]
pub struct ApiError(Error);

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> ApiError {
        ApiError(err)
    }
}

impl<'r> Responder<'r> for ApiError {
    fn respond_to(self, req: &Request<'_>) -> response::Result<'r> {
        let (status, message) = match self.0 {
            Error::NotFound => (Status::NotFound, "Not found"),
            Error::Unauthorized => (Status::Unauthorized, "Unauthorized"),
            Error::InvalidValue => (Status::BadRequest, "Invalid value"),
            Error::Expired => (Status::Gone, "Expired"),
            _ => (Status::InternalServerError, "Internal error"),
        };
        let mut res = Json(json!({ "error": message })).respond_to(req)?;
        res.set_status(status);
        Ok(res)
    }
}

#[catch(404)]
pub fn not_found(_req: &Request<'_>) -> Json<serde_json::Value> {
    Json(json!({ "error": "Not found" }))
}

#[catch(401)]
pub fn unauthorized(_req: &Request<'_>) -> Json<serde_json::Value> {
    Json(json!({ "error": "Unauthorized" }))
}

#[catch(500)]
pub fn server_error(_req: &Request<'_>) -> Json<serde_json::Value> {
    Json(json!({ "error": "Internal error" }))
}
