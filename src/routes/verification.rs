use crate::routes::errors::ApiResult;
use flock_models::{
    admin::Admin, db_conn::DbConn, users::User, verification_requests::VerificationRequest,
};
use rocket_contrib::json::Json;

#[post("/verification")]
pub fn apply(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let request = VerificationRequest::apply(&*conn, &user)?;
    Ok(Json(json!(request)))
}

#[get("/verification/pending")]
pub fn pending(_admin: Admin, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(VerificationRequest::pending(&*conn)?)))
}

#[derive(Deserialize)]
pub struct ApprovalData {
    badge_tier: String,
}

#[post("/verification/<id>/approve", data = "<data>")]
pub fn approve(
    id: i32,
    _admin: Admin,
    conn: DbConn,
    data: Json<ApprovalData>,
) -> ApiResult<serde_json::Value> {
    let request = VerificationRequest::get(&*conn, id)?;
    request.approve(&*conn, &data.badge_tier)?;
    Ok(Json(json!(User::get(&*conn, request.user_id)?)))
}

#[post("/verification/<id>/reject")]
pub fn reject(id: i32, _admin: Admin, conn: DbConn) -> ApiResult<serde_json::Value> {
    let request = VerificationRequest::get(&*conn, id)?;
    request.reject(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}
