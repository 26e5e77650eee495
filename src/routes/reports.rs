use crate::routes::errors::ApiResult;
use flock_models::{admin::Moderator, db_conn::DbConn, reports::Report, users::User};
use rocket_contrib::json::Json;

#[derive(Deserialize)]
pub struct NewReportData {
    reported_id: i32,
    kind: String,
    reason: String,
}

#[post("/reports", data = "<data>")]
pub fn create(user: User, conn: DbConn, data: Json<NewReportData>) -> ApiResult<serde_json::Value> {
    let report = Report::create(&*conn, &user, data.reported_id, &data.kind, &data.reason)?;
    Ok(Json(json!(report)))
}

#[get("/reports")]
pub fn list(_mod: Moderator, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(Report::list(&*conn)?)))
}
