use crate::routes::errors::ApiResult;
use flock_models::{
    db_conn::DbConn,
    likes::{like_target, Like},
    users::User,
    Error,
};
use rocket_contrib::json::Json;

#[derive(Deserialize)]
pub struct ToggleData {
    subject_id: i32,
    subject_kind: String,
}

#[post("/likes/toggle", data = "<data>")]
pub fn toggle(user: User, conn: DbConn, data: Json<ToggleData>) -> ApiResult<serde_json::Value> {
    if !like_target::is_valid(&data.subject_kind) {
        return Err(Error::InvalidValue.into());
    }
    let liked = Like::toggle(&*conn, &user, data.subject_id, &data.subject_kind)?;
    let count = Like::count_for_subject(&*conn, data.subject_id, &data.subject_kind)?;
    Ok(Json(json!({ "liked": liked, "likes": count })))
}
