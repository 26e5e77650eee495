use crate::routes::errors::ApiResult;
use flock_models::{
    db_conn::DbConn, friendships::Friendship, safe_string::SafeString, stories::Story,
    users::User, Error,
};
use rocket_contrib::json::Json;

#[derive(Deserialize)]
pub struct NewStoryData {
    media_id: Option<i32>,
    body: Option<String>,
}

#[post("/stories", data = "<data>")]
pub fn create(user: User, conn: DbConn, data: Json<NewStoryData>) -> ApiResult<serde_json::Value> {
    let story = Story::create(
        &*conn,
        &user,
        data.media_id,
        data.body.as_deref().map(SafeString::new),
    )?;
    Ok(Json(json!(story)))
}

#[get("/stories")]
pub fn tray(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(Story::tray_for(&*conn, &user)?)))
}

#[get("/stories/user/<user_id>")]
pub fn for_user(user_id: i32, viewer: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    // stories are friends-only content
    if user_id != viewer.id && !Friendship::exists(&*conn, user_id, viewer.id)? {
        return Err(Error::NotFound.into());
    }
    Ok(Json(json!(Story::for_user(&*conn, user_id)?)))
}

#[delete("/stories/<id>")]
pub fn delete(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let story = Story::get(&*conn, id)?;
    if story.user_id != user.id && !user.is_moderator() {
        return Err(Error::Unauthorized.into());
    }
    story.delete(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}
