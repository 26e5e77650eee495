use crate::routes::errors::ApiResult;
use flock_models::{
    db_conn::DbConn, messages::Message, safe_string::SafeString, users::User,
};
use rocket_contrib::json::Json;

#[get("/messages/<user_id>")]
pub fn conversation(user_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    User::get(&*conn, user_id)?;
    Ok(Json(json!(Message::conversation(
        &*conn, user.id, user_id
    )?)))
}

#[derive(Deserialize)]
pub struct NewMessageData {
    content: Option<String>,
    audio_id: Option<i32>,
}

#[post("/messages/<user_id>", data = "<data>")]
pub fn send(
    user_id: i32,
    user: User,
    conn: DbConn,
    data: Json<NewMessageData>,
) -> ApiResult<serde_json::Value> {
    let receiver = User::get(&*conn, user_id)?;
    let message = Message::send(
        &*conn,
        &user,
        &receiver,
        SafeString::new(data.content.as_deref().unwrap_or_default()),
        data.audio_id,
    )?;
    Ok(Json(json!(message)))
}

#[post("/messages/<user_id>/read")]
pub fn mark_read(user_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let changed = Message::mark_conversation_read(&*conn, &user, user_id)?;
    Ok(Json(json!({ "marked": changed })))
}

#[get("/messages")]
pub fn inbox(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(Message::inbox(&*conn, &user)?)))
}

#[get("/messages/unread/count")]
pub fn unread_count(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!({
        "unread": Message::count_unread(&*conn, &user)?
    })))
}
