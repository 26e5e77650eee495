use crate::routes::errors::ApiResult;
use flock_models::{
    db_conn::DbConn, friend_requests::FriendRequest, friendships::Friendship, users::User,
};
use rocket_contrib::json::Json;

#[post("/friends/requests/<user_id>")]
pub fn send_request(user_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let receiver = User::get(&*conn, user_id)?;
    let request = FriendRequest::send(&*conn, &user, &receiver)?;
    Ok(Json(json!(request)))
}

#[post("/friends/requests/<id>/accept")]
pub fn accept_request(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let request = FriendRequest::get(&*conn, id)?;
    let friendship = request.accept(&*conn, &user)?;
    Ok(Json(json!(friendship)))
}

#[post("/friends/requests/<id>/reject")]
pub fn reject_request(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let request = FriendRequest::get(&*conn, id)?;
    request.reject(&*conn, &user)?;
    Ok(Json(json!({ "ok": true })))
}

#[get("/friends/requests/incoming")]
pub fn incoming(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(FriendRequest::incoming(&*conn, &user)?)))
}

#[get("/friends/requests/outgoing")]
pub fn outgoing(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(FriendRequest::outgoing(&*conn, &user)?)))
}

#[get("/friends")]
pub fn list(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(Friendship::friends(&*conn, &user)?)))
}

#[delete("/friends/<user_id>")]
pub fn unfriend(user_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Friendship::disconnect(&*conn, user.id, user_id)?;
    Ok(Json(json!({ "ok": true })))
}
