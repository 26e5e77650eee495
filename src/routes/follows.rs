use crate::routes::errors::ApiResult;
use flock_models::{db_conn::DbConn, follows::Follow, users::User};
use rocket_contrib::json::Json;

#[post("/follows/<user_id>")]
pub fn follow(user_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let target = User::get(&*conn, user_id)?;
    let follow = Follow::create(&*conn, &user, &target)?;
    Ok(Json(json!(follow)))
}

#[delete("/follows/<user_id>")]
pub fn unfollow(user_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let target = User::get(&*conn, user_id)?;
    Follow::delete(&*conn, &user, &target)?;
    Ok(Json(json!({ "ok": true })))
}

#[get("/follows/<user_id>/counts")]
pub fn counts(user_id: i32, _user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!({
        "followers": Follow::count_followers(&*conn, user_id)?,
        "following": Follow::count_following(&*conn, user_id)?,
    })))
}
