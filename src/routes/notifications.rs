use crate::routes::{errors::ApiResult, Page};
use flock_models::{db_conn::DbConn, notifications::Notification, users::User, Error};
use rocket_contrib::json::Json;

#[get("/notifications?<page>")]
pub fn list(user: User, conn: DbConn, page: Option<Page>) -> ApiResult<serde_json::Value> {
    let page = page.unwrap_or_else(Page::first);
    Ok(Json(json!(Notification::page_for_user(
        &*conn,
        &user,
        page.limits()
    )?)))
}

#[get("/notifications/unread/count")]
pub fn unread_count(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!({
        "unread": Notification::count_unread(&*conn, &user)?
    })))
}

#[post("/notifications/<id>/read")]
pub fn mark_read(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let notification = Notification::get(&*conn, id)?;
    if notification.user_id != user.id {
        return Err(Error::Unauthorized.into());
    }
    notification.mark_read(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}

#[post("/notifications/read")]
pub fn mark_all_read(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Notification::mark_all_read(&*conn, &user)?;
    Ok(Json(json!({ "ok": true })))
}
