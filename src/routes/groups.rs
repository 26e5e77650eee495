use crate::routes::errors::ApiResult;
use flock_models::{
    db_conn::DbConn,
    group_members::GroupMember,
    group_messages::GroupMessage,
    groups::Group,
    safe_string::SafeString,
    users::User,
    Error,
};
use rocket_contrib::json::Json;

#[derive(Deserialize)]
pub struct NewGroupData {
    name: String,
    member_ids: Vec<i32>,
}

#[post("/groups", data = "<data>")]
pub fn create(user: User, conn: DbConn, data: Json<NewGroupData>) -> ApiResult<serde_json::Value> {
    let group = Group::create(&*conn, &user, &data.name, &data.member_ids)?;
    Ok(Json(json!(group)))
}

#[get("/groups")]
pub fn list(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(Group::for_user(&*conn, &user)?)))
}

#[derive(Deserialize)]
pub struct RenameData {
    name: String,
}

#[put("/groups/<id>", data = "<data>")]
pub fn rename(
    id: i32,
    user: User,
    conn: DbConn,
    data: Json<RenameData>,
) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    if group.owner_id != user.id {
        return Err(Error::Unauthorized.into());
    }
    group.rename(&*conn, &data.name)?;
    Ok(Json(json!(Group::get(&*conn, id)?)))
}

#[delete("/groups/<id>")]
pub fn delete(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    if group.owner_id != user.id && !user.is_moderator() {
        return Err(Error::Unauthorized.into());
    }
    group.delete(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}

#[get("/groups/<id>")]
pub fn details(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    if !GroupMember::is_member(&*conn, group.id, user.id)? {
        return Err(Error::Unauthorized.into());
    }
    Ok(Json(json!({
        "group": group,
        "members": GroupMember::members(&*conn, group.id)?,
    })))
}

#[post("/groups/<id>/members/<user_id>")]
pub fn add_member(
    id: i32,
    user_id: i32,
    user: User,
    conn: DbConn,
) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    let member = GroupMember::add(&*conn, &group, &user, user_id)?;
    Ok(Json(json!(member)))
}

#[delete("/groups/<id>/members/<user_id>")]
pub fn remove_member(
    id: i32,
    user_id: i32,
    user: User,
    conn: DbConn,
) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    GroupMember::remove(&*conn, &group, &user, user_id)?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct AdminFlagData {
    is_admin: bool,
}

#[put("/groups/<id>/members/<user_id>/admin", data = "<data>")]
pub fn set_admin(
    id: i32,
    user_id: i32,
    user: User,
    conn: DbConn,
    data: Json<AdminFlagData>,
) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    GroupMember::set_admin(&*conn, &group, &user, user_id, data.is_admin)?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct NewGroupMessageData {
    content: Option<String>,
    audio_id: Option<i32>,
}

#[post("/groups/<id>/messages", data = "<data>")]
pub fn send_message(
    id: i32,
    user: User,
    conn: DbConn,
    data: Json<NewGroupMessageData>,
) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    let message = GroupMessage::send(
        &*conn,
        &group,
        &user,
        SafeString::new(data.content.as_deref().unwrap_or_default()),
        data.audio_id,
    )?;
    Ok(Json(json!(message)))
}

#[get("/groups/<id>/messages")]
pub fn history(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let group = Group::get(&*conn, id)?;
    if !GroupMember::is_member(&*conn, group.id, user.id)? {
        return Err(Error::Unauthorized.into());
    }
    Ok(Json(json!(GroupMessage::history(&*conn, group.id)?)))
}
