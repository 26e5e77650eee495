use crate::routes::errors::ApiResult;
use flock_models::{db_conn::DbConn, streams::LiveStream, users::User, Error};
use rocket_contrib::json::Json;

#[derive(Deserialize)]
pub struct NewStreamData {
    title: String,
}

#[post("/streams", data = "<data>")]
pub fn start(user: User, conn: DbConn, data: Json<NewStreamData>) -> ApiResult<serde_json::Value> {
    let stream = LiveStream::start(&*conn, &user, &data.title)?;
    Ok(Json(json!(stream)))
}

#[post("/streams/<id>/end")]
pub fn end(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let stream = LiveStream::get(&*conn, id)?;
    if stream.host_id != user.id && !user.is_moderator() {
        return Err(Error::Unauthorized.into());
    }
    stream.end(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}

#[get("/streams")]
pub fn live(_user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let streams = LiveStream::live(&*conn)?
        .into_iter()
        .map(|s| {
            let viewers = s.viewer_count(&conn).unwrap_or(0);
            json!({ "stream": s, "viewers": viewers })
        })
        .collect::<Vec<_>>();
    Ok(Json(json!(streams)))
}

#[post("/streams/<id>/join")]
pub fn join(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let stream = LiveStream::get(&*conn, id)?;
    stream.join(&*conn, &user)?;
    Ok(Json(json!({ "viewers": stream.viewer_count(&*conn)? })))
}

#[post("/streams/<id>/leave")]
pub fn leave(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let stream = LiveStream::get(&*conn, id)?;
    stream.leave(&*conn, &user)?;
    Ok(Json(json!({ "viewers": stream.viewer_count(&*conn)? })))
}

#[get("/streams/<id>/viewers")]
pub fn viewers(id: i32, _user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let stream = LiveStream::get(&*conn, id)?;
    Ok(Json(json!({ "viewers": stream.viewer_count(&*conn)? })))
}
