use crate::{
    api::authorization::{Authorization, Read},
    routes::errors::ApiResult,
};
use flock_api::posts::PostQuery;
use flock_models::{db_conn::DbConn, posts::Post, Error};
use rocket_contrib::json::Json;

// Same paths as the cookie-session routes, one rank lower: when no session
// cookie is present the request falls through to these token-auth handlers.
#[get("/posts/<id>", rank = 2)]
pub fn get(
    id: i32,
    conn: DbConn,
    auth: Authorization<Read, Post>,
) -> ApiResult<serde_json::Value> {
    let post = Post::get(&*conn, id)?;
    let user = auth.0.get_user(&*conn)?;
    if !post.visible_for(&*conn, &user)? {
        return Err(Error::NotFound.into());
    }
    Ok(Json(json!(post)))
}

#[get("/posts?<author_id>&<boosted>&<page>", rank = 2)]
pub fn list(
    conn: DbConn,
    auth: Authorization<Read, Post>,
    author_id: Option<i32>,
    boosted: Option<bool>,
    page: Option<i32>,
) -> ApiResult<serde_json::Value> {
    let user = auth.0.get_user(&*conn)?;
    let query = PostQuery {
        author_id,
        boosted,
        page,
        ..PostQuery::default()
    };
    let posts = Post::search(&*conn, &user, &query)?;
    Ok(Json(json!(posts)))
}
