use crate::routes::errors::ApiResult;
use flock_models::{
    comments::Comment, db_conn::DbConn, posts::Post, safe_string::SafeString, users::User,
    Connection, Error,
};
use rocket_contrib::json::Json;

fn render(conn: &Connection, comment: &Comment) -> serde_json::Value {
    json!({
        "comment": comment,
        "replies": comment.replies(conn).unwrap_or_default(),
    })
}

#[get("/posts/<post_id>/comments")]
pub fn list(post_id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let post = Post::get(&*conn, post_id)?;
    if !post.visible_for(&*conn, &user)? {
        return Err(Error::NotFound.into());
    }
    Ok(Json(json!(Comment::top_level(&*conn, &post)?
        .iter()
        .map(|c| render(&conn, c))
        .collect::<Vec<_>>())))
}

#[derive(Deserialize)]
pub struct NewCommentData {
    content: String,
    parent_comment_id: Option<i32>,
}

#[post("/posts/<post_id>/comments", data = "<data>")]
pub fn create(
    post_id: i32,
    user: User,
    conn: DbConn,
    data: Json<NewCommentData>,
) -> ApiResult<serde_json::Value> {
    if data.content.is_empty() {
        return Err(Error::InvalidValue.into());
    }
    let post = Post::get(&*conn, post_id)?;
    if !post.visible_for(&*conn, &user)? {
        return Err(Error::NotFound.into());
    }
    let comment = Comment::create(
        &*conn,
        &user,
        &post,
        SafeString::new(&data.content),
        data.parent_comment_id,
    )?;
    Ok(Json(json!(comment)))
}

#[delete("/comments/<id>")]
pub fn delete(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let comment = Comment::get(&*conn, id)?;
    let post_author = comment.get_post(&*conn)?.author_id;
    // the commenter, the post's author, and the moderation team may remove it
    if comment.author_id != user.id && post_author != user.id && !user.is_moderator() {
        return Err(Error::Unauthorized.into());
    }
    comment.delete(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}
