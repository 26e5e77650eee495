use crate::routes::{errors::ApiResult, Page};
use flock_api::posts::NewPostData;
use flock_models::{
    admin::Admin, comments::Comment, db_conn::DbConn, posts::*, safe_string::SafeString,
    users::User, Connection, Error,
};
use rocket_contrib::json::Json;

fn render(conn: &Connection, post: &Post) -> serde_json::Value {
    let medias = post
        .medias(conn)
        .unwrap_or_default()
        .iter()
        .filter_map(|m| m.url().ok())
        .collect::<Vec<_>>();
    json!({
        "post": post,
        "media_urls": medias,
        "grid": post.grid_layout(conn).ok().flatten().map(|l| json!({
            "cells": l.cells(),
            "overlay": l.overlay_label(),
        })),
        "likes": post.count_likes(conn).unwrap_or(0),
        "comments": Comment::count_for_post(conn, post.id).unwrap_or(0),
    })
}

#[get("/posts?<page>")]
pub fn feed(user: User, conn: DbConn, page: Option<Page>) -> ApiResult<serde_json::Value> {
    let page = page.unwrap_or_else(Page::first);
    let posts = Post::feed_for(&*conn, &user, page.number())?;
    Ok(Json(json!(posts
        .iter()
        .map(|p| render(&conn, p))
        .collect::<Vec<_>>())))
}

#[get("/posts/videos?<page>")]
pub fn video_feed(user: User, conn: DbConn, page: Option<Page>) -> ApiResult<serde_json::Value> {
    let page = page.unwrap_or_else(Page::first);
    let posts = Post::video_feed_for(&*conn, &user, page.number())?;
    Ok(Json(json!(posts
        .iter()
        .map(|p| render(&conn, p))
        .collect::<Vec<_>>())))
}

#[get("/posts/<id>")]
pub fn details(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let post = Post::get(&*conn, id)?;
    if !post.visible_for(&*conn, &user)? {
        return Err(Error::NotFound.into());
    }
    Ok(Json(render(&conn, &post)))
}

#[post("/posts", data = "<data>")]
pub fn create(user: User, conn: DbConn, data: Json<NewPostData>) -> ApiResult<serde_json::Value> {
    let media_ids = data.media_ids.clone().unwrap_or_default();
    if data.content.is_empty() && media_ids.is_empty() {
        return Err(Error::InvalidValue.into());
    }
    let post = Post::create(
        &*conn,
        &user,
        SafeString::new(&data.content),
        data.visibility.as_deref().unwrap_or(visibility::PUBLIC),
        &media_ids,
    )?;
    Ok(Json(render(&conn, &post)))
}

#[delete("/posts/<id>")]
pub fn delete(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let post = Post::get(&*conn, id)?;
    if post.author_id != user.id && !user.is_moderator() {
        return Err(Error::Unauthorized.into());
    }
    post.delete(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}

#[post("/posts/<id>/repost")]
pub fn repost(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let post = Post::get(&*conn, id)?;
    if !post.visible_for(&*conn, &user)? {
        return Err(Error::NotFound.into());
    }
    let copy = post.repost(&*conn, &user)?;
    Ok(Json(render(&conn, &copy)))
}

#[derive(Deserialize)]
pub struct BoostData {
    boosted: bool,
}

#[put("/posts/<id>/boost", data = "<data>")]
pub fn set_boost(
    id: i32,
    _admin: Admin,
    conn: DbConn,
    data: Json<BoostData>,
) -> ApiResult<serde_json::Value> {
    let post = Post::get(&*conn, id)?;
    post.set_boosted(&*conn, data.boosted)?;
    Ok(Json(json!(Post::get(&*conn, id)?)))
}
