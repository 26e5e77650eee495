use crate::routes::{
    errors::{ApiError, ApiResult},
    Page,
};
use flock_models::{db_conn::DbConn, medias::Media, users::User, Error};
use multipart::server::{
    save::{SaveResult, SavedData},
    Multipart,
};
use rocket::{http::ContentType, Data};
use rocket_contrib::json::Json;

fn render(media: &Media) -> serde_json::Value {
    json!({
        "media": media,
        "url": media.url().ok(),
        "category": media.category().to_string(),
    })
}

#[post("/medias", data = "<data>")]
pub fn upload(
    user: User,
    data: Data,
    ct: &ContentType,
    conn: DbConn,
) -> ApiResult<serde_json::Value> {
    if !ct.is_form_data() {
        return Err(Error::InvalidValue.into());
    }
    let (_, boundary) = ct
        .params()
        .find(|&(k, _)| k == "boundary")
        .ok_or_else(|| ApiError::from(Error::InvalidValue))?;

    let entries = match Multipart::with_body(data.open(), boundary).save().temp() {
        SaveResult::Full(entries) => entries,
        SaveResult::Partial(_, _) | SaveResult::Error(_) => {
            return Err(Error::InvalidValue.into());
        }
    };
    let fields = entries.fields;

    let file = fields
        .get("file")
        .and_then(|v| v.iter().next())
        .ok_or_else(|| ApiError::from(Error::InvalidValue))?;
    let filename = file
        .headers
        .filename
        .clone()
        .unwrap_or_else(|| "upload.bin".to_owned());
    let alt_text = fields
        .get("alt")
        .and_then(|v| v.iter().next())
        .and_then(|f| match f.data {
            SavedData::Text(ref s) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default();

    let media = match file.data {
        SavedData::Bytes(ref bytes) => {
            Media::save_upload(&*conn, &user, &filename, bytes, &alt_text)?
        }
        SavedData::File(ref path, _) => {
            let bytes = std::fs::read(path).map_err(Error::from)?;
            Media::save_upload(&*conn, &user, &filename, &bytes, &alt_text)?
        }
        SavedData::Text(_) => return Err(Error::InvalidValue.into()),
    };
    Ok(Json(render(&media)))
}

#[get("/medias?<page>")]
pub fn list(user: User, conn: DbConn, page: Option<Page>) -> ApiResult<serde_json::Value> {
    let page = page.unwrap_or_else(Page::first);
    Ok(Json(json!({
        "medias": Media::page_for_user(&*conn, &user, page.limits())?
            .iter()
            .map(render)
            .collect::<Vec<_>>(),
        "pages": Page::total(Media::count_for_user(&*conn, &user)? as i32),
    })))
}

#[get("/medias/<id>")]
pub fn details(id: i32, _user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let media = Media::get(&*conn, id)?;
    Ok(Json(render(&media)))
}

#[delete("/medias/<id>")]
pub fn delete(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let media = Media::get(&*conn, id)?;
    if media.owner_id != user.id && !user.is_moderator() {
        return Err(Error::Unauthorized.into());
    }
    media.delete(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}
