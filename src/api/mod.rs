use crate::routes::errors::ApiResult;
use flock_api::tokens::{NewTokenData, TokenData};
use flock_common::utils::random_hex;
use flock_models::{
    api_tokens::{ApiToken, NewApiToken},
    db_conn::DbConn,
    users::User,
    Error,
};
use rocket_contrib::json::Json;

pub mod authorization;
pub mod posts;

/// Password grant: exchanges credentials for a long-lived API key with the
/// requested scopes.
#[post("/tokens", data = "<data>")]
pub fn issue_token(conn: DbConn, data: Json<NewTokenData>) -> ApiResult<TokenData> {
    let user = User::find_by_name(&*conn, &data.username)
        .map_err(|_| Error::Unauthorized)?;
    if !user.auth(&data.password) {
        return Err(Error::Unauthorized.into());
    }
    let token = ApiToken::insert(
        &*conn,
        NewApiToken {
            value: random_hex(),
            scopes: data.scopes.clone(),
            user_id: user.id,
        },
    )?;
    Ok(Json(TokenData {
        id: token.id,
        value: token.value,
        scopes: token.scopes,
    }))
}

#[get("/tokens")]
pub fn list_tokens(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(ApiToken::for_user(&*conn, user.id)?)))
}

#[delete("/tokens/<id>")]
pub fn revoke_token(id: i32, user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let token = ApiToken::get(&*conn, id)?;
    if token.user_id != user.id {
        return Err(Error::Unauthorized.into());
    }
    token.delete(&*conn)?;
    Ok(Json(json!({ "ok": true })))
}
