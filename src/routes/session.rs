use crate::{
    mail::{build_mail, Mailer},
    routes::errors::{ApiError, ApiResult},
};
use flock_models::{
    db_conn::DbConn,
    password_reset_requests::PasswordResetRequest,
    public_url,
    users::{User, AUTH_COOKIE},
    Error,
};
use lettre::Transport;
use rocket::{
    http::{Cookie, Cookies, SameSite},
    State,
};
use rocket_contrib::json::Json;
use std::sync::Mutex;
use tracing::error;

#[derive(Deserialize)]
pub struct LoginData {
    email_or_name: String,
    password: String,
}

#[post("/login", data = "<data>")]
pub fn login(
    conn: DbConn,
    data: Json<LoginData>,
    mut cookies: Cookies<'_>,
) -> ApiResult<serde_json::Value> {
    let user = User::find_by_email(&*conn, &data.email_or_name)
        .or_else(|_| User::find_by_name(&*conn, &data.email_or_name))
        .map_err(|_| ApiError::from(Error::Unauthorized))?;
    if !user.auth(&data.password) {
        return Err(Error::Unauthorized.into());
    }
    cookies.add_private(
        Cookie::build(AUTH_COOKIE, user.id.to_string())
            .same_site(SameSite::Lax)
            .finish(),
    );
    Ok(Json(json!(user)))
}

#[post("/logout")]
pub fn logout(mut cookies: Cookies<'_>) -> Json<serde_json::Value> {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Json(json!({ "ok": true }))
}

#[derive(Deserialize)]
pub struct ResetRequestData {
    email: String,
}

/// Always answers with a generic acknowledgment, whether or not the email
/// maps to an account.
#[post("/password-reset", data = "<data>")]
pub fn password_reset_request(
    conn: DbConn,
    data: Json<ResetRequestData>,
    mail: State<'_, Mutex<Mailer>>,
) -> Json<serde_json::Value> {
    if User::find_by_email(&*conn, &data.email).is_ok() {
        if let Ok(token) = PasswordResetRequest::insert(&*conn, &data.email) {
            let url = public_url(&format!("password-reset/{}", token));
            if let Some(message) = build_mail(
                data.email.clone(),
                "Password reset".to_owned(),
                format!("Use this link to reset your password: {}", url),
            ) {
                if let Some(ref mut mailer) = *mail.lock().unwrap() {
                    if let Err(e) = mailer.send(message.into()) {
                        error!("Couldn't send password reset email: {:?}", e);
                    }
                }
            }
        }
    }
    Json(json!({ "ok": true }))
}

#[derive(Deserialize)]
pub struct ResetData {
    token: String,
    password: String,
}

#[post("/password-reset/confirm", data = "<data>")]
pub fn password_reset(conn: DbConn, data: Json<ResetData>) -> ApiResult<serde_json::Value> {
    if data.password.is_empty() {
        return Err(Error::InvalidValue.into());
    }
    let request = PasswordResetRequest::find_and_delete_by_token(&*conn, &data.token)?;
    let user = User::find_by_email(&*conn, &request.email)?;
    user.set_password(&*conn, &data.password)?;
    Ok(Json(json!({ "ok": true })))
}
