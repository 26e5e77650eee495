use crate::routes::errors::ApiResult;
use flock_models::{
    admin::{Admin, Moderator},
    db_conn::DbConn,
    posts::Post,
    safe_string::SafeString,
    users::{NewUser, Role, User},
    Error,
};
use rocket::http::{Cookie, Cookies, SameSite};
use rocket_contrib::json::Json;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct SignupData {
    #[validate(length(min = 1, max = 30))]
    username: String,
    #[validate(length(min = 1))]
    display_name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    bio: Option<String>,
}

#[post("/users", data = "<data>")]
pub fn signup(
    conn: DbConn,
    data: Json<SignupData>,
    mut cookies: Cookies<'_>,
) -> ApiResult<serde_json::Value> {
    if data.validate().is_err() {
        return Err(Error::InvalidValue.into());
    }
    let user = NewUser::new_local(
        &*conn,
        &data.username,
        &data.display_name,
        &data.email,
        &data.password,
        SafeString::new(data.bio.as_deref().unwrap_or_default()),
    )?;
    cookies.add_private(
        Cookie::build(flock_models::users::AUTH_COOKIE, user.id.to_string())
            .same_site(SameSite::Lax)
            .finish(),
    );
    Ok(Json(json!(user)))
}

#[get("/users/me")]
pub fn me(user: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let followers = user.count_followers(&*conn)?;
    let friends = user.count_friends(&*conn)?;
    Ok(Json(json!({
        "user": user,
        "followers": followers,
        "friends": friends,
        "avatar_url": user.avatar_url(&*conn),
    })))
}

#[get("/users/<id>")]
pub fn details(id: i32, viewer: User, conn: DbConn) -> ApiResult<serde_json::Value> {
    let user = User::get(&*conn, id)?;
    if !user.profile_visible_for(&*conn, &viewer)? {
        // a locked profile only exposes its public header
        return Ok(Json(json!({
            "user": {
                "id": user.id,
                "username": user.username,
                "display_name": user.display_name,
                "is_private": true,
                "is_verified": user.is_verified,
                "badge_tier": user.badge_tier,
            },
            "avatar_url": user.avatar_url(&*conn),
        })));
    }
    let followers = user.count_followers(&*conn)?;
    let friends = user.count_friends(&*conn)?;
    Ok(Json(json!({
        "user": user,
        "followers": followers,
        "friends": friends,
        "avatar_url": user.avatar_url(&*conn),
        "posts": Post::for_profile(&*conn, &user, &viewer)?,
    })))
}

#[derive(Deserialize)]
pub struct ProfileData {
    display_name: String,
    bio: Option<String>,
    is_private: bool,
    avatar_id: Option<i32>,
    banner_id: Option<i32>,
}

#[put("/users/me", data = "<data>")]
pub fn edit(user: User, conn: DbConn, data: Json<ProfileData>) -> ApiResult<serde_json::Value> {
    if data.display_name.trim().is_empty() {
        return Err(Error::InvalidValue.into());
    }
    let updated = user.update(
        &*conn,
        data.display_name.clone(),
        SafeString::new(data.bio.as_deref().unwrap_or_default()),
        data.is_private,
    )?;
    if let Some(avatar_id) = data.avatar_id {
        updated.set_avatar(&*conn, avatar_id)?;
    }
    if let Some(banner_id) = data.banner_id {
        updated.set_banner(&*conn, banner_id)?;
    }
    Ok(Json(json!(User::get(&*conn, user.id)?)))
}

#[derive(Deserialize, Validate)]
pub struct CredentialsData {
    #[validate(email)]
    email: Option<String>,
    #[validate(length(min = 8))]
    password: Option<String>,
}

#[put("/users/me/credentials", data = "<data>")]
pub fn update_credentials(
    user: User,
    conn: DbConn,
    data: Json<CredentialsData>,
) -> ApiResult<serde_json::Value> {
    if data.validate().is_err() {
        return Err(Error::InvalidValue.into());
    }
    if let Some(ref email) = data.email {
        if User::email_used(&*conn, email)? {
            return Err(Error::InvalidValue.into());
        }
        user.set_email(&*conn, email)?;
    }
    if let Some(ref password) = data.password {
        user.set_password(&*conn, password)?;
    }
    Ok(Json(json!(User::get(&*conn, user.id)?)))
}

#[derive(Deserialize)]
pub struct RoleData {
    role: i32,
}

#[put("/users/<id>/role", data = "<data>")]
pub fn set_role(
    id: i32,
    admin: Admin,
    conn: DbConn,
    data: Json<RoleData>,
) -> ApiResult<serde_json::Value> {
    // an admin can't demote themselves, so there is always at least one left
    if admin.0.id == id {
        return Err(Error::InvalidValue.into());
    }
    let role = match data.role {
        0 => Role::Admin,
        1 => Role::Moderator,
        2 => Role::Normal,
        _ => return Err(Error::InvalidValue.into()),
    };
    let user = User::get(&*conn, id)?;
    user.set_role(&*conn, role)?;
    Ok(Json(json!(User::get(&*conn, id)?)))
}

#[get("/users")]
pub fn list(_mod: Moderator, conn: DbConn) -> ApiResult<serde_json::Value> {
    Ok(Json(json!(User::list(&*conn)?)))
}
