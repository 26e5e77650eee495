use crate::{
    db_conn::DbConn, follows::Follow, friendships::Friendship, medias::Media, safe_string::SafeString,
    schema::users, Connection, Error, Result,
};
use bcrypt;
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use flock_common::utils::valid_username;
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};

pub enum Role {
    Admin = 0,
    Moderator = 1,
    Normal = 2,
}

/// Verification badge tiers. A badge is a visual marker, not a permission.
pub mod badge_tier {
    pub const NONE: &str = "none";
    pub const BLUE: &str = "blue";
    pub const GOLD: &str = "gold";
    pub const PURPLE: &str = "purple";
    pub const SILVER: &str = "silver";

    pub fn is_valid(tier: &str) -> bool {
        matches!(tier, NONE | BLUE | GOLD | PURPLE | SILVER)
    }
}

#[derive(Queryable, Identifiable, Clone, Debug, AsChangeset, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub bio: SafeString,
    pub avatar_id: Option<i32>,
    pub banner_id: Option<i32>,
    pub is_private: bool,
    pub is_verified: bool,
    pub badge_tier: String,
    /// 0 = admin
    /// 1 = moderator
    /// anything else = normal user
    pub role: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Default, Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub hashed_password: String,
    pub bio: SafeString,
    pub is_private: bool,
    pub is_verified: bool,
    pub badge_tier: String,
    pub role: i32,
}

pub const AUTH_COOKIE: &str = "user_id";

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_email, email as &str);
    find_by!(users, find_by_name, username as &str);

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin as i32
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Admin as i32 || self.role == Role::Moderator as i32
    }

    /// All admin accounts, used for report fan-out.
    pub fn admins(conn: &Connection) -> Result<Vec<User>> {
        users::table
            .filter(users::role.eq(Role::Admin as i32))
            .order(users::id.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        users::table
            .order(users::username.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn email_used(conn: &Connection, email: &str) -> Result<bool> {
        use diesel::dsl::{exists, select};

        select(exists(
            users::table
                .filter(users::email.eq(email))
                .or_filter(users::email.eq(email.to_ascii_lowercase())),
        ))
        .get_result(conn)
        .map_err(Error::from)
    }

    pub fn name_used(conn: &Connection, username: &str) -> Result<bool> {
        use diesel::dsl::{exists, select};

        select(exists(users::table.filter(users::username.eq(username))))
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, 10).map_err(Error::from)
    }

    pub fn auth(&self, pass: &str) -> bool {
        bcrypt::verify(pass, &self.hashed_password).unwrap_or(false)
    }

    pub fn update(
        &self,
        conn: &Connection,
        display_name: String,
        bio: SafeString,
        is_private: bool,
    ) -> Result<User> {
        diesel::update(self)
            .set((
                users::display_name.eq(display_name),
                users::bio.eq(bio),
                users::is_private.eq(is_private),
            ))
            .execute(conn)?;
        User::get(conn, self.id)
    }

    pub fn set_password(&self, conn: &Connection, pass: &str) -> Result<()> {
        diesel::update(self)
            .set(users::hashed_password.eq(User::hash_pass(pass)?))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn set_email(&self, conn: &Connection, email: &str) -> Result<()> {
        diesel::update(self)
            .set(users::email.eq(email))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn set_role(&self, conn: &Connection, new_role: Role) -> Result<()> {
        diesel::update(self)
            .set(users::role.eq(new_role as i32))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    /// Sets the verification flag and the badge tier together, so a verified
    /// account can never be observed without its badge.
    pub fn set_badge(&self, conn: &Connection, tier: &str) -> Result<()> {
        if !badge_tier::is_valid(tier) {
            return Err(Error::InvalidValue);
        }
        diesel::update(self)
            .set((
                users::is_verified.eq(tier != badge_tier::NONE),
                users::badge_tier.eq(tier),
            ))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn set_avatar(&self, conn: &Connection, media_id: i32) -> Result<()> {
        diesel::update(self)
            .set(users::avatar_id.eq(media_id))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn set_banner(&self, conn: &Connection, media_id: i32) -> Result<()> {
        diesel::update(self)
            .set(users::banner_id.eq(media_id))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn avatar_url(&self, conn: &Connection) -> Option<String> {
        self.avatar_id
            .and_then(|id| Media::get(conn, id).ok())
            .and_then(|m| m.url().ok())
    }

    pub fn count_followers(&self, conn: &Connection) -> Result<i64> {
        Follow::count_followers(conn, self.id)
    }

    pub fn count_friends(&self, conn: &Connection) -> Result<i64> {
        Friendship::count_for_user(conn, self.id)
    }

    /// Whether `viewer` may see this profile's content at all (private
    /// accounts are only visible to their friends).
    pub fn profile_visible_for(&self, conn: &Connection, viewer: &User) -> Result<bool> {
        if !self.is_private || self.id == viewer.id {
            return Ok(true);
        }
        Friendship::exists(conn, self.id, viewer.id)
    }
}

impl NewUser {
    /// Validates and prepares a local signup. The username must be
    /// alphanumeric and both it and the email must be unused.
    pub fn new_local(
        conn: &Connection,
        username: &str,
        display_name: &str,
        email: &str,
        password: &str,
        bio: SafeString,
    ) -> Result<User> {
        if !valid_username(username) {
            return Err(Error::InvalidValue);
        }
        if User::name_used(conn, username)? || User::email_used(conn, email)? {
            return Err(Error::InvalidValue);
        }
        User::insert(
            conn,
            NewUser {
                username: username.to_owned(),
                display_name: display_name.to_owned(),
                email: email.to_owned(),
                hashed_password: User::hash_pass(password)?,
                bio,
                is_private: false,
                is_verified: false,
                badge_tier: badge_tier::NONE.to_owned(),
                role: Role::Normal as i32,
            },
        )
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&conn, id).ok())
            .or_forward(())
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::db;
    use diesel::Connection as _;

    pub(crate) fn fill_database(conn: &Connection) -> Vec<User> {
        let admin = NewUser::new_local(
            conn,
            "admin",
            "The admin",
            "admin@example.com",
            "cachou",
            SafeString::new(""),
        )
        .unwrap();
        admin.set_role(conn, Role::Admin).unwrap();
        let user = NewUser::new_local(
            conn,
            "user",
            "Some user",
            "user@example.com",
            "chocolat",
            SafeString::new("Hello there, I'm a new user"),
        )
        .unwrap();
        let other = NewUser::new_local(
            conn,
            "other",
            "Another user",
            "other@example.com",
            "plop",
            SafeString::new(""),
        )
        .unwrap();
        vec![User::get(conn, admin.id).unwrap(), user, other]
    }

    #[test]
    fn find_by() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            let test_user = User::find_by_name(&conn, "user").unwrap();
            assert_eq!(test_user.id, User::find_by_email(&conn, "user@example.com").unwrap().id);
            assert!(User::find_by_name(&conn, "nobody").is_err());
            Ok(())
        });
    }

    #[test]
    fn signup_validation() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            assert!(matches!(
                NewUser::new_local(&conn, "bad name", "x", "x@example.com", "pw", SafeString::new("")),
                Err(Error::InvalidValue)
            ));
            assert!(matches!(
                NewUser::new_local(&conn, "user", "x", "x@example.com", "pw", SafeString::new("")),
                Err(Error::InvalidValue)
            ));
            assert!(matches!(
                NewUser::new_local(&conn, "fresh", "x", "user@example.com", "pw", SafeString::new("")),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn auth() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(users[1].auth("chocolat"));
            assert!(!users[1].auth("wrong"));
            Ok(())
        });
    }

    #[test]
    fn serialization_hides_password() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let json = serde_json::to_value(&users[1]).unwrap();
            assert_json_diff::assert_json_include!(
                actual: json.clone(),
                expected: serde_json::json!({ "username": "user", "is_verified": false })
            );
            assert!(json.get("hashed_password").is_none());
            Ok(())
        });
    }

    #[test]
    fn admins() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let admins = User::admins(&conn).unwrap();
            assert_eq!(admins.len(), 1);
            assert_eq!(admins[0].id, users[0].id);
            assert!(users[0].is_admin());
            assert!(users[0].is_moderator());
            assert!(!users[1].is_admin());
            Ok(())
        });
    }

    #[test]
    fn badges() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            users[1].set_badge(&conn, badge_tier::GOLD).unwrap();
            let updated = User::get(&conn, users[1].id).unwrap();
            assert!(updated.is_verified);
            assert_eq!(updated.badge_tier, badge_tier::GOLD);

            assert!(matches!(
                users[1].set_badge(&conn, "rainbow"),
                Err(Error::InvalidValue)
            ));

            updated.set_badge(&conn, badge_tier::NONE).unwrap();
            let updated = User::get(&conn, users[1].id).unwrap();
            assert!(!updated.is_verified);
            Ok(())
        });
    }
}
