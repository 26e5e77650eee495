use crate::{db_conn::DbConn, schema::api_tokens, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
    Outcome,
};

#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct ApiToken {
    pub id: i32,
    pub creation_date: NaiveDateTime,
    #[serde(skip_serializing)]
    pub value: String,

    /// Scopes, separated by +
    /// Global scopes are read and write
    /// and both can be limited to an endpoint by affixing them with :ENDPOINT
    ///
    /// Examples :
    ///
    /// read
    /// read+write
    /// read:posts
    /// read:posts+write:posts
    pub scopes: String,
    pub user_id: i32,
}

#[derive(Insertable)]
#[table_name = "api_tokens"]
pub struct NewApiToken {
    pub value: String,
    pub scopes: String,
    pub user_id: i32,
}

impl ApiToken {
    get!(api_tokens);
    insert!(api_tokens, NewApiToken);
    find_by!(api_tokens, find_by_value, value as &str);
    list_by!(api_tokens, for_user, user_id as i32);

    pub fn can(&self, what: &'static str, scope: &'static str) -> bool {
        let full_scope = what.to_owned() + ":" + scope;
        self.scopes
            .split('+')
            .any(|s| s == what || s == full_scope)
    }

    pub fn can_read(&self, scope: &'static str) -> bool {
        self.can("read", scope)
    }

    pub fn can_write(&self, scope: &'static str) -> bool {
        self.can("write", scope)
    }

    pub fn get_user(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.user_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}

#[derive(Debug)]
pub enum TokenError {
    /// The Authorization header was not present
    NoHeader,

    /// The type of the token was not specified ("Basic" or "Bearer" for instance)
    NoType,

    /// No value was provided
    NoValue,

    /// Token invalid or expired
    DbError,
}

impl<'a, 'r> FromRequest<'a, 'r> for ApiToken {
    type Error = TokenError;

    fn from_request(request: &'a Request<'r>) -> request::Outcome<ApiToken, TokenError> {
        let headers: Vec<_> = request.headers().get("Authorization").collect();
        if headers.len() != 1 {
            return Outcome::Failure((Status::BadRequest, TokenError::NoHeader));
        }

        let mut parsed_header = headers[0].split(' ');
        let auth_type = match parsed_header.next() {
            Some(t) => t,
            None => return Outcome::Failure((Status::BadRequest, TokenError::NoType)),
        };
        let val = match parsed_header.next() {
            Some(v) => v,
            None => return Outcome::Failure((Status::BadRequest, TokenError::NoValue)),
        };

        if auth_type == "Bearer" {
            let conn = match request.guard::<DbConn>() {
                Outcome::Success(conn) => conn,
                _ => return Outcome::Failure((Status::InternalServerError, TokenError::DbError)),
            };
            if let Ok(token) = ApiToken::find_by_value(&*conn, val) {
                return Outcome::Success(token);
            }
        }

        Outcome::Forward(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;
    use flock_common::utils::random_hex;

    #[test]
    fn scopes() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let token = ApiToken::insert(
                &conn,
                NewApiToken {
                    value: random_hex(),
                    scopes: "read+write:posts".to_owned(),
                    user_id: users[1].id,
                },
            )
            .unwrap();

            assert!(token.can_read("posts"));
            assert!(token.can_read("messages"));
            assert!(token.can_write("posts"));
            assert!(!token.can_write("messages"));
            assert_eq!(token.get_user(&conn).unwrap().id, users[1].id);
            Ok(())
        });
    }
}
