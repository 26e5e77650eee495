use crate::{schema::password_reset_requests, Connection, Error, Result};
use chrono::{offset::Utc, Duration, NaiveDateTime};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use flock_common::utils::random_hex;

#[derive(Clone, Identifiable, Queryable)]
pub struct PasswordResetRequest {
    pub id: i32,
    pub email: String,
    pub token: String,
    pub expiration_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "password_reset_requests"]
pub struct NewPasswordResetRequest {
    pub email: String,
    pub token: String,
    pub expiration_date: NaiveDateTime,
}

const TOKEN_VALIDITY_HOURS: i64 = 2;

impl PasswordResetRequest {
    /// Issues a fresh reset token for this email, invalidating any token
    /// issued before. Returns the token to put in the mail.
    pub fn insert(conn: &Connection, email: &str) -> Result<String> {
        diesel::delete(
            password_reset_requests::table.filter(password_reset_requests::email.eq(email)),
        )
        .execute(conn)?;

        let token = random_hex();
        let expiration_date = Utc::now()
            .naive_utc()
            .checked_add_signed(Duration::hours(TOKEN_VALIDITY_HOURS))
            .ok_or(Error::InvalidValue)?;
        diesel::insert_into(password_reset_requests::table)
            .values(NewPasswordResetRequest {
                email: email.to_owned(),
                token: token.clone(),
                expiration_date,
            })
            .execute(conn)?;

        Ok(token)
    }

    pub fn find_by_token(conn: &Connection, token: &str) -> Result<Self> {
        let request = password_reset_requests::table
            .filter(password_reset_requests::token.eq(token))
            .first::<Self>(conn)
            .map_err(Error::from)?;

        if request.expiration_date < Utc::now().naive_utc() {
            return Err(Error::Expired);
        }

        Ok(request)
    }

    /// Consumes a token: it can only be redeemed once.
    pub fn find_and_delete_by_token(conn: &Connection, token: &str) -> Result<Self> {
        let request = Self::find_by_token(conn, token)?;
        diesel::delete(
            password_reset_requests::table.filter(password_reset_requests::id.eq(request.id)),
        )
        .execute(conn)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests as user_tests};
    use diesel::Connection;

    #[test]
    fn issue_and_redeem() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            user_tests::fill_database(&conn);

            let token = PasswordResetRequest::insert(&conn, "admin@example.com").unwrap();
            assert!(token.len() > 32);

            let request =
                PasswordResetRequest::find_and_delete_by_token(&conn, &token).unwrap();
            assert_eq!(&request.email, "admin@example.com");

            // a token only works once
            assert!(matches!(
                PasswordResetRequest::find_by_token(&conn, &token),
                Err(Error::NotFound)
            ));
            Ok(())
        });
    }

    #[test]
    fn new_request_replaces_old_one() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            user_tests::fill_database(&conn);

            let old = PasswordResetRequest::insert(&conn, "admin@example.com").unwrap();
            PasswordResetRequest::insert(&conn, "admin@example.com").unwrap();

            let count: i64 = password_reset_requests::table
                .count()
                .get_result(&*conn)
                .unwrap();
            assert_eq!(count, 1);
            assert!(PasswordResetRequest::find_by_token(&conn, &old).is_err());
            Ok(())
        });
    }

    #[test]
    fn expired_token_is_refused() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            user_tests::fill_database(&conn);

            diesel::insert_into(password_reset_requests::table)
                .values((
                    password_reset_requests::email.eq("admin@example.com"),
                    password_reset_requests::token.eq("abcdef"),
                    password_reset_requests::expiration_date.eq(Utc::now().naive_utc()),
                ))
                .execute(&*conn)
                .unwrap();

            assert!(matches!(
                PasswordResetRequest::find_by_token(&conn, "abcdef"),
                Err(Error::Expired)
            ));
            Ok(())
        });
    }
}
