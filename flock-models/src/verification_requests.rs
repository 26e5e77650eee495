use crate::{
    friend_requests::request_status,
    notifications::*,
    schema::verification_requests,
    users::{badge_tier, User},
    Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A user's application for a verification badge, reviewed by admins.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct VerificationRequest {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "verification_requests"]
pub struct NewVerificationRequest {
    pub user_id: i32,
    pub status: String,
}

impl VerificationRequest {
    insert!(verification_requests, NewVerificationRequest);
    get!(verification_requests);

    /// Applies for verification. Already-verified accounts and accounts with
    /// a pending application are turned away.
    pub fn apply(conn: &Connection, user: &User) -> Result<VerificationRequest> {
        if user.is_verified {
            return Err(Error::InvalidValue);
        }
        if VerificationRequest::find_pending(conn, user.id).is_ok() {
            return Err(Error::InvalidValue);
        }
        VerificationRequest::insert(
            conn,
            NewVerificationRequest {
                user_id: user.id,
                status: request_status::PENDING.to_string(),
            },
        )
    }

    pub fn find_pending(conn: &Connection, user_id: i32) -> Result<VerificationRequest> {
        verification_requests::table
            .filter(verification_requests::user_id.eq(user_id))
            .filter(verification_requests::status.eq(request_status::PENDING))
            .first(conn)
            .map_err(Error::from)
    }

    pub fn pending(conn: &Connection) -> Result<Vec<VerificationRequest>> {
        verification_requests::table
            .filter(verification_requests::status.eq(request_status::PENDING))
            .order(verification_requests::creation_date.asc())
            .load(conn)
            .map_err(Error::from)
    }

    /// Approves the application with the chosen badge tier: the request is
    /// marked accepted, the badge lands on the account, and the applicant is
    /// notified, atomically.
    pub fn approve(&self, conn: &Connection, tier: &str) -> Result<()> {
        if self.status != request_status::PENDING {
            return Err(Error::InvalidValue);
        }
        if tier == badge_tier::NONE || !badge_tier::is_valid(tier) {
            return Err(Error::InvalidValue);
        }
        conn.transaction(|| {
            diesel::update(self)
                .set(verification_requests::status.eq(request_status::ACCEPTED))
                .execute(conn)?;
            User::get(conn, self.user_id)?.set_badge(conn, tier)?;
            Notification::insert(
                conn,
                NewNotification {
                    kind: notification_kind::VERIFICATION.to_string(),
                    object_id: self.id,
                    user_id: self.user_id,
                },
            )?;
            Ok(())
        })
    }

    /// Rejects the application. The account keeps whatever badge it had.
    pub fn reject(&self, conn: &Connection) -> Result<()> {
        if self.status != request_status::PENDING {
            return Err(Error::InvalidValue);
        }
        diesel::update(self)
            .set(verification_requests::status.eq(request_status::REJECTED))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn approval_sets_badge_and_notifies() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = VerificationRequest::apply(&conn, &users[1]).unwrap();
            req.approve(&conn, badge_tier::BLUE).unwrap();

            let verified = User::get(&conn, users[1].id).unwrap();
            assert!(verified.is_verified);
            assert_eq!(verified.badge_tier, badge_tier::BLUE);

            let notif =
                Notification::find(&conn, notification_kind::VERIFICATION, req.id).unwrap();
            assert_eq!(notif.user_id, users[1].id);

            // the request is settled, a second review must fail
            let settled = VerificationRequest::get(&conn, req.id).unwrap();
            assert!(matches!(
                settled.approve(&conn, badge_tier::GOLD),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn no_duplicate_pending_applications() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            VerificationRequest::apply(&conn, &users[1]).unwrap();
            assert!(matches!(
                VerificationRequest::apply(&conn, &users[1]),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn rejection_leaves_account_untouched() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = VerificationRequest::apply(&conn, &users[1]).unwrap();
            req.reject(&conn).unwrap();

            let user = User::get(&conn, users[1].id).unwrap();
            assert!(!user.is_verified);
            assert_eq!(user.badge_tier, badge_tier::NONE);
            // rejection frees the user to apply again
            VerificationRequest::apply(&conn, &user).unwrap();
            Ok(())
        });
    }

    #[test]
    fn approving_with_none_tier_is_invalid() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = VerificationRequest::apply(&conn, &users[1]).unwrap();
            assert!(matches!(
                req.approve(&conn, badge_tier::NONE),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }
}
