use crate::{
    notifications::*, schema::reports, users::User, Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};

/// What kind of content a report points at.
pub mod report_kind {
    pub const COMMENT: &str = "comment";
    pub const MESSAGE: &str = "message";
    pub const POST: &str = "post";
    pub const STORY: &str = "story";
    pub const USER: &str = "user";

    pub fn is_valid(kind: &str) -> bool {
        matches!(kind, COMMENT | MESSAGE | POST | STORY | USER)
    }
}

#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Report {
    pub id: i32,
    pub reporter_id: i32,
    pub reported_id: i32,
    pub kind: String,
    pub reason: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "reports"]
pub struct NewReport {
    pub reporter_id: i32,
    pub reported_id: i32,
    pub kind: String,
    pub reason: String,
}

impl Report {
    insert!(reports, NewReport);
    get!(reports);

    /// Files a report and fans out one notification to every admin account,
    /// all in one transaction: either the report and the full admin fan-out
    /// land, or nothing does.
    ///
    /// The notifications carry the *reported content's* id so the admin
    /// panel can link to it directly.
    pub fn create(
        conn: &Connection,
        reporter: &User,
        reported_id: i32,
        kind: &str,
        reason: &str,
    ) -> Result<Report> {
        if !report_kind::is_valid(kind) {
            return Err(Error::InvalidValue);
        }
        conn.transaction(|| {
            let report = Report::insert(
                conn,
                NewReport {
                    reporter_id: reporter.id,
                    reported_id,
                    kind: kind.to_string(),
                    reason: reason.to_string(),
                },
            )?;
            for admin in User::admins(conn)? {
                Notification::insert(
                    conn,
                    NewNotification {
                        kind: notification_kind::REPORT.to_string(),
                        object_id: reported_id,
                        user_id: admin.id,
                    },
                )?;
            }
            Ok(report)
        })
    }

    pub fn list(conn: &Connection) -> Result<Vec<Report>> {
        reports::table
            .order(reports::creation_date.desc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        posts::tests::fill_posts,
        tests::db,
        users::{tests::fill_database, Role},
    };
    use diesel::Connection as _;

    #[test]
    fn one_notification_per_admin() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            // promote a second admin so the fan-out is observable
            users[2].set_role(&conn, Role::Admin).unwrap();

            let report =
                Report::create(&conn, &users[1], posts[0].id, report_kind::POST, "spam").unwrap();
            assert_eq!(report.reason, "spam");

            let mut notified = Vec::new();
            for admin in User::admins(&conn).unwrap() {
                let notifs = Notification::find_for_user(&conn, &admin)
                    .unwrap()
                    .into_iter()
                    .filter(|n| n.kind == notification_kind::REPORT)
                    .collect::<Vec<_>>();
                assert_eq!(notifs.len(), 1);
                assert_eq!(notifs[0].object_id, posts[0].id);
                notified.push(admin.id);
            }
            assert_eq!(notified.len(), 2);
            Ok(())
        });
    }

    #[test]
    fn invalid_kind_is_rejected() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(matches!(
                Report::create(&conn, &users[1], 1, "emoji", "?"),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }
}
