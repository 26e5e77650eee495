use crate::{schema::notifications, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

pub mod notification_kind {
    pub const COMMENT: &str = "COMMENT";
    pub const FOLLOW: &str = "FOLLOW";
    pub const FRIEND_ACCEPT: &str = "FRIEND_ACCEPT";
    pub const FRIEND_REQUEST: &str = "FRIEND_REQUEST";
    pub const LIKE: &str = "LIKE";
    pub const REPORT: &str = "REPORT";
    pub const VERIFICATION: &str = "VERIFICATION";
}

/// For most kinds `object_id` is the id of the row that triggered the
/// notification (the like, the follow, the request). For `REPORT` it is the
/// id of the reported content itself, so admin screens can link straight to
/// it.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub kind: String,
    pub object_id: i32,
    pub read: bool,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "notifications"]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: String,
    pub object_id: i32,
}

impl Notification {
    insert!(notifications, NewNotification);
    get!(notifications);

    pub fn find_for_user(conn: &Connection, user: &User) -> Result<Vec<Notification>> {
        notifications::table
            .filter(notifications::user_id.eq(user.id))
            .order_by(notifications::creation_date.desc())
            .load::<Notification>(conn)
            .map_err(Error::from)
    }

    pub fn page_for_user(
        conn: &Connection,
        user: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Notification>> {
        notifications::table
            .filter(notifications::user_id.eq(user.id))
            .order_by(notifications::creation_date.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load::<Notification>(conn)
            .map_err(Error::from)
    }

    pub fn count_unread(conn: &Connection, user: &User) -> Result<i64> {
        notifications::table
            .filter(notifications::user_id.eq(user.id))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn find<S: Into<String>>(conn: &Connection, kind: S, obj: i32) -> Result<Notification> {
        notifications::table
            .filter(notifications::kind.eq(kind.into()))
            .filter(notifications::object_id.eq(obj))
            .first::<Notification>(conn)
            .map_err(Error::from)
    }

    pub fn mark_read(&self, conn: &Connection) -> Result<()> {
        diesel::update(self)
            .set(notifications::read.eq(true))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn mark_all_read(conn: &Connection, user: &User) -> Result<()> {
        diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user.id))
                .filter(notifications::read.eq(false)),
        )
        .set(notifications::read.eq(true))
        .execute(conn)
        .map(|_| ())
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
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn unread_then_read() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Notification::insert(
                &conn,
                NewNotification {
                    user_id: users[1].id,
                    kind: notification_kind::LIKE.to_string(),
                    object_id: 1,
                },
            )
            .unwrap();
            Notification::insert(
                &conn,
                NewNotification {
                    user_id: users[1].id,
                    kind: notification_kind::COMMENT.to_string(),
                    object_id: 2,
                },
            )
            .unwrap();

            assert_eq!(Notification::count_unread(&conn, &users[1]).unwrap(), 2);
            let notifs = Notification::find_for_user(&conn, &users[1]).unwrap();
            assert_eq!(notifs.len(), 2);

            notifs[0].mark_read(&conn).unwrap();
            assert_eq!(Notification::count_unread(&conn, &users[1]).unwrap(), 1);

            Notification::mark_all_read(&conn, &users[1]).unwrap();
            assert_eq!(Notification::count_unread(&conn, &users[1]).unwrap(), 0);
            Ok(())
        });
    }
}
