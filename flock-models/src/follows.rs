use crate::{
    notifications::*, schema::follows, users::User, Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A one-way subscription edge, independent of friendship. It only drives
/// visibility of "followers"-tier posts.
#[derive(Clone, Queryable, Identifiable, Associations, Serialize)]
#[belongs_to(User, foreign_key = "following_id")]
pub struct Follow {
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "follows"]
pub struct NewFollow {
    pub follower_id: i32,
    pub following_id: i32,
}

impl Follow {
    insert!(follows, NewFollow);
    get!(follows);

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follow> {
        follows::table
            .filter(follows::follower_id.eq(from))
            .filter(follows::following_id.eq(to))
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Creates the edge and notifies the followed account. Following someone
    /// already followed is a benign no-op.
    pub fn create(conn: &Connection, follower: &User, following: &User) -> Result<Follow> {
        if follower.id == following.id {
            return Err(Error::InvalidValue);
        }
        if let Ok(existing) = Follow::find(conn, follower.id, following.id) {
            return Ok(existing);
        }
        let res = Follow::insert(
            conn,
            NewFollow {
                follower_id: follower.id,
                following_id: following.id,
            },
        )?;
        res.notify(conn)?;
        Ok(res)
    }

    pub fn notify(&self, conn: &Connection) -> Result<()> {
        Notification::insert(
            conn,
            NewNotification {
                kind: notification_kind::FOLLOW.to_string(),
                object_id: self.id,
                user_id: self.following_id,
            },
        )
        .map(|_| ())
    }

    /// Removes the edge and its notification. Unfollowing someone not
    /// followed is a benign no-op.
    pub fn delete(conn: &Connection, follower: &User, following: &User) -> Result<()> {
        if let Ok(follow) = Follow::find(conn, follower.id, following.id) {
            if let Ok(notif) = Notification::find(conn, notification_kind::FOLLOW, follow.id) {
                notif.delete(conn)?;
            }
            diesel::delete(&follow).execute(conn)?;
        }
        Ok(())
    }

    pub fn count_followers(conn: &Connection, user_id: i32) -> Result<i64> {
        follows::table
            .filter(follows::following_id.eq(user_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn count_following(conn: &Connection, user_id: i32) -> Result<i64> {
        follows::table
            .filter(follows::follower_id.eq(user_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Ids of the accounts `user_id` follows.
    pub fn following_ids(conn: &Connection, user_id: i32) -> Result<Vec<i32>> {
        follows::table
            .filter(follows::follower_id.eq(user_id))
            .select(follows::following_id)
            .load(conn)
            .map_err(Error::from)
    }

    pub fn followers(conn: &Connection, user: &User) -> Result<Vec<User>> {
        use crate::schema::users;
        let ids = follows::table
            .filter(follows::following_id.eq(user.id))
            .select(follows::follower_id);
        users::table
            .filter(users::id.eq_any(ids))
            .load(conn)
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn follow_then_unfollow_restores_count() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let before = Follow::count_followers(&conn, users[1].id).unwrap();

            Follow::create(&conn, &users[2], &users[1]).unwrap();
            assert_eq!(Follow::count_followers(&conn, users[1].id).unwrap(), before + 1);

            Follow::delete(&conn, &users[2], &users[1]).unwrap();
            assert_eq!(Follow::count_followers(&conn, users[1].id).unwrap(), before);
            Ok(())
        });
    }

    #[test]
    fn follow_is_idempotent() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let a = Follow::create(&conn, &users[2], &users[1]).unwrap();
            let b = Follow::create(&conn, &users[2], &users[1]).unwrap();
            assert_eq!(a.id, b.id);
            assert_eq!(Follow::count_followers(&conn, users[1].id).unwrap(), 1);
            Ok(())
        });
    }

    #[test]
    fn self_follow_rejected() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(matches!(
                Follow::create(&conn, &users[1], &users[1]),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn notification_follows_the_edge() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let follow = Follow::create(&conn, &users[2], &users[1]).unwrap();
            let notif = Notification::find(&conn, notification_kind::FOLLOW, follow.id).unwrap();
            assert_eq!(notif.user_id, users[1].id);

            Follow::delete(&conn, &users[2], &users[1]).unwrap();
            assert!(Notification::find(&conn, notification_kind::FOLLOW, follow.id).is_err());
            Ok(())
        });
    }

    #[test]
    fn unfollow_when_not_following_is_benign() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(Follow::delete(&conn, &users[2], &users[1]).is_ok());
            Ok(())
        });
    }
}
