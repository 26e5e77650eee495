use crate::{schema::friendships, users::User, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, BoolExpressionMethods, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A mutual relationship between two accounts. The pair is canonicalized
/// (lower id first) so a single row represents the edge regardless of which
/// side initiated it, and existence is the only state.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Friendship {
    pub id: i32,
    pub friend_1_id: i32,
    pub friend_2_id: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "friendships"]
pub struct NewFriendship {
    pub friend_1_id: i32,
    pub friend_2_id: i32,
}

impl Friendship {
    insert!(friendships, NewFriendship);
    get!(friendships);

    fn canonical(a: i32, b: i32) -> (i32, i32) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn find_for_pair(conn: &Connection, a: i32, b: i32) -> Result<Friendship> {
        let (lo, hi) = Friendship::canonical(a, b);
        friendships::table
            .filter(friendships::friend_1_id.eq(lo))
            .filter(friendships::friend_2_id.eq(hi))
            .first(conn)
            .map_err(Error::from)
    }

    pub fn exists(conn: &Connection, a: i32, b: i32) -> Result<bool> {
        use diesel::dsl::{exists, select};
        let (lo, hi) = Friendship::canonical(a, b);
        select(exists(
            friendships::table
                .filter(friendships::friend_1_id.eq(lo))
                .filter(friendships::friend_2_id.eq(hi)),
        ))
        .get_result(conn)
        .map_err(Error::from)
    }

    /// Creates the canonical edge between two accounts. Connecting an
    /// already-connected pair returns the existing edge, so a double accept
    /// can never produce a duplicate.
    pub fn connect(conn: &Connection, a: i32, b: i32) -> Result<Friendship> {
        if a == b {
            return Err(Error::InvalidValue);
        }
        if let Ok(existing) = Friendship::find_for_pair(conn, a, b) {
            return Ok(existing);
        }
        let (lo, hi) = Friendship::canonical(a, b);
        Friendship::insert(
            conn,
            NewFriendship {
                friend_1_id: lo,
                friend_2_id: hi,
            },
        )
    }

    /// Removes the edge, if any ("unfriend").
    pub fn disconnect(conn: &Connection, a: i32, b: i32) -> Result<()> {
        if let Ok(friendship) = Friendship::find_for_pair(conn, a, b) {
            diesel::delete(&friendship).execute(conn)?;
        }
        Ok(())
    }

    pub fn count_for_user(conn: &Connection, user_id: i32) -> Result<i64> {
        friendships::table
            .filter(
                friendships::friend_1_id
                    .eq(user_id)
                    .or(friendships::friend_2_id.eq(user_id)),
            )
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn friend_ids(conn: &Connection, user_id: i32) -> Result<Vec<i32>> {
        let edges: Vec<(i32, i32)> = friendships::table
            .filter(
                friendships::friend_1_id
                    .eq(user_id)
                    .or(friendships::friend_2_id.eq(user_id)),
            )
            .select((friendships::friend_1_id, friendships::friend_2_id))
            .load(conn)?;
        Ok(edges
            .into_iter()
            .map(|(a, b)| if a == user_id { b } else { a })
            .collect())
    }

    pub fn friends(conn: &Connection, user: &User) -> Result<Vec<User>> {
        use crate::schema::users;
        let ids = Friendship::friend_ids(conn, user.id)?;
        users::table
            .filter(users::id.eq_any(ids))
            .load(conn)
            .map_err(Error::from)
    }

    /// The other member of the pair.
    pub fn other(&self, user_id: i32) -> i32 {
        if self.friend_1_id == user_id {
            self.friend_2_id
        } else {
            self.friend_1_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn canonical_order() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let (a, b) = (users[1].id, users[2].id);

            // connect in "reverse" direction, the stored pair is still sorted
            let friendship = Friendship::connect(&conn, b, a).unwrap();
            assert_eq!(friendship.friend_1_id, a.min(b));
            assert_eq!(friendship.friend_2_id, a.max(b));
            Ok(())
        });
    }

    #[test]
    fn connect_twice_is_single_edge() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let first = Friendship::connect(&conn, users[1].id, users[2].id).unwrap();
            let second = Friendship::connect(&conn, users[2].id, users[1].id).unwrap();
            assert_eq!(first.id, second.id);
            assert_eq!(Friendship::count_for_user(&conn, users[1].id).unwrap(), 1);
            Ok(())
        });
    }

    #[test]
    fn friend_ids_are_symmetric() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Friendship::connect(&conn, users[1].id, users[2].id).unwrap();
            assert_eq!(Friendship::friend_ids(&conn, users[1].id).unwrap(), vec![users[2].id]);
            assert_eq!(Friendship::friend_ids(&conn, users[2].id).unwrap(), vec![users[1].id]);
            assert!(Friendship::exists(&conn, users[2].id, users[1].id).unwrap());
            Ok(())
        });
    }

    #[test]
    fn disconnect_removes_edge() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Friendship::connect(&conn, users[1].id, users[2].id).unwrap();
            Friendship::disconnect(&conn, users[2].id, users[1].id).unwrap();
            assert!(!Friendship::exists(&conn, users[1].id, users[2].id).unwrap());
            // disconnecting again is a no-op
            assert!(Friendship::disconnect(&conn, users[1].id, users[2].id).is_ok());
            Ok(())
        });
    }
}
