use crate::{
    friendships::Friendship, notifications::*, schema::friend_requests, users::User, Connection,
    Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};

pub mod request_status {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "accepted";
    pub const REJECTED: &str = "rejected";
}

/// An ordered (sender, receiver) pair. Acceptance additionally creates the
/// canonical `Friendship`; the request row stays behind as an audit artifact.
///
/// Two accounts can each hold a pending request towards the other at the
/// same time; accepting either one yields the same canonical edge.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct FriendRequest {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub status: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "friend_requests"]
pub struct NewFriendRequest {
    pub sender_id: i32,
    pub receiver_id: i32,
    pub status: String,
}

impl FriendRequest {
    insert!(friend_requests, NewFriendRequest);
    get!(friend_requests);

    pub fn find_pending(conn: &Connection, sender_id: i32, receiver_id: i32) -> Result<Self> {
        friend_requests::table
            .filter(friend_requests::sender_id.eq(sender_id))
            .filter(friend_requests::receiver_id.eq(receiver_id))
            .filter(friend_requests::status.eq(request_status::PENDING))
            .first(conn)
            .map_err(Error::from)
    }

    /// Sends a new pending request and notifies the receiver. A duplicate
    /// pending request in the same direction is rejected; a pending request
    /// in the opposite direction is not checked.
    pub fn send(conn: &Connection, sender: &User, receiver: &User) -> Result<FriendRequest> {
        if sender.id == receiver.id {
            return Err(Error::InvalidValue);
        }
        if FriendRequest::find_pending(conn, sender.id, receiver.id).is_ok() {
            return Err(Error::InvalidValue);
        }
        let res = FriendRequest::insert(
            conn,
            NewFriendRequest {
                sender_id: sender.id,
                receiver_id: receiver.id,
                status: request_status::PENDING.to_string(),
            },
        )?;
        Notification::insert(
            conn,
            NewNotification {
                kind: notification_kind::FRIEND_REQUEST.to_string(),
                object_id: res.id,
                user_id: receiver.id,
            },
        )?;
        Ok(res)
    }

    /// Marks the request accepted and creates the friendship edge, in one
    /// transaction so a crash between the two writes can't leave an accepted
    /// request without its friendship.
    pub fn accept(&self, conn: &Connection, by: &User) -> Result<Friendship> {
        if by.id != self.receiver_id {
            return Err(Error::Unauthorized);
        }
        if self.status != request_status::PENDING {
            return Err(Error::InvalidValue);
        }
        conn.transaction(|| {
            diesel::update(self)
                .set(friend_requests::status.eq(request_status::ACCEPTED))
                .execute(conn)?;
            let friendship = Friendship::connect(conn, self.sender_id, self.receiver_id)?;
            Notification::insert(
                conn,
                NewNotification {
                    kind: notification_kind::FRIEND_ACCEPT.to_string(),
                    object_id: friendship.id,
                    user_id: self.sender_id,
                },
            )?;
            Ok(friendship)
        })
    }

    /// Terminal for this row; either party can send a fresh request later.
    pub fn reject(&self, conn: &Connection, by: &User) -> Result<()> {
        if by.id != self.receiver_id {
            return Err(Error::Unauthorized);
        }
        if self.status != request_status::PENDING {
            return Err(Error::InvalidValue);
        }
        diesel::update(self)
            .set(friend_requests::status.eq(request_status::REJECTED))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn incoming(conn: &Connection, user: &User) -> Result<Vec<FriendRequest>> {
        friend_requests::table
            .filter(friend_requests::receiver_id.eq(user.id))
            .filter(friend_requests::status.eq(request_status::PENDING))
            .order(friend_requests::creation_date.desc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn outgoing(conn: &Connection, user: &User) -> Result<Vec<FriendRequest>> {
        friend_requests::table
            .filter(friend_requests::sender_id.eq(user.id))
            .filter(friend_requests::status.eq(request_status::PENDING))
            .order(friend_requests::creation_date.desc())
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
    fn accept_creates_canonical_friendship() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let (sender, receiver) = (&users[1], &users[2]);

            let req = FriendRequest::send(&conn, sender, receiver).unwrap();
            assert_eq!(req.status, request_status::PENDING);
            assert!(!Friendship::exists(&conn, sender.id, receiver.id).unwrap());

            let friendship = req.accept(&conn, receiver).unwrap();
            assert_eq!(friendship.friend_1_id, sender.id.min(receiver.id));
            assert_eq!(friendship.friend_2_id, sender.id.max(receiver.id));

            let req = FriendRequest::get(&conn, req.id).unwrap();
            assert_eq!(req.status, request_status::ACCEPTED);
            Ok(())
        });
    }

    #[test]
    fn double_accept_is_rejected_and_keeps_single_edge() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = FriendRequest::send(&conn, &users[1], &users[2]).unwrap();
            req.accept(&conn, &users[2]).unwrap();

            let accepted = FriendRequest::get(&conn, req.id).unwrap();
            assert!(matches!(
                accepted.accept(&conn, &users[2]),
                Err(Error::InvalidValue)
            ));
            assert_eq!(Friendship::count_for_user(&conn, users[1].id).unwrap(), 1);
            Ok(())
        });
    }

    #[test]
    fn only_receiver_may_answer() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = FriendRequest::send(&conn, &users[1], &users[2]).unwrap();
            assert!(matches!(req.accept(&conn, &users[1]), Err(Error::Unauthorized)));
            assert!(matches!(req.reject(&conn, &users[0]), Err(Error::Unauthorized)));
            Ok(())
        });
    }

    #[test]
    fn reject_never_creates_friendship_and_allows_resend() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = FriendRequest::send(&conn, &users[1], &users[2]).unwrap();
            req.reject(&conn, &users[2]).unwrap();

            assert!(!Friendship::exists(&conn, users[1].id, users[2].id).unwrap());
            assert_eq!(
                FriendRequest::get(&conn, req.id).unwrap().status,
                request_status::REJECTED
            );

            // both directions are open again
            assert!(FriendRequest::send(&conn, &users[1], &users[2]).is_ok());
            assert!(FriendRequest::send(&conn, &users[2], &users[1]).is_ok());
            Ok(())
        });
    }

    #[test]
    fn duplicate_pending_is_rejected_but_reverse_is_not() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            FriendRequest::send(&conn, &users[1], &users[2]).unwrap();
            assert!(matches!(
                FriendRequest::send(&conn, &users[1], &users[2]),
                Err(Error::InvalidValue)
            ));

            // simultaneous opposite-direction requests are an observed state
            let reverse = FriendRequest::send(&conn, &users[2], &users[1]).unwrap();
            assert_eq!(reverse.status, request_status::PENDING);

            // accepting either one converges on the same edge
            reverse.accept(&conn, &users[1]).unwrap();
            assert_eq!(Friendship::count_for_user(&conn, users[1].id).unwrap(), 1);
            Ok(())
        });
    }

    #[test]
    fn request_notifies_receiver_and_accept_notifies_sender() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let req = FriendRequest::send(&conn, &users[1], &users[2]).unwrap();
            let notif =
                Notification::find(&conn, notification_kind::FRIEND_REQUEST, req.id).unwrap();
            assert_eq!(notif.user_id, users[2].id);

            let friendship = req.accept(&conn, &users[2]).unwrap();
            let notif =
                Notification::find(&conn, notification_kind::FRIEND_ACCEPT, friendship.id).unwrap();
            assert_eq!(notif.user_id, users[1].id);
            Ok(())
        });
    }
}
