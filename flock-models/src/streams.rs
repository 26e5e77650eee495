use crate::{
    schema::{live_streams, stream_viewers},
    users::User,
    Connection, Error, Result,
};
use chrono::{NaiveDateTime, Utc};
use diesel::{
    self,
    result::{DatabaseErrorKind, Error as DieselError},
    ExpressionMethods, QueryDsl, RunQueryDsl,
};

/// A live broadcast. `ended_at` is `None` while the stream is on air.
#[derive(Clone, Queryable, Identifiable, Serialize)]
#[table_name = "live_streams"]
pub struct LiveStream {
    pub id: i32,
    pub host_id: i32,
    pub title: String,
    pub started_at: NaiveDateTime,
    pub ended_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[table_name = "live_streams"]
pub struct NewLiveStream {
    pub host_id: i32,
    pub title: String,
}

#[derive(Clone, Queryable, Identifiable, Associations, Serialize)]
#[belongs_to(LiveStream, foreign_key = "stream_id")]
pub struct StreamViewer {
    pub id: i32,
    pub stream_id: i32,
    pub user_id: i32,
    pub joined_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "stream_viewers"]
pub struct NewStreamViewer {
    pub stream_id: i32,
    pub user_id: i32,
}

impl LiveStream {
    insert!(live_streams, NewLiveStream);
    get!(live_streams);

    /// Goes live. A host can only run one stream at a time.
    pub fn start(conn: &Connection, host: &User, title: &str) -> Result<LiveStream> {
        if title.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        if LiveStream::live_for_host(conn, host.id)?.is_some() {
            return Err(Error::InvalidValue);
        }
        LiveStream::insert(
            conn,
            NewLiveStream {
                host_id: host.id,
                title: title.trim().to_string(),
            },
        )
    }

    /// Ends the broadcast and clears the viewer list. Ending an already
    /// finished stream is a no-op.
    pub fn end(&self, conn: &Connection) -> Result<()> {
        if self.ended_at.is_some() {
            return Ok(());
        }
        diesel::update(self)
            .set(live_streams::ended_at.eq(Some(Utc::now().naive_utc())))
            .execute(conn)?;
        diesel::delete(stream_viewers::table.filter(stream_viewers::stream_id.eq(self.id)))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn is_live(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn live_for_host(conn: &Connection, host_id: i32) -> Result<Option<LiveStream>> {
        live_streams::table
            .filter(live_streams::host_id.eq(host_id))
            .filter(live_streams::ended_at.is_null())
            .first(conn)
            .map(Some)
            .or_else(|e| match e {
                DieselError::NotFound => Ok(None),
                e => Err(Error::from(e)),
            })
    }

    /// Every stream currently on air, newest first.
    pub fn live(conn: &Connection) -> Result<Vec<LiveStream>> {
        live_streams::table
            .filter(live_streams::ended_at.is_null())
            .order(live_streams::started_at.desc())
            .load(conn)
            .map_err(Error::from)
    }

    /// Joins the audience. Duplicate joins (double-taps, reconnects) land on
    /// the unique index and are treated as already joined.
    pub fn join(&self, conn: &Connection, viewer: &User) -> Result<()> {
        if !self.is_live() {
            return Err(Error::Expired);
        }
        match diesel::insert_into(stream_viewers::table)
            .values(NewStreamViewer {
                stream_id: self.id,
                user_id: viewer.id,
            })
            .execute(conn)
        {
            Ok(_) => Ok(()),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(()),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Leaves the audience. Leaving twice is harmless.
    pub fn leave(&self, conn: &Connection, viewer: &User) -> Result<()> {
        diesel::delete(
            stream_viewers::table
                .filter(stream_viewers::stream_id.eq(self.id))
                .filter(stream_viewers::user_id.eq(viewer.id)),
        )
        .execute(conn)
        .map(|_| ())
        .map_err(Error::from)
    }

    pub fn viewer_count(&self, conn: &Connection) -> Result<i64> {
        stream_viewers::table
            .filter(stream_viewers::stream_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn get_host(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.host_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn one_live_stream_per_host() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let stream = LiveStream::start(&conn, &users[0], "cooking").unwrap();
            assert!(matches!(
                LiveStream::start(&conn, &users[0], "second show"),
                Err(Error::InvalidValue)
            ));

            stream.end(&conn).unwrap();
            LiveStream::start(&conn, &users[0], "second show").unwrap();
            Ok(())
        });
    }

    #[test]
    fn join_is_idempotent() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let stream = LiveStream::start(&conn, &users[0], "q&a").unwrap();

            stream.join(&conn, &users[1]).unwrap();
            stream.join(&conn, &users[1]).unwrap();
            assert_eq!(stream.viewer_count(&conn).unwrap(), 1);

            stream.leave(&conn, &users[1]).unwrap();
            stream.leave(&conn, &users[1]).unwrap();
            assert_eq!(stream.viewer_count(&conn).unwrap(), 0);
            Ok(())
        });
    }

    #[test]
    fn ending_clears_the_audience() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let stream = LiveStream::start(&conn, &users[0], "finale").unwrap();
            stream.join(&conn, &users[1]).unwrap();
            stream.join(&conn, &users[2]).unwrap();

            stream.end(&conn).unwrap();
            let ended = LiveStream::get(&conn, stream.id).unwrap();
            assert!(!ended.is_live());
            assert_eq!(ended.viewer_count(&conn).unwrap(), 0);
            assert!(matches!(ended.join(&conn, &users[1]), Err(Error::Expired)));
            Ok(())
        });
    }
}
