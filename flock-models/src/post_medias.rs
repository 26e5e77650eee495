use crate::{medias::Media, schema::post_medias, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// Attachment of a media file to a post, ordered by `position` so the grid
/// layout stays stable.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct PostMedia {
    pub id: i32,
    pub post_id: i32,
    pub media_id: i32,
    pub position: i32,
}

#[derive(Insertable)]
#[table_name = "post_medias"]
pub struct NewPostMedia {
    pub post_id: i32,
    pub media_id: i32,
    pub position: i32,
}

impl PostMedia {
    insert!(post_medias, NewPostMedia);
    get!(post_medias);
    list_by!(post_medias, for_post, post_id as i32);

    pub fn attach_all(conn: &Connection, post_id: i32, media_ids: &[i32]) -> Result<()> {
        for (position, media_id) in media_ids.iter().enumerate() {
            PostMedia::insert(
                conn,
                NewPostMedia {
                    post_id,
                    media_id: *media_id,
                    position: position as i32,
                },
            )?;
        }
        Ok(())
    }

    pub fn medias_for_post(conn: &Connection, post_id: i32) -> Result<Vec<Media>> {
        post_medias::table
            .filter(post_medias::post_id.eq(post_id))
            .order(post_medias::position.asc())
            .load::<PostMedia>(conn)?
            .into_iter()
            .map(|pm| Media::get(conn, pm.media_id))
            .collect()
    }

    pub fn delete_for_post(conn: &Connection, post_id: i32) -> Result<()> {
        diesel::delete(post_medias::table.filter(post_medias::post_id.eq(post_id)))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}
