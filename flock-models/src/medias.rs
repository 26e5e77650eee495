use crate::{public_url, schema::medias, users::User, Connection, Error, Result, CONFIG};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use guid_create::GUID;
use std::{
    fs::{self, DirBuilder},
    path::{self, Path, PathBuf},
};
use tracing::warn;

#[derive(Clone, Identifiable, Queryable, Serialize)]
pub struct Media {
    pub id: i32,
    pub file_path: String,
    pub alt_text: String,
    pub owner_id: i32,
}

#[derive(Insertable)]
#[table_name = "medias"]
pub struct NewMedia {
    pub file_path: String,
    pub alt_text: String,
    pub owner_id: i32,
}

#[derive(PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    Unknown,
}

impl MediaCategory {
    pub fn to_string(&self) -> &str {
        match *self {
            MediaCategory::Image => "image",
            MediaCategory::Audio => "audio",
            MediaCategory::Video => "video",
            MediaCategory::Unknown => "unknown",
        }
    }
}

impl Media {
    insert!(medias, NewMedia);
    get!(medias);
    find_by!(medias, find_by_file_path, file_path as &str);

    pub fn for_user(conn: &Connection, owner: i32) -> Result<Vec<Media>> {
        medias::table
            .filter(medias::owner_id.eq(owner))
            .order(medias::id.desc())
            .load::<Self>(conn)
            .map_err(Error::from)
    }

    pub fn page_for_user(
        conn: &Connection,
        user: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Media>> {
        medias::table
            .filter(medias::owner_id.eq(user.id))
            .order(medias::id.desc())
            .offset(i64::from(min))
            .limit(i64::from(max - min))
            .load::<Media>(conn)
            .map_err(Error::from)
    }

    pub fn count_for_user(conn: &Connection, user: &User) -> Result<i64> {
        medias::table
            .filter(medias::owner_id.eq(user.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Writes an uploaded file into the media directory under a random name
    /// (keeping the original extension) and records it.
    pub fn save_upload(
        conn: &Connection,
        owner: &User,
        original_name: &str,
        bytes: &[u8],
        alt_text: &str,
    ) -> Result<Media> {
        let ext = original_name
            .rsplit_once('.')
            .map(|x| x.1.to_lowercase())
            .unwrap_or_else(|| String::from("bin"));
        let dir = Path::new(&CONFIG.media_directory);
        if !dir.is_dir() {
            DirBuilder::new().recursive(true).create(dir)?;
        }
        let dest = dir.join(format!("{}.{}", GUID::rand(), ext));
        fs::write(&dest, bytes)?;
        Media::insert(
            conn,
            NewMedia {
                file_path: dest.to_str().ok_or(Error::InvalidValue)?.to_string(),
                alt_text: alt_text.to_string(),
                owner_id: owner.id,
            },
        )
    }

    pub fn category(&self) -> MediaCategory {
        match &*self
            .file_path
            .rsplit_once('.')
            .map(|x| x.1)
            .unwrap_or("")
            .to_lowercase()
        {
            "png" | "jpg" | "jpeg" | "gif" | "svg" => MediaCategory::Image,
            "mp3" | "wav" | "flac" | "ogg" => MediaCategory::Audio,
            "mp4" | "avi" | "webm" | "mov" => MediaCategory::Video,
            _ => MediaCategory::Unknown,
        }
    }

    /// Full file path inside the local media directory.
    pub fn local_path(&self) -> Option<PathBuf> {
        if self.file_path.is_empty() {
            return None;
        }
        let relative_path = self
            .file_path
            .trim_start_matches(&CONFIG.media_directory)
            .trim_start_matches(path::MAIN_SEPARATOR);
        Some(Path::new(&CONFIG.media_directory).join(relative_path))
    }

    /// Relative URL to access this file. Does not start with a '/', it is of
    /// the form "static/media/<...>".
    pub fn relative_url(&self) -> Option<String> {
        if self.file_path.is_empty() {
            return None;
        }
        let relative_path = self
            .file_path
            .trim_start_matches(&CONFIG.media_directory)
            .replace(path::MAIN_SEPARATOR, "/");
        Some(format!(
            "static/media/{}",
            relative_path.trim_start_matches('/')
        ))
    }

    /// Public URL through which this media file can be accessed.
    pub fn url(&self) -> Result<String> {
        Ok(public_url(&self.relative_url().unwrap_or_default()))
    }

    /// Removes the row and the file behind it. A file already gone from disk
    /// is only worth a warning.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        if let Some(path) = self.local_path() {
            if let Err(err) = fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    return Err(Error::Io(err));
                }
                warn!("Media file already missing: {}", path.display());
            }
        }
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn set_owner(&self, conn: &Connection, user: &User) -> Result<()> {
        diesel::update(self)
            .set(medias::owner_id.eq(user.id))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{tests::db, users::tests as user_tests, Connection as Conn};
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &Conn) -> (Vec<User>, Vec<Media>) {
        let users = user_tests::fill_database(conn);
        let owner = users[0].id;
        let medias = vec![
            NewMedia {
                file_path: format!("{}/1.png", CONFIG.media_directory),
                alt_text: "a photo".to_owned(),
                owner_id: owner,
            },
            NewMedia {
                file_path: format!("{}/2.mp3", CONFIG.media_directory),
                alt_text: "a voice note".to_owned(),
                owner_id: owner,
            },
            NewMedia {
                file_path: format!("{}/3.mp4", CONFIG.media_directory),
                alt_text: "a clip".to_owned(),
                owner_id: users[1].id,
            },
        ]
        .into_iter()
        .map(|nm| Media::insert(conn, nm).unwrap())
        .collect();
        (users, medias)
    }

    #[test]
    fn categories() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (_, medias) = fill_database(&conn);
            assert!(medias[0].category() == MediaCategory::Image);
            assert!(medias[1].category() == MediaCategory::Audio);
            assert!(medias[2].category() == MediaCategory::Video);
            Ok(())
        });
    }

    #[test]
    fn save_upload_keeps_extension() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let media =
                Media::save_upload(&conn, &users[0], "holiday.JPG", b"not a real jpeg", "beach")
                    .unwrap();
            assert!(media.file_path.ends_with(".jpg"));
            assert!(media.category() == MediaCategory::Image);
            assert!(media.local_path().unwrap().exists());

            media.delete(&conn).unwrap();
            Ok(())
        });
    }

    #[test]
    fn url_is_public() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (_, medias) = fill_database(&conn);
            let url = medias[0].url().unwrap();
            assert!(url.starts_with("https://"));
            assert!(url.contains("static/media/1.png"));
            Ok(())
        });
    }

    #[test]
    fn set_owner() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (users, medias) = fill_database(&conn);
            medias[0].set_owner(&conn, &users[1]).unwrap();
            assert!(Media::for_user(&conn, users[1].id)
                .unwrap()
                .iter()
                .any(|m| m.id == medias[0].id));
            Ok(())
        });
    }
}
