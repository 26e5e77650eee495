/// Query parameters accepted when listing posts.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PostQuery {
    pub id: Option<i32>,
    pub author_id: Option<i32>,
    pub visibility: Option<String>,
    pub boosted: Option<bool>,
    pub page: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NewPostData {
    pub content: String,
    pub visibility: Option<String>,
    pub media_ids: Option<Vec<i32>>,
}
