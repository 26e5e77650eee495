/// Payload for the password grant that issues an API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct NewTokenData {
    pub username: String,
    pub password: String,
    pub scopes: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub id: i32,
    pub value: String,
    pub scopes: String,
}
