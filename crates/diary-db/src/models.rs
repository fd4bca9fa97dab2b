/// Database row types. Timestamps are SQLite `datetime('now')` text in UTC.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub registration_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub created_at: String,
}
