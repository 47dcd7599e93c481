use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct DbLeague {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}
