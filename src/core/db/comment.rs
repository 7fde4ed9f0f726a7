use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    /// Rich text markup as produced by the editor.
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: i64,
    pub content: String,
}

pub trait CommentRepository {
    /// Newest first.
    fn get_comments(&self) -> impl Future<Output = anyhow::Result<Vec<Comment>>> + Send;
    fn get_comment_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<Comment>>> + Send;
    fn add_comment(
        &self,
        comment: &NewComment,
    ) -> impl Future<Output = anyhow::Result<Comment>> + Send;
    fn update_comment_content(
        &self,
        comment: &Comment,
        content: &str,
    ) -> impl Future<Output = anyhow::Result<Comment>> + Send;
    fn delete_comment(&self, comment: Comment) -> impl Future<Output = anyhow::Result<()>> + Send;
}
