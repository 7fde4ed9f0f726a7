use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize)]
pub struct Briefing {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewBriefing {
    pub title: String,
    pub content: String,
}

pub trait BriefingRepository {
    fn get_briefings(&self) -> impl Future<Output = anyhow::Result<Vec<Briefing>>> + Send;
    fn add_briefing(
        &self,
        briefing: &NewBriefing,
    ) -> impl Future<Output = anyhow::Result<Briefing>> + Send;
    fn delete_briefing(&self, briefing: Briefing)
    -> impl Future<Output = anyhow::Result<()>> + Send;
}
