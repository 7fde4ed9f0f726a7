use serde::Serialize;
use time::OffsetDateTime;

use crate::core::db::model::{Page, PageRequest};

#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub company: Option<Option<String>>,
}

pub trait ClientRepository {
    fn get_clients(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = anyhow::Result<Page<Client>>> + Send;
    fn get_client_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<Client>>> + Send;
    fn add_client(&self, client: &NewClient) -> impl Future<Output = anyhow::Result<Client>> + Send;
    fn update_client(
        &self,
        client: &Client,
        update: &ClientUpdate,
    ) -> impl Future<Output = anyhow::Result<Client>> + Send;
    /// Projects of the client are kept and detached.
    fn delete_client(&self, client: Client) -> impl Future<Output = anyhow::Result<()>> + Send;
}
