//! [`GovernanceStore`] over the hosted REST backend.
//!
//! Requests follow PostgREST conventions: filters as `column=eq.value`
//! query pairs, `order=column.desc`, `limit=n`, single-row reads via the
//! `application/vnd.pgrst.object+json` media type and inserts returning the
//! stored row with `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use da0_shared::{
    NewProposal, NewVote, Organization, OrganizationId, ProposalId, ProposalRecord, Vote,
};

use crate::error::{Result, StoreError};
use crate::store::GovernanceStore;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// PostgREST code for "single object requested, zero rows returned".
const NO_ROWS_CODE: &str = "PGRST116";

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

pub struct RemoteStore {
    client: Client,
    rest_url: String,
}

impl RemoteStore {
    /// Build a client for the backend at `base_url`, authenticating every
    /// request with the public `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(StoreError::InvalidConfig(format!(
                "backend URL must be http(s): {base_url}"
            )));
        }

        let mut headers = HeaderMap::new();
        if !api_key.is_empty() {
            let key = HeaderValue::from_str(api_key)
                .map_err(|e| StoreError::InvalidConfig(format!("api key: {e}")))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| StoreError::InvalidConfig(format!("api key: {e}")))?;
            headers.insert("apikey", key);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rest_url: format!("{base_url}/rest/v1"),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    async fn select_many<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        debug!(table, ?query, "select");
        let req = self.client.get(self.table_url(table)).query(query);
        let resp = send(req).await?;
        Ok(resp.json().await?)
    }

    async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(table, ?query, "select single");
        let req = self
            .client
            .get(self.table_url(table))
            .query(query)
            .header(ACCEPT, SINGLE_OBJECT);
        let resp = send(req).await?;
        Ok(resp.json().await?)
    }

    async fn insert_returning<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T> {
        debug!(table, "insert");
        let req = self
            .client
            .post(self.table_url(table))
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(body);
        let resp = send(req).await?;
        Ok(resp.json().await?)
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn all() -> (&'static str, String) {
    ("select", "*".to_string())
}

async fn send(req: RequestBuilder) -> Result<Response> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &text))
}

/// Classify a non-2xx response body.
fn api_error(status: u16, body: &str) -> StoreError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());

    if code.as_deref() == Some(NO_ROWS_CODE) {
        return StoreError::NotFound;
    }

    let message = parsed
        .as_ref()
        .and_then(|b| match (&b.message, &b.details) {
            (Some(m), Some(d)) => Some(format!("{m} ({d})")),
            (Some(m), None) => Some(m.clone()),
            _ => None,
        })
        .unwrap_or_else(|| body.to_string());

    warn!(status, code = ?code, message = %message, "backend request failed");

    StoreError::Api {
        status,
        code,
        message,
    }
}

#[async_trait]
impl GovernanceStore for RemoteStore {
    fn backend_tag(&self) -> &'static str {
        "remote"
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.select_many("daos", &[all(), ("order", "members_count.desc".into())])
            .await
    }

    async fn get_organization(&self, id: &OrganizationId) -> Result<Organization> {
        self.select_single("daos", &[all(), ("id", eq(&id.0))]).await
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<ProposalRecord> {
        self.select_single("proposals", &[all(), ("id", eq(&id.0))])
            .await
    }

    async fn list_proposals_for(&self, dao_id: &OrganizationId) -> Result<Vec<ProposalRecord>> {
        self.select_many(
            "proposals",
            &[
                all(),
                ("dao_id", eq(&dao_id.0)),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn list_recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>> {
        self.select_many(
            "proposals",
            &[
                all(),
                ("order", "created_at.desc".into()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn insert_proposal(&self, proposal: &NewProposal) -> Result<ProposalRecord> {
        self.insert_returning("proposals", proposal).await
    }

    async fn list_votes(&self, proposal_id: &ProposalId) -> Result<Vec<Vote>> {
        self.select_many(
            "votes",
            &[
                all(),
                ("proposal_id", eq(&proposal_id.0)),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn insert_vote(&self, vote: &NewVote) -> Result<Vote> {
        self.insert_returning("votes", vote).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_url() {
        assert!(matches!(
            RemoteStore::new("ftp://example.org", "key"),
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_proposal_insert_body_columns() {
        let proposal = NewProposal {
            dao_id: OrganizationId("base-guild".into()),
            title: "BIP-24".into(),
            description: "Grants".into(),
            author: da0_shared::Address("0x71C7656EC7ab88b098defB751B7401B5f6d8976F".into()),
            status: da0_shared::ProposalStatus::Active,
            end_date: "1/4/2025".into(),
            vote_count: 0,
            quorum: 10,
            choices: vec!["Yes".into(), "No".into(), "Abstain".into()],
        };

        let body = serde_json::to_value(&proposal).unwrap();
        let mut keys: Vec<&str> = body
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "author",
                "dao_id",
                "description",
                "end_date",
                "quorum",
                "status",
                "title",
                "vote_count"
            ]
        );
    }

    #[test]
    fn test_table_url() {
        let store = RemoteStore::new("https://abc.supabase.co/", "anon").unwrap();
        assert_eq!(
            store.table_url("votes"),
            "https://abc.supabase.co/rest/v1/votes"
        );
    }

    #[test]
    fn test_duplicate_vote_body() {
        let body = r#"{"code":"23505","details":"Key (proposal_id, voter_address) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"votes_proposal_id_voter_address_key\""}"#;
        let err = api_error(409, body);
        assert!(err.is_unique_violation());
        assert!(matches!(err, StoreError::Api { status: 409, .. }));
    }

    #[test]
    fn test_no_rows_is_not_found() {
        let body = r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
        assert!(matches!(api_error(406, body), StoreError::NotFound));
    }

    #[test]
    fn test_unparsable_body_kept_as_message() {
        match api_error(502, "Bad Gateway") {
            StoreError::Api { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rows_deserialize() {
        let json = r#"[{
            "id": "0d6b3c0e-5b8e-4d0e-9a62-1f1f6c3a2b11",
            "dao_id": "base-guild",
            "title": "BIP-24",
            "description": "Grants",
            "status": "Active",
            "end_date": "1/4/2025",
            "vote_count": 3,
            "author": "0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
            "quorum": 10,
            "created_at": "2024-12-28T15:00:00.123456+00:00"
        }]"#;
        let rows: Vec<ProposalRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].vote_count, 3);
        assert!(rows[0].choices.is_empty());
    }
}
