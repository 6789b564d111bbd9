//! GitHub REST implementation of [`IssueTracker`] built on `octocrab`.
//!
//! The `raw` bytes of issue pages and comment feeds are the JSON listing
//! re-serialized from the parsed response (pretty printed, keys in response
//! order), not the response body byte for byte. Comment feeds spanning
//! several pages are archived as one array.

use super::wire::{
    parse_items, CommentPayload, CreatedIdPayload, CreatedPayload, IssuePayload, LabelPayload,
    MilestonePayload,
};
use super::{
    CommentFeed, IssuePage, IssueTracker, ItemState, Label, Milestone, NewIssue, NewLabel,
    NewMilestone, RepositoryRef, TrackerError,
};
use crate::credentials::{Credential, CredentialPool};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::{Octocrab, Page};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Issues per page of the source listing. Fixed by the tracker.
pub const ISSUES_PER_PAGE: u8 = 30;

/// Page size for listings the tracker walks completely.
const LISTING_PER_PAGE: u8 = 100;

/// Default timeout applied to every request.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Connection settings shared by every per-actor client.
#[derive(Debug, Clone)]
pub struct GitHubTrackerOptions {
    /// API base URL; `None` uses api.github.com.
    pub base_url: Option<String>,
    /// Timeout applied to connect, read and write of every request.
    pub timeout: Duration,
    /// Whether to wait for rate-limit resets before writes.
    pub respect_rate_limit: bool,
}

impl Default for GitHubTrackerOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            respect_rate_limit: true,
        }
    }
}

/// Query parameters for list endpoints.
#[derive(Debug, Serialize)]
struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<&'static str>,
    per_page: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

impl ListParams {
    fn all(state: Option<&'static str>) -> Self {
        Self {
            state,
            sort: None,
            direction: None,
            per_page: LISTING_PER_PAGE,
            page: None,
        }
    }

    fn issues_page(page: u32) -> Self {
        Self {
            state: Some("all"),
            sort: Some("created"),
            direction: Some("asc"),
            per_page: ISSUES_PER_PAGE,
            page: Some(page),
        }
    }
}

#[derive(Debug, Serialize)]
struct StateUpdate {
    state: ItemState,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// GitHub tracker holding one authenticated client per actor.
///
/// Each client carries its own token and therefore its own rate-limit
/// bucket; the credential passed to a call selects the client.
pub struct GitHubTracker {
    clients: HashMap<String, Octocrab>,
    respect_rate_limit: bool,
}

impl GitHubTracker {
    /// Builds a client for every credential in `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] if a client cannot be constructed (for
    /// example when `base_url` is not a valid URI).
    pub fn new(pool: &CredentialPool, options: &GitHubTrackerOptions) -> Result<Self, TrackerError> {
        let mut clients = HashMap::with_capacity(pool.len());
        for credential in pool.iter() {
            let mut builder = Octocrab::builder()
                .personal_token(credential.token().to_string())
                .set_connect_timeout(Some(options.timeout))
                .set_read_timeout(Some(options.timeout))
                .set_write_timeout(Some(options.timeout))
                .add_retry_config(RetryConfig::None);
            if let Some(base_url) = &options.base_url {
                builder = builder.base_uri(base_url.as_str())?;
            }
            clients.insert(credential.actor().to_string(), builder.build()?);
        }

        debug!(clients = clients.len(), "Built GitHub clients");
        Ok(Self {
            clients,
            respect_rate_limit: options.respect_rate_limit,
        })
    }

    fn client(&self, credential: &Credential) -> Result<&Octocrab, TrackerError> {
        self.clients
            .get(credential.actor())
            .ok_or_else(|| TrackerError::UnknownCredential {
                actor: credential.actor().to_string(),
            })
    }

    /// Returns the client for a write, after waiting out a low rate limit.
    async fn writer(&self, credential: &Credential) -> Result<&Octocrab, TrackerError> {
        let client = self.client(credential)?;
        if self.respect_rate_limit {
            ensure_core_rate_limit(client).await?;
        }
        Ok(client)
    }

    /// Fetches `route` and follows `next` links until the listing is exhausted.
    async fn list_all(
        client: &Octocrab,
        route: &str,
        params: &ListParams,
    ) -> Result<Vec<Value>, TrackerError> {
        let mut page: Page<Value> = client.get(route, Some(params)).await?;
        let mut items = Vec::new();
        loop {
            items.append(&mut page.items);
            match client.get_page::<Value>(&page.next).await? {
                Some(next) => page = next,
                None => break,
            }
        }
        Ok(items)
    }
}

fn repo_route(repo: &RepositoryRef, resource: &str) -> String {
    format!("/repos/{}/{}/{}", repo.owner, repo.name, resource)
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn list_milestones(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Milestone>, TrackerError> {
        debug!(repo = %repo, "Listing milestones");
        let client = self.client(credential)?;
        let values = Self::list_all(
            client,
            &repo_route(repo, "milestones"),
            &ListParams::all(Some("all")),
        )
        .await?;
        Ok(parse_items::<MilestonePayload, _>(values)?)
    }

    async fn create_milestone(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        milestone: &NewMilestone,
    ) -> Result<u64, TrackerError> {
        let client = self.writer(credential).await?;
        let created: CreatedPayload = client
            .post(repo_route(repo, "milestones"), Some(milestone))
            .await?;
        Ok(created.number)
    }

    async fn list_labels(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Label>, TrackerError> {
        debug!(repo = %repo, "Listing labels");
        let client = self.client(credential)?;
        let values =
            Self::list_all(client, &repo_route(repo, "labels"), &ListParams::all(None)).await?;
        Ok(parse_items::<LabelPayload, _>(values)?)
    }

    async fn create_label(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        label: &NewLabel,
    ) -> Result<(), TrackerError> {
        let client = self.writer(credential).await?;
        let _: Value = client.post(repo_route(repo, "labels"), Some(label)).await?;
        Ok(())
    }

    async fn list_issues_page(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        page: u32,
    ) -> Result<IssuePage, TrackerError> {
        debug!(repo = %repo, page, "Fetching issue page");
        let client = self.client(credential)?;
        let response: Page<Value> = client
            .get(repo_route(repo, "issues"), Some(&ListParams::issues_page(page)))
            .await?;

        let has_next = response.next.is_some();
        let raw = serde_json::to_vec_pretty(&response.items)?;
        let issues = parse_items::<IssuePayload, _>(response.items)?;
        Ok(IssuePage {
            issues,
            has_next,
            raw,
        })
    }

    async fn create_issue(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        issue: &NewIssue,
    ) -> Result<u64, TrackerError> {
        let client = self.writer(credential).await?;
        let created: CreatedPayload = client.post(repo_route(repo, "issues"), Some(issue)).await?;
        Ok(created.number)
    }

    async fn update_issue_state(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        state: ItemState,
    ) -> Result<(), TrackerError> {
        let client = self.writer(credential).await?;
        let _: Value = client
            .patch(
                repo_route(repo, &format!("issues/{number}")),
                Some(&StateUpdate { state }),
            )
            .await?;
        Ok(())
    }

    async fn list_comments(
        &self,
        comments_url: &str,
        credential: &Credential,
    ) -> Result<CommentFeed, TrackerError> {
        debug!(url = comments_url, "Fetching comments");
        let client = self.client(credential)?;
        let values = Self::list_all(client, comments_url, &ListParams::all(None)).await?;
        let raw = serde_json::to_vec_pretty(&values)?;
        let comments = parse_items::<CommentPayload, _>(values)?;
        Ok(CommentFeed { comments, raw })
    }

    async fn create_comment(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError> {
        let client = self.writer(credential).await?;
        let created: CreatedIdPayload = client
            .post(
                repo_route(repo, &format!("issues/{number}/comments")),
                Some(&CommentBody { body }),
            )
            .await?;
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_route() {
        let repo = RepositoryRef::new("owner2", "repo2");
        assert_eq!(repo_route(&repo, "issues/7/comments"), "/repos/owner2/repo2/issues/7/comments");
    }

    #[test]
    fn test_issue_pages_are_sorted_oldest_first() {
        let params = serde_json::to_value(ListParams::issues_page(3)).unwrap();
        assert_eq!(
            params,
            serde_json::json!({
                "state": "all",
                "sort": "created",
                "direction": "asc",
                "per_page": 30,
                "page": 3
            })
        );
    }

    #[test]
    fn test_full_listings_omit_page() {
        let params = serde_json::to_value(ListParams::all(None)).unwrap();
        assert_eq!(params, serde_json::json!({ "per_page": 100 }));
    }

    #[test]
    fn test_default_options() {
        let options = GitHubTrackerOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(600));
        assert!(options.respect_rate_limit);
        assert!(options.base_url.is_none());
    }
}
