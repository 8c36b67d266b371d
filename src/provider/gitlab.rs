//! GitLab REST v4 directory provider

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use super::{GroupChildren, GroupNode, GroupProvider, ProjectNode, ProviderError};

const DEFAULT_HOST: &str = "gitlab.com";
const PAGE_SIZE: u32 = 100;

/// Directory provider backed by the GitLab REST API.
///
/// Pagination is a page loop until an empty page comes back; all requests
/// carry the `PRIVATE-TOKEN` header when a token is configured.
pub struct GitLabProvider {
    client: Client,
    base: String,
    token: Option<String>,
}

impl GitLabProvider {
    pub fn new(host: Option<&str>, token: Option<String>) -> Self {
        let host = host
            .unwrap_or(DEFAULT_HOST)
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        Self {
            client: Client::new(),
            base: format!("https://{host}/api/v4"),
            token,
        }
    }

    /// Resolves a configured root group by its full path.
    ///
    /// This is the startup credential check: a failure here aborts the
    /// process before any sync work starts.
    pub async fn lookup_group(
        &self,
        full_path: &str,
        location: &Path,
    ) -> Result<GroupNode, ProviderError> {
        let url = format!("{}/groups/{}", self.base, encode_path(full_path));
        let payload: GroupItem = self.fetch_json(&url, full_path).await?;
        Ok(GroupNode::new(payload.full_path, location))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("PRIVATE-TOKEN", token.as_str()),
            None => builder,
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        path: &str,
    ) -> Result<T, ProviderError> {
        let response = self.authorized(self.client.get(url)).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Auth {
                path: path.to_string(),
            }),
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound {
                path: path.to_string(),
            }),
            status if !status.is_success() => Err(ProviderError::Response {
                path: path.to_string(),
                message: format!("HTTP {status}"),
            }),
            _ => Ok(response.json().await?),
        }
    }

    /// Fetches every page of a paginated collection endpoint.
    async fn fetch_all_pages<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
    ) -> Result<Vec<T>, ProviderError> {
        let mut page = 1;
        let mut items = Vec::new();
        loop {
            let url = format!("{endpoint}?per_page={PAGE_SIZE}&page={page}");
            let payload: Vec<T> = self.fetch_json(&url, path).await?;
            if payload.is_empty() {
                break;
            }
            items.extend(payload);
            page += 1;
        }
        Ok(items)
    }
}

#[async_trait]
impl GroupProvider for GitLabProvider {
    async fn children(&self, group: &GroupNode) -> Result<GroupChildren, ProviderError> {
        let encoded = encode_path(&group.full_path);
        debug!(path = %group.full_path, "listing group children");

        let subgroups: Vec<GroupItem> = self
            .fetch_all_pages(
                &format!("{}/groups/{}/subgroups", self.base, encoded),
                &group.full_path,
            )
            .await?;

        let projects: Vec<ProjectItem> = self
            .fetch_all_pages(
                &format!("{}/groups/{}/projects", self.base, encoded),
                &group.full_path,
            )
            .await?;

        Ok(GroupChildren {
            groups: subgroups
                .into_iter()
                .map(|sub| {
                    let location = group.location.join(&sub.path);
                    GroupNode::new(sub.full_path, location)
                })
                .collect(),
            projects: projects
                .into_iter()
                .map(|project| {
                    let location = group.location.join(&project.path);
                    ProjectNode::new(project.http_url_to_repo, location)
                        .with_token(self.token.clone())
                        .with_default_branch(
                            project.default_branch.unwrap_or_else(|| "main".to_string()),
                        )
                })
                .collect(),
        })
    }
}

/// Percent-encodes a group path for use as a URL path segment.
fn encode_path(path: &str) -> String {
    path.replace('/', "%2F")
}

#[derive(Debug, Deserialize)]
struct GroupItem {
    full_path: String,
    #[serde(default)]
    path: String,
}

#[derive(Debug, Deserialize)]
struct ProjectItem {
    path: String,
    http_url_to_repo: String,
    default_branch: Option<String>,
}
