//! GitHub REST API content source

use super::source::ContentSource;
use crate::domain::{Entry, EntryKind, RepoDetails, DEFAULT_GITHUB_API_URL, UNDECODABLE_PLACEHOLDER};
use crate::error::SourceError;
use crate::utils::decode_text;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which call failed, so status codes map to the right user-facing message.
#[derive(Debug, Clone, Copy)]
enum Call {
    Details,
    Tree,
    Blob,
}

#[derive(Clone)]
pub struct GitHubSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubSource {
    pub fn new(token: Option<String>) -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_GITHUB_API_URL, token)
    }

    pub fn with_base_url(base_url: &str, token: Option<String>) -> Result<Self, SourceError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| {
                SourceError::Other(format!("Invalid GitHub API URL '{}': {}", base_url, e))
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::Other(format!(
                "Invalid GitHub API URL '{}': expected http or https",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(SourceError::Transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo-digest/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        call: Call,
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self.client.get(&url).headers(self.headers()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status, call));
        }
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| SourceError::Other(format!("Unexpected GitHub response for {path}: {e}")))
    }
}

fn map_status(status: StatusCode, call: Call) -> SourceError {
    let reason = status.canonical_reason().unwrap_or("");
    match (call, status) {
        (Call::Details, StatusCode::NOT_FOUND) => SourceError::NotFound(
            "Repository not found (404). Please check the owner and repository name.".into(),
        ),
        (Call::Tree, StatusCode::NOT_FOUND) => {
            SourceError::NotFound("Repository tree not found. The branch might not exist.".into())
        }
        (Call::Blob, StatusCode::FORBIDDEN) => {
            SourceError::RateLimited("Rate limit exceeded while fetching file content.".into())
        }
        (Call::Blob, _) => SourceError::Other(format!(
            "Failed to fetch file content: {} {}",
            status.as_u16(),
            reason
        )),
        (_, StatusCode::FORBIDDEN) | (_, StatusCode::TOO_MANY_REQUESTS) => SourceError::RateLimited(
            "GitHub API rate limit exceeded (403). \
             Please provide a GitHub token (GITHUB_TOKEN) to increase your limit."
                .into(),
        ),
        (_, StatusCode::UNAUTHORIZED) => SourceError::Unauthorized(
            "Invalid GitHub token (401). Please check GITHUB_TOKEN.".into(),
        ),
        (Call::Details, _) => {
            SourceError::Other(format!("GitHub API Error: {} {}", status.as_u16(), reason))
        }
        (Call::Tree, _) => {
            SourceError::Other(format!("Failed to fetch file tree: {} {}", status.as_u16(), reason))
        }
    }
}

#[derive(Deserialize)]
struct RepoResponse {
    name: String,
    owner: OwnerResponse,
    default_branch: String,
    #[serde(default)]
    stargazers_count: u64,
    description: Option<String>,
}

#[derive(Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    size: Option<u64>,
}

#[derive(Deserialize)]
struct BlobResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[async_trait]
impl ContentSource for GitHubSource {
    fn name(&self) -> &'static str {
        "github"
    }

    #[instrument(skip(self), level = "debug")]
    async fn repo_details(&self, owner: &str, repo: &str) -> Result<RepoDetails, SourceError> {
        let data: RepoResponse =
            self.get_json(&format!("/repos/{owner}/{repo}"), Call::Details).await?;
        Ok(RepoDetails {
            owner: data.owner.login,
            name: data.name,
            default_branch: data.default_branch,
            stars: data.stargazers_count,
            description: data.description.unwrap_or_default(),
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn repo_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<Entry>, SourceError> {
        let data: TreeResponse = self
            .get_json(&format!("/repos/{owner}/{repo}/git/trees/{branch}?recursive=1"), Call::Tree)
            .await?;
        if data.truncated {
            warn!("Repository is too large, tree listing for {owner}/{repo} was truncated");
        }

        let entries = data
            .tree
            .into_iter()
            .filter_map(|item| match item.kind.as_str() {
                "blob" => Some(Entry {
                    path: item.path,
                    kind: EntryKind::File,
                    size: item.size,
                    content_hash: Some(item.sha),
                }),
                "tree" => Some(Entry::directory(item.path)),
                // Submodules ("commit") have no fetchable content.
                _ => None,
            })
            .collect::<Vec<_>>();
        debug!("Listed {} entries", entries.len());
        Ok(entries)
    }

    #[instrument(skip(self), level = "debug")]
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        content_hash: &str,
    ) -> Result<String, SourceError> {
        let blob: BlobResponse = self
            .get_json(&format!("/repos/{owner}/{repo}/git/blobs/{content_hash}"), Call::Blob)
            .await?;
        if !blob.encoding.is_empty() && blob.encoding != "base64" {
            return Ok(blob.content);
        }

        let compact: String = blob.content.chars().filter(|c| !c.is_whitespace()).collect();
        let decoded = match STANDARD.decode(compact.as_bytes()) {
            Ok(bytes) => decode_text(&bytes),
            Err(e) => {
                warn!("Could not base64-decode blob {}: {}", content_hash, e);
                None
            }
        };
        Ok(decoded.unwrap_or_else(|| UNDECODABLE_PLACEHOLDER.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    async fn source(server: &Server, token: Option<&str>) -> GitHubSource {
        GitHubSource::with_base_url(&server.url(), token.map(str::to_string)).expect("client")
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(GitHubSource::with_base_url("not a url", None).is_err());
        assert!(GitHubSource::with_base_url("ftp://example.com", None).is_err());
        let source =
            GitHubSource::with_base_url("https://ghe.example.com/api/v3/", Some(" ".into()))
                .expect("client");
        assert!(!source.is_authenticated());
    }

    #[tokio::test]
    async fn test_repo_details() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/demo")
            .match_header("authorization", "token secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "name": "demo",
                    "owner": {"login": "acme"},
                    "default_branch": "main",
                    "stargazers_count": 42,
                    "description": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let details =
            source(&server, Some("secret")).await.repo_details("acme", "demo").await.unwrap();
        assert_eq!(details.slug(), "acme/demo");
        assert_eq!(details.default_branch, "main");
        assert_eq!(details.stars, 42);
        assert_eq!(details.description, "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let mut server = Server::new_async().await;
        let _missing =
            server.mock("GET", "/repos/acme/missing").with_status(404).create_async().await;
        let _limited =
            server.mock("GET", "/repos/acme/limited").with_status(403).create_async().await;
        let _denied =
            server.mock("GET", "/repos/acme/denied").with_status(401).create_async().await;
        let _broken =
            server.mock("GET", "/repos/acme/broken").with_status(500).create_async().await;

        let gh = source(&server, None).await;
        assert!(matches!(gh.repo_details("acme", "missing").await, Err(SourceError::NotFound(_))));
        assert!(matches!(
            gh.repo_details("acme", "limited").await,
            Err(SourceError::RateLimited(_))
        ));
        assert!(matches!(
            gh.repo_details("acme", "denied").await,
            Err(SourceError::Unauthorized(_))
        ));
        let err = gh.repo_details("acme", "broken").await.unwrap_err();
        assert!(matches!(err, SourceError::Other(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_repo_tree_maps_entries_and_skips_submodules() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/demo/git/trees/main?recursive=1")
            .with_status(200)
            .with_body(
                r#"{"truncated":false,"tree":[
                    {"path":"src","type":"tree","sha":"t1"},
                    {"path":"src/main.rs","type":"blob","sha":"b1","size":12},
                    {"path":"vendor/lib","type":"commit","sha":"c1"}
                ]}"#,
            )
            .create_async()
            .await;

        let entries = source(&server, None).await.repo_tree("acme", "demo", "main").await.unwrap();
        assert_eq!(
            entries,
            vec![Entry::directory("src"), Entry::file("src/main.rs", Some(12), "b1")]
        );
    }

    #[tokio::test]
    async fn test_missing_branch_is_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/demo/git/trees/nope?recursive=1")
            .with_status(404)
            .create_async()
            .await;
        let err = source(&server, None).await.repo_tree("acme", "demo", "nope").await.unwrap_err();
        assert!(err.to_string().contains("branch might not exist"));
    }

    #[tokio::test]
    async fn test_file_content_decodes_base64_with_line_breaks() {
        let mut server = Server::new_async().await;
        let encoded = STANDARD.encode("fn main() {\n    println!(\"hé\");\n}\n");
        let (first, second) = encoded.split_at(10);
        let _mock = server
            .mock("GET", "/repos/acme/demo/git/blobs/abc")
            .with_status(200)
            .with_body(format!(r#"{{"content":"{first}\n{second}","encoding":"base64"}}"#))
            .create_async()
            .await;

        let text = source(&server, None).await.file_content("acme", "demo", "abc").await.unwrap();
        assert_eq!(text, "fn main() {\n    println!(\"hé\");\n}\n");
    }

    #[tokio::test]
    async fn test_binary_blob_yields_placeholder() {
        let mut server = Server::new_async().await;
        let encoded = STANDARD.encode([0x89u8, b'P', b'N', b'G', 0, 0, 1, 2]);
        let _mock = server
            .mock("GET", "/repos/acme/demo/git/blobs/img")
            .with_status(200)
            .with_body(format!(r#"{{"content":"{encoded}","encoding":"base64"}}"#))
            .create_async()
            .await;

        let text = source(&server, None).await.file_content("acme", "demo", "img").await.unwrap();
        assert_eq!(text, UNDECODABLE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_blob_rate_limit() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/demo/git/blobs/abc")
            .with_status(403)
            .create_async()
            .await;
        let err =
            source(&server, None).await.file_content("acme", "demo", "abc").await.unwrap_err();
        assert!(matches!(err, SourceError::RateLimited(_)));
    }
}
