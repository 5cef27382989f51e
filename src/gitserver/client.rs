//! HTTP client for the frontend's internal git exec endpoint.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use super::{DirectoryLookup, LookupError};

/// Longest response body echoed back inside a status error.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ExecRequest<'a> {
    args: &'a [String],
}

/// [`DirectoryLookup`] backed by `git ls-tree` on the git server.
#[derive(Debug, Clone)]
pub struct GitserverClient {
    client: reqwest::Client,
    frontend_url: String,
}

impl GitserverClient {
    /// Create a client for the given frontend url.
    ///
    /// A url without a scheme (e.g. `frontend-internal:3090`) is treated as
    /// plain http.
    pub fn new(frontend_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let frontend_url = if frontend_url.contains("://") {
            frontend_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", frontend_url.trim_end_matches('/'))
        };

        Url::parse(&frontend_url).map_err(|e| LookupError::InvalidEndpoint {
            url: frontend_url.clone(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::InvalidEndpoint {
                url: frontend_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            frontend_url,
        })
    }

    /// Base url requests are sent to.
    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    /// Exec endpoint for a repository.
    pub fn exec_url(&self, repository_id: i64) -> String {
        format!("{}/.internal/git/{repository_id}/exec", self.frontend_url)
    }

    /// Run a git command on the server and return its stdout.
    ///
    /// `Ok(None)` means the server answered 404 (unknown repository,
    /// commit or path).
    async fn exec(
        &self,
        repository_id: i64,
        directory: &str,
        args: &[String],
    ) -> Result<Option<String>, LookupError> {
        let response = self
            .client
            .post(self.exec_url(repository_id))
            .json(&ExecRequest { args })
            .send()
            .await
            .map_err(|e| LookupError::transport(directory, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::transport(directory, e))?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(LookupError::Status {
                directory: directory.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(body))
    }
}

#[async_trait]
impl DirectoryLookup for GitserverClient {
    async fn directory_children(
        &self,
        repository_id: i64,
        commit: &str,
        dirname: &str,
    ) -> Result<HashSet<String>, LookupError> {
        let args = ls_tree_args(commit, dirname);
        tracing::trace!(repository_id, dirname, "[gitserver] ls-tree");

        match self.exec(repository_id, dirname, &args).await? {
            Some(output) => Ok(parse_ls_tree_output(&output)),
            None => Ok(HashSet::new()),
        }
    }
}

/// Arguments for listing `dirname` at `commit`.
///
/// The trailing slash makes git list the directory's children instead of the
/// directory entry itself; the top level is listed as `.`.
pub fn ls_tree_args(commit: &str, dirname: &str) -> Vec<String> {
    let target = if dirname.is_empty() {
        ".".to_string()
    } else if dirname.ends_with('/') {
        dirname.to_string()
    } else {
        format!("{dirname}/")
    };

    vec![
        "ls-tree".to_string(),
        "--name-only".to_string(),
        commit.to_string(),
        "--".to_string(),
        target,
    ]
}

/// One path per line; blank lines are ignored.
pub fn parse_ls_tree_output(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
