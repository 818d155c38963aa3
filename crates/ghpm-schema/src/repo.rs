//! `owner/repo` references.

use thiserror::Error;

use crate::types::PackageName;

/// Errors raised while parsing an `owner/repo` argument.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RepoParseError {
    /// The argument is not made of exactly two non-empty `/`-separated parts.
    #[error("Invalid repo format: expected 'owner/repo', got '{0}'")]
    Format(String),
}

/// A validated GitHub repository reference in `owner/repo` format.
///
/// A trailing `.git` on the repo part is tolerated and stripped, so a value
/// pasted from a clone URL still names the right package.
///
/// # Example
///
/// ```
/// use ghpm_schema::GitHubRepo;
///
/// let repo = GitHubRepo::new("junegunn/fzf").unwrap();
/// assert_eq!(repo.owner(), "junegunn");
/// assert_eq!(repo.name(), "fzf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GitHubRepo {
    owner: String,
    name: String,
}

impl GitHubRepo {
    /// Create a new `GitHubRepo`, validating the `owner/repo` format.
    ///
    /// # Errors
    ///
    /// Returns [`RepoParseError::Format`] if `s` is not `owner/repo` or if
    /// either component is empty.
    pub fn new(s: &str) -> Result<Self, RepoParseError> {
        let trimmed = s.trim().trim_end_matches('/');
        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) => {
                let name = name.strip_suffix(".git").unwrap_or(name);
                if owner.is_empty() || PackageName::parse(name).is_err() {
                    return Err(RepoParseError::Format(s.to_string()));
                }
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(RepoParseError::Format(s.to_string())),
        }
    }

    /// Get the owner part.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repo name part. This is also the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone URL relative to a git host base such as `https://github.com`.
    pub fn clone_url(&self, base: &str) -> String {
        format!("{}/{}/{}.git", base.trim_end_matches('/'), self.owner, self.name)
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl TryFrom<String> for GitHubRepo {
    type Error = RepoParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<GitHubRepo> for String {
    fn from(repo: GitHubRepo) -> Self {
        repo.to_string()
    }
}
