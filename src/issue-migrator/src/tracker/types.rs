//! Tracker entities as the migration sees them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `{owner}/{name}` repository endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Creates a repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Lifecycle state shared by issues and milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Open,
    Closed,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A milestone read from a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    /// Number assigned by the tracker the milestone was read from.
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    pub description: Option<String>,
    /// Due date as the tracker reports it (ISO 8601).
    pub due_on: Option<String>,
    /// Login of the user who created the milestone.
    pub creator: Option<String>,
}

/// Payload for creating a milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMilestone {
    pub title: String,
    pub state: ItemState,
    pub description: Option<String>,
    pub due_on: Option<String>,
}

impl From<&Milestone> for NewMilestone {
    fn from(milestone: &Milestone) -> Self {
        Self {
            title: milestone.title.clone(),
            state: milestone.state,
            description: milestone.description.clone(),
            due_on: milestone.due_on.clone(),
        }
    }
}

/// A label read from a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`.
    pub color: String,
    pub description: Option<String>,
}

/// Payload for creating a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Label> for NewLabel {
    fn from(label: &Label) -> Self {
        Self {
            name: label.name.clone(),
            color: label.color.clone(),
            description: label.description.clone(),
        }
    }
}

/// An issue (or former pull request) read from the source tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Number in the source repository.
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: ItemState,
    pub assignees: Vec<String>,
    /// Title of the milestone the issue belongs to.
    pub milestone: Option<String>,
    pub labels: Vec<String>,
    /// Login of the issue author.
    pub author: String,
    /// API URL of the issue's comment feed.
    pub comments_url: String,
    /// Whether the entity is a pull request.
    pub is_pull_request: bool,
}

/// Payload for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: Option<String>,
    pub assignees: Vec<String>,
    /// Destination milestone number.
    pub milestone: Option<u64>,
    pub labels: Vec<String>,
}

/// One page of the source issue list.
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    pub issues: Vec<Issue>,
    /// Whether the response carried a `next` continuation relation.
    pub has_next: bool,
    /// Snapshot of the page payload for the archive.
    pub raw: Vec<u8>,
}

/// A comment read from an issue's comment feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub body: String,
    /// Login of the comment author.
    pub author: String,
}

/// The full comment feed of one issue.
#[derive(Debug, Clone, Default)]
pub struct CommentFeed {
    pub comments: Vec<Comment>,
    /// Snapshot of the feed payload for the archive.
    pub raw: Vec<u8>,
}
