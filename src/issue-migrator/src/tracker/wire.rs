//! GitHub REST payloads and their conversion into tracker entities.
//!
//! Only the fields the migration needs are declared; everything else in the
//! payload is ignored.

use super::types::{Comment, Issue, ItemState, Label, Milestone};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MilestonePayload {
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_on: Option<String>,
    #[serde(default)]
    pub creator: Option<UserPayload>,
}

impl From<MilestonePayload> for Milestone {
    fn from(payload: MilestonePayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            state: payload.state,
            description: payload.description,
            due_on: payload.due_on,
            creator: payload.creator.map(|user| user.login),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelPayload {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<LabelPayload> for Label {
    fn from(payload: LabelPayload) -> Self {
        Self {
            name: payload.name,
            color: payload.color,
            description: payload.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IssueMilestonePayload {
    title: String,
}

#[derive(Debug, Deserialize)]
struct IssueLabelPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssuePayload {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: ItemState,
    #[serde(default)]
    assignees: Vec<UserPayload>,
    #[serde(default)]
    milestone: Option<IssueMilestonePayload>,
    #[serde(default)]
    labels: Vec<IssueLabelPayload>,
    user: UserPayload,
    comments_url: String,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

impl From<IssuePayload> for Issue {
    fn from(payload: IssuePayload) -> Self {
        Self {
            number: payload.number,
            title: payload.title,
            body: payload.body,
            state: payload.state,
            assignees: payload.assignees.into_iter().map(|u| u.login).collect(),
            milestone: payload.milestone.map(|m| m.title),
            labels: payload.labels.into_iter().map(|l| l.name).collect(),
            author: payload.user.login,
            comments_url: payload.comments_url,
            is_pull_request: payload.pull_request.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentPayload {
    #[serde(default)]
    body: Option<String>,
    user: UserPayload,
}

impl From<CommentPayload> for Comment {
    fn from(payload: CommentPayload) -> Self {
        Self {
            body: payload.body.unwrap_or_default(),
            author: payload.user.login,
        }
    }
}

/// Response of an issue or milestone create call.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedPayload {
    pub number: u64,
}

/// Response of a create call that reports an id rather than a number.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedIdPayload {
    pub id: u64,
}

/// Parses a list of raw JSON values into entities.
pub(crate) fn parse_items<P, T>(values: Vec<serde_json::Value>) -> Result<Vec<T>, serde_json::Error>
where
    P: serde::de::DeserializeOwned + Into<T>,
{
    values
        .into_iter()
        .map(|value| serde_json::from_value::<P>(value).map(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_issue_payload() {
        let value = json!({
            "number": 900,
            "title": "Crash on save",
            "body": "Steps to reproduce",
            "state": "closed",
            "assignees": [{ "login": "user2" }, { "login": "ghost" }],
            "milestone": { "number": 3, "title": "v1" },
            "labels": [{ "name": "bug", "color": "d73a4a" }],
            "user": { "login": "user3" },
            "comments_url": "https://api.github.com/repos/owner1/repo1/issues/900/comments",
            "comments": 2
        });

        let issues: Vec<Issue> = parse_items::<IssuePayload, _>(vec![value]).unwrap();
        let issue = &issues[0];

        assert_eq!(issue.number, 900);
        assert_eq!(issue.state, ItemState::Closed);
        assert_eq!(issue.assignees, vec!["user2", "ghost"]);
        assert_eq!(issue.milestone.as_deref(), Some("v1"));
        assert_eq!(issue.labels, vec!["bug"]);
        assert_eq!(issue.author, "user3");
        assert!(!issue.is_pull_request);
    }

    #[test]
    fn test_detects_pull_requests() {
        let value = json!({
            "number": 42,
            "title": "Add feature",
            "body": null,
            "state": "open",
            "assignees": [],
            "milestone": null,
            "labels": [],
            "user": { "login": "user1" },
            "comments_url": "https://api.github.com/repos/owner1/repo1/issues/42/comments",
            "pull_request": { "url": "https://api.github.com/repos/owner1/repo1/pulls/42" }
        });

        let issues: Vec<Issue> = parse_items::<IssuePayload, _>(vec![value]).unwrap();
        assert!(issues[0].is_pull_request);
        assert_eq!(issues[0].body, None);
        assert_eq!(issues[0].milestone, None);
    }

    #[test]
    fn test_parse_milestone_without_creator() {
        let value = json!({
            "number": 1,
            "title": "v1",
            "state": "open",
            "description": null,
            "due_on": "2018-01-31T08:00:00Z",
            "creator": null
        });

        let milestones: Vec<Milestone> = parse_items::<MilestonePayload, _>(vec![value]).unwrap();
        assert_eq!(milestones[0].creator, None);
        assert_eq!(milestones[0].due_on.as_deref(), Some("2018-01-31T08:00:00Z"));
    }

    #[test]
    fn test_rejects_issue_without_author() {
        let value = json!({ "number": 1, "title": "x", "state": "open" });
        assert!(parse_items::<IssuePayload, Issue>(vec![value]).is_err());
    }
}
