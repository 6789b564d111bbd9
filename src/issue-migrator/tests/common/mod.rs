#![allow(dead_code)]

use async_trait::async_trait;
use issue_migrator::{
    ArchiveError, ArchiveSink, Comment, CommentFeed, Credential, CredentialPool, Issue, IssuePage,
    IssueTracker, ItemState, Label, Milestone, MigrationContext, NewIssue, NewLabel, NewMilestone,
    RepositoryRef, TrackerError, DEFAULT_PULL_REQUEST_MARKER,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// First number the fake destination assigns to a created issue.
pub const FIRST_DESTINATION_ISSUE: u64 = 1000;

/// First number the fake destination assigns to a created milestone.
pub const FIRST_DESTINATION_MILESTONE: u64 = 100;

pub fn source() -> RepositoryRef {
    RepositoryRef::new("owner1", "repositoryName1")
}

pub fn destination() -> RepositoryRef {
    RepositoryRef::new("owner2", "repositoryName2")
}

/// Pool with `user1` (default), `user2`, `user3` and the source owner.
pub fn credentials() -> CredentialPool {
    CredentialPool::new(
        [
            ("user1", "user1token"),
            ("user2", "user2token"),
            ("user3", "user3token"),
            ("owner1", "owner1token"),
        ],
        "user1",
    )
    .unwrap()
}

pub fn comments_url(number: u64) -> String {
    format!("https://api.github.com/repos/owner1/repositoryName1/issues/{number}/comments")
}

pub fn issue(number: u64, title: &str) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        body: Some(format!("Body of #{number}")),
        state: ItemState::Open,
        assignees: Vec::new(),
        milestone: None,
        labels: Vec::new(),
        author: "user1".to_string(),
        comments_url: comments_url(number),
        is_pull_request: false,
    }
}

pub fn milestone(number: u64, title: &str, creator: Option<&str>) -> Milestone {
    Milestone {
        number,
        title: title.to_string(),
        state: ItemState::Open,
        description: Some(format!("Scope of {title}")),
        due_on: None,
        creator: creator.map(str::to_string),
    }
}

pub fn label(name: &str, color: &str) -> Label {
    Label {
        name: name.to_string(),
        color: color.to_string(),
        description: None,
    }
}

pub fn comment(author: &str, body: &str) -> Comment {
    Comment {
        body: body.to_string(),
        author: author.to_string(),
    }
}

/// One call received by the [`RecordingTracker`], with the acting actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListMilestones { repo: String, actor: String },
    CreateMilestone { actor: String, title: String },
    ListLabels { repo: String, actor: String },
    CreateLabel { actor: String, name: String },
    ListIssuesPage { actor: String, page: u32 },
    CreateIssue { actor: String, issue: NewIssue },
    UpdateIssueState { actor: String, number: u64, state: ItemState },
    ListComments { actor: String, url: String },
    CreateComment { actor: String, number: u64, body: String },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::CreateMilestone { .. }
                | Self::CreateLabel { .. }
                | Self::CreateIssue { .. }
                | Self::UpdateIssueState { .. }
                | Self::CreateComment { .. }
        )
    }
}

/// How a scripted failure surfaces.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Rejected,
    Timeout,
}

impl Failure {
    fn error(self) -> TrackerError {
        match self {
            Self::Rejected => TrackerError::RemoteRejected {
                status: 422,
                message: "Validation Failed".to_string(),
            },
            Self::Timeout => TrackerError::NetworkTimeout {
                message: "operation timed out".to_string(),
            },
        }
    }
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    destination_milestones: Vec<Milestone>,
    next_issue: u64,
    next_comment: u64,
}

/// In-memory tracker that records every call and serves scripted data.
///
/// Reads against the source repository return the scripted milestones,
/// labels, pages and comments. Created milestones become visible in the
/// destination milestone listing with destination numbers.
pub struct RecordingTracker {
    source: RepositoryRef,
    source_milestones: Vec<Milestone>,
    labels: Vec<Label>,
    pages: Vec<Vec<Issue>>,
    comments: HashMap<String, Vec<Comment>>,
    failing_milestones: HashSet<String>,
    failing_issues: HashMap<String, Failure>,
    failing_state_updates: HashMap<u64, Failure>,
    failing_comments: HashSet<String>,
    failing_pages: HashMap<u32, Failure>,
    state: Mutex<State>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self {
            source: source(),
            source_milestones: Vec::new(),
            labels: Vec::new(),
            pages: Vec::new(),
            comments: HashMap::new(),
            failing_milestones: HashSet::new(),
            failing_issues: HashMap::new(),
            failing_state_updates: HashMap::new(),
            failing_comments: HashSet::new(),
            failing_pages: HashMap::new(),
            state: Mutex::new(State {
                next_issue: FIRST_DESTINATION_ISSUE,
                next_comment: 1,
                ..State::default()
            }),
        }
    }

    pub fn with_milestones(mut self, milestones: Vec<Milestone>) -> Self {
        self.source_milestones = milestones;
        self
    }

    /// Milestones already present at the destination before the run.
    pub fn with_destination_milestones(self, milestones: Vec<Milestone>) -> Self {
        self.state.lock().unwrap().destination_milestones = milestones;
        self
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    /// Issue pages, page 1 first. Every page but the last reports a next page.
    pub fn with_pages(mut self, pages: Vec<Vec<Issue>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_comments(mut self, number: u64, comments: Vec<Comment>) -> Self {
        self.comments.insert(comments_url(number), comments);
        self
    }

    pub fn failing_milestone(mut self, title: &str) -> Self {
        self.failing_milestones.insert(title.to_string());
        self
    }

    pub fn failing_issue(mut self, title: &str, failure: Failure) -> Self {
        self.failing_issues.insert(title.to_string(), failure);
        self
    }

    pub fn failing_state_update(mut self, destination_number: u64, failure: Failure) -> Self {
        self.failing_state_updates.insert(destination_number, failure);
        self
    }

    pub fn failing_comment(mut self, body: &str) -> Self {
        self.failing_comments.insert(body.to_string());
        self
    }

    pub fn failing_page(mut self, page: u32, failure: Failure) -> Self {
        self.failing_pages.insert(page, failure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ListIssuesPage { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn list_milestones(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Milestone>, TrackerError> {
        self.record(Call::ListMilestones {
            repo: repo.to_string(),
            actor: credential.actor().to_string(),
        });
        if *repo == self.source {
            Ok(self.source_milestones.clone())
        } else {
            Ok(self.state.lock().unwrap().destination_milestones.clone())
        }
    }

    async fn create_milestone(
        &self,
        _repo: &RepositoryRef,
        credential: &Credential,
        milestone: &NewMilestone,
    ) -> Result<u64, TrackerError> {
        self.record(Call::CreateMilestone {
            actor: credential.actor().to_string(),
            title: milestone.title.clone(),
        });
        if self.failing_milestones.contains(&milestone.title) {
            return Err(Failure::Rejected.error());
        }

        let mut state = self.state.lock().unwrap();
        let number = FIRST_DESTINATION_MILESTONE + state.destination_milestones.len() as u64;
        state.destination_milestones.push(Milestone {
            number,
            title: milestone.title.clone(),
            state: milestone.state,
            description: milestone.description.clone(),
            due_on: milestone.due_on.clone(),
            creator: Some(credential.actor().to_string()),
        });
        Ok(number)
    }

    async fn list_labels(
        &self,
        repo: &RepositoryRef,
        credential: &Credential,
    ) -> Result<Vec<Label>, TrackerError> {
        self.record(Call::ListLabels {
            repo: repo.to_string(),
            actor: credential.actor().to_string(),
        });
        Ok(self.labels.clone())
    }

    async fn create_label(
        &self,
        _repo: &RepositoryRef,
        credential: &Credential,
        label: &NewLabel,
    ) -> Result<(), TrackerError> {
        self.record(Call::CreateLabel {
            actor: credential.actor().to_string(),
            name: label.name.clone(),
        });
        Ok(())
    }

    async fn list_issues_page(
        &self,
        _repo: &RepositoryRef,
        credential: &Credential,
        page: u32,
    ) -> Result<IssuePage, TrackerError> {
        self.record(Call::ListIssuesPage {
            actor: credential.actor().to_string(),
            page,
        });
        if let Some(failure) = self.failing_pages.get(&page) {
            return Err(failure.error());
        }

        let index = page as usize - 1;
        let issues = self.pages.get(index).cloned().unwrap_or_default();
        let numbers: Vec<u64> = issues.iter().map(|issue| issue.number).collect();
        Ok(IssuePage {
            issues,
            has_next: index + 1 < self.pages.len(),
            raw: format!("{numbers:?}").into_bytes(),
        })
    }

    async fn create_issue(
        &self,
        _repo: &RepositoryRef,
        credential: &Credential,
        issue: &NewIssue,
    ) -> Result<u64, TrackerError> {
        self.record(Call::CreateIssue {
            actor: credential.actor().to_string(),
            issue: issue.clone(),
        });
        if let Some(failure) = self.failing_issues.get(&issue.title) {
            return Err(failure.error());
        }

        let mut state = self.state.lock().unwrap();
        let number = state.next_issue;
        state.next_issue += 1;
        Ok(number)
    }

    async fn update_issue_state(
        &self,
        _repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        state: ItemState,
    ) -> Result<(), TrackerError> {
        self.record(Call::UpdateIssueState {
            actor: credential.actor().to_string(),
            number,
            state,
        });
        if let Some(failure) = self.failing_state_updates.get(&number) {
            return Err(failure.error());
        }
        Ok(())
    }

    async fn list_comments(
        &self,
        comments_url: &str,
        credential: &Credential,
    ) -> Result<CommentFeed, TrackerError> {
        self.record(Call::ListComments {
            actor: credential.actor().to_string(),
            url: comments_url.to_string(),
        });
        let comments = self.comments.get(comments_url).cloned().unwrap_or_default();
        Ok(CommentFeed {
            raw: format!("{} comments", comments.len()).into_bytes(),
            comments,
        })
    }

    async fn create_comment(
        &self,
        _repo: &RepositoryRef,
        credential: &Credential,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError> {
        self.record(Call::CreateComment {
            actor: credential.actor().to_string(),
            number,
            body: body.to_string(),
        });
        if self.failing_comments.contains(body) {
            return Err(Failure::Rejected.error());
        }

        let mut state = self.state.lock().unwrap();
        let id = state.next_comment;
        state.next_comment += 1;
        Ok(id)
    }
}

/// Archive that keeps snapshots in memory.
#[derive(Default)]
pub struct MemoryArchive {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryArchive {
    pub fn names(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl ArchiveSink for MemoryArchive {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.files
            .lock()
            .unwrap()
            .push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Owns everything a [`MigrationContext`] borrows.
pub struct Fixture<T = RecordingTracker> {
    pub tracker: T,
    pub archive: MemoryArchive,
    pub credentials: CredentialPool,
    pub source: RepositoryRef,
    pub destination: RepositoryRef,
}

impl<T: IssueTracker> Fixture<T> {
    pub fn new(tracker: T) -> Self {
        Self {
            tracker,
            archive: MemoryArchive::default(),
            credentials: credentials(),
            source: source(),
            destination: destination(),
        }
    }

    pub fn ctx(&self) -> MigrationContext<'_> {
        MigrationContext {
            tracker: &self.tracker,
            archive: &self.archive,
            credentials: &self.credentials,
            source: &self.source,
            destination: &self.destination,
            pull_request_marker: DEFAULT_PULL_REQUEST_MARKER,
        }
    }
}
