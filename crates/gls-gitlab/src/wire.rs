//! GraphQL documents and response shapes.

use serde::{Deserialize, Deserializer};

use gls_core::{Board, Label};

pub const PROJECT_BOARDS_QUERY: &str = r"
query ProjectBoards($fullPath: ID!) {
  project(fullPath: $fullPath) {
    id
    boards {
      nodes {
        id
        name
      }
    }
  }
}";

pub const BOARD_LISTS_QUERY: &str = r"
query BoardLists($fullPath: ID!, $boardId: BoardID!) {
  project(fullPath: $fullPath) {
    id
    board(id: $boardId) {
      id
      lists {
        nodes {
          label {
            id
            title
            color
          }
        }
      }
    }
  }
}";

pub const USER_TIMELOGS_QUERY: &str = r"
query UserTimelogs($username: String!, $startDate: Time!, $endDate: Time!) {
  timelogs(username: $username, startDate: $startDate, endDate: $endDate) {
    edges {
      node {
        timeSpent
        issue {
          iid
          title
          labels {
            edges {
              node {
                title
              }
            }
          }
        }
      }
    }
  }
}";

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<ErrorMessage>>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Edges<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub struct ProjectBoardsData {
    pub project: Option<ProjectBoards>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectBoards {
    pub boards: Nodes<Board>,
}

#[derive(Debug, Deserialize)]
pub struct BoardListsData {
    pub project: Option<ProjectBoard>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectBoard {
    pub board: Option<BoardLists>,
}

#[derive(Debug, Deserialize)]
pub struct BoardLists {
    pub lists: Nodes<ListNode>,
}

#[derive(Debug, Deserialize)]
pub struct ListNode {
    pub label: Option<Label>,
}

#[derive(Debug, Deserialize)]
pub struct TimelogsData {
    pub timelogs: Edges<TimelogNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelogNode {
    pub time_spent: i64,
    pub issue: Option<IssueNode>,
}

#[derive(Debug, Deserialize)]
pub struct IssueNode {
    #[serde(deserialize_with = "deserialize_iid")]
    pub iid: u64,
    pub title: String,
    pub labels: Edges<LabelTitle>,
}

#[derive(Debug, Deserialize)]
pub struct LabelTitle {
    pub title: String,
}

/// GitLab serializes `iid` as a string; plain integers are accepted too.
fn deserialize_iid<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIid {
        Number(u64),
        Text(String),
    }

    match RawIid::deserialize(deserializer)? {
        RawIid::Number(iid) => Ok(iid),
        RawIid::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
