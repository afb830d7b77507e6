//! Board and label discovery for a project.

use serde_json::json;

use gls_core::{Board, BoardLabels, Label};

use crate::wire::{BOARD_LISTS_QUERY, BoardListsData, PROJECT_BOARDS_QUERY, ProjectBoardsData};
use crate::{GitlabError, GraphqlRequest, GraphqlTransport};

/// Lists the boards of a project in the order GitLab returns them.
pub async fn fetch_boards<T: GraphqlTransport>(
    transport: &T,
    project: &str,
) -> Result<Vec<Board>, GitlabError> {
    let request = GraphqlRequest {
        query: PROJECT_BOARDS_QUERY,
        variables: json!({ "fullPath": project }),
    };
    let data: ProjectBoardsData = transport.execute(&request).await?;
    let project_boards = data
        .project
        .ok_or_else(|| GitlabError::ProjectNotFound(project.to_string()))?;

    Ok(project_boards.boards.nodes)
}

/// Lists the label of every list of a board, `None` for label-less lists.
pub async fn fetch_board_labels<T: GraphqlTransport>(
    transport: &T,
    project: &str,
    board_id: &str,
) -> Result<Vec<Option<Label>>, GitlabError> {
    let request = GraphqlRequest {
        query: BOARD_LISTS_QUERY,
        variables: json!({ "fullPath": project, "boardId": board_id }),
    };
    let data: BoardListsData = transport.execute(&request).await?;
    let board = data
        .project
        .ok_or_else(|| GitlabError::ProjectNotFound(project.to_string()))?
        .board
        .ok_or_else(|| GitlabError::BoardNotFound(board_id.to_string()))?;

    Ok(board.lists.nodes.into_iter().map(|list| list.label).collect())
}

/// Fetches every board of a project with its labels.
///
/// Boards are queried one after the other; the first failure aborts.
pub async fn fetch_taxonomy<T: GraphqlTransport>(
    transport: &T,
    project: &str,
) -> Result<Vec<BoardLabels>, GitlabError> {
    let boards = fetch_boards(transport, project).await?;
    tracing::debug!(project, boards = boards.len(), "fetched boards");

    let mut taxonomy = Vec::with_capacity(boards.len());
    for board in boards {
        let labels = fetch_board_labels(transport, project, &board.id).await?;
        tracing::debug!(board = %board.name, lists = labels.len(), "fetched board lists");
        taxonomy.push(BoardLabels { board, labels });
    }
    Ok(taxonomy)
}
