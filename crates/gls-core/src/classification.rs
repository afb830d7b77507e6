//! Board/label taxonomy and the classification index built from it.

use serde::Deserialize;

/// A project board. Its name is the grouping key of the index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// A label attached to a board list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A board with the labels of its lists, in list order.
///
/// Lists without a label (backlog, closed, assignee lists) are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLabels {
    pub board: Board,
    pub labels: Vec<Option<Label>>,
}

/// Time and issue titles attributed to one (board, label) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    /// Time spent in seconds.
    pub time_spent: i64,
    pub issues: Vec<String>,
}

impl Accumulator {
    pub(crate) fn attribute(&mut self, time_spent: i64, issue_title: &str) {
        self.time_spent += time_spent;
        self.issues.push(issue_title.to_string());
    }
}

/// One board of the index: label title to accumulator, in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSection {
    name: String,
    labels: Vec<(String, Accumulator)>,
}

impl BoardSection {
    fn new(name: String) -> Self {
        Self {
            name,
            labels: Vec::new(),
        }
    }

    fn insert_label(&mut self, title: String) {
        if !self.contains_label(&title) {
            self.labels.push((title, Accumulator::default()));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains_label(&self, title: &str) -> bool {
        self.labels.iter().any(|(label, _)| label == title)
    }

    pub fn label(&self, title: &str) -> Option<&Accumulator> {
        self.labels
            .iter()
            .find(|(label, _)| label == title)
            .map(|(_, accumulator)| accumulator)
    }

    pub(crate) fn label_mut(&mut self, title: &str) -> Option<&mut Accumulator> {
        self.labels
            .iter_mut()
            .find(|(label, _)| label == title)
            .map(|(_, accumulator)| accumulator)
    }

    /// Labels with their accumulators, in list order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, &Accumulator)> {
        self.labels
            .iter()
            .map(|(label, accumulator)| (label.as_str(), accumulator))
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Sum of every label's time in this board.
    pub fn total_time(&self) -> i64 {
        self.labels
            .iter()
            .map(|(_, accumulator)| accumulator.time_spent)
            .sum()
    }
}

/// Board name → label title → accumulator, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationIndex {
    boards: Vec<BoardSection>,
}

impl ClassificationIndex {
    /// Builds an index with zeroed accumulators from a board taxonomy.
    ///
    /// Lists without a label contribute nothing. A board name seen twice is
    /// folded into the first board of that name.
    pub fn build<I>(taxonomy: I) -> Self
    where
        I: IntoIterator<Item = BoardLabels>,
    {
        let mut index = Self::default();
        for BoardLabels { board, labels } in taxonomy {
            let position = if let Some(position) = index.position(&board.name) {
                tracing::warn!(board = %board.name, "duplicate board name, merging labels");
                position
            } else {
                index.boards.push(BoardSection::new(board.name));
                index.boards.len() - 1
            };

            let section = &mut index.boards[position];
            for label in labels.into_iter().flatten() {
                section.insert_label(label.title);
            }
        }
        index
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.boards.iter().position(|section| section.name == name)
    }

    pub fn board(&self, name: &str) -> Option<&BoardSection> {
        self.boards.iter().find(|section| section.name == name)
    }

    pub fn boards(&self) -> impl Iterator<Item = &BoardSection> {
        self.boards.iter()
    }

    pub(crate) fn boards_mut(&mut self) -> impl Iterator<Item = &mut BoardSection> {
        self.boards.iter_mut()
    }

    pub const fn len(&self) -> usize {
        self.boards.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Sum of every accumulator across every board.
    ///
    /// Time matched in several boards is counted once per board.
    pub fn grand_total(&self) -> i64 {
        self.boards.iter().map(BoardSection::total_time).sum()
    }
}
