//! The step-by-step record of a resolved turn, used by clients to animate it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies a piece for the length of one turn by the square it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub usize);

/// What happens on one square during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SquareEvent {
    Empty,
    /// A piece with no move this turn.
    Stationary { piece_id: PieceId },
    InTransit { piece_id: PieceId },
    /// A mover at rest on its final square.
    Arrived { piece_id: PieceId },
    /// A mover whose move was cancelled, shown back on its own source.
    Bumped { piece_id: PieceId },
    /// `piece_id` was taken here this step by the mover `by`.
    Captured { piece_id: PieceId, by: PieceId },
}

impl SquareEvent {
    /// The piece left standing on the square.
    pub fn occupant(&self) -> Option<PieceId> {
        match *self {
            SquareEvent::Empty => None,
            SquareEvent::Stationary { piece_id }
            | SquareEvent::InTransit { piece_id }
            | SquareEvent::Arrived { piece_id }
            | SquareEvent::Bumped { piece_id } => Some(piece_id),
            SquareEvent::Captured { by, .. } => Some(by),
        }
    }
}

/// Occupied squares of one step. Unlisted squares are empty.
pub type Step = BTreeMap<usize, SquareEvent>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTrace {
    steps: Vec<Step>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn event_at(&self, step: usize, square: usize) -> SquareEvent {
        self.steps
            .get(step)
            .and_then(|s| s.get(&square))
            .copied()
            .unwrap_or(SquareEvent::Empty)
    }

    /// Where `piece` stands during `step`, with the event recorded there.
    pub fn find(&self, step: usize, piece: PieceId) -> Option<(usize, SquareEvent)> {
        self.steps
            .get(step)?
            .iter()
            .find(|(_, ev)| ev.occupant() == Some(piece))
            .map(|(&sq, &ev)| (sq, ev))
    }
}
