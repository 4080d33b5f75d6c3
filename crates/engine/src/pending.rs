//! Moves submitted for the current turn, at most one per source square.

use crate::game::PlayerId;
use crate::r#move::Move;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub player: PlayerId,
    pub mv: Move,
}

/// Pending moves keyed by source square.
///
/// A second submission for the same source replaces the first. Iteration is in source
/// order so resolution never depends on submission order.
#[derive(Debug, Clone, Default)]
pub struct PendingMoves {
    by_src: BTreeMap<usize, PendingMove>,
}

impl PendingMoves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `mv`, returning the move it replaced, if any.
    pub fn submit(&mut self, player: PlayerId, mv: Move) -> Option<Move> {
        self.by_src
            .insert(mv.src(), PendingMove { player, mv })
            .map(|old| old.mv)
    }

    pub fn get(&self, src: usize) -> Option<&PendingMove> {
        self.by_src.get(&src)
    }

    pub fn withdraw(&mut self, src: usize) -> Option<PendingMove> {
        self.by_src.remove(&src)
    }

    pub fn moves(&self) -> Vec<Move> {
        self.by_src.values().map(|p| p.mv).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingMove> {
        self.by_src.values()
    }

    pub fn len(&self) -> usize {
        self.by_src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_src.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_src.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_submission_for_same_source_wins() {
        let mut book = PendingMoves::new();
        assert_eq!(book.submit(PlayerId(1), Move::new(0, 3)), None);
        assert_eq!(book.submit(PlayerId(1), Move::new(0, 5)), Some(Move::new(0, 3)));
        assert_eq!(book.len(), 1);
        assert_eq!(book.moves(), vec![Move::new(0, 5)]);
    }

    #[test]
    fn moves_come_out_in_source_order() {
        let mut book = PendingMoves::new();
        book.submit(PlayerId(2), Move::new(9, 1));
        book.submit(PlayerId(1), Move::new(4, 12));
        book.submit(PlayerId(1), Move::new(0, 3));
        let srcs: Vec<usize> = book.moves().iter().map(|m| m.src()).collect();
        assert_eq!(srcs, vec![0, 4, 9]);
    }

    #[test]
    fn withdraw_and_clear() {
        let mut book = PendingMoves::new();
        book.submit(PlayerId(1), Move::new(0, 3));
        book.submit(PlayerId(1), Move::new(1, 4));
        assert_eq!(book.withdraw(0).map(|p| p.mv), Some(Move::new(0, 3)));
        assert!(book.get(0).is_none());
        book.clear();
        assert!(book.is_empty());
    }
}
