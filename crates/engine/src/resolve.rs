//! Turn resolution: every pending move of the active color slides at once.
//!
//! A turn lasts `size` steps. At each step every piece occupies one square; when two pieces
//! share a square the mover in transit is either bumped back to its source (it met a piece of
//! its own team or color) or captures the piece it met and stops there. The board is only
//! rewritten once the whole turn has been simulated.

use crate::constants::{Color, Piece};
use crate::error::{Error, Result};
use crate::fen::Fen;
use crate::game::active_color;
use crate::r#move::Move;
use crate::trace::{PieceId, SquareEvent, Step, StepTrace};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Outcome of a resolved turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub fen: Fen,
    pub trace: StepTrace,
    /// The turn that follows the resolved one.
    pub turn: u32,
    pub captured: Vec<PieceId>,
    pub bumped: Vec<PieceId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stationary,
    Moving,
    Capturing(usize),
    Bumped,
    Captured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Stationary,
    InTransit,
    Arrived,
    Bumped,
}

impl Status {
    fn event(self, piece_id: PieceId) -> SquareEvent {
        match self {
            Status::Stationary => SquareEvent::Stationary { piece_id },
            Status::InTransit => SquareEvent::InTransit { piece_id },
            Status::Arrived => SquareEvent::Arrived { piece_id },
            Status::Bumped => SquareEvent::Bumped { piece_id },
        }
    }
}

type Place = Option<(usize, Status)>;

#[derive(Debug, Clone)]
struct Entity {
    id: PieceId,
    piece: Piece,
    trajectory: Vec<usize>,
    phase: Phase,
}

impl Entity {
    /// Square and status of the entity at `step`.
    ///
    /// A mover is in transit at step 0 whatever its kind, so a knight or king that jumps
    /// onto its destination is recorded `InTransit` there first and `Arrived` from step 1.
    /// Being in transit at step 0 is what lets a jumper capture on landing.
    fn place(&self, step: usize) -> Place {
        match self.phase {
            Phase::Captured => None,
            Phase::Stationary => Some((self.id.0, Status::Stationary)),
            Phase::Bumped => Some((self.id.0, Status::Bumped)),
            Phase::Capturing(sq) => Some((sq, Status::Arrived)),
            Phase::Moving => {
                let sq = self.trajectory[step];
                let status = if step > 0 && self.trajectory[step - 1] == sq {
                    Status::Arrived
                } else {
                    Status::InTransit
                };
                Some((sq, status))
            }
        }
    }
}

/// Resolves one turn of a board.
pub struct Resolver<'a> {
    fen: &'a Fen,
    turn: u32,
    color: Color,
}

impl<'a> Resolver<'a> {
    pub fn new(fen: &'a Fen, turn: u32) -> Result<Self> {
        let color = active_color(turn).ok_or(Error::NotStarted)?;
        Ok(Self { fen, turn, color })
    }

    /// Simulates `moves` and returns the board after the turn.
    ///
    /// Moves are assumed to have passed legality checks. If several share a source the last
    /// one counts. Moves of pieces that are not of the active color are skipped. `self.fen`
    /// is never modified; on error nothing about the turn is kept.
    pub fn resolve(&self, moves: &[Move]) -> Result<Resolution> {
        let mut entities = self.plan(moves)?;
        let size = self.fen.size();

        let mut trace = StepTrace::new();
        let mut captured = Vec::new();
        for step in 0..size {
            let mut places: Vec<Place> = entities.iter().map(|e| e.place(step)).collect();
            let mut captures = Vec::new();
            settle(step, &mut entities, &mut places, &mut captures)?;

            let mut map = Step::new();
            for (entity, place) in entities.iter().zip(&places) {
                if let Some((sq, status)) = place {
                    map.insert(*sq, status.event(entity.id));
                }
            }
            for (sq, victim, by) in captures {
                map.insert(sq, SquareEvent::Captured { piece_id: victim, by });
                captured.push(victim);
            }
            trace.push(map);
        }

        let fen = self.apply(&entities, &captured, &trace)?;
        let bumped: Vec<PieceId> = entities
            .iter()
            .filter(|e| e.phase == Phase::Bumped)
            .map(|e| e.id)
            .collect();

        info!(
            "turn {} resolved: {} movers, {} captured, {} bumped",
            self.turn,
            entities.iter().filter(|e| !e.trajectory.is_empty()).count(),
            captured.len(),
            bumped.len()
        );

        Ok(Resolution {
            fen,
            trace,
            turn: self.turn + 1,
            captured,
            bumped,
        })
    }

    /// One entity per piece on the board, with trajectories for the movers.
    fn plan(&self, moves: &[Move]) -> Result<Vec<Entity>> {
        let size = self.fen.size();
        let by_src: BTreeMap<usize, Move> = moves.iter().map(|mv| (mv.src(), *mv)).collect();

        let mut entities: Vec<Entity> = self
            .fen
            .pieces()
            .into_iter()
            .map(|(sq, piece)| Entity {
                id: PieceId(sq),
                piece,
                trajectory: Vec::new(),
                phase: Phase::Stationary,
            })
            .collect();

        for (src, mv) in by_src {
            let Some(entity) = entities.iter_mut().find(|e| e.id.0 == src) else {
                return Err(Error::InvariantViolation(format!(
                    "pending move from empty square {src}"
                )));
            };
            if entity.piece.color != self.color {
                warn!(
                    "skipping move {}->{}: {:?} pieces do not move on turn {}",
                    src,
                    mv.dest(),
                    entity.piece.color,
                    self.turn
                );
                continue;
            }
            entity.trajectory = mv.trajectory(entity.piece.kind, size)?;
            entity.phase = Phase::Moving;
        }

        Ok(entities)
    }

    /// Removes captured pieces and relocates every piece that ended the turn at rest.
    fn apply(&self, entities: &[Entity], captured: &[PieceId], trace: &StepTrace) -> Result<Fen> {
        let mut fen = self.fen.clone();
        for victim in captured {
            fen.clear_piece(victim.0)?;
        }

        let Some(last) = trace.last() else {
            return Ok(fen);
        };
        let mut relocations = Vec::new();
        for (&sq, event) in last {
            let id = match *event {
                SquareEvent::Arrived { piece_id } => piece_id,
                SquareEvent::Captured { by, .. } => by,
                _ => continue,
            };
            let piece = entities
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.piece)
                .ok_or_else(|| Error::InvariantViolation(format!("unknown piece {}", id.0)))?;
            relocations.push((id, sq, piece));
        }

        // Lift every mover first so pieces can move into squares vacated this turn.
        for (id, _, _) in &relocations {
            fen.clear_piece(id.0)?;
        }
        for (id, sq, piece) in relocations {
            if fen.get_piece(sq).is_some() {
                return Err(Error::InvariantViolation(format!(
                    "piece from {} lands on occupied square {sq}",
                    id.0
                )));
            }
            fen.set_piece(sq, piece)?;
        }

        let expected = self.fen.pieces().len() - captured.len();
        if fen.pieces().len() != expected {
            return Err(Error::InvariantViolation(format!(
                "{} pieces after the turn, expected {expected}",
                fen.pieces().len()
            )));
        }
        Ok(fen)
    }
}

/// Resolves collisions until no square holds two pieces.
fn settle(
    step: usize,
    entities: &mut [Entity],
    places: &mut [Place],
    captures: &mut Vec<(usize, PieceId, PieceId)>,
) -> Result<()> {
    loop {
        let mut by_square: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, place) in places.iter().enumerate() {
            if let Some((sq, _)) = place {
                by_square.entry(*sq).or_default().push(i);
            }
        }

        let Some((sq, occupants)) = by_square.into_iter().find(|(_, v)| v.len() > 1) else {
            return Ok(());
        };
        let &[a, b] = occupants.as_slice() else {
            return Err(Error::InvariantViolation(format!(
                "{} pieces meet on square {sq} at step {step}",
                occupants.len()
            )));
        };
        collide(step, sq, a, b, entities, places, captures)?;
    }
}

fn collide(
    step: usize,
    sq: usize,
    a: usize,
    b: usize,
    entities: &mut [Entity],
    places: &mut [Place],
    captures: &mut Vec<(usize, PieceId, PieceId)>,
) -> Result<()> {
    let status = |i: usize| places[i].map(|(_, s)| s);
    match (status(a), status(b)) {
        (Some(Status::InTransit), Some(Status::InTransit)) => {
            if entities[a].piece.is_enemy_of(&entities[b].piece) {
                return Err(Error::InvariantViolation(format!(
                    "opposing movers meet on square {sq} at step {step}"
                )));
            }
            bump(step, a, entities, places);
            bump(step, b, entities, places);
        }
        (Some(Status::InTransit), Some(_)) => strike(step, sq, a, b, entities, places, captures),
        (Some(_), Some(Status::InTransit)) => strike(step, sq, b, a, entities, places, captures),
        // A bumped piece reclaims its own source from whoever moved onto it.
        (Some(Status::Bumped), Some(Status::Arrived)) if entities[b].phase == Phase::Moving => {
            bump(step, b, entities, places)
        }
        (Some(Status::Arrived), Some(Status::Bumped)) if entities[a].phase == Phase::Moving => {
            bump(step, a, entities, places)
        }
        (sa, sb) => {
            return Err(Error::InvariantViolation(format!(
                "pieces {} ({:?}) and {} ({:?}) share square {sq} at step {step}",
                entities[a].id.0, sa, entities[b].id.0, sb
            )));
        }
    }
    Ok(())
}

/// The mover `m` runs into `other` on `sq`.
fn strike(
    step: usize,
    sq: usize,
    m: usize,
    other: usize,
    entities: &mut [Entity],
    places: &mut [Place],
    captures: &mut Vec<(usize, PieceId, PieceId)>,
) {
    if entities[m].piece.is_enemy_of(&entities[other].piece) {
        debug!(
            "step {step}: piece from {} captures piece from {} on {sq}",
            entities[m].id.0, entities[other].id.0
        );
        entities[m].phase = Phase::Capturing(sq);
        places[m] = Some((sq, Status::Arrived));
        entities[other].phase = Phase::Captured;
        places[other] = None;
        captures.push((sq, entities[other].id, entities[m].id));
    } else {
        bump(step, m, entities, places);
    }
}

fn bump(step: usize, i: usize, entities: &mut [Entity], places: &mut [Place]) {
    debug!("step {step}: piece from {} is bumped", entities[i].id.0);
    entities[i].phase = Phase::Bumped;
    places[i] = Some((entities[i].id.0, Status::Bumped));
}

/// Resolves a turn given the encoded board, returning the encoded result and the trace.
pub fn resolve_encoded(
    board: &str,
    size: usize,
    moves: &[Move],
    turn: u32,
) -> Result<(String, StepTrace)> {
    let fen = Fen::from_fen(board)?;
    if fen.size() != size {
        return Err(Error::UnsupportedBoardSize(fen.size()));
    }
    let resolution = Resolver::new(&fen, turn)?.resolve(moves)?;
    Ok((resolution.fen.to_fen(), resolution.trace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PieceKind, Team};
    use crate::square::to_idx;

    const WHITE_TURN: u32 = 1;

    fn board(pieces: &[(usize, Team, Color, PieceKind)]) -> Fen {
        let mut fen = Fen::new(8).unwrap();
        for &(sq, team, color, kind) in pieces {
            fen.set_piece(sq, Piece::new(team, color, kind)).unwrap();
        }
        fen
    }

    fn resolve(fen: &Fen, moves: &[Move]) -> Result<Resolution> {
        Resolver::new(fen, WHITE_TURN).unwrap().resolve(moves)
    }

    fn mv(src: usize, dest: usize) -> Move {
        Move::try_from((src, dest)).unwrap()
    }

    fn piece(team: Team, color: Color, kind: PieceKind) -> Option<Piece> {
        Some(Piece::new(team, color, kind))
    }

    #[test]
    fn rook_captures_stationary_enemy() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (3, Team::Bottom, Color::Black, PieceKind::Knight),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3)]).unwrap();

        assert_eq!(res.fen.get_piece(3), piece(Team::Top, Color::White, PieceKind::Rook));
        assert_eq!(res.fen.get_piece(0), None);
        assert_eq!(res.fen.pieces().len(), 1);
        assert_eq!(res.captured, vec![PieceId(3)]);

        let rook = PieceId(0);
        assert_eq!(res.trace.len(), 8);
        assert_eq!(res.trace.event_at(0, 1), SquareEvent::InTransit { piece_id: rook });
        assert_eq!(res.trace.event_at(1, 2), SquareEvent::InTransit { piece_id: rook });
        assert_eq!(
            res.trace.event_at(2, 3),
            SquareEvent::Captured {
                piece_id: PieceId(3),
                by: rook
            }
        );
        for step in 3..8 {
            assert_eq!(res.trace.event_at(step, 3), SquareEvent::Arrived { piece_id: rook });
        }
    }

    #[test]
    fn teammate_of_other_color_bumps_the_mover() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (3, Team::Top, Color::Black, PieceKind::Knight),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3)]).unwrap();

        assert_eq!(res.fen, fen);
        assert_eq!(res.bumped, vec![PieceId(0)]);
        assert!(res.captured.is_empty());
        for step in 2..8 {
            assert_eq!(res.trace.event_at(step, 0), SquareEvent::Bumped { piece_id: PieceId(0) });
            assert_eq!(
                res.trace.event_at(step, 3),
                SquareEvent::Stationary { piece_id: PieceId(3) }
            );
        }
        assert_eq!(res.trace.event_at(1, 2), SquareEvent::InTransit { piece_id: PieceId(0) });
    }

    #[test]
    fn same_color_enemy_bumps_the_mover() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (3, Team::Bottom, Color::White, PieceKind::Knight),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3)]).unwrap();
        assert_eq!(res.fen, fen);
        assert_eq!(res.bumped, vec![PieceId(0)]);
    }

    #[test]
    fn knight_jumps_at_the_first_step() {
        let fen = board(&[(0, Team::Top, Color::White, PieceKind::Knight)]);
        let dest = to_idx(1, 2, 8);
        let res = resolve(&fen, &[mv(0, dest)]).unwrap();

        assert_eq!(res.trace.len(), 8);
        let knight = PieceId(0);
        assert_eq!(res.trace.event_at(0, dest), SquareEvent::InTransit { piece_id: knight });
        for step in 1..8 {
            assert_eq!(res.trace.event_at(step, dest), SquareEvent::Arrived { piece_id: knight });
        }
        for step in 0..8 {
            assert_eq!(res.trace.event_at(step, 0), SquareEvent::Empty);
        }
        assert_eq!(res.fen.get_piece(17), piece(Team::Top, Color::White, PieceKind::Knight));
        assert_eq!(res.fen.get_piece(0), None);
    }

    #[test]
    fn knight_captures_on_landing() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Knight),
            (17, Team::Bottom, Color::Black, PieceKind::Queen),
        ]);
        let res = resolve(&fen, &[Move::new(0, 17)]).unwrap();
        assert_eq!(
            res.trace.event_at(0, 17),
            SquareEvent::Captured {
                piece_id: PieceId(17),
                by: PieceId(0)
            }
        );
        assert_eq!(res.fen.get_piece(17), piece(Team::Top, Color::White, PieceKind::Knight));
        assert_eq!(res.fen.pieces().len(), 1);
    }

    #[test]
    fn rook_advances_one_square_per_step() {
        let fen = board(&[(0, Team::Top, Color::White, PieceKind::Rook)]);
        let res = resolve(&fen, &[Move::new(0, 7)]).unwrap();
        let rook = PieceId(0);

        for step in 0..7 {
            let (sq, ev) = res.trace.find(step, rook).unwrap();
            assert_eq!(sq, step + 1);
            assert_eq!(ev, SquareEvent::InTransit { piece_id: rook });
        }
        assert_eq!(res.trace.event_at(7, 7), SquareEvent::Arrived { piece_id: rook });
        assert_eq!(res.fen.get_piece(7), piece(Team::Top, Color::White, PieceKind::Rook));
        assert_eq!(res.fen.to_fen(), "7R/8/8/8/8/8/8/8");
    }

    #[test]
    fn capture_stops_a_slider_midway() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Queen),
            (2, Team::Bottom, Color::Black, PieceKind::Bishop),
        ]);
        let res = resolve(&fen, &[Move::new(0, 6)]).unwrap();
        assert_eq!(res.fen.get_piece(2), piece(Team::Top, Color::White, PieceKind::Queen));
        assert_eq!(res.fen.get_piece(6), None);
        assert_eq!(res.trace.event_at(7, 2), SquareEvent::Arrived { piece_id: PieceId(0) });
    }

    #[test]
    fn movers_meeting_head_on_are_both_bumped() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (4, Team::Bottom, Color::White, PieceKind::Rook),
        ]);
        let res = resolve(&fen, &[Move::new(0, 2), Move::new(4, 2)]).unwrap();
        assert_eq!(res.fen, fen);
        assert_eq!(res.bumped, vec![PieceId(0), PieceId(4)]);
        assert_eq!(res.trace.event_at(1, 0), SquareEvent::Bumped { piece_id: PieceId(0) });
        assert_eq!(res.trace.event_at(1, 4), SquareEvent::Bumped { piece_id: PieceId(4) });
    }

    #[test]
    fn pieces_may_move_into_squares_vacated_this_turn() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (3, Team::Top, Color::White, PieceKind::Rook),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3), Move::new(3, 5)]).unwrap();
        assert_eq!(res.fen.to_fen(), "3R1R2/8/8/8/8/8/8/8");
    }

    #[test]
    fn bumped_piece_reclaims_its_source() {
        // The rook is bumped at step 2 by its teammate on (3,0); the knight already landed on
        // the rook's source and is bumped home in turn.
        let knight_src = to_idx(1, 2, 8);
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (3, Team::Top, Color::Black, PieceKind::King),
            (knight_src, Team::Bottom, Color::White, PieceKind::Knight),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3), mv(knight_src, 0)]).unwrap();

        assert_eq!(res.fen, fen);
        assert_eq!(res.trace.event_at(1, 0), SquareEvent::Arrived { piece_id: PieceId(knight_src) });
        assert_eq!(res.trace.event_at(2, 0), SquareEvent::Bumped { piece_id: PieceId(0) });
        assert_eq!(
            res.trace.event_at(2, knight_src),
            SquareEvent::Bumped { piece_id: PieceId(knight_src) }
        );
    }

    #[test]
    fn three_way_collision_is_an_invariant_violation() {
        let fen = board(&[
            (0, Team::Top, Color::White, PieceKind::Rook),
            (6, Team::Bottom, Color::White, PieceKind::Rook),
            (3, Team::Bottom, Color::Black, PieceKind::Knight),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3), Move::new(6, 3)]);
        assert!(matches!(res, Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn inactive_color_moves_are_skipped() {
        let fen = board(&[
            (0, Team::Top, Color::Black, PieceKind::Rook),
            (9, Team::Top, Color::White, PieceKind::King),
        ]);
        let res = resolve(&fen, &[Move::new(0, 3), Move::new(9, 10)]).unwrap();
        assert_eq!(res.fen.get_piece(0), piece(Team::Top, Color::Black, PieceKind::Rook));
        assert_eq!(res.fen.get_piece(10), piece(Team::Top, Color::White, PieceKind::King));
        assert_eq!(res.trace.event_at(4, 0), SquareEvent::Stationary { piece_id: PieceId(0) });
    }

    #[test]
    fn last_move_for_a_source_wins() {
        let fen = board(&[(0, Team::Top, Color::White, PieceKind::Rook)]);
        let res = resolve(&fen, &[Move::new(0, 3), Move::new(0, 5)]).unwrap();
        assert_eq!(res.fen.get_piece(5), piece(Team::Top, Color::White, PieceKind::Rook));
        assert_eq!(res.fen.get_piece(3), None);
    }

    #[test]
    fn move_from_empty_square_is_an_invariant_violation() {
        let fen = board(&[(0, Team::Top, Color::White, PieceKind::Rook)]);
        let res = resolve(&fen, &[Move::new(1, 3)]);
        assert!(matches!(res, Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn resolution_is_deterministic() {
        let fen: Fen = crate::constants::initial_layout(8).unwrap().parse().unwrap();
        let moves = [
            mv(to_idx(2, 2, 8), to_idx(3, 4, 8)),
            mv(to_idx(1, 0, 8), to_idx(1, 1, 8)),
            mv(to_idx(2, 5, 8), to_idx(3, 3, 8)),
            mv(to_idx(1, 6, 8), to_idx(4, 3, 8)),
        ];
        let first = resolve(&fen, &moves).unwrap();
        let second = resolve(&fen, &moves).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn larger_boards_run_one_step_per_row() {
        for (size, pieces) in [(10, 52), (12, 76)] {
            let layout = crate::constants::initial_layout(size).unwrap();
            let fen: Fen = layout.parse().unwrap();
            assert_eq!(fen.size(), size);
            assert_eq!(fen.pieces().len(), pieces);

            let res = resolve(&fen, &[]).unwrap();
            assert_eq!(res.trace.len(), size);
            assert_eq!(res.fen.to_fen(), layout);

            let corner = size * size - 1;
            let mut open = Fen::new(size).unwrap();
            open.set_piece(0, Piece::new(Team::Top, Color::White, PieceKind::Queen)).unwrap();
            let res = resolve(&open, &[mv(0, corner)]).unwrap();
            let queen = PieceId(0);
            assert_eq!(res.trace.len(), size);
            assert_eq!(
                res.trace.event_at(size - 2, corner),
                SquareEvent::InTransit { piece_id: queen }
            );
            assert_eq!(
                res.trace.event_at(size - 1, corner),
                SquareEvent::Arrived { piece_id: queen }
            );
            assert_eq!(
                res.fen.pieces(),
                vec![(corner, Piece::new(Team::Top, Color::White, PieceKind::Queen))]
            );
        }
    }

    #[test]
    fn not_started_game_cannot_resolve() {
        let fen = Fen::new(8).unwrap();
        assert!(matches!(Resolver::new(&fen, 0), Err(Error::NotStarted)));
    }

    #[test]
    fn encoded_boundary() {
        let (out, trace) = resolve_encoded("R7/8/8/8/8/8/8/8", 8, &[Move::new(0, 56)], 1).unwrap();
        assert_eq!(out, "8/8/8/8/8/8/8/R7");
        assert_eq!(trace.len(), 8);

        let res = resolve_encoded("8/8/8/8/8/8/8/8", 10, &[], 1);
        assert_eq!(res, Err(Error::UnsupportedBoardSize(8)));
    }
}
