use crate::core::{BoardState, Move};
use crate::player::PlayerController;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cell::RefCell;

/// Uniformly random legal moves. Seeded instances are reproducible.
pub struct RandomAI {
    pub name: String,
    rng: RefCell<StdRng>,
}

impl RandomAI {
    pub fn new(name: &str) -> Self {
        RandomAI {
            name: name.to_string(),
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(name: &str, seed: u64) -> Self {
        RandomAI {
            name: name.to_string(),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PlayerController for RandomAI {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&self, _board: &BoardState, legal_moves: &[Move]) -> Option<Move> {
        legal_moves.choose(&mut *self.rng.borrow_mut()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::legal_moves;

    #[test]
    fn test_random_picks_legal_moves() {
        let ai = RandomAI::new("Random");
        let board = BoardState::parse("XO. .X. ..O", crate::core::Side::X).unwrap();
        let legal = legal_moves(&board);
        for _ in 0..20 {
            let mv = ai.choose_move(&board, &legal).unwrap();
            assert!(legal.contains(&mv));
        }
        assert_eq!(ai.choose_move(&board, &[]), None);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let board = BoardState::new();
        let legal = legal_moves(&board);
        let a = RandomAI::seeded("a", 7);
        let b = RandomAI::seeded("b", 7);
        for _ in 0..10 {
            assert_eq!(a.choose_move(&board, &legal), b.choose_move(&board, &legal));
        }
    }
}
