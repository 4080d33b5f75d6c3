pub mod config;
pub mod constants;
pub mod error;
pub mod fen;
pub mod game;
pub mod legality;
pub mod r#move;
pub mod move_gen;
pub mod pending;
pub mod resolve;
pub mod square;
pub mod trace;

pub use error::{Error, Result};
