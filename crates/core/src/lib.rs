//! Core engine for Eleven, a TriPeaks-style solitaire. Keep this crate free
//! of IO and platform concerns.

pub mod board;
pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod rng;
pub mod rules;
pub mod run;
pub mod scoring;
pub mod state;

pub use board::*;
pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use rng::*;
pub use rules::*;
pub use run::*;
pub use scoring::*;
pub use state::*;
