//! A small engine for Blocky, a turn-based game played on a recursive board.
//!
//! The board is a square split recursively into four quadrants, up to a maximum depth.
//! Every undivided block has a colour. Players take turns changing the board: they rotate
//! or swap the four children of a block, or smash a block to regenerate its content. Each
//! player scores against a private goal, either the largest connected blob of a colour or
//! the amount of that colour on the outer edge.
//!
//! Players are humans (driven by input events), random players, or smart players that
//! sample moves and keep the best one.
//!
//! # Example
//!
//! ```rust
//! use blocky::config::GameConfig;
//! use blocky::game::Game;
//!
//! // Two smart players, fixed seed, ten rounds
//! let mut game = Game::from_config(GameConfig::auto_game()).unwrap();
//!
//! // Nobody needs input, so this plays the whole game
//! let summary = game.run().unwrap();
//!
//! println!("player {} wins, scores {:?}", summary.winner + 1, summary.scores);
//! ```

/// Geometry and colour primitives: points, colours, quadrants and blocks.
pub mod block;
/// Game configuration with TOML loading and preset setups.
pub mod config;
/// Error types for moves, configuration, structure checks and the game loop.
pub mod error;
/// The turn orchestrator and its builder.
pub mod game;
/// Goals and the blob and perimeter scoring functions.
pub mod goal;
/// Rotate, swap and smash.
pub mod moves;
/// The `MoveStrategy` contract and the `Player` seat.
pub mod player;
/// Human, random and smart strategies.
pub mod players;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Presentation hook and a text renderer.
pub mod render;
/// The block tree: generation, lookup, flattening and validation.
pub mod tree;
