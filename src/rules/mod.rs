//! Implementation of Xiangqi board state and rules.

pub mod board;
pub mod core;
pub mod legality;
