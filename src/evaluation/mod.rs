//! This module implements "static" evaluation, i.e. assigning values to
//! pieces and positions without [`crate::search`].

pub mod material;

/// Value of a piece or a position in the units of the material table: a
/// Soldier is worth 10.
pub type Value = i32;
