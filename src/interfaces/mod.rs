//! Interfaces between the orbital-grid pipeline and the outside world.

pub mod cli;
pub mod input;
pub mod web;
