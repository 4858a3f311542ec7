// src/dag/mod.rs

//! Task graph model.
//!
//! - [`graph`] holds the task arena with its dependency edges and the
//!   per-run task fields the simulation writes.
//! - [`distance`] derives each task's horizon distances when it becomes
//!   eligible.

pub mod distance;
pub mod graph;

pub use distance::{compute_distances, DistanceMap, UNREACHED_DISTANCE};
pub use graph::{Task, TaskGraph};
