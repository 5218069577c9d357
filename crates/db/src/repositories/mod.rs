//! Repository layer: one zero-sized struct per table, each method taking
//! the pool explicitly.

pub mod millionaire_repo;

pub use millionaire_repo::MillionaireRepo;
