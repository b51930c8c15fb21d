//! playerlab-classifiers: KNN modeling pipeline for game-server player data.
//!
//! This crate loads a small tabular dataset of players, cleans it, splits
//! it with stratification, standardizes features on training statistics
//! only, and fits a K-nearest-neighbors classifier to predict the binary
//! subscription outcome. A cross-validated grid search picks the neighbor
//! count. Every stage is a value-in/value-out function so a run is fully
//! reproducible from a seed.
//!
//! The design favors small, testable modules; randomness is confined to
//! the seeded stratified shuffles and the tuning grid is the only place
//! that uses the rayon pool.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod split;
pub mod stats;
pub mod tune;
