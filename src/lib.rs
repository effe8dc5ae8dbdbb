//! Feature-subset evaluation driver.
//!
//! Loads a training and a held-out feature table, enumerates candidate
//! feature subsets with one of the [`select::Strategy`] variants, scores each
//! subset with a freshly fitted [`eval::Evaluator`], and collects the
//! [`results::ScoreRecord`]s into one timestamped results file.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod eval;
pub mod report;
pub mod results;
pub mod select;
