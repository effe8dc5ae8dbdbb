//! Optional run artefacts beyond the results file.

pub mod chart;
