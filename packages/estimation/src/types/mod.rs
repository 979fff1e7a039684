//! Data types for the estimation library.

pub mod company;
pub mod config;
pub mod observation;
