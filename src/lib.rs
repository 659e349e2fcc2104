//! RICE prioritization: score product initiatives by Reach, Impact,
//! Confidence and Effort, rank them, and keep them in a local store.

pub mod config;
pub mod initiative;
pub mod output;
pub mod scoring;
pub mod store;
pub mod transfer;
