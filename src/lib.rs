//! relnotes: release-notes publisher for a Discord webhook
//!
//! This library provides:
//! - Character-budget accounting for the composed message (the changelog
//!   allowance moves with the project/version header)
//! - A Components V2 document assembler
//! - Submission validation that collects every violation at once
//! - An HTTP server exposing the submission and budget endpoints
//! - A webhook delivery transport behind an injectable trait

pub mod config;
pub mod discord;
pub mod release;
pub mod transport;
pub mod webhook;

pub use config::Config;
pub use release::ReleaseSubmission;
