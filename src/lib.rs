//! Social Content Dashboard library.
//!
//! Generates platform-specific posts with an LLM, lets a user review and
//! refine them, and publishes them to connected social accounts. Long
//! Bluesky content is split into a numbered reply thread.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod components;
pub mod config;
pub mod constants;
pub mod db;
pub mod formatter;
pub mod llm;
pub mod platforms;
pub mod thread;
pub mod web;
pub mod workspace;
