//! Callwatch - presence sessions and idle-channel auto-mute
//!
//! This crate turns a stream of voice-channel presence changes into
//! multi-participant session records, per-member call-time statistics,
//! a live status line, and an idle watchdog that asks a lone member to
//! confirm they are still there before muting them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
