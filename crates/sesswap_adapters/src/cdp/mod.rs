//! DevTools module for reaching the page-side executor
//!
//! The switch executor runs inside the target page itself. This module
//! carries the plumbing to get it there through a Chromium DevTools
//! endpoint: target discovery over HTTP, script delivery over the per-page
//! WebSocket, and the injected script that performs the storage write and
//! renders the reload notification.

mod client;
mod injection;
mod protocol;

pub use client::CdpSessionBridge;
pub use injection::build_switch_script;
pub use protocol::{decode_reply, parse_evaluate_reply, CdpReply, EvaluateCommand, TargetInfo};
