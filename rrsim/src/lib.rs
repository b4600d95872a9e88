/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rrsim – multi-core round-robin message scheduler simulation
//!
//! Module layout (leaf to root):
//!
//! ```text
//! lib.rs
//! ├── client/       – client ids and the fixed rotation order
//! ├── message/      – messages, processed records, execution intervals, clocks
//! ├── queue/        – per-client FIFO queues
//! ├── scheduler/    – per-core rotation and the tick algorithm
//! ├── metrics/      – running count / average latency
//! ├── history/      – bounded display history
//! ├── injector/     – random client / message-kind selection
//! ├── simulation/   – owned state object: configure / inject / tick / reset
//! ├── config/       – YAML simulation configuration
//! └── driver/       – tokio timer loop for ticks and injections
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod history;
pub mod injector;
pub mod message;
pub mod metrics;
pub mod queue;
pub mod scheduler;
pub mod simulation;
