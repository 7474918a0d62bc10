/*
 * SPDX-FileCopyrightText: 2026 Ripple Project
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod backend;
pub mod backfill;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod metrics;
pub mod poll;
pub mod push;
pub mod renderer;
pub mod state;

#[cfg(test)]
pub(crate) mod testutil;
