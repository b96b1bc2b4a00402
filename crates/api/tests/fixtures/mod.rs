// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Test fixtures for catalog integration tests
//!
//! This module provides sample catalogs, a store that always fails, and a
//! helper that starts the real server over either.

pub mod catalog;

pub use catalog::*;
