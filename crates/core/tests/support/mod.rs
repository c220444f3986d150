//! Shared test helpers for `tallybridge-core` integration tests.
//!
//! In-memory doubles for the backend and daemon ports so pipeline tests can
//! focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod doubles;
