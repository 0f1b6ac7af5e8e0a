//! Shared builders and assertions for the integration tests.

#![allow(dead_code)]

pub mod message_assertions;
pub mod session_fixtures;
