// crates/core/src/lib.rs

//! Core building blocks for the coder agent: model clients, generated file
//! records and the agent state store.

pub mod agent_state;
pub mod ai_client;
pub mod foundry_client;
pub mod types;
