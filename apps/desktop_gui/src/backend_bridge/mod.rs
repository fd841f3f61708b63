//! Backend worker bridge: the command vocabulary and the runtime that executes it.

pub mod commands;
pub mod runtime;
