// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2025 Cornell University
// released under BSD 3-Clause License

//! In-memory container and query model for VCD (Value Change Dump) waveforms.
//!
//! A [`WaveDb`] reconciles two shapes of data: the tree-shaped namespace of
//! scopes and variable declarations, and a flat store of value-change
//! timelines addressed by opaque [`IdCode`]s. The external VCD parser builds
//! the model one event at a time through the mutating operations on
//! [`WaveDb`]; once construction is done, the model is read-many.

mod db;
mod hierarchy;
mod idcode;
mod timeline;
mod value;

/// Cargo.toml version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum WaveDbError {
    #[error("no variable was ever declared with id code `{0}`")]
    UnknownIdCode(idcode::IdCode),
    #[error("time {time} lies before the last recorded time {last}")]
    OutOfOrderTimestamp { last: timeline::Time, time: timeline::Time },
    #[error("invalid (negative) timestamp {0}")]
    InvalidTimestamp(i64),
    #[error("no scope found for path `{0}`")]
    ScopeNotFound(String),
}

pub type Result<T> = std::result::Result<T, WaveDbError>;

pub use db::{Timescale, TimescaleUnit, WaveDb};
pub use hierarchy::{Scope, ScopeRef, ScopeType, Var, VarRef, VarType};
pub use idcode::{IdCode, InvalidIdCode};
pub use timeline::{Time, Timeline, ValueChange};
pub use value::{BitValue, Value};
