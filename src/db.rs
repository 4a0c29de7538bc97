// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2025 Cornell University
// released under BSD 3-Clause License

use crate::hierarchy::{Scope, ScopeRef, ScopeType, Var, VarRef, VarType};
use crate::idcode::IdCode;
use crate::timeline::{Time, Timeline, ValueChange};
use crate::value::Value;
use crate::{Result, WaveDbError};
use rustc_hash::FxHashMap;
use std::num::NonZeroU32;
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Timescale {
    pub factor: u32,
    pub unit: TimescaleUnit,
}

impl Timescale {
    pub fn new(factor: u32, unit: TimescaleUnit) -> Self {
        Timescale { factor, unit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub enum TimescaleUnit {
    FemtoSeconds,
    PicoSeconds,
    NanoSeconds,
    MicroSeconds,
    MilliSeconds,
    Seconds,
    Unknown,
}

impl TimescaleUnit {
    pub fn to_exponent(&self) -> Option<i8> {
        match &self {
            TimescaleUnit::FemtoSeconds => Some(-15),
            TimescaleUnit::PicoSeconds => Some(-12),
            TimescaleUnit::NanoSeconds => Some(-9),
            TimescaleUnit::MicroSeconds => Some(-6),
            TimescaleUnit::MilliSeconds => Some(-3),
            TimescaleUnit::Seconds => Some(0),
            TimescaleUnit::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
struct WaveDbMetaData {
    timescale: Option<Timescale>,
    date: String,
    version: String,
    comments: Vec<String>,
}

/// In-memory model of one VCD waveform file.
///
/// The database owns the scope tree, all variable declarations and the
/// per-id-code value-change timelines. The producer (a VCD parser) builds it
/// incrementally through [`add_scope`](WaveDb::add_scope),
/// [`add_var`](WaveDb::add_var) and [`append_change`](WaveDb::append_change);
/// consumers traverse the tree and query timelines read-only afterwards.
/// Construction takes `&mut self` throughout, so readers and the single
/// writer can never interleave.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveDb {
    scopes: Vec<Scope>,
    vars: Vec<Var>,
    roots: Vec<ScopeRef>,
    timelines: FxHashMap<IdCode, Timeline>,
    meta: WaveDbMetaData,
}

impl WaveDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scope under `parent`, or as a new top-level root for `None`.
    ///
    /// The scope is appended after its siblings. Duplicate names are not
    /// checked: a VCD hierarchy may legally contain equally named scopes at
    /// different positions, and the model stays agnostic to that.
    pub fn add_scope(
        &mut self,
        parent: Option<ScopeRef>,
        name: impl Into<String>,
        tpe: ScopeType,
    ) -> ScopeRef {
        let scope_ref = ScopeRef::from_index(self.scopes.len()).unwrap();
        self.scopes.push(Scope {
            name: name.into(),
            tpe,
            parent,
            scopes: Vec::new(),
            vars: Vec::new(),
        });
        match parent {
            Some(parent) => self.scopes[parent.index()].scopes.push(scope_ref),
            None => self.roots.push(scope_ref),
        }
        scope_ref
    }

    /// Declares a variable in `scope`.
    ///
    /// If no timeline exists for `id` yet, an empty one is created in the
    /// same step; otherwise the new declaration becomes an alias observing
    /// the existing timeline. A declared width of 0 is recorded as 1 bit.
    pub fn add_var(
        &mut self,
        scope: ScopeRef,
        name: impl Into<String>,
        tpe: VarType,
        width: u32,
        id: IdCode,
    ) -> VarRef {
        let width = NonZeroU32::new(width).unwrap_or(NonZeroU32::new(1).unwrap());
        let var_ref = VarRef::from_index(self.vars.len()).unwrap();
        self.vars.push(Var {
            name: name.into(),
            tpe,
            width,
            id,
            parent: scope,
        });
        self.scopes[scope.index()].vars.push(var_ref);
        self.timelines
            .entry(id)
            .or_insert_with(|| Timeline::new(width.get()));
        var_ref
    }

    /// Appends a value change to the timeline registered for `id`.
    ///
    /// Fails with [`WaveDbError::InvalidTimestamp`] for negative times, with
    /// [`WaveDbError::UnknownIdCode`] when no variable was ever declared with
    /// `id` (no timeline is created as a side effect), and with
    /// [`WaveDbError::OutOfOrderTimestamp`] when `time` lies before the
    /// timeline's last recorded time. A failed call leaves the model exactly
    /// as it was.
    pub fn append_change(&mut self, id: IdCode, time: i64, value: Value) -> Result<()> {
        let time = Time::try_from(time).map_err(|_| WaveDbError::InvalidTimestamp(time))?;
        let timeline = self
            .timelines
            .get_mut(&id)
            .ok_or(WaveDbError::UnknownIdCode(id))?;
        timeline.append(time, value)
    }

    /// Resolves a hierarchical path (root scope name first) to a scope.
    ///
    /// Segments match exactly and case-sensitively; when sibling scopes share
    /// a name, the first one in declaration order wins. Any unmatched segment
    /// (or an empty path) fails with [`WaveDbError::ScopeNotFound`].
    pub fn lookup_scope<N: AsRef<str>>(&self, path: &[N]) -> Result<ScopeRef> {
        let not_found = || {
            let joined: Vec<&str> = path.iter().map(|n| n.as_ref()).collect();
            WaveDbError::ScopeNotFound(joined.join("."))
        };
        let prefix = path.first().ok_or_else(not_found)?;
        let mut scope = self
            .roots()
            .find(|s| self[*s].name() == prefix.as_ref())
            .ok_or_else(not_found)?;
        for name in path.iter().skip(1) {
            scope = self[scope]
                .scopes()
                .find(|s| self[*s].name() == name.as_ref())
                .ok_or_else(not_found)?;
        }
        Ok(scope)
    }

    /// Finds the first variable called `name` declared directly in the scope
    /// at `path`.
    pub fn lookup_var<N: AsRef<str>>(&self, path: &[N], name: &N) -> Option<VarRef> {
        let scope = self.lookup_scope(path).ok()?;
        self[scope].vars().find(|v| self[*v].name() == name.as_ref())
    }

    /// Read-only access to the timeline registered for `id`.
    pub fn timeline(&self, id: IdCode) -> Option<&Timeline> {
        self.timelines.get(&id)
    }

    /// The value in effect at `time` on the timeline registered for `id`.
    pub fn value_at(&self, id: IdCode, time: i64) -> Result<Value> {
        let timeline = self.timeline(id).ok_or(WaveDbError::UnknownIdCode(id))?;
        Ok(timeline.value_at(time))
    }

    /// The changes with `start <= time <= end_inclusive` on the timeline
    /// registered for `id`, in time order.
    pub fn changes_in_range(
        &self,
        id: IdCode,
        start: i64,
        end_inclusive: i64,
    ) -> Result<std::slice::Iter<'_, ValueChange>> {
        let timeline = self.timeline(id).ok_or(WaveDbError::UnknownIdCode(id))?;
        Ok(timeline.changes_in_range(start, end_inclusive))
    }

    /// Top-level scopes in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = ScopeRef> + '_ {
        self.roots.iter().copied()
    }

    /// The first scope that was declared.
    pub fn first_scope(&self) -> Option<&Scope> {
        self.scopes.first()
    }

    /// All scopes (at all levels) in declaration order.
    pub fn iter_scopes(&self) -> std::slice::Iter<'_, Scope> {
        self.scopes.iter()
    }

    /// All variable declarations (at all levels) in declaration order.
    pub fn iter_vars(&self) -> std::slice::Iter<'_, Var> {
        self.vars.iter()
    }

    /// Number of distinct id codes, i.e. of physical signals.
    pub fn num_unique_signals(&self) -> usize {
        self.timelines.len()
    }

    pub fn date(&self) -> &str {
        &self.meta.date
    }
    pub fn version(&self) -> &str {
        &self.meta.version
    }
    pub fn timescale(&self) -> Option<Timescale> {
        self.meta.timescale
    }

    pub fn set_date(&mut self, value: String) {
        self.meta.date = value;
    }

    pub fn set_version(&mut self, value: String) {
        self.meta.version = value;
    }

    pub fn set_timescale(&mut self, value: Timescale) {
        self.meta.timescale = Some(value);
    }

    pub fn add_comment(&mut self, comment: String) {
        self.meta.comments.push(comment);
    }
}

impl Index<ScopeRef> for WaveDb {
    type Output = Scope;

    fn index(&self, index: ScopeRef) -> &Self::Output {
        &self.scopes[index.index()]
    }
}

impl Index<VarRef> for WaveDb {
    type Output = Var;

    fn index(&self, index: VarRef) -> &Self::Output {
        &self.vars[index.index()]
    }
}
