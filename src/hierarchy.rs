// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2025 Cornell University
// released under BSD 3-Clause License

use crate::idcode::IdCode;
use crate::WaveDb;
use std::num::NonZeroU32;

/// Uniquely identifies a scope in the hierarchy.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeRef(NonZeroU32);

impl ScopeRef {
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        NonZeroU32::new(index as u32 + 1).map(Self)
    }

    #[inline]
    pub fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Uniquely identifies a variable declaration in the hierarchy.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct VarRef(NonZeroU32);

impl VarRef {
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        NonZeroU32::new(index as u32 + 1).map(Self)
    }

    #[inline]
    pub fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// VCD `$scope` types.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ScopeType {
    Module,
    Task,
    Function,
    Begin,
    Fork,
    Unknown,
}

/// VCD `$var` types.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum VarType {
    Event,
    Integer,
    Parameter,
    Real,
    Reg,
    Supply0,
    Supply1,
    Time,
    Tri,
    TriAnd,
    TriOr,
    TriReg,
    Tri0,
    Tri1,
    WAnd,
    Wire,
    WOr,
    String,
}

const SCOPE_SEPARATOR: char = '.';

/// A level of the design hierarchy: a module, task, function, block or fork
/// that groups variables and sub-scopes.
///
/// Scopes form a tree, never a graph: each scope is attached to its parent
/// (or the root set) when it is created and is never removed or re-parented.
/// Children are kept in declaration order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Scope {
    pub(crate) name: String,
    pub(crate) tpe: ScopeType,
    pub(crate) parent: Option<ScopeRef>,
    pub(crate) scopes: Vec<ScopeRef>,
    pub(crate) vars: Vec<VarRef>,
}

impl Scope {
    /// Local name of the scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope_type(&self) -> ScopeType {
        self.tpe
    }

    pub fn parent(&self) -> Option<ScopeRef> {
        self.parent
    }

    /// Full hierarchical name of the scope.
    pub fn full_name(&self, db: &WaveDb) -> String {
        let mut parents = Vec::new();
        let mut parent = self.parent;
        while let Some(id) = parent {
            parents.push(id);
            parent = db[id].parent;
        }
        let mut out = String::with_capacity((parents.len() + 1) * 5);
        for parent_id in parents.iter().rev() {
            out.push_str(db[*parent_id].name());
            out.push(SCOPE_SEPARATOR);
        }
        out.push_str(self.name());
        out
    }

    /// Child scopes in declaration order.
    pub fn scopes(&self) -> impl Iterator<Item = ScopeRef> + '_ {
        self.scopes.iter().copied()
    }

    /// Directly declared variables in declaration order.
    pub fn vars(&self) -> impl Iterator<Item = VarRef> + '_ {
        self.vars.iter().copied()
    }
}

/// One named signal declaration (`$var`) inside a scope.
///
/// A variable belongs to exactly one scope, but several variables may carry
/// the same [`IdCode`]: those are aliases of one physical signal and share a
/// single timeline in the containing [`WaveDb`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Var {
    pub(crate) name: String,
    pub(crate) tpe: VarType,
    pub(crate) width: NonZeroU32,
    pub(crate) id: IdCode,
    pub(crate) parent: ScopeRef,
}

impl Var {
    /// Local name of the variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VarType {
        self.tpe
    }

    /// Declared bit width.
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn is_1bit(&self) -> bool {
        self.width.get() == 1
    }

    /// Id code linking this declaration to its value-change timeline.
    pub fn id_code(&self) -> IdCode {
        self.id
    }

    /// The scope this variable was declared in.
    pub fn parent(&self) -> ScopeRef {
        self.parent
    }

    /// Full hierarchical name of the variable.
    pub fn full_name(&self, db: &WaveDb) -> String {
        let mut out = db[self.parent].full_name(db);
        out.push(SCOPE_SEPARATOR);
        out.push_str(self.name());
        out
    }
}
