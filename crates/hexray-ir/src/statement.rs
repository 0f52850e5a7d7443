//! Statements: ordered groups of top-level expressions.

use std::fmt;

use crate::arena::structurally_equal;
use crate::error::{IrError, Result};
use crate::{ExprArena, ExprId};

/// One recovered source-level statement.
///
/// A statement owns the arena its trees live in, so statements never share
/// nodes and can be rewritten independently of one another.
#[derive(Debug, Clone)]
pub struct Statement {
    arena: ExprArena,
    roots: Vec<ExprId>,
}

impl Statement {
    /// Creates a statement from an arena and its top-level expressions.
    pub fn new(arena: ExprArena, roots: Vec<ExprId>) -> Result<Self> {
        if roots.is_empty() {
            return Err(IrError::EmptyStatement);
        }
        if let Some(&bad) = roots.iter().find(|&&id| !arena.contains(id)) {
            return Err(IrError::InvalidExprId(bad));
        }
        Ok(Self { arena, roots })
    }

    /// Convenience constructor for a statement with a single expression.
    pub fn single(arena: ExprArena, root: ExprId) -> Result<Self> {
        Self::new(arena, vec![root])
    }

    /// Top-level expressions in order.
    pub fn roots(&self) -> &[ExprId] {
        &self.roots
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Mutable access to the nodes alongside the (fixed) list of roots.
    ///
    /// Roots cannot be added or removed once the statement exists; only the
    /// trees below them are rewritten.
    pub fn parts_mut(&mut self) -> (&mut ExprArena, &[ExprId]) {
        (&mut self.arena, &self.roots)
    }

    /// Number of nodes reachable from the roots.
    pub fn node_count(&self) -> usize {
        self.arena.reachable_count(&self.roots)
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(&a, &b)| structurally_equal(&self.arena, a, &other.arena, b))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, root) in self.roots.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", self.arena.display(*root))?;
        }
        Ok(())
    }
}
