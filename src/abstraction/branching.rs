// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the `BranchingStrategy` trait: the pluggable
//! capability that decides where the search tree forks.

use crate::{Assignment, Decision, Problem, Variable};

/// A branching strategy decides which open variable to fork on next, and how
/// to partition its domain into children.
///
/// Correctness requirement: for an incomplete assignment,
/// `select_variable` must return an *open* variable, and the decisions
/// returned by `branch` must be exhaustive and non-overlapping over that
/// variable's domain, so that no feasible solution is ever lost. The default
/// `branch` implementation produces one child per candidate value (singleton
/// partition), which trivially satisfies both requirements.
pub trait BranchingStrategy {
    /// Picks the open variable to fork on. Returns `None` only when every
    /// variable has been decided (the drivers never call this on complete
    /// assignments, but strategies should behave regardless).
    fn select_variable(&self, problem: &dyn Problem, assignment: &Assignment) -> Option<Variable>;

    /// Produces the decisions yielding the children of the given assignment,
    /// one per subset of the partition of `var`'s domain.
    fn branch(&self, problem: &dyn Problem, _assignment: &Assignment, var: Variable) -> Vec<Decision> {
        problem
            .domain_of(var)
            .iter()
            .map(|&value| Decision { variable: var, value })
            .collect()
    }
}
