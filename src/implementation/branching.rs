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

//! This module provides the implementation of the reference branching
//! strategies: first-unassigned-variable and most-constrained-variable.

use crate::{Assignment, BranchingStrategy, Decision, Problem, Variable};

/// _This is the default branching strategy._ It forks on the first variable
/// (in declaration order) that has not been decided yet. Simple, cheap, and
/// fully deterministic.
#[derive(Debug, Default, Copy, Clone)]
pub struct FirstUnassigned;
impl BranchingStrategy for FirstUnassigned {
    fn select_variable(&self, _problem: &dyn Problem, assignment: &Assignment) -> Option<Variable> {
        assignment.open_variables().next()
    }
}

/// The most-constrained-variable strategy forks on the open variable with
/// the fewest remaining feasible values (fail-first). Candidate values are
/// counted by tentatively extending the assignment and asking the problem's
/// incremental feasibility check. Ties are broken by declaration order for
/// determinism.
#[derive(Debug, Default, Copy, Clone)]
pub struct MostConstrained;
impl MostConstrained {
    fn nb_feasible_values(problem: &dyn Problem, assignment: &Assignment, var: Variable) -> usize {
        problem
            .domain_of(var)
            .iter()
            .filter(|&&value| {
                problem.is_feasible(&assignment.extended(Decision { variable: var, value }))
            })
            .count()
    }
}
impl BranchingStrategy for MostConstrained {
    fn select_variable(&self, problem: &dyn Problem, assignment: &Assignment) -> Option<Variable> {
        // min_by_key keeps the first minimum, hence the declaration order
        // tie break comes for free
        assignment
            .open_variables()
            .min_by_key(|&var| Self::nb_feasible_values(problem, assignment, var))
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
