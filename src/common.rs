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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

use std::time::Duration;

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable from the optimization problem at hand.
/// In this case, each variable is assumed to be identified with an integer
/// ranging from 0 until `problem.nb_variables()`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable(pub usize);
impl Variable {
    #[inline]
    /// This function retruns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use bab::Variable;
    /// assert_eq!(0, Variable(0).id());
    /// assert_eq!(1, Variable(1).id());
    /// assert_eq!(2, Variable(2).id());
    /// assert_eq!(3, Variable(3).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- DECISION ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This denotes a decision that was made during the search. It affects a given
/// `value` to the specified `variable`. Any given `Decision` should be
/// understood as ```[[ variable = value ]]````
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Decision {
    pub variable: Variable,
    pub value: isize,
}

// ----------------------------------------------------------------------------
// --- ASSIGNMENT -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An explicit, strongly typed partial assignment of the problem variables.
/// The arity is fixed at creation (one slot per variable of the instance) and
/// each slot either holds the value that was decided for that variable or
/// remains open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    /// One slot per variable of the instance. `None` means undecided.
    values: Vec<Option<isize>>,
    /// The number of slots that have been decided so far.
    decided: usize,
}
impl Assignment {
    /// Creates an empty (all variables undecided) assignment over
    /// `nb_variables` variables.
    pub fn new(nb_variables: usize) -> Self {
        Assignment {
            values: vec![None; nb_variables],
            decided: 0,
        }
    }
    /// The total number of variables this assignment bears on.
    pub fn nb_variables(&self) -> usize {
        self.values.len()
    }
    /// The number of variables that have been decided so far.
    pub fn nb_decided(&self) -> usize {
        self.decided
    }
    /// Returns the value that was decided for `var`, or `None` when the
    /// variable is still open.
    pub fn value_of(&self, var: Variable) -> Option<isize> {
        self.values[var.id()]
    }
    /// Returns true iff `var` has not been decided yet.
    pub fn is_open(&self, var: Variable) -> bool {
        self.values[var.id()].is_none()
    }
    /// Records the given decision in place. A variable may only ever be
    /// decided once over the lifetime of an assignment.
    pub fn decide(&mut self, decision: Decision) {
        debug_assert!(self.values[decision.variable.id()].is_none());
        self.values[decision.variable.id()] = Some(decision.value);
        self.decided += 1;
    }
    /// Returns a copy of this assignment, extended with one additional
    /// decision. This is how children are derived from their parent when
    /// branching.
    pub fn extended(&self, decision: Decision) -> Assignment {
        let mut child = self.clone();
        child.decide(decision);
        child
    }
    /// Iterates over the decisions that have been made, in variable order.
    pub fn decisions(&self) -> impl Iterator<Item = Decision> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(id, value)| value.map(|value| Decision { variable: Variable(id), value }))
    }
    /// Iterates over the variables that are still open, in declaration order.
    pub fn open_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(id, value)| if value.is_none() { Some(Variable(id)) } else { None })
    }
}

// ----------------------------------------------------------------------------
// --- NODE -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A node of the branch-and-bound tree: a partial assignment awaiting
/// expansion on the frontier. The bound is computed by the bound oracle when
/// the node is created by branching (never lazily) and is admissible for
/// every complete feasible extension of the assignment.
///
/// # Note:
/// Nodes own their assignment outright. They are moved (never shared) between
/// the frontier and the worker that expands them, which is what makes the
/// parallel solver data-race free by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The partial assignment this node stands for.
    pub assignment: Assignment,
    /// The number of decisions on the path from the root to this node.
    pub depth: usize,
    /// An admissible bound on the objective reachable from this node.
    pub bound: f64,
}

// ----------------------------------------------------------------------------
// --- RESULTS ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A reason explaining why the search stopped before optimality was proved.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reason {
    /// It stopped because the configured cutoff criterion was met
    CutoffOccurred,
}

/// The status tag of a completed (or interrupted) resolution.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Status {
    /// The incumbent is the proven global optimum.
    Optimal,
    /// The feasible region is empty: no complete feasible assignment exists.
    Infeasible,
    /// A resource limit fired before the proof completed. The incumbent (if
    /// any) is the best solution found so far, without an optimality
    /// certificate.
    Unproven,
}

/// The counters maintained by the search drivers. These are part of the
/// outcome so that callers can assess the effort that was spent (and, e.g.,
/// decide whether resuming with a larger budget is worth it).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Statistics {
    /// The number of nodes that were popped and effectively expanded
    /// (accepted or branched on).
    pub explored: usize,
    /// The number of nodes discarded because their bound could not improve
    /// on the incumbent (counted both at pop time and before insertion).
    pub pruned: usize,
    /// The largest size the frontier ever reached.
    pub peak_frontier: usize,
    /// Wall clock time spent solving.
    pub elapsed: Duration,
}

/// The outcome of a resolution: the status tag, the incumbent (when one was
/// found) and the search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Optimal, Infeasible or Unproven.
    pub status: Status,
    /// The objective value of the incumbent, if one was found.
    pub best_value: Option<f64>,
    /// The incumbent assignment, if one was found.
    pub best_assignment: Option<Assignment>,
    /// The effort counters of this run.
    pub statistics: Statistics,
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_var {
    use crate::Variable;

    #[test]
    fn test_var_id() {
        assert_eq!(0, Variable(0).id());
        assert_eq!(1, Variable(1).id());
        assert_eq!(2, Variable(2).id());
        assert_eq!(3, Variable(3).id());
    }
}
