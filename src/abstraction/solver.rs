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

//! This module defines the `Solver` trait.

use crate::{Assignment, Outcome, SolverError};

/// This is the solver abstraction. It is implemented by the structures that
/// run the branch-and-bound algorithm (sequentially or in parallel) to find
/// the provably best possible solution to a given problem.
pub trait Solver {
    /// This method orders the solver to search for the optimal solution
    /// among all possibilities. The returned outcome is tagged `Optimal`
    /// when the search ran to completion, `Infeasible` when the feasible
    /// region turned out to be empty, and `Unproven` when a resource limit
    /// interrupted the proof (in which case the incumbent, if any, is the
    /// best solution known at that point).
    ///
    /// Hard failures (malformed instance, non-finite bound) are reported as
    /// errors and yield no partial result.
    fn solve(&mut self) -> Result<Outcome, SolverError>;
    /// This method returns the objective value of the best solution that has
    /// been found. It returns `None` when no solution has been found (yet).
    fn best_value(&self) -> Option<f64>;
    /// This method returns the best complete feasible assignment identified
    /// so far, or `None` when there is none.
    fn best_assignment(&self) -> Option<Assignment>;
    /// Returns the tightest dual bound that can be guaranteed so far: the
    /// bound of the last node selected for expansion. Under the best bound
    /// first policy this is a certificate on everything left in the
    /// frontier; under depth first it is merely the last observation.
    /// Before any node has been popped it is infinite (no information).
    fn best_bound(&self) -> f64;
    /// Seeds the incumbent with a known feasible solution (a primal bound).
    /// The solver will only ever replace it with strict improvements, so
    /// seeding can only shrink the search.
    fn set_primal(&mut self, assignment: Assignment, value: f64);
    /// Computes the relative optimality gap between the incumbent and the
    /// guaranteed dual bound. It is 1.0 when nothing is known and 0.0 once
    /// optimality has been proved.
    fn gap(&self) -> f64 {
        match self.best_value() {
            None => 1.0,
            Some(value) => {
                let bound = self.best_bound();
                if !bound.is_finite() {
                    1.0
                } else {
                    let scale = value.abs().max(bound.abs());
                    if scale == 0.0 {
                        0.0
                    } else {
                        (bound - value).abs() / scale
                    }
                }
            }
        }
    }
}
