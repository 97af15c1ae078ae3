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

//! This module defines the `Problem` trait: the contract any optimization
//! problem must fulfill in order to be solvable with this branch-and-bound
//! library. This is the single abstraction a client *must* implement.

use crate::{Assignment, Variable};

/// The direction of the optimization.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Optimization {
    /// Smaller objective values are better.
    Minimize,
    /// Larger objective values are better.
    Maximize,
}
impl Optimization {
    /// Returns true iff `a` is strictly better than `b` for this sense.
    #[inline]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Optimization::Minimize => a < b,
            Optimization::Maximize => a > b,
        }
    }
    /// The least informative *finite* admissible bound for this sense. This
    /// is what the default bound oracle returns: it never prunes anything
    /// but it never lies either.
    #[inline]
    pub fn uninformed_bound(self) -> f64 {
        match self {
            Optimization::Minimize => f64::MIN,
            Optimization::Maximize => f64::MAX,
        }
    }
    /// The "no information yet" dual bound: what `best_bound()` reports
    /// before any node has been popped.
    #[inline]
    pub fn unbounded(self) -> f64 {
        match self {
            Optimization::Minimize => f64::NEG_INFINITY,
            Optimization::Maximize => f64::INFINITY,
        }
    }
    /// Combines a parent's bound with a freshly computed child bound. A
    /// parent bound holds for every descendant, so the child may only keep
    /// the tighter of the two.
    #[inline]
    pub fn tighten(self, parent: f64, child: f64) -> f64 {
        match self {
            Optimization::Minimize => child.max(parent),
            Optimization::Maximize => child.min(parent),
        }
    }
}

/// This trait defines the "contract" of what defines an optimization problem
/// solvable with branch-and-bound: decision variables with explicit ordered
/// domains, an incrementally checkable feasibility predicate, and an
/// objective defined on complete feasible assignments.
///
/// All of the methods must be pure with respect to a given assignment so
/// that bound and branching computations are reproducible.
pub trait Problem {
    /// Any problem bears on a number of variable $x_0, x_1, x_2, ... , x_{n-1}$
    /// This method returns the value of the number $n$
    fn nb_variables(&self) -> usize;
    /// Whether the objective is to be minimized or maximized.
    fn optimization(&self) -> Optimization;
    /// The ordered set of candidate values for the given variable. The order
    /// is significant: it is the order in which the default branching
    /// enumerates children, and hence part of what makes a run reproducible.
    fn domain_of(&self, var: Variable) -> &[isize];
    /// Returns true iff the given (partial) assignment can still be extended
    /// into a feasible complete one as far as the constraints involving the
    /// decided variables can tell. This is called incrementally, each time a
    /// variable gets fixed.
    fn is_feasible(&self, assignment: &Assignment) -> bool;
    /// The objective value of the given assignment. Only ever called on
    /// complete feasible assignments.
    fn objective(&self, assignment: &Assignment) -> f64;
    /// Returns true iff every variable of the problem has been decided.
    fn is_complete(&self, assignment: &Assignment) -> bool {
        assignment.nb_decided() == self.nb_variables()
    }
}
