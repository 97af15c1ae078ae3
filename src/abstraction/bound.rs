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

//! This module defines the `BoundOracle` trait: the pluggable capability that
//! estimates what can still be achieved from a partial assignment.

use crate::Assignment;

/// A bound oracle computes an *admissible* bound for a partial assignment:
/// for every complete feasible extension of the assignment, the objective of
/// that extension is no better (for minimization: no lower, for maximization:
/// no higher) than the returned value. Typically this is obtained from a
/// relaxation of the problem, e.g. by ignoring the integrality of the
/// decisions.
///
/// Admissibility is the one and only correctness requirement. Tightness, on
/// the other hand, is the primary performance lever of the whole solver: a
/// tighter admissible bound strictly reduces the number of nodes expanded
/// without ever affecting the optimality of the result.
///
/// The returned value must be finite; a non-finite bound aborts the run with
/// a hard error identifying the offending node.
pub trait BoundOracle {
    /// An admissible estimate of the best objective reachable by completing
    /// the given partial assignment.
    fn bound(&self, assignment: &Assignment) -> f64;
}
