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

//! This module provides the default bound oracle.

use crate::{Assignment, BoundOracle, Optimization};

/// _This is the default bound oracle._ It returns the weakest finite
/// admissible bound for the optimization sense at hand: trivially correct,
/// and trivially useless for pruning. With it, the solver degenerates into
/// an exhaustive enumeration of the feasible region -- which is still exact,
/// just slow. Any real use of the library should plug in a problem-specific
/// oracle derived from a relaxation of the problem.
#[derive(Debug, Copy, Clone)]
pub struct TrivialBound(pub Optimization);
impl BoundOracle for TrivialBound {
    fn bound(&self, _assignment: &Assignment) -> f64 {
        self.0.uninformed_bound()
    }
}
