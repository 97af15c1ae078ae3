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

//! This module defines the errors a resolution can fail with. Note that an
//! empty feasible region and an exhausted resource budget are *not* errors:
//! they are statuses of a successful run (`Infeasible` and `Unproven`).

use crate::Assignment;

/// The hard failures of the solver. These abort the run; no partial result is
/// returned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SolverError {
    /// The problem instance is malformed (inconsistent dimensions, a variable
    /// declared with an empty domain, ...). Detected before any search work
    /// is performed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The bound oracle produced a non-finite bound. The solver never
    /// substitutes a default value in that case since doing so could silently
    /// break admissibility; instead, the offending node is surfaced for
    /// diagnosis.
    #[error("non-finite bound {value} for node at depth {depth} ({assignment:?})")]
    NonFiniteBound {
        value: f64,
        depth: usize,
        assignment: Assignment,
    },
    /// The branching strategy failed to select an open variable for an
    /// incomplete node. This is a bug in the strategy; it is surfaced rather
    /// than recovered from.
    #[error("branching selected no variable for an incomplete node at depth {depth}")]
    NoBranchingVariable { depth: usize },
}

#[cfg(test)]
mod test_error {
    use crate::{Assignment, SolverError};

    #[test]
    fn invalid_input_displays_its_message() {
        let err = SolverError::InvalidInput("variable 3 has an empty domain".to_string());
        assert_eq!("invalid input: variable 3 has an empty domain", format!("{err}"));
    }
    #[test]
    fn non_finite_bound_identifies_the_offending_node() {
        let err = SolverError::NonFiniteBound {
            value: f64::NAN,
            depth: 4,
            assignment: Assignment::new(2),
        };
        let msg = format!("{err}");
        assert!(msg.contains("depth 4"));
        assert!(msg.contains("NaN"));
    }
}
