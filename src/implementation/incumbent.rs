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

//! This module provides the incumbent tracker: the synchronized state object
//! holding the best complete feasible solution discovered so far.

use parking_lot::Mutex;

use crate::{Assignment, Optimization};

/// The incumbent tracker. All mutation goes through the single atomic
/// `try_update` (replace-if-better) entry point, so the recorded objective
/// is monotonically improving over the lifetime of a run and two workers
/// racing to report an improvement cannot both win inconsistently. Readers
/// always observe a consistent snapshot.
pub struct Incumbent {
    optimization: Optimization,
    best: Mutex<Option<(Assignment, f64)>>,
}
impl Incumbent {
    /// Creates an empty tracker (no feasible solution known yet).
    pub fn new(optimization: Optimization) -> Self {
        Incumbent {
            optimization,
            best: Mutex::new(None),
        }
    }
    /// Records the given solution iff its objective strictly improves on the
    /// current incumbent (or if there is none yet). Returns whether the
    /// update occurred, which callers use for logging/telemetry.
    pub fn try_update(&self, assignment: Assignment, objective: f64) -> bool {
        let mut best = self.best.lock();
        let improves = best
            .as_ref()
            .map_or(true, |(_, current)| self.optimization.is_better(objective, *current));
        if improves {
            log::info!("incumbent improved to {objective}");
            *best = Some((assignment, objective));
        }
        improves
    }
    /// A consistent snapshot of the incumbent's objective value, or `None`
    /// when no feasible solution has been found yet.
    pub fn objective(&self) -> Option<f64> {
        self.best.lock().as_ref().map(|(_, value)| *value)
    }
    /// A consistent snapshot of the incumbent assignment and its objective.
    pub fn best(&self) -> Option<(Assignment, f64)> {
        self.best.lock().clone()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
