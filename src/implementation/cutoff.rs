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

//! This module provides the implementation of the various cutoff policies
//! that can be used to bound the resources a resolution may consume.

use std::{
    sync::{atomic::AtomicBool, Arc},
    time::Duration,
};

use crate::Cutoff;

/// _This is the default cutoff._ It imposes that the search goes all the way
/// to a complete proof of optimality before it stops.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self, _explored: usize) -> bool {
        false
    }
}

/// This cutoff allows one to specify a maximum time budget to solve the
/// problem. Once the time budget is elapsed, the optimization stops and the
/// best solution that has been found (so far) is returned tagged `Unproven`.
#[derive(Debug, Clone)]
pub struct TimeBudget {
    stop: Arc<AtomicBool>,
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let t_flag = Arc::clone(&stop);

        // timer
        std::thread::spawn(move || {
            std::thread::sleep(budget);
            t_flag.store(true, std::sync::atomic::Ordering::Relaxed);
        });

        TimeBudget { stop }
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self, _explored: usize) -> bool {
        self.stop.load(std::sync::atomic::Ordering::Relaxed)
    }
}

/// This cutoff allows one to specify a maximum number of nodes the search
/// may expand before it is interrupted.
#[derive(Debug, Copy, Clone)]
pub struct NodeBudget(pub usize);
impl Cutoff for NodeBudget {
    fn must_stop(&self, explored: usize) -> bool {
        explored >= self.0
    }
}

/// Combines several cutoffs: the search stops as soon as any of them fires.
/// This is how a node budget and a time budget are enforced together.
pub struct AnyCutoff(Vec<Box<dyn Cutoff + Send + Sync>>);
impl AnyCutoff {
    pub fn new(cutoffs: Vec<Box<dyn Cutoff + Send + Sync>>) -> Self {
        Self(cutoffs)
    }
}
impl Cutoff for AnyCutoff {
    fn must_stop(&self, explored: usize) -> bool {
        self.0.iter().any(|cutoff| cutoff.must_stop(explored))
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_cutoff {
    use crate::{AnyCutoff, Cutoff, NoCutoff, NodeBudget};

    #[test]
    fn no_cutoff_never_stops() {
        assert!(!NoCutoff.must_stop(0));
        assert!(!NoCutoff.must_stop(usize::MAX));
    }
    #[test]
    fn node_budget_fires_once_the_budget_is_spent() {
        let cutoff = NodeBudget(10);
        assert!(!cutoff.must_stop(0));
        assert!(!cutoff.must_stop(9));
        assert!(cutoff.must_stop(10));
        assert!(cutoff.must_stop(11));
    }
    #[test]
    fn any_cutoff_fires_when_any_member_fires() {
        let cutoff = AnyCutoff::new(vec![Box::new(NoCutoff), Box::new(NodeBudget(5))]);
        assert!(!cutoff.must_stop(4));
        assert!(cutoff.must_stop(5));
    }
    #[test]
    fn an_empty_any_cutoff_never_fires() {
        let cutoff = AnyCutoff::new(vec![]);
        assert!(!cutoff.must_stop(usize::MAX));
    }
}
