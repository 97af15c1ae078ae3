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

//! This module provides the two frontier implementations backing the search
//! policies: a best-bound-first priority queue and a depth-first stack.

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;
use compare::Compare;

use crate::{Frontier, Node, Optimization};

/// A frontier entry: the node itself plus the (monotonically increasing)
/// insertion sequence number used as the final tie break.
struct Entry {
    node: Node,
    seq: u64,
}

/// The comparator ordering the best-bound frontier. The most promising bound
/// wins; when bounds are equal the deeper node wins (it drives the search
/// toward complete solutions faster, which shortens the time to the first
/// incumbent); remaining ties are resolved by insertion order so that two
/// sequential runs of the same instance pop nodes in the exact same order.
struct BestBoundOrder(Optimization);
impl Compare<Entry> for BestBoundOrder {
    fn compare(&self, l: &Entry, r: &Entry) -> Ordering {
        let promise = match self.0 {
            Optimization::Maximize => l.node.bound.total_cmp(&r.node.bound),
            Optimization::Minimize => r.node.bound.total_cmp(&l.node.bound),
        };
        promise
            .then_with(|| l.node.depth.cmp(&r.node.depth))
            .then_with(|| r.seq.cmp(&l.seq))
    }
}

/// The default frontier: a binary heap that always pops the open node whose
/// bound is the most promising for the optimization sense at hand.
///
/// # Note:
/// Because this frontier pops nodes in decreasing promise order, the bound
/// of the node being popped is a valid dual bound on everything that remains
/// open. This is what makes `best_bound`/`gap` certificates possible.
pub struct BestBoundFrontier {
    heap: BinaryHeap<Entry, BestBoundOrder>,
    seq: u64,
}
impl BestBoundFrontier {
    /// Creates an empty best-bound-first frontier for the given sense.
    pub fn new(optimization: Optimization) -> Self {
        Self {
            heap: BinaryHeap::from_vec_cmp(vec![], BestBoundOrder(optimization)),
            seq: 0,
        }
    }
}
impl Frontier for BestBoundFrontier {
    fn push(&mut self, node: Node) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Entry { node, seq });
    }
    fn pop(&mut self) -> Option<Node> {
        self.heap.pop().map(|entry| entry.node)
    }
    fn clear(&mut self) {
        self.heap.clear()
    }
    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// The depth-first frontier: a plain LIFO stack. The most recently inserted
/// node pops first, which keeps the memory footprint of the open list linear
/// in the tree depth (times the branching factor).
#[derive(Default)]
pub struct DepthFirstFrontier {
    stack: Vec<Node>,
}
impl DepthFirstFrontier {
    /// Creates an empty depth-first frontier.
    pub fn new() -> Self {
        Self::default()
    }
}
impl Frontier for DepthFirstFrontier {
    fn push(&mut self, node: Node) {
        self.stack.push(node)
    }
    fn pop(&mut self) -> Option<Node> {
        self.stack.pop()
    }
    fn clear(&mut self) {
        self.stack.clear()
    }
    fn len(&self) -> usize {
        self.stack.len()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
