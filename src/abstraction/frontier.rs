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

use crate::Node;

/// This trait abstracts away the implementation details of the solver
/// frontier. That is, a Frontier represents the global open-node collection
/// which stores all the nodes remaining to explore.
///
/// # Note:
/// The order in which `pop` yields nodes is the search policy (best bound
/// first, or depth first) and is fixed when the concrete frontier is
/// instantiated. The drivers themselves are policy agnostic.
pub trait Frontier {
    /// This is how you push a node onto the frontier.
    fn push(&mut self, node: Node);
    /// This method yields the next node to expand according to the frontier
    /// policy, or `None` when no open node remains.
    fn pop(&mut self) -> Option<Node>;
    /// This method clears the frontier: it removes all open nodes.
    fn clear(&mut self);
    /// Yields the number of open nodes.
    fn len(&self) -> usize;
    /// Returns true iff the frontier is empty (len == 0). This is the O(1)
    /// emptiness check the drivers use for their termination test.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
