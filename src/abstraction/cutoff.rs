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

//! This module defines the `Cutoff` trait: the resource limits that may
//! interrupt a resolution before optimality is proved.

/// A cutoff decides when the search must stop even though the proof of
/// optimality is not complete. The drivers poll it once per node selection,
/// so cancellation is always cooperative: no node is ever left partially
/// processed. A run interrupted by a cutoff terminates with the `Unproven`
/// status (and the best incumbent found so far), never with an error.
pub trait Cutoff {
    /// Returns true iff the resolution must stop now. `explored` is the
    /// number of nodes the search has expanded so far.
    fn must_stop(&self, explored: usize) -> bool;
}
