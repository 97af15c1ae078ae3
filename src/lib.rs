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

//! # BAB
//! BAB is a truly generic framework to develop exact branch-and-bound
//! combinatorial optimization solvers in Rust. Its goal is to let you
//! describe your optimization problem in terms of decision variables with
//! explicit finite domains (see `Problem`) along with a `BoundOracle`: a
//! function computing, for any partial assignment, a bound that no complete
//! feasible extension of it can beat. In that setup, the sole condition to
//! ensure the correctness of the optimization algorithm is that the oracle
//! never under-promises: as long as the bound is admissible, the solver may
//! prune aggressively and the solution it returns is still provably optimal.
//!
//! ## Side benefit
//! As a side benefit from using `bab`, you will be able to exploit all of
//! your hardware to solve your optimization problems in parallel.
//!
//! ## Quick Example
//! The following presents a minimalistic use of bab. It implements a solver
//! for the binary knapsack problem. This example is shown for illustration
//! purpose because it is pretty simple and chances are high anybody is
//! already comfortable with the problem definition.
//!
//! #### Note:
//! The `demos` folder of our repository contains other complete examples
//! (among which a weighted completion time scheduling solver). So please
//! consider checking them out for further details.
//!
//! ```
//! use bab::*;
//!
//! struct Knapsack {
//!     capacity: isize,
//!     weight: Vec<isize>,
//!     value: Vec<isize>,
//! }
//! impl Problem for Knapsack {
//!     fn nb_variables(&self) -> usize {
//!         self.weight.len()
//!     }
//!     fn optimization(&self) -> Optimization {
//!         Optimization::Maximize
//!     }
//!     fn domain_of(&self, _var: Variable) -> &[isize] {
//!         &[1, 0]
//!     }
//!     fn is_feasible(&self, assignment: &Assignment) -> bool {
//!         let load: isize = assignment.decisions()
//!             .map(|d| d.value * self.weight[d.variable.id()])
//!             .sum();
//!         load <= self.capacity
//!     }
//!     fn objective(&self, assignment: &Assignment) -> f64 {
//!         assignment.decisions()
//!             .map(|d| d.value * self.value[d.variable.id()])
//!             .sum::<isize>() as f64
//!     }
//! }
//!
//! /// The value packed so far plus the value of everything still open: an
//! /// obviously admissible (if crude) upper bound.
//! struct KnapsackBound<'a>(&'a Knapsack);
//! impl BoundOracle for KnapsackBound<'_> {
//!     fn bound(&self, assignment: &Assignment) -> f64 {
//!         let packed = self.0.objective(assignment);
//!         let open: isize = assignment.open_variables()
//!             .map(|var| self.0.value[var.id()])
//!             .sum();
//!         packed + open as f64
//!     }
//! }
//!
//! let problem = Knapsack {
//!     capacity: 5,
//!     weight: vec![2, 3, 4],
//!     value: vec![3, 4, 5],
//! };
//! let oracle = KnapsackBound(&problem);
//!
//! let outcome = solve(&problem, &oracle, &SolverConfig::default()).unwrap();
//! assert_eq!(Status::Optimal, outcome.status);
//! assert_eq!(Some(7.0), outcome.best_value);
//! ```
mod abstraction;
mod common;
mod config;
mod error;
mod implementation;

pub use abstraction::*;
pub use common::*;
pub use config::*;
pub use error::*;
pub use implementation::*;
