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

//! This example uses bab to sequence jobs on a single machine so as to
//! minimize the total weighted completion time.

use std::time::Duration;

use bab::*;
use clap::Parser;

use crate::io_utils::read_instance;
use crate::model::{Sequencing, WsptBound};

mod io_utils;
mod model;

/// This structure uses `clap-derive` annotations and define the arguments that can
/// be passed on to the executable solver.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to the instance file
    fname: String,
    /// The number of concurrent threads
    #[clap(short, long, default_value = "1")]
    threads: usize,
    /// The maximum amount of time (in seconds) you would like this solver to run
    #[clap(short, long)]
    duration: Option<u64>,
    /// The maximum number of nodes the search may expand
    #[clap(short, long)]
    nodes: Option<usize>,
    /// Explore the tree depth-first rather than best-bound-first
    #[clap(long)]
    depth_first: bool,
}

/// This is your executable's entry point. It is the place where all the pieces
/// are put together to create a fast an effective solver for the single
/// machine sequencing problem.
fn main() {
    env_logger::init();

    let args = Args::parse();
    let instance = read_instance(&args.fname).unwrap();
    let problem = Sequencing::new(instance);
    let oracle = WsptBound::new(&problem);

    let search_order = if args.depth_first {
        SearchOrder::DepthFirst
    } else {
        SearchOrder::BestBoundFirst
    };
    let config = SolverConfigBuilder::default()
        .search_order(search_order)
        .nb_workers(args.threads)
        .time_limit(args.duration.map(Duration::from_secs))
        .node_limit(args.nodes)
        .build()
        .unwrap();

    let outcome = solve(&problem, &oracle, &config).unwrap();

    let sequence: Vec<isize> = outcome
        .best_assignment
        .as_ref()
        .map(|a| a.decisions().map(|d| d.value).collect())
        .unwrap_or_default();
    let late = outcome
        .best_assignment
        .as_ref()
        .map(|a| nb_late_jobs(&problem, a))
        .unwrap_or_default();

    println!("Duration:   {:.3} seconds", outcome.statistics.elapsed.as_secs_f32());
    println!("Status:     {:?}", outcome.status);
    println!("Objective:  {}", outcome.best_value.unwrap_or(-1.0));
    println!("Explored:   {}", outcome.statistics.explored);
    println!("Pruned:     {}", outcome.statistics.pruned);
    println!("Peak open:  {}", outcome.statistics.peak_frontier);
    println!("Late jobs:  {late}");
    println!("Sequence:   {sequence:?}");
}

/// Counts the jobs completing after their due date (when one was given) in
/// the schedule described by the assignment.
fn nb_late_jobs(problem: &Sequencing, assignment: &Assignment) -> usize {
    let instance = &problem.instance;
    let mut clock = 0;
    let mut late = 0;
    for decision in (0..assignment.nb_variables())
        .filter_map(|pos| assignment.value_of(Variable(pos)))
    {
        let job = decision as usize;
        clock += instance.ptime[job];
        if instance.duedate[job].is_some_and(|due| clock > due) {
            late += 1;
        }
    }
    late
}
