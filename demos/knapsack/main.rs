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

//! This example uses bab to solve the binary knapsack problem. The bound
//! oracle is the usual fractional relaxation: fill the leftover capacity
//! greedily with the most profitable open items, splitting the last one.
//!
//! The expected instance format is a first line `n capacity` followed by
//! one `profit weight` line per item.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    num::ParseIntError,
    path::Path,
    time::Duration,
};

use bab::*;
use clap::Parser;

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
}

struct Knapsack {
    capacity: isize,
    profit: Vec<isize>,
    weight: Vec<isize>,
}
impl Knapsack {
    fn load(&self, assignment: &Assignment) -> isize {
        assignment
            .decisions()
            .map(|d| d.value * self.weight[d.variable.id()])
            .sum()
    }
}
impl Problem for Knapsack {
    fn nb_variables(&self) -> usize {
        self.profit.len()
    }
    fn optimization(&self) -> Optimization {
        Optimization::Maximize
    }
    fn domain_of(&self, _var: Variable) -> &[isize] {
        &[1, 0]
    }
    fn is_feasible(&self, assignment: &Assignment) -> bool {
        self.load(assignment) <= self.capacity
    }
    fn objective(&self, assignment: &Assignment) -> f64 {
        assignment
            .decisions()
            .map(|d| d.value * self.profit[d.variable.id()])
            .sum::<isize>() as f64
    }
}

/// The fractional relaxation of the knapsack: open items are considered in
/// decreasing profit density order and the last one to fit may be split.
/// Allowing fractional items can only increase the packable profit, hence
/// the bound is admissible.
struct FractionalBound<'a> {
    problem: &'a Knapsack,
    /// item ids sorted by decreasing profit/weight ratio
    by_density: Vec<usize>,
}
impl<'a> FractionalBound<'a> {
    fn new(problem: &'a Knapsack) -> Self {
        let mut by_density: Vec<usize> = (0..problem.nb_variables()).collect();
        by_density.sort_by(|&a, &b| {
            let da = problem.profit[a] as f64 / problem.weight[a] as f64;
            let db = problem.profit[b] as f64 / problem.weight[b] as f64;
            db.total_cmp(&da)
        });
        FractionalBound { problem, by_density }
    }
}
impl BoundOracle for FractionalBound<'_> {
    fn bound(&self, assignment: &Assignment) -> f64 {
        let mut bound = self.problem.objective(assignment);
        let mut room = self.problem.capacity - self.problem.load(assignment);

        for &item in &self.by_density {
            if !assignment.is_open(Variable(item)) {
                continue;
            }
            let weight = self.problem.weight[item];
            if weight <= room {
                room -= weight;
                bound += self.problem.profit[item] as f64;
            } else {
                if room > 0 {
                    bound += self.problem.profit[item] as f64 * room as f64 / weight as f64;
                }
                break;
            }
        }
        bound
    }
}

/// This enumeration simply groups the kind of errors that might occur when
/// parsing a knapsack instance from file.
#[derive(Debug, thiserror::Error)]
enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The parser expected to read something that was an integer but got some garbage
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// The file was not properly formatted.
    #[error("ill formed instance")]
    Format,
}

fn read_instance<P: AsRef<Path>>(fname: P) -> Result<Knapsack, Error> {
    let f = File::open(fname)?;
    let f = BufReader::new(f);

    let mut capacity = 0;
    let mut profit = vec![];
    let mut weight = vec![];

    let mut first = true;
    for line in f.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let mut data = line.split_ascii_whitespace();
        if first {
            let _n: usize = data.next().ok_or(Error::Format)?.parse()?;
            capacity = data.next().ok_or(Error::Format)?.parse()?;
            first = false;
        } else {
            profit.push(data.next().ok_or(Error::Format)?.parse()?);
            weight.push(data.next().ok_or(Error::Format)?.parse()?);
        }
    }

    Ok(Knapsack { capacity, profit, weight })
}

/// This is your executable's entry point. It is the place where all the pieces
/// are put together to create a fast an effective solver for the knapsack
/// problem.
fn main() {
    env_logger::init();

    let args = Args::parse();
    let problem = read_instance(&args.fname).unwrap();
    let oracle = FractionalBound::new(&problem);

    let config = SolverConfigBuilder::default()
        .nb_workers(args.threads)
        .time_limit(args.duration.map(Duration::from_secs))
        .node_limit(args.nodes)
        .build()
        .unwrap();

    let outcome = solve(&problem, &oracle, &config).unwrap();

    let packed: Vec<usize> = outcome
        .best_assignment
        .as_ref()
        .map(|a| a.decisions().filter(|d| d.value == 1).map(|d| d.variable.id()).collect())
        .unwrap_or_default();

    println!("Duration:   {:.3} seconds", outcome.statistics.elapsed.as_secs_f32());
    println!("Status:     {:?}", outcome.status);
    println!("Objective:  {}", outcome.best_value.unwrap_or(-1.0));
    println!("Explored:   {}", outcome.statistics.explored);
    println!("Pruned:     {}", outcome.statistics.pruned);
    println!("Peak open:  {}", outcome.statistics.peak_frontier);
    println!("Packed:     {packed:?}");
}
