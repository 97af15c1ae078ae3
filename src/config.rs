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

//! This module provides the one-stop-shop configuration of a resolution: it
//! bundles the search order, branching rule, resource limits and degree of
//! parallelism into a single structure, and it wires the corresponding
//! concrete frontier, strategy, cutoff and driver together.

use std::time::Duration;

use derive_builder::Builder;

use crate::{
    AnyCutoff, BestBoundFrontier, BoundOracle, BranchingStrategy, Cutoff, DepthFirstFrontier,
    FirstUnassigned, Frontier, MostConstrained, NoCutoff, NodeBudget, Outcome, ParallelSolver,
    Problem, SequentialSolver, Solver, SolverError, TimeBudget,
};

/// The policy ordering the exploration of the open nodes.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum SearchOrder {
    /// Always expand the open node with the most promising bound. This is
    /// the default: it minimizes the number of nodes that must be expanded
    /// to complete the optimality proof.
    #[default]
    BestBoundFirst,
    /// Always expand the most recently created node. This trades proof
    /// effort for a frontier whose size stays linear in the tree depth.
    DepthFirst,
}

/// The rule used to pick the variable a node is expanded on.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum BranchingRule {
    /// Fork on the first open variable in declaration order (the default).
    #[default]
    FirstUnassigned,
    /// Fork on the open variable with the fewest remaining feasible values.
    MostConstrained,
}

/// This is how you configure a resolution, e.g. if you want the search to be
/// depth-first, to give up after one million nodes, or to run on all cores.
#[derive(Debug, Clone, Builder)]
pub struct SolverConfig {
    /// The order in which the open nodes are explored.
    #[builder(default)]
    pub search_order: SearchOrder,
    /// The rule used to pick the branching variable.
    #[builder(default)]
    pub branching: BranchingRule,
    /// The maximum number of nodes the search may expand, if any.
    #[builder(default)]
    pub node_limit: Option<usize>,
    /// The wall clock budget of the search, if any.
    #[builder(default)]
    pub time_limit: Option<Duration>,
    /// The number of worker threads. The sequential driver is used when this
    /// is one; anything above spawns that many workers.
    #[builder(default = "1")]
    pub nb_workers: usize,
    /// Whether the bound test is applied (it is, unless you are debugging a
    /// suspicious oracle).
    #[builder(default = "true")]
    pub pruning: bool,
}
impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            search_order: SearchOrder::default(),
            branching: BranchingRule::default(),
            node_limit: None,
            time_limit: None,
            nb_workers: 1,
            pruning: true,
        }
    }
}
impl SolverConfig {
    fn branching(&self) -> Box<dyn BranchingStrategy + Send + Sync> {
        match self.branching {
            BranchingRule::FirstUnassigned => Box::new(FirstUnassigned),
            BranchingRule::MostConstrained => Box::new(MostConstrained),
        }
    }
    fn cutoff(&self) -> Box<dyn Cutoff + Send + Sync> {
        let mut cutoffs: Vec<Box<dyn Cutoff + Send + Sync>> = vec![];
        if let Some(nodes) = self.node_limit {
            cutoffs.push(Box::new(NodeBudget(nodes)));
        }
        if let Some(time) = self.time_limit {
            cutoffs.push(Box::new(TimeBudget::new(time)));
        }
        match cutoffs.len() {
            0 => Box::new(NoCutoff),
            1 => cutoffs.pop().unwrap_or_else(|| Box::new(NoCutoff)),
            _ => Box::new(AnyCutoff::new(cutoffs)),
        }
    }
    fn frontier(&self, problem: &dyn Problem) -> Box<dyn Frontier + Send> {
        match self.search_order {
            SearchOrder::BestBoundFirst => Box::new(BestBoundFrontier::new(problem.optimization())),
            SearchOrder::DepthFirst => Box::new(DepthFirstFrontier::new()),
        }
    }
}

/// Solves the given problem with the given oracle, according to the supplied
/// configuration. This is the highest level entry point of the library: it
/// instantiates the concrete frontier, branching strategy, cutoff and driver
/// matching the configuration and runs the resolution to its end.
pub fn solve(
    problem: &(dyn Problem + Send + Sync),
    oracle: &(dyn BoundOracle + Send + Sync),
    config: &SolverConfig,
) -> Result<Outcome, SolverError> {
    let branching = config.branching();
    let cutoff = config.cutoff();
    let mut frontier = config.frontier(problem);

    if config.nb_workers <= 1 {
        let mut solver = SequentialSolver::new(
            problem,
            oracle,
            branching.as_ref(),
            cutoff.as_ref(),
            frontier.as_mut(),
        )
        .with_pruning(config.pruning);
        solver.solve()
    } else {
        let mut solver = ParallelSolver::custom(
            problem,
            oracle,
            branching.as_ref(),
            cutoff.as_ref(),
            frontier.as_mut(),
            config.nb_workers,
        )
        .with_pruning(config.pruning);
        solver.solve()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_config {
    use super::*;
    use crate::*;

    struct Knapsack {
        capacity: isize,
        weight: Vec<isize>,
        value: Vec<isize>,
    }
    impl Problem for Knapsack {
        fn nb_variables(&self) -> usize {
            self.weight.len()
        }
        fn optimization(&self) -> Optimization {
            Optimization::Maximize
        }
        fn domain_of(&self, _var: Variable) -> &[isize] {
            &[1, 0]
        }
        fn is_feasible(&self, assignment: &Assignment) -> bool {
            let load: isize = assignment
                .decisions()
                .map(|d| d.value * self.weight[d.variable.id()])
                .sum();
            load <= self.capacity
        }
        fn objective(&self, assignment: &Assignment) -> f64 {
            assignment
                .decisions()
                .map(|d| d.value * self.value[d.variable.id()])
                .sum::<isize>() as f64
        }
    }

    fn instance() -> Knapsack {
        Knapsack { capacity: 5, weight: vec![2, 3, 4], value: vec![3, 4, 5] }
    }

    #[test]
    fn the_default_configuration_is_sequential_best_bound_first() {
        let config = SolverConfig::default();
        assert_eq!(SearchOrder::BestBoundFirst, config.search_order);
        assert_eq!(BranchingRule::FirstUnassigned, config.branching);
        assert_eq!(None, config.node_limit);
        assert_eq!(None, config.time_limit);
        assert_eq!(1, config.nb_workers);
        assert!(config.pruning);
    }
    #[test]
    fn the_builder_defaults_match_the_default_configuration() {
        let built = SolverConfigBuilder::default().build().unwrap();
        let config = SolverConfig::default();
        assert_eq!(config.search_order, built.search_order);
        assert_eq!(config.branching, built.branching);
        assert_eq!(config.nb_workers, built.nb_workers);
        assert_eq!(config.pruning, built.pruning);
    }
    #[test]
    fn the_default_configuration_solves_to_optimality() {
        let problem = instance();
        let oracle = TrivialBound(problem.optimization());
        let outcome = solve(&problem, &oracle, &SolverConfig::default()).unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);
    }
    #[test]
    fn every_order_and_rule_combination_agrees_on_the_optimum() {
        let problem = instance();
        let oracle = TrivialBound(problem.optimization());
        for search_order in [SearchOrder::BestBoundFirst, SearchOrder::DepthFirst] {
            for branching in [BranchingRule::FirstUnassigned, BranchingRule::MostConstrained] {
                let config = SolverConfigBuilder::default()
                    .search_order(search_order)
                    .branching(branching)
                    .build()
                    .unwrap();
                let outcome = solve(&problem, &oracle, &config).unwrap();
                assert_eq!(Some(7.0), outcome.best_value);
            }
        }
    }
    #[test]
    fn a_parallel_configuration_finds_the_same_optimum() {
        let problem = instance();
        let oracle = TrivialBound(problem.optimization());
        let config = SolverConfigBuilder::default().nb_workers(4).build().unwrap();
        let outcome = solve(&problem, &oracle, &config).unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);
    }
    #[test]
    fn a_node_limit_makes_the_proof_unproven() {
        let problem = instance();
        let oracle = TrivialBound(problem.optimization());
        let config = SolverConfigBuilder::default().node_limit(Some(1)).build().unwrap();
        let outcome = solve(&problem, &oracle, &config).unwrap();
        assert_eq!(Status::Unproven, outcome.status);
    }
    #[test]
    fn a_generous_time_limit_does_not_get_in_the_way() {
        let problem = instance();
        let oracle = TrivialBound(problem.optimization());
        let config = SolverConfigBuilder::default()
            .time_limit(Some(Duration::from_secs(60)))
            .build()
            .unwrap();
        let outcome = solve(&problem, &oracle, &config).unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);
    }
}
