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

//! This module provides the implementation of a sequential branch-and-bound
//! solver. That is a solver that will solve the problem using one single
//! thread of execution.
//!
//! This is the implementation you will want to use when reproducibility
//! matters more than raw speed, or when the instances at hand are small
//! enough that spawning workers is not worth the bother.

use std::time::Instant;

use crate::{
    Assignment, BoundOracle, BranchingStrategy, Cutoff, Frontier, Incumbent, Node, Outcome,
    Problem, Reason, Solver, SolverError, Statistics, Status, Variable,
};

/// The workload the driver gets from its frontier at each iteration
enum WorkLoad {
    /// There is no work left to be done: the proof is complete
    Complete,
    /// The work must stop because of an external cutoff
    Aborted,
    /// The item to process
    WorkItem { node: Node },
}

pub struct SequentialSolver<'a> {
    /// A reference to the problem being solved with branch-and-bound
    problem: &'a (dyn Problem),
    /// The oracle producing an admissible bound for each open node
    oracle: &'a (dyn BoundOracle),
    /// The strategy used to pick the variable a node is expanded on
    branching: &'a (dyn BranchingStrategy),
    /// A cutoff heuristic meant to decide when to stop the resolution of
    /// a given problem.
    cutoff: &'a (dyn Cutoff),

    /// This is the frontier: the set of nodes that must still be explored
    /// before the problem can be considered 'solved'.
    ///
    /// # Note:
    /// When this is a best-bound-first frontier, the bound of the first node
    /// being popped is a bound on the value reachable by exploring any of the
    /// nodes remaining on it. As a consequence, `best_bound()` is a genuine
    /// optimality certificate in that case.
    frontier: &'a mut (dyn Frontier),
    /// The best complete feasible solution found so far, if any.
    incumbent: Incumbent,
    /// When false, the bound test is skipped entirely and every feasible node
    /// gets expanded. The search degenerates into exhaustive enumeration;
    /// it must find the same optimum, only slower. Mostly useful for testing.
    pruning: bool,

    /// This is a counter that tracks the number of nodes that have effectively
    /// been explored. That is, the number of nodes that have been popped from
    /// the frontier and either accepted or branched on.
    explored: usize,
    /// The number of nodes discarded by the bound test.
    pruned: usize,
    /// The largest size the frontier ever reached.
    peak_frontier: usize,
    /// This is the value of the best dual bound observed at a pop so far.
    best_bound: f64,
    /// If we decide not to go through a complete proof of optimality, this is
    /// the reason why we took that decision.
    abort_proof: Option<Reason>,
}

impl<'a> SequentialSolver<'a> {
    pub fn new(
        problem: &'a (dyn Problem),
        oracle: &'a (dyn BoundOracle),
        branching: &'a (dyn BranchingStrategy),
        cutoff: &'a (dyn Cutoff),
        frontier: &'a mut (dyn Frontier),
    ) -> Self {
        SequentialSolver {
            problem,
            oracle,
            branching,
            cutoff,
            frontier,
            //
            incumbent: Incumbent::new(problem.optimization()),
            pruning: true,
            explored: 0,
            pruned: 0,
            peak_frontier: 0,
            best_bound: problem.optimization().unbounded(),
            abort_proof: None,
        }
    }
    /// Turns the bound test on or off (it is on by default).
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Rejects structurally malformed instances before any search effort is
    /// spent. A variable declared with an empty domain is a modeling error,
    /// not an empty feasible region.
    fn validate(&self) -> Result<(), SolverError> {
        for id in 0..self.problem.nb_variables() {
            if self.problem.domain_of(Variable(id)).is_empty() {
                return Err(SolverError::InvalidInput(format!(
                    "variable {id} was declared with an empty domain"
                )));
            }
        }
        Ok(())
    }

    /// Wraps an assignment into a node, after having checked that the bound
    /// the oracle computed for it is usable.
    fn bounded(&self, assignment: Assignment, depth: usize) -> Result<Node, SolverError> {
        let bound = self.oracle.bound(&assignment);
        if !bound.is_finite() {
            return Err(SolverError::NonFiniteBound { value: bound, depth, assignment });
        }
        Ok(Node { assignment, depth, bound })
    }

    /// This method initializes the problem resolution. Put more simply, this
    /// method posts the root node onto the frontier so that the processing
    /// can be bootstrapped. When the root itself is infeasible, nothing is
    /// posted and the resolution immediately concludes to infeasibility.
    fn initialize(&mut self) -> Result<(), SolverError> {
        let root = Assignment::new(self.problem.nb_variables());
        if self.problem.is_feasible(&root) {
            let root = self.bounded(root, 0)?;
            self.frontier.push(root);
            self.peak_frontier = self.peak_frontier.max(self.frontier.len());
        }
        Ok(())
    }

    /// Returns true iff the given bound can not possibly improve on the
    /// current incumbent, in which case the node it belongs to is dead.
    fn is_dead(&self, bound: f64) -> bool {
        if !self.pruning {
            return false;
        }
        self.incumbent
            .objective()
            .map_or(false, |best| !self.problem.optimization().is_better(bound, best))
    }

    /// This method processes the given `node`. Either the node is pruned
    /// right away (its bound was admissible when it got enqueued but the
    /// incumbent may have improved since), or it is a complete assignment
    /// that gets evaluated against the incumbent, or it is expanded into one
    /// child per feasible value of the branching variable.
    fn process_one_node(&mut self, node: Node) -> Result<(), SolverError> {
        if self.is_dead(node.bound) {
            self.pruned += 1;
            return Ok(());
        }
        self.explored += 1;

        if self.problem.is_complete(&node.assignment) {
            let objective = self.problem.objective(&node.assignment);
            self.incumbent.try_update(node.assignment, objective);
            return Ok(());
        }

        let variable = self
            .branching
            .select_variable(self.problem, &node.assignment)
            .ok_or(SolverError::NoBranchingVariable { depth: node.depth })?;

        let sense = self.problem.optimization();
        for decision in self.branching.branch(self.problem, &node.assignment, variable) {
            let child = node.assignment.extended(decision);
            if !self.problem.is_feasible(&child) {
                continue;
            }
            let mut child = self.bounded(child, node.depth + 1)?;
            child.bound = sense.tighten(node.bound, child.bound);
            if self.is_dead(child.bound) {
                self.pruned += 1;
                continue;
            }
            self.frontier.push(child);
        }
        self.peak_frontier = self.peak_frontier.max(self.frontier.len());
        Ok(())
    }

    fn abort_search(&mut self, reason: Reason) {
        log::debug!("search aborted after {} nodes", self.explored);
        self.abort_proof = Some(reason);
        self.frontier.clear();
    }

    /// Consults the frontier to fetch a workload. Depending on the current
    /// state, the workload can either be:
    ///
    ///   + Aborted, when the cutoff fired and the proof must be given up
    ///   + Complete, when the problem is solved and the loop should stop
    ///   + WorkItem, when a node was successfully obtained for processing
    fn get_workload(&mut self) -> WorkLoad {
        if self.cutoff.must_stop(self.explored) {
            self.abort_search(Reason::CutoffOccurred);
            return WorkLoad::Aborted;
        }
        match self.frontier.pop() {
            None => WorkLoad::Complete,
            Some(node) => {
                self.best_bound = node.bound;
                WorkLoad::WorkItem { node }
            }
        }
    }

    fn outcome(&self, elapsed: std::time::Duration) -> Outcome {
        let best = self.incumbent.best();
        let status = if self.abort_proof.is_some() {
            Status::Unproven
        } else if best.is_some() {
            Status::Optimal
        } else {
            Status::Infeasible
        };
        let (best_assignment, best_value) = match best {
            Some((assignment, value)) => (Some(assignment), Some(value)),
            None => (None, None),
        };
        Outcome {
            status,
            best_value,
            best_assignment,
            statistics: Statistics {
                explored: self.explored,
                pruned: self.pruned,
                peak_frontier: self.peak_frontier,
                elapsed,
            },
        }
    }
}

impl Solver for SequentialSolver<'_> {
    /// Runs the branch-and-bound algorithm to solve the problem to proven
    /// optimality. The driver continually pops the next open node off the
    /// frontier and processes it, until either the frontier runs dry (the
    /// proof is complete) or the cutoff fires.
    fn solve(&mut self) -> Result<Outcome, SolverError> {
        let start = Instant::now();
        self.validate()?;
        self.initialize()?;

        loop {
            match self.get_workload() {
                WorkLoad::Complete => break,
                WorkLoad::Aborted => break,
                WorkLoad::WorkItem { node } => self.process_one_node(node)?,
            }
        }

        // when the proof ran to completion, the dual bound collapses onto
        // the incumbent value
        if self.abort_proof.is_none() {
            if let Some(value) = self.incumbent.objective() {
                self.best_bound = value;
            }
        }
        Ok(self.outcome(start.elapsed()))
    }

    /// Returns the value of the best solution that has been identified for
    /// this problem.
    fn best_value(&self) -> Option<f64> {
        self.incumbent.objective()
    }
    /// Returns the best solution that has been identified for this problem.
    fn best_assignment(&self) -> Option<Assignment> {
        self.incumbent.best().map(|(assignment, _)| assignment)
    }
    /// Returns the value of the best dual bound that has been identified for
    /// this problem.
    fn best_bound(&self) -> f64 {
        self.best_bound
    }
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, assignment: Assignment, value: f64) {
        self.incumbent.try_update(assignment, value);
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_sequential_solver {
    use crate::*;

    /// A tiny 0-1 knapsack instance. The optimum packs items 0 and 1 for a
    /// total weight of 5 and a total value of 7.
    struct Knapsack {
        capacity: isize,
        weight: Vec<isize>,
        value: Vec<isize>,
    }
    impl Knapsack {
        fn default_instance() -> Self {
            Knapsack { capacity: 5, weight: vec![2, 3, 4], value: vec![3, 4, 5] }
        }
        fn load(&self, assignment: &Assignment) -> isize {
            assignment
                .decisions()
                .map(|d| d.value * self.weight[d.variable.id()])
                .sum()
        }
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
            self.load(assignment) <= self.capacity
        }
        fn objective(&self, assignment: &Assignment) -> f64 {
            assignment
                .decisions()
                .map(|d| d.value * self.value[d.variable.id()])
                .sum::<isize>() as f64
        }
    }
    /// An admissible (if naive) oracle: the value packed so far plus the
    /// value of every item not decided yet, capacity notwithstanding.
    struct KnapsackBound<'a>(&'a Knapsack);
    impl BoundOracle for KnapsackBound<'_> {
        fn bound(&self, assignment: &Assignment) -> f64 {
            let packed = self.0.objective(assignment);
            let open: isize = assignment
                .open_variables()
                .map(|var| self.0.value[var.id()])
                .sum();
            packed + open as f64
        }
    }

    /// Single machine weighted completion time scheduling: variable i is the
    /// job placed in position i, feasibility is all-different. With
    /// processing times [3, 2, 1] and weights [1, 2, 3] the optimum is the
    /// sequence (2, 1, 0) for a cost of 3*1 + 2*3 + 1*6 = 15.
    struct Sequencing {
        ptime: Vec<isize>,
        weight: Vec<isize>,
        jobs: Vec<isize>,
    }
    impl Sequencing {
        fn default_instance() -> Self {
            Sequencing { ptime: vec![3, 2, 1], weight: vec![1, 2, 3], jobs: vec![0, 1, 2] }
        }
        /// The weighted completion cost of the contiguous scheduled prefix.
        fn prefix_cost(&self, assignment: &Assignment) -> f64 {
            let mut clock = 0;
            let mut cost = 0;
            for pos in 0..assignment.nb_variables() {
                match assignment.value_of(Variable(pos)) {
                    Some(job) => {
                        clock += self.ptime[job as usize];
                        cost += self.weight[job as usize] * clock;
                    }
                    None => break,
                }
            }
            cost as f64
        }
    }
    impl Problem for Sequencing {
        fn nb_variables(&self) -> usize {
            self.ptime.len()
        }
        fn optimization(&self) -> Optimization {
            Optimization::Minimize
        }
        fn domain_of(&self, _var: Variable) -> &[isize] {
            &self.jobs
        }
        fn is_feasible(&self, assignment: &Assignment) -> bool {
            let scheduled: Vec<_> = assignment.decisions().map(|d| d.value).collect();
            scheduled.iter().enumerate().all(|(i, job)| !scheduled[..i].contains(job))
        }
        fn objective(&self, assignment: &Assignment) -> f64 {
            self.prefix_cost(assignment)
        }
    }
    /// The cost already incurred by the scheduled prefix is a valid lower
    /// bound since every remaining term of the objective is nonnegative.
    struct PrefixBound<'a>(&'a Sequencing);
    impl BoundOracle for PrefixBound<'_> {
        fn bound(&self, assignment: &Assignment) -> f64 {
            self.0.prefix_cost(assignment)
        }
    }

    /// The root is fine but no decision can ever be made: the feasible
    /// region is empty even though the model is well formed.
    struct NoWay;
    impl Problem for NoWay {
        fn nb_variables(&self) -> usize {
            2
        }
        fn optimization(&self) -> Optimization {
            Optimization::Minimize
        }
        fn domain_of(&self, _var: Variable) -> &[isize] {
            &[0, 1]
        }
        fn is_feasible(&self, assignment: &Assignment) -> bool {
            assignment.nb_decided() == 0
        }
        fn objective(&self, _assignment: &Assignment) -> f64 {
            0.0
        }
    }

    /// A structurally broken model: variable 1 has no candidate value at all.
    struct Broken;
    impl Problem for Broken {
        fn nb_variables(&self) -> usize {
            2
        }
        fn optimization(&self) -> Optimization {
            Optimization::Minimize
        }
        fn domain_of(&self, var: Variable) -> &[isize] {
            if var.id() == 0 {
                &[0, 1]
            } else {
                &[]
            }
        }
        fn is_feasible(&self, _assignment: &Assignment) -> bool {
            true
        }
        fn objective(&self, _assignment: &Assignment) -> f64 {
            0.0
        }
    }

    fn solve_knapsack(pruning: bool) -> Outcome {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier)
                .with_pruning(pruning);
        solver.solve().unwrap()
    }

    #[test]
    fn it_proves_the_knapsack_optimum() {
        let outcome = solve_knapsack(true);
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);

        let best = outcome.best_assignment.unwrap();
        assert_eq!(Some(1), best.value_of(Variable(0)));
        assert_eq!(Some(1), best.value_of(Variable(1)));
        assert_eq!(Some(0), best.value_of(Variable(2)));
    }
    #[test]
    fn disabling_pruning_yields_the_same_optimum_with_more_effort() {
        let with = solve_knapsack(true);
        let without = solve_knapsack(false);
        assert_eq!(with.best_value, without.best_value);
        assert_eq!(0, without.statistics.pruned);
        assert!(with.statistics.explored <= without.statistics.explored);
    }
    #[test]
    fn two_runs_of_the_same_instance_are_identical() {
        let a = solve_knapsack(true);
        let b = solve_knapsack(true);
        assert_eq!(a.status, b.status);
        assert_eq!(a.best_value, b.best_value);
        assert_eq!(a.best_assignment, b.best_assignment);
        assert_eq!(a.statistics.explored, b.statistics.explored);
        assert_eq!(a.statistics.pruned, b.statistics.pruned);
        assert_eq!(a.statistics.peak_frontier, b.statistics.peak_frontier);
    }
    #[test]
    fn the_knapsack_optimum_matches_brute_force() {
        let problem = Knapsack::default_instance();
        let mut best = f64::MIN;
        for mask in 0..8_usize {
            let mut asgn = Assignment::new(3);
            for item in 0..3 {
                let value = ((mask >> item) & 1) as isize;
                asgn.decide(Decision { variable: Variable(item), value });
            }
            if problem.is_feasible(&asgn) {
                best = best.max(problem.objective(&asgn));
            }
        }
        assert_eq!(Some(best), solve_knapsack(true).best_value);
    }
    #[test]
    fn it_proves_the_scheduling_optimum() {
        let problem = Sequencing::default_instance();
        let oracle = PrefixBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        let outcome = solver.solve().unwrap();

        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(15.0), outcome.best_value);

        let best = outcome.best_assignment.unwrap();
        assert_eq!(Some(2), best.value_of(Variable(0)));
        assert_eq!(Some(1), best.value_of(Variable(1)));
        assert_eq!(Some(0), best.value_of(Variable(2)));
    }
    #[test]
    fn a_depth_first_run_finds_the_same_optimum() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = DepthFirstFrontier::new();
        let mut solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        let outcome = solver.solve().unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);
    }
    #[test]
    fn an_empty_feasible_region_is_reported_infeasible() {
        let problem = NoWay;
        let oracle = TrivialBound(problem.optimization());
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        let outcome = solver.solve().unwrap();

        assert_eq!(Status::Infeasible, outcome.status);
        assert_eq!(None, outcome.best_value);
        assert_eq!(None, outcome.best_assignment);
    }
    #[test]
    fn an_empty_domain_is_a_hard_error() {
        let problem = Broken;
        let oracle = TrivialBound(problem.optimization());
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        assert!(matches!(solver.solve(), Err(SolverError::InvalidInput(_))));
    }
    #[test]
    fn a_non_finite_bound_is_a_hard_error() {
        struct LyingOracle;
        impl BoundOracle for LyingOracle {
            fn bound(&self, _assignment: &Assignment) -> f64 {
                f64::NAN
            }
        }
        let problem = Knapsack::default_instance();
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = SequentialSolver::new(
            &problem,
            &LyingOracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
        );
        assert!(matches!(solver.solve(), Err(SolverError::NonFiniteBound { .. })));
    }
    #[test]
    fn a_spent_node_budget_leaves_the_proof_unproven() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = SequentialSolver::new(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NodeBudget(1),
            &mut frontier,
        );
        let outcome = solver.solve().unwrap();
        assert_eq!(Status::Unproven, outcome.status);
        assert!(outcome.statistics.explored <= 1);
    }
    #[test]
    fn seeding_a_primal_bound_shrinks_the_search() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);

        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut seeded =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        let mut optimal = Assignment::new(3);
        optimal.decide(Decision { variable: Variable(0), value: 1 });
        optimal.decide(Decision { variable: Variable(1), value: 1 });
        optimal.decide(Decision { variable: Variable(2), value: 0 });
        seeded.set_primal(optimal, 7.0);
        let seeded = seeded.solve().unwrap();

        let unseeded = solve_knapsack(true);
        assert_eq!(seeded.best_value, unseeded.best_value);
        assert!(seeded.statistics.explored <= unseeded.statistics.explored);
    }
    #[test]
    fn the_gap_is_zero_once_optimality_is_proved() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        solver.solve().unwrap();
        assert_eq!(0.0, solver.gap());
        assert_eq!(7.0, solver.best_bound());
    }
    #[test]
    fn the_gap_is_one_before_anything_is_known() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let solver =
            SequentialSolver::new(&problem, &oracle, &FirstUnassigned, &NoCutoff, &mut frontier);
        assert_eq!(1.0, solver.gap());
    }
    #[test]
    fn the_test_oracle_is_admissible_on_every_prefix() {
        // enumerate every prefix assignment and check that the oracle bound
        // dominates the value of every feasible completion of that prefix
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);

        for depth in 0..3_usize {
            for prefix_mask in 0..(1 << depth) {
                let mut prefix = Assignment::new(3);
                for item in 0..depth {
                    let value = ((prefix_mask >> item) & 1) as isize;
                    prefix.decide(Decision { variable: Variable(item), value });
                }
                if !problem.is_feasible(&prefix) {
                    continue;
                }
                let bound = oracle.bound(&prefix);
                for rest_mask in 0..(1_usize << (3 - depth)) {
                    let mut full = prefix.clone();
                    for (i, item) in (depth..3).enumerate() {
                        let value = ((rest_mask >> i) & 1) as isize;
                        full.decide(Decision { variable: Variable(item), value });
                    }
                    if problem.is_feasible(&full) {
                        assert!(bound >= problem.objective(&full));
                    }
                }
            }
        }
    }
}
