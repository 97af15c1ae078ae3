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

//! This module provides the implementation of a parallel branch-and-bound
//! solver. That is a solver that will solve the problem using as many threads
//! as requested. By default, it uses as many threads as the number of
//! hardware threads available on the machine.

use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::{
    Assignment, BoundOracle, BranchingStrategy, Cutoff, Frontier, Incumbent, Node, Outcome,
    Problem, Reason, Solver, SolverError, Statistics, Status, Variable,
};

/// The shared data that may only be manipulated within critical sections
struct Critical<'a> {
    /// This is the frontier: the set of nodes that must still be explored
    /// before the problem can be considered 'solved'.
    frontier: &'a mut (dyn Frontier + Send),
    /// This is the number of nodes that are currently being explored.
    ///
    /// # Note
    /// This information may seem innocuous/superfluous, whereas in fact it is
    /// very important. Indeed, this is the piece of information that lets us
    /// distinguish between a node-starvation and the completion of the problem
    /// resolution. The bottom line is, this counter needs to be carefully
    /// managed to guarantee the termination of all threads.
    ongoing: usize,
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
    /// The first hard error a worker ran into, if any. Once this is set the
    /// whole resolution is doomed and every thread winds down.
    failure: Option<SolverError>,
}

/// The state which is shared among the many running threads: it provides an
/// access to the critical data (protected by a mutex) as well as a monitor
/// (condvar) to park threads in case of node-starvation.
struct Shared<'a> {
    /// A reference to the problem being solved with branch-and-bound
    problem: &'a (dyn Problem + Send + Sync),
    /// The oracle producing an admissible bound for each open node
    oracle: &'a (dyn BoundOracle + Send + Sync),
    /// The strategy used to pick the variable a node is expanded on
    branching: &'a (dyn BranchingStrategy + Send + Sync),
    /// A cutoff heuristic meant to decide when to stop the resolution of
    /// a given problem.
    cutoff: &'a (dyn Cutoff + Send + Sync),
    /// The best complete feasible solution found so far, if any. It has its
    /// own internal synchronization so it is deliberately kept out of the
    /// critical section: improvements never need to contend with the
    /// frontier lock.
    incumbent: Incumbent,
    /// When false, the bound test is skipped entirely and every feasible
    /// node gets expanded.
    pruning: bool,

    /// This is the shared state data which can only be accessed within critical
    /// sections. Therefore, it is protected by a mutex which prevents concurrent
    /// reads/writes.
    critical: Mutex<Critical<'a>>,
    /// This is the monitor on which threads must wait when facing an empty
    /// frontier. The corollary, is that whenever a thread has completed the
    /// processing of a node, it must wake up all parked threads waiting on
    /// this monitor.
    monitor: Condvar,
}

/// The workload a thread can get from the shared state
enum WorkLoad {
    /// There is no work left to be done: you can safely terminate
    Complete,
    /// The work must stop because of an external cutoff or a hard failure
    Aborted,
    /// There is nothing you can do right now. Check again when you wake up
    Starvation,
    /// The item to process
    WorkItem { node: Node },
}

/// This is the structure implementing a multi-threaded branch-and-bound
/// solver. Nodes are moved (never shared) between the frontier and the worker
/// that expands them; children are computed outside of the critical section
/// so that the lock only ever protects frontier and counter manipulations.
pub struct ParallelSolver<'a> {
    /// This is the shared state. Each thread is going to take a reference to it.
    shared: Shared<'a>,
    /// This is a configuration parameter that tunes the number of threads that
    /// will be spawned to solve the problem. By default, this number amounts
    /// to the number of hardware threads available on the machine.
    nb_threads: usize,
}

impl<'a> ParallelSolver<'a> {
    pub fn new(
        problem: &'a (dyn Problem + Send + Sync),
        oracle: &'a (dyn BoundOracle + Send + Sync),
        branching: &'a (dyn BranchingStrategy + Send + Sync),
        cutoff: &'a (dyn Cutoff + Send + Sync),
        frontier: &'a mut (dyn Frontier + Send),
    ) -> Self {
        Self::custom(problem, oracle, branching, cutoff, frontier, num_cpus::get())
    }
    pub fn custom(
        problem: &'a (dyn Problem + Send + Sync),
        oracle: &'a (dyn BoundOracle + Send + Sync),
        branching: &'a (dyn BranchingStrategy + Send + Sync),
        cutoff: &'a (dyn Cutoff + Send + Sync),
        frontier: &'a mut (dyn Frontier + Send),
        nb_threads: usize,
    ) -> Self {
        ParallelSolver {
            shared: Shared {
                problem,
                oracle,
                branching,
                cutoff,
                incumbent: Incumbent::new(problem.optimization()),
                pruning: true,
                //
                monitor: Condvar::new(),
                critical: Mutex::new(Critical {
                    frontier,
                    ongoing: 0,
                    explored: 0,
                    pruned: 0,
                    peak_frontier: 0,
                    best_bound: problem.optimization().unbounded(),
                    abort_proof: None,
                    failure: None,
                }),
            },
            nb_threads,
        }
    }
    /// Sets the number of threads used by the solver
    pub fn with_nb_threads(mut self, nb_threads: usize) -> Self {
        self.nb_threads = nb_threads;
        self
    }
    /// Turns the bound test on or off (it is on by default).
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.shared.pruning = pruning;
        self
    }

    /// Rejects structurally malformed instances before any search effort is
    /// spent. A variable declared with an empty domain is a modeling error,
    /// not an empty feasible region.
    fn validate(&self) -> Result<(), SolverError> {
        for id in 0..self.shared.problem.nb_variables() {
            if self.shared.problem.domain_of(Variable(id)).is_empty() {
                return Err(SolverError::InvalidInput(format!(
                    "variable {id} was declared with an empty domain"
                )));
            }
        }
        Ok(())
    }

    /// This method initializes the problem resolution. Put more simply, this
    /// method posts the root node onto the frontier so that a thread can pick
    /// it up and the processing can be bootstrapped. When the root itself is
    /// infeasible, nothing is posted and the resolution immediately concludes
    /// to infeasibility.
    fn initialize(&mut self) -> Result<(), SolverError> {
        let root = Assignment::new(self.shared.problem.nb_variables());
        if self.shared.problem.is_feasible(&root) {
            let root = Self::bounded(&self.shared, root, 0)?;
            let mut critical = self.shared.critical.lock();
            critical.frontier.push(root);
            critical.peak_frontier = critical.peak_frontier.max(critical.frontier.len());
        }
        Ok(())
    }

    /// Wraps an assignment into a node, after having checked that the bound
    /// the oracle computed for it is usable.
    fn bounded(shared: &Shared<'a>, assignment: Assignment, depth: usize) -> Result<Node, SolverError> {
        let bound = shared.oracle.bound(&assignment);
        if !bound.is_finite() {
            return Err(SolverError::NonFiniteBound { value: bound, depth, assignment });
        }
        Ok(Node { assignment, depth, bound })
    }

    /// Returns true iff the given bound can not possibly improve on the
    /// current incumbent, in which case the node it belongs to is dead.
    /// The incumbent only ever improves, so a node found dead stays dead.
    fn is_dead(shared: &Shared<'a>, bound: f64) -> bool {
        if !shared.pruning {
            return false;
        }
        shared
            .incumbent
            .objective()
            .map_or(false, |best| !shared.problem.optimization().is_better(bound, best))
    }

    /// This method processes the given `node`. Either the node is pruned
    /// right away (its bound was admissible when it got enqueued but the
    /// incumbent may have improved since), or it is a complete assignment
    /// that gets evaluated against the incumbent, or it is expanded into one
    /// child per feasible value of the branching variable. The children are
    /// derived and bounded outside of the critical section; only their
    /// insertion into the frontier is synchronized.
    fn process_one_node(shared: &Shared<'a>, node: Node) -> Result<(), SolverError> {
        if Self::is_dead(shared, node.bound) {
            shared.critical.lock().pruned += 1;
            return Ok(());
        }
        shared.critical.lock().explored += 1;

        if shared.problem.is_complete(&node.assignment) {
            let objective = shared.problem.objective(&node.assignment);
            shared.incumbent.try_update(node.assignment, objective);
            return Ok(());
        }

        let variable = shared
            .branching
            .select_variable(shared.problem, &node.assignment)
            .ok_or(SolverError::NoBranchingVariable { depth: node.depth })?;

        let sense = shared.problem.optimization();
        let mut children = vec![];
        for decision in shared.branching.branch(shared.problem, &node.assignment, variable) {
            let child = node.assignment.extended(decision);
            if !shared.problem.is_feasible(&child) {
                continue;
            }
            let mut child = Self::bounded(shared, child, node.depth + 1)?;
            child.bound = sense.tighten(node.bound, child.bound);
            children.push(child);
        }

        let mut critical = shared.critical.lock();
        for child in children {
            if Self::is_dead(shared, child.bound) {
                critical.pruned += 1;
            } else {
                critical.frontier.push(child);
            }
        }
        critical.peak_frontier = critical.peak_frontier.max(critical.frontier.len());
        Ok(())
    }

    /// Acknowledges that a thread finished processing its node.
    fn notify_node_finished(shared: &Shared<'a>) {
        shared.critical.lock().ongoing -= 1;
        shared.monitor.notify_all();
    }

    fn abort_search(shared: &Shared<'a>, reason: Reason) {
        let mut critical = shared.critical.lock();
        critical.abort_proof = Some(reason);
        critical.frontier.clear();
        shared.monitor.notify_all();
    }

    /// Records the first hard error a worker ran into and winds the whole
    /// resolution down.
    fn fail(shared: &Shared<'a>, error: SolverError) {
        let mut critical = shared.critical.lock();
        if critical.failure.is_none() {
            critical.failure = Some(error);
        }
        critical.frontier.clear();
        shared.monitor.notify_all();
    }

    /// Consults the shared state to fetch a workload. Depending on the current
    /// state, the workload can either be:
    ///
    ///   + Complete, when the problem is solved and all threads should stop
    ///   + Aborted, when the cutoff fired (or a worker failed) and the proof
    ///     must be given up
    ///   + Starvation, when there is no node available for processing at the
    ///     time being (but some node is still being processed and thus the
    ///     problem cannot be considered solved).
    ///   + WorkItem, when the thread successfully obtained a node to process.
    fn get_workload(shared: &Shared<'a>) -> WorkLoad {
        let mut critical = shared.critical.lock();

        // Did someone bail out ?
        if critical.abort_proof.is_some() || critical.failure.is_some() {
            return WorkLoad::Aborted;
        }

        // Do we need to stop ?
        if shared.cutoff.must_stop(critical.explored) {
            critical.abort_proof = Some(Reason::CutoffOccurred);
            critical.frontier.clear();
            shared.monitor.notify_all();
            return WorkLoad::Aborted;
        }

        // Are we done ?
        if critical.ongoing == 0 && critical.frontier.is_empty() {
            return WorkLoad::Complete;
        }

        // Nothing to do yet ? => Wait for someone to post jobs
        if critical.frontier.is_empty() {
            shared.monitor.wait(&mut critical);
            return WorkLoad::Starvation;
        }

        // Consume the current node and process it
        let node = critical.frontier.pop().unwrap();
        critical.ongoing += 1;
        critical.best_bound = node.bound;

        WorkLoad::WorkItem { node }
    }

    fn outcome(&self, elapsed: std::time::Duration) -> Outcome {
        let critical = self.shared.critical.lock();
        let best = self.shared.incumbent.best();
        let status = if critical.abort_proof.is_some() {
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
                explored: critical.explored,
                pruned: critical.pruned,
                peak_frontier: critical.peak_frontier,
                elapsed,
            },
        }
    }
}

impl Solver for ParallelSolver<'_> {
    /// Runs the branch-and-bound algorithm to solve the problem to proven
    /// optimality. To do so, it spawns `nb_threads` workers (long running
    /// threads); each of which will continually get a workload and process it
    /// until the problem is solved.
    fn solve(&mut self) -> Result<Outcome, SolverError> {
        let start = Instant::now();
        self.validate()?;
        self.initialize()?;

        std::thread::scope(|s| {
            for _ in 0..self.nb_threads {
                let shared = &self.shared;
                s.spawn(move || loop {
                    match Self::get_workload(shared) {
                        WorkLoad::Complete => break,
                        WorkLoad::Aborted => break,
                        WorkLoad::Starvation => continue,
                        WorkLoad::WorkItem { node } => {
                            let outcome = Self::process_one_node(shared, node);
                            Self::notify_node_finished(shared);
                            if let Err(error) = outcome {
                                Self::fail(shared, error);
                                break;
                            }
                        }
                    }
                });
            }
        });

        {
            let mut critical = self.shared.critical.lock();
            if let Some(error) = critical.failure.take() {
                return Err(error);
            }
            // when the proof ran to completion, the dual bound collapses
            // onto the incumbent value
            if critical.abort_proof.is_none() {
                if let Some(value) = self.shared.incumbent.objective() {
                    critical.best_bound = value;
                }
            }
        }
        Ok(self.outcome(start.elapsed()))
    }

    /// Returns the value of the best solution that has been identified for
    /// this problem.
    fn best_value(&self) -> Option<f64> {
        self.shared.incumbent.objective()
    }
    /// Returns the best solution that has been identified for this problem.
    fn best_assignment(&self) -> Option<Assignment> {
        self.shared.incumbent.best().map(|(assignment, _)| assignment)
    }
    /// Returns the value of the best dual bound that has been identified for
    /// this problem.
    fn best_bound(&self) -> f64 {
        self.shared.critical.lock().best_bound
    }
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, assignment: Assignment, value: f64) {
        self.shared.incumbent.try_update(assignment, value);
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

/// Unlike the rest of the library, the solvers modules are not tested in depth
/// with unit tests (this is way too hard to do even for the sequential module).
/// So we basically unit test the configuration capabilities of the solvers
/// and then resort to the solving of instances with a known optimum solution
/// to validate the behavior of the solve function.

#[cfg(test)]
mod test_parallel_solver {
    use crate::*;

    struct Knapsack {
        capacity: isize,
        weight: Vec<isize>,
        value: Vec<isize>,
    }
    impl Knapsack {
        fn default_instance() -> Self {
            Knapsack { capacity: 5, weight: vec![2, 3, 4], value: vec![3, 4, 5] }
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

    #[test]
    fn no_solution_before_solving() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            1,
        );
        assert!(solver.best_value().is_none());
        assert!(solver.best_assignment().is_none());
    }
    #[test]
    fn by_default_the_dual_bound_carries_no_information() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            1,
        );
        assert_eq!(f64::INFINITY, solver.best_bound());
        assert_eq!(1.0, solver.gap());
    }
    #[test]
    fn a_single_worker_proves_the_optimum() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            1,
        );
        let outcome = solver.solve().unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);
        assert_eq!(0.0, solver.gap());
    }
    #[test]
    fn many_workers_prove_the_same_optimum() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            4,
        );
        let outcome = solver.solve().unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(7.0), outcome.best_value);

        let best = outcome.best_assignment.unwrap();
        assert_eq!(Some(1), best.value_of(Variable(0)));
        assert_eq!(Some(1), best.value_of(Variable(1)));
        assert_eq!(Some(0), best.value_of(Variable(2)));
    }
    #[test]
    fn an_empty_feasible_region_is_reported_infeasible() {
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
        let problem = NoWay;
        let oracle = TrivialBound(problem.optimization());
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            2,
        );
        let outcome = solver.solve().unwrap();
        assert_eq!(Status::Infeasible, outcome.status);
        assert_eq!(None, outcome.best_value);
    }
    #[test]
    fn a_spent_node_budget_leaves_the_proof_unproven() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NodeBudget(1),
            &mut frontier,
            2,
        );
        let outcome = solver.solve().unwrap();
        assert_eq!(Status::Unproven, outcome.status);
    }
    #[test]
    fn a_non_finite_bound_is_a_hard_error() {
        struct LyingOracle;
        impl BoundOracle for LyingOracle {
            fn bound(&self, _assignment: &Assignment) -> f64 {
                f64::INFINITY
            }
        }
        let problem = Knapsack::default_instance();
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = ParallelSolver::custom(
            &problem,
            &LyingOracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            2,
        );
        assert!(matches!(solver.solve(), Err(SolverError::NonFiniteBound { .. })));
    }
    #[test]
    fn set_primal_overwrites_the_incumbent_only_when_it_improves() {
        let problem = Knapsack::default_instance();
        let oracle = KnapsackBound(&problem);
        let mut frontier = BestBoundFrontier::new(problem.optimization());
        let mut solver = ParallelSolver::custom(
            &problem,
            &oracle,
            &FirstUnassigned,
            &NoCutoff,
            &mut frontier,
            1,
        );

        solver.set_primal(Assignment::new(3), 5.0);
        assert_eq!(Some(5.0), solver.best_value());

        // no improvement, no update
        solver.set_primal(Assignment::new(3), 3.0);
        assert_eq!(Some(5.0), solver.best_value());

        // the search still improves on the seeded primal
        let outcome = solver.solve().unwrap();
        assert_eq!(Some(7.0), outcome.best_value);
    }
}
