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

//! The single machine total weighted completion time model (1||sum wC in the
//! scheduling notation). Variable i is the job placed in the i-th position
//! of the sequence, and feasibility boils down to all-different.

use bab::*;

use crate::io_utils::SchedulingInstance;

pub struct Sequencing {
    pub instance: SchedulingInstance,
    /// the candidate jobs for any position (0..nb_jobs as isize)
    jobs: Vec<isize>,
}
impl Sequencing {
    pub fn new(instance: SchedulingInstance) -> Self {
        let jobs = (0..instance.nb_jobs as isize).collect();
        Sequencing { instance, jobs }
    }
    /// The completion time and weighted completion cost of the contiguous
    /// prefix of positions that have been decided so far. These are exact:
    /// once a prefix is fixed, no later decision can change them.
    pub fn prefix(&self, assignment: &Assignment) -> (isize, f64) {
        let mut clock = 0;
        let mut cost = 0;
        for position in 0..assignment.nb_variables() {
            match assignment.value_of(Variable(position)) {
                Some(job) => {
                    clock += self.instance.ptime[job as usize];
                    cost += self.instance.weight[job as usize] * clock;
                }
                None => break,
            }
        }
        (clock, cost as f64)
    }
    /// The jobs that do not appear in the contiguous decided prefix.
    fn after_prefix(&self, assignment: &Assignment) -> Vec<usize> {
        let mut placed = vec![false; self.instance.nb_jobs];
        for position in 0..assignment.nb_variables() {
            match assignment.value_of(Variable(position)) {
                Some(job) => placed[job as usize] = true,
                None => break,
            }
        }
        (0..self.instance.nb_jobs).filter(|&job| !placed[job]).collect()
    }
}
impl Problem for Sequencing {
    fn nb_variables(&self) -> usize {
        self.instance.nb_jobs
    }
    fn optimization(&self) -> Optimization {
        Optimization::Minimize
    }
    fn domain_of(&self, _var: Variable) -> &[isize] {
        &self.jobs
    }
    fn is_feasible(&self, assignment: &Assignment) -> bool {
        let mut seen = vec![false; self.instance.nb_jobs];
        for decision in assignment.decisions() {
            let job = decision.value as usize;
            if seen[job] {
                return false;
            }
            seen[job] = true;
        }
        true
    }
    fn objective(&self, assignment: &Assignment) -> f64 {
        self.prefix(assignment).1
    }
}

/// The weighted shortest processing time (WSPT) relaxation. The cost of the
/// decided prefix is exact; the jobs that remain are sequenced in WSPT order
/// starting from the prefix makespan, as if the positions some of them may
/// already be pinned to did not constrain them. Removing constraints can
/// only decrease the optimal cost, so this is a valid lower bound.
pub struct WsptBound<'a> {
    problem: &'a Sequencing,
    /// job ids sorted by increasing ptime/weight ratio
    by_wspt: Vec<usize>,
}
impl<'a> WsptBound<'a> {
    pub fn new(problem: &'a Sequencing) -> Self {
        let instance = &problem.instance;
        let mut by_wspt: Vec<usize> = (0..instance.nb_jobs).collect();
        by_wspt.sort_by(|&a, &b| {
            let ra = instance.ptime[a] as f64 / instance.weight[a] as f64;
            let rb = instance.ptime[b] as f64 / instance.weight[b] as f64;
            ra.total_cmp(&rb)
        });
        WsptBound { problem, by_wspt }
    }
}
impl BoundOracle for WsptBound<'_> {
    fn bound(&self, assignment: &Assignment) -> f64 {
        let instance = &self.problem.instance;
        let (mut clock, prefix_cost) = self.problem.prefix(assignment);

        let mut remaining = vec![false; instance.nb_jobs];
        for job in self.problem.after_prefix(assignment) {
            remaining[job] = true;
        }

        let mut rest_cost = 0;
        for &job in &self.by_wspt {
            if remaining[job] {
                clock += instance.ptime[job];
                rest_cost += instance.weight[job] * clock;
            }
        }
        prefix_cost + rest_cost as f64
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_model {
    use bab::*;

    use super::*;
    use crate::io_utils::SchedulingInstance;

    fn instance() -> SchedulingInstance {
        SchedulingInstance {
            nb_jobs: 3,
            ptime: vec![3, 2, 1],
            duedate: vec![None, None, None],
            weight: vec![1, 2, 3],
        }
    }

    fn sequence(problem: &Sequencing, jobs: &[isize]) -> Assignment {
        let mut asgn = Assignment::new(problem.nb_variables());
        for (position, &job) in jobs.iter().enumerate() {
            asgn.decide(Decision { variable: Variable(position), value: job });
        }
        asgn
    }

    #[test]
    fn the_objective_is_the_weighted_completion_cost() {
        let problem = Sequencing::new(instance());
        // C2 = 1, C1 = 3, C0 = 6 => 3*1 + 2*3 + 1*6 = 15
        assert_eq!(15.0, problem.objective(&sequence(&problem, &[2, 1, 0])));
        // C0 = 3, C1 = 5, C2 = 6 => 1*3 + 2*5 + 3*6 = 31
        assert_eq!(31.0, problem.objective(&sequence(&problem, &[0, 1, 2])));
    }
    #[test]
    fn repeating_a_job_is_infeasible() {
        let problem = Sequencing::new(instance());
        let mut asgn = Assignment::new(3);
        asgn.decide(Decision { variable: Variable(0), value: 1 });
        asgn.decide(Decision { variable: Variable(1), value: 1 });
        assert!(!problem.is_feasible(&asgn));
    }
    #[test]
    fn the_root_bound_is_the_wspt_cost() {
        let problem = Sequencing::new(instance());
        let oracle = WsptBound::new(&problem);
        // WSPT order is (2, 1, 0) which is also the optimal sequence here
        assert_eq!(15.0, oracle.bound(&Assignment::new(3)));
    }
    #[test]
    fn the_bound_never_exceeds_any_feasible_completion() {
        let problem = Sequencing::new(instance());
        let oracle = WsptBound::new(&problem);

        // every permutation, checked against the bound of every prefix of it
        let permutations: [[isize; 3]; 6] =
            [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for perm in permutations {
            let full = sequence(&problem, &perm);
            let cost = problem.objective(&full);
            for len in 0..=3 {
                let prefix = sequence(&problem, &perm[..len]);
                assert!(oracle.bound(&prefix) <= cost);
            }
        }
    }
    #[test]
    fn it_solves_to_the_wspt_optimum() {
        let problem = Sequencing::new(instance());
        let oracle = WsptBound::new(&problem);
        let outcome = solve(&problem, &oracle, &SolverConfig::default()).unwrap();
        assert_eq!(Status::Optimal, outcome.status);
        assert_eq!(Some(15.0), outcome.best_value);
    }
}
