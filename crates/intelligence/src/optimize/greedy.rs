//! Greedy allocation with exchange improvement.
//!
//! Pairs are taken best-first by (score desc, growth desc, task order,
//! developer id). Under slot capacities this is a 1/2-approximation of the
//! optimum; the exchange pass then moves an assigned task to another
//! developer with room whenever that frees a slot for an unassigned task and
//! strictly raises the objective. The pass only ever improves on greedy.

use super::{Capacity, Problem, HOURS_EPSILON};

/// Running load per developer during allocation.
struct Ledger<'a> {
    capacity: &'a Capacity,
    tasks: Vec<u32>,
    hours: Vec<f64>,
}

impl<'a> Ledger<'a> {
    fn new(capacity: &'a Capacity, developers: usize) -> Self {
        Self {
            capacity,
            tasks: vec![0; developers],
            hours: vec![0.0; developers],
        }
    }

    fn has_room(&self, developer: usize, hours: f64) -> bool {
        match self.capacity {
            Capacity::Slots(slots) => self.tasks[developer] < slots[developer],
            Capacity::Hours(budget) => {
                self.hours[developer] + hours <= budget[developer] + HOURS_EPSILON
            }
        }
    }

    /// Room for `hours` once a task worth `released` hours leaves.
    fn has_room_after_release(&self, developer: usize, released: f64, hours: f64) -> bool {
        match self.capacity {
            Capacity::Slots(slots) => self.tasks[developer] - 1 < slots[developer],
            Capacity::Hours(budget) => {
                self.hours[developer] - released + hours <= budget[developer] + HOURS_EPSILON
            }
        }
    }

    fn add(&mut self, developer: usize, hours: f64) {
        self.tasks[developer] += 1;
        self.hours[developer] += hours;
    }

    fn remove(&mut self, developer: usize, hours: f64) {
        self.tasks[developer] -= 1;
        self.hours[developer] -= hours;
    }
}

struct Exchange {
    gain: i64,
    unassigned: usize,
    moved: usize,
    from: usize,
    to: usize,
}

pub(super) fn solve(problem: &Problem, capacity: &Capacity) -> Vec<Option<usize>> {
    let n = problem.task_count();
    let m = problem.developer_count();
    let scale = problem.tie_scale();

    let mut candidates: Vec<(usize, usize, i64, i64)> = Vec::new();
    for t in 0..n {
        for d in 0..m {
            if let Some(v) = problem.value(t, d) {
                candidates.push((t, d, v.score, v.growth));
            }
        }
    }
    // Developers are indexed in id order, so d doubles as the id tiebreak.
    candidates.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then(b.3.cmp(&a.3))
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });

    let mut ledger = Ledger::new(capacity, m);
    let mut chosen: Vec<Option<usize>> = vec![None; n];
    for (t, d, _, _) in candidates {
        if chosen[t].is_none() && ledger.has_room(d, problem.hours(t)) {
            ledger.add(d, problem.hours(t));
            chosen[t] = Some(d);
        }
    }

    // Each applied exchange assigns one more task, so this terminates.
    while let Some(ex) = best_exchange(problem, &chosen, &ledger, scale) {
        tracing::trace!(
            target: "skillmatch::optimize",
            gain = ex.gain,
            task = ex.unassigned,
            "Applied exchange"
        );
        ledger.remove(ex.from, problem.hours(ex.moved));
        ledger.add(ex.to, problem.hours(ex.moved));
        ledger.add(ex.from, problem.hours(ex.unassigned));
        chosen[ex.moved] = Some(ex.to);
        chosen[ex.unassigned] = Some(ex.from);
    }

    chosen
}

/// Best strictly improving exchange, scanning in task then developer order.
fn best_exchange(
    problem: &Problem,
    chosen: &[Option<usize>],
    ledger: &Ledger<'_>,
    scale: i64,
) -> Option<Exchange> {
    let n = problem.task_count();
    let m = problem.developer_count();
    let mut best: Option<Exchange> = None;

    for u in (0..n).filter(|&u| chosen[u].is_none()) {
        for from in 0..m {
            let Some(u_value) = problem.value(u, from) else {
                continue;
            };
            for moved in (0..n).filter(|&t| chosen[t] == Some(from)) {
                let Some(moved_value) = problem.value(moved, from) else {
                    continue;
                };
                let fits_u = ledger.has_room_after_release(
                    from,
                    problem.hours(moved),
                    problem.hours(u),
                );
                if !fits_u {
                    continue;
                }
                for to in (0..m).filter(|&to| to != from) {
                    let Some(to_value) = problem.value(moved, to) else {
                        continue;
                    };
                    if !ledger.has_room(to, problem.hours(moved)) {
                        continue;
                    }
                    let gain = u_value.key(scale) + to_value.key(scale) - moved_value.key(scale);
                    if gain > 0 && best.as_ref().is_none_or(|b| gain > b.gain) {
                        best = Some(Exchange {
                            gain,
                            unassigned: u,
                            moved,
                            from,
                            to,
                        });
                    }
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::PairValue;

    fn problem(values: Vec<Vec<Option<i64>>>) -> Problem {
        Problem::from_values(
            values
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|v| v.map(|score| PairValue { score, growth: 0 }))
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn takes_best_pairs_first() {
        let p = problem(vec![vec![Some(5_000), Some(6_000)], vec![Some(7_000), Some(4_000)]]);
        assert_eq!(
            solve(&p, &Capacity::Slots(vec![1, 1])),
            vec![Some(1), Some(0)]
        );
    }

    #[test]
    fn exchange_frees_a_slot_for_stranded_task() {
        // Greedy puts task 0 on dev 0 (90) and strands task 1, which only
        // dev 0 can take. Moving task 0 to dev 1 (80) lets task 1 in.
        let p = problem(vec![vec![Some(9_000), Some(8_000)], vec![Some(7_000), None]]);
        assert_eq!(
            solve(&p, &Capacity::Slots(vec![1, 1])),
            vec![Some(1), Some(0)]
        );
    }

    #[test]
    fn hour_budgets_limit_assignment() {
        let p = problem(vec![vec![Some(5_000)], vec![Some(6_000)], vec![Some(7_000)]]);
        // 8h tasks against a 20h budget: two fit.
        assert_eq!(
            solve(&p, &Capacity::Hours(vec![20.0])),
            vec![None, Some(0), Some(0)]
        );
    }
}
