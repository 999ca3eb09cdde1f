//! Exact many-to-one assignment by min-cost flow.
//!
//! Network: source -> task (cap 1) -> developer (cap 1, cost = -value) ->
//! sink (cap = remaining slots). Successive shortest paths are augmented
//! while the cheapest path is negative, which yields a minimum-cost flow of
//! any size, i.e. a maximum-value assignment.

use super::Problem;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Edge {
    to: usize,
    rev: usize,
    cap: i64,
    cost: i64,
}

#[derive(Debug, Default)]
struct Network {
    graph: Vec<Vec<Edge>>,
}

impl Network {
    fn with_nodes(n: usize) -> Self {
        Self {
            graph: vec![Vec::new(); n],
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, cap: i64, cost: i64) {
        let rev_from = self.graph[to].len();
        let rev_to = self.graph[from].len();
        self.graph[from].push(Edge {
            to,
            rev: rev_from,
            cap,
            cost,
        });
        self.graph[to].push(Edge {
            to: from,
            rev: rev_to,
            cap: 0,
            cost: -cost,
        });
    }

    /// Shortest residual path by SPFA. Returns (distance, predecessor edges).
    fn shortest_path(&self, source: usize) -> (Vec<Option<i64>>, Vec<Option<(usize, usize)>>) {
        let n = self.graph.len();
        let mut dist: Vec<Option<i64>> = vec![None; n];
        let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut queued = vec![false; n];
        let mut queue = VecDeque::new();

        dist[source] = Some(0);
        queue.push_back(source);
        queued[source] = true;

        while let Some(u) = queue.pop_front() {
            queued[u] = false;
            let Some(du) = dist[u] else { continue };
            for (idx, edge) in self.graph[u].iter().enumerate() {
                if edge.cap <= 0 {
                    continue;
                }
                let candidate = du + edge.cost;
                if dist[edge.to].is_none_or(|dv| candidate < dv) {
                    dist[edge.to] = Some(candidate);
                    prev[edge.to] = Some((u, idx));
                    if !queued[edge.to] {
                        queued[edge.to] = true;
                        queue.push_back(edge.to);
                    }
                }
            }
        }
        (dist, prev)
    }

    /// Augment unit flow along negative-cost paths until none remain.
    fn min_cost_flow(&mut self, source: usize, sink: usize) {
        loop {
            let (dist, prev) = self.shortest_path(source);
            match dist[sink] {
                Some(d) if d < 0 => {}
                _ => break,
            }
            let mut v = sink;
            while let Some((u, idx)) = prev[v] {
                let rev = self.graph[u][idx].rev;
                self.graph[u][idx].cap -= 1;
                self.graph[v][rev].cap += 1;
                v = u;
            }
        }
    }
}

/// Solve a slot-capacity problem exactly.
pub(super) fn solve(problem: &Problem, slots: &[u32]) -> Vec<Option<usize>> {
    let n = problem.task_count();
    let m = problem.developer_count();
    let source = 0;
    let sink = n + m + 1;
    let task_node = |t: usize| 1 + t;
    let dev_node = |d: usize| 1 + n + d;
    let scale = problem.tie_scale();

    let mut net = Network::with_nodes(n + m + 2);
    for t in 0..n {
        net.add_edge(source, task_node(t), 1, 0);
        for d in 0..m {
            if let Some(value) = problem.value(t, d) {
                net.add_edge(task_node(t), dev_node(d), 1, -value.key(scale));
            }
        }
    }
    for (d, &cap) in slots.iter().enumerate() {
        if cap > 0 {
            net.add_edge(dev_node(d), sink, i64::from(cap), 0);
        }
    }

    net.min_cost_flow(source, sink);

    (0..n)
        .map(|t| {
            net.graph[task_node(t)].iter().find_map(|edge| {
                let is_dev = edge.to > n && edge.to <= n + m;
                // A saturated forward edge carries the unit of flow.
                (is_dev && edge.cap == 0 && edge.cost < 0).then(|| edge.to - n - 1)
            })
        })
        .collect()
}
