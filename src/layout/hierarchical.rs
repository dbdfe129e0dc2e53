//! Sugiyama-style layered layout.
//!
//! Phases:
//!   1. Cycle removal (reverse DFS back edges)
//!   2. Rank assignment (longest path, sources pulled toward successors)
//!   3. Dummy node insertion for edges spanning several ranks
//!   4. Crossing minimisation (weighted barycenter sweeps)
//!   5. Coordinate assignment (packing + neighbour alignment)
//!   6. Rank direction mapping, margins and edge waypoints

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, DfsEvent};

use super::types::*;
use crate::error::LayoutError;
use crate::ir::types::Direction;

const DEFAULT_MAX_SWEEPS: usize = 24;
/// Sweeps without fewer crossings before ordering stops.
const SWEEP_PATIENCE: usize = 4;
const ALIGN_ROUNDS: usize = 4;

#[derive(Debug, Clone)]
pub struct SugiyamaLayout {
    pub max_sweeps: usize,
}

impl Default for SugiyamaLayout {
    fn default() -> Self {
        SugiyamaLayout {
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

impl LayeredLayout for SugiyamaLayout {
    fn compute_layout(
        &self,
        graph: &LayoutGraph,
        options: &GraphOptions,
    ) -> Result<LayoutPositions, LayoutError> {
        options.validate()?;
        if graph.nodes.is_empty() {
            return Ok(LayoutPositions::default());
        }

        let reversed = find_back_edges(graph);
        let ranks = assign_ranks(graph, &reversed)?;
        let net = Network::build(graph, &ranks, &reversed, options.rank_dir.is_horizontal());
        let layers = order_layers(&net, self.max_sweeps);
        let centers = assign_coordinates(&net, &layers, options);

        Ok(extract(graph, &net, &centers, options))
    }
}

// ─── Cycle removal ───────────────────────────────────────────────────────────

/// Indices of edges that close a cycle in DFS order. Reversing them makes
/// the graph acyclic. Self-loops are ignored.
fn find_back_edges(graph: &LayoutGraph) -> HashSet<usize> {
    let mut g = DiGraph::<(), ()>::with_capacity(graph.nodes.len(), graph.edges.len());
    let idx: Vec<NodeIndex> = graph.nodes.iter().map(|_| g.add_node(())).collect();
    for edge in &graph.edges {
        if edge.source != edge.target {
            g.add_edge(idx[edge.source], idx[edge.target], ());
        }
    }

    let mut back = HashSet::new();
    depth_first_search(&g, idx.iter().copied(), |event| {
        if let DfsEvent::BackEdge(u, v) = event {
            back.insert((u.index(), v.index()));
        }
    });

    graph
        .edges
        .iter()
        .enumerate()
        .filter(|(_, e)| e.source != e.target && back.contains(&(e.source, e.target)))
        .map(|(i, _)| i)
        .collect()
}

// ─── Rank assignment ─────────────────────────────────────────────────────────

fn assign_ranks(graph: &LayoutGraph, reversed: &HashSet<usize>) -> Result<Vec<usize>, LayoutError> {
    let mut dag = DiGraph::<(), ()>::with_capacity(graph.nodes.len(), graph.edges.len());
    let idx: Vec<NodeIndex> = graph.nodes.iter().map(|_| dag.add_node(())).collect();
    for (i, edge) in graph.edges.iter().enumerate() {
        if edge.source == edge.target {
            continue;
        }
        let (s, t) = oriented(edge, reversed.contains(&i));
        dag.add_edge(idx[s], idx[t], ());
    }

    let order = toposort(&dag, None).map_err(|cycle| {
        LayoutError::CycleRemaining(graph.nodes[cycle.node_id().index()].id.clone())
    })?;

    let mut rank = vec![0usize; graph.nodes.len()];
    for &v in &order {
        for w in dag.neighbors_directed(v, petgraph::Direction::Outgoing) {
            rank[w.index()] = rank[w.index()].max(rank[v.index()] + 1);
        }
    }

    // Sources sit directly above their closest successor instead of rank 0.
    for &v in order.iter().rev() {
        if dag
            .neighbors_directed(v, petgraph::Direction::Incoming)
            .next()
            .is_some()
        {
            continue;
        }
        if let Some(min) = dag
            .neighbors_directed(v, petgraph::Direction::Outgoing)
            .map(|w| rank[w.index()])
            .min()
        {
            rank[v.index()] = min - 1;
        }
    }

    Ok(rank)
}

fn oriented(edge: &LayoutEdge, reversed: bool) -> (usize, usize) {
    if reversed {
        (edge.target, edge.source)
    } else {
        (edge.source, edge.target)
    }
}

// ─── Dummy node insertion ────────────────────────────────────────────────────

struct VirtualNode {
    real: Option<usize>,
    rank: usize,
    /// Extent across the rank axis.
    cross: f64,
    /// Extent along the rank axis.
    main: f64,
}

/// Virtual node path of one input edge, in acyclic orientation.
struct EdgeChain {
    vnodes: Vec<usize>,
    reversed: bool,
}

struct Network {
    nodes: Vec<VirtualNode>,
    /// `(neighbour, weight)` lists, one rank up / down.
    preds: Vec<Vec<(usize, f64)>>,
    succs: Vec<Vec<(usize, f64)>>,
    /// One entry per input edge; `None` for self-loops.
    chains: Vec<Option<EdgeChain>>,
    layer_count: usize,
}

impl Network {
    fn build(graph: &LayoutGraph, ranks: &[usize], reversed: &HashSet<usize>, horizontal: bool) -> Self {
        let mut nodes: Vec<VirtualNode> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let (cross, main) = if horizontal {
                    (node.height, node.width)
                } else {
                    (node.width, node.height)
                };
                VirtualNode {
                    real: Some(i),
                    rank: ranks[i],
                    cross,
                    main,
                }
            })
            .collect();

        let mut links: Vec<(usize, usize, f64)> = Vec::new();
        let mut chains = Vec::with_capacity(graph.edges.len());

        for (i, edge) in graph.edges.iter().enumerate() {
            if edge.source == edge.target {
                chains.push(None);
                continue;
            }
            let is_reversed = reversed.contains(&i);
            let (s, t) = oriented(edge, is_reversed);
            let weight = f64::from(edge.weight.max(1));

            let mut chain = vec![s];
            let mut prev = s;
            for rank in (ranks[s] + 1)..ranks[t] {
                let dummy = nodes.len();
                nodes.push(VirtualNode {
                    real: None,
                    rank,
                    cross: 0.0,
                    main: 0.0,
                });
                links.push((prev, dummy, weight));
                chain.push(dummy);
                prev = dummy;
            }
            links.push((prev, t, weight));
            chain.push(t);

            chains.push(Some(EdgeChain {
                vnodes: chain,
                reversed: is_reversed,
            }));
        }

        let mut preds = vec![Vec::new(); nodes.len()];
        let mut succs = vec![Vec::new(); nodes.len()];
        for &(from, to, weight) in &links {
            succs[from].push((to, weight));
            preds[to].push((from, weight));
        }

        let layer_count = nodes.iter().map(|n| n.rank).max().unwrap_or(0) + 1;

        Network {
            nodes,
            preds,
            succs,
            chains,
            layer_count,
        }
    }

    fn is_real(&self, v: usize) -> bool {
        self.nodes[v].real.is_some()
    }
}

// ─── Crossing minimisation ───────────────────────────────────────────────────

fn order_layers(net: &Network, max_sweeps: usize) -> Vec<Vec<usize>> {
    let mut layers = initial_order(net);
    let mut best = layers.clone();
    let mut best_crossings = count_crossings(&layers, net);
    let mut since_improved = 0;

    for sweep in 0..max_sweeps {
        if best_crossings == 0 || since_improved >= SWEEP_PATIENCE {
            break;
        }
        if sweep % 2 == 0 {
            for i in 1..layers.len() {
                let (fixed, moving) = layers.split_at_mut(i);
                reorder(&mut moving[0], &fixed[i - 1], &net.preds);
            }
        } else {
            for i in (0..layers.len().saturating_sub(1)).rev() {
                let (moving, fixed) = layers.split_at_mut(i + 1);
                reorder(&mut moving[i], &fixed[0], &net.succs);
            }
        }

        let crossings = count_crossings(&layers, net);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
            since_improved = 0;
        } else {
            since_improved += 1;
        }
    }

    best
}

/// Depth-first order from the topmost nodes, so connected nodes start out
/// next to each other.
fn initial_order(net: &Network) -> Vec<Vec<usize>> {
    let mut layers = vec![Vec::new(); net.layer_count];
    let mut visited = vec![false; net.nodes.len()];

    let mut starts: Vec<usize> = (0..net.nodes.len()).collect();
    starts.sort_by_key(|&v| (net.nodes[v].rank, v));

    for start in starts {
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            layers[net.nodes[v].rank].push(v);
            for &(w, _) in net.succs[v].iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }

    layers
}

/// Sort `layer` by the weighted barycenter of its neighbours in `fixed`.
/// Nodes without neighbours there keep their current slot.
fn reorder(layer: &mut [usize], fixed: &[usize], neighbours: &[Vec<(usize, f64)>]) {
    let mut fixed_pos = std::collections::HashMap::with_capacity(fixed.len());
    for (i, &v) in fixed.iter().enumerate() {
        fixed_pos.insert(v, i as f64);
    }

    let mut keyed: Vec<(f64, usize, usize)> = layer
        .iter()
        .enumerate()
        .map(|(slot, &v)| {
            let mut sum = 0.0;
            let mut weight = 0.0;
            for &(u, w) in &neighbours[v] {
                if let Some(&p) = fixed_pos.get(&u) {
                    sum += p * w;
                    weight += w;
                }
            }
            let bary = if weight > 0.0 { sum / weight } else { slot as f64 };
            (bary, slot, v)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    for (slot, (_, _, v)) in keyed.into_iter().enumerate() {
        layer[slot] = v;
    }
}

fn count_crossings(layers: &[Vec<usize>], net: &Network) -> usize {
    let mut total = 0;
    let mut position = vec![0usize; net.nodes.len()];
    for layer in layers {
        for (i, &v) in layer.iter().enumerate() {
            position[v] = i;
        }
    }

    for layer in layers {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for &v in layer {
            for &(w, _) in &net.succs[v] {
                segments.push((position[v], position[w]));
            }
        }
        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let (a0, a1) = segments[i];
                let (b0, b1) = segments[j];
                if (a0 < b0 && a1 > b1) || (a0 > b0 && a1 < b1) {
                    total += 1;
                }
            }
        }
    }
    total
}

// ─── Coordinate assignment ───────────────────────────────────────────────────

/// Centers in the top-to-bottom frame: `x` across ranks, `y` along them.
fn assign_coordinates(net: &Network, layers: &[Vec<usize>], options: &GraphOptions) -> Vec<Point> {
    let gap = |a: usize, b: usize| {
        let sep = if net.is_real(a) && net.is_real(b) {
            options.node_sep
        } else {
            options.edge_sep
        };
        net.nodes[a].cross / 2.0 + sep + net.nodes[b].cross / 2.0
    };

    // Pack each layer left to right.
    let mut x = vec![0.0; net.nodes.len()];
    for layer in layers {
        for (k, &v) in layer.iter().enumerate() {
            x[v] = if k == 0 {
                net.nodes[v].cross / 2.0
            } else {
                x[layer[k - 1]] + gap(layer[k - 1], v)
            };
        }
    }

    // Center every layer under the widest one.
    let extent = |layer: &[usize], x: &[f64]| -> f64 {
        match (layer.first(), layer.last()) {
            (Some(&first), Some(&last)) => {
                x[last] + net.nodes[last].cross / 2.0 - (x[first] - net.nodes[first].cross / 2.0)
            }
            _ => 0.0,
        }
    };
    let widest = layers.iter().map(|l| extent(l, &x)).fold(0.0, f64::max);
    for layer in layers {
        let shift = (widest - extent(layer, &x)) / 2.0;
        for &v in layer {
            x[v] += shift;
        }
    }

    // Pull nodes toward their neighbours in the adjacent rank.
    for round in 0..ALIGN_ROUNDS {
        let downward = round % 2 == 0;
        let sequence: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len().saturating_sub(1)).rev().collect()
        };
        for i in sequence {
            let neighbours = if downward { &net.preds } else { &net.succs };
            let desired: Vec<f64> = layers[i]
                .iter()
                .map(|&v| {
                    let (sum, weight) = neighbours[v]
                        .iter()
                        .fold((0.0, 0.0), |(s, w), &(u, wt)| (s + x[u] * wt, w + wt));
                    if weight > 0.0 { sum / weight } else { x[v] }
                })
                .collect();
            place_layer(&layers[i], &desired, &mut x, &gap);
        }
    }

    let min_left = (0..net.nodes.len())
        .map(|v| x[v] - net.nodes[v].cross / 2.0)
        .fold(f64::INFINITY, f64::min);
    if min_left.is_finite() {
        for value in &mut x {
            *value -= min_left;
        }
    }

    // Ranks stack along the main axis.
    let mut rank_depth = vec![0.0f64; net.layer_count];
    for node in &net.nodes {
        rank_depth[node.rank] = rank_depth[node.rank].max(node.main);
    }
    let mut rank_center = vec![0.0; net.layer_count];
    let mut offset = 0.0;
    for (r, depth) in rank_depth.iter().enumerate() {
        rank_center[r] = offset + depth / 2.0;
        offset += depth + options.rank_sep;
    }

    net.nodes
        .iter()
        .enumerate()
        .map(|(v, node)| Point::new(x[v], rank_center[node.rank]))
        .collect()
}

/// Move a layer toward `desired` while keeping order and minimum gaps:
/// average of a left-anchored and a right-anchored placement.
fn place_layer(layer: &[usize], desired: &[f64], x: &mut [f64], gap: &impl Fn(usize, usize) -> f64) {
    if layer.is_empty() {
        return;
    }
    let n = layer.len();

    let mut left = vec![0.0; n];
    for k in 0..n {
        left[k] = if k == 0 {
            desired[0]
        } else {
            desired[k].max(left[k - 1] + gap(layer[k - 1], layer[k]))
        };
    }

    let mut right = vec![0.0; n];
    for k in (0..n).rev() {
        right[k] = if k == n - 1 {
            desired[k]
        } else {
            desired[k].min(right[k + 1] - gap(layer[k], layer[k + 1]))
        };
    }

    for k in 0..n {
        x[layer[k]] = (left[k] + right[k]) / 2.0;
    }
}

// ─── Direction mapping + extraction ──────────────────────────────────────────

fn extract(graph: &LayoutGraph, net: &Network, centers: &[Point], options: &GraphOptions) -> LayoutPositions {
    let total_main = centers
        .iter()
        .zip(&net.nodes)
        .map(|(p, n)| p.y + n.main / 2.0)
        .fold(0.0, f64::max);

    let oriented: Vec<Point> = centers
        .iter()
        .map(|p| match options.rank_dir {
            Direction::TB => Point::new(p.x, p.y),
            Direction::BT => Point::new(p.x, total_main - p.y),
            Direction::LR => Point::new(p.y, p.x),
            Direction::RL => Point::new(total_main - p.y, p.x),
        })
        .collect();

    // Translate so the top-left of the drawing sits at the margins.
    let mut min_left = f64::INFINITY;
    let mut min_top = f64::INFINITY;
    for (i, node) in graph.nodes.iter().enumerate() {
        min_left = min_left.min(oriented[i].x - node.width / 2.0);
        min_top = min_top.min(oriented[i].y - node.height / 2.0);
    }
    let dx = options.margin_x - min_left;
    let dy = options.margin_y - min_top;
    let placed: Vec<Point> = oriented
        .iter()
        .map(|p| Point::new(p.x + dx, p.y + dy))
        .collect();

    let edge_points = net
        .chains
        .iter()
        .map(|chain| match chain {
            Some(chain) => route(graph, chain, &placed),
            None => Vec::new(),
        })
        .collect();

    LayoutPositions {
        centers: placed[..graph.nodes.len()].to_vec(),
        edge_points,
    }
}

/// Waypoints from the source boundary through every bend point to the
/// target boundary, in the edge's original direction.
fn route(graph: &LayoutGraph, chain: &EdgeChain, placed: &[Point]) -> Vec<Point> {
    let path: Vec<Point> = chain.vnodes.iter().map(|&v| placed[v]).collect();
    let (Some(&first), Some(&last)) = (chain.vnodes.first(), chain.vnodes.last()) else {
        return Vec::new();
    };

    let mut points = Vec::with_capacity(path.len());
    let head = &graph.nodes[first];
    points.push(intersect_rect(path[0], head.width, head.height, path[1]));
    points.extend_from_slice(&path[1..path.len() - 1]);
    let tail = &graph.nodes[last];
    points.push(intersect_rect(
        path[path.len() - 1],
        tail.width,
        tail.height,
        path[path.len() - 2],
    ));

    if chain.reversed {
        points.reverse();
    }
    points
}

/// Where the segment from a box center toward `toward` leaves the box.
fn intersect_rect(center: Point, width: f64, height: f64, toward: Point) -> Point {
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return center;
    }

    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let (sx, sy) = if dy.abs() * half_w > dx.abs() * half_h {
        let h = if dy < 0.0 { -half_h } else { half_h };
        (h * dx / dy, h)
    } else {
        let w = if dx < 0.0 { -half_w } else { half_w };
        (w, w * dy / dx)
    };

    Point::new(center.x + sx, center.y + sy)
}
