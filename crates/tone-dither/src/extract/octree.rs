//! Octree extraction with least-cost sibling merging.
//!
//! Nodes live in an arena and refer to each other by index. Every pixel is
//! pushed down to [`MAX_DEPTH`]; chains of single children are then
//! collapsed so that every leaf either has a sibling or is the root. The
//! reduction loop repeatedly merges the two sibling leaves whose union
//! increases squared quantization error the least (Ward's criterion).
//! When a node is left with one leaf child, it absorbs that child and
//! becomes a leaf itself, so merging can continue one level up.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::mean_color;

const MAX_DEPTH: usize = 5;

#[derive(Debug, Clone, Default)]
struct Node {
    children: [Option<usize>; 8],
    parent: Option<usize>,
    count: u64,
    sum: [u64; 3],
    /// Bumped whenever this node's children change; stale heap entries
    /// carry an older version.
    version: u32,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    fn mean(&self) -> [f64; 3] {
        let n = self.count as f64;
        [self.sum[0] as f64 / n, self.sum[1] as f64 / n, self.sum[2] as f64 / n]
    }
}

/// Candidate merge of leaves `a` and `b` under `parent`.
#[derive(Debug, PartialEq)]
struct Merge {
    cost: f64,
    parent: usize,
    a: usize,
    b: usize,
    version: u32,
}

impl Eq for Merge {}

impl Ord for Merge {
    /// Reversed so that `BinaryHeap` pops the cheapest merge first; ties
    /// go to the lowest node indices.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.parent.cmp(&self.parent))
            .then_with(|| (other.a, other.b).cmp(&(self.a, self.b)))
    }
}

impl PartialOrd for Merge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Octree {
    nodes: Vec<Node>,
    leaves: usize,
}

impl Octree {
    fn build(pixels: &[[u8; 3]]) -> Self {
        let mut tree = Octree {
            nodes: vec![Node::default()],
            leaves: 0,
        };
        for px in pixels {
            let mut node = 0;
            for level in 0..MAX_DEPTH {
                let slot = child_slot(*px, level);
                let existing = tree.nodes[node].children[slot];
                node = match existing {
                    Some(child) => child,
                    None => {
                        let child = tree.nodes.len();
                        tree.nodes.push(Node {
                            parent: Some(node),
                            ..Node::default()
                        });
                        tree.nodes[node].children[slot] = Some(child);
                        if level + 1 == MAX_DEPTH {
                            tree.leaves += 1;
                        }
                        child
                    }
                };
            }
            let leaf = &mut tree.nodes[node];
            leaf.count += 1;
            for c in 0..3 {
                leaf.sum[c] += px[c] as u64;
            }
        }
        // Children are always pushed after their parent, so walking the
        // arena backwards visits the deepest nodes first
        for idx in (0..tree.nodes.len()).rev() {
            tree.collapse_single_leaf(idx);
        }
        tree
    }

    fn leaf_children(&self, idx: usize) -> Vec<usize> {
        self.nodes[idx]
            .children
            .iter()
            .flatten()
            .copied()
            .filter(|&c| self.nodes[c].is_leaf())
            .collect()
    }

    /// If `idx` has exactly one child and it is a leaf, absorb it.
    /// Returns whether a collapse happened.
    fn collapse_single_leaf(&mut self, idx: usize) -> bool {
        let mut present = self.nodes[idx]
            .children
            .iter()
            .enumerate()
            .filter_map(|(slot, c)| c.map(|c| (slot, c)));
        let (Some((slot, child)), None) = (present.next(), present.next()) else {
            return false;
        };
        if !self.nodes[child].is_leaf() {
            return false;
        }
        let (count, sum) = (self.nodes[child].count, self.nodes[child].sum);
        let node = &mut self.nodes[idx];
        node.children[slot] = None;
        node.count = count;
        node.sum = sum;
        node.version += 1;
        true
    }

    /// Cheapest merge among the leaf children of `parent`, if it has two.
    fn best_merge(&self, parent: usize) -> Option<Merge> {
        let leaves = self.leaf_children(parent);
        let mut best: Option<Merge> = None;
        for (i, &a) in leaves.iter().enumerate() {
            for &b in &leaves[i + 1..] {
                let cost = ward_cost(&self.nodes[a], &self.nodes[b]);
                if best.as_ref().map_or(true, |m| cost < m.cost) {
                    best = Some(Merge {
                        cost,
                        parent,
                        a,
                        b,
                        version: self.nodes[parent].version,
                    });
                }
            }
        }
        best
    }

    fn reduce(&mut self, target: usize) {
        let mut heap: BinaryHeap<Merge> = (0..self.nodes.len()).filter_map(|p| self.best_merge(p)).collect();

        while self.leaves > target {
            let Some(merge) = heap.pop() else { break };
            if merge.version != self.nodes[merge.parent].version {
                continue;
            }

            let (count, sum) = (self.nodes[merge.b].count, self.nodes[merge.b].sum);
            let a = &mut self.nodes[merge.a];
            a.count += count;
            for c in 0..3 {
                a.sum[c] += sum[c];
            }
            let parent = &mut self.nodes[merge.parent];
            if let Some(slot) = parent.children.iter().position(|&c| c == Some(merge.b)) {
                parent.children[slot] = None;
            }
            parent.version += 1;
            self.leaves -= 1;

            let mut node = merge.parent;
            while self.collapse_single_leaf(node) {
                match self.nodes[node].parent {
                    Some(up) => {
                        self.nodes[up].version += 1;
                        node = up;
                    }
                    None => break,
                }
            }
            if let Some(m) = self.best_merge(node) {
                heap.push(m);
            }
        }
    }

    /// Leaf means in depth-first child order.
    fn palette(&self) -> Vec<[u8; 3]> {
        let mut out = Vec::with_capacity(self.leaves);
        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                if node.count > 0 {
                    out.push(mean_color(node.sum, node.count));
                }
                continue;
            }
            stack.extend(node.children.iter().rev().flatten());
        }
        out
    }
}

/// Child index from bit `7 - level` of each channel.
#[inline]
fn child_slot(px: [u8; 3], level: usize) -> usize {
    let shift = 7 - level;
    (((px[0] >> shift) & 1) << 2 | ((px[1] >> shift) & 1) << 1 | ((px[2] >> shift) & 1)) as usize
}

/// Increase in summed squared error from merging clusters `a` and `b`.
fn ward_cost(a: &Node, b: &Node) -> f64 {
    let (na, nb) = (a.count as f64, b.count as f64);
    let (ma, mb) = (a.mean(), b.mean());
    let d: f64 = (0..3).map(|c| (ma[c] - mb[c]).powi(2)).sum();
    na * nb / (na + nb) * d
}

pub(super) fn octree(pixels: &[[u8; 3]], target: usize) -> Vec<[u8; 3]> {
    let mut tree = Octree::build(pixels);
    tree.reduce(target);
    tree.palette()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_slot_uses_high_bits_first() {
        assert_eq!(child_slot([0x80, 0x00, 0x00], 0), 0b100);
        assert_eq!(child_slot([0x00, 0x80, 0x80], 0), 0b011);
        assert_eq!(child_slot([0x40, 0x00, 0x00], 1), 0b100);
    }

    #[test]
    fn test_solid_color_single_leaf() {
        assert_eq!(octree(&[[128, 128, 128]; 50], 4), vec![[128, 128, 128]]);
    }

    #[test]
    fn test_merges_closest_pair_first() {
        // Two dark greys close together and one white: the dark pair merges
        let pixels = [[0, 0, 0], [16, 16, 16], [255, 255, 255]];
        let mut colors = octree(&pixels, 2);
        colors.sort();
        assert_eq!(colors, vec![[8, 8, 8], [255, 255, 255]]);
    }

    #[test]
    fn test_reduces_gradient_to_target() {
        let pixels: Vec<[u8; 3]> = (0..=255u16)
            .flat_map(|r| (0..8u16).map(move |b| [r as u8, (255 - r) as u8, (b * 32) as u8]))
            .collect();
        for target in [1usize, 2, 7, 16, 64] {
            let colors = octree(&pixels, target);
            assert_eq!(colors.len(), target, "target {target}");
        }
    }
}
