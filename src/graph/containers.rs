//! Node-index containers that decide visitation order.
//!
//! | Container | Search | Next node | Edge order |
//! |---|---|---|---|
//! | [`NodeQueue`] | breadth-first | oldest discovered | forward |
//! | [`NodeStack`] | depth-first | newest discovered | reverse |
//! | [`NodePriorityQueue`] | priority-first | greatest by comparator | forward |

use core::cmp::Ordering;
use core::fmt;
use std::collections::VecDeque;

/// A pending-node container driving a traversal.
pub trait NodeContainer {
    /// Whether a popped node's edges are walked back to front.
    const REVERSE_EDGES: bool = false;

    /// Adds a discovered node.
    fn push(&mut self, node: usize);

    /// Removes the next node to process.
    fn pop(&mut self) -> Option<usize>;

    /// Number of pending nodes.
    fn len(&self) -> usize;

    /// Returns `true` if no node is pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First in, first out.
#[derive(Debug, Clone, Default)]
pub struct NodeQueue {
    nodes: VecDeque<usize>,
}

impl NodeQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeContainer for NodeQueue {
    #[inline]
    fn push(&mut self, node: usize) {
        self.nodes.push_back(node);
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        self.nodes.pop_front()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Last in, first out.
#[derive(Debug, Clone, Default)]
pub struct NodeStack {
    nodes: Vec<usize>,
}

impl NodeStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeContainer for NodeStack {
    const REVERSE_EDGES: bool = true;

    #[inline]
    fn push(&mut self, node: usize) {
        self.nodes.push(node);
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        self.nodes.pop()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// A binary max-heap of node indices ordered by a comparator.
///
/// Nodes comparing equal leave in discovery order.
pub struct NodePriorityQueue<F> {
    // (node, discovery sequence number)
    heap: Vec<(usize, u64)>,
    sequence: u64,
    compare: F,
}

impl<F: Fn(usize, usize) -> Ordering> NodePriorityQueue<F> {
    /// Creates an empty queue popping the greatest node under `compare` first.
    pub fn new(compare: F) -> Self {
        Self {
            heap: Vec::new(),
            sequence: 0,
            compare,
        }
    }

    /// The node that `pop` would return.
    pub fn peek(&self) -> Option<usize> {
        self.heap.first().map(|&(node, _)| node)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (node_a, seq_a) = self.heap[a];
        let (node_b, seq_b) = self.heap[b];
        match (self.compare)(node_a, node_b) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => seq_a > seq_b,
        }
    }

    fn sift_up(&mut self, mut node: usize) {
        while node > 0 {
            let parent = (node - 1) / 2;
            if self.less(parent, node) {
                self.heap.swap(parent, node);
                node = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut node: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * node + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut greater = left;
            if right < len && self.less(left, right) {
                greater = right;
            }
            if self.less(node, greater) {
                self.heap.swap(node, greater);
                node = greater;
            } else {
                break;
            }
        }
    }
}

impl<F: Fn(usize, usize) -> Ordering> NodeContainer for NodePriorityQueue<F> {
    fn push(&mut self, node: usize) {
        self.heap.push((node, self.sequence));
        self.sequence += 1;
        self.sift_up(self.heap.len() - 1);
    }

    fn pop(&mut self) -> Option<usize> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let (node, _) = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<F> fmt::Debug for NodePriorityQueue<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePriorityQueue")
            .field("len", &self.heap.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(container: &mut impl NodeContainer) -> Vec<usize> {
        std::iter::from_fn(|| container.pop()).collect()
    }

    #[test]
    fn queue_and_stack_disciplines() {
        let mut queue = NodeQueue::new();
        let mut stack = NodeStack::new();
        for n in [4, 1, 3] {
            queue.push(n);
            stack.push(n);
        }
        assert_eq!(drain(&mut queue), vec![4, 1, 3]);
        assert_eq!(drain(&mut stack), vec![3, 1, 4]);
    }

    #[test]
    fn priority_queue_pops_greatest_weight_first() {
        let weights = [5, 1, 9, 5, 7];
        let mut pq = NodePriorityQueue::new(|a: usize, b: usize| weights[a].cmp(&weights[b]));
        for n in 0..weights.len() {
            pq.push(n);
        }
        assert_eq!(pq.peek(), Some(2));
        // Nodes 0 and 3 tie and leave in push order.
        assert_eq!(drain(&mut pq), vec![2, 4, 0, 3, 1]);
        assert!(pq.is_empty());
    }
}
