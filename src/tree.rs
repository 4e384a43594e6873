use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::characters::{FrequencyTable, SymbolFrequency};
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(SymbolFrequency),
    Internal {
        probability: f64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn probability(&self) -> f64 {
        match self {
            Node::Leaf(sf) => sf.probability,
            Node::Internal { probability, .. } => *probability,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Node::Leaf(sf) => Some(sf.symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Probability ascending; among equal probabilities leaves come first in
    /// symbol order, internal nodes after every leaf.
    pub fn order(&self, other: &Self) -> Ordering {
        use Node::*;
        match (self, other) {
            (Leaf(a), Leaf(b)) => a.order(b),
            _ => self
                .probability()
                .total_cmp(&other.probability())
                .then(self.is_internal().cmp(&other.is_internal())),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Node::Internal { .. })
    }
}

/// Prefix tree stored as an arena; nodes refer to their children by [`NodeId`].
#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

struct TreeBuilder {
    nodes: Vec<Node>,
    source: VecDeque<NodeId>,
    target: VecDeque<NodeId>,
}

impl TreeBuilder {
    fn new(table: &FrequencyTable) -> Self {
        let nodes: Vec<_> = table.entries().iter().copied().map(Node::Leaf).collect();
        let source = (0..nodes.len()).map(NodeId).collect();
        Self {
            nodes,
            source,
            target: VecDeque::new(),
        }
    }

    /// Pop the lower head of the two queues, preferring `source` on ties.
    fn take_smallest(&mut self) -> Option<NodeId> {
        match (self.source.front(), self.target.front()) {
            (Some(s), Some(t)) => {
                if self.nodes[s.0].order(&self.nodes[t.0]) != Ordering::Greater {
                    self.source.pop_front()
                } else {
                    self.target.pop_front()
                }
            }
            (Some(_), None) => self.source.pop_front(),
            (None, _) => self.target.pop_front(),
        }
    }

    fn merge(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let probability = self.nodes[left.0].probability() + self.nodes[right.0].probability();
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Internal {
            probability,
            left,
            right,
        });
        id
    }

    fn build(mut self) -> HuffmanTree {
        if self.source.len() == 1 {
            return HuffmanTree {
                nodes: self.nodes,
                root: NodeId(0),
            };
        }

        while !self.source.is_empty() || self.target.len() > 1 {
            let (Some(left), Some(right)) = (self.take_smallest(), self.take_smallest()) else {
                unreachable!("at least two nodes remain while merging")
            };
            let merged = self.merge(left, right);
            self.target.push_back(merged);
        }

        let root = self
            .target
            .pop_front()
            .expect("frequency table has at least one entry");
        HuffmanTree {
            nodes: self.nodes,
            root,
        }
    }
}

impl HuffmanTree {
    pub fn build(table: &FrequencyTable) -> Self {
        let tree = TreeBuilder::new(table).build();
        tracing::debug!(
            leaves = table.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    pub fn leaves(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_internal()).count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((id, d)) = stack.pop() {
            match self.node(id) {
                Node::Leaf(_) => deepest = deepest.max(d),
                Node::Internal { left, right, .. } => {
                    stack.push((*right, d + 1));
                    stack.push((*left, d + 1));
                }
            }
        }
        deepest
    }
}

impl std::fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack = vec![(self.root, 0, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.node(id) {
                Node::Leaf(sf) => writeln!(
                    f,
                    "{}{} -> leaf {:?} [p = {:.6}]",
                    indent, label, sf.symbol, sf.probability
                )?,
                Node::Internal {
                    probability,
                    left,
                    right,
                } => {
                    writeln!(f, "{}{} -> internal [p = {:.6}]", indent, label, probability)?;
                    stack.push((*right, depth + 1, "1"));
                    stack.push((*left, depth + 1, "0"));
                }
            }
        }
        Ok(())
    }
}

pub fn build_tree(table: &FrequencyTable) -> HuffmanTree {
    HuffmanTree::build(table)
}
