//! Binary tree of node ids stored in a flat pool.
//!
//! Children are indices into `nodes`, and every walk is iterative, so a
//! degenerate (list-shaped) tree from hostile input cannot exhaust the stack.

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspNode {
    pub data: u16,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() { None } else { Some(0) }
    }

    pub fn node(&self, id: NodeId) -> Option<&BspNode> {
        self.nodes.get(id)
    }

    /// Inserts `data`; values less than or equal to a node go left.
    pub fn insert(&mut self, data: u16) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(BspNode {
            data,
            left: None,
            right: None,
        });
        if id == 0 {
            return id;
        }

        let mut current = 0;
        loop {
            let node = &mut self.nodes[current];
            let slot = if data <= node.data {
                &mut node.left
            } else {
                &mut node.right
            };
            match *slot {
                Some(next) => current = next,
                None => {
                    *slot = Some(id);
                    return id;
                }
            }
        }
    }

    /// First node on the search path holding `data`.
    pub fn find(&self, data: u16) -> Option<NodeId> {
        let mut current = self.root();
        while let Some(id) = current {
            let node = &self.nodes[id];
            if node.data == data {
                return Some(id);
            }
            current = if data <= node.data { node.left } else { node.right };
        }
        None
    }

    /// Node data in pre-order (node, left subtree, right subtree).
    pub fn pre_order(&self) -> Vec<u16> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root().into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            out.push(node.data);
            stack.extend(node.right);
            stack.extend(node.left);
        }
        out
    }
}
