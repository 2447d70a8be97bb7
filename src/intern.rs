//! Handle table for live DOM nodes.
//!
//! Each interned node is stamped with its handle, so finding it again is a
//! map lookup rather than a scan. Nodes that have left the document are
//! dropped whenever a new node is interned. A dropped node that comes back
//! keeps the handle its stamp names.

#[cfg(test)]
#[path = "intern_test.rs"]
mod intern_test;

use std::collections::HashMap;

/// A node of a live document, as the intern table needs it.
pub trait LiveNode {
    /// Whether `self` and `other` are the same node.
    fn same_node(&self, other: &Self) -> bool;
    /// Whether the node is attached to its document.
    fn is_connected(&self) -> bool;
    /// Handle stamped on the node, if any.
    fn stamp(&self) -> Option<usize>;
    fn set_stamp(&self, handle: usize);
}

/// Maps handles to live nodes. Handle 0 is the node the table was created with.
#[derive(Debug)]
pub struct InternTable<N> {
    nodes: HashMap<usize, N>,
    next: usize,
}

impl<N: LiveNode> InternTable<N> {
    #[must_use]
    pub fn new(root: N) -> Self {
        let mut table = Self { nodes: HashMap::new(), next: 0 };
        table.intern(root);
        table
    }

    /// Handle for `node`, issuing a new one if the node carries no usable stamp.
    pub fn intern(&mut self, node: N) -> usize {
        if let Some(handle) = node.stamp().filter(|h| *h < self.next) {
            match self.nodes.get(&handle) {
                Some(known) if known.same_node(&node) => return handle,
                // A clone carried the stamp over from its source.
                Some(_) => {}
                None => {
                    self.nodes.insert(handle, node);
                    return handle;
                }
            }
        }

        self.nodes.retain(|_, known| known.is_connected());
        let handle = self.next;
        self.next += 1;
        node.set_stamp(handle);
        self.nodes.insert(handle, node);
        handle
    }

    #[must_use]
    pub fn get(&self, handle: usize) -> Option<&N> {
        self.nodes.get(&handle)
    }

    /// Number of nodes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
