// core/hierarchy.rs
//
// Parent-child relationships between game objects, keyed by ObjectId.
// The objects themselves live in the collection; this only tracks links
// and pushes world transforms down from the roots.

use std::collections::HashMap;

use crate::api::types::ObjectId;
use crate::components::{GameObject, WorldTransform};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

/// Transform hierarchy: a forest of objects, roots in registration order.
#[derive(Debug, Default)]
pub struct Hierarchy {
    nodes: HashMap<ObjectId, Node>,
    roots: Vec<ObjectId>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object as a root. Registering twice is a no-op.
    pub fn register(&mut self, id: ObjectId) {
        if self.nodes.contains_key(&id) {
            return;
        }
        self.nodes.insert(id, Node::default());
        self.roots.push(id);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Set the parent of an object. `None` makes it a root.
    /// Fails if either object is unknown or the link would form a cycle.
    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> EngineResult<()> {
        if !self.contains(child) {
            return Err(EngineError::ObjectNotFound(child));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(EngineError::ObjectNotFound(p));
            }
            if self.is_ancestor_or_self(child, p) {
                return Err(EngineError::InvalidParent { child, parent: p });
            }
        }

        // Unlink from the old parent
        if let Some(old) = self.parent(child) {
            if let Some(node) = self.nodes.get_mut(&old) {
                node.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(&p) {
                    node.children.push(child);
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
        Ok(())
    }

    /// True if `ancestor` is `id` or sits above it.
    fn is_ancestor_or_self(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Remove an object. Its children become roots; returns them.
    pub fn remove(&mut self, id: ObjectId) -> Vec<ObjectId> {
        let Some(node) = self.nodes.remove(&id) else {
            return Vec::new();
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for &child in &node.children {
            if let Some(child_node) = self.nodes.get_mut(&child) {
                child_node.parent = None;
            }
            if !self.roots.contains(&child) {
                self.roots.push(child);
            }
        }
        self.roots.retain(|&r| r != id);
        node.children
    }

    /// Recompute every object's world transform from the roots down.
    /// A node missing from `objects` passes its parent's transform straight
    /// through, so its children are still placed.
    pub fn propagate(&self, objects: &mut [GameObject]) {
        let slots: HashMap<ObjectId, usize> = objects.iter().enumerate().map(|(i, o)| (o.id(), i)).collect();
        for &root in &self.roots {
            self.propagate_node(root, WorldTransform::default(), objects, &slots);
        }
    }

    fn propagate_node(
        &self,
        id: ObjectId,
        parent: WorldTransform,
        objects: &mut [GameObject],
        slots: &HashMap<ObjectId, usize>,
    ) {
        let world = match slots.get(&id) {
            Some(&slot) => {
                let world = parent.child(&objects[slot].transform);
                objects[slot].transform.set_world(world);
                world
            }
            None => parent,
        };

        for &child in self.children(id) {
            self.propagate_node(child, world, objects, slots);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}
