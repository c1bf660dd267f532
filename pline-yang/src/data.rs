//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Minimal instance-data tree, as returned by datastore queries.
//!
//! Only the attributes the completion renderer needs are modeled: the
//! schema node an instance belongs to, its canonical value, and whether it
//! was created implicitly from a schema default.

use indextree::NodeId;

/// Instance-data tree.
#[derive(Clone, Debug, Default)]
pub struct DataTree {
    roots: Vec<DataNode>,
}

/// One instance-data node.
#[derive(Clone, Debug)]
pub struct DataNode {
    schema: NodeId,
    value: Option<String>,
    default: bool,
    children: Vec<DataNode>,
}

// ===== impl DataTree =====

impl DataTree {
    pub fn new() -> DataTree {
        DataTree::default()
    }

    pub fn push(&mut self, node: DataNode) {
        self.roots.push(node);
    }

    /// Returns an iterator over the top-level instance nodes.
    pub fn roots(&self) -> impl Iterator<Item = &DataNode> {
        self.roots.iter()
    }
}

impl FromIterator<DataNode> for DataTree {
    fn from_iter<I: IntoIterator<Item = DataNode>>(iter: I) -> DataTree {
        DataTree { roots: iter.into_iter().collect() }
    }
}

// ===== impl DataNode =====

impl DataNode {
    pub fn new(schema: NodeId) -> DataNode {
        DataNode { schema, value: None, default: false, children: Vec::new() }
    }

    pub fn with_value(mut self, value: &str) -> DataNode {
        self.value = Some(value.to_owned());
        self
    }

    /// Marks the instance as implicitly created from a schema default.
    pub fn with_default(mut self) -> DataNode {
        self.default = true;
        self
    }

    pub fn with_child(mut self, child: DataNode) -> DataNode {
        self.children.push(child);
        self
    }

    /// Schema node this instance belongs to.
    pub fn schema_id(&self) -> NodeId {
        self.schema
    }

    /// Canonical value of a leaf(-list) instance.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns whether the instance was created from a schema default.
    pub fn is_default(&self) -> bool {
        self.default
    }

    /// Returns an iterator over the child instances.
    pub fn children(&self) -> impl Iterator<Item = &DataNode> {
        self.children.iter()
    }
}
