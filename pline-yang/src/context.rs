//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Schema context: module and identity tables plus the compiled node tree.

use indextree::{Arena, NodeId};

use crate::schema::{
    LeafType, NodeFlags, SchemaModule, SchemaNode, SchemaNodeKind,
};

/// Compiled-schema handle.
///
/// Owns every module, node and identity. Nodes are stored in an arena and
/// referenced by [`NodeId`]; the borrow wrappers in [`crate::schema`] pair
/// an ID with a context reference.
#[derive(Debug)]
pub struct Context {
    pub(crate) arena: Arena<NodeData>,
    pub(crate) modules: Vec<ModuleData>,
    pub(crate) identities: Vec<IdentityData>,
}

/// Handle to a module added to a [`Context`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModuleId(pub(crate) usize);

/// Handle to an identity added to a [`Context`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IdentityId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct ModuleData {
    pub(crate) name: String,
    pub(crate) revision: Option<String>,
    pub(crate) implemented: bool,
    // Top-level data nodes defined by this module. Augmented nodes live
    // inside the target module's tree and are not listed here.
    pub(crate) roots: Vec<NodeId>,
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) module: usize,
    pub(crate) name: String,
    pub(crate) kind: SchemaNodeKind,
    pub(crate) flags: NodeFlags,
    pub(crate) dsc: Option<String>,
    pub(crate) units: Option<String>,
    pub(crate) leaf_type: Option<LeafType>,
    pub(crate) ext_completion: Option<String>,
    pub(crate) ext_default: Option<String>,
}

#[derive(Debug)]
pub(crate) struct IdentityData {
    pub(crate) name: String,
    pub(crate) module: usize,
    pub(crate) dsc: Option<String>,
    pub(crate) derived: Vec<usize>,
}

// ===== impl Context =====

impl Context {
    pub fn new() -> Context {
        Context {
            arena: Arena::new(),
            modules: Vec::new(),
            identities: Vec::new(),
        }
    }

    /// Returns an iterator over all modules, in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = SchemaModule<'_>> {
        (0..self.modules.len()).map(move |idx| SchemaModule { ctx: self, idx })
    }

    /// Returns the module with the given name.
    pub fn get_module(&self, name: &str) -> Option<SchemaModule<'_>> {
        self.modules().find(|module| module.name() == name)
    }

    /// Returns the node behind an arena ID.
    pub fn node(&self, id: NodeId) -> SchemaNode<'_> {
        SchemaNode { ctx: self, id }
    }

    /// Get a schema node based on the given data path. Steps may carry a
    /// `module:` prefix and a trailing predicate, both of which are
    /// honored resp. ignored. Choice and case nodes are transparent.
    pub fn find_path(&self, path: &str) -> Option<SchemaNode<'_>> {
        let mut current: Option<SchemaNode<'_>> = None;

        for step in path.split('/').filter(|step| !step.is_empty()) {
            let step = match step.find('[') {
                Some(pos) => &step[..pos],
                None => step,
            };
            let (module, name) = match step.split_once(':') {
                Some((module, name)) => (Some(module), name),
                None => (None, step),
            };

            let children = match current {
                Some(node) => node.children().collect(),
                None => self
                    .modules()
                    .flat_map(|module| module.data())
                    .collect::<Vec<_>>(),
            };
            current = Some(self.find_data_child(children, module, name)?);
        }

        current
    }

    fn find_data_child<'a>(
        &'a self,
        children: Vec<SchemaNode<'a>>,
        module: Option<&str>,
        name: &str,
    ) -> Option<SchemaNode<'a>> {
        for snode in children {
            if snode.is_schema_only() {
                let children = snode.children().collect();
                if let Some(found) =
                    self.find_data_child(children, module, name)
                {
                    return Some(found);
                }
                continue;
            }
            if snode.name() != name {
                continue;
            }
            if let Some(module) = module
                && snode.module().name() != module
            {
                continue;
            }
            return Some(snode);
        }

        None
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    // ===== schema construction =====

    pub fn add_module(
        &mut self,
        name: &str,
        revision: Option<&str>,
    ) -> ModuleId {
        self.modules.push(ModuleData {
            name: name.to_owned(),
            revision: revision.map(str::to_owned),
            implemented: true,
            roots: Vec::new(),
        });
        ModuleId(self.modules.len() - 1)
    }

    pub fn set_implemented(&mut self, module: ModuleId, implemented: bool) {
        self.modules[module.0].implemented = implemented;
    }

    pub fn add_identity(
        &mut self,
        module: ModuleId,
        name: &str,
        bases: &[IdentityId],
    ) -> IdentityId {
        self.identities.push(IdentityData {
            name: name.to_owned(),
            module: module.0,
            dsc: None,
            derived: Vec::new(),
        });
        let id = IdentityId(self.identities.len() - 1);
        for base in bases {
            self.identities[base.0].derived.push(id.0);
        }
        id
    }

    pub fn add_container(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        name: &str,
    ) -> NodeId {
        self.add_node(module, parent, SchemaNodeKind::Container, name, None)
    }

    pub fn add_list(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        name: &str,
    ) -> NodeId {
        self.add_node(module, parent, SchemaNodeKind::List, name, None)
    }

    pub fn add_choice(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        name: &str,
    ) -> NodeId {
        self.add_node(module, parent, SchemaNodeKind::Choice, name, None)
    }

    pub fn add_case(
        &mut self,
        module: ModuleId,
        parent: NodeId,
        name: &str,
    ) -> NodeId {
        self.add_node(module, Some(parent), SchemaNodeKind::Case, name, None)
    }

    pub fn add_leaf(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        name: &str,
        leaf_type: LeafType,
    ) -> NodeId {
        self.add_node(
            module,
            parent,
            SchemaNodeKind::Leaf,
            name,
            Some(leaf_type),
        )
    }

    /// Adds a list-key leaf. Key order follows insertion order.
    pub fn add_key_leaf(
        &mut self,
        module: ModuleId,
        parent: NodeId,
        name: &str,
        leaf_type: LeafType,
    ) -> NodeId {
        let id = self.add_node(
            module,
            Some(parent),
            SchemaNodeKind::Leaf,
            name,
            Some(leaf_type),
        );
        self.arena[id].get_mut().flags |= NodeFlags::KEY;
        id
    }

    pub fn add_leaf_list(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        name: &str,
        leaf_type: LeafType,
    ) -> NodeId {
        self.add_node(
            module,
            parent,
            SchemaNodeKind::LeafList,
            name,
            Some(leaf_type),
        )
    }

    fn add_node(
        &mut self,
        module: ModuleId,
        parent: Option<NodeId>,
        kind: SchemaNodeKind,
        name: &str,
        leaf_type: Option<LeafType>,
    ) -> NodeId {
        let id = self.arena.new_node(NodeData {
            module: module.0,
            name: name.to_owned(),
            kind,
            flags: NodeFlags::CONFIG_W,
            dsc: None,
            units: None,
            leaf_type,
            ext_completion: None,
            ext_default: None,
        });
        match parent {
            Some(parent) => parent.append(id, &mut self.arena),
            None => self.modules[module.0].roots.push(id),
        }
        id
    }

    pub fn set_config(&mut self, node: NodeId, config: bool) {
        let flags = &mut self.arena[node].get_mut().flags;
        if config {
            flags.remove(NodeFlags::CONFIG_R);
            flags.insert(NodeFlags::CONFIG_W);
        } else {
            flags.remove(NodeFlags::CONFIG_W);
            flags.insert(NodeFlags::CONFIG_R);
        }
    }

    pub fn set_description(&mut self, node: NodeId, dsc: &str) {
        self.arena[node].get_mut().dsc = Some(dsc.to_owned());
    }

    pub fn set_units(&mut self, node: NodeId, units: &str) {
        self.arena[node].get_mut().units = Some(units.to_owned());
    }

    pub fn set_identity_description(&mut self, ident: IdentityId, dsc: &str) {
        self.identities[ident.0].dsc = Some(dsc.to_owned());
    }

    /// Attaches an extension-provided completion query to a node. The
    /// string is of the form `<datastore>:<xpath>`.
    pub fn set_ext_completion(&mut self, node: NodeId, xpath: &str) {
        self.arena[node].get_mut().ext_completion = Some(xpath.to_owned());
    }

    /// Attaches an extension-provided default value to a list-key leaf.
    pub fn set_ext_default(&mut self, node: NodeId, value: &str) {
        self.arena[node].get_mut().ext_default = Some(value.to_owned());
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::new()
    }
}
