//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Compiled YANG schema model for the pline command-line engine.
//!
//! Schema compilation itself is out of scope: the embedding application
//! builds the compiled tree programmatically (from its own schema source)
//! and hands the resulting [`Context`] to the parser.

pub mod context;
pub mod data;
pub mod schema;

pub use indextree::NodeId;

pub use crate::context::{Context, IdentityId, ModuleId};
pub use crate::data::{DataNode, DataTree};
pub use crate::schema::{
    DataValueType, EnumValue, LeafType, NodeFlags, NumRange, SchemaIdentity,
    SchemaLeafType, SchemaModule, SchemaNode, SchemaNodeKind, TypeDetails,
    find_child, leafref_target_xpath, module_is_internal,
};
