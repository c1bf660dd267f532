//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Schema node, type and identity accessors.

use bitflags::bitflags;
use enum_as_inner::EnumAsInner;
use indextree::NodeId;

use crate::context::{Context, IdentityId};

bitflags! {
    /// Schema node flags.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct NodeFlags: u32 {
        /// Writable configuration node.
        const CONFIG_W = 0x01;
        /// Read-only state node.
        const CONFIG_R = 0x02;
        /// List-key leaf.
        const KEY = 0x04;
    }
}

/// YANG schema node kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchemaNodeKind {
    Container,
    Case,
    Choice,
    Leaf,
    LeafList,
    List,
}

/// YANG data value type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataValueType {
    Unknown,
    Binary,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    String,
    Bits,
    Bool,
    Dec64,
    Empty,
    Enum,
    IdentityRef,
    InstanceId,
    LeafRef,
    Union,
    Int8,
    Int16,
    Int32,
    Int64,
}

/// Numeric range restriction, one `(min, max)` pair per range part.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NumRange {
    Signed(Vec<(i64, i64)>),
    Unsigned(Vec<(u64, u64)>),
}

/// One enumeration value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumValue {
    name: String,
    dsc: Option<String>,
}

/// Owned leaf(-list) type description.
#[derive(Clone, Debug)]
pub struct LeafType {
    base: DataValueType,
    details: TypeDetails,
}

/// Per-base-type restrictions and referenced types.
#[derive(Clone, Debug, EnumAsInner)]
pub enum TypeDetails {
    None,
    Num { range: Option<NumRange> },
    Dec { fraction_digits: u8, range: Option<Vec<(i64, i64)>> },
    Str { length: Option<Vec<(u64, u64)>> },
    Enum { values: Vec<EnumValue> },
    IdentityRef { bases: Vec<IdentityId> },
    Union { types: Vec<LeafType> },
    Leafref { path: String, real_type: Box<LeafType> },
}

/// Borrowed module handle.
#[derive(Clone, Copy)]
pub struct SchemaModule<'a> {
    pub(crate) ctx: &'a Context,
    pub(crate) idx: usize,
}

/// Borrowed schema node handle.
#[derive(Clone, Copy)]
pub struct SchemaNode<'a> {
    pub(crate) ctx: &'a Context,
    pub(crate) id: NodeId,
}

/// Borrowed leaf(-list) type handle.
#[derive(Clone, Copy)]
pub struct SchemaLeafType<'a> {
    pub(crate) ctx: &'a Context,
    pub(crate) data: &'a LeafType,
}

/// Borrowed identity handle.
#[derive(Clone, Copy)]
pub struct SchemaIdentity<'a> {
    pub(crate) ctx: &'a Context,
    pub(crate) idx: usize,
}

// ===== impl EnumValue =====

impl EnumValue {
    pub fn new(name: &str) -> EnumValue {
        EnumValue { name: name.to_owned(), dsc: None }
    }

    pub fn with_description(mut self, dsc: &str) -> EnumValue {
        self.dsc = Some(dsc.to_owned());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.dsc.as_deref()
    }
}

// ===== impl LeafType =====

impl LeafType {
    fn num(base: DataValueType) -> LeafType {
        LeafType { base, details: TypeDetails::Num { range: None } }
    }

    pub fn uint8() -> LeafType {
        LeafType::num(DataValueType::Uint8)
    }

    pub fn uint16() -> LeafType {
        LeafType::num(DataValueType::Uint16)
    }

    pub fn uint32() -> LeafType {
        LeafType::num(DataValueType::Uint32)
    }

    pub fn uint64() -> LeafType {
        LeafType::num(DataValueType::Uint64)
    }

    pub fn int8() -> LeafType {
        LeafType::num(DataValueType::Int8)
    }

    pub fn int16() -> LeafType {
        LeafType::num(DataValueType::Int16)
    }

    pub fn int32() -> LeafType {
        LeafType::num(DataValueType::Int32)
    }

    pub fn int64() -> LeafType {
        LeafType::num(DataValueType::Int64)
    }

    pub fn dec64(fraction_digits: u8) -> LeafType {
        LeafType {
            base: DataValueType::Dec64,
            details: TypeDetails::Dec { fraction_digits, range: None },
        }
    }

    pub fn string() -> LeafType {
        LeafType {
            base: DataValueType::String,
            details: TypeDetails::Str { length: None },
        }
    }

    pub fn boolean() -> LeafType {
        LeafType { base: DataValueType::Bool, details: TypeDetails::None }
    }

    pub fn empty() -> LeafType {
        LeafType { base: DataValueType::Empty, details: TypeDetails::None }
    }

    pub fn binary() -> LeafType {
        LeafType { base: DataValueType::Binary, details: TypeDetails::None }
    }

    pub fn enumeration(values: Vec<EnumValue>) -> LeafType {
        LeafType {
            base: DataValueType::Enum,
            details: TypeDetails::Enum { values },
        }
    }

    pub fn identityref(bases: &[IdentityId]) -> LeafType {
        LeafType {
            base: DataValueType::IdentityRef,
            details: TypeDetails::IdentityRef { bases: bases.to_vec() },
        }
    }

    pub fn union(types: Vec<LeafType>) -> LeafType {
        LeafType {
            base: DataValueType::Union,
            details: TypeDetails::Union { types },
        }
    }

    pub fn leafref(path: &str, real_type: LeafType) -> LeafType {
        LeafType {
            base: DataValueType::LeafRef,
            details: TypeDetails::Leafref {
                path: path.to_owned(),
                real_type: Box::new(real_type),
            },
        }
    }

    /// Range restriction for the integer types.
    pub fn with_signed_range(mut self, parts: &[(i64, i64)]) -> LeafType {
        match &mut self.details {
            TypeDetails::Num { range } => {
                *range = Some(NumRange::Signed(parts.to_vec()));
            }
            TypeDetails::Dec { range, .. } => {
                *range = Some(parts.to_vec());
            }
            _ => panic!("signed range on non-numeric type"),
        }
        self
    }

    /// Range restriction for the unsigned integer types.
    pub fn with_unsigned_range(mut self, parts: &[(u64, u64)]) -> LeafType {
        match &mut self.details {
            TypeDetails::Num { range } => {
                *range = Some(NumRange::Unsigned(parts.to_vec()));
            }
            _ => panic!("unsigned range on non-numeric type"),
        }
        self
    }

    /// Length restriction for the string type.
    pub fn with_length(mut self, parts: &[(u64, u64)]) -> LeafType {
        match &mut self.details {
            TypeDetails::Str { length } => {
                *length = Some(parts.to_vec());
            }
            _ => panic!("length on non-string type"),
        }
        self
    }

    pub fn base_type(&self) -> DataValueType {
        self.base
    }
}

// ===== impl SchemaModule =====

impl<'a> SchemaModule<'a> {
    /// Name of the module.
    pub fn name(&self) -> &'a str {
        &self.ctx.modules[self.idx].name
    }

    /// Revision of the module.
    pub fn revision(&self) -> Option<&'a str> {
        self.ctx.modules[self.idx].revision.as_deref()
    }

    /// Return true if the module is implemented, not just imported.
    pub fn is_implemented(&self) -> bool {
        self.ctx.modules[self.idx].implemented
    }

    /// Returns an iterator over the top-level data nodes.
    pub fn data(self) -> impl Iterator<Item = SchemaNode<'a>> + 'a {
        let ctx = self.ctx;
        ctx.modules[self.idx]
            .roots
            .iter()
            .map(move |id| SchemaNode { ctx, id: *id })
    }
}

impl PartialEq for SchemaModule<'_> {
    fn eq(&self, other: &SchemaModule<'_>) -> bool {
        self.idx == other.idx && std::ptr::eq(self.ctx, other.ctx)
    }
}

impl std::fmt::Debug for SchemaModule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaModule")
            .field("name", &self.name())
            .field("revision", &self.revision())
            .finish()
    }
}

// ===== impl SchemaNode =====

impl<'a> SchemaNode<'a> {
    /// Arena ID of the node, stable for the lifetime of the context.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Schema context the node belongs to.
    pub fn context(&self) -> &'a Context {
        self.ctx
    }

    /// Schema node module.
    pub fn module(&self) -> SchemaModule<'a> {
        SchemaModule { ctx: self.ctx, idx: self.ctx.node_data(self.id).module }
    }

    /// Returns the kind of the schema node.
    pub fn kind(&self) -> SchemaNodeKind {
        self.ctx.node_data(self.id).kind
    }

    /// Schema node name.
    pub fn name(&self) -> &'a str {
        &self.ctx.node_data(self.id).name
    }

    /// Description statement.
    pub fn description(&self) -> Option<&'a str> {
        self.ctx.node_data(self.id).dsc.as_deref()
    }

    /// Units of the leaf(-list)'s type.
    pub fn units(&self) -> Option<&'a str> {
        self.ctx.node_data(self.id).units.as_deref()
    }

    /// Returns whether the node is a writable configuration node.
    pub fn is_config(&self) -> bool {
        self.ctx.node_data(self.id).flags.contains(NodeFlags::CONFIG_W)
    }

    /// Returns whether the node is a list's key.
    pub fn is_list_key(&self) -> bool {
        self.ctx.node_data(self.id).flags.contains(NodeFlags::KEY)
    }

    /// Returns whether the node appears only in the schema tree and not in
    /// the data tree.
    pub fn is_schema_only(&self) -> bool {
        matches!(self.kind(), SchemaNodeKind::Choice | SchemaNodeKind::Case)
    }

    /// Parent schema node, if any.
    pub fn parent(&self) -> Option<SchemaNode<'a>> {
        let ctx = self.ctx;
        ctx.arena[self.id].parent().map(|id| SchemaNode { ctx, id })
    }

    /// Returns an iterator over the child schema nodes.
    pub fn children(self) -> impl Iterator<Item = SchemaNode<'a>> + 'a {
        let ctx = self.ctx;
        self.id.children(&ctx.arena).map(move |id| SchemaNode { ctx, id })
    }

    /// Returns an iterator over the keys of the list.
    pub fn list_keys(self) -> impl Iterator<Item = SchemaNode<'a>> + 'a {
        self.children().filter(|snode| {
            snode.kind() == SchemaNodeKind::Leaf && snode.is_list_key()
        })
    }

    /// Type of the leaf(-list) node.
    pub fn leaf_type(&self) -> Option<SchemaLeafType<'a>> {
        let ctx = self.ctx;
        ctx.node_data(self.id)
            .leaf_type
            .as_ref()
            .map(|data| SchemaLeafType { ctx, data })
    }

    /// Extension-provided completion query (`<datastore>:<xpath>`).
    pub fn ext_completion(&self) -> Option<&'a str> {
        self.ctx.node_data(self.id).ext_completion.as_deref()
    }

    /// Extension-provided default value for a list-key leaf.
    pub fn ext_default(&self) -> Option<&'a str> {
        self.ctx.node_data(self.id).ext_default.as_deref()
    }

    /// Generate the data path of the node, prefixing every step with its
    /// module name. Choice and case steps are skipped.
    pub fn path(&self) -> String {
        let mut steps = Vec::new();
        let mut node = Some(*self);
        while let Some(snode) = node {
            if !snode.is_schema_only() {
                steps.push((snode.module().name(), snode.name()));
            }
            node = snode.parent();
        }

        let mut path = String::new();
        for (module, name) in steps.iter().rev() {
            path.push('/');
            path.push_str(module);
            path.push(':');
            path.push_str(name);
        }
        path
    }
}

impl PartialEq for SchemaNode<'_> {
    fn eq(&self, other: &SchemaNode<'_>) -> bool {
        self.id == other.id && std::ptr::eq(self.ctx, other.ctx)
    }
}

impl std::fmt::Debug for SchemaNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaNode")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

// ===== impl SchemaLeafType =====

impl<'a> SchemaLeafType<'a> {
    /// Returns the resolved base type.
    pub fn base_type(&self) -> DataValueType {
        self.data.base
    }

    /// Returns the member types of a union, in definition order.
    pub fn union_types(self) -> impl Iterator<Item = SchemaLeafType<'a>> + 'a {
        let ctx = self.ctx;
        let types = match &self.data.details {
            TypeDetails::Union { types } => types.as_slice(),
            _ => &[],
        };
        types.iter().map(move |data| SchemaLeafType { ctx, data })
    }

    /// Returns the real type of the leafref, corresponding to the first
    /// non-leafref in a possible chain of leafrefs.
    pub fn leafref_real_type(&self) -> Option<SchemaLeafType<'a>> {
        match &self.data.details {
            TypeDetails::Leafref { real_type, .. } => {
                Some(SchemaLeafType { ctx: self.ctx, data: real_type })
            }
            _ => None,
        }
    }

    /// Returns the leafref's target path as written in the schema.
    pub fn leafref_path(&self) -> Option<&'a str> {
        match &self.data.details {
            TypeDetails::Leafref { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the base identities of an identityref.
    pub fn identity_bases(
        self,
    ) -> impl Iterator<Item = SchemaIdentity<'a>> + 'a {
        let ctx = self.ctx;
        let bases = match &self.data.details {
            TypeDetails::IdentityRef { bases } => bases.as_slice(),
            _ => &[],
        };
        bases.iter().map(move |base| SchemaIdentity { ctx, idx: base.0 })
    }

    /// Returns the enumeration values.
    pub fn enum_values(&self) -> &'a [EnumValue] {
        match &self.data.details {
            TypeDetails::Enum { values } => values,
            _ => &[],
        }
    }

    /// Range restriction of an integer type.
    pub fn num_range(&self) -> Option<&'a NumRange> {
        match &self.data.details {
            TypeDetails::Num { range } => range.as_ref(),
            _ => None,
        }
    }

    /// Range restriction of a decimal64 type.
    pub fn dec_range(&self) -> Option<&'a [(i64, i64)]> {
        match &self.data.details {
            TypeDetails::Dec { range, .. } => range.as_deref(),
            _ => None,
        }
    }

    /// Fraction digits of a decimal64 type.
    pub fn fraction_digits(&self) -> u8 {
        match &self.data.details {
            TypeDetails::Dec { fraction_digits, .. } => *fraction_digits,
            _ => 0,
        }
    }

    /// Length restriction of a string type.
    pub fn str_length(&self) -> Option<&'a [(u64, u64)]> {
        match &self.data.details {
            TypeDetails::Str { length } => length.as_deref(),
            _ => None,
        }
    }

    /// Searches the derivation graph of the identityref's bases for an
    /// identity of the given name and returns its defining module.
    pub fn identityref_module(&self, name: &str) -> Option<&'a str> {
        let ctx = self.ctx;
        let TypeDetails::IdentityRef { bases } = &self.data.details else {
            return None;
        };
        bases
            .iter()
            .find_map(|base| identity_search(ctx, base.0, name))
    }
}

impl std::fmt::Debug for SchemaLeafType<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaLeafType")
            .field("base_type", &self.base_type())
            .finish()
    }
}

fn identity_search<'a>(
    ctx: &'a Context,
    idx: usize,
    name: &str,
) -> Option<&'a str> {
    let ident = SchemaIdentity { ctx, idx };
    if ident.name() == name {
        return Some(ident.module_name());
    }
    ctx.identities[idx]
        .derived
        .iter()
        .find_map(|derived| identity_search(ctx, *derived, name))
}

// ===== impl SchemaIdentity =====

impl<'a> SchemaIdentity<'a> {
    /// Name of the identity.
    pub fn name(&self) -> &'a str {
        &self.ctx.identities[self.idx].name
    }

    /// Name of the module defining the identity.
    pub fn module_name(&self) -> &'a str {
        let module = self.ctx.identities[self.idx].module;
        &self.ctx.modules[module].name
    }

    /// Description statement.
    pub fn description(&self) -> Option<&'a str> {
        self.ctx.identities[self.idx].dsc.as_deref()
    }

    /// Returns an iterator over the directly derived identities.
    pub fn derived(self) -> impl Iterator<Item = SchemaIdentity<'a>> + 'a {
        let ctx = self.ctx;
        ctx.identities[self.idx]
            .derived
            .iter()
            .map(move |idx| SchemaIdentity { ctx, idx: *idx })
    }

    /// Returns whether any identity is derived from this one.
    pub fn has_derived(&self) -> bool {
        !self.ctx.identities[self.idx].derived.is_empty()
    }
}

impl std::fmt::Debug for SchemaIdentity<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaIdentity")
            .field("name", &self.name())
            .finish()
    }
}

// ===== global functions =====

/// Searches a sibling list for a writable configuration node of the given
/// name. Choice and case nodes are searched transparently. The owning
/// module is deliberately not checked so that augmented children are found.
pub fn find_child<'a>(
    children: impl Iterator<Item = SchemaNode<'a>>,
    name: &str,
) -> Option<SchemaNode<'a>> {
    for snode in children {
        if !snode.is_config() {
            continue;
        }
        if snode.is_schema_only() {
            if let Some(found) = find_child(snode.children(), name) {
                return Some(found);
            }
            continue;
        }
        if snode.name() == name {
            return Some(snode);
        }
    }

    None
}

/// Resolves a leafref path against the xpath of the referring node.
/// Absolute paths are returned as-is; relative paths consume one trailing
/// step (predicates included) per leading `../`.
pub fn leafref_target_xpath(path: &str, current_xpath: &str) -> String {
    if path.starts_with('/') {
        return path.to_owned();
    }

    let mut base = current_xpath;
    let mut rest = path;
    while let Some(stripped) = rest.strip_prefix("../") {
        rest = stripped;
        base = xpath_parent(base);
    }

    format!("{}/{}", base, rest)
}

// Cuts the last step (including its predicates) off an xpath.
fn xpath_parent(xpath: &str) -> &str {
    let mut depth = 0usize;
    for (pos, ch) in xpath.char_indices().rev() {
        match ch {
            ']' => depth += 1,
            '[' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => return &xpath[..pos],
            _ => (),
        }
    }
    ""
}

/// Returns whether a module is housekeeping machinery that must be hidden
/// from parsing. The access-control module is hidden only when NACM
/// support is disabled. Modules without a revision are never internal.
pub fn module_is_internal(
    module: &SchemaModule<'_>,
    enable_nacm: bool,
) -> bool {
    let Some(revision) = module.revision() else {
        return false;
    };

    matches!(
        (module.name(), revision),
        ("ietf-yang-metadata", "2016-08-05")
            | ("yang", "2021-04-07")
            | ("ietf-inet-types", "2013-07-15")
            | ("ietf-yang-types", "2013-07-15")
            | ("ietf-datastores", "2018-02-14")
            | ("ietf-netconf-with-defaults", "2011-06-01")
            | ("ietf-origin", "2018-02-14")
            | ("ietf-netconf-notifications", "2012-02-06")
    ) || matches!(
        module.name(),
        "ietf-yang-schema-mount" | "ietf-yang-library" | "ietf-netconf"
    ) || (module.name() == "ietf-netconf-acm" && !enable_nacm)
}

// ===== tests =====
