//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Parsed expressions and the XPath builder.

use std::fmt::Write;

use bitflags::bitflags;

/// Positional attribute tag: what kind of token position an expression or
/// completion currently represents.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Pat {
    #[default]
    None,
    Container,
    List,
    ListKey,
    ListKeyIncomplete,
    Leaf,
    LeafValue,
    LeafEmpty,
    LeafList,
    LeafListValue,
}

bitflags! {
    /// Filter mask over [`Pat`], used by the completion renderer.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct PatMask: u16 {
        const NONE = 0x0001;
        const CONTAINER = 0x0002;
        const LIST = 0x0004;
        const LIST_KEY = 0x0008;
        const LIST_KEY_INCOMPLETE = 0x0010;
        const LEAF = 0x0020;
        const LEAF_VALUE = 0x0040;
        const LEAF_EMPTY = 0x0080;
        const LEAFLIST = 0x0100;
        const LEAFLIST_VALUE = 0x0200;
    }
}

/// One addressed configuration target.
#[derive(Clone, Debug, Default)]
pub struct Expr {
    /// Absolute XPath, built incrementally; empty until the first step.
    pub xpath: String,
    /// Assigned value, present only for leaf assignments.
    pub value: Option<String>,
    /// Set once at least one schema step has been appended. Inactive
    /// expressions are discarded at the end of parsing.
    pub active: bool,
    pub pat: Pat,
    /// Count of input tokens consumed into this expression.
    pub args_num: usize,
    /// `args_num` value at which the most recent list or leaf-list started.
    pub list_pos: usize,
    /// Concatenation of the most recently built list-key predicates.
    pub last_keys: String,
    /// Depth in the schema container/list hierarchy.
    pub tree_depth: usize,
}

// ===== impl Pat =====

impl Pat {
    /// Mask bit of this tag.
    pub fn mask(self) -> PatMask {
        match self {
            Pat::None => PatMask::NONE,
            Pat::Container => PatMask::CONTAINER,
            Pat::List => PatMask::LIST,
            Pat::ListKey => PatMask::LIST_KEY,
            Pat::ListKeyIncomplete => PatMask::LIST_KEY_INCOMPLETE,
            Pat::Leaf => PatMask::LEAF,
            Pat::LeafValue => PatMask::LEAF_VALUE,
            Pat::LeafEmpty => PatMask::LEAF_EMPTY,
            Pat::LeafList => PatMask::LEAFLIST,
            Pat::LeafListValue => PatMask::LEAFLIST_VALUE,
        }
    }
}

impl std::fmt::Display for Pat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pat::None => "NONE",
            Pat::Container => "CONTAINER",
            Pat::List => "LIST",
            Pat::ListKey => "LIST_KEY",
            Pat::ListKeyIncomplete => "LIST_KEY_INCOMPLETE",
            Pat::Leaf => "LEAF",
            Pat::LeafValue => "LEAF_VALUE",
            Pat::LeafEmpty => "LEAF_EMPTY",
            Pat::LeafList => "LEAFLIST",
            Pat::LeafListValue => "LEAFLIST_VALUE",
        };
        write!(f, "{}", name)
    }
}

// ===== impl Expr =====

impl Expr {
    /// Appends a `/prefix:name` step and activates the expression.
    pub(crate) fn add_node(&mut self, prefix: &str, name: &str) {
        write!(self.xpath, "/{}:{}", prefix, name).unwrap();
        self.args_num += 1;
        self.active = true;
    }

    /// Appends a `[key="value"]` predicate with C-style escaping of the
    /// value. The predicate is also recorded in `last_keys`.
    pub(crate) fn add_list_key(
        &mut self,
        key: &str,
        value: &str,
        inc_args_num: bool,
    ) {
        let predicate = format!("[{}=\"{}\"]", key, c_escape(value));
        self.xpath.push_str(&predicate);
        self.last_keys.push_str(&predicate);
        if inc_args_num {
            self.args_num += 1;
        }
    }

    /// Appends a `[.='value']` predicate, with an optional identity module
    /// prefix. `last_keys` records the raw value.
    pub(crate) fn add_leaflist_value(
        &mut self,
        prefix: Option<&str>,
        value: &str,
    ) {
        match prefix {
            Some(prefix) => {
                write!(self.xpath, "[.='{}:{}']", prefix, value).unwrap()
            }
            None => write!(self.xpath, "[.='{}']", value).unwrap(),
        }
        self.last_keys.push_str(value);
        self.args_num += 1;
    }
}

// C-style string escaping for list-key predicate values.
pub(crate) fn c_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node() {
        let mut expr = Expr::default();
        assert!(!expr.active);
        expr.add_node("m", "sys");
        expr.add_node("m", "hostname");
        assert_eq!(expr.xpath, "/m:sys/m:hostname");
        assert_eq!(expr.args_num, 2);
        assert!(expr.active);
    }

    #[test]
    fn test_add_list_key() {
        let mut expr = Expr::default();
        expr.add_node("m", "iface");
        expr.add_list_key("name", "eth0", true);
        assert_eq!(expr.xpath, "/m:iface[name=\"eth0\"]");
        assert_eq!(expr.last_keys, "[name=\"eth0\"]");
        assert_eq!(expr.args_num, 2);

        // Default keys do not count as consumed arguments.
        expr.add_list_key("vrf", "main", false);
        assert_eq!(expr.args_num, 2);
    }

    #[test]
    fn test_add_leaflist_value() {
        let mut expr = Expr::default();
        expr.add_node("m", "dns");
        expr.add_leaflist_value(None, "10.0.0.1");
        assert_eq!(expr.xpath, "/m:dns[.='10.0.0.1']");
        assert_eq!(expr.last_keys, "10.0.0.1");

        let mut expr = Expr::default();
        expr.add_node("m", "proto");
        expr.add_leaflist_value(Some("n"), "tcp");
        assert_eq!(expr.xpath, "/m:proto[.='n:tcp']");
        assert_eq!(expr.last_keys, "tcp");
    }

    #[test]
    fn test_c_escape() {
        assert_eq!(c_escape("plain"), "plain");
        assert_eq!(c_escape("a\"b"), "a\\\"b");
        assert_eq!(c_escape("a\\b"), "a\\\\b");
        assert_eq!(c_escape("a\nb\tc"), "a\\nb\\tc");
    }

    #[test]
    fn test_pat_mask() {
        assert!(PatMask::all().contains(Pat::ListKey.mask()));
        assert!(!PatMask::LEAF_VALUE.contains(Pat::ListKey.mask()));
    }
}
