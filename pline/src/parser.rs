//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! The schema-directed parser: walks the compiled schema tree in lock-step
//! with the input arguments, emitting XPath expressions and recording
//! completion candidates at every terminal point.

use derive_new::new;
use enum_as_inner::EnumAsInner;
use pline_yang::{
    DataValueType, SchemaLeafType, SchemaModule, SchemaNode, SchemaNodeKind,
    find_child, leafref_target_xpath, module_is_internal,
};

use crate::expr::{Expr, Pat};
use crate::opts::ParseOpts;
use crate::session::{Datastore, Session, parse_ext_xpath};

/// What a completion suggests: schema child names or values of a
/// leaf(-list) type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumAsInner)]
pub enum CompletionKind {
    Node,
    Type,
}

/// One suggestion source to be rendered.
#[derive(Clone, Debug, new)]
pub struct Completion<'a> {
    pub kind: CompletionKind,
    pub node: Option<SchemaNode<'a>>,
    /// For `Type` completions, an existing-data query; for `Node`
    /// completions, the xpath of the suggested step.
    pub xpath: Option<String>,
    /// Datastore the `xpath` query targets.
    pub xpath_ds: Datastore,
    /// Position the user is in, not the kind of node being suggested.
    pub pat: Pat,
}

/// Result of parsing one command line.
#[derive(Debug)]
pub struct ParseLine<'a> {
    pub(crate) sess: &'a Session,
    pub exprs: Vec<Expr>,
    pub compls: Vec<Completion<'a>>,
    /// Set when at least one input token could not be consumed against any
    /// module.
    pub invalid: bool,
}

// Captured state of the expression under construction, taken just before
// descending into a leaf or leaf-list. A completed expression rolls back
// to this point so the next sibling edit shares the xpath prefix.
#[derive(Debug, Default)]
struct RollbackMemo {
    xpath: String,
    args_num: usize,
    list_pos: usize,
    tree_depth: usize,
}

// Named-key consumption state for one list key.
struct KeyState<'a> {
    snode: SchemaNode<'a>,
    dflt: Option<&'a str>,
    specified: bool,
}

// ===== impl ParseLine =====

impl<'a> ParseLine<'a> {
    fn new(sess: &'a Session) -> ParseLine<'a> {
        ParseLine { sess, exprs: Vec::new(), compls: Vec::new(), invalid: false }
    }

    /// Returns the last expression, creating an empty one if none exists.
    pub fn current_expr(&mut self) -> &Expr {
        self.ensure_expr();
        self.exprs.last().unwrap()
    }

    fn ensure_expr(&mut self) {
        if self.exprs.is_empty() {
            self.exprs.push(Expr::default());
        }
    }

    fn last_expr(&self) -> &Expr {
        self.exprs.last().unwrap()
    }

    fn last_expr_mut(&mut self) -> &mut Expr {
        self.exprs.last_mut().unwrap()
    }

    fn add_expr_from(&mut self, memo: &RollbackMemo) {
        self.exprs.push(Expr {
            xpath: memo.xpath.clone(),
            args_num: memo.args_num,
            list_pos: memo.list_pos,
            tree_depth: memo.tree_depth,
            ..Default::default()
        });
    }

    fn add_compl(
        &mut self,
        kind: CompletionKind,
        node: Option<SchemaNode<'a>>,
        xpath: Option<String>,
        xpath_ds: Datastore,
        pat: Pat,
    ) {
        self.compls.push(Completion::new(kind, node, xpath, xpath_ds, pat));
    }

    // Enumerates the writable children of a node (or of the module root)
    // as `Node` completions. List-key leaves are skipped since they are
    // surfaced through the list's own key handling; choice and case nodes
    // are recursed into transparently.
    fn add_compl_subtree(
        &mut self,
        module: SchemaModule<'a>,
        node: Option<SchemaNode<'a>>,
        xpath: &str,
    ) {
        match node {
            Some(snode) => {
                self.add_compl_subtree_children(snode.children(), xpath)
            }
            None => self.add_compl_subtree_children(module.data(), xpath),
        }
    }

    fn add_compl_subtree_children(
        &mut self,
        children: impl Iterator<Item = SchemaNode<'a>>,
        xpath: &str,
    ) {
        for snode in children {
            if !snode.is_config() {
                continue;
            }
            if snode.kind() == SchemaNodeKind::Leaf && snode.is_list_key() {
                continue;
            }
            if snode.is_schema_only() {
                self.add_compl_subtree_children(snode.children(), xpath);
                continue;
            }
            let pat = match snode.kind() {
                SchemaNodeKind::Container => Pat::Container,
                SchemaNodeKind::Leaf => Pat::Leaf,
                SchemaNodeKind::LeafList => Pat::LeafList,
                SchemaNodeKind::List => Pat::List,
                _ => continue,
            };
            let node_xpath = format!(
                "{}/{}:{}",
                xpath,
                snode.module().name(),
                snode.name()
            );
            self.add_compl(
                CompletionKind::Node,
                Some(snode),
                Some(node_xpath),
                Datastore::EDIT,
                pat,
            );
        }
    }

    // A leaf completion expands into up to three records: an
    // extension-provided existing-data query, the node's own type, and one
    // existing-data query per leafref found inside the type.
    fn add_compl_leaf(&mut self, snode: SchemaNode<'a>, xpath: &str, pat: Pat) {
        let Some(ltype) = snode.leaf_type() else {
            return;
        };

        if let Some(ext) = snode.ext_completion() {
            let (ds, ext_xpath) = parse_ext_xpath(ext);
            self.add_compl(
                CompletionKind::Type,
                None,
                Some(ext_xpath.to_owned()),
                ds,
                pat,
            );
        }
        self.add_compl(
            CompletionKind::Type,
            Some(snode),
            Some(xpath.to_owned()),
            Datastore::EDIT,
            pat,
        );
        self.add_compl_leafref(ltype, xpath, pat);
    }

    fn add_compl_leafref(
        &mut self,
        ltype: SchemaLeafType<'a>,
        xpath: &str,
        pat: Pat,
    ) {
        match ltype.base_type() {
            DataValueType::Union => {
                for member in ltype.union_types() {
                    self.add_compl_leafref(member, xpath, pat);
                }
            }
            DataValueType::LeafRef => {
                let compl_xpath = leafref_target_xpath(
                    ltype.leafref_path().unwrap(),
                    xpath,
                );
                self.add_compl(
                    CompletionKind::Type,
                    None,
                    Some(compl_xpath),
                    Datastore::EDIT,
                    pat,
                );
            }
            _ => (),
        }
    }

    // Attempts to parse the argument vector against one module. Returns
    // true when the module's root recognized the first step.
    fn parse_module(
        &mut self,
        module: SchemaModule<'a>,
        argv: &[String],
        opts: &ParseOpts,
    ) -> bool {
        let mut idx = 0;
        let mut node: Option<SchemaNode<'a>> = None;
        let mut memo = RollbackMemo::default();
        let mut rollback = false;

        // The same parse line collects completions across module attempts;
        // the line is invalid only when no module recognizes the input.
        self.invalid = false;

        loop {
            self.ensure_expr();
            let mut token = argv.get(idx).map(String::as_str);
            let is_rollback = rollback;
            let mut next_arg = true;
            rollback = false;

            if let Some(snode) = node
                && !is_rollback
            {
                // Only leaf and leaf-list nodes allow rolling the path
                // back to add further statements on the same line.
                if matches!(
                    snode.kind(),
                    SchemaNodeKind::Leaf | SchemaNodeKind::LeafList
                ) {
                    let expr = self.last_expr();
                    memo = RollbackMemo {
                        xpath: expr.xpath.clone(),
                        args_num: expr.args_num,
                        list_pos: expr.list_pos,
                        tree_depth: expr.tree_depth,
                    };
                }
                let (prefix, name) = (snode.module().name(), snode.name());
                self.last_expr_mut().add_node(prefix, name);
            }

            match node {
                // Root of the module.
                None => {
                    let Some(t) = token else {
                        let xpath = self.last_expr().xpath.clone();
                        self.add_compl_subtree(module, None, &xpath);
                        break;
                    };
                    node = find_child(module.data(), t);
                }

                Some(snode) => match snode.kind() {
                    SchemaNodeKind::Container => {
                        {
                            let expr = self.last_expr_mut();
                            expr.pat = Pat::Container;
                            expr.tree_depth += 1;
                        }
                        let Some(t) = token else {
                            let xpath = self.last_expr().xpath.clone();
                            self.add_compl_subtree(module, Some(snode), &xpath);
                            break;
                        };
                        node = find_child(snode.children(), t);
                    }

                    SchemaNodeKind::List => {
                        {
                            let expr = self.last_expr_mut();
                            expr.pat = Pat::List;
                            expr.list_pos = expr.args_num;
                            expr.last_keys.clear();
                        }

                        if !is_rollback {
                            let mut break_outer = false;

                            if !opts.keys_w_stmt {
                                // Positional keys, in schema order.
                                for key in snode.list_keys() {
                                    let Some(t) = token else {
                                        let xpath = format!(
                                            "{}/{}",
                                            self.last_expr().xpath,
                                            key.name()
                                        );
                                        self.add_compl_leaf(
                                            key,
                                            &xpath,
                                            Pat::ListKey,
                                        );
                                        break_outer = true;
                                        break;
                                    };
                                    self.last_expr_mut()
                                        .add_list_key(key.name(), t, true);
                                    idx += 1;
                                    token =
                                        argv.get(idx).map(String::as_str);
                                    self.last_expr_mut().pat = Pat::ListKey;
                                }
                            } else {
                                // Named keys, in arbitrary order.
                                let mut keys = snode
                                    .list_keys()
                                    .map(|snode| KeyState {
                                        snode,
                                        dflt: if opts.default_keys {
                                            snode.ext_default()
                                        } else {
                                            None
                                        },
                                        specified: false,
                                    })
                                    .collect::<Vec<_>>();
                                let first_key_is_optional = keys
                                    .first()
                                    .is_some_and(|key| key.dflt.is_some());
                                let mut specified_num = 0;

                                while specified_num < keys.len() {
                                    let cur;
                                    if specified_num == 0
                                        && !opts.first_key_w_stmt
                                        && !first_key_is_optional
                                    {
                                        // The first key is positional.
                                        cur = 0;
                                    } else {
                                        let Some(t) = token else {
                                            break;
                                        };
                                        let Some(pos) =
                                            keys.iter().position(|key| {
                                                key.snode.name() == t
                                            })
                                        else {
                                            break;
                                        };
                                        if keys[pos].specified {
                                            break;
                                        }
                                        cur = pos;
                                        self.last_expr_mut().args_num += 1;
                                        idx += 1;
                                        token = argv
                                            .get(idx)
                                            .map(String::as_str);
                                        self.last_expr_mut().pat =
                                            Pat::ListKeyIncomplete;
                                    }

                                    let Some(t) = token else {
                                        let key = keys[cur].snode;
                                        let xpath = format!(
                                            "{}/{}",
                                            self.last_expr().xpath,
                                            key.name()
                                        );
                                        self.add_compl_leaf(
                                            key,
                                            &xpath,
                                            Pat::ListKey,
                                        );
                                        break_outer = true;
                                        break;
                                    };

                                    {
                                        let name = keys[cur].snode.name();
                                        let expr = self.last_expr_mut();
                                        expr.add_list_key(name, t, true);
                                        expr.pat = Pat::ListKey;
                                    }
                                    keys[cur].specified = true;
                                    specified_num += 1;
                                    idx += 1;
                                    token = argv.get(idx).map(String::as_str);
                                }

                                if !break_outer {
                                    // Unspecified keys: suggest them, or
                                    // fill in extension defaults.
                                    let xpath_wo_default_keys =
                                        self.last_expr().xpath.clone();
                                    for key in
                                        keys.iter().filter(|key| !key.specified)
                                    {
                                        if token.is_none() {
                                            let xpath = format!(
                                                "{}/{}",
                                                xpath_wo_default_keys,
                                                key.snode.name()
                                            );
                                            self.add_compl(
                                                CompletionKind::Node,
                                                Some(key.snode),
                                                Some(xpath),
                                                Datastore::EDIT,
                                                Pat::ListKeyIncomplete,
                                            );
                                        }

                                        if let Some(dflt) = key.dflt {
                                            let name = key.snode.name();
                                            let expr = self.last_expr_mut();
                                            expr.add_list_key(
                                                name, dflt, false,
                                            );
                                            expr.pat = Pat::ListKey;
                                        } else {
                                            // A mandatory key is missing.
                                            break_outer = true;
                                        }
                                    }
                                }
                            }

                            if break_outer {
                                break;
                            }
                        }

                        self.last_expr_mut().tree_depth += 1;

                        let Some(t) = token else {
                            let xpath = self.last_expr().xpath.clone();
                            self.add_compl_subtree(module, Some(snode), &xpath);
                            break;
                        };
                        node = find_child(snode.children(), t);
                    }

                    SchemaNodeKind::Leaf => {
                        let ltype = snode.leaf_type().unwrap();
                        if ltype.base_type() == DataValueType::Empty {
                            self.last_expr_mut().pat = Pat::LeafEmpty;
                            if token.is_none() {
                                let xpath = self.last_expr().xpath.clone();
                                self.add_compl_subtree(
                                    module,
                                    snode.parent(),
                                    &xpath,
                                );
                                break;
                            }
                            // An empty leaf takes no value; the argument
                            // is left for the parent to consume.
                            next_arg = false;
                        } else {
                            self.last_expr_mut().pat = Pat::Leaf;
                            let Some(t) = token else {
                                let xpath = self.last_expr().xpath.clone();
                                self.add_compl_leaf(
                                    snode,
                                    &xpath,
                                    Pat::LeafValue,
                                );
                                break;
                            };
                            // Identityref values carry the defining
                            // module's prefix.
                            let mut value = String::new();
                            if ltype.base_type() == DataValueType::IdentityRef
                                && let Some(prefix) =
                                    ltype.identityref_module(t)
                            {
                                value.push_str(prefix);
                                value.push(':');
                            }
                            value.push_str(t);
                            let expr = self.last_expr_mut();
                            expr.pat = Pat::LeafValue;
                            expr.value = Some(value);
                        }

                        // The expression is complete; roll back to the
                        // parent so further tokens start sibling edits.
                        node = snode.parent();
                        self.add_expr_from(&memo);
                        rollback = true;
                    }

                    SchemaNodeKind::LeafList => {
                        {
                            let expr = self.last_expr_mut();
                            expr.pat = Pat::LeafList;
                            expr.list_pos = expr.args_num;
                            expr.last_keys.clear();
                        }
                        let Some(t) = token else {
                            let xpath = self.last_expr().xpath.clone();
                            self.add_compl_leaf(
                                snode,
                                &xpath,
                                Pat::LeafListValue,
                            );
                            break;
                        };
                        let ltype = snode.leaf_type().unwrap();
                        let prefix = if ltype.base_type()
                            == DataValueType::IdentityRef
                        {
                            ltype.identityref_module(t)
                        } else {
                            None
                        };
                        {
                            let expr = self.last_expr_mut();
                            expr.pat = Pat::LeafListValue;
                            expr.add_leaflist_value(prefix, t);
                        }

                        node = snode.parent();
                        self.add_expr_from(&memo);
                        rollback = true;
                    }

                    // Choice and case have no data-tree presence; the
                    // expression tag is left untouched.
                    SchemaNodeKind::Choice | SchemaNodeKind::Case => {
                        let Some(t) = token else {
                            let xpath = self.last_expr().xpath.clone();
                            self.add_compl_subtree(module, Some(snode), &xpath);
                            break;
                        };
                        node = find_child(snode.children(), t);
                    }
                },
            }

            // The current argument was not consumed.
            if node.is_none() && !rollback {
                break;
            }
            if next_arg {
                idx += 1;
            }
        }

        // A not-consumed argument invalidates the whole line.
        if idx < argv.len() {
            self.invalid = true;
        }

        match self.exprs.first() {
            Some(first) => !first.xpath.is_empty(),
            None => false,
        }
    }
}

// ===== global functions =====

/// Parses a tokenized command line against every eligible module, stopping
/// at the first module whose root recognizes the input.
pub fn parse<'a>(
    sess: &'a Session,
    argv: &[String],
    opts: &ParseOpts,
) -> ParseLine<'a> {
    let handle = sess.acquire_context();
    let ctx = handle.context();

    let mut pline = ParseLine::new(sess);
    let mut found = false;

    for module in ctx.modules() {
        if module_is_internal(&module, opts.enable_nacm) {
            continue;
        }
        if !module.is_implemented() {
            continue;
        }
        if module.data().next().is_none() {
            continue;
        }
        if pline.parse_module(module, argv, opts) {
            found = true;
            break;
        }
    }

    // Input present but no module root matched.
    if !found && !argv.is_empty() {
        pline.invalid = true;
    }

    drop(handle);

    // The trailing expression may never have been activated.
    if let Some(last) = pline.exprs.last()
        && !last.active
    {
        pline.exprs.pop();
    }

    pline
}
