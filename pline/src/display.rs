//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Completion renderer: formats completion entries for display, either as
//! bare candidates or as help text with type descriptors.

use std::fmt::Write;

use itertools::Itertools;
use pline_yang::{
    DataNode, DataValueType, SchemaIdentity, SchemaLeafType, SchemaNode,
    leafref_target_xpath,
};

use crate::expr::PatMask;
use crate::parser::{CompletionKind, ParseLine};
use crate::session::Datastore;

// ===== impl ParseLine =====

impl ParseLine<'_> {
    /// Prints completions or help entries to stdout. `enabled` filters by
    /// positional attribute; with `existing_only`, node suggestions are
    /// limited to nodes materialized in the datastore.
    pub fn print_completions(
        &self,
        help: bool,
        enabled: PatMask,
        existing_only: bool,
    ) {
        print!("{}", self.render_completions(help, enabled, existing_only));
    }

    /// Renders completions into a string, in emission order.
    pub fn render_completions(
        &self,
        help: bool,
        enabled: PatMask,
        existing_only: bool,
    ) -> String {
        let mut out = String::new();
        let mut current_ds = Datastore::EDIT;

        for compl in &self.compls {
            if !enabled.intersects(compl.pat.mask()) {
                continue;
            }

            // Switch to the datastore the query targets.
            if compl.xpath.is_some() && current_ds != compl.xpath_ds {
                self.sess.switch_datastore(compl.xpath_ds);
                current_ds = compl.xpath_ds;
            }

            if help {
                // Help cannot be shown without a schema node.
                let Some(node) = compl.node else {
                    continue;
                };

                if compl.kind == CompletionKind::Type {
                    let Some(ltype) = node.leaf_type() else {
                        continue;
                    };
                    write_type_help(&mut out, node, ltype);
                    continue;
                }

                if existing_only
                    && !self.node_exists(compl.xpath.as_deref(), node)
                {
                    continue;
                }

                writeln!(out, "{}", node.name()).unwrap();
                let dsc =
                    node.description().map(first_line).unwrap_or(node.name());
                writeln!(out, "{}", dsc).unwrap();
            } else {
                if compl.kind == CompletionKind::Type {
                    // Values materialized in the datastore.
                    if let Some(xpath) = &compl.xpath {
                        for value in self.sess.get_items(xpath) {
                            writeln!(out, "{}", escape_value(&value)).unwrap();
                        }
                    }

                    let Some(node) = compl.node else {
                        continue;
                    };
                    if existing_only {
                        continue;
                    }
                    let Some(ltype) = node.leaf_type() else {
                        continue;
                    };
                    write_type_completions(&mut out, ltype);
                    continue;
                }

                let Some(node) = compl.node else {
                    continue;
                };
                if existing_only
                    && !self.node_exists(compl.xpath.as_deref(), node)
                {
                    continue;
                }

                writeln!(out, "{}", node.name()).unwrap();
            }
        }

        // Restore the editing datastore.
        if current_ds != Datastore::EDIT {
            self.sess.switch_datastore(Datastore::EDIT);
        }

        out
    }

    // A node counts as materialized iff the datastore holds an instance
    // that is not implicitly created from a default and whose value
    // differs from the node's extension-provided default.
    fn node_exists(&self, xpath: Option<&str>, snode: SchemaNode<'_>) -> bool {
        let Some(xpath) = xpath else {
            return false;
        };
        let Some(data) = self.sess.get_data(xpath, Some(1)) else {
            return false;
        };
        node_in_tree(data.roots(), snode)
    }
}

fn node_in_tree<'a>(
    dnodes: impl Iterator<Item = &'a DataNode>,
    snode: SchemaNode<'_>,
) -> bool {
    for dnode in dnodes {
        if dnode.schema_id() != snode.id() {
            if node_in_tree(dnode.children(), snode) {
                return true;
            }
            continue;
        }
        if dnode.is_default() {
            continue;
        }
        // Don't count "default" keys still holding their default value.
        if let (Some(dflt), Some(value)) = (snode.ext_default(), dnode.value())
            && dflt == value
        {
            continue;
        }
        return true;
    }

    false
}

// ===== completion mode =====

fn write_type_completions(out: &mut String, ltype: SchemaLeafType<'_>) {
    match ltype.base_type() {
        DataValueType::Bool => {
            out.push_str("true\nfalse\n");
        }
        DataValueType::Enum => {
            for value in ltype.enum_values() {
                writeln!(out, "{}", value.name()).unwrap();
            }
        }
        DataValueType::IdentityRef => {
            for base in ltype.identity_bases() {
                write_identity_compl(out, base);
            }
        }
        DataValueType::Union => {
            for member in ltype.union_types() {
                write_type_completions(out, member);
            }
        }
        DataValueType::LeafRef => {
            write_type_completions(out, ltype.leafref_real_type().unwrap());
        }
        _ => (),
    }
}

// Candidates are the leaves of the derivation graph.
fn write_identity_compl(out: &mut String, ident: SchemaIdentity<'_>) {
    if !ident.has_derived() {
        writeln!(out, "{}", ident.name()).unwrap();
        return;
    }
    for derived in ident.derived() {
        write_identity_compl(out, derived);
    }
}

// ===== help mode =====

fn write_type_help(
    out: &mut String,
    snode: SchemaNode<'_>,
    ltype: SchemaLeafType<'_>,
) {
    if let Some(units) = snode.units() {
        // Units override the range line.
        writeln!(out, "{}", units).unwrap();
    } else {
        match ltype.base_type() {
            DataValueType::Uint8 => {
                write_unsigned_range(out, ltype, 0, u8::MAX as u64);
            }
            DataValueType::Uint16 => {
                write_unsigned_range(out, ltype, 0, u16::MAX as u64);
            }
            DataValueType::Uint32 => {
                write_unsigned_range(out, ltype, 0, u32::MAX as u64);
            }
            DataValueType::Uint64 => {
                write_unsigned_range(out, ltype, 0, u64::MAX);
            }
            DataValueType::Int8 => {
                write_signed_range(
                    out,
                    ltype,
                    i8::MIN as i64,
                    i8::MAX as i64,
                );
            }
            DataValueType::Int16 => {
                write_signed_range(
                    out,
                    ltype,
                    i16::MIN as i64,
                    i16::MAX as i64,
                );
            }
            DataValueType::Int32 => {
                write_signed_range(
                    out,
                    ltype,
                    i32::MIN as i64,
                    i32::MAX as i64,
                );
            }
            DataValueType::Int64 => {
                write_signed_range(out, ltype, i64::MIN, i64::MAX);
            }
            DataValueType::Dec64 => {
                write_dec_range(out, ltype);
            }
            DataValueType::String => {
                write_str_range(out, ltype);
            }
            DataValueType::Bool => {
                writeln!(out, "<true/false>").unwrap();
            }
            DataValueType::LeafRef => {
                // Follow the leafref to the referenced node, falling back
                // to the resolved real type when the target is unknown.
                let node_path = snode.path();
                let target = leafref_target_xpath(
                    ltype.leafref_path().unwrap(),
                    &node_path,
                );
                let target = snode
                    .context()
                    .find_path(&target)
                    .and_then(|ref_node| {
                        ref_node.leaf_type().map(|ltype| (ref_node, ltype))
                    });
                match target {
                    Some((ref_node, ref_type)) => {
                        write_type_help(out, ref_node, ref_type);
                    }
                    None => {
                        write_type_help(
                            out,
                            snode,
                            ltype.leafref_real_type().unwrap(),
                        );
                    }
                }
                return;
            }
            DataValueType::Union => {
                for member in ltype.union_types() {
                    write_type_help(out, snode, member);
                }
                return;
            }
            DataValueType::Enum => {
                for value in ltype.enum_values() {
                    writeln!(out, "{}", value.name()).unwrap();
                    let dsc = value
                        .description()
                        .map(first_line)
                        .unwrap_or(value.name());
                    writeln!(out, "{}", dsc).unwrap();
                }
                return;
            }
            DataValueType::IdentityRef => {
                for base in ltype.identity_bases() {
                    write_identity_help(out, base);
                }
                return;
            }
            _ => {
                writeln!(out, "<unknown>").unwrap();
            }
        }
    }

    let dsc = snode.description().map(first_line).unwrap_or(snode.name());
    writeln!(out, "{}", dsc).unwrap();
}

fn write_identity_help(out: &mut String, ident: SchemaIdentity<'_>) {
    if !ident.has_derived() {
        writeln!(out, "{}", ident.name()).unwrap();
        let dsc =
            ident.description().map(first_line).unwrap_or(ident.name());
        writeln!(out, "{}", dsc).unwrap();
        return;
    }
    for derived in ident.derived() {
        write_identity_help(out, derived);
    }
}

fn write_unsigned_range(
    out: &mut String,
    ltype: SchemaLeafType<'_>,
    def_min: u64,
    def_max: u64,
) {
    match ltype.num_range() {
        Some(pline_yang::NumRange::Unsigned(parts)) => {
            let parts = parts
                .iter()
                .map(|(min, max)| format!("{}..{}", min, max))
                .join("|");
            writeln!(out, "[{}]", parts).unwrap();
        }
        _ => writeln!(out, "[{}..{}]", def_min, def_max).unwrap(),
    }
}

fn write_signed_range(
    out: &mut String,
    ltype: SchemaLeafType<'_>,
    def_min: i64,
    def_max: i64,
) {
    match ltype.num_range() {
        Some(pline_yang::NumRange::Signed(parts)) => {
            let parts = parts
                .iter()
                .map(|(min, max)| format!("{}..{}", min, max))
                .join("|");
            writeln!(out, "[{}]", parts).unwrap();
        }
        _ => writeln!(out, "[{}..{}]", def_min, def_max).unwrap(),
    }
}

fn write_dec_range(out: &mut String, ltype: SchemaLeafType<'_>) {
    let digits = ltype.fraction_digits() as usize;
    let div = 10f64.powi(digits as i32);
    match ltype.dec_range() {
        Some(parts) => {
            let parts = parts
                .iter()
                .map(|(min, max)| {
                    format!(
                        "{:.digits$}..{:.digits$}",
                        *min as f64 / div,
                        *max as f64 / div
                    )
                })
                .join("|");
            writeln!(out, "[{}]", parts).unwrap();
        }
        None => {
            writeln!(
                out,
                "[{:.digits$}..{:.digits$}]",
                i64::MIN as f64 / div,
                i64::MAX as f64 / div
            )
            .unwrap();
        }
    }
}

fn write_str_range(out: &mut String, ltype: SchemaLeafType<'_>) {
    match ltype.str_length() {
        Some(parts) => {
            let parts = parts
                .iter()
                .map(|(min, max)| format!("{}..{}", min, max))
                .join("|");
            writeln!(out, "<string[{}]>", parts).unwrap();
        }
        None => writeln!(out, "<string>").unwrap(),
    }
}

// ===== helpers =====

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

// Whitespace-escape a datastore value so it survives as one completion
// token.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ' ' | '\t' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ===== tests =====
