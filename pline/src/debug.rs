//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{debug, debug_span};

use crate::parser::ParseLine;

// ===== impl ParseLine =====

impl ParseLine<'_> {
    /// Dumps the parse result to the tracing subscriber.
    pub fn log(&self) {
        debug_span!("pline").in_scope(|| {
            debug!(invalid = %self.invalid, "parsed line");
            for expr in &self.exprs {
                debug!(
                    xpath = %expr.xpath,
                    value = ?expr.value,
                    active = %expr.active,
                    pat = %expr.pat,
                    args_num = %expr.args_num,
                    list_pos = %expr.list_pos,
                    last_keys = %expr.last_keys,
                    tree_depth = %expr.tree_depth,
                    "expression"
                );
            }
            for compl in &self.compls {
                debug!(
                    kind = ?compl.kind,
                    node = compl.node.as_ref().map(|snode| snode.name()),
                    xpath = ?compl.xpath,
                    xpath_ds = %compl.xpath_ds,
                    pat = %compl.pat,
                    "completion"
                );
            }
        });
    }
}
