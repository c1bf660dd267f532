//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

use pline_yang::DataTree;

use crate::session::Datastore;

/// Datastore access used by the completion renderer. Implemented by the
/// embedding CLI on top of its management transport.
pub trait Client: std::fmt::Debug {
    // Enumerate the values materialized at the given xpath.
    fn get_items(&mut self, ds: Datastore, xpath: &str) -> Vec<String>;

    // Retrieve the instance subtree at the given xpath, optionally limited
    // in depth.
    fn get_data(
        &mut self,
        ds: Datastore,
        xpath: &str,
        max_depth: Option<u32>,
    ) -> Option<DataTree>;
}
