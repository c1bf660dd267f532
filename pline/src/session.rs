//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Datastore session: schema context ownership, active datastore and
//! scoped context acquisition.

use std::cell::{Cell, RefCell};
use std::ops::Deref;

use pline_yang::{Context, DataTree};

use crate::client::Client;

/// Configuration datastore.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Datastore {
    Running,
    Startup,
    Candidate,
    Operational,
    FactoryDefault,
}

/// Datastore session. Owns the compiled schema and a client providing
/// access to the configuration stores.
#[derive(Debug)]
pub struct Session {
    context: Context,
    client: RefCell<Box<dyn Client>>,
    ds: Cell<Datastore>,
    acquisitions: Cell<usize>,
}

/// Scoped borrow of the session's schema context. The acquisition is
/// released when the handle is dropped.
#[derive(Debug)]
pub struct ContextHandle<'a> {
    sess: &'a Session,
    context: &'a Context,
}

// ===== impl Datastore =====

impl Datastore {
    /// The datastore configuration edits are applied to.
    pub const EDIT: Datastore = Datastore::Candidate;

    /// Parses a datastore wire name.
    pub fn from_name(name: &str) -> Option<Datastore> {
        match name {
            "running" => Some(Datastore::Running),
            "startup" => Some(Datastore::Startup),
            "candidate" => Some(Datastore::Candidate),
            "operational" => Some(Datastore::Operational),
            "factory-default" => Some(Datastore::FactoryDefault),
            _ => None,
        }
    }
}

impl std::fmt::Display for Datastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Datastore::Running => "running",
            Datastore::Startup => "startup",
            Datastore::Candidate => "candidate",
            Datastore::Operational => "operational",
            Datastore::FactoryDefault => "factory-default",
        };
        write!(f, "{}", name)
    }
}

// ===== impl Session =====

impl Session {
    pub fn new(context: Context, client: Box<dyn Client>) -> Session {
        Session {
            context,
            client: RefCell::new(client),
            ds: Cell::new(Datastore::EDIT),
            acquisitions: Cell::new(0),
        }
    }

    /// Borrows the schema context for the duration of the returned handle.
    pub fn acquire_context(&self) -> ContextHandle<'_> {
        self.acquisitions.set(self.acquisitions.get() + 1);
        ContextHandle { sess: self, context: &self.context }
    }

    /// Currently active datastore.
    pub fn datastore(&self) -> Datastore {
        self.ds.get()
    }

    /// Switches the active datastore.
    pub fn switch_datastore(&self, ds: Datastore) {
        self.ds.set(ds);
    }

    /// Enumerates values at the given xpath in the active datastore.
    pub fn get_items(&self, xpath: &str) -> Vec<String> {
        self.client.borrow_mut().get_items(self.ds.get(), xpath)
    }

    /// Retrieves the instance subtree at the given xpath from the active
    /// datastore.
    pub fn get_data(
        &self,
        xpath: &str,
        max_depth: Option<u32>,
    ) -> Option<DataTree> {
        self.client.borrow_mut().get_data(self.ds.get(), xpath, max_depth)
    }
}

// ===== impl ContextHandle =====

impl<'a> ContextHandle<'a> {
    /// Schema context. The returned reference is tied to the session, not
    /// to the handle: schema borrows held by a parse result stay valid
    /// after the acquisition ends, as long as the session lives.
    pub fn context(&self) -> &'a Context {
        self.context
    }
}

impl Deref for ContextHandle<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.context
    }
}

impl Drop for ContextHandle<'_> {
    fn drop(&mut self) {
        let acquisitions = self.sess.acquisitions.get();
        self.sess.acquisitions.set(acquisitions - 1);
    }
}

// ===== global functions =====

// Splits an extension-provided completion string of the form
// `<datastore>:<xpath>`. An unrecognized prefix leaves the whole string as
// an editing-datastore xpath.
pub(crate) fn parse_ext_xpath(ext: &str) -> (Datastore, &str) {
    if let Some((name, xpath)) = ext.split_once(':')
        && let Some(ds) = Datastore::from_name(name)
    {
        return (ds, xpath);
    }
    (Datastore::EDIT, ext)
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NullClient;

    impl Client for NullClient {
        fn get_items(&mut self, _ds: Datastore, _xpath: &str) -> Vec<String> {
            Vec::new()
        }

        fn get_data(
            &mut self,
            _ds: Datastore,
            _xpath: &str,
            _max_depth: Option<u32>,
        ) -> Option<DataTree> {
            None
        }
    }

    #[test]
    fn test_parse_ext_xpath() {
        assert_eq!(
            parse_ext_xpath("operational:/m:iface/name"),
            (Datastore::Operational, "/m:iface/name")
        );
        assert_eq!(
            parse_ext_xpath("factory-default:/m:sys"),
            (Datastore::FactoryDefault, "/m:sys")
        );
        // No recognized datastore prefix.
        assert_eq!(
            parse_ext_xpath("/m:iface/name"),
            (Datastore::EDIT, "/m:iface/name")
        );
    }

    #[test]
    fn test_context_acquisition() {
        let sess = Session::new(Context::new(), Box::new(NullClient));
        assert_eq!(sess.acquisitions.get(), 0);
        {
            let _handle = sess.acquire_context();
            let _nested = sess.acquire_context();
            assert_eq!(sess.acquisitions.get(), 2);
        }
        assert_eq!(sess.acquisitions.get(), 0);
    }

    #[test]
    fn test_switch_datastore() {
        let sess = Session::new(Context::new(), Box::new(NullClient));
        assert_eq!(sess.datastore(), Datastore::EDIT);
        sess.switch_datastore(Datastore::Operational);
        assert_eq!(sess.datastore(), Datastore::Operational);
    }
}
