//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(dead_code)]

use std::collections::HashMap;

use pline::{Client, Datastore, Session};
use pline_yang::{Context, DataTree, EnumValue, LeafType};

/// Test schema:
///
/// ```text
/// module n (identities only, no data nodes)
///   identity transport; identity tcp, udp (derived from transport)
/// module m
///   container sys { hostname, domain, log-level(enum), secure(bool),
///                   timeout(uint32, units), ttl(uint8, range) }
///   list iface [name] { mtu(uint16), desc }
///   list acl [a, b] { action }
///   list route [table (default "main"), dest] { next }
///   container feat { enable(empty), level(uint8) }
///   container srv { choice mode { case tcp { tcp-port }
///                                 case udp { udp-port } } }
///   leaf proto (identityref -> transport)
///   leaf-list dns
///   leaf uplink (leafref ../iface/name)
///   leaf monitor-iface (extension completion from operational)
///   leaf ratio (decimal64, fd 2, range)
///   leaf speed (union of enum and string)
/// module aug (augments sys with leaf extra)
/// ```
pub fn context() -> Context {
    let mut ctx = Context::new();

    let n = ctx.add_module("n", None);
    let transport = ctx.add_identity(n, "transport", &[]);
    let tcp = ctx.add_identity(n, "tcp", &[transport]);
    ctx.set_identity_description(tcp, "Transmission Control Protocol.");
    ctx.add_identity(n, "udp", &[transport]);

    let m = ctx.add_module("m", Some("2024-06-01"));

    let sys = ctx.add_container(m, None, "sys");
    ctx.set_description(sys, "System configuration.");
    let hostname = ctx.add_leaf(m, Some(sys), "hostname", LeafType::string());
    ctx.set_description(hostname, "Host name.\nSecond help line.");
    ctx.add_leaf(m, Some(sys), "domain", LeafType::string());
    ctx.add_leaf(
        m,
        Some(sys),
        "log-level",
        LeafType::enumeration(vec![
            EnumValue::new("error").with_description("Errors only."),
            EnumValue::new("warning"),
            EnumValue::new("info"),
        ]),
    );
    ctx.add_leaf(m, Some(sys), "secure", LeafType::boolean());
    let timeout = ctx.add_leaf(m, Some(sys), "timeout", LeafType::uint32());
    ctx.set_units(timeout, "seconds");
    ctx.set_description(timeout, "Connection timeout.");
    ctx.add_leaf(
        m,
        Some(sys),
        "ttl",
        LeafType::uint8().with_unsigned_range(&[(1, 255)]),
    );

    let iface = ctx.add_list(m, None, "iface");
    ctx.add_key_leaf(m, iface, "name", LeafType::string());
    let mtu = ctx.add_leaf(m, Some(iface), "mtu", LeafType::uint16());
    ctx.set_description(mtu, "Maximum transmission unit.");
    ctx.add_leaf(m, Some(iface), "desc", LeafType::string());

    let acl = ctx.add_list(m, None, "acl");
    ctx.add_key_leaf(m, acl, "a", LeafType::string());
    ctx.add_key_leaf(m, acl, "b", LeafType::string());
    ctx.add_leaf(m, Some(acl), "action", LeafType::string());

    let route = ctx.add_list(m, None, "route");
    let table = ctx.add_key_leaf(m, route, "table", LeafType::string());
    ctx.set_ext_default(table, "main");
    ctx.add_key_leaf(m, route, "dest", LeafType::string());
    ctx.add_leaf(m, Some(route), "next", LeafType::string());

    let feat = ctx.add_container(m, None, "feat");
    ctx.add_leaf(m, Some(feat), "enable", LeafType::empty());
    ctx.add_leaf(m, Some(feat), "level", LeafType::uint8());

    let srv = ctx.add_container(m, None, "srv");
    let mode = ctx.add_choice(m, Some(srv), "mode");
    let tcp_case = ctx.add_case(m, mode, "tcp");
    ctx.add_leaf(m, Some(tcp_case), "tcp-port", LeafType::uint16());
    let udp_case = ctx.add_case(m, mode, "udp");
    ctx.add_leaf(m, Some(udp_case), "udp-port", LeafType::uint16());

    ctx.add_leaf(m, None, "proto", LeafType::identityref(&[transport]));
    ctx.add_leaf_list(m, None, "dns", LeafType::string());
    ctx.add_leaf(
        m,
        None,
        "uplink",
        LeafType::leafref("../iface/name", LeafType::string()),
    );
    let monitor =
        ctx.add_leaf(m, None, "monitor-iface", LeafType::string());
    ctx.set_ext_completion(monitor, "operational:/m:iface/name");
    ctx.add_leaf(
        m,
        None,
        "ratio",
        LeafType::dec64(2).with_signed_range(&[(0, 10050)]),
    );
    ctx.add_leaf(
        m,
        None,
        "speed",
        LeafType::union(vec![
            LeafType::enumeration(vec![
                EnumValue::new("10"),
                EnumValue::new("100"),
            ]),
            LeafType::string(),
        ]),
    );

    let aug = ctx.add_module("aug", None);
    ctx.add_leaf(aug, Some(sys), "extra", LeafType::string());

    ctx
}

/// Datastore mock resolving queries from canned tables.
#[derive(Debug, Default)]
pub struct MockClient {
    items: HashMap<(Datastore, String), Vec<String>>,
    data: HashMap<(Datastore, String), DataTree>,
}

impl MockClient {
    pub fn with_items(
        mut self,
        ds: Datastore,
        xpath: &str,
        values: &[&str],
    ) -> MockClient {
        self.items.insert(
            (ds, xpath.to_owned()),
            values.iter().map(|value| value.to_string()).collect(),
        );
        self
    }

    pub fn with_data(
        mut self,
        ds: Datastore,
        xpath: &str,
        tree: DataTree,
    ) -> MockClient {
        self.data.insert((ds, xpath.to_owned()), tree);
        self
    }
}

impl Client for MockClient {
    fn get_items(&mut self, ds: Datastore, xpath: &str) -> Vec<String> {
        self.items
            .get(&(ds, xpath.to_owned()))
            .cloned()
            .unwrap_or_default()
    }

    fn get_data(
        &mut self,
        ds: Datastore,
        xpath: &str,
        _max_depth: Option<u32>,
    ) -> Option<DataTree> {
        self.data.get(&(ds, xpath.to_owned())).cloned()
    }
}

pub fn session(ctx: Context) -> Session {
    Session::new(ctx, Box::new(MockClient::default()))
}

pub fn session_with(ctx: Context, client: MockClient) -> Session {
    Session::new(ctx, Box::new(client))
}

pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}
