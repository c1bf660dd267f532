//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod common;

use common::{MockClient, argv, context, session, session_with};
use pline::{Datastore, ParseOpts, PatMask, parse};
use pline_yang::DataNode;

#[test]
fn test_enum_completions() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys", "log-level"]), &ParseOpts::default());

    let out = pline.render_completions(false, PatMask::all(), false);
    assert_eq!(out, "error\nwarning\ninfo\n");
}

#[test]
fn test_bool_completions() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys", "secure"]), &ParseOpts::default());

    let out = pline.render_completions(false, PatMask::all(), false);
    assert_eq!(out, "true\nfalse\n");
}

#[test]
fn test_identityref_completions() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["proto"]), &ParseOpts::default());

    // Only the leaves of the derivation graph are candidates.
    let out = pline.render_completions(false, PatMask::all(), false);
    assert_eq!(out, "tcp\nudp\n");
}

#[test]
fn test_union_completions() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["speed"]), &ParseOpts::default());

    let out = pline.render_completions(false, PatMask::all(), false);
    assert_eq!(out, "10\n100\n");
}

#[test]
fn test_leafref_existing_values() {
    let client = MockClient::default().with_items(
        Datastore::EDIT,
        "/iface/name",
        &["eth0", "eth1"],
    );
    let sess = session_with(context(), client);
    let pline = parse(&sess, &argv(&["uplink"]), &ParseOpts::default());

    let out = pline.render_completions(false, PatMask::all(), false);
    assert_eq!(out, "eth0\neth1\n");
}

#[test]
fn test_ext_completion_datastore_switch() {
    let client = MockClient::default().with_items(
        Datastore::Operational,
        "/m:iface/name",
        &["lo"],
    );
    let sess = session_with(context(), client);
    let pline = parse(&sess, &argv(&["monitor-iface"]), &ParseOpts::default());

    let out = pline.render_completions(false, PatMask::all(), false);
    assert_eq!(out, "lo\n");

    // The editing datastore is restored after the query.
    assert_eq!(sess.datastore(), Datastore::EDIT);
}

#[test]
fn test_existing_values_escaped() {
    let client = MockClient::default().with_items(
        Datastore::EDIT,
        "/m:sys/m:log-level",
        &["two words"],
    );
    let sess = session_with(context(), client);
    let pline = parse(&sess, &argv(&["sys", "log-level"]), &ParseOpts::default());

    // With existing_only, the literal value set is suppressed.
    let out = pline.render_completions(false, PatMask::all(), true);
    assert_eq!(out, "two\\ words\n");
}

#[test]
fn test_pat_mask_filter() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys", "log-level"]), &ParseOpts::default());

    let out = pline.render_completions(false, PatMask::LIST_KEY, false);
    assert_eq!(out, "");
}

#[test]
fn test_help_numeric_default_range() {
    let sess = session(context());
    let pline =
        parse(&sess, &argv(&["iface", "eth0", "mtu"]), &ParseOpts::default());

    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "[0..65535]\nMaximum transmission unit.\n");
}

#[test]
fn test_help_restricted_range() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys", "ttl"]), &ParseOpts::default());

    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "[1..255]\nttl\n");
}

#[test]
fn test_help_units_override_range() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys", "timeout"]), &ParseOpts::default());

    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "seconds\nConnection timeout.\n");
}

#[test]
fn test_help_string() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys", "hostname"]), &ParseOpts::default());

    // Multi-line descriptions are cut to their first line.
    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "<string>\nHost name.\n");
}

#[test]
fn test_help_decimal64() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["ratio"]), &ParseOpts::default());

    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "[0.00..100.50]\nratio\n");
}

#[test]
fn test_help_identityref() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["proto"]), &ParseOpts::default());

    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "tcp\nTransmission Control Protocol.\nudp\nudp\n");
}

#[test]
fn test_help_leafref_resolves_target() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["uplink"]), &ParseOpts::default());

    // The target leaf's type and description are shown.
    let out = pline.render_completions(true, PatMask::all(), false);
    assert_eq!(out, "<string>\nname\n");
}

#[test]
fn test_help_nodes() {
    let sess = session(context());
    let pline = parse(&sess, &argv(&["sys"]), &ParseOpts::default());

    let out = pline.render_completions(true, PatMask::all(), false);
    assert!(out.starts_with("hostname\nHost name.\n"));
    assert!(out.contains("domain\ndomain\n"));
}

#[test]
fn test_existing_only_nodes() {
    let ctx = context();
    let sys = ctx.find_path("/m:sys").unwrap().id();
    let hostname = ctx.find_path("/m:sys/m:hostname").unwrap().id();
    let domain = ctx.find_path("/m:sys/m:domain").unwrap().id();

    let client = MockClient::default()
        .with_data(
            Datastore::EDIT,
            "/m:sys/m:hostname",
            [DataNode::new(sys).with_child(
                DataNode::new(hostname).with_value("alpha"),
            )]
            .into_iter()
            .collect(),
        )
        .with_data(
            Datastore::EDIT,
            "/m:sys/m:domain",
            [DataNode::new(sys)
                .with_child(DataNode::new(domain).with_default())]
            .into_iter()
            .collect(),
        );
    let sess = session_with(ctx, client);
    let pline = parse(&sess, &argv(&["sys"]), &ParseOpts::default());

    // Only materialized, non-default nodes survive the filter.
    let out = pline.render_completions(false, PatMask::all(), true);
    assert_eq!(out, "hostname\n");
}

#[test]
fn test_existing_only_default_keys() {
    let ctx = context();
    let route = ctx.find_path("/m:route").unwrap().id();
    let table = ctx.find_path("/m:route/m:table").unwrap().id();
    let dest = ctx.find_path("/m:route/m:dest").unwrap().id();

    let client = MockClient::default()
        .with_data(
            Datastore::EDIT,
            "/m:route/table",
            [DataNode::new(route)
                .with_child(DataNode::new(table).with_value("main"))]
            .into_iter()
            .collect(),
        )
        .with_data(
            Datastore::EDIT,
            "/m:route/dest",
            [DataNode::new(route)
                .with_child(DataNode::new(dest).with_value("10.0.0.0/8"))]
            .into_iter()
            .collect(),
        );
    let sess = session_with(ctx, client);

    let mut opts = ParseOpts::default();
    opts.default_keys = true;
    let pline = parse(&sess, &argv(&["route"]), &opts);

    // A "default" key still holding its default value is not shown.
    let out = pline.render_completions(false, PatMask::all(), true);
    assert_eq!(out, "dest\n");
}
