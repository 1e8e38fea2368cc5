//! Integration tests for hb-graph.

use hb_core::{Medium, UnitId};
use hb_graph::{GraphBuilder, GraphError, PortKind, evaluation_order};

/// GT -> HRSG -> ST -> COND -> FWP -> HRSG (feedwater return).
fn steam_cycle() -> hb_graph::Graph {
    let mut b = GraphBuilder::new();
    let gt = b.add_unit("GT1", false).unwrap();
    let hrsg = b.add_unit("HRSG1", false).unwrap();
    let st = b.add_unit("ST1", false).unwrap();
    let cond = b.add_unit("COND1", true).unwrap();
    let fwp = b.add_unit("FWP1", false).unwrap();

    let gt_out = b.add_port(gt, "exhaust", PortKind::Outlet, Medium::Gas).unwrap();
    let h_gas = b.add_port(hrsg, "gas_in", PortKind::Inlet, Medium::Gas).unwrap();
    let h_fw = b.add_port(hrsg, "feedwater_in", PortKind::Inlet, Medium::Water).unwrap();
    let h_steam = b.add_port(hrsg, "steam_out", PortKind::Outlet, Medium::Steam).unwrap();
    let st_in = b.add_port(st, "steam_in", PortKind::Inlet, Medium::Steam).unwrap();
    let st_out = b.add_port(st, "exhaust", PortKind::Outlet, Medium::Steam).unwrap();
    let c_in = b.add_port(cond, "steam_in", PortKind::Inlet, Medium::Steam).unwrap();
    let c_out = b.add_port(cond, "condensate_out", PortKind::Outlet, Medium::Water).unwrap();
    let p_in = b.add_port(fwp, "water_in", PortKind::Inlet, Medium::Water).unwrap();
    let p_out = b.add_port(fwp, "water_out", PortKind::Outlet, Medium::Water).unwrap();

    b.connect(gt_out, h_gas).unwrap();
    b.connect(h_steam, st_in).unwrap();
    b.connect(st_out, c_in).unwrap();
    b.connect(c_out, p_in).unwrap();
    b.connect(p_out, h_fw).unwrap();
    b.build()
}

#[test]
fn feedwater_return_is_the_only_back_edge() {
    let g = steam_cycle();
    let order = evaluation_order(&g);
    let names: Vec<&str> = order
        .order
        .iter()
        .map(|&u| g.unit(u).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["GT1", "HRSG1", "ST1", "COND1", "FWP1"]);
    assert_eq!(order.back_edges.len(), 1);

    let back = g.stream(order.back_edges[0]).unwrap();
    assert_eq!(g.qualified_name(back.from), "FWP1.water_out");
    assert_eq!(g.qualified_name(back.to), "HRSG1.feedwater_in");

    assert_eq!(order.cycles.len(), 1);
    assert_eq!(order.cycles[0].len(), 4);
    assert!(!order.cycles[0].contains(&UnitId::from_index(0)));
}

#[test]
fn lookups_by_name() {
    let g = steam_cycle();
    let st = g.find_unit("ST1").unwrap();
    let port = g.find_port(st, "exhaust").unwrap();
    assert_eq!(g.port(port).unwrap().kind, PortKind::Outlet);
    assert!(g.find_port(st, "bleed").is_none());
    assert_eq!(g.inbound_streams(st).len(), 1);
    assert_eq!(g.outbound_streams(st).len(), 1);
}

#[test]
fn order_is_deterministic() {
    let a = evaluation_order(&steam_cycle());
    let b = evaluation_order(&steam_cycle());
    assert_eq!(a, b);
}

#[test]
fn outlet_feeds_one_stream() {
    let mut b = GraphBuilder::new();
    let a = b.add_unit("A", false).unwrap();
    let c = b.add_unit("C", false).unwrap();
    let out = b.add_port(a, "out", PortKind::Outlet, Medium::Water).unwrap();
    let i1 = b.add_port(c, "in1", PortKind::Inlet, Medium::Water).unwrap();
    let i2 = b.add_port(c, "in2", PortKind::Inlet, Medium::HotWater).unwrap();
    b.connect(out, i1).unwrap();
    let err = b.connect(out, i2).unwrap_err();
    assert_eq!(
        err,
        GraphError::OutletAlreadyConnected {
            port: "A.out".into()
        }
    );
}
