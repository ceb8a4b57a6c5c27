//! End-to-end scenarios (spec.md §8): a slice of a 3-tier Clos fabric —
//! leaves, mid-spines, a top spine — driven entirely through in-memory
//! `RecordingSink`s. No real sockets; the datalink layer is behind a trait
//! for exactly this reason.
use mtpd::config::ConfigFile;
use mtpd::daemon::{Daemon, RecordingSink};
use mtpd::layer::{Ether, EtherType, MacAddress};
use mtpd::mtp::{decode_frame, MtpMessage, UpdateOption, Vid};
use mtpd::ports::{ControlPort, PortHandle};
use mtpd::timers::STARTUP_SETTLE_MS;
use mtpd::{flood, forwarding, handshake, keepalive};

fn cfg(tier: u32, is_top_spine: bool) -> ConfigFile {
    ConfigFile { is_top_spine, tier }
}

fn node(name: &str, tier: u32, is_top_spine: bool) -> Daemon {
    Daemon::new(name.to_string(), &cfg(tier, is_top_spine), 0)
}

fn add_port(d: &mut Daemon, name: &str) -> PortHandle {
    d.add_control_port(ControlPort::new(
        name.to_string(),
        Ether::broadcast_header(MacAddress([0x10; 6]), EtherType::Mtp),
    ))
}

fn vid(s: &str) -> Vid {
    Vid::parse(s).unwrap()
}

fn msg_at(sink: &RecordingSink, i: usize) -> MtpMessage {
    let (_e, msg) = decode_frame(&sink.control_sent[i].1).unwrap();
    msg
}

fn hello_nr_vids(msg: &MtpMessage) -> Vec<Vid> {
    match msg {
        MtpMessage::HelloNr { vids, .. } => vids.to_vids().unwrap(),
        other => panic!("expected HelloNr, got {:?}", other),
    }
}

fn join_req_vids(msg: &MtpMessage) -> Vec<Vid> {
    match msg {
        MtpMessage::JoinReq { vids } => vids.to_vids().unwrap(),
        other => panic!("expected JoinReq, got {:?}", other),
    }
}

fn join_res_vids(msg: &MtpMessage) -> Vec<Vid> {
    match msg {
        MtpMessage::JoinRes { vids } => vids.to_vids().unwrap(),
        other => panic!("expected JoinRes, got {:?}", other),
    }
}

fn join_ack_vids(msg: &MtpMessage) -> Vec<Vid> {
    match msg {
        MtpMessage::JoinAck { vids } => vids.to_vids().unwrap(),
        other => panic!("expected JoinAck, got {:?}", other),
    }
}

/// Wires up leaf -> T1 -> S1 and drives the handshake to convergence,
/// returning every daemon/sink/port needed by the scenario tests below.
struct TwoHop {
    leaf: Daemon,
    leaf_port: PortHandle,
    t1: Daemon,
    t1_port_leaf: PortHandle,
    t1_port_spine: PortHandle,
    s1: Daemon,
    s1_port: PortHandle,
}

fn converge_two_hop() -> TwoHop {
    let mut leaf = node("l1", 1, false);
    leaf.my_vid = Some(vid("1"));
    let leaf_port = add_port(&mut leaf, "l1eth3");
    let mut leaf_sink = RecordingSink::default();

    let mut t1 = node("t1", 2, false);
    let t1_port_leaf = add_port(&mut t1, "t1eth3");
    let t1_port_spine = add_port(&mut t1, "t1eth0");
    let mut t1_sink = RecordingSink::default();

    let mut s1 = node("s1", 3, true);
    let s1_port = add_port(&mut s1, "s1eth0");
    let mut s1_sink = RecordingSink::default();

    // 1. leaf -> Hello-NR (after settle)
    handshake::start_bootstrap(&mut leaf, &mut leaf_sink, STARTUP_SETTLE_MS).unwrap();
    let hello1 = hello_nr_vids(&msg_at(&leaf_sink, 0));

    // 2. T1 -> Join-Req
    handshake::handle_hello_nr(&mut t1, &mut t1_sink, t1_port_leaf, 1, &msg_wrap(&hello1)).unwrap();
    let req1 = join_req_vids(&msg_at(&t1_sink, 0));

    // 3. leaf -> Join-Res (extends "1" by its own port suffix, "3")
    handshake::handle_join_req(&mut leaf, &mut leaf_sink, leaf_port, &msg_wrap(&req1)).unwrap();
    let res1 = join_res_vids(&msg_at(&leaf_sink, 1));
    assert_eq!(vec![vid("1.3")], res1, "P4: VID extended by leaf's ingress port suffix");

    // 4. T1 -> installs accepted via leaf port, rebroadcasts Hello-NR upward, Join-Ack
    handshake::handle_join_res(&mut t1, &mut t1_sink, t1_port_leaf, &msg_wrap(&res1)).unwrap();
    let hello2 = hello_nr_vids(&msg_at(&t1_sink, 2)); // index 2: rebroadcast on t1_port_spine
    let ack1 = join_ack_vids(&msg_at(&t1_sink, 3));

    // 5. leaf -> installs offered, port up, Start-Hello
    handshake::handle_join_ack(&mut leaf, &mut leaf_sink, leaf_port, &msg_wrap(&ack1)).unwrap();

    // 6. T1 -> Start-Hello, port up
    handshake::handle_start_hello(&mut t1, t1_port_leaf);

    // 7. S1 <- Hello-NR from T1 -> Join-Req
    handshake::handle_hello_nr(&mut s1, &mut s1_sink, s1_port, 2, &msg_wrap(&hello2)).unwrap();
    let req2 = join_req_vids(&msg_at(&s1_sink, 0));

    // 8. T1 -> Join-Res (extends "1.3" by its spine-facing port suffix, "0")
    handshake::handle_join_req(&mut t1, &mut t1_sink, t1_port_spine, &msg_wrap(&req2)).unwrap();
    let res2 = join_res_vids(&msg_at(&t1_sink, 4));
    assert_eq!(vec![vid("1.3.0")], res2, "P4 again, one hop further up");

    // 9. S1 -> installs accepted via t1 port (top spine: no further rebroadcast), Join-Ack
    handshake::handle_join_res(&mut s1, &mut s1_sink, s1_port, &msg_wrap(&res2)).unwrap();
    let ack2 = join_ack_vids(&msg_at(&s1_sink, 1));

    // 10. T1 -> installs offered via spine port, Start-Hello
    handshake::handle_join_ack(&mut t1, &mut t1_sink, t1_port_spine, &msg_wrap(&ack2)).unwrap();

    // 11. S1 -> Start-Hello, port up
    handshake::handle_start_hello(&mut s1, s1_port);

    TwoHop {
        leaf,
        leaf_port,
        t1,
        t1_port_leaf,
        t1_port_spine,
        s1,
        s1_port,
    }
}

fn msg_wrap(vids: &[Vid]) -> mtpd::mtp::VidList {
    mtpd::mtp::VidList::from_vids(vids)
}

#[test]
fn scenario_1_bootstrap_convergence() {
    let h = converge_two_hop();

    // Leaf's offered table has at least one up port toward T1.
    assert!(h.leaf.up_offered_ports().contains(&h.leaf_port));

    // T1 has an accepted entry (from the leaf) whose VID is rooted at leaf 1.
    let t1_accepted = h.t1.accepted.find(h.t1_port_leaf).unwrap();
    assert!(t1_accepted.vids.iter().any(|v| v.root_matches(1)));

    // S1 has an accepted entry rooted at leaf 1, reached via a two-hop
    // extended path VID (one suffix per intermediate tier).
    let s1_accepted = h.s1.accepted.find(h.s1_port).unwrap();
    assert!(s1_accepted.vids.iter().any(|v| v.root_matches(1)));
    assert_eq!(1, s1_accepted.vids.len());
    assert_eq!(2, s1_accepted.vids.iter().next().unwrap().as_str().matches('.').count());

    // P5: every port that ever reached start==true resolved to exactly one
    // of {accepted, offered}.
    for (d, p) in [
        (&h.leaf, h.leaf_port),
        (&h.t1, h.t1_port_leaf),
        (&h.t1, h.t1_port_spine),
        (&h.s1, h.s1_port),
    ] {
        assert!(d.ports.get(p).start);
        assert_ne!(d.is_accepted_port(p), d.is_offered_port(p), "P5: exclusive membership");
    }
}

#[test]
fn scenario_2_simple_forward_leaf_to_leaf() {
    let mut h = converge_two_hop();

    // L1 -> T1: real compute traffic from 10.0.1.5 to 10.0.4.7.
    let mut leaf_sink = RecordingSink::default();
    forwarding::leaf_ingress(
        &mut h.leaf,
        &mut leaf_sink,
        "10.0.1.5".parse().unwrap(),
        "10.0.4.7".parse().unwrap(),
        &[0x45, 0x00, 0x00, 0x1c],
        5_000,
    )
    .unwrap();
    assert_eq!(1, leaf_sink.control_sent.len());
    let (_e, msg) = decode_frame(&leaf_sink.control_sent[0].1).unwrap();
    let (src_vid, dest_vid, payload) = match msg {
        MtpMessage::DataMsg { src_vid, dest_vid, payload } => (src_vid, dest_vid, payload),
        other => panic!("expected DataMsg, got {:?}", other),
    };
    assert_eq!(1, src_vid);
    assert_eq!(4, dest_vid);

    // T1: dest_VID 4 isn't in its accepted table (only "1.3" is), so T1
    // hashes across its offered ports toward the spine tier.
    let mut t1_sink = RecordingSink::default();
    forwarding::spine_forward(&mut h.t1, &mut t1_sink, src_vid, dest_vid, &payload).unwrap();
    assert_eq!(1, t1_sink.control_sent.len());
    assert_eq!(h.t1_port_spine, t1_sink.control_sent[0].0);

    // S1: accepted table has a VID rooted at 1 via the T1 port, not 4, so
    // S1 also falls through to hash multipath (no other uplink exists here,
    // so this just exercises the same code path a deeper fabric would use
    // to eventually reach a T* adjacent to leaf 4).
    let mut s1_sink = RecordingSink::default();
    forwarding::spine_forward(&mut h.s1, &mut s1_sink, src_vid, dest_vid, &payload).unwrap();
    assert!(s1_sink.control_sent.is_empty(), "no uplink toward leaf 4 configured in this slice");
}

#[test]
fn scenario_2b_spine_forward_matches_accepted_vid_directly() {
    // A spine directly adjacent to leaf 4 forwards by accepted-VID match,
    // not by hash, once its accepted table actually owns that root.
    let mut s = node("s-adjacent", 2, false);
    let down_to_leaf4 = add_port(&mut s, "s-adjacent-eth2");
    s.ports.get_mut(down_to_leaf4).is_up = true;
    s.accepted.entry(down_to_leaf4).vids.insert(vid("4.2"));
    let up_elsewhere = add_port(&mut s, "s-adjacent-eth0");
    s.ports.get_mut(up_elsewhere).is_up = true;
    s.offered.entry(up_elsewhere);

    let mut sink = RecordingSink::default();
    forwarding::spine_forward(&mut s, &mut sink, 1, 4, &[0x45, 0, 0, 0]).unwrap();

    assert_eq!(1, sink.control_sent.len());
    assert_eq!(down_to_leaf4, sink.control_sent[0].0);
}

#[test]
fn scenario_3_link_fail_downstream_marks_unreachable_at_spine() {
    let mut h = converge_two_hop();

    // Bring L1<->T1 down on T1's side (miss-detect).
    h.t1.ports.get_mut(h.t1_port_leaf).is_up = false;
    let mut t1_sink = RecordingSink::default();
    flood::run_failure(&h.t1, &mut t1_sink, h.t1_port_leaf).unwrap();

    assert_eq!(1, t1_sink.control_sent.len());
    assert_eq!(h.t1_port_spine, t1_sink.control_sent[0].0);
    let (_e, msg) = decode_frame(&t1_sink.control_sent[0].1).unwrap();
    let (option, vids) = match msg {
        MtpMessage::FailureUpdate { option, vids } => (option, vids.to_vids().unwrap()),
        other => panic!("expected FailureUpdate, got {:?}", other),
    };
    assert_eq!(UpdateOption::Unreachable, option);
    assert_eq!(vec![vid("1.3")], vids);

    // S1 receives it on its (offered, from T1's perspective this is T1's
    // upstream — but from S1's perspective the port facing T1 is accepted).
    let mut s1_sink = RecordingSink::default();
    flood::handle_failure_update(&mut h.s1, &mut s1_sink, h.s1_port, option, &mtpd::mtp::VidList::from_vids(&vids))
        .unwrap();
    assert!(h.s1.accepted.find(h.s1_port).unwrap().unreachable.contains(&vid("1.3")));
}

#[test]
fn scenario_4_link_fail_all_uplinks_floods_reachable_downstream() {
    // T1 with one accepted (downstream) port and one offered (upstream)
    // port; failing the only uplink triggers the isolated-subtree case.
    let mut t1 = node("t1", 2, false);
    let downstream = add_port(&mut t1, "t1eth3");
    t1.ports.get_mut(downstream).is_up = true;
    t1.accepted.entry(downstream).vids.insert(vid("1.3"));

    let uplink = add_port(&mut t1, "t1eth0");
    t1.ports.get_mut(uplink).is_up = true;
    t1.offered.entry(uplink);

    t1.ports.get_mut(uplink).is_up = false;
    let mut sink = RecordingSink::default();
    flood::run_failure(&t1, &mut sink, uplink).unwrap();

    assert_eq!(1, sink.control_sent.len());
    assert_eq!(downstream, sink.control_sent[0].0);
    let (_e, msg) = decode_frame(&sink.control_sent[0].1).unwrap();
    match msg {
        MtpMessage::FailureUpdate { option, vids } => {
            assert_eq!(UpdateOption::Reachable, option);
            assert_eq!(vec![vid("1.3")], vids.to_vids().unwrap());
        }
        other => panic!("expected FailureUpdate, got {:?}", other),
    }
}

#[test]
fn scenario_5_recovery_restores_routing_via_recovered_port() {
    let mut h = converge_two_hop();

    h.t1.ports.get_mut(h.t1_port_leaf).is_up = false;
    let mut t1_sink = RecordingSink::default();
    flood::run_failure(&h.t1, &mut t1_sink, h.t1_port_leaf).unwrap();
    let (_e, msg) = decode_frame(&t1_sink.control_sent[0].1).unwrap();
    let (option, vids) = match msg {
        MtpMessage::FailureUpdate { option, vids } => (option, vids),
        other => panic!("expected FailureUpdate, got {:?}", other),
    };
    let mut s1_sink = RecordingSink::default();
    flood::handle_failure_update(&mut h.s1, &mut s1_sink, h.s1_port, option, &vids).unwrap();
    assert!(h.s1.accepted.find(h.s1_port).unwrap().unreachable.contains(&vid("1.3")));

    // Three consecutive on-time keep-alives bring T1's leaf port back up.
    h.t1.ports.get_mut(h.t1_port_leaf).last_received_time = 2_000;
    let mut recovery_sink = RecordingSink::default();
    keepalive::handle_keep_alive(&mut h.t1, &mut recovery_sink, h.t1_port_leaf, 2_100).unwrap();
    keepalive::handle_keep_alive(&mut h.t1, &mut recovery_sink, h.t1_port_leaf, 2_200).unwrap();
    keepalive::handle_keep_alive(&mut h.t1, &mut recovery_sink, h.t1_port_leaf, 2_300).unwrap();
    assert!(h.t1.ports.get(h.t1_port_leaf).is_up);

    assert_eq!(1, recovery_sink.control_sent.len());
    let (_e, recover_msg) = decode_frame(&recovery_sink.control_sent[0].1).unwrap();
    let (recover_option, recover_vids) = match recover_msg {
        MtpMessage::RecoverUpdate { option, vids } => (option, vids),
        other => panic!("expected RecoverUpdate, got {:?}", other),
    };
    assert_eq!(UpdateOption::Unreachable, recover_option);

    let mut s1_sink2 = RecordingSink::default();
    flood::handle_recover_update(&mut h.s1, &mut s1_sink2, h.s1_port, recover_option, &recover_vids).unwrap();
    assert!(!h.s1.accepted.find(h.s1_port).unwrap().unreachable.contains(&vid("1.3")));
}

#[test]
fn scenario_6_multipath_hash_is_deterministic_and_spreads_across_ports() {
    let mut leaf = node("l1", 1, false);
    for i in 0..4 {
        let p = add_port(&mut leaf, &format!("l1eth{}", i));
        leaf.ports.get_mut(p).is_up = true;
        leaf.offered.entry(p);
    }

    let mut pick = |dst: &str| -> PortHandle {
        let mut sink = RecordingSink::default();
        forwarding::leaf_ingress(&mut leaf, &mut sink, "10.0.1.5".parse().unwrap(), dst.parse().unwrap(), &[], 0)
            .unwrap();
        sink.control_sent[0].0
    };

    // Determinism: same (src, dst) always picks the same port.
    assert_eq!(pick("10.0.9.9"), pick("10.0.9.9"));

    // Spread: enough distinct destinations should land on more than one
    // of the four available ports (a constant-port hash would fail this).
    let mut distinct = std::collections::HashSet::new();
    for last in 0u8..=250 {
        distinct.insert(pick(&format!("10.0.9.{}", last)));
    }
    assert!(distinct.len() > 1, "hash should distribute across available ports");
}

#[test]
fn scenario_l2_duplicate_failure_update_across_two_hops_is_idempotent() {
    let mut h = converge_two_hop();
    h.t1.ports.get_mut(h.t1_port_leaf).is_up = false;
    let mut t1_sink = RecordingSink::default();
    flood::run_failure(&h.t1, &mut t1_sink, h.t1_port_leaf).unwrap();
    let (_e, msg) = decode_frame(&t1_sink.control_sent[0].1).unwrap();
    let (option, vids) = match msg {
        MtpMessage::FailureUpdate { option, vids } => (option, vids),
        other => panic!("expected FailureUpdate, got {:?}", other),
    };

    let mut sink_a = RecordingSink::default();
    flood::handle_failure_update(&mut h.s1, &mut sink_a, h.s1_port, option, &vids).unwrap();
    let after_first = h.s1.accepted.find(h.s1_port).unwrap().unreachable.clone();

    let mut sink_b = RecordingSink::default();
    flood::handle_failure_update(&mut h.s1, &mut sink_b, h.s1_port, option, &vids).unwrap();
    let after_second = h.s1.accepted.find(h.s1_port).unwrap().unreachable.clone();

    assert_eq!(after_first, after_second);
}
