//! End-to-end scenarios driven through the public simulation API

use std::time::Duration;

use icn_core::{Name, NodeId, SimTime};
use icn_peer::{ObservedEvent, PeerConfig, RecordingObserver};
use icn_simulation::{APP_FACE, ScenarioConfig, Simulation};

fn name(uri: &str) -> Name {
    uri.parse().unwrap()
}

#[test]
fn test_scenario_from_toml() {
    icn_logging::init_testing();

    let scenario = ScenarioConfig::from_toml_str(
        r#"
        duration_ms = 3500
        link_delay_ms = 25
        seed = 7

        [consumer]
        interest_name = "/video"

        [producer]
        prefix = "/video"
        payload_size = 16
        "#,
    )
    .unwrap();

    let mut sim = Simulation::two_node(
        scenario.consumer_config(),
        scenario.producer_config(),
        scenario.link_delay(),
    )
    .unwrap();
    let stats = sim.run_until(scenario.duration());

    assert_eq!(stats.interests_sent, 3);
    assert_eq!(stats.interests_received, 3);
    assert_eq!(stats.data_received, 3);
    assert_eq!(stats.mean_rtt(), Some(Duration::from_millis(50)));
    assert_eq!(stats.satisfaction_ratio(), 1.0);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["interests_sent"], 3);
}

#[test]
fn test_three_hop_chain() {
    let mut sim = Simulation::new();
    let consumer = sim.add_node();
    let router = sim.add_node();
    let producer = sim.add_node();

    let (c_up, _) = sim.add_link(consumer, router, Duration::from_millis(10)).unwrap();
    let (r_up, _) = sim.add_link(router, producer, Duration::from_millis(10)).unwrap();
    sim.add_route(consumer, name("/chain"), c_up, 0).unwrap();
    sim.add_route(router, name("/chain"), r_up, 0).unwrap();

    sim.install_peer(consumer, PeerConfig::consumer_only(name("/chain")))
        .unwrap();
    sim.install_peer(producer, PeerConfig::producer_only(name("/chain")))
        .unwrap();
    let recorder = RecordingObserver::new();
    sim.add_observer(consumer, recorder.clone()).unwrap();
    sim.start_all();

    let stats = sim.run_until(SimTime::from_millis(1500));

    assert_eq!(stats.data_received, 1);
    assert_eq!(stats.max_hop_count, 2);
    assert_eq!(stats.mean_rtt(), Some(Duration::from_millis(40)));
    assert!(recorder.events().iter().any(|e| matches!(
        e,
        ObservedEvent::LastDelay { seq: 0, hop_count: 2, .. }
    )));
    // only the producer registers a route toward its application
    assert!(sim
        .forwarder(producer)
        .unwrap()
        .routes()
        .iter()
        .any(|r| r.face == APP_FACE));
    assert!(sim
        .forwarder(NodeId(1))
        .unwrap()
        .routes()
        .iter()
        .all(|r| r.face != APP_FACE));
}

#[test]
fn test_retransmission_recovers_late_producer() {
    let mut sim = Simulation::new();
    let consumer = sim.add_node();
    let producer = sim.add_node();
    let (face, _) = sim.add_link(consumer, producer, Duration::from_millis(10)).unwrap();
    sim.add_route(consumer, name("/late"), face, 0).unwrap();

    sim.install_peer(
        consumer,
        PeerConfig::consumer_only(name("/late"))
            .with_retransmissions(10)
            .with_nonce_seed(3),
    )
    .unwrap();
    sim.install_peer(producer, PeerConfig::producer_only(name("/late")))
        .unwrap();

    // producer comes up after the first Interest has gone unanswered
    sim.start_peer(consumer).unwrap();
    let early = sim.run_until(SimTime::from_millis(1500));
    assert_eq!(early.data_received, 0);

    sim.start_peer(producer).unwrap();
    let stats = sim.run_until(SimTime::from_millis(6000));

    assert!(stats.timeouts >= 1);
    assert!(stats.data_received >= 1);
    let tracker = sim.peer(consumer).unwrap().consumer().unwrap().tracker();
    assert!(!tracker.contains(0));
}
