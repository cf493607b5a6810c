use qnet::{
    time::Time, Interval, Network, RoutedRejection, Station, StationDesc, EXIT,
};
use rand::{rngs::StdRng, SeedableRng};

fn network(start: f64, iterations: usize) -> Network<StdRng> {
    Network::builder()
        .start(start)
        .iterations(iterations)
        .rng(StdRng::seed_from_u64(1))
        .build()
}

fn station(arrival: (f64, f64), service: (f64, f64), capacity: usize) -> Station {
    Station::builder()
        .arrival(arrival.into())
        .service(service.into())
        .capacity(capacity)
        .build()
}

#[test]
fn zero_iterations_is_a_no_op() {
    let mut net = network(2.0, 0);
    net.add_station("A", station((1.0, 2.0), (1.0, 2.0), 3));
    let report = net.run();
    assert_eq!(report.rounds, 0);
    assert_eq!(report.current_time, Time::new(2.0));
    assert_eq!(report.lost, 0);
    assert_eq!(report.stations[0].buffered, 0);
}

#[test]
fn one_arrival_per_station_per_round() {
    let mut net = network(0.0, 50);
    net.add_station("A", station((1.0, 3.0), (0.0, 1.0), 10));
    net.add_station("B", station((1.0, 3.0), (0.0, 1.0), 0));
    let report = net.run();
    assert_eq!(report.rounds, 50);
    for s in &report.stations {
        assert_eq!(s.admitted + s.rejected, 50);
    }
    assert_eq!(report.station("A").unwrap().admitted, 10);
    assert_eq!(report.station("B").unwrap().rejected, 50);
    assert_eq!(report.lost, 40 + 50);
}

// One station, no room, no service time: every arrival is lost and the clock never moves
#[test]
fn full_station_loses_every_arrival() {
    let mut net = network(3.0, 5);
    net.add_station("A", station((1.0, 1.0), (0.0, 0.0), 0));
    let report = net.run();
    assert_eq!(report.lost, 5);
    assert_eq!(report.current_time, Time::new(3.0));
}

fn forward_to_full(policy: RoutedRejection) -> qnet::Report {
    let mut net = Network::builder()
        .start(0.0)
        .iterations(20)
        .rng(StdRng::seed_from_u64(5))
        .routed_rejection(policy)
        .build();
    let mut a = station((1.0, 1.0), (0.0, 0.0), 4);
    a.add_route("B", 1.0);
    net.add_station("A", a);
    net.add_station("B", station((1.0, 1.0), (0.0, 0.0), 0));
    net.run()
}

#[test]
fn routed_rejections_are_dropped_silently() {
    let report = forward_to_full(RoutedRejection::Ignore);
    let a = report.station("A").unwrap();
    let b = report.station("B").unwrap();
    assert_eq!(a.rejected, 16);
    assert_eq!(b.rejected, 20);
    assert_eq!(b.routed_rejected, 20);
    assert_eq!(b.buffered, 0);
    // Only refused external arrivals count
    assert_eq!(report.lost, a.rejected + b.rejected);
}

#[test]
fn routed_rejections_can_count_as_lost() {
    let report = forward_to_full(RoutedRejection::CountAsLoss);
    let a = report.station("A").unwrap();
    let b = report.station("B").unwrap();
    assert_eq!(report.lost, a.rejected + b.rejected + b.routed_rejected);
    assert_eq!(report.lost, 16 + 20 + 20);
}

#[test]
fn exit_loses_exactly_one_customer() {
    let mut net = network(0.0, 30);
    let mut a = station((1.0, 2.0), (0.0, 1.0), 100);
    a.add_route(EXIT, 1.0);
    net.add_station("A", a);
    let report = net.run();
    let a = report.station("A").unwrap();
    assert_eq!(a.exited, 30);
    assert_eq!(a.rejected, 0);
    assert_eq!(a.buffered, 30);
    assert_eq!(report.lost, 30);
}

#[test]
fn unknown_destination_is_reported_not_lost() {
    let mut net = network(0.0, 12);
    let mut a = station((1.0, 2.0), (0.0, 1.0), 100);
    a.add_route("nowhere", 1.0);
    net.add_station("A", a);
    let report = net.run();
    assert_eq!(report.lost, 0);
    assert_eq!(report.unresolved_routes, 12);
    assert_eq!(report.station("A").unwrap().buffered, 12);
}

#[test]
fn clock_is_non_decreasing() {
    let mut net = network(1.0, 0);
    net.add_station("A", station((1.0, 2.0), (0.5, 1.5), 5));
    net.add_station("B", station((1.0, 2.0), (0.0, 2.0), 5));
    let mut prev = net.current_time();
    for round in 1..=200 {
        net.process_round();
        let now = net.current_time();
        let step = (now - prev).into_f64();
        // One service sample per station
        assert!((0.5..3.5).contains(&step), "round {round}: step {step}");
        prev = now;
    }
    assert_eq!(net.rounds(), 200);
}

#[test]
fn exact_clock_with_fixed_service() {
    let mut net = network(10.0, 4);
    net.add_station("A", station((1.0, 1.0), (2.0, 2.0), 5));
    net.add_station("B", station((1.0, 1.0), (0.25, 0.25), 5));
    let report = net.run();
    assert_eq!(report.current_time, Time::new(10.0 + 4.0 * 2.25));
}

#[test]
fn buffers_never_exceed_capacity() {
    let mut net = network(0.0, 0);
    let mut a = station((0.0, 1.0), (0.0, 1.0), 7);
    a.add_route("B", 0.6);
    a.add_route("A", 0.3);
    a.add_route(EXIT, 0.1);
    let mut b = station((0.0, 1.0), (0.0, 1.0), 3);
    b.add_route("A", 0.9);
    net.add_station("A", a);
    net.add_station("B", b);
    for _ in 0..500 {
        net.process_round();
        for name in ["A", "B"] {
            let s = net.station(name).unwrap();
            assert!(s.buffer().len() <= s.capacity());
        }
    }
}

#[test]
fn same_seed_same_report() {
    let build = || {
        let mut net = network(0.0, 300);
        let mut a = station((1.0, 4.0), (0.5, 2.0), 20);
        a.add_route("B", 0.5);
        a.add_route(EXIT, 0.25);
        net.add_station("A", a);
        net.add_station("B", station((2.0, 3.0), (0.1, 0.2), 8));
        net
    };
    assert_eq!(build().run(), build().run());
}

#[test]
fn desc_intervals_convert() {
    let desc = StationDesc {
        name: "A".into(),
        arrival: Interval::new(1.0, 2.0),
        service: Interval::new(0.0, 1.0),
        servers: 1,
        capacity: 2,
        routes: Vec::new(),
    };
    let json = serde_json::to_value(&desc).unwrap();
    assert_eq!(json["arrival"], serde_json::json!([1.0, 2.0]));
}
