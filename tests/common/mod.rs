#![allow(dead_code)]

use std::collections::HashSet;
use std::time::Duration;

use dispatch_routing::api::{SolveRequest, SolveResponse};
use dispatch_routing::config::SolverConfig;
use dispatch_routing::distance::CostMatrix;
use dispatch_routing::models::{Location, Vehicle};
use dispatch_routing::search::VirtualClock;
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; `RUST_LOG=debug` shows search traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config that converges quickly and never depends on wall time.
pub fn fast_config() -> SolverConfig {
    SolverConfig::default().with_max_stagnation(25)
}

/// Clock advancing 1 µs per read; the default 5 s budget is never the limit.
pub fn virtual_clock() -> VirtualClock {
    VirtualClock::new(Duration::from_micros(1))
}

/// Request with customers spaced along a meridian near Berlin.
pub fn request(demands: &[i64], capacities: &[i64]) -> SolveRequest {
    SolveRequest {
        locations: demands
            .iter()
            .enumerate()
            .map(|(i, &d)| Location::new(52.50 + i as f64 * 0.01, 13.40, d))
            .collect(),
        vehicles: capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| Vehicle::new(100 + i as i64, c))
            .collect(),
    }
}

/// Asserts every structural property a response must have.
pub fn assert_consistent(
    request: &SolveRequest,
    matrix: &CostMatrix,
    response: &SolveResponse,
    max_rounds: u32,
) {
    let n = request.locations.len();
    let total: i64 = response.routes.iter().map(|r| r.distance).sum();
    assert_eq!(response.total_distance, total);

    let mut served = HashSet::new();
    for route in &response.routes {
        assert!(route.route.len() >= 2);
        assert_eq!(route.route.first(), Some(&0));
        assert_eq!(route.route.last(), Some(&0));
        let inner = &route.route[1..route.route.len() - 1];
        for &node in inner {
            assert!(node > 0 && node < n, "bad node {node}");
            assert!(served.insert(node), "node {node} served twice");
        }

        let vehicle = request
            .vehicles
            .iter()
            .find(|v| v.id == route.vehicle_id)
            .expect("known vehicle");
        let load: i64 = inner.iter().map(|&i| request.locations[i].demand).sum();
        assert!(load <= vehicle.capacity);

        let distance: i64 = route.route.windows(2).map(|w| matrix.get(w[0], w[1])).sum();
        let distance = if inner.is_empty() { 0 } else { distance };
        assert_eq!(route.distance, distance);
    }

    let trips = response.rounds.len();
    assert!(trips >= 1 && trips <= max_rounds as usize);
    assert_eq!(response.routes.len(), trips * request.vehicles.len());

    for node in 1..n {
        assert_ne!(
            served.contains(&node),
            response.unserved.contains(&node),
            "node {node} must be served or unserved, not both"
        );
    }
    if !response.unserved.is_empty() {
        assert_eq!(trips, max_rounds as usize);
    }

    let max_capacity = request.vehicles.iter().map(|v| v.capacity).max().unwrap_or(0);
    for node in 1..n {
        let oversized = request.locations[node].demand > max_capacity;
        assert_eq!(response.undeliverable.contains(&node), oversized);
    }
}
