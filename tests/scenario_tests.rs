//! Scenario tests S1-S6 lifted directly from the engine's testable
//! properties: linear asymmetric routes, transfers, unknown names, a
//! persistence round-trip, a stop with no buses, and a non-roundtrip
//! terminus split.

use transit_catalogue::catalog::Catalog;
use transit_catalogue::config::RoutingSettings;
use transit_catalogue::render::settings::RenderSettings;
use transit_catalogue::router::itinerary::{self, Item};
use transit_catalogue::router::Router;
use transit_catalogue::{persistence, protocol, transit};

fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("transit_catalogue_scenario_{}_{}.bin", std::process::id(), name))
}

/// S1 — linear route, asymmetric distance.
#[test]
fn s1_linear_route_asymmetric_distance() {
    let mut catalog = Catalog::new();
    catalog.add_stop("A", 55.611_087, 37.20829).unwrap();
    catalog.add_stop("B", 55.595_884, 37.209755).unwrap();
    catalog.set_distance("A", "B", 3900).unwrap();
    catalog.set_distance("B", "A", 4500).unwrap();
    catalog.add_bus("X", &["A".into(), "B".into()], false).unwrap();

    let info = catalog.bus_info("X").unwrap();
    assert_eq!(info.total_stop_count, 3);
    assert_eq!(info.unique_stop_count, 2);
    assert_eq!(info.route_length, 8400);

    let a = catalog.find_stop("A").unwrap();
    let b = catalog.find_stop("B").unwrap();
    let geo = a.coordinate.great_circle_distance(&b.coordinate);
    let expected_curvature = 8400.0 / (2.0 * geo);
    assert!((info.curvature - expected_curvature).abs() < 1e-9);
    assert!((info.curvature - 2.48).abs() < 0.05);
}

fn s2_catalog() -> (Catalog, RoutingSettings) {
    let mut catalog = Catalog::new();
    catalog.add_stop("P", 0.0, 0.0).unwrap();
    catalog.add_stop("Q", 0.0, 0.001).unwrap();
    catalog.add_stop("R", 0.0, 0.002).unwrap();
    catalog.set_distance("P", "Q", 1000).unwrap();
    catalog.set_distance("Q", "P", 1000).unwrap();
    catalog.set_distance("Q", "R", 1000).unwrap();
    catalog.set_distance("R", "Q", 1000).unwrap();
    catalog.add_bus("U", &["P".into(), "Q".into(), "P".into()], true).unwrap();
    catalog.add_bus("V", &["Q".into(), "R".into(), "Q".into()], true).unwrap();
    (catalog, RoutingSettings { bus_wait_time: 6, bus_velocity: 40.0 })
}

/// S2 — route query with a transfer.
#[test]
fn s2_route_query_with_transfer() {
    let (catalog, settings) = s2_catalog();
    let graph = transit::build_graph(&catalog, &settings).unwrap();
    let router = Router::new(&graph).unwrap();

    let itinerary =
        itinerary::build_route(&catalog, &graph, &router, settings.bus_wait_time as f64, "P", "R").unwrap();
    assert_eq!(itinerary.items.len(), 4);
    assert!((itinerary.total_time - 15.0).abs() < 1e-9);

    match &itinerary.items[0] {
        Item::Wait { stop, time } => {
            assert_eq!(stop, "P");
            assert_eq!(*time, 6.0);
        }
        _ => panic!("expected Wait at P"),
    }
    match &itinerary.items[1] {
        Item::Ride { bus, span_count, time } => {
            assert_eq!(bus, "U");
            assert_eq!(*span_count, 1);
            assert!((*time - 1.5).abs() < 1e-9);
        }
        _ => panic!("expected Ride on U"),
    }
    match &itinerary.items[2] {
        Item::Wait { stop, time } => {
            assert_eq!(stop, "Q");
            assert_eq!(*time, 6.0);
        }
        _ => panic!("expected Wait at Q"),
    }
    match &itinerary.items[3] {
        Item::Ride { bus, span_count, time } => {
            assert_eq!(bus, "V");
            assert_eq!(*span_count, 1);
            assert!((*time - 1.5).abs() < 1e-9);
        }
        _ => panic!("expected Ride on V"),
    }
}

/// S3 — unknown route endpoint.
#[test]
fn s3_unknown_route_endpoint_is_not_found() {
    let (catalog, settings) = s2_catalog();
    let graph = transit::build_graph(&catalog, &settings).unwrap();
    let router = Router::new(&graph).unwrap();

    let result = itinerary::build_route(&catalog, &graph, &router, settings.bus_wait_time as f64, "P", "Z");
    assert!(result.is_none());

    let stat_requests =
        serde_json::from_value(serde_json::json!([{"id": 3, "type": "Route", "from": "P", "to": "Z"}])).unwrap();
    let json =
        protocol::process_stat_requests(&catalog, &RenderSettings::default(), &graph, &router, 6.0, &stat_requests)
            .unwrap();
    assert!(json.contains("\"request_id\":3"));
    assert!(json.contains("\"error_message\":\"not found\""));
}

/// S4 — round-trip persistence: reload the artifact and reissue S1-S3.
#[test]
fn s4_round_trip_persistence_reproduces_queries() {
    let (catalog, settings) = s2_catalog();
    let graph = transit::build_graph(&catalog, &settings).unwrap();
    let router = Router::new(&graph).unwrap();
    let render_settings = RenderSettings::default();

    let path = scratch_path("s4");
    persistence::save(&path, &catalog, &render_settings, &settings, &graph, router.table()).unwrap();

    let artifact = persistence::load(&path);
    std::fs::remove_file(&path).ok();

    let reloaded_catalog = persistence::from_catalog_section(artifact.catalog);
    let reloaded_graph = persistence::from_graph_section(artifact.graph);
    let reloaded_router = persistence::router_from_table(&reloaded_graph, artifact.router_table);

    let before = itinerary::build_route(&catalog, &graph, &router, settings.bus_wait_time as f64, "P", "R").unwrap();
    let after = itinerary::build_route(
        &reloaded_catalog,
        &reloaded_graph,
        &reloaded_router,
        artifact.routing_settings.bus_wait_time as f64,
        "P",
        "R",
    )
    .unwrap();
    assert_eq!(before.total_time, after.total_time);
    assert_eq!(before.items.len(), after.items.len());

    assert!(itinerary::build_route(&reloaded_catalog, &reloaded_graph, &reloaded_router, 6.0, "P", "Z").is_none());
}

/// S5 — stop with no buses.
#[test]
fn s5_stop_with_no_buses_returns_empty_list() {
    let mut catalog = Catalog::new();
    catalog.add_stop("K", 10.0, 10.0).unwrap();
    assert_eq!(catalog.buses_at_stop("K"), Some(Vec::new()));
}

/// S6 — non-roundtrip terminus: forward and return legs don't cross.
#[test]
fn s6_non_roundtrip_terminus_uses_correct_leg() {
    let mut catalog = Catalog::new();
    catalog.add_stop("A", 0.0, 0.0).unwrap();
    catalog.add_stop("B", 0.0, 0.001).unwrap();
    catalog.add_stop("C", 0.0, 0.002).unwrap();
    catalog.set_distance("A", "B", 100).unwrap();
    catalog.set_distance("B", "C", 200).unwrap();
    catalog.set_distance("C", "B", 500).unwrap();
    catalog.set_distance("B", "A", 900).unwrap();
    catalog.add_bus("W", &["A".into(), "B".into(), "C".into()], false).unwrap();

    let bus = catalog.find_bus("W").unwrap();
    assert_eq!(bus.stops, vec![0, 1, 2, 1, 0]);

    let settings = RoutingSettings { bus_wait_time: 0, bus_velocity: 1.0 };
    let graph = transit::build_graph(&catalog, &settings).unwrap();
    let router = Router::new(&graph).unwrap();

    let forward = itinerary::build_route(&catalog, &graph, &router, 0.0, "A", "C").unwrap();
    let ret = itinerary::build_route(&catalog, &graph, &router, 0.0, "C", "A").unwrap();

    // forward leg only uses A->B (100) + B->C (200) = 300 * 0.06
    assert!((forward.total_time - (300.0 * 0.06)).abs() < 1e-9);
    // return leg only uses C->B (500) + B->A (900) = 1400 * 0.06
    assert!((ret.total_time - (1400.0 * 0.06)).abs() < 1e-9);
    assert_ne!(forward.total_time, ret.total_time);
}
