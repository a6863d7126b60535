//! Simulated wheel driving the engine through the pulse pump

use std::sync::Arc;

use vital::sensors::{PulsePump, PulseSimulator};
use vital::{Config, Engine};

#[tokio::test(start_paused = true)]
async fn test_bouncy_simulator_counts_each_rotation_once() {
    let config = Arc::new(Config::default());
    let engine = Arc::new(Engine::new(config.clone()));
    let source = PulseSimulator::seeded("sim", config.rider.circumference_metres, 42)
        .with_speed(18.0)
        .with_bounce_probability(1.0)
        .with_stop_probability(0.0)
        .with_max_rotations(200);

    let pump = PulsePump::connect(Box::new(source), engine.clone()).await.unwrap();
    let (_tx, rx) = tokio::sync::broadcast::channel(1);
    let report = pump.run(rx).await.unwrap();

    // Every rotation produced a rising edge, a falling edge and one bounce pair
    assert_eq!(report.events, 800);
    assert_eq!(report.falling_edges, 400);

    let stats = engine.snapshot();
    assert_eq!(stats.total_revolutions, 200);
    assert!(stats.speed_kilometres_per_hour > 3.0 && stats.speed_kilometres_per_hour < 100.0);
    assert_eq!(stats.distance_kilometres, 0.282);
}

#[tokio::test(start_paused = true)]
async fn test_clean_simulator_matches_rotation_count() {
    let config = Arc::new(Config::default());
    let engine = Arc::new(Engine::new(config.clone()));
    let source = PulseSimulator::seeded("sim", config.rider.circumference_metres, 5)
        .with_bounce_probability(0.0)
        .with_max_rotations(100);

    let pump = PulsePump::connect(Box::new(source), engine.clone()).await.unwrap();
    let (_tx, rx) = tokio::sync::broadcast::channel(1);
    let report = pump.run(rx).await.unwrap();

    assert_eq!(report.falling_edges, 100);
    assert_eq!(engine.snapshot().total_revolutions, 100);
}
