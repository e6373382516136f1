//! Four vehicles around an Earth with atmosphere, driven by the simulation clock.
//!
//! Run with `ORRERY_LOG=info cargo run --example orbit_demo` to see removals, or
//! `ORRERY_LOG=trace` for the mode chosen at every tick.
use nalgebra::Vector3;

use orrery::constants::EARTH_RADIUS;
use orrery::primary::Primary;
use orrery::propagator::params::PropagatorParams;
use orrery::simulator::Simulator;
use orrery::time_control::{SimulationClock, TIME_SCALE};
use orrery::vehicle::Vehicle;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("ORRERY_LOG");

    let params = PropagatorParams::builder().substeps(32).build()?;
    println!("{params:#}");

    // 2024-01-01T00:00:00 UTC
    let mut sim = Simulator::new(params, SimulationClock::from_unix_seconds(1_704_067_200.0));
    let earth = sim.add_primary(Primary::earth());
    let center = sim.primary(earth).map(|p| p.position).unwrap_or_else(Vector3::zeros);

    let initial = [
        ("TestVehicle", Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 5588.0, 50.0)),
        ("TestVehicle2", Vector3::new(2.05, 0.0, 0.0), Vector3::new(0.0, 6588.0, 50.0)),
        ("TestVehicle3", Vector3::new(1.95, 0.0, 0.0), Vector3::new(200.0, 2588.0, 1500.0)),
        ("TestVehicle4", Vector3::new(1.9, 1.0, 0.0), Vector3::new(0.0, 0.0, 1500.0)),
    ];
    let mut ids = Vec::new();
    for (name, offset, velocity) in initial {
        let vehicle = Vehicle::new(name, center + offset * EARTH_RADIUS, velocity);
        ids.push(sim.add_vehicle(vehicle, earth)?);
    }

    for id in &ids {
        if let Some(elements) = sim.vehicle(*id).and_then(|v| v.elements.as_ref()) {
            println!("{}\n{elements}", sim.vehicle(*id).map_or("", |v| &v.name));
        }
    }

    // Fastest speed, then a short burn of the first vehicle
    while sim.clock.speed() + 1 < TIME_SCALE.len() {
        sim.clock.faster();
    }
    sim.select(ids.first().copied());
    sim.set_thrust(1.0);

    let frame = 1.0 / 60.0;
    for step in 0..6_000 {
        if step == 600 {
            sim.set_thrust(0.0);
        }
        let report = sim.advance(frame);
        for (id, vehicle) in &report.removed {
            println!(
                "{} removed {id:?} {} at altitude {:.1} m",
                sim.clock,
                vehicle.name,
                vehicle.position.norm() - EARTH_RADIUS
            );
        }
        for (id, err) in &report.failures {
            println!("{} failure {id:?}: {err}", sim.clock);
        }
    }

    println!("\nAfter {}:", sim.clock);
    for (id, vehicle) in sim.vehicles() {
        let altitude = vehicle.position.norm() - EARTH_RADIUS;
        let shape = vehicle
            .elements
            .as_ref()
            .map_or("unknown".to_string(), |e| e.shape.to_string());
        println!(
            "  {id:?} {:<14} altitude = {:>12.1} km, speed = {:>8.1} m/s, {shape} orbit, {} trajectory points",
            vehicle.name,
            altitude / 1000.0,
            vehicle.velocity.norm(),
            vehicle
                .elements
                .as_ref()
                .map_or(0, |e| e.sample_trajectory(128).len())
        );
    }
    Ok(())
}
