// SPDX-License-Identifier: MPL-2.0

//! Protect dashboard example.
//!
//! Seeds an in-memory device data store with two Protect alarms and one
//! temperature sensor, builds the full entity set, and prints every entity
//! state. A second poll cycle mutates the records to show how entities pick
//! up fresh data.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example protect_dashboard
//! ```

use std::sync::Arc;

use nestor_lib::{
    DeviceDataStore, DeviceId, Entity, ProtectState, TemperatureSensorState, binary_sensor, sensor,
};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(seed_store()?);

    let mut entities = binary_sensor::setup_platform(&store);
    entities.extend(sensor::setup_platform(&store));

    println!("=== Initial Poll ===");
    refresh_and_print(&mut entities).await?;

    // A later poll reports smoke in the hallway and a low puck battery
    store.update_protect(&DeviceId::new("hallway"), |state| {
        state.smoke_status = Some(2);
        state.auto_away = Some(false);
    })?;
    store.update_temperature_sensor(&DeviceId::new("bedroom_puck"), |state| {
        state.battery_level = Some(11.0);
    })?;

    println!();
    println!("=== After Smoke Event ===");
    refresh_and_print(&mut entities).await?;

    Ok(())
}

fn seed_store() -> nestor_lib::Result<DeviceDataStore> {
    let store = DeviceDataStore::new()
        .with_protect(
            DeviceId::new("hallway"),
            ProtectState::new()
                .with_name("Hallway Protect")
                .with_co_status(0)
                .with_smoke_status(0)
                .with_auto_away(true)
                .with_line_power_present(true)
                .with_home_away_input(false)
                .with_self_tests(true, true, true, true, true)
                .with_born_on_date("2021-05-17T00:00:00Z".parse()?)
                .with_replace_by_date("2031-05-17T00:00:00Z".parse()?)
                .with_serial_number("09AA01AC481605C5")
                .with_wired_or_battery(0),
        )
        .with_protect(
            DeviceId::new("garage"),
            ProtectState::new()
                .with_name("Garage Protect")
                .with_co_status(0)
                .with_smoke_status(0)
                .with_battery_health_state(1)
                .with_battery_level(3.1)
                .with_self_tests(true, false, true, true, true)
                .with_wired_or_battery(1),
        )
        .with_temperature_sensor(
            DeviceId::new("bedroom_puck"),
            TemperatureSensorState::new()
                .with_name("Bedroom Sensor")
                .with_temperature(21.5)
                .with_battery_level(94.0),
        );

    Ok(store)
}

async fn refresh_and_print(entities: &mut [Box<dyn Entity>]) -> nestor_lib::Result<()> {
    for entity in entities.iter_mut() {
        entity.update().await?;
    }

    for entity in entities.iter() {
        println!(
            "[{}] {}: {}",
            entity.platform(),
            entity.name().unwrap_or_else(|| "(unnamed)".to_string()),
            state_label(&entity.state_json()),
        );
    }

    Ok(())
}

/// Renders a JSON state the way a dashboard row would.
fn state_label(state: &Value) -> String {
    match state {
        Value::Null => "unknown".to_string(),
        Value::Bool(true) => "on".to_string(),
        Value::Bool(false) => "off".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
