use std::env;
use std::fs;
use std::process;

use tokio::time::{self, Duration};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rglances::config::Config;
use rglances::sensor::{setup, GlancesSensor};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for --oneshot argument
    let oneshot = env::args().any(|arg| arg == "--oneshot");

    // Load configuration
    let config_str = fs::read_to_string("rglances.toml").expect("Failed to read config file");
    let config: Config = toml::from_str(&config_str).expect("Failed to parse config file");

    let sensors = match setup(&config).await {
        Ok(sensors) => sensors,
        Err(e) => {
            error!("setup failed: {e}");
            process::exit(1);
        }
    };
    if sensors.is_empty() {
        error!("none of the configured resources is a known sensor type");
        process::exit(1);
    }

    let mut interval = time::interval(Duration::from_secs(config.collect_interval));

    // The first tick completes immediately; setup already primed the payload,
    // so report right away and only then start waiting out full intervals.
    interval.tick().await;

    loop {
        report(&sensors);
        if oneshot {
            break;
        }

        interval.tick().await;
        for sensor in &sensors {
            if let Err(e) = sensor.update().await {
                error!("update failed: {e}");
                process::exit(1);
            }
        }
    }
}

fn report(sensors: &[GlancesSensor]) {
    for sensor in sensors {
        match sensor.state() {
            Some(value) => println!(
                "{}: {} {}",
                sensor.name(),
                value,
                sensor.unit_of_measurement()
            ),
            None => println!("{}: unknown", sensor.name()),
        }
    }
}
