//! pcdevd binary.
//!
//! # Usage
//!
//! ```bash
//! # Register the built-in two-device table and run every demonstration
//! pcdevd --demo all
//!
//! # Load a device table and run only the seqlock demonstration
//! pcdevd --devices devices.toml --demo seqlock --iterations 10000
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use pcdev_core::{AccessMode, DeviceError};
use pcdev_driver::{DeviceEntry, DeviceTable, Driver, PlatformBus, PlatformDriver};
use pcdev_harness::{Scenario, ScenarioConfig, run};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Pseudo character device demonstrator
#[derive(Parser, Debug)]
#[command(name = "pcdevd")]
#[command(about = "Pseudo character device registry and synchronization demos")]
#[command(version)]
struct Args {
    /// Path to a TOML device table (built-in two-device table when omitted)
    #[arg(short, long)]
    devices: Option<PathBuf>,

    /// Demonstration to run: mutex, rwlock, seqlock, spinlock, waitqueue, or all
    #[arg(long, default_value = "all")]
    demo: String,

    /// Units of work per worker
    #[arg(long, default_value = "1000")]
    iterations: u64,

    /// Pause between units, in milliseconds
    #[arg(long, default_value = "0")]
    interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Bus driver that announces matched devices and exercises each one.
struct AnnouncingDriver {
    bound: usize,
}

impl PlatformDriver for AnnouncingDriver {
    fn match_name(&self) -> &str {
        "pcd-char-device"
    }

    fn probe(&mut self, entry: &DeviceEntry) -> Result<(), DeviceError> {
        self.bound += 1;
        tracing::info!(
            device = %entry.descriptor().label(),
            capacity = entry.descriptor().capacity,
            serial = %entry.descriptor().serial_number,
            "device bound"
        );
        Ok(())
    }

    fn remove(&mut self, entry: &DeviceEntry) {
        self.bound -= 1;
        tracing::info!(device = %entry.descriptor().label(), "device unbound");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("pcdevd starting");

    let table = match &args.devices {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading device table");
            DeviceTable::load(path)?
        }
        None => DeviceTable::default(),
    };

    let mut bus = PlatformBus::new();
    bus.register_driver(Box::new(AnnouncingDriver { bound: 0 }))?;
    table.apply(&mut bus)?;

    exercise_devices(&bus)?;

    let scenarios = select_scenarios(&args.demo)?;
    let config = ScenarioConfig {
        iterations: args.iterations,
        interval: Duration::from_millis(args.interval_ms),
    };

    for scenario in scenarios {
        let report = run(scenario, config)?;
        tracing::info!(
            scenario = scenario.name(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            committed = report.committed,
            observed = report.observed,
            "demonstration complete"
        );
    }

    tracing::info!("pcdevd done");
    Ok(())
}

/// Smoke-test every registered device: write its serial, read it back.
fn exercise_devices(bus: &PlatformBus) -> Result<(), DeviceError> {
    let driver = Driver::new(bus.registry());

    for descriptor in bus.registry().with(|r| r.descriptors()) {
        if descriptor.permission != pcdev_core::DevicePermission::ReadWrite {
            tracing::info!(device = %descriptor.label(), "skipping non-read-write device");
            continue;
        }

        let handle = driver.attach_instance(&descriptor.name, descriptor.instance_id)?;
        let mut session = driver.open(&handle, AccessMode::ReadWrite)?;

        let written = session.write(descriptor.serial_number.as_bytes())?;
        session.seek(0, pcdev_core::Whence::Start)?;
        let echoed = session.read(written)?;
        tracing::info!(
            device = %descriptor.label(),
            written,
            echo = %String::from_utf8_lossy(&echoed),
            "device exercised"
        );

        driver.close(session);
        driver.detach(handle);
    }
    Ok(())
}

fn select_scenarios(demo: &str) -> Result<Vec<Scenario>, String> {
    if demo == "all" {
        return Ok(Scenario::all().to_vec());
    }
    Scenario::all()
        .into_iter()
        .find(|s| s.name() == demo)
        .map(|s| vec![s])
        .ok_or_else(|| format!("unknown demo '{demo}' (try mutex, rwlock, seqlock, spinlock, waitqueue, or all)"))
}
