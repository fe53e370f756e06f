#![forbid(unsafe_code)]

//! Simulated temperature/humidity sensor feeding the overlay readouts.
//!
//! A background worker random-walks both values on a fixed poll interval.
//! Readings only register as changed when they move past a minimum delta,
//! so the overlay is not rewritten for measurement jitter.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use lumatrix::TextSource;

/// Minimum temperature delta (°C) to register as an update.
const MIN_TEMP_CHANGE: f32 = 0.1;

/// Minimum humidity delta (%RH) to register as an update.
const MIN_HUMIDITY_CHANGE: f32 = 1.0;

const POLL_INTERVAL: Duration = Duration::from_millis(2000);
const SHUTDOWN_CHECK: Duration = Duration::from_millis(100);

struct SensorShared {
    /// f32 bits.
    temperature: AtomicU32,
    /// f32 bits.
    humidity: AtomicU32,
    changed: AtomicBool,
    shutdown: AtomicBool,
}

impl SensorShared {
    fn temperature(&self) -> f32 {
        f32::from_bits(self.temperature.load(Ordering::Relaxed))
    }

    fn humidity(&self) -> f32 {
        f32::from_bits(self.humidity.load(Ordering::Relaxed))
    }
}

/// Owns the polling worker; dropping stops and joins it.
pub struct SimSensor {
    shared: Arc<SensorShared>,
    worker: Option<JoinHandle<()>>,
}

impl SimSensor {
    /// Start the simulated sensor at a plausible room climate.
    #[must_use]
    pub fn spawn() -> Self {
        let shared = Arc::new(SensorShared {
            temperature: AtomicU32::new(21.5f32.to_bits()),
            humidity: AtomicU32::new(55.0f32.to_bits()),
            changed: AtomicBool::new(true),
            shutdown: AtomicBool::new(false),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("lumatrix-sensor".into())
            .spawn(move || poll_loop(&worker_shared))
            .ok();
        Self { shared, worker }
    }

    /// A [`TextSource`] view over the sensor, for the render driver.
    #[must_use]
    pub fn readout(&self) -> SensorReadout {
        SensorReadout { shared: Arc::clone(&self.shared) }
    }
}

impl Drop for SimSensor {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn poll_loop(shared: &Arc<SensorShared>) {
    let mut rng = StdRng::from_entropy();
    let mut temperature = shared.temperature();
    let mut humidity = shared.humidity();
    let mut since_poll = Duration::ZERO;
    while !shared.shutdown.load(Ordering::Relaxed) {
        thread::sleep(SHUTDOWN_CHECK);
        since_poll += SHUTDOWN_CHECK;
        if since_poll < POLL_INTERVAL {
            continue;
        }
        since_poll = Duration::ZERO;

        temperature = (temperature + rng.gen_range(-0.3..=0.3)).clamp(15.0, 30.0);
        humidity = (humidity + rng.gen_range(-1.5..=1.5)).clamp(20.0, 80.0);

        let mut changed = false;
        if (temperature - shared.temperature()).abs() >= MIN_TEMP_CHANGE {
            shared.temperature.store(temperature.to_bits(), Ordering::Relaxed);
            changed = true;
        }
        if (humidity - shared.humidity()).abs() >= MIN_HUMIDITY_CHANGE {
            shared.humidity.store(humidity.to_bits(), Ordering::Relaxed);
            changed = true;
        }
        if changed {
            shared.changed.store(true, Ordering::Relaxed);
            debug!(temperature, humidity, "sensor reading updated");
        }
    }
}

/// Read-side handle handed to the render driver.
pub struct SensorReadout {
    shared: Arc<SensorShared>,
}

impl TextSource for SensorReadout {
    fn take_changed(&mut self) -> bool {
        self.shared.changed.swap(false, Ordering::Relaxed)
    }

    fn field_a(&self) -> String {
        format_temperature(self.shared.temperature())
    }

    fn field_b(&self) -> String {
        format_humidity(self.shared.humidity())
    }
}

/// "21.5°" style, one decimal place.
fn format_temperature(celsius: f32) -> String {
    format!("{celsius:.1}°")
}

/// "55/" style; the '/' glyph draws as a percent sign.
fn format_humidity(percent: f32) -> String {
    format!("{percent:.0}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_formats() {
        assert_eq!(format_temperature(21.46), "21.5°");
        assert_eq!(format_temperature(5.0), "5.0°");
        assert_eq!(format_humidity(54.6), "55/");
        assert_eq!(format_humidity(7.0), "7/");
    }

    #[test]
    fn take_changed_is_consuming() {
        let sensor = SimSensor::spawn();
        let mut readout = sensor.readout();
        // spawn marks the initial reading as changed
        assert!(readout.take_changed());
        assert!(!readout.take_changed());
        assert_eq!(readout.field_a(), "21.5°");
        assert_eq!(readout.field_b(), "55/");
    }
}
