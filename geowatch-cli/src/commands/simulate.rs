//! Replay a recorded track through the monitoring engine.
//!
//! The engine runs against the simulated platform: the simulator reports
//! crossings of the watched expansion region as the track moves the device,
//! and a manual clock advances by each sample's elapsed time so dwell
//! requirements behave as they would in real time.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use geowatch::engine::MonitoringEngine;
use geowatch::event::{CollectingSink, MonitoringEvent};
use geowatch::notify::VisitNotifier;
use geowatch::platform::{SimulatedLocationService, SimulatedNotificationCenter};
use geowatch::time::{Clock, ManualClock};

use super::common::load_config;
use super::track::load_track;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Track file with one 'latitude,longitude,seconds' sample per line
    pub track: PathBuf,

    /// Config file (defaults to ~/.geowatch/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also print the notifications scheduled for visits
    #[arg(long)]
    pub notifications: bool,
}

/// Totals printed after a replay.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub samples: usize,
    pub events: usize,
    pub notifications: usize,
    pub open_visits: usize,
}

pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    let loaded = load_config(args.config.as_deref())?;
    let track = load_track(&args.track)?;

    println!(
        "Replaying {} samples against {} regions",
        track.len(),
        loaded.catalog.len()
    );
    println!();

    let platform = SimulatedLocationService::new();
    let clock = ManualClock::new();
    let events = CollectingSink::new();
    let center = SimulatedNotificationCenter::default();
    let mut notifier = VisitNotifier::new(center.clone());

    let mut engine = MonitoringEngine::new(loaded.file.engine, loaded.catalog, platform.clone())?
        .with_event_sink(events.clone())
        .with_notification_service(center.clone())
        .with_clock(Arc::new(clock.clone()));
    engine.start();
    engine.request_notification_authorization();

    let started = clock.now();
    let mut summary = ReplaySummary::default();

    for (index, point) in track.iter().enumerate() {
        if !clock.advance(point.elapsed) {
            return Err(CliError::InvalidArgument(format!(
                "track sample {} moves time past the supported range",
                index + 1
            )));
        }
        let transitions = platform.move_to(point.location);
        engine.location_updated(point.location);
        for transition in transitions {
            engine.region_transition(&transition.identifier, transition.kind);
        }

        summary.samples += 1;
        let now = clock.now();
        for event in events.drain() {
            summary.events += 1;
            print_event(elapsed_since(started, now), &event);

            match notifier.handle(&event, now) {
                Ok(true) => summary.notifications += 1,
                Ok(false) => {}
                Err(e) => println!("           notification failed: {}", e),
            }
        }
    }

    summary.open_visits = engine.visits().len();
    engine.shutdown();

    if args.notifications {
        println!();
        println!("Notifications:");
        for request in center.delivered() {
            println!("  {}: {}", request.title, request.body);
        }
    }

    println!();
    println!("Samples:       {}", summary.samples);
    println!("Events:        {}", summary.events);
    println!("Notifications: {}", summary.notifications);
    println!("Open visits:   {}", summary.open_visits);

    Ok(())
}

fn elapsed_since(start: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(start)
}

fn print_event(at: Duration, event: &MonitoringEvent) {
    let marker = if event.is_error() { "!" } else { " " };
    println!("[{:>7}s]{} {}", at.as_secs(), marker, event);
}
