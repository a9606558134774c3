//! Terminal check-in countdown.

use std::time::Duration;

use chrono::Utc;
use safe_steps_incident_models::GeoPoint;
use safe_steps_sos::{CheckInTimer, SosAlert, TimerState, format_countdown};

/// Counts down `minutes`, printing the remaining time to stderr. Ctrl-C
/// cancels. If the countdown runs out, the SOS alert that would be sent
/// is printed to stdout; nothing is dispatched.
pub async fn run(minutes: u32, point: GeoPoint) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = CheckInTimer::new();
    let deadline = timer.start(minutes, Utc::now())?;
    log::info!("Check in before {deadline}, or press Ctrl-C to cancel");

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => match timer.poll(Utc::now()) {
                TimerState::Running { remaining_secs } => {
                    eprint!("\r{} remaining ", format_countdown(remaining_secs));
                }
                TimerState::Expired => {
                    eprintln!();
                    let alert = SosAlert::new(point, Utc::now());
                    log::warn!("Check-in missed, raising SOS alert {}", alert.id);
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "alert": alert,
                            "message": alert.message(),
                            "dispatched": false,
                        }))?
                    );
                    return Ok(());
                }
                TimerState::Idle => return Ok(()),
            },
            result = &mut ctrl_c => {
                result?;
                eprintln!();
                timer.cancel();
                println!("You're safe. Timer cancelled.");
                return Ok(());
            }
        }
    }
}
