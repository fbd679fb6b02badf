//! Example driving the countdown from a terminal
//!
//! This example shows how to:
//! 1. Build an anniversary clock from `countdown.toml` and the environment
//! 2. Feed a `CountdownTicker` once per second from the system clock
//! 3. Render each snapshot as a single status line
//!
//! To run this example:
//! ```bash
//! ANNIVERSARY_MONTH=5 ANNIVERSARY_DAY=25 cargo run --example terminal_countdown
//! ```

use std::time::Duration;

use birthday_countdown::config::AppConfig;
use birthday_countdown::models::{CountdownPhase, SystemTimeSource, TimeSource};
use birthday_countdown::services::CountdownTicker;

const TICKS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let clock = config.to_clock()?;
    println!(
        "Counting down to {} ({}) at UTC{}\n",
        config.anniversary.label,
        clock.date(),
        clock.offset()
    );

    let time = SystemTimeSource;
    let mut ticker = CountdownTicker::new(clock);
    let mut interval = tokio::time::interval(Duration::from_secs(1));

    for _ in 0..TICKS {
        interval.tick().await;
        let snapshot = ticker.tick(time.now());

        if let Some(transition) = ticker.last_transition() {
            println!("-- {} -> {} --", transition.from, transition.to);
        }

        match snapshot.phase {
            CountdownPhase::CountingDown => {
                let r = snapshot.remaining;
                println!(
                    "{:>3}d {:02}h {:02}m {:02}s",
                    r.days, r.hours, r.minutes, r.seconds
                );
            }
            CountdownPhase::AnniversaryActive => {
                println!("Happy birthday, {}!", config.anniversary.label);
            }
        }
    }

    Ok(())
}
