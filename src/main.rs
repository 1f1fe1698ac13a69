//! Fidget spinner headless demo
//!
//! Simulates a burst of clicks at 60 fps and logs every event the spinner
//! emits. Usage: `fidget-spin [options.json] [seed]`

use std::error::Error;

use fidget_spin::{FidgetSpinner, SpinnerEvent, SpinnerOptions};

const FRAME_MS: f64 = 1000.0 / 60.0;
const CLICKS: u32 = 10;
const CLICK_SPACING_MS: f64 = 120.0;
/// Give up after a minute of simulated time
const MAX_FRAMES: u32 = 60 * 60;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let options = match args.next() {
        Some(path) => {
            log::info!("Loading options from {}", path);
            SpinnerOptions::from_json(&std::fs::read_to_string(&path)?)?
        }
        None => SpinnerOptions::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed.parse()?,
        None => 0x5eed,
    };

    let configs = options.build()?;
    log::info!(
        "Spinner starting (seed {}, {} breakpoints)",
        seed,
        configs.breakpoints.len()
    );
    let mut spinner = FidgetSpinner::with_seed(configs, seed);

    let mut now = 0.0;
    let mut clicks = 0;
    let mut spawned = 0;
    for frame in 0..MAX_FRAMES {
        if clicks < CLICKS && now >= clicks as f64 * CLICK_SPACING_MS {
            spinner.add_energy(now);
            clicks += 1;
        }
        spinner.tick(now);

        for event in spinner.drain_events() {
            match event {
                SpinnerEvent::Spawn { .. } => spawned += 1,
                SpinnerEvent::Remove { .. } => {}
                other => log::info!("{:>8.1} ms  {}", now, serde_json::to_string(&other)?),
            }
        }
        if frame % 15 == 0 {
            println!("{}", serde_json::to_string(&spinner.snapshot())?);
        }

        let settled = !spinner.rotation().is_active()
            && spinner.bubbles().is_empty()
            && spinner.sparks().is_empty();
        if clicks == CLICKS && settled {
            break;
        }
        now += FRAME_MS;
    }

    log::info!(
        "Spinner at rest after {:.0} ms, {} particles spawned",
        now,
        spawned
    );
    Ok(())
}
