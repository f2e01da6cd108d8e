//! Countdown Label - terminal demo
//!
//! Renders a countdown in the terminal. Ctrl-Z suspends it, `fg` resumes it
//! with the suspended time subtracted, Ctrl-C tears it down.

use std::{
    io::{self, Write},
    sync::Arc,
};
use tracing::{error, info};

use countdown_label::{
    config::Config,
    label::{LabelFrame, LabelPresenter, LifecycleBus, SystemClock},
    state::{CountdownController, TimerState},
    utils::forward_process_signals,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the label owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_label={}", config.log_level()))
        .with_writer(io::stderr)
        .init();

    info!("Starting countdown-label v1.0.0");
    info!("Configuration: duration={}s, always_show_hours={}, json={}",
          config.duration, config.always_show_hours, config.json);

    let countdown = config.countdown().on_expire(|| info!("Time is up"));
    let controller = CountdownController::new(countdown);
    let bus = LifecycleBus::default();
    let mut presenter = LabelPresenter::mount(controller.clone(), &bus, Arc::new(SystemClock));

    if controller.is_expired() {
        render(&presenter, &controller.snapshot(), config.json)?;
        return Ok(());
    }

    let mut updates = controller.watch();
    let mut signals = tokio::spawn(forward_process_signals(bus.clone()));
    controller.start(None);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                render(&presenter, &state, config.json)?;
                if state.is_expired() && !state.is_running() {
                    break;
                }
            }
            result = &mut signals => {
                match result {
                    Ok(Ok(())) => info!("Shutdown signal received"),
                    Ok(Err(e)) => error!("Signal handling failed: {}", e),
                    Err(e) => error!("Signal task failed: {}", e),
                }
                break;
            }
        }
    }

    signals.abort();
    presenter.unmount();
    controller.dispose();

    if !config.json {
        println!();
    }
    info!("Countdown label shut down");
    Ok(())
}

/// Write the presenter's current text, or a JSON frame of `state`
fn render(presenter: &LabelPresenter, state: &TimerState, json: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        let frame = LabelFrame::new(presenter.text(), state.clone());
        writeln!(stdout, "{}", serde_json::to_string(&frame)?)?;
    } else {
        write!(stdout, "\r{}  ", presenter.text())?;
    }
    stdout.flush()?;
    Ok(())
}
