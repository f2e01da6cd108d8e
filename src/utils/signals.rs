//! Process signal handling: job control to lifecycle signals, and shutdown

use std::{io, time::Duration};
use futures::stream::StreamExt;
use signal_hook::consts::{SIGCONT, SIGINT, SIGSTOP, SIGTERM, SIGTSTP};
use signal_hook_tokio::Signals;
use tokio::time::sleep;
use tracing::info;

use crate::label::{LifecycleBus, LifecycleSignal};

/// Time listeners get to record a suspension before the process stops itself
pub const SUSPEND_SETTLE: Duration = Duration::from_millis(100);

/// Lifecycle meaning of a process signal, if any
pub fn lifecycle_signal_for(signal: i32) -> LifecycleSignal {
    match signal {
        SIGTSTP => LifecycleSignal::AboutToSuspend,
        SIGCONT => LifecycleSignal::Resumed,
        SIGINT | SIGTERM => LifecycleSignal::Detached,
        _ => LifecycleSignal::Other,
    }
}

/// Publish job-control signals on `bus` until SIGINT or SIGTERM arrives.
///
/// SIGTSTP (Ctrl-Z) publishes `AboutToSuspend` and then stops the process
/// with SIGSTOP; SIGCONT (`fg`) publishes `Resumed`. The terminating signal
/// publishes `Detached` before returning.
pub async fn forward_process_signals(bus: LifecycleBus) -> io::Result<()> {
    let mut signals = Signals::new([SIGTSTP, SIGCONT, SIGINT, SIGTERM])?;

    while let Some(signal) = signals.next().await {
        let lifecycle = lifecycle_signal_for(signal);
        info!("Received signal {} ({:?})", signal, lifecycle);
        bus.publish(lifecycle);

        match lifecycle {
            LifecycleSignal::AboutToSuspend => {
                sleep(SUSPEND_SETTLE).await;
                signal_hook::low_level::raise(SIGSTOP)?;
            }
            LifecycleSignal::Detached => break,
            LifecycleSignal::Resumed | LifecycleSignal::Other => {}
        }
    }

    signals.handle().close();
    Ok(())
}
