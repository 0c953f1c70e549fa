use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use prep_core::{Generation, Msg};

/// Sends `ProgressTick` for one generation every `interval` until cancelled.
/// Dropping the timer cancels it as well.
pub struct ProgressTimer {
    stop_tx: mpsc::Sender<()>,
}

impl ProgressTimer {
    pub fn start(generation: Generation, interval: Duration, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if msg_tx.send(Msg::ProgressTick { generation }).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Self { stop_tx }
    }

    pub fn cancel(self) {
        let _ = self.stop_tx.send(());
    }
}

/// Delivers `msg` once after `after`, unless the receiver is gone by then.
pub fn schedule_once(after: Duration, msg_tx: mpsc::Sender<Msg>, msg: Msg) {
    thread::spawn(move || {
        thread::sleep(after);
        let _ = msg_tx.send(msg);
    });
}

#[cfg(test)]
mod tests {
    use super::{schedule_once, ProgressTimer};
    use prep_core::Msg;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn progress_timer_ticks_until_cancelled() {
        let (tx, rx) = mpsc::channel();
        let timer = ProgressTimer::start(4, Duration::from_millis(10), tx);

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, Msg::ProgressTick { generation: 4 });

        timer.cancel();
        // Drain a tick that may have raced the cancel, then expect silence.
        while rx.recv_timeout(Duration::from_millis(50)).is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn dropped_timer_stops_ticking() {
        let (tx, rx) = mpsc::channel();
        drop(ProgressTimer::start(1, Duration::from_millis(10), tx));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn one_shot_fires_once() {
        let (tx, rx) = mpsc::channel();
        schedule_once(Duration::from_millis(5), tx, Msg::NoOp);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), Msg::NoOp);
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
