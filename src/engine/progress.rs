//! Progress bar for job completion

use crossbeam_channel::Receiver;
use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Create a progress bar counting finished jobs.
pub fn create_progress_bar(total: usize, desc: &'static str) -> Arc<Mutex<Bar>> {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = total,
        desc = desc,
        animation = Animation::Classic,
        unit = " jobs"
    )))
}

/// Update progress bar if available
/// Uses try_lock to avoid blocking if mutex is contended (non-blocking)
pub fn update_progress_bar(pb: &Arc<Mutex<Bar>>, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Advance `bar` once per identity received on `done_rx`; exits when every sender is dropped.
pub fn spawn_progress_listener(
    done_rx: Receiver<String>,
    bar: Arc<Mutex<Bar>>,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let mut finished = 0_usize;
        while let Ok(identity) = done_rx.recv() {
            finished += 1;
            log::debug!("finished: {}", identity);
            update_progress_bar(&bar, 1);
        }
        if let Ok(mut b) = bar.lock() {
            let _ = b.refresh();
        }
        eprintln!();
        finished
    })
}
