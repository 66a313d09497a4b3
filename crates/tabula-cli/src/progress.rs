//! Terminal progress bar for loads.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tabula_load::{BatchProgress, ProgressObserver};

const TEMPLATE: &str = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records {msg}";

/// Draws load progress on stderr; hidden when stderr is not a terminal.
pub struct LoadProgress {
    bar: ProgressBar,
}

impl LoadProgress {
    pub fn new(total_records: u64, visible: bool) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(total_records),
            if visible {
                ProgressDrawTarget::stderr()
            } else {
                ProgressDrawTarget::hidden()
            },
        );
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for LoadProgress {
    fn on_batch(&self, progress: &BatchProgress) {
        self.bar.set_position(progress.records_processed);
        self.bar
            .set_message(format!("batch {}/{}", progress.batch_index, progress.batch_count));
    }
}
