//! Scan progress bar driven by [`ScanEvent`]s.

use indicatif::{ProgressBar, ProgressStyle};
use tasksync::scan::ScanEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Consume scan events until the channel closes, drawing a bar on stderr.
///
/// With `enabled` false the events are drained without drawing anything.
pub fn spawn(mut events: UnboundedReceiver<ScanEvent>, enabled: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let bar = if enabled {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
                .map(|s| s.progress_chars("█▓▒░  "))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        } else {
            ProgressBar::hidden()
        };

        while let Some(event) = events.recv().await {
            match event {
                ScanEvent::Started { total } => bar.set_length(total as u64),
                ScanEvent::FileIgnored { .. } | ScanEvent::FileSkipped { .. } => bar.inc(1),
                ScanEvent::FileScanned { path, .. } => {
                    bar.set_message(path);
                    bar.inc(1);
                }
                ScanEvent::Finished { .. } => bar.finish_and_clear(),
            }
        }
    })
}
