//! Download progress with non-interactive fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};
use std::io::Read;

/// Byte counter wrapped around an artifact stream
pub struct DownloadProgress;

impl DownloadProgress {
    /// Wrap `reader` in a progress bar when interactive.
    ///
    /// A known `length` gives a bar, otherwise a spinner with a byte count.
    /// Non-interactive contexts get the reader back untouched.
    pub fn wrap<R: Read + Send + 'static>(ctx: &UiContext, length: Option<u64>, reader: R) -> Box<dyn Read + Send> {
        if !ctx.use_fancy_output() {
            return Box::new(reader);
        }

        let bar = match length {
            Some(len) => ProgressBar::new(len).with_style(
                ProgressStyle::default_bar()
                    .template("  {spinner:.cyan} Downloading  {bar:20.cyan/dim} {bytes}/{total_bytes} {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("━╸─"),
            ),
            None => ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner:.cyan} Downloading {bytes} {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            ),
        }
        .with_finish(ProgressFinish::AndClear);

        Box::new(bar.wrap_read(reader))
    }
}
