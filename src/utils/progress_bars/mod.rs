pub mod logging;
pub mod progress_config;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Adds a counting bar to `multi`, or returns `None` when progress display is off.
pub fn stage_bar(multi: Option<&MultiProgress>, len: u64, template: &str) -> Option<ProgressBar> {
    let multi = multi?;
    let pb = multi.add(ProgressBar::new(len));
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    Some(pb)
}
