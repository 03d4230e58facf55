use std::{thread, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use roster::domain::Theme;

const STEP: Duration = Duration::from_millis(40);

const fn style_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Cyan => "cyan",
        Theme::Blue => "blue",
        Theme::Green => "green",
        Theme::Magenta => "magenta",
    }
}

/// Plays a short progress bar. Purely cosmetic.
///
/// Nothing is drawn (and no time is spent) when stderr is not a terminal.
pub fn show(message: &str, steps: u64, theme: Theme) {
    let bar = ProgressBar::new(steps);
    if bar.is_hidden() {
        return;
    }

    let template = format!("{{msg}}: [{{bar:{steps}.{}}}]", style_name(theme));
    match ProgressStyle::with_template(&template) {
        Ok(style) => bar.set_style(style.progress_chars("█ ")),
        Err(e) => tracing::debug!("invalid progress template: {e}"),
    }
    bar.set_message(message.to_string());

    for _ in 0..steps {
        thread::sleep(STEP);
        bar.inc(1);
    }
    bar.finish();
}
