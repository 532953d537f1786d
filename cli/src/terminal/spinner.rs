use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub struct SpinnerHandle {
    spinner: ProgressBar,
}

impl SpinnerHandle {
    pub fn println(&self, msg: &str) {
        self.spinner.println(msg);
    }

    pub fn set_message(&self, msg: String) {
        self.spinner.set_message(msg);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }
}

static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    SpinnerHandle { spinner: pb }
}

/// Routes log output through the spinner so lines land above the tick
/// line instead of through it.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        get_spinner().println(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
