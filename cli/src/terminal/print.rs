use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::terminal::spinner;

pub const TOTAL_WIDTH: usize = 64;

/// All direct terminal output funnels through the spinner so it never
/// tears the tick line.
pub fn print(msg: &str) {
    spinner::get_spinner().println(msg);
}

pub fn banner() {
    let text_content: String = format!("⟦ AMBIT v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat((TOTAL_WIDTH - text_width) / 2).bright_black();

    print(&format!("{}{}{}", sep, text, sep));
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

pub fn aligned_line(key: &str, value: &str) {
    let dots: String = ".".repeat(24usize.saturating_sub(key.len()));
    print(&format!(
        "{} {}{} {}",
        ">".bright_black(),
        key.cyan(),
        dots.bright_black(),
        value.normal()
    ));
}
