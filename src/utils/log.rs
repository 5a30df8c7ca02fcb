// src/utils/log.rs

//! Console layout helpers on top of the `log` facade.
//!
//! Everything goes through `::log::info!`, so level filtering and
//! timestamps are whatever the installed logger does.

const RULE_WIDTH: usize = 60;

/// Log a header
pub fn header(title: &str) {
    let border = "=".repeat(RULE_WIDTH);
    ::log::info!("{}", border);
    ::log::info!("{}", title);
    ::log::info!("{}", border);
}

/// Log a separator line
pub fn separator() {
    ::log::info!("{}", "-".repeat(RULE_WIDTH));
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    ::log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    ::log::info!("  {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    ::log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        ::log::info!("    {}: {}", key, value);
    }
}
