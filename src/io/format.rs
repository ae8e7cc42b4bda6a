//! Formatted server log output.

use log;

const CASGRID_BANNER_LENGTH: usize = 72;

/// Logs a main output line to the `casgrid-output` logger.
macro_rules! casgrid_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "casgrid-output", $fmt, $($($arg)*)?) }
}

pub(crate) use casgrid_output;

/// Logs a nicely formatted section title to the `casgrid-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(CASGRID_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    casgrid_output!("┌──{bar}──┐");
    casgrid_output!("│§ {title:^length$} §│");
    casgrid_output!("└──{bar}──┘");
}
