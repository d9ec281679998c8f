use unicode_truncate::UnicodeTruncateStr;

use crate::engine::{Presenter, Snapshot};
use crate::http_probe::ProbeStatus;

const NAME_WIDTH: usize = 28;

pub fn to_fixed_width(input: &str, width: usize) -> String {
    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

/// Prints snapshots to stdout, one aligned line per service.
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn render(snapshot: &Snapshot) -> String {
        let mut out = String::new();
        for category in &snapshot.categories {
            out.push_str(&category.name);
            out.push('\n');
            for service in &category.services {
                let icon = match service.outcome.status {
                    ProbeStatus::Online => "✅",
                    ProbeStatus::Offline => "❌",
                };
                let code = service
                    .outcome
                    .code
                    .filter(|code| *code != 0)
                    .map(|code| format!(" [{code}]"))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {icon} {} {}{code}\n",
                    to_fixed_width(&service.name, NAME_WIDTH),
                    service.outcome.status
                ));
            }
        }
        out.push_str(&format!(
            "Total: {}  Online: {}  Offline: {}  Latest release: {}\n",
            snapshot.stats.total,
            snapshot.stats.online,
            snapshot.stats.offline,
            snapshot.platform_version
        ));
        out
    }
}

impl Presenter for ConsolePresenter {
    fn present_snapshot(&self, snapshot: &Snapshot) {
        print!("{}", Self::render(snapshot));
    }

    fn present_elapsed(&self, elapsed: &str) {
        println!("Last checked: {elapsed}");
    }

    fn present_error(&self, message: &str) {
        eprintln!("❌ {message}");
    }
}
