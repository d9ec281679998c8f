use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Online,
    Offline,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Online => f.write_str("ONLINE"),
            ProbeStatus::Offline => f.write_str("OFFLINE"),
        }
    }
}

/// Result of one probe attempt. `code` is informational: `None` when online, `Some(0)` when
/// the transport failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    pub code: Option<u16>,
}

impl ProbeOutcome {
    pub const fn online() -> Self {
        Self {
            status: ProbeStatus::Online,
            code: None,
        }
    }

    pub const fn offline() -> Self {
        Self {
            status: ProbeStatus::Offline,
            code: Some(0),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == ProbeStatus::Online
    }
}
