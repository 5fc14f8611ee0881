//! Read-back helpers for rendered artifacts.
//!
//! Used by `status`, by the supervisor when it re-applies the live pool on
//! reload, and by tests asserting on what the proxy would do.

use crate::pool::PoolLabel;
use serde::Serialize;

pub(crate) const MARKER_PREFIX: &str = "# switchyard:";

/// What the header marker of an artifact says about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMarker {
    pub active_pool: PoolLabel,
    pub primary: String,
    pub backup: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamMember {
    pub address: String,
    pub backup: bool,
    pub params: Vec<String>,
}

/// Parse the marker line written at the top of every rendered artifact.
pub fn read_marker(text: &str) -> Option<ArtifactMarker> {
    let line = text
        .lines()
        .find_map(|l| l.trim().strip_prefix(MARKER_PREFIX))?;

    let mut active_pool = None;
    let mut primary = None;
    let mut backup = None;
    for pair in line.split_whitespace() {
        let (key, value) = pair.split_once('=')?;
        match key {
            "active_pool" => active_pool = value.parse::<PoolLabel>().ok(),
            "primary" => primary = Some(value.to_string()),
            "backup" => backup = Some(value.to_string()),
            _ => {}
        }
    }

    Some(ArtifactMarker {
        active_pool: active_pool?,
        primary: primary?,
        backup: backup?,
    })
}

/// Members of `upstream <name> { ... }`, in file order.
pub fn upstream_members(text: &str, upstream_name: &str) -> Vec<UpstreamMember> {
    let header = format!("upstream {upstream_name} {{");
    let mut lines = text.lines().map(str::trim);
    if !lines.any(|l| l == header) {
        return Vec::new();
    }

    lines
        .take_while(|l| *l != "}")
        .filter_map(|l| l.strip_prefix("server "))
        .map(|l| {
            let mut words = l.trim_end_matches(';').split_whitespace();
            let address = words.next().unwrap_or_default().to_string();
            let mut backup = false;
            let mut params = Vec::new();
            for w in words {
                if w == "backup" {
                    backup = true;
                } else {
                    params.push(w.to_string());
                }
            }
            UpstreamMember {
                address,
                backup,
                params,
            }
        })
        .collect()
}
