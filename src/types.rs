//! Data structures shared between the runtime client and the hosts
//! synchronizer.
//!
//! A [`ContainerRecord`] is what the runtime tells us about one
//! container; a [`HostEntry`] is the validated `IP NAME` pair that ends
//! up as one line inside the generated hosts block.  Nothing here is
//! persisted by the tool itself, the runtime stays the source of truth.

use std::fmt;

/// Separator the runtime prefixes container names with (`/web`).
const NAME_SEPARATOR: char = '/';

/// Raw inspection result for a single container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Full, runtime-assigned container ID.
    pub id: String,
    /// Display name as reported by the runtime, separator included.
    pub name: Option<String>,
    /// Private address of the container, if it has one.
    pub ip: Option<String>,
}

/// One line of the generated hosts block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub ip: String,
    pub name: String,
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ip, self.name)
    }
}

/// Why a container did not produce a host entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The runtime could not inspect the container.
    InspectFailed(String),
    /// No address on the selected network (stopped, or `--network none`).
    MissingIp,
    /// The record carried no usable name.
    MissingName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InspectFailed(e) => write!(f, "inspect failed: {}", e),
            SkipReason::MissingIp => write!(f, "no IP address"),
            SkipReason::MissingName => write!(f, "no name"),
        }
    }
}

impl TryFrom<ContainerRecord> for HostEntry {
    type Error = SkipReason;

    fn try_from(record: ContainerRecord) -> Result<Self, Self::Error> {
        let ip = record
            .ip
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .ok_or(SkipReason::MissingIp)?;
        let name = record
            .name
            .map(|n| n.trim().trim_start_matches(NAME_SEPARATOR).to_string())
            .filter(|n| !n.is_empty())
            .ok_or(SkipReason::MissingName)?;
        Ok(HostEntry { ip, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: Option<&str>, name: Option<&str>) -> ContainerRecord {
        ContainerRecord {
            id: "abc".into(),
            name: name.map(Into::into),
            ip: ip.map(Into::into),
        }
    }

    #[test]
    fn strips_leading_separator_from_name() {
        let entry = HostEntry::try_from(record(Some("172.17.0.2"), Some("/web"))).unwrap();
        assert_eq!(entry.to_string(), "172.17.0.2 web");
    }

    #[test]
    fn empty_ip_is_skipped() {
        let err = HostEntry::try_from(record(Some(""), Some("/db"))).unwrap_err();
        assert_eq!(err, SkipReason::MissingIp);
    }

    #[test]
    fn separator_only_name_is_skipped() {
        let err = HostEntry::try_from(record(Some("172.17.0.3"), Some("/"))).unwrap_err();
        assert_eq!(err, SkipReason::MissingName);
        let err = HostEntry::try_from(record(Some("172.17.0.3"), None)).unwrap_err();
        assert_eq!(err, SkipReason::MissingName);
    }
}
