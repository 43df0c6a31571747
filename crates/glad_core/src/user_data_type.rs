//! User data type tags.
//!
//! Every record carries a one-byte tag naming its variant and, for channel
//! samples and event records, the stream it came from. Containers index and
//! filter on the tag; comparators use it as a tie breaker.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// One-byte variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserDataType(pub u8);

impl UserDataType {
    /// Channel sample from realtime flight software telemetry.
    pub const EHA_FSW_REALTIME: Self = Self(0);
    /// Channel sample from recorded flight software telemetry.
    pub const EHA_FSW_RECORDED: Self = Self(1);
    /// Channel sample from ground support equipment.
    pub const EHA_SSE: Self = Self(2);
    /// Flight software packet header channel.
    pub const EHA_FSW_HEADER: Self = Self(3);
    /// Ground support equipment packet header channel.
    pub const EHA_SSE_HEADER: Self = Self(4);
    /// Station monitor channel.
    pub const EHA_MONITOR: Self = Self(5);
    /// Event record from realtime flight software.
    pub const EVR_FSW_REALTIME: Self = Self(10);
    /// Event record from recorded flight software.
    pub const EVR_FSW_RECORDED: Self = Self(11);
    /// Event record from ground support equipment.
    pub const EVR_SSE: Self = Self(12);
    /// Alarm history snapshot.
    pub const ALARM_HISTORY: Self = Self(20);
    /// Not yet classified.
    pub const UNASSIGNED: Self = Self(127);

    const EHA_ALL: [Self; 6] = [
        Self::EHA_FSW_REALTIME,
        Self::EHA_FSW_RECORDED,
        Self::EHA_SSE,
        Self::EHA_FSW_HEADER,
        Self::EHA_SSE_HEADER,
        Self::EHA_MONITOR,
    ];

    const EVR_ALL: [Self; 3] = [Self::EVR_FSW_REALTIME, Self::EVR_FSW_RECORDED, Self::EVR_SSE];

    /// Returns the raw tag.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Classifies a channel sample from its flags.
    ///
    /// Monitor wins over header, header over SSE, and realtime selects
    /// between the two flight software tags.
    #[must_use]
    pub const fn for_channel(realtime: bool, header: bool, monitor: bool, sse: bool) -> Self {
        if monitor {
            Self::EHA_MONITOR
        } else if header {
            if sse {
                Self::EHA_SSE_HEADER
            } else {
                Self::EHA_FSW_HEADER
            }
        } else if sse {
            Self::EHA_SSE
        } else if realtime {
            Self::EHA_FSW_REALTIME
        } else {
            Self::EHA_FSW_RECORDED
        }
    }

    /// Classifies an event record from its flags.
    #[must_use]
    pub const fn for_event(realtime: bool, fsw: bool) -> Self {
        if !fsw {
            Self::EVR_SSE
        } else if realtime {
            Self::EVR_FSW_REALTIME
        } else {
            Self::EVR_FSW_RECORDED
        }
    }

    /// Returns true for channel sample tags.
    #[must_use]
    pub fn is_eha(self) -> bool {
        Self::EHA_ALL.contains(&self)
    }

    /// Returns true for event record tags.
    #[must_use]
    pub fn is_evr(self) -> bool {
        Self::EVR_ALL.contains(&self)
    }

    /// Maps query vocabulary onto the set of matching tags.
    ///
    /// `query_type` is one of `eha`, `evr`, `alarm`; `source` one of `fsw`,
    /// `sse`, `header`, `monitor`, `all`; `recorded_state` one of `realtime`,
    /// `recorded`, `both`. Matching is case-insensitive. The recorded state
    /// only narrows flight software sources.
    pub fn lookup(
        query_type: &str,
        source: &str,
        recorded_state: &str,
    ) -> CoreResult<BTreeSet<UserDataType>> {
        let (realtime, recorded) = match recorded_state.to_ascii_lowercase().as_str() {
            "realtime" => (true, false),
            "recorded" => (false, true),
            "both" => (true, true),
            _ => {
                return Err(CoreError::invalid_query_term(
                    "recorded state",
                    recorded_state,
                ))
            }
        };

        let source = source.to_ascii_lowercase();
        if !matches!(source.as_str(), "fsw" | "sse" | "header" | "monitor" | "all") {
            return Err(CoreError::invalid_query_term("source", source));
        }
        let wants = |name: &str| source == name || source == "all";

        let mut tags = BTreeSet::new();
        match query_type.to_ascii_lowercase().as_str() {
            "eha" => {
                if wants("fsw") {
                    if realtime {
                        tags.insert(Self::EHA_FSW_REALTIME);
                    }
                    if recorded {
                        tags.insert(Self::EHA_FSW_RECORDED);
                    }
                }
                if wants("sse") {
                    tags.insert(Self::EHA_SSE);
                }
                if wants("header") {
                    tags.insert(Self::EHA_FSW_HEADER);
                    tags.insert(Self::EHA_SSE_HEADER);
                }
                if wants("monitor") {
                    tags.insert(Self::EHA_MONITOR);
                }
            }
            "evr" => {
                if wants("fsw") {
                    if realtime {
                        tags.insert(Self::EVR_FSW_REALTIME);
                    }
                    if recorded {
                        tags.insert(Self::EVR_FSW_RECORDED);
                    }
                }
                if wants("sse") {
                    tags.insert(Self::EVR_SSE);
                }
            }
            "alarm" => {
                tags.insert(Self::ALARM_HISTORY);
            }
            other => return Err(CoreError::invalid_query_term("query type", other)),
        }
        Ok(tags)
    }
}

impl Default for UserDataType {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for UserDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "udt:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_classification() {
        assert_eq!(
            UserDataType::for_channel(true, false, false, false),
            UserDataType::EHA_FSW_REALTIME
        );
        assert_eq!(
            UserDataType::for_channel(false, false, false, false),
            UserDataType::EHA_FSW_RECORDED
        );
        assert_eq!(
            UserDataType::for_channel(true, false, false, true),
            UserDataType::EHA_SSE
        );
        assert_eq!(
            UserDataType::for_channel(true, true, false, true),
            UserDataType::EHA_SSE_HEADER
        );
        assert_eq!(
            UserDataType::for_channel(true, true, false, false),
            UserDataType::EHA_FSW_HEADER
        );
        assert_eq!(
            UserDataType::for_channel(true, true, true, false),
            UserDataType::EHA_MONITOR
        );
    }

    #[test]
    fn event_classification() {
        assert_eq!(UserDataType::for_event(true, true), UserDataType::EVR_FSW_REALTIME);
        assert_eq!(UserDataType::for_event(false, true), UserDataType::EVR_FSW_RECORDED);
        assert_eq!(UserDataType::for_event(true, false), UserDataType::EVR_SSE);
    }

    #[test]
    fn lookup_fsw_realtime_eha() {
        let tags = UserDataType::lookup("EHA", "fsw", "realtime").unwrap();
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![UserDataType::EHA_FSW_REALTIME]);
    }

    #[test]
    fn lookup_all_sources() {
        let eha = UserDataType::lookup("eha", "all", "both").unwrap();
        assert_eq!(eha.len(), 6);
        assert!(eha.iter().all(|t| t.is_eha()));

        let evr = UserDataType::lookup("evr", "all", "recorded").unwrap();
        assert_eq!(
            evr.into_iter().collect::<Vec<_>>(),
            vec![UserDataType::EVR_FSW_RECORDED, UserDataType::EVR_SSE]
        );
    }

    #[test]
    fn lookup_alarm_ignores_source() {
        let tags = UserDataType::lookup("alarm", "monitor", "both").unwrap();
        assert!(tags.contains(&UserDataType::ALARM_HISTORY));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn lookup_rejects_unknown_terms() {
        assert!(UserDataType::lookup("product", "fsw", "both").is_err());
        assert!(UserDataType::lookup("eha", "ground", "both").is_err());
        assert!(UserDataType::lookup("eha", "fsw", "sometimes").is_err());
    }

    #[test]
    fn default_is_unassigned() {
        assert_eq!(UserDataType::default(), UserDataType::UNASSIGNED);
        assert!(!UserDataType::UNASSIGNED.is_eha());
        assert!(!UserDataType::UNASSIGNED.is_evr());
    }
}
