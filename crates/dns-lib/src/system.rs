//! Caller-declared system types.

use std::fmt;
use std::str::FromStr;

/// Category of the system asking for navigation.
///
/// Parsed from the `X-System-Type` request header. Anything that is not an
/// exact match for a known tag (including a missing header) becomes
/// [`SystemType::Unknown`], so parsing never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemType {
    Drone,
    Ship,
    UltraDrone,
    Unknown,
}

impl SystemType {
    /// Every tag a caller may declare.
    pub const DECLARED: [SystemType; 3] = [
        SystemType::Drone,
        SystemType::Ship,
        SystemType::UltraDrone,
    ];

    /// Parse an optional header value.
    pub fn from_header(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or(SystemType::Unknown)
    }

    /// Parse a tag, mapping unrecognised values to [`SystemType::Unknown`].
    pub fn parse(value: &str) -> Self {
        Self::DECLARED
            .into_iter()
            .find(|system| system.as_str() == value)
            .unwrap_or(SystemType::Unknown)
    }

    /// Wire tag for this system type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::Drone => "drone",
            SystemType::Ship => "ship",
            SystemType::UltraDrone => "ultradrone",
            SystemType::Unknown => "unknown",
        }
    }

    /// Whether the sector navigator computes a location for this type.
    ///
    /// `UltraDrone` is a declared tag but has no navigation formula yet.
    pub fn is_navigable(&self) -> bool {
        match self {
            SystemType::Drone | SystemType::Ship => true,
            SystemType::UltraDrone | SystemType::Unknown => false,
        }
    }
}

impl FromStr for SystemType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declared_tags() {
        assert_eq!(SystemType::parse("drone"), SystemType::Drone);
        assert_eq!(SystemType::parse("ship"), SystemType::Ship);
        assert_eq!(SystemType::parse("ultradrone"), SystemType::UltraDrone);
    }

    #[test]
    fn unrecognised_or_missing_tags_are_unknown() {
        assert_eq!(SystemType::parse("unknown"), SystemType::Unknown);
        assert_eq!(SystemType::parse("Drone"), SystemType::Unknown);
        assert_eq!(SystemType::parse(" ship"), SystemType::Unknown);
        assert_eq!(SystemType::parse(""), SystemType::Unknown);
        assert_eq!(SystemType::from_header(None), SystemType::Unknown);
    }

    #[test]
    fn tags_round_trip_through_display() {
        for system in SystemType::DECLARED {
            let parsed: SystemType = system.to_string().parse().unwrap();
            assert_eq!(parsed, system);
        }
    }

    #[test]
    fn only_drone_and_ship_are_navigable() {
        assert!(SystemType::Drone.is_navigable());
        assert!(SystemType::Ship.is_navigable());
        assert!(!SystemType::UltraDrone.is_navigable());
        assert!(!SystemType::Unknown.is_navigable());
    }
}
