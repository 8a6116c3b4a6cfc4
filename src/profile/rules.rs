//! The road profile as data.
//!
//! Each [`Rule`] names the curve or surface it produces by a role token and
//! refers to earlier curves by role. Sided rules run once for the left side
//! and once for the right; offsets take the side's sign, lifts do not.

use super::params::Param;

/// Side of the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// `+1` on the left, `-1` on the right.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// Tag used in generated names.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }
}

/// Where an offset starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The input centerline.
    Centerline,
    /// The same-side curve with this role.
    Role(&'static str),
}

/// One derivation step of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Per side: offset `source` sideways by `side.sign() * param`.
    Offset {
        role: &'static str,
        source: Source,
        param: Param,
    },
    /// Per side: copy `source` and raise it by `param`.
    Lift {
        role: &'static str,
        source: &'static str,
        param: Param,
    },
    /// Per side: ruled surface from `first` to `second`.
    Loft {
        role: &'static str,
        first: &'static str,
        second: &'static str,
    },
    /// Once: ruled surface from the left `curve` to the right one.
    Bridge { role: &'static str, curve: &'static str },
}

/// Road bed, gutter, curb, sidewalk and sidewalk curb.
pub const ROAD_PROFILE: &[Rule] = &[
    Rule::Offset {
        role: "road",
        source: Source::Centerline,
        param: Param::RoadOffset,
    },
    Rule::Bridge {
        role: "road",
        curve: "road",
    },
    Rule::Offset {
        role: "drain",
        source: Source::Role("road"),
        param: Param::DrainOffset,
    },
    Rule::Loft {
        role: "drain",
        first: "road",
        second: "drain",
    },
    Rule::Offset {
        role: "curbBase",
        source: Source::Role("drain"),
        param: Param::CurbOffset,
    },
    Rule::Lift {
        role: "curbTop",
        source: "curbBase",
        param: Param::CurbHeight,
    },
    Rule::Loft {
        role: "curbWall",
        first: "curbBase",
        second: "curbTop",
    },
    Rule::Loft {
        role: "drainCap",
        first: "drain",
        second: "curbBase",
    },
    Rule::Offset {
        role: "sidewalk",
        source: Source::Role("curbTop"),
        param: Param::SidewalkOffset,
    },
    Rule::Loft {
        role: "sidewalk",
        first: "curbTop",
        second: "sidewalk",
    },
    Rule::Offset {
        role: "sidewalkCurb",
        source: Source::Role("sidewalk"),
        param: Param::SidewalkCurbOffset,
    },
    Rule::Loft {
        role: "sidewalkBorder",
        first: "sidewalk",
        second: "sidewalkCurb",
    },
];
