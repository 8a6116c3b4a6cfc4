/// One of the six road dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    RoadOffset,
    DrainOffset,
    CurbOffset,
    CurbHeight,
    SidewalkOffset,
    SidewalkCurbOffset,
}

impl Param {
    /// All dimensions, in form order.
    pub const ALL: [Param; 6] = [
        Param::RoadOffset,
        Param::DrainOffset,
        Param::CurbOffset,
        Param::CurbHeight,
        Param::SidewalkOffset,
        Param::SidewalkCurbOffset,
    ];

    /// Snake-case field name.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::RoadOffset => "road_offset",
            Self::DrainOffset => "drain_offset",
            Self::CurbOffset => "curb_offset",
            Self::CurbHeight => "curb_height",
            Self::SidewalkOffset => "sidewalk_offset",
            Self::SidewalkCurbOffset => "sidewalk_curb_offset",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RoadOffset => "Road Offset",
            Self::DrainOffset => "Drain Offset",
            Self::CurbOffset => "Curb Offset",
            Self::CurbHeight => "Curb Height",
            Self::SidewalkOffset => "Sidewalk Offset",
            Self::SidewalkCurbOffset => "Sidewalk Curb Offset",
        }
    }
}

/// Offsets and heights that define the road profile.
///
/// Values are taken as given: zero and negative values are not rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadParameters {
    /// Half-width of the road bed, from the centerline to each road edge.
    pub road_offset: f64,
    /// Width of the drainage gutter beyond the road edge.
    pub drain_offset: f64,
    /// Gap between the gutter and the foot of the curb.
    pub curb_offset: f64,
    /// Height of the curb, along the up axis.
    pub curb_height: f64,
    /// Width of the sidewalk.
    pub sidewalk_offset: f64,
    /// Width of the outer sidewalk curb.
    pub sidewalk_curb_offset: f64,
}

impl Default for RoadParameters {
    fn default() -> Self {
        Self {
            road_offset: 3.0,
            drain_offset: 0.5,
            curb_offset: 0.2,
            curb_height: 0.2,
            sidewalk_offset: 2.0,
            sidewalk_curb_offset: 0.2,
        }
    }
}

impl RoadParameters {
    /// Returns the value of one dimension.
    #[must_use]
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::RoadOffset => self.road_offset,
            Param::DrainOffset => self.drain_offset,
            Param::CurbOffset => self.curb_offset,
            Param::CurbHeight => self.curb_height,
            Param::SidewalkOffset => self.sidewalk_offset,
            Param::SidewalkCurbOffset => self.sidewalk_curb_offset,
        }
    }

    /// Returns a copy with one dimension replaced.
    #[must_use]
    pub fn with(mut self, param: Param, value: f64) -> Self {
        let slot = match param {
            Param::RoadOffset => &mut self.road_offset,
            Param::DrainOffset => &mut self.drain_offset,
            Param::CurbOffset => &mut self.curb_offset,
            Param::CurbHeight => &mut self.curb_height,
            Param::SidewalkOffset => &mut self.sidewalk_offset,
            Param::SidewalkCurbOffset => &mut self.sidewalk_curb_offset,
        };
        *slot = value;
        self
    }

    #[must_use]
    pub fn with_road_offset(self, value: f64) -> Self {
        self.with(Param::RoadOffset, value)
    }

    #[must_use]
    pub fn with_drain_offset(self, value: f64) -> Self {
        self.with(Param::DrainOffset, value)
    }

    #[must_use]
    pub fn with_curb_offset(self, value: f64) -> Self {
        self.with(Param::CurbOffset, value)
    }

    #[must_use]
    pub fn with_curb_height(self, value: f64) -> Self {
        self.with(Param::CurbHeight, value)
    }

    #[must_use]
    pub fn with_sidewalk_offset(self, value: f64) -> Self {
        self.with(Param::SidewalkOffset, value)
    }

    #[must_use]
    pub fn with_sidewalk_curb_offset(self, value: f64) -> Self {
        self.with(Param::SidewalkCurbOffset, value)
    }
}
