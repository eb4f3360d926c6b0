use std::fmt;

/// One of the three disjoint regions of a garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Left and right sleeves, far from the vertical mid-plane.
    Sleeves,
    /// Front torso.
    Front,
    /// Back torso.
    Back,
}

impl Zone {
    /// All zones, in export order.
    pub const ALL: [Zone; 3] = [Zone::Sleeves, Zone::Front, Zone::Back];

    /// Object name used for this zone's mesh in the exported scene.
    #[must_use]
    pub fn object_name(self) -> &'static str {
        match self {
            Zone::Sleeves => "sleeves",
            Zone::Front => "front_torso",
            Zone::Back => "back_torso",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_name())
    }
}
