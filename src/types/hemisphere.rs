use crate::types::weather_variable::COL_LAT;
use polars::prelude::{col, lit, Expr};
use std::fmt;

/// Partition of the globe by the sign of latitude.
///
/// The equator (latitude `0.0`) belongs to the Northern hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    pub const ALL: [Hemisphere; 2] = [Hemisphere::Northern, Hemisphere::Southern];

    pub fn of(latitude: f64) -> Hemisphere {
        if latitude >= 0.0 {
            Hemisphere::Northern
        } else {
            Hemisphere::Southern
        }
    }

    /// Row filter selecting this hemisphere from a table with a `Lat` column.
    pub(crate) fn predicate(&self) -> Expr {
        match self {
            Hemisphere::Northern => col(COL_LAT).gt_eq(lit(0.0f64)),
            Hemisphere::Southern => col(COL_LAT).lt(lit(0.0f64)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Hemisphere::Northern => "Northern Hemisphere",
            Hemisphere::Southern => "Southern Hemisphere",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Hemisphere::Northern => "northern",
            Hemisphere::Southern => "southern",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
