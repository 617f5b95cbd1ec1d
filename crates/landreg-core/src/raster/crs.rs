use std::fmt;

use crate::consts::EPSG_UTM_NORTH_BASE;

/// Coordinate reference system of a raster.
///
/// Two rasters are considered to share a reference system only when their
/// `Crs` values are equal; no reprojection or equivalence lookup is done.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Crs {
    /// An EPSG registry code, e.g. `32633` for WGS 84 / UTM zone 33N.
    Epsg(u32),
    /// A WKT or PROJ definition string, compared verbatim.
    Wkt(String),
    #[default]
    Unknown,
}

impl Crs {
    /// WGS 84 / UTM northern-hemisphere zone. Landsat level-1 grids always
    /// use the northern zone numbering, with negative northings in the south.
    pub fn utm_north(zone: u8) -> Self {
        Crs::Epsg(EPSG_UTM_NORTH_BASE + zone as u32)
    }

    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{code}"),
            Crs::Wkt(def) => write!(f, "{def}"),
            Crs::Unknown => write!(f, "unknown CRS"),
        }
    }
}
