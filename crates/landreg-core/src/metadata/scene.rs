use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LandregError, Result};
use crate::raster::Crs;

use super::mtl::MtlDocument;

/// Landsat instrument, from `SENSOR_ID`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sensor {
    OliTirs,
    Oli,
    Tirs,
    Etm,
    Tm,
    Mss,
    Other(String),
}

impl Sensor {
    fn from_id(id: &str) -> Self {
        match id {
            "OLI_TIRS" => Sensor::OliTirs,
            "OLI" => Sensor::Oli,
            "TIRS" => Sensor::Tirs,
            "ETM" | "ETM+" => Sensor::Etm,
            "TM" => Sensor::Tm,
            "MSS" => Sensor::Mss,
            other => Sensor::Other(other.to_string()),
        }
    }

    /// Category of a numbered reflective/thermal band.
    fn classify(&self, band_number: u32) -> BandCategory {
        match self {
            Sensor::OliTirs | Sensor::Oli | Sensor::Tirs => match band_number {
                8 => BandCategory::Pan,
                10 | 11 => BandCategory::Thermal,
                _ => BandCategory::Image,
            },
            Sensor::Etm => match band_number {
                6 => BandCategory::Thermal,
                8 => BandCategory::Pan,
                _ => BandCategory::Image,
            },
            Sensor::Tm => match band_number {
                6 => BandCategory::Thermal,
                _ => BandCategory::Image,
            },
            Sensor::Mss | Sensor::Other(_) => BandCategory::Image,
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sensor::OliTirs => write!(f, "OLI/TIRS"),
            Sensor::Oli => write!(f, "OLI"),
            Sensor::Tirs => write!(f, "TIRS"),
            Sensor::Etm => write!(f, "ETM+"),
            Sensor::Tm => write!(f, "TM"),
            Sensor::Mss => write!(f, "MSS"),
            Sensor::Other(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandCategory {
    Image,
    Pan,
    Thermal,
    Qa,
    /// Angle bands and level-2 intermediate products.
    Aux,
}

impl fmt::Display for BandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandCategory::Image => write!(f, "image"),
            BandCategory::Pan => write!(f, "pan"),
            BandCategory::Thermal => write!(f, "thermal"),
            BandCategory::Qa => write!(f, "qa"),
            BandCategory::Aux => write!(f, "aux"),
        }
    }
}

/// Physical quantity stored in a band file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Dn,
    SurfaceReflectance,
    SurfaceTemperature,
    Qa,
    Other,
}

impl Quantity {
    /// Suffix used in unified band names (`B4_dn`, `B4_sre`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Quantity::Dn => "dn",
            Quantity::SurfaceReflectance => "sre",
            Quantity::SurfaceTemperature => "st",
            Quantity::Qa => "qa",
            Quantity::Other => "aux",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Dn => write!(f, "DN"),
            Quantity::SurfaceReflectance => write!(f, "Surface reflectance"),
            Quantity::SurfaceTemperature => write!(f, "Surface temperature"),
            Quantity::Qa => write!(f, "QA"),
            Quantity::Other => write!(f, "Other"),
        }
    }
}

/// `value = mult * dn + add`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub mult: f64,
    pub add: f64,
}

/// Rescaling coefficients published for a band. They are carried through
/// for downstream tools and never applied here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rescale {
    pub radiance: Option<LinearScale>,
    pub reflectance: Option<LinearScale>,
    pub temperature: Option<LinearScale>,
    /// Thermal conversion constants `(K1, K2)`.
    pub thermal_constants: Option<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BandInfo {
    /// Unified name, e.g. `B4_dn`, `B10_st`, `QA_PIXEL`.
    pub name: String,
    /// File name relative to the MTL file's directory.
    pub file: String,
    pub category: BandCategory,
    pub quantity: Quantity,
    /// Cell size in map units.
    pub resolution: f64,
    pub rescale: Rescale,
}

/// Map corner in projected coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedCorner {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneMetadata {
    pub scene_id: Option<String>,
    pub product_id: Option<String>,
    pub spacecraft: String,
    pub sensor: Sensor,
    pub collection: Option<u32>,
    pub processing_level: Option<String>,
    pub date_acquired: Option<String>,
    pub scene_center_time: Option<String>,
    pub wrs_path: Option<u32>,
    pub wrs_row: Option<u32>,
    pub utm_zone: Option<u8>,
    pub datum: Option<String>,
    pub cell_size_reflective: f64,
    pub cell_size_thermal: Option<f64>,
    pub cell_size_pan: Option<f64>,
    pub corner_ul: Option<ProjectedCorner>,
    pub corner_lr: Option<ProjectedCorner>,
    pub sun_azimuth: Option<f64>,
    pub sun_elevation: Option<f64>,
    pub earth_sun_distance: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub bands: Vec<BandInfo>,
}

impl SceneMetadata {
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_document(&MtlDocument::from_file(path)?)
    }

    /// Build the typed record from a parsed MTL document.
    ///
    /// Keys are searched anywhere in the tree, so pre-collection,
    /// Collection 1 and Collection 2 layouts are all accepted.
    pub fn from_document(doc: &MtlDocument) -> Result<Self> {
        let spacecraft = doc
            .find_str("SPACECRAFT_ID")
            .ok_or_else(|| LandregError::MissingField("SPACECRAFT_ID".into()))?
            .to_string();
        let sensor = Sensor::from_id(doc.find_str("SENSOR_ID").unwrap_or_default());

        let processing_level = doc
            .find_str("PROCESSING_LEVEL")
            .or_else(|| doc.find_str("DATA_TYPE"))
            .map(str::to_string);
        let level2 = processing_level
            .as_deref()
            .is_some_and(|l| l.starts_with("L2"));

        let cell_size_reflective = doc
            .find_f64("GRID_CELL_SIZE_REFLECTIVE")
            .ok_or_else(|| LandregError::MissingField("GRID_CELL_SIZE_REFLECTIVE".into()))?;
        let cell_size_thermal = doc.find_f64("GRID_CELL_SIZE_THERMAL");
        let cell_size_pan = doc.find_f64("GRID_CELL_SIZE_PANCHROMATIC");

        let corner = |axis_x: &str, axis_y: &str| {
            Some(ProjectedCorner {
                x: doc.find_f64(axis_x)?,
                y: doc.find_f64(axis_y)?,
            })
        };

        let mut scene = SceneMetadata {
            scene_id: doc.find_str("LANDSAT_SCENE_ID").map(str::to_string),
            product_id: doc.find_str("LANDSAT_PRODUCT_ID").map(str::to_string),
            spacecraft,
            sensor,
            collection: doc.find_f64("COLLECTION_NUMBER").map(|n| n as u32),
            processing_level,
            date_acquired: doc
                .find_str("DATE_ACQUIRED")
                .or_else(|| doc.find_str("ACQUISITION_DATE"))
                .map(str::to_string),
            scene_center_time: doc
                .find_str("SCENE_CENTER_TIME")
                .or_else(|| doc.find_str("SCENE_CENTER_SCAN_TIME"))
                .map(str::to_string),
            wrs_path: doc.find_f64("WRS_PATH").map(|n| n as u32),
            wrs_row: doc.find_f64("WRS_ROW").map(|n| n as u32),
            utm_zone: doc.find_f64("UTM_ZONE").map(|n| n as u8),
            datum: doc.find_str("DATUM").map(str::to_string),
            cell_size_reflective,
            cell_size_thermal,
            cell_size_pan,
            corner_ul: corner(
                "CORNER_UL_PROJECTION_X_PRODUCT",
                "CORNER_UL_PROJECTION_Y_PRODUCT",
            ),
            corner_lr: corner(
                "CORNER_LR_PROJECTION_X_PRODUCT",
                "CORNER_LR_PROJECTION_Y_PRODUCT",
            ),
            sun_azimuth: doc.find_f64("SUN_AZIMUTH"),
            sun_elevation: doc.find_f64("SUN_ELEVATION"),
            earth_sun_distance: doc.find_f64("EARTH_SUN_DISTANCE"),
            cloud_cover: doc.find_f64("CLOUD_COVER"),
            bands: Vec::new(),
        };

        scene.bands = scene.collect_bands(doc, level2);
        if scene.bands.is_empty() {
            return Err(LandregError::MissingField("FILE_NAME_BAND_*".into()));
        }
        debug!(
            "Parsed {} scene with {} band files",
            scene.spacecraft,
            scene.bands.len()
        );
        Ok(scene)
    }

    fn resolution_for(&self, category: BandCategory) -> f64 {
        match category {
            BandCategory::Pan => self.cell_size_pan,
            BandCategory::Thermal => self.cell_size_thermal,
            _ => None,
        }
        .unwrap_or(self.cell_size_reflective)
    }

    fn collect_bands(&self, doc: &MtlDocument, level2: bool) -> Vec<BandInfo> {
        let mut bands: Vec<BandInfo> = Vec::new();
        for (key, value) in doc.walk() {
            let Some(file) = value.as_str() else {
                continue;
            };
            let Some((name, band_id, category, quantity)) =
                self.classify_file_key(key, file, level2)
            else {
                continue;
            };
            if bands.iter().any(|b| b.name == name) {
                continue;
            }
            let rescale = band_id
                .as_deref()
                .map(|id| read_rescale(doc, id))
                .unwrap_or_default();
            bands.push(BandInfo {
                name,
                file: file.to_string(),
                category,
                quantity,
                resolution: self.resolution_for(category),
                rescale,
            });
        }
        bands
    }

    /// Turn a `FILE_NAME_*` key into `(unified name, MTL band id, category,
    /// quantity)`. Keys that do not name a raster band yield `None`.
    fn classify_file_key(
        &self,
        key: &str,
        file: &str,
        level2: bool,
    ) -> Option<(String, Option<String>, BandCategory, Quantity)> {
        let rest = key.strip_prefix("FILE_NAME_")?;

        if rest == "BAND_QUALITY" {
            return Some(("BQA".into(), None, BandCategory::Qa, Quantity::Qa));
        }
        if let Some(qa) = rest.strip_prefix("QUALITY_") {
            let qa = qa
                .strip_prefix("L1_")
                .or_else(|| qa.strip_prefix("L2_"))
                .unwrap_or(qa);
            return Some((format!("QA_{qa}"), None, BandCategory::Qa, Quantity::Qa));
        }
        if let Some(id) = rest.strip_prefix("BAND_ST_B") {
            let number = leading_number(id)?;
            return Some((
                format!("B{number}_{}", Quantity::SurfaceTemperature.suffix()),
                Some(format!("ST_B{id}")),
                BandCategory::Thermal,
                Quantity::SurfaceTemperature,
            ));
        }
        if let Some(id) = rest.strip_prefix("BAND_") {
            if let Some(number) = leading_number(id) {
                let category = self.sensor.classify(number);
                let quantity = if level2 && category != BandCategory::Thermal {
                    Quantity::SurfaceReflectance
                } else {
                    Quantity::Dn
                };
                return Some((
                    format!("B{id}_{}", quantity.suffix()),
                    Some(id.to_string()),
                    category,
                    quantity,
                ));
            }
        }

        let lower = file.to_ascii_lowercase();
        if lower.ends_with(".tif") || lower.ends_with(".tiff") {
            return Some((rest.to_string(), None, BandCategory::Aux, Quantity::Other));
        }
        None
    }

    /// CRS of the scene grid, from the UTM zone.
    pub fn crs(&self) -> Crs {
        match self.utm_zone {
            Some(zone) => Crs::utm_north(zone),
            None => Crs::Unknown,
        }
    }

    pub fn band(&self, name: &str) -> Option<&BandInfo> {
        self.bands.iter().find(|b| b.name == name)
    }
}

/// Leading decimal digits of a band id (`"6_VCID_1"` -> 6).
fn leading_number(id: &str) -> Option<u32> {
    let digits: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn read_rescale(doc: &MtlDocument, id: &str) -> Rescale {
    let scale = |mult: &str, add: &str| {
        Some(LinearScale {
            mult: doc.find_f64(&format!("{mult}_{id}"))?,
            add: doc.find_f64(&format!("{add}_{id}"))?,
        })
    };
    let thermal_constants = doc
        .find_f64(&format!("K1_CONSTANT_BAND_{id}"))
        .zip(doc.find_f64(&format!("K2_CONSTANT_BAND_{id}")));

    Rescale {
        radiance: scale("RADIANCE_MULT_BAND", "RADIANCE_ADD_BAND"),
        reflectance: scale("REFLECTANCE_MULT_BAND", "REFLECTANCE_ADD_BAND"),
        temperature: scale("TEMPERATURE_MULT_BAND", "TEMPERATURE_ADD_BAND"),
        thermal_constants,
    }
}
