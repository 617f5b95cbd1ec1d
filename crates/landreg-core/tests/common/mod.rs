use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use landreg_core::raster::{Crs, GeoTransform, Raster};

pub const TEST_EPSG: u32 = 32633;

/// Uncorrelated per-pixel texture with integer levels in `0..levels`.
pub fn noise_band(rows: usize, cols: usize, levels: u32, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(0..levels) as f32)
}

/// Band whose content must be shifted by `(dx_px, dy_px)` (x east, y north)
/// to line up with `reference` on the same grid.
///
/// Cells with no counterpart in `reference` are filled with fresh noise.
pub fn misregistered_copy(
    reference: &Array2<f32>,
    dx_px: i64,
    dy_px: i64,
    levels: u32,
    seed: u64,
) -> Array2<f32> {
    let (rows, cols) = reference.dim();
    let mut out = noise_band(rows, cols, levels, seed);
    for r in 0..rows as i64 {
        for c in 0..cols as i64 {
            let src_r = r - dy_px;
            let src_c = c + dx_px;
            if src_r >= 0 && src_r < rows as i64 && src_c >= 0 && src_c < cols as i64 {
                out[[r as usize, c as usize]] = reference[[src_r as usize, src_c as usize]];
            }
        }
    }
    out
}

/// Single-band raster whose lower-left corner sits at `(x0, y0)`.
pub fn raster_at(band: Array2<f32>, x0: f64, y0: f64, res: f64) -> Raster {
    let rows = band.nrows() as f64;
    let transform = GeoTransform::new(x0, y0 + rows * res, res, res);
    Raster::from_band(band, transform, Crs::Epsg(TEST_EPSG)).expect("valid raster")
}

/// Single-band raster on a unit grid with its lower-left corner at the origin.
pub fn unit_raster(band: Array2<f32>) -> Raster {
    raster_at(band, 0.0, 0.0, 1.0)
}

/// Collection 2 level-1 OLI/TIRS metadata, trimmed to the fields we read.
pub const MTL_C2_L1: &str = r#"GROUP = LANDSAT_METADATA_FILE
  GROUP = PRODUCT_CONTENTS
    ORIGIN = "Image courtesy of the U.S. Geological Survey"
    LANDSAT_PRODUCT_ID = "LC08_L1TP_190026_20200601_20200608_02_T1"
    PROCESSING_LEVEL = "L1TP"
    COLLECTION_NUMBER = 02
    FILE_NAME_BAND_1 = "LC08_B1.TIF"
    FILE_NAME_BAND_2 = "LC08_B2.TIF"
    FILE_NAME_BAND_8 = "LC08_B8.TIF"
    FILE_NAME_BAND_10 = "LC08_B10.TIF"
    FILE_NAME_QUALITY_L1_PIXEL = "LC08_QA_PIXEL.TIF"
    FILE_NAME_ANGLE_COEFFICIENT = "LC08_ANG.txt"
    FILE_NAME_METADATA_ODL = "LC08_MTL.txt"
  END_GROUP = PRODUCT_CONTENTS
  GROUP = IMAGE_ATTRIBUTES
    SPACECRAFT_ID = "LANDSAT_8"
    SENSOR_ID = "OLI_TIRS"
    WRS_PATH = 190
    WRS_ROW = 26
    DATE_ACQUIRED = 2020-06-01
    SCENE_CENTER_TIME = "09:41:12.3456780Z"
    CLOUD_COVER = 12.34
    SUN_AZIMUTH = 145.2
    SUN_ELEVATION = 58.7
    EARTH_SUN_DISTANCE = 1.0140
  END_GROUP = IMAGE_ATTRIBUTES
  GROUP = PROJECTION_ATTRIBUTES
    MAP_PROJECTION = "UTM"
    DATUM = "WGS84"
    UTM_ZONE = 33
    GRID_CELL_SIZE_PANCHROMATIC = 15.00
    GRID_CELL_SIZE_REFLECTIVE = 30.00
    GRID_CELL_SIZE_THERMAL = 30.00
    CORNER_UL_PROJECTION_X_PRODUCT = 300000.000
    CORNER_UL_PROJECTION_Y_PRODUCT = 5400000.000
    CORNER_LR_PROJECTION_X_PRODUCT = 300090.000
    CORNER_LR_PROJECTION_Y_PRODUCT = 5399910.000
  END_GROUP = PROJECTION_ATTRIBUTES
  GROUP = LEVEL1_RADIOMETRIC_RESCALING
    RADIANCE_MULT_BAND_1 = 1.2345E-02
    RADIANCE_ADD_BAND_1 = -61.72
    RADIANCE_MULT_BAND_10 = 3.3420E-04
    RADIANCE_ADD_BAND_10 = 0.10000
    REFLECTANCE_MULT_BAND_1 = 2.0000E-05
    REFLECTANCE_ADD_BAND_1 = -0.100000
  END_GROUP = LEVEL1_RADIOMETRIC_RESCALING
  GROUP = LEVEL1_THERMAL_CONSTANTS
    K1_CONSTANT_BAND_10 = 774.8853
    K2_CONSTANT_BAND_10 = 1321.0789
  END_GROUP = LEVEL1_THERMAL_CONSTANTS
END_GROUP = LANDSAT_METADATA_FILE
END
"#;

/// Pre-collection ETM+ metadata with split thermal gains and a BQA file.
pub const MTL_ETM_LEGACY: &str = r#"GROUP = L1_METADATA_FILE
  GROUP = METADATA_FILE_INFO
    LANDSAT_SCENE_ID = "LE71900262003152ASN00"
  END_GROUP = METADATA_FILE_INFO
  GROUP = PRODUCT_METADATA
    DATA_TYPE = "L1T"
    SPACECRAFT_ID = "LANDSAT_7"
    SENSOR_ID = "ETM"
    DATE_ACQUIRED = 2003-06-01
    SCENE_CENTER_TIME = 09:35:10.1234560Z
    CORNER_UL_PROJECTION_X_PRODUCT = 300000.000
    CORNER_UL_PROJECTION_Y_PRODUCT = 5400000.000
    FILE_NAME_BAND_3 = "LE07_B3.TIF"
    FILE_NAME_BAND_6_VCID_1 = "LE07_B6_VCID_1.TIF"
    FILE_NAME_BAND_8 = "LE07_B8.TIF"
    FILE_NAME_BAND_QUALITY = "LE07_BQA.TIF"
  END_GROUP = PRODUCT_METADATA
  GROUP = PROJECTION_PARAMETERS
    UTM_ZONE = 33
    GRID_CELL_SIZE_PANCHROMATIC = 15.00
    GRID_CELL_SIZE_THERMAL = 60.00
    GRID_CELL_SIZE_REFLECTIVE = 30.00
  END_GROUP = PROJECTION_PARAMETERS
  GROUP = RADIOMETRIC_RESCALING
    RADIANCE_MULT_BAND_6_VCID_1 = 6.7087E-02
    RADIANCE_ADD_BAND_6_VCID_1 = -0.06709
  END_GROUP = RADIOMETRIC_RESCALING
END_GROUP = L1_METADATA_FILE
END
"#;

/// Collection 2 level-2 science product with surface reflectance and
/// temperature bands.
pub const MTL_C2_L2: &str = r#"GROUP = LANDSAT_METADATA_FILE
  GROUP = PRODUCT_CONTENTS
    PROCESSING_LEVEL = "L2SP"
    FILE_NAME_BAND_1 = "LC08_SR_B1.TIF"
    FILE_NAME_BAND_ST_B10 = "LC08_ST_B10.TIF"
    FILE_NAME_THERMAL_RADIANCE = "LC08_ST_TRAD.TIF"
    FILE_NAME_QUALITY_L2_AEROSOL = "LC08_SR_QA_AEROSOL.TIF"
  END_GROUP = PRODUCT_CONTENTS
  GROUP = IMAGE_ATTRIBUTES
    SPACECRAFT_ID = "LANDSAT_8"
    SENSOR_ID = "OLI_TIRS"
  END_GROUP = IMAGE_ATTRIBUTES
  GROUP = PROJECTION_ATTRIBUTES
    UTM_ZONE = 33
    GRID_CELL_SIZE_REFLECTIVE = 30.00
    GRID_CELL_SIZE_THERMAL = 30.00
  END_GROUP = PROJECTION_ATTRIBUTES
  GROUP = LEVEL2_SURFACE_REFLECTANCE_PARAMETERS
    REFLECTANCE_MULT_BAND_1 = 2.75e-05
    REFLECTANCE_ADD_BAND_1 = -0.2
  END_GROUP = LEVEL2_SURFACE_REFLECTANCE_PARAMETERS
  GROUP = LEVEL2_SURFACE_TEMPERATURE_PARAMETERS
    TEMPERATURE_MULT_BAND_ST_B10 = 0.00341802
    TEMPERATURE_ADD_BAND_ST_B10 = 149.0
  END_GROUP = LEVEL2_SURFACE_TEMPERATURE_PARAMETERS
  GROUP = LEVEL1_RADIOMETRIC_RESCALING
    REFLECTANCE_MULT_BAND_1 = 2.0000E-05
    REFLECTANCE_ADD_BAND_1 = -0.100000
  END_GROUP = LEVEL1_RADIOMETRIC_RESCALING
END_GROUP = LANDSAT_METADATA_FILE
END
"#;

/// Write a 16-bit grayscale TIFF filled by `f(row, col)`.
pub fn write_tiff_band(
    path: &std::path::Path,
    rows: u32,
    cols: u32,
    f: impl Fn(u32, u32) -> u16,
) {
    let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_fn(cols, rows, |x, y| {
        image::Luma([f(y, x)])
    });
    img.save(path).expect("write test band");
}
