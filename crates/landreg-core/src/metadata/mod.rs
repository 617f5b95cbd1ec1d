pub mod mtl;
pub mod scene;

pub use mtl::{MtlDocument, MtlGroup, MtlValue};
pub use scene::{
    BandCategory, BandInfo, LinearScale, ProjectedCorner, Quantity, Rescale, SceneMetadata, Sensor,
};
