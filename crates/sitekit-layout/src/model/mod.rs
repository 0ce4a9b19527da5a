//! Scene data model: placed equipment, the template catalog seam, and
//! annotation overlays (site perimeter and ruler lines).

mod annotations;
mod instance;
mod template;

pub use annotations::{MeasurementLine, Perimeter};
pub use instance::{
    Clearance, EquipmentInstance, InstanceGeometry, InstanceId, RealWorldSize, ShapeKind,
};
pub use template::{EquipmentTemplate, TemplateCatalog, TemplateLibrary};
