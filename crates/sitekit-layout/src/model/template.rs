use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::instance::{Clearance, EquipmentInstance, InstanceId, RealWorldSize, ShapeKind};
use crate::geometry::Point;

/// Immutable catalog definition an instance is created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentTemplate {
    pub id: String,
    pub name: String,
    pub size: RealWorldSize,
    pub clearance: Clearance,
    /// Real-world units
    #[serde(default)]
    pub min_spacing: f64,
    pub color: String,
}

impl EquipmentTemplate {
    pub fn rectangle(id: &str, name: &str, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            size: RealWorldSize::Rectangle { width, height },
            clearance: Clearance::none(ShapeKind::Rectangle),
            min_spacing: 0.0,
            color: "#4a90d9".to_string(),
        }
    }

    pub fn circle(id: &str, name: &str, radius: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            size: RealWorldSize::Circle { radius },
            clearance: Clearance::none(ShapeKind::Circle),
            min_spacing: 0.0,
            color: "#4a90d9".to_string(),
        }
    }

    pub fn with_min_spacing(mut self, min_spacing: f64) -> Self {
        self.min_spacing = min_spacing;
        self
    }

    pub fn with_clearance(mut self, clearance: Clearance) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn shape(&self) -> ShapeKind {
        self.size.shape()
    }

    /// Builds a fresh instance with its top-left corner at `top_left`.
    pub fn instantiate(&self, top_left: Point, units_per_pixel: f64) -> EquipmentInstance {
        let (width, height) = self.size.to_pixels(units_per_pixel);
        EquipmentInstance {
            id: InstanceId::generate(),
            template_id: self.id.clone(),
            shape: self.shape(),
            x: top_left.x,
            y: top_left.y,
            width,
            height,
            rotation: 0.0,
            real_size: self.size,
            clearance: self.clearance,
            min_spacing: self.min_spacing,
            name: self.name.clone(),
            color: self.color.clone(),
            visible: true,
        }
    }
}

/// Template lookup used by placement.
pub trait TemplateCatalog {
    fn template(&self, id: &str) -> Option<&EquipmentTemplate>;
}

/// In-memory catalog keyed by template id.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: HashMap<String, EquipmentTemplate>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, template: EquipmentTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn remove(&mut self, id: &str) -> Option<EquipmentTemplate> {
        self.templates.remove(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquipmentTemplate> {
        self.templates.values()
    }
}

impl FromIterator<EquipmentTemplate> for TemplateLibrary {
    fn from_iter<I: IntoIterator<Item = EquipmentTemplate>>(iter: I) -> Self {
        let mut library = TemplateLibrary::new();
        for template in iter {
            library.insert(template);
        }
        library
    }
}

impl TemplateCatalog for TemplateLibrary {
    fn template(&self, id: &str) -> Option<&EquipmentTemplate> {
        self.templates.get(id)
    }
}
