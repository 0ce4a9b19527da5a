//! Placement and spacing validation
//!
//! Candidates are checked against every existing instance using axis-aligned
//! boxes. The existing box is inflated by the larger of the two minimum
//! spacings, converted to pixels. Rotation and circular clearance are drawn
//! but not enforced here.

use std::fmt;

use crate::geometry::Bounds;
use crate::model::{EquipmentInstance, InstanceId};

/// Why a placement was refused.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRejection {
    /// The first existing instance found in conflict.
    pub conflicting_id: InstanceId,
    pub conflicting_name: String,
    /// Spacing applied to the conflict, in world pixels.
    pub required_spacing_px: f64,
}

impl fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required_spacing_px > 0.0 {
            write!(
                f,
                "Too close to {} (needs {:.1} px clearance)",
                self.conflicting_name, self.required_spacing_px
            )
        } else {
            write!(f, "Overlaps {}", self.conflicting_name)
        }
    }
}

/// Candidate footprint for validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCandidate {
    pub bounds: Bounds,
    /// Real-world units
    pub min_spacing: f64,
}

impl PlacementCandidate {
    pub fn from_instance(instance: &EquipmentInstance) -> Self {
        Self {
            bounds: instance.bounds(),
            min_spacing: instance.min_spacing,
        }
    }
}

fn conflicts(
    candidate: &PlacementCandidate,
    existing: &EquipmentInstance,
    units_per_pixel: f64,
) -> Option<f64> {
    let spacing_px =
        (candidate.min_spacing * units_per_pixel).max(existing.min_spacing * units_per_pixel);
    existing
        .bounds()
        .inflate(spacing_px)
        .intersects(&candidate.bounds)
        .then_some(spacing_px)
}

/// Checks a candidate against `existing`, skipping any id in `ignore`.
/// Stops at the first conflict.
pub fn validate_placement<'a>(
    candidate: &PlacementCandidate,
    existing: impl IntoIterator<Item = &'a EquipmentInstance>,
    ignore: &[InstanceId],
    units_per_pixel: f64,
) -> Result<(), PlacementRejection> {
    for other in existing {
        if ignore.contains(&other.id) {
            continue;
        }
        if let Some(required_spacing_px) = conflicts(candidate, other, units_per_pixel) {
            return Err(PlacementRejection {
                conflicting_id: other.id.clone(),
                conflicting_name: other.name.clone(),
                required_spacing_px,
            });
        }
    }
    Ok(())
}

/// A pair of instances that violate each other's spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub first: InstanceId,
    pub second: InstanceId,
    pub required_spacing_px: f64,
}

/// Every conflicting pair in a scene, each reported once.
pub fn find_conflicts(instances: &[EquipmentInstance], units_per_pixel: f64) -> Vec<Conflict> {
    let mut found = Vec::new();
    for (i, a) in instances.iter().enumerate() {
        let candidate = PlacementCandidate::from_instance(a);
        for b in &instances[i + 1..] {
            if let Some(required_spacing_px) = conflicts(&candidate, b, units_per_pixel) {
                found.push(Conflict {
                    first: a.id.clone(),
                    second: b.id.clone(),
                    required_spacing_px,
                });
            }
        }
    }
    found
}
