//! # Section Descriptors
//!
//! JSON-friendly description of a section: a list of named materials and a
//! list of geometries that reference them by name.
//!
//! ## JSON Example
//!
//! ```rust
//! use section_core::input::SectionInput;
//! use section_core::section::Section;
//!
//! let json = r#"{
//!     "materials": [
//!         { "name": "C40", "type": "Concrete", "variables": { "fc": 40.0e6 } },
//!         { "name": "B400", "type": "SteelIdeal", "variables": { "young": 200.0e9, "fy": 400.0e6 } }
//!     ],
//!     "geometries": [
//!         { "type": "RectSection", "material": "C40", "center": [0.0, 0.25],
//!           "variables": { "width": 0.3, "height": 0.5 } },
//!         { "type": "Rebar", "material": "B400", "center": [-0.11, 0.04], "variables": { "diameter": 0.02 } },
//!         { "type": "Rebar", "material": "B400", "center": [0.11, 0.04], "variables": { "diameter": 0.02 } }
//!     ]
//! }"#;
//!
//! let input = SectionInput::from_json(json).unwrap();
//! let section = Section::from_input(&input).unwrap();
//! assert_eq!(section.geometries().len(), 3);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{SectionError, SectionResult};
use crate::geometry::{Geometry, GeometryKind, Rebar, RectSection, Tendon, DEFAULT_SLICES};
use crate::materials::{parse_variables, Material, MaterialKind};
use crate::section::Section;

fn empty_variables() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_slices() -> usize {
    DEFAULT_SLICES
}

/// Complete section descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionInput {
    pub materials: Vec<MaterialInput>,
    pub geometries: Vec<GeometryInput>,
}

/// Named material descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[serde(default = "empty_variables")]
    pub variables: Value,
}

/// Geometry descriptor referencing a material by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub material: String,
    pub center: [f64; 2],
    #[serde(default = "empty_variables")]
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
struct RectVariables {
    width: f64,
    height: f64,
    #[serde(default = "default_slices")]
    slices: usize,
}

#[derive(Debug, Deserialize)]
struct BarVariables {
    diameter: f64,
}

#[derive(Debug, Deserialize)]
struct TendonVariables {
    diameter: f64,
    #[serde(default)]
    initial_strain: f64,
}

impl SectionInput {
    /// Parse a descriptor from JSON.
    pub fn from_json(json: &str) -> SectionResult<Self> {
        serde_json::from_str(json).map_err(|e| SectionError::invalid_input("section", "<json>", e.to_string()))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SectionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SectionError::invalid_input("section", "<input>", e.to_string()))
    }

    /// Build the material table, rejecting duplicate names.
    pub fn material_table(&self) -> SectionResult<HashMap<String, Arc<Material>>> {
        let mut table = HashMap::with_capacity(self.materials.len());
        for descriptor in &self.materials {
            if table.contains_key(&descriptor.name) {
                return Err(SectionError::duplicate_material(&descriptor.name));
            }
            let material = Material::from_variables(descriptor.kind, descriptor.variables.clone(), &descriptor.name)?;
            table.insert(descriptor.name.clone(), Arc::new(material));
        }
        Ok(table)
    }
}

impl GeometryInput {
    /// Resolve the material and build the geometry.
    pub fn build(&self, materials: &HashMap<String, Arc<Material>>, field: &str) -> SectionResult<Geometry> {
        let material = materials
            .get(&self.material)
            .cloned()
            .ok_or_else(|| SectionError::material_not_found(&self.material))?;
        let variables = self.variables.clone();
        let geometry: Geometry = match self.kind {
            GeometryKind::RectSection => {
                let v: RectVariables = parse_variables(variables, field)?;
                let rect = RectSection::new(material, self.center, v.width, v.height)?.with_slices(v.slices)?;
                match &self.name {
                    Some(name) => rect.with_label(name).into(),
                    None => rect.into(),
                }
            }
            GeometryKind::Rebar => {
                let v: BarVariables = parse_variables(variables, field)?;
                let bar = Rebar::new(material, self.center, v.diameter)?;
                match &self.name {
                    Some(name) => bar.with_label(name).into(),
                    None => bar.into(),
                }
            }
            GeometryKind::Tendon => {
                let v: TendonVariables = parse_variables(variables, field)?;
                let tendon = Tendon::new(material, self.center, v.diameter, v.initial_strain)?;
                match &self.name {
                    Some(name) => tendon.with_label(name).into(),
                    None => tendon.into(),
                }
            }
        };
        Ok(geometry)
    }
}

impl Section {
    /// Build a section from a descriptor.
    ///
    /// Geometries keep their descriptor order. Materials are shared between
    /// every geometry that names them.
    pub fn from_input(input: &SectionInput) -> SectionResult<Self> {
        let materials = input.material_table()?;
        let geometries = input
            .geometries
            .iter()
            .enumerate()
            .map(|(i, g)| g.build(&materials, &format!("geometries[{i}]")))
            .collect::<SectionResult<Vec<_>>>()?;
        log::debug!(
            "built section: {} materials, {} geometries",
            materials.len(),
            geometries.len()
        );
        Ok(Section::new(geometries))
    }

    /// Parse and build a section from a JSON descriptor.
    pub fn from_json(json: &str) -> SectionResult<Self> {
        Section::from_input(&SectionInput::from_json(json)?)
    }
}
