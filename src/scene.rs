use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Description of the showcase content: one mesh section per page section
/// plus the global presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub sections: Vec<Section>,
    pub settings: Settings,
}

impl Scene {
    /// Parses a showcase description authored as XML.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid showcase XML")?;
        let root = document.root_element();

        let mut settings = Settings::default();
        if let Some(node) = root.children().find(|n| n.has_tag_name("settings")) {
            settings.material_color =
                parse_color(optional_text(&node, "material-color"), settings.material_color)?;
            settings.background =
                parse_color(optional_text(&node, "background"), settings.background)?;
            settings.object_distance = parse_f32(
                optional_text(&node, "object-distance"),
                settings.object_distance,
            )?;
            settings.particle_count = parse_u32(
                optional_text(&node, "particle-count"),
                settings.particle_count,
            )?;
            settings.light_direction = parse_vec3(
                optional_text(&node, "light-direction"),
                settings.light_direction,
            )?;
            settings.light_color =
                parse_color(optional_text(&node, "light-color"), settings.light_color)?;
            settings.fov = parse_f32(optional_text(&node, "fov"), settings.fov)?;
        }

        let mut sections = Vec::new();
        for (index, node) in root
            .descendants()
            .filter(|n| n.has_tag_name("section"))
            .enumerate()
        {
            let name = required_text(&node, "name")?;
            let shape = required_text(&node, "shape")?
                .parse::<ShapeKind>()
                .with_context(|| format!("section {name}"))?;
            let default_position =
                Vec3::new(0.0, -settings.object_distance * index as f32, 0.0);
            let position = parse_vec3(optional_text(&node, "position"), default_position)?;
            let color = parse_color(optional_text(&node, "color"), settings.material_color)?;
            sections.push(Section {
                name,
                shape,
                color,
                position,
            });
        }

        if sections.is_empty() {
            return Err(anyhow!("showcase does not define any sections"));
        }

        Ok(Self { sections, settings })
    }

    /// The showcase shipped with the binary: three toon-shaded meshes spaced
    /// one object distance apart.
    pub fn builtin() -> Self {
        let settings = Settings::default();
        let sections = [
            ("Intro", ShapeKind::Torus),
            ("Work", ShapeKind::Cone),
            ("Contact", ShapeKind::TorusKnot),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (name, shape))| Section {
            name: name.to_string(),
            shape,
            color: settings.material_color,
            position: Vec3::new(0.0, -settings.object_distance * index as f32, 0.0),
        })
        .collect();
        Self { sections, settings }
    }

    /// Largest meaningful scroll offset: the last section aligned with the
    /// viewport. A single section leaves nothing to scroll to.
    pub fn max_scroll(&self, viewport_height: f32) -> f32 {
        self.sections.len().saturating_sub(1) as f32 * viewport_height
    }
}

/// One scroll section and the mesh presented alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub shape: ShapeKind,
    pub color: Vec3,
    pub position: Vec3,
}

/// Mesh silhouette available to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Torus,
    Cone,
    TorusKnot,
}

impl FromStr for ShapeKind {
    type Err = UnknownShape;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "torus" => Ok(Self::Torus),
            "cone" => Ok(Self::Cone),
            "torus-knot" => Ok(Self::TorusKnot),
            other => Err(UnknownShape(other.to_string())),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Torus => "torus",
            Self::Cone => "cone",
            Self::TorusKnot => "torus-knot",
        };
        f.write_str(name)
    }
}

/// Shape name that matches none of the supported silhouettes.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shape kind `{0}`")]
pub struct UnknownShape(pub String);

/// Global presentation settings shared by every section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub material_color: Vec3,
    pub background: Vec3,
    pub object_distance: f32,
    pub particle_count: u32,
    pub light_direction: Vec3,
    pub light_color: Vec3,
    pub fov: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            material_color: rgb(0xff, 0xed, 0xed),
            background: rgb(0x1e, 0x1a, 0x20),
            object_distance: 4.0,
            particle_count: 200,
            light_direction: Vec3::new(1.0, 1.0, 0.0),
            light_color: Vec3::ONE,
            fov: 35.0,
        }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

fn required_text(node: &Node<'_, '_>, tag: &str) -> Result<String> {
    optional_text(node, tag).ok_or_else(|| anyhow!("<{tag}> tag is missing"))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut numbers = value
        .split_whitespace()
        .filter_map(|component| component.parse::<f32>().ok());
    let x = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    let y = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    let z = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    Ok(Vec3::new(x, y, z))
}

/// Colors are either `#rrggbb` or a whitespace separated 0-255 triple.
fn parse_color(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 {
            return Err(anyhow!("hex color must have six digits: #{hex}"));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)?;
        let g = u8::from_str_radix(&hex[2..4], 16)?;
        let b = u8::from_str_radix(&hex[4..6], 16)?;
        return Ok(rgb(r, g, b));
    }
    let mut numbers = value
        .split_whitespace()
        .filter_map(|component| component.parse::<f32>().ok());
    let r = numbers
        .next()
        .ok_or_else(|| anyhow!("color is missing components"))?;
    let g = numbers
        .next()
        .ok_or_else(|| anyhow!("color is missing components"))?;
    let b = numbers
        .next()
        .ok_or_else(|| anyhow!("color is missing components"))?;
    Ok(Vec3::new(r / 255.0, g / 255.0, b / 255.0))
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float: {err}")),
        None => Ok(default),
    }
}

fn parse_u32(value: Option<String>, default: u32) -> Result<u32> {
    match value {
        Some(value) => value
            .parse::<u32>()
            .map_err(|err| anyhow!("failed to parse integer: {err}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <showcase>
        <settings>
            <material-color>#ffeded</material-color>
            <object-distance>5</object-distance>
            <particle-count>50</particle-count>
        </settings>
        <section>
            <name>Opening</name>
            <shape>torus</shape>
        </section>
        <section>
            <name>Closing</name>
            <shape>cone</shape>
            <color>255 128 0</color>
            <position>2 -5 0</position>
        </section>
    </showcase>
    "#;

    #[test]
    fn parse_showcase_populates_sections_and_settings() {
        let scene = Scene::from_xml(SAMPLE).unwrap();
        assert_eq!(scene.sections.len(), 2);
        assert_eq!(scene.settings.object_distance, 5.0);
        assert_eq!(scene.settings.particle_count, 50);

        let opening = &scene.sections[0];
        assert_eq!(opening.shape, ShapeKind::Torus);
        assert_eq!(opening.position, Vec3::ZERO);
        assert_eq!(opening.color, scene.settings.material_color);

        let closing = &scene.sections[1];
        assert_eq!(closing.shape, ShapeKind::Cone);
        assert_eq!(closing.position, Vec3::new(2.0, -5.0, 0.0));
        assert_eq!(closing.color, Vec3::new(1.0, 128.0 / 255.0, 0.0));
    }

    #[test]
    fn sections_default_to_one_object_distance_apart() {
        let xml = r#"
        <showcase>
            <section><name>A</name><shape>torus</shape></section>
            <section><name>B</name><shape>cone</shape></section>
            <section><name>C</name><shape>torus-knot</shape></section>
        </showcase>
        "#;
        let scene = Scene::from_xml(xml).unwrap();
        assert_eq!(scene.sections[0].position.y, 0.0);
        assert_eq!(scene.sections[1].position.y, -4.0);
        assert_eq!(scene.sections[2].position.y, -8.0);
    }

    #[test]
    fn missing_name_is_an_error() {
        let bad = "<showcase><section><shape>torus</shape></section></showcase>";
        assert!(Scene::from_xml(bad).is_err());
    }

    #[test]
    fn unknown_shape_names_the_offender() {
        let err = "sphere".parse::<ShapeKind>().unwrap_err();
        assert_eq!(err, UnknownShape("sphere".to_string()));
        assert!(err.to_string().contains("sphere"));
    }

    #[test]
    fn empty_showcase_is_an_error() {
        assert!(Scene::from_xml("<showcase></showcase>").is_err());
    }

    #[test]
    fn hex_colors_are_supported() {
        let scene = Scene::from_xml(SAMPLE).unwrap();
        let expected = Vec3::new(1.0, 237.0 / 255.0, 237.0 / 255.0);
        assert!((scene.settings.material_color - expected).length() < 1e-6);
    }

    #[test]
    fn builtin_showcase_has_three_sections() {
        let scene = Scene::builtin();
        assert_eq!(scene.sections.len(), 3);
        assert_eq!(scene.sections[2].shape, ShapeKind::TorusKnot);
        assert_eq!(scene.sections[2].position.y, -8.0);
        assert_eq!(scene.settings.fov, 35.0);
        assert_eq!(scene.max_scroll(800.0), 1600.0);
    }
}
