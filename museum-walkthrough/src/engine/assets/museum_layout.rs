use crate::constants::camera::{
    ELLIPSOID_RADII, GRAVITY, LOOK_SENSITIVITY, START_POSITION, START_YAW, WALK_SPEED,
};
use crate::constants::render_settings::AMBIENT_BRIGHTNESS;
use crate::engine::error::LayoutError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete museum variant description as a Bevy asset. Mirrors the JSON structure.
/// Inserted as a resource once loaded so runtime systems can read it directly.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct MuseumLayout {
    pub name: String,
    /// Asset path of the glTF scene file.
    pub model: String,
    #[serde(default)]
    pub camera: CameraLayout,
    #[serde(default)]
    pub light: LightLayout,
    /// Meshes that never take part in camera collision, e.g. window frames.
    #[serde(default)]
    pub collision_exempt: Vec<String>,
    /// Meshes that block the camera but are never drawn.
    #[serde(default)]
    pub invisible_walls: Vec<String>,
    #[serde(default)]
    pub materials: Vec<MaterialOverride>,
    #[serde(default)]
    pub doors: Vec<DoorLayout>,
    #[serde(default)]
    pub triggers: Vec<TriggerLayout>,
    #[serde(default)]
    pub exhibits: Vec<ExhibitLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLayout {
    pub position: [f32; 3],
    pub yaw: f32,
    pub ellipsoid: [f32; 3],
    pub check_collisions: bool,
    pub apply_gravity: bool,
    pub gravity: [f32; 3],
    pub speed: f32,
    pub look_sensitivity: f32,
}

impl Default for CameraLayout {
    fn default() -> Self {
        Self {
            position: START_POSITION,
            yaw: START_YAW,
            ellipsoid: ELLIPSOID_RADII,
            check_collisions: true,
            apply_gravity: true,
            gravity: GRAVITY,
            speed: WALK_SPEED,
            look_sensitivity: LOOK_SENSITIVITY,
        }
    }
}

/// Hemispheric light approximation: an ambient term plus a directional light
/// shining against `direction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightLayout {
    pub direction: [f32; 3],
    pub brightness: f32,
}

impl Default for LightLayout {
    fn default() -> Self {
        Self {
            direction: [0.0, 110.0, 0.0],
            brightness: AMBIENT_BRIGHTNESS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialOverride {
    pub name: String,
    pub alpha: f32,
    #[serde(default)]
    pub double_sided: bool,
}

/// Swing direction of a door leaf about its hinge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorSwing {
    Left,
    Right,
}

/// A leaf mesh and its hinge mesh animated together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorLayout {
    pub id: String,
    pub leaf: String,
    pub hinge: String,
    pub swing: DoorSwing,
    #[serde(default = "default_true")]
    pub open_on_click: bool,
}

/// Invisible volume that opens the listed doors the first time the camera touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerLayout {
    pub mesh: String,
    pub doors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitLink {
    pub label: String,
    pub url: String,
}

/// Exhibit mesh and the fixed text shown in the info modal when it is clicked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExhibitLayout {
    pub mesh: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub link: Option<ExhibitLink>,
}

fn default_true() -> bool {
    true
}

impl MuseumLayout {
    /// Reject content mistakes before any scene work is done.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.model.trim().is_empty() {
            return Err(LayoutError::MissingModel);
        }

        let mut door_ids = HashSet::new();
        for door in &self.doors {
            if !door_ids.insert(door.id.as_str()) {
                return Err(LayoutError::DuplicateDoor(door.id.clone()));
            }
        }

        for trigger in &self.triggers {
            if let Some(door) = trigger
                .doors
                .iter()
                .find(|door| !door_ids.contains(door.as_str()))
            {
                return Err(LayoutError::UnknownTriggerDoor {
                    trigger: trigger.mesh.clone(),
                    door: door.clone(),
                });
            }
        }

        let mut exhibit_meshes = HashSet::new();
        for exhibit in &self.exhibits {
            if !exhibit_meshes.insert(exhibit.mesh.as_str()) {
                return Err(LayoutError::DuplicateExhibit(exhibit.mesh.clone()));
            }
        }

        Ok(())
    }

    /// Names that must resolve to a mesh in the loaded scene.
    pub fn required_meshes(&self) -> impl Iterator<Item = &str> {
        self.invisible_walls
            .iter()
            .map(String::as_str)
            .chain(
                self.doors
                    .iter()
                    .flat_map(|door| [door.leaf.as_str(), door.hinge.as_str()]),
            )
            .chain(self.triggers.iter().map(|trigger| trigger.mesh.as_str()))
            .chain(self.exhibits.iter().map(|exhibit| exhibit.mesh.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOF_LAYOUT: &str = include_str!("../../../assets/layouts/museum_with_roof.layout.json");
    const TRIGGER_LAYOUT: &str =
        include_str!("../../../assets/layouts/museum_triggers.layout.json");
    const GALLERY_LAYOUT: &str =
        include_str!("../../../assets/layouts/museum_gallery.layout.json");

    fn minimal(json: &str) -> MuseumLayout {
        serde_json::from_str(json).expect("parse layout")
    }

    #[test]
    fn shipped_layouts_parse_and_validate() {
        for source in [ROOF_LAYOUT, TRIGGER_LAYOUT, GALLERY_LAYOUT] {
            let layout = minimal(source);
            assert_eq!(layout.validate(), Ok(()), "layout {}", layout.name);
        }
    }

    #[test]
    fn roof_layout_matches_entrance_setup() {
        let layout = minimal(ROOF_LAYOUT);
        assert_eq!(layout.camera.position, [-175.0, 25.0, -45.0]);
        assert_eq!(layout.camera.ellipsoid, [5.0, 12.5, 5.0]);
        assert_eq!(layout.doors.len(), 7);
        assert!(layout.collision_exempt.iter().any(|m| m == "Fox_Window_Frame"));

        let fox = layout.doors.iter().find(|d| d.id == "fox_door").expect("fox door");
        assert_eq!(fox.swing, DoorSwing::Right);
        assert_eq!((fox.leaf.as_str(), fox.hinge.as_str()), ("Box105", "Box106"));
    }

    #[test]
    fn omitted_sections_fall_back_to_defaults() {
        let layout = minimal(r#"{ "name": "bare", "model": "models/bare.glb" }"#);
        assert!(layout.camera.check_collisions);
        assert!(layout.camera.apply_gravity);
        assert_eq!(layout.camera.yaw, START_YAW);
        assert!(layout.doors.is_empty());
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn doors_default_to_click_activation() {
        let layout = minimal(
            r#"{ "name": "d", "model": "m.glb",
                 "doors": [{ "id": "a", "leaf": "L", "hinge": "H", "swing": "left" }] }"#,
        );
        assert!(layout.doors[0].open_on_click);
        assert_eq!(layout.doors[0].swing, DoorSwing::Left);
    }

    #[test]
    fn duplicate_door_ids_are_rejected() {
        let layout = minimal(
            r#"{ "name": "d", "model": "m.glb", "doors": [
                 { "id": "a", "leaf": "L1", "hinge": "H1", "swing": "left" },
                 { "id": "a", "leaf": "L2", "hinge": "H2", "swing": "right" } ] }"#,
        );
        assert_eq!(layout.validate(), Err(LayoutError::DuplicateDoor("a".into())));
    }

    #[test]
    fn triggers_must_reference_declared_doors() {
        let layout = minimal(
            r#"{ "name": "d", "model": "m.glb",
                 "doors": [{ "id": "a", "leaf": "L", "hinge": "H", "swing": "left" }],
                 "triggers": [{ "mesh": "T", "doors": ["a", "b"] }] }"#,
        );
        assert_eq!(
            layout.validate(),
            Err(LayoutError::UnknownTriggerDoor {
                trigger: "T".into(),
                door: "b".into()
            })
        );
    }

    #[test]
    fn missing_model_is_rejected() {
        let layout = minimal(r#"{ "name": "d", "model": "  " }"#);
        assert_eq!(layout.validate(), Err(LayoutError::MissingModel));
    }

    #[test]
    fn required_meshes_cover_every_role() {
        let layout = minimal(GALLERY_LAYOUT);
        let required: Vec<&str> = layout.required_meshes().collect();
        assert!(required.contains(&"invisible_wall_1"));
        assert!(required.contains(&"Box111"));
        assert!(required.contains(&"Box112"));
        for exhibit in &layout.exhibits {
            assert!(required.contains(&exhibit.mesh.as_str()));
        }
    }
}
