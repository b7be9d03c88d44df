use crate::engine::animation::swing::RestRotation;
use crate::engine::assets::museum_layout::{MaterialOverride, MuseumLayout};
use crate::engine::core::app_state::AppState;
use crate::engine::error::{LayoutError, SceneSetupError};
use crate::engine::loading::progress::{LoadingProgress, record_failure};
use crate::engine::loading::scene_loader::SceneLoader;
use crate::interaction::doors::{DoorClips, DoorRegistry, attach_door_animation};
use crate::interaction::exhibits::ExhibitRegistry;
use crate::interaction::triggers::TriggerRegistry;
use bevy::animation::AnimationClip;
use bevy::animation::graph::AnimationGraph;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, ComputedColliderShape, TriMeshFlags};
use std::collections::HashMap;

/// Name and hierarchy snapshot of the spawned museum scene.
///
/// Entities are inserted in pre-order, so when several entities share a name
/// (a glTF node and its single primitive usually do) the ancestor-most one wins.
#[derive(Debug, Default)]
pub struct SceneIndex {
    by_name: HashMap<String, Entity>,
    parents: HashMap<Entity, Entity>,
    meshes: Vec<Entity>,
}

impl SceneIndex {
    pub fn insert(&mut self, entity: Entity, parent: Option<Entity>, name: Option<&str>, has_mesh: bool) {
        if let Some(parent) = parent {
            self.parents.insert(entity, parent);
        }
        if let Some(name) = name {
            self.by_name.entry(name.to_string()).or_insert(entity);
        }
        if has_mesh {
            self.meshes.push(entity);
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Entity, SceneSetupError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SceneSetupError::MissingMesh(name.to_string()))
    }

    /// True when `entity` is `ancestor` or one of its descendants.
    pub fn is_within(&self, entity: Entity, ancestor: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            current = self.parents.get(&e).copied();
        }
        false
    }

    /// Mesh-bearing entities at or below `ancestor`.
    pub fn meshes_within(&self, ancestor: Entity) -> Vec<Entity> {
        self.meshes
            .iter()
            .copied()
            .filter(|mesh| self.is_within(*mesh, ancestor))
            .collect()
    }

    pub fn mesh_entities(&self) -> &[Entity] {
        &self.meshes
    }
}

/// Everything the layout asks of the scene, resolved to entities.
#[derive(Debug, Default)]
pub struct SceneWiring {
    pub doors: DoorRegistry,
    pub triggers: TriggerRegistry,
    pub exhibits: ExhibitRegistry,
    /// Mesh entities that get a static trimesh collider.
    pub colliders: Vec<Entity>,
    pub hidden: Vec<Entity>,
    /// Door leaves and hinges, which need their rest rotation recorded.
    pub animated: Vec<Entity>,
}

/// Resolve every named role in the layout. The first missing mesh aborts;
/// collision-exempt names that are absent are only logged.
pub fn wire_scene(layout: &MuseumLayout, index: &SceneIndex) -> Result<SceneWiring, SceneSetupError> {
    for name in layout.required_meshes() {
        index.lookup(name)?;
    }

    let exempt: Vec<Entity> = layout
        .collision_exempt
        .iter()
        .filter_map(|name| match index.lookup(name) {
            Ok(entity) => Some(entity),
            Err(_) => {
                warn!("Collision-exempt mesh `{}` not in scene, skipping", name);
                None
            }
        })
        .collect();

    let walls = layout
        .invisible_walls
        .iter()
        .map(|name| index.lookup(name))
        .collect::<Result<Vec<_>, _>>()?;

    let trigger_roots = layout
        .triggers
        .iter()
        .map(|trigger| index.lookup(&trigger.mesh))
        .collect::<Result<Vec<_>, _>>()?;

    let mut wiring = SceneWiring::default();

    // Walls and trigger volumes always collide, even inside an exempt subtree.
    let forced: Vec<Entity> = walls.iter().chain(&trigger_roots).copied().collect();
    wiring.colliders = index
        .mesh_entities()
        .iter()
        .copied()
        .filter(|mesh| {
            let is_forced = forced.iter().any(|root| index.is_within(*mesh, *root));
            let is_exempt = exempt.iter().any(|root| index.is_within(*mesh, *root));
            is_forced || !is_exempt
        })
        .collect();
    wiring.hidden = forced;

    for door in &layout.doors {
        let leaf = index.lookup(&door.leaf)?;
        let hinge = index.lookup(&door.hinge)?;
        wiring.doors.register(door, leaf, hinge);
        wiring.animated.extend([leaf, hinge]);
    }

    for (trigger, root) in layout.triggers.iter().zip(&trigger_roots) {
        let doors = trigger
            .doors
            .iter()
            .map(|id| {
                wiring.doors.find(id).ok_or_else(|| LayoutError::UnknownTriggerDoor {
                    trigger: trigger.mesh.clone(),
                    door: id.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        wiring
            .triggers
            .register(&trigger.mesh, doors, index.meshes_within(*root));
    }

    for exhibit in &layout.exhibits {
        let entity = index.lookup(&exhibit.mesh)?;
        wiring.exhibits.register(exhibit, entity);
    }

    Ok(wiring)
}

/// Alpha blended, optionally double sided with back-face culling off.
pub fn override_material(material: &mut StandardMaterial, settings: &MaterialOverride) {
    material.base_color.set_alpha(settings.alpha);
    material.alpha_mode = AlphaMode::Blend;
    if settings.double_sided {
        material.double_sided = true;
        material.cull_mode = None;
    }
}

/// Override every listed material, looked up by name in the model.
pub fn apply_material_overrides(
    overrides: &[MaterialOverride],
    lookup: impl Fn(&str) -> Option<Handle<StandardMaterial>>,
    materials: &mut Assets<StandardMaterial>,
) -> Result<(), SceneSetupError> {
    for settings in overrides {
        let material = lookup(&settings.name)
            .and_then(|handle| materials.get_mut(&handle))
            .ok_or_else(|| SceneSetupError::MissingMaterial(settings.name.clone()))?;
        override_material(material, settings);
    }
    Ok(())
}

fn index_scene(
    root: Entity,
    nodes: &Query<(Option<&Name>, Option<&Children>, Has<Mesh3d>)>,
) -> SceneIndex {
    let mut index = SceneIndex::default();
    let mut stack = vec![(root, None)];

    while let Some((entity, parent)) = stack.pop() {
        let Ok((name, children, has_mesh)) = nodes.get(entity) else {
            continue;
        };
        index.insert(entity, parent, name.map(Name::as_str), has_mesh);
        if let Some(children) = children {
            let children: &[Entity] = children;
            stack.extend(children.iter().rev().map(|child| (*child, Some(entity))));
        }
    }

    index
}

/// One-time scene configuration once the instance is spawned.
pub fn configure_scene(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
    scene_loader: Res<SceneLoader>,
    layout: Option<Res<MuseumLayout>>,
    gltfs: Res<Assets<Gltf>>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut clip_assets: ResMut<Assets<AnimationClip>>,
    mut graph_assets: ResMut<Assets<AnimationGraph>>,
    door_clips: Res<DoorClips>,
    nodes: Query<(Option<&Name>, Option<&Children>, Has<Mesh3d>)>,
    mesh_handles: Query<&Mesh3d>,
    transforms: Query<&Transform>,
) {
    let (Some(layout), Some(root)) = (layout, scene_loader.root()) else {
        return;
    };

    let index = index_scene(root, &nodes);
    let wiring = match wire_scene(&layout, &index) {
        Ok(wiring) => wiring,
        Err(err) => {
            record_failure(&mut loading_progress, &mut next_state, err);
            return;
        }
    };

    if !layout.materials.is_empty() {
        let Some(gltf) = scene_loader.gltf().and_then(|handle| gltfs.get(handle)) else {
            return;
        };
        let lookup = |name: &str| gltf.named_materials.get(name).cloned();
        if let Err(err) = apply_material_overrides(&layout.materials, lookup, &mut materials) {
            record_failure(&mut loading_progress, &mut next_state, err);
            return;
        }
    }

    let door_graphs = match door_clips.build_graphs(&mut clip_assets, &mut graph_assets) {
        Ok(graphs) => graphs,
        Err(err) => {
            record_failure(&mut loading_progress, &mut next_state, err);
            return;
        }
    };

    let trimesh = ComputedColliderShape::TriMesh(TriMeshFlags::default());
    let mut collider_count = 0;
    for entity in &wiring.colliders {
        let collider = mesh_handles
            .get(*entity)
            .ok()
            .and_then(|handle| meshes.get(&handle.0))
            .and_then(|mesh| Collider::from_bevy_mesh(mesh, &trimesh));
        let Some(collider) = collider else {
            debug!("Mesh {:?} has no triangle geometry, skipping collider", entity);
            continue;
        };
        commands.entity(*entity).insert(collider);
        collider_count += 1;
    }

    for entity in &wiring.hidden {
        commands.entity(*entity).insert(Visibility::Hidden);
    }

    for entity in &wiring.animated {
        if let Ok(transform) = transforms.get(*entity) {
            commands.entity(*entity).insert(RestRotation(transform.rotation));
        }
    }
    for record in wiring.doors.iter() {
        attach_door_animation(&mut commands, record, &door_graphs);
    }

    info!(
        "✓ Scene configured: {} colliders, {} doors, {} triggers, {} exhibits",
        collider_count,
        wiring.doors.len(),
        wiring.triggers.len(),
        wiring.exhibits.len()
    );

    if wiring.doors.is_empty() && wiring.exhibits.is_empty() {
        warn!("Layout `{}` wires no doors or exhibits", layout.name);
    }

    commands.insert_resource(wiring.doors);
    commands.insert_resource(wiring.triggers);
    commands.insert_resource(wiring.exhibits);
    loading_progress.scene_configured = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::museum_layout::{DoorLayout, DoorSwing, ExhibitLayout, TriggerLayout};
    use bevy::animation::AnimationTarget;
    use bevy::ecs::system::RunSystemOnce;

    /// museum
    /// ├── Box111 ── Box111 (mesh)
    /// ├── Box112 ── Box112 (mesh)
    /// ├── Fox_Window_Frame ── pane (mesh)
    /// │   └── invisible_wall_1 (mesh)
    /// ├── main_door_trigger (mesh)
    /// ├── Fox_Exhibit ── part (mesh)
    /// └── floor (mesh)
    struct TestScene {
        index: SceneIndex,
        by_label: HashMap<&'static str, Entity>,
    }

    impl TestScene {
        fn build() -> Self {
            let mut world = World::new();
            let mut index = SceneIndex::default();
            let mut by_label = HashMap::new();
            let nodes: [(&'static str, Option<&'static str>, Option<&'static str>, bool); 12] = [
                ("root", None, Some("museum"), false),
                ("leaf", Some("root"), Some("Box111"), false),
                ("leaf_mesh", Some("leaf"), Some("Box111"), true),
                ("hinge", Some("root"), Some("Box112"), false),
                ("hinge_mesh", Some("hinge"), Some("Box112"), true),
                ("frame", Some("root"), Some("Fox_Window_Frame"), false),
                ("pane", Some("frame"), None, true),
                ("wall", Some("frame"), Some("invisible_wall_1"), true),
                ("trigger", Some("root"), Some("main_door_trigger"), true),
                ("exhibit", Some("root"), Some("Fox_Exhibit"), false),
                ("exhibit_mesh", Some("exhibit"), None, true),
                ("floor", Some("root"), Some("floor"), true),
            ];
            for (label, parent, name, has_mesh) in nodes {
                let entity = world.spawn_empty().id();
                let parent = parent.map(|p| by_label[p]);
                index.insert(entity, parent, name, has_mesh);
                by_label.insert(label, entity);
            }
            Self { index, by_label }
        }

        fn entity(&self, label: &str) -> Entity {
            self.by_label[label]
        }
    }

    fn layout() -> MuseumLayout {
        MuseumLayout {
            name: "test".into(),
            model: "models/test.glb".into(),
            camera: default(),
            light: default(),
            collision_exempt: vec!["Fox_Window_Frame".into()],
            invisible_walls: vec!["invisible_wall_1".into()],
            materials: vec![],
            doors: vec![DoorLayout {
                id: "main_door_left".into(),
                leaf: "Box111".into(),
                hinge: "Box112".into(),
                swing: DoorSwing::Left,
                open_on_click: false,
            }],
            triggers: vec![TriggerLayout {
                mesh: "main_door_trigger".into(),
                doors: vec!["main_door_left".into()],
            }],
            exhibits: vec![ExhibitLayout {
                mesh: "Fox_Exhibit".into(),
                title: "Red Fox".into(),
                body: "Vulpes vulpes.".into(),
                link: None,
            }],
        }
    }

    fn collides(wiring: &SceneWiring, entity: Entity) -> bool {
        wiring.colliders.contains(&entity)
    }

    #[test]
    fn duplicate_names_resolve_to_the_node() {
        let scene = TestScene::build();
        assert_eq!(scene.index.lookup("Box111").ok(), Some(scene.entity("leaf")));
    }

    #[test]
    fn exempt_subtrees_do_not_collide_except_walls() {
        let scene = TestScene::build();
        let wiring = wire_scene(&layout(), &scene.index).expect("wired");

        assert!(!collides(&wiring, scene.entity("pane")));
        assert!(collides(&wiring, scene.entity("wall")));
        assert!(collides(&wiring, scene.entity("floor")));
        assert!(collides(&wiring, scene.entity("trigger")));
        assert_eq!(wiring.colliders.len(), scene.index.mesh_entities().len() - 1);
    }

    #[test]
    fn missing_exempt_names_are_skipped() {
        let scene = TestScene::build();
        let mut layout = layout();
        layout.collision_exempt.push("Demolished_Annex".into());

        let wiring = wire_scene(&layout, &scene.index).expect("wired");
        assert!(!collides(&wiring, scene.entity("pane")));
        assert!(collides(&wiring, scene.entity("floor")));
    }

    #[test]
    fn walls_and_triggers_are_hidden() {
        let scene = TestScene::build();
        let wiring = wire_scene(&layout(), &scene.index).expect("wired");
        assert_eq!(wiring.hidden, vec![scene.entity("wall"), scene.entity("trigger")]);
    }

    #[test]
    fn roles_are_registered_by_entity() {
        let scene = TestScene::build();
        let mut wiring = wire_scene(&layout(), &scene.index).expect("wired");

        let door = wiring.doors.lookup(scene.entity("leaf")).expect("door");
        assert_eq!(wiring.doors.lookup(scene.entity("hinge")), None);
        assert_eq!(wiring.doors.get(door).map(|record| record.hinge), Some(scene.entity("hinge")));
        assert!(wiring.exhibits.lookup(scene.entity("exhibit")).is_some());
        assert_eq!(wiring.animated, vec![scene.entity("leaf"), scene.entity("hinge")]);

        let fired = wiring.triggers.fire(scene.entity("trigger")).expect("trigger part");
        assert_eq!(fired.doors, vec![door]);
    }

    #[test]
    fn missing_mesh_is_fatal() {
        let scene = TestScene::build();
        let mut broken = layout();
        broken.exhibits[0].mesh = "Unicorn".into();

        let err = wire_scene(&broken, &scene.index).expect_err("missing mesh");
        assert!(matches!(err, SceneSetupError::MissingMesh(name) if name == "Unicorn"));
    }

    #[test]
    fn glass_override_blends_and_shows_back_faces() {
        let mut material = StandardMaterial::default();
        override_material(
            &mut material,
            &MaterialOverride {
                name: "glass".into(),
                alpha: 0.25,
                double_sided: true,
            },
        );
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
        assert_eq!(material.base_color.alpha(), 0.25);
        assert!(material.double_sided);
        assert!(material.cull_mode.is_none());
    }

    fn glass() -> MaterialOverride {
        MaterialOverride {
            name: "glass".into(),
            alpha: 0.25,
            double_sided: true,
        }
    }

    #[test]
    fn unknown_material_is_fatal() {
        let mut materials = Assets::<StandardMaterial>::default();
        let err = apply_material_overrides(&[glass()], |_| None, &mut materials)
            .expect_err("missing material");
        assert!(matches!(err, SceneSetupError::MissingMaterial(name) if name == "glass"));
    }

    #[test]
    fn named_material_is_overridden() {
        let mut materials = Assets::<StandardMaterial>::default();
        let handle = materials.add(StandardMaterial::default());
        let lookup = |name: &str| (name == "glass").then(|| handle.clone());

        apply_material_overrides(&[glass()], lookup, &mut materials).expect("applied");
        let material = materials.get(&handle).expect("material");
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
    }

    /// Spawns the same museum as `TestScene`, as a real hierarchy with meshes.
    fn spawned_museum(world: &mut World) -> HashMap<&'static str, Entity> {
        let mut labels = HashMap::new();
        let cube = world
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::new(2.0, 2.0, 2.0));
        let nodes: [(&'static str, Option<&'static str>, Option<&'static str>, bool); 10] = [
            ("root", None, Some("museum"), false),
            ("leaf", Some("root"), Some("Box111"), true),
            ("hinge", Some("root"), Some("Box112"), true),
            ("frame", Some("root"), Some("Fox_Window_Frame"), false),
            ("pane", Some("frame"), None, true),
            ("wall", Some("frame"), Some("invisible_wall_1"), true),
            ("trigger", Some("root"), Some("main_door_trigger"), true),
            ("exhibit", Some("root"), Some("Fox_Exhibit"), false),
            ("exhibit_mesh", Some("exhibit"), None, true),
            ("floor", Some("root"), Some("floor"), true),
        ];
        for (label, parent, name, has_mesh) in nodes {
            let rotation = if label == "leaf" { Quat::from_rotation_x(-0.5) } else { Quat::IDENTITY };
            let mut node = world.spawn(Transform::from_rotation(rotation));
            if let Some(parent) = parent {
                node.insert(ChildOf(labels[parent]));
            }
            if let Some(name) = name {
                node.insert(Name::new(name));
            }
            if has_mesh {
                node.insert(Mesh3d(cube.clone()));
            }
            labels.insert(label, node.id());
        }
        labels
    }

    fn configure_world() -> (World, HashMap<&'static str, Entity>) {
        let mut world = World::new();
        world.init_resource::<LoadingProgress>();
        world.init_resource::<NextState<AppState>>();
        world.init_resource::<Assets<Gltf>>();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        world.init_resource::<Assets<AnimationClip>>();
        world.init_resource::<Assets<AnimationGraph>>();
        world.init_resource::<DoorClips>();
        world.insert_resource(layout());

        let labels = spawned_museum(&mut world);
        world.insert_resource(SceneLoader::with_root(labels["root"]));
        (world, labels)
    }

    #[test]
    fn configured_scene_collides_hides_and_animates() {
        let (mut world, labels) = configure_world();
        world.run_system_once(configure_scene).expect("configure");

        for label in ["floor", "wall", "trigger", "leaf"] {
            assert!(world.get::<Collider>(labels[label]).is_some(), "{label} collides");
        }
        assert!(world.get::<Collider>(labels["pane"]).is_none());

        assert_eq!(world.get::<Visibility>(labels["wall"]), Some(&Visibility::Hidden));
        assert_eq!(world.get::<Visibility>(labels["trigger"]), Some(&Visibility::Hidden));
        assert_ne!(world.get::<Visibility>(labels["floor"]), Some(&Visibility::Hidden));

        let rest = world.get::<RestRotation>(labels["leaf"]).expect("rest rotation");
        assert_eq!(rest.0, Quat::from_rotation_x(-0.5));
        let hinge = world.get::<AnimationTarget>(labels["hinge"]).expect("hinge target");
        assert_eq!(hinge.player, labels["leaf"]);

        assert!(world.resource::<LoadingProgress>().scene_configured);
        assert_eq!(world.resource::<DoorRegistry>().len(), 1);
        assert_eq!(world.resource::<Assets<AnimationClip>>().len(), 4);
    }

    #[test]
    fn missing_role_fails_the_load() {
        let (mut world, _) = configure_world();
        world.resource_mut::<MuseumLayout>().exhibits[0].mesh = "Unicorn".into();
        world.run_system_once(configure_scene).expect("configure");

        let progress = world.resource::<LoadingProgress>();
        assert!(!progress.scene_configured);
        assert_eq!(progress.failure.as_deref(), Some("mesh `Unicorn` not found in scene"));
        assert!(matches!(
            *world.resource::<NextState<AppState>>(),
            NextState::Pending(AppState::Failed)
        ));
    }
}
