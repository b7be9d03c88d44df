use crate::engine::assets::museum_layout::{ExhibitLayout, ExhibitLink};
use crate::interaction::dispatch::InteractionSource;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExhibitId(pub usize);

/// Fixed title/body/link triple shown for one exhibit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhibitInfo {
    pub mesh: String,
    pub title: String,
    pub body: String,
    pub link: Option<ExhibitLink>,
}

impl From<&ExhibitLayout> for ExhibitInfo {
    fn from(layout: &ExhibitLayout) -> Self {
        Self {
            mesh: layout.mesh.clone(),
            title: layout.title.clone(),
            body: layout.body.clone(),
            link: layout.link.clone(),
        }
    }
}

// Resources
#[derive(Resource, Debug, Clone, Default)]
pub struct ExhibitRegistry {
    exhibits: Vec<ExhibitInfo>,
    by_entity: HashMap<Entity, ExhibitId>,
}

impl ExhibitRegistry {
    pub fn register(&mut self, layout: &ExhibitLayout, entity: Entity) -> ExhibitId {
        let exhibit = ExhibitId(self.exhibits.len());
        self.exhibits.push(ExhibitInfo::from(layout));
        self.by_entity.insert(entity, exhibit);
        exhibit
    }

    pub fn lookup(&self, entity: Entity) -> Option<ExhibitId> {
        self.by_entity.get(&entity).copied()
    }

    pub fn find_by_mesh(&self, mesh: &str) -> Option<ExhibitId> {
        self.exhibits
            .iter()
            .position(|info| info.mesh == mesh)
            .map(ExhibitId)
    }

    pub fn get(&self, exhibit: ExhibitId) -> Option<&ExhibitInfo> {
        self.exhibits.get(exhibit.0)
    }

    pub fn len(&self) -> usize {
        self.exhibits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exhibits.is_empty()
    }
}

/// Content of the info modal. `revision` counts every show, including re-shows
/// of the same exhibit, so the UI redraws once per click.
#[derive(Resource, Debug, Clone, Default)]
pub struct InfoModalState {
    current: Option<ExhibitInfo>,
    revision: u64,
}

impl InfoModalState {
    pub fn show(&mut self, info: ExhibitInfo) {
        self.current = Some(info);
        self.revision += 1;
    }

    /// Returns false when nothing was open.
    pub fn close(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn current(&self) -> Option<&ExhibitInfo> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Event fired when an exhibit is picked or requested via RPC.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhibitSelected {
    pub exhibit: ExhibitId,
    pub source: InteractionSource,
}

// Components
#[derive(Component)]
pub struct InfoModalRoot;
#[derive(Component)]
pub struct InfoTitleText;
#[derive(Component)]
pub struct InfoBodyText;
#[derive(Component)]
pub struct InfoLinkButton;
#[derive(Component)]
pub struct InfoLinkLabel;
#[derive(Component)]
pub struct InfoCloseButton;

pub fn show_selected_exhibits(
    mut events: EventReader<ExhibitSelected>,
    registry: Option<Res<ExhibitRegistry>>,
    mut modal: ResMut<InfoModalState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(registry) = registry else {
        events.clear();
        return;
    };

    for event in events.read() {
        let Some(info) = registry.get(event.exhibit) else {
            continue;
        };
        info!("Exhibit `{}` selected via {:?}", info.mesh, event.source);
        rpc_interface.send_notification(
            "exhibit_selected",
            serde_json::json!({
                "mesh": info.mesh,
                "title": info.title,
            }),
        );
        modal.show(info.clone());
        debug!("Info modal shown {} times", modal.revision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn fox_exhibit() -> ExhibitLayout {
        ExhibitLayout {
            mesh: "Fox_Exhibit".into(),
            title: "Red Fox".into(),
            body: "Vulpes vulpes.".into(),
            link: Some(ExhibitLink {
                label: "Read more".into(),
                url: "https://en.wikipedia.org/wiki/Red_fox".into(),
            }),
        }
    }

    #[test]
    fn reclicking_reshows_identical_content() {
        let mut modal = InfoModalState::default();
        let info = ExhibitInfo::from(&fox_exhibit());

        modal.show(info.clone());
        let first = modal.current().cloned();
        modal.show(info.clone());

        assert_eq!(modal.current().cloned(), first);
        assert_eq!(modal.current(), Some(&info));
        assert_eq!(modal.revision(), 2);
    }

    #[test]
    fn close_clears_content_once() {
        let mut modal = InfoModalState::default();
        modal.show(ExhibitInfo::from(&fox_exhibit()));
        assert!(modal.close());
        assert!(!modal.is_open());
        assert!(!modal.close());
    }

    #[test]
    fn registry_resolves_entities_and_meshes() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let mut registry = ExhibitRegistry::default();
        let exhibit = registry.register(&fox_exhibit(), entity);

        assert_eq!(registry.lookup(entity), Some(exhibit));
        assert_eq!(registry.find_by_mesh("Fox_Exhibit"), Some(exhibit));
        assert_eq!(registry.get(exhibit).map(|info| info.title.as_str()), Some("Red Fox"));
    }

    #[test]
    fn each_selection_shows_the_triple_once() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let mut registry = ExhibitRegistry::default();
        let exhibit = registry.register(&fox_exhibit(), entity);
        world.insert_resource(registry);
        world.init_resource::<InfoModalState>();
        world.init_resource::<WebRpcInterface>();
        world.init_resource::<Events<ExhibitSelected>>();

        for _ in 0..2 {
            world.send_event(ExhibitSelected {
                exhibit,
                source: InteractionSource::Pointer,
            });
        }
        world
            .run_system_once(show_selected_exhibits)
            .expect("show exhibits");

        let modal = world.resource::<InfoModalState>();
        assert_eq!(modal.revision(), 2);
        assert_eq!(modal.current().map(|info| info.body.as_str()), Some("Vulpes vulpes."));
    }
}
