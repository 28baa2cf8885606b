//! Process-wide tileset registry.
//!
//! The store exclusively owns every loaded [`TilesetIndex`]. Instances and
//! cursors refer to tiles and tracks through [`TilesetId`], [`LocalId`] and
//! [`TrackRef`] only. Tilesets are published once and never replaced or
//! unloaded, so any id handed out stays valid for the life of the store.
//!
//! External animation references are resolved lazily here, not at load time:
//! the referenced tileset may be registered after the one referencing it.

use std::path::{Component, Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;

use crate::error::{TileError, TileResult};
use crate::components::worldshapes::WorldShape;
use crate::systems::collision::{InstanceTransform, resolve_world_shapes};
use crate::tiles::{
    AnimationTrack, HoldPolicy, LocalId, RawTileset, TileAnimation, TileDefinition, TilesetId,
    TilesetIndex, TrackRef,
};

/// Registry of loaded tilesets by id.
#[derive(Resource, Debug, Default)]
pub struct TilesetStore {
    tilesets: FxHashMap<TilesetId, TilesetIndex>,
}

impl TilesetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        TilesetStore {
            tilesets: FxHashMap::default(),
        }
    }

    /// Publish a tileset. Fails if its id is already taken.
    pub fn insert(&mut self, index: TilesetIndex) -> TileResult<&TilesetIndex> {
        let id = index.id().clone();
        if self.tilesets.contains_key(&id) {
            return Err(TileError::DuplicateTileset(id.to_string()));
        }
        info!(
            "Registered tileset '{}' ({} tiles, {} tracks)",
            id,
            index.len(),
            index.track_count()
        );
        Ok(self.tilesets.entry(id).or_insert(index))
    }

    /// Parse, index and publish a JSON tileset.
    pub fn load_json_str(
        &mut self,
        id: impl Into<TilesetId>,
        json: &str,
        policy: &HoldPolicy,
    ) -> TileResult<&TilesetIndex> {
        let raw = RawTileset::from_json_str(json)?;
        let index = TilesetIndex::load_with_policy(id, &raw, policy)?;
        self.insert(index)
    }

    /// Load a JSON tileset file. Its id is the path relative to `root`, with
    /// `/` separators, or the file name when the path lies outside `root`.
    pub fn load_file(
        &mut self,
        root: impl AsRef<Path>,
        path: impl AsRef<Path>,
        policy: &HoldPolicy,
    ) -> TileResult<TilesetId> {
        let path = path.as_ref();
        let id = tileset_id_for_path(root.as_ref(), path);
        let raw = RawTileset::load_from_file(path)?;
        let index = TilesetIndex::load_with_policy(id.clone(), &raw, policy)?;
        self.insert(index)?;
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<&TilesetIndex> {
        self.tilesets.get(id)
    }

    pub fn tileset(&self, id: &str) -> TileResult<&TilesetIndex> {
        self.get(id).ok_or_else(|| TileError::UnknownTileset(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tilesets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TilesetId, &TilesetIndex)> {
        self.tilesets.iter()
    }

    pub fn lookup(&self, tileset: &str, local_id: LocalId) -> TileResult<&TileDefinition> {
        self.tileset(tileset)?.lookup(local_id)
    }

    pub fn track(&self, track: &TrackRef) -> Option<&AnimationTrack> {
        self.get(track.tileset.as_str())?.track(track.track)
    }

    /// Resolve a tile's `anim` file reference to the shared track it names.
    ///
    /// The path is tried relative to the referencing tileset's directory and
    /// then as given. Tiled writes `.tsx` paths; a registered `.json`
    /// counterpart also matches.
    pub fn resolve_external_animation(&self, def: &TileDefinition) -> TileResult<TrackRef> {
        let broken = |reference: &str| TileError::BrokenAnimationReference {
            tileset: def.tileset.to_string(),
            local_id: def.local_id,
            reference: reference.to_string(),
        };
        let reference = def.external_animation_ref().ok_or_else(|| broken(""))?;

        let joined = join_reference(def.tileset.as_str(), reference);
        let candidates = [
            json_counterpart(&joined),
            Some(joined),
            json_counterpart(reference),
            Some(reference.trim_start_matches("./").to_string()),
        ];
        let target = candidates
            .into_iter()
            .flatten()
            .find_map(|candidate| self.get(&candidate))
            .ok_or_else(|| broken(reference))?;

        let track = target.primary_track().ok_or_else(|| broken(reference))?;
        Ok(TrackRef::new(target.id().clone(), track))
    }

    /// Track a tile plays, if any: its own inline track or the external one.
    pub fn resolve_animation(&self, def: &TileDefinition) -> TileResult<Option<TrackRef>> {
        match &def.animation {
            None => Ok(None),
            Some(TileAnimation::Inline(track)) => Ok(Some(TrackRef::new(def.tileset.clone(), *track))),
            Some(TileAnimation::External(_)) => self.resolve_external_animation(def).map(Some),
        }
    }

    /// Look a tile up and resolve its world-space shapes.
    pub fn resolve_tile_shapes(
        &self,
        tileset: &str,
        local_id: LocalId,
        transform: &InstanceTransform,
    ) -> TileResult<Vec<WorldShape>> {
        let def = self.lookup(tileset, local_id)?;
        Ok(resolve_world_shapes(def, transform))
    }

    /// Every external reference that currently fails to resolve.
    pub fn broken_references(&self) -> Vec<TileError> {
        let mut ids: Vec<&TilesetId> = self.tilesets.keys().collect();
        ids.sort();
        ids.into_iter()
            .flat_map(|id| self.tilesets[id].tiles())
            .filter(|def| def.external_animation_ref().is_some())
            .filter_map(|def| self.resolve_external_animation(def).err())
            .collect()
    }
}

/// Resolve `reference` against the directory of `base`, both `/`-separated.
fn join_reference(base: &str, reference: &str) -> String {
    let mut parts: Vec<&str> = base.split('/').collect();
    parts.pop();
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn json_counterpart(path: &str) -> Option<String> {
    path.strip_suffix(".tsx").map(|stem| format!("{stem}.json"))
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn tileset_id_for_path(root: &Path, path: &Path) -> TilesetId {
    let (root, path) = (without_cur_dir(root), without_cur_dir(path));
    let relative = path.strip_prefix(&root).ok().filter(|p| !p.as_os_str().is_empty());
    let id = match relative {
        Some(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
    };
    TilesetId::from(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAD: &str = r#"{"name":"pad-a","tilewidth":16,"tileheight":16,"tiles":[
        {"id":0,"animation":[{"tileid":0,"duration":100},{"tileid":1,"duration":100},{"tileid":2,"duration":100}]},
        {"id":1},{"id":2}]}"#;

    const PROPS: &str = r#"{"name":"props","tilewidth":16,"tileheight":16,"tiles":[
        {"id":23,"properties":[{"name":"anim","type":"file","value":"props/pad-a.tsx"}]},
        {"id":24,"properties":[{"name":"anim","type":"file","value":"props/missing.json"}]},
        {"id":25}]}"#;

    fn store() -> TilesetStore {
        let mut store = TilesetStore::new();
        store
            .load_json_str("props.json", PROPS, &HoldPolicy::default())
            .unwrap();
        store
    }

    #[test]
    fn test_join_reference() {
        assert_eq!(join_reference("props.json", "bg/sun.json"), "bg/sun.json");
        assert_eq!(join_reference("fg/cliffs.json", "../props/pad.json"), "props/pad.json");
        assert_eq!(join_reference("a/b/c.json", "./d.json"), "a/b/d.json");
    }

    #[test]
    fn test_duplicate_tileset_is_rejected() {
        let mut store = store();
        let result = store.load_json_str("props.json", PROPS, &HoldPolicy::default());
        assert!(matches!(result, Err(TileError::DuplicateTileset(id)) if id == "props.json"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_tileset() {
        let store = store();
        assert!(matches!(store.lookup("nope", 0), Err(TileError::UnknownTileset(_))));
        assert!(matches!(store.lookup("props.json", 99), Err(TileError::UnknownTileId { .. })));
    }

    #[test]
    fn test_external_reference_resolves_after_late_load() {
        let mut store = store();
        let def = store.lookup("props.json", 23).unwrap().clone();
        assert!(matches!(
            store.resolve_external_animation(&def),
            Err(TileError::BrokenAnimationReference { local_id: 23, .. })
        ));

        store
            .load_json_str("props/pad-a.json", PAD, &HoldPolicy::default())
            .unwrap();
        let track = store.resolve_external_animation(&def).unwrap();
        assert_eq!(track.tileset.as_str(), "props/pad-a.json");
        assert_eq!(store.track(&track).unwrap().len(), 3);
    }

    #[test]
    fn test_references_share_one_track() {
        let mut store = store();
        store
            .load_json_str("props/pad-a.json", PAD, &HoldPolicy::default())
            .unwrap();
        let def = store.lookup("props.json", 23).unwrap();
        let first = store.resolve_external_animation(def).unwrap();
        let second = store.resolve_external_animation(def).unwrap();
        assert_eq!(first, second);
        assert!(std::ptr::eq(store.track(&first).unwrap(), store.track(&second).unwrap()));
    }

    #[test]
    fn test_resolve_animation_variants() {
        let store = store();
        let static_tile = store.lookup("props.json", 25).unwrap();
        assert_eq!(store.resolve_animation(static_tile).unwrap(), None);
    }

    #[test]
    fn test_broken_references_listing() {
        let mut store = store();
        store
            .load_json_str("props/pad-a.json", PAD, &HoldPolicy::default())
            .unwrap();
        let broken = store.broken_references();
        assert_eq!(broken.len(), 1);
        assert!(matches!(
            &broken[0],
            TileError::BrokenAnimationReference { local_id: 24, reference, .. } if reference == "props/missing.json"
        ));
    }

    #[test]
    fn test_tileset_id_for_path() {
        let root = PathBuf::from("assets/tilesets");
        assert_eq!(
            tileset_id_for_path(&root, &root.join("actors").join("yellow.json")).as_str(),
            "actors/yellow.json"
        );
        assert_eq!(
            tileset_id_for_path(&root, Path::new("/tmp/other.json")).as_str(),
            "other.json"
        );
        assert_eq!(
            tileset_id_for_path(Path::new("./assets/tilesets"), Path::new("assets/tilesets/props.json"))
                .as_str(),
            "props.json"
        );
    }
}
