//! The flat, ordered collection of live sprites.
//!
//! [`SpriteGroup`] owns its sprites and hands out stable [`SpriteId`]s on
//! insertion. Insertion order is iteration order, which is also the order
//! collision detection and cleanup visit sprites. References between
//! sprites (the collision offender) are ids, resolved through the group.
//!
//! # Usage
//!
//! ```ignore
//! let ship = group.add(Sprite::new().with_size(32, 32).with_collidable(true));
//! if let Some(s) = group.get_mut(ship) {
//!     s.position.x += 4.0;
//! }
//! ```

use rustc_hash::FxHashMap;

use crate::components::sprite::{Sprite, SpriteId};

#[derive(Debug, Default)]
pub struct SpriteGroup {
    sprites: Vec<Sprite>,
    index: FxHashMap<SpriteId, usize>,
    next_id: u64,
}

impl SpriteGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sprite and return its handle.
    pub fn add(&mut self, mut sprite: Sprite) -> SpriteId {
        self.next_id += 1;
        let id = SpriteId(self.next_id);
        sprite.assign_id(id);
        self.index.insert(id, self.sprites.len());
        self.sprites.push(sprite);
        id
    }

    /// Remove a sprite by handle, keeping the order of the others.
    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let at = self.index.get(&id).copied()?;
        Some(self.remove_at(at))
    }

    /// Remove the sprite at `index`. Panics if out of bounds, like
    /// [`Vec::remove`].
    pub fn remove_at(&mut self, index: usize) -> Sprite {
        let sprite = self.sprites.remove(index);
        self.reindex_from(index);
        sprite
    }

    /// Drop every sprite for which `keep` returns false, in a single
    /// compaction. Returns the handles removed, in group order.
    pub fn retain(&mut self, mut keep: impl FnMut(&Sprite) -> bool) -> Vec<SpriteId> {
        let mut removed = Vec::new();
        self.sprites.retain(|s| {
            let k = keep(s);
            if !k {
                if let Some(id) = s.id() {
                    removed.push(id);
                }
            }
            k
        });
        if !removed.is_empty() {
            self.reindex_from(0);
        }
        removed
    }

    /// Rebuild handle positions from `start` onward. Handles of sprites
    /// that left the group are dropped with the stale entries.
    fn reindex_from(&mut self, start: usize) {
        self.index.retain(|_, at| *at < start);
        for (at, sprite) in self.sprites.iter().enumerate().skip(start) {
            if let Some(id) = sprite.id() {
                self.index.insert(id, at);
            }
        }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn position_of(&self, id: SpriteId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.index.get(&id).map(|&at| &self.sprites[at])
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        let at = self.index.get(&id).copied()?;
        self.sprites.get_mut(at)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut()
    }

    /// Handles of all sprites, in group order.
    pub fn ids(&self) -> Vec<SpriteId> {
        self.sprites.iter().filter_map(Sprite::id).collect()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub(crate) fn freeze_clocks(&mut self) {
        self.sprites.iter_mut().for_each(Sprite::freeze_clocks);
    }

    pub(crate) fn thaw_clocks(&mut self) {
        self.sprites.iter_mut().for_each(Sprite::thaw_clocks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Sprite {
        Sprite::new().with_name(name)
    }

    #[test]
    fn test_add_assigns_unique_ids_in_order() {
        let mut group = SpriteGroup::new();
        let a = group.add(named("a"));
        let b = group.add(named("b"));
        assert_ne!(a, b);
        assert_eq!(group.len(), 2);
        assert_eq!(group.ids(), vec![a, b]);
        assert_eq!(group.get(a).map(|s| s.name.as_str()), Some("a"));
        assert_eq!(group.get(b).and_then(Sprite::id), Some(b));
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut group = SpriteGroup::new();
        let a = group.add(named("a"));
        let b = group.add(named("b"));
        let c = group.add(named("c"));

        let removed = group.remove(b).expect("b present");
        assert_eq!(removed.name, "b");
        assert!(!group.contains(b));
        assert_eq!(group.position_of(a), Some(0));
        assert_eq!(group.position_of(c), Some(1));
        assert_eq!(group.get(c).map(|s| s.name.as_str()), Some("c"));
        assert!(group.remove(b).is_none());
    }

    #[test]
    fn test_remove_at() {
        let mut group = SpriteGroup::new();
        let a = group.add(named("a"));
        let b = group.add(named("b"));
        let removed = group.remove_at(0);
        assert_eq!(removed.id(), Some(a));
        assert_eq!(group.position_of(b), Some(0));
    }

    #[test]
    fn test_retain_compacts_and_reports() {
        let mut group = SpriteGroup::new();
        let a = group.add(named("a"));
        let b = group.add(named("b"));
        let c = group.add(named("c"));
        let d = group.add(named("d"));
        if let Some(s) = group.get_mut(b) {
            s.alive = false;
        }
        if let Some(s) = group.get_mut(d) {
            s.alive = false;
        }

        let removed = group.retain(|s| s.alive);
        assert_eq!(removed, vec![b, d]);
        assert_eq!(group.ids(), vec![a, c]);
        assert_eq!(group.position_of(c), Some(1));
        assert!(group.get(d).is_none());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut group = SpriteGroup::new();
        let a = group.add(named("a"));
        group.remove(a);
        let b = group.add(named("b"));
        assert_ne!(a, b);
        assert!(group.get(a).is_none());
    }

    #[test]
    fn test_clear() {
        let mut group = SpriteGroup::new();
        let a = group.add(named("a"));
        group.clear();
        assert!(group.is_empty());
        assert!(!group.contains(a));
    }
}
