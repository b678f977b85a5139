//! All-pairs collision detection over a [`SpriteGroup`].
//!
//! Runs once per frame, before rendering, so it sees the geometry the
//! previous frame's modifiers left behind. Each sprite ends the pass with
//! at most one partner: the first overlapping candidate in group order.
//!
//! A pair is tested only when both sprites are alive, collidable, not yet
//! flagged this frame, and carry different identifiers.

use crate::components::sprite::Sprite;
use crate::resources::group::SpriteGroup;

fn candidate(sprite: &Sprite) -> bool {
    sprite.alive && sprite.collidable && !sprite.collided()
}

/// Overlap test on scaled bounds.
pub fn collision_check(a: &Sprite, b: &Sprite) -> bool {
    a.scaled_bounds().intersects(&b.scaled_bounds())
}

/// Flag colliding pairs. Returns the number of new pairs found.
///
/// Calling it again without changes in between finds nothing new: every
/// sprite that matched is already flagged.
pub fn detect_collisions(group: &mut SpriteGroup) -> usize {
    let sprites = group.as_mut_slice();
    let mut pairs = 0;

    for a in 0..sprites.len() {
        if !candidate(&sprites[a]) {
            continue;
        }
        for b in 0..sprites.len() {
            if a == b || !candidate(&sprites[b]) {
                continue;
            }
            if sprites[a].identifier == sprites[b].identifier {
                continue;
            }
            if !collision_check(&sprites[a], &sprites[b]) {
                continue;
            }

            let (Some(id_a), Some(id_b)) = (sprites[a].id(), sprites[b].id()) else {
                continue;
            };
            sprites[a].mark_collided(id_b);
            sprites[b].mark_collided(id_a);
            pairs += 1;
            log::trace!("collision: {:?} <-> {:?}", id_a, id_b);
            break;
        }
    }

    pairs
}
