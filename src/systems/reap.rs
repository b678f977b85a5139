//! Post-render cleanup: drop dead sprites, deliver collision notifications.
//!
//! Runs in two steps so no sprite is removed while another is being
//! visited:
//!
//! 1. Every sprite with `alive == false` leaves the group in one compaction.
//! 2. Each surviving sprite, in group order, that is still alive,
//!    collidable, flagged collided and still holds an offender is passed to
//!    `notify`. Its offender is then cleared. Finally the collided flag is
//!    cleared on every sprite, notified or not.
//!
//! A sprite killed by an earlier notification in the same pass is not
//! notified, even though it entered the pass collided. Every sprite killed
//! during step 2 leaves the group at the end of the pass.
//!
//! The offender handle may no longer resolve if that sprite was reaped in
//! step 1; the callback decides what that means for the game.

use crate::components::sprite::SpriteId;
use crate::resources::group::SpriteGroup;

/// What one cleanup pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapSummary {
    pub removed: Vec<SpriteId>,
    pub notified: Vec<SpriteId>,
}

/// Reap dead sprites and notify collided ones.
///
/// `notify` receives the group and the handle of the sprite being notified;
/// it may mutate the group freely. A sprite it adds during the pass is not
/// visited until the next frame. The first error stops the pass and is
/// returned.
pub fn reap_and_notify<E>(
    group: &mut SpriteGroup,
    mut notify: impl FnMut(&mut SpriteGroup, SpriteId) -> Result<(), E>,
) -> Result<ReapSummary, E> {
    let mut summary = ReapSummary {
        removed: group.retain(|s| s.alive),
        notified: Vec::new(),
    };

    for id in group.ids() {
        let pending = match group.get(id) {
            Some(s) => s.alive && s.collidable && s.collided() && s.offender().is_some(),
            None => continue,
        };

        if pending {
            notify(group, id)?;
            summary.notified.push(id);
        }

        if let Some(s) = group.get_mut(id) {
            s.take_offender();
            s.clear_collided();
        }
    }

    summary.removed.extend(group.retain(|s| s.alive));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::Sprite;
    use crate::systems::collision::detect_collisions;

    fn block(x: f32, identifier: i32) -> Sprite {
        Sprite::new()
            .with_position(x, 0.0)
            .with_size(10, 10)
            .with_collidable(true)
            .with_identifier(identifier)
    }

    #[test]
    fn test_dead_sprites_are_removed() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        let b = group.add(block(50.0, 2));
        group.get_mut(a).unwrap().alive = false;

        let summary = reap_and_notify::<()>(&mut group, |_, _| Ok(())).unwrap();
        assert_eq!(summary.removed, vec![a]);
        assert_eq!(group.ids(), vec![b]);
    }

    #[test]
    fn test_collided_sprites_notified_once_and_reset() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        let b = group.add(block(5.0, 2));
        detect_collisions(&mut group);

        let mut seen = Vec::new();
        let summary = reap_and_notify::<()>(&mut group, |g, id| {
            let offender = g.get(id).and_then(|s| s.offender());
            seen.push((id, offender));
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![(a, Some(b)), (b, Some(a))]);
        assert_eq!(summary.notified, vec![a, b]);
        for s in group.iter() {
            assert!(!s.collided());
            assert!(s.offender().is_none());
        }

        // nothing left to notify
        let again = reap_and_notify::<()>(&mut group, |_, _| Ok(())).unwrap();
        assert!(again.notified.is_empty());
    }

    #[test]
    fn test_dead_collided_sprite_is_removed_not_notified() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        let b = group.add(block(5.0, 2));
        detect_collisions(&mut group);
        group.get_mut(a).unwrap().alive = false;

        let mut notified = Vec::new();
        reap_and_notify::<()>(&mut group, |g, id| {
            // offender was reaped in the same pass
            let offender = g.get(id).and_then(|s| s.offender()).unwrap();
            assert!(g.get(offender).is_none());
            notified.push(id);
            Ok(())
        })
        .unwrap();

        assert_eq!(notified, vec![b]);
        assert!(!group.contains(a));
    }

    #[test]
    fn test_collided_flag_without_offender_is_cleared_silently() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        let b = group.add(block(5.0, 2));
        detect_collisions(&mut group);
        group.get_mut(a).unwrap().take_offender();

        let mut notified = Vec::new();
        reap_and_notify::<()>(&mut group, |_, id| {
            notified.push(id);
            Ok(())
        })
        .unwrap();

        assert_eq!(notified, vec![b]);
        assert!(!group.get(a).unwrap().collided());
    }

    #[test]
    fn test_non_collidable_sprite_not_notified_but_cleared() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        group.add(block(5.0, 2));
        detect_collisions(&mut group);
        group.get_mut(a).unwrap().collidable = false;

        let mut notified = Vec::new();
        reap_and_notify::<()>(&mut group, |_, id| {
            notified.push(id);
            Ok(())
        })
        .unwrap();

        assert!(!notified.contains(&a));
        let sa = group.get(a).unwrap();
        assert!(!sa.collided());
        assert!(sa.offender().is_none());
    }

    #[test]
    fn test_notify_may_kill_and_spawn() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        group.add(block(5.0, 2));
        detect_collisions(&mut group);

        let mut spawned = Vec::new();
        reap_and_notify::<()>(&mut group, |g, id| {
            if let Some(s) = g.get_mut(id) {
                s.alive = false;
            }
            spawned.push(g.add(Sprite::new().with_name("debris")));
            Ok(())
        })
        .unwrap();

        // each sprite killed itself after being notified
        assert!(!group.contains(a));
        assert_eq!(group.ids(), spawned);
    }

    #[test]
    fn test_sprite_killed_by_earlier_notification_is_reaped_unnotified() {
        let mut group = SpriteGroup::new();
        let a = group.add(block(0.0, 1));
        let b = group.add(block(5.0, 2));
        detect_collisions(&mut group);

        let mut notified = Vec::new();
        let summary = reap_and_notify::<()>(&mut group, |g, id| {
            notified.push(id);
            if let Some(other) = g.get(id).and_then(|s| s.offender()) {
                if let Some(s) = g.get_mut(other) {
                    s.alive = false;
                }
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(notified, vec![a]);
        assert_eq!(summary.notified, vec![a]);
        assert_eq!(summary.removed, vec![b]);
        assert_eq!(group.ids(), vec![a]);
    }

    #[test]
    fn test_notify_error_stops_the_pass() {
        let mut group = SpriteGroup::new();
        group.add(block(0.0, 1));
        group.add(block(5.0, 2));
        detect_collisions(&mut group);

        let mut calls = 0;
        let result = reap_and_notify(&mut group, |_, _| {
            calls += 1;
            Err("boom")
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 1);
    }
}
