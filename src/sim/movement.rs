//! Movement and lifecycle updates
//!
//! Player displacement, bullet travel, explosion aging and the culling that
//! goes with them.

use super::state::{Bullet, Explosion, Player};

/// Move the player by `step` per active intent, keeping the whole rectangle
/// inside `[0, screen_width]`
pub fn move_player(player: &mut Player, step: f32, screen_width: f32) {
    let mut dx = 0.0;
    if player.moving_left {
        dx -= step;
    }
    if player.moving_right {
        dx += step;
    }
    let max_x = (screen_width - player.rect.width()).max(0.0);
    player.rect.pos.x = (player.rect.pos.x + dx).clamp(0.0, max_x);
}

/// Whether a bullet has left the vertical screen bounds
#[inline]
pub fn is_off_screen(bullet: &Bullet, screen_height: f32) -> bool {
    bullet.rect.y() < 0.0 || bullet.rect.y() > screen_height
}

/// Age the first `existing` explosions one tick and drop those at or past
/// `lifetime`
///
/// Explosions after index `existing` were spawned this tick and are left at
/// frame zero. Order is preserved.
pub fn age_explosions(explosions: &mut Vec<Explosion>, existing: usize, lifetime: u32) {
    let fresh = explosions.split_off(existing.min(explosions.len()));
    explosions.retain_mut(|explosion| {
        explosion.update();
        explosion.frame_count < lifetime
    });
    explosions.extend(fresh);
}
