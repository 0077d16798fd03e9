//! Movement and fire strategies
//!
//! Speeds are in pixels per second and always scaled by the fixed timestep.
//! Timers are stored as "time of last action" in simulated milliseconds and
//! compared against the current tick; nothing ever blocks.

use glam::Vec2;

use super::catalog;
use super::clock::SimTime;
use super::entity::{Spawned, TickContext};
use super::groups::GroupId;

/// Vertical travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Vertical::Up => -1.0,
            Vertical::Down => 1.0,
        }
    }

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Vertical::Up => Vertical::Down,
            Vertical::Down => Vertical::Up,
        }
    }
}

/// Boss progress: fly in, then hold position and patrol vertically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPhase {
    Entering,
    Patrolling,
}

#[derive(Debug, Clone)]
pub enum Movement {
    Still,
    /// Constant velocity
    Straight { vel: Vec2 },
    /// Horizontal drift with a sine-driven vertical offset.
    /// `amplitude` is applied per tick, `frequency` is radians per second.
    SineWave {
        vx: f32,
        angle: f32,
        amplitude: f32,
        frequency: f32,
    },
    /// Bounce between the top and bottom of the playfield
    VerticalPatrol { speed: f32, direction: Vertical },
    /// Fly left until level with the player, then turn toward them once
    Homing {
        speed: f32,
        vertical_speed: f32,
        turn: Option<Vertical>,
    },
    /// Drift left, periodically shifting up or down by `max_shift` pixels
    ShiftPatrol {
        speed: f32,
        vertical_speed: f32,
        max_shift: f32,
        interval_ms: f64,
        last_shift_ms: f64,
        anchor_y: f32,
        direction: Vertical,
    },
    /// Enter from the right to `hold_x`, then patrol vertically
    Boss {
        hold_x: f32,
        speed: f32,
        vertical_speed: f32,
        direction: Vertical,
        phase: BossPhase,
    },
}

impl Movement {
    /// Shift patrol picks its first direction from where it starts
    pub fn shift_patrol(speed: f32, vertical_speed: f32, interval_ms: f64, start_y: f32) -> Self {
        Movement::ShiftPatrol {
            speed,
            vertical_speed,
            max_shift: 48.0,
            interval_ms,
            last_shift_ms: 0.0,
            anchor_y: start_y,
            direction: if start_y < 120.0 { Vertical::Down } else { Vertical::Up },
        }
    }

    /// Reset timers when the entity becomes active
    pub fn on_spawn(&mut self, pos: Vec2, now: SimTime) {
        if let Movement::ShiftPatrol {
            last_shift_ms,
            anchor_y,
            ..
        } = self
        {
            // Avoid shifting immediately after appearing
            *last_shift_ms = now.millis();
            *anchor_y = pos.y;
        }
    }

    pub fn step(&mut self, pos: &mut Vec2, size: Vec2, ctx: &TickContext) {
        let dt = ctx.dt;
        let field = &ctx.playfield;
        match self {
            Movement::Still => {}
            Movement::Straight { vel } => *pos += *vel * dt,
            Movement::SineWave {
                vx,
                angle,
                amplitude,
                frequency,
            } => {
                pos.x += *vx * dt;
                pos.y += angle.sin() * *amplitude;
                *angle += *frequency * dt;
            }
            Movement::VerticalPatrol { speed, direction } => {
                patrol(pos, size, *speed * dt, direction, field.top(), field.bottom());
            }
            Movement::Homing {
                speed,
                vertical_speed,
                turn,
            } => {
                match turn {
                    None => pos.x -= *speed * dt,
                    Some(dir) => pos.y += dir.sign() * *vertical_speed * dt,
                }
                if turn.is_none() {
                    if let Some(player) = ctx.player {
                        if pos.x < player.center().x {
                            *turn = Some(if pos.y < player.y {
                                Vertical::Down
                            } else {
                                Vertical::Up
                            });
                        }
                    }
                }
            }
            Movement::ShiftPatrol {
                speed,
                vertical_speed,
                max_shift,
                interval_ms,
                last_shift_ms,
                anchor_y,
                direction,
            } => {
                pos.x -= *speed * dt;
                let now_ms = ctx.now.millis();
                if now_ms - *last_shift_ms > *interval_ms {
                    pos.y += direction.sign() * *vertical_speed * dt;
                    if (pos.y - *anchor_y).abs() > *max_shift {
                        *anchor_y = pos.y;
                        *direction = direction.flip();
                        *last_shift_ms = now_ms;
                    }
                }
            }
            Movement::Boss {
                hold_x,
                speed,
                vertical_speed,
                direction,
                phase,
            } => match phase {
                BossPhase::Entering => {
                    pos.x -= *speed * dt;
                    if pos.x <= *hold_x {
                        pos.x = *hold_x;
                        *phase = BossPhase::Patrolling;
                    }
                }
                BossPhase::Patrolling => {
                    patrol(pos, size, *vertical_speed * dt, direction, field.top(), field.bottom());
                }
            },
        }
    }
}

fn patrol(pos: &mut Vec2, size: Vec2, step: f32, direction: &mut Vertical, top: f32, bottom: f32) {
    match direction {
        Vertical::Up => {
            pos.y -= step;
            if pos.y <= top {
                pos.y = top;
                *direction = Vertical::Down;
            }
        }
        Vertical::Down => {
            pos.y += step;
            if pos.y + size.y >= bottom {
                pos.y = bottom - size.y;
                *direction = Vertical::Up;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Fire {
    None,
    /// Bursts of `per_volley` straight shots while inside `[stop_x, start_x]`
    Volley {
        shot_ms: f64,
        volley_ms: f64,
        per_volley: u8,
        start_x: f32,
        stop_x: f32,
        last_shot_ms: f64,
        last_volley_ms: f64,
        shooting: bool,
        shots: u8,
    },
    /// A straight shot every `shot_ms` while right of `stop_x`
    Interval {
        shot_ms: f64,
        stop_x: f32,
        muzzle: Vec2,
        last_shot_ms: f64,
    },
    /// A shot aimed at the player every `shot_ms` while right of `stop_x`
    Aimed {
        shot_ms: f64,
        speed: f32,
        stop_x: f32,
        last_shot_ms: f64,
    },
    /// Boss pattern: aimed shots plus a periodic three-way fan
    BossPattern {
        aimed_ms: f64,
        fan_ms: f64,
        speed: f32,
        last_aimed_ms: f64,
        last_fan_ms: f64,
    },
}

impl Fire {
    pub fn volley(start_x: f32, stop_x: f32) -> Self {
        Fire::Volley {
            shot_ms: 185.0,
            volley_ms: 2000.0,
            per_volley: 3,
            start_x,
            stop_x,
            last_shot_ms: 0.0,
            last_volley_ms: 0.0,
            shooting: false,
            shots: 0,
        }
    }

    pub fn interval(shot_ms: f64, muzzle: Vec2) -> Self {
        Fire::Interval {
            shot_ms,
            stop_x: 64.0,
            muzzle,
            last_shot_ms: 0.0,
        }
    }

    pub fn aimed(shot_ms: f64, speed: f32) -> Self {
        Fire::Aimed {
            shot_ms,
            speed,
            stop_x: 64.0,
            last_shot_ms: 0.0,
        }
    }

    /// Fire if timers allow; new shots are pushed to `out`
    pub fn poll(&mut self, pos: Vec2, size: Vec2, ctx: &TickContext, out: &mut Vec<Spawned>) {
        let now_ms = ctx.now.millis();
        let mouth = Vec2::new(pos.x, pos.y + size.y / 2.0);
        match self {
            Fire::None => {}
            Fire::Volley {
                shot_ms,
                volley_ms,
                per_volley,
                start_x,
                stop_x,
                last_shot_ms,
                last_volley_ms,
                shooting,
                shots,
            } => {
                if now_ms - *last_volley_ms > *volley_ms && pos.x < *start_x && pos.x > *stop_x {
                    *shooting = true;
                }
                if *shooting {
                    if now_ms - *last_shot_ms > *shot_ms {
                        out.push(hostile(catalog::enemy_bullet(mouth)));
                        *shots += 1;
                        *last_shot_ms = now_ms;
                    }
                    if *shots >= *per_volley {
                        *last_volley_ms = now_ms;
                        *shooting = false;
                        *shots = 0;
                    }
                }
            }
            Fire::Interval {
                shot_ms,
                stop_x,
                muzzle,
                last_shot_ms,
            } => {
                if pos.x > *stop_x && now_ms - *last_shot_ms > *shot_ms {
                    out.push(hostile(catalog::enemy_bullet(mouth + *muzzle)));
                    *last_shot_ms = now_ms;
                }
            }
            Fire::Aimed {
                shot_ms,
                speed,
                stop_x,
                last_shot_ms,
            } => {
                if let Some(target) = ctx.player {
                    if pos.x > *stop_x && now_ms - *last_shot_ms > *shot_ms {
                        let center = pos + size / 2.0;
                        let dir = (target.center() - center).normalize_or(Vec2::NEG_X);
                        out.push(hostile(catalog::aimed_bullet(mouth, dir * *speed)));
                        *last_shot_ms = now_ms;
                    }
                }
            }
            Fire::BossPattern {
                aimed_ms,
                fan_ms,
                speed,
                last_aimed_ms,
                last_fan_ms,
            } => {
                let center = pos + size / 2.0;
                if let Some(target) = ctx.player {
                    if now_ms - *last_aimed_ms > *aimed_ms {
                        let dir = (target.center() - center).normalize_or(Vec2::NEG_X);
                        out.push(hostile(catalog::aimed_bullet(center, dir * *speed)));
                        *last_aimed_ms = now_ms;
                    }
                }
                if now_ms - *last_fan_ms > *fan_ms {
                    for degrees in [165.0_f32, 180.0, 195.0] {
                        let dir = crate::heading(degrees);
                        out.push(hostile(catalog::aimed_bullet(center, dir * *speed)));
                    }
                    *last_fan_ms = now_ms;
                }
            }
        }
    }
}

#[inline]
fn hostile(entity: super::entity::Entity) -> Spawned {
    Spawned::new(GroupId::EnemyShots, entity)
}
