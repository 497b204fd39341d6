pub const TWEEN_POOL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    CubicIn,
    CubicOut,
    Bounce,
    Elastic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::Bounce => bounce_out(t),
            Easing::Elastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let p = 0.3;
                    -(2f32.powf(10.0 * (t - 1.0)))
                        * ((t - 1.0 - p / 4.0) * (2.0 * std::f32::consts::PI) / p).sin()
                }
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Float channels animations can drive. Targets are addressed by value
/// (channel + index), never by pointer, so storage reallocation behind
/// the pool cannot dangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenChannel {
    PlayerDisplayChips,
    EnemyHpBar,
    CardX,
    CardY,
    ScreenShake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenKey {
    pub channel: TweenChannel,
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    key: TweenKey,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

/// One interpolation step produced by `update`; the frame loop writes it
/// to whatever the key addresses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    pub key: TweenKey,
    pub value: f32,
    pub finished: bool,
}

/// Fixed-capacity scheduler; starting a tween past capacity drops it
/// with a warning rather than reallocating.
#[derive(Debug, Default)]
pub struct TweenPool {
    tweens: Vec<Tween>,
}

impl TweenPool {
    pub fn new() -> Self {
        Self {
            tweens: Vec::with_capacity(TWEEN_POOL_CAPACITY),
        }
    }

    pub fn start(&mut self, key: TweenKey, from: f32, to: f32, duration: f32, easing: Easing) {
        if self.tweens.len() >= TWEEN_POOL_CAPACITY {
            log::warn!("tween: pool full, dropping tween for {key:?}");
            return;
        }
        self.tweens.push(Tween {
            key,
            from,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
            easing,
        });
    }

    pub fn stop_for(&mut self, key: TweenKey) {
        self.tweens.retain(|t| t.key != key);
    }

    pub fn active(&self) -> usize {
        self.tweens.len()
    }

    /// Advances every tween and emits one sample each; finished tweens
    /// emit their end value and leave the pool.
    pub fn update(&mut self, dt: f32) -> Vec<TweenSample> {
        let mut samples = Vec::with_capacity(self.tweens.len());
        for tween in &mut self.tweens {
            tween.elapsed += dt;
            let t = (tween.elapsed / tween.duration).min(1.0);
            let eased = tween.easing.apply(t);
            samples.push(TweenSample {
                key: tween.key,
                value: tween.from + (tween.to - tween.from) * eased,
                finished: t >= 1.0,
            });
        }
        self.tweens.retain(|t| t.elapsed < t.duration);
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: TweenKey = TweenKey {
        channel: TweenChannel::EnemyHpBar,
        index: 0,
    };

    #[test]
    fn linear_tween_reaches_target_and_retires() {
        let mut pool = TweenPool::new();
        pool.start(KEY, 0.0, 10.0, 1.0, Easing::Linear);

        let mid = pool.update(0.5);
        assert!((mid[0].value - 5.0).abs() < 1e-4);

        let end = pool.update(0.6);
        assert!(end[0].finished);
        assert!((end[0].value - 10.0).abs() < 1e-4);
        assert_eq!(pool.active(), 0);
    }

    #[test]
    fn pool_capacity_is_enforced() {
        let mut pool = TweenPool::new();
        for i in 0..TWEEN_POOL_CAPACITY + 4 {
            pool.start(
                TweenKey {
                    channel: TweenChannel::CardX,
                    index: i,
                },
                0.0,
                1.0,
                1.0,
                Easing::Linear,
            );
        }
        assert_eq!(pool.active(), TWEEN_POOL_CAPACITY);
    }

    #[test]
    fn stop_for_cancels_only_that_target() {
        let mut pool = TweenPool::new();
        pool.start(KEY, 0.0, 1.0, 1.0, Easing::Linear);
        pool.start(
            TweenKey {
                channel: TweenChannel::CardY,
                index: 3,
            },
            0.0,
            1.0,
            1.0,
            Easing::QuadOut,
        );
        pool.stop_for(KEY);
        assert_eq!(pool.active(), 1);
    }
}
