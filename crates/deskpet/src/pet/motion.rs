use super::geometry::{Geometry, Size};
use super::round_point;
use crate::config::MotionConfig;
use petctl::command::Mode;
use petctl::wm::Point;
use rand::Rng;

/// Pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Free-fly session: bounces around the work area captured when the session started.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyState {
    pub velocity: Velocity,
    bounds: Size,
}

impl FlyState {
    pub fn new(velocity: Velocity, bounds: Size) -> Self {
        Self { velocity, bounds }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn step<R: Rng + ?Sized>(&mut self, position: Point, size: Size, rng: &mut R) -> Point {
        let mut next = position.offset(self.velocity.x, self.velocity.y);

        if let Some(x) = reflect(&mut self.velocity.x, next.x, size.width, self.bounds.width) {
            next.x = x;
            self.velocity.y = keep_moving(self.velocity.y, rng);
        }
        if let Some(y) = reflect(&mut self.velocity.y, next.y, size.height, self.bounds.height) {
            next.y = y;
            self.velocity.x = keep_moving(self.velocity.x, rng);
        }

        next
    }
}

/// Flips `speed` and returns the clamped coordinate when `next` touches either edge.
fn reflect(speed: &mut f64, next: f64, extent: f64, limit: f64) -> Option<f64> {
    if next <= 0.0 {
        *speed = -*speed;
        Some(0.0)
    } else if next + extent >= limit {
        *speed = -*speed;
        Some(limit - extent)
    } else {
        None
    }
}

/// A near-zero cross-axis speed would pin the pet to a single line, so it gets a random
/// magnitude in [1, 2) with a random sign.
fn keep_moving<R: Rng + ?Sized>(speed: f64, rng: &mut R) -> f64 {
    if speed.abs() >= 1.0 {
        return speed;
    }
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    sign * rng.gen_range(1.0..2.0)
}

/// Follow-cursor session: glide towards the cursor, then circle it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowState {
    pub angle: f64,
}

impl FollowState {
    pub fn step(
        &mut self,
        position: Point,
        size: Size,
        cursor: Point,
        config: &MotionConfig,
    ) -> Point {
        let half = size.half();
        let target = cursor.offset(-half.x, -half.y);
        let (dx, dy) = (target.x - position.x, target.y - position.y);

        if dx.hypot(dy) > config.follow_threshold {
            position.offset(dx * config.follow_factor, dy * config.follow_factor)
        } else {
            self.angle += config.orbit_step;
            target.offset(
                config.orbit_radius * self.angle.cos(),
                config.orbit_radius * self.angle.sin(),
            )
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Motion {
    #[default]
    Static,
    FreeFly(FlyState),
    FollowCursor(FollowState),
}

impl Motion {
    /// Fresh per-mode state. Nothing carries over from a previous session.
    pub fn start(mode: Mode, work_area: Size, config: &MotionConfig) -> Self {
        match mode {
            Mode::Static => Self::Static,
            Mode::FreeFly => Self::FreeFly(FlyState::new(
                Velocity::new(config.fly_speed_x, config.fly_speed_y),
                work_area,
            )),
            Mode::FollowCursor => Self::FollowCursor(FollowState::default()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Static => Mode::Static,
            Self::FreeFly(_) => Mode::FreeFly,
            Self::FollowCursor(_) => Mode::FollowCursor,
        }
    }

    pub fn is_moving(&self) -> bool {
        !matches!(self, Self::Static)
    }

    /// Computes the next window position, already rounded to whole pixels. `None` means
    /// the window stays put this tick.
    pub fn advance<G, R>(
        &mut self,
        geometry: &G,
        config: &MotionConfig,
        rng: &mut R,
    ) -> Option<Point>
    where
        G: Geometry + ?Sized,
        R: Rng + ?Sized,
    {
        let next = match self {
            Self::Static => return None,
            Self::FreeFly(fly) => fly.step(geometry.position(), geometry.size(), rng),
            Self::FollowCursor(follow) => {
                let cursor = geometry.cursor()?;
                follow.step(geometry.position(), geometry.size(), cursor, config)
            }
        };
        Some(round_point(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::testing::FakeScreen;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::TAU;

    const SCREEN: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };
    const PET: Size = Size {
        width: 280.0,
        height: 380.0,
    };

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_fly_moves_by_velocity() {
        let mut fly = FlyState::new(Velocity::new(3.0, 2.0), SCREEN);

        let next = fly.step(Point::new(100.0, 100.0), PET, &mut rng());

        assert_eq!(next, Point::new(103.0, 102.0));
        assert_eq!(fly.velocity, Velocity::new(3.0, 2.0));
    }

    #[test]
    fn test_fly_bounces_off_left_edge() {
        let mut fly = FlyState::new(Velocity::new(-3.0, 2.0), SCREEN);

        let next = fly.step(Point::new(0.0, 500.0), PET, &mut rng());

        assert_eq!(next, Point::new(0.0, 502.0));
        assert_eq!(fly.velocity, Velocity::new(3.0, 2.0));
    }

    #[test]
    fn test_fly_bounces_off_right_edge() {
        let mut fly = FlyState::new(Velocity::new(3.0, 2.0), SCREEN);

        let next = fly.step(Point::new(1638.0, 500.0), PET, &mut rng());

        assert_eq!(next.x, 1920.0 - 280.0);
        assert_eq!(fly.velocity.x, -3.0);
    }

    #[test]
    fn test_fly_corner_bounces_both_axes() {
        let mut fly = FlyState::new(Velocity::new(-3.0, -2.0), SCREEN);

        let next = fly.step(Point::new(1.0, 1.0), PET, &mut rng());

        assert_eq!(next, Point::new(0.0, 0.0));
        assert_eq!(fly.velocity, Velocity::new(3.0, 2.0));
    }

    #[test]
    fn test_horizontal_bounce_revives_flat_vertical_speed() {
        for seed in 0..50 {
            let mut fly = FlyState::new(Velocity::new(-3.0, 0.0), SCREEN);
            fly.step(Point::new(0.0, 500.0), PET, &mut StdRng::seed_from_u64(seed));

            let vy = fly.velocity.y.abs();
            assert!((1.0..2.0).contains(&vy), "seed {seed}: vy = {vy}");
        }
    }

    #[test]
    fn test_vertical_bounce_revives_flat_horizontal_speed() {
        let mut fly = FlyState::new(Velocity::new(0.5, 4.0), SCREEN);

        let next = fly.step(Point::new(800.0, 698.0), PET, &mut rng());

        assert_eq!(next.y, 1080.0 - 380.0);
        assert_eq!(fly.velocity.y, -4.0);
        assert!((1.0..2.0).contains(&fly.velocity.x.abs()));
    }

    #[test]
    fn test_fast_cross_axis_speed_is_left_alone() {
        let mut fly = FlyState::new(Velocity::new(-3.0, -1.5), SCREEN);

        fly.step(Point::new(0.0, 500.0), PET, &mut rng());

        assert_eq!(fly.velocity.y, -1.5);
    }

    #[test]
    fn test_fly_never_leaves_work_area() {
        let mut rng = rng();
        let mut fly = FlyState::new(Velocity::new(3.0, 0.2), SCREEN);
        let mut position = Point::new(1620.0, 620.0);

        for _ in 0..20_000 {
            position = round_point(fly.step(position, PET, &mut rng));
            assert!((0.0..=SCREEN.width - PET.width).contains(&position.x));
            assert!((0.0..=SCREEN.height - PET.height).contains(&position.y));
        }
    }

    #[test]
    fn test_follow_glides_two_percent_towards_target() {
        let config = MotionConfig::default();
        let mut follow = FollowState::default();
        let cursor = Point::new(500.0, 500.0);
        // target top-left is (360, 310), so this sits 200px to its left
        let position = Point::new(160.0, 310.0);

        let next = follow.step(position, PET, cursor, &config);

        assert_eq!(next, Point::new(164.0, 310.0));
        assert_eq!(follow.angle, 0.0);
    }

    #[test]
    fn test_follow_never_overshoots() {
        let config = MotionConfig::default();
        let mut follow = FollowState::default();
        let cursor = Point::new(1500.0, 900.0);
        let target = Point::new(1360.0, 710.0);
        let mut position = Point::new(0.0, 0.0);
        let distance = |p: Point| (target.x - p.x).hypot(target.y - p.y);

        while distance(position) > config.follow_threshold {
            let before = distance(position);
            position = follow.step(position, PET, cursor, &config);
            assert!(position.x <= target.x && position.y <= target.y);
            assert!(distance(position) < before);
        }
        assert_eq!(follow.angle, 0.0);
    }

    #[test]
    fn test_follow_orbits_when_close() {
        let config = MotionConfig::default();
        let mut follow = FollowState::default();
        let cursor = Point::new(500.0, 500.0);
        let mut position = Point::new(360.0, 310.0);

        for _ in 0..10 {
            position = follow.step(position, PET, cursor, &config);
            let center = position.offset(PET.width / 2.0, PET.height / 2.0);
            let radius = (center.x - cursor.x).hypot(center.y - cursor.y);
            assert!((radius - 60.0).abs() < 1e-9);
        }
        assert!((follow.angle - 0.26).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_wraps_after_242_ticks() {
        let config = MotionConfig::default();
        let mut follow = FollowState::default();
        let cursor = Point::new(500.0, 500.0);
        let mut position = Point::new(360.0, 310.0);

        for _ in 0..241 {
            position = follow.step(position, PET, cursor, &config);
        }
        assert!(follow.angle < TAU);

        follow.step(position, PET, cursor, &config);
        assert!(follow.angle >= TAU);
    }

    #[test]
    fn test_start_builds_fresh_state() {
        let config = MotionConfig::default();

        assert_eq!(Motion::start(Mode::Static, SCREEN, &config), Motion::Static);
        assert_eq!(
            Motion::start(Mode::FreeFly, SCREEN, &config),
            Motion::FreeFly(FlyState::new(Velocity::new(3.0, 2.0), SCREEN))
        );
        assert_eq!(
            Motion::start(Mode::FollowCursor, SCREEN, &config),
            Motion::FollowCursor(FollowState { angle: 0.0 })
        );
    }

    #[test]
    fn test_advance_rounds_and_dispatches() {
        let config = MotionConfig::default();
        let screen = FakeScreen::new(SCREEN);
        screen.with(|s| {
            s.position = Point::new(160.0, 310.0);
            s.size = PET;
            s.cursor = Some(Point::new(500.0, 501.0));
        });

        assert_eq!(Motion::Static.advance(&screen, &config, &mut rng()), None);

        let mut follow = Motion::start(Mode::FollowCursor, SCREEN, &config);
        // dy = 1 so the unrounded y lands on 310.02
        assert_eq!(
            follow.advance(&screen, &config, &mut rng()),
            Some(Point::new(164.0, 310.0))
        );

        screen.with(|s| s.cursor = None);
        assert_eq!(follow.advance(&screen, &config, &mut rng()), None);
    }
}
