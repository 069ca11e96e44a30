//! Chain reactions between crystals
//!
//! Two crystals are adjacent when their centers are at most `radius` apart
//! (Euclidean). When a crystal shatters, every adjacent idle crystal is put
//! on a deferred schedule and breaks `delay` seconds later, which in turn
//! schedules its own neighbours. The cascade therefore spreads one ring per
//! delay and stops on its own: a crystal that is already breaking can never
//! be scheduled again.
//!
//! Triggers carry [`CrystalId`]s rather than references. When a trigger comes
//! due the target is looked up again and re-checked, so a crystal that was
//! broken directly or removed in the meantime is skipped.

use lumen_engine::events::EventQueue;
use rand::Rng;

use crate::components::ExperiencePickup;
use crate::config::{ChainConfig, CrystalConfig};
use crate::crystal::{CrystalId, MemoryCrystal};
use crate::effects::Feedback;

/// Scheduled break of one crystal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTrigger {
    /// Crystal to break when the trigger comes due
    pub target: CrystalId,
}

/// Adjacency rule and deferred break schedule
#[derive(Debug, Clone)]
pub struct ChainReactionManager {
    radius: f32,
    delay: f32,
    queue: EventQueue<ChainTrigger>,
    triggers_fired: u32,
}

impl ChainReactionManager {
    /// Empty schedule using the configured radius and delay
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            radius: config.radius,
            delay: config.delay,
            queue: EventQueue::new(),
            triggers_fired: 0,
        }
    }

    /// Configured propagation delay
    pub const fn delay(&self) -> f32 {
        self.delay
    }

    /// Triggers waiting to fire
    pub fn pending(&self) -> usize {
        self.queue.pending_count()
    }

    /// Triggers that have fired this session, including skipped ones
    pub const fn triggers_fired(&self) -> u32 {
        self.triggers_fired
    }

    /// Whether `source` breaking should schedule `target`
    pub fn can_trigger(&self, source: &MemoryCrystal, target: &MemoryCrystal) -> bool {
        if source.id == target.id || !target.can_break() {
            return false;
        }
        (target.center() - source.center()).norm() <= self.radius
    }

    /// Schedule `target` to break after `delay` seconds.
    ///
    /// Returns `false` without scheduling if the target is already breaking
    /// or inactive.
    pub fn trigger(&mut self, target: &mut MemoryCrystal, delay: f32) -> bool {
        if !target.can_break() {
            return false;
        }
        target.mark_chain_triggered();
        self.queue.post(delay, ChainTrigger { target: target.id });
        log::trace!("Chain trigger for {:?} in {delay}s", target.id);
        true
    }

    /// Schedule every crystal adjacent to `crystals[source]`.
    ///
    /// Returns how many were scheduled.
    pub fn propagate(&mut self, crystals: &mut [MemoryCrystal], source: usize) -> usize {
        let Some(origin) = crystals.get(source) else {
            return 0;
        };
        let neighbours: Vec<usize> = crystals
            .iter()
            .enumerate()
            .filter(|(_, target)| self.can_trigger(origin, target))
            .map(|(index, _)| index)
            .collect();

        let delay = self.delay;
        neighbours
            .into_iter()
            .filter(|&index| self.trigger(&mut crystals[index], delay))
            .count()
    }

    /// Break `crystals[index]` and spread the reaction to its neighbours.
    ///
    /// Returns the crystal's drops; empty if it was not breakable.
    pub fn shatter(
        &mut self,
        crystals: &mut [MemoryCrystal],
        index: usize,
        config: &CrystalConfig,
        feedback: &mut Feedback,
        rng: &mut impl Rng,
    ) -> Vec<ExperiencePickup> {
        let Some(crystal) = crystals.get_mut(index) else {
            return Vec::new();
        };
        let drops = crystal.break_crystal(config, feedback, rng);
        if !drops.is_empty() {
            self.propagate(crystals, index);
        }
        drops
    }

    /// Advance the schedule and break every crystal whose trigger came due.
    ///
    /// Returns the drops of the crystals that broke.
    pub fn update(
        &mut self,
        delta_time: f32,
        crystals: &mut [MemoryCrystal],
        config: &CrystalConfig,
        feedback: &mut Feedback,
        rng: &mut impl Rng,
    ) -> Vec<ExperiencePickup> {
        self.queue.advance(delta_time);

        let mut drops = Vec::new();
        for ChainTrigger { target } in self.queue.drain_due() {
            self.triggers_fired += 1;
            let Some(index) = crystals.iter().position(|crystal| crystal.id == target) else {
                log::trace!("Chain target {target:?} is gone");
                continue;
            };
            if !crystals[index].can_break() {
                continue;
            }
            drops.extend(self.shatter(crystals, index, config, feedback, rng));
        }
        drops
    }

    /// Drop every pending trigger (level change)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::crystal::{CrystalKind, CrystalState};
    use lumen_engine::foundation::math::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn crystal(id: u32, x: f32) -> MemoryCrystal {
        MemoryCrystal::new(CrystalId(id), CrystalKind::Azure, Vec2::new(x, 100.0))
    }

    /// A at 0, B at 80, C at 160: A–B and B–C adjacent, A–C not
    fn row() -> Vec<MemoryCrystal> {
        vec![crystal(0, 0.0), crystal(1, 80.0), crystal(2, 160.0)]
    }

    fn setup() -> (ChainReactionManager, GameConfig, Feedback, StdRng) {
        let config = GameConfig::default();
        let feedback = Feedback::new(&config);
        (ChainReactionManager::new(&config.chain), config, feedback, StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_adjacency_by_radius() {
        let (chain, ..) = setup();
        let crystals = row();
        assert!(chain.can_trigger(&crystals[0], &crystals[1]));
        assert!(chain.can_trigger(&crystals[1], &crystals[2]));
        assert!(!chain.can_trigger(&crystals[0], &crystals[2]));
        assert!(!chain.can_trigger(&crystals[0], &crystals[0]));
    }

    #[test]
    fn test_breaking_target_cannot_be_triggered() {
        let (mut chain, config, mut feedback, mut rng) = setup();
        let mut crystals = row();
        crystals[1].break_crystal(&config.crystal, &mut feedback, &mut rng);
        assert!(!chain.can_trigger(&crystals[0], &crystals[1]));
        assert!(!chain.trigger(&mut crystals[1], 0.1));
        assert_eq!(chain.pending(), 0);
    }

    #[test]
    fn test_cascade_spreads_one_ring_per_delay() {
        let (mut chain, config, mut feedback, mut rng) = setup();
        let mut crystals = row();

        let drops = chain.shatter(&mut crystals, 0, &config.crystal, &mut feedback, &mut rng);
        assert_eq!(drops.len(), 1);
        // Only B is scheduled; C waits for B
        assert_eq!(chain.pending(), 1);
        assert!(crystals[1].is_triggered_by_chain());
        assert!(!crystals[2].is_triggered_by_chain());

        let early = chain.update(0.1, &mut crystals, &config.crystal, &mut feedback, &mut rng);
        assert!(early.is_empty());
        assert_eq!(crystals[1].state(), CrystalState::Idle);

        let drops = chain.update(0.1, &mut crystals, &config.crystal, &mut feedback, &mut rng);
        assert_eq!(drops.len(), 1);
        assert!(crystals[1].is_breaking());
        assert!(crystals[2].is_triggered_by_chain());
        assert_eq!(chain.pending(), 1);

        let drops = chain.update(0.15, &mut crystals, &config.crystal, &mut feedback, &mut rng);
        assert_eq!(drops.len(), 1);
        assert!(crystals[2].is_breaking());
        assert_eq!(chain.pending(), 0);
    }

    #[test]
    fn test_duplicate_triggers_break_once() {
        let (mut chain, config, mut feedback, mut rng) = setup();
        let mut crystals = row();
        assert!(chain.trigger(&mut crystals[1], 0.0));
        assert!(chain.trigger(&mut crystals[1], 0.0));

        let drops = chain.update(0.0, &mut crystals, &config.crystal, &mut feedback, &mut rng);
        // B breaks once and schedules A and C
        assert_eq!(drops.len(), 1);
        assert_eq!(chain.triggers_fired(), 2);
        assert_eq!(chain.pending(), 2);
    }

    #[test]
    fn test_stale_trigger_is_skipped() {
        let (mut chain, config, mut feedback, mut rng) = setup();
        let mut crystals = row();
        chain.trigger(&mut crystals[2], 0.1);
        crystals.retain(|crystal| crystal.id != CrystalId(2));

        let drops = chain.update(0.2, &mut crystals, &config.crystal, &mut feedback, &mut rng);
        assert!(drops.is_empty());
        assert_eq!(chain.triggers_fired(), 1);
    }

    #[test]
    fn test_chained_breaks_never_pause() {
        let (mut chain, mut config, mut feedback, mut rng) = setup();
        config.crystal.hit_pause = 0.05;
        let mut crystals = row();

        chain.shatter(&mut crystals, 0, &config.crystal, &mut feedback, &mut rng);
        chain.update(0.15, &mut crystals, &config.crystal, &mut feedback, &mut rng);
        chain.update(0.15, &mut crystals, &config.crystal, &mut feedback, &mut rng);

        assert!(crystals.iter().all(MemoryCrystal::is_breaking));
        assert_eq!(feedback.hit_pause.request_count(), 1);
    }
}
