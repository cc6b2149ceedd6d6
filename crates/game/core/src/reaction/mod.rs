//! Elemental reaction resolution.
//!
//! [`resolve`] is a pure function over the battle state: it looks up the
//! attacking element's strategy, matches the defender's current tags and
//! returns a [`ReactionOutcome`] describing every mutation to apply. Nothing
//! is written here; the engine applies the outcome and routes damage through
//! the combat pipeline.
//!
//! Armed multipliers are read from the defender's flags as they stood before
//! the rule fired, so a rule that arms a flag never consumes it in the same
//! call.
pub mod propagate;
pub mod table;

pub use propagate::{conduction_targets, radius_targets, spread_tiles};
pub use table::{
    DEFAULT_STRATEGY, ElementStrategy, Reaction, ReactionRule, Trigger, rules_for, strategy_for,
};

use arrayvec::ArrayVec;
use tracing::debug;

use crate::config::BattleConfig;
use crate::element::ElementType;
use crate::env::{RngOracle, compute_seed};
use crate::state::{ArmedFlags, BattleState, Combatant, CombatantId, Position};

/// Roll context for a boss resisting a freeze.
pub const FREEZE_RESIST_ROLL: u32 = 0x4652_5a00;

/// A single hit entering the reaction table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strike {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub element: Option<ElementType>,
    pub base_damage: u32,
}

/// Change to the defender's tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagMutation {
    Add(ElementType),
    Remove(ElementType),
}

pub type TagMutations = ArrayVec<TagMutation, { BattleConfig::MAX_TAG_MUTATIONS }>;

/// Which propagation shape produced a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChainShape {
    Radius,
    Conduction,
}

/// Secondary victims of a reaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    pub shape: ChainShape,
    pub targets: Vec<CombatantId>,
    /// Raw damage each victim receives through the normal pipeline.
    pub damage: u32,
    /// Tag applied to each victim, if any.
    pub tag: Option<ElementType>,
}

/// Tiles tagged by an environmental spread.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSpread {
    pub tiles: Vec<Position>,
    pub tag: ElementType,
}

/// Status change applied to the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusApplied {
    Burn { turns: u32 },
    Freeze { turns: u32 },
    /// A boss shrugged off the freeze. Tags are cleared anyway.
    FreezeResisted,
    Thunderstrike,
    Superconduct,
}

/// Everything a strike does, computed before any of it is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionOutcome {
    pub element: Option<ElementType>,
    /// `None` for element-less hits.
    pub reaction: Option<Reaction>,
    pub base_damage: u32,
    /// Damage after the rule and the armed multipliers, before the defender's
    /// pipeline modifiers.
    pub final_damage: u32,
    pub tag_mutations: TagMutations,
    pub chain: Option<Chain>,
    pub tile_spread: Option<TileSpread>,
    pub status_applied: Option<StatusApplied>,
    /// Armed flags spent by this hit.
    pub consumed: ArmedFlags,
}

impl ReactionOutcome {
    /// Plain hit with no reaction.
    pub fn neutral(element: Option<ElementType>, base_damage: u32) -> Self {
        Self {
            element,
            reaction: None,
            base_damage,
            final_damage: base_damage,
            tag_mutations: TagMutations::new(),
            chain: None,
            tile_spread: None,
            status_applied: None,
            consumed: ArmedFlags::empty(),
        }
    }

    /// Defender targets of every chain this outcome carries.
    pub fn chain_targets(&self) -> &[CombatantId] {
        self.chain
            .as_ref()
            .map(|chain| chain.targets.as_slice())
            .unwrap_or(&[])
    }

    fn add(&mut self, element: ElementType) {
        self.tag_mutations.push(TagMutation::Add(element));
    }

    fn remove(&mut self, element: ElementType) {
        self.tag_mutations.push(TagMutation::Remove(element));
    }
}

/// Resolves `strike` against the defender's current state.
///
/// A missing defender yields a neutral outcome; the engine validates targets
/// before resolving, so this only happens for stale scripted callers.
pub fn resolve(
    strike: &Strike,
    state: &BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
) -> ReactionOutcome {
    let Some(defender) = state.combatant(strike.defender) else {
        return ReactionOutcome::neutral(strike.element, strike.base_damage);
    };

    let strategy = strategy_for(strike.element);
    let tile_tags = state.tile_of(strike.defender).map(|tile| tile.tags);
    let mut outcome = ReactionOutcome::neutral(strike.element, strike.base_damage);

    if let (Some(attacking), Some((reaction, trigger))) =
        (strike.element, strategy.select(defender.tags, tile_tags))
    {
        outcome.reaction = Some(reaction);
        let consumed = trigger.map(Trigger::element);
        apply_rule(
            &mut outcome,
            reaction,
            attacking,
            consumed,
            strike,
            defender,
            state,
            config,
            rng,
        );
    }

    apply_armed(&mut outcome, defender.armed, config);

    debug!(
        target: "battle::reaction",
        defender = %strike.defender,
        element = ?strike.element,
        reaction = ?outcome.reaction,
        base = strike.base_damage,
        damage = outcome.final_damage,
        consumed = ?outcome.consumed,
        "reaction resolved"
    );
    outcome
}

#[allow(clippy::too_many_arguments)]
fn apply_rule(
    outcome: &mut ReactionOutcome,
    reaction: Reaction,
    attacking: ElementType,
    consumed: Option<ElementType>,
    strike: &Strike,
    defender: &Combatant,
    state: &BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
) {
    let base = strike.base_damage;

    match reaction {
        Reaction::Amplify => {
            outcome.final_damage = config.amplified(base);
            if let Some(consumed) = consumed {
                outcome.remove(consumed);
            }
            outcome.add(attacking);
        }
        Reaction::Ignite => {
            outcome.add(attacking);
            outcome.status_applied = Some(StatusApplied::Burn {
                turns: config.burn_turns,
            });
        }
        Reaction::Overload => {
            if let Some(consumed) = consumed {
                outcome.remove(consumed);
            }
            outcome.add(attacking);
            if state.board().is_some() {
                let targets = radius_targets(state, strike.defender, config.chain_radius);
                debug!(
                    target: "battle::chain",
                    shape = "radius",
                    origin = %strike.defender,
                    victims = targets.len(),
                    "overload chain"
                );
                outcome.chain = Some(Chain {
                    shape: ChainShape::Radius,
                    targets,
                    damage: config.chained(base),
                    tag: Some(attacking),
                });
            }
        }
        Reaction::Conduct => {
            outcome.add(attacking);
            if state.board().is_some() {
                let targets = conduction_targets(state, strike.defender);
                debug!(
                    target: "battle::chain",
                    shape = "conduction",
                    origin = %strike.defender,
                    victims = targets.len(),
                    "conduction chain"
                );
                outcome.chain = Some(Chain {
                    shape: ChainShape::Conduction,
                    targets,
                    damage: base,
                    tag: None,
                });
            }
        }
        Reaction::Freeze => {
            outcome.remove(ElementType::Ice);
            outcome.remove(ElementType::Water);
            outcome.status_applied = Some(if resists_freeze(strike, defender, state, config, rng) {
                StatusApplied::FreezeResisted
            } else {
                StatusApplied::Freeze {
                    turns: config.freeze_turns,
                }
            });
        }
        Reaction::Thunderstrike => {
            remove_pair(outcome, consumed, attacking);
            outcome.status_applied = Some(StatusApplied::Thunderstrike);
        }
        Reaction::Superconduct => {
            remove_pair(outcome, consumed, attacking);
            outcome.status_applied = Some(StatusApplied::Superconduct);
        }
        Reaction::Tag => outcome.add(attacking),
        Reaction::Spread => {
            outcome.add(attacking);
            let tiles = spread_tiles(state, strike.defender);
            if !tiles.is_empty() {
                outcome.tile_spread = Some(TileSpread {
                    tiles,
                    tag: attacking,
                });
            }
        }
    }
}

fn remove_pair(outcome: &mut ReactionOutcome, consumed: Option<ElementType>, attacking: ElementType) {
    if let Some(consumed) = consumed {
        outcome.remove(consumed);
    }
    outcome.remove(attacking);
}

/// Non-bosses never resist. Bosses roll independently on every attempt.
fn resists_freeze(
    strike: &Strike,
    defender: &Combatant,
    state: &BattleState,
    config: &BattleConfig,
    rng: &dyn RngOracle,
) -> bool {
    if !defender.is_boss() {
        return false;
    }
    let seed = compute_seed(state.seed, state.nonce, strike.defender.0, FREEZE_RESIST_ROLL);
    let resisted = rng.chance(seed, config.boss_freeze_resist_percent);
    debug!(
        target: "battle::reaction",
        defender = %strike.defender,
        resisted,
        "boss freeze roll"
    );
    resisted
}

fn apply_armed(outcome: &mut ReactionOutcome, armed: ArmedFlags, config: &BattleConfig) {
    outcome.final_damage = armed_damage(outcome.final_damage, armed, config);
    outcome.consumed = armed;
}

/// Applies armed multipliers to one damage instance: thunderstrike doubles,
/// then superconduct adds its flat bonus.
pub fn armed_damage(damage: u32, armed: ArmedFlags, config: &BattleConfig) -> u32 {
    let mut damage = damage;
    if armed.contains(ArmedFlags::THUNDERSTRIKE) {
        damage = damage.saturating_mul(config.thunderstrike_multiplier);
    }
    if armed.contains(ArmedFlags::SUPERCONDUCT) {
        damage = damage.saturating_add(config.superconduct_bonus);
    }
    damage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementSet;
    use crate::env::{FixedRoll, PcgRng};
    use crate::state::{AdjacencyOffsets, BoardGraph, UnitClass};

    fn strike(element: Option<ElementType>, base: u32) -> Strike {
        Strike {
            attacker: CombatantId::PLAYER,
            defender: CombatantId(1),
            element,
            base_damage: base,
        }
    }

    fn state_with(defender: Combatant) -> BattleState {
        BattleState::new(
            Combatant::player(30, Position::ORIGIN),
            vec![defender],
            Some(BoardGraph::rectangle(5, 5, AdjacencyOffsets::four_way())),
        )
        .unwrap()
    }

    fn defender(tags: ElementSet) -> Combatant {
        Combatant::enemy(CombatantId(1), 40, Position::new(2, 2)).with_tags(tags)
    }

    #[test]
    fn fire_on_water_amplifies_and_swaps_tags() {
        let config = BattleConfig::default();
        for base in [1, 2, 7, 10] {
            let state = state_with(defender(ElementSet::WATER));
            let outcome = resolve(&strike(Some(ElementType::Fire), base), &state, &config, &PcgRng);

            assert_eq!(outcome.reaction, Some(Reaction::Amplify));
            assert_eq!(outcome.final_damage, (base * 3).div_ceil(2));
            assert_eq!(
                outcome.tag_mutations.as_slice(),
                &[
                    TagMutation::Remove(ElementType::Water),
                    TagMutation::Add(ElementType::Fire)
                ]
            );
        }
    }

    #[test]
    fn fire_on_wood_ignites_without_extra_damage() {
        let config = BattleConfig::default();
        let state = state_with(defender(ElementSet::WOOD));
        let outcome = resolve(&strike(Some(ElementType::Fire), 4), &state, &config, &PcgRng);

        assert_eq!(outcome.final_damage, 4);
        assert_eq!(outcome.status_applied, Some(StatusApplied::Burn { turns: 5 }));
        assert_eq!(
            outcome.tag_mutations.as_slice(),
            &[TagMutation::Add(ElementType::Fire)]
        );
    }

    #[test]
    fn water_freezes_normal_units_deterministically() {
        let config = BattleConfig::default();
        let state = state_with(defender(ElementSet::ICE));
        let outcome = resolve(&strike(Some(ElementType::Water), 3), &state, &config, &FixedRoll(1));

        assert_eq!(outcome.status_applied, Some(StatusApplied::Freeze { turns: 1 }));
        assert_eq!(outcome.final_damage, 3);
    }

    #[test]
    fn boss_resistance_follows_the_oracle() {
        let config = BattleConfig::default();
        let boss = defender(ElementSet::WATER).with_class(UnitClass::Boss);
        let state = state_with(boss);
        let ice = strike(Some(ElementType::Ice), 3);

        let resisted = resolve(&ice, &state, &config, &FixedRoll(1));
        assert_eq!(resisted.status_applied, Some(StatusApplied::FreezeResisted));
        assert_eq!(resisted.tag_mutations.len(), 2);

        let frozen = resolve(&ice, &state, &config, &FixedRoll(100));
        assert_eq!(frozen.status_applied, Some(StatusApplied::Freeze { turns: 1 }));
    }

    #[test]
    fn arming_rules_do_not_consume_in_the_same_call() {
        let config = BattleConfig::default();
        let state = state_with(defender(ElementSet::WOOD));
        let outcome = resolve(&strike(Some(ElementType::Thunder), 5), &state, &config, &PcgRng);

        assert_eq!(outcome.reaction, Some(Reaction::Thunderstrike));
        assert_eq!(outcome.status_applied, Some(StatusApplied::Thunderstrike));
        assert_eq!(outcome.final_damage, 5);
        assert!(outcome.consumed.is_empty());
    }

    #[test]
    fn armed_flags_apply_to_any_element_in_fixed_order() {
        let config = BattleConfig::default();
        let mut unit = defender(ElementSet::empty());
        unit.armed = ArmedFlags::THUNDERSTRIKE | ArmedFlags::SUPERCONDUCT;
        let state = state_with(unit);

        let outcome = resolve(&strike(None, 5), &state, &config, &PcgRng);

        // (5 * 2) + 6
        assert_eq!(outcome.final_damage, 16);
        assert_eq!(outcome.consumed, ArmedFlags::all());
        assert_eq!(outcome.reaction, None);
    }

    #[test]
    fn neutral_hits_mutate_nothing() {
        let config = BattleConfig::default();
        let state = state_with(defender(ElementSet::all()));
        let outcome = resolve(&strike(None, 9), &state, &config, &PcgRng);

        assert_eq!(outcome, ReactionOutcome::neutral(None, 9));
    }

    #[test]
    fn overload_splashes_half_damage_with_the_attacker_tag() {
        let config = BattleConfig::default();
        let state = BattleState::new(
            Combatant::player(30, Position::new(0, 0)),
            vec![
                defender(ElementSet::THUNDER),
                Combatant::enemy(CombatantId(2), 10, Position::new(3, 3)),
            ],
            Some(BoardGraph::rectangle(5, 5, AdjacencyOffsets::four_way())),
        )
        .unwrap();

        let outcome = resolve(&strike(Some(ElementType::Fire), 7), &state, &config, &PcgRng);
        let chain = outcome.chain.expect("overload chain");

        assert_eq!(chain.shape, ChainShape::Radius);
        assert_eq!(chain.targets, vec![CombatantId(2)]);
        assert_eq!(chain.damage, 4);
        assert_eq!(chain.tag, Some(ElementType::Fire));
        assert_eq!(outcome.final_damage, 7);
    }

    #[test]
    fn spread_without_a_board_still_tags_the_defender() {
        let config = BattleConfig::default();
        let state = BattleState::new(
            Combatant::player(30, Position::ORIGIN),
            vec![defender(ElementSet::empty())],
            None,
        )
        .unwrap();

        let outcome = resolve(&strike(Some(ElementType::Wood), 2), &state, &config, &PcgRng);
        assert_eq!(outcome.reaction, Some(Reaction::Spread));
        assert_eq!(outcome.tile_spread, None);
        assert_eq!(
            outcome.tag_mutations.as_slice(),
            &[TagMutation::Add(ElementType::Wood)]
        );
    }
}
