//! Ordered per-element reaction rules.
//!
//! Each element owns a `&'static` slice of rules checked first-match-wins
//! against the defender's current tags. When nothing matches, the strategy's
//! fallback reaction applies. Attacks without an element use
//! [`DEFAULT_STRATEGY`], which never mutates anything.

use crate::element::{ElementSet, ElementType};

/// What a rule looks for on the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    /// The defender carries the element.
    Has(ElementType),
    /// The defender or the tile it stands on carries the element.
    HasOnUnitOrTile(ElementType),
}

impl Trigger {
    /// Element the trigger looks for. This is the tag a reaction consumes.
    pub fn element(self) -> ElementType {
        match self {
            Trigger::Has(element) | Trigger::HasOnUnitOrTile(element) => element,
        }
    }

    /// Tests the trigger against the defender's tags and its tile's tags.
    pub fn matches(self, unit_tags: ElementSet, tile_tags: Option<ElementSet>) -> bool {
        match self {
            Trigger::Has(element) => unit_tags.has(element),
            Trigger::HasOnUnitOrTile(element) => {
                unit_tags.has(element) || tile_tags.is_some_and(|tags| tags.has(element))
            }
        }
    }
}

/// Reaction families produced by the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reaction {
    /// Amplified damage. Consumes the trigger tag, applies the attacker tag.
    Amplify,
    /// Sets burn. Keeps the trigger tag and applies the attacker tag.
    Ignite,
    /// Consumes the trigger tag, applies the attacker tag and splashes every
    /// unit within the chain radius.
    Overload,
    /// Conduction chain through water. Applies the attacker tag.
    Conduct,
    /// Freeze roll. Consumes both tags whatever the roll.
    Freeze,
    /// Arms the thunderstrike multiplier. Consumes both tags.
    Thunderstrike,
    /// Arms the superconduct bonus. Consumes both tags.
    Superconduct,
    /// Plain hit that applies the attacker tag.
    Tag,
    /// Plain hit that tags the defender, its tile and the adjacent tiles.
    Spread,
}

/// One row of a strategy's priority list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReactionRule {
    pub trigger: Trigger,
    pub reaction: Reaction,
}

impl ReactionRule {
    const fn new(trigger: Trigger, reaction: Reaction) -> Self {
        Self { trigger, reaction }
    }
}

/// Rule list plus fallback for one attacking element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementStrategy {
    pub element: Option<ElementType>,
    pub rules: &'static [ReactionRule],
    /// Reaction used when no rule matches. `None` means a neutral hit.
    pub fallback: Option<Reaction>,
}

impl ElementStrategy {
    /// Picks the first matching rule, or the fallback.
    ///
    /// Returns the reaction and the trigger that fired it, if any.
    pub fn select(
        &self,
        unit_tags: ElementSet,
        tile_tags: Option<ElementSet>,
    ) -> Option<(Reaction, Option<Trigger>)> {
        self.rules
            .iter()
            .find(|rule| rule.trigger.matches(unit_tags, tile_tags))
            .map(|rule| (rule.reaction, Some(rule.trigger)))
            .or_else(|| self.fallback.map(|reaction| (reaction, None)))
    }
}

use ElementType::{Fire, Ice, Thunder, Water, Wood};
use Reaction::*;
use Trigger::{Has, HasOnUnitOrTile};

const FIRE_RULES: &[ReactionRule] = &[
    ReactionRule::new(Has(Water), Amplify),
    ReactionRule::new(Has(Ice), Amplify),
    ReactionRule::new(Has(Wood), Ignite),
    ReactionRule::new(Has(Thunder), Overload),
];

const WATER_RULES: &[ReactionRule] = &[
    ReactionRule::new(Has(Fire), Amplify),
    ReactionRule::new(Has(Ice), Freeze),
];

const THUNDER_RULES: &[ReactionRule] = &[
    ReactionRule::new(Has(Fire), Overload),
    ReactionRule::new(HasOnUnitOrTile(Water), Conduct),
    ReactionRule::new(Has(Wood), Thunderstrike),
    ReactionRule::new(Has(Ice), Superconduct),
];

const ICE_RULES: &[ReactionRule] = &[
    ReactionRule::new(Has(Fire), Amplify),
    ReactionRule::new(Has(Water), Freeze),
    ReactionRule::new(Has(Thunder), Superconduct),
];

const WOOD_RULES: &[ReactionRule] = &[
    ReactionRule::new(Has(Fire), Ignite),
    ReactionRule::new(Has(Thunder), Thunderstrike),
];

/// Strategy for attacks that carry no element.
pub const DEFAULT_STRATEGY: ElementStrategy = ElementStrategy {
    element: None,
    rules: &[],
    fallback: None,
};

const STRATEGIES: &[ElementStrategy] = &[
    ElementStrategy {
        element: Some(Fire),
        rules: FIRE_RULES,
        fallback: Some(Tag),
    },
    ElementStrategy {
        element: Some(Water),
        rules: WATER_RULES,
        fallback: Some(Spread),
    },
    ElementStrategy {
        element: Some(Thunder),
        rules: THUNDER_RULES,
        fallback: Some(Tag),
    },
    ElementStrategy {
        element: Some(Ice),
        rules: ICE_RULES,
        fallback: Some(Tag),
    },
    ElementStrategy {
        element: Some(Wood),
        rules: WOOD_RULES,
        fallback: Some(Spread),
    },
];

/// Looks up the strategy for an attacking element.
///
/// Unmapped elements (including `None`) resolve to [`DEFAULT_STRATEGY`], so
/// dispatch never fails.
pub fn strategy_for(element: Option<ElementType>) -> &'static ElementStrategy {
    STRATEGIES
        .iter()
        .find(|strategy| strategy.element == element)
        .unwrap_or(&DEFAULT_STRATEGY)
}

/// Ordered rule list for an attacking element.
pub fn rules_for(element: Option<ElementType>) -> &'static [ReactionRule] {
    strategy_for(element).rules
}
