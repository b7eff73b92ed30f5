//! Card templates.
//!
//! A [`Card`] is the immutable catalog entry shared by every copy of that
//! card in every game: attributes plus per-slot lists of effect
//! descriptors. Game objects hold an `Arc<Card>` and never mutate it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::attributes::{CardType, Keyword, Supertype};
use crate::effects::{Effect, EffectSlot, TargetSpec};
use crate::mana::{Color, ManaCost};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Lightning Bolt"),
/// not a specific instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use mtg_rules_engine::cards::{Card, CardId};
/// use mtg_rules_engine::cards::attributes::{CardType, Keyword};
/// use mtg_rules_engine::effects::{Effect, EffectSlot, TargetSpec};
/// use mtg_rules_engine::mana::{Color, ManaCost};
///
/// let bolt = Card::new(CardId::new(1), "Lightning Bolt", CardType::Instant)
///     .with_cost(ManaCost::parse("{R}").unwrap())
///     .with_color(Color::Red)
///     .with_target(TargetSpec::any_target())
///     .with_effect(EffectSlot::Spell, Effect::damage(3));
///
/// assert!(bolt.needs_target());
/// assert_eq!(bolt.effects(EffectSlot::Spell).len(), 1);
/// assert!(bolt.effects(EffectSlot::OnEnterBattlefield).is_empty());
///
/// let angel = Card::new(CardId::new(2), "Serra Angel", CardType::Creature)
///     .with_pt(4, 4)
///     .with_keyword(Keyword::Flying);
/// assert!(angel.has_keyword(Keyword::Flying));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,
    pub supertypes: Vec<Supertype>,
    pub subtypes: Vec<String>,
    pub color: Option<Color>,
    /// `None` for lands, which are played rather than cast.
    pub mana_cost: Option<ManaCost>,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub keywords: Vec<Keyword>,
    /// For spells, what the spell targets; for creatures, what the
    /// enter-the-battlefield ability targets; for Auras, what they enchant.
    pub target: Option<TargetSpec>,
    pub effects: FxHashMap<EffectSlot, Vec<Effect>>,
    pub abilities: Vec<ActivatedAbility>,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            supertypes: Vec::new(),
            subtypes: Vec::new(),
            color: None,
            mana_cost: None,
            power: None,
            toughness: None,
            keywords: Vec::new(),
            target: None,
            effects: FxHashMap::default(),
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = Some(cost);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_pt(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: Supertype) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[must_use]
    pub fn with_target(mut self, spec: TargetSpec) -> Self {
        self.target = Some(spec);
        self
    }

    /// Append an effect descriptor to a slot.
    #[must_use]
    pub fn with_effect(mut self, slot: EffectSlot, effect: Effect) -> Self {
        self.effects.entry(slot).or_default().push(effect);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: ActivatedAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    /// The descriptors attached to `slot`, in declaration order.
    #[must_use]
    pub fn effects(&self, slot: EffectSlot) -> &[Effect] {
        self.effects.get(&slot).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s == subtype)
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.card_type == CardType::Creature
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.card_type == CardType::BasicLand
    }

    #[must_use]
    pub fn is_aura(&self) -> bool {
        self.card_type == CardType::Enchantment && self.has_subtype("Aura")
    }

    #[must_use]
    pub fn is_equipment(&self) -> bool {
        self.card_type == CardType::Artifact && self.has_subtype("Equipment")
    }

    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.supertypes.contains(&Supertype::Legendary)
    }

    #[must_use]
    pub fn needs_target(&self) -> bool {
        self.target.is_some()
    }

    /// Castable whenever its controller has priority.
    #[must_use]
    pub fn is_instant_speed(&self) -> bool {
        self.card_type == CardType::Instant || self.has_keyword(Keyword::Flash)
    }

    /// Casting announces a damage split across several targets.
    #[must_use]
    pub fn needs_damage_distribution(&self) -> bool {
        self.effects(EffectSlot::Spell)
            .iter()
            .any(|e| matches!(e, Effect::DealDividedDamage))
    }

    /// Cost to cast; free when none is printed.
    #[must_use]
    pub fn cost(&self) -> ManaCost {
        self.mana_cost.clone().unwrap_or_default()
    }
}

/// An ability printed on a permanent, activated by its controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub description: String,
    /// `{T}` is part of the cost.
    pub requires_tap: bool,
    pub mana_cost: Option<ManaCost>,
    /// Costs first, then the effects run on resolution.
    pub effects: Vec<Effect>,
    pub target: Option<TargetSpec>,
    /// Only as a sorcery: active player, main phase, empty stack.
    pub sorcery_speed: bool,
}

impl ActivatedAbility {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            requires_tap: false,
            mana_cost: None,
            effects: Vec::new(),
            target: None,
            sorcery_speed: false,
        }
    }

    #[must_use]
    pub fn tap(mut self) -> Self {
        self.requires_tap = true;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = Some(cost);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_target(mut self, spec: TargetSpec) -> Self {
        self.target = Some(spec);
        self
    }

    #[must_use]
    pub fn sorcery_speed(mut self) -> Self {
        self.sorcery_speed = true;
        self
    }

    /// Untargeted, and every non-cost effect adds mana. Mana abilities
    /// resolve immediately instead of using the stack.
    #[must_use]
    pub fn is_mana_ability(&self) -> bool {
        let mut body = self.effects.iter().filter(|e| !e.is_cost()).peekable();
        self.target.is_none() && body.peek().is_some() && body.all(Effect::is_mana)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_aura_and_legendary() {
        let aura = Card::new(CardId::new(1), "Pacifism", CardType::Enchantment)
            .with_subtype("Aura");
        assert!(aura.is_aura());
        assert!(!aura.is_creature());

        let legend = Card::new(CardId::new(2), "Jedit", CardType::Creature)
            .with_supertype(Supertype::Legendary);
        assert!(legend.is_legendary());

        let sword = Card::new(CardId::new(3), "Leonin Scimitar", CardType::Artifact)
            .with_subtype("Equipment");
        assert!(sword.is_equipment());
        assert!(!sword.is_aura());
        assert!(!aura.is_equipment());
    }

    #[test]
    fn test_instant_speed() {
        let instant = Card::new(CardId::new(1), "Shock", CardType::Instant);
        let flash = Card::new(CardId::new(2), "Ambush", CardType::Creature)
            .with_keyword(Keyword::Flash);
        let sorcery = Card::new(CardId::new(3), "Divination", CardType::Sorcery);
        assert!(instant.is_instant_speed());
        assert!(flash.is_instant_speed());
        assert!(!sorcery.is_instant_speed());
    }

    #[test]
    fn test_mana_ability() {
        let elf = ActivatedAbility::new("{T}: Add {G}.")
            .tap()
            .with_effect(Effect::add_mana(Color::Green));
        assert!(elf.is_mana_ability());

        let pinger = ActivatedAbility::new("{T}: 1 damage.")
            .tap()
            .with_target(TargetSpec::any_target())
            .with_effect(Effect::damage(1));
        assert!(!pinger.is_mana_ability());

        assert!(!ActivatedAbility::new("Nothing").is_mana_ability());
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::new(CardId::new(1), "Test", CardType::Sorcery)
            .with_cost(ManaCost::parse("{2}{U}").unwrap())
            .with_effect(EffectSlot::Spell, Effect::draw(2));

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}
