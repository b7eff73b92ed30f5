//! A small catalog of real cards expressed as effect descriptors.
//!
//! The engine never depends on these by name; they exist so tests, docs
//! and embedding servers have a ready-made card pool covering every
//! descriptor and keyword the engine understands.
//!
//! ```
//! use mtg_rules_engine::cards::catalog::test_catalog;
//!
//! let catalog = test_catalog().unwrap();
//! let bolt = catalog.get_by_name("Lightning Bolt").unwrap();
//! assert!(bolt.needs_target());
//! ```

use super::attributes::{CardType, Keyword, Supertype};
use super::definition::{ActivatedAbility, Card};
use super::registry::CardRegistry;
use crate::core::Result;
use crate::effects::{
    Amount, Effect, EffectSlot, Recipient, TargetCount, TargetFilter, TargetSpec,
};
use crate::mana::{Color, ManaCost};

const BASICS: [(&str, Color); 5] = [
    ("Plains", Color::White),
    ("Island", Color::Blue),
    ("Swamp", Color::Black),
    ("Mountain", Color::Red),
    ("Forest", Color::Green),
];

/// Build the catalog.
pub fn test_catalog() -> Result<CardRegistry> {
    let mut registry = CardRegistry::new();

    for (name, color) in BASICS {
        let id = registry.next_id();
        registry.register(
            Card::new(id, name, CardType::BasicLand)
                .with_supertype(Supertype::Basic)
                .with_subtype(name)
                .with_effect(EffectSlot::OnTap, Effect::add_mana(color)),
        )?;
    }

    add_creatures(&mut registry)?;
    add_enchantments(&mut registry)?;
    add_spells(&mut registry)?;

    Ok(registry)
}

fn add_creatures(registry: &mut CardRegistry) -> Result<()> {
    use Color::*;

    creature(registry, "Grizzly Bears", "{1}{G}", Some(Green), (2, 2), |c| {
        c.with_subtype("Bear")
    })?;
    creature(registry, "Llanowar Elves", "{G}", Some(Green), (1, 1), |c| {
        c.with_subtype("Elf").with_ability(
            ActivatedAbility::new("{T}: Add {G}.")
                .tap()
                .with_effect(Effect::add_mana(Green)),
        )
    })?;
    creature(registry, "Youthful Knight", "{1}{W}", Some(White), (2, 1), |c| {
        c.with_keyword(Keyword::FirstStrike)
    })?;
    creature(registry, "Fencing Ace", "{1}{W}", Some(White), (1, 1), |c| {
        c.with_keyword(Keyword::DoubleStrike)
    })?;
    creature(registry, "White Knight", "{W}{W}", Some(White), (2, 2), |c| {
        c.with_keyword(Keyword::FirstStrike)
            .with_keyword(Keyword::ProtectionFrom(Black))
    })?;
    creature(registry, "Hill Giant", "{3}{R}", Some(Red), (3, 3), |c| c.with_subtype("Giant"))?;
    creature(registry, "Raging Goblin", "{R}", Some(Red), (1, 1), |c| {
        c.with_keyword(Keyword::Haste)
    })?;
    creature(registry, "Mogg Fanatic", "{R}", Some(Red), (1, 1), |c| {
        c.with_subtype("Goblin").with_ability(
            ActivatedAbility::new("Sacrifice Mogg Fanatic: It deals 1 damage to any target.")
                .with_effect(Effect::SacrificeSelf)
                .with_target(TargetSpec::any_target())
                .with_effect(Effect::damage(1)),
        )
    })?;
    creature(registry, "Goblin Piker", "{1}{R}", Some(Red), (2, 1), |c| {
        c.with_effect(EffectSlot::Static, Effect::CantBlock)
    })?;
    creature(registry, "Boggart Brute", "{2}{R}", Some(Red), (3, 2), |c| {
        c.with_keyword(Keyword::Menace)
    })?;
    creature(registry, "Bladetusk Boar", "{3}{R}", Some(Red), (3, 2), |c| {
        c.with_keyword(Keyword::Intimidate)
    })?;
    creature(registry, "Serra Angel", "{3}{W}{W}", Some(White), (4, 4), |c| {
        c.with_keyword(Keyword::Flying).with_keyword(Keyword::Vigilance)
    })?;
    creature(registry, "Giant Spider", "{3}{G}", Some(Green), (2, 4), |c| {
        c.with_keyword(Keyword::Reach)
    })?;
    creature(registry, "War Mammoth", "{3}{G}", Some(Green), (3, 3), |c| {
        c.with_keyword(Keyword::Trample)
    })?;
    creature(registry, "Colossal Dreadmaw", "{4}{G}{G}", Some(Green), (6, 6), |c| {
        c.with_keyword(Keyword::Trample)
    })?;
    creature(registry, "Thorn Elemental", "{5}{G}{G}", Some(Green), (7, 7), |c| {
        c.with_effect(EffectSlot::Static, Effect::AssignDamageAsThoughUnblocked)
    })?;
    creature(registry, "Stalking Tiger", "{3}{G}", Some(Green), (3, 3), |c| {
        c.with_effect(EffectSlot::Static, Effect::CantBeBlockedByMoreThan(1))
    })?;
    creature(registry, "Wall of Wood", "{G}", Some(Green), (0, 3), |c| {
        c.with_subtype("Wall").with_keyword(Keyword::Defender)
    })?;
    creature(registry, "Ambush Viper", "{1}{G}", Some(Green), (2, 1), |c| {
        c.with_keyword(Keyword::Flash)
    })?;
    creature(registry, "Troll Ascetic", "{1}{G}{G}", Some(Green), (3, 2), |c| {
        c.with_keyword(Keyword::Shroud)
    })?;
    let regenerate_cost = ManaCost::parse("{G}")?;
    creature(registry, "River Boa", "{1}{G}", Some(Green), (2, 1), |c| {
        c.with_keyword(Keyword::Islandwalk).with_ability(
            ActivatedAbility::new("{G}: Regenerate River Boa.")
                .with_cost(regenerate_cost)
                .with_effect(Effect::Regenerate { to: Recipient::Source }),
        )
    })?;
    creature(registry, "Prodigal Sorcerer", "{2}{U}", Some(Blue), (1, 1), |c| {
        c.with_ability(
            ActivatedAbility::new("{T}: Prodigal Sorcerer deals 1 damage to any target.")
                .tap()
                .with_target(TargetSpec::any_target())
                .with_effect(Effect::damage(1)),
        )
    })?;
    creature(registry, "Sage Owl", "{1}{U}", Some(Blue), (1, 1), |c| {
        c.with_keyword(Keyword::Flying).with_effect(
            EffectSlot::OnEnterBattlefield,
            Effect::LookAtTopAndReorder { count: 4 },
        )
    })?;
    creature(registry, "Man-o'-War", "{2}{U}", Some(Blue), (2, 2), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(EffectSlot::OnEnterBattlefield, Effect::ReturnToHand)
    })?;
    creature(registry, "Phantom Warrior", "{1}{U}{U}", Some(Blue), (2, 2), |c| {
        c.with_effect(EffectSlot::Static, Effect::CantBeBlocked)
    })?;
    creature(registry, "Cloud Sprite", "{U}", Some(Blue), (1, 1), |c| {
        c.with_keyword(Keyword::Flying)
            .with_effect(EffectSlot::Static, Effect::CanBlockOnlyFlyers)
    })?;
    creature(registry, "Cephalid Constable", "{1}{U}{U}", Some(Blue), (1, 1), |c| {
        c.with_effect(
            EffectSlot::OnCombatDamageToPlayer,
            Effect::ReturnUpTo {
                count: 1,
                filters: vec![TargetFilter::Opponent],
            },
        )
    })?;
    creature(registry, "Gravedigger", "{3}{B}", Some(Black), (2, 2), |c| {
        c.with_effect(
            EffectSlot::OnEnterBattlefield,
            Effect::may(
                "Return a creature card from your graveyard to your hand?",
                [Effect::ReturnFromGraveyard {
                    filters: vec![TargetFilter::CardType(CardType::Creature)],
                }],
            ),
        )
    })?;
    creature(registry, "Phyrexian Rager", "{2}{B}", Some(Black), (2, 2), |c| {
        c.with_effect(EffectSlot::OnEnterBattlefield, Effect::draw(1))
            .with_effect(
                EffectSlot::OnEnterBattlefield,
                Effect::LoseLife {
                    amount: Amount::Fixed(1),
                    to: Recipient::Controller,
                },
            )
    })?;
    creature(registry, "Severed Legion", "{1}{B}{B}", Some(Black), (2, 2), |c| {
        c.with_keyword(Keyword::Fear)
    })?;
    creature(registry, "Child of Night", "{1}{B}", Some(Black), (2, 1), |c| {
        c.with_keyword(Keyword::Lifelink)
    })?;
    creature(registry, "Hypnotic Specter", "{1}{B}{B}", Some(Black), (2, 2), |c| {
        c.with_keyword(Keyword::Flying).with_effect(
            EffectSlot::OnCombatDamageToPlayer,
            Effect::Discard {
                count: 1,
                to: Recipient::EachOpponent,
            },
        )
    })?;
    creature(registry, "Palace Guard", "{2}{W}", Some(White), (1, 4), |c| {
        c.with_effect(EffectSlot::Static, Effect::CanBlockAdditional(2))
    })?;
    creature(registry, "Benalish Marshal", "{W}{W}{W}", Some(White), (3, 3), |c| {
        c.with_effect(
            EffectSlot::Static,
            Effect::BoostOtherCreaturesYouControl {
                power: 1,
                toughness: 1,
            },
        )
    })?;
    creature(registry, "Jedit Ojanen", "{4}{W}{W}", Some(White), (5, 5), |c| {
        c.with_supertype(Supertype::Legendary)
    })?;
    creature(registry, "Juggernaut", "{4}", None, (5, 3), |c| {
        c.with_effect(EffectSlot::Static, Effect::MustAttack)
            .with_effect(EffectSlot::Static, Effect::CantBeBlockedBySubtype("Wall".into()))
    })?;
    creature(registry, "Colossus of Sardia", "{9}", None, (9, 9), |c| {
        c.with_keyword(Keyword::Trample)
            .with_effect(EffectSlot::Static, Effect::DoesntUntap)
    })?;
    creature(registry, "Darksteel Myr", "{3}", None, (0, 1), |c| {
        c.with_keyword(Keyword::Indestructible)
    })?;
    creature(registry, "Onulet", "{3}", None, (2, 2), |c| {
        c.with_effect(
            EffectSlot::OnDeath,
            Effect::GainLife {
                amount: Amount::Fixed(2),
                to: Recipient::Controller,
            },
        )
    })?;

    Ok(())
}

fn add_enchantments(registry: &mut CardRegistry) -> Result<()> {
    use Color::*;

    aura(registry, "Pacifism", "{1}{W}", White, Effect::EnchantedCantAttackOrBlock, |c| c)?;
    aura(
        registry,
        "Holy Strength",
        "{W}",
        White,
        Effect::BoostEnchanted {
            power: 1,
            toughness: 2,
        },
        |c| c,
    )?;
    aura(registry, "Pariah", "{2}{W}", White, Effect::RedirectPlayerDamageToEnchanted, |c| c)?;
    aura(registry, "Flight", "{U}", Blue, Effect::GrantKeywordToEnchanted(Keyword::Flying), |c| c)?;
    aura(registry, "Claustrophobia", "{1}{U}{U}", Blue, Effect::EnchantedDoesntUntap, |c| {
        c.with_effect(EffectSlot::OnEnterBattlefield, Effect::Tap)
    })?;

    spell(registry, "Phyrexian Arena", CardType::Enchantment, "{1}{B}{B}", Some(Black), |c| {
        c.with_effect(EffectSlot::UpkeepTriggered, Effect::draw(1))
            .with_effect(
                EffectSlot::UpkeepTriggered,
                Effect::LoseLife {
                    amount: Amount::Fixed(1),
                    to: Recipient::Controller,
                },
            )
    })?;
    spell(registry, "Sylvan Library", CardType::Enchantment, "{1}{G}", Some(Green), |c| {
        c.with_effect(
            EffectSlot::UpkeepTriggered,
            Effect::may(
                "Draw a card and lose 2 life?",
                [
                    Effect::draw(1),
                    Effect::LoseLife {
                        amount: Amount::Fixed(2),
                        to: Recipient::Controller,
                    },
                ],
            ),
        )
    })?;
    spell(registry, "Storm Totem", CardType::Artifact, "{2}", None, |c| {
        c.with_effect(
            EffectSlot::EndStepTriggered,
            Effect::LoseLife {
                amount: Amount::Fixed(1),
                to: Recipient::EachOpponent,
            },
        )
    })?;
    let greed_cost = ManaCost::parse("{B}")?;
    spell(registry, "Greed", CardType::Enchantment, "{3}{B}", Some(Black), |c| {
        c.with_ability(
            ActivatedAbility::new("{B}, Pay 2 life: Draw a card.")
                .with_cost(greed_cost)
                .with_effect(Effect::PayLife(2))
                .with_effect(Effect::draw(1)),
        )
    })?;
    spell(registry, "Upwelling", CardType::Enchantment, "{3}{G}", Some(Green), |c| {
        c.with_effect(EffectSlot::Static, Effect::ManaDoesntEmpty)
    })?;
    spell(registry, "Spellbook", CardType::Artifact, "{0}", None, |c| {
        c.with_effect(EffectSlot::Static, Effect::NoMaximumHandSize)
    })?;
    let equip_cost = ManaCost::parse("{1}")?;
    spell(registry, "Leonin Scimitar", CardType::Artifact, "{1}", None, |c| {
        c.with_subtype("Equipment")
            .with_effect(
                EffectSlot::Static,
                Effect::BoostEnchanted {
                    power: 1,
                    toughness: 1,
                },
            )
            .with_ability(
                ActivatedAbility::new("Equip {1}")
                    .with_cost(equip_cost)
                    .with_target(TargetSpec::creature().with_filter(TargetFilter::YouControl))
                    .with_effect(Effect::Equip)
                    .sorcery_speed(),
            )
    })?;
    spell(registry, "Heraldic Banner", CardType::Artifact, "{3}", None, |c| {
        c.with_effect(EffectSlot::OnEnterBattlefield, Effect::ChooseColor)
            .with_effect(
                EffectSlot::Static,
                Effect::BoostCreaturesOfChosenColor {
                    power: 1,
                    toughness: 0,
                },
            )
    })?;

    Ok(())
}

fn add_spells(registry: &mut CardRegistry) -> Result<()> {
    use CardType::{Instant, Sorcery};
    use Color::*;

    spell(registry, "Lightning Bolt", Instant, "{R}", Some(Red), |c| {
        c.with_target(TargetSpec::any_target())
            .with_effect(EffectSlot::Spell, Effect::damage(3))
    })?;
    spell(registry, "Shock", Instant, "{R}", Some(Red), |c| {
        c.with_target(TargetSpec::any_target())
            .with_effect(EffectSlot::Spell, Effect::damage(2))
    })?;
    spell(registry, "Disintegrate", Sorcery, "{X}{R}", Some(Red), |c| {
        c.with_target(TargetSpec::any_target()).with_effect(
            EffectSlot::Spell,
            Effect::DealDamage {
                amount: Amount::X,
                to: Recipient::Target,
            },
        )
    })?;
    spell(registry, "Rolling Thunder", Sorcery, "{X}{R}{R}", Some(Red), |c| {
        c.with_target(TargetSpec::any_target().with_count(TargetCount::UpTo(5)))
            .with_effect(EffectSlot::Spell, Effect::DealDividedDamage)
    })?;
    spell(registry, "Fork", Instant, "{R}{R}", Some(Red), |c| {
        c.with_target(
            TargetSpec::spell().with_filter(TargetFilter::OneOf(vec![Instant, Sorcery])),
        )
        .with_effect(
            EffectSlot::Spell,
            Effect::CopySpell {
                choose_new_target: true,
            },
        )
    })?;
    spell(registry, "Terror", Instant, "{1}{B}", Some(Black), |c| {
        c.with_target(TargetSpec::creature().with_filter(TargetFilter::NotColor(Black)))
            .with_effect(
                EffectSlot::Spell,
                Effect::Destroy {
                    can_regenerate: false,
                },
            )
    })?;
    spell(registry, "Swords to Plowshares", Instant, "{W}", Some(White), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(EffectSlot::Spell, Effect::Exile)
    })?;
    spell(registry, "Diabolic Edict", Instant, "{1}{B}", Some(Black), |c| {
        c.with_target(TargetSpec::player()).with_effect(
            EffectSlot::Spell,
            Effect::Sacrifice {
                filters: vec![TargetFilter::CardType(CardType::Creature)],
                to: Recipient::Target,
            },
        )
    })?;
    spell(registry, "Mind Rot", Sorcery, "{2}{B}", Some(Black), |c| {
        c.with_target(TargetSpec::player()).with_effect(
            EffectSlot::Spell,
            Effect::Discard {
                count: 2,
                to: Recipient::Target,
            },
        )
    })?;
    spell(registry, "Duress", Sorcery, "{B}", Some(Black), |c| {
        c.with_target(TargetSpec::opponent()).with_effect(
            EffectSlot::Spell,
            Effect::RevealHandChooseDiscard {
                filters: vec![
                    TargetFilter::NotCardType(CardType::Creature),
                    TargetFilter::NotCardType(CardType::BasicLand),
                ],
            },
        )
    })?;
    spell(registry, "Raise Dead", Sorcery, "{B}", Some(Black), |c| {
        c.with_effect(
            EffectSlot::Spell,
            Effect::ReturnFromGraveyard {
                filters: vec![TargetFilter::CardType(CardType::Creature)],
            },
        )
    })?;
    spell(registry, "Disentomb", Sorcery, "{B}", Some(Black), |c| {
        c.with_target(
            TargetSpec::graveyard_card()
                .with_filter(TargetFilter::YouControl)
                .with_filter(TargetFilter::CardType(CardType::Creature)),
        )
        .with_effect(
            EffectSlot::Spell,
            Effect::ReturnFromGraveyard {
                filters: vec![TargetFilter::CardType(CardType::Creature)],
            },
        )
    })?;
    spell(registry, "Diabolic Tutor", Sorcery, "{2}{B}{B}", Some(Black), |c| {
        c.with_effect(EffectSlot::Spell, Effect::SearchLibrary { filters: Vec::new() })
    })?;
    spell(registry, "Unsummon", Instant, "{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(EffectSlot::Spell, Effect::ReturnToHand)
    })?;
    spell(registry, "Counterspell", Instant, "{U}{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::spell())
            .with_effect(EffectSlot::Spell, Effect::CounterSpell)
    })?;
    spell(registry, "Mana Leak", Instant, "{1}{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::spell())
            .with_effect(EffectSlot::Spell, Effect::CounterUnlessPays(3))
    })?;
    spell(registry, "Divination", Sorcery, "{2}{U}", Some(Blue), |c| {
        c.with_effect(EffectSlot::Spell, Effect::draw(2))
    })?;
    spell(registry, "Index", Sorcery, "{U}", Some(Blue), |c| {
        c.with_effect(EffectSlot::Spell, Effect::LookAtTopAndReorder { count: 5 })
    })?;
    spell(registry, "Tidal Recall", Sorcery, "{2}{U}", Some(Blue), |c| {
        c.with_effect(
            EffectSlot::Spell,
            Effect::EachPlayerReturnsPermanent {
                filters: vec![TargetFilter::CardType(CardType::Creature)],
            },
        )
    })?;
    spell(registry, "Deflection", Instant, "{3}{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::spell())
            .with_effect(EffectSlot::Spell, Effect::ChangeTarget)
    })?;
    spell(registry, "Threaten", Sorcery, "{2}{R}", Some(Red), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(
                EffectSlot::Spell,
                Effect::GainControl {
                    until_end_of_turn: true,
                },
            )
            .with_effect(EffectSlot::Spell, Effect::Untap)
            .with_effect(
                EffectSlot::Spell,
                Effect::GrantKeyword {
                    keyword: Keyword::Haste,
                    to: Recipient::Target,
                },
            )
    })?;
    spell(registry, "Volition Reins", Sorcery, "{3}{U}{U}{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::permanent())
            .with_effect(
                EffectSlot::Spell,
                Effect::GainControl {
                    until_end_of_turn: false,
                },
            )
            .with_effect(EffectSlot::Spell, Effect::Untap)
    })?;
    spell(registry, "Aura Graft", Instant, "{1}{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::permanent().with_filter(TargetFilter::Subtype("Aura".into())))
            .with_effect(EffectSlot::Spell, Effect::MoveAura)
    })?;
    spell(registry, "Commune with Nature", Sorcery, "{G}", Some(Green), |c| {
        c.with_effect(
            EffectSlot::Spell,
            Effect::LookAtTopTakeOneRestOnBottom {
                count: 5,
                filters: vec![TargetFilter::CardType(CardType::Creature)],
            },
        )
    })?;
    spell(registry, "Giant Growth", Instant, "{G}", Some(Green), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(EffectSlot::Spell, Effect::boost(3, 3))
    })?;
    spell(registry, "Jump", Instant, "{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::creature()).with_effect(
            EffectSlot::Spell,
            Effect::GrantKeyword {
                keyword: Keyword::Flying,
                to: Recipient::Target,
            },
        )
    })?;
    spell(registry, "Healing Salve", Instant, "{W}", Some(White), |c| {
        c.with_target(TargetSpec::any_target()).with_effect(
            EffectSlot::Spell,
            Effect::PreventDamage {
                amount: 3,
                to: Recipient::Target,
            },
        )
    })?;
    spell(registry, "Soothing Balm", Instant, "{1}{W}", Some(White), |c| {
        c.with_target(TargetSpec::player()).with_effect(
            EffectSlot::Spell,
            Effect::GainLife {
                amount: Amount::Fixed(4),
                to: Recipient::Target,
            },
        )
    })?;
    spell(registry, "Icy Blast", Instant, "{U}", Some(Blue), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(EffectSlot::Spell, Effect::Tap)
    })?;
    spell(registry, "Vitalize", Instant, "{G}", Some(Green), |c| {
        c.with_target(TargetSpec::creature())
            .with_effect(EffectSlot::Spell, Effect::Untap)
    })?;
    spell(registry, "Essence Drain", Sorcery, "{4}{B}{B}", Some(Black), |c| {
        c.with_target(TargetSpec::any_target())
            .with_effect(EffectSlot::Spell, Effect::damage(3))
            .with_effect(
                EffectSlot::Spell,
                Effect::GainLife {
                    amount: Amount::Fixed(3),
                    to: Recipient::Controller,
                },
            )
    })?;
    Ok(())
}

fn creature(
    registry: &mut CardRegistry,
    name: &str,
    cost: &str,
    color: Option<Color>,
    (power, toughness): (i32, i32),
    extra: impl FnOnce(Card) -> Card,
) -> Result<()> {
    let id = registry.next_id();
    let mut card = Card::new(id, name, CardType::Creature)
        .with_cost(ManaCost::parse(cost)?)
        .with_pt(power, toughness);
    if let Some(color) = color {
        card = card.with_color(color);
    }
    registry.register(extra(card))?;
    Ok(())
}

fn spell(
    registry: &mut CardRegistry,
    name: &str,
    card_type: CardType,
    cost: &str,
    color: Option<Color>,
    extra: impl FnOnce(Card) -> Card,
) -> Result<()> {
    let id = registry.next_id();
    let mut card = Card::new(id, name, card_type).with_cost(ManaCost::parse(cost)?);
    if let Some(color) = color {
        card = card.with_color(color);
    }
    registry.register(extra(card))?;
    Ok(())
}

/// An Aura that enchants a creature and carries one static effect.
fn aura(
    registry: &mut CardRegistry,
    name: &str,
    cost: &str,
    color: Color,
    effect: Effect,
    extra: impl FnOnce(Card) -> Card,
) -> Result<()> {
    spell(registry, name, CardType::Enchantment, cost, Some(color), |c| {
        extra(
            c.with_subtype("Aura")
                .with_target(TargetSpec::creature())
                .with_effect(EffectSlot::Static, effect),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builds() {
        let catalog = test_catalog().unwrap();
        assert!(catalog.len() > 50);
        assert!(catalog.get_by_name("Forest").unwrap().is_land());
    }

    #[test]
    fn test_every_aura_has_enchant_target() {
        let catalog = test_catalog().unwrap();
        for card in catalog.iter().filter(|c| c.is_aura()) {
            assert!(card.needs_target(), "{} has no enchant target", card.name);
        }
    }

    #[test]
    fn test_mana_abilities() {
        let catalog = test_catalog().unwrap();
        let elves = catalog.get_by_name("Llanowar Elves").unwrap();
        assert!(elves.abilities[0].is_mana_ability());

        let fanatic = catalog.get_by_name("Mogg Fanatic").unwrap();
        assert!(!fanatic.abilities[0].is_mana_ability());
    }
}
