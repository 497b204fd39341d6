//! Config loaders. Each loader reads one file, parses it, and converts
//! the raw forms into core registry types. Validation is all-or-nothing
//! per file: the first offending entry rejects the whole file with a
//! message naming the file and key.

use crate::schema::{
    EnemyFile, RawAbility, RawEffect, RawEnemy, RawTag, RawTrigger, RawTrinket, TagFile,
    TrinketFile,
};
use anyhow::{bail, Context, Result};
use pontoon_core::{
    Ability, Effect, EnemyTemplate, GameEvent, PassiveTrigger, PlayerAction, StatKey, StatusKind,
    Tag, TagDef, TagRegistry, TagStrategy, TagTrigger, Target, Trigger, TrinketPassive,
    TrinketRarity, TrinketRegistry, TrinketTemplate,
};
use std::fs;
use std::path::Path;

const DEFAULT_SEGMENT_PERCENT: u32 = 25;
const DEFAULT_DAMAGE_THRESHOLD: i64 = 1000;

pub fn load_enemies(path: impl AsRef<Path>) -> Result<Vec<EnemyTemplate>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading enemy file {}", path.display()))?;
    let file: EnemyFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing enemy file {}", path.display()))?;

    let mut templates = Vec::with_capacity(file.enemies.len());
    for raw in file.enemies {
        let template = convert_enemy(raw)
            .with_context(|| format!("in enemy file {}", path.display()))?;
        templates.push(template);
    }
    log::info!("loaded {} enemies from {}", templates.len(), path.display());
    Ok(templates)
}

pub fn load_trinkets(path: impl AsRef<Path>, registry: &mut TrinketRegistry) -> Result<usize> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading trinket file {}", path.display()))?;
    let file: TrinketFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing trinket file {}", path.display()))?;

    let mut loaded = 0;
    for raw in file.trinkets {
        let key = raw.key.clone();
        let template = convert_trinket(raw)
            .with_context(|| format!("trinket `{key}` in {}", path.display()))?;
        if !registry.register(template) {
            bail!("duplicate trinket key `{key}` in {}", path.display());
        }
        loaded += 1;
    }
    log::info!("loaded {loaded} trinkets from {}", path.display());
    Ok(loaded)
}

pub fn load_card_tags(path: impl AsRef<Path>, registry: &mut TagRegistry) -> Result<usize> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading tag file {}", path.display()))?;
    let file: TagFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing tag file {}", path.display()))?;

    let mut loaded = 0;
    for raw in file.tags {
        let key = raw.tag.clone();
        let def =
            convert_tag(raw).with_context(|| format!("tag `{key}` in {}", path.display()))?;
        registry.install_def(def);
        loaded += 1;
    }
    log::info!("loaded {loaded} tag definitions from {}", path.display());
    Ok(loaded)
}

fn convert_enemy(raw: RawEnemy) -> Result<EnemyTemplate> {
    if raw.hp <= 0 {
        bail!("enemy `{}`: hp must be positive, got {}", raw.name, raw.hp);
    }
    if raw.abilities.is_empty() {
        bail!("enemy `{}`: abilities must not be empty", raw.name);
    }
    let mut abilities = Vec::with_capacity(raw.abilities.len());
    for raw_ability in raw.abilities {
        let name = raw_ability.name.clone();
        abilities.push(
            convert_ability(raw_ability).with_context(|| format!("ability `{name}`"))?,
        );
    }
    Ok(EnemyTemplate {
        name: raw.name,
        description: raw.description,
        hp: raw.hp,
        abilities,
    })
}

fn convert_ability(raw: RawAbility) -> Result<Ability> {
    if raw.effects.is_empty() {
        bail!("effects must not be empty");
    }
    if raw.cooldown < 0 {
        bail!("cooldown must be >= 0, got {}", raw.cooldown);
    }
    let trigger = convert_trigger(&raw.trigger)?;
    let mut effects = Vec::with_capacity(raw.effects.len());
    for raw_effect in &raw.effects {
        effects.push(convert_effect(raw_effect)?);
    }
    let mut ability = Ability::new(raw.name, trigger, effects)
        .with_cooldown(raw.cooldown as u32);
    ability.description = raw.description;
    Ok(ability)
}

fn convert_trigger(raw: &RawTrigger) -> Result<Trigger> {
    let event = |field: &Option<String>| -> Result<GameEvent> {
        let keyword = field
            .as_deref()
            .with_context(|| format!("trigger `{}` requires `event`", raw.kind))?;
        GameEvent::from_keyword(keyword)
            .with_context(|| format!("unknown event keyword `{keyword}`"))
    };

    Ok(match raw.kind.as_str() {
        "passive" => Trigger::Passive,
        "on_event" => Trigger::OnEvent {
            event: event(&raw.event)?,
        },
        "counter" => {
            let count = raw.count.context("trigger `counter` requires `count`")?;
            if count == 0 {
                bail!("counter count must be >= 1");
            }
            Trigger::Counter {
                event: event(&raw.event)?,
                count,
            }
        }
        "hp_threshold" => {
            let threshold = raw
                .threshold
                .context("trigger `hp_threshold` requires `threshold`")?;
            if !(0.0..=1.0).contains(&threshold) {
                bail!("threshold must be in [0, 1], got {threshold}");
            }
            Trigger::HpThreshold {
                threshold,
                once: raw.once.unwrap_or(true),
            }
        }
        "random" => {
            let chance = raw.chance.context("trigger `random` requires `chance`")?;
            if !(0.0..=1.0).contains(&chance) {
                bail!("chance must be in [0, 1], got {chance}");
            }
            Trigger::Random {
                event: event(&raw.event)?,
                chance,
            }
        }
        "on_action" => {
            let keyword = raw
                .action
                .as_deref()
                .context("trigger `on_action` requires `action`")?;
            let action = PlayerAction::from_keyword(keyword)
                .with_context(|| format!("unknown action keyword `{keyword}`"))?;
            Trigger::OnAction { action }
        }
        "hp_segment" => {
            let segment_percent = raw.segment_percent.unwrap_or(DEFAULT_SEGMENT_PERCENT);
            if !(1..=100).contains(&segment_percent) {
                bail!("segment_percent must be in [1, 100], got {segment_percent}");
            }
            Trigger::HpSegment { segment_percent }
        }
        "damage_accumulator" => {
            let damage_threshold = raw.damage_threshold.unwrap_or(DEFAULT_DAMAGE_THRESHOLD);
            if damage_threshold <= 0 {
                bail!("damage_threshold must be positive, got {damage_threshold}");
            }
            Trigger::DamageAccumulator { damage_threshold }
        }
        other => bail!("unknown trigger type `{other}`"),
    })
}

fn convert_effect(raw: &RawEffect) -> Result<Effect> {
    let status = |field: &Option<String>| -> Result<StatusKind> {
        let keyword = field
            .as_deref()
            .with_context(|| format!("effect `{}` requires `status`", raw.kind))?;
        StatusKind::from_keyword(keyword)
            .with_context(|| format!("unknown status keyword `{keyword}`"))
    };
    let target = || -> Result<Target> {
        let keyword = raw
            .target
            .as_deref()
            .with_context(|| format!("effect `{}` requires explicit `target`", raw.kind))?;
        Target::from_keyword(keyword)
            .with_context(|| format!("unknown target keyword `{keyword}`"))
    };
    let tag = || -> Result<Tag> {
        let keyword = raw
            .tag
            .as_deref()
            .with_context(|| format!("effect `{}` requires `tag`", raw.kind))?;
        Tag::from_keyword(keyword).with_context(|| format!("unknown tag keyword `{keyword}`"))
    };
    let amount = || -> Result<i64> {
        raw.amount
            .with_context(|| format!("effect `{}` requires `amount`", raw.kind))
    };
    let percent = || -> Result<i64> {
        raw.percent
            .with_context(|| format!("effect `{}` requires `percent`", raw.kind))
    };

    Ok(match raw.kind.as_str() {
        "none" => Effect::None,
        "apply_status" => Effect::ApplyStatus {
            status: status(&raw.status)?,
            value: raw.value.unwrap_or(0),
            duration: raw.duration.unwrap_or(1),
        },
        "remove_status" => Effect::RemoveStatus {
            status: status(&raw.status)?,
        },
        "heal" => Effect::Heal {
            amount: amount()?,
            target: target()?,
        },
        "damage" => Effect::Damage {
            amount: amount()?,
            target: target()?,
        },
        "shuffle_deck" => Effect::ShuffleDeck,
        "discard_hand" => Effect::DiscardHand,
        "force_hit" => Effect::ForceHit,
        "reveal_hole" => Effect::RevealHole,
        "message" => Effect::Message {
            text: raw
                .text
                .clone()
                .context("effect `message` requires `text`")?,
        },
        "add_chips" => Effect::AddChips { amount: amount()? },
        "add_chips_percent" => Effect::AddChipsPercent { percent: percent()? },
        "lose_chips" => Effect::LoseChips { amount: amount()? },
        "refund_chips_percent" => Effect::RefundChipsPercent { percent: percent()? },
        "add_damage_flat" => Effect::AddDamageFlat { amount: amount()? },
        "damage_multiplier" => Effect::DamageMultiplier { percent: percent()? },
        "push_damage_percent" => Effect::PushDamagePercent { percent: percent()? },
        "add_tag_to_cards" => {
            let strategy_keyword = raw.strategy.as_deref().unwrap_or("random");
            let strategy = TagStrategy::from_keyword(strategy_keyword)
                .with_context(|| format!("unknown strategy keyword `{strategy_keyword}`"))?;
            Effect::AddTagToCards {
                tag: tag()?,
                count: raw.count.unwrap_or(1),
                strategy,
            }
        }
        "buff_tag_damage" => Effect::BuffTagDamage {
            tag: tag()?,
            amount: amount()?,
        },
        "trinket_stack" => {
            let stat_keyword = raw
                .stat
                .as_deref()
                .context("effect `trinket_stack` requires `stat`")?;
            let stat = StatKey::from_keyword(stat_keyword)
                .with_context(|| format!("unknown stat keyword `{stat_keyword}`"))?;
            let max = raw.max.context("effect `trinket_stack` requires `max`")?;
            if max <= 0 {
                bail!("trinket_stack max must be positive, got {max}");
            }
            let on_max = match &raw.on_max {
                Some(inner) => Some(Box::new(convert_effect(inner)?)),
                None => None,
            };
            Effect::TrinketStack {
                stat,
                delta: raw
                    .delta
                    .context("effect `trinket_stack` requires `delta`")?,
                max,
                on_max,
            }
        }
        other => bail!("unknown effect type `{other}`"),
    })
}

fn convert_tag(raw: RawTag) -> Result<TagDef> {
    let tag = Tag::from_keyword(&raw.tag)
        .with_context(|| format!("unknown tag keyword `{}`", raw.tag))?;
    let trigger = match raw.trigger.kind.as_str() {
        "on_draw" => TagTrigger::OnDraw,
        "passive" => TagTrigger::Passive,
        other => bail!("unknown tag trigger type `{other}`"),
    };
    for (channel, value) in [
        ("color_r", raw.color_r),
        ("color_g", raw.color_g),
        ("color_b", raw.color_b),
    ] {
        if !(0..=255).contains(&value) {
            bail!("{channel} must be in [0, 255], got {value}");
        }
    }
    if raw.effects.is_empty() {
        bail!("effects must not be empty");
    }
    let mut effects = Vec::with_capacity(raw.effects.len());
    for raw_effect in &raw.effects {
        effects.push(convert_effect(raw_effect)?);
    }
    Ok(TagDef {
        tag,
        display_name: raw.display_name,
        description: raw.description,
        color: [raw.color_r as u8, raw.color_g as u8, raw.color_b as u8],
        trigger,
        duration: raw.trigger.duration,
        effects,
    })
}

fn convert_trinket(raw: RawTrinket) -> Result<TrinketTemplate> {
    let rarity = TrinketRarity::from_keyword(&raw.rarity)
        .with_context(|| format!("unknown rarity keyword `{}`", raw.rarity))?;

    let primary = convert_passive(
        &raw.passive_trigger,
        &raw.passive_effect_type,
        raw.passive_effect_value,
        &raw.passive_status,
        raw.passive_status_duration,
        &raw.passive_tag,
        &raw.passive_target,
        &raw.passive_text,
        raw.passive_condition_bet_gte,
        &raw,
    )
    .context("primary passive")?;

    let secondary = match (&raw.passive_trigger_2, &raw.passive_effect_type_2) {
        (Some(trigger), Some(effect_type)) => Some(
            convert_passive(
                trigger,
                effect_type,
                raw.passive_effect_value_2,
                &raw.passive_status_2,
                raw.passive_status_duration_2,
                &raw.passive_tag_2,
                &raw.passive_target_2,
                &raw.passive_text_2,
                // Secondary passives carry no bet condition of their own.
                None,
                &raw,
            )
            .context("secondary passive")?,
        ),
        (None, None) => None,
        _ => bail!("secondary passive requires both `passive_trigger_2` and `passive_effect_type_2`"),
    };

    Ok(TrinketTemplate {
        key: raw.key,
        name: raw.name,
        flavor: raw.flavor,
        rarity,
        base_value: raw.base_value,
        primary,
        secondary,
        stack_max: raw.stack_max,
        heal_punish_charges: raw.heal_punish_charges,
    })
}

#[allow(clippy::too_many_arguments)]
fn convert_passive(
    trigger: &str,
    effect_type: &str,
    effect_value: Option<i64>,
    status: &Option<String>,
    status_duration: Option<i64>,
    tag: &Option<String>,
    target: &Option<String>,
    text: &Option<String>,
    bet_gte: Option<i64>,
    raw: &RawTrinket,
) -> Result<TrinketPassive> {
    let trigger = if trigger == "ON_EQUIP" {
        PassiveTrigger::OnEquip
    } else {
        let event = GameEvent::from_keyword(trigger)
            .with_context(|| format!("unknown passive trigger `{trigger}`"))?;
        PassiveTrigger::Event(event)
    };

    // The flat layout routes all numeric payloads through one value
    // field; rebuild the nested form and reuse the effect converter.
    let raw_effect = RawEffect {
        kind: effect_type.to_string(),
        status: status.clone(),
        value: effect_value,
        duration: status_duration,
        amount: effect_value,
        percent: effect_value,
        target: target.clone(),
        text: text.clone(),
        tag: tag.clone(),
        count: None,
        strategy: None,
        stat: raw.stack_stat.clone(),
        delta: raw.stack_delta,
        max: raw.stack_max,
        on_max: raw.on_max_type.as_ref().map(|kind| {
            Box::new(RawEffect {
                kind: kind.clone(),
                status: None,
                value: raw.on_max_value,
                duration: None,
                amount: raw.on_max_value,
                percent: raw.on_max_value,
                target: None,
                text: None,
                tag: None,
                count: None,
                strategy: None,
                stat: None,
                delta: None,
                max: None,
                on_max: None,
            })
        }),
    };
    let effect = convert_effect(&raw_effect)?;

    Ok(TrinketPassive {
        trigger,
        effect,
        bet_gte,
    })
}
