//! Event fan-out and effect execution. Every gameplay event flows
//! through `trigger_event`, which walks listeners in a fixed order:
//! enemy abilities by slot, then each player's class trinket, then
//! trinket slots 0..5 (primary before secondary), then on-draw card
//! tag hooks. Effects can synthesize further events; recursion is
//! depth-first and capped.

use crate::{
    select_cards, Card, DamageSource, Effect, EffectSource, GameContext, GameEvent,
    PassiveBonuses, PlayerId, StatKey, Target, TrinketInstance, DEALER_ID,
};

/// Synthesized-event recursion cap. Hitting it drops the event rather
/// than erroring so a misconfigured effect loop degrades instead of
/// crashing the round.
pub const MAX_EVENT_DEPTH: u32 = 8;

/// Which side owns the effect being executed; `Target::Owner` resolves
/// against this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOwner {
    Enemy,
    Player(PlayerId),
}

enum Side {
    Enemy,
    Player(PlayerId),
}

pub fn trigger_event(ctx: &mut GameContext, event: GameEvent) {
    trigger_event_with_cards(ctx, event, &[]);
}

/// `cards` carries the drawn cards for CardDrawn so tag hooks know the
/// receiver; every other event passes an empty slice.
pub fn trigger_event_with_cards(
    ctx: &mut GameContext,
    event: GameEvent,
    cards: &[(Card, PlayerId)],
) {
    if ctx.event_depth >= MAX_EVENT_DEPTH {
        ctx.depth_cap_hits += 1;
        log::warn!(
            "dispatch: event depth cap hit, dropping {} (hit #{})",
            event.keyword(),
            ctx.depth_cap_hits
        );
        return;
    }
    ctx.event_depth += 1;

    run_enemy_abilities(ctx, event);
    run_trinket_passives(ctx, event);
    for (card, receiver) in cards {
        run_card_tag_hooks(ctx, *card, *receiver);
    }

    ctx.event_depth -= 1;
}

fn run_enemy_abilities(ctx: &mut GameContext, event: GameEvent) {
    let ability_count = ctx.enemy.as_ref().map(|e| e.abilities.len()).unwrap_or(0);
    for index in 0..ability_count {
        // Trigger checks mutate ability scratch state, so each slot is
        // checked and snapshotted before its effects run; the effects may
        // mutate the enemy (or kill it) without invalidating the walk.
        let fired = {
            let GameContext { enemy, rng, .. } = ctx;
            let Some(enemy) = enemy.as_mut() else { break };
            let hp_fraction = enemy.hp_fraction();
            let damage_taken = enemy.total_damage_taken;
            match enemy.abilities.get_mut(index) {
                Some(ability) => {
                    if ability.check_trigger(event, hp_fraction, damage_taken, rng) {
                        Some((ability.name.clone(), ability.effects.clone()))
                    } else {
                        None
                    }
                }
                _ => None,
            }
        };
        if let Some((name, effects)) = fired {
            log::info!("ability `{name}` fires on {}", event.keyword());
            let source = EffectSource::Ability { index, name };
            for effect in &effects {
                execute_effect(ctx, &source, EffectOwner::Enemy, event, effect);
            }
        }
    }
}

fn run_trinket_passives(ctx: &mut GameContext, event: GameEvent) {
    let ids: Vec<PlayerId> = ctx
        .active_players
        .iter()
        .copied()
        .filter(|id| *id != DEALER_ID)
        .collect();
    for pid in ids {
        let fires: Vec<(EffectSource, Effect)> = {
            let Some(player) = ctx.players.get(&pid) else {
                continue;
            };
            let bet = if player.current_bet > 0 {
                player.current_bet
            } else {
                player.last_bet
            };
            let mut fires = Vec::new();

            if let Some(instance) = &player.class_trinket {
                match ctx.trinkets.get(&instance.template_key) {
                    Some(template) => {
                        if template.primary.matches(event, bet) {
                            fires.push((
                                EffectSource::ClassTrinket {
                                    key: template.key.clone(),
                                },
                                template.primary.effect.clone(),
                            ));
                        }
                        if let Some(secondary) = &template.secondary {
                            if secondary.matches(event, bet) {
                                fires.push((
                                    EffectSource::ClassTrinket {
                                        key: template.key.clone(),
                                    },
                                    secondary.effect.clone(),
                                ));
                            }
                        }
                    }
                    None => log::error!(
                        "dispatch: class trinket references unknown template `{}`",
                        instance.template_key
                    ),
                }
            }

            for (slot, instance) in player.occupied_slots() {
                let Some(template) = ctx.trinkets.get(&instance.template_key) else {
                    log::error!(
                        "dispatch: slot {slot} references unknown template `{}`",
                        instance.template_key
                    );
                    continue;
                };
                if template.primary.matches(event, bet) {
                    fires.push((
                        EffectSource::TrinketSlot {
                            slot,
                            key: template.key.clone(),
                            secondary: false,
                        },
                        template.primary.effect.clone(),
                    ));
                }
                if let Some(secondary) = &template.secondary {
                    if secondary.matches(event, bet) {
                        fires.push((
                            EffectSource::TrinketSlot {
                                slot,
                                key: template.key.clone(),
                                secondary: true,
                            },
                            secondary.effect.clone(),
                        ));
                    }
                }
            }
            fires
        };

        for (source, effect) in fires {
            execute_effect(ctx, &source, EffectOwner::Player(pid), event, &effect);
        }
    }
}

/// On-draw tag hooks for one drawn card, owned by whoever received it.
pub fn run_card_tag_hooks(ctx: &mut GameContext, card: Card, receiver: PlayerId) {
    let hooks = ctx.tags.on_draw_effects(card.id);
    for (tag, effects) in hooks {
        let source = EffectSource::CardTag {
            card_id: card.id,
            tag: tag.keyword().to_string(),
        };
        for effect in &effects {
            execute_effect(
                ctx,
                &source,
                EffectOwner::Player(receiver),
                GameEvent::CardDrawn,
                effect,
            );
        }
    }
}

/// Damage funnel for the enemy: hp, fx, stats accounting, and the
/// synthesized EnemyDamaged event all happen here and nowhere else.
pub fn apply_enemy_damage(ctx: &mut GameContext, amount: i64, source: DamageSource, is_crit: bool) {
    if amount <= 0 {
        return;
    }
    let Some(enemy) = ctx.enemy.as_mut() else {
        log::warn!("dispatch: enemy damage with no enemy in combat");
        return;
    };
    enemy.take_damage(amount);
    ctx.fx.spawn_damage_number(amount, false, is_crit);
    ctx.fx.enemy_damage_effect();
    ctx.global_stats.record_damage(source, amount);
    trigger_event(ctx, GameEvent::EnemyDamaged);
}

fn damage_source_of(source: &EffectSource) -> DamageSource {
    match source {
        EffectSource::Ability { .. } => DamageSource::Ability,
        EffectSource::CardTag { .. } => DamageSource::Tag,
        EffectSource::ClassTrinket { .. } | EffectSource::TrinketSlot { .. } => {
            DamageSource::Trinket
        }
    }
}

/// The player an owner-less effect (statuses, chips) lands on: the
/// owning player, or the primary player for enemy-owned effects.
fn affected_player(ctx: &GameContext, owner: EffectOwner) -> PlayerId {
    match owner {
        EffectOwner::Player(pid) => pid,
        EffectOwner::Enemy => ctx.primary_player(),
    }
}

fn resolve_target(ctx: &GameContext, owner: EffectOwner, target: Target) -> Side {
    match target {
        Target::Enemy => Side::Enemy,
        Target::Player => Side::Player(ctx.primary_player()),
        Target::Owner => match owner {
            EffectOwner::Enemy => Side::Enemy,
            EffectOwner::Player(pid) => Side::Player(pid),
        },
    }
}

/// The bet an AddChipsPercent/RefundChipsPercent is a percentage of:
/// the live bet during a hand, the previous bet after settlement.
fn reference_bet(ctx: &GameContext, pid: PlayerId) -> i64 {
    ctx.players
        .get(&pid)
        .map(|p| {
            if p.current_bet > 0 {
                p.current_bet
            } else {
                p.last_bet
            }
        })
        .unwrap_or(0)
}

/// Runs `f` on the trinket instance the source names, if the owner is a
/// player and the instance still exists. Returns whether it ran.
fn with_source_instance(
    ctx: &mut GameContext,
    source: &EffectSource,
    owner: EffectOwner,
    f: impl FnOnce(&mut TrinketInstance),
) -> bool {
    let EffectOwner::Player(pid) = owner else {
        return false;
    };
    let Some(player) = ctx.players.get_mut(&pid) else {
        return false;
    };
    let instance = match source {
        EffectSource::ClassTrinket { .. } => player.class_trinket.as_mut(),
        EffectSource::TrinketSlot { slot, .. } => {
            player.slots.get_mut(*slot).and_then(|s| s.as_mut())
        }
        _ => None,
    };
    match instance {
        Some(instance) => {
            f(instance);
            true
        }
        None => false,
    }
}

/// Redirects an enemy heal into damage if the primary player holds a
/// trinket with heal-punish charges left. Class trinket is consulted
/// before the slots; one charge per redirected heal.
fn try_heal_punish(ctx: &mut GameContext, amount: i64) -> bool {
    let pid = ctx.primary_player();
    let mut found = false;
    if let Some(player) = ctx.players.get_mut(&pid) {
        if let Some(instance) = player.class_trinket.as_mut() {
            if instance.heal_punish_charges > 0 {
                instance.heal_punish_charges -= 1;
                instance.damage_dealt += amount;
                found = true;
            }
        }
        if !found {
            for instance in player.slots.iter_mut().flatten() {
                if instance.heal_punish_charges > 0 {
                    instance.heal_punish_charges -= 1;
                    instance.damage_dealt += amount;
                    found = true;
                    break;
                }
            }
        }
    }
    if found {
        log::info!("heal punish: {amount} heal redirected as damage");
        apply_enemy_damage(ctx, amount, DamageSource::Trinket, false);
    }
    found
}

fn execute_effect(
    ctx: &mut GameContext,
    source: &EffectSource,
    owner: EffectOwner,
    event: GameEvent,
    effect: &Effect,
) {
    ctx.effect_log
        .record(source.clone(), event, effect.keyword().to_string());

    match effect {
        Effect::None => {}

        Effect::ApplyStatus {
            status,
            value,
            duration,
        } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.status.apply(*status, *value, *duration);
            }
        }

        Effect::RemoveStatus { status } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.status.remove(*status);
            }
        }

        Effect::Heal { amount, target } => match resolve_target(ctx, owner, *target) {
            Side::Enemy => {
                if !try_heal_punish(ctx, *amount) {
                    if let Some(enemy) = ctx.enemy.as_mut() {
                        enemy.heal(*amount);
                        ctx.fx.spawn_damage_number(*amount, true, false);
                        ctx.fx.enemy_heal_effect();
                        trigger_event(ctx, GameEvent::EnemyHeal);
                    }
                }
            }
            Side::Player(pid) => {
                // Players have no hp pool; a heal restores sanity.
                if let Some(player) = ctx.players.get_mut(&pid) {
                    player.sanity = (player.sanity + amount).min(player.max_sanity);
                }
            }
        },

        Effect::Damage { amount, target } => match resolve_target(ctx, owner, *target) {
            Side::Enemy => {
                let kind = damage_source_of(source);
                // Player-dealt damage passes the universal modifier
                // pipeline like every other damage source; enemy
                // self-damage stays raw.
                let (dealt, is_crit) = match owner {
                    EffectOwner::Player(pid) => {
                        let GameContext { players, rng, .. } = ctx;
                        players
                            .get(&pid)
                            .map(|p| {
                                p.apply_damage_modifiers(*amount, PassiveBonuses::default(), rng)
                            })
                            .unwrap_or((*amount, false))
                    }
                    EffectOwner::Enemy => (*amount, false),
                };
                apply_enemy_damage(ctx, dealt, kind, is_crit);
                with_source_instance(ctx, source, owner, |instance| {
                    instance.damage_dealt += dealt;
                });
            }
            Side::Player(pid) => {
                // Enemy-inflicted damage attacks the bankroll.
                if let Some(player) = ctx.players.get_mut(&pid) {
                    player.lose_chips(*amount);
                }
            }
        },

        Effect::ShuffleDeck => {
            let GameContext { deck, rng, .. } = ctx;
            deck.reshuffle_discard(rng);
        }

        Effect::DiscardHand => {
            let pid = affected_player(ctx, owner);
            let cards = ctx
                .players
                .get_mut(&pid)
                .map(|p| p.hand.clear())
                .unwrap_or_default();
            ctx.deck.discard_all(cards);
            ctx.tags.clear_transient();
        }

        Effect::ForceHit => {
            let pid = affected_player(ctx, owner);
            ctx.deal_card_to(pid, true, true);
        }

        Effect::RevealHole => {
            ctx.reveal_hole_card();
        }

        Effect::Message { text } => {
            ctx.fx.message(text);
        }

        Effect::AddChips { amount } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.add_chips(*amount);
            }
            with_source_instance(ctx, source, owner, |instance| {
                instance.bonus_chips += amount;
            });
        }

        Effect::AddChipsPercent { percent } => {
            let pid = affected_player(ctx, owner);
            let bonus = reference_bet(ctx, pid) * percent / 100;
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.add_chips(bonus);
            }
            with_source_instance(ctx, source, owner, |instance| {
                instance.bonus_chips += bonus;
            });
        }

        Effect::LoseChips { amount } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.lose_chips(*amount);
            }
        }

        Effect::RefundChipsPercent { percent } => {
            let pid = affected_player(ctx, owner);
            let refund = reference_bet(ctx, pid) * percent / 100;
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.add_chips(refund);
            }
            with_source_instance(ctx, source, owner, |instance| {
                instance.refunded_chips += refund;
            });
        }

        // Stat effects arriving through the event path adjust the live
        // combat stats and the grant ledger: the ledger is what a later
        // recompute folds back in. The OnEquip path goes through
        // aggregation instead.
        Effect::AddDamageFlat { amount } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.stats.add(StatKey::DamageFlat, *amount);
                player.granted_stats.add(StatKey::DamageFlat, *amount);
            }
        }

        Effect::DamageMultiplier { percent } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.stats.add(StatKey::DamagePercent, *percent);
                player.granted_stats.add(StatKey::DamagePercent, *percent);
            }
        }

        Effect::PushDamagePercent { percent } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                player.stats.add(StatKey::PushDamagePercent, *percent);
                player.granted_stats.add(StatKey::PushDamagePercent, *percent);
            }
        }

        Effect::AddTagToCards {
            tag,
            count,
            strategy,
        } => {
            let ids = {
                let GameContext { tags, rng, .. } = ctx;
                select_cards(tags, *tag, *count, *strategy, rng)
            };
            for card_id in ids {
                ctx.tags.add_tag(card_id, *tag);
            }
        }

        Effect::BuffTagDamage { tag, amount } => {
            let pid = affected_player(ctx, owner);
            if let Some(player) = ctx.players.get_mut(&pid) {
                *player.tag_damage_buffs.entry(*tag).or_insert(0) += amount;
            }
        }

        Effect::TrinketStack {
            stat,
            delta,
            max,
            on_max,
        } => {
            let mut maxed = false;
            let ran = with_source_instance(ctx, source, owner, |instance| {
                instance.stacks += 1;
                instance.stack_value = *delta;
                instance.stack_stat = Some(*stat);
                if instance.stacks >= *max {
                    instance.stacks = 0;
                    maxed = true;
                }
            });
            if !ran {
                log::error!("dispatch: trinket_stack from a non-trinket source");
                return;
            }
            if let EffectOwner::Player(pid) = owner {
                if let Some(player) = ctx.players.get_mut(&pid) {
                    player.combat_stats_dirty = true;
                }
            }
            if maxed {
                if let Some(burst) = on_max {
                    let burst = (**burst).clone();
                    execute_effect(ctx, source, owner, event, &burst);
                }
            }
        }
    }
}
