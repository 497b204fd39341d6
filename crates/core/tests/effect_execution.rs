use pontoon_core::{
    aggregate_combat_stats, dispatch, Ability, Affix, Effect, EffectSource, Enemy, FxSink,
    GameContext, GameEvent, GameRng, NullFx, PassiveTrigger, Phase, Player, RecordingFx, StatKey,
    Tag, TagStrategy, Target, Trigger, TrinketInstance, TrinketPassive, TrinketRarity,
    TrinketTemplate, DEALER_ID, HUMAN_ID,
};
use std::cell::RefCell;
use std::rc::Rc;

fn context() -> GameContext {
    let mut ctx = GameContext::new(GameRng::from_seed(17), Box::new(NullFx));
    ctx.add_player(Player::new(DEALER_ID, "Dealer", true));
    ctx.add_player(Player::new(HUMAN_ID, "Morgan", false));
    ctx
}

fn template(key: &str, trigger: PassiveTrigger, effect: Effect) -> TrinketTemplate {
    TrinketTemplate {
        key: key.to_string(),
        name: key.to_string(),
        flavor: String::new(),
        rarity: TrinketRarity::Common,
        base_value: 10,
        primary: TrinketPassive {
            trigger,
            effect,
            bet_gte: None,
        },
        secondary: None,
        stack_max: None,
        heal_punish_charges: 0,
    }
}

fn event_ability(event: GameEvent, effects: Vec<Effect>) -> Ability {
    Ability::new("test ability", Trigger::OnEvent { event }, effects)
}

#[test]
fn add_tag_to_cards_honors_the_strategy() {
    let mut ctx = context();
    ctx.spawn_enemy(Enemy::new("Tagger", 100).with_abilities(vec![event_ability(
        GameEvent::RoundStarted,
        vec![Effect::AddTagToCards {
            tag: Tag::Cursed,
            count: 0,
            strategy: TagStrategy::AllCards,
        }],
    )]));

    dispatch::trigger_event(&mut ctx, GameEvent::RoundStarted);
    assert_eq!(ctx.tags.tag_count(Tag::Cursed), 52);
}

#[test]
fn rank_strategies_tag_exact_counts() {
    let mut ctx = context();
    ctx.spawn_enemy(Enemy::new("Tagger", 100).with_abilities(vec![event_ability(
        GameEvent::RoundStarted,
        vec![
            Effect::AddTagToCards {
                tag: Tag::Lucky,
                count: 0,
                strategy: TagStrategy::RankAces,
            },
            Effect::AddTagToCards {
                tag: Tag::Jagged,
                count: 0,
                strategy: TagStrategy::RankFaceCards,
            },
        ],
    )]));

    dispatch::trigger_event(&mut ctx, GameEvent::RoundStarted);
    assert_eq!(ctx.tags.tag_count(Tag::Lucky), 4);
    assert_eq!(ctx.tags.tag_count(Tag::Jagged), 12);
}

#[test]
fn heal_punish_redirects_the_first_k_heals() {
    let mut ctx = context();
    ctx.trinkets.register(template(
        "bile_vial",
        PassiveTrigger::OnEquip,
        Effect::None,
    ));
    let mut instance = TrinketInstance::of(ctx.trinkets.get("bile_vial").unwrap());
    instance.heal_punish_charges = 2;
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(instance)
        .unwrap();

    let mut enemy = Enemy::new("Leech", 100).with_abilities(vec![event_ability(
        GameEvent::RoundStarted,
        vec![Effect::Heal {
            amount: 10,
            target: Target::Owner,
        }],
    )]);
    enemy.take_damage(50);
    ctx.spawn_enemy(enemy);

    // First two heals become damage, the third lands as a heal.
    dispatch::trigger_event(&mut ctx, GameEvent::RoundStarted);
    assert_eq!(ctx.enemy.as_ref().unwrap().current_hp, 40);
    dispatch::trigger_event(&mut ctx, GameEvent::RoundStarted);
    assert_eq!(ctx.enemy.as_ref().unwrap().current_hp, 30);
    dispatch::trigger_event(&mut ctx, GameEvent::RoundStarted);
    assert_eq!(ctx.enemy.as_ref().unwrap().current_hp, 40);

    let player = &ctx.players[&HUMAN_ID];
    let spent = player.occupied_slots().next().unwrap().1;
    assert_eq!(spent.heal_punish_charges, 0);
    assert_eq!(spent.damage_dealt, 20);
}

#[test]
fn chip_percent_effects_floor_against_the_bet() {
    let mut ctx = context();
    ctx.trinkets.register(template(
        "skim",
        PassiveTrigger::Event(GameEvent::PlayerWin),
        Effect::AddChipsPercent { percent: 50 },
    ));
    let instance = TrinketInstance::of(ctx.trinkets.get("skim").unwrap());
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(instance)
        .unwrap();

    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(33).unwrap();
    }

    dispatch::trigger_event(&mut ctx, GameEvent::PlayerWin);
    // floor(33 * 50 / 100) = 16 on top of the 67 left after the debit.
    let player = &ctx.players[&HUMAN_ID];
    assert_eq!(player.chips, 83);
    assert_eq!(player.occupied_slots().next().unwrap().1.bonus_chips, 16);
}

#[test]
fn trinket_stack_resets_at_max_and_fires_the_burst() {
    let mut ctx = context();
    ctx.trinkets.register(template(
        "tally",
        PassiveTrigger::Event(GameEvent::PlayerWin),
        Effect::TrinketStack {
            stat: StatKey::DamageFlat,
            delta: 2,
            max: 3,
            on_max: Some(Box::new(Effect::AddChips { amount: 100 })),
        },
    ));
    let instance = TrinketInstance::of(ctx.trinkets.get("tally").unwrap());
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(instance)
        .unwrap();
    let chips_before = ctx.players[&HUMAN_ID].chips;

    dispatch::trigger_event(&mut ctx, GameEvent::PlayerWin);
    dispatch::trigger_event(&mut ctx, GameEvent::PlayerWin);
    {
        let player = &ctx.players[&HUMAN_ID];
        let instance = player.occupied_slots().next().unwrap().1;
        assert_eq!(instance.stacks, 2);
        assert_eq!(instance.stack_stat, Some(StatKey::DamageFlat));
    }

    dispatch::trigger_event(&mut ctx, GameEvent::PlayerWin);
    let player = &ctx.players[&HUMAN_ID];
    let instance = player.occupied_slots().next().unwrap().1;
    assert_eq!(instance.stacks, 0);
    assert_eq!(player.chips, chips_before + 100);
}

#[test]
fn dispatch_order_is_abilities_then_trinkets_then_tags() {
    let mut ctx = context();
    ctx.spawn_enemy(Enemy::new("Watcher", 100).with_abilities(vec![event_ability(
        GameEvent::CardDrawn,
        vec![Effect::Message {
            text: "ability".into(),
        }],
    )]));

    ctx.trinkets.register(template(
        "class_eye",
        PassiveTrigger::Event(GameEvent::CardDrawn),
        Effect::Message {
            text: "class".into(),
        },
    ));
    ctx.trinkets.register(template(
        "slot_eye",
        PassiveTrigger::Event(GameEvent::CardDrawn),
        Effect::Message { text: "slot".into() },
    ));
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.class_trinket = Some(TrinketInstance {
            template_key: "class_eye".into(),
            affixes: Vec::new(),
            stacks: 0,
            stack_value: 0,
            stack_stat: None,
            heal_punish_charges: 0,
            damage_dealt: 0,
            bonus_chips: 0,
            refunded_chips: 0,
        });
    }
    let slot_instance = TrinketInstance::of(ctx.trinkets.get("slot_eye").unwrap());
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(slot_instance)
        .unwrap();

    ctx.tags.add_tag(0, Tag::Cursed);
    let card = pontoon_core::Card::from_id(0).unwrap();
    dispatch::trigger_event_with_cards(&mut ctx, GameEvent::CardDrawn, &[(card, HUMAN_ID)]);

    let kinds: Vec<&EffectSource> = ctx
        .effect_log
        .entries()
        .iter()
        .map(|record| &record.source)
        .collect();
    assert!(matches!(kinds[0], EffectSource::Ability { index: 0, .. }));
    assert!(matches!(kinds[1], EffectSource::ClassTrinket { .. }));
    assert!(matches!(
        kinds[2],
        EffectSource::TrinketSlot {
            slot: 0,
            secondary: false,
            ..
        }
    ));
    assert!(matches!(kinds[3], EffectSource::CardTag { card_id: 0, .. }));
}

#[test]
fn recursion_cap_terminates_effect_loops() {
    let mut ctx = context();
    // Damaging the enemy triggers more damage: an intentional loop.
    ctx.spawn_enemy(Enemy::new("Ouroboros", 1_000_000).with_abilities(vec![event_ability(
        GameEvent::EnemyDamaged,
        vec![Effect::Damage {
            amount: 1,
            target: Target::Owner,
        }],
    )]));

    dispatch::apply_enemy_damage(&mut ctx, 1, pontoon_core::DamageSource::Turn, false);
    assert!(ctx.depth_cap_hits > 0);
    assert!(ctx.enemy.as_ref().unwrap().total_damage_taken <= 16);
}

#[test]
fn status_effects_from_abilities_land_on_the_player() {
    let mut ctx = context();
    ctx.spawn_enemy(Enemy::new("Loan Shark", 50).with_abilities(vec![event_ability(
        GameEvent::RoundStarted,
        vec![Effect::ApplyStatus {
            status: pontoon_core::StatusKind::ChipDrain,
            value: 5,
            duration: 3,
        }],
    )]));

    dispatch::trigger_event(&mut ctx, GameEvent::RoundStarted);
    assert!(ctx.players[&HUMAN_ID]
        .status
        .has(pontoon_core::StatusKind::ChipDrain));
    assert!(!ctx.players[&DEALER_ID]
        .status
        .has(pontoon_core::StatusKind::ChipDrain));
}

#[test]
fn trinket_damage_passes_the_modifier_pipeline() {
    let mut ctx = context();
    ctx.trinkets.register(template(
        "shiv",
        PassiveTrigger::Event(GameEvent::PlayerWin),
        Effect::Damage {
            amount: 5,
            target: Target::Enemy,
        },
    ));
    let mut instance = TrinketInstance::of(ctx.trinkets.get("shiv").unwrap());
    instance.affixes.push(Affix {
        stat_key: StatKey::DamageFlat,
        value: 3,
    });
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(instance)
        .unwrap();
    let registry = ctx.trinkets.clone();
    aggregate_combat_stats(ctx.players.get_mut(&HUMAN_ID).unwrap(), &registry);
    ctx.spawn_enemy(Enemy::new("Dummy", 100));

    dispatch::trigger_event(&mut ctx, GameEvent::PlayerWin);
    // 5 base + 3 flat, both through the shared pipeline.
    assert_eq!(ctx.enemy.as_ref().unwrap().current_hp, 92);
    let player = &ctx.players[&HUMAN_ID];
    assert_eq!(player.occupied_slots().next().unwrap().1.damage_dealt, 8);
}

#[test]
fn event_granted_stats_survive_a_recompute() {
    let mut ctx = context();
    ctx.trinkets.register(template(
        "whetstone",
        PassiveTrigger::Event(GameEvent::PlayerWin),
        Effect::AddDamageFlat { amount: 4 },
    ));
    let instance = TrinketInstance::of(ctx.trinkets.get("whetstone").unwrap());
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(instance)
        .unwrap();

    dispatch::trigger_event(&mut ctx, GameEvent::PlayerWin);
    assert_eq!(ctx.players[&HUMAN_ID].stats.damage_flat, 4);

    // Equipping another trinket forces a stat recompute; the grant must
    // survive it.
    ctx.trinkets
        .register(template("pin", PassiveTrigger::OnEquip, Effect::None));
    let pin = TrinketInstance::of(ctx.trinkets.get("pin").unwrap());
    ctx.players
        .get_mut(&HUMAN_ID)
        .unwrap()
        .equip_trinket(pin)
        .unwrap();
    let registry = ctx.trinkets.clone();
    aggregate_combat_stats(ctx.players.get_mut(&HUMAN_ID).unwrap(), &registry);
    assert_eq!(ctx.players[&HUMAN_ID].stats.damage_flat, 4);
}

struct SharedFx(Rc<RefCell<RecordingFx>>);

impl FxSink for SharedFx {
    fn spawn_damage_number(&mut self, amount: i64, is_healing: bool, is_crit: bool) {
        self.0
            .borrow_mut()
            .spawn_damage_number(amount, is_healing, is_crit);
    }

    fn enemy_damage_effect(&mut self) {
        self.0.borrow_mut().enemy_damage_effect();
    }

    fn enemy_heal_effect(&mut self) {
        self.0.borrow_mut().enemy_heal_effect();
    }

    fn enemy_defeat_animation(&mut self) {
        self.0.borrow_mut().enemy_defeat_animation();
    }

    fn message(&mut self, text: &str) {
        self.0.borrow_mut().message(text);
    }
}

#[test]
fn damage_and_defeat_reach_the_fx_sink() {
    let recording = Rc::new(RefCell::new(RecordingFx::default()));
    let mut ctx = GameContext::new(
        GameRng::from_seed(17),
        Box::new(SharedFx(recording.clone())),
    );
    ctx.add_player(Player::new(DEALER_ID, "Dealer", true));
    ctx.add_player(Player::new(HUMAN_ID, "Morgan", false));
    ctx.spawn_enemy(Enemy::new("Dummy", 10));

    dispatch::apply_enemy_damage(&mut ctx, 10, pontoon_core::DamageSource::Turn, false);
    ctx.transition(Phase::CombatVictory);

    let fx = recording.borrow();
    assert_eq!(fx.damage_numbers, vec![(10, false, false)]);
    assert_eq!(fx.defeat_animations, 1);
}
