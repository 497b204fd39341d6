use crate::dispatch::{self, run_card_tag_hooks, trigger_event, trigger_event_with_cards};
use crate::{
    aggregate_combat_stats, Card, CombatStats, DamageSource, Deck, EffectLog, Enemy,
    EnemyTemplate, EventEncounter, EventPool, FxSink, GameError, GameEvent, GameRng, GlobalStats,
    Player, PlayerAction, PlayerId, PlayerState, RerollEconomy, Requirement, RequirementContext,
    TagRegistry, TrinketInstance, TrinketRegistry, DEALER_ID,
};

pub const DEALING_DELAY: f64 = 1.0;
pub const AI_THINK_DELAY: f64 = 1.0;
pub const PLAYER_ACTION_DELAY: f64 = 0.8;
pub const DEALER_ACTION_DELAY: f64 = 0.8;
pub const ROUND_END_DELAY: f64 = 2.0;
pub const EVENT_PREVIEW_DELAY: f64 = 2.0;
/// Enemy damage per point of winning hand total.
pub const DAMAGE_SCALER: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    IntroNarrative,
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Showdown,
    RoundEnd,
    CombatVictory,
    RewardScreen,
    CombatPreview,
    EventPreview,
    Event,
    Targeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerPhase {
    CheckReveal,
    Decide,
    Action,
    Wait,
}

/// Transient per-phase flags; reset when the owning phase is entered.
#[derive(Debug, Clone, Copy)]
pub struct Scratch {
    pub player_stood: bool,
    pub dealer_phase: DealerPhase,
    pub dealer_action_hit: bool,
    pub dealer_stood: bool,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            player_stood: false,
            dealer_phase: DealerPhase::CheckReveal,
            dealer_action_hit: false,
            dealer_stood: false,
        }
    }
}

/// Owns everything the simulation mutates: players, enemy, deck,
/// registries, rng, and the state-machine variables. The outer frame
/// loop drives it with `update(dt)`; UIs call the action methods.
pub struct GameContext {
    pub rng: GameRng,
    pub deck: Deck,
    pub tags: TagRegistry,
    pub trinkets: TrinketRegistry,
    pub enemy_templates: Vec<EnemyTemplate>,
    pub players: std::collections::BTreeMap<PlayerId, Player>,
    pub active_players: Vec<PlayerId>,
    pub enemy: Option<Enemy>,
    pub combat_mode: bool,
    pub next_hp_multiplier: f64,
    pub phase: Phase,
    pub prev_phase: Phase,
    pub phase_timer: f64,
    pub round: u32,
    pub current_player_index: usize,
    pub scratch: Scratch,
    pub event_pool: EventPool,
    pub current_event: Option<EventEncounter>,
    pub last_event_index: Option<usize>,
    pub reroll: RerollEconomy,
    pub effect_log: EffectLog,
    pub event_depth: u32,
    pub depth_cap_hits: u32,
    pub fx: Box<dyn FxSink>,
    pub global_stats: GlobalStats,
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("combat_mode", &self.combat_mode)
            .field("players", &self.active_players)
            .finish()
    }
}

impl GameContext {
    pub fn new(rng: GameRng, fx: Box<dyn FxSink>) -> Self {
        let mut deck = Deck::standard52();
        let mut rng = rng;
        deck.shuffle(&mut rng);
        Self {
            rng,
            deck,
            tags: TagRegistry::new(),
            trinkets: TrinketRegistry::new(),
            enemy_templates: Vec::new(),
            players: std::collections::BTreeMap::new(),
            active_players: Vec::new(),
            enemy: None,
            combat_mode: false,
            next_hp_multiplier: 1.0,
            phase: Phase::Menu,
            prev_phase: Phase::Menu,
            phase_timer: 0.0,
            round: 0,
            current_player_index: 0,
            scratch: Scratch::default(),
            event_pool: EventPool::new(),
            current_event: None,
            last_event_index: None,
            reroll: RerollEconomy::default(),
            effect_log: EffectLog::default(),
            event_depth: 0,
            depth_cap_hits: 0,
            fx,
            global_stats: GlobalStats::default(),
        }
    }

    pub fn add_player(&mut self, player: Player) {
        let id = player.id;
        self.players.insert(id, player);
        if !self.active_players.contains(&id) {
            self.active_players.push(id);
            self.active_players.sort();
        }
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(&id).ok_or(GameError::UnknownPlayer(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(&id)
            .ok_or(GameError::UnknownPlayer(id))
    }

    /// First non-dealer active player; effects addressed to "the player"
    /// land here.
    pub fn primary_player(&self) -> PlayerId {
        self.active_players
            .iter()
            .copied()
            .find(|id| *id != DEALER_ID)
            .unwrap_or(crate::HUMAN_ID)
    }

    fn non_dealer_ids(&self) -> Vec<PlayerId> {
        self.active_players
            .iter()
            .copied()
            .filter(|id| *id != DEALER_ID)
            .collect()
    }

    // ------------------------------------------------------------------
    // Combat lifecycle
    // ------------------------------------------------------------------

    /// Spawns the enemy (consuming any pending hp multiplier from events)
    /// and opens the betting loop.
    pub fn start_combat(&mut self, template_index: usize) -> Result<(), GameError> {
        let template = self
            .enemy_templates
            .get(template_index)
            .ok_or(GameError::UnknownTemplate(template_index))?;
        let enemy = template.spawn(self.next_hp_multiplier);
        self.next_hp_multiplier = 1.0;
        self.enemy = Some(enemy);
        self.combat_mode = true;
        self.round = 1;

        for id in self.non_dealer_ids() {
            if let Some(player) = self.players.get_mut(&id) {
                player.tag_damage_buffs.clear();
                player.granted_stats = CombatStats::default();
                player.combat_stats_dirty = true;
            }
        }
        self.refresh_dirty_stats();

        trigger_event(self, GameEvent::CombatStart);
        self.transition(Phase::Betting);
        Ok(())
    }

    pub fn spawn_enemy(&mut self, enemy: Enemy) {
        self.enemy = Some(enemy);
        self.combat_mode = true;
    }

    fn refresh_dirty_stats(&mut self) {
        let Self {
            players, trinkets, ..
        } = self;
        for player in players.values_mut() {
            if player.combat_stats_dirty {
                aggregate_combat_stats(player, trinkets);
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase machine
    // ------------------------------------------------------------------

    pub fn transition(&mut self, next: Phase) {
        self.prev_phase = self.phase;
        self.phase = next;
        self.phase_timer = 0.0;
        self.enter_phase(next);
    }

    fn enter_phase(&mut self, phase: Phase) {
        match phase {
            Phase::Betting => self.enter_betting(),
            Phase::Dealing => self.enter_dealing(),
            Phase::PlayerTurn => self.enter_player_turn(),
            Phase::DealerTurn => {
                self.scratch.dealer_phase = DealerPhase::CheckReveal;
                self.scratch.dealer_action_hit = false;
                self.scratch.dealer_stood = false;
            }
            Phase::Showdown => self.resolve_showdown(),
            Phase::RoundEnd => {
                trigger_event(self, GameEvent::RoundEnded);
            }
            Phase::CombatVictory => self.enter_combat_victory(),
            _ => {}
        }
    }

    fn enter_betting(&mut self) {
        // Previous hand's cards go to the discard pile; transient tags
        // cannot survive a hand reset.
        for id in self.active_players.clone() {
            if let Some(player) = self.players.get_mut(&id) {
                let cards = player.hand.clear();
                self.deck.discard_all(cards);
            }
        }
        self.tags.clear_transient();
        self.scratch = Scratch::default();
        self.refresh_dirty_stats();

        for id in self.non_dealer_ids() {
            let Some(player) = self.players.get_mut(&id) else {
                continue;
            };
            player.state = PlayerState::Betting;
            let drain = player.status.round_start_drain(player.chips);
            if drain > 0 {
                player.lose_chips(drain);
                self.global_stats.record_chips_drained(drain);
                log::info!("player {}: chip drain bled {drain} chips", id.0);
            }
        }

        trigger_event(self, GameEvent::RoundStarted);
        trigger_event(self, GameEvent::BettingStarted);
    }

    fn enter_dealing(&mut self) {
        // Two cards each; the dealer's first card stays face-down and its
        // on-draw tag hooks wait for the reveal.
        for _ in 0..2 {
            for id in self.non_dealer_ids() {
                self.deal_card_to(id, true, true);
            }
        }
        let dealer_needs_cards = self
            .players
            .get(&DEALER_ID)
            .map(|d| d.hand.is_empty())
            .unwrap_or(false);
        if dealer_needs_cards {
            self.deal_card_to(DEALER_ID, false, false);
            self.deal_card_to(DEALER_ID, true, true);
        }
    }

    fn enter_player_turn(&mut self) {
        self.current_player_index = 0;
        for id in self.non_dealer_ids() {
            let Some(player) = self.players.get_mut(&id) else {
                continue;
            };
            if player.hand.is_blackjack {
                player.state = PlayerState::Blackjack;
            } else {
                player.state = PlayerState::Playing;
            }
        }
        let blackjacks: Vec<PlayerId> = self
            .non_dealer_ids()
            .into_iter()
            .filter(|id| {
                self.players
                    .get(id)
                    .map(|p| p.state == PlayerState::Blackjack)
                    .unwrap_or(false)
            })
            .collect();
        for _ in blackjacks {
            trigger_event(self, GameEvent::PlayerBlackjack);
        }
    }

    fn enter_combat_victory(&mut self) {
        // Reaching here with the flag unset is an invariant violation;
        // self-heal and keep the event chain intact.
        if let Some(enemy) = self.enemy.as_mut() {
            if enemy.current_hp <= 0 && !enemy.is_defeated {
                log::warn!("enemy `{}` at 0 hp without defeat flag; repairing", enemy.name);
                enemy.is_defeated = true;
            }
        }
        self.fx.enemy_defeat_animation();
        self.global_stats.combats_won += 1;
        for id in self.non_dealer_ids() {
            if let Some(player) = self.players.get_mut(&id) {
                player.status.clear_all();
            }
        }
        self.combat_mode = false;
    }

    /// One cooperative tick. All "delays" are phase timers; nothing
    /// blocks.
    pub fn update(&mut self, dt: f64) {
        self.phase_timer += dt;
        match self.phase {
            Phase::Betting => self.update_betting(),
            Phase::Dealing => {
                if self.phase_timer >= DEALING_DELAY {
                    self.transition(Phase::PlayerTurn);
                }
            }
            Phase::PlayerTurn => self.update_player_turn(),
            Phase::DealerTurn => self.update_dealer_turn(),
            Phase::RoundEnd => {
                if self.phase_timer >= ROUND_END_DELAY {
                    self.finish_round();
                }
            }
            Phase::CombatVictory => {
                if self.phase_timer >= ROUND_END_DELAY {
                    self.transition(Phase::RewardScreen);
                }
            }
            Phase::EventPreview => {
                if self.phase_timer >= EVENT_PREVIEW_DELAY {
                    self.open_event();
                }
            }
            _ => {}
        }
    }

    fn update_betting(&mut self) {
        // AI players drop a uniform bet each tick until covered.
        for id in self.non_dealer_ids() {
            let is_ai_unbet = self
                .players
                .get(&id)
                .map(|p| p.is_ai && p.current_bet == 0 && p.chips > 0)
                .unwrap_or(false);
            if is_ai_unbet {
                let desired = self.rng.int_in(10, 100);
                if let Err(err) = self.place_player_bet(id, desired) {
                    log::error!("ai bet failed for player {}: {err}", id.0);
                }
            }
        }

        let all_bet = self.non_dealer_ids().iter().all(|id| {
            self.players
                .get(id)
                .map(|p| p.current_bet > 0 || p.chips == 0)
                .unwrap_or(true)
        });
        if all_bet && !self.non_dealer_ids().is_empty() {
            self.transition(Phase::Dealing);
        }
    }

    /// Applies status pressure to the desired amount, then debits it.
    pub fn place_player_bet(&mut self, id: PlayerId, desired: i64) -> Result<i64, GameError> {
        let (chips, last_bet, status) = {
            let player = self.player(id)?;
            (player.chips, player.last_bet, player.status.clone())
        };
        let shaped = status.modify_bet(desired, chips, last_bet, &mut self.rng);
        let amount = status.minimum_bet(shaped).min(chips);
        let player = self.player_mut(id)?;
        player.place_bet(amount)?;
        player.state = PlayerState::Waiting;
        self.global_stats.record_chips_bet(amount);
        Ok(amount)
    }

    fn update_player_turn(&mut self) {
        let ids = self.non_dealer_ids();
        let Some(&current) = ids.get(self.current_player_index) else {
            self.transition(Phase::DealerTurn);
            return;
        };
        let (state, is_ai) = match self.players.get(&current) {
            Some(p) => (p.state, p.is_ai),
            None => {
                self.current_player_index += 1;
                return;
            }
        };

        match state {
            PlayerState::Stood | PlayerState::Busted | PlayerState::Blackjack => {
                if self.phase_timer >= PLAYER_ACTION_DELAY {
                    self.current_player_index += 1;
                    self.phase_timer = 0.0;
                    if self.current_player_index >= ids.len() {
                        self.transition(Phase::DealerTurn);
                    }
                }
            }
            PlayerState::Playing if is_ai => {
                if self.phase_timer >= AI_THINK_DELAY {
                    let action = self.basic_strategy(current);
                    if let Err(err) = self.player_action(current, action) {
                        log::error!("ai action failed for player {}: {err}", current.0);
                    }
                    self.phase_timer = 0.0;
                }
            }
            _ => {}
        }
    }

    /// Dealer up-card driven basic strategy for AI players: hit at 11 or
    /// less, stand at 17 or more, and in between hit only into a strong
    /// up-card (7+).
    fn basic_strategy(&self, id: PlayerId) -> PlayerAction {
        let total = self
            .players
            .get(&id)
            .map(|p| p.hand.total_value)
            .unwrap_or(0);
        if total <= 11 {
            return PlayerAction::Hit;
        }
        if total >= 17 {
            return PlayerAction::Stand;
        }
        let up_value = self.dealer_up_card().map(|c| c.rank.value()).unwrap_or(10);
        if up_value >= 7 {
            PlayerAction::Hit
        } else {
            PlayerAction::Stand
        }
    }

    pub fn dealer_up_card(&self) -> Option<Card> {
        self.players
            .get(&DEALER_ID)
            .and_then(|d| d.hand.cards.iter().find(|c| c.face_up).copied())
    }

    /// Human or AI action entry point during PlayerTurn.
    pub fn player_action(&mut self, id: PlayerId, action: PlayerAction) -> Result<(), GameError> {
        if self.phase != Phase::PlayerTurn {
            log::error!("player_action outside PlayerTurn phase");
            return Ok(());
        }
        match action {
            PlayerAction::Hit => {
                self.deal_card_to(id, true, true);
                trigger_event(self, GameEvent::PlayerHit);
                self.settle_after_draw(id);
            }
            PlayerAction::Stand => {
                let player = self.player_mut(id)?;
                player.state = PlayerState::Stood;
                self.scratch.player_stood = true;
                trigger_event(self, GameEvent::PlayerStand);
            }
            PlayerAction::Double => {
                let (bet, chips, can_adjust) = {
                    let player = self.player(id)?;
                    (
                        player.current_bet,
                        player.chips,
                        player.status.can_adjust_bet(),
                    )
                };
                if !can_adjust || chips < bet {
                    log::error!("player {}: double rejected", id.0);
                    return Err(GameError::InvalidBet {
                        amount: bet * 2,
                        chips,
                    });
                }
                {
                    let player = self.player_mut(id)?;
                    player.chips -= bet;
                    player.current_bet += bet;
                }
                self.global_stats.record_chips_bet(bet);
                self.deal_card_to(id, true, true);
                trigger_event(self, GameEvent::PlayerDouble);
                let player = self.player_mut(id)?;
                if player.state != PlayerState::Busted {
                    player.state = PlayerState::Stood;
                    self.scratch.player_stood = true;
                }
                self.settle_after_draw(id);
            }
        }
        Ok(())
    }

    fn settle_after_draw(&mut self, id: PlayerId) {
        let busted = self
            .players
            .get(&id)
            .map(|p| p.hand.is_bust)
            .unwrap_or(false);
        if busted {
            if let Some(player) = self.players.get_mut(&id) {
                player.state = PlayerState::Busted;
            }
            trigger_event(self, GameEvent::PlayerBust);
        }
    }

    fn update_dealer_turn(&mut self) {
        match self.scratch.dealer_phase {
            DealerPhase::CheckReveal => {
                let all_busted = self.non_dealer_ids().iter().all(|id| {
                    self.players
                        .get(id)
                        .map(|p| p.state == PlayerState::Busted)
                        .unwrap_or(true)
                });
                if self.scratch.player_stood || all_busted {
                    self.reveal_hole_card();
                }
                self.scratch.dealer_phase = DealerPhase::Decide;
            }
            DealerPhase::Decide => {
                let all_busted = self.non_dealer_ids().iter().all(|id| {
                    self.players
                        .get(id)
                        .map(|p| p.state == PlayerState::Busted)
                        .unwrap_or(true)
                });
                let total = self
                    .players
                    .get(&DEALER_ID)
                    .map(|d| d.hand.total_value)
                    .unwrap_or(0);
                self.scratch.dealer_action_hit = !all_busted && total < 17;
                self.scratch.dealer_phase = DealerPhase::Action;
            }
            DealerPhase::Action => {
                if self.scratch.dealer_action_hit {
                    self.deal_card_to(DEALER_ID, true, true);
                } else {
                    self.reveal_hole_card();
                    self.scratch.dealer_stood = true;
                }
                self.scratch.dealer_phase = DealerPhase::Wait;
                self.phase_timer = 0.0;
            }
            DealerPhase::Wait => {
                if self.phase_timer < DEALER_ACTION_DELAY {
                    return;
                }
                let dealer_bust = self
                    .players
                    .get(&DEALER_ID)
                    .map(|d| d.hand.is_bust)
                    .unwrap_or(false);
                if dealer_bust {
                    self.reveal_hole_card();
                }
                if self.scratch.dealer_stood || dealer_bust {
                    self.transition(Phase::Showdown);
                } else {
                    self.scratch.dealer_phase = DealerPhase::Decide;
                }
            }
        }
    }

    /// Flips the dealer's hole card and fires its on-draw tag hooks,
    /// which were deferred at deal time.
    pub fn reveal_hole_card(&mut self) {
        let card = self.players.get_mut(&DEALER_ID).and_then(|dealer| {
            dealer.hand.cards.iter_mut().find(|c| !c.face_up).map(|c| {
                c.face_up = true;
                *c
            })
        });
        if let Some(card) = card {
            run_card_tag_hooks(self, card, DEALER_ID);
        }
    }

    pub(crate) fn deal_card_to(&mut self, id: PlayerId, face_up: bool, run_hooks: bool) {
        if self.deck.is_empty() {
            // Mid-round exhaustion: fold the discard pile back in.
            self.deck.reshuffle_discard(&mut self.rng);
        }
        let Some(mut card) = self.deck.deal() else {
            return;
        };
        card.face_up = face_up;
        let Some(player) = self.players.get_mut(&id) else {
            log::error!("deal to unknown player {}", id.0);
            self.deck.discard(card);
            return;
        };
        player.hand.add_card(card);
        self.global_stats.cards_drawn += 1;
        if run_hooks {
            trigger_event_with_cards(self, GameEvent::CardDrawn, &[(card, id)]);
        }
    }

    // ------------------------------------------------------------------
    // Showdown
    // ------------------------------------------------------------------

    fn resolve_showdown(&mut self) {
        let (dealer_total, dealer_bust, dealer_blackjack) = self
            .players
            .get(&DEALER_ID)
            .map(|d| (d.hand.total_value, d.hand.is_bust, d.hand.is_blackjack))
            .unwrap_or((0, false, false));

        for id in self.non_dealer_ids() {
            let Some(player) = self.players.get(&id) else {
                continue;
            };
            let hand_total = player.hand.total_value;
            let bust = player.hand.is_bust;
            let blackjack = player.hand.is_blackjack;
            self.global_stats.turns_played += 1;

            if bust || (!dealer_bust && dealer_total > hand_total) {
                self.resolve_loss(id);
            } else if dealer_bust || hand_total > dealer_total {
                let natural = blackjack && !dealer_blackjack;
                self.resolve_win(id, natural);
            } else if blackjack != dealer_blackjack {
                // Equal totals but only one natural: natural wins.
                if blackjack {
                    self.resolve_win(id, true);
                } else {
                    self.resolve_loss(id);
                }
            } else {
                self.resolve_push(id);
            }
        }

        let enemy_dead = self
            .enemy
            .as_ref()
            .map(|e| e.current_hp <= 0)
            .unwrap_or(false);
        if self.combat_mode && enemy_dead {
            self.transition(Phase::CombatVictory);
        } else {
            self.transition(Phase::RoundEnd);
        }
    }

    fn resolve_win(&mut self, id: PlayerId, natural: bool) {
        let multiplier = if natural { 1.5 } else { 1.0 };
        let (bet, capped, bonus_percent, flat_bonus, cards) = {
            let Some(player) = self.players.get(&id) else {
                return;
            };
            let bet = player.current_bet;
            let base = (bet as f64 * (1.0 + multiplier)) as i64;
            let capped = player.status.modify_winnings(base, bet);
            let tag_bonuses = self.tags.passive_bonuses(&player.hand.cards);
            (
                bet,
                capped,
                player.stats.won_chips_bonus_percent + tag_bonuses.won_chips_bonus_percent,
                player.stats.flat_chips_on_win + tag_bonuses.flat_chips_on_win,
                player.hand.cards.clone(),
            )
        };
        let winnings = capped + bet * bonus_percent / 100 + flat_bonus;

        if let Some(player) = self.players.get_mut(&id) {
            player.chips += winnings.max(0);
            player.last_bet = player.current_bet;
            player.current_bet = 0;
        }
        self.global_stats.turns_won += 1;
        self.global_stats.record_chips_won(winnings.max(0));
        if let Some(player) = self.players.get(&id) {
            self.global_stats.update_chip_peak(player.chips);
        }

        // Winning hands convert into enemy damage through the universal
        // modifier pipeline, plus any per-tag damage buffs on the cards.
        if self.combat_mode {
            let (damage, is_crit) = {
                let Some(player) = self.players.get(&id) else {
                    return;
                };
                let tag_bonuses = self.tags.passive_bonuses(&cards);
                let base = player.hand.total_value * DAMAGE_SCALER;
                let (mut damage, is_crit) =
                    player.apply_damage_modifiers(base, tag_bonuses, &mut self.rng);
                for card in &cards {
                    for tag in self.tags.tags_for(card.id) {
                        if let Some(buff) = player.tag_damage_buffs.get(&tag) {
                            damage += buff;
                        }
                    }
                }
                (damage, is_crit)
            };
            dispatch::apply_enemy_damage(self, damage, DamageSource::Turn, is_crit);
        }

        trigger_event(self, GameEvent::PlayerWin);
    }

    fn resolve_loss(&mut self, id: PlayerId) {
        let (bet, extra_loss, refund) = {
            let Some(player) = self.players.get(&id) else {
                return;
            };
            let bet = player.current_bet;
            let extra = player.status.modify_losses(bet);
            let refund = bet * player.stats.lost_chips_refund_percent / 100;
            (bet, extra, refund)
        };

        if let Some(player) = self.players.get_mut(&id) {
            // The bet itself was debited at placement; Tilt piles its
            // additional loss on top, refunds claw part back.
            player.lose_chips(extra_loss);
            player.add_chips(refund);
            player.last_bet = player.current_bet;
            player.current_bet = 0;
        }
        self.global_stats.turns_lost += 1;
        self.global_stats.record_chips_lost(bet + extra_loss - refund);

        trigger_event(self, GameEvent::PlayerLoss);
    }

    fn resolve_push(&mut self, id: PlayerId) {
        let push_damage = {
            let Some(player) = self.players.get_mut(&id) else {
                return;
            };
            player.return_bet();
            player.hand.total_value * DAMAGE_SCALER * player.stats.push_damage_percent / 100
        };
        self.global_stats.turns_pushed += 1;

        if self.combat_mode && push_damage > 0 {
            dispatch::apply_enemy_damage(self, push_damage, DamageSource::Trinket, false);
        }

        trigger_event(self, GameEvent::PlayerPush);
    }

    fn finish_round(&mut self) {
        for id in self.non_dealer_ids() {
            if let Some(player) = self.players.get_mut(&id) {
                player.status.tick_durations();
            }
        }
        if let Some(enemy) = self.enemy.as_mut() {
            for ability in &mut enemy.abilities {
                ability.tick_cooldown();
            }
        }

        let enemy_dead = self
            .enemy
            .as_ref()
            .map(|e| e.current_hp <= 0)
            .unwrap_or(false);
        if self.combat_mode && enemy_dead {
            self.transition(Phase::CombatVictory);
            return;
        }

        // Hands must be empty before a deck reset: the reset rebuilds
        // all 52 ids, so any card still held would exist twice once the
        // hand is eventually discarded.
        for id in self.active_players.clone() {
            if let Some(player) = self.players.get_mut(&id) {
                let cards = player.hand.clear();
                self.deck.discard_all(cards);
            }
        }
        self.tags.clear_transient();

        if self.deck.needs_reshuffle() {
            self.deck.reset(&mut self.rng);
            log::info!("deck reset between rounds (draw pile ran low)");
        }
        self.round += 1;
        self.transition(Phase::Betting);
    }

    // ------------------------------------------------------------------
    // Event encounters
    // ------------------------------------------------------------------

    pub fn open_event(&mut self) {
        let picked = self.event_pool.pick_avoiding(self.last_event_index, &mut self.rng);
        if let Some((idx, encounter)) = picked {
            self.last_event_index = Some(idx);
            self.current_event = Some(encounter);
            self.transition(Phase::Event);
        } else {
            log::warn!("event pool empty; skipping event phase");
            self.transition(Phase::CombatPreview);
        }
    }

    /// Pays the current reroll cost and redraws the encounter.
    pub fn reroll_event(&mut self) -> Result<(), GameError> {
        let pid = self.primary_player();
        let cost = self.reroll.current_cost;
        let chips = self.player(pid)?.chips;
        if chips < cost {
            return Err(GameError::InvalidBet {
                amount: cost,
                chips,
            });
        }
        self.player_mut(pid)?.lose_chips(cost);
        self.reroll.spend();
        if let Some((idx, encounter)) =
            self.event_pool.pick_avoiding(self.last_event_index, &mut self.rng)
        {
            self.last_event_index = Some(idx);
            self.current_event = Some(encounter);
        }
        Ok(())
    }

    pub fn requirement_context<'a>(&self, requirement: &'a Requirement) -> RequirementContext<'a> {
        let pid = self.primary_player();
        let player = self.players.get(&pid);
        let (tag_count, trinket_key, has_trinket) = match requirement {
            Requirement::TagCount { tag, .. } => (self.tags.tag_count(*tag), "", false),
            Requirement::Trinket { key } => {
                let has = player
                    .map(|p| {
                        p.occupied_slots()
                            .any(|(_, t)| t.template_key == key.as_str())
                            || p.class_trinket
                                .as_ref()
                                .map(|t| t.template_key == key.as_str())
                                .unwrap_or(false)
                    })
                    .unwrap_or(false);
                (0, key.as_str(), has)
            }
            _ => (0, "", false),
        };
        RequirementContext {
            tag_count,
            has_trinket,
            hp_fraction: self.enemy.as_ref().map(|e| e.hp_fraction()),
            sanity: player.map(|p| p.sanity).unwrap_or(0),
            chips: player.map(|p| p.chips).unwrap_or(0),
            trinket_key,
        }
    }

    /// Verifies the choice's requirement and applies its consequences.
    /// A locked choice returns the tooltip text as the error.
    pub fn choose_event_option(&mut self, index: usize) -> Result<String, String> {
        let Some(encounter) = self.current_event.clone() else {
            return Err("no active event".to_string());
        };
        let Some(choice) = encounter.choices.get(index) else {
            return Err(format!("no choice {index}"));
        };

        if let Some(requirement) = &choice.requirement {
            let req_ctx = self.requirement_context(requirement);
            if !requirement.is_met(&req_ctx) {
                return Err(requirement.unmet_text(&req_ctx));
            }
        }

        let pid = self.primary_player();
        if let Some(player) = self.players.get_mut(&pid) {
            player.chips = (player.chips + choice.chips_delta).max(0);
            player.sanity = (player.sanity + choice.sanity_delta).clamp(0, player.max_sanity);
        }

        for (tag, strategy, count) in &choice.tag_grants {
            let ids = crate::select_cards(&self.tags, *tag, *count, *strategy, &mut self.rng);
            for card_id in ids {
                self.tags.add_tag(card_id, *tag);
            }
        }
        for tag in &choice.tag_removals {
            self.tags.remove_tag_everywhere(*tag);
        }

        if let Some(key) = &choice.trinket_reward {
            match self.trinkets.get(key) {
                Some(template) => {
                    let instance = TrinketInstance::of(template);
                    if let Some(player) = self.players.get_mut(&pid) {
                        if player.equip_trinket(instance).is_err() {
                            log::warn!("no free slot for event trinket `{key}`; reward dropped");
                        }
                    }
                }
                None => log::error!("event rewards unknown trinket `{key}`"),
            }
        }

        if let Some(multiplier) = choice.hp_multiplier {
            self.next_hp_multiplier = multiplier;
        }

        self.current_event = None;
        self.reroll.reset();
        self.refresh_dirty_stats();
        self.transition(Phase::CombatPreview);
        Ok(choice.result_text.clone())
    }
}
