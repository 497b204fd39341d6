use pontoon_core::{
    Card, Enemy, GameContext, GameRng, NullFx, Phase, Player, PlayerAction, PlayerState, Rank,
    StatusKind, Suit, DEALER_ID, HUMAN_ID, RESHUFFLE_THRESHOLD,
};

fn context() -> GameContext {
    let mut ctx = GameContext::new(GameRng::from_seed(42), Box::new(NullFx));
    ctx.add_player(Player::new(DEALER_ID, "Dealer", true));
    ctx.add_player(Player::new(HUMAN_ID, "Morgan", false));
    ctx
}

fn give_hand(ctx: &mut GameContext, id: pontoon_core::PlayerId, cards: &[(Suit, Rank)]) {
    let player = ctx.players.get_mut(&id).unwrap();
    player.hand.clear();
    for (suit, rank) in cards {
        player.hand.add_card(Card::new(*suit, *rank));
    }
}

#[test]
fn natural_blackjack_pays_three_to_two() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(50).unwrap();
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ace), (Suit::Diamonds, Rank::King)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Ten), (Suit::Hearts, Rank::Nine)]);

    ctx.transition(Phase::Showdown);
    assert_eq!(ctx.players[&HUMAN_ID].chips, 175);
    assert_eq!(ctx.players[&HUMAN_ID].current_bet, 0);
}

#[test]
fn plain_win_pays_even_money() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(50).unwrap();
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Nine)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Ten), (Suit::Hearts, Rank::Eight)]);

    ctx.transition(Phase::Showdown);
    assert_eq!(ctx.players[&HUMAN_ID].chips, 150);
}

#[test]
fn push_returns_the_bet() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(40).unwrap();
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Eight)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Nine), (Suit::Hearts, Rank::Nine)]);

    ctx.transition(Phase::Showdown);
    assert_eq!(ctx.players[&HUMAN_ID].chips, 100);
}

#[test]
fn loss_keeps_chips_non_negative_even_under_tilt() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 50;
        player.place_bet(50).unwrap();
        player.status.apply(StatusKind::Tilt, 0, 2);
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Seven)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Ten), (Suit::Hearts, Rank::Nine)]);

    ctx.transition(Phase::Showdown);
    assert_eq!(ctx.players[&HUMAN_ID].chips, 0);
}

#[test]
fn greed_caps_the_payout_at_half_the_bet() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(50).unwrap();
        player.status.apply(StatusKind::Greed, 0, 2);
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Nine)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Ten), (Suit::Hearts, Rank::Eight)]);

    ctx.transition(Phase::Showdown);
    // 50 remained after the debit; the win pays at most bet/2 = 25.
    assert_eq!(ctx.players[&HUMAN_ID].chips, 75);
}

#[test]
fn forced_all_in_drives_the_whole_stack_through_betting() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 200;
        player.status.apply(StatusKind::ForcedAllIn, 0, 1);
    }

    let amount = ctx.place_player_bet(HUMAN_ID, 50).unwrap();
    assert_eq!(amount, 200);
    let player = &ctx.players[&HUMAN_ID];
    assert_eq!(player.current_bet, 200);
    assert_eq!(player.chips, 0);
}

#[test]
fn dealer_draws_to_seventeen() {
    let mut ctx = context();
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(10).unwrap();
        player.state = PlayerState::Stood;
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Nine)]);
    {
        let dealer = ctx.players.get_mut(&DEALER_ID).unwrap();
        dealer.hand.clear();
        dealer.hand.add_card(Card::face_down(Suit::Clubs, Rank::Ten));
        dealer.hand.add_card(Card::new(Suit::Hearts, Rank::Six));
    }

    ctx.transition(Phase::DealerTurn);
    ctx.scratch.player_stood = true;
    for _ in 0..64 {
        if ctx.phase != Phase::DealerTurn {
            break;
        }
        ctx.update(1.0);
    }

    let dealer = &ctx.players[&DEALER_ID];
    assert!(dealer.hand.total_value >= 17);
    assert_ne!(ctx.phase, Phase::DealerTurn);
    // The hole card is face up by the time the hand settles.
    assert!(dealer.hand.cards.iter().all(|c| c.face_up));
}

#[test]
fn winning_hands_damage_the_enemy_in_combat() {
    let mut ctx = context();
    ctx.spawn_enemy(Enemy::new("Pit Boss", 100));
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.chips = 100;
        player.place_bet(20).unwrap();
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Ten)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Ten), (Suit::Hearts, Rank::Seven)]);

    ctx.transition(Phase::Showdown);
    let enemy = ctx.enemy.as_ref().unwrap();
    assert_eq!(enemy.current_hp, 80);
    assert_eq!(enemy.total_damage_taken, 20);

    // A second winning round only grows the total.
    {
        let player = ctx.players.get_mut(&HUMAN_ID).unwrap();
        player.place_bet(20).unwrap();
    }
    give_hand(&mut ctx, HUMAN_ID, &[(Suit::Spades, Rank::Ten), (Suit::Diamonds, Rank::Nine)]);
    give_hand(&mut ctx, DEALER_ID, &[(Suit::Clubs, Rank::Ten), (Suit::Hearts, Rank::Seven)]);
    ctx.transition(Phase::Showdown);
    let enemy = ctx.enemy.as_ref().unwrap();
    assert!(enemy.total_damage_taken >= 39);
}

#[test]
fn a_full_round_walks_every_phase() {
    let mut ctx = context();
    ctx.transition(Phase::Betting);
    assert_eq!(ctx.phase, Phase::Betting);

    ctx.place_player_bet(HUMAN_ID, 25).unwrap();
    ctx.update(0.1);
    assert_eq!(ctx.phase, Phase::Dealing);
    assert_eq!(ctx.players[&HUMAN_ID].hand.len(), 2);
    assert_eq!(ctx.players[&DEALER_ID].hand.len(), 2);
    // The dealer's hole card stays hidden through the deal.
    assert!(ctx.players[&DEALER_ID].hand.cards.iter().any(|c| !c.face_up));

    ctx.update(1.0);
    assert_eq!(ctx.phase, Phase::PlayerTurn);

    if ctx.players[&HUMAN_ID].state == PlayerState::Playing {
        ctx.player_action(HUMAN_ID, PlayerAction::Stand).unwrap();
    }
    for _ in 0..128 {
        if ctx.phase == Phase::RoundEnd {
            break;
        }
        ctx.update(1.0);
    }
    assert_eq!(ctx.phase, Phase::RoundEnd);
    assert!(ctx.players[&HUMAN_ID].chips >= 0);
    assert_eq!(ctx.players[&HUMAN_ID].current_bet, 0);

    let round_before = ctx.round;
    ctx.update(2.5);
    assert_eq!(ctx.phase, Phase::Betting);
    assert_eq!(ctx.round, round_before + 1);
}

#[test]
fn round_end_reset_keeps_a_single_copy_of_each_card() {
    let mut ctx = context();
    ctx.transition(Phase::Betting);
    ctx.place_player_bet(HUMAN_ID, 25).unwrap();
    ctx.update(0.1);
    assert_eq!(ctx.phase, Phase::Dealing);

    // Burn the draw pile down so the between-rounds reset fires while
    // both hands still hold cards.
    while ctx.deck.draw_len() >= RESHUFFLE_THRESHOLD {
        let card = ctx.deck.deal().unwrap();
        ctx.deck.discard(card);
    }
    assert!(ctx.deck.needs_reshuffle());

    ctx.transition(Phase::RoundEnd);
    ctx.update(2.5);
    assert_eq!(ctx.phase, Phase::Betting);

    let mut ids: Vec<u8> = ctx.deck.draw.iter().map(|c| c.id).collect();
    ids.extend(ctx.deck.discard.iter().map(|c| c.id));
    for player in ctx.players.values() {
        ids.extend(player.hand.cards.iter().map(|c| c.id));
    }
    ids.sort_unstable();
    let expected: Vec<u8> = (0..52).collect();
    assert_eq!(ids, expected);
}

#[test]
fn doubling_down_doubles_the_bet_and_stands() {
    let mut ctx = context();
    ctx.transition(Phase::Betting);
    ctx.place_player_bet(HUMAN_ID, 50).unwrap();
    ctx.update(0.1);
    ctx.update(1.0);
    assert_eq!(ctx.phase, Phase::PlayerTurn);

    if ctx.players[&HUMAN_ID].state != PlayerState::Playing {
        return; // dealt a natural; nothing to double
    }
    let chips_before = ctx.players[&HUMAN_ID].chips;
    ctx.player_action(HUMAN_ID, PlayerAction::Double).unwrap();
    let player = &ctx.players[&HUMAN_ID];
    assert_eq!(player.current_bet, 100);
    assert_eq!(player.chips, chips_before - 50);
    assert_eq!(player.hand.len(), 3);
    assert!(matches!(
        player.state,
        PlayerState::Stood | PlayerState::Busted
    ));
}
