use pontoon_core::{Deck, GameRng, DECK_SIZE, RESHUFFLE_THRESHOLD};
use std::collections::BTreeSet;

#[test]
fn dealing_the_whole_deck_yields_every_card_once() {
    let mut rng = GameRng::from_seed(42);
    let mut deck = Deck::standard52();
    deck.shuffle(&mut rng);

    let mut seen = BTreeSet::new();
    for _ in 0..DECK_SIZE {
        let card = deck.deal().expect("deck should hold 52 cards");
        assert!(seen.insert(card.id), "card id {} dealt twice", card.id);
    }
    assert!(deck.is_empty());
    assert_eq!(seen.len(), DECK_SIZE);
    assert_eq!(*seen.iter().next().unwrap(), 0);
    assert_eq!(*seen.iter().last().unwrap(), 51);

    // The 53rd deal signals exhaustion without mutating anything.
    assert!(deck.deal().is_none());
    assert_eq!(deck.draw_len(), 0);
    assert_eq!(deck.total_len(), 0);
}

#[test]
fn discard_and_reshuffle_preserve_the_single_deck() {
    let mut rng = GameRng::from_seed(7);
    let mut deck = Deck::standard52();
    deck.shuffle(&mut rng);

    // Hold a few cards out, discard the rest of what we dealt.
    let held: Vec<_> = (0..4).map(|_| deck.deal().unwrap()).collect();
    for _ in 0..10 {
        let card = deck.deal().unwrap();
        deck.discard(card);
    }
    assert_eq!(deck.total_len(), DECK_SIZE - held.len());

    deck.reshuffle_discard(&mut rng);
    assert_eq!(deck.draw_len(), DECK_SIZE - held.len());
    assert!(deck.discard.is_empty());

    // Held cards never reappear in the shuffled-back pile.
    let held_ids: BTreeSet<u8> = held.iter().map(|c| c.id).collect();
    assert!(deck.draw.iter().all(|c| !held_ids.contains(&c.id)));
}

#[test]
fn reset_regenerates_all_fifty_two() {
    let mut rng = GameRng::from_seed(3);
    let mut deck = Deck::standard52();
    deck.shuffle(&mut rng);
    for _ in 0..40 {
        deck.deal();
    }
    deck.reset(&mut rng);

    let ids: BTreeSet<u8> = deck.draw.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), DECK_SIZE);
}

#[test]
fn reshuffle_threshold_trips_below_twenty() {
    let mut rng = GameRng::from_seed(11);
    let mut deck = Deck::standard52();
    deck.shuffle(&mut rng);

    while deck.draw_len() >= RESHUFFLE_THRESHOLD {
        assert!(!deck.needs_reshuffle());
        deck.deal();
    }
    assert!(deck.needs_reshuffle());
}

#[test]
fn discarding_flips_cards_face_up() {
    let mut deck = Deck::standard52();
    let mut card = deck.deal().unwrap();
    card.face_up = false;
    deck.discard(card);
    assert!(deck.discard.last().unwrap().face_up);
}
