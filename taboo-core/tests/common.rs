#![allow(dead_code)]

use taboo_core::{FixedClock, GameStore, RandomSource, SequenceRandom};
use taboo_types::{
    Card, ContentSet, GameMode, GameSettings, Intensity, Player, Prenda, PrendaKind, Team,
};

pub const TEST_NOW: i64 = 1_700_000_000_000;

/// Creates `count` cards with ids "card-0", "card-1", ...
pub fn create_test_cards(count: usize) -> Vec<Card> {
    (0..count)
        .map(|i| {
            Card::new(
                format!("card-{i}"),
                format!("Palabra {i}"),
                &["uno", "dos", "tres", "cuatro", "cinco"],
            )
        })
        .collect()
}

pub fn create_test_prendas() -> Vec<Prenda> {
    vec![
        Prenda {
            id: "p-0".to_string(),
            description: "Canta el estribillo de tu canción favorita".to_string(),
            kind: PrendaKind::Individual,
            intensity: Intensity::Fun,
        },
        Prenda {
            id: "p-1".to_string(),
            description: "Todo el equipo imita a un animal".to_string(),
            kind: PrendaKind::Group,
            intensity: Intensity::Hard,
        },
    ]
}

/// A store whose shuffles keep the input order and whose clock never moves.
pub fn create_test_store() -> GameStore {
    create_store_with_rng(Box::new(SequenceRandom::identity()))
}

pub fn create_store_with_rng(rng: Box<dyn RandomSource>) -> GameStore {
    GameStore::new(rng, Box::new(FixedClock(TEST_NOW)))
}

/// Team-mode store in setup with content loaded and `team_count` teams.
pub fn create_team_store(
    team_count: usize,
    card_count: usize,
    settings: GameSettings,
) -> GameStore {
    let mut store = create_test_store();
    store
        .load_content(ContentSet::new(create_test_cards(card_count), create_test_prendas()))
        .unwrap();
    store.update_settings(settings).unwrap();
    for i in 0..team_count {
        store
            .add_team(Team::new(format!("Equipo {i}"), Team::palette_color(i)))
            .unwrap();
    }
    store
}

/// Individual-mode store in setup with content loaded and `player_count` players.
pub fn create_individual_store(
    player_count: usize,
    score_to_win: u32,
    prendas_enabled: bool,
) -> GameStore {
    let mut store = create_test_store();
    store
        .load_content(ContentSet::new(create_test_cards(10), create_test_prendas()))
        .unwrap();
    store
        .update_settings(GameSettings {
            mode: GameMode::Individual,
            score_to_win,
            prendas_enabled,
            ..Default::default()
        })
        .unwrap();
    for i in 0..player_count {
        store.add_player(Player::new(format!("Jugador {i}"), None)).unwrap();
    }
    store
}

pub fn team_settings(rounds: u32, prendas_enabled: bool) -> GameSettings {
    GameSettings {
        mode: GameMode::Teams,
        rounds,
        time_per_round: 60,
        cards_per_round: None,
        prendas_enabled,
        ..Default::default()
    }
}
