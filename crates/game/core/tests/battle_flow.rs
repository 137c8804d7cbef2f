use tactics_core::{
    ActionError, ActionType, AttackType, BattleConfig, BattleEngine, BattleOutcome, BattlePhase,
    Card, CardEffect, CardPool, Character, CharacterConfig, CharacterEvent, CharacterId,
    CharacterStats, Grid, MoveError, Notification, Position, Squad, Team, Tick,
};

fn fighter(id: u32, team: Team, health: u32, attack: i32, armor: i32) -> Character {
    Character::new(
        CharacterId(id),
        format!("fighter-{id}"),
        team,
        CharacterStats {
            max_health: health,
            base_attack: attack,
            armor,
        },
        &CharacterConfig::default(),
    )
}

fn pool() -> CardPool {
    let card = |name: &str, effect: CardEffect| Card::new(name, "", effect);
    CardPool::new(vec![
        card(
            "Focus",
            CardEffect {
                energy: 10.0,
                ..CardEffect::default()
            },
        ),
        card(
            "Whetstone",
            CardEffect {
                attack: 2,
                ..CardEffect::default()
            },
        ),
        card(
            "Plating",
            CardEffect {
                armor: 2,
                ..CardEffect::default()
            },
        ),
    ])
}

fn config() -> BattleConfig {
    BattleConfig {
        move_ticks_per_cell: 100,
        action_delay_ticks: 10,
        turn_handoff_ticks: 50,
        ..BattleConfig::default()
    }
}

/// Builds and starts a battle with every fighter pre-placed on its cell.
fn battle(
    heroes: Vec<(Character, Position)>,
    foes: Vec<(Character, Position)>,
) -> BattleEngine {
    let mut grid = Grid::new(10, 10);
    let mut place = |list: Vec<(Character, Position)>| {
        list.into_iter()
            .map(|(mut character, at)| {
                grid.place_character(&mut character, at).unwrap();
                character
            })
            .collect::<Vec<_>>()
    };
    let heroes = place(heroes);
    let foes = place(foes);

    let mut engine = BattleEngine::new(
        config(),
        grid,
        Squad::new(Team::Player, heroes),
        Squad::new(Team::Enemy, foes),
        pool(),
    )
    .unwrap();
    engine.start_battle().unwrap();
    engine.drain_notifications();
    engine
}

fn duel(hero: Character, hero_at: Position, foe: Character, foe_at: Position) -> BattleEngine {
    battle(vec![(hero, hero_at)], vec![(foe, foe_at)])
}

fn step_move(engine: &mut BattleEngine, to: Position) {
    engine.select_action(ActionType::Move).unwrap();
    engine.on_cell_selected(to).unwrap();
    let wait = engine.time_to_next_wake().unwrap();
    engine.advance(wait);
}

#[test]
fn sword_hit_is_reduced_by_armor() {
    let mut engine = duel(
        fighter(1, Team::Player, 100, 30, 0),
        Position::new(2, 2),
        fighter(2, Team::Enemy, 100, 20, 10),
        Position::new(3, 2),
    );

    engine.select_action(ActionType::Attack).unwrap();
    engine.select_weapon(AttackType::Sword).unwrap();
    engine.select_target(CharacterId(2)).unwrap();

    let foe = engine.character(CharacterId(2)).unwrap();
    assert_eq!(foe.current_health(), 60);
    let hero = engine.character(CharacterId(1)).unwrap();
    assert_eq!(hero.current_energy(), 35.0);
    assert_eq!(engine.actions_remaining(), 2);
    assert_eq!(engine.statistics().damage_dealt, 40);

    let notes = engine.drain_notifications();
    assert!(notes.contains(&Notification::Character {
        id: CharacterId(2),
        event: CharacterEvent::HealthChanged {
            current: 60,
            max: 100
        },
    }));
}

#[test]
fn super_attack_spends_energy_before_hitting_and_heals() {
    let mut hero = fighter(1, Team::Player, 100, 30, 0);
    hero.modify_energy(100.0);
    hero.modify_health(-90);
    let mut engine = duel(
        hero,
        Position::new(2, 2),
        fighter(2, Team::Enemy, 100, 20, 5),
        Position::new(5, 2),
    );

    engine.select_action(ActionType::SuperAttack).unwrap();
    engine.select_target(CharacterId(2)).unwrap();

    assert_eq!(engine.character(CharacterId(2)).unwrap().current_health(), 65);
    let hero = engine.character(CharacterId(1)).unwrap();
    assert_eq!(hero.current_energy(), 0.0);
    assert_eq!(hero.current_health(), 30);
    assert_eq!(hero.range_override(), None);

    let energy_reset = engine.drain_notifications().into_iter().position(|note| {
        note == Notification::Character {
            id: CharacterId(1),
            event: CharacterEvent::EnergyChanged {
                current: 0.0,
                max: 100.0,
            },
        }
    });
    assert!(energy_reset.is_some());
}

#[test]
fn super_attack_needs_full_energy() {
    let mut engine = duel(
        fighter(1, Team::Player, 100, 30, 0),
        Position::new(2, 2),
        fighter(2, Team::Enemy, 100, 20, 5),
        Position::new(3, 2),
    );

    assert_eq!(
        engine.select_action(ActionType::SuperAttack),
        Err(ActionError::SuperAttackUnavailable)
    );
    assert_eq!(engine.pending_action(), None);
    assert_eq!(engine.actions_remaining(), 3);
}

#[test]
fn four_cell_move_is_rejected_without_side_effects() {
    let mut engine = duel(
        fighter(1, Team::Player, 100, 30, 0),
        Position::new(2, 2),
        fighter(2, Team::Enemy, 100, 20, 5),
        Position::new(9, 9),
    );

    engine.select_action(ActionType::Move).unwrap();
    let result = engine.on_cell_selected(Position::new(2, 6));

    assert_eq!(
        result,
        Err(ActionError::Move(MoveError::Unreachable {
            destination: Position::new(2, 6)
        }))
    );
    assert_eq!(
        engine.character(CharacterId(1)).unwrap().position(),
        Some(Position::new(2, 2))
    );
    assert_eq!(engine.actions_remaining(), 3);
    assert_eq!(engine.pending_action(), Some(ActionType::Move));
    assert!(!engine.is_busy());

    let mut loose = fighter(7, Team::Player, 100, 30, 0);
    let mut grid = Grid::new(10, 10);
    grid.place_character(&mut loose, Position::new(2, 2)).unwrap();
    assert_eq!(
        loose.try_move_to(&grid, Position::new(2, 6), 3, Tick(100)),
        Err(MoveError::TooFar {
            distance: 4,
            max: 3
        })
    );
}

#[test]
fn diagonal_cells_are_never_offered() {
    let mut engine = duel(
        fighter(1, Team::Player, 100, 30, 0),
        Position::new(2, 2),
        fighter(2, Team::Enemy, 100, 20, 5),
        Position::new(9, 9),
    );

    engine.select_action(ActionType::Move).unwrap();
    assert!(!engine.move_highlight().contains(&Position::new(3, 3)));
    assert!(engine.on_cell_selected(Position::new(3, 3)).is_err());
}

#[test]
fn third_action_hands_the_turn_over_in_the_same_step() {
    let mut engine = duel(
        fighter(1, Team::Player, 100, 30, 0),
        Position::new(0, 0),
        fighter(2, Team::Enemy, 100, 20, 5),
        Position::new(9, 9),
    );

    for (expected, y) in [(2, 1), (1, 2)] {
        step_move(&mut engine, Position::new(0, y));
        assert_eq!(engine.actions_remaining(), expected);
        assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
    }
    step_move(&mut engine, Position::new(0, 3));

    assert_eq!(engine.actions_remaining(), 0);
    assert_eq!(engine.phase(), BattlePhase::EnemyTurn);
    assert_eq!(
        engine.select_action(ActionType::Move),
        Err(ActionError::NotPlayerTurn)
    );

    engine.run_until_idle(Tick(100_000));
    assert_eq!(engine.phase(), BattlePhase::PlayerTurn);
    assert_eq!(engine.current_turn(), 2);
    assert_eq!(engine.actions_remaining(), 3);
}

#[test]
fn each_turn_offers_distinct_cards_from_the_full_pool() {
    let mut engine = duel(
        fighter(1, Team::Player, 1_000, 30, 0),
        Position::new(0, 0),
        fighter(2, Team::Enemy, 100, 0, 5),
        Position::new(9, 9),
    );

    for _ in 0..5 {
        let names: Vec<_> = engine
            .player_cards()
            .iter()
            .map(|card| card.name.clone())
            .collect();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        assert!(engine.can_use_player_cards());

        engine.end_turn_button_clicked().unwrap();
        engine.run_until_idle(Tick(100_000));
    }
}

#[test]
fn fallen_enemy_is_replaced_by_the_next_in_line() {
    let mut engine = battle(
        vec![(fighter(1, Team::Player, 100, 30, 0), Position::new(2, 2))],
        vec![
            (fighter(2, Team::Enemy, 10, 20, 0), Position::new(3, 2)),
            (fighter(3, Team::Enemy, 100, 20, 0), Position::new(9, 9)),
        ],
    );

    engine.select_action(ActionType::Attack).unwrap();
    engine.select_weapon(AttackType::Sword).unwrap();
    engine.select_target(CharacterId(2)).unwrap();

    assert!(!engine.is_battle_over());
    assert_eq!(engine.enemy_squad().active_id(), Some(CharacterId(3)));
    assert_eq!(engine.grid().character_at(Position::new(3, 2)), None);
    assert_eq!(engine.statistics().damage_dealt, 10);

    let notes = engine.drain_notifications();
    let deaths = notes
        .iter()
        .filter(|note| {
            matches!(
                note,
                Notification::Character {
                    event: CharacterEvent::Died,
                    ..
                }
            )
        })
        .count();
    assert_eq!(deaths, 1);
    assert!(notes.contains(&Notification::ActiveCharacterChanged {
        team: Team::Enemy,
        id: CharacterId(3)
    }));

    assert_eq!(
        engine.select_target(CharacterId(2)),
        Err(ActionError::NoPendingAction)
    );
}

#[test]
fn dead_target_cannot_be_picked_again() {
    let mut engine = battle(
        vec![(fighter(1, Team::Player, 100, 30, 0), Position::new(2, 2))],
        vec![
            (fighter(2, Team::Enemy, 10, 20, 0), Position::new(3, 2)),
            (fighter(3, Team::Enemy, 100, 20, 0), Position::new(2, 3)),
        ],
    );

    engine.select_action(ActionType::Attack).unwrap();
    engine.select_weapon(AttackType::Sword).unwrap();
    engine.select_target(CharacterId(2)).unwrap();

    engine.select_action(ActionType::Attack).unwrap();
    engine.select_weapon(AttackType::Sword).unwrap();
    assert!(engine.select_target(CharacterId(2)).is_err());
    assert_eq!(engine.actions_remaining(), 2);
    engine.select_target(CharacterId(3)).unwrap();
    assert_eq!(engine.actions_remaining(), 1);
}

/// Attacks whenever the foe is within the engine attack range, otherwise passes the turn.
fn autoplay_step(engine: &mut BattleEngine) {
    let (Some(hero), Some(foe)) = (
        engine.player_squad().active_character(),
        engine.enemy_squad().active_character(),
    ) else {
        engine.end_turn_button_clicked().unwrap();
        return;
    };
    let foe_id = foe.id();
    let distance = match (hero.position(), foe.position()) {
        (Some(a), Some(b)) => a.manhattan_distance(b),
        _ => u32::MAX,
    };
    let weapon = match distance {
        1 => Some(AttackType::Sword),
        2 => Some(AttackType::Magic),
        _ => None,
    };

    match weapon {
        Some(weapon) => {
            engine.select_action(ActionType::Attack).unwrap();
            engine.select_weapon(weapon).unwrap();
            engine.select_target(foe_id).unwrap();
        }
        None => engine.end_turn_button_clicked().unwrap(),
    }
}

fn auto_battle(seed: u64) -> BattleEngine {
    let config = config().with_seed(seed).with_max_turns(30);
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(seed);
    let roster = CharacterConfig::default();
    let heroes = vec![Character::spawn(CharacterId(1), "hero", Team::Player, &roster, &mut rng)];
    let foes = vec![
        Character::spawn(CharacterId(2), "brute", Team::Enemy, &roster, &mut rng),
        Character::spawn(CharacterId(3), "archer", Team::Enemy, &roster, &mut rng),
    ];

    let mut engine = BattleEngine::builder()
        .config(config.clone())
        .default_grid()
        .player_squad(Squad::new(Team::Player, heroes))
        .enemy_squad(Squad::new(Team::Enemy, foes))
        .card_pool(pool())
        .build()
        .unwrap();
    engine.start_battle().unwrap();

    while !engine.is_battle_over() {
        if engine.current_turn() > config.max_turns {
            engine.end_battle_at_turn_limit().unwrap();
            break;
        }
        if engine.is_busy() {
            engine.run_until_idle(Tick(1_000_000));
            continue;
        }
        autoplay_step(&mut engine);
    }
    engine
}

#[test]
fn auto_battle_always_finishes_and_replays_identically() {
    let first = auto_battle(7);
    let second = auto_battle(7);

    let summary = first.summary().unwrap();
    assert!(summary.statistics.turns >= 1);
    assert!(summary.statistics.turns <= 30);
    assert_eq!(first.summary(), second.summary());
    assert_eq!(first.clock(), second.clock());

    match summary.outcome {
        BattleOutcome::PlayerWin => assert!(first.enemy_squad().is_squad_defeated()),
        BattleOutcome::EnemyWin => assert!(first.player_squad().is_squad_defeated()),
        BattleOutcome::Draw => {}
    }
}
