use holdem_engine::betting::{determine_winner, initialize_game, process_action};
use holdem_engine::errors::{ErrorKind, GameError};
use holdem_engine::player::{ActionKind, ActionRequest, Player, PlayerAction as A, PlayerStatus};
use holdem_engine::rules::{validate_action, ValidatedAction};
use holdem_engine::table::{Phase, Table, TableSettings, MAX_TABLE_CHIPS};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn player(stack: u32, current_bet: u32) -> Player {
    let mut p = Player::human("p", "P", stack, 0);
    p.current_bet = current_bet;
    p
}

fn three_handed(seed: u64) -> Table {
    let mut table = Table::new("t", TableSettings::default());
    for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
        table.players.push(Player::human(id, id.to_uppercase(), 1000, i));
    }
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    initialize_game(&mut table, &mut rng).expect("start hand");
    table
}

#[test]
fn check_is_only_legal_when_nothing_is_owed() {
    assert_eq!(validate_action(&player(100, 20), 20, A::Check), Ok(ValidatedAction::Check));
    assert_eq!(
        validate_action(&player(100, 10), 20, A::Check),
        Err(GameError::CannotCheck { to_call: 10 })
    );
}

#[test]
fn call_requires_the_full_amount() {
    assert_eq!(validate_action(&player(100, 5), 20, A::Call), Ok(ValidatedAction::Call(15)));
    assert_eq!(
        validate_action(&player(10, 5), 20, A::Call),
        Err(GameError::InsufficientStack {
            required: 15,
            available: 10
        })
    );
}

#[test]
fn raise_must_exceed_current_bet_and_be_covered() {
    assert_eq!(
        validate_action(&player(100, 0), 20, A::Raise(20)),
        Err(GameError::RaiseTooSmall {
            amount: 20,
            current_bet: 20
        })
    );
    assert_eq!(
        validate_action(&player(100, 10), 20, A::Raise(200)),
        Err(GameError::InsufficientStack {
            required: 190,
            available: 100
        })
    );
    assert_eq!(
        validate_action(&player(100, 10), 20, A::Raise(110)),
        Ok(ValidatedAction::Raise { to: 110, delta: 100 })
    );
}

#[test]
fn all_in_needs_chips() {
    assert_eq!(validate_action(&player(75, 0), 20, A::AllIn), Ok(ValidatedAction::AllIn(75)));
    assert!(matches!(
        validate_action(&player(0, 20), 20, A::AllIn),
        Err(GameError::InsufficientStack { available: 0, .. })
    ));
}

#[test]
fn folded_or_all_in_players_cannot_act() {
    let mut p = player(100, 0);
    p.status = PlayerStatus::Folded;
    assert_eq!(validate_action(&p, 0, A::Check), Err(GameError::PlayerCannotAct("p".into())));
    p.status = PlayerStatus::AllIn;
    assert_eq!(validate_action(&p, 0, A::Fold), Err(GameError::PlayerCannotAct("p".into())));
}

#[test]
fn validation_errors_are_classified() {
    assert_eq!(GameError::CannotCheck { to_call: 1 }.kind(), ErrorKind::Validation);
    assert_eq!(GameError::TableNotFound("x".into()).kind(), ErrorKind::NotFound);
    assert_eq!(GameError::PlayerNotFound("x".into()).kind(), ErrorKind::NotFound);
    assert_eq!(
        GameError::DeckExhausted {
            requested: 1,
            remaining: 0
        }
        .kind(),
        ErrorKind::Invariant
    );
    assert!(!GameError::CorruptedTable("x".into()).is_validation());
}

#[test]
fn action_text_parses() {
    assert_eq!("fold".parse::<A>(), Ok(A::Fold));
    assert_eq!("X".parse::<A>(), Ok(A::Check));
    assert_eq!("call".parse::<A>(), Ok(A::Call));
    assert_eq!("raise 40".parse::<A>(), Ok(A::Raise(40)));
    assert_eq!("all-in".parse::<A>(), Ok(A::AllIn));
    assert_eq!("raise".parse::<A>(), Err(GameError::MissingRaiseAmount));
    assert!(matches!("bet 10".parse::<A>(), Err(GameError::UnknownAction(_))));
}

#[test]
fn action_request_requires_amount_for_raise() {
    let req = ActionRequest {
        action: ActionKind::Raise,
        amount: None,
    };
    assert_eq!(A::try_from(req), Err(GameError::MissingRaiseAmount));
    let req: ActionRequest = serde_json::from_str(r#"{"action":"raise","amount":60}"#).unwrap();
    assert_eq!(A::try_from(req), Ok(A::Raise(60)));
    let req: ActionRequest = serde_json::from_str(r#"{"action":"all_in"}"#).unwrap();
    assert_eq!(A::try_from(req), Ok(A::AllIn));
}

#[test]
fn illegal_action_leaves_table_unchanged() {
    let mut table = three_handed(3);
    let before = table.clone();
    let first = table.current_player().unwrap().id.clone();

    let err = process_action(&mut table, &first, A::Check).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(table, before);

    let err = process_action(&mut table, &first, A::Raise(5)).unwrap_err();
    assert!(matches!(err, GameError::RaiseTooSmall { .. }));
    assert_eq!(table, before);
}

#[test]
fn raise_reopens_action_for_active_players_only() {
    let mut table = three_handed(5);
    // dealer 0, small blind 1, big blind 2; seat 0 acts first
    assert_eq!(table.current_player_index, 0);
    process_action(&mut table, "a", A::Call).unwrap();
    process_action(&mut table, "b", A::AllIn).unwrap();
    assert_eq!(table.players[1].status, PlayerStatus::AllIn);
    assert_eq!(table.current_bet, 1000);
    assert!(!table.players[0].has_acted, "caller must act again after a raise");
    assert!(!table.players[2].has_acted);

    process_action(&mut table, "c", A::Fold).unwrap();
    process_action(&mut table, "a", A::Raise(1000)).unwrap_err();
    process_action(&mut table, "a", A::Call).unwrap();

    assert!(table.players[1].has_acted, "all-in player keeps its flag");
    assert_eq!(table.players[0].status, PlayerStatus::AllIn, "calling off the stack is all-in");
    assert_eq!(table.pot, 2010);
    assert_eq!(table.total_chips(), 3000);
}

#[test]
fn raise_moves_chips_and_sets_current_bet() {
    let mut table = three_handed(11);
    process_action(&mut table, "a", A::Raise(40)).unwrap();
    assert_eq!(table.current_bet, 40);
    assert_eq!(table.players[0].stack, 960);
    assert_eq!(table.players[0].current_bet, 40);
    assert_eq!(table.pot, 55);
    assert_eq!(table.actions.len(), 1);
    assert_eq!(table.actions[0].phase, Phase::PreFlop);
}

#[test]
fn acting_outside_a_hand_is_rejected() {
    let mut table = Table::new("t", TableSettings::default());
    table.players.push(Player::human("a", "A", 100, 0));
    assert_eq!(
        process_action(&mut table, "a", A::Check),
        Err(GameError::HandNotInProgress)
    );

    let mut table = three_handed(1);
    assert_eq!(
        process_action(&mut table, "nobody", A::Fold),
        Err(GameError::PlayerNotFound("nobody".into()))
    );
}

#[test]
fn explicit_raise_clears_only_active_flags() {
    let mut table = Table::new("t", TableSettings::default());
    for (i, (id, stack)) in [("a", 100), ("b", 1000), ("c", 1000), ("d", 1000)].into_iter().enumerate() {
        table.players.push(Player::human(id, id.to_uppercase(), stack, i));
    }
    initialize_game(&mut table, &mut ChaCha20Rng::seed_from_u64(9)).unwrap();
    // dealer a, small blind b, big blind c; d opens the action
    process_action(&mut table, "d", A::Fold).unwrap();
    process_action(&mut table, "a", A::AllIn).unwrap();
    process_action(&mut table, "b", A::Call).unwrap();
    assert!(table.players[1].has_acted);

    process_action(&mut table, "c", A::Raise(300)).unwrap();

    assert_eq!(table.current_bet, 300);
    assert!(table.players[2].has_acted, "raiser");
    assert!(!table.players[1].has_acted, "active caller must act again");
    assert_eq!(table.players[0].status, PlayerStatus::AllIn);
    assert!(table.players[0].has_acted, "all-in flag untouched");
    assert_eq!(table.players[3].status, PlayerStatus::Folded);
    assert!(table.players[3].has_acted, "folded flag untouched");
}

#[test]
fn stacks_beyond_table_limit_cannot_start() {
    let mut table = Table::new("t", TableSettings::default());
    table.players.push(Player::human("a", "A", 3_000_000_000, 0));
    table.players.push(Player::human("b", "B", 3_000_000_000, 1));
    let before = table.clone();

    let err = initialize_game(&mut table, &mut ChaCha20Rng::seed_from_u64(1)).unwrap_err();
    assert_eq!(
        err,
        GameError::ChipOverflow {
            total: 6_000_000_000,
            limit: MAX_TABLE_CHIPS
        }
    );
    assert!(err.is_validation());
    assert_eq!(table, before);
}

#[test]
fn pot_overflow_is_rejected_before_any_chips_move() {
    let mut table = Table::new("t", TableSettings::default());
    table.players.push(Player::human("a", "A", 1000, 0));
    table.players.push(Player::human("b", "B", 1000, 1));
    initialize_game(&mut table, &mut ChaCha20Rng::seed_from_u64(2)).unwrap();
    table.pot = u32::MAX - 2;
    let before = table.clone();

    // heads-up: b is the small blind and owes 5
    let err = process_action(&mut table, "b", A::Call).unwrap_err();
    assert!(matches!(err, GameError::ChipOverflow { .. }));
    assert_eq!(table, before);
}

#[test]
fn payout_overflow_leaves_stacks_untouched() {
    let mut table = Table::new("t", TableSettings::default());
    table.players.push(Player::human("a", "A", 1000, 0));
    table.players.push(Player::human("b", "B", 1000, 1));
    initialize_game(&mut table, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
    table.players[1].status = PlayerStatus::Folded;
    table.players[0].stack = u32::MAX - 1;
    let before = table.clone();

    assert!(matches!(determine_winner(&mut table), Err(GameError::ChipOverflow { .. })));
    assert_eq!(table, before);
}
