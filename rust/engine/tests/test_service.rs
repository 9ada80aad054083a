use holdem_engine::errors::GameError;
use holdem_engine::orchestrator::AIOpponent;
use holdem_engine::player::{Player, PlayerAction, PlayerStatus, SeatType};
use holdem_engine::service::{InMemoryTableStore, TableService, TableStore, MIN_PLAYERS};
use holdem_engine::table::{Phase, TableSettings};

struct CheckOrCall;

impl AIOpponent for CheckOrCall {
    fn decide(&self, player: &Player, current_bet: u32) -> PlayerAction {
        if player.to_call(current_bet) == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        }
    }

    fn name(&self) -> &str {
        "check-or-call"
    }
}

fn service() -> TableService<InMemoryTableStore> {
    TableService::new(InMemoryTableStore::new(), Box::new(CheckOrCall), 1000, Some(7))
}

#[test]
fn join_fills_with_ai_up_to_minimum() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    let table = svc.join_table(&id, "alice", "Alice").unwrap();

    assert_eq!(table.players.len(), MIN_PLAYERS);
    assert_eq!(table.players[0].seat_type, SeatType::Human);
    assert_eq!(table.players[1].seat_type, SeatType::Ai);
    assert_eq!(table.players[1].name, "AI Player 1");
    assert!(table.players.iter().all(|p| p.stack == 1000));
}

#[test]
fn join_rejects_duplicates_and_full_tables() {
    let svc = service();
    let settings = TableSettings {
        max_players: 3,
        ..TableSettings::default()
    };
    let id = svc.create_table(settings).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    assert_eq!(
        svc.join_table(&id, "alice", "Alice").unwrap_err(),
        GameError::AlreadySeated("alice".into())
    );
    svc.join_table(&id, "bob", "Bob").unwrap();
    assert_eq!(svc.join_table(&id, "carol", "Carol").unwrap_err(), GameError::TableFull);
}

#[test]
fn unknown_table_is_not_found() {
    let svc = service();
    let err = svc.join_table("nope", "alice", "Alice").unwrap_err();
    assert_eq!(err, GameError::TableNotFound("nope".into()));
    assert!(matches!(svc.start_table("nope"), Err(GameError::TableNotFound(_))));
}

#[test]
fn start_plays_ai_seats_and_waits_for_the_human() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    let table = svc.start_table(&id).unwrap();

    assert_eq!(table.phase, Phase::PreFlop);
    assert_eq!(table.current_player().unwrap().id, "alice");
    assert_eq!(table.total_chips(), 2000);
    table.verify_cards().unwrap();
}

#[test]
fn failed_action_does_not_persist() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    let started = svc.start_table(&id).unwrap();

    let err = svc.player_action(&id, "alice", PlayerAction::Raise(1)).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(svc.snapshot(&id).unwrap(), started);
}

#[test]
fn human_fold_finishes_heads_up_hand() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    svc.start_table(&id).unwrap();
    let table = svc.player_action(&id, "alice", PlayerAction::Fold).unwrap();

    assert_eq!(table.phase, Phase::Finished);
    assert_eq!(table.total_chips(), 2000);
    let winner = table.last_result.as_ref().and_then(|r| r.uncontested.clone());
    assert_eq!(winner.as_deref(), Some(table.players[1].id.as_str()));
}

#[test]
fn leave_is_rejected_mid_hand_and_last_human_empties_table() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    svc.start_table(&id).unwrap();
    assert_eq!(svc.leave_table(&id, "alice").unwrap_err(), GameError::HandInProgress);

    svc.player_action(&id, "alice", PlayerAction::Fold).unwrap();
    let table = svc.leave_table(&id, "alice").unwrap();
    assert!(table.players.is_empty());
    assert_eq!(table.phase, Phase::Waiting);
}

#[test]
fn leaving_reseats_remaining_players() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    svc.join_table(&id, "bob", "Bob").unwrap();
    let table = svc.leave_table(&id, "alice").unwrap();

    assert_eq!(table.players.len(), 2);
    assert!(table.players.iter().enumerate().all(|(i, p)| p.seat == i));
    assert_eq!(table.players[1].id, "bob");
}

#[test]
fn mid_hand_join_sits_out() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    svc.start_table(&id).unwrap();
    let table = svc.join_table(&id, "bob", "Bob").unwrap();
    let bob = table.player("bob").unwrap();
    assert_eq!(bob.status, PlayerStatus::SittingOut);
    assert!(bob.hole_cards.is_empty());
}

#[test]
fn store_lists_created_tables() {
    let svc = service();
    let a = svc.create_table(TableSettings::default()).unwrap();
    let b = svc.create_table(TableSettings::default()).unwrap();
    assert_ne!(a, b);
    assert_eq!(svc.store().ids().unwrap(), vec![a, b]);
}

#[test]
fn add_ai_players_stops_at_max_seats() {
    let svc = service();
    let settings = TableSettings {
        max_players: 4,
        ..TableSettings::default()
    };
    let id = svc.create_table(settings).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    let table = svc.add_ai_players(&id, 5).unwrap();

    assert_eq!(table.players.len(), 4);
    let names: Vec<&str> = table.players.iter().skip(1).map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["AI Player 1", "AI Player 2", "AI Player 3"]);
    assert_eq!(svc.add_ai_players(&id, 1).unwrap_err(), GameError::TableFull);
}

#[test]
fn leaving_before_the_button_keeps_it_on_the_same_player() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    svc.join_table(&id, "bob", "Bob").unwrap();
    svc.join_table(&id, "carol", "Carol").unwrap();
    svc.store()
        .with_table(&id, |t| {
            t.dealer_position = 2;
            Ok(())
        })
        .unwrap();

    let table = svc.leave_table(&id, "alice").unwrap();
    assert_eq!(table.players[table.dealer_position].id, "bob");
}

#[test]
fn dealer_leaving_passes_the_button_to_the_next_player() {
    let svc = service();
    let id = svc.create_table(TableSettings::default()).unwrap();
    svc.join_table(&id, "alice", "Alice").unwrap();
    svc.join_table(&id, "bob", "Bob").unwrap();
    svc.join_table(&id, "carol", "Carol").unwrap();
    // seats: alice, AI Player 1, bob, carol
    svc.store()
        .with_table(&id, |t| {
            t.dealer_position = 2;
            t.hand_number = 1;
            Ok(())
        })
        .unwrap();

    svc.leave_table(&id, "bob").unwrap();
    let table = svc.start_table(&id).unwrap();
    assert_eq!(table.players[table.dealer_position].id, "carol");
    assert!(table.players[table.dealer_position].is_dealer);
}
