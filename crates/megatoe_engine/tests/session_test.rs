//! Sessions and the controller through the public API.

use megatoe_engine::{
    AiPlayer, Arena, Difficulty, GameController, GameMode, GameSession, GameStatus, Move, MoveError,
    Player, Position, Variant,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn every_move(session: &GameSession, player: Player) -> Vec<Move> {
    let boards: Vec<Option<Position>> = match session.variant() {
        Variant::Classic => vec![None],
        Variant::Ultimate => Position::ALL.iter().copied().map(Some).collect(),
    };
    boards
        .into_iter()
        .flat_map(|board| Position::ALL.iter().map(move |&cell| Move { player, board, cell }))
        .collect()
}

#[test]
fn test_rejections_never_mutate() {
    for variant in [Variant::Classic, Variant::Ultimate] {
        let mut session = GameSession::new(variant, GameMode::HumanVsHuman, Difficulty::Easy);
        let mut ai = AiPlayer::new(ChaCha8Rng::seed_from_u64(17));

        while !session.is_over() {
            let legal = session.legal_moves();
            for player in [Player::X, Player::O] {
                for mv in every_move(&session, player) {
                    if legal.contains(&mv) {
                        continue;
                    }
                    let before = session.clone();
                    assert!(session.apply(mv).is_err(), "{mv} should be rejected");
                    assert_eq!(session, before);
                }
            }

            let player = session.current_player();
            let mv = match session.arena() {
                Arena::Classic(board) => {
                    Move::new(player, ai.select_move(board, player, Difficulty::Easy).unwrap())
                }
                Arena::Ultimate(meta) => {
                    let (board, cell) = ai
                        .select_nested_move(meta, player, Difficulty::Easy)
                        .unwrap();
                    Move::nested(player, board, cell)
                }
            };
            session.apply(mv).unwrap();
        }

        let before = session.clone();
        for mv in every_move(&session, session.current_player()) {
            assert_eq!(session.apply(mv), Err(MoveError::GameAlreadyOver));
        }
        assert_eq!(session, before);
    }
}

#[test]
fn test_scores_recorded_once_per_game() {
    let mut session = GameSession::new(
        Variant::Classic,
        GameMode::ComputerVsComputer,
        Difficulty::Medium,
    );
    let mut controller = GameController::new(AiPlayer::new(ChaCha8Rng::seed_from_u64(3)));

    let mut expected = [0u32; 3];
    for game in 0..12 {
        let report = if game == 0 {
            controller.start(&mut session).unwrap()
        } else {
            controller.reset(&mut session).unwrap()
        };
        match report.status {
            GameStatus::Won(Player::X) => expected[0] += 1,
            GameStatus::Won(Player::O) => expected[1] += 1,
            GameStatus::Draw => expected[2] += 1,
            GameStatus::InProgress => panic!("computer game left unfinished"),
        }
    }

    let scores = session.scores();
    assert_eq!([scores.x_wins, scores.o_wins, scores.ties], expected);

    session.reset_scores();
    assert_eq!(session.scores().games(), 0);
    assert!(session.is_over());
}

#[test]
fn test_hard_computer_never_loses_as_o() {
    for seed in 0..5 {
        let mut session =
            GameSession::new(Variant::Classic, GameMode::HumanVsComputer, Difficulty::Hard);
        let mut controller = GameController::new(AiPlayer::new(ChaCha8Rng::seed_from_u64(seed)));
        let mut human = AiPlayer::new(ChaCha8Rng::seed_from_u64(seed + 100));

        while !session.is_over() {
            let Arena::Classic(board) = session.arena() else {
                unreachable!("classic session");
            };
            let cell = human
                .select_move(board, Player::X, Difficulty::Easy)
                .unwrap();
            controller
                .submit(&mut session, Move::new(Player::X, cell))
                .unwrap();
        }
        assert_ne!(session.status(), GameStatus::Won(Player::X), "seed {seed}");
    }
}
