#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use xiangqi::rules::core::Player;
use xiangqi::rules::legality::legal_moves;
use xiangqi::GameSession;

// Arbitrary coordinates never panic, never mutate the session and agree with
// legal move enumeration.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = input.splitn(2, '\n');
    let Some(Ok(session)) = parts.next().map(GameSession::from_fen) else {
        return;
    };
    let coordinates = parts
        .next()
        .unwrap_or_default()
        .bytes()
        .map(|byte| i32::from(byte as i8))
        .collect_vec();
    let legal = [Player::Red, Player::Black]
        .into_iter()
        .flat_map(|side| legal_moves(session.board(), side))
        .collect_vec();
    for chunk in coordinates.chunks_exact(4) {
        let before = session.clone();
        let valid = session.is_valid_move(chunk[0], chunk[1], chunk[2], chunk[3]);
        assert_eq!(session, before);
        let listed = legal.iter().any(|mv| {
            [mv.from.row(), mv.from.col(), mv.to.row(), mv.to.col()]
                .map(i32::from)
                == [chunk[0], chunk[1], chunk[2], chunk[3]]
        });
        assert_eq!(valid, listed);
    }
});
