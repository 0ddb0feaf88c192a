#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use xiangqi::GameSession;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(session) = GameSession::from_fen(input) else {
        return;
    };
    let reparsed = GameSession::from_fen(&session.fen())
        .expect("serialized positions should be accepted back");
    assert_eq!(reparsed, session);
});
