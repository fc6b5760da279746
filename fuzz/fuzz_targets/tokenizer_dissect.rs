#![no_main]

use boxen_engine::{dissect, parse_line, CommandError, Expect, COMMENT_MARKER};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let Some(parsed) = parse_line(&line) else {
        let trimmed = line.trim_start();
        assert!(trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER));
        return;
    };
    assert!(!parsed.verb.is_empty());
    assert!(!parsed.verb.contains('-'));
    assert!(parsed.args.iter().all(|arg| !arg.is_empty()));

    let expected = [
        Expect::Keyword("interface"),
        Expect::Any,
        Expect::Keyword("vlan"),
        Expect::Any,
    ];
    match dissect(&parsed.verb, &parsed.args, &expected) {
        Ok(captured) => {
            assert_eq!(captured.len(), 2);
            assert_eq!(captured[0], parsed.args[1]);
            assert_eq!(captured[1], parsed.args[3]);
        }
        Err(CommandError::Syntax { command }) => assert!(command.starts_with(&parsed.verb)),
        Err(other) => panic!("unexpected dissect failure: {other}"),
    }
});
