#![allow(clippy::panic)]

use cozy_gym_bot::bot::commands::{usage_example, Command, SyncAction, HELP_TEXT};

#[test]
fn test_trainer_and_sessions_ignore_extra_arguments() {
    assert_eq!(Command::parse("/trainer please"), Command::Trainer);
    assert_eq!(Command::parse("  /sessions all  "), Command::Sessions);
}

#[test]
fn test_client_name_keeps_all_words() {
    assert_eq!(
        Command::parse("/CLIENT 12 Maria del Carmen"),
        Command::Client {
            trainer_id: 12,
            name: "Maria del Carmen".to_string()
        }
    );
}

#[test]
fn test_client_rejects_non_positive_id() {
    match Command::parse("/client 0 Ivan") {
        Command::Invalid { command, input, error } => {
            assert_eq!(command, "/client");
            assert_eq!(input, "0");
            assert_eq!(error, "Trainer ID must be positive");
        }
        other => panic!("unexpected parse result: {other:?}"),
    }
}

#[test]
fn test_sync_with_bot_mention() {
    assert_eq!(
        Command::parse("/sync@CozyGymBot 30"),
        Command::Sync(SyncAction::Enable { minutes: 30 })
    );
    assert_eq!(
        Command::parse("/sync@CozyGymBot"),
        Command::Sync(SyncAction::RunNow)
    );
}

#[test]
fn test_sync_disable_words() {
    for word in ["off", "Disable", "STOP"] {
        assert_eq!(
            Command::parse(&format!("/sync {word}")),
            Command::Sync(SyncAction::Disable)
        );
    }
}

#[test]
fn test_command_names() {
    assert_eq!(Command::parse("/sync 5").name(), "/sync");
    assert_eq!(Command::parse("/client x y").name(), "/client");
    assert_eq!(Command::parse("whatever").name(), "help");
}

#[test]
fn test_help_and_usage_texts() {
    for command in ["/trainer", "/client", "/sessions", "/sync", "/sync off"] {
        assert!(HELP_TEXT.contains(command), "help should mention {command}");
    }
    assert!(usage_example("/client").contains("/client 42"));
    assert!(usage_example("/sync").contains("/sync 60"));
    assert!(usage_example("/other").contains("/help"));
}
