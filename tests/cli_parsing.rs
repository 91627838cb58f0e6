//! CLI argument parsing tests.

use chained_songs::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_chain_command_collects_items_in_order() {
    let cli = Cli::try_parse_from([
        "chained-songs",
        "chain",
        "--context",
        "spotify:playlist:p1",
        "spotify:track:a",
        "spotify:track:b",
        "spotify:track:c",
    ])
    .unwrap();

    match cli.command {
        Commands::Chain(args) => {
            assert_eq!(args.context.as_deref(), Some("spotify:playlist:p1"));
            assert_eq!(
                args.items,
                vec!["spotify:track:a", "spotify:track:b", "spotify:track:c"]
            );
        }
        other => panic!("expected chain command, got {other:?}"),
    }
}

#[test]
fn test_chain_command_requires_items() {
    let result = Cli::try_parse_from(["chained-songs", "chain", "--context", "spotify:album:x"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "chained-songs",
        "list",
        "--json",
        "--config",
        "/tmp/chained.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/chained.yaml")));
    assert!(matches!(cli.command, Commands::List(ref args) if args.context.is_none()));
}

#[test]
fn test_enforce_command_options() {
    let cli = Cli::try_parse_from([
        "chained-songs",
        "enforce",
        "--state",
        "player.json",
        "--context",
        "spotify:playlist:p1",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Enforce(args) => {
            assert_eq!(args.state, Some(PathBuf::from("player.json")));
            assert_eq!(args.context.as_deref(), Some("spotify:playlist:p1"));
            assert!(args.dry_run);
        }
        other => panic!("expected enforce command, got {other:?}"),
    }
}

#[test]
fn test_clear_and_queue_parse_without_arguments() {
    assert!(matches!(
        Cli::try_parse_from(["chained-songs", "clear"]).unwrap().command,
        Commands::Clear(_)
    ));
    assert!(matches!(
        Cli::try_parse_from(["chained-songs", "queue"]).unwrap().command,
        Commands::Queue(_)
    ));
}

#[test]
fn test_unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["chained-songs", "shuffle"]).is_err());
}
