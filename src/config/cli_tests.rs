//! Tests for CLI argument parsing.

use super::cli::{Cli, Command, FamilyArg};
use crate::monitor::AddressFamily;

mod parsing {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_no_args_defaults_to_watch() {
        let cli = Cli::parse_from_iter(["netwatch"]);

        assert!(cli.command.is_none());
        assert!(cli.family.is_none());
        assert!(!cli.initial);
        assert!(!cli.json);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_all_families() {
        let v4 = Cli::parse_from_iter(["netwatch", "--family", "ipv4"]);
        assert_eq!(v4.family, Some(FamilyArg::V4));

        let v6 = Cli::parse_from_iter(["netwatch", "--family", "ipv6"]);
        assert_eq!(v6.family, Some(FamilyArg::V6));

        let both = Cli::parse_from_iter(["netwatch", "--family", "both"]);
        assert_eq!(both.family, Some(FamilyArg::Both));
    }

    #[test]
    fn global_flags_after_watch_subcommand() {
        let cli = Cli::parse_from_iter([
            "netwatch", "watch", "--family", "both", "--initial", "--json", "-v",
        ]);

        assert!(matches!(cli.command, Some(Command::Watch)));
        assert_eq!(cli.family, Some(FamilyArg::Both));
        assert!(cli.initial);
        assert!(cli.json);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_short_flag() {
        let cli = Cli::parse_from_iter(["netwatch", "-c", "custom.toml"]);

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("custom.toml"))
        );
    }

    #[test]
    fn invalid_family_is_rejected() {
        let result = Cli::try_parse_from(["netwatch", "--family", "ipx"]);
        assert!(result.is_err());
    }
}

mod list_command {
    use super::*;

    #[test]
    fn list_without_flags() {
        let cli = Cli::parse_from_iter(["netwatch", "list"]);

        match cli.command {
            Some(Command::List {
                all,
                include,
                exclude,
            }) => {
                assert!(!all);
                assert!(include.is_empty());
                assert!(exclude.is_empty());
            }
            other => panic!("Expected list command, got {other:?}"),
        }
        assert!(Cli::parse_from_iter(["netwatch", "list"]).is_list());
    }

    #[test]
    fn list_with_repeated_flags() {
        let cli = Cli::parse_from_iter([
            "netwatch",
            "list",
            "--include",
            "up",
            "--include",
            "multicast",
            "--exclude",
            "pointtopoint",
            "--all",
            "--json",
        ]);

        let Some(Command::List {
            all,
            include,
            exclude,
        }) = cli.command
        else {
            panic!("Expected list command");
        };
        assert!(all);
        assert_eq!(include, vec!["up", "multicast"]);
        assert_eq!(exclude, vec!["pointtopoint"]);
        assert!(cli.json);
    }
}

mod init_command {
    use super::*;

    #[test]
    fn init_default_output() {
        let cli = Cli::parse_from_iter(["netwatch", "init"]);

        assert_eq!(cli.init_output(), Some(std::path::Path::new("netwatch.toml")));
        assert!(!cli.is_list());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output.to_str(), Some("netwatch.toml"));
            }
            other => panic!("Expected init command, got {other:?}"),
        }
    }

    #[test]
    fn init_custom_output() {
        let cli = Cli::parse_from_iter(["netwatch", "init", "-o", "custom.toml"]);

        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output.to_str(), Some("custom.toml"));
            }
            other => panic!("Expected init command, got {other:?}"),
        }
    }

    #[test]
    fn watch_is_not_init() {
        assert!(Cli::parse_from_iter(["netwatch"]).init_output().is_none());
        assert!(
            Cli::parse_from_iter(["netwatch", "watch"])
                .init_output()
                .is_none()
        );
    }
}

mod family_conversion {
    use super::*;

    #[test]
    fn family_arg_maps_to_address_family() {
        assert_eq!(AddressFamily::from(FamilyArg::V4), AddressFamily::Ipv4);
        assert_eq!(AddressFamily::from(FamilyArg::V6), AddressFamily::Ipv6);
        assert_eq!(
            AddressFamily::from(FamilyArg::Both),
            AddressFamily::Unspecified
        );
    }
}
