//! CLI command parsing and pipeline tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), configuration
//! and dataset files, and the pipeline the `run` command drives.

// The CLI is a binary crate, so parsing is checked on mirrored structs and
// the pipeline through the library crates it calls.

// ============================================================================
// Configuration and dataset files
// ============================================================================

mod files {
    use std::fs;

    use qknn_core::{ConfigError, QknnConfig, QknnError, read_dataset};

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qknn.yaml");
        fs::write(
            &path,
            "model:\n  n_neighbors: 1\nbackend:\n  name: statevector_simulator\nencoding:\n  n_train_points: 4\n  n_test_points: 4\n",
        )
        .unwrap();

        let config = QknnConfig::from_file(&path).unwrap();
        assert_eq!(config.model.n_neighbors, 1);
        assert_eq!(config.backend.name, "statevector_simulator");
        assert_eq!(config.encoding.n_train_points, 4);
        assert_eq!(config.encoding.n_features, 4);
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qknn.yaml");
        fs::write(&path, "backend:\n  name: ibm_torino\n").unwrap();

        let config = QknnConfig::from_file(&path).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_dataset_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(dir.path().join("HTRU_2.csv"), true, None).unwrap_err();
        assert!(matches!(err, QknnError::Csv(_)));
    }

    #[test]
    fn test_dataset_file_round_trip_through_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        let mut csv = String::from("f0,f1,f2,f3,label\n");
        for i in 0..8 {
            let jitter = f64::from(i) * 0.01;
            csv.push_str(&format!("{},0.2,{},0.2,0\n", 1.0 + jitter, 0.9 - jitter));
            csv.push_str(&format!("0.2,{},0.2,{},1\n", 1.0 - jitter, 0.9 + jitter));
        }
        fs::write(&path, csv).unwrap();

        let dataset = read_dataset(&path, true, Some(4)).unwrap();
        assert_eq!(dataset.len(), 16);

        let mut config = QknnConfig::default();
        config.backend.name = "statevector_simulator".into();
        let mut qknn = qknn_core::QKnn::from_config(&config).unwrap();
        qknn.encode_data(&dataset, &config.encoding).unwrap();
        qknn.fit().unwrap();
        let evaluation = qknn.evaluate().unwrap();
        assert_eq!(evaluation.percent, 100.0);
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use std::path::PathBuf;

    use clap::{Args, Parser, Subcommand, ValueEnum};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qknn")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<PathBuf>,

        #[arg(long, global = true)]
        log_format: Option<String>,

        #[command(subcommand)]
        command: Option<TestCommands>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum TestFormat {
        Table,
        Json,
    }

    #[derive(Debug, Default, Args)]
    struct TestExperiment {
        #[arg(short, long, conflicts_with = "synthetic")]
        dataset: Option<PathBuf>,
        #[arg(long)]
        synthetic: bool,
        #[arg(short = 'k', long)]
        neighbors: Option<usize>,
        #[arg(short, long)]
        shots: Option<u32>,
        #[arg(short, long)]
        backend: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        features: Option<usize>,
        #[arg(long)]
        train: Option<usize>,
        #[arg(long)]
        test: Option<usize>,
        #[arg(long)]
        unbalanced: bool,
        #[arg(long)]
        no_shuffle: bool,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[command(flatten)]
            experiment: TestExperiment,
            #[arg(short, long, value_enum, default_value_t = TestFormat::Table)]
            format: TestFormat,
        },
        Circuits {
            #[command(flatten)]
            experiment: TestExperiment,
            #[arg(short, long, value_enum, default_value_t = TestFormat::Table)]
            format: TestFormat,
        },
        Backends,
        Version,
    }

    // --- Default command ---

    #[test]
    fn test_parse_no_subcommand() {
        let cli = TestCli::try_parse_from(["qknn"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            TestCli::try_parse_from(["qknn", "-vv", "--config", "qknn.yaml", "--log-format", "json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("qknn.yaml")));
        assert_eq!(cli.log_format.as_deref(), Some("json"));
    }

    // --- Run command ---

    #[test]
    fn test_parse_run_minimal() {
        let cli = TestCli::try_parse_from(["qknn", "run"]).unwrap();
        match cli.command {
            Some(TestCommands::Run { experiment, format }) => {
                assert!(experiment.dataset.is_none());
                assert!(!experiment.synthetic);
                assert!(!experiment.unbalanced);
                assert_eq!(format, TestFormat::Table);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_all_options() {
        let cli = TestCli::try_parse_from([
            "qknn",
            "run",
            "-d",
            "pulsars.csv",
            "-k",
            "5",
            "-s",
            "2048",
            "-b",
            "statevector_simulator",
            "--seed",
            "7",
            "--features",
            "8",
            "--train",
            "16",
            "--test",
            "4",
            "--unbalanced",
            "--no-shuffle",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Some(TestCommands::Run { experiment, format }) => {
                assert_eq!(experiment.dataset, Some(PathBuf::from("pulsars.csv")));
                assert_eq!(experiment.neighbors, Some(5));
                assert_eq!(experiment.shots, Some(2048));
                assert_eq!(experiment.backend.as_deref(), Some("statevector_simulator"));
                assert_eq!(experiment.seed, Some(7));
                assert_eq!(experiment.features, Some(8));
                assert_eq!(experiment.train, Some(16));
                assert_eq!(experiment.test, Some(4));
                assert!(experiment.unbalanced);
                assert!(experiment.no_shuffle);
                assert_eq!(format, TestFormat::Json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_dataset_conflicts_with_synthetic() {
        let result = TestCli::try_parse_from(["qknn", "run", "-d", "a.csv", "--synthetic"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid_format() {
        let result = TestCli::try_parse_from(["qknn", "run", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid_shots() {
        let result = TestCli::try_parse_from(["qknn", "run", "--shots", "many"]);
        assert!(result.is_err());
    }

    // --- Circuits command ---

    #[test]
    fn test_parse_circuits() {
        let cli = TestCli::try_parse_from(["qknn", "circuits", "--synthetic", "-k", "1"]).unwrap();
        match cli.command {
            Some(TestCommands::Circuits { experiment, .. }) => {
                assert!(experiment.synthetic);
                assert_eq!(experiment.neighbors, Some(1));
            }
            _ => panic!("Expected Circuits command"),
        }
    }

    // --- Backends / Version ---

    #[test]
    fn test_parse_backends() {
        let cli = TestCli::try_parse_from(["qknn", "backends"]).unwrap();
        assert!(matches!(cli.command, Some(TestCommands::Backends)));
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["qknn", "-v", "version"]).unwrap();
        assert!(matches!(cli.command, Some(TestCommands::Version)));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_unknown_command() {
        let result = TestCli::try_parse_from(["qknn", "submit"]);
        assert!(result.is_err());
    }
}
