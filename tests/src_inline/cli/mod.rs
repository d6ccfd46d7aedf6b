use super::*;
use clap::Parser;
use tempfile::tempdir;

const DATA: &str = "MIC;DIA\n1;34\n1;34\n1;39\n-2;30\n-2;30\n";

#[test]
fn scan_defaults() {
    let cli = Cli::parse_from(["kira-breakpoint", "scan", "--input", "in.csv", "--out", "out"]);
    match cli.command {
        Command::Scan(args) => {
            assert_eq!(args.candidates, scan::CandidatesArg::Observed);
            assert_eq!(args.rank_by, scan::RankByArg::MaxErr);
            assert_eq!(args.top, 3);
            assert_eq!(args.input.numeric, common::NumericArg::Int);
            assert!(args.breakpoints.mic_low.is_none());
        }
        _ => panic!("expected scan command"),
    }
}

#[test]
fn negative_breakpoints_parse() {
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "scan",
        "--input",
        "in.csv",
        "--out",
        "out",
        "--mic-low",
        "-3",
        "--mic-high",
        "-1",
        "--candidates",
        "integer-range",
        "--rank-by",
        "bzk-weighted",
    ]);
    match cli.command {
        Command::Scan(args) => {
            assert_eq!(args.breakpoints.mic_low, Some(-3.0));
            assert_eq!(args.breakpoints.mic_high, Some(-1.0));
            assert_eq!(args.candidates, scan::CandidatesArg::IntegerRange);
            assert_eq!(args.rank_by, scan::RankByArg::BzkWeighted);
        }
        _ => panic!("expected scan command"),
    }
}

#[test]
fn classify_requires_dia_pair() {
    let parsed = Cli::try_parse_from([
        "kira-breakpoint",
        "classify",
        "--input",
        "in.csv",
        "--out",
        "out",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn scan_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pairs.csv");
    std::fs::write(&input, DATA).expect("write");
    let out = dir.path().join("out");
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "scan",
        "--input",
        input.to_str().expect("utf8"),
        "--out",
        out.to_str().expect("utf8"),
        "--delim",
        ";",
        "--threads",
        "2",
    ]);
    cli.dispatch().expect("scan");
    let ranking = std::fs::read_to_string(out.join("ranking.tsv")).expect("ranking");
    assert!(ranking.lines().count() > 1);
    assert!(out.join("summary.json").is_file());
}

#[test]
fn classify_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pairs.csv");
    std::fs::write(&input, DATA).expect("write");
    let out = dir.path().join("out");
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "classify",
        "--input",
        input.to_str().expect("utf8"),
        "--out",
        out.to_str().expect("utf8"),
        "--delim",
        ";",
        "--dia-low",
        "34",
        "--dia-high",
        "39",
    ]);
    cli.dispatch().expect("classify");
    let categories = std::fs::read_to_string(out.join("categories.tsv")).expect("categories");
    assert!(categories.contains("R\tS\tfar\t2\n"));
}

#[test]
fn inverted_dia_pair_is_rejected() {
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "classify",
        "--input",
        "in.csv",
        "--out",
        "out",
        "--dia-low",
        "39",
        "--dia-high",
        "34",
    ]);
    assert!(cli.dispatch().is_err());
}

#[test]
fn invalid_mic_breakpoints_are_fatal() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pairs.csv");
    std::fs::write(&input, "MIC,DIA\n1,34\n").expect("write");
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "scan",
        "--input",
        input.to_str().expect("utf8"),
        "--out",
        dir.path().join("out").to_str().expect("utf8"),
        "--mic-low",
        "2",
        "--mic-high",
        "1",
    ]);
    assert!(cli.dispatch().is_err());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn validate_writes_stats_and_grid() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pairs.csv");
    std::fs::write(&input, "MIC,DIA\n1,34\n-1,36\nx\n").expect("write");
    let out = dir.path().join("out");
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "validate",
        "--input",
        input.to_str().expect("utf8"),
        "--out",
        out.to_str().expect("utf8"),
    ]);
    cli.dispatch().expect("validate");
    let stats = std::fs::read_to_string(out.join("validate.tsv")).expect("validate");
    assert!(stats.contains("skipped_malformed\t1\n"));
    assert!(stats.contains("dia_max\t36\n"));
    let grid = std::fs::read_to_string(out.join("grid.tsv")).expect("grid");
    assert!(grid.starts_with("MIC\tmic_call\t34\t35\t36\n1\tS\t1\t\t\n"));
}

#[test]
fn scan_with_distant_dia_value_writes_observed_grid() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pairs.csv");
    std::fs::write(&input, "MIC,DIA\n1,30\n-2,4611686018427387904\n").expect("write");
    let out = dir.path().join("out");
    let cli = Cli::parse_from([
        "kira-breakpoint",
        "scan",
        "--input",
        input.to_str().expect("utf8"),
        "--out",
        out.to_str().expect("utf8"),
    ]);
    cli.dispatch().expect("scan");
    let grid = std::fs::read_to_string(out.join("grid.tsv")).expect("grid");
    assert!(grid.starts_with("MIC\tmic_call\t30\t4611686018427387904\n"));
}
