use super::*;
use tempfile::tempdir;

#[test]
fn default_config_is_valid() {
    let cfg = BreakpointConfig::default();
    cfg.validate().expect("valid");
    assert_eq!(cfg.mic_range(), 1.0);
    assert_eq!(cfg.weights.for_tier(Tier::Far).very_major, 20.0);
}

#[test]
fn rejects_inverted_mic_breakpoints() {
    let cfg = BreakpointConfig {
        mic_low: 2.0,
        mic_high: 2.0,
        ..BreakpointConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConfigError::MicOrder { .. })));
}

#[test]
fn rejects_alpha_out_of_range() {
    let cfg = BreakpointConfig {
        bzk_alpha: 1.5,
        ..BreakpointConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConfigError::AlphaOutOfRange(_))));
}

#[test]
fn rejects_negative_weight() {
    let mut cfg = BreakpointConfig::default();
    cfg.weights.far.minor = -1.0;
    match cfg.validate() {
        Err(ConfigError::NegativeWeight { tier, name, .. }) => {
            assert_eq!(tier, "far");
            assert_eq!(name, "minor");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn rejects_non_finite_breakpoint() {
    let cfg = BreakpointConfig {
        mic_high: f64::INFINITY,
        ..BreakpointConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConfigError::NotFinite { .. })));
}

#[test]
fn partial_file_overrides_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cfg.toml");
    std::fs::write(
        &path,
        "mic_low = 0\nmic_high = 3\n[weights.far]\nminor = 2\nmajor = 10\nvery_major = 30\n",
    )
    .expect("write");
    let file = load_config_file(&path).expect("load");
    let cfg = file.apply(BreakpointConfig::default());
    assert_eq!(cfg.mic_low, 0.0);
    assert_eq!(cfg.mic_high, 3.0);
    assert_eq!(cfg.bzk_alpha, 0.8);
    assert_eq!(cfg.weights.near, ErrorWeights::default().near);
    assert_eq!(cfg.weights.far.very_major, 30.0);
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("cfg.toml");
    std::fs::write(&path, "mr1 = -1\n").expect("write");
    assert!(matches!(load_config_file(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn bundled_example_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/breakpoint.toml");
    let file = load_config_file(&path).expect("load example");
    assert_eq!(file.delimiter, Some(','));
    assert_eq!(file.apply(BreakpointConfig::default()), BreakpointConfig::default());
}

#[test]
fn delimiter_must_be_ascii() {
    assert_eq!(delimiter_byte('\t').expect("tab"), b'\t');
    assert!(delimiter_byte('é').is_err());
}
