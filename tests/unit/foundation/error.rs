use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GemError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GemError::sink("x").to_string().contains("strip error:"));
    assert!(
        GemError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GemError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn io_errors_become_strip_errors() {
    let err: GemError = std::io::Error::other("broken pipe").into();
    assert!(matches!(err, GemError::Sink(_)));
    assert!(err.to_string().contains("broken pipe"));
}
