use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChoreoError::target_not_found("#aura")
            .to_string()
            .contains("target not found:")
    );
    assert!(
        ChoreoError::invalid_region("x")
            .to_string()
            .contains("invalid region config:")
    );
    assert!(
        ChoreoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ChoreoError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        ChoreoError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChoreoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
