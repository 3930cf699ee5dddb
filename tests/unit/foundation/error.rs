use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HifzError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(HifzError::layout("x").to_string().contains("layout error:"));
    assert!(
        HifzError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HifzError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: HifzError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, HifzError::Serde(_)));
}
