//! Tests for module identity parsing

use kiln_domain::ModuleIdentity;

#[test]
fn test_parse_full_identity() {
    let identity = ModuleIdentity::parse("storage@1.4.2").expect("valid identity");

    assert_eq!(identity.name(), "storage");
    assert_eq!(identity.version(), Some("1.4.2"));
    assert_eq!(identity.full(), "storage@1.4.2");
}

#[test]
fn test_parse_bare_name() {
    let identity: ModuleIdentity = "storage".parse().expect("valid identity");

    assert_eq!(identity.name(), "storage");
    assert_eq!(identity.version(), None);
    assert_eq!(identity.to_string(), "storage");
}

#[test]
fn test_parse_trims_whitespace() {
    let identity = ModuleIdentity::parse("  storage @ 2.0.0 ").expect("valid identity");
    assert_eq!(identity, ModuleIdentity::new("storage", "2.0.0"));
}

#[test]
fn test_parse_rejects_empty_parts() {
    assert!(ModuleIdentity::parse("").is_err());
    assert!(ModuleIdentity::parse("@1.0.0").is_err());
    assert!(ModuleIdentity::parse("storage@").is_err());
}
