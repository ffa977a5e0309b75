use medium_mcp::{AddOutcome, DomainAllowlist, MediumError};

fn allowlist(dir: &tempfile::TempDir) -> DomainAllowlist {
    DomainAllowlist::new(dir.path().join("config.json"), Some(vec![" Team.Example.ORG ".to_string()]))
}

#[test]
fn subdomains_are_allowed_and_lookalikes_are_not() {
    let dir = tempfile::tempdir().unwrap();
    let domains = allowlist(&dir);

    assert!(domains.check_url("https://medium.com/@user/slug").is_ok());
    assert!(domains.check_url("https://foo.medium.com/some-post").is_ok());
    assert!(domains.check_url("https://blog.team.example.org/post").is_ok());

    match domains.check_url("https://notmedium.com.evil.com/post") {
        Err(MediumError::DomainNotAllowed { host, .. }) => assert_eq!(host, "notmedium.com.evil.com"),
        other => panic!("expected DomainNotAllowed, got {other:?}"),
    }
    assert!(matches!(domains.check_url("medium.com/@user"), Err(MediumError::InvalidUrl { .. })));
}

#[test]
fn custom_domains_persist_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    let (domain, outcome) = allowlist(&dir).add("Stackademic.com").unwrap();
    assert_eq!(domain, "stackademic.com");
    assert_eq!(outcome, AddOutcome::Added);

    let reopened = allowlist(&dir);
    let listing = reopened.listing();
    assert_eq!(listing.custom_domains, vec!["stackademic.com"]);
    assert!(listing.all_domains.contains(&"stackademic.com".to_string()));
    assert!(listing.all_domains.contains(&"team.example.org".to_string()));

    assert!(reopened.remove("medium.com").is_err());
    assert_eq!(reopened.listing().custom_domains, vec!["stackademic.com"]);

    reopened.remove("stackademic.com").unwrap();
    assert!(allowlist(&dir).listing().custom_domains.is_empty());
    assert!(reopened.check_url("https://stackademic.com/post").is_err());
}

#[cfg(unix)]
#[test]
fn settings_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let domains = DomainAllowlist::new(dir.path().join("nested").join("config.json"), Some(Vec::new()));
    domains.add("uxplanet.org").unwrap();

    let file_mode = std::fs::metadata(dir.path().join("nested").join("config.json"))
        .unwrap()
        .permissions()
        .mode();
    let dir_mode = std::fs::metadata(dir.path().join("nested")).unwrap().permissions().mode();
    assert_eq!(file_mode & 0o777, 0o600);
    assert_eq!(dir_mode & 0o777, 0o700);
}
