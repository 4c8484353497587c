use spotumblr::config::{locate, Settings};
use spotumblr::Error;
use std::fs;

const SETTINGS: &str = r#"{
    "api": {
        "tumblr": {"consumer_key": "ck", "consumer_secret": "cs", "token": "t", "token_secret": "ts"}
    },
    "blog_tags": {"onesongmayhem": "1 song mayhem", "listhype": "listhype", "newblog": "fresh"}
}"#;

#[test]
fn loads_settings_from_a_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("settings.json");
    fs::write(&path, SETTINGS)?;

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.api.tumblr.token_secret, "ts");
    assert_eq!(settings.blog_tags.leading_tag("newblog"), Some("fresh"));
    Ok(())
}

#[test]
fn missing_file_is_a_config_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let err = Settings::from_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    Ok(())
}

#[test]
fn locate_returns_the_first_existing_candidate() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");
    fs::write(&second, SETTINGS)?;

    assert_eq!(locate(&[first.clone(), second.clone()]), Some(second.clone()));
    fs::write(&first, SETTINGS)?;
    assert_eq!(locate(&[first.clone(), second]), Some(first));
    assert_eq!(locate(&[dir.path().join("c.json")]), None);
    Ok(())
}
