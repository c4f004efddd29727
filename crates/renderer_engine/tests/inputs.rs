use std::fs;

use renderer_engine::{load_credential, read_article, ArticleError, CredentialError, DecodeError};
use tempfile::TempDir;

#[test]
fn credential_is_trimmed_at_both_ends() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("API_KEY");
    fs::write(&path, "  secret\n").unwrap();

    let key = load_credential(&path).unwrap();
    assert_eq!(key.expose_secret(), "secret");
}

#[test]
fn credential_without_whitespace_is_kept() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("API_KEY");
    fs::write(&path, "dummy_api_key").unwrap();

    assert_eq!(load_credential(&path).unwrap().expose_secret(), "dummy_api_key");
}

#[test]
fn missing_credential_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let err = load_credential(&temp.path().join("nonexistent_file")).unwrap_err();
    assert!(matches!(err, CredentialError::Missing(_)));
}

#[test]
fn blank_credential_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("API_KEY");
    fs::write(&path, " \n\t").unwrap();

    assert!(matches!(
        load_credential(&path).unwrap_err(),
        CredentialError::Empty(_)
    ));
}

#[test]
fn article_lines_are_joined_with_single_spaces() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("article.txt");
    fs::write(&path, "This is a test article.\nNew line.").unwrap();

    let article = read_article(&path, None).unwrap();
    assert_eq!(article.as_str(), "This is a test article. New line.");
}

#[test]
fn classic_mac_line_endings_are_joined_too() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("article.txt");
    fs::write(&path, "First line.\rSecond line.\r\nThird.\r").unwrap();

    let article = read_article(&path, None).unwrap();
    assert_eq!(article.as_str(), "First line. Second line. Third.");
}

#[test]
fn empty_article_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    assert!(matches!(
        read_article(&path, None).unwrap_err(),
        ArticleError::Empty(_)
    ));
}

#[test]
fn whitespace_only_article_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blank.txt");
    fs::write(&path, "   \n\n\t \n").unwrap();

    assert!(matches!(
        read_article(&path, None).unwrap_err(),
        ArticleError::Empty(_)
    ));
}

#[test]
fn missing_article_is_reported() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        read_article(&temp.path().join("nonexistent.txt"), None).unwrap_err(),
        ArticleError::Missing(_)
    ));
}

#[test]
fn undecodable_article_is_an_encoding_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("latin2.txt");
    // "Łódź" in windows-1250 is not valid UTF-8
    fs::write(&path, [0xA3, 0xF3, 0x64, 0x9F]).unwrap();

    let err = read_article(&path, None).unwrap_err();
    assert!(matches!(
        err,
        ArticleError::Encoding {
            source: DecodeError::DecodeFailure { .. },
            ..
        }
    ));

    let article = read_article(&path, Some("windows-1250")).unwrap();
    assert_eq!(article.as_str(), "Łódź");
}
