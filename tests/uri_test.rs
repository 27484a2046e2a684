use artpath::{ArtifactoryError, ArtifactoryPath};

const BASE_URI: &str = "http://artifactory:8080/artifactory";

const CASES: &[(&str, &str)] = &[
    ("http://artifactory:8080/artifactory/repo", "/repo"),
    ("http://artifactory:8080/artifactory/repo/", "/repo/"),
    ("http://artifactory:8080/artifactory/repo/dir", "/repo/dir"),
    ("http://artifactory:8080/artifactory/repo/dir/", "/repo/dir/"),
    (
        "http://artifactory:8080/artifactory/repo/dir/file",
        "/repo/dir/file",
    ),
];

#[test]
fn test_from_uri() {
    for (uri, path) in CASES {
        let p = ArtifactoryPath::from_uri(uri).unwrap();
        assert_eq!(p.base_uri(), BASE_URI);
        assert_eq!(p.to_string(), *path);
    }
}

#[test]
fn test_as_uri() {
    for (uri, path) in CASES {
        let p = ArtifactoryPath::new([*path], BASE_URI);
        assert_eq!(p.as_uri().unwrap(), *uri);
    }
}

#[test]
fn test_from_uri_splits_at_first_marker() {
    let p = ArtifactoryPath::from_uri(
        "https://jfrog.example.com/artifactory/generic/artifactory/readme.txt",
    )
    .unwrap();
    assert_eq!(p.base_uri(), "https://jfrog.example.com/artifactory");
    assert_eq!(p.as_str(), "/generic/artifactory/readme.txt");
}

#[test]
fn test_from_uri_without_marker() {
    let err = ArtifactoryPath::from_uri("http://artifactory:8080/repo").unwrap_err();
    assert!(matches!(err, ArtifactoryError::InvalidUri(_)));
}

#[test]
fn test_segments_join_like_posix_paths() {
    let p = ArtifactoryPath::new(["/repo", "dir", "file"], BASE_URI);
    assert_eq!(p.as_uri().unwrap(), format!("{BASE_URI}/repo/dir/file"));

    // An absolute segment restarts the path
    let p = ArtifactoryPath::new(["/repo", "dir", "/other", "file"], BASE_URI);
    assert_eq!(p.as_str(), "/other/file");

    let p = ArtifactoryPath::from_uri("http://artifactory:8080/artifactory/repo/").unwrap();
    assert_eq!(p.joinpath("dir").as_str(), "/repo/dir");
}
