use upload_api::{
    config::StorageTarget,
    domain::upload::{
        clock::UploadClock,
        value_objects::{StoredFileName, sanitize_file_name},
    },
};

#[test]
fn stored_name_keeps_original_readable() {
    let name = StoredFileName::new(1_718_000_000_000, "Hotel Lobby 2.jpg");
    assert_eq!(name.as_str(), "1718000000000_Hotel_Lobby_2.jpg");
}

#[test]
fn sanitizing_never_yields_a_path() {
    for raw in ["../a.png", "/etc/shadow", "dir\\sub\\b.png", "..", "   "] {
        let clean = sanitize_file_name(raw);
        assert!(!clean.is_empty(), "{raw:?} produced an empty name");
        assert!(!clean.contains('/') && !clean.contains('\\'), "{raw:?} -> {clean}");
        assert!(!clean.starts_with('.'), "{raw:?} -> {clean}");
    }
}

#[test]
fn same_original_twice_gets_two_names() {
    let clock = UploadClock::new();
    let a = StoredFileName::new(clock.next_stamp(), "post.png");
    let b = StoredFileName::new(clock.next_stamp(), "post.png");
    assert_ne!(a, b);
}

#[test]
fn storage_targets_parse_from_deployment_strings() {
    assert_eq!("local".parse::<StorageTarget>(), Ok(StorageTarget::Local));
    assert_eq!(
        "local+shared".parse::<StorageTarget>(),
        Ok(StorageTarget::LocalShared)
    );
    assert_eq!("REMOTE".parse::<StorageTarget>(), Ok(StorageTarget::Remote));
    assert_eq!("s3".parse::<StorageTarget>(), Ok(StorageTarget::S3));
    assert!("dropbox".parse::<StorageTarget>().is_err());
    assert!(StorageTarget::LocalShared.is_local());
    assert!(!StorageTarget::Remote.is_local());
}
