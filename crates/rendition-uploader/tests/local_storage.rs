use std::sync::Arc;

use rendition_core::{Config, StorageBackend};
use rendition_storage::create_storage;
use rendition_uploader::{Mount, UploadedFile, Uploader, UploaderBuilder, VersionOptions};
use tempfile::tempdir;

#[tokio::test]
async fn test_versions_land_next_to_the_original_on_disk() {
    let dir = tempdir().unwrap();
    let config = Config {
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(dir.path().display().to_string()),
        local_storage_base_url: Some("http://localhost:3000/files".to_string()),
        store_dir: "files".to_string(),
        cache_dir: "files/cache".to_string(),
    };
    config.validate().unwrap();

    let storage = create_storage(&config).await.unwrap();
    let mut builder = UploaderBuilder::from_config(&config);
    builder.version("thumb", VersionOptions::when(|file| file.size() < 1024), |thumb| {
        thumb.version("small", VersionOptions::new(), |_| {});
    });

    let mut photo = Uploader::new(
        builder.build(),
        Arc::clone(&storage),
        Mount::new("post", "7", "photo"),
    );
    photo
        .store(Some(
            UploadedFile::new("cat.jpg", vec![7u8; 256]).with_content_type("image/jpeg"),
        ))
        .await
        .unwrap();

    let stored = dir.path().join("files/post/photo/7");
    for name in ["cat.jpg", "thumb_cat.jpg", "thumb_small_cat.jpg"] {
        assert!(stored.join(name).exists(), "{name} should be stored");
    }
    assert_eq!(
        photo.url(&["thumb", "small"]).unwrap().as_deref(),
        Some("http://localhost:3000/files/files/post/photo/7/thumb_small_cat.jpg")
    );

    photo.remove().await.unwrap();
    for name in ["cat.jpg", "thumb_cat.jpg", "thumb_small_cat.jpg"] {
        assert!(!stored.join(name).exists(), "{name} should be removed");
    }
}
