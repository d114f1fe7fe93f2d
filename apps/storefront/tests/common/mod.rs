//! Shared fixture: a catalog on disk, the local backend over it, and a
//! storefront driven through a recording platform.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use cafe_storefront::{LocalBackend, RecordingPlatform, Storefront, StorefrontConfig};

pub struct Harness {
    pub storefront: Storefront,
    pub platform: RecordingPlatform,
    pub backend: Arc<LocalBackend>,
    _data_dir: TempDir,
}

/// Writes the catalog into a fresh directory, removed when dropped.
pub fn write_catalog() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    std::fs::create_dir_all(dir.join("menu")).unwrap();

    let files = [
        (
            "info.json",
            json!({
                "name": "Laurel Cafe",
                "coverImage": "https://images.unsplash.com/cover.jpg",
                "logoImage": "/img/logo.png",
                "kitchenCategories": "Кофе, бургеры",
                "rating": "4.8",
                "cookingTime": "15-25 мин",
                "status": "Открыто"
            }),
        ),
        (
            "categories.json",
            json!([
                { "id": "coffee", "name": "Кофе", "icon": "coffee.svg", "backgroundColor": "#F4E1C1" },
                { "id": "burgers", "name": "Бургеры", "icon": "burger.svg", "backgroundColor": "#FFD6A5" }
            ]),
        ),
        (
            "menu/popular.json",
            json!([
                {
                    "id": "latte",
                    "name": "Латте",
                    "image": "https://images.unsplash.com/latte.jpg",
                    "variants": [
                        { "id": "s", "name": "S", "cost": "250" },
                        { "id": "m", "name": "M", "cost": 290 }
                    ]
                }
            ]),
        ),
        (
            "menu/coffee.json",
            json!([
                { "id": "espresso", "name": "Эспрессо", "variants": [{ "name": "30 мл", "cost": 150 }] },
                { "id": "cappuccino", "name": "Капучино", "variants": [{ "id": "s", "name": "S", "cost": 230 }] }
            ]),
        ),
    ];

    for (name, contents) in files {
        std::fs::write(dir.join(name), contents.to_string()).unwrap();
    }
    tmp
}

pub fn harness_with(configure: impl FnOnce(&mut StorefrontConfig)) -> Harness {
    let data_dir = write_catalog();
    let mut config = StorefrontConfig::default();
    config.api.data_dir = data_dir.path().to_path_buf();
    configure(&mut config);

    let backend = Arc::new(LocalBackend::new(&config).unwrap());
    let platform = RecordingPlatform::new("query_id=AAH&user=%7B%22id%22%3A7%7D");
    let storefront =
        Storefront::new(config, backend.clone(), Box::new(platform.clone())).unwrap();

    Harness {
        storefront,
        platform,
        backend,
        _data_dir: data_dir,
    }
}

pub fn harness() -> Harness {
    harness_with(|_| {})
}

/// Starts on the root page and waits for its catalog requests.
pub async fn started() -> Harness {
    let mut h = harness();
    h.storefront.start().unwrap();
    h.storefront.run_until_idle().await.unwrap();
    h
}
