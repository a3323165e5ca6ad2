// Integration tests for shopmatch
//
// Image-serving tests run against a local mockito server so no real
// network is involved.

use shopmatch::core::{Matcher, DEFAULT_TEXT_THRESHOLD};
use shopmatch::models::Product;
use shopmatch::services::ImageFetcher;
use std::sync::Arc;

fn product(title: &str, price: f64) -> Product {
    Product {
        title: title.to_string(),
        image_url: None,
        price,
        url: None,
    }
}

fn product_with_image(title: &str, price: f64, image_url: &str) -> Product {
    Product {
        title: title.to_string(),
        image_url: Some(image_url.to_string()),
        price,
        url: None,
    }
}

fn matcher() -> Matcher {
    Matcher::with_defaults(Arc::new(ImageFetcher::new(5, 64, 300)))
}

/// Deterministic noise PNG; distinct seeds give distinct content
fn png_bytes(seed: u64, width: u32, height: u32) -> Vec<u8> {
    let mut img = image::RgbImage::new(width, height);
    let mut state = seed | 1;
    for pixel in img.pixels_mut() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        *pixel = image::Rgb([
            (state & 0xff) as u8,
            ((state >> 8) & 0xff) as u8,
            ((state >> 16) & 0xff) as u8,
        ]);
    }
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}

#[tokio::test]
async fn test_cjk_titles_no_images() {
    // source/candidate pair from real marketplace listings
    let source = product("夏季新款连衣裙女2024流行宽松显瘦气质长裙", 128.0);
    let candidate = product("连衣裙女2024新款夏季显瘦气质长裙", 59.0);

    let outcome = matcher()
        .match_products(&source, vec![candidate], DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    let best = &outcome.matches[0];
    assert!(best.text_similarity >= 0.6);
    assert_eq!(best.image_similarity, 0.0);
    assert!((best.composite_score - 0.7 * best.text_similarity).abs() < 1e-12);
}

#[tokio::test]
async fn test_empty_candidate_list() {
    let outcome = matcher()
        .match_products(&product("summer dress", 100.0), vec![], DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();
    assert!(outcome.matches.is_empty());
}

#[tokio::test]
async fn test_all_candidates_below_threshold() {
    let source = product("夏季连衣裙女长裙", 128.0);
    let candidates = vec![
        product("mechanical keyboard rgb", 59.0),
        product("usb charging cable", 9.0),
    ];

    let outcome = matcher()
        .match_products(&source, candidates, DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();

    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.total_candidates, 2);
}

#[tokio::test]
async fn test_determinism_without_network() {
    let matcher = matcher();
    let source = product("red running shoes lightweight", 80.0);
    let candidates = vec![
        product("red running shoes", 35.0),
        product("red shoes", 30.0),
        product("running shoes lightweight", 40.0),
    ];

    let first = matcher
        .match_products(&source, candidates.clone(), 0.0)
        .await
        .unwrap();
    let second = matcher.match_products(&source, candidates, 0.0).await.unwrap();

    assert_eq!(first.matches.len(), second.matches.len());
    for (a, b) in first.matches.iter().zip(second.matches.iter()) {
        assert_eq!(a.product.title, b.product.title);
        assert_eq!(a.text_similarity, b.text_similarity);
        assert_eq!(a.composite_score, b.composite_score);
    }
}

#[tokio::test]
async fn test_score_bounds() {
    let source = product("red running shoes lightweight", 80.0);
    let candidates = vec![
        product("red running shoes lightweight", 40.0),
        product("red shoes", 30.0),
        product("连衣裙", 20.0),
    ];

    let outcome = matcher().match_products(&source, candidates, 0.0).await.unwrap();
    for scored in &outcome.matches {
        assert!((0.0..=1.0).contains(&scored.text_similarity));
        assert!((0.0..=1.0).contains(&scored.image_similarity));
        assert!((0.0..=1.0).contains(&scored.composite_score));
    }
}

#[tokio::test]
async fn test_unreachable_image_degrades_to_zero() {
    let mut server = mockito::Server::new_async().await;
    let source_png = png_bytes(7, 64, 64);
    let _source_mock = server
        .mock("GET", "/source.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(source_png)
        .create_async()
        .await;
    let _missing_mock = server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;

    let source = product_with_image(
        "summer dress",
        128.0,
        &format!("{}/source.png", server.url()),
    );
    let candidate = product_with_image(
        "summer dress",
        59.0,
        &format!("{}/missing.png", server.url()),
    );

    let outcome = matcher()
        .match_products(&source, vec![candidate], DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();

    // candidate still scored on text alone
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].image_similarity, 0.0);
}

#[tokio::test]
async fn test_undecodable_image_degrades_to_zero() {
    let mut server = mockito::Server::new_async().await;
    let _source_mock = server
        .mock("GET", "/source.png")
        .with_status(200)
        .with_body(png_bytes(7, 64, 64))
        .create_async()
        .await;
    let _garbage_mock = server
        .mock("GET", "/garbage.png")
        .with_status(200)
        .with_body(b"not an image".to_vec())
        .create_async()
        .await;

    let source = product_with_image(
        "summer dress",
        128.0,
        &format!("{}/source.png", server.url()),
    );
    let candidate = product_with_image(
        "summer dress",
        59.0,
        &format!("{}/garbage.png", server.url()),
    );

    let outcome = matcher()
        .match_products(&source, vec![candidate], DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].image_similarity, 0.0);
}

#[tokio::test]
async fn test_matching_image_ranks_above_failed_image() {
    let mut server = mockito::Server::new_async().await;
    let png = png_bytes(7, 64, 64);
    let _source_mock = server
        .mock("GET", "/source.png")
        .with_status(200)
        .with_body(png.clone())
        .create_async()
        .await;
    let _same_mock = server
        .mock("GET", "/same.png")
        .with_status(200)
        .with_body(png)
        .create_async()
        .await;
    let _broken_mock = server
        .mock("GET", "/broken.png")
        .with_status(500)
        .create_async()
        .await;

    let source = product_with_image(
        "summer dress",
        128.0,
        &format!("{}/source.png", server.url()),
    );
    // equal text similarity: identical titles
    let with_image = product_with_image("summer dress", 60.0, &format!("{}/same.png", server.url()));
    let without_image =
        product_with_image("summer dress", 59.0, &format!("{}/broken.png", server.url()));

    let outcome = matcher()
        .match_products(&source, vec![without_image, with_image], DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.matches[0].product.price, 60.0);
    assert_eq!(outcome.matches[0].image_similarity, 1.0);
    assert_eq!(outcome.matches[1].image_similarity, 0.0);
    assert!(outcome.matches[0].composite_score > outcome.matches[1].composite_score);
}

#[tokio::test]
async fn test_candidate_without_image_still_included() {
    let mut server = mockito::Server::new_async().await;
    let _source_mock = server
        .mock("GET", "/source.png")
        .with_status(200)
        .with_body(png_bytes(7, 64, 64))
        .create_async()
        .await;

    let source = product_with_image(
        "summer dress",
        128.0,
        &format!("{}/source.png", server.url()),
    );
    let candidate = product("summer dress", 59.0);

    let outcome = matcher()
        .match_products(&source, vec![candidate], DEFAULT_TEXT_THRESHOLD)
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].image_similarity, 0.0);
}

#[tokio::test]
async fn test_advanced_match_with_identical_images() {
    let mut server = mockito::Server::new_async().await;
    let png = png_bytes(11, 128, 128);
    let _source_mock = server
        .mock("GET", "/source.png")
        .with_status(200)
        .with_body(png.clone())
        .create_async()
        .await;
    let _candidate_mock = server
        .mock("GET", "/candidate.png")
        .with_status(200)
        .with_body(png)
        .create_async()
        .await;
    let _broken_mock = server
        .mock("GET", "/broken.png")
        .with_status(404)
        .create_async()
        .await;

    let source = product_with_image(
        "summer dress",
        128.0,
        &format!("{}/source.png", server.url()),
    );
    let candidates = vec![
        product_with_image("summer dress", 59.0, &format!("{}/candidate.png", server.url())),
        // unfetchable image: skipped in this mode, not scored at zero
        product_with_image("summer dress", 49.0, &format!("{}/broken.png", server.url())),
    ];

    let outcome = matcher().advanced_match(&source, candidates).await.unwrap();

    assert_eq!(outcome.total_candidates, 2);
    assert_eq!(outcome.matches.len(), 1);
    let best = &outcome.matches[0];
    assert_eq!(best.product.price, 59.0);
    // no text gate in this mode; composite carries the full text weight
    assert!(best.composite_score >= 0.6 * best.text_similarity - 1e-9);
}
