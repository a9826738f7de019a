use super::*;

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn decode_image_accepts_valid_png() {
    let decoded = decode_image(&tiny_png()).unwrap();
    assert_eq!((decoded.width, decoded.height), (2, 2));
    assert_eq!(decoded.rgba.len(), 2 * 2 * 4);
    assert_eq!(&decoded.rgba[..4], &[255, 0, 0, 255]);
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(&[]).is_err());
}

#[test]
fn fetch_status_equality_is_structural() {
    assert_eq!(FetchStatus::Idle, FetchStatus::Idle);
    assert_eq!(
        FetchStatus::Failed("https://x.test/a.png".into()),
        FetchStatus::Failed("https://x.test/a.png".into())
    );
    assert_ne!(
        FetchStatus::Failed("https://x.test/a.png".into()),
        FetchStatus::Failed("https://x.test/b.png".into())
    );
    assert_ne!(FetchStatus::Idle, FetchStatus::Fetching);
}

#[test]
fn http_fetcher_builds() {
    assert!(HttpFetcher::new().is_ok());
}
