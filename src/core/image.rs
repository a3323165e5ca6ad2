use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use imageproc::corners::corners_fast9;
use std::sync::OnceLock;

/// Bits in the perceptual hash
const HASH_BITS: u32 = 64;

/// FAST corner detection threshold
const FAST_THRESHOLD: u8 = 32;

/// Strongest keypoints kept per image, bounding descriptor matching cost
const MAX_KEYPOINTS: usize = 400;

/// Half-width of the descriptor sampling window around a keypoint
const PATCH_RADIUS: u32 = 15;

/// Lowe ratio for the nearest-neighbour test
const MATCH_RATIO: f32 = 0.75;

fn phash_hasher() -> &'static Hasher {
    static HASHER: OnceLock<Hasher> = OnceLock::new();
    HASHER.get_or_init(|| {
        // 8x8 DCT hash, 64 bits
        HasherConfig::new()
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher()
    })
}

/// Perceptual-hash similarity between two decoded images
///
/// Hamming distance over 64-bit DCT hashes, mapped to
/// `max(0, 1 - distance/64)`.
pub fn phash_similarity(a: &DynamicImage, b: &DynamicImage) -> f64 {
    let hasher = phash_hasher();
    let hash_a = hasher.hash_image(a);
    let hash_b = hasher.hash_image(b);
    let distance = hash_a.dist(&hash_b) as f64;
    (1.0 - distance / HASH_BITS as f64).max(0.0)
}

/// 256-bit binary patch descriptor around one keypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor([u64; 4]);

impl Descriptor {
    fn hamming(&self, other: &Descriptor) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Fixed pseudo-random intensity test pairs within the sampling window.
/// The pattern must be identical for every image, so it is generated once
/// from a constant seed.
fn test_pairs() -> &'static Vec<(i32, i32, i32, i32)> {
    static PAIRS: OnceLock<Vec<(i32, i32, i32, i32)>> = OnceLock::new();
    PAIRS.get_or_init(|| {
        let span = (2 * PATCH_RADIUS + 1) as u64;
        let mut state: u64 = 0x5973_470b_dba6_22c1;
        let mut next_offset = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % span) as i32 - PATCH_RADIUS as i32
        };
        (0..256)
            .map(|_| (next_offset(), next_offset(), next_offset(), next_offset()))
            .collect()
    })
}

/// Extract binary descriptors at FAST corners
///
/// Keypoints too close to the border for a full sampling window are
/// discarded. Returns an empty vector for featureless images.
pub fn extract_descriptors(img: &DynamicImage) -> Vec<Descriptor> {
    let gray = img.to_luma8();
    let (width, height) = gray.dimensions();
    if width <= 2 * PATCH_RADIUS || height <= 2 * PATCH_RADIUS {
        return Vec::new();
    }

    let mut corners = corners_fast9(&gray, FAST_THRESHOLD);
    corners.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    corners.truncate(MAX_KEYPOINTS);

    let pairs = test_pairs();
    let mut descriptors = Vec::with_capacity(corners.len());

    for corner in corners {
        if corner.x < PATCH_RADIUS
            || corner.y < PATCH_RADIUS
            || corner.x + PATCH_RADIUS >= width
            || corner.y + PATCH_RADIUS >= height
        {
            continue;
        }

        let mut bits = [0u64; 4];
        for (i, &(dx1, dy1, dx2, dy2)) in pairs.iter().enumerate() {
            let p1 = gray
                .get_pixel(
                    (corner.x as i32 + dx1) as u32,
                    (corner.y as i32 + dy1) as u32,
                )
                .0[0];
            let p2 = gray
                .get_pixel(
                    (corner.x as i32 + dx2) as u32,
                    (corner.y as i32 + dy2) as u32,
                )
                .0[0];
            if p1 < p2 {
                bits[i / 64] |= 1u64 << (i % 64);
            }
        }
        descriptors.push(Descriptor(bits));
    }

    descriptors
}

/// Fraction of source descriptors with an unambiguous nearest neighbour
///
/// Brute-force nearest-neighbour matching with the Lowe ratio test; the
/// fraction is `good_matches / max(len_a, len_b)`. `None` when either
/// image has no extractable features.
pub fn match_fraction(a: &[Descriptor], b: &[Descriptor]) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let mut good = 0usize;
    for descriptor in a {
        let mut best = u32::MAX;
        let mut second = u32::MAX;
        for other in b {
            let dist = descriptor.hamming(other);
            if dist < best {
                second = best;
                best = dist;
            } else if dist < second {
                second = dist;
            }
        }
        if second == u32::MAX {
            // only one candidate descriptor; accept close matches outright
            if best <= 32 {
                good += 1;
            }
        } else if (best as f32) < MATCH_RATIO * (second as f32) {
            good += 1;
        }
    }

    Some(good as f64 / a.len().max(b.len()) as f64)
}
