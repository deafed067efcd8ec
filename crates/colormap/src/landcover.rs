//! MapBiomas Chile collection palette for land-cover codes

use crate::scheme::Rgb;

const PALETTE: &[(u16, Rgb)] = &[
    (3, Rgb::from_hex(0x1f8d49)),
    (9, Rgb::from_hex(0x7a5900)),
    (11, Rgb::from_hex(0x519799)),
    (12, Rgb::from_hex(0xd6bc74)),
    (21, Rgb::from_hex(0xffefc3)),
    (23, Rgb::from_hex(0xffa07a)),
    (24, Rgb::from_hex(0xd4271e)),
    (25, Rgb::from_hex(0xdb4d4f)),
    (27, Rgb::from_hex(0xffffff)),
    (29, Rgb::from_hex(0xffaa5f)),
    (33, Rgb::from_hex(0x2532e4)),
    (34, Rgb::from_hex(0x93dfe6)),
    (61, Rgb::from_hex(0xf5d5d5)),
    (66, Rgb::from_hex(0xa89358)),
];

/// Display color of a land-cover code
pub fn landcover_color(code: u16) -> Option<Rgb> {
    PALETTE
        .binary_search_by_key(&code, |(c, _)| *c)
        .ok()
        .map(|i| PALETTE[i].1)
}
