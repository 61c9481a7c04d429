use proptest::prelude::*;

use decoy_vault::processing::packer::{grow_canvas, read_length_header, required_pixels};
use decoy_vault::processing::{DecoyGenerator, PixelPacker};

proptest! {
    #[test]
    fn pack_unpack_inverse(
        payload in prop::collection::vec(any::<u8>(), 0..600),
        w in 0u32..40,
        h in 0u32..40,
    ) {
        let packer = PixelPacker::new();
        let img = packer.pack(&payload, w, h, &mut DecoyGenerator::new()).unwrap();

        prop_assert!(img.pixel_count() >= required_pixels(payload.len() as u64));
        prop_assert_eq!(read_length_header(&img), Some(payload.len() as u32));
        prop_assert_eq!(packer.unpack(&img).unwrap(), payload);
    }

    #[test]
    fn canvas_never_shrinks_and_always_fits(
        w in 0u32..5000,
        h in 0u32..5000,
        required in 2u64..5_000_000,
    ) {
        let (gw, gh) = grow_canvas(w, h, required);
        prop_assert!(gw * gh >= required);
        if w > 0 && h > 0 {
            prop_assert!(gw >= w as u64 && gh >= h as u64);
        }
    }

    #[test]
    fn growth_leaves_less_than_a_line_of_slack(
        w in 1u32..500,
        h in 1u32..500,
        required in 2u64..1_000_000,
    ) {
        let (gw, gh) = grow_canvas(w, h, required);
        prop_assert!(gw >= w as u64 && gh >= h as u64);
        prop_assert!(gw * gh >= required);
        if (w as u64) * (h as u64) < required {
            prop_assert!(gw * gh - required < gw.max(gh));
        }
    }

    #[test]
    fn growth_is_transpose_symmetric(
        w in 1u32..2000,
        h in 1u32..2000,
        required in 2u64..2_000_000,
    ) {
        let (aw, ah) = grow_canvas(w, h, required);
        let (bw, bh) = grow_canvas(h, w, required);
        prop_assert_eq!(aw * ah, bw * bh);
    }
}
