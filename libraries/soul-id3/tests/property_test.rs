//! Property-based tests for the ID3 engine
//!
//! Uses proptest to check codec invariants across random inputs.

use proptest::prelude::*;
use soul_id3::{
    decode_sync_safe, encode_sync_safe, read_tag, resynchronise, unsynchronise, write_tag, Frame,
    FrameId, Tag, TagVersion, TimestampAccumulator, MAX_SYNC_SAFE,
};

// ===== Helpers =====

fn v2_version() -> impl Strategy<Value = TagVersion> {
    prop_oneof![
        Just(TagVersion::V2_2),
        Just(TagVersion::V2_3),
        Just(TagVersion::V2_4),
    ]
}

fn title_id(version: TagVersion) -> FrameId {
    let id = if version == TagVersion::V2_2 { "TT2" } else { "TIT2" };
    FrameId::new(id).unwrap()
}

// ===== Property Tests =====

proptest! {
    /// Property: sync-safe encoding is lossless below 2^28 and never sets bit 7
    #[test]
    fn sync_safe_round_trip(value in 0u32..=MAX_SYNC_SAFE) {
        let bytes = encode_sync_safe(value);
        prop_assert!(bytes.iter().all(|b| b & 0x80 == 0));
        prop_assert_eq!(decode_sync_safe(bytes), value);
    }

    /// Property: unsynchronisation is reversible and leaves no false sync
    #[test]
    fn unsynchronisation_round_trip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let stuffed = unsynchronise(&data);
        prop_assert!(stuffed.windows(2).all(|w| !(w[0] == 0xFF && w[1] >= 0xE0)));
        prop_assert_eq!(resynchronise(&stuffed), data);
    }

    /// Property: any printable text survives write then read in every version
    #[test]
    fn text_survives_write_and_read(version in v2_version(), text in "\\PC{1,40}") {
        let mut tag = Tag::new(version);
        tag.set_frame(Frame::with_text(title_id(version), version, text.clone()).unwrap());

        let bytes = write_tag(&tag, None).unwrap();
        let reread = read_tag(&bytes).unwrap();
        prop_assert_eq!(reread.version(), version);
        prop_assert_eq!(reread.frame(title_id(version).as_str()).unwrap().text(), Some(text.as_str()));
    }

    /// Property: the timestamp fold does not depend on fragment order or repetition
    #[test]
    fn timestamp_fold_is_order_independent(
        year in 1000u32..=9999,
        day in 1u32..=28,
        month in 1u32..=12,
        hour in 0u32..24,
        minute in 0u32..60,
        order in Just(vec![0usize, 1, 2, 0, 2]).prop_shuffle(),
    ) {
        let fragments = [
            ("TYER", format!("{year:04}")),
            ("TDAT", format!("{day:02}{month:02}")),
            ("TIME", format!("{hour:02}{minute:02}")),
        ];
        let mut acc = TimestampAccumulator::default();
        for i in order {
            let (id, text) = &fragments[i];
            acc.add(FrameId::new(id).unwrap(), text);
        }
        let fold = acc.finish();
        let expected = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}");
        let frame = fold.frame.unwrap();
        prop_assert_eq!(frame.text(), Some(expected.as_str()));
        prop_assert!(fold.unavailable.is_empty());
    }

    /// Property: padding up to a size hint never changes the frames
    #[test]
    fn padding_hint_is_honoured(hint in 0u32..4096) {
        let mut tag = Tag::new(TagVersion::V2_4);
        tag.set_frame(Frame::with_text(title_id(TagVersion::V2_4), TagVersion::V2_4, "Song").unwrap());

        let bytes = write_tag(&tag, Some(hint)).unwrap();
        // 10 header + 15 frame
        if hint >= 25 {
            prop_assert_eq!(bytes.len(), hint as usize);
        } else {
            prop_assert_eq!(bytes.len(), 25 + 1024);
        }
        let reread = read_tag(&bytes).unwrap();
        prop_assert_eq!(reread.frames(), tag.frames());
    }
}
