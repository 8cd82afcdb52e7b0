/// Scenario tests for reading, writing and converting whole tags
use soul_id3::{
    convert_tag, read_tag, tag_region, write_tag, FieldKey, FieldName, FieldValue, Frame,
    FrameBody, FrameId, Picture, PictureType, ScanStop, Tag, TagVersion, TextEncoding, V1Tag,
};

fn v23_tag_bytes(frames: &[u8]) -> Vec<u8> {
    let mut out = b"ID3\x03\x00\x00".to_vec();
    out.extend_from_slice(&soul_id3::encode_sync_safe(frames.len() as u32));
    out.extend_from_slice(frames);
    out
}

fn text(id: &str, version: TagVersion, value: &str) -> Frame {
    Frame::with_text(FrameId::new(id).unwrap(), version, value).unwrap()
}

#[test]
fn year_date_time_fold_into_one_timestamp() {
    let frames = b"TYER\x00\x00\x00\x05\x00\x00\x002001\
TDAT\x00\x00\x00\x05\x00\x00\x001504\
TIME\x00\x00\x00\x05\x00\x00\x001230";
    let tag = read_tag(&v23_tag_bytes(frames)).unwrap();
    assert_eq!(tag.len(), 3);

    let (converted, report) = convert_tag(&tag, TagVersion::V2_4).unwrap();
    assert!(report.unavailable.is_empty());
    assert_eq!(converted.len(), 1);
    assert_eq!(converted.frame("TDRC").unwrap().text(), Some("2001-04-15T12:30"));
    assert_eq!(converted.get(FieldKey::Year).as_deref(), Some("2001"));
}

#[test]
fn oversized_frame_stops_the_scan() {
    let frames = b"TIT2\x00\x00\x00\x02\x00\x00\x00A\
TPE1\x00\x00\x10\x00\x00\x00\x00B";
    let tag = read_tag(&v23_tag_bytes(frames)).unwrap();
    assert_eq!(tag.len(), 1);
    assert_eq!(tag.get(FieldKey::Title).as_deref(), Some("A"));
    assert_eq!(tag.diagnostics.stopped_by, Some(ScanStop::Truncated));
}

#[test]
fn padding_keeps_earlier_frames() {
    let mut frames = b"TIT2\x00\x00\x00\x02\x00\x00\x00A\
TALB\x00\x00\x00\x02\x00\x00\x00B"
        .to_vec();
    frames.extend_from_slice(&[0; 64]);
    let tag = read_tag(&v23_tag_bytes(&frames)).unwrap();
    assert_eq!(tag.len(), 2);
    assert_eq!(tag.diagnostics.padding_bytes, 64);
    assert_eq!(tag.diagnostics.stopped_by, Some(ScanStop::Padding));
}

#[test]
fn utf8_in_v23_is_written_as_utf16() {
    let mut tag = Tag::new(TagVersion::V2_3);
    let mut title = text("TIT2", TagVersion::V2_3, "日本の歌");
    title.known_mut().unwrap().set_encoding(TextEncoding::Utf8);
    tag.set_frame(title);
    let mut album = text("TALB", TagVersion::V2_3, "Plain");
    album.known_mut().unwrap().set_encoding(TextEncoding::Utf8);
    tag.set_frame(album);

    let bytes = write_tag(&tag, None).unwrap();
    let at = |id: &[u8]| bytes.windows(4).position(|w| w == id).unwrap();
    assert_eq!(bytes[at(b"TIT2") + 10], 0x01);
    assert_eq!(bytes[at(b"TALB") + 10], 0x00);

    let reread = read_tag(&bytes).unwrap();
    assert_eq!(reread.get(FieldKey::Title).as_deref(), Some("日本の歌"));
    assert_eq!(reread.get(FieldKey::Album).as_deref(), Some("Plain"));
}

#[test]
fn unknown_frames_pass_through_untouched() {
    let frames = b"XYZW\x00\x00\x00\x03\x00\x00\x01\x02\x03\
TIT2\x00\x00\x00\x02\x00\x00\x00A";
    let tag = read_tag(&v23_tag_bytes(frames)).unwrap();
    let unknown = tag.frame("XYZW").unwrap();
    assert!(matches!(&unknown.body, FrameBody::Unsupported(raw) if raw.data == [1, 2, 3]));

    let bytes = write_tag(&tag, None).unwrap();
    let raw: &[u8] = b"XYZW\x00\x00\x00\x03\x00\x00\x01\x02\x03";
    assert!(bytes.windows(raw.len()).any(|w| w == raw));

    let (v24, report) = convert_tag(&tag, TagVersion::V2_4).unwrap();
    assert!(report.unavailable.is_empty());
    assert!(v24.frame("XYZW").is_some());
}

#[test]
fn conversion_there_and_back_keeps_values() {
    let mut tag = Tag::new(TagVersion::V2_3);
    for (id, value) in [
        ("TIT2", "Olson"),
        ("TPE1", "Boards of Canada"),
        ("TYER", "1998"),
        ("TDAT", "2004"),
        ("TIME", "0930"),
        ("TCON", "(17)Rock"),
        ("TRCK", "3/17"),
    ] {
        tag.set_frame(text(id, TagVersion::V2_3, value));
    }
    tag.set(FieldKey::Comment, "short").unwrap();

    let (v24, report) = convert_tag(&tag, TagVersion::V2_4).unwrap();
    assert!(report.unavailable.is_empty());
    assert_eq!(v24.frame("TDRC").unwrap().text(), Some("1998-04-20T09:30"));

    let (back, report) = convert_tag(&v24, TagVersion::V2_3).unwrap();
    assert!(report.unavailable.is_empty());

    let summary = |tag: &Tag| {
        let mut frames: Vec<(String, FrameBody)> = tag
            .frames()
            .iter()
            .map(|f| (f.id.to_string(), f.body.clone()))
            .collect();
        frames.sort_by(|a, b| a.0.cmp(&b.0));
        frames
    };
    assert_eq!(summary(&back), summary(&tag));
}

#[test]
fn v22_chain_conversion() {
    let mut tag = Tag::new(TagVersion::V2_2);
    tag.set(FieldKey::Title, "Dayvan Cowboy").unwrap();
    tag.set(FieldKey::Year, "2006").unwrap();
    tag.add_picture(&Picture {
        mime_type: "image/png".into(),
        picture_type: PictureType::FrontCover,
        description: "cover".into(),
        data: vec![0x89, b'P', b'N', b'G'],
    })
    .unwrap();

    let (v24, report) = convert_tag(&tag, TagVersion::V2_4).unwrap();
    assert!(report.unavailable.is_empty());
    assert_eq!(v24.get(FieldKey::Title).as_deref(), Some("Dayvan Cowboy"));
    assert_eq!(v24.frame("TDRC").unwrap().text(), Some("2006"));
    assert_eq!(v24.pictures(), tag.pictures());
}

#[test]
fn read_then_write_preserves_values() {
    let mut tag = Tag::new(TagVersion::V2_4);
    tag.set(FieldKey::Title, "Music Is Math").unwrap();
    tag.set(FieldKey::Artist, "Boards of Canada").unwrap();
    tag.set(FieldKey::TrackNumber, "7").unwrap();
    tag.set(FieldKey::TrackTotal, "18").unwrap();
    tag.set(FieldKey::Genre, "Electronic\0IDM").unwrap();
    tag.set(FieldKey::Lyrics, "instrumental").unwrap();
    tag.set_user_text("MOOD", "hazy").unwrap();

    let first = write_tag(&tag, None).unwrap();
    let reread = read_tag(&first).unwrap();
    for key in [
        FieldKey::Title,
        FieldKey::Artist,
        FieldKey::TrackNumber,
        FieldKey::TrackTotal,
        FieldKey::Lyrics,
    ] {
        assert_eq!(reread.get(key), tag.get(key), "{key}");
    }
    assert_eq!(reread.get_all(FieldKey::Genre), vec!["Electronic", "IDM"]);
    assert_eq!(reread.user_text("MOOD"), Some("hazy"));

    let second = write_tag(&reread, Some(first.len() as u32)).unwrap();
    assert_eq!(second, first);
}

#[test]
fn whole_file_with_both_tags() {
    let mut tag = Tag::new(TagVersion::V2_4);
    tag.set(FieldKey::Title, "Aquarius").unwrap();
    let v1 = V1Tag::from_v2(&tag);

    let mut file = write_tag(&tag, None).unwrap();
    let v2_len = file.len();
    file.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    file.extend_from_slice(&v1.to_bytes());

    let region = tag_region(&file);
    assert_eq!(region.v2, Some(0..v2_len));
    assert_eq!(region.audio(file.len()), v2_len..v2_len + 4);

    let parsed_v1 = V1Tag::parse(&file[region.v1.clone().unwrap()]).unwrap();
    assert_eq!(parsed_v1.title, "Aquarius");
    assert_eq!(read_tag(&file).unwrap().get(FieldKey::Title).as_deref(), Some("Aquarius"));
}

#[test]
fn synced_lyrics_survive_conversion_and_rewrite() {
    let lines = vec![("Ágætis byrjun".to_string(), 1000), ("東京".to_string(), 2500)];
    let mut sylt = Frame::empty(FrameId::new("SYLT").unwrap(), TagVersion::V2_4);
    let body = sylt.known_mut().unwrap();
    body.set_encoding(TextEncoding::Utf8);
    body.set_text(FieldName::Language, "isl").unwrap();
    body.set_int(FieldName::TimestampFormat, 2).unwrap();
    body.set(FieldName::SyncedText, FieldValue::Synced(lines.clone()))
        .unwrap();
    let mut tag = Tag::new(TagVersion::V2_4);
    tag.push_frame(sylt);

    let (v23, report) = convert_tag(&tag, TagVersion::V2_3).unwrap();
    assert!(report.unavailable.is_empty());
    let reread = read_tag(&write_tag(&v23, None).unwrap()).unwrap();
    let body = reread.frame("SYLT").unwrap().known().unwrap();
    assert_eq!(body.encoding(), Some(TextEncoding::Utf16));
    assert_eq!(body.get(FieldName::SyncedText), Some(&FieldValue::Synced(lines)));

    let latin_only = vec![("Hello".to_string(), 1000)];
    let mut tag = v23;
    tag.frame_mut("SYLT")
        .and_then(Frame::known_mut)
        .unwrap()
        .set(FieldName::SyncedText, FieldValue::Synced(latin_only.clone()))
        .unwrap();
    let rewritten = read_tag(&write_tag(&tag, None).unwrap()).unwrap();
    let body = rewritten.frame("SYLT").unwrap().known().unwrap();
    assert_eq!(body.get(FieldName::SyncedText), Some(&FieldValue::Synced(latin_only)));
}
