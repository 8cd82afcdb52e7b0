//! Logical field access
//!
//! Maps version-neutral keys (title, track number, ...) onto the frame and
//! sub-field that carries them in each tag version.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::body::FieldBody;
use crate::convert::{image_format_for_mime, mime_for_image_format};
use crate::error::{Id3Error, Result};
use crate::field::{FieldName, FieldValue};
use crate::frame::Frame;
use crate::frame_id::FrameId;
use crate::genre;
use crate::policy::Policy;
use crate::tag::Tag;
use crate::version::TagVersion;

/// Language written into new comment and lyrics frames
const DEFAULT_LANGUAGE: &str = "eng";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Composer,
    Conductor,
    Genre,
    Year,
    OriginalYear,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
    Comment,
    Lyrics,
    Bpm,
    Grouping,
    Publisher,
    Copyright,
    EncodedBy,
    Isrc,
    Compilation,
    Mood,
}

impl FieldKey {
    pub const ALL: [FieldKey; 23] = [
        Self::Title,
        Self::Artist,
        Self::Album,
        Self::AlbumArtist,
        Self::Composer,
        Self::Conductor,
        Self::Genre,
        Self::Year,
        Self::OriginalYear,
        Self::TrackNumber,
        Self::TrackTotal,
        Self::DiscNumber,
        Self::DiscTotal,
        Self::Comment,
        Self::Lyrics,
        Self::Bpm,
        Self::Grouping,
        Self::Publisher,
        Self::Copyright,
        Self::EncodedBy,
        Self::Isrc,
        Self::Compilation,
        Self::Mood,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::AlbumArtist => "album_artist",
            Self::Composer => "composer",
            Self::Conductor => "conductor",
            Self::Genre => "genre",
            Self::Year => "year",
            Self::OriginalYear => "original_year",
            Self::TrackNumber => "track_number",
            Self::TrackTotal => "track_total",
            Self::DiscNumber => "disc_number",
            Self::DiscTotal => "disc_total",
            Self::Comment => "comment",
            Self::Lyrics => "lyrics",
            Self::Bpm => "bpm",
            Self::Grouping => "grouping",
            Self::Publisher => "publisher",
            Self::Copyright => "copyright",
            Self::EncodedBy => "encoded_by",
            Self::Isrc => "isrc",
            Self::Compilation => "compilation",
            Self::Mood => "mood",
        }
    }

    /// Identifier of the frame holding this key in `version`
    pub fn frame_id(self, version: TagVersion) -> Option<&'static str> {
        let (v22, v23, v24) = match self {
            Self::Title => ("TT2", "TIT2", "TIT2"),
            Self::Artist => ("TP1", "TPE1", "TPE1"),
            Self::Album => ("TAL", "TALB", "TALB"),
            Self::AlbumArtist => ("TP2", "TPE2", "TPE2"),
            Self::Composer => ("TCM", "TCOM", "TCOM"),
            Self::Conductor => ("TP3", "TPE3", "TPE3"),
            Self::Genre => ("TCO", "TCON", "TCON"),
            Self::Year => ("TYE", "TYER", "TDRC"),
            Self::OriginalYear => ("TOR", "TORY", "TDOR"),
            Self::TrackNumber | Self::TrackTotal => ("TRK", "TRCK", "TRCK"),
            Self::DiscNumber | Self::DiscTotal => ("TPA", "TPOS", "TPOS"),
            Self::Comment => ("COM", "COMM", "COMM"),
            Self::Lyrics => ("ULT", "USLT", "USLT"),
            Self::Bpm => ("TBP", "TBPM", "TBPM"),
            Self::Grouping => ("TT1", "TIT1", "TIT1"),
            Self::Publisher => ("TPB", "TPUB", "TPUB"),
            Self::Copyright => ("TCR", "TCOP", "TCOP"),
            Self::EncodedBy => ("TEN", "TENC", "TENC"),
            Self::Isrc => ("TRC", "TSRC", "TSRC"),
            Self::Compilation => ("TCP", "TCMP", "TCMP"),
            Self::Mood => return (version == TagVersion::V2_4).then_some("TMOO"),
        };
        match version {
            TagVersion::V2_2 => Some(v22),
            TagVersion::V2_3 => Some(v23),
            TagVersion::V2_4 => Some(v24),
            TagVersion::V1 | TagVersion::V1_1 => None,
        }
    }

    fn is_described(self) -> bool {
        matches!(self, Self::Comment | Self::Lyrics)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = Id3Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| Id3Error::invalid_value(format!("unknown field key: {s}")))
    }
}

/// Position in an "n/m" value
#[derive(Clone, Copy)]
enum Part {
    Number,
    Total,
}

fn part_of(key: FieldKey) -> Option<Part> {
    match key {
        FieldKey::TrackNumber | FieldKey::DiscNumber => Some(Part::Number),
        FieldKey::TrackTotal | FieldKey::DiscTotal => Some(Part::Total),
        _ => None,
    }
}

fn split_position(text: &str) -> (Option<&str>, Option<&str>) {
    let non_empty: fn(&str) -> Option<&str> = |s| {
        let s = s.trim();
        (!s.is_empty()).then_some(s)
    };
    match text.split_once('/') {
        Some((n, m)) => (non_empty(n), non_empty(m)),
        None => (non_empty(text), None),
    }
}

fn join_position(number: Option<&str>, total: Option<&str>) -> String {
    match (number, total) {
        (Some(n), Some(m)) => format!("{n}/{m}"),
        (Some(n), None) => n.to_string(),
        (None, Some(m)) => format!("0/{m}"),
        (None, None) => String::new(),
    }
}

/// The 21 picture types of attached picture frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PictureType {
    Other,
    FileIcon,
    OtherFileIcon,
    FrontCover,
    BackCover,
    Leaflet,
    Media,
    LeadArtist,
    Artist,
    Conductor,
    Band,
    Composer,
    Lyricist,
    RecordingLocation,
    DuringRecording,
    DuringPerformance,
    ScreenCapture,
    BrightColouredFish,
    Illustration,
    BandLogo,
    PublisherLogo,
}

impl PictureType {
    /// Unknown values fall back to `Other`
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::FileIcon,
            0x02 => Self::OtherFileIcon,
            0x03 => Self::FrontCover,
            0x04 => Self::BackCover,
            0x05 => Self::Leaflet,
            0x06 => Self::Media,
            0x07 => Self::LeadArtist,
            0x08 => Self::Artist,
            0x09 => Self::Conductor,
            0x0A => Self::Band,
            0x0B => Self::Composer,
            0x0C => Self::Lyricist,
            0x0D => Self::RecordingLocation,
            0x0E => Self::DuringRecording,
            0x0F => Self::DuringPerformance,
            0x10 => Self::ScreenCapture,
            0x11 => Self::BrightColouredFish,
            0x12 => Self::Illustration,
            0x13 => Self::BandLogo,
            0x14 => Self::PublisherLogo,
            _ => Self::Other,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// An attached picture, independent of version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub mime_type: String,
    pub picture_type: PictureType,
    pub description: String,
    pub data: Vec<u8>,
}

impl Picture {
    fn from_body(body: &FieldBody) -> Self {
        let mime_type = match body.text(FieldName::ImageFormat) {
            Some(format) => mime_for_image_format(format),
            None => body.text(FieldName::MimeType).unwrap_or_default().to_string(),
        };
        Self {
            mime_type,
            picture_type: PictureType::from_byte(body.int(FieldName::PictureType).unwrap_or(0) as u8),
            description: body.text(FieldName::Description).unwrap_or_default().to_string(),
            data: body.binary(FieldName::PictureData).unwrap_or_default().to_vec(),
        }
    }
}

/// A comment or lyrics frame, independent of version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub language: String,
    pub description: String,
    pub text: String,
}

impl Comment {
    fn from_body(body: &FieldBody) -> Self {
        let text = |name| body.text(name).unwrap_or_default().to_string();
        Self {
            language: text(FieldName::Language),
            description: text(FieldName::Description),
            text: text(FieldName::Text),
        }
    }
}

fn frame_id_for(key: FieldKey, version: TagVersion) -> Result<FrameId> {
    let id = key.frame_id(version).ok_or_else(|| {
        Id3Error::UnsupportedFeature(format!("{key} is not available in {version}"))
    })?;
    FrameId::new(id)
}

fn field_error(id: FrameId) -> impl Fn(crate::error::FieldError) -> Id3Error {
    move |e| Id3Error::invalid_data(id.as_str(), e)
}

impl Tag {
    /// First value of `key`
    pub fn get(&self, key: FieldKey) -> Option<String> {
        self.get_all(key).into_iter().next()
    }

    /// Every value of `key`: multi-valued text frames are split and
    /// repeatable frames are all visited
    pub fn get_all(&self, key: FieldKey) -> Vec<String> {
        let Some(id) = key.frame_id(self.version()) else {
            return Vec::new();
        };
        if key.is_described() {
            return self
                .frames_with_id(id)
                .filter_map(|f| f.known())
                .map(|b| Comment::from_body(b).text)
                .collect();
        }

        let Some(text) = self.frame(id).and_then(|f| f.text()) else {
            return Vec::new();
        };
        if let Some(part) = part_of(key) {
            let (number, total) = split_position(text);
            let value = match part {
                Part::Number => number,
                Part::Total => total,
            };
            return value.map(str::to_string).into_iter().collect();
        }

        let text = match key {
            FieldKey::Genre if self.version() == TagVersion::V2_4 => genre::resolve(text),
            FieldKey::Genre => genre::resolve(&genre::v23_to_v24(text)),
            FieldKey::Year | FieldKey::OriginalYear => text.chars().take(4).collect(),
            _ => text.to_string(),
        };
        text.split('\0')
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Set `key` with the default policy
    pub fn set(&mut self, key: FieldKey, value: &str) -> Result<()> {
        self.set_with(key, value, &Policy::default())
    }

    /// Set `key`, creating the frame with the policy's encoding when needed
    ///
    /// An empty value removes the key.
    pub fn set_with(&mut self, key: FieldKey, value: &str, policy: &Policy) -> Result<()> {
        if value.is_empty() {
            self.remove(key);
            return Ok(());
        }
        let version = self.version();
        let id = frame_id_for(key, version)?;

        if key.is_described() {
            return self.set_described(id, value, policy);
        }

        let text = match part_of(key) {
            Some(part) => {
                let current = self.frame(id.as_str()).and_then(|f| f.text()).unwrap_or_default();
                let (number, total) = split_position(current);
                match part {
                    Part::Number => join_position(Some(value), total),
                    Part::Total => join_position(number, Some(value)),
                }
            }
            None => value.to_string(),
        };
        self.set_text_frame(id, text, policy)
    }

    /// Remove `key`; for track and disc totals only the total is dropped
    pub fn remove(&mut self, key: FieldKey) {
        let Some(id) = key.frame_id(self.version()) else {
            return;
        };
        if let Some(Part::Total) = part_of(key) {
            let number = self
                .frame(id)
                .and_then(|f| f.text())
                .and_then(|t| split_position(t).0.map(str::to_string));
            if let Some(number) = number {
                if let Some(body) = self.frame_mut(id).and_then(|f| f.known_mut()) {
                    if body.set_text(FieldName::Text, number).is_ok() {
                        return;
                    }
                }
            }
        } else if key.is_described() {
            self.retain(|f| {
                f.id != id || f.known().is_some_and(|b| !b.text(FieldName::Description).unwrap_or_default().is_empty())
            });
            return;
        }
        let removed = self.remove_frames(id);
        tracing::debug!("Removed {} {} frame(s) for {}", removed.len(), id, key);
    }

    fn set_text_frame(&mut self, id: FrameId, text: String, policy: &Policy) -> Result<()> {
        let version = self.version();
        if let Some(body) = self.frame_mut(id.as_str()).and_then(|f| f.known_mut()) {
            return body.set_text(FieldName::Text, text).map_err(field_error(id));
        }
        let mut frame = Frame::with_text(id, version, text)?;
        if let Some(body) = frame.known_mut() {
            body.set_encoding(policy.default_encoding(version));
        }
        self.set_frame(frame);
        Ok(())
    }

    /// Comment and lyrics keys address the frame with an empty description
    fn set_described(&mut self, id: FrameId, value: &str, policy: &Policy) -> Result<()> {
        let version = self.version();
        let existing = self.frames_with_id_mut(id.as_str()).find_map(|f| {
            f.known_mut()
                .filter(|b| b.text(FieldName::Description).unwrap_or_default().is_empty())
        });
        if let Some(body) = existing {
            return body.set_text(FieldName::Text, value).map_err(field_error(id));
        }
        self.add_comment_frame(
            id,
            &Comment {
                language: DEFAULT_LANGUAGE.to_string(),
                description: String::new(),
                text: value.to_string(),
            },
            policy,
        )?;
        tracing::debug!("Created {} frame in {} tag", id, version);
        Ok(())
    }

    fn add_comment_frame(&mut self, id: FrameId, comment: &Comment, policy: &Policy) -> Result<()> {
        let version = self.version();
        let mut frame = Frame::empty(id, version);
        let body = frame
            .known_mut()
            .ok_or_else(|| Id3Error::invalid_value(format!("{id} is not a known frame")))?;
        body.set_encoding(policy.default_encoding(version));
        body.set_text(FieldName::Language, comment.language.as_str())
            .and_then(|()| body.set_text(FieldName::Description, comment.description.as_str()))
            .and_then(|()| body.set_text(FieldName::Text, comment.text.as_str()))
            .map_err(field_error(id))?;
        self.push_frame(frame);
        Ok(())
    }

    pub fn comments(&self) -> Vec<Comment> {
        FieldKey::Comment
            .frame_id(self.version())
            .map(|id| {
                self.frames_with_id(id)
                    .filter_map(|f| f.known())
                    .map(Comment::from_body)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Add a comment, replacing one with the same language and description
    pub fn add_comment(&mut self, comment: &Comment) -> Result<()> {
        let id = frame_id_for(FieldKey::Comment, self.version())?;
        self.retain(|f| {
            f.id != id
                || f.known().map_or(true, |b| {
                    let existing = Comment::from_body(b);
                    existing.language != comment.language || existing.description != comment.description
                })
        });
        self.add_comment_frame(id, comment, &Policy::default())
    }

    pub fn pictures(&self) -> Vec<Picture> {
        let id = if self.version() == TagVersion::V2_2 { "PIC" } else { "APIC" };
        self.frames_with_id(id)
            .filter_map(|f| f.known())
            .map(Picture::from_body)
            .collect()
    }

    /// Attach a picture, replacing one with the same type and description
    pub fn add_picture(&mut self, picture: &Picture) -> Result<()> {
        let version = self.version();
        let v22 = version == TagVersion::V2_2;
        let id = FrameId::new(if v22 { "PIC" } else { "APIC" })?;

        self.retain(|f| {
            f.id != id
                || f.known().map_or(true, |b| {
                    let existing = Picture::from_body(b);
                    existing.picture_type != picture.picture_type
                        || existing.description != picture.description
                })
        });

        let mut frame = Frame::empty(id, version);
        let body = frame
            .known_mut()
            .ok_or_else(|| Id3Error::invalid_value(format!("{id} is not a known frame")))?;
        let format = if v22 {
            (FieldName::ImageFormat, image_format_for_mime(&picture.mime_type))
        } else {
            (FieldName::MimeType, picture.mime_type.clone())
        };
        body.set_text(format.0, format.1)
            .and_then(|()| body.set_int(FieldName::PictureType, u64::from(picture.picture_type.as_byte())))
            .and_then(|()| body.set_text(FieldName::Description, picture.description.as_str()))
            .and_then(|()| body.set(FieldName::PictureData, FieldValue::Binary(picture.data.clone())))
            .map_err(field_error(id))?;
        self.push_frame(frame);
        Ok(())
    }

    pub fn remove_pictures(&mut self) -> usize {
        let id = if self.version() == TagVersion::V2_2 { "PIC" } else { "APIC" };
        self.remove_frames(id).len()
    }

    /// Value of the user text frame with `description`
    pub fn user_text(&self, description: &str) -> Option<&str> {
        let id = if self.version() == TagVersion::V2_2 { "TXX" } else { "TXXX" };
        self.frames_with_id(id)
            .filter_map(|f| f.known())
            .find(|b| b.text(FieldName::Description) == Some(description))
            .and_then(|b| b.text(FieldName::Text))
    }

    pub fn set_user_text(&mut self, description: &str, value: &str) -> Result<()> {
        let version = self.version();
        let id = FrameId::new(if version == TagVersion::V2_2 { "TXX" } else { "TXXX" })?;
        let existing = self
            .frames_with_id_mut(id.as_str())
            .filter_map(|f| f.known_mut())
            .find(|b| b.text(FieldName::Description) == Some(description));
        if let Some(body) = existing {
            return body.set_text(FieldName::Text, value).map_err(field_error(id));
        }
        let mut frame = Frame::empty(id, version);
        if let Some(body) = frame.known_mut() {
            body.set_text(FieldName::Description, description)
                .and_then(|()| body.set_text(FieldName::Text, value))
                .map_err(field_error(id))?;
        }
        self.push_frame(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;

    #[test]
    fn keys_map_per_version() {
        assert_eq!(FieldKey::Title.frame_id(TagVersion::V2_2), Some("TT2"));
        assert_eq!(FieldKey::Year.frame_id(TagVersion::V2_3), Some("TYER"));
        assert_eq!(FieldKey::Year.frame_id(TagVersion::V2_4), Some("TDRC"));
        assert_eq!(FieldKey::Mood.frame_id(TagVersion::V2_3), None);
        assert_eq!(FieldKey::Title.frame_id(TagVersion::V1), None);
    }

    #[test]
    fn keys_parse_from_names() {
        assert_eq!("Album Artist".parse::<FieldKey>().unwrap(), FieldKey::AlbumArtist);
        assert_eq!("track-number".parse::<FieldKey>().unwrap(), FieldKey::TrackNumber);
        assert!("colour".parse::<FieldKey>().is_err());
        for key in FieldKey::ALL {
            assert_eq!(key.as_str().parse::<FieldKey>().unwrap(), key);
        }
    }

    #[test]
    fn simple_text_keys() {
        let mut tag = Tag::new(TagVersion::V2_3);
        tag.set(FieldKey::Title, "Roygbiv").unwrap();
        tag.set(FieldKey::Artist, "Boards of Canada").unwrap();
        assert_eq!(tag.get(FieldKey::Title).as_deref(), Some("Roygbiv"));
        assert_eq!(tag.frame("TPE1").unwrap().text(), Some("Boards of Canada"));

        tag.set(FieldKey::Title, "").unwrap();
        assert!(tag.get(FieldKey::Title).is_none());
    }

    #[test]
    fn track_number_and_total_share_a_frame() {
        let mut tag = Tag::new(TagVersion::V2_4);
        tag.set(FieldKey::TrackNumber, "3").unwrap();
        tag.set(FieldKey::TrackTotal, "12").unwrap();
        assert_eq!(tag.frame("TRCK").unwrap().text(), Some("3/12"));
        assert_eq!(tag.get(FieldKey::TrackNumber).as_deref(), Some("3"));
        assert_eq!(tag.get(FieldKey::TrackTotal).as_deref(), Some("12"));

        tag.set(FieldKey::TrackNumber, "4").unwrap();
        assert_eq!(tag.frame("TRCK").unwrap().text(), Some("4/12"));

        tag.remove(FieldKey::TrackTotal);
        assert_eq!(tag.frame("TRCK").unwrap().text(), Some("4"));
        tag.remove(FieldKey::TrackNumber);
        assert!(tag.frame("TRCK").is_none());
    }

    #[test]
    fn genre_and_year_are_normalised() {
        let mut tag = Tag::new(TagVersion::V2_3);
        tag.set_frame(Frame::with_text(FrameId::new("TCON").unwrap(), TagVersion::V2_3, "(17)").unwrap());
        tag.set(FieldKey::Year, "1998").unwrap();
        assert_eq!(tag.get(FieldKey::Genre).as_deref(), Some("Rock"));
        assert_eq!(tag.get(FieldKey::Year).as_deref(), Some("1998"));

        let mut tag = Tag::new(TagVersion::V2_4);
        tag.set(FieldKey::Year, "2001-04-15").unwrap();
        tag.set(FieldKey::Genre, "Rock\0Pop").unwrap();
        assert_eq!(tag.get(FieldKey::Year).as_deref(), Some("2001"));
        assert_eq!(tag.get_all(FieldKey::Genre), vec!["Rock", "Pop"]);
    }

    #[test]
    fn unavailable_keys_are_errors() {
        let mut tag = Tag::new(TagVersion::V2_3);
        assert!(matches!(
            tag.set(FieldKey::Mood, "calm"),
            Err(Id3Error::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn new_frames_use_the_policy_encoding() {
        let mut tag = Tag::new(TagVersion::V2_4);
        let policy = Policy {
            default_encoding_v24: TextEncoding::Utf8,
            ..Policy::default()
        };
        tag.set_with(FieldKey::Album, "Geogaddi", &policy).unwrap();
        assert_eq!(
            tag.frame("TALB").unwrap().known().unwrap().encoding(),
            Some(TextEncoding::Utf8)
        );
    }

    #[test]
    fn comments_by_description() {
        let mut tag = Tag::new(TagVersion::V2_3);
        tag.set(FieldKey::Comment, "plain").unwrap();
        tag.add_comment(&Comment {
            language: "eng".into(),
            description: "iTunNORM".into(),
            text: "0000".into(),
        })
        .unwrap();
        tag.set(FieldKey::Comment, "changed").unwrap();

        let comments = tag.comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(tag.get(FieldKey::Comment).as_deref(), Some("changed"));

        tag.remove(FieldKey::Comment);
        assert_eq!(tag.comments().len(), 1);
        assert_eq!(tag.comments()[0].description, "iTunNORM");
    }

    #[test]
    fn pictures_in_v22_and_v23() {
        let cover = Picture {
            mime_type: "image/jpeg".into(),
            picture_type: PictureType::FrontCover,
            description: String::new(),
            data: vec![0xFF, 0xD8, 0xFF],
        };
        for version in [TagVersion::V2_2, TagVersion::V2_3] {
            let mut tag = Tag::new(version);
            tag.add_picture(&cover).unwrap();
            tag.add_picture(&cover).unwrap();
            assert_eq!(tag.pictures(), vec![cover.clone()]);
            assert_eq!(tag.remove_pictures(), 1);
        }
    }

    #[test]
    fn user_text_frames() {
        let mut tag = Tag::new(TagVersion::V2_4);
        tag.set_user_text("MusicBrainz Album Id", "abc").unwrap();
        tag.set_user_text("MusicBrainz Album Id", "def").unwrap();
        tag.set_user_text("CATALOGNUMBER", "WARP101").unwrap();
        assert_eq!(tag.user_text("MusicBrainz Album Id"), Some("def"));
        assert_eq!(tag.frames_with_id("TXXX").count(), 2);
    }

    #[test]
    fn picture_types_cover_all_bytes() {
        for byte in 0..=0x14u8 {
            assert_eq!(PictureType::from_byte(byte).as_byte(), byte);
        }
        assert_eq!(PictureType::from_byte(0x99), PictureType::Other);
    }
}
