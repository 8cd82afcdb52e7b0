//! ID3v1 / ID3v1.1 trailer
//!
//! A fixed 128-byte block at the end of the file:
//! `TAG` + title(30) + artist(30) + album(30) + year(4) + comment(30) + genre(1).
//! v1.1 steals the last two comment bytes for a zero byte and a track number.

use serde::Serialize;

use crate::encoding::{encode_latin1, TextEncoding};
use crate::error::{Id3Error, Result};
use crate::fields::FieldKey;
use crate::genre;
use crate::tag::Tag;
use crate::version::TagVersion;

pub const V1_LEN: usize = 128;

const MAGIC: &[u8; 3] = b"TAG";
const NO_GENRE: u8 = 0xFF;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct V1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// Present in v1.1 tags only
    pub track: Option<u8>,
    /// Index into the genre table
    pub genre: Option<u8>,
}

fn text_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    TextEncoding::Latin1
        .decode(&bytes[..end])
        .trim_end()
        .to_string()
}

fn put_text(out: &mut [u8], text: &str) -> bool {
    let (bytes, lossy) = encode_latin1(text);
    let len = bytes.len().min(out.len());
    out[..len].copy_from_slice(&bytes[..len]);
    lossy || bytes.len() > out.len()
}

impl V1Tag {
    /// Parse a 128-byte trailer
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < V1_LEN {
            return Err(Id3Error::Truncated {
                need: V1_LEN,
                have: buf.len(),
            });
        }
        let buf = &buf[..V1_LEN];
        if &buf[..3] != MAGIC {
            return Err(Id3Error::TagNotFound);
        }

        let comment = &buf[97..127];
        let (comment, track) = if comment[28] == 0 && comment[29] != 0 {
            (&comment[..28], Some(comment[29]))
        } else {
            (comment, None)
        };

        Ok(Self {
            title: text_field(&buf[3..33]),
            artist: text_field(&buf[33..63]),
            album: text_field(&buf[63..93]),
            year: text_field(&buf[93..97]),
            comment: text_field(comment),
            track,
            genre: Some(buf[127]).filter(|&g| g != NO_GENRE),
        })
    }

    pub fn version(&self) -> TagVersion {
        if self.track.is_some() {
            TagVersion::V1_1
        } else {
            TagVersion::V1
        }
    }

    pub fn genre_name(&self) -> Option<&'static str> {
        self.genre.and_then(genre::name)
    }

    /// Serialise; text longer than its slot is cut
    pub fn to_bytes(&self) -> [u8; V1_LEN] {
        let mut out = [0u8; V1_LEN];
        out[..3].copy_from_slice(MAGIC);
        let mut lossy = put_text(&mut out[3..33], &self.title);
        lossy |= put_text(&mut out[33..63], &self.artist);
        lossy |= put_text(&mut out[63..93], &self.album);
        lossy |= put_text(&mut out[93..97], &self.year);
        match self.track {
            Some(track) => {
                lossy |= put_text(&mut out[97..125], &self.comment);
                out[126] = track;
            }
            None => lossy |= put_text(&mut out[97..127], &self.comment),
        }
        out[127] = self.genre.unwrap_or(NO_GENRE);
        if lossy {
            tracing::debug!("ID3v1 fields were cut or had characters replaced");
        }
        out
    }

    /// Build a v2 tag holding the same values
    pub fn to_v2(&self, version: TagVersion) -> Result<Tag> {
        let mut tag = Tag::new(version);
        let values = [
            (FieldKey::Title, self.title.clone()),
            (FieldKey::Artist, self.artist.clone()),
            (FieldKey::Album, self.album.clone()),
            (FieldKey::Year, self.year.clone()),
            (FieldKey::Comment, self.comment.clone()),
            (
                FieldKey::TrackNumber,
                self.track.map(|t| t.to_string()).unwrap_or_default(),
            ),
            (
                FieldKey::Genre,
                self.genre_name().map(str::to_string).unwrap_or_default(),
            ),
        ];
        for (key, value) in values {
            if !value.is_empty() {
                tag.set(key, &value)?;
            }
        }
        Ok(tag)
    }

    /// Take what fits from a v2 tag
    pub fn from_v2(tag: &Tag) -> Self {
        let get = |key| tag.get(key).unwrap_or_default();
        Self {
            title: get(FieldKey::Title),
            artist: get(FieldKey::Artist),
            album: get(FieldKey::Album),
            year: get(FieldKey::Year).chars().take(4).collect(),
            comment: get(FieldKey::Comment),
            track: tag
                .get(FieldKey::TrackNumber)
                .and_then(|t| t.parse::<u8>().ok())
                .filter(|&t| t != 0),
            genre: tag
                .get(FieldKey::Genre)
                .and_then(|g| genre::index_of(&g)),
        }
    }
}
