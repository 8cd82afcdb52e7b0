//! Frame body registry
//!
//! Static per-version catalogs map an identifier to its body layout, whether
//! it may repeat inside one tag, and a human readable description. Lookup is
//! a plain `match`; identifiers that miss fall back to an opaque body that
//! keeps the raw bytes.

use crate::body::{BodyKind, FieldBody, FrameBody, UnsupportedBody};
use crate::error::{Id3Error, Result};
use crate::frame_id::FrameId;
use crate::version::TagVersion;

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub kind: BodyKind,
    pub repeatable: bool,
    pub description: &'static str,
}

const fn one(kind: BodyKind, description: &'static str) -> FrameInfo {
    FrameInfo {
        kind,
        repeatable: false,
        description,
    }
}

const fn many(kind: BodyKind, description: &'static str) -> FrameInfo {
    FrameInfo {
        kind,
        repeatable: true,
        description,
    }
}

const fn text(description: &'static str) -> FrameInfo {
    one(BodyKind::Text, description)
}

const fn url(description: &'static str) -> FrameInfo {
    one(BodyKind::Url, description)
}

/// Look up `id` in the catalog of `version`
pub fn lookup(version: TagVersion, id: &str) -> Option<FrameInfo> {
    match version {
        TagVersion::V2_2 => v22(id),
        TagVersion::V2_3 => v23(id),
        TagVersion::V2_4 => v24(id),
        TagVersion::V1 | TagVersion::V1_1 => None,
    }
}

/// Whether several frames with `id` may coexist; unknown frames may
pub fn is_repeatable(version: TagVersion, id: &str) -> bool {
    lookup(version, id).map_or(true, |info| info.repeatable)
}

/// Decode a body for `id` from exactly the frame's data bytes
pub fn create(id: FrameId, data: &[u8], version: TagVersion) -> Result<FrameBody> {
    match lookup(version, id.as_str()) {
        Some(info) => FieldBody::decode(info.kind, data, version)
            .map(FrameBody::Known)
            .map_err(|e| Id3Error::invalid_data(id.as_str(), e)),
        None => Ok(FrameBody::Unsupported(UnsupportedBody {
            id,
            data: data.to_vec(),
        })),
    }
}

/// Empty body for `id`
pub fn create_empty(id: FrameId, version: TagVersion) -> FrameBody {
    match lookup(version, id.as_str()) {
        Some(info) => FrameBody::Known(FieldBody::empty(info.kind)),
        None => FrameBody::Unsupported(UnsupportedBody {
            id,
            data: Vec::new(),
        }),
    }
}

fn v24(id: &str) -> Option<FrameInfo> {
    use BodyKind as K;
    let info = match id {
        "AENC" => many(K::AudioEncryption, "Audio encryption"),
        "APIC" => many(K::Picture, "Attached picture"),
        "ASPI" => one(K::SeekIndex, "Audio seek point index"),
        "COMM" => many(K::Comment, "Comments"),
        "COMR" => many(K::Commercial, "Commercial frame"),
        "ENCR" => many(K::EncryptionMethod, "Encryption method registration"),
        "EQU2" => many(K::Equalisation2, "Equalisation (2)"),
        "ETCO" => one(K::EventTiming, "Event timing codes"),
        "GEOB" => many(K::Object, "General encapsulated object"),
        "GRID" => many(K::GroupId, "Group identification registration"),
        "LINK" => many(K::LinkedInfo, "Linked information"),
        "MCDI" => one(K::MusicCdId, "Music CD identifier"),
        "MLLT" => one(K::LocationLookup, "MPEG location lookup table"),
        "OWNE" => one(K::Ownership, "Ownership frame"),
        "PRIV" => many(K::Private, "Private frame"),
        "PCNT" => one(K::PlayCounter, "Play counter"),
        "POPM" => many(K::Popularimeter, "Popularimeter"),
        "POSS" => one(K::Position, "Position synchronisation frame"),
        "RBUF" => one(K::RecommendedBuffer, "Recommended buffer size"),
        "RVA2" => many(K::RelativeVolume2, "Relative volume adjustment (2)"),
        "RVRB" => one(K::Reverb, "Reverb"),
        "SEEK" => one(K::Seek, "Seek frame"),
        "SIGN" => many(K::Signature, "Signature frame"),
        "SYLT" => many(K::SyncLyrics, "Synchronised lyric/text"),
        "SYTC" => one(K::TempoCodes, "Synchronised tempo codes"),
        "TALB" => text("Album/Movie/Show title"),
        "TBPM" => text("BPM (beats per minute)"),
        "TCOM" => text("Composer"),
        "TCON" => text("Content type"),
        "TCOP" => text("Copyright message"),
        "TDEN" => text("Encoding time"),
        "TDLY" => text("Playlist delay"),
        "TDOR" => text("Original release time"),
        "TDRC" => text("Recording time"),
        "TDRL" => text("Release time"),
        "TDTG" => text("Tagging time"),
        "TENC" => text("Encoded by"),
        "TEXT" => text("Lyricist/Text writer"),
        "TFLT" => text("File type"),
        "TIPL" => one(K::PairedText, "Involved people list"),
        "TIT1" => text("Content group description"),
        "TIT2" => text("Title/songname/content description"),
        "TIT3" => text("Subtitle/Description refinement"),
        "TKEY" => text("Initial key"),
        "TLAN" => text("Language(s)"),
        "TLEN" => text("Length"),
        "TMCL" => one(K::PairedText, "Musician credits list"),
        "TMED" => text("Media type"),
        "TMOO" => text("Mood"),
        "TOAL" => text("Original album/movie/show title"),
        "TOFN" => text("Original filename"),
        "TOLY" => text("Original lyricist(s)/text writer(s)"),
        "TOPE" => text("Original artist(s)/performer(s)"),
        "TOWN" => text("File owner/licensee"),
        "TPE1" => text("Lead performer(s)/Soloist(s)"),
        "TPE2" => text("Band/orchestra/accompaniment"),
        "TPE3" => text("Conductor/performer refinement"),
        "TPE4" => text("Interpreted, remixed, or otherwise modified by"),
        "TPOS" => text("Part of a set"),
        "TPRO" => text("Produced notice"),
        "TPUB" => text("Publisher"),
        "TRCK" => text("Track number/Position in set"),
        "TRSN" => text("Internet radio station name"),
        "TRSO" => text("Internet radio station owner"),
        "TSOA" => text("Album sort order"),
        "TSOP" => text("Performer sort order"),
        "TSOT" => text("Title sort order"),
        "TSRC" => text("ISRC (international standard recording code)"),
        "TSSE" => text("Software/Hardware and settings used for encoding"),
        "TSST" => text("Set subtitle"),
        "TXXX" => many(K::UserText, "User defined text information frame"),
        "UFID" => many(K::UniqueFileId, "Unique file identifier"),
        "USER" => many(K::TermsOfUse, "Terms of use"),
        "USLT" => many(K::Comment, "Unsynchronised lyric/text transcription"),
        "WCOM" => many(K::Url, "Commercial information"),
        "WCOP" => url("Copyright/Legal information"),
        "WOAF" => url("Official audio file webpage"),
        "WOAR" => many(K::Url, "Official artist/performer webpage"),
        "WOAS" => url("Official audio source webpage"),
        "WORS" => url("Official Internet radio station homepage"),
        "WPAY" => url("Payment"),
        "WPUB" => url("Publishers official webpage"),
        "WXXX" => many(K::UserUrl, "User defined URL link frame"),
        _ => return itunes(id, 4),
    };
    Some(info)
}

fn v23(id: &str) -> Option<FrameInfo> {
    use BodyKind as K;
    let info = match id {
        "AENC" => many(K::AudioEncryption, "Audio encryption"),
        "APIC" => many(K::Picture, "Attached picture"),
        "COMM" => many(K::Comment, "Comments"),
        "COMR" => many(K::Commercial, "Commercial frame"),
        "ENCR" => many(K::EncryptionMethod, "Encryption method registration"),
        "EQUA" => one(K::Binary, "Equalization"),
        "ETCO" => one(K::EventTiming, "Event timing codes"),
        "GEOB" => many(K::Object, "General encapsulated object"),
        "GRID" => many(K::GroupId, "Group identification registration"),
        "IPLS" => one(K::PairedText, "Involved people list"),
        "LINK" => many(K::LinkedInfo, "Linked information"),
        "MCDI" => one(K::MusicCdId, "Music CD identifier"),
        "MLLT" => one(K::LocationLookup, "MPEG location lookup table"),
        "OWNE" => one(K::Ownership, "Ownership frame"),
        "PRIV" => many(K::Private, "Private frame"),
        "PCNT" => one(K::PlayCounter, "Play counter"),
        "POPM" => many(K::Popularimeter, "Popularimeter"),
        "POSS" => one(K::Position, "Position synchronisation frame"),
        "RBUF" => one(K::RecommendedBuffer, "Recommended buffer size"),
        "RVAD" => one(K::Binary, "Relative volume adjustment"),
        "RVRB" => one(K::Reverb, "Reverb"),
        "SYLT" => many(K::SyncLyrics, "Synchronized lyric/text"),
        "SYTC" => one(K::TempoCodes, "Synchronized tempo codes"),
        "TALB" => text("Album/Movie/Show title"),
        "TBPM" => text("BPM (beats per minute)"),
        "TCOM" => text("Composer"),
        "TCON" => text("Content type"),
        "TCOP" => text("Copyright message"),
        "TDAT" => text("Date"),
        "TDLY" => text("Playlist delay"),
        "TENC" => text("Encoded by"),
        "TEXT" => text("Lyricist/Text writer"),
        "TFLT" => text("File type"),
        "TIME" => text("Time"),
        "TIT1" => text("Content group description"),
        "TIT2" => text("Title/songname/content description"),
        "TIT3" => text("Subtitle/Description refinement"),
        "TKEY" => text("Initial key"),
        "TLAN" => text("Language(s)"),
        "TLEN" => text("Length"),
        "TMED" => text("Media type"),
        "TOAL" => text("Original album/movie/show title"),
        "TOFN" => text("Original filename"),
        "TOLY" => text("Original lyricist(s)/text writer(s)"),
        "TOPE" => text("Original artist(s)/performer(s)"),
        "TORY" => text("Original release year"),
        "TOWN" => text("File owner/licensee"),
        "TPE1" => text("Lead performer(s)/Soloist(s)"),
        "TPE2" => text("Band/orchestra/accompaniment"),
        "TPE3" => text("Conductor/performer refinement"),
        "TPE4" => text("Interpreted, remixed, or otherwise modified by"),
        "TPOS" => text("Part of a set"),
        "TPUB" => text("Publisher"),
        "TRCK" => text("Track number/Position in set"),
        "TRDA" => text("Recording dates"),
        "TRSN" => text("Internet radio station name"),
        "TRSO" => text("Internet radio station owner"),
        "TSIZ" => text("Size"),
        "TSRC" => text("ISRC (international standard recording code)"),
        "TSSE" => text("Software/Hardware and settings used for encoding"),
        "TYER" => text("Year"),
        "TXXX" => many(K::UserText, "User defined text information frame"),
        "UFID" => many(K::UniqueFileId, "Unique file identifier"),
        "USER" => one(K::TermsOfUse, "Terms of use"),
        "USLT" => many(K::Comment, "Unsychronized lyric/text transcription"),
        "WCOM" => many(K::Url, "Commercial information"),
        "WCOP" => url("Copyright/Legal information"),
        "WOAF" => url("Official audio file webpage"),
        "WOAR" => many(K::Url, "Official artist/performer webpage"),
        "WOAS" => url("Official audio source webpage"),
        "WORS" => url("Official internet radio station homepage"),
        "WPAY" => url("Payment"),
        "WPUB" => url("Publishers official webpage"),
        "WXXX" => many(K::UserUrl, "User defined URL link frame"),
        // Sort-order frames written into v2.3 tags by iTunes and others
        "TSOA" => text("Album sort order"),
        "TSOP" => text("Performer sort order"),
        "TSOT" => text("Title sort order"),
        _ => return itunes(id, 4),
    };
    Some(info)
}

fn v22(id: &str) -> Option<FrameInfo> {
    use BodyKind as K;
    let info = match id {
        "BUF" => one(K::RecommendedBuffer, "Recommended buffer size"),
        "CNT" => one(K::PlayCounter, "Play counter"),
        "COM" => many(K::Comment, "Comments"),
        "CRA" => many(K::AudioEncryption, "Audio encryption"),
        "CRM" => many(K::EncryptedMeta, "Encrypted meta frame"),
        "ETC" => one(K::EventTiming, "Event timing codes"),
        "EQU" => one(K::Binary, "Equalization"),
        "GEO" => many(K::Object, "General encapsulated object"),
        "IPL" => one(K::PairedText, "Involved people list"),
        "LNK" => many(K::LinkedInfo, "Linked information"),
        "MCI" => one(K::MusicCdId, "Music CD Identifier"),
        "MLL" => one(K::LocationLookup, "MPEG location lookup table"),
        "PIC" => many(K::PictureV22, "Attached picture"),
        "POP" => many(K::Popularimeter, "Popularimeter"),
        "REV" => one(K::Reverb, "Reverb"),
        "RVA" => one(K::Binary, "Relative volume adjustment"),
        "SLT" => many(K::SyncLyrics, "Synchronized lyric/text"),
        "STC" => one(K::TempoCodes, "Synced tempo codes"),
        "TAL" => text("Album/Movie/Show title"),
        "TBP" => text("BPM (Beats Per Minute)"),
        "TCM" => text("Composer"),
        "TCO" => text("Content type"),
        "TCR" => text("Copyright message"),
        "TDA" => text("Date"),
        "TDY" => text("Playlist delay"),
        "TEN" => text("Encoded by"),
        "TFT" => text("File type"),
        "TIM" => text("Time"),
        "TKE" => text("Initial key"),
        "TLA" => text("Language(s)"),
        "TLE" => text("Length"),
        "TMT" => text("Media type"),
        "TOA" => text("Original artist(s)/performer(s)"),
        "TOF" => text("Original filename"),
        "TOL" => text("Original Lyricist(s)/text writer(s)"),
        "TOR" => text("Original release year"),
        "TOT" => text("Original album/Movie/Show title"),
        "TP1" => text("Lead artist(s)/Lead performer(s)/Soloist(s)/Performing group"),
        "TP2" => text("Band/Orchestra/Accompaniment"),
        "TP3" => text("Conductor/Performer refinement"),
        "TP4" => text("Interpreted, remixed, or otherwise modified by"),
        "TPA" => text("Part of a set"),
        "TPB" => text("Publisher"),
        "TRC" => text("ISRC (International Standard Recording Code)"),
        "TRD" => text("Recording dates"),
        "TRK" => text("Track number/Position in set"),
        "TSI" => text("Size"),
        "TSS" => text("Software/hardware and settings used for encoding"),
        "TT1" => text("Content group description"),
        "TT2" => text("Title/Songname/Content description"),
        "TT3" => text("Subtitle/Description refinement"),
        "TXT" => text("Lyricist/text writer"),
        "TXX" => many(K::UserText, "User defined text information frame"),
        "TYE" => text("Year"),
        "UFI" => many(K::UniqueFileId, "Unique file identifier"),
        "ULT" => many(K::Comment, "Unsychronized lyric/text transcription"),
        "WAF" => url("Official audio file webpage"),
        "WAR" => many(K::Url, "Official artist/performer webpage"),
        "WAS" => url("Official audio source webpage"),
        "WCM" => many(K::Url, "Commercial information"),
        "WCP" => url("Copyright/Legal information"),
        "WPB" => url("Publishers official webpage"),
        "WXX" => many(K::UserUrl, "User defined URL link frame"),
        _ => return itunes(id, 3),
    };
    Some(info)
}

/// Non-standard frames written by iTunes and widely read by players
fn itunes(id: &str, width: usize) -> Option<FrameInfo> {
    use BodyKind as K;
    let info = match (width, id) {
        (4, "TCMP") | (3, "TCP") => text("iTunes compilation flag"),
        (4, "TSO2") | (3, "TS2") => text("Album artist sort order"),
        (4, "TSOC") | (3, "TSC") => text("Composer sort order"),
        (3, "TSA") => text("Album sort order"),
        (3, "TSP") => text("Performer sort order"),
        (3, "TST") => text("Title sort order"),
        (4, "GRP1") | (3, "GP1") => text("iTunes grouping"),
        (4, "MVNM") | (3, "MVN") => text("Movement name"),
        (4, "MVIN") | (3, "MVI") => text("Movement number"),
        (4, "TCAT") => text("Podcast category"),
        (4, "TDES") => text("Podcast description"),
        (4, "TGID") => text("Podcast identifier"),
        (4, "TKWD") => text("Podcast keywords"),
        (4, "WFED") => url("Podcast feed URL"),
        (4, "PCST") => one(K::Binary, "Podcast marker"),
        _ => return None,
    };
    Some(info)
}
