//! ID3v1 genre table and content-type (TCON) rewriting
//!
//! v2.2/v2.3 reference genres as `(17)` and may follow them with a
//! refinement; v2.4 stores every reference and refinement as a separate
//! value (`17\0Rock`).

/// Genre names indexed by their ID3v1 number, including the Winamp
/// extensions up to 191
pub const GENRES: [&str; 192] = [
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "AlternRock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychadelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
    "Folk",
    "Folk-Rock",
    "National Folk",
    "Swing",
    "Fast Fusion",
    "Bebob",
    "Latin",
    "Revival",
    "Celtic",
    "Bluegrass",
    "Avantgarde",
    "Gothic Rock",
    "Progressive Rock",
    "Psychedelic Rock",
    "Symphonic Rock",
    "Slow Rock",
    "Big Band",
    "Chorus",
    "Easy Listening",
    "Acoustic",
    "Humour",
    "Speech",
    "Chanson",
    "Opera",
    "Chamber Music",
    "Sonata",
    "Symphony",
    "Booty Bass",
    "Primus",
    "Porn Groove",
    "Satire",
    "Slow Jam",
    "Club",
    "Tango",
    "Samba",
    "Folklore",
    "Ballad",
    "Power Ballad",
    "Rhythmic Soul",
    "Freestyle",
    "Duet",
    "Punk Rock",
    "Drum Solo",
    "A capella",
    "Euro-House",
    "Dance Hall",
    "Goa",
    "Drum & Bass",
    "Club-House",
    "Hardcore",
    "Terror",
    "Indie",
    "BritPop",
    "Afro-Punk",
    "Polsk Punk",
    "Beat",
    "Christian Gangsta Rap",
    "Heavy Metal",
    "Black Metal",
    "Crossover",
    "Contemporary Christian",
    "Christian Rock",
    "Merengue",
    "Salsa",
    "Thrash Metal",
    "Anime",
    "JPop",
    "Synthpop",
    "Abstract",
    "Art Rock",
    "Baroque",
    "Bhangra",
    "Big Beat",
    "Breakbeat",
    "Chillout",
    "Downtempo",
    "Dub",
    "EBM",
    "Eclectic",
    "Electro",
    "Electroclash",
    "Emo",
    "Experimental",
    "Garage",
    "Global",
    "IDM",
    "Illbient",
    "Industro-Goth",
    "Jam Band",
    "Krautrock",
    "Leftfield",
    "Lounge",
    "Math Rock",
    "New Romantic",
    "Nu-Breakz",
    "Post-Punk",
    "Post-Rock",
    "Psytrance",
    "Shoegaze",
    "Space Rock",
    "Trop Rock",
    "World Music",
    "Neoclassical",
    "Audiobook",
    "Audio Theatre",
    "Neue Deutsche Welle",
    "Podcast",
    "Indie Rock",
    "G-Funk",
    "Dubstep",
    "Garage Rock",
    "Psybient",
];

pub fn name(index: u8) -> Option<&'static str> {
    GENRES.get(usize::from(index)).copied()
}

/// Case-insensitive lookup of a genre name
pub fn index_of(name: &str) -> Option<u8> {
    let name = name.trim();
    GENRES
        .iter()
        .position(|g| g.eq_ignore_ascii_case(name))
        .map(|i| i as u8)
}

/// Human readable genre from any TCON flavour
///
/// `(17)`, `17` and `Rock` all resolve to `Rock`; a refinement after a
/// reference wins over the reference; `RX` and `CR` are spelled out.
pub fn resolve(text: &str) -> String {
    text.split('\0')
        .filter(|v| !v.is_empty())
        .filter_map(|value| {
            let parts = parse_v23(value);
            let refinement = parts.iter().rev().find_map(|p| match p {
                GenrePart::Text(t) => Some(t.clone()),
                _ => None,
            });
            refinement
                .map(|t| match t.parse::<u8>().ok().and_then(name) {
                    Some(n) => n.to_string(),
                    None => t,
                })
                .or_else(|| {
                    parts.last().and_then(|p| match p {
                        GenrePart::Index(i) => name(*i).map(str::to_string),
                        GenrePart::Remix => Some("Remix".to_string()),
                        GenrePart::Cover => Some("Cover".to_string()),
                        GenrePart::Text(_) => None,
                    })
                })
        })
        .collect::<Vec<_>>()
        .join("\0")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GenrePart {
    Index(u8),
    Remix,
    Cover,
    Text(String),
}

/// Split a v2.2/v2.3 content type into references and refinements
fn parse_v23(text: &str) -> Vec<GenrePart> {
    let mut parts = Vec::new();
    for value in text.split('\0').filter(|v| !v.is_empty()) {
        let mut rest = value;
        while let Some(after) = rest.strip_prefix('(') {
            if after.starts_with('(') {
                // "((" escapes a refinement that starts with a parenthesis
                break;
            }
            let Some(close) = after.find(')') else {
                break;
            };
            let token = &after[..close];
            let part = match token {
                "RX" => GenrePart::Remix,
                "CR" => GenrePart::Cover,
                _ => match token.parse::<u8>() {
                    Ok(i) => GenrePart::Index(i),
                    Err(_) => break,
                },
            };
            parts.push(part);
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            let refinement = rest.strip_prefix('(').filter(|r| r.starts_with('('));
            parts.push(GenrePart::Text(refinement.unwrap_or(rest).to_string()));
        }
    }
    parts
}

/// Rewrite a v2.2/v2.3 TCON value for v2.4
pub fn v23_to_v24(text: &str) -> String {
    parse_v23(text)
        .into_iter()
        .map(|part| match part {
            GenrePart::Index(i) => i.to_string(),
            GenrePart::Remix => "RX".to_string(),
            GenrePart::Cover => "CR".to_string(),
            GenrePart::Text(t) => t,
        })
        .collect::<Vec<_>>()
        .join("\0")
}

/// Rewrite a v2.4 TCON value for v2.2/v2.3
pub fn v24_to_v23(text: &str) -> String {
    let mut references = String::new();
    let mut refinements = Vec::new();
    for value in text.split('\0').filter(|v| !v.is_empty()) {
        match value {
            "RX" | "CR" => references.push_str(&format!("({value})")),
            _ => match value.parse::<u8>() {
                Ok(i) => references.push_str(&format!("({i})")),
                Err(_) if value.starts_with('(') => refinements.push(format!("({value}")),
                Err(_) => refinements.push(value.to_string()),
            },
        }
    }
    references + &refinements.join("\0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup() {
        assert_eq!(GENRES.len(), 192);
        assert_eq!(name(17), Some("Rock"));
        assert_eq!(name(191), Some("Psybient"));
        assert_eq!(name(192), None);
        assert_eq!(index_of("hip-hop"), Some(7));
        assert_eq!(index_of("Not a genre"), None);
    }

    #[test]
    fn resolves_references() {
        assert_eq!(resolve("(17)"), "Rock");
        assert_eq!(resolve("17"), "Rock");
        assert_eq!(resolve("Shoegaze"), "Shoegaze");
        assert_eq!(resolve("(17)Hard Rock"), "Hard Rock");
        assert_eq!(resolve("(RX)"), "Remix");
        assert_eq!(resolve("Rock\0Pop"), "Rock\0Pop");
    }

    #[test]
    fn v23_to_v24_splits_values() {
        assert_eq!(v23_to_v24("(17)Rock"), "17\0Rock");
        assert_eq!(v23_to_v24("(4)(RX)"), "4\0RX");
        assert_eq!(v23_to_v24("Indie"), "Indie");
        assert_eq!(v23_to_v24("((Unusual)"), "(Unusual)");
    }

    #[test]
    fn v24_to_v23_joins_values() {
        assert_eq!(v24_to_v23("17\0Rock"), "(17)Rock");
        assert_eq!(v24_to_v23("4\0RX"), "(4)(RX)");
        assert_eq!(v24_to_v23("(Unusual)"), "((Unusual)");
    }

    #[test]
    fn round_trips_between_versions() {
        for text in ["(17)Rock", "(17)", "Rock", "(4)(RX)", "((Odd)"] {
            assert_eq!(v24_to_v23(&v23_to_v24(text)), text, "{text}");
        }
    }
}
