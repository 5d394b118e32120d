// ID3v1 genre table
//
// Index positions are fixed by the ID3v1 standard (0..=79) and the Winamp
// extensions (80..=191). Both the ID3v1 reader and the ID3v2 genre field
// resolve numeric references through this table.

pub const GENRES: [&str; 192] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop",
    "Jazz", "Metal", "New Age", "Oldies", "Other", "Pop", "R&B", "Rap",
    "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska", "Death Metal", "Pranks",
    "Soundtrack", "Euro-Techno", "Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance",
    "Classical", "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise",
    "AlternRock", "Bass", "Soul", "Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock",
    "Ethnic", "Gothic", "Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream",
    "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap", "Pop/Funk", "Jungle",
    "Native American", "Cabaret", "New Wave", "Psychadelic", "Rave", "Showtunes", "Trailer", "Lo-Fi",
    "Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical", "Rock & Roll", "Hard Rock",
    "Folk", "Folk-Rock", "National Folk", "Swing", "Fast Fusion", "Bebob", "Latin", "Revival",
    "Celtic", "Bluegrass", "Avantgarde", "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock", "Slow Rock",
    "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech", "Chanson", "Opera",
    "Chamber Music", "Sonata", "Symphony", "Booty Bass", "Primus", "Porn Groove", "Satire", "Slow Jam",
    "Club", "Tango", "Samba", "Folklore", "Ballad", "Power Ballad", "Rhythmic Soul", "Freestyle",
    "Duet", "Punk Rock", "Drum Solo", "A capella", "Euro-House", "Dance Hall", "Goa", "Drum & Bass",
    "Club-House", "Hardcore", "Terror", "Indie", "BritPop", "Negerpunk", "Polsk Punk", "Beat",
    "Christian Gangsta Rap", "Heavy Metal", "Black Metal", "Crossover", "Contemporary Christian", "Christian Rock", "Merengue", "Salsa",
    "Thrash Metal", "Anime", "JPop", "Synthpop", "Abstract", "Art Rock", "Baroque", "Bhangra",
    "Big Beat", "Breakbeat", "Chillout", "Downtempo", "Dub", "EBM", "Eclectic", "Electro",
    "Electroclash", "Emo", "Experimental", "Garage", "Global", "IDM", "Illbient", "Industro-Goth",
    "Jam Band", "Krautrock", "Leftfield", "Lounge", "Math Rock", "New Romantic", "Nu-Breakz", "Post-Punk",
    "Post-Rock", "Psytrance", "Shoegaze", "Space Rock", "Trop Rock", "World Music", "Neoclassical", "Audiobook",
    "Audio Theatre", "Neue Deutsche Welle", "Podcast", "Indie Rock", "G-Funk", "Dubstep", "Garage Rock", "Psybient",
];

/// Genre name for an ID3v1 genre index
pub fn genre_name(index: u8) -> Option<&'static str> {
    GENRES.get(index as usize).copied()
}

/// Genre index for a name, matched case-insensitively
pub fn genre_index(name: &str) -> Option<u8> {
    GENRES
        .iter()
        .position(|genre| genre.eq_ignore_ascii_case(name.trim()))
        .map(|index| index as u8)
}

/// Resolve a TCON value to a genre name
///
/// Handles the v2.2/v2.3 `(17)` and `(17)Rock` forms as well as the bare
/// v2.4 `17` reference. Returns `None` when the value is free text.
pub fn resolve_reference(value: &str) -> Option<&'static str> {
    let value = value.trim();
    let number = if let Some(rest) = value.strip_prefix('(') {
        let end = rest.find(')')?;
        &rest[..end]
    } else {
        value
    };

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse::<u8>().ok().and_then(genre_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(genre_name(17), Some("Rock"));
        assert_eq!(genre_name(191), Some("Psybient"));
        assert_eq!(genre_name(200), None);
        assert_eq!(genre_index("rock"), Some(17));
        assert_eq!(genre_index("Not A Genre"), None);
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("(17)"), Some("Rock"));
        assert_eq!(resolve_reference("(17)Rock"), Some("Rock"));
        assert_eq!(resolve_reference("8"), Some("Jazz"));
        assert_eq!(resolve_reference("Shoegaze"), None);
        assert_eq!(resolve_reference("(RX)"), None);
    }
}
