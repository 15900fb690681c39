//! Language tables
//!
//! Static data used to pick a translation direction without a language
//! identification model: Unicode ranges characteristic of each script, plus
//! the code/name aliases users put in their config.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Source identifier that asks the provider to detect the language itself
pub const AUTO: &str = "auto";

type Ranges = &'static [RangeInclusive<char>];

const HEBREW: Ranges = &['\u{0590}'..='\u{05FF}'];
const ARABIC: Ranges = &['\u{0600}'..='\u{06FF}', '\u{0750}'..='\u{077F}'];
const CJK: Ranges = &['\u{4E00}'..='\u{9FFF}', '\u{3400}'..='\u{4DBF}'];
const CYRILLIC: Ranges = &['\u{0400}'..='\u{04FF}'];
const GURMUKHI: Ranges = &['\u{0A00}'..='\u{0A7F}'];

/// Language name → characteristic code-point ranges.
///
/// Latin-script languages are absent on purpose: they cannot be told apart
/// by script, so they resolve to auto-detection.
static SCRIPT_TABLE: &[(&str, Ranges)] = &[
    // Semitic
    ("hebrew", HEBREW),
    ("yiddish", HEBREW),
    ("arabic", ARABIC),
    ("persian", ARABIC),
    ("urdu", ARABIC),
    ("pashto", ARABIC),
    ("sindhi", ARABIC),
    ("uyghur", ARABIC),
    ("syriac", &['\u{0700}'..='\u{074F}']),
    ("mandaic", &['\u{0840}'..='\u{085F}']),
    ("thaana", &['\u{0780}'..='\u{07BF}']),
    ("n'ko", &['\u{07C0}'..='\u{07FF}']),
    // South Asian
    ("hindi", &['\u{0900}'..='\u{097F}']),
    ("marathi", &['\u{0900}'..='\u{097F}']),
    ("nepali", &['\u{0900}'..='\u{097F}']),
    ("bengali", &['\u{0980}'..='\u{09FF}']),
    ("punjabi", GURMUKHI),
    ("gurmukhi", GURMUKHI),
    ("gujarati", &['\u{0A80}'..='\u{0AFF}']),
    ("oriya", &['\u{0B00}'..='\u{0B7F}']),
    ("tamil", &['\u{0B80}'..='\u{0BFF}']),
    ("telugu", &['\u{0C00}'..='\u{0C7F}']),
    ("kannada", &['\u{0C80}'..='\u{0CFF}']),
    ("malayalam", &['\u{0D00}'..='\u{0D7F}']),
    ("sinhala", &['\u{0D80}'..='\u{0DFF}']),
    ("thai", &['\u{0E00}'..='\u{0E7F}']),
    ("lao", &['\u{0E80}'..='\u{0EFF}']),
    ("tibetan", &['\u{0F00}'..='\u{0FFF}']),
    ("myanmar", &['\u{1000}'..='\u{109F}']),
    ("khmer", &['\u{1780}'..='\u{17FF}']),
    // East Asian
    (
        "japanese",
        &[
            '\u{3040}'..='\u{309F}',
            '\u{30A0}'..='\u{30FF}',
            '\u{4E00}'..='\u{9FFF}',
        ],
    ),
    ("chinese (simplified)", CJK),
    ("chinese (traditional)", CJK),
    ("chinese", CJK),
    ("korean", &['\u{AC00}'..='\u{D7AF}', '\u{1100}'..='\u{11FF}']),
    // Cyrillic
    ("russian", CYRILLIC),
    ("ukrainian", CYRILLIC),
    ("bulgarian", CYRILLIC),
    ("serbian", CYRILLIC),
    ("belarusian", CYRILLIC),
    ("macedonian", CYRILLIC),
    ("kazakh", CYRILLIC),
    ("kyrgyz", CYRILLIC),
    ("tajik", CYRILLIC),
    // Modern Mongolian is written in Cyrillic; the traditional script too
    (
        "mongolian",
        &['\u{0400}'..='\u{04FF}', '\u{1800}'..='\u{18AF}'],
    ),
    // European
    ("greek", &['\u{0370}'..='\u{03FF}']),
    ("georgian", &['\u{10A0}'..='\u{10FF}']),
    ("armenian", &['\u{0530}'..='\u{058F}']),
    ("coptic", &['\u{2C80}'..='\u{2CFF}']),
    ("glagolitic", &['\u{2C00}'..='\u{2C5F}']),
    // African
    ("amharic", &['\u{1200}'..='\u{137F}']),
    ("tifinagh", &['\u{2D30}'..='\u{2D7F}']),
    ("osmanya", &['\u{10480}'..='\u{104AF}']),
    ("vai", &['\u{A500}'..='\u{A63F}']),
    ("bamum", &['\u{A6A0}'..='\u{A6FF}']),
    // Other
    ("cherokee", &['\u{13A0}'..='\u{13FF}']),
    ("canadian aboriginal", &['\u{1400}'..='\u{167F}', '\u{18B0}'..='\u{18FF}']),
    ("ogham", &['\u{1680}'..='\u{169F}']),
    ("runic", &['\u{16A0}'..='\u{16FF}']),
    ("deseret", &['\u{10400}'..='\u{1044F}']),
    ("shavian", &['\u{10450}'..='\u{1047F}']),
    ("new tai lue", &['\u{1980}'..='\u{19DF}']),
    ("buginese", &['\u{1A00}'..='\u{1A1F}']),
    ("sundanese", &['\u{1B80}'..='\u{1BBF}']),
    ("batak", &['\u{1BC0}'..='\u{1BFF}']),
    ("lepcha", &['\u{1C00}'..='\u{1C4F}']),
    ("ol chiki", &['\u{1C50}'..='\u{1C7F}']),
    ("saurashtra", &['\u{A880}'..='\u{A8DF}']),
    ("kayah li", &['\u{A900}'..='\u{A92F}']),
    ("rejang", &['\u{A930}'..='\u{A95F}']),
    ("lycian", &['\u{10280}'..='\u{1029F}']),
    ("carian", &['\u{102A0}'..='\u{102DF}']),
    ("lydian", &['\u{10920}'..='\u{1093F}']),
];

/// Code → language name. When a name has several codes the first one listed
/// is the code the web translate endpoint expects.
static CODES: &[(&str, &str)] = &[
    ("iw", "hebrew"),
    ("he", "hebrew"),
    ("ar", "arabic"),
    ("fa", "persian"),
    ("ur", "urdu"),
    ("ps", "pashto"),
    ("dv", "thaana"),
    ("nqo", "n'ko"),
    ("hi", "hindi"),
    ("bn", "bengali"),
    ("pa", "punjabi"),
    ("gu", "gujarati"),
    ("or", "oriya"),
    ("ta", "tamil"),
    ("te", "telugu"),
    ("kn", "kannada"),
    ("ml", "malayalam"),
    ("si", "sinhala"),
    ("th", "thai"),
    ("lo", "lao"),
    ("bo", "tibetan"),
    ("my", "myanmar"),
    ("km", "khmer"),
    ("ja", "japanese"),
    ("zh-CN", "chinese (simplified)"),
    ("zh", "chinese (simplified)"),
    ("zh-hans", "chinese (simplified)"),
    ("zh-TW", "chinese (traditional)"),
    ("zh-hant", "chinese (traditional)"),
    ("ko", "korean"),
    ("ru", "russian"),
    ("uk", "ukrainian"),
    ("bg", "bulgarian"),
    ("sr", "serbian"),
    ("be", "belarusian"),
    ("mk", "macedonian"),
    ("mn", "mongolian"),
    ("el", "greek"),
    ("ka", "georgian"),
    ("hy", "armenian"),
    ("am", "amharic"),
    ("su", "sundanese"),
    ("sat", "ol chiki"),
    ("en", "english"),
    ("es", "spanish"),
    ("fr", "french"),
    ("de", "german"),
    ("it", "italian"),
    ("pt", "portuguese"),
    ("nl", "dutch"),
    ("pl", "polish"),
    ("tr", "turkish"),
    ("vi", "vietnamese"),
    ("id", "indonesian"),
    ("ms", "malay"),
    ("tl", "filipino"),
    ("fil", "filipino"),
    ("sw", "swahili"),
    ("af", "afrikaans"),
    ("sq", "albanian"),
    ("az", "azerbaijani"),
    ("eu", "basque"),
    ("bs", "bosnian"),
    ("ca", "catalan"),
    ("ceb", "cebuano"),
    ("ny", "chichewa"),
    ("co", "corsican"),
    ("hr", "croatian"),
    ("cs", "czech"),
    ("da", "danish"),
    ("eo", "esperanto"),
    ("et", "estonian"),
    ("fi", "finnish"),
    ("fy", "frisian"),
    ("gl", "galician"),
    ("ht", "haitian creole"),
    ("ha", "hausa"),
    ("haw", "hawaiian"),
    ("hmn", "hmong"),
    ("hu", "hungarian"),
    ("is", "icelandic"),
    ("ig", "igbo"),
    ("ga", "irish"),
    ("jw", "javanese"),
    ("kk", "kazakh"),
    ("rw", "kinyarwanda"),
    ("ku", "kurdish (kurmanji)"),
    ("ky", "kyrgyz"),
    ("la", "latin"),
    ("lv", "latvian"),
    ("lt", "lithuanian"),
    ("lb", "luxembourgish"),
    ("mg", "malagasy"),
    ("mt", "maltese"),
    ("mi", "maori"),
    ("mr", "marathi"),
    ("ne", "nepali"),
    ("no", "norwegian"),
    ("nb", "norwegian"),
    ("nn", "norwegian"),
    ("sd", "sindhi"),
    ("sk", "slovak"),
    ("sl", "slovenian"),
    ("so", "somali"),
    ("st", "sesotho"),
    ("sn", "shona"),
    ("sm", "samoan"),
    ("gd", "scots gaelic"),
    ("tg", "tajik"),
    ("tk", "turkmen"),
    ("ug", "uyghur"),
    ("uz", "uzbek"),
    ("cy", "welsh"),
    ("xh", "xhosa"),
    ("yi", "yiddish"),
    ("yo", "yoruba"),
    ("zu", "zulu"),
];

lazy_static! {
    static ref CODE_TO_NAME: HashMap<String, &'static str> = CODES
        .iter()
        .map(|(code, name)| (code.to_lowercase(), *name))
        .collect();
    static ref NAME_TO_CODE: HashMap<&'static str, &'static str> = {
        let mut map = HashMap::new();
        for (code, name) in CODES {
            map.entry(*name).or_insert(*code);
        }
        map
    };
}

/// Normalize an identifier from the config ("iw", "Hebrew", " he ") to a
/// lowercase language name. Unknown identifiers come back lowercased.
pub fn canonical_name(id: &str) -> String {
    let lower = id.trim().to_lowercase();
    match CODE_TO_NAME.get(&lower) {
        Some(name) => name.to_string(),
        None => lower,
    }
}

/// Script ranges registered for a language, if it has a distinct script
pub fn script_ranges(id: &str) -> Option<&'static [RangeInclusive<char>]> {
    let name = canonical_name(id);
    SCRIPT_TABLE
        .iter()
        .find(|(lang, _)| *lang == name)
        .map(|(_, ranges)| *ranges)
}

/// True when any character of `text` falls in one of `ranges`
pub fn contains_script(text: &str, ranges: &[RangeInclusive<char>]) -> bool {
    text.chars()
        .any(|ch| ranges.iter().any(|range| range.contains(&ch)))
}

/// Code understood by the web translate endpoint; unknown ids pass through
pub fn google_code(id: &str) -> String {
    let trimmed = id.trim();
    if trimmed.eq_ignore_ascii_case(AUTO) {
        return AUTO.to_string();
    }

    let name = canonical_name(trimmed);
    match NAME_TO_CODE.get(name.as_str()) {
        Some(code) => code.to_string(),
        None => trimmed.to_string(),
    }
}

/// Human-readable name for prompts ("zh-TW" → "Traditional Chinese")
pub fn display_name(id: &str) -> String {
    let name = canonical_name(id);
    match name.as_str() {
        "chinese (simplified)" => "Simplified Chinese".to_string(),
        "chinese (traditional)" => "Traditional Chinese".to_string(),
        _ => name
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("iw"), "hebrew");
        assert_eq!(canonical_name("HE"), "hebrew");
        assert_eq!(canonical_name(" Hebrew "), "hebrew");
        assert_eq!(canonical_name("zh-cn"), "chinese (simplified)");
        assert_eq!(canonical_name("klingon"), "klingon");
    }

    #[test]
    fn test_script_ranges() {
        assert!(script_ranges("hebrew").is_some());
        assert!(script_ranges("ru").is_some());
        assert!(script_ranges("spanish").is_none());
        assert!(script_ranges("english").is_none());
    }

    #[test]
    fn test_contains_script() {
        let hebrew = script_ranges("hebrew").expect("hebrew ranges");
        assert!(contains_script("שלום", hebrew));
        assert!(contains_script("hello שלום", hebrew));
        assert!(!contains_script("hello", hebrew));

        let osmanya = script_ranges("osmanya").expect("osmanya ranges");
        assert!(contains_script("\u{10490}", osmanya));
    }

    #[test]
    fn test_google_code() {
        assert_eq!(google_code("hebrew"), "iw");
        assert_eq!(google_code("he"), "iw");
        assert_eq!(google_code("English"), "en");
        assert_eq!(google_code("chinese (traditional)"), "zh-TW");
        assert_eq!(google_code("AUTO"), "auto");
        assert_eq!(google_code("xx-unknown"), "xx-unknown");
        // Scripts without a translate code pass through unchanged
        assert_eq!(google_code("runic"), "runic");
        assert_eq!(google_code("ogham"), "ogham");
        assert_eq!(google_code("mongolian"), "mn");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("iw"), "Hebrew");
        assert_eq!(display_name("haitian creole"), "Haitian Creole");
        assert_eq!(display_name("zh-TW"), "Traditional Chinese");
    }
}
