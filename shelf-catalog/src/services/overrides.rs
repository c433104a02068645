//! Curated fallbacks for well-known titles
//!
//! Consulted after enrichment to fill description/cover placeholders. Entries
//! never replace a real value.

use shelf_common::BookDraft;

/// Curated description and cover for a title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideEntry {
    pub description: &'static str,
    pub cover_image: &'static str,
}

/// Ordered (lowercase title fragment, entry) pairs; first match wins
pub const OVERRIDES: &[(&str, OverrideEntry)] = &[
    (
        "little prince",
        OverrideEntry {
            description: "A pilot stranded in the Sahara meets a young prince who has fallen \
                to Earth from a tiny asteroid. Through the prince's account of his travels \
                between planets and his love for a single rose, the story reflects on \
                loneliness, friendship and the way adults lose sight of what matters.",
            cover_image: "https://covers.openlibrary.org/b/isbn/9780156012195-L.jpg",
        },
    ),
    (
        "1984",
        OverrideEntry {
            description: "Winston Smith works at the Ministry of Truth in Oceania, a state \
                ruled by the Party and the ever-watchful Big Brother. His quiet rebellion \
                and forbidden love affair set him against a regime that controls history, \
                language and thought itself.",
            cover_image: "https://covers.openlibrary.org/b/isbn/9780451524935-L.jpg",
        },
    ),
    (
        "to kill a mockingbird",
        OverrideEntry {
            description: "In Depression-era Alabama, Scout Finch watches her father Atticus \
                defend a Black man falsely accused of a crime. A story of childhood, \
                conscience and racial injustice in a small Southern town.",
            cover_image: "https://covers.openlibrary.org/b/isbn/9780061120084-L.jpg",
        },
    ),
    (
        "great gatsby",
        OverrideEntry {
            description: "Nick Carraway recounts a summer on Long Island spent near the \
                mysterious millionaire Jay Gatsby and his obsession with Daisy Buchanan. \
                A portrait of wealth, longing and disillusion in the Jazz Age.",
            cover_image: "https://covers.openlibrary.org/b/isbn/9780743273565-L.jpg",
        },
    ),
    (
        "pride and prejudice",
        OverrideEntry {
            description: "Elizabeth Bennet navigates family pressure, first impressions and \
                her own quick judgments in her dealings with the proud Mr. Darcy. A comedy \
                of manners about marriage, money and character in Regency England.",
            cover_image: "https://covers.openlibrary.org/b/isbn/9780141439518-L.jpg",
        },
    ),
];

/// Find the curated entry for a resolved title
pub fn find_override(title: &str) -> Option<&'static OverrideEntry> {
    let title = title.to_lowercase();
    OVERRIDES
        .iter()
        .find(|(fragment, _)| title.contains(fragment))
        .map(|(_, entry)| entry)
}

/// Fill placeholder description/cover from the override table
///
/// Returns true when any field was filled.
pub fn apply_override(draft: &mut BookDraft) -> bool {
    if draft.description.is_some() && draft.cover_image.is_some() {
        return false;
    }
    let Some(entry) = find_override(&draft.title) else {
        return false;
    };

    let mut filled = false;
    if draft.description.is_none() {
        draft.description = Some(entry.description.to_string());
        filled = true;
    }
    if draft.cover_image.is_none() {
        draft.cover_image = Some(entry.cover_image.to_string());
        filled = true;
    }
    filled
}
