/// One satellite entry of a three-line element listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementGroup {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub groups: Vec<ElementGroup>,
    /// Non-empty lines left over after the last complete triple
    pub dropped_lines: usize,
}

/// Groups the non-empty lines of a listing into (name, line 1, line 2) triples.
///
/// Lines are taken strictly three at a time; a trailing incomplete group is
/// dropped and counted, never reported as an error.
pub fn parse_listing(content: &str) -> Listing {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut chunks = lines.chunks_exact(3);
    let groups = chunks
        .by_ref()
        .map(|chunk| ElementGroup {
            name: chunk[0].to_string(),
            line1: chunk[1].to_string(),
            line2: chunk[2].to_string(),
        })
        .collect();

    Listing {
        groups,
        dropped_lines: chunks.remainder().len(),
    }
}
