//! SAM record parsing: flag decoding, read keys and tag lookup.
//!
//! One tab-delimited data line becomes one [`AlignmentRecord`]. Secondary
//! alignments (flag 0x100) carry no concordance signal and are dropped at
//! parse time: they are never stored and never counted.

use ahash::AHashMap;

/// Maximum number of CIGAR characters rendered in report output. The CIGAR
/// string is otherwise opaque to this tool.
pub const CIGAR_DISPLAY_LIMIT: usize = 60;

/// Decoded SAM FLAG field.
///
/// Wraps the raw integer and exposes the flag bits this tool interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u16);

impl Flags {
    const PAIRED: u16 = 0x1;
    const PROPER_PAIR: u16 = 0x2;
    const UNMAPPED: u16 = 0x4;
    const MATE_UNMAPPED: u16 = 0x8;
    const REVERSE: u16 = 0x10;
    const MATE_REVERSE: u16 = 0x20;
    const FIRST_OF_PAIR: u16 = 0x40;
    const SECOND_OF_PAIR: u16 = 0x80;
    const SECONDARY: u16 = 0x100;
    const SUPPLEMENTARY: u16 = 0x800;

    /// Wraps a raw FLAG value.
    #[must_use]
    pub fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// The raw FLAG value.
    #[must_use]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Template has multiple segments (0x1).
    #[must_use]
    pub fn is_paired(self) -> bool {
        self.0 & Self::PAIRED != 0
    }

    /// Each segment properly aligned according to the aligner (0x2).
    #[must_use]
    pub fn is_proper_pair(self) -> bool {
        self.0 & Self::PROPER_PAIR != 0
    }

    /// Segment unmapped (0x4).
    #[must_use]
    pub fn is_unmapped(self) -> bool {
        self.0 & Self::UNMAPPED != 0
    }

    /// Mate unmapped (0x8).
    #[must_use]
    pub fn is_mate_unmapped(self) -> bool {
        self.0 & Self::MATE_UNMAPPED != 0
    }

    /// Segment mapped to the reverse strand (0x10).
    #[must_use]
    pub fn is_reverse_strand(self) -> bool {
        self.0 & Self::REVERSE != 0
    }

    /// Mate mapped to the reverse strand (0x20).
    #[must_use]
    pub fn is_mate_reverse(self) -> bool {
        self.0 & Self::MATE_REVERSE != 0
    }

    /// First segment of the template (0x40).
    #[must_use]
    pub fn is_first_of_pair(self) -> bool {
        self.0 & Self::FIRST_OF_PAIR != 0
    }

    /// Last segment of the template (0x80).
    #[must_use]
    pub fn is_second_of_pair(self) -> bool {
        self.0 & Self::SECOND_OF_PAIR != 0
    }

    /// Secondary alignment (0x100).
    #[must_use]
    pub fn is_secondary(self) -> bool {
        self.0 & Self::SECONDARY != 0
    }

    /// Supplementary alignment (0x800).
    #[must_use]
    pub fn is_supplementary(self) -> bool {
        self.0 & Self::SUPPLEMENTARY != 0
    }
}

/// Optional-tag lookup built once per record at parse time.
///
/// Maps the two-letter tag name to its raw string value. Only `SA` and `XA`
/// are semantically interpreted downstream; everything else is carried for
/// display.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    values: AHashMap<String, String>,
}

impl TagMap {
    /// Looks up a tag by its two-letter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The `SA` (supplementary-alignment list) tag value, if present.
    #[must_use]
    pub fn sa(&self) -> Option<&str> {
        self.get("SA")
    }

    /// The `XA` (alternate-hit list) tag value, if present.
    #[must_use]
    pub fn xa(&self) -> Option<&str> {
        self.get("XA")
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

/// One parsed alignment line.
#[derive(Debug, Clone)]
pub struct AlignmentRecord {
    /// Raw query name (QNAME).
    pub name: String,
    /// Decoded FLAG field.
    pub flags: Flags,
    /// Reference sequence name (RNAME); `*` when unmapped.
    pub reference_name: String,
    /// 1-based leftmost mapping coordinate; 0 when unmapped.
    pub position: u64,
    /// Mapping quality. 0 (unreliable) and 255 (unavailable) carry special
    /// meaning by convention but are compared as ordinary integers.
    pub mapq: u8,
    /// CIGAR string, opaque except for display truncation.
    pub cigar: String,
    /// Optional tags (`TAG:TYPE:VALUE` columns).
    pub tags: TagMap,
}

impl AlignmentRecord {
    /// Parses one non-header data line.
    ///
    /// Returns `Ok(None)` for secondary alignments, which are dropped
    /// entirely. Malformed mandatory columns yield `Err(reason)`; the caller
    /// attaches file and line context and aborts the run.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 11 {
            return Err(format!(
                "expected at least 11 tab-separated columns, found {}",
                fields.len()
            ));
        }

        let flags = Flags::new(
            fields[1]
                .parse::<u16>()
                .map_err(|_| format!("FLAG is not an integer: '{}'", fields[1]))?,
        );
        if flags.is_secondary() {
            return Ok(None);
        }

        let position = fields[3]
            .parse::<u64>()
            .map_err(|_| format!("POS is not an integer: '{}'", fields[3]))?;
        let mapq = fields[4]
            .parse::<u8>()
            .map_err(|_| format!("MAPQ is not an integer in 0-255: '{}'", fields[4]))?;

        let mut tags = TagMap::default();
        for column in &fields[11..] {
            // TAG:TYPE:VALUE; a column with fewer than 3 parts is ignored,
            // not fatal.
            let mut parts = column.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(_), Some(value)) => tags.insert(name, value),
                _ => {}
            }
        }

        Ok(Some(Self {
            name: fields[0].to_string(),
            flags,
            reference_name: fields[2].to_string(),
            position,
            mapq,
            cigar: fields[5].to_string(),
            tags,
        }))
    }

    /// Derives the logical read key: the query name suffixed with `/1` for
    /// first-of-pair records or `/2` for second-of-pair records.
    #[must_use]
    pub fn read_key(&self) -> String {
        if self.flags.is_first_of_pair() {
            format!("{}/1", self.name)
        } else if self.flags.is_second_of_pair() {
            format!("{}/2", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Strand character for display: `-` for reverse-strand records, else `+`.
    #[must_use]
    pub fn strand(&self) -> char {
        if self.flags.is_reverse_strand() { '-' } else { '+' }
    }

    /// Renders the record on one line for side-by-side report output, with
    /// the CIGAR truncated to [`CIGAR_DISPLAY_LIMIT`] characters.
    #[must_use]
    pub fn render(&self) -> String {
        let kind = if self.flags.is_supplementary() { "SUPP" } else { "PRI " };
        let cigar: String = self.cigar.chars().take(CIGAR_DISPLAY_LIMIT).collect();
        format!(
            "{kind} {}:{} {} MAPQ={} CIGAR={cigar}",
            self.reference_name,
            self.position,
            self.strand(),
            self.mapq
        )
    }
}
