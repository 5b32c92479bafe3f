//! Master list records and their flat-file format
//!
//! The master list file holds one block per artist, blocks separated by a
//! blank line:
//!
//! ```text
//! id:1
//! n:Ada
//! d:Painter of machines
//! i:http://example/a.png
//! t:1-1700000000.jpg
//! ```

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::{Error, Result};

/// Approved artist record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRecord {
    /// Unique, never reused within a process lifetime
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Remote source image the thumbnail was generated from
    pub image_url: String,
    /// File name of the generated thumbnail inside the images directory
    pub thumbnail: String,
}

/// Next id to assign: max existing id + 1, or 1 for an empty list
pub fn next_id(records: &[ArtistRecord]) -> Result<u32> {
    let max = records.iter().map(|r| r.id).max().unwrap_or(0);
    max.checked_add(1).ok_or(Error::IdsExhausted(max))
}

/// Case-insensitive, whitespace-trimmed name comparison
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// True if `name` matches any record other than `exclude_id`
pub fn name_conflict(records: &[ArtistRecord], name: &str, exclude_id: Option<u32>) -> bool {
    records
        .iter()
        .filter(|r| Some(r.id) != exclude_id)
        .any(|r| names_match(&r.name, name))
}

/// Parse the master list file contents
///
/// Missing `d:`, `i:` and `t:` lines default to empty strings. A line without a
/// known tag continues the previous value (older files wrote multi-line
/// descriptions verbatim). Bad ids, repeated tags and blocks missing `id:` or
/// `n:` are rejected with the offending line number.
pub fn parse_master_list(content: &str) -> Result<Vec<ArtistRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut block = BlockBuilder::default();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if let Some(record) = block.finish()? {
                push_unique(&mut records, &mut seen_ids, record)?;
            }
            block = BlockBuilder::default();
            continue;
        }

        block.feed(line_no, line)?;
    }

    if let Some(record) = block.finish()? {
        push_unique(&mut records, &mut seen_ids, record)?;
    }

    Ok(records)
}

fn push_unique(
    records: &mut Vec<ArtistRecord>,
    seen: &mut HashSet<u32>,
    record: ArtistRecord,
) -> Result<()> {
    if !seen.insert(record.id) {
        return Err(Error::DuplicateId(record.id));
    }
    records.push(record);
    Ok(())
}

/// Serialize records into the fixed five-line-per-record format
pub fn serialize_master_list(records: &[ArtistRecord]) -> String {
    let mut out = String::new();
    for rec in records {
        out.push_str(&format!(
            "id:{}\nn:{}\nd:{}\ni:{}\nt:{}\n\n",
            rec.id,
            single_line(&rec.name),
            single_line(&rec.description),
            single_line(&rec.image_url),
            single_line(&rec.thumbnail),
        ));
    }
    out
}

/// Collapse line breaks so a value can never split a block
fn single_line(value: &str) -> String {
    if !value.contains(&['\n', '\r'][..]) {
        return value.to_string();
    }
    value
        .split(&['\n', '\r'][..])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text fields a continuation line can extend
#[derive(Clone, Copy)]
enum Field {
    Name,
    Description,
    ImageUrl,
    Thumbnail,
}

/// Accumulates the tagged lines of one block
#[derive(Default)]
struct BlockBuilder {
    first_line: usize,
    tagged: bool,
    last: Option<Field>,
    id: Option<u32>,
    name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    thumbnail: Option<String>,
}

impl BlockBuilder {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        if self.first_line == 0 {
            self.first_line = line_no;
        }

        let (field, value) = match line.split_once(':') {
            Some(("id", value)) => {
                let value = value.trim();
                if self.id.is_some() {
                    return Err(repeated(line_no, "id"));
                }
                let id = value.parse::<u32>().ok().filter(|id| *id > 0).ok_or_else(|| {
                    Error::Parse {
                        line: line_no,
                        reason: format!("invalid id {:?}", value),
                    }
                })?;
                self.id = Some(id);
                self.tagged = true;
                self.last = None;
                return Ok(());
            }
            Some(("n", value)) => (Field::Name, value),
            Some(("d", value)) => (Field::Description, value),
            Some(("i", value)) => (Field::ImageUrl, value),
            Some(("t", value)) => (Field::Thumbnail, value),
            _ => return self.continue_last(line_no, line),
        };

        let slot = self.slot(field);
        if slot.is_some() {
            return Err(repeated(line_no, tag_of(field)));
        }
        *slot = Some(value.trim().to_string());
        self.tagged = true;
        self.last = Some(field);
        Ok(())
    }

    fn continue_last(&mut self, line_no: usize, line: &str) -> Result<()> {
        let Some(field) = self.last else {
            warn!("Master list line {}: skipping untagged line {:?}", line_no, line);
            return Ok(());
        };
        warn!(
            "Master list line {}: untagged line joined to the {:?} value",
            line_no,
            tag_of(field)
        );
        if let Some(value) = self.slot(field) {
            let extra = line.trim();
            if value.is_empty() {
                value.push_str(extra);
            } else {
                value.push(' ');
                value.push_str(extra);
            }
        }
        Ok(())
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
            Field::ImageUrl => &mut self.image_url,
            Field::Thumbnail => &mut self.thumbnail,
        }
    }

    fn finish(self) -> Result<Option<ArtistRecord>> {
        if self.first_line == 0 {
            return Ok(None);
        }
        if !self.tagged {
            warn!(
                "Master list line {}: skipping block with no tagged lines",
                self.first_line
            );
            return Ok(None);
        }
        let id = self.id.ok_or_else(|| Error::Parse {
            line: self.first_line,
            reason: "record has no id".to_string(),
        })?;
        let name = self.name.ok_or_else(|| Error::Parse {
            line: self.first_line,
            reason: format!("record {} has no name", id),
        })?;

        Ok(Some(ArtistRecord {
            id,
            name,
            description: self.description.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
            thumbnail: self.thumbnail.unwrap_or_default(),
        }))
    }
}

fn tag_of(field: Field) -> &'static str {
    match field {
        Field::Name => "n",
        Field::Description => "d",
        Field::ImageUrl => "i",
        Field::Thumbnail => "t",
    }
}

fn repeated(line: usize, tag: &str) -> Error {
    Error::Parse {
        line,
        reason: format!("tag {:?} repeated within one record", tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str) -> ArtistRecord {
        ArtistRecord {
            id,
            name: name.to_string(),
            description: format!("about {}", name),
            image_url: format!("http://example/{}.png", id),
            thumbnail: format!("{}.jpg", id),
        }
    }

    #[test]
    fn test_serialize_then_parse_is_identity() {
        let records = vec![record(1, "Ada"), record(7, "Grace Hopper"), record(3, "Émile")];
        let text = serialize_master_list(&records);
        assert_eq!(parse_master_list(&text).unwrap(), records);
    }

    #[test]
    fn test_serialized_layout() {
        let text = serialize_master_list(&[record(2, "Bo")]);
        assert_eq!(
            text,
            "id:2\nn:Bo\nd:about Bo\ni:http://example/2.png\nt:2.jpg\n\n"
        );
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields_and_crlf() {
        let text = "id:4\r\nn: Lin \r\n\r\n\r\nid:5\nn:Max\nt:5.jpg";
        let records = parse_master_list(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Lin");
        assert_eq!(records[0].description, "");
        assert_eq!(records[1].thumbnail, "5.jpg");
        assert_eq!(records[1].image_url, "");
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(parse_master_list("").unwrap().is_empty());
        assert!(parse_master_list("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_bad_id_is_rejected_with_line() {
        let text = "id:1\nn:Ada\n\nid:two\nn:Bo\n";
        match parse_master_list(text) {
            Err(Error::Parse { line, reason }) => {
                assert_eq!(line, 4);
                assert!(reason.contains("invalid id"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_id_is_rejected() {
        assert!(matches!(
            parse_master_list("id:0\nn:Zed\n"),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_untagged_lines_continue_previous_value() {
        // Older files wrote textarea descriptions verbatim
        let text = "id:1\nn:Ada\nd:line one\nline two\nNote: three\ni:http://example/a.png\nt:1.jpg\n\n";
        let records = parse_master_list(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "line one line two Note: three");
        assert_eq!(records[0].image_url, "http://example/a.png");
        assert_eq!(records[0].thumbnail, "1.jpg");
    }

    #[test]
    fn test_untagged_line_before_any_value_is_skipped() {
        let records = parse_master_list("id:1\nstray text\nn:Ada\n").unwrap();
        assert_eq!(records[0].name, "Ada");
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn test_blank_line_inside_description_keeps_record() {
        let text = "id:1\nn:Ada\nd:first paragraph\n\nsecond paragraph\n\nid:2\nn:Bo\n";
        let records = parse_master_list(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "first paragraph");
        assert_eq!(records[1].name, "Bo");
    }

    #[test]
    fn test_block_without_name_or_id_is_rejected() {
        assert!(matches!(
            parse_master_list("id:1\nd:nameless\n"),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_master_list("\n\nn:Ada\n"),
            Err(Error::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_repeated_tag_is_rejected() {
        assert!(matches!(
            parse_master_list("id:1\nn:Ada\nn:Bo\n"),
            Err(Error::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let text = serialize_master_list(&[record(3, "Ada"), record(3, "Bo")]);
        assert!(matches!(parse_master_list(&text), Err(Error::DuplicateId(3))));
    }

    #[test]
    fn test_line_breaks_in_values_are_collapsed() {
        let mut rec = record(1, "Ada");
        rec.description = "first line\r\nsecond line\n".to_string();
        let parsed = parse_master_list(&serialize_master_list(&[rec])).unwrap();
        assert_eq!(parsed[0].description, "first line second line");
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]).unwrap(), 1);
        assert_eq!(
            next_id(&[record(2, "a"), record(9, "b"), record(4, "c")]).unwrap(),
            10
        );
    }

    #[test]
    fn test_next_id_at_u32_max_is_an_error() {
        let records = parse_master_list("id:4294967295\nn:Ada\n").unwrap();
        assert!(matches!(next_id(&records), Err(Error::IdsExhausted(u32::MAX))));
    }

    #[test]
    fn test_name_conflict_is_case_and_space_insensitive() {
        let records = vec![record(1, "  Ada Lovelace "), record(2, "Bo")];
        assert!(name_conflict(&records, "ada lovelace", None));
        assert!(name_conflict(&records, " BO", None));
        assert!(!name_conflict(&records, "Ada", None));
        assert!(!name_conflict(&records, "bo", Some(2)));
        assert!(name_conflict(&records, "bo", Some(1)));
    }
}
