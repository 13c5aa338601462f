//! Bulk company directory parsing: pkzip archive wrapping one XML
//! document of (corp_name, corp_code, stock_code) records.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use serde::Deserialize;

use super::CorpError;

#[derive(Debug, Deserialize)]
struct CorpDirectory {
    #[serde(rename = "list", default)]
    entries: Vec<CorpEntry>,
}

#[derive(Debug, Deserialize)]
struct CorpEntry {
    #[serde(default)]
    corp_name: String,
    #[serde(default)]
    corp_code: String,
    #[serde(default)]
    stock_code: String,
}

/// Unpack the downloaded archive and build the lookup map. Both the
/// lower-cased company name and the lower-cased stock code key the
/// same corp code.
pub(super) fn parse_corp_archive(bytes: &[u8]) -> Result<BTreeMap<String, String>, CorpError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| CorpError::Archive(err.to_string()))?;
    if archive.is_empty() {
        return Err(CorpError::Archive("archive contains no entries".to_string()));
    }

    let mut xml = String::new();
    archive
        .by_index(0)
        .map_err(|err| CorpError::Archive(err.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|err| CorpError::Archive(err.to_string()))?;

    parse_directory(&xml)
}

fn parse_directory(xml: &str) -> Result<BTreeMap<String, String>, CorpError> {
    let directory: CorpDirectory =
        quick_xml::de::from_str(xml).map_err(|err| CorpError::Parse(err.to_string()))?;

    let mut map = BTreeMap::new();
    for entry in directory.entries {
        let code = entry.corp_code.trim();
        if code.is_empty() {
            continue;
        }
        map.insert(entry.corp_name.trim().to_lowercase(), code.to_string());
        let stock_code = entry.stock_code.trim();
        if !stock_code.is_empty() {
            map.insert(stock_code.to_lowercase(), code.to_string());
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
    <list>
        <corp_code>00012345</corp_code>
        <corp_name>Acme Corp</corp_name>
        <stock_code>012345</stock_code>
        <modify_date>20240601</modify_date>
    </list>
    <list>
        <corp_code>00098765</corp_code>
        <corp_name>Beta Inc</corp_name>
        <stock_code>098765</stock_code>
        <modify_date>20240601</modify_date>
    </list>
    <list>
        <corp_code>00055555</corp_code>
        <corp_name>Unlisted Co</corp_name>
        <stock_code> </stock_code>
        <modify_date>20240601</modify_date>
    </list>
</result>"#;

    fn sample_archive() -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer
            .start_file("CORPCODE.xml", options)
            .expect("start archive entry");
        writer
            .write_all(SAMPLE_XML.as_bytes())
            .expect("write archive entry");
        writer.finish().expect("finish archive").into_inner()
    }

    #[test]
    fn directory_keys_name_and_stock_code_to_same_corp_code() {
        let map = parse_directory(SAMPLE_XML).expect("parses");
        assert_eq!(map.get("acme corp"), Some(&"00012345".to_string()));
        assert_eq!(map.get("012345"), Some(&"00012345".to_string()));
        assert_eq!(map.get("beta inc"), Some(&"00098765".to_string()));
    }

    #[test]
    fn blank_stock_codes_do_not_create_keys() {
        let map = parse_directory(SAMPLE_XML).expect("parses");
        assert_eq!(map.get("unlisted co"), Some(&"00055555".to_string()));
        assert!(!map.contains_key(""));
    }

    #[test]
    fn archive_round_trips_to_the_same_map() {
        let map = parse_corp_archive(&sample_archive()).expect("parses archive");
        assert_eq!(map.get("098765"), Some(&"00098765".to_string()));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn garbage_bytes_are_an_archive_error() {
        let result = parse_corp_archive(b"not a zip file");
        assert!(matches!(result, Err(CorpError::Archive(_))));
    }
}
