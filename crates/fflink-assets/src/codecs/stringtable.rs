//! String table codec.
//!
//! Sources are CSV files. In the asset list a table is its header, then a
//! `(ptr, hash)` pair per cell, then every cell string, all row-major.
//! Cells are byte strings; the hash is taken over the stored bytes.

use fflink_common::{BinaryReader, BinaryWriter, PTR_PLACEHOLDER};
use log::{info, warn};

use super::{decode_name, lines};
use crate::asset::{Asset, AssetCollection, Payload, StringTable, StringTableCell};
use crate::io::AssetSource;
use crate::{Error, Result};

/// Split one CSV line.
///
/// Quotes toggle quoting and are dropped; commas outside quotes separate
/// cells. Inside quotes, `""` stands for one literal quote. Returns `None`
/// if a quote is left open.
pub fn split_line(line: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut cells = Vec::new();
    let mut current = Vec::new();
    let mut quoted = false;
    let mut bytes = line.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        match b {
            b'"' if quoted && bytes.peek() == Some(&b'"') => {
                bytes.next();
                current.push(b'"');
            }
            b'"' => quoted = !quoted,
            b',' if !quoted => cells.push(std::mem::take(&mut current)),
            b => current.push(b),
        }
    }

    if quoted {
        return None;
    }
    cells.push(current);
    Some(cells)
}

/// Parse CSV source bytes into rows.
///
/// `path` is only used in error messages.
pub fn parse_csv(text: &[u8], path: &str) -> Result<Vec<Vec<Vec<u8>>>> {
    lines(text)
        .enumerate()
        .map(|(number, line)| {
            split_line(line).ok_or_else(|| Error::Grammar {
                path: path.to_string(),
                message: format!("line {}: unbalanced quote", number + 1),
            })
        })
        .collect()
}

/// Render a table as CSV.
///
/// Cells containing a comma or a quote are quoted, with inner quotes
/// doubled. Line breaks inside a cell cannot be represented and are logged.
pub fn to_csv(table: &StringTable) -> Vec<u8> {
    let mut out = Vec::new();

    for row in table.row_cells() {
        for (column, cell) in row.iter().enumerate() {
            if column > 0 {
                out.push(b',');
            }
            let text = cell.text.as_slice();
            if text.iter().any(|&b| b == b'\n' || b == b'\r') {
                warn!(
                    "string table '{}' has a line break in a cell; it will not rebuild identically",
                    decode_name(&table.name)
                );
            }
            if text.iter().any(|&b| b == b',' || b == b'"') {
                out.push(b'"');
                for &b in text {
                    if b == b'"' {
                        out.push(b'"');
                    }
                    out.push(b);
                }
                out.push(b'"');
            } else {
                out.extend_from_slice(text);
            }
        }
        out.push(b'\n');
    }

    out
}

pub(crate) fn load(
    source: &dyn AssetSource,
    path: &str,
    collection: &mut AssetCollection,
) -> Result<usize> {
    let text = source.read(path)?;
    let rows = parse_csv(&text, path)?;
    let table = StringTable::from_rows(path, rows);

    info!(
        "stringtable {path} ({} rows, {} columns)",
        table.rows, table.columns
    );

    collection.push(Asset::new(path, Payload::StringTable(table)));
    Ok(1)
}

pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<StringTable> {
    reader.skip(4)?;
    let columns = reader.read_u32()?;
    let rows = reader.read_u32()?;
    reader.skip(4)?;
    let name = reader.read_cstring()?.to_vec();

    // Rows without columns (or the reverse) would extract to unbounded output
    if (columns == 0) != (rows == 0) {
        return Err(Error::InvalidTable {
            name: decode_name(&name).into_owned(),
            columns,
            rows,
        });
    }

    // Each cell needs at least its 8-byte pair and a terminator
    let count = (columns as usize).saturating_mul(rows as usize);
    let needed = count.saturating_mul(9);
    if needed > reader.remaining() {
        return Err(Error::Truncated {
            needed,
            available: reader.remaining(),
        });
    }

    let mut hashes = Vec::with_capacity(count);
    for _ in 0..count {
        reader.skip(4)?;
        hashes.push(reader.read_i32()?);
    }

    let mut cells = Vec::with_capacity(count);
    for hash in hashes {
        let text = reader.read_cstring()?.to_vec();
        cells.push(StringTableCell { text, hash });
    }

    Ok(StringTable {
        name,
        columns,
        rows,
        cells,
    })
}

pub(crate) fn serialize(writer: &mut BinaryWriter, table: &StringTable) {
    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_u32(table.columns);
    writer.write_u32(table.rows);
    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_cstring(&table.name);

    for cell in &table.cells {
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_i32(cell.hash);
    }
    for cell in &table.cells {
        writer.write_cstring(&cell.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<Vec<u8>>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| c.as_bytes().to_vec()).collect())
            .collect()
    }

    fn header(columns: u32, rows: u32) -> BinaryWriter {
        let mut writer = BinaryWriter::new();
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_u32(columns);
        writer.write_u32(rows);
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_cstring(b"t");
        writer
    }

    #[test]
    fn test_split_line() {
        let split = |line: &str| split_line(line.as_bytes());
        assert_eq!(split("a,b,,c").unwrap(), [b"a".to_vec(), b"b".to_vec(), vec![], b"c".to_vec()]);
        assert_eq!(split("\"x,y\",z").unwrap(), [b"x,y".to_vec(), b"z".to_vec()]);
        assert_eq!(split("").unwrap(), [Vec::<u8>::new()]);
        assert_eq!(split("say \"\"hi\"\"").unwrap(), [b"say hi".to_vec()]);
        assert_eq!(split("\"a \"\"b\"\"\"").unwrap(), [b"a \"b\"".to_vec()]);
        assert!(split("\"open,cell").is_none());
    }

    #[test]
    fn test_parse_csv_reports_line() {
        let err = parse_csv(b"a,b\r\nc,\"d\r\n", "mp/t.csv").unwrap_err();
        match err {
            Error::Grammar { path, message } => {
                assert_eq!(path, "mp/t.csv");
                assert_eq!(message, "line 2: unbalanced quote");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_load_pads_ragged_rows() {
        let mut source = MemorySource::new();
        source.insert("mp/t.csv", "id,name,desc\r\n1,one\r\n2\r\n");

        let mut collection = AssetCollection::new();
        load(&source, "mp/t.csv", &mut collection).unwrap();

        let Payload::StringTable(table) = collection.iter().next().unwrap().payload() else {
            panic!("expected a string table");
        };
        assert_eq!((table.rows, table.columns), (3, 3));
        assert_eq!(table.cell(2, 0).unwrap().text, b"2");
        assert!(table.cell(2, 2).unwrap().text.is_empty());
        assert_eq!(table.name, b"mp/t.csv");
    }

    #[test]
    fn test_load_hashes_source_bytes() {
        let mut source = MemorySource::new();
        source.insert("mp/t.csv", &b"caf\xE9\n"[..]);

        let mut collection = AssetCollection::new();
        load(&source, "mp/t.csv", &mut collection).unwrap();

        let Payload::StringTable(table) = collection.iter().next().unwrap().payload() else {
            panic!("expected a string table");
        };
        let cell = table.cell(0, 0).unwrap();
        assert_eq!(cell.text, b"caf\xE9");
        assert_eq!(cell.hash, fflink_common::hash::string_table_hash_bytes(b"caf\xE9"));
    }

    #[test]
    fn test_to_csv_quotes_commas() {
        let table = StringTable::from_rows("t.csv", rows(&[&["a", "b,c"], &["d"]]));
        let text = to_csv(&table);
        assert_eq!(text, b"a,\"b,c\"\nd,\n");

        let parsed = parse_csv(&text, "t.csv").unwrap();
        assert_eq!(StringTable::from_rows("t.csv", parsed), table);
    }

    #[test]
    fn test_to_csv_escapes_quotes() {
        let table = StringTable::from_rows(
            "t.csv",
            rows(&[&["say \"hi\"", "\""], &["x\"", "plain"]]),
        );
        let text = to_csv(&table);
        assert_eq!(text, b"\"say \"\"hi\"\"\",\"\"\"\"\n\"x\"\"\",plain\n");

        let parsed = parse_csv(&text, "t.csv").unwrap();
        assert_eq!(StringTable::from_rows("t.csv", parsed), table);
    }

    #[test]
    fn test_wire_layout() {
        let table = StringTable::from_rows("t", rows(&[&["Hello"]]));
        let mut writer = BinaryWriter::new();
        serialize(&mut writer, &table);

        let mut expected = header(1, 1);
        expected.write_u32(PTR_PLACEHOLDER);
        expected.write_i32(99_162_322);
        expected.write_cstring(b"Hello");
        assert_eq!(writer.as_bytes(), expected.as_bytes());

        let bytes = writer.into_bytes();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(read(&mut reader).unwrap(), table);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_non_utf8_cells_survive_read_and_serialize() {
        let mut writer = header(2, 1);
        for hash in [11, -22] {
            writer.write_u32(PTR_PLACEHOLDER);
            writer.write_i32(hash);
        }
        writer.write_cstring(b"Caf\xE9");
        writer.write_cstring(b"\x93quoted\x94");
        let input = writer.into_bytes();

        let table = read(&mut BinaryReader::new(&input)).unwrap();
        assert_eq!(table.cells[0].text, b"Caf\xE9");

        let mut out = BinaryWriter::new();
        serialize(&mut out, &table);
        assert_eq!(out.as_bytes(), input.as_slice());
        assert_eq!(to_csv(&table), b"Caf\xE9,\x93quoted\x94\n");
    }

    #[test]
    fn test_hash_kept_verbatim_on_read() {
        let mut writer = header(1, 1);
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_i32(-7);
        writer.write_cstring(b"Hello");

        let bytes = writer.into_bytes();
        let table = read(&mut BinaryReader::new(&bytes)).unwrap();
        assert_eq!(table.cells[0].hash, -7);
    }

    #[test]
    fn test_huge_counts_are_truncation() {
        let bytes = header(0x0001_0000, 0x0001_0000).into_bytes();
        assert!(matches!(
            read(&mut BinaryReader::new(&bytes)),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_rows_without_columns_rejected() {
        for (columns, rows) in [(0, 50_000_000), (0, u32::MAX), (3, 0)] {
            let bytes = header(columns, rows).into_bytes();
            assert!(
                matches!(
                    read(&mut BinaryReader::new(&bytes)),
                    Err(Error::InvalidTable { .. })
                ),
                "{columns}x{rows}"
            );
        }

        let bytes = header(0, 0).into_bytes();
        let table = read(&mut BinaryReader::new(&bytes)).unwrap();
        assert!(to_csv(&table).is_empty());
    }
}
