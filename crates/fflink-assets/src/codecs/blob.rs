//! Opaque blob codec shared by map entities and physics presets.
//!
//! Same shape as an uncompressed raw file: `ptr 0 len ptr name\0
//! content[len] \0`.

use fflink_common::{BinaryReader, BinaryWriter, PTR_PLACEHOLDER};
use log::{info, warn};

use super::{decode_name, len_u32, Codec};
use crate::asset::{Asset, AssetCollection, Blob, Payload};
use crate::io::AssetSource;
use crate::Result;

pub(crate) fn load(
    codec: Codec,
    source: &dyn AssetSource,
    path: &str,
    collection: &mut AssetCollection,
) -> Result<usize> {
    let content = source.read(path)?;
    info!("{} {path} ({} bytes)", codec.manifest_name(), content.len());

    let blob = Blob {
        name: path.into(),
        content,
    };
    let payload = match codec {
        Codec::AddonMapEnts => Payload::AddonMapEnts(blob),
        Codec::PhysPreset => Payload::PhysPreset(blob),
        _ => Payload::MapEnts(blob),
    };

    collection.push(Asset::new(path, payload));
    Ok(1)
}

pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Blob> {
    reader.skip(8)?;
    let len = reader.read_u32()? as usize;
    reader.skip(4)?;
    let name = reader.read_cstring()?.to_vec();
    let content = reader.read_bytes(len)?.to_vec();

    if reader.read_u8()? != 0 {
        warn!("blob '{}' is not null-terminated", decode_name(&name));
    }

    Ok(Blob { name, content })
}

pub(crate) fn serialize(writer: &mut BinaryWriter, blob: &Blob) -> Result<()> {
    let len = len_u32(&blob.name, blob.content.len())?;

    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_u32(0);
    writer.write_u32(len);
    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_cstring(&blob.name);
    writer.write_bytes(&blob.content);
    writer.write_u8(0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use crate::Error;

    #[test]
    fn test_wire_layout() {
        let blob = Blob {
            name: "maps/mp/mp_x.d3dbsp".into(),
            content: b"{\n\"classname\" \"worldspawn\"\n}\n".to_vec(),
        };

        let mut writer = BinaryWriter::new();
        serialize(&mut writer, &blob).unwrap();
        let bytes = writer.into_bytes();

        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(bytes.last(), Some(&0));

        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(read(&mut reader).unwrap(), blob);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_non_utf8_name_survives_read_and_serialize() {
        let blob = Blob {
            name: b"maps/mp/\xE9t\xE9.d3dbsp".to_vec(),
            content: b"\xFF\xFE".to_vec(),
        };

        let mut writer = BinaryWriter::new();
        serialize(&mut writer, &blob).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[16..34], b"maps/mp/\xE9t\xE9.d3dbsp");

        let decoded = read(&mut BinaryReader::new(&bytes)).unwrap();
        assert_eq!(decoded, blob);

        let mut again = BinaryWriter::new();
        serialize(&mut again, &decoded).unwrap();
        assert_eq!(again.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_missing_terminator_is_truncation() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_u32(0);
        writer.write_u32(2);
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_cstring(b"b");
        writer.write_bytes(b"xy");

        let bytes = writer.into_bytes();
        assert!(matches!(
            read(&mut BinaryReader::new(&bytes)),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_load_picks_variant() {
        let mut source = MemorySource::new();
        source.insert("physic/default", vec![1u8, 2, 3]);

        let mut collection = AssetCollection::new();
        load(Codec::PhysPreset, &source, "physic/default", &mut collection).unwrap();

        let asset = collection.iter().next().unwrap();
        assert!(matches!(asset.payload(), Payload::PhysPreset(b) if b.content == [1, 2, 3]));
    }
}
