use std::fs;
use std::path::Path;

use fflink::assets::asset_list;
use fflink::prelude::*;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A mod directory with one asset of each default type.
fn sample_mod(root: &Path) -> std::path::PathBuf {
    let mod_dir = root.join("mp_mymod");
    write(
        &mod_dir.join("zone_source/mp_mymod.csv"),
        "localize,menu\nrawfile, maps/mp/gametypes/_mod.gsc\n\nstringtable,mp/mod_table.csv\n",
    );
    write(
        &mod_dir.join("english/localizedstrings/menu.str"),
        "REFERENCE START\nLANG_ENGLISH \"Start \\\"now\\\"\"\n\nREFERENCE QUIT\nLANG_ENGLISH \"Quit\"\n",
    );
    write(
        &mod_dir.join("maps/mp/gametypes/_mod.gsc"),
        "init()\n{\n\tlevel.mod = true;\n}\n",
    );
    write(&mod_dir.join("mp/mod_table.csv"), "id,name\n1,\"one, uno\"\n2\n");
    mod_dir
}

#[test]
fn test_build_then_unpack() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());

    let built = fflink::build(&mod_dir, &BuildOptions::default()).unwrap();
    assert_eq!(built.archive_path, dir.path().join("mp_mymod.ff"));
    assert_eq!(built.manifest_rows, 3);
    assert_eq!(built.asset_count, 4);
    assert!(built.intermediate_path.is_none());

    let archive = fs::read(&built.archive_path).unwrap();
    assert_eq!(&archive[..8], b"IWffu100");
    assert_eq!(archive[0x25], 0x78);

    let out = dir.path().join("unpacked");
    let report = fflink::unpack(
        &built.archive_path,
        &UnpackOptions {
            output_dir: Some(out.clone()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(report.asset_count, 4);
    assert_eq!(report.summary.written, 4);
    assert_eq!(report.manifest_path, out.join("zone_source/unpacked.csv"));

    assert_eq!(
        fs::read_to_string(&report.manifest_path).unwrap(),
        "localize,menu\nrawfile,maps/mp/gametypes/_mod.gsc\nstringtable,mp/mod_table.csv\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("english/localizedstrings/menu.str")).unwrap(),
        "REFERENCE START\nLANG_ENGLISH \"Start \\\"now\\\"\"\nREFERENCE QUIT\nLANG_ENGLISH \"Quit\"\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("maps/mp/gametypes/_mod.gsc")).unwrap(),
        "init()\n{\n\tlevel.mod = true;\n}\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("mp/mod_table.csv")).unwrap(),
        "id,name\n1,\"one, uno\"\n2,\n"
    );
}

#[test]
fn test_unpacked_tree_rebuilds_identically() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());
    let first = fflink::build(&mod_dir, &BuildOptions::default()).unwrap();

    let rebuilt_dir = dir.path().join("rebuilt");
    fs::create_dir_all(&rebuilt_dir).unwrap();
    let out = rebuilt_dir.join("mp_mymod");
    fflink::unpack(
        &first.archive_path,
        &UnpackOptions {
            output_dir: Some(out.clone()),
            ..Default::default()
        },
    )
    .unwrap();

    let second = fflink::build(&out, &BuildOptions::default()).unwrap();
    let a = FastFile::open(&first.archive_path).unwrap().inflate().unwrap();
    let b = FastFile::open(&second.archive_path).unwrap().inflate().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_latin1_text_and_quoted_cells_rebuild_identically() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());
    fs::write(
        mod_dir.join("english/localizedstrings/menu.str"),
        b"REFERENCE CAFE\nLANG_ENGLISH \"Caf\xE9 \x93ouvert\x94\"\n",
    )
    .unwrap();
    fs::write(
        mod_dir.join("mp/mod_table.csv"),
        b"id,name\n1,\"say \"\"hi\"\", na\xEFve\"\n",
    )
    .unwrap();
    let first = fflink::build(&mod_dir, &BuildOptions::default()).unwrap();

    let rebuilt_dir = dir.path().join("rebuilt");
    fs::create_dir_all(&rebuilt_dir).unwrap();
    let out = rebuilt_dir.join("mp_mymod");
    fflink::unpack(
        &first.archive_path,
        &UnpackOptions {
            output_dir: Some(out.clone()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        fs::read(out.join("english/localizedstrings/menu.str")).unwrap(),
        b"REFERENCE CAFE\nLANG_ENGLISH \"Caf\xE9 \x93ouvert\x94\"\n"
    );

    let second = fflink::build(&out, &BuildOptions::default()).unwrap();
    let a = FastFile::open(&first.archive_path).unwrap().inflate().unwrap();
    let b = FastFile::open(&second.archive_path).unwrap().inflate().unwrap();
    assert_eq!(a, b);

    let (_, entries) = asset_list::decode_all(&a, Registry::new()).unwrap();
    let Some(Payload::StringTable(table)) = &entries.last().unwrap().payload else {
        panic!("expected the string table last");
    };
    assert_eq!(table.cell(1, 1).unwrap().text, b"say \"hi\", na\xEFve");
}

#[test]
fn test_build_options() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());

    let options = BuildOptions {
        keep_intermediate: true,
        extension: ArchiveExtension::Ffm,
        compress_rawfiles: true,
        ..Default::default()
    };
    let built = fflink::build(&mod_dir, &options).unwrap();
    assert_eq!(built.archive_path, dir.path().join("mp_mymod.ffm"));

    let intermediate = built.intermediate_path.unwrap();
    assert_eq!(intermediate, dir.path().join("mp_mymod.ffraw"));

    let raw = fs::read(&intermediate).unwrap();
    let inflated = FastFile::open(&built.archive_path).unwrap().inflate().unwrap();
    assert_eq!(raw, inflated);

    let (_, entries) = asset_list::decode_all(&raw, Registry::new()).unwrap();
    let Some(Payload::RawFile(script)) = &entries[2].payload else {
        panic!("expected the raw file third");
    };
    assert_eq!(script.content, b"init()\n{\n\tlevel.mod = true;\n}\n");
}

#[test]
fn test_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let mod_dir = dir.path().join("empty_mod");
    fs::create_dir_all(&mod_dir).unwrap();

    let err = fflink::build(&mod_dir, &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, fflink::Error::MissingManifest(_)));
}

#[test]
fn test_unsupported_manifest_type_aborts_build() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());
    write(
        &mod_dir.join("zone_source/mp_mymod.csv"),
        "rawfile,maps/mp/gametypes/_mod.gsc\nweapon,mp/ak47_mp\n",
    );

    let err = fflink::build(&mod_dir, &BuildOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        fflink::Error::Assets(fflink::assets::Error::UnsupportedType(ref name)) if name == "weapon"
    ));
    assert!(!dir.path().join("mp_mymod.ff").exists());
}

#[test]
fn test_self_reference_skipped_on_unpack() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());
    write(&mod_dir.join("mp_mymod.cfg"), "generated");
    write(
        &mod_dir.join("zone_source/mp_mymod.csv"),
        "rawfile,mp_mymod.cfg\nrawfile,maps/mp/gametypes/_mod.gsc\n",
    );

    let built = fflink::build(&mod_dir, &BuildOptions::default()).unwrap();
    fs::remove_dir_all(&mod_dir).unwrap();

    let report = fflink::unpack(&built.archive_path, &UnpackOptions::default()).unwrap();
    assert_eq!(report.output_dir, mod_dir);
    assert_eq!(report.summary.skipped_self_reference, 1);
    assert_eq!(report.summary.written, 1);
    assert!(!mod_dir.join("mp_mymod.cfg").exists());
}

#[test]
fn test_progress_and_list() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());
    let built = fflink::build(&mod_dir, &BuildOptions::default()).unwrap();

    let mut calls = Vec::new();
    fflink::unpack_with_progress(
        &built.archive_path,
        &UnpackOptions {
            output_dir: Some(dir.path().join("out")),
            ..Default::default()
        },
        |done, total| calls.push((done, total)),
    )
    .unwrap();
    assert_eq!(calls, [(1, 4), (2, 4), (3, 4), (4, 4)]);

    let listing = fflink::list(&built.archive_path, 1 << 20).unwrap();
    assert_eq!(listing.name, "mp_mymod.ff");
    assert_eq!(listing.stream_offset, 0x25);
    let names: Vec<_> = listing.entries.iter().map(|e| e.type_name).collect();
    assert_eq!(
        names,
        ["LOCALIZE_ENTRY", "LOCALIZE_ENTRY", "RAWFILE", "STRINGTABLE"]
    );
}

#[test]
fn test_archive_size_cap() {
    let dir = TempDir::new().unwrap();
    let mod_dir = sample_mod(dir.path());
    let built = fflink::build(&mod_dir, &BuildOptions::default()).unwrap();

    let err = fflink::unpack(
        &built.archive_path,
        &UnpackOptions {
            max_archive_size: 16,
            output_dir: Some(dir.path().join("capped")),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, fflink::Error::Archive(_)));
}
