//! Asset type tags.

use std::fmt;

/// Asset type tags as stored in the asset table.
///
/// The values are the tags written to archives and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum AssetType {
    PhysPreset = 0x00,
    PhysCollMap = 0x01,
    XAnimParts = 0x02,
    XModelSurfs = 0x03,
    XModel = 0x04,
    Material = 0x05,
    PixelShader = 0x06,
    TechniqueSet = 0x07,
    Image = 0x08,
    Sound = 0x09,
    SoundCurve = 0x0A,
    LoadedSound = 0x0B,
    ClipMapSp = 0x0C,
    ClipMapMp = 0x0D,
    ComWorld = 0x0E,
    GameWorldSp = 0x0F,
    GameWorldMp = 0x10,
    /// Map entity string.
    MapEnts = 0x11,
    FxWorld = 0x12,
    GfxWorld = 0x13,
    LightDef = 0x14,
    UiMap = 0x15,
    Font = 0x16,
    MenuList = 0x17,
    Menu = 0x18,
    /// One localized string.
    LocalizeEntry = 0x19,
    Weapon = 0x1A,
    SndDriverGlobals = 0x1B,
    Fx = 0x1C,
    ImpactFx = 0x1D,
    AiType = 0x1E,
    MpType = 0x1F,
    Character = 0x20,
    XModelAlias = 0x21,
    /// Arbitrary file, optionally zlib-compressed.
    RawFile = 0x22,
    /// CSV-like table of strings.
    StringTable = 0x23,
    Leaderboard = 0x24,
    StructuredDataDef = 0x25,
    Tracer = 0x26,
    Vehicle = 0x27,
    /// Map entities for add-on maps.
    AddonMapEnts = 0x28,
    String = 0x29,
    AssetList = 0x2A,
}

impl AssetType {
    /// Every tag in numeric order; `ALL[t as usize] == t`.
    const ALL: [AssetType; 43] = [
        Self::PhysPreset,
        Self::PhysCollMap,
        Self::XAnimParts,
        Self::XModelSurfs,
        Self::XModel,
        Self::Material,
        Self::PixelShader,
        Self::TechniqueSet,
        Self::Image,
        Self::Sound,
        Self::SoundCurve,
        Self::LoadedSound,
        Self::ClipMapSp,
        Self::ClipMapMp,
        Self::ComWorld,
        Self::GameWorldSp,
        Self::GameWorldMp,
        Self::MapEnts,
        Self::FxWorld,
        Self::GfxWorld,
        Self::LightDef,
        Self::UiMap,
        Self::Font,
        Self::MenuList,
        Self::Menu,
        Self::LocalizeEntry,
        Self::Weapon,
        Self::SndDriverGlobals,
        Self::Fx,
        Self::ImpactFx,
        Self::AiType,
        Self::MpType,
        Self::Character,
        Self::XModelAlias,
        Self::RawFile,
        Self::StringTable,
        Self::Leaderboard,
        Self::StructuredDataDef,
        Self::Tracer,
        Self::Vehicle,
        Self::AddonMapEnts,
        Self::String,
        Self::AssetList,
    ];

    /// Parse from a tag value.
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// The numeric tag.
    #[inline]
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Upper-case engine name of the type.
    pub fn name(self) -> &'static str {
        match self {
            Self::PhysPreset => "PHYSPRESET",
            Self::PhysCollMap => "PHYSCOLLMAP",
            Self::XAnimParts => "XANIMPARTS",
            Self::XModelSurfs => "XMODEL_SURFS",
            Self::XModel => "XMODEL",
            Self::Material => "MATERIAL",
            Self::PixelShader => "PIXELSHADER",
            Self::TechniqueSet => "TECHNIQUE_SET",
            Self::Image => "IMAGE",
            Self::Sound => "SOUND",
            Self::SoundCurve => "SOUND_CURVE",
            Self::LoadedSound => "LOADED_SOUND",
            Self::ClipMapSp => "CLIPMAP_SP",
            Self::ClipMapMp => "CLIPMAP_MP",
            Self::ComWorld => "COMWORLD",
            Self::GameWorldSp => "GAMEWORLD_SP",
            Self::GameWorldMp => "GAMEWORLD_MP",
            Self::MapEnts => "MAP_ENTS",
            Self::FxWorld => "FXWORLD",
            Self::GfxWorld => "GFXWORLD",
            Self::LightDef => "LIGHT_DEF",
            Self::UiMap => "UI_MAP",
            Self::Font => "FONT",
            Self::MenuList => "MENULIST",
            Self::Menu => "MENU",
            Self::LocalizeEntry => "LOCALIZE_ENTRY",
            Self::Weapon => "WEAPON",
            Self::SndDriverGlobals => "SNDDRIVER_GLOBALS",
            Self::Fx => "FX",
            Self::ImpactFx => "IMPACT_FX",
            Self::AiType => "AITYPE",
            Self::MpType => "MPTYPE",
            Self::Character => "CHARACTER",
            Self::XModelAlias => "XMODELALIAS",
            Self::RawFile => "RAWFILE",
            Self::StringTable => "STRINGTABLE",
            Self::Leaderboard => "LEADERBOARD",
            Self::StructuredDataDef => "STRUCTURED_DATA_DEF",
            Self::Tracer => "TRACER",
            Self::Vehicle => "VEHICLE",
            Self::AddonMapEnts => "ADDON_MAP_ENTS",
            Self::String => "STRING",
            Self::AssetList => "ASSETLIST",
        }
    }
}

impl TryFrom<u32> for AssetType {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(value)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for a raw tag, `UNKNOWN` for tags outside the table.
pub fn tag_name(tag: u32) -> &'static str {
    AssetType::from_u32(tag).map_or("UNKNOWN", AssetType::name)
}
