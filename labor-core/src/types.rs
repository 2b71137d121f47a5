use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

// ============================================================================
// Unit handles
// ============================================================================

/// Opaque handle to a host worker record.
///
/// The engine never owns worker data; it only carries handles between host
/// calls and converts them to `u64` when logging.
pub trait UnitKey: Copy + Eq + std::fmt::Debug {
    fn to_u64(self) -> u64;
}

// ============================================================================
// Labors - The fixed set of task categories a worker can be assigned
// ============================================================================

macro_rules! labors {
    ($($variant:ident => $name:literal),* $(,)?) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Tsify,
        )]
        #[tsify(into_wasm_abi, from_wasm_abi)]
        pub enum LaborId {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl LaborId {
            /// Number of known labors.
            pub const COUNT: usize = [$($name),*].len();

            /// Every known labor in enumeration order. Per-labor passes walk
            /// this array front to back.
            pub const ALL: [LaborId; Self::COUNT] = [$(LaborId::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(LaborId::$variant => $name,)*
                }
            }

            pub(crate) fn index(self) -> usize {
                self as usize
            }
        }
    };
}

labors! {
    Mine => "mine",
    HaulStone => "haul_stone",
    HaulWood => "haul_wood",
    HaulBody => "haul_body",
    HaulFood => "haul_food",
    HaulRefuse => "haul_refuse",
    HaulItem => "haul_item",
    HaulFurniture => "haul_furniture",
    HaulAnimals => "haul_animals",
    Cleaning => "cleaning",
    CutWood => "cutwood",
    Carpenter => "carpenter",
    Detail => "detail",
    Mason => "mason",
    AnimalTrain => "animal_train",
    AnimalCare => "animal_care",
    Diagnose => "diagnose",
    Surgery => "surgery",
    BoneSetting => "bone_setting",
    Suturing => "suturing",
    DressingWounds => "dressing_wounds",
    FeedWaterCivilians => "feed_water_civilians",
    RecoverWounded => "recover_wounded",
    Butcher => "butcher",
    Trapper => "trapper",
    Tanner => "tanner",
    Weaver => "weaver",
    Brewer => "brewer",
    Clothesmaker => "clothesmaker",
    Miller => "miller",
    ProcessPlant => "process_plant",
    MakeCheese => "make_cheese",
    Milk => "milk",
    Cook => "cook",
    Plant => "plant",
    Herbalist => "herbalist",
    Fish => "fish",
    CleanFish => "clean_fish",
    Hunt => "hunt",
    Smelt => "smelt",
    ForgeWeapon => "forge_weapon",
    ForgeArmor => "forge_armor",
    ForgeFurniture => "forge_furniture",
    MetalCraft => "metal_craft",
    CutGem => "cut_gem",
    EncrustGem => "encrust_gem",
    WoodCraft => "wood_craft",
    StoneCraft => "stone_craft",
    BoneCarve => "bone_carve",
    Glassmaker => "glassmaker",
    Mechanic => "mechanic",
    SiegeOperate => "siege_operate",
    PullLever => "pull_lever",
    BuildConstruction => "build_construction",
    RemoveConstruction => "remove_construction",
    HaulTrade => "haul_trade",
    HandleVehicles => "handle_vehicles",
    HaulWater => "haul_water",
    OperatePump => "operate_pump",
}

impl std::fmt::Display for LaborId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Skills - Rated competencies, each mapping to at most one labor
// ============================================================================

macro_rules! skills {
    ($($variant:ident => $name:literal, $labor:expr);* $(;)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
        #[tsify(into_wasm_abi, from_wasm_abi)]
        pub enum SkillId {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl SkillId {
            pub const ALL: [SkillId; [$($name),*].len()] = [$(SkillId::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(SkillId::$variant => $name,)*
                }
            }

            /// The labor exercising this skill, if any.
            pub fn labor(self) -> Option<LaborId> {
                match self {
                    $(SkillId::$variant => $labor,)*
                }
            }
        }
    };
}

skills! {
    Mining => "mining", Some(LaborId::Mine);
    Woodcutting => "woodcutting", Some(LaborId::CutWood);
    Carpentry => "carpentry", Some(LaborId::Carpenter);
    Engraving => "engraving", Some(LaborId::Detail);
    Masonry => "masonry", Some(LaborId::Mason);
    AnimalTraining => "animal_training", Some(LaborId::AnimalTrain);
    AnimalCaretaking => "animal_caretaking", Some(LaborId::AnimalCare);
    Diagnosis => "diagnosis", Some(LaborId::Diagnose);
    Surgery => "surgery", Some(LaborId::Surgery);
    BoneSetting => "bone_setting", Some(LaborId::BoneSetting);
    Suturing => "suturing", Some(LaborId::Suturing);
    WoundDressing => "wound_dressing", Some(LaborId::DressingWounds);
    Butchery => "butchery", Some(LaborId::Butcher);
    Trapping => "trapping", Some(LaborId::Trapper);
    Tanning => "tanning", Some(LaborId::Tanner);
    Weaving => "weaving", Some(LaborId::Weaver);
    Brewing => "brewing", Some(LaborId::Brewer);
    Clothesmaking => "clothesmaking", Some(LaborId::Clothesmaker);
    Milling => "milling", Some(LaborId::Miller);
    PlantProcessing => "plant_processing", Some(LaborId::ProcessPlant);
    Cheesemaking => "cheesemaking", Some(LaborId::MakeCheese);
    Milking => "milking", Some(LaborId::Milk);
    Cooking => "cooking", Some(LaborId::Cook);
    Farming => "farming", Some(LaborId::Plant);
    Herbalism => "herbalism", Some(LaborId::Herbalist);
    Fishing => "fishing", Some(LaborId::Fish);
    FishCleaning => "fish_cleaning", Some(LaborId::CleanFish);
    Ambush => "ambush", Some(LaborId::Hunt);
    Smelting => "smelting", Some(LaborId::Smelt);
    Weaponsmithing => "weaponsmithing", Some(LaborId::ForgeWeapon);
    Armorsmithing => "armorsmithing", Some(LaborId::ForgeArmor);
    Blacksmithing => "blacksmithing", Some(LaborId::ForgeFurniture);
    Metalcrafting => "metalcrafting", Some(LaborId::MetalCraft);
    GemCutting => "gem_cutting", Some(LaborId::CutGem);
    GemSetting => "gem_setting", Some(LaborId::EncrustGem);
    Woodcrafting => "woodcrafting", Some(LaborId::WoodCraft);
    Stonecrafting => "stonecrafting", Some(LaborId::StoneCraft);
    BoneCarving => "bone_carving", Some(LaborId::BoneCarve);
    Glassmaking => "glassmaking", Some(LaborId::Glassmaker);
    Mechanics => "mechanics", Some(LaborId::Mechanic);
    SiegeOperating => "siege_operating", Some(LaborId::SiegeOperate);
    PumpOperation => "pump_operation", Some(LaborId::OperatePump);
    // No associated labor
    Axe => "axe", None;
    Sword => "sword", None;
    Crossbow => "crossbow", None;
    Dodging => "dodging", None;
    Fighting => "fighting", None;
    Leadership => "leadership", None;
    Teaching => "teaching", None;
    Persuasion => "persuasion", None;
    Negotiation => "negotiation", None;
    Appraisal => "appraisal", None;
    Swimming => "swimming", None;
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
