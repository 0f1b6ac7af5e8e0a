//! Per-occurrence property flags.

use bitflags::bitflags;

bitflags! {
    /// Instance flags of a property, bit-compatible with the engine's property flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u64 {
        const EDIT = 0x0000_0000_0000_0001;
        const CONST_PARM = 0x0000_0000_0000_0002;
        const BLUEPRINT_VISIBLE = 0x0000_0000_0000_0004;
        const EXPORT_OBJECT = 0x0000_0000_0000_0008;
        const BLUEPRINT_READ_ONLY = 0x0000_0000_0000_0010;
        const NET = 0x0000_0000_0000_0020;
        const EDIT_FIXED_SIZE = 0x0000_0000_0000_0040;
        const PARM = 0x0000_0000_0000_0080;
        const OUT_PARM = 0x0000_0000_0000_0100;
        const ZERO_CONSTRUCTOR = 0x0000_0000_0000_0200;
        const RETURN_PARM = 0x0000_0000_0000_0400;
        const DISABLE_EDIT_ON_TEMPLATE = 0x0000_0000_0000_0800;
        const TRANSIENT = 0x0000_0000_0000_2000;
        const CONFIG = 0x0000_0000_0000_4000;
        const DISABLE_EDIT_ON_INSTANCE = 0x0000_0000_0001_0000;
        const EDIT_CONST = 0x0000_0000_0002_0000;
        const GLOBAL_CONFIG = 0x0000_0000_0004_0000;
        const INSTANCED_REFERENCE = 0x0000_0000_0008_0000;
        const DUPLICATE_TRANSIENT = 0x0000_0000_0020_0000;
        const SAVE_GAME = 0x0000_0000_0100_0000;
        const NO_CLEAR = 0x0000_0000_0200_0000;
        const REFERENCE_PARM = 0x0000_0000_0800_0000;
        const BLUEPRINT_ASSIGNABLE = 0x0000_0000_1000_0000;
        const DEPRECATED = 0x0000_0000_2000_0000;
        const IS_PLAIN_OLD_DATA = 0x0000_0000_4000_0000;
        const REP_SKIP = 0x0000_0000_8000_0000;
        const REP_NOTIFY = 0x0000_0001_0000_0000;
        const INTERP = 0x0000_0002_0000_0000;
        const NON_TRANSACTIONAL = 0x0000_0004_0000_0000;
        const EDITOR_ONLY = 0x0000_0008_0000_0000;
        const NO_DESTRUCTOR = 0x0000_0010_0000_0000;
        const AUTO_WEAK = 0x0000_0040_0000_0000;
        const CONTAINS_INSTANCED_REFERENCE = 0x0000_0080_0000_0000;
        const ASSET_REGISTRY_SEARCHABLE = 0x0000_0100_0000_0000;
        const SIMPLE_DISPLAY = 0x0000_0200_0000_0000;
        const ADVANCED_DISPLAY = 0x0000_0400_0000_0000;
        const PROTECTED = 0x0000_0800_0000_0000;
        const BLUEPRINT_CALLABLE = 0x0000_1000_0000_0000;
        const BLUEPRINT_AUTHORITY_ONLY = 0x0000_2000_0000_0000;
        const TEXT_EXPORT_TRANSIENT = 0x0000_4000_0000_0000;
        const NON_PIE_DUPLICATE_TRANSIENT = 0x0000_8000_0000_0000;
        const EXPOSE_ON_SPAWN = 0x0001_0000_0000_0000;
        const PERSISTENT_INSTANCE = 0x0002_0000_0000_0000;
        const UOBJECT_WRAPPER = 0x0004_0000_0000_0000;
        const HAS_GET_VALUE_TYPE_HASH = 0x0008_0000_0000_0000;
        const NATIVE_ACCESS_SPECIFIER_PUBLIC = 0x0010_0000_0000_0000;
        const NATIVE_ACCESS_SPECIFIER_PROTECTED = 0x0020_0000_0000_0000;
        const NATIVE_ACCESS_SPECIFIER_PRIVATE = 0x0040_0000_0000_0000;
        const SKIP_SERIALIZATION = 0x0080_0000_0000_0000;

        /// Flags describing how the property takes part in a function signature.
        const PARM_FLAGS = Self::PARM.bits()
            | Self::OUT_PARM.bits()
            | Self::RETURN_PARM.bits()
            | Self::REFERENCE_PARM.bits()
            | Self::CONST_PARM.bits();

        /// Flags derived from the kind rather than from declaration specifiers.
        const COMPUTED_FLAGS = Self::IS_PLAIN_OLD_DATA.bits()
            | Self::NO_DESTRUCTOR.bits()
            | Self::ZERO_CONSTRUCTOR.bits()
            | Self::HAS_GET_VALUE_TYPE_HASH.bits();

        const TRANSIENT_FLAGS = Self::TRANSIENT.bits()
            | Self::DUPLICATE_TRANSIENT.bits()
            | Self::NON_PIE_DUPLICATE_TRANSIENT.bits();

        const PROPAGATE_TO_ARRAY_INNER = Self::EXPORT_OBJECT.bits()
            | Self::PERSISTENT_INSTANCE.bits()
            | Self::INSTANCED_REFERENCE.bits()
            | Self::CONTAINS_INSTANCED_REFERENCE.bits()
            | Self::CONFIG.bits()
            | Self::EDIT_CONST.bits()
            | Self::DEPRECATED.bits()
            | Self::EDITOR_ONLY.bits()
            | Self::AUTO_WEAK.bits()
            | Self::UOBJECT_WRAPPER.bits();

        const PROPAGATE_TO_SET_ELEMENT = Self::PROPAGATE_TO_ARRAY_INNER.bits() | Self::EDIT.bits();

        const PROPAGATE_TO_MAP_VALUE = Self::PROPAGATE_TO_ARRAY_INNER.bits() | Self::EDIT.bits();

        /// Same as the map value mask, minus `DEPRECATED`.
        const PROPAGATE_TO_MAP_KEY = Self::PROPAGATE_TO_MAP_VALUE.bits() & !Self::DEPRECATED.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_key_mask_drops_only_deprecated() {
        let diff = PropertyFlags::PROPAGATE_TO_MAP_VALUE ^ PropertyFlags::PROPAGATE_TO_MAP_KEY;
        assert_eq!(diff, PropertyFlags::DEPRECATED);
    }

    #[test]
    fn test_engine_bit_values() {
        assert_eq!(PropertyFlags::OUT_PARM.bits(), 0x100);
        assert_eq!(PropertyFlags::INSTANCED_REFERENCE.bits(), 0x80000);
        assert_eq!(PropertyFlags::REP_SKIP.bits(), 0x8000_0000);
        assert_eq!(PropertyFlags::PERSISTENT_INSTANCE.bits(), 0x0002_0000_0000_0000);
    }
}
