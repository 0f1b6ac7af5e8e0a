//! Static capabilities of property kinds.

use bitflags::bitflags;

bitflags! {
    /// What a property kind supports, independent of any one declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyCaps: u32 {
        /// Passed as `const T&` in native function signatures
        const PASS_CPP_ARGS_BY_REF = 1 << 0;
        /// Needs an explicit argument in generated constructors
        const REQUIRES_NULL_CONSTRUCTOR_ARG = 1 << 1;
        const CAN_BE_CONTAINER_VALUE = 1 << 2;
        const CAN_BE_CONTAINER_KEY = 1 << 3;
        const CAN_BE_INSTANCED = 1 << 4;
        const CAN_EXPOSE_ON_SPAWN = 1 << 5;
        const CAN_HAVE_CONFIG = 1 << 6;
        const CAN_BE_BLUEPRINT_ASSIGNABLE = 1 << 7;
        const CAN_BE_BLUEPRINT_CALLABLE = 1 << 8;
        const CAN_BE_BLUEPRINT_AUTHORITY_ONLY = 1 << 9;
        const IS_PARAMETER_SUPPORTED_BY_BLUEPRINT = 1 << 10;
        const IS_MEMBER_SUPPORTED_BY_BLUEPRINT = 1 << 11;

        /// Starting point for every kind.
        const DEFAULT = Self::CAN_BE_CONTAINER_VALUE.bits()
            | Self::CAN_BE_CONTAINER_KEY.bits()
            | Self::CAN_HAVE_CONFIG.bits();

        const SUPPORTED_BY_BLUEPRINT = Self::IS_PARAMETER_SUPPORTED_BY_BLUEPRINT.bits()
            | Self::IS_MEMBER_SUPPORTED_BY_BLUEPRINT.bits();

        /// Blueprint-exposable value kinds.
        const BLUEPRINT_VALUE = Self::SUPPORTED_BY_BLUEPRINT.bits()
            | Self::CAN_EXPOSE_ON_SPAWN.bits();
    }
}
