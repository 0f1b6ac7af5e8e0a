//! Symbol tables - name to type lookup with scoping rules.
//!
//! The session keeps two tables, one keyed by source name and one by engine
//! name. Both are filled in a single population step after every header has
//! been parsed; querying an unpopulated table is an error.
//!
//! ## Key Types
//!
//! - [`SymbolTable`] - Cased and caseless name chains over every visible type
//! - [`FindOptions`] - Which kinds to accept and which scopes to search
//! - [`LookupScope`] - Arena and headers a lookup walks through
//! - [`EnumValueTable`] - Enum value name to owning enum
//!
//! ## Lookup order
//!
//! 1. The starting type and, unless `NO_PARENTS`, its super chain
//! 2. Each enclosing type outward (stops early with `NO_OUTER`)
//! 3. The owning header, then its transitive includes unless `NO_INCLUDES`
//! 4. Every header's top-level types unless `NO_GLOBAL`

mod enum_values;
mod options;
mod table;

pub use enum_values::EnumValueTable;
pub use options::FindOptions;
pub use table::{LookupScope, SymbolTable, SymbolTableKind};
