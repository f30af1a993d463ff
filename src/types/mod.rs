pub mod error;
pub mod model;
pub mod report;
pub mod symbol;
pub mod utils;

pub use error::{Result, WeaveError};
pub use model::{
    CodeAnnotation, CodeField, CodeFile, CodeFunction, CodeParameter, CodeStructure, Position,
    Range, StructureType, qualify,
};
pub use report::*;
pub use symbol::{CodeSymbol, FILE_SCOPED_MODULE_TAG, SymbolKind};
pub use utils::{last_segment, log_filter_warn, strip_generics};
