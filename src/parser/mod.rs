//
//  mod.rs
//  Flow
//

pub mod imports;
pub mod language;

pub use imports::extract_imports;
pub use language::SourceFilter;
