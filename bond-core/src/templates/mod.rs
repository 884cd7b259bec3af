//! Template library: named branding snapshots that can be saved, loaded,
//! deleted, exported to JSON and imported back.

pub mod io;
pub mod registry;

pub use io::{FileError, FileSink, FileSource};
pub use registry::{
    TemplateError, TemplateExport, TemplateRegistry, export_filename, export_template,
};
