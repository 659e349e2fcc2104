pub mod exchange;
pub mod migrate;

pub use exchange::{
    export_entries, read_import, validate_import_data, write_export, ExportData, ImportReport,
    EXPORT_VERSION,
};
pub use migrate::{classify_reach, migrate_reach, ReachShape};
