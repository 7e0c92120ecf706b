pub mod assignment;
pub mod chat_count;
pub mod coordinates;
pub mod error;
pub mod keys;
pub mod scan;

pub use assignment::{
    assign_default_roles, assign_from_discovered_files, assign_from_template, assign_manual,
    configured_chat_count, default_roles, read_assignments, set_chat_count, ManualSlotEntry,
    SlotAssignment, DEFAULT_ROLE_TABLE,
};
pub use chat_count::ChatCount;
pub use coordinates::{configured_layout, default_layout, SlotCoordinate};
pub use error::SlotError;
pub use scan::{discover_prompt_files, role_from_file_name};
