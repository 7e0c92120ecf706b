use crate::catalog::TemplateCatalog;
use crate::config::ConfigStore;
use crate::slots::coordinates::default_layout;
use crate::slots::keys::{
    slot_file_key, slot_role_key, slot_x_key, slot_y_key, KEY_CHAT_COUNT, SECTION_COORDINATES,
    SECTION_GENERAL, SECTION_TEMPLATES,
};
use crate::slots::scan::{reference_from_file_name, role_from_file_name};
use crate::slots::{ChatCount, SlotError};
use std::collections::BTreeMap;

/// Role and template reference bound to one chat slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub role: String,
    pub prompt_file: String,
}

impl SlotAssignment {
    fn filler(index: u8) -> Self {
        Self {
            role: format!("Chat{index}"),
            prompt_file: format!("@prompts_chat{index}"),
        }
    }
}

/// Raw operator input for one slot in manual mode. Blank fields fall back to
/// `Chat<i>` and `@prompts_<role>` respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualSlotEntry {
    pub role: String,
    pub prompt_file: String,
}

/// Fixed role names per chat count; counts 2..=6 take the matching prefix.
pub const DEFAULT_ROLE_TABLE: [&str; 6] = [
    "Frontend",
    "Backend",
    "Marketing",
    "Analytics",
    "CRM",
    "Support",
];

pub fn default_roles(count: ChatCount) -> &'static [&'static str] {
    &DEFAULT_ROLE_TABLE[..count.get() as usize]
}

fn prompt_file_for_role(role: &str) -> String {
    format!("@prompts_{}", role.to_lowercase())
}

/// Chat count currently persisted; absent or unparseable values fall back to
/// the default of 2.
pub fn configured_chat_count(store: &ConfigStore) -> ChatCount {
    store
        .get(SECTION_GENERAL, KEY_CHAT_COUNT)
        .and_then(|raw| ChatCount::parse(raw).ok())
        .unwrap_or(ChatCount::DEFAULT)
}

/// Persists the chat count together with the default coordinate layout for
/// that count. Counts without a predefined layout (5 and 6) write no
/// coordinates; those come from the calibration tool.
pub fn set_chat_count(store: &mut ConfigStore, count: ChatCount) -> Result<(), SlotError> {
    store.set(SECTION_GENERAL, KEY_CHAT_COUNT, &count.to_string());
    for (index, coordinate) in default_layout(count) {
        store.set(
            SECTION_COORDINATES,
            &slot_x_key(index),
            &coordinate.x.to_string(),
        );
        store.set(
            SECTION_COORDINATES,
            &slot_y_key(index),
            &coordinate.y.to_string(),
        );
    }
    store.commit()?;
    Ok(())
}

fn persist(
    store: &mut ConfigStore,
    assignments: &BTreeMap<u8, SlotAssignment>,
) -> Result<(), SlotError> {
    for (index, assignment) in assignments {
        store.set(SECTION_TEMPLATES, &slot_role_key(*index), &assignment.role);
        store.set(
            SECTION_TEMPLATES,
            &slot_file_key(*index),
            &assignment.prompt_file,
        );
    }
    store.commit()?;
    Ok(())
}

/// Default-by-count mode: every slot gets the fixed role for its position and
/// a `@prompts_<role>` reference.
pub fn assign_default_roles(
    store: &mut ConfigStore,
    count: ChatCount,
) -> Result<BTreeMap<u8, SlotAssignment>, SlotError> {
    let mut assignments = BTreeMap::new();
    for (position, role) in default_roles(count).iter().enumerate() {
        assignments.insert(
            position as u8 + 1,
            SlotAssignment {
                role: (*role).to_string(),
                prompt_file: prompt_file_for_role(role),
            },
        );
    }
    persist(store, &assignments)?;
    Ok(assignments)
}

/// Manual mode: operator-supplied entries per slot, with blank fields
/// defaulted. Missing trailing entries behave like blank ones.
pub fn assign_manual(
    store: &mut ConfigStore,
    count: ChatCount,
    entries: &[ManualSlotEntry],
) -> Result<BTreeMap<u8, SlotAssignment>, SlotError> {
    let mut assignments = BTreeMap::new();
    for index in count.slot_indices() {
        let entry = entries
            .get(index as usize - 1)
            .cloned()
            .unwrap_or_default();
        let role = if entry.role.trim().is_empty() {
            format!("Chat{index}")
        } else {
            entry.role.trim().to_string()
        };
        let prompt_file = if entry.prompt_file.trim().is_empty() {
            prompt_file_for_role(&role)
        } else {
            entry.prompt_file.trim().to_string()
        };
        assignments.insert(index, SlotAssignment { role, prompt_file });
    }
    persist(store, &assignments)?;
    Ok(assignments)
}

/// Scan mode: discovered `prompts_*.json` files are assigned to slots in
/// listing order. Slots beyond the discovered files are left unassigned; a
/// shortfall is not an error.
pub fn assign_from_discovered_files(
    store: &mut ConfigStore,
    count: ChatCount,
    files: &[String],
) -> Result<BTreeMap<u8, SlotAssignment>, SlotError> {
    let mut assignments = BTreeMap::new();
    for index in count.slot_indices() {
        let Some(file) = files.get(index as usize - 1) else {
            break;
        };
        assignments.insert(
            index,
            SlotAssignment {
                role: role_from_file_name(file),
                prompt_file: reference_from_file_name(file),
            },
        );
    }
    persist(store, &assignments)?;
    Ok(assignments)
}

/// Specialized-template mode: the template's required slots are written
/// verbatim, remaining slots up to the chat count get filler assignments.
/// Fails before any write when the configured count cannot host the template.
pub fn assign_from_template(
    store: &mut ConfigStore,
    count: ChatCount,
    catalog: &TemplateCatalog,
    key: &str,
) -> Result<BTreeMap<u8, SlotAssignment>, SlotError> {
    let template = catalog.get(key).ok_or_else(|| SlotError::UnknownTemplate {
        template: key.to_string(),
    })?;
    let required = template.required_slot_count();
    if count.get() < required {
        return Err(SlotError::InsufficientChats {
            template: template.key.as_str().to_string(),
            required,
            configured: count.get(),
        });
    }
    let mut assignments = BTreeMap::new();
    for (position, slot) in template.required_slots.iter().enumerate() {
        assignments.insert(
            position as u8 + 1,
            SlotAssignment {
                role: slot.role.clone(),
                prompt_file: slot.prompt_file.clone(),
            },
        );
    }
    for index in required + 1..=count.get() {
        assignments.insert(index, SlotAssignment::filler(index));
    }
    persist(store, &assignments)?;
    Ok(assignments)
}

/// Re-reads the persisted assignment mapping for slots 1..=count. Slots with
/// incomplete entries are omitted.
pub fn read_assignments(store: &ConfigStore, count: ChatCount) -> BTreeMap<u8, SlotAssignment> {
    let mut assignments = BTreeMap::new();
    for index in count.slot_indices() {
        let role = store.get(SECTION_TEMPLATES, &slot_role_key(index));
        let prompt_file = store.get(SECTION_TEMPLATES, &slot_file_key(index));
        if let (Some(role), Some(prompt_file)) = (role, prompt_file) {
            assignments.insert(
                index,
                SlotAssignment {
                    role: role.to_string(),
                    prompt_file: prompt_file.to_string(),
                },
            );
        }
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(temp: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::open(&temp.path().join("config.yaml")).expect("open store")
    }

    fn count(value: u8) -> ChatCount {
        ChatCount::new(value).expect("valid count")
    }

    #[test]
    fn set_chat_count_persists_count_and_default_coordinates() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        set_chat_count(&mut store, count(3)).expect("set count");

        let reopened = open_store(&temp);
        assert_eq!(reopened.get(SECTION_GENERAL, KEY_CHAT_COUNT), Some("3"));
        assert_eq!(reopened.get(SECTION_COORDINATES, "chat_1_x"), Some("300"));
        assert_eq!(reopened.get(SECTION_COORDINATES, "chat_3_y"), Some("800"));
        assert_eq!(configured_chat_count(&reopened).get(), 3);
    }

    #[test]
    fn set_chat_count_writes_no_coordinates_for_five_chats() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        set_chat_count(&mut store, count(5)).expect("set count");

        let reopened = open_store(&temp);
        assert_eq!(reopened.get(SECTION_GENERAL, KEY_CHAT_COUNT), Some("5"));
        assert!(!reopened.has_section(SECTION_COORDINATES));
    }

    #[test]
    fn configured_chat_count_falls_back_to_two() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        assert_eq!(configured_chat_count(&store).get(), 2);

        store.set(SECTION_GENERAL, KEY_CHAT_COUNT, "nine");
        assert_eq!(configured_chat_count(&store).get(), 2);
    }

    #[test]
    fn default_roles_for_two_chats_are_frontend_and_backend() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let assignments = assign_default_roles(&mut store, count(2)).expect("assign");

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[&1].role, "Frontend");
        assert_eq!(assignments[&1].prompt_file, "@prompts_frontend");
        assert_eq!(assignments[&2].role, "Backend");
        assert_eq!(assignments[&2].prompt_file, "@prompts_backend");
    }

    #[test]
    fn default_roles_for_six_chats_end_with_crm_and_support() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let assignments = assign_default_roles(&mut store, count(6)).expect("assign");
        assert_eq!(assignments[&5].role, "CRM");
        assert_eq!(assignments[&5].prompt_file, "@prompts_crm");
        assert_eq!(assignments[&6].role, "Support");
    }

    #[test]
    fn manual_mode_defaults_blank_fields() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let entries = vec![
            ManualSlotEntry {
                role: "Design".to_string(),
                prompt_file: String::new(),
            },
            ManualSlotEntry::default(),
        ];
        let assignments = assign_manual(&mut store, count(2), &entries).expect("assign");

        assert_eq!(assignments[&1].role, "Design");
        assert_eq!(assignments[&1].prompt_file, "@prompts_design");
        assert_eq!(assignments[&2].role, "Chat2");
        assert_eq!(assignments[&2].prompt_file, "@prompts_chat2");
    }

    #[test]
    fn scan_mode_leaves_slots_beyond_discovered_files_unassigned() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let files = vec!["prompts_frontend.json".to_string()];
        let assignments =
            assign_from_discovered_files(&mut store, count(3), &files).expect("assign");

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[&1].role, "Frontend");
        assert_eq!(assignments[&1].prompt_file, "@prompts_frontend");
        assert!(read_assignments(&store, count(3)).get(&2).is_none());
    }

    #[test]
    fn template_mode_rejects_insufficient_chats_without_writing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let catalog = TemplateCatalog::builtin();

        let err = assign_from_template(&mut store, count(2), &catalog, "notion_user_stories")
            .expect_err("two chats cannot host a three-slot template");
        assert!(matches!(
            err,
            SlotError::InsufficientChats {
                required: 3,
                configured: 2,
                ..
            }
        ));
        assert!(!store.path().exists());
        assert!(read_assignments(&store, count(2)).is_empty());
    }

    #[test]
    fn template_mode_writes_required_slots_and_fillers() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get("notion_user_stories").expect("builtin entry");

        let assignments = assign_from_template(&mut store, count(4), &catalog, "notion_user_stories")
            .expect("assign");
        assert_eq!(assignments.len(), 4);
        assert_eq!(assignments[&3].role, template.required_slots[2].role);
        assert_eq!(assignments[&4].role, "Chat4");
        assert_eq!(assignments[&4].prompt_file, "@prompts_chat4");
    }

    #[test]
    fn unknown_template_key_is_a_typed_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let catalog = TemplateCatalog::builtin();
        let err = assign_from_template(&mut store, count(4), &catalog, "no_such_template")
            .expect_err("unknown key");
        assert!(matches!(err, SlotError::UnknownTemplate { .. }));
    }

    #[test]
    fn any_mode_round_trips_through_the_store() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let written = assign_default_roles(&mut store, count(4)).expect("assign");

        let reopened = open_store(&temp);
        assert_eq!(read_assignments(&reopened, count(4)), written);
    }
}
