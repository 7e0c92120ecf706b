use crate::config::ConfigStore;
use crate::slots::keys::{slot_x_key, slot_y_key, SECTION_COORDINATES};
use crate::slots::ChatCount;
use std::collections::BTreeMap;

/// Screen position of one chat input box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCoordinate {
    pub x: i32,
    pub y: i32,
}

const fn coord(x: i32, y: i32) -> SlotCoordinate {
    SlotCoordinate { x, y }
}

/// Predefined screen layouts per chat count. Layouts exist for 2, 3 and 4
/// chats; 5 and 6 have no defaults and must come from the calibration tool,
/// so the returned mapping is empty for those counts.
pub fn default_layout(count: ChatCount) -> BTreeMap<u8, SlotCoordinate> {
    let coordinates: &[SlotCoordinate] = match count.get() {
        2 => &[coord(400, 800), coord(1200, 800)],
        3 => &[coord(300, 800), coord(800, 800), coord(1300, 800)],
        4 => &[
            coord(250, 800),
            coord(650, 800),
            coord(1050, 800),
            coord(1450, 800),
        ],
        _ => &[],
    };
    coordinates
        .iter()
        .enumerate()
        .map(|(position, coordinate)| (position as u8 + 1, *coordinate))
        .collect()
}

/// Reads the coordinates currently persisted for slots 1..=count. Slots with
/// a missing or unparseable axis are omitted.
pub fn configured_layout(store: &ConfigStore, count: ChatCount) -> BTreeMap<u8, SlotCoordinate> {
    let mut layout = BTreeMap::new();
    for index in count.slot_indices() {
        let x = store
            .get(SECTION_COORDINATES, &slot_x_key(index))
            .and_then(|raw| raw.trim().parse().ok());
        let y = store
            .get(SECTION_COORDINATES, &slot_y_key(index))
            .and_then(|raw| raw.trim().parse().ok());
        if let (Some(x), Some(y)) = (x, y) {
            layout.insert(index, SlotCoordinate { x, y });
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: u8) -> ChatCount {
        ChatCount::new(value).expect("valid count")
    }

    #[test]
    fn layouts_are_defined_for_two_through_four_chats() {
        let two = default_layout(count(2));
        assert_eq!(two.len(), 2);
        assert_eq!(two[&1], coord(400, 800));
        assert_eq!(two[&2], coord(1200, 800));

        let three = default_layout(count(3));
        assert_eq!(three.len(), 3);
        assert_eq!(three[&3], coord(1300, 800));

        let four = default_layout(count(4));
        assert_eq!(four.len(), 4);
        assert_eq!(four[&4], coord(1450, 800));
    }

    #[test]
    fn five_and_six_chat_layouts_are_empty() {
        assert!(default_layout(count(5)).is_empty());
        assert!(default_layout(count(6)).is_empty());
    }
}
