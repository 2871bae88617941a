//! Folding flat note × tag join rows into nested notes.
//!
//! The store returns one row per (note, tag) membership, plus one row with
//! null tag columns for every note without tags. [`fold_note_rows`] groups
//! those rows by note id in a single pass:
//!
//! - notes come out in the order their id was first seen,
//! - each note appears exactly once,
//! - tags keep their first-seen order within a note,
//! - a note whose only row has null tag columns gets an empty tag list.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::models::{Note, NoteRow, Tag};

/// Group flat join rows into one [`Note`] per distinct note id.
pub fn fold_note_rows(rows: Vec<NoteRow>) -> Vec<Note> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut seen_tags: Vec<HashSet<i64>> = Vec::new();
    let mut notes: Vec<Note> = Vec::new();

    for row in rows {
        let slot = match index.get(&row.id) {
            Some(&slot) => slot,
            None => {
                let slot = notes.len();
                index.insert(row.id, slot);
                seen_tags.push(HashSet::new());
                notes.push(Note {
                    id: row.id,
                    title: row.title,
                    content: row.content,
                    folder_id: row.folder_id,
                    folder_name: row.folder_name,
                    tags: Vec::new(),
                });
                slot
            }
        };

        if let (Some(tag_id), Some(tag_name)) = (row.tag_id, row.tag_name) {
            // Repeated (note, tag) rows collapse to one entry.
            if seen_tags[slot].insert(tag_id) {
                notes[slot].tags.push(Tag {
                    id: tag_id,
                    name: tag_name,
                });
            }
        }
    }

    trace!(
        subsystem = "core",
        component = "hydrate",
        result_count = notes.len(),
        "Folded note rows"
    );
    notes
}
