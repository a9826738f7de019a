use super::*;

fn fresh_store() -> PaletteStore {
    PaletteStore::new("Main", Box::new(MemoryPrefStore::new()))
}

// =============================================================
// First run / built-ins
// =============================================================

#[test]
fn first_run_installs_builtin_palettes() {
    let store = fresh_store();
    assert_eq!(store.len(), BUILTIN_PALETTES.len());
    // Each built-in inserts at the front, so the last one listed is first.
    assert_eq!(store.palette(0).name, "Faces");
    assert_eq!(store.palette(store.len() - 1).name, "Vehicles");
}

#[test]
fn builtin_ids_are_distinct() {
    let store = fresh_store();
    let mut ids: Vec<i64> = store.palettes().iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), store.len());
}

#[test]
fn first_run_persists_the_builtins() {
    let backing = MemoryPrefStore::new();
    let store = PaletteStore::new("Main", Box::new(backing.clone()));

    let blob = backing.load("palettes:Main").expect("install must persist");
    let decoded: Vec<Palette> = serde_json::from_slice(&blob).unwrap();
    assert_eq!(decoded, store.palettes());
}

// =============================================================
// Operations
// =============================================================

#[test]
fn palette_access_is_clamped() {
    let store = fresh_store();
    let last = store.palette(store.len() - 1).clone();
    assert_eq!(store.palette(9999), &last);
}

#[test]
fn insert_allocates_max_plus_one_and_clamps_index() {
    let mut store = fresh_store();
    let max_id = store.palettes().iter().map(|p| p.id).max().unwrap();
    store.insert_palette("Mine", "🌋🗿", 9999);
    let inserted = store.palette(store.len() - 1);
    assert_eq!(inserted.name, "Mine");
    assert_eq!(inserted.id, max_id + 1);
}

#[test]
fn remove_refuses_the_last_palette() {
    let mut store = PaletteStore::new("Solo", Box::new(MemoryPrefStore::new()));
    while store.len() > 1 {
        store.remove_palette(0);
    }
    let cursor = store.remove_palette(0);
    assert_eq!(store.len(), 1);
    assert_eq!(cursor, 0);
}

#[test]
fn remove_returns_a_wrapped_cursor() {
    let mut store = fresh_store();
    let len = store.len();
    let cursor = store.remove_palette(len - 1);
    assert_eq!(store.len(), len - 1);
    assert_eq!(cursor, (len - 1) % (len - 1));
}

#[test]
fn rename_and_set_emojis_edit_in_place() {
    let mut store = fresh_store();
    store.rename_palette(0, "Renamed");
    store.set_palette_emojis(0, "🫠");
    assert_eq!(store.palette(0).name, "Renamed");
    assert_eq!(store.palette(0).emojis, "🫠");

    let before: Vec<Palette> = store.palettes().to_vec();
    store.rename_palette(9999, "Nope");
    store.set_palette_emojis(9999, "🙅");
    assert_eq!(store.palettes(), &before[..], "out-of-range edits are no-ops");
}

// =============================================================
// Persistence contract
// =============================================================

#[test]
fn mutations_round_trip_through_the_pref_store() {
    let backing = MemoryPrefStore::new();
    let mut store = PaletteStore::new("Main", Box::new(backing.clone()));
    store.insert_palette("Mine", "🌋🗿", 0);
    let len = store.len();
    drop(store);

    let reopened = PaletteStore::new("Main", Box::new(backing));
    assert_eq!(reopened.palette(0).name, "Mine");
    assert_eq!(reopened.len(), len);
}

#[test]
fn malformed_stored_blob_falls_back_to_builtins() {
    let mut backing = MemoryPrefStore::new();
    backing.store("palettes:Main", b"{definitely not palettes").unwrap();
    let store = PaletteStore::new("Main", Box::new(backing));
    assert_eq!(store.len(), BUILTIN_PALETTES.len());
}

#[test]
fn empty_stored_blob_falls_back_to_builtins() {
    let mut backing = MemoryPrefStore::new();
    backing.store("palettes:Main", b"[]").unwrap();
    let store = PaletteStore::new("Main", Box::new(backing));
    assert_eq!(store.len(), BUILTIN_PALETTES.len());
}

#[test]
fn file_pref_store_round_trips_blobs() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FilePrefStore::with_dir(dir.path().to_path_buf());
    assert_eq!(store.load("palettes:Main"), None);
    store.store("palettes:Main", b"[1,2,3]").unwrap();
    assert_eq!(store.load("palettes:Main"), Some(b"[1,2,3]".to_vec()));
}

#[test]
fn file_pref_store_persists_a_palette_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store =
            PaletteStore::new("Main", Box::new(FilePrefStore::with_dir(dir.path().to_path_buf())));
        store.insert_palette("Mine", "🌋", 0);
    }
    let reopened =
        PaletteStore::new("Main", Box::new(FilePrefStore::with_dir(dir.path().to_path_buf())));
    assert_eq!(reopened.palette(0).name, "Mine");
}
