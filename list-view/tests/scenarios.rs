use list_view::{FieldValue, ListRecord, ListViewState, Patch, SortSpec, ViewConfig, ViewConfigBuilder};

#[derive(Debug, Clone)]
struct Consent {
    id: String,
    name: String,
    status: String,
}

impl ListRecord for Consent {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::from(&self.name)),
            "status" => Some(FieldValue::from(&self.status)),
            _ => None,
        }
    }
}

fn consent(id: &str, name: &str, status: &str) -> Consent {
    Consent {
        id: id.to_string(),
        name: name.to_string(),
        status: status.to_string(),
    }
}

fn config() -> ViewConfig {
    ViewConfigBuilder::new()
        .search(["name", "status"])
        .choice("status", ["active", "withdrawn", "expired"])
        .page_size(10)
        .build()
}

fn five_consents() -> Vec<Consent> {
    vec![
        consent("c1", "Bob", "active"),
        consent("c2", "Alice", "active"),
        consent("c3", "Carol", "withdrawn"),
        consent("c4", "Dan", "expired"),
        consent("c5", "Eve", "active"),
    ]
}

fn names(state: &ListViewState<Consent>) -> Vec<String> {
    state.view().rows.iter().map(|c| c.name.clone()).collect()
}

#[test]
fn status_filter_then_search_then_single_page() {
    let config = ViewConfigBuilder::new()
        .search(["name"])
        .choice("status", ["active", "withdrawn", "expired"])
        .build();
    let mut state = ListViewState::with_collection(config, five_consents());

    state.set_filter("status", Some("active"));
    assert_eq!(state.view().filtered_count, 3);
    assert_eq!(names(&state), vec!["Bob", "Alice", "Eve"]);

    state.set_search_query("a");
    let view = state.view();
    assert_eq!(view.filtered_count, 1);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].name, "Alice");

    state.set_page_size(1);
    state.set_page(5);
    let view = state.view();
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page.index, 1);
}

#[test]
fn refresh_keeps_search_query_and_reapplies_it() {
    let mut state = ListViewState::with_collection(config(), five_consents());
    state.set_search_query("active");
    assert_eq!(state.view().filtered_count, 3);

    let mut bigger = five_consents();
    bigger.push(consent("c6", "Fay", "active"));
    bigger.push(consent("c7", "Gus", "withdrawn"));
    state.set_collection(bigger);

    assert_eq!(state.query(), "active");
    assert_eq!(state.view().total_count, 7);
    assert_eq!(names(&state), vec!["Bob", "Alice", "Eve", "Fay"]);
}

#[test]
fn refresh_after_user_interaction_keeps_the_newer_view_params() {
    let mut state = ListViewState::with_collection(config(), five_consents());

    // 请求发出后用户又改了筛选和排序
    state.set_filter("status", Some("withdrawn"));
    state.set_sort("name");
    state.set_sort("name");

    state.set_collection(vec![
        consent("c3", "Carol", "withdrawn"),
        consent("c8", "Zed", "withdrawn"),
        consent("c9", "Amy", "active"),
    ]);

    assert_eq!(state.sort(), Some(&SortSpec::descending("name")));
    assert_eq!(names(&state), vec!["Zed", "Carol"]);
}

#[test]
fn bulk_delete_flow_prunes_selection() {
    let mut state = ListViewState::with_collection(config(), five_consents());
    state.set_filter("status", Some("active"));
    state.select_all_visible();
    assert_eq!(state.selection().len(), 3);

    let doomed: Vec<String> = state
        .selected_records()
        .iter()
        .filter(|c| c.name != "Eve")
        .map(|c| c.id.clone())
        .collect();
    for id in doomed {
        state.apply_patch(Patch::Remove(id));
    }

    assert_eq!(state.view().selection, vec!["c5"]);
    assert_eq!(state.view().filtered_count, 1);
    assert!(state.view().all_visible_selected);
}

#[test]
fn select_all_only_takes_visible_rows() {
    let mut state = ListViewState::with_collection(config(), five_consents());
    state.set_search_query("o");

    state.select_all_visible();
    let selection: Vec<&str> = state.selection().iter().map(String::as_str).collect();
    assert_eq!(selection, vec!["c1", "c3"]);

    state.clear_selection();
    assert!(state.view().selection.is_empty());
}
