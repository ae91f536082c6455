use crate::client::api::ItemsApi;
use crate::database::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Client-side snapshot of the item collection.
///
/// Two fetch modes: a hard fetch (used on startup) raises the blocking
/// `loading` flag; a silent fetch (used after a mutation) raises only
/// `refreshing` so the current list stays usable while it updates. A failed
/// fetch records a message and leaves the previous collection untouched.
pub struct ItemsView {
    api: ItemsApi,
    pub items: Vec<Item>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ItemsView {
    pub fn new(api: ItemsApi) -> Self {
        Self {
            api,
            items: Vec::new(),
            loading: false,
            refreshing: false,
            error: None,
            sort_field: SortField::Name,
            sort_direction: SortDirection::Asc,
        }
    }

    /// Retrieve the full collection and replace local state.
    pub async fn fetch(&mut self, show_loading: bool) {
        if show_loading {
            self.loading = true;
        } else {
            self.refreshing = true;
        }

        match self.api.get_items().await {
            Ok(mut data) => {
                sort_items(&mut data, self.sort_field, self.sort_direction);
                self.items = data;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }

        if show_loading {
            self.loading = false;
        } else {
            self.refreshing = false;
        }
    }

    /// Re-order the already-fetched collection. Toggling the current field
    /// flips direction; a new field starts ascending.
    pub fn handle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = match self.sort_direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
        sort_items(&mut self.items, self.sort_field, self.sort_direction);
    }
}

/// String comparison: case-insensitive for name/value, exact for id.
pub fn sort_items(items: &mut [Item], field: SortField, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Value => a.value.to_lowercase().cmp(&b.value.to_lowercase()),
            SortField::Id => a.id.cmp(&b.id),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, value: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item("3", "charlie", "Wine"),
            item("1", "alice", "pie"),
            item("2", "Bob", "cake"),
        ]
    }

    #[test]
    fn sorts_names_case_insensitively() {
        let mut items = sample();
        sort_items(&mut items, SortField::Name, SortDirection::Asc);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "Bob", "charlie"]);
    }

    #[test]
    fn sorting_is_deterministic() {
        let mut first = sample();
        let mut second = sample();
        sort_items(&mut first, SortField::Name, SortDirection::Asc);
        sort_items(&mut second, SortField::Name, SortDirection::Asc);
        assert_eq!(first, second);
    }

    #[test]
    fn descending_reverses_exactly() {
        let mut asc = sample();
        let mut desc = sample();
        sort_items(&mut asc, SortField::Value, SortDirection::Asc);
        sort_items(&mut desc, SortField::Value, SortDirection::Desc);
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn toggling_same_field_flips_direction() {
        let api = ItemsApi::new("http://localhost:3000");
        let mut view = ItemsView::new(api);
        view.items = sample();

        view.handle_sort(SortField::Name);
        // Name was already the active field, so the first toggle flips to descending
        assert_eq!(view.sort_direction, SortDirection::Desc);
        assert_eq!(view.items[0].name, "charlie");

        view.handle_sort(SortField::Name);
        assert_eq!(view.sort_direction, SortDirection::Asc);
        assert_eq!(view.items[0].name, "alice");
    }

    #[test]
    fn selecting_new_field_resets_to_ascending() {
        let api = ItemsApi::new("http://localhost:3000");
        let mut view = ItemsView::new(api);
        view.items = sample();

        view.handle_sort(SortField::Name); // Name -> Desc
        view.handle_sort(SortField::Id);
        assert_eq!(view.sort_field, SortField::Id);
        assert_eq!(view.sort_direction, SortDirection::Asc);
        assert_eq!(view.items[0].id, "1");
    }

    #[test]
    fn id_sort_is_exact_not_folded() {
        let mut items = vec![item("a", "x", "y"), item("B", "x", "y")];
        sort_items(&mut items, SortField::Id, SortDirection::Asc);
        // Uppercase sorts before lowercase in exact comparison
        assert_eq!(items[0].id, "B");
    }
}
