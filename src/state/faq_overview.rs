use tracing::{debug, warn};

use crate::types::{DeleteFaqRequest, FaqKey, FaqRow, StatusKind, StatusToggleRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySection {
    pub category_id: i64,
    pub expanded: bool,
    pub loading: bool,
    pub rows: Vec<FaqRow>,
    pub all_sticky: bool,
    pub all_active: bool,
}

impl CategorySection {
    pub fn new(category_id: i64) -> Self {
        Self {
            category_id,
            expanded: false,
            loading: false,
            rows: Vec::new(),
            all_sticky: false,
            all_active: false,
        }
    }
}

/// One selectable line of the overview: a category header or one of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewItem {
    Section(usize),
    Row(usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverviewEvent {
    RowsLoaded { category_id: i64, rows: Vec<FaqRow> },
    RowsFailed { category_id: i64 },
    Deleted(FaqKey),
}

#[derive(Debug, Default)]
pub struct FaqOverview {
    pub sections: Vec<CategorySection>,
    pub selected_index: usize,
    pub pending_delete: Option<FaqKey>,
}

impl FaqOverview {
    pub fn new(categories: &[i64]) -> Self {
        let mut overview = Self::default();
        for id in categories {
            overview.add_category(*id);
        }
        overview
    }

    /// Adds a category section unless it is already listed. Returns its index.
    pub fn add_category(&mut self, category_id: i64) -> usize {
        if let Some(index) = self.section_index(category_id) {
            return index;
        }
        self.sections.push(CategorySection::new(category_id));
        self.sections.len() - 1
    }

    pub fn section_index(&self, category_id: i64) -> Option<usize> {
        self.sections.iter().position(|s| s.category_id == category_id)
    }

    pub fn items(&self) -> Vec<OverviewItem> {
        let mut items = Vec::new();
        for (s, section) in self.sections.iter().enumerate() {
            items.push(OverviewItem::Section(s));
            if section.expanded {
                items.extend((0..section.rows.len()).map(|r| OverviewItem::Row(s, r)));
            }
        }
        items
    }

    pub fn selected(&self) -> Option<OverviewItem> {
        self.items().get(self.selected_index).copied()
    }

    pub fn selected_section(&self) -> Option<usize> {
        match self.selected()? {
            OverviewItem::Section(s) | OverviewItem::Row(s, _) => Some(s),
        }
    }

    pub fn select_section(&mut self, section: usize) {
        if let Some(pos) = self
            .items()
            .iter()
            .position(|item| *item == OverviewItem::Section(section))
        {
            self.selected_index = pos;
        }
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.items().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.items().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// Marks a section expanded and loading. Returns the category to fetch.
    pub fn expand(&mut self, section: usize) -> Option<i64> {
        let section = self.sections.get_mut(section)?;
        section.expanded = true;
        section.loading = true;
        section.rows.clear();
        Some(section.category_id)
    }

    /// Collapsing drops the rows; the next expand fetches them again.
    pub fn collapse(&mut self, section: usize) {
        if let Some(s) = self.sections.get_mut(section) {
            s.expanded = false;
            s.loading = false;
            s.rows.clear();
        }
        self.select_section(section);
        self.clamp_selection();
    }

    pub fn apply(&mut self, event: OverviewEvent) {
        match event {
            OverviewEvent::RowsLoaded { category_id, rows } => {
                let Some(index) = self.section_index(category_id) else {
                    return;
                };
                let section = &mut self.sections[index];
                if !section.expanded {
                    debug!(category_id, "discarding rows for a collapsed category");
                    return;
                }
                section.loading = false;
                section.all_sticky = !rows.is_empty() && rows.iter().all(|r| r.sticky);
                section.all_active = !rows.is_empty() && rows.iter().all(|r| r.active);
                section.rows = rows;
            }
            OverviewEvent::RowsFailed { category_id } => {
                if let Some(index) = self.section_index(category_id) {
                    self.sections[index].loading = false;
                }
            }
            OverviewEvent::Deleted(key) => {
                for section in &mut self.sections {
                    section.rows.retain(|row| row.key() != key);
                }
                if self.pending_delete.as_ref() == Some(&key) {
                    self.pending_delete = None;
                }
                self.clamp_selection();
            }
        }
    }

    /// Flips one row's flag and builds the request saving it.
    pub fn toggle_row(
        &mut self,
        section: usize,
        row: usize,
        kind: StatusKind,
        csrf: &str,
    ) -> Option<StatusToggleRequest> {
        let section = self.sections.get_mut(section)?;
        let category_id = section.category_id;
        let row = section.rows.get_mut(row)?;
        let flag = match kind {
            StatusKind::Sticky => &mut row.sticky,
            StatusKind::Active => &mut row.active,
        };
        *flag = !*flag;
        let checked = *flag;

        Some(StatusToggleRequest {
            csrf: csrf.to_string(),
            category_id,
            faq_ids: vec![row.id],
            faq_language: row.language.clone(),
            checked,
        })
    }

    /// Flips the section's "all" box and cascades it to every row of that category.
    pub fn toggle_all(
        &mut self,
        section: usize,
        kind: StatusKind,
        csrf: &str,
    ) -> Option<StatusToggleRequest> {
        let section = self.sections.get_mut(section)?;
        let category_id = section.category_id;
        let Some(faq_language) = section.rows.first().map(|row| row.language.clone()) else {
            warn!(category_id, "toggle-all on a category without loaded rows");
            return None;
        };

        let all_flag = match kind {
            StatusKind::Sticky => &mut section.all_sticky,
            StatusKind::Active => &mut section.all_active,
        };
        *all_flag = !*all_flag;
        let checked = *all_flag;

        let mut faq_ids = Vec::new();
        for row in section.rows.iter_mut().filter(|r| r.category_id == category_id) {
            match kind {
                StatusKind::Sticky => row.sticky = checked,
                StatusKind::Active => row.active = checked,
            }
            faq_ids.push(row.id);
        }

        Some(StatusToggleRequest {
            csrf: csrf.to_string(),
            category_id,
            faq_ids,
            faq_language,
            checked,
        })
    }

    /// Asks for confirmation before deleting the row.
    pub fn request_delete(&mut self, section: usize, row: usize) -> Option<FaqKey> {
        let key = self.sections.get(section)?.rows.get(row)?.key();
        self.pending_delete = Some(key.clone());
        Some(key)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self, csrf: &str) -> Option<DeleteFaqRequest> {
        let key = self.pending_delete.take()?;
        Some(DeleteFaqRequest {
            csrf: csrf.to_string(),
            faq_id: key.id,
            faq_language: key.language,
        })
    }

    pub fn find_row(&self, key: &FaqKey) -> Option<&FaqRow> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .find(|row| row.key() == *key)
    }
}
